//! HTTP inbound adapter exposing REST endpoints.

use actix_web::web;

pub mod apps;
pub mod error;
pub mod health;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod upload_form;
pub mod users;

pub use error::ApiResult;

/// Register the app and user endpoints.
///
/// Callers supply `web::Data<HttpState>` through `app_data`.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use appstore::inbound::http::configure;
///
/// let _app = App::new().configure(configure);
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(apps::upload)
        .service(apps::search)
        .service(apps::checkout)
        .service(users::signup)
        .service(users::signin);
}
