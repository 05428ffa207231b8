//! App upload, search, and checkout handlers.
//!
//! ```text
//! POST /upload    multipart: user, title, description, price, media_file
//! GET  /search?title=...&description=...
//! POST /checkout  form: appID, header Origin
//! ```

use actix_multipart::Multipart;
use actix_web::http::header::{self, ContentType};
use actix_web::{HttpRequest, HttpResponse, get, post, web};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{App, Error, ErrorCode};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{AppSchema, ErrorSchema, UploadFormSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::upload_form::UploadForm;

/// Query string accepted by `GET /search`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(default)]
pub struct SearchParams {
    /// Text matched against app titles.
    pub title: String,
    /// Text matched against app descriptions.
    pub description: String,
}

/// Form accepted by `POST /checkout`.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct CheckoutForm {
    /// Identifier of the app to buy.
    #[serde(rename = "appID")]
    pub app_id: String,
}

/// Replace a collaborator failure message with a public one, keeping the
/// original text under `details.reason`.
///
/// The public message survives internal error redaction; the reason does not.
fn public_error(err: Error, message: &str) -> Error {
    match err.code() {
        ErrorCode::InvalidRequest | ErrorCode::NotFound => err,
        code => Error::new(code, message)
            .with_details(json!({ "reason": err.message() }))
            .exposed(),
    }
}

fn plain_text(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::plaintext())
        .body(body)
}

/// Upload an app: create its payment product, store its media, index it.
#[utoipa::path(
    post,
    path = "/upload",
    request_body(content = UploadFormSchema, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "App saved", body = String, content_type = "text/plain"),
        (status = 400, description = "Missing media or malformed form", body = ErrorSchema),
        (status = 500, description = "A backend rejected the app", body = ErrorSchema),
        (status = 503, description = "A backend is unreachable", body = ErrorSchema)
    ),
    tags = ["apps"],
    operation_id = "uploadApp"
)]
#[post("/upload")]
pub async fn upload(state: web::Data<HttpState>, payload: Multipart) -> ApiResult<HttpResponse> {
    info!("received upload request");
    let (listing, media) = UploadForm::read(payload, state.upload_limits)
        .await?
        .into_listing()?;
    let app = state
        .apps
        .save_app(listing, media)
        .await
        .map_err(|err| public_error(err, "Failed to save app to backend"))?;
    Ok(plain_text(format!(
        "App is saved successfully: {}\n",
        app.description()
    )))
}

/// Full-text search over app titles and descriptions.
#[utoipa::path(
    get,
    path = "/search",
    params(SearchParams),
    responses(
        (status = 200, description = "Matching apps", body = [AppSchema]),
        (status = 500, description = "The index rejected the query", body = ErrorSchema),
        (status = 503, description = "The index is unreachable", body = ErrorSchema)
    ),
    tags = ["apps"],
    operation_id = "searchApps"
)]
#[get("/search")]
pub async fn search(
    state: web::Data<HttpState>,
    params: web::Query<SearchParams>,
) -> ApiResult<web::Json<Vec<App>>> {
    let SearchParams { title, description } = params.into_inner();
    info!(%title, %description, "received search request");
    let apps = state
        .apps
        .search_apps(&title, &description)
        .await
        .map_err(|err| public_error(err, "Failed to read Apps from backend"))?;
    Ok(web::Json(apps))
}

/// Start a hosted checkout for an app.
///
/// Failures are reported as a plain-text body with status 200.
#[utoipa::path(
    post,
    path = "/checkout",
    request_body(content = CheckoutForm, content_type = "application/x-www-form-urlencoded"),
    params(("Origin" = String, Header, description = "Site the checkout redirects back to")),
    responses(
        (status = 200, description = "Checkout session URL, or the failure message", body = String, content_type = "text/plain")
    ),
    tags = ["apps"],
    operation_id = "checkoutApp"
)]
#[post("/checkout")]
pub async fn checkout(
    state: web::Data<HttpState>,
    req: HttpRequest,
    form: web::Form<CheckoutForm>,
) -> HttpResponse {
    let origin = req
        .headers()
        .get(header::ORIGIN)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    let app_id = form.into_inner().app_id;
    match state.apps.checkout_app(origin, &app_id).await {
        Ok(url) => {
            info!(%app_id, "checkout process started");
            plain_text(url)
        }
        Err(err) => {
            warn!(%app_id, code = ?err.code(), error = %err, "checkout failed");
            plain_text(err.to_string())
        }
    }
}
