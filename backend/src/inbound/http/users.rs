//! Sign-up and sign-in handlers.
//!
//! ```text
//! POST /signup {"username":"alice","password":"hunter2"}
//! POST /signin {"username":"alice","password":"hunter2"}
//! ```

use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::domain::{Credentials, CredentialsValidationError, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Credentials body for `POST /signup` and `POST /signin`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
pub struct CredentialsRequest {
    /// Username, also the user document key.
    pub username: String,
    /// Clear-text password; only its hash is stored.
    pub password: String,
}

impl TryFrom<CredentialsRequest> for Credentials {
    type Error = CredentialsValidationError;

    fn try_from(value: CredentialsRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.username, &value.password)
    }
}

fn map_credentials_error(err: CredentialsValidationError) -> Error {
    match err {
        CredentialsValidationError::EmptyUsername => {
            Error::invalid_request("username must not be empty")
                .with_details(json!({ "field": "username", "code": "empty_username" }))
        }
        CredentialsValidationError::EmptyPassword => {
            Error::invalid_request("password must not be empty")
                .with_details(json!({ "field": "password", "code": "empty_password" }))
        }
    }
}

/// Register a new user.
#[utoipa::path(
    post,
    path = "/signup",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "User registered", body = String, content_type = "text/plain"),
        (status = 400, description = "Blank credentials or username taken", body = ErrorSchema),
        (status = 503, description = "The index is unreachable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "signup"
)]
#[post("/signup")]
pub async fn signup(
    state: web::Data<HttpState>,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<HttpResponse> {
    let credentials =
        Credentials::try_from(payload.into_inner()).map_err(map_credentials_error)?;
    if !state.users.add_user(&credentials).await? {
        return Err(Error::invalid_request("username is already registered")
            .with_details(json!({ "field": "username", "code": "username_taken" })));
    }
    info!(username = credentials.username(), "user signed up");
    Ok(HttpResponse::Ok()
        .content_type(ContentType::plaintext())
        .body(format!("User added successfully: {}", credentials.username())))
}

/// Check a user's credentials.
#[utoipa::path(
    post,
    path = "/signin",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Credentials accepted"),
        (status = 400, description = "Blank credentials", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 503, description = "The index is unreachable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "signin"
)]
#[post("/signin")]
pub async fn signin(
    state: web::Data<HttpState>,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<HttpResponse> {
    let credentials =
        Credentials::try_from(payload.into_inner()).map_err(map_credentials_error)?;
    if state.users.check_user(&credentials).await? {
        Ok(HttpResponse::Ok().finish())
    } else {
        Err(Error::unauthorized("invalid username or password"))
    }
}
