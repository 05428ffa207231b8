//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. This
//! module provides the schema definitions required for OpenAPI documentation
//! using utoipa's external schema registration.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Credentials were rejected.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// A backend is unreachable or timed out.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[schema(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "service_unavailable")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "Failed to save app to backend")]
    message: String,
    /// Correlation identifier for tracing this error across systems.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary error details for clients.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::App`].
#[derive(ToSchema)]
#[schema(as = crate::domain::App)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct AppSchema {
    /// App identifier.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    id: String,
    /// Owning user.
    user: String,
    /// App title.
    #[schema(example = "Foo")]
    title: String,
    /// App description.
    #[schema(example = "Bar")]
    description: String,
    /// Price in whole currency units.
    #[schema(example = 10)]
    price: i64,
    /// Public media link.
    url: String,
    /// Payment product identifier.
    product_id: String,
    /// Payment price identifier.
    price_id: String,
}

/// OpenAPI schema for the `POST /upload` multipart form.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct UploadFormSchema {
    /// Owning user.
    user: String,
    /// App title.
    title: String,
    /// App description.
    description: String,
    /// Price in whole currency units; unparsable values read as zero.
    #[schema(example = "10")]
    price: String,
    /// App media.
    #[schema(value_type = String, format = Binary)]
    media_file: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::PartialSchema;

    fn schema_to_json<T: PartialSchema>() -> String {
        serde_json::to_string(&T::schema()).expect("schema serialises to JSON")
    }

    #[test]
    fn error_code_schema_lists_every_code() {
        let schema_json = schema_to_json::<ErrorCodeSchema>();
        assert_eq!(ErrorCodeSchema::name(), "crate.domain.ErrorCode");
        for code in [
            "invalid_request",
            "unauthorized",
            "not_found",
            "service_unavailable",
            "internal_error",
        ] {
            assert!(schema_json.contains(code), "missing {code}");
        }
    }

    #[test]
    fn error_schema_uses_camel_case_trace_id() {
        let schema_json = schema_to_json::<ErrorSchema>();
        assert_eq!(ErrorSchema::name(), "crate.domain.Error");
        assert!(schema_json.contains("traceId"));
    }

    #[test]
    fn app_schema_matches_index_document_fields() {
        let schema_json = schema_to_json::<AppSchema>();
        assert_eq!(AppSchema::name(), "crate.domain.App");
        for field in ["product_id", "price_id", "url"] {
            assert!(schema_json.contains(field), "missing {field}");
        }
    }

    #[test]
    fn upload_form_media_is_binary() {
        let schema_json = schema_to_json::<UploadFormSchema>();
        assert!(schema_json.contains("media_file"));
        assert!(schema_json.contains("binary"));
    }
}
