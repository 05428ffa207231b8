//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint of the inbound layer and the
//! schema wrappers from [`crate::inbound::http::schemas`], which describe
//! domain types without coupling them to utoipa. The document is served by
//! Swagger UI in debug builds and exported by the `openapi-dump` binary.

use utoipa::OpenApi;

use crate::inbound::http::apps::CheckoutForm;
use crate::inbound::http::schemas::{AppSchema, ErrorCodeSchema, ErrorSchema, UploadFormSchema};
use crate::inbound::http::users::CredentialsRequest;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "App store backend API",
        description = "Upload, search, and buy apps; register and sign in users."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::apps::upload,
        crate::inbound::http::apps::search,
        crate::inbound::http::apps::checkout,
        crate::inbound::http::users::signup,
        crate::inbound::http::users::signin,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        AppSchema,
        ErrorSchema,
        ErrorCodeSchema,
        UploadFormSchema,
        CheckoutForm,
        CredentialsRequest
    )),
    tags(
        (name = "apps", description = "App upload, search, and checkout"),
        (name = "users", description = "User registration and sign-in"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    const ERROR_SCHEMA_NAME: &str = "crate.domain.Error";
    const APP_SCHEMA_NAME: &str = "crate.domain.App";

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[test]
    fn openapi_registers_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/upload",
            "/search",
            "/checkout",
            "/signup",
            "/signin",
            "/health/ready",
            "/health/live",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }

    #[test]
    fn openapi_error_schema_has_required_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let error_schema = schemas.get(ERROR_SCHEMA_NAME).expect("Error schema");

        assert_object_schema_has_field(error_schema, "code");
        assert_object_schema_has_field(error_schema, "message");
    }

    #[test]
    fn openapi_app_schema_has_document_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let app_schema = schemas.get(APP_SCHEMA_NAME).expect("App schema");

        assert_object_schema_has_field(app_schema, "title");
        assert_object_schema_has_field(app_schema, "price_id");
    }
}
