//! Domain primitives, ports, and services.
//!
//! Purpose: define the app and user entities, the search vocabulary shared
//! by every index adapter, and the services sequencing the driven ports.
//! Types here know nothing about HTTP or any particular backend.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - AppListing / App: upload metadata and the published, indexed app.
//! - Credentials / User: sign-in input and the stored user record.
//! - SearchQuery / SearchHits: typed queries and results for the index port.
//! - AppService / UserService: implementations of the driving ports.

pub mod app;
pub mod app_service;
pub mod auth;
pub mod error;
pub mod ports;
pub mod search;
pub mod trace_id;
pub mod user;
pub mod user_service;

pub use self::app::{App, AppId, AppListing, MINOR_UNITS_PER_UNIT};
pub use self::app_service::AppService;
pub use self::auth::{
    Credentials, CredentialsValidationError, PasswordHashError, hash_password, verify_password,
};
pub use self::error::{Error, ErrorCode};
pub use self::search::{
    IndexName, IndexedDocument, MatchOperator, MatchQuery, SearchHits, SearchQuery,
    ZeroTermsPolicy,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::User;
pub use self::user_service::UserService;
