//! Wire types for the Cloud Storage JSON API.

use serde::{Deserialize, Serialize};

/// Object resource returned by an upload.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectDto {
    pub name: String,
    pub media_link: Option<String>,
}

/// Object access control entry.
#[derive(Debug, Serialize)]
pub struct ObjectAclDto<'a> {
    pub entity: &'a str,
    pub role: &'a str,
}

/// Entry granting anonymous read access.
pub const PUBLIC_READ: ObjectAclDto<'static> = ObjectAclDto {
    entity: "allUsers",
    role: "READER",
};
