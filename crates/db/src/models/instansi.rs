//! Government agencies (`aset_instansi`).

use aset_core::resource::{ResourceSpec, BY_ID};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::Resource;

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct InstansiInput {
    #[validate(
        required(message = "Required"),
        length(min = 1, message = "Name required")
    )]
    pub nama: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alamat: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_foto: Option<String>,
}

impl Resource for InstansiInput {
    const SPEC: ResourceSpec = ResourceSpec {
        name: "instansi",
        path: "instansi",
        table: "aset_instansi",
        fields: &["nama", "alias", "alamat", "url_foto"],
        columns: None,
        order: BY_ID,
        natural_key: None,
    };
}
