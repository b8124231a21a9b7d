//! Vehicle types (`aset_jenis`).

use aset_core::resource::{NaturalKey, ResourceSpec, BY_ID};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::Resource;

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct JenisInput {
    #[validate(
        required(message = "Required"),
        length(min = 1, message = "Nama tidak boleh kosong")
    )]
    pub nama: Option<String>,
}

impl Resource for JenisInput {
    const SPEC: ResourceSpec = ResourceSpec {
        name: "jenis",
        path: "jenis",
        table: "aset_jenis",
        fields: &["nama"],
        columns: None,
        order: BY_ID,
        natural_key: Some(NaturalKey {
            column: "nama",
            conflict_message: "Jenis sudah ada",
        }),
    };
}
