//! Vehicle conditions (`aset_kondisi`).

use aset_core::resource::{NaturalKey, ResourceSpec, BY_ID};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::Resource;

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct KondisiInput {
    #[validate(
        required(message = "Required"),
        length(min = 1, message = "Kondisi tidak boleh kosong")
    )]
    pub kondisi: Option<String>,
}

impl Resource for KondisiInput {
    const SPEC: ResourceSpec = ResourceSpec {
        name: "kondisi",
        path: "kondisi",
        table: "aset_kondisi",
        fields: &["kondisi"],
        columns: None,
        order: BY_ID,
        natural_key: Some(NaturalKey {
            column: "kondisi",
            conflict_message: "Kondisi sudah ada",
        }),
    };
}
