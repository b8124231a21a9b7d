//! Years (`aset_tahun`), listed newest first.

use aset_core::resource::{NaturalKey, OrderBy, ResourceSpec};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::Resource;

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct TahunInput {
    #[validate(
        required(message = "Required"),
        length(min = 1, message = "Tahun tidak boleh kosong")
    )]
    pub tahun: Option<String>,
}

impl Resource for TahunInput {
    const SPEC: ResourceSpec = ResourceSpec {
        name: "tahun",
        path: "tahun",
        table: "aset_tahun",
        fields: &["tahun"],
        columns: None,
        order: OrderBy::desc("tahun"),
        natural_key: Some(NaturalKey {
            column: "tahun",
            conflict_message: "Tahun sudah ada",
        }),
    };
}
