//! Vehicles (`aset_kendaraan`).
//!
//! A vehicle references its agency, type and year by id. The references are
//! enforced by the datastore; the application only requires them to be
//! present.

use aset_core::resource::{ResourceSpec, BY_ID};
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use super::Resource;
use crate::store::Reference;

const TABLE: &str = "aset_kendaraan";

/// Foreign keys held by vehicle rows.
pub const REFERENCES: &[Reference] = &[
    Reference {
        from_table: TABLE,
        column: "id_instansi",
        to_table: "aset_instansi",
    },
    Reference {
        from_table: TABLE,
        column: "id_jenis",
        to_table: "aset_jenis",
    },
    Reference {
        from_table: TABLE,
        column: "id_tahun",
        to_table: "aset_tahun",
    },
];

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct KendaraanInput {
    #[validate(
        required(message = "Required"),
        length(min = 1, message = "Nama tidak boleh kosong")
    )]
    pub nama: Option<String>,
    #[validate(
        required(message = "Required"),
        length(min = 1, message = "Nopol tidak boleh kosong")
    )]
    pub nopol: Option<String>,
    #[validate(
        required(message = "Required"),
        length(min = 1, message = "Warna tidak boleh kosong")
    )]
    pub warna: Option<String>,
    #[validate(
        required(message = "Required"),
        length(min = 1, message = "Instansi tidak boleh kosong")
    )]
    #[serde(default, deserialize_with = "id_text")]
    pub id_instansi: Option<String>,
    #[validate(
        required(message = "Required"),
        length(min = 1, message = "Jenis tidak boleh kosong")
    )]
    #[serde(default, deserialize_with = "id_text")]
    pub id_jenis: Option<String>,
    #[validate(
        required(message = "Required"),
        length(min = 1, message = "Tahun tidak boleh kosong")
    )]
    #[serde(default, deserialize_with = "id_text")]
    pub id_tahun: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_foto: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catatan: Option<String>,
}

/// Read a reference as text. Rows read back from PostgreSQL carry the ids
/// as numbers, forms send them as strings.
fn id_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IdValue {
        Text(String),
        Number(i64),
    }

    Ok(Option::<IdValue>::deserialize(deserializer)?.map(|value| match value {
        IdValue::Text(text) => text,
        IdValue::Number(id) => id.to_string(),
    }))
}

impl Resource for KendaraanInput {
    const ID_FIELDS: &'static [&'static str] = &["id_instansi", "id_jenis", "id_tahun"];

    const SPEC: ResourceSpec = ResourceSpec {
        name: "kendaraan",
        path: "kendaraan",
        table: TABLE,
        fields: &[
            "nama",
            "nopol",
            "warna",
            "id_instansi",
            "id_jenis",
            "id_tahun",
            "url_foto",
            "catatan",
        ],
        columns: None,
        order: BY_ID,
        natural_key: None,
    };
}
