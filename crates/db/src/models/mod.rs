//! Write payloads for each CRUD resource.
//!
//! Each submodule contains:
//! - A `Deserialize` + `Validate` input struct carrying the required-field
//!   rules for create and update
//! - The [`ResourceSpec`] describing the backing table, ordering, read
//!   projection and natural key
//!
//! The generic handler in `aset-api` is instantiated once per [`Resource`].

pub mod instansi;
pub mod jenis;
pub mod kendaraan;
pub mod kondisi;
pub mod tahun;
pub mod user;

use aset_core::audit::AUDIT_TABLE;
use aset_core::error::CoreError;
use aset_core::resource::ResourceSpec;
use aset_core::types::Record;
use aset_core::validation::{collect_issues, type_issues, FieldIssue};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use validator::Validate;

use crate::store::MemoryTableStore;

/// A payload type bound to one backing table.
pub trait Resource: DeserializeOwned + Serialize + Validate + Send + 'static {
    const SPEC: ResourceSpec;

    /// Declared fields that take an integer id as well as a string.
    const ID_FIELDS: &'static [&'static str] = &[];

    /// Parse and validate a request body.
    ///
    /// Mistyped fields, unreadable bodies and rule failures all surface as
    /// [`CoreError::Validation`], with issues in schema order. A mistyped
    /// field is reported once and does not hide issues on other fields.
    fn from_json(mut body: Value) -> Result<Self, CoreError> {
        let spec = Self::SPEC;
        let mut issues = match body.as_object_mut() {
            Some(map) => {
                let issues = type_issues(map, spec.fields, Self::ID_FIELDS);
                for field in issues.iter().filter_map(FieldIssue::field) {
                    map.remove(field);
                }
                issues
            }
            None => Vec::new(),
        };

        let payload: Self = serde_json::from_value(body)
            .map_err(|e| CoreError::Validation(vec![FieldIssue::unreadable_body(&e)]))?;

        if let Err(errors) = payload.validate() {
            let rule_issues = collect_issues(&errors, |f| spec.field_position(f));
            let mistyped: Vec<String> = issues
                .iter()
                .filter_map(|i| i.field().map(str::to_owned))
                .collect();
            issues.extend(
                rule_issues
                    .into_iter()
                    .filter(|i| !i.field().is_some_and(|f| mistyped.iter().any(|m| m == f))),
            );
        }

        if issues.is_empty() {
            return Ok(payload);
        }
        issues.sort_by_key(|i| spec.field_position(i.field().unwrap_or_default()));
        Err(CoreError::Validation(issues))
    }

    /// Columns to write for this payload.
    fn into_record(self) -> Result<Record, CoreError> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(CoreError::Internal(format!(
                "{} payload is not an object",
                Self::SPEC.name
            ))),
            Err(e) => Err(CoreError::Internal(e.to_string())),
        }
    }
}

/// Every resource descriptor, in navigation order.
pub const RESOURCES: &[ResourceSpec] = &[
    instansi::InstansiInput::SPEC,
    jenis::JenisInput::SPEC,
    kendaraan::KendaraanInput::SPEC,
    kondisi::KondisiInput::SPEC,
    tahun::TahunInput::SPEC,
    user::UserInput::SPEC,
];

/// An in-memory store with every resource table, the audit table and the
/// vehicle foreign keys registered.
pub fn memory_store() -> MemoryTableStore {
    let mut tables: Vec<&'static str> = RESOURCES.iter().map(|r| r.table).collect();
    tables.push(AUDIT_TABLE);

    kendaraan::REFERENCES
        .iter()
        .fold(MemoryTableStore::new(&tables), |store, reference| {
            store.with_reference(*reference)
        })
}
