//! Generic handlers shared by every CRUD resource.
//!
//! Each function is instantiated per [`Resource`] payload type; the
//! resource's [`ResourceSpec`] supplies the table, ordering, projection,
//! natural key and success messages.
//!
//! | Method   | Behaviour                                              | Success |
//! |----------|--------------------------------------------------------|---------|
//! | `GET`    | list, or `[record]` for `?id=`                         | 200     |
//! | `POST`   | validate, natural-key check, insert                    | 200     |
//! | `PUT`    | validate, require body `id`, natural-key check, update | 201     |
//! | `DELETE` | require `?id=`, delete                                 | 200     |

use aset_core::audit::AuditAction;
use aset_core::error::CoreError;
use aset_core::resource::{id_from_body, parse_id, ResourceSpec, ID_COLUMN, ID_REQUIRED};
use aset_core::types::{DbId, Record};
use aset_db::models::Resource;
use aset_db::store::SelectQuery;
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::header::CACHE_CONTROL;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::Value;

use crate::audit::AuditEntry;
use crate::error::{AppError, AppResult};
use crate::middleware::session::{MaybeSession, Session};
use crate::query::IdParams;
use crate::response::MessageResponse;
use crate::state::AppState;

/// Cache directive on single-record reads.
pub const SINGLE_RECORD_CACHE: &str = "public, s-maxage=10, stale-while-revalidate=59";

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/{resource}[?id=]
///
/// Without `id`, every record in the resource's order. With `id`, a JSON
/// array holding the matching record (empty when there is none).
pub async fn list<R: Resource>(
    State(state): State<AppState>,
    Query(params): Query<IdParams>,
) -> AppResult<Response> {
    let spec = R::SPEC;
    let query = SelectQuery::new().columns(spec.columns).order(spec.order);

    match parse_id(params.id.as_deref())? {
        Some(id) => {
            let rows = state.store.select(spec.table, &query.by_id(id)).await?;
            Ok(([(CACHE_CONTROL, SINGLE_RECORD_CACHE)], Json(rows)).into_response())
        }
        None => {
            let rows = state.store.select(spec.table, &query).await?;
            Ok(Json(rows).into_response())
        }
    }
}

/// POST /api/{resource}
pub async fn create<R: Resource>(
    State(state): State<AppState>,
    MaybeSession(session): MaybeSession,
    body: Bytes,
) -> AppResult<Json<MessageResponse>> {
    let spec = R::SPEC;
    let payload = R::from_json(parse_body(&body)?)?;
    let record = payload.into_record()?;

    ensure_natural_key_free(&state, &spec, &record, None).await?;

    let id = state.store.insert(spec.table, record).await?;
    tracing::info!(resource = spec.name, id, "Record created");

    audit(&state, AuditAction::Create, &spec, id, session.as_ref()).await?;
    Ok(Json(MessageResponse::new(spec.created_message())))
}

/// PUT /api/{resource}
///
/// The body carries the full record plus its `id`.
pub async fn update<R: Resource>(
    State(state): State<AppState>,
    MaybeSession(session): MaybeSession,
    body: Bytes,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    let spec = R::SPEC;
    let body = parse_body(&body)?;
    let payload = R::from_json(body.clone())?;
    let id = id_from_body(&body)?.ok_or(CoreError::Required(ID_REQUIRED))?;
    let record = payload.into_record()?;

    ensure_natural_key_free(&state, &spec, &record, Some(id)).await?;

    let affected = state.store.update(spec.table, id, record).await?;
    tracing::info!(resource = spec.name, id, affected, "Record updated");

    audit(&state, AuditAction::Update, &spec, id, session.as_ref()).await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new(spec.updated_message())),
    ))
}

/// DELETE /api/{resource}?id=
///
/// Datastore failures (typically a still-referenced row) are returned with
/// their `detail`.
pub async fn remove<R: Resource>(
    State(state): State<AppState>,
    MaybeSession(session): MaybeSession,
    Query(params): Query<IdParams>,
) -> AppResult<Json<MessageResponse>> {
    let spec = R::SPEC;
    let id = parse_id(params.id.as_deref())?.ok_or(CoreError::Required(ID_REQUIRED))?;

    let affected = state
        .store
        .delete(spec.table, id)
        .await
        .map_err(AppError::StoreWithDetail)?;
    tracing::info!(resource = spec.name, id, affected, "Record deleted");

    audit(&state, AuditAction::Delete, &spec, id, session.as_ref()).await?;
    Ok(Json(MessageResponse::new(spec.deleted_message())))
}

/// Fallback for any other method on a resource route.
pub async fn method_not_allowed(method: Method) -> AppError {
    AppError::MethodNotAllowed(method)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Read a request body as JSON. An empty body reads as `null`, which the
/// payload type then rejects like any other unreadable body.
fn parse_body(body: &Bytes) -> AppResult<Value> {
    if body.is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body).map_err(|e| {
        AppError::Core(CoreError::Validation(vec![
            aset_core::validation::FieldIssue::unreadable_body(&e),
        ]))
    })
}

/// Refuse a write whose natural-key value belongs to another record.
///
/// `own_id` is the record being updated; matching itself is not a conflict.
async fn ensure_natural_key_free(
    state: &AppState,
    spec: &ResourceSpec,
    record: &Record,
    own_id: Option<DbId>,
) -> AppResult<()> {
    let Some(key) = spec.natural_key else {
        return Ok(());
    };
    let Some(value) = record.get(key.column).filter(|v| !v.is_null()) else {
        return Ok(());
    };

    let query = SelectQuery::new()
        .columns(Some(&[ID_COLUMN]))
        .eq(key.column, value.clone());
    let rows = state.store.select(spec.table, &query).await?;

    let taken = rows.iter().any(|row| match own_id {
        Some(own) => row.get(ID_COLUMN).and_then(Value::as_i64) != Some(own),
        None => true,
    });

    if taken {
        tracing::debug!(resource = spec.name, column = key.column, "Natural key taken");
        return Err(AppError::Core(CoreError::Conflict(
            key.conflict_message.to_string(),
        )));
    }
    Ok(())
}

/// Hand the mutation to the audit stage, when enabled.
async fn audit(
    state: &AppState,
    action: AuditAction,
    spec: &ResourceSpec,
    entity_id: DbId,
    session: Option<&Session>,
) -> AppResult<()> {
    let Some(sink) = state.audit.as_ref() else {
        return Ok(());
    };
    sink.record(AuditEntry {
        action,
        resource: spec.name,
        entity_id: Some(entity_id),
        user_id: session.map(|s| s.user_id),
    })
    .await?;
    Ok(())
}
