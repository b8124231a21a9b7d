pub mod auth;
pub mod health;

use aset_db::models::instansi::InstansiInput;
use aset_db::models::jenis::JenisInput;
use aset_db::models::kendaraan::KendaraanInput;
use aset_db::models::kondisi::KondisiInput;
use aset_db::models::tahun::TahunInput;
use aset_db::models::user::UserInput;
use aset_db::models::Resource;
use axum::routing::{get, MethodRouter};
use axum::{middleware, Router};

use crate::handlers::resource;
use crate::middleware::session::require_session;
use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// /login                       login (public)
///
/// /instansi                    GET, POST, PUT, DELETE
/// /jenis                       GET, POST, PUT, DELETE
/// /kendaraan                   GET, POST, PUT, DELETE
/// /kondisi                     GET, POST, PUT, DELETE
/// /tahun                       GET, POST, PUT, DELETE
/// /users                       GET, POST, PUT, DELETE
/// ```
///
/// Resource routes sit behind the session stage, which is a pass-through
/// unless `AUTH_ENABLED` is on.
pub fn api_routes(state: &AppState) -> Router<AppState> {
    let resources = Router::new()
        .route(&InstansiInput::SPEC.route(), resource_methods::<InstansiInput>())
        .route(&JenisInput::SPEC.route(), resource_methods::<JenisInput>())
        .route(&KendaraanInput::SPEC.route(), resource_methods::<KendaraanInput>())
        .route(&KondisiInput::SPEC.route(), resource_methods::<KondisiInput>())
        .route(&TahunInput::SPEC.route(), resource_methods::<TahunInput>())
        .route(&UserInput::SPEC.route(), resource_methods::<UserInput>())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    Router::new().merge(auth::router()).merge(resources)
}

/// The four CRUD methods for one resource, with a 405 for anything else.
///
/// `HEAD` is routed explicitly; `get` would otherwise answer it.
fn resource_methods<R: Resource>() -> MethodRouter<AppState> {
    get(resource::list::<R>)
        .head(resource::method_not_allowed)
        .post(resource::create::<R>)
        .put(resource::update::<R>)
        .delete(resource::remove::<R>)
        .fallback(resource::method_not_allowed)
}
