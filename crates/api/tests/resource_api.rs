//! HTTP-level integration tests for the generic resource routes.
//!
//! Uses Axum's tower::ServiceExt to send requests directly to the router,
//! backed by the in-memory datastore.

mod common;

use axum::http::header::{ALLOW, CACHE_CONTROL};
use axum::http::{Method, Request, StatusCode};
use axum::body::Body;
use common::{body_json, body_text, delete, find_id, get, post_json, put_json};
use serde_json::json;

// ---------------------------------------------------------------------------
// Tahun: the full create / conflict / list / delete cycle
// ---------------------------------------------------------------------------

#[tokio::test]
async fn tahun_lifecycle() {
    let app = common::build_test_app();

    let response = post_json(app.clone(), "/api/tahun", json!({"tahun": "2025"})).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"message": "Success add tahun"}));

    let response = post_json(app.clone(), "/api/tahun", json!({"tahun": "2025"})).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await, json!({"message": "Tahun sudah ada"}));

    let rows = body_json(get(app.clone(), "/api/tahun").await).await;
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 1, "conflicting create must not insert");
    assert_eq!(rows[0]["tahun"], "2025");

    let id = rows[0]["id"].as_i64().unwrap();
    let response = delete(app.clone(), &format!("/api/tahun?id={id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"message": "Success delete tahun"}));

    let rows = body_json(get(app, "/api/tahun").await).await;
    assert_eq!(rows, json!([]));
}

#[tokio::test]
async fn tahun_lists_newest_first() {
    let app = common::build_test_app();
    for year in ["2021", "2024", "2022"] {
        post_json(app.clone(), "/api/tahun", json!({"tahun": year})).await;
    }

    let rows = body_json(get(app, "/api/tahun").await).await;
    let years: Vec<_> = rows
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["tahun"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(years, vec!["2024", "2022", "2021"]);
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_required_field_is_itemised_for_every_resource() {
    let cases = [
        ("/api/instansi", "nama"),
        ("/api/jenis", "nama"),
        ("/api/kendaraan", "nama"),
        ("/api/kondisi", "kondisi"),
        ("/api/tahun", "tahun"),
        ("/api/users", "name"),
    ];

    for (path, field) in cases {
        let app = common::build_test_app();
        let response = post_json(app.clone(), path, json!({})).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY, "{path}");

        let body = body_json(response).await;
        let issues = body["message"].as_array().expect("issues array");
        assert!(
            issues.iter().any(|i| i["path"] == json!([field])),
            "{path} should report {field}: {body}"
        );
        assert!(issues.iter().all(|i| i["code"].is_string()));

        let rows = body_json(get(app, path).await).await;
        assert_eq!(rows, json!([]), "{path} must not insert invalid records");
    }
}

#[tokio::test]
async fn empty_string_uses_the_field_message() {
    let app = common::build_test_app();
    let response = post_json(app, "/api/kondisi", json!({"kondisi": ""})).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = body_json(response).await;
    assert_eq!(body["message"][0]["message"], "Kondisi tidak boleh kosong");
    assert_eq!(body["message"][0]["code"], "too_small");
}

#[tokio::test]
async fn wrong_type_names_the_field() {
    let app = common::build_test_app();
    let response = post_json(app, "/api/tahun", json!({"tahun": 2025})).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = body_json(response).await;
    assert_eq!(
        body["message"],
        json!([{
            "code": "invalid_type",
            "message": "Expected string, received number",
            "path": ["tahun"],
        }])
    );
}

#[tokio::test]
async fn wrong_type_is_reported_alongside_missing_fields() {
    let app = common::build_test_app();
    let response = post_json(app, "/api/kendaraan", json!({"nama": 5})).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = body_json(response).await;
    let paths: Vec<_> = body["message"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["path"][0].as_str().unwrap().to_string())
        .collect();
    assert_eq!(
        paths,
        vec!["nama", "nopol", "warna", "id_instansi", "id_jenis", "id_tahun"]
    );
}

#[tokio::test]
async fn malformed_json_is_a_validation_error() {
    let app = common::build_test_app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/jenis")
        .header("content-type", "application/json")
        .body(Body::from("{nama:"))
        .unwrap();
    let response = common::send(app, request).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_json(response).await["message"].is_array());
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

#[tokio::test]
async fn single_record_read_is_an_array_with_cache_header() {
    let app = common::build_test_app();
    post_json(app.clone(), "/api/jenis", json!({"nama": "Sedan"})).await;
    let id = find_id(app.clone(), "/api/jenis", "nama", "Sedan").await;

    let response = get(app.clone(), &format!("/api/jenis?id={id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[CACHE_CONTROL],
        "public, s-maxage=10, stale-while-revalidate=59"
    );
    let rows = body_json(response).await;
    assert_eq!(rows, json!([{"id": id, "nama": "Sedan"}]));

    let response = get(app.clone(), "/api/jenis?id=999").await;
    assert_eq!(body_json(response).await, json!([]));

    // A blank id is treated as absent.
    let response = get(app, "/api/jenis?id=").await;
    assert!(response.headers().get(CACHE_CONTROL).is_none());
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// Updates
// ---------------------------------------------------------------------------

#[tokio::test]
async fn update_returns_201_and_list_reflects_it() {
    let app = common::build_test_app();
    post_json(
        app.clone(),
        "/api/instansi",
        json!({"nama": "Dinas Perhubungan", "alias": "Dishub"}),
    )
    .await;
    let id = find_id(app.clone(), "/api/instansi", "nama", "Dinas Perhubungan").await;

    let response = put_json(
        app.clone(),
        "/api/instansi",
        json!({"id": id, "nama": "Dinas Perhubungan Kota", "alamat": "Jl. A. Yani"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(
        body_json(response).await,
        json!({"message": "Success update instansi"})
    );

    let rows = body_json(get(app, &format!("/api/instansi?id={id}")).await).await;
    assert_eq!(rows[0]["nama"], "Dinas Perhubungan Kota");
    assert_eq!(rows[0]["alamat"], "Jl. A. Yani");
}

#[tokio::test]
async fn vehicle_read_back_with_numeric_references_can_be_saved() {
    let app = common::build_test_app();
    post_json(app.clone(), "/api/instansi", json!({"nama": "Bappeda"})).await;
    post_json(app.clone(), "/api/jenis", json!({"nama": "Minibus"})).await;
    post_json(app.clone(), "/api/tahun", json!({"tahun": "2020"})).await;
    let response = post_json(
        app.clone(),
        "/api/kendaraan",
        json!({
            "nama": "Innova",
            "nopol": "DA 1234 XY",
            "warna": "Hitam",
            "id_instansi": 1,
            "id_jenis": 1,
            "id_tahun": 1,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = put_json(
        app.clone(),
        "/api/kendaraan",
        json!({
            "id": 1,
            "nama": "Innova",
            "nopol": "DA 1234 XY",
            "warna": "Putih",
            "id_instansi": 1,
            "id_jenis": 1,
            "id_tahun": 1,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let rows = body_json(get(app, "/api/kendaraan?id=1").await).await;
    assert_eq!(rows[0]["warna"], "Putih");
    assert_eq!(rows[0]["id_jenis"], "1");
}

#[tokio::test]
async fn update_without_id_is_rejected() {
    let app = common::build_test_app();
    let response = put_json(app, "/api/jenis", json!({"nama": "Bus"})).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await, json!({"message": "Id required"}));
}

#[tokio::test]
async fn rename_to_own_value_succeeds_but_not_to_anothers() {
    let app = common::build_test_app();
    post_json(app.clone(), "/api/kondisi", json!({"kondisi": "Baik"})).await;
    post_json(app.clone(), "/api/kondisi", json!({"kondisi": "Rusak"})).await;
    let baik = find_id(app.clone(), "/api/kondisi", "kondisi", "Baik").await;

    let response = put_json(
        app.clone(),
        "/api/kondisi",
        json!({"id": baik.to_string(), "kondisi": "Baik"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = put_json(
        app.clone(),
        "/api/kondisi",
        json!({"id": baik, "kondisi": "Rusak"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await, json!({"message": "Kondisi sudah ada"}));

    let rows = body_json(get(app, "/api/kondisi").await).await;
    assert_eq!(rows[0]["kondisi"], "Baik");
}

// ---------------------------------------------------------------------------
// Deletes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn delete_without_id_deletes_nothing() {
    let app = common::build_test_app();
    post_json(app.clone(), "/api/jenis", json!({"nama": "Truk"})).await;

    let response = delete(app.clone(), "/api/jenis").await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await, json!({"message": "Id required"}));

    let rows = body_json(get(app, "/api/jenis").await).await;
    assert_eq!(rows.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn deleting_a_referenced_row_returns_detail() {
    let app = common::build_test_app();
    post_json(app.clone(), "/api/instansi", json!({"nama": "Bappeda"})).await;
    post_json(app.clone(), "/api/jenis", json!({"nama": "Minibus"})).await;
    post_json(app.clone(), "/api/tahun", json!({"tahun": "2020"})).await;
    let instansi = find_id(app.clone(), "/api/instansi", "nama", "Bappeda").await;
    let jenis = find_id(app.clone(), "/api/jenis", "nama", "Minibus").await;
    let tahun = find_id(app.clone(), "/api/tahun", "tahun", "2020").await;

    let response = post_json(
        app.clone(),
        "/api/kendaraan",
        json!({
            "nama": "Innova",
            "nopol": "DA 1234 XY",
            "warna": "Hitam",
            "id_instansi": instansi.to_string(),
            "id_jenis": jenis.to_string(),
            "id_tahun": tahun.to_string(),
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({"message": "Success add kendaraan"})
    );

    let response = delete(app.clone(), &format!("/api/jenis?id={jenis}")).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert!(body["message"].as_str().unwrap().contains("foreign key"));
    assert_eq!(
        body["detail"],
        format!("Key (id)=({jenis}) is still referenced from table \"aset_kendaraan\".")
    );

    let rows = body_json(get(app, "/api/jenis").await).await;
    assert_eq!(rows.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn vehicle_with_unknown_agency_is_refused_without_detail() {
    let app = common::build_test_app();
    let response = post_json(
        app,
        "/api/kendaraan",
        json!({
            "nama": "Hilux",
            "nopol": "DA 9 B",
            "warna": "Putih",
            "id_instansi": "41",
            "id_jenis": "1",
            "id_tahun": "1",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert!(body["message"].is_string());
    assert!(body.get("detail").is_none());
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[tokio::test]
async fn users_never_expose_passwords() {
    let app = common::build_test_app();
    let response = post_json(
        app.clone(),
        "/api/users",
        json!({"name": "Admin", "username": "admin", "password": "rahasia"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"message": "Success add user"}));

    let rows = body_json(get(app.clone(), "/api/users").await).await;
    let id = rows[0]["id"].as_i64().unwrap();
    assert_eq!(rows, json!([{"id": id, "name": "Admin", "username": "admin"}]));

    let single = body_json(get(app, &format!("/api/users?id={id}")).await).await;
    assert!(single[0].get("password").is_none());
}

#[tokio::test]
async fn duplicate_username_is_a_conflict() {
    let app = common::build_test_app();
    let user = json!({"name": "Admin", "username": "admin", "password": "a"});
    post_json(app.clone(), "/api/users", user.clone()).await;

    let response = post_json(app, "/api/users", user).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body_json(response).await,
        json!({"message": "Username already exist"})
    );
}

// ---------------------------------------------------------------------------
// Method handling
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unsupported_method_is_405_with_allow() {
    let app = common::build_test_app();
    let request = Request::builder()
        .method(Method::PATCH)
        .uri("/api/kendaraan")
        .body(Body::empty())
        .unwrap();
    let response = common::send(app, request).await;

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.headers()[ALLOW], "GET, POST, PUT, DELETE");
    assert_eq!(body_text(response).await, "Method PATCH Not Allowed");
}

#[tokio::test]
async fn head_is_not_an_alias_for_get() {
    let app = common::build_test_app();
    let request = Request::builder()
        .method(Method::HEAD)
        .uri("/api/tahun")
        .body(Body::empty())
        .unwrap();
    let response = common::send(app, request).await;

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.headers()[ALLOW], "GET, POST, PUT, DELETE");
}

#[tokio::test]
async fn health_reports_store() {
    let app = common::build_test_app();
    let response = get(app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["store_healthy"], true);
    assert!(json["version"].is_string());
}
