#![allow(dead_code)]

use std::sync::Arc;

use aisle_config::{
    Config, ConfigMetadata, CorsConfig, DatabaseConfig, PagingConfig,
    ServerConfig,
};
use aisle_server::{
    create_app,
    infra::startup::{StorageMode, build_state},
};
use axum::http::{HeaderName, HeaderValue, header::ACCEPT};
use axum_test::TestServer;
use serde_json::{Value, json};

pub const HATEOAS: &str = "application/vnd.idp.hateoas+json";

pub fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".into(),
            port: 0,
            public_url: None,
        },
        database: DatabaseConfig {
            url: None,
            max_connections: 1,
        },
        paging: PagingConfig::default(),
        cors: CorsConfig {
            allowed_origins: vec!["http://localhost:5173".into()],
            allowed_methods: vec!["GET".into(), "POST".into()],
            allowed_headers: vec!["Content-Type".into()],
        },
        dev_mode: true,
        metadata: ConfigMetadata::default(),
    }
}

pub async fn server_with(config: Config) -> TestServer {
    let state = build_state(Arc::new(config), StorageMode::InMemory)
        .await
        .expect("in-memory state");
    TestServer::new(create_app(state)).expect("test server")
}

pub async fn server() -> TestServer {
    server_with(test_config()).await
}

pub fn hateoas_accept() -> (HeaderName, HeaderValue) {
    (ACCEPT, HeaderValue::from_static(HATEOAS))
}

pub async fn create(
    server: &TestServer,
    path: &str,
    id_key: &str,
    body: Value,
) -> i64 {
    let response = server.post(path).json(&body).await;
    assert_eq!(response.status_code(), 201, "create {path}: {}", response.text());
    let created: Value = response.json();
    created[id_key].as_i64().expect("created id")
}

pub async fn supermarket(server: &TestServer, location: &str) -> i64 {
    create(
        server,
        "/api/supermarkets",
        "supermarketId",
        json!({ "location": location, "numberOfStaff": 10 }),
    )
    .await
}

pub async fn product(server: &TestServer, name: &str, price: f64) -> i64 {
    create(server, "/api/products", "productId", json!({ "name": name, "price": price })).await
}

pub async fn stock(
    server: &TestServer,
    supermarket_id: i64,
    product_id: i64,
    number_in_stock: i32,
) -> i64 {
    create(
        server,
        "/api/stock",
        "id",
        json!({
            "supermarketId": supermarket_id,
            "productId": product_id,
            "numberInStock": number_in_stock
        }),
    )
    .await
}
