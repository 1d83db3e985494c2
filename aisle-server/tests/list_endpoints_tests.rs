mod common;

use axum::http::header::{ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_REQUEST_METHOD, ALLOW, ORIGIN};
use axum::http::{Method, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

use common::{HATEOAS, hateoas_accept, product, server, supermarket};

async fn seed_products(server: &axum_test::TestServer, count: usize) {
    for n in 1..=count {
        product(server, &format!("Product {n:02}"), n as f64).await;
    }
}

fn pagination(response: &axum_test::TestResponse) -> Value {
    let raw = response.header("x-pagination");
    serde_json::from_str(raw.to_str().expect("ascii header")).expect("json header")
}

#[tokio::test]
async fn third_page_of_twenty_five() {
    let server = server().await;
    seed_products(&server, 25).await;

    let response = server
        .get("/api/products")
        .add_query_param("pageNumber", 3)
        .add_query_param("pageSize", 10)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Vec<Value> = response.json();
    let ids: Vec<i64> = body
        .iter()
        .map(|record| record["productId"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![21, 22, 23, 24, 25]);

    let header = pagination(&response);
    assert_eq!(header["totalCount"], 25);
    assert_eq!(header["pageSize"], 10);
    assert_eq!(header["currentPage"], 3);
    assert_eq!(header["totalPages"], 3);
    assert_eq!(header["nextPageLink"], Value::Null);
    assert_eq!(
        header["previousPageLink"],
        "/api/products?pageNumber=2&pageSize=10"
    );
}

#[tokio::test]
async fn page_size_is_clamped_to_maximum() {
    let server = server().await;
    seed_products(&server, 25).await;

    let response = server
        .get("/api/products")
        .add_query_param("pageSize", 100)
        .await;

    let body: Vec<Value> = response.json();
    assert_eq!(body.len(), 20);
    assert_eq!(pagination(&response)["pageSize"], 20);
}

#[tokio::test]
async fn page_past_the_end_is_empty() {
    let server = server().await;
    seed_products(&server, 3).await;

    let response = server
        .get("/api/products")
        .add_query_param("pageNumber", 9)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Vec<Value>>(), Vec::<Value>::new());
    assert_eq!(pagination(&response)["totalPages"], 1);
}

#[tokio::test]
async fn order_by_sorts_before_paging() {
    let server = server().await;
    product(&server, "Bread", 2.5).await;
    product(&server, "apples", 1.0).await;
    product(&server, "Cheese", 7.0).await;

    let by_price: Vec<Value> = server
        .get("/api/products")
        .add_query_param("orderBy", "price desc")
        .await
        .json();
    let names: Vec<&str> = by_price
        .iter()
        .map(|record| record["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Cheese", "Bread", "apples"]);

    let by_name: Vec<Value> = server
        .get("/api/products")
        .add_query_param("orderBy", "Name")
        .await
        .json();
    let names: Vec<&str> = by_name
        .iter()
        .map(|record| record["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["apples", "Bread", "Cheese"]);
}

#[tokio::test]
async fn unknown_sort_key_is_a_bad_request() {
    let server = server().await;
    seed_products(&server, 2).await;

    let response = server
        .get("/api/products")
        .add_query_param("orderBy", "name, colour desc")
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"]["status"], 400);
    assert!(response.maybe_header("x-pagination").is_none());
}

#[tokio::test]
async fn fields_shape_each_record() {
    let server = server().await;
    seed_products(&server, 2).await;

    let body: Vec<Value> = server
        .get("/api/products")
        .add_query_param("fields", "Name")
        .await
        .json();

    assert_eq!(
        body,
        vec![json!({ "name": "Product 01" }), json!({ "name": "Product 02" })]
    );

    let rejected = server
        .get("/api/products")
        .add_query_param("fields", "name,weight")
        .await;
    assert_eq!(rejected.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn search_filters_before_counting() {
    let server = server().await;
    supermarket(&server, "Leeds Central").await;
    supermarket(&server, "York").await;
    supermarket(&server, "leeds north").await;

    let response = server
        .get("/api/supermarkets")
        .add_query_param("searchQuery", "  LEEDS ")
        .await;

    let body: Vec<Value> = response.json();
    assert_eq!(body.len(), 2);
    assert_eq!(pagination(&response)["totalCount"], 2);
}

#[tokio::test]
async fn malformed_paging_value_is_a_bad_request() {
    let server = server().await;
    let response = server
        .get("/api/products")
        .add_query_param("pageNumber", "three")
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn hateoas_list_wraps_records_with_links() {
    let server = server().await;
    seed_products(&server, 12).await;

    let (name, value) = hateoas_accept();
    let response = server
        .get("/api/products")
        .add_header(name, value)
        .add_query_param("pageNumber", 2)
        .add_query_param("fields", "productId,name")
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.header("content-type"), HATEOAS);

    let header = pagination(&response);
    assert!(header.get("previousPageLink").is_none());
    assert_eq!(header["totalCount"], 12);

    let body: Value = response.json();
    let records = body["value"].as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["productId"], 11);
    let item_rels: Vec<&str> = records[0]["links"]
        .as_array()
        .unwrap()
        .iter()
        .map(|link| link["rel"].as_str().unwrap())
        .collect();
    assert_eq!(
        item_rels,
        vec!["self", "delete_product", "update_product", "patch_product"]
    );
    assert_eq!(
        records[0]["links"][0]["href"],
        "/api/products/11?fields=productId%2Cname"
    );

    let links = body["links"].as_array().unwrap();
    assert_eq!(links.len(), 2);
    assert_eq!(links[0]["rel"], "self");
    assert_eq!(
        links[0]["href"],
        "/api/products?fields=productId%2Cname&pageNumber=2&pageSize=10"
    );
    assert_eq!(links[1]["rel"], "previousPage");
}

#[tokio::test]
async fn public_url_prefixes_links() {
    let mut config = common::test_config();
    config.server.public_url = Some("https://shop.example.com".into());
    let server = common::server_with(config).await;
    seed_products(&server, 11).await;

    let response = server.get("/api/products").await;
    assert_eq!(
        pagination(&response)["nextPageLink"],
        "https://shop.example.com/api/products?pageNumber=2&pageSize=10"
    );
}

#[tokio::test]
async fn head_and_options() {
    let server = server().await;
    seed_products(&server, 1).await;

    let head = server.method(Method::HEAD, "/api/products").await;
    assert_eq!(head.status_code(), StatusCode::OK);
    assert!(head.as_bytes().is_empty());
    assert!(head.maybe_header("x-pagination").is_some());

    let options = server.method(Method::OPTIONS, "/api/stock").await;
    assert_eq!(options.status_code(), StatusCode::OK);
    assert_eq!(options.header(ALLOW), "GET,OPTIONS,POST,HEAD");
}

#[tokio::test]
async fn cors_preflight_still_answered() {
    let server = server().await;

    let preflight = server
        .method(Method::OPTIONS, "/api/stock")
        .add_header(ORIGIN, "http://localhost:5173")
        .add_header(ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .await;
    assert_eq!(preflight.status_code(), StatusCode::OK);
    assert!(preflight.maybe_header(ACCESS_CONTROL_ALLOW_ORIGIN).is_some());
}

#[tokio::test]
async fn root_links_need_the_vendor_media_type() {
    let server = server().await;

    let plain = server.get("/api").await;
    assert_eq!(plain.status_code(), StatusCode::NO_CONTENT);

    let (name, value) = hateoas_accept();
    let linked = server.get("/api").add_header(name, value).await;
    assert_eq!(linked.status_code(), StatusCode::OK);
    let links: Vec<Value> = linked.json();
    assert_eq!(links[0]["rel"], "self");
    assert_eq!(links[0]["href"], "/api");
    assert!(
        links
            .iter()
            .any(|link| link["rel"] == "create_supermarket" && link["method"] == "POST")
    );
}
