use std::sync::Arc;

use aisle_core::{
    application::unit_of_work::CatalogUnitOfWork,
    model::*,
    query::*,
    services::CatalogService,
};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

async fn catalog_with_products(count: usize) -> CatalogService {
    let service = CatalogService::new(
        Arc::new(CatalogUnitOfWork::in_memory()),
        Arc::new(default_registry().expect("registry")),
        PagingLimits::default(),
    );
    for n in 1..=count {
        service
            .create::<Product>(ProductForCreation {
                name: format!("Product {n:02}"),
                price: n as f64,
            })
            .await
            .expect("create product");
    }
    service
}

#[tokio::test]
async fn third_page_of_twenty_five_products() {
    let service = catalog_with_products(25).await;
    let params = ResourceParameters {
        page_number: Some(3),
        page_size: Some(10),
        ..Default::default()
    };

    let outcome = service.list::<Product>(&params, &()).await.unwrap();
    let ids: Vec<i64> = outcome.page.items().iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![21, 22, 23, 24, 25]);
    assert_eq!(outcome.page.total_pages(), 3);
    assert!(!outcome.page.has_next());
    assert!(outcome.page.has_previous());
}

#[tokio::test]
async fn page_past_the_end_is_empty() {
    let service = catalog_with_products(5).await;
    let params = ResourceParameters {
        page_number: Some(9),
        ..Default::default()
    };
    let outcome = service.list::<Product>(&params, &()).await.unwrap();
    assert!(outcome.page.items().is_empty());
    assert_eq!(outcome.page.total_count(), 5);
    assert!(!outcome.page.has_next());
}

#[tokio::test]
async fn shaped_records_follow_declared_order() {
    let service = catalog_with_products(3).await;
    let params = ResourceParameters {
        order_by: Some("price desc".into()),
        fields: Some("price, productId".into()),
        page_size: Some(2),
        ..Default::default()
    };
    let outcome = service.list::<Product>(&params, &()).await.unwrap();
    let shaped: Vec<Value> = outcome
        .shaped()
        .into_iter()
        .map(|(_, record)| record.into())
        .collect();
    assert_eq!(
        shaped,
        vec![
            json!({ "productId": 3, "price": 3.0 }),
            json!({ "productId": 2, "price": 2.0 }),
        ]
    );
}

#[tokio::test]
async fn search_is_case_insensitive_substring() {
    let service = catalog_with_products(12).await;
    let params = ResourceParameters {
        search_query: Some("  product 1".into()),
        ..Default::default()
    };
    let outcome = service.list::<Product>(&params, &()).await.unwrap();
    let names: Vec<&str> = outcome.page.items().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Product 10", "Product 11", "Product 12"]);
}
