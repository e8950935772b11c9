mod common;

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, Set};

use common::TestApp;
use shop_orders_api::entities::request;
use shop_orders_api::repositories::{
    RequestFilter, RequestScope, SeaOrmShopRepository, ShopRepository,
};

async fn seed_request(
    app: &TestApp,
    payment_id: &str,
    status: &str,
    created_at: DateTime<Utc>,
) -> request::Model {
    request::ActiveModel {
        payment_id: Set(payment_id.to_string()),
        price: Set(dec!(10)),
        tax: Set(dec!(2)),
        track: Set(String::new()),
        status: Set(status.to_string()),
        created_at: Set(created_at),
        store_id: Set(1),
        product_id: Set(7),
        user_id: Set(5),
        ..Default::default()
    }
    .insert(&*app.state.db)
    .await
    .expect("seed request")
}

fn at(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, day, 12, 0, 0).unwrap()
}

fn user_filter() -> RequestFilter {
    RequestFilter {
        scope: RequestScope::User(5),
        status: None,
        exclude_status: Some("created".to_string()),
        created_after: None,
        created_before: None,
    }
}

#[tokio::test]
async fn date_bounds_are_exclusive_on_both_ends() {
    let app = TestApp::new().await;
    let repo = SeaOrmShopRepository::new(app.state.db.clone());

    let early = seed_request(&app, "PAY-A", "preparing", at(10)).await;
    let late = seed_request(&app, "PAY-A", "preparing", at(20)).await;
    seed_request(&app, "PAY-A", "created", at(15)).await;

    // No bounds: the created row is still excluded.
    let results = repo.search_requests(user_filter()).await.unwrap();
    assert_eq!(results.len(), 2);

    // A bound equal to a row's timestamp excludes that row.
    let mut filter = user_filter();
    filter.created_after = Some(early.created_at);
    let results = repo.search_requests(filter).await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, late.id);

    let mut filter = user_filter();
    filter.created_before = Some(late.created_at);
    let results = repo.search_requests(filter).await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, early.id);

    // Bounds at both rows leave nothing in between.
    let mut filter = user_filter();
    filter.created_after = Some(early.created_at);
    filter.created_before = Some(late.created_at);
    let results = repo.search_requests(filter).await.unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn status_filter_and_scope_are_conjunctive() {
    let app = TestApp::new().await;
    let repo = SeaOrmShopRepository::new(app.state.db.clone());

    seed_request(&app, "PAY-B", "preparing", at(10)).await;
    seed_request(&app, "PAY-B", "shipped", at(11)).await;

    let mut filter = user_filter();
    filter.status = Some("shipped".to_string());
    let results = repo.search_requests(filter).await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].status, "shipped");

    // Store scope with a user that owns nothing in that store.
    let filter = RequestFilter {
        scope: RequestScope::Store(99),
        status: None,
        exclude_status: Some("created".to_string()),
        created_after: None,
        created_before: None,
    };
    let results = repo.search_requests(filter).await.unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn transition_only_touches_rows_in_the_source_status() {
    let app = TestApp::new().await;
    let repo = SeaOrmShopRepository::new(app.state.db.clone());

    seed_request(&app, "PAY-C", "created", at(10)).await;
    seed_request(&app, "PAY-C", "created", at(11)).await;
    seed_request(&app, "PAY-C", "shipped", at(12)).await;
    seed_request(&app, "PAY-OTHER", "created", at(13)).await;

    let affected = repo
        .transition_requests_by_payment("PAY-C", "created", "preparing")
        .await
        .unwrap();
    assert_eq!(affected, 2);

    let rows = repo.requests_by_payment("PAY-C").await.unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(
        rows.iter().filter(|r| r.status == "preparing").count(),
        2
    );
    assert_eq!(rows.iter().filter(|r| r.status == "shipped").count(), 1);

    // The other payment's rows are untouched.
    let rows = repo.requests_by_payment("PAY-OTHER").await.unwrap();
    assert_eq!(rows[0].status, "created");
}

#[tokio::test]
async fn update_request_returns_not_found_for_missing_row() {
    let app = TestApp::new().await;
    let repo = Arc::new(SeaOrmShopRepository::new(app.state.db.clone()));

    let err = repo
        .update_request(
            424_242,
            shop_orders_api::repositories::RequestChanges {
                status: Some("shipped".to_string()),
                track: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        shop_orders_api::errors::ServiceError::NotFound(_)
    ));
}
