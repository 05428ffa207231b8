//! Tests for the app service.

use std::sync::Arc;

use mockall::predicate::eq;
use rstest::rstest;

use super::*;
use crate::domain::ports::{
    MediaLink, MockMediaStore, MockPaymentGateway, MockSearchIndex, ProductPrice,
};
use crate::domain::{AppId, ErrorCode, SearchHits};

type TestService = AppService<MockSearchIndex, MockMediaStore, MockPaymentGateway>;

fn service(
    index: MockSearchIndex,
    media: MockMediaStore,
    payments: MockPaymentGateway,
) -> TestService {
    AppService::new(Arc::new(index), Arc::new(media), Arc::new(payments))
}

fn product() -> ProductPrice {
    ProductPrice {
        product_id: "prod_1".to_owned(),
        price_id: "price_1".to_owned(),
    }
}

fn listing() -> AppListing {
    AppListing::with_id(AppId::from("app-1".to_owned()), "alice", "Foo", "Bar", 10)
}

fn stored_app(id: &str) -> App {
    AppListing::with_id(AppId::from(id.to_owned()), "alice", "Foo", "Bar", 10)
        .publish(product(), MediaLink::new(format!("memory://media/{id}")))
}

fn hits(apps: Vec<App>) -> SearchHits {
    let total = apps.len() as u64;
    SearchHits::new(total, apps.into_iter().map(IndexedDocument::App).collect())
}

#[tokio::test]
async fn save_app_creates_product_uploads_media_then_indexes() {
    let mut payments = MockPaymentGateway::new();
    payments
        .expect_create_product_with_price()
        .with(eq("Foo"), eq("Bar"), eq(1_000_i64))
        .times(1)
        .return_once(|_, _, _| Ok(product()));

    let mut media = MockMediaStore::new();
    media
        .expect_store()
        .withf(|key, upload| key == "app-1" && upload.bytes == b"binary")
        .times(1)
        .return_once(|_, _| Ok(MediaLink::new("https://media.example/app-1")));

    let mut index = MockSearchIndex::new();
    index
        .expect_write()
        .withf(|index, key, document| {
            *index == IndexName::App
                && key == "app-1"
                && matches!(document, IndexedDocument::App(app)
                    if app.price_id() == "price_1" && app.url() == "https://media.example/app-1")
        })
        .times(1)
        .return_once(|_, _, _| Ok(()));

    let app = service(index, media, payments)
        .save_app(listing(), MediaUpload::from_bytes(b"binary".to_vec()))
        .await
        .expect("save succeeds");

    assert_eq!(app.price(), 10);
    assert_eq!(app.product_id(), "prod_1");
    assert_eq!(app.price_id(), "price_1");
    assert_eq!(app.url(), "https://media.example/app-1");
}

#[tokio::test]
async fn save_app_stops_before_upload_when_product_creation_fails() {
    let mut payments = MockPaymentGateway::new();
    payments
        .expect_create_product_with_price()
        .times(1)
        .return_once(|_, _, _| Err(PaymentGatewayError::rejected("invalid amount")));
    let mut media = MockMediaStore::new();
    media.expect_store().times(0);
    let mut index = MockSearchIndex::new();
    index.expect_write().times(0);

    let error = service(index, media, payments)
        .save_app(listing(), MediaUpload::from_bytes(Vec::new()))
        .await
        .expect_err("gateway failure propagates");

    assert_eq!(error.code(), ErrorCode::InternalError);
    assert_eq!(
        error.message(),
        "payment provider rejected the request: invalid amount"
    );
}

#[tokio::test]
async fn save_app_leaves_product_when_upload_fails() {
    let mut payments = MockPaymentGateway::new();
    payments
        .expect_create_product_with_price()
        .times(1)
        .return_once(|_, _, _| Ok(product()));
    let mut media = MockMediaStore::new();
    media
        .expect_store()
        .times(1)
        .return_once(|_, _| Err(MediaStoreError::transport("connection reset")));
    let mut index = MockSearchIndex::new();
    index.expect_write().times(0);

    let error = service(index, media, payments)
        .save_app(listing(), MediaUpload::from_bytes(Vec::new()))
        .await
        .expect_err("upload failure propagates");

    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
    assert_eq!(error.message(), "media store unreachable: connection reset");
}

#[tokio::test]
async fn save_app_rejects_prices_that_overflow_minor_units() {
    let mut payments = MockPaymentGateway::new();
    payments.expect_create_product_with_price().times(0);

    let listing = AppListing::new("alice", "Foo", "Bar", i64::MAX);
    let error = service(MockSearchIndex::new(), MockMediaStore::new(), payments)
        .save_app(listing, MediaUpload::from_bytes(Vec::new()))
        .await
        .expect_err("overflow rejected");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[case::both_empty("", "", field_match(DESCRIPTION_FIELD, ""))]
#[case::title_only("Foo", "", field_match(TITLE_FIELD, "Foo"))]
#[case::description_only("", "Bar", field_match(DESCRIPTION_FIELD, "Bar"))]
#[case::both(
    "Foo",
    "Bar",
    SearchQuery::all_of(vec![field_match(TITLE_FIELD, "Foo"), field_match(DESCRIPTION_FIELD, "Bar")])
)]
fn search_query_selects_fields(
    #[case] title: &str,
    #[case] description: &str,
    #[case] expected: SearchQuery,
) {
    assert_eq!(app_search_query(title, description), expected);
}

#[test]
fn empty_search_text_matches_everything() {
    let SearchQuery::Match(query) = app_search_query("", "") else {
        panic!("expected a match query");
    };
    assert_eq!(query.operator, MatchOperator::And);
    assert_eq!(query.zero_terms, ZeroTermsPolicy::All);

    let SearchQuery::Match(query) = app_search_query("Foo", "") else {
        panic!("expected a match query");
    };
    assert_eq!(query.zero_terms, ZeroTermsPolicy::None);
}

#[tokio::test]
async fn search_apps_reads_the_app_index() {
    let mut index = MockSearchIndex::new();
    index
        .expect_read()
        .withf(|index, query| *index == IndexName::App && matches!(query, SearchQuery::Bool { .. }))
        .times(1)
        .return_once(|_, _| Ok(hits(vec![stored_app("app-1")])));

    let apps = service(index, MockMediaStore::new(), MockPaymentGateway::new())
        .search_apps("Foo", "Bar")
        .await
        .expect("search succeeds");

    assert_eq!(apps.len(), 1);
}

#[tokio::test]
async fn search_apps_maps_timeouts_to_service_unavailable() {
    let mut index = MockSearchIndex::new();
    index
        .expect_read()
        .return_once(|_, _| Err(SearchIndexError::timeout("30s elapsed")));

    let error = service(index, MockMediaStore::new(), MockPaymentGateway::new())
        .search_apps("Foo", "")
        .await
        .expect_err("timeout propagates");

    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[case::no_hits(vec![], false)]
#[case::single_hit(vec!["app-1"], true)]
#[case::duplicate_hits(vec!["app-1", "app-1"], false)]
#[tokio::test]
async fn search_app_by_id_requires_exactly_one_hit(
    #[case] ids: Vec<&'static str>,
    #[case] expect_found: bool,
) {
    let apps = ids.into_iter().map(stored_app).collect();
    let mut index = MockSearchIndex::new();
    index
        .expect_read()
        .with(eq(IndexName::App), eq(SearchQuery::term("id", "app-1")))
        .times(1)
        .return_once(move |_, _| Ok(hits(apps)));

    let found = service(index, MockMediaStore::new(), MockPaymentGateway::new())
        .search_app_by_id("app-1")
        .await
        .expect("lookup succeeds");

    assert_eq!(found.is_some(), expect_found);
}

#[tokio::test]
async fn checkout_unknown_app_is_not_found_and_skips_gateway() {
    let mut index = MockSearchIndex::new();
    index
        .expect_read()
        .return_once(|_, _| Ok(SearchHits::default()));
    let mut payments = MockPaymentGateway::new();
    payments.expect_create_checkout_session().times(0);

    let error = service(index, MockMediaStore::new(), payments)
        .checkout_app("https://shop.example", "missing")
        .await
        .expect_err("unknown app");

    assert_eq!(error.code(), ErrorCode::NotFound);
    assert_eq!(error.message(), "unable to find app in the search index");
}

#[tokio::test]
async fn checkout_uses_the_app_price_and_caller_origin() {
    let mut index = MockSearchIndex::new();
    index
        .expect_read()
        .return_once(|_, _| Ok(hits(vec![stored_app("app-1")])));
    let mut payments = MockPaymentGateway::new();
    payments
        .expect_create_checkout_session()
        .with(eq("https://shop.example"), eq("price_1"))
        .times(1)
        .return_once(|_, _| Ok("https://checkout.example/cs_1".to_owned()));

    let url = service(index, MockMediaStore::new(), payments)
        .checkout_app("https://shop.example", "app-1")
        .await
        .expect("checkout succeeds");

    assert_eq!(url, "https://checkout.example/cs_1");
}
