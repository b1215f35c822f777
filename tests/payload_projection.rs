//! Translating fields of JSON payloads in place.

mod common;

use common::{client_with, CountingProvider, SharedMap};
use serde_json::json;
use std::sync::Arc;

#[tokio::test]
async fn test_quote_response_fields_are_translated() {
    let provider = Arc::new(CountingProvider::default());
    let client = client_with(provider.clone(), Arc::new(SharedMap::default())).await;

    let mut payload = json!({
        "data": {
            "title": "이사 견적",
            "reviews": [
                {"content": "친절해요", "rating": 5},
                {"content": "빨라요", "rating": 4},
                {"content": "친절해요", "rating": 5}
            ],
            "partner": {"name": "한빛 이사"}
        }
    });

    let report = client
        .apply_translations_with_report(
            &mut payload,
            &["data.title", "data.reviews.content", "data.partner.name", "data.missing"],
            Some("en"),
        )
        .await;

    assert_eq!(
        payload,
        json!({
            "data": {
                "title": "이사 견적[EN-US]",
                "reviews": [
                    {"content": "친절해요[EN-US]", "rating": 5},
                    {"content": "빨라요[EN-US]", "rating": 4},
                    {"content": "친절해요[EN-US]", "rating": 5}
                ],
                "partner": {"name": "한빛 이사[EN-US]"}
            }
        })
    );
    assert_eq!(report.matched(), 5);
    assert_eq!(report.written(), 5);
    assert_eq!(report.paths[3].matched, 0);
    assert_eq!(provider.calls(), 4);
}

#[tokio::test]
async fn test_returned_reference_is_the_input_payload() {
    let client = client_with(Arc::new(CountingProvider::default()), Arc::new(SharedMap::default())).await;
    let mut payload = json!({"title": "Hello"});
    let addr: *const serde_json::Value = &payload;

    let out = client.apply_translations(&mut payload, &["title"], Some("ko")).await;
    assert!(std::ptr::eq(out as *const serde_json::Value, addr));
    assert_eq!(out["title"], "Hello[KO]");
}

#[tokio::test]
async fn test_failures_and_bad_paths_leave_payload_usable() {
    let provider = Arc::new(CountingProvider::failing_on(&["oops"]));
    let client = client_with(provider.clone(), Arc::new(SharedMap::default())).await;
    let mut payload = json!({"items": [{"name": "oops"}, {"name": "fine"}], "count": 2});

    client
        .apply_translations(&mut payload, &["items.name", "count.value", ""], Some("ja"))
        .await;
    assert_eq!(
        payload,
        json!({"items": [{"name": "oops"}, {"name": "fine[JA]"}], "count": 2})
    );
}

#[tokio::test]
async fn test_unknown_language_leaves_payload() {
    let provider = Arc::new(CountingProvider::default());
    let client = client_with(provider.clone(), Arc::new(SharedMap::default())).await;
    let original = json!({"title": "Hello"});
    let mut payload = original.clone();

    client.apply_translations(&mut payload, &["title"], Some("zz")).await;
    assert_eq!(payload, original);
    assert_eq!(provider.calls(), 0);
}
