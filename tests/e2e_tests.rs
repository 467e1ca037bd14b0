//! End-to-end integration tests
//!
//! These tests seed a ledger from the CSV fixtures in tests/fixtures/ and
//! drive it through the HTTP router, the same path the server binary takes
//! at startup.

#[cfg(test)]
mod tests {
    use account_ledger::core::{AccountService, Ledger, RecordingObserver};
    use account_ledger::http::router;
    use account_ledger::io::seed_ledger;
    use account_ledger::types::{AccountId, LedgerEvent};
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use rust_decimal::Decimal;
    use serde_json::{json, Value};
    use std::path::Path;
    use std::sync::Arc;
    use tower::ServiceExt;

    #[test]
    fn test_seed_fixture_creates_accounts() {
        let observer = Arc::new(RecordingObserver::new());
        let ledger = Ledger::new().with_observer(observer.clone());

        let seeded = seed_ledger(&ledger, Path::new("tests/fixtures/seed_accounts.csv")).unwrap();

        assert_eq!(seeded.len(), 2);
        assert_eq!(
            observer.events(),
            vec![
                (LedgerEvent::Created, AccountId::new(1)),
                (LedgerEvent::Created, AccountId::new(2)),
            ]
        );
        assert_eq!(ledger.find(AccountId::new(2)).unwrap().balance, Decimal::new(975, 1));
    }

    #[test]
    fn test_malformed_fixture_reports_line() {
        let ledger = Ledger::new();

        let error = seed_ledger(&ledger, Path::new("tests/fixtures/seed_malformed.csv")).unwrap_err();

        assert!(error.contains("seed_malformed.csv"), "unexpected error: {}", error);
        assert!(error.contains("Line 3"), "unexpected error: {}", error);
        assert_eq!(ledger.accounts().len(), 1);
    }

    #[tokio::test]
    async fn test_seeded_ledger_served_over_http() {
        let ledger = Ledger::new();
        seed_ledger(&ledger, Path::new("tests/fixtures/seed_accounts.csv")).unwrap();
        let app = router(Arc::new(ledger));

        let transfer = Request::post("/transfer/from/1/to/2/amount/20.0")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(transfer).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let listing = Request::get("/accounts").body(Body::empty()).unwrap();
        let response = app.oneshot(listing).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let accounts: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            accounts,
            json!([
                { "id": 1, "name": "user1", "balance": 25.0 },
                { "id": 2, "name": "user2", "balance": 117.5 },
            ])
        );
    }
}
