//! HTTP adapter integration tests
//!
//! Requests are driven through the router in-process with `tower`'s
//! `oneshot`, against a ledger seeded with user1(45.0) and user2(97.5).

#[cfg(test)]
mod tests {
    use account_ledger::core::{AccountService, Ledger};
    use account_ledger::http::router;
    use account_ledger::types::NewAccount;
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request, StatusCode};
    use axum::Router;
    use rstest::rstest;
    use rust_decimal::Decimal;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app() -> Router {
        let ledger = Ledger::new();
        ledger
            .create(NewAccount::new("user1", Decimal::new(450, 1)))
            .unwrap();
        ledger
            .create(NewAccount::new("user2", Decimal::new(975, 1)))
            .unwrap();
        router(Arc::new(ledger))
    }

    /// Send one request and return the status with the raw body
    async fn send(app: &Router, method: Method, uri: &str) -> (StatusCode, Vec<u8>) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    async fn send_json(app: &Router, method: Method, uri: &str) -> (StatusCode, Value) {
        let (status, body) = send(app, method, uri).await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn message(body: &Value) -> &str {
        body["message"].as_str().unwrap()
    }

    #[tokio::test]
    async fn test_root_banner() {
        let (status, body) = send(&app(), Method::GET, "/").await;

        assert_eq!(status, StatusCode::OK);
        assert!(!body.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_path_is_404() {
        let (status, _) = send(&app(), Method::GET, "/nowhere").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_get_account() {
        let (status, body) = send_json(&app(), Method::GET, "/account/1").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "id": 1, "name": "user1", "balance": 45.0 }));
    }

    #[tokio::test]
    async fn test_get_missing_account_is_404() {
        let (status, body) = send_json(&app(), Method::GET, "/account/45").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["exception"], "NotFound");
        assert_eq!(message(&body), "Account Id [45] not found");
    }

    #[tokio::test]
    async fn test_get_account_with_invalid_id() {
        let (status, body) = send_json(&app(), Method::GET, "/account/abc").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["exception"], "InvalidArgument");
    }

    #[tokio::test]
    async fn test_transfer_moves_funds() {
        let app = app();

        let (status, body) =
            send_json(&app, Method::POST, "/transfer/from/1/to/2/amount/20.0").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "success": "true" }));

        let (_, from) = send_json(&app, Method::GET, "/account/1").await;
        let (_, to) = send_json(&app, Method::GET, "/account/2").await;
        assert_eq!(from["balance"], json!(25.0));
        assert_eq!(to["balance"], json!(117.5));
    }

    #[rstest]
    #[case::missing_source("/transfer/from/14/to/2/amount/20.0", StatusCode::NOT_FOUND, "NotFound")]
    #[case::missing_destination("/transfer/from/1/to/14/amount/20.0", StatusCode::NOT_FOUND, "NotFound")]
    #[case::insufficient_funds(
        "/transfer/from/1/to/2/amount/200000.0",
        StatusCode::INTERNAL_SERVER_ERROR,
        "InsufficientFunds"
    )]
    #[case::same_account(
        "/transfer/from/1/to/1/amount/20.0",
        StatusCode::INTERNAL_SERVER_ERROR,
        "InvalidArgument"
    )]
    #[case::invalid_amount(
        "/transfer/from/1/to/2/amount/abc",
        StatusCode::INTERNAL_SERVER_ERROR,
        "InvalidArgument"
    )]
    #[case::zero_amount(
        "/transfer/from/1/to/2/amount/0",
        StatusCode::INTERNAL_SERVER_ERROR,
        "BalanceOverflow"
    )]
    #[case::below_precision(
        "/transfer/from/1/to/2/amount/0.0000000000000000000000000001",
        StatusCode::INTERNAL_SERVER_ERROR,
        "BalanceOverflow"
    )]
    #[tokio::test]
    async fn test_rejected_transfers_leave_balances(
        #[case] uri: &str,
        #[case] expected_status: StatusCode,
        #[case] expected_exception: &str,
    ) {
        let app = app();

        let (status, body) = send_json(&app, Method::POST, uri).await;

        assert_eq!(status, expected_status);
        assert_eq!(body["exception"], expected_exception);
        let (_, from) = send_json(&app, Method::GET, "/account/1").await;
        let (_, to) = send_json(&app, Method::GET, "/account/2").await;
        assert_eq!(from["balance"], json!(45.0));
        assert_eq!(to["balance"], json!(97.5));
    }

    #[tokio::test]
    async fn test_insufficient_funds_message() {
        let (_, body) =
            send_json(&app(), Method::POST, "/transfer/from/1/to/2/amount/200000.0").await;

        assert!(message(&body).starts_with("Could not withdraw"));
    }

    #[tokio::test]
    async fn test_same_account_message() {
        let (_, body) = send_json(&app(), Method::POST, "/transfer/from/1/to/1/amount/20.0").await;

        assert!(message(&body).starts_with("The from and to account should not be the same"));
    }

    #[tokio::test]
    async fn test_transfer_overflowing_destination() {
        let app = app();
        let (status, rich) = send_json(
            &app,
            Method::PUT,
            "/account?name=rich&balance=79228162514264337593543950335",
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let uri = format!("/transfer/from/2/to/{}/amount/2", rich["id"]);
        let (status, body) = send_json(&app, Method::POST, &uri).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["exception"], "BalanceOverflow");
        let (_, source) = send_json(&app, Method::GET, "/account/2").await;
        assert_eq!(source["balance"], json!(97.5));
    }

    #[tokio::test]
    async fn test_create_account() {
        let app = app();

        let (status, body) =
            send_json(&app, Method::PUT, "/account?name=user3&balance=10.5").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "id": 3, "name": "user3", "balance": 10.5 }));
        let (status, _) = send_json(&app, Method::GET, "/account/3").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[rstest]
    #[case::missing_name("/account?balance=10")]
    #[case::missing_balance("/account?name=user3")]
    #[case::negative_balance("/account?name=user3&balance=-1")]
    #[case::supplied_id("/account?id=7&name=user3&balance=1")]
    #[tokio::test]
    async fn test_create_account_rejected(#[case] uri: &str) {
        let app = app();

        let (status, body) = send_json(&app, Method::PUT, uri).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["exception"], "InvalidArgument");
        let (_, accounts) = send_json(&app, Method::GET, "/accounts").await;
        assert_eq!(accounts.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_delete_account() {
        let app = app();

        let (status, body) = send_json(&app, Method::DELETE, "/account/2").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "user2");

        let (status, _) = send_json(&app, Method::GET, "/account/2").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = send_json(&app, Method::DELETE, "/account/2").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["exception"], "NotFound");
    }

    #[tokio::test]
    async fn test_list_accounts_sorted_by_id() {
        let app = app();
        send_json(&app, Method::PUT, "/account?name=user3&balance=0").await;
        send_json(&app, Method::DELETE, "/account/1").await;

        let (status, body) = send_json(&app, Method::GET, "/accounts").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!([
                { "id": 2, "name": "user2", "balance": 97.5 },
                { "id": 3, "name": "user3", "balance": 0.0 },
            ])
        );
    }

    #[tokio::test]
    async fn test_router_over_shared_service() {
        let ledger = Arc::new(Ledger::new());
        let app = router(ledger.clone());

        send_json(&app, Method::PUT, "/account?name=shared&balance=3").await;

        assert_eq!(ledger.accounts().len(), 1);
    }
}
