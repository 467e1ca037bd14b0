//! HTTP routes
//!
//! Every handler parses its inputs, runs the ledger call on tokio's blocking
//! pool (ledger calls may wait on locks) and encodes the result as JSON.

use crate::core::AccountService;
use crate::http::error::ApiError;
use crate::types::{Account, AccountId, LedgerError, NewAccount};
use axum::extract::{Path, Query, State};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

/// Shared handle to the ledger behind the routes
pub type SharedService = Arc<dyn AccountService>;

/// JSON representation of an account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountView {
    pub id: u64,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
}

impl From<Account> for AccountView {
    fn from(account: Account) -> Self {
        AccountView {
            id: account.id.get(),
            name: account.name,
            balance: account.balance,
        }
    }
}

/// Query parameters of `PUT /account`
#[derive(Debug, Deserialize)]
pub struct CreateParams {
    pub id: Option<String>,
    pub name: Option<String>,
    pub balance: Option<String>,
}

impl CreateParams {
    fn into_request(self) -> Result<NewAccount, LedgerError> {
        let name = self
            .name
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| LedgerError::invalid_argument("Query parameter [name] is required"))?;
        let balance = self
            .balance
            .ok_or_else(|| LedgerError::invalid_argument("Query parameter [balance] is required"))
            .and_then(|balance| parse_amount(&balance))?;

        let mut request = NewAccount::new(name, balance);
        if let Some(id) = self.id {
            request = request.with_id(id.parse()?);
        }
        Ok(request)
    }
}

/// Build the router for the ledger API
pub fn router(service: SharedService) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/accounts", get(list_accounts))
        .route("/account", put(create_account))
        .route("/account/:id", get(find_account).delete(delete_account))
        .route("/transfer/from/:from/to/:to/amount/:amount", post(transfer))
        .with_state(service)
}

fn parse_amount(value: &str) -> Result<Decimal, LedgerError> {
    Decimal::from_str(value.trim())
        .map_err(|_| LedgerError::invalid_argument(format!("Invalid amount [{}]", value)))
}

async fn run_blocking<T, F>(service: &SharedService, call: F) -> Result<T, ApiError>
where
    F: FnOnce(&dyn AccountService) -> T + Send + 'static,
    T: Send + 'static,
{
    let service = Arc::clone(service);
    Ok(tokio::task::spawn_blocking(move || call(service.as_ref())).await?)
}

async fn root() -> &'static str {
    "This is the root of the app. Please visit individual paths/resources"
}

async fn list_accounts(
    State(service): State<SharedService>,
) -> Result<Json<Vec<AccountView>>, ApiError> {
    let accounts = run_blocking(&service, |service| service.accounts()).await?;
    Ok(Json(accounts.into_iter().map(AccountView::from).collect()))
}

async fn find_account(
    State(service): State<SharedService>,
    Path(id): Path<String>,
) -> Result<Json<AccountView>, ApiError> {
    let id: AccountId = id.parse()?;
    debug!(%id, "find account");

    run_blocking(&service, move |service| service.find(id))
        .await?
        .map(|account| Json(account.into()))
        .ok_or_else(|| LedgerError::not_found(id).into())
}

async fn create_account(
    State(service): State<SharedService>,
    Query(params): Query<CreateParams>,
) -> Result<Json<AccountView>, ApiError> {
    let request = params.into_request()?;
    debug!(name = %request.name, balance = %request.balance, "create account");

    let account = run_blocking(&service, move |service| service.create(request)).await??;
    Ok(Json(account.into()))
}

async fn delete_account(
    State(service): State<SharedService>,
    Path(id): Path<String>,
) -> Result<Json<AccountView>, ApiError> {
    let id: AccountId = id.parse()?;
    debug!(%id, "delete account");

    let account = run_blocking(&service, move |service| service.delete(id)).await??;
    Ok(Json(account.into()))
}

async fn transfer(
    State(service): State<SharedService>,
    Path((from, to, amount)): Path<(String, String, String)>,
) -> Result<Json<Value>, ApiError> {
    let from: AccountId = from.parse()?;
    let to: AccountId = to.parse()?;
    let amount = parse_amount(&amount)?;
    debug!(%from, %to, %amount, "transfer");

    run_blocking(&service, move |service| service.transfer(from, to, amount)).await??;
    Ok(Json(json!({ "success": "true" })))
}
