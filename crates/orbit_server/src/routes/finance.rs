use super::{message, parse_path_id};
use crate::auth::AuthenticatedUser;
use crate::error::ApiError;
use crate::state::AppState;
use actix_web::{delete, get, post, web, HttpResponse, Scope};
use orbit_core::model::finance::{AccountInput, SubscriptionInput, TransactionInput};
use orbit_core::{FinanceService, SqliteFinanceRepository};
use rusqlite::Connection;

pub fn routes() -> Scope {
    web::scope("/api/finance")
        .service(summary)
        .service(list_accounts)
        .service(create_account)
        .service(delete_account)
        .service(list_transactions)
        .service(create_transaction)
        .service(delete_transaction)
        .service(list_subscriptions)
        .service(create_subscription)
        .service(delete_subscription)
}

fn service(conn: &mut Connection) -> FinanceService<SqliteFinanceRepository<'_>> {
    FinanceService::new(SqliteFinanceRepository::new(conn))
}

#[get("/summary")]
async fn summary(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let user_id = user.id();
    let totals = state
        .with_conn(move |conn| Ok(service(conn).summary(user_id)?))
        .await?;
    Ok(HttpResponse::Ok().json(totals))
}

#[get("/accounts")]
async fn list_accounts(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let user_id = user.id();
    let accounts = state
        .with_conn(move |conn| Ok(service(conn).list_accounts(user_id)?))
        .await?;
    Ok(HttpResponse::Ok().json(accounts))
}

#[post("/accounts")]
async fn create_account(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    body: web::Json<AccountInput>,
) -> Result<HttpResponse, ApiError> {
    let user_id = user.id();
    let input = body.into_inner();
    let account = state
        .with_conn(move |conn| Ok(service(conn).create_account(user_id, &input)?))
        .await?;
    Ok(HttpResponse::Created().json(account))
}

#[delete("/accounts/{id}")]
async fn delete_account(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let user_id = user.id();
    let id = parse_path_id(&path, "Account not found")?;
    state
        .with_conn(move |conn| Ok(service(conn).delete_account(user_id, id)?))
        .await?;
    Ok(message("Account and associated transactions removed"))
}

#[get("/transactions")]
async fn list_transactions(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let user_id = user.id();
    let transactions = state
        .with_conn(move |conn| Ok(service(conn).list_transactions(user_id)?))
        .await?;
    Ok(HttpResponse::Ok().json(transactions))
}

#[post("/transactions")]
async fn create_transaction(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    body: web::Json<TransactionInput>,
) -> Result<HttpResponse, ApiError> {
    let user_id = user.id();
    let input = body.into_inner();
    let transaction = state
        .with_conn(move |conn| Ok(service(conn).create_transaction(user_id, &input)?))
        .await?;
    Ok(HttpResponse::Created().json(transaction))
}

#[delete("/transactions/{id}")]
async fn delete_transaction(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let user_id = user.id();
    let id = parse_path_id(&path, "Transaction not found")?;
    state
        .with_conn(move |conn| Ok(service(conn).delete_transaction(user_id, id)?))
        .await?;
    Ok(message("Transaction removed"))
}

#[get("/subscriptions")]
async fn list_subscriptions(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let user_id = user.id();
    let subscriptions = state
        .with_conn(move |conn| Ok(service(conn).list_subscriptions(user_id)?))
        .await?;
    Ok(HttpResponse::Ok().json(subscriptions))
}

#[post("/subscriptions")]
async fn create_subscription(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    body: web::Json<SubscriptionInput>,
) -> Result<HttpResponse, ApiError> {
    let user_id = user.id();
    let input = body.into_inner();
    let subscription = state
        .with_conn(move |conn| Ok(service(conn).create_subscription(user_id, &input)?))
        .await?;
    Ok(HttpResponse::Created().json(subscription))
}

#[delete("/subscriptions/{id}")]
async fn delete_subscription(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let user_id = user.id();
    let id = parse_path_id(&path, "Subscription not found")?;
    state
        .with_conn(move |conn| Ok(service(conn).delete_subscription(user_id, id)?))
        .await?;
    Ok(message("Subscription removed"))
}
