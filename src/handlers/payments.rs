use axum::{
    extract::{Json, Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post, put},
    Router,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::entities::payment;
use crate::errors::ServiceError;
use crate::handlers::{caller_identity, AppState};
use crate::services::payments::{CreatePaymentInput, UpdatePaymentInput};
use crate::services::SearchWindow;
use crate::ApiResponse;

#[derive(Debug, Serialize, ToSchema)]
pub struct CreatePaymentResponse {
    pub id: i32,
}

/// Record a payment directly. Admin only
#[utoipa::path(
    post,
    path = "/private/payment",
    request_body = CreatePaymentInput,
    responses(
        (status = 201, description = "Payment recorded"),
        (status = 401, description = "Caller is not an administrator", body = crate::errors::ErrorResponse)
    ),
    tag = "Payments"
)]
pub(crate) async fn create_payment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<CreatePaymentInput>,
) -> Result<(StatusCode, Json<ApiResponse<CreatePaymentResponse>>), ServiceError> {
    let caller = caller_identity(&headers);
    let id = state
        .services
        .payments
        .create_payment(caller.as_deref(), input)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(CreatePaymentResponse { id })),
    ))
}

/// Replace a payment's status. Admin only
#[utoipa::path(
    put,
    path = "/private/payment/{id}",
    params(("id" = String, Path, description = "Payment to update")),
    request_body = UpdatePaymentInput,
    responses(
        (status = 200, description = "Payment updated"),
        (status = 404, description = "Payment not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Payments"
)]
pub(crate) async fn update_payment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(input): Json<UpdatePaymentInput>,
) -> Result<Json<ApiResponse<payment::Model>>, ServiceError> {
    let caller = caller_identity(&headers);
    let updated = state
        .services
        .payments
        .update_payment(caller.as_deref(), &id, input)
        .await?;
    Ok(Json(ApiResponse::success(updated)))
}

/// List every payment recorded for a store. Admin only
#[utoipa::path(
    get,
    path = "/private/payment/store/{store_id}",
    params(("store_id" = String, Path, description = "Store to list")),
    responses(
        (status = 200, description = "Store payments"),
        (status = 401, description = "Caller is not an administrator", body = crate::errors::ErrorResponse)
    ),
    tag = "Payments"
)]
pub(crate) async fn store_payments(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(store_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<payment::Model>>>, ServiceError> {
    let caller = caller_identity(&headers);
    let payments = state
        .services
        .payments
        .store_payments(caller.as_deref(), &store_id)
        .await?;
    Ok(Json(ApiResponse::success(payments)))
}

/// Search payments by status and creation window. Admin only
#[utoipa::path(
    get,
    path = "/private/payment/search",
    responses(
        (status = 200, description = "Matching payments"),
        (status = 400, description = "Malformed date bound", body = crate::errors::ErrorResponse)
    ),
    tag = "Payments"
)]
pub(crate) async fn search_payments(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(window): Query<SearchWindow>,
) -> Result<Json<ApiResponse<Vec<payment::Model>>>, ServiceError> {
    let caller = caller_identity(&headers);
    let payments = state
        .services
        .payments
        .search_payments(caller.as_deref(), window)
        .await?;
    Ok(Json(ApiResponse::success(payments)))
}

pub fn private_payment_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_payment))
        .route("/:id", put(update_payment))
        .route("/store/:store_id", get(store_payments))
        .route("/search", get(search_payments))
}
