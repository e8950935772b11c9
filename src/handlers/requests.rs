use axum::{
    extract::{Json, Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post, put},
    Router,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::errors::ServiceError;
use crate::handlers::{caller_identity, AppState};
use crate::services::orders::{
    ConfirmOrderOutcome, CreateOrderInput, RequestDetail, UpdateRequestInput,
};
use crate::services::SearchWindow;
use crate::ApiResponse;

#[derive(Debug, Serialize, ToSchema)]
pub struct CreateOrderResponse {
    pub payment_id: String,
}

/// Create an order: one payment covering every item, one request per item
#[utoipa::path(
    post,
    path = "/request",
    request_body = CreateOrderInput,
    responses(
        (status = 201, description = "Order created"),
        (status = 400, description = "Invalid input", body = crate::errors::ErrorResponse),
        (status = 402, description = "Payment rejected", body = crate::errors::ErrorResponse)
    ),
    tag = "Requests"
)]
pub(crate) async fn create_order(
    State(state): State<AppState>,
    Json(input): Json<CreateOrderInput>,
) -> Result<(StatusCode, Json<ApiResponse<CreateOrderResponse>>), ServiceError> {
    let payment_id = state.services.orders.create_order(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(CreateOrderResponse { payment_id })),
    ))
}

/// Confirm a payment: requests move to `preparing` and their products are
/// withdrawn from the catalog
#[utoipa::path(
    post,
    path = "/request/confirm/{payment_id}",
    params(("payment_id" = String, Path, description = "Payment to confirm")),
    responses(
        (status = 200, description = "Order confirmed"),
        (status = 502, description = "Catalog unavailable", body = crate::errors::ErrorResponse)
    ),
    tag = "Requests"
)]
pub(crate) async fn confirm_order(
    State(state): State<AppState>,
    Path(payment_id): Path<String>,
) -> Result<Json<ApiResponse<ConfirmOrderOutcome>>, ServiceError> {
    let outcome = state.services.orders.confirm_order(&payment_id).await?;
    Ok(Json(ApiResponse::success(outcome)))
}

/// Search a profile's requests, enriched with live catalog data
#[utoipa::path(
    get,
    path = "/request/profile/{user_id}",
    params(("user_id" = String, Path, description = "Profile to search")),
    responses(
        (status = 200, description = "Matching requests"),
        (status = 401, description = "Missing caller identity", body = crate::errors::ErrorResponse)
    ),
    tag = "Requests"
)]
pub(crate) async fn search_profile_requests(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(user_id): Path<String>,
    Query(window): Query<SearchWindow>,
) -> Result<Json<ApiResponse<Vec<RequestDetail>>>, ServiceError> {
    let caller = caller_identity(&headers);
    let results = state
        .services
        .orders
        .search_profile_requests(caller.as_deref(), &user_id, window)
        .await?;
    Ok(Json(ApiResponse::success(results)))
}

/// Update a request's status or tracking code. Admin only
#[utoipa::path(
    put,
    path = "/private/request/{id}",
    params(("id" = String, Path, description = "Request to update")),
    request_body = UpdateRequestInput,
    responses(
        (status = 200, description = "Request updated"),
        (status = 401, description = "Caller is not an administrator", body = crate::errors::ErrorResponse),
        (status = 404, description = "Request not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Requests"
)]
pub(crate) async fn update_request(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(input): Json<UpdateRequestInput>,
) -> Result<Json<ApiResponse<crate::entities::request::Model>>, ServiceError> {
    let caller = caller_identity(&headers);
    let updated = state
        .services
        .orders
        .update_request(caller.as_deref(), &id, input)
        .await?;
    Ok(Json(ApiResponse::success(updated)))
}

/// Search a store's requests, enriched with live catalog data. Admin only
#[utoipa::path(
    get,
    path = "/private/request/search/{store_id}",
    params(("store_id" = String, Path, description = "Store to search")),
    responses(
        (status = 200, description = "Matching requests"),
        (status = 401, description = "Caller is not an administrator", body = crate::errors::ErrorResponse)
    ),
    tag = "Requests"
)]
pub(crate) async fn search_store_requests(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(store_id): Path<String>,
    Query(window): Query<SearchWindow>,
) -> Result<Json<ApiResponse<Vec<RequestDetail>>>, ServiceError> {
    let caller = caller_identity(&headers);
    let results = state
        .services
        .orders
        .search_store_requests(caller.as_deref(), &store_id, window)
        .await?;
    Ok(Json(ApiResponse::success(results)))
}

pub fn request_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_order))
        .route("/confirm/:payment_id", post(confirm_order))
        .route("/profile/:user_id", get(search_profile_requests))
}

pub fn private_request_routes() -> Router<AppState> {
    Router::new()
        .route("/:id", put(update_request))
        .route("/search/:store_id", get(search_store_requests))
}
