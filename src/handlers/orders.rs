use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::services::orders::{
    ApproveLineRequest, CreateOrderRequest, OrderDetailResponse, OrderLineResponse,
    OrderListResponse, UpdateOrderRequest,
};
use crate::{errors::ServiceError, ApiResponse, AppState, ListQuery};

/// Identifier of a freshly created order.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatedOrder {
    pub id: i64,
}

/// List order headers, newest first
#[utoipa::path(
    get,
    path = "/api/v1/orders",
    summary = "List orders",
    description = "Get a paginated list of order headers, newest first",
    params(
        ("page" = Option<u64>, Query, description = "Page number (default: 1)"),
        ("limit" = Option<u64>, Query, description = "Items per page (default: 20, max: 100)"),
    ),
    responses(
        (status = 200, description = "Orders retrieved successfully", body = ApiResponse<OrderListResponse>),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse),
    ),
    tag = "Orders"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<OrderListResponse>>, ServiceError> {
    let result = state
        .services
        .order
        .list_orders(query.page, query.limit)
        .await?;
    Ok(Json(ApiResponse::success(result)))
}

/// Create a new order with its lines
#[utoipa::path(
    post,
    path = "/api/v1/orders",
    summary = "Create order",
    description = "Create an order header and at least one line as a single atomic unit",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created successfully", body = ApiResponse<CreatedOrder>),
        (status = 400, description = "Invalid request data", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse),
    ),
    tag = "Orders"
)]
pub async fn create_order(
    State(state): State<AppState>,
    Json(request): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CreatedOrder>>), ServiceError> {
    let id = state.services.order.create_order(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(CreatedOrder { id })),
    ))
}

/// Get one order with all of its lines
#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}",
    summary = "Get order",
    description = "Retrieve an order header together with its lines",
    params(("id" = i64, Path, description = "Order identifier")),
    responses(
        (status = 200, description = "Order retrieved successfully", body = ApiResponse<OrderDetailResponse>),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse),
    ),
    tag = "Orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<OrderDetailResponse>>, ServiceError> {
    match state.services.order.get_order(id).await? {
        Some(order) => Ok(Json(ApiResponse::success(order))),
        None => Err(ServiceError::NotFound(format!("Order {id} not found"))),
    }
}

/// Update an order's status and/or remarks
#[utoipa::path(
    put,
    path = "/api/v1/orders/{id}/status",
    summary = "Update order status",
    description = "Update status and/or remarks; fields left out are not touched",
    params(("id" = i64, Path, description = "Order identifier")),
    request_body = UpdateOrderRequest,
    responses(
        (status = 200, description = "Order updated successfully", body = ApiResponse<serde_json::Value>),
        (status = 400, description = "Neither status nor remarks supplied", body = crate::errors::ErrorResponse),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse),
    ),
    tag = "Orders"
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateOrderRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ServiceError> {
    state.services.order.update_order(id, request).await?;
    Ok(Json(ApiResponse::success(
        serde_json::json!({ "updated": true }),
    )))
}

/// Approve one line of an order
#[utoipa::path(
    put,
    path = "/api/v1/orders/{id}/lines/{line_id}/approve",
    summary = "Approve order line",
    description = "Set approved quantity/rate on a line and recompute its approved value; omitted fields normalize the value to zero",
    params(
        ("id" = i64, Path, description = "Order identifier"),
        ("line_id" = i64, Path, description = "Line identifier"),
    ),
    request_body = ApproveLineRequest,
    responses(
        (status = 200, description = "Line approved", body = ApiResponse<OrderLineResponse>),
        (status = 404, description = "Line not found for this order", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse),
    ),
    tag = "Orders"
)]
pub async fn approve_line(
    State(state): State<AppState>,
    Path((id, line_id)): Path<(i64, i64)>,
    Json(request): Json<ApproveLineRequest>,
) -> Result<Json<ApiResponse<OrderLineResponse>>, ServiceError> {
    let line = state
        .services
        .order
        .approve_line(id, line_id, request)
        .await?;
    Ok(Json(ApiResponse::success(line)))
}

/// Delete an order and all of its lines
#[utoipa::path(
    delete,
    path = "/api/v1/orders/{id}",
    summary = "Delete order",
    description = "Delete an order header; its lines are removed by cascade",
    params(("id" = i64, Path, description = "Order identifier")),
    responses(
        (status = 204, description = "Order deleted"),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse),
    ),
    tag = "Orders"
)]
pub async fn delete_order(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ServiceError> {
    state.services.order.delete_order(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
