use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Sales Order API",
        version = "0.1.0",
        description = r#"
# Sales Order API

Backend service for sales order management with a line-level approval
workflow.

## Features

- **Order Management**: Create, fetch, update, and delete orders; header
  and lines always move together as one atomic aggregate
- **Line Approval**: Record approved quantity/rate per line with the
  approved value derived automatically
- **Derived Valuation**: Requested and approved values are always computed
  from their quantity/rate pairs, never accepted from callers

## Error Handling

The API uses consistent error response formats with appropriate HTTP
status codes:

```json
{
  "error": "Bad Request",
  "message": "Validation error: at least one line is required",
  "timestamp": "2024-01-01T00:00:00Z"
}
```

## Pagination

List endpoints support pagination with the following query parameters:
- `page`: Page number (default: 1)
- `limit`: Items per page (default: 20, max: 100)
        "#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:5001", description = "Local development")
    ),
    tags(
        (name = "Orders", description = "Order management endpoints")
    ),
    paths(
        crate::handlers::orders::list_orders,
        crate::handlers::orders::create_order,
        crate::handlers::orders::get_order,
        crate::handlers::orders::update_order_status,
        crate::handlers::orders::approve_line,
        crate::handlers::orders::delete_order,
    ),
    components(
        schemas(
            // Common types
            crate::ApiResponse<serde_json::Value>,
            crate::ListQuery,

            // Order types
            crate::handlers::orders::CreatedOrder,
            crate::services::orders::CreateOrderRequest,
            crate::services::orders::CreateOrderLine,
            crate::services::orders::UpdateOrderRequest,
            crate::services::orders::ApproveLineRequest,
            crate::services::orders::OrderResponse,
            crate::services::orders::OrderLineResponse,
            crate::services::orders::OrderDetailResponse,
            crate::services::orders::OrderListResponse,

            // Error types
            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDocV1;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDocV1::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_document_lists_all_order_paths() {
        let doc = ApiDocV1::openapi();
        let paths = &doc.paths.paths;

        assert!(paths.contains_key("/api/v1/orders"));
        assert!(paths.contains_key("/api/v1/orders/{id}"));
        assert!(paths.contains_key("/api/v1/orders/{id}/status"));
        assert!(paths.contains_key("/api/v1/orders/{id}/lines/{line_id}/approve"));
    }
}
