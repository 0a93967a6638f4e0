use crate::{
    db::{DbPool, UpdateBuilder},
    entities::sales_order::{
        self, ActiveModel as OrderActiveModel, Entity as OrderEntity, Model as OrderModel,
    },
    entities::sales_order_line::{
        self, ActiveModel as LineActiveModel, Entity as LineEntity, Model as LineModel,
    },
    errors::ServiceError,
    events::{Event, EventSender},
    valuation::{lenient, line_value},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionError, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;
use validator::Validate;

/// Request/Response types for the order service
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateOrderRequest {
    pub reference_number: Option<i64>,
    #[validate(
        required(message = "customer_code is required"),
        length(min = 1, message = "customer_code must not be empty")
    )]
    pub customer_code: Option<String>,
    #[validate(required(message = "user_id is required"))]
    pub user_id: Option<i64>,
    pub status: Option<String>,
    pub remarks: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, message = "at least one line is required"))]
    pub lines: Vec<CreateOrderLine>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateOrderLine {
    pub reference_number: Option<i64>,
    #[validate(
        required(message = "item_code is required"),
        length(min = 1, message = "item_code must not be empty")
    )]
    pub item_code: Option<String>,
    pub item_name: Option<String>,
    pub policy_code: Option<String>,
    pub policy_detail: Option<String>,
    #[serde(default, deserialize_with = "lenient::decimal_opt")]
    #[validate(required(message = "requested_qty is required"))]
    pub requested_qty: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::decimal_opt")]
    pub policy_rate: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::decimal_opt")]
    #[validate(required(message = "requested_rate is required"))]
    pub requested_rate: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::decimal_opt")]
    pub approved_qty: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::decimal_opt")]
    pub approved_rate: Option<Decimal>,
}

/// Partial update of the header's mutable fields. At least one field must
/// be supplied; fields left out are not touched.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateOrderRequest {
    pub status: Option<String>,
    pub remarks: Option<String>,
}

/// Approval input for one line. Either field may be omitted; omitted or
/// malformed values normalize to zero in the derived approved value.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct ApproveLineRequest {
    #[serde(default, deserialize_with = "lenient::decimal_opt")]
    pub approved_qty: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::decimal_opt")]
    pub approved_rate: Option<Decimal>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderResponse {
    pub id: i64,
    pub reference_number: Option<i64>,
    pub customer_code: String,
    pub user_id: i64,
    pub status: Option<String>,
    pub remarks: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderLineResponse {
    pub id: i64,
    pub order_id: i64,
    pub reference_number: Option<i64>,
    pub item_code: String,
    pub item_name: Option<String>,
    pub policy_code: Option<String>,
    pub policy_detail: Option<String>,
    pub requested_qty: Decimal,
    pub policy_rate: Option<Decimal>,
    pub requested_rate: Decimal,
    pub approved_qty: Option<Decimal>,
    pub approved_rate: Option<Decimal>,
    pub requested_value: Decimal,
    pub approved_value: Decimal,
}

/// One order aggregate: header plus its full set of lines.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderDetailResponse {
    pub header: OrderResponse,
    pub lines: Vec<OrderLineResponse>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderListResponse {
    pub orders: Vec<OrderResponse>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

impl From<OrderModel> for OrderResponse {
    fn from(model: OrderModel) -> Self {
        Self {
            id: model.id,
            reference_number: model.reference_number,
            customer_code: model.customer_code,
            user_id: model.user_id,
            status: model.status,
            remarks: model.remarks,
            created_at: model.created_at,
        }
    }
}

impl From<LineModel> for OrderLineResponse {
    fn from(model: LineModel) -> Self {
        Self {
            id: model.id,
            order_id: model.order_id,
            reference_number: model.reference_number,
            item_code: model.item_code,
            item_name: model.item_name,
            policy_code: model.policy_code,
            policy_detail: model.policy_detail,
            requested_qty: model.requested_qty,
            policy_rate: model.policy_rate,
            requested_rate: model.requested_rate,
            approved_qty: model.approved_qty,
            approved_rate: model.approved_rate,
            requested_value: model.requested_value,
            approved_value: model.approved_value,
        }
    }
}

/// Service enforcing order/line consistency over the database pool.
///
/// Client-input validation always runs before the first persistence write;
/// multi-statement writes run inside one transactional scope that commits
/// on success and rolls back on any error.
#[derive(Clone)]
pub struct OrderService {
    db_pool: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
}

impl OrderService {
    /// Creates a new order service instance
    pub fn new(db_pool: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Creates an order header together with all of its lines as one
    /// atomic unit and returns the new header id.
    #[instrument(skip(self, request), fields(customer_code = ?request.customer_code, line_count = request.lines.len()))]
    pub async fn create_order(&self, request: CreateOrderRequest) -> Result<i64, ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;
        for (index, line) in request.lines.iter().enumerate() {
            line.validate()
                .map_err(|e| ServiceError::ValidationError(format!("lines[{index}]: {e}")))?;
        }

        let customer_code = request
            .customer_code
            .clone()
            .ok_or_else(|| ServiceError::ValidationError("customer_code is required".into()))?;
        let user_id = request
            .user_id
            .ok_or_else(|| ServiceError::ValidationError("user_id is required".into()))?;

        let now = Utc::now();
        let header = OrderActiveModel {
            reference_number: Set(request.reference_number),
            customer_code: Set(customer_code),
            user_id: Set(user_id),
            status: Set(request.status.clone()),
            remarks: Set(request.remarks.clone()),
            created_at: Set(now),
            ..Default::default()
        };

        let mut line_models = Vec::with_capacity(request.lines.len());
        for (index, line) in request.lines.iter().enumerate() {
            let item_code = line.item_code.clone().ok_or_else(|| {
                ServiceError::ValidationError(format!("lines[{index}]: item_code is required"))
            })?;
            let requested_qty = line.requested_qty.ok_or_else(|| {
                ServiceError::ValidationError(format!("lines[{index}]: requested_qty is required"))
            })?;
            let requested_rate = line.requested_rate.ok_or_else(|| {
                ServiceError::ValidationError(format!("lines[{index}]: requested_rate is required"))
            })?;

            line_models.push(LineActiveModel {
                reference_number: Set(line.reference_number),
                item_code: Set(item_code),
                item_name: Set(line.item_name.clone()),
                policy_code: Set(line.policy_code.clone()),
                policy_detail: Set(line.policy_detail.clone()),
                requested_qty: Set(requested_qty),
                policy_rate: Set(line.policy_rate),
                requested_rate: Set(requested_rate),
                approved_qty: Set(line.approved_qty),
                approved_rate: Set(line.approved_rate),
                requested_value: Set(line_value(Some(requested_qty), Some(requested_rate))),
                approved_value: Set(line_value(line.approved_qty, line.approved_rate)),
                ..Default::default()
            });
        }

        let db = self.db_pool.clone();
        let order_id = db
            .transaction::<_, i64, ServiceError>(|txn| {
                Box::pin(async move {
                    let header = header.insert(txn).await?;
                    for mut line in line_models {
                        line.order_id = Set(header.id);
                        line.insert(txn).await?;
                    }
                    Ok(header.id)
                })
            })
            .await
            .map_err(|e| match e {
                TransactionError::Connection(err) => {
                    error!(error = %err, "Failed to open transaction for order creation");
                    ServiceError::DatabaseError(err)
                }
                TransactionError::Transaction(err) => {
                    error!(error = %err, "Order creation rolled back");
                    err
                }
            })?;

        info!(order_id = order_id, "Order created successfully");

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender.send(Event::OrderCreated(order_id)).await {
                warn!(error = %e, order_id = order_id, "Failed to send order created event");
            }
        }

        Ok(order_id)
    }

    /// Retrieves an order header together with its lines (oldest line
    /// first). `None` when no header matches.
    #[instrument(skip(self), fields(order_id = order_id))]
    pub async fn get_order(
        &self,
        order_id: i64,
    ) -> Result<Option<OrderDetailResponse>, ServiceError> {
        let db = &*self.db_pool;

        let header = OrderEntity::find_by_id(order_id).one(db).await.map_err(|e| {
            error!(error = %e, order_id = order_id, "Failed to fetch order from database");
            ServiceError::DatabaseError(e)
        })?;

        let Some(header) = header else {
            info!(order_id = order_id, "Order not found");
            return Ok(None);
        };

        let lines = LineEntity::find()
            .filter(sales_order_line::Column::OrderId.eq(order_id))
            .order_by_asc(sales_order_line::Column::Id)
            .all(db)
            .await
            .map_err(|e| {
                error!(error = %e, order_id = order_id, "Failed to fetch order lines");
                ServiceError::DatabaseError(e)
            })?;

        Ok(Some(OrderDetailResponse {
            header: header.into(),
            lines: lines.into_iter().map(Into::into).collect(),
        }))
    }

    /// Lists order headers, newest first, with pagination.
    #[instrument(skip(self))]
    pub async fn list_orders(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<OrderListResponse, ServiceError> {
        let db = &*self.db_pool;
        let page = page.max(1);
        let per_page = per_page.clamp(1, 100);

        let paginator = OrderEntity::find()
            .order_by_desc(sales_order::Column::Id)
            .paginate(db, per_page);

        let total = paginator.num_items().await.map_err(|e| {
            error!(error = %e, "Failed to count orders");
            ServiceError::DatabaseError(e)
        })?;

        let orders = paginator.fetch_page(page - 1).await.map_err(|e| {
            error!(error = %e, page = page, per_page = per_page, "Failed to fetch orders page");
            ServiceError::DatabaseError(e)
        })?;

        Ok(OrderListResponse {
            orders: orders.into_iter().map(Into::into).collect(),
            total,
            page,
            per_page,
        })
    }

    /// Updates the header's status and/or remarks, leaving unsupplied
    /// fields untouched.
    #[instrument(skip(self, request), fields(order_id = order_id))]
    pub async fn update_order(
        &self,
        order_id: i64,
        request: UpdateOrderRequest,
    ) -> Result<(), ServiceError> {
        let builder = UpdateBuilder::<OrderEntity>::new()
            .set_optional(sales_order::Column::Status, request.status)
            .set_optional(sales_order::Column::Remarks, request.remarks);

        if builder.is_empty() {
            return Err(ServiceError::ValidationError(
                "Provide status and/or remarks".into(),
            ));
        }

        let rows = builder
            .exec(
                &*self.db_pool,
                Condition::all().add(sales_order::Column::Id.eq(order_id)),
            )
            .await
            .map_err(|e| {
                error!(error = %e, order_id = order_id, "Failed to update order");
                ServiceError::DatabaseError(e)
            })?;

        if rows == 0 {
            warn!(order_id = order_id, "Order not found for update");
            return Err(ServiceError::NotFound(format!(
                "Order {order_id} not found"
            )));
        }

        info!(order_id = order_id, "Order updated successfully");

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender.send(Event::OrderUpdated(order_id)).await {
                warn!(error = %e, order_id = order_id, "Failed to send order updated event");
            }
        }

        Ok(())
    }

    /// Records an approval on one line: approved quantity, approved rate,
    /// and the derived approved value persist together. The line must
    /// belong to the given order.
    #[instrument(skip(self, request), fields(order_id = order_id, line_id = line_id))]
    pub async fn approve_line(
        &self,
        order_id: i64,
        line_id: i64,
        request: ApproveLineRequest,
    ) -> Result<OrderLineResponse, ServiceError> {
        let db = &*self.db_pool;

        let line = LineEntity::find_by_id(line_id)
            .filter(sales_order_line::Column::OrderId.eq(order_id))
            .one(db)
            .await
            .map_err(|e| {
                error!(error = %e, line_id = line_id, "Failed to fetch line for approval");
                ServiceError::DatabaseError(e)
            })?
            .ok_or_else(|| {
                warn!(order_id = order_id, line_id = line_id, "Line not found for this order");
                ServiceError::NotFound(format!(
                    "Line {line_id} not found for order {order_id}"
                ))
            })?;

        let approved_value = line_value(request.approved_qty, request.approved_rate);

        let mut active: LineActiveModel = line.into();
        active.approved_qty = Set(request.approved_qty);
        active.approved_rate = Set(request.approved_rate);
        active.approved_value = Set(approved_value);

        let updated = active.update(db).await.map_err(|e| {
            error!(error = %e, line_id = line_id, "Failed to persist line approval");
            ServiceError::DatabaseError(e)
        })?;

        info!(
            order_id = order_id,
            line_id = line_id,
            approved_value = %updated.approved_value,
            "Line approved"
        );

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender
                .send(Event::OrderLineApproved { order_id, line_id })
                .await
            {
                warn!(error = %e, line_id = line_id, "Failed to send line approved event");
            }
        }

        Ok(updated.into())
    }

    /// Deletes the header; the schema's cascade removes all of its lines.
    #[instrument(skip(self), fields(order_id = order_id))]
    pub async fn delete_order(&self, order_id: i64) -> Result<(), ServiceError> {
        let db = &*self.db_pool;

        let result = OrderEntity::delete_by_id(order_id).exec(db).await.map_err(|e| {
            error!(error = %e, order_id = order_id, "Failed to delete order");
            ServiceError::DatabaseError(e)
        })?;

        if result.rows_affected == 0 {
            warn!(order_id = order_id, "Order not found for deletion");
            return Err(ServiceError::NotFound(format!(
                "Order {order_id} not found"
            )));
        }

        info!(order_id = order_id, "Order deleted");

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender.send(Event::OrderDeleted(order_id)).await {
                warn!(error = %e, order_id = order_id, "Failed to send order deleted event");
            }
        }

        Ok(())
    }
}
