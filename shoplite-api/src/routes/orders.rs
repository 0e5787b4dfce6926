/// Order endpoints
///
/// Order creation is a two-step sequence: resolve the referenced product,
/// then persist the order. A syntactically invalid product id fails fast
/// before storage; a well-formed id that matches no product fails after one
/// lookup. The window between lookup and insert is an accepted race.
///
/// # Endpoints
///
/// - `GET /orders` - List orders with the referenced product expanded
/// - `POST /orders` - Create an order referencing one product
/// - `GET /orders/:id` - Fetch one order, product expanded
/// - `DELETE /orders/:id` - Delete (confirms even if nothing existed)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
    routes::RequestLink,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shoplite_shared::models::order::{CreateOrder, Order, OrderProduct, OrderWithProduct};
use shoplite_shared::models::product::Product;
use uuid::Uuid;

/// Create order request
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    /// ID of the product to order
    #[serde(rename = "productId")]
    pub product_id: String,

    /// Quantity, defaults to 1
    #[serde(default = "default_quantity")]
    pub quantity: i32,
}

fn default_quantity() -> i32 {
    1
}

/// An order as returned to clients, with its product expanded
#[derive(Debug, Serialize)]
pub struct OrderResponse {
    /// Order ID
    pub id: Uuid,

    /// Referenced product ID
    pub product_id: Uuid,

    /// Quantity ordered
    pub quantity: i32,

    /// When the order was created
    pub created_at: DateTime<Utc>,

    /// Expanded product; null when the reference dangles
    pub product: Option<OrderProduct>,

    /// Canonical follow-up call for this order
    pub request: RequestLink,
}

impl OrderResponse {
    fn from_expanded(order: OrderWithProduct) -> Self {
        let url = format!("/orders/{}", order.id);
        Self {
            id: order.id,
            product_id: order.product_id,
            quantity: order.quantity,
            created_at: order.created_at,
            product: order.product,
            request: RequestLink::get(url),
        }
    }
}

/// List orders response
#[derive(Debug, Serialize)]
pub struct ListOrdersResponse {
    /// Number of orders returned
    pub count: usize,

    /// Orders with products expanded
    pub orders: Vec<OrderResponse>,
}

/// Create order response
#[derive(Debug, Serialize)]
pub struct CreateOrderResponse {
    /// Confirmation message
    pub message: String,

    /// The created order
    pub created_order: OrderBody,

    /// Canonical follow-up call for the created order
    pub request: RequestLink,
}

/// The stored order fields echoed back on creation
#[derive(Debug, Serialize)]
pub struct OrderBody {
    /// Order ID
    pub id: Uuid,

    /// Referenced product ID
    pub product_id: Uuid,

    /// Quantity ordered
    pub quantity: i32,
}

/// Confirmation response for deletes
#[derive(Debug, Serialize)]
pub struct ConfirmationResponse {
    /// Confirmation message
    pub message: String,

    /// Canonical follow-up call
    pub request: RequestLink,
}

/// Lists all orders with referenced products expanded inline
///
/// The expansion is a read-time denormalization; nothing is stored joined.
pub async fn list_orders(State(state): State<AppState>) -> ApiResult<Json<ListOrdersResponse>> {
    let orders = Order::list(&state.db).await?;

    let orders: Vec<OrderResponse> = orders
        .into_iter()
        .map(OrderResponse::from_expanded)
        .collect();

    Ok(Json(ListOrdersResponse {
        count: orders.len(),
        orders,
    }))
}

/// Creates an order referencing one product
///
/// # Endpoint
///
/// ```text
/// POST /orders
/// Content-Type: application/json
///
/// { "productId": "uuid", "quantity": 2 }
/// ```
///
/// # Errors
///
/// - `404 Not Found`: product id malformed, or no such product
/// - `422 Unprocessable Entity`: non-positive quantity
/// - `500 Internal Server Error`: storage failure
pub async fn create_order(
    State(state): State<AppState>,
    Json(req): Json<CreateOrderRequest>,
) -> ApiResult<(StatusCode, Json<CreateOrderResponse>)> {
    // Fail fast on malformed ids, before any storage access
    let product_id = Uuid::parse_str(&req.product_id)
        .map_err(|_| ApiError::NotFound("Invalid product id".to_string()))?;

    if req.quantity < 1 {
        return Err(ApiError::ValidationError(vec![ValidationErrorDetail {
            field: "quantity".to_string(),
            message: "Quantity must be a positive integer".to_string(),
        }]));
    }

    // Resolve the product, then persist; the check-then-act window is an
    // accepted race for this system.
    Product::find_by_id(&state.db, product_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))?;

    let order = Order::create(
        &state.db,
        CreateOrder {
            product_id,
            quantity: req.quantity,
        },
    )
    .await?;

    let url = format!("/orders/{}", order.id);

    Ok((
        StatusCode::CREATED,
        Json(CreateOrderResponse {
            message: "Order stored".to_string(),
            created_order: OrderBody {
                id: order.id,
                product_id: order.product_id,
                quantity: order.quantity,
            },
            request: RequestLink::get(url),
        }),
    ))
}

/// Fetches one order by id, product expanded
///
/// # Errors
///
/// - `400 Bad Request`: malformed id
/// - `404 Not Found`: no such order
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<OrderResponse>> {
    let id = parse_order_id(&id)?;

    let order = Order::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Order not found".to_string()))?;

    Ok(Json(OrderResponse::from_expanded(order)))
}

/// Deletes an order by id
///
/// Returns a 200 confirmation whether or not the order existed.
pub async fn delete_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ConfirmationResponse>> {
    let id = parse_order_id(&id)?;

    // Result is ignored: deleting an absent id still confirms
    Order::delete(&state.db, id).await?;

    Ok(Json(ConfirmationResponse {
        message: "Order deleted".to_string(),
        request: RequestLink::post("/orders"),
    }))
}

/// Parses a path id, rejecting malformed ids before storage access
fn parse_order_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::BadRequest("Invalid order id".to_string()))
}
