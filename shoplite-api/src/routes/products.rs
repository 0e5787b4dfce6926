/// Product endpoints
///
/// # Endpoints
///
/// - `GET /products` - List products (projection + count)
/// - `POST /products` - Create a product
/// - `GET /products/:id` - Fetch one product
/// - `PATCH /products/:id` - Partial update via `[{propName, value}]` ops
/// - `DELETE /products/:id` - Delete (confirms even if nothing existed)

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
use serde::{Deserialize, Serialize};
use shoplite_shared::models::product::{CreateProduct, Product, UpdateProduct};
use uuid::Uuid;
use validator::Validate;

/// Create product request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProductRequest {
    /// Product name
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    /// Non-negative price
    #[validate(range(min = 0.0, message = "Price must be non-negative"))]
    pub price: f64,

    /// Optional image reference (path under /uploads)
    #[validate(length(max = 512, message = "Image path must be at most 512 characters"))]
    pub image: Option<String>,
}

/// One field update operation, wire format `{ "propName": ..., "value": ... }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateOp {
    /// Name of the field to update
    #[serde(rename = "propName")]
    pub prop_name: String,

    /// New value for the field
    pub value: serde_json::Value,
}

/// Projection of a product returned to clients
#[derive(Debug, Serialize)]
pub struct ProductResponse {
    /// Product ID
    pub id: Uuid,

    /// Product name
    pub name: String,

    /// Price
    pub price: f64,

    /// Optional image reference
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Canonical follow-up call for this product
    pub request: RequestLink,
}

impl ProductResponse {
    fn from_product(product: Product) -> Self {
        let url = format!("/products/{}", product.id);
        Self {
            id: product.id,
            name: product.name,
            price: product.price,
            image: product.image,
            request: RequestLink::get(url),
        }
    }
}

/// List products response
#[derive(Debug, Serialize)]
pub struct ListProductsResponse {
    /// Number of products returned
    pub count: usize,

    /// Product projections
    pub products: Vec<ProductResponse>,
}

/// Create product response
#[derive(Debug, Serialize)]
pub struct CreateProductResponse {
    /// Confirmation message
    pub message: String,

    /// The created product
    pub created_product: ProductResponse,
}

/// Confirmation response for updates and deletes
#[derive(Debug, Serialize)]
pub struct ConfirmationResponse {
    /// Confirmation message
    pub message: String,

    /// Canonical follow-up call
    pub request: RequestLink,
}

/// Lists all products
///
/// # Endpoint
///
/// ```text
/// GET /products
/// ```
pub async fn list_products(
    State(state): State<AppState>,
) -> ApiResult<Json<ListProductsResponse>> {
    let products = Product::list(&state.db).await?;

    let products: Vec<ProductResponse> = products
        .into_iter()
        .map(ProductResponse::from_product)
        .collect();

    Ok(Json(ListProductsResponse {
        count: products.len(),
        products,
    }))
}

/// Creates a product
///
/// # Endpoint
///
/// ```text
/// POST /products
/// Content-Type: application/json
///
/// { "name": "Book", "price": 10, "image": "/uploads/book.png" }
/// ```
///
/// # Errors
///
/// - `422 Unprocessable Entity`: missing name or negative price
/// - `500 Internal Server Error`: storage failure
pub async fn create_product(
    State(state): State<AppState>,
    Json(req): Json<CreateProductRequest>,
) -> ApiResult<(StatusCode, Json<CreateProductResponse>)> {
    req.validate().map_err(super::validation_errors)?;

    let product = Product::create(
        &state.db,
        CreateProduct {
            name: req.name,
            price: req.price,
            image: req.image,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateProductResponse {
            message: "Product created".to_string(),
            created_product: ProductResponse::from_product(product),
        }),
    ))
}

/// Fetches one product by id
///
/// # Errors
///
/// - `400 Bad Request`: malformed id
/// - `404 Not Found`: no such product
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ProductResponse>> {
    let id = parse_product_id(&id)?;

    let product = Product::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))?;

    Ok(Json(ProductResponse::from_product(product)))
}

/// Applies a partial update to a product
///
/// The body is an array of operations, each naming one permitted field:
///
/// ```text
/// PATCH /products/:id
/// Content-Type: application/json
///
/// [ { "propName": "price", "value": 12 } ]
/// ```
///
/// Permitted fields are `name`, `price`, and `image`. Unknown field names
/// and wrongly-typed values are rejected before any storage access.
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(ops): Json<Vec<UpdateOp>>,
) -> ApiResult<Json<ConfirmationResponse>> {
    let id = parse_product_id(&id)?;
    let update = build_update(&ops)?;

    Product::update(&state.db, id, update)
        .await?
        .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))?;

    Ok(Json(ConfirmationResponse {
        message: "Product updated".to_string(),
        request: RequestLink::get(format!("/products/{}", id)),
    }))
}

/// Deletes a product by id
///
/// Returns a 200 confirmation whether or not the product existed. Orders
/// referencing the product are left dangling, not cascade-deleted.
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ConfirmationResponse>> {
    let id = parse_product_id(&id)?;

    // Result is ignored: deleting an absent id still confirms
    Product::delete(&state.db, id).await?;

    Ok(Json(ConfirmationResponse {
        message: "Product deleted".to_string(),
        request: RequestLink::post("/products"),
    }))
}

/// Parses a path id, rejecting malformed ids before storage access
fn parse_product_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::BadRequest("Invalid product id".to_string()))
}

/// Maps `[{propName, value}]` operations onto the closed set of permitted
/// product fields
///
/// Later operations on the same field override earlier ones.
fn build_update(ops: &[UpdateOp]) -> Result<UpdateProduct, ApiError> {
    let mut update = UpdateProduct::default();
    let mut errors = Vec::new();

    for op in ops {
        match op.prop_name.as_str() {
            "name" => match op.value.as_str() {
                Some(name) if !name.is_empty() => update.name = Some(name.to_string()),
                _ => errors.push(ValidationErrorDetail {
                    field: "name".to_string(),
                    message: "Name must be a non-empty string".to_string(),
                }),
            },
            "price" => match op.value.as_f64() {
                Some(price) if price >= 0.0 => update.price = Some(price),
                _ => errors.push(ValidationErrorDetail {
                    field: "price".to_string(),
                    message: "Price must be a non-negative number".to_string(),
                }),
            },
            "image" => {
                if op.value.is_null() {
                    update.image = Some(None);
                } else {
                    match op.value.as_str() {
                        Some(image) => update.image = Some(Some(image.to_string())),
                        None => errors.push(ValidationErrorDetail {
                            field: "image".to_string(),
                            message: "Image must be a string or null".to_string(),
                        }),
                    }
                }
            }
            other => errors.push(ValidationErrorDetail {
                field: other.to_string(),
                message: "Unknown field name".to_string(),
            }),
        }
    }

    if errors.is_empty() {
        Ok(update)
    } else {
        Err(ApiError::ValidationError(errors))
    }
}
