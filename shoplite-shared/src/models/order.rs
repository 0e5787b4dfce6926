/// Order model and database operations
///
/// An order references exactly one product and is never mutated in place.
/// The handler resolves the product before calling [`Order::create`]; the
/// check-then-act window is an accepted race for this system. There is no
/// foreign key, so deleting a referenced product leaves the order dangling
/// and reads expand the product as `None`.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE orders (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     product_id UUID NOT NULL,
///     quantity INTEGER NOT NULL DEFAULT 1 CHECK (quantity > 0),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// An order row as stored
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Order {
    /// Unique order ID (UUID v4)
    pub id: Uuid,

    /// Referenced product ID
    pub product_id: Uuid,

    /// Positive quantity, defaults to 1
    pub quantity: i32,

    /// When the order was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrder {
    /// Referenced product ID (must exist at creation time)
    pub product_id: Uuid,

    /// Positive quantity
    pub quantity: i32,
}

/// Product fields inlined into an order read
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderProduct {
    /// Product ID
    pub id: Uuid,

    /// Product name
    pub name: String,

    /// Product price
    pub price: f64,

    /// Optional image reference
    pub image: Option<String>,
}

/// An order with its referenced product expanded at read time
///
/// `product` is None when the reference dangles (the product was deleted
/// after the order was created).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderWithProduct {
    /// Order ID
    pub id: Uuid,

    /// Referenced product ID
    pub product_id: Uuid,

    /// Quantity ordered
    pub quantity: i32,

    /// When the order was created
    pub created_at: DateTime<Utc>,

    /// Expanded product, if it still exists
    pub product: Option<OrderProduct>,
}

/// Flat row shape for the LEFT JOIN read
#[derive(Debug, sqlx::FromRow)]
struct OrderProductRow {
    id: Uuid,
    product_id: Uuid,
    quantity: i32,
    created_at: DateTime<Utc>,
    p_id: Option<Uuid>,
    p_name: Option<String>,
    p_price: Option<f64>,
    p_image: Option<String>,
}

impl From<OrderProductRow> for OrderWithProduct {
    fn from(row: OrderProductRow) -> Self {
        let product = match (row.p_id, row.p_name, row.p_price) {
            (Some(id), Some(name), Some(price)) => Some(OrderProduct {
                id,
                name,
                price,
                image: row.p_image,
            }),
            _ => None,
        };

        OrderWithProduct {
            id: row.id,
            product_id: row.product_id,
            quantity: row.quantity,
            created_at: row.created_at,
            product,
        }
    }
}

const EXPANDED_SELECT: &str = r#"
    SELECT o.id, o.product_id, o.quantity, o.created_at,
           p.id AS p_id, p.name AS p_name, p.price AS p_price, p.image AS p_image
    FROM orders o
    LEFT JOIN products p ON p.id = o.product_id
"#;

impl Order {
    /// Creates a new order
    ///
    /// The caller is responsible for having resolved `product_id` to an
    /// existing product first.
    pub async fn create(pool: &PgPool, data: CreateOrder) -> Result<Self, sqlx::Error> {
        let order = sqlx::query_as::<_, Order>(
            r#"
            INSERT INTO orders (product_id, quantity)
            VALUES ($1, $2)
            RETURNING id, product_id, quantity, created_at
            "#,
        )
        .bind(data.product_id)
        .bind(data.quantity)
        .fetch_one(pool)
        .await?;

        Ok(order)
    }

    /// Finds an order by ID, with the referenced product expanded
    pub async fn find_by_id(
        pool: &PgPool,
        id: Uuid,
    ) -> Result<Option<OrderWithProduct>, sqlx::Error> {
        let query = format!("{} WHERE o.id = $1", EXPANDED_SELECT);

        let row = sqlx::query_as::<_, OrderProductRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(row.map(OrderWithProduct::from))
    }

    /// Lists all orders, newest first, with referenced products expanded
    pub async fn list(pool: &PgPool) -> Result<Vec<OrderWithProduct>, sqlx::Error> {
        let query = format!("{} ORDER BY o.created_at DESC", EXPANDED_SELECT);

        let rows = sqlx::query_as::<_, OrderProductRow>(&query)
            .fetch_all(pool)
            .await?;

        Ok(rows.into_iter().map(OrderWithProduct::from).collect())
    }

    /// Deletes an order by ID
    ///
    /// Returns whether a row was actually removed. Callers deliberately
    /// report success either way (see the delete-by-id contract).
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row(with_product: bool) -> OrderProductRow {
        OrderProductRow {
            id: Uuid::new_v4(),
            product_id: Uuid::new_v4(),
            quantity: 2,
            created_at: Utc::now(),
            p_id: with_product.then(Uuid::new_v4),
            p_name: with_product.then(|| "Book".to_string()),
            p_price: with_product.then(|| 10.0),
            p_image: None,
        }
    }

    #[test]
    fn test_row_expands_existing_product() {
        let row = sample_row(true);
        let expanded = OrderWithProduct::from(row);

        let product = expanded.product.expect("Product should be expanded");
        assert_eq!(product.name, "Book");
        assert_eq!(product.price, 10.0);
    }

    #[test]
    fn test_row_expands_dangling_reference_as_none() {
        let row = sample_row(false);
        let expanded = OrderWithProduct::from(row);

        // Dangling reference: order survives, product is gone
        assert!(expanded.product.is_none());
    }
}
