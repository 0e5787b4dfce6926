/// Product model and database operations
///
/// Products are created on POST, mutated via partial-field update, and
/// deleted by id. Price is non-negative; the optional image field holds a
/// path string under the static-served uploads directory.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE products (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL,
///     price DOUBLE PRECISION NOT NULL CHECK (price >= 0),
///     image VARCHAR(512),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// A product in the catalog
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    /// Unique product ID (UUID v4)
    pub id: Uuid,

    /// Product name
    pub name: String,

    /// Non-negative price
    pub price: f64,

    /// Optional image reference (path under the uploads mount)
    pub image: Option<String>,

    /// When the product was created
    pub created_at: DateTime<Utc>,

    /// When the product was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProduct {
    /// Product name
    pub name: String,

    /// Non-negative price
    pub price: f64,

    /// Optional image reference
    pub image: Option<String>,
}

/// Input for updating an existing product
///
/// Only non-None fields are written. `image` uses a nested Option so a
/// caller can clear it with `Some(None)`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProduct {
    /// New name
    pub name: Option<String>,

    /// New price
    pub price: Option<f64>,

    /// New image reference (use Some(None) to clear)
    pub image: Option<Option<String>>,
}

impl Product {
    /// Creates a new product
    pub async fn create(pool: &PgPool, data: CreateProduct) -> Result<Self, sqlx::Error> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (name, price, image)
            VALUES ($1, $2, $3)
            RETURNING id, name, price, image, created_at, updated_at
            "#,
        )
        .bind(data.name)
        .bind(data.price)
        .bind(data.image)
        .fetch_one(pool)
        .await?;

        Ok(product)
    }

    /// Finds a product by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, price, image, created_at, updated_at
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(product)
    }

    /// Lists all products, newest first
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, price, image, created_at, updated_at
            FROM products
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(products)
    }

    /// Updates an existing product
    ///
    /// Builds the `UPDATE` dynamically from the fields present in `data`;
    /// `updated_at` is always bumped. Returns the updated product, or None
    /// if no product with that id exists.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateProduct,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE products SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.name.is_some() {
            bind_count += 1;
            query.push_str(&format!(", name = ${}", bind_count));
        }
        if data.price.is_some() {
            bind_count += 1;
            query.push_str(&format!(", price = ${}", bind_count));
        }
        if data.image.is_some() {
            bind_count += 1;
            query.push_str(&format!(", image = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, name, price, image, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Product>(&query).bind(id);

        if let Some(name) = data.name {
            q = q.bind(name);
        }
        if let Some(price) = data.price {
            q = q.bind(price);
        }
        if let Some(image_opt) = data.image {
            q = q.bind(image_opt);
        }

        let product = q.fetch_optional(pool).await?;

        Ok(product)
    }

    /// Deletes a product by ID
    ///
    /// Returns whether a row was actually removed. Deleting a product that
    /// orders still reference is allowed; the orders are left dangling.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_product_struct() {
        let create = CreateProduct {
            name: "Book".to_string(),
            price: 10.0,
            image: None,
        };

        assert_eq!(create.name, "Book");
        assert_eq!(create.price, 10.0);
    }

    #[test]
    fn test_update_product_default_is_empty() {
        let update = UpdateProduct::default();
        assert!(update.name.is_none());
        assert!(update.price.is_none());
        assert!(update.image.is_none());
    }

    #[test]
    fn test_update_product_clear_image() {
        let update = UpdateProduct {
            image: Some(None),
            ..Default::default()
        };

        // Some(None) means "write NULL", None means "leave untouched"
        assert_eq!(update.image, Some(None));
    }
}
