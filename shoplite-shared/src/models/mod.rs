/// Database models for Shoplite
///
/// Each model owns its CRUD operations as static sqlx methods.
///
/// # Models
///
/// - `user`: User accounts (signup/login credentials)
/// - `product`: Products in the catalog
/// - `order`: Orders referencing exactly one product
///
/// # Example
///
/// ```no_run
/// use shoplite_shared::models::user::{CreateUser, User};
/// use shoplite_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let new_user = CreateUser {
///     email: "user@example.com".to_string(),
///     password_hash: "$argon2id$...".to_string(),
/// };
///
/// let user = User::create(&pool, new_user).await?;
/// # Ok(())
/// # }
/// ```

pub mod order;
pub mod product;
pub mod user;
