/// Application state and router builder
///
/// Defines the shared application state and builds the Axum router with all
/// routes and middleware.
///
/// # Example
///
/// ```no_run
/// use shoplite_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = shoplite_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use axum::{
    extract::Request,
    middleware::Next,
    response::Response,
    routing::{delete, get, patch, post},
    Router,
};
use shoplite_shared::auth::jwt;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor. Uses Arc
/// internally for cheap cloning; the pool is already reference-counted.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Gets the token signing secret
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Routes
///
/// ```text
/// /
/// ├── /health                  # Health check
/// ├── /products                # GET list, POST create
/// │   └── /:id                 # GET, PATCH, DELETE
/// ├── /orders                  # GET list (product expanded), POST create
/// │   └── /:id                 # GET, DELETE
/// ├── /user
/// │   ├── POST /signup
/// │   ├── POST /login
/// │   ├── GET  /users          # bearer token required
/// │   └── DELETE /:id          # bearer token required
/// └── /uploads/*               # static-served product images
/// ```
///
/// Cross-cutting: permissive CORS (preflight answered immediately),
/// per-request trace spans, and a JSON 404 for unmatched routes.
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    let product_routes = Router::new()
        .route("/", get(routes::products::list_products))
        .route("/", post(routes::products::create_product))
        .route("/:id", get(routes::products::get_product))
        .route("/:id", patch(routes::products::update_product))
        .route("/:id", delete(routes::products::delete_product));

    let order_routes = Router::new()
        .route("/", get(routes::orders::list_orders))
        .route("/", post(routes::orders::create_order))
        .route("/:id", get(routes::orders::get_order))
        .route("/:id", delete(routes::orders::delete_order));

    // Signup and login are public; user management needs a valid token.
    let user_public_routes = Router::new()
        .route("/signup", post(routes::users::signup))
        .route("/login", post(routes::users::login));

    let user_protected_routes = Router::new()
        .route("/users", get(routes::users::list_users))
        .route("/:id", delete(routes::users::delete_user))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            bearer_auth_layer,
        ));

    let user_routes = user_public_routes.merge(user_protected_routes);

    Router::new()
        .merge(health_routes)
        .nest("/products", product_routes)
        .nest("/orders", order_routes)
        .nest("/user", user_routes)
        .nest_service(
            "/uploads",
            ServeDir::new(state.config.api.upload_dir.clone()),
        )
        .fallback(routes::not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bearer token authentication middleware
///
/// Extracts and validates the token from the Authorization header, then
/// injects the verified claims into request extensions. Token validity is
/// the only check; there are no roles or per-resource permissions.
async fn bearer_auth_layer(
    state: axum::extract::State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, crate::error::ApiError> {
    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            crate::error::ApiError::Unauthorized("Missing authorization header".to_string())
        })?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        crate::error::ApiError::BadRequest("Expected Bearer token".to_string())
    })?;

    let claims = jwt::validate_token(token, state.jwt_secret())?;

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}
