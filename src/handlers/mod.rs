// Two security tiers, as the routes are laid out:
// Public (no auth) -> Protected (JWT auth, firm or portal token)
pub mod protected;
pub mod public;

use axum::http::HeaderValue;
use axum::{middleware, routing::get, Json, Router};
use serde_json::{json, Value};
use sqlx::PgPool;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config;
use crate::database::repositories::{
    CustomerStore, MatterStore, PgCustomerStore, PgMatterStore, PgUserStore,
};
use crate::middleware::jwt_auth_middleware;
use crate::services::{AuthService, CustomerService, MatterService, PortalService};

#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
    pub customers: CustomerService,
    pub matters: MatterService,
    pub portal: PortalService,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        let users = Arc::new(PgUserStore::new(pool.clone()));
        let customer_store: Arc<dyn CustomerStore> = Arc::new(PgCustomerStore::new(pool.clone()));
        let matter_store: Arc<dyn MatterStore> = Arc::new(PgMatterStore::new(pool));

        Self {
            auth: AuthService::new(users),
            customers: CustomerService::new(customer_store.clone()),
            matters: MatterService::new(matter_store, customer_store.clone()),
            portal: PortalService::new(customer_store),
        }
    }
}

pub fn app(pool: PgPool) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(public_routes())
        .merge(protected_routes())
        .with_state(AppState::new(pool))
        // Global middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer()),
        )
}

fn public_routes() -> Router<AppState> {
    use axum::routing::post;

    Router::new()
        .route("/api/auth/signup", post(public::auth::signup))
        .route("/api/auth/login", post(public::auth::login))
        .route("/api/customer/login", post(public::portal::login))
}

fn protected_routes() -> Router<AppState> {
    use protected::{auth, customers, matters, portal};

    Router::new()
        // Firm-user surface
        .route("/api/auth/me", get(auth::me))
        .route("/api/customers", get(customers::list).post(customers::create))
        .route(
            "/api/customers/:id",
            get(customers::show).put(customers::update).delete(customers::remove),
        )
        .route(
            "/api/customers/:customer_id/matters",
            get(matters::list).post(matters::create),
        )
        .route(
            "/api/customers/:customer_id/matters/:id",
            get(matters::show).put(matters::update).delete(matters::remove),
        )
        // Portal surface (same bearer mechanism, customer-typed token)
        .route("/api/customer/profile", get(portal::profile))
        .route("/api/customer/matters", get(portal::matters))
        .route_layer(middleware::from_fn(jwt_auth_middleware))
}

fn cors_layer() -> CorsLayer {
    let origins: Vec<HeaderValue> = config::config()
        .api
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    if origins.is_empty() {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Matterbook API",
            "version": version,
            "description": "Legal practice management API built with Rust (Axum)",
            "endpoints": {
                "home": "/ (public)",
                "auth": "/api/auth/signup, /api/auth/login (public), /api/auth/me (protected)",
                "customers": "/api/customers[/:id] (protected)",
                "matters": "/api/customers/:customerId/matters[/:id] (protected)",
                "portal": "/api/customer/login (public), /api/customer/profile, /api/customer/matters (portal token)",
            }
        }
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match crate::database::manager::DatabaseManager::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}
