use std::sync::Arc;

use axum::{
    Router,
    extract::{DefaultBodyLimit, FromRef},
    http::{
        Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    middleware,
    routing::get,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tower_sessions::{Expiry, SessionManagerLayer, cookie::SameSite};
use tower_sessions_sqlx_store::SqliteStore;

pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod models;
pub mod response;
pub mod services;
pub mod session;
pub mod validation;


use config::Config;
use db::{DbPool, company_store::CompanyStore, purchase_order_store::PurchaseOrderStore, user_store::UserStore};
use handlers::{auth, company, health, purchase_orders};
use services::{AuthService, PasswordService};

/// Request bodies up to 10 MiB are accepted.
pub const BODY_LIMIT_BYTES: usize = 10 * 1024 * 1024;

/// The shared application state. Handlers extract the part they need.
#[derive(Clone, FromRef)]
pub struct AppState {
    pub config: Arc<Config>,
    pub pool: DbPool,
    pub auth: AuthService,
    pub purchase_orders: PurchaseOrderStore,
    pub company: CompanyStore,
    pub sessions: SqliteStore,
}

impl AppState {
    /// Creates the schema and the session table, seeds the administrator
    /// and wires every store to `pool`.
    pub async fn initialize(config: Config, pool: DbPool) -> anyhow::Result<Self> {
        db::setup_database(&pool).await?;

        let sessions = SqliteStore::new(pool.clone());
        sessions.migrate().await?;

        let passwords = PasswordService::new(config.password_hashing)?;
        let auth = AuthService::new(UserStore::new(pool.clone()), passwords).await?;
        auth.seed_admin(&config.admin).await?;

        Ok(Self {
            config: Arc::new(config),
            purchase_orders: PurchaseOrderStore::new(pool.clone()),
            company: CompanyStore::new(pool.clone()),
            auth,
            sessions,
            pool,
        })
    }
}

/// Builds the HTTP application: routes, session handling, CORS, tracing and
/// the body limit.
pub fn app(state: AppState) -> Router {
    let config = state.config.clone();

    let mut resources = Router::new()
        .route(
            "/purchase-orders",
            get(purchase_orders::list_purchase_orders).post(purchase_orders::create_purchase_order),
        )
        .route(
            "/purchase-orders/{id}",
            get(purchase_orders::get_purchase_order)
                .put(purchase_orders::update_purchase_order)
                .delete(purchase_orders::delete_purchase_order),
        )
        .route(
            "/company",
            get(company::get_company_profile).post(company::save_company_profile),
        );
    if config.require_auth {
        resources = resources.route_layer(middleware::from_fn_with_state(
            state.clone(),
            extract::require_auth,
        ));
    }

    let auth_routes = Router::new()
        .route("/signup", axum::routing::post(auth::signup))
        .route("/login", axum::routing::post(auth::login))
        .route("/logout", axum::routing::post(auth::logout))
        .route("/me", get(auth::me))
        .route("/status", get(auth::status));

    let api = Router::new()
        .nest("/auth", auth_routes)
        .merge(resources)
        .route("/health", get(health::health));

    let session_layer = SessionManagerLayer::new(state.sessions.clone())
        .with_name(session::SESSION_COOKIE)
        .with_http_only(true)
        .with_same_site(SameSite::Lax)
        .with_secure(config.is_production())
        .with_expiry(Expiry::OnInactivity(time::Duration::hours(
            config.session_expiry_hours,
        )))
        .with_signed(session::signing_key(&config.session_secret));

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(config.allowed_origins.clone()))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION]);

    Router::new()
        .route("/", get(health::root))
        .nest("/api", api)
        .fallback(health::not_found)
        .with_state(state)
        .layer(session_layer)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
}
