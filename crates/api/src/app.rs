use axum::{
    middleware,
    routing::{delete, get, patch, post},
    Router,
};
use shared::jwt::JwtConfig;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, rate_limit_middleware, require_hr, require_management,
    require_user_auth, security_headers_middleware, trace_id, RateLimiterState, UserAuth,
};
use crate::routes::{daily_reports, employees, feedback, health, holidays, performance, targets};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    /// Access token verifier; `None` when the configured keys are unusable.
    pub jwt: Option<Arc<JwtConfig>>,
    pub rate_limiter: Option<Arc<RateLimiterState>>,
}

impl AppState {
    pub fn new(config: Config, pool: PgPool) -> Self {
        let jwt = match UserAuth::create_jwt_config(&config.jwt) {
            Ok(jwt) => Some(Arc::new(jwt)),
            Err(e) => {
                tracing::error!("{}; authenticated routes will return 500", e);
                None
            }
        };

        let rate_limiter = RateLimiterState::new(config.security.rate_limit_per_minute).map(Arc::new);

        Self {
            pool,
            config: Arc::new(config),
            jwt,
            rate_limiter,
        }
    }
}

pub fn create_app(config: Config, pool: PgPool) -> Router {
    let state = AppState::new(config, pool);
    let config = state.config.clone();

    let cors = if config.security.cors_origins.is_empty() {
        // Development default
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Any authenticated employee. Handlers narrow access to own records.
    let employee_routes = Router::new()
        .route(
            "/api/v1/targets/employee/:employee_id/:target_month",
            get(targets::get_employee_target),
        )
        .route("/api/v1/performance/me", get(performance::get_my_performance))
        .route("/api/v1/feedback", post(feedback::create_feedback))
        .route(
            "/api/v1/feedback/received",
            get(feedback::list_received_feedback),
        )
        .route("/api/v1/employees/:employee_id", get(employees::get_employee))
        .route(
            "/api/v1/daily-reports",
            post(daily_reports::submit_daily_report).get(daily_reports::list_daily_reports),
        )
        .route("/api/v1/holidays", get(holidays::list_holidays))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_user_auth,
        ));

    // Admin, HR and managers. Managers are scoped to their direct reports.
    let management_routes = Router::new()
        .route(
            "/api/v1/targets",
            post(targets::create_target).get(targets::list_targets),
        )
        .route("/api/v1/targets/bulk", post(targets::bulk_create_targets))
        .route("/api/v1/targets/team", get(targets::get_team_targets))
        .route(
            "/api/v1/targets/team/stats",
            get(targets::get_team_target_stats),
        )
        .route(
            "/api/v1/targets/:target_id",
            patch(targets::update_target).delete(targets::delete_target),
        )
        .route(
            "/api/v1/performance/employees/:employee_id",
            get(performance::get_employee_performance),
        )
        .route(
            "/api/v1/performance/team",
            get(performance::get_team_performance),
        )
        .route("/api/v1/employees", get(employees::list_employees))
        .route_layer(middleware::from_fn(require_management))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_user_auth,
        ));

    // Admin and HR only.
    let hr_routes = Router::new()
        .route(
            "/api/v1/targets/:target_id/permanent",
            delete(targets::hard_delete_target),
        )
        .route("/api/v1/feedback", get(feedback::list_feedback))
        .route("/api/v1/feedback/hr", post(feedback::create_hr_feedback))
        .route(
            "/api/v1/feedback/hr/bulk",
            post(feedback::create_bulk_hr_feedback),
        )
        .route(
            "/api/v1/feedback/statistics",
            get(feedback::get_feedback_statistics),
        )
        .route(
            "/api/v1/feedback/:feedback_id",
            get(feedback::get_feedback).delete(feedback::delete_feedback),
        )
        .route("/api/v1/employees", post(employees::create_employee))
        .route("/api/v1/holidays", post(holidays::create_holiday))
        .route_layer(middleware::from_fn(require_hr))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_user_auth,
        ));

    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    Router::new()
        .merge(public_routes)
        .merge(employee_routes)
        .merge(management_routes)
        .merge(hr_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            security_headers_middleware,
        ))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
