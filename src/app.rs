/*
 * Responsibility
 * - tracing / panic hook の初期化
 * - Config読み込み → 依存生成 (introspection client) → Router 組み立て
 * - Middleware の適用 (HTTP 共通 / access_token 認証)
 * - axum::serve() で起動
 */
use std::{panic, process};

use axum::{Json, Router, routing::get};
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::config::{AppEnv, Config, HttpConfig};
use crate::error::AppError;
use crate::middleware;
use crate::services::oauth::build_authenticator;
use crate::state::AppState;

fn init_tracing(app_env: AppEnv) {
    // RUST_LOG wins; otherwise debug for this crate outside production.
    let default_directives = if app_env.is_production() {
        "info,tower_http=info"
    } else {
        "info,oauth_gate=debug,tower_http=debug"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_directives));

    let fmt = tracing_subscriber::fmt::layer().with_target(!app_env.is_production());

    tracing_subscriber::registry().with(filter).with(fmt).init();
}

fn init_panic_hook(app_env: AppEnv) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()))
            .unwrap_or_default();
        let payload = info
            .payload()
            .downcast_ref::<&str>()
            .copied()
            .or_else(|| info.payload().downcast_ref::<String>().map(String::as_str))
            .unwrap_or("<non-string payload>");
        tracing::error!(%location, payload, "panic");

        if app_env.is_production() {
            default_hook(info);
        } else {
            process::abort();
        }
    }))
}

pub async fn run() -> Result<(), AppError> {
    let config = Config::from_env()?;
    init_tracing(config.app_env);
    init_panic_hook(config.app_env);

    tracing::info!(
        oauth_base_url = %config.oauth.base_url,
        oauth_timeout_ms = config.oauth.timeout.as_millis() as u64,
        "starting in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config)?;
    let app = build_router(state, &config.http);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_state(config: &Config) -> Result<AppState, AppError> {
    // One pooled HTTP client for the introspection service, shared by all requests.
    let auth = build_authenticator(&config.oauth)?;

    Ok(AppState::new(auth))
}

pub fn build_router(state: AppState, http: &HttpConfig) -> Router {
    async fn health() -> Json<serde_json::Value> {
        Json(json!({"status": "ok"}))
    }

    let router = Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api::v1::routes(state.clone()))
        .with_state(state);

    middleware::http::apply(router, http)
}
