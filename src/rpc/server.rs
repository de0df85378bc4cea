use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use super::types::*;
use crate::billing::{BillingConfig, BillingError, Deployment};
use crate::tier::{
    check_feature, check_quota, tier_middleware, QuotaLookup, Tier, UsageBackend,
};

const USER_HEADER: &str = "x-adriel-user";

#[derive(Clone)]
pub struct AppState {
    pub billing: BillingConfig,
    pub usage: Arc<dyn UsageBackend>,
}

pub async fn run_http_server(
    host: &str,
    port: u16,
    billing: BillingConfig,
    usage: Arc<dyn UsageBackend>,
) -> Result<()> {
    let state = Arc::new(AppState { billing, usage });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(health_check))
        .route("/api/status", get(system_status))
        .route("/api/tier/pricing", get(pricing_catalog))
        .route("/api/tier/pricing/{tier}", get(tier_pricing))
        .route("/api/tier/limits/{tier}", get(tier_limits))
        .route("/api/tier/current", get(current_tier))
        .route("/api/tier/feature-check", post(feature_check))
        .route("/api/tier/gate", post(tier_gate))
        .route("/api/quota/status", get(quota_status))
        .route("/api/billing/price", post(checkout_price))
        .layer(middleware::from_fn(tier_middleware))
        .layer(cors)
        .with_state(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("HTTP server listening on {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

async fn health_check() -> &'static str {
    "ok"
}

async fn system_status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let placeholders = state.billing.uses_placeholders();
    let deployment = state.billing.deployment();
    let response = SystemStatusResponse {
        // Placeholder price ids are fine locally, a misconfiguration live
        ready: !placeholders || deployment == Deployment::Development,
        deployment: deployment.as_str(),
        billing: BillingStatus {
            configured: !placeholders,
            placeholders,
        },
        usage_backend: state.usage.describe(),
    };
    (StatusCode::OK, Json(response))
}

async fn pricing_catalog() -> impl IntoResponse {
    let catalog: Vec<CatalogEntry> = Tier::ALL
        .into_iter()
        .map(|tier| CatalogEntry {
            tier,
            pricing: tier.pricing(),
        })
        .collect();
    (StatusCode::OK, Json(catalog))
}

async fn tier_pricing(Path(tier): Path<String>) -> impl IntoResponse {
    match tier.parse::<Tier>() {
        Ok(tier) => (StatusCode::OK, Json(serde_json::to_value(tier.pricing()).unwrap()))
            .into_response(),
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": e.to_string()})),
        )
            .into_response(),
    }
}

async fn tier_limits(Path(tier): Path<String>) -> impl IntoResponse {
    match tier.parse::<Tier>() {
        Ok(tier) => (StatusCode::OK, Json(serde_json::to_value(tier.limits()).unwrap()))
            .into_response(),
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": e.to_string()})),
        )
            .into_response(),
    }
}

async fn current_tier(Extension(tier): Extension<Tier>) -> impl IntoResponse {
    let upgrade_to = Tier::ALL.into_iter().find(|t| t.rank() > tier.rank());
    let response = CurrentTierResponse {
        tier,
        name: tier.pricing().name,
        upgrade_to,
        pricing: tier.pricing(),
    };
    (StatusCode::OK, Json(response))
}

async fn feature_check(Json(request): Json<FeatureCheckRequest>) -> impl IntoResponse {
    let allowed = request.feature.allowed_for(request.tier);
    let response = FeatureCheckResponse {
        tier: request.tier,
        feature: request.feature,
        allowed,
        required_tier: if allowed {
            None
        } else {
            request.feature.minimum_tier()
        },
    };
    (StatusCode::OK, Json(response))
}

/// Enforcement-point check the app server calls before granting a request:
/// plan gate first, then the quota projection when the usage service has one.
async fn tier_gate(
    headers: HeaderMap,
    Extension(tier): Extension<Tier>,
    State(state): State<Arc<AppState>>,
    Json(request): Json<GateRequest>,
) -> impl IntoResponse {
    if let Some(feature) = request.feature {
        if let Err(err) = check_feature(tier, feature) {
            return err.into_response();
        }
    }

    if let Some(user_id) = header_str(&headers, USER_HEADER) {
        match state.usage.quota_status(user_id).await {
            QuotaLookup::Available { quota } => {
                if let Err(err) = check_quota(&quota) {
                    return err.into_response();
                }
            }
            QuotaLookup::Unavailable { reason } => {
                // No counters to compare against; the gate stays open
                tracing::debug!("quota check skipped for {}: {}", user_id, reason);
            }
        }
    }

    (StatusCode::OK, Json(GateResponse { allowed: true, tier })).into_response()
}

async fn quota_status(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let Some(user_id) = header_str(&headers, USER_HEADER) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": format!("missing {} header", USER_HEADER)})),
        )
            .into_response();
    };

    let lookup = state.usage.quota_status(user_id).await;
    let status = if lookup.is_available() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(serde_json::to_value(lookup).unwrap())).into_response()
}

async fn checkout_price(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CheckoutPriceRequest>,
) -> impl IntoResponse {
    match state.billing.resolve_price_id(request.tier, request.period) {
        Ok(price) => (StatusCode::OK, Json(serde_json::to_value(price).unwrap()))
            .into_response(),
        Err(e @ BillingError::NoPriceForFreeTier) => (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": e.to_string()})),
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({"error": e.to_string()})),
        )
            .into_response(),
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
}
