//! # ルーター構築
//!
//! main.rs と統合テストで同じルーター構成を使うため、構築処理をここに集約する。

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::handler::{OfferState, health_check, notify_weekly_offer};

/// アプリケーションのルーターを構築する
pub fn build_app(offer_state: Arc<OfferState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/offers/weekly/notify", post(notify_weekly_offer))
        .with_state(offer_state)
        .layer(TraceLayer::new_for_http())
}
