//! # オファー通知ハンドラ
//!
//! 外部のトリガー（スケジューラ・管理画面など）から呼び出される通知エンドポイント。
//!
//! ## エンドポイント
//!
//! - `POST /offers/weekly/notify` - 週替わりオファーを通知対象ユーザーにメールで送る
//!
//! ## リクエスト例
//!
//! ```json
//! {
//!   "offer": {
//!     "title": "Semaine verte",
//!     "description": "Des légumes frais.",
//!     "startDate": "2024-05-06",
//!     "endDate": "2024-05-12",
//!     "vegetables": [{"name": "Carrot", "price": 1.5, "packaging": "bag", "standardQuantity": 2}]
//!   }
//! }
//! ```

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::Deserialize;
use veggiecart_domain::offer::Offer;

use crate::{
    error::NotifierError,
    usecase::{NotifyOutcome, OfferNotificationService},
};

/// オファー通知 API の共有状態
pub struct OfferState {
    pub service: OfferNotificationService,
}

/// 通知リクエスト
///
/// `offer` キーが無い場合も `null` と同じく未指定として扱う。
#[derive(Debug, Deserialize)]
pub struct NotifyRequest {
    #[serde(default)]
    pub offer: Option<Offer>,
}

/// POST /offers/weekly/notify
///
/// ## レスポンス
///
/// - `200 OK`: `{"success": true}`、通知対象がいない場合は `message` 付き
/// - `400 Bad Request`: オファーが指定されていない、またはボディを読み取れない
/// - `502 Bad Gateway`: ユーザーディレクトリの検索、またはメール送信に失敗
#[tracing::instrument(skip_all)]
pub async fn notify_weekly_offer(
    State(state): State<Arc<OfferState>>,
    payload: Result<Json<NotifyRequest>, JsonRejection>,
) -> Result<Json<NotifyOutcome>, NotifierError> {
    let Json(req) = payload.map_err(|rejection| {
        let detail = rejection.body_text();
        tracing::warn!(status = %rejection.status(), "リクエストボディを読み取れません: {}", detail);
        NotifierError::InvalidRequest(detail)
    })?;
    let outcome = state.service.notify(req.offer).await?;
    Ok(Json(outcome))
}
