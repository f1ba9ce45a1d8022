//! # ヘルスチェックハンドラ
//!
//! ```text
//! GET /health
//! ```
//!
//! データソースやプロバイダへの接続は確認せず、プロセスの稼働のみを返す。

use axum::Json;
use pgmanager_shared::HealthResponse;

/// ヘルスチェックエンドポイント
///
/// ```text
/// $ curl http://localhost:3001/health
/// {"status":"ok","message":"PG Manager Pro Server is running","version":"0.1.0"}
/// ```
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::ok(
        "PG Manager Pro Server is running",
        env!("CARGO_PKG_VERSION"),
    ))
}
