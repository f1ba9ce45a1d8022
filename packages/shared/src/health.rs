//! # ヘルスチェック共通型

use serde::Serialize;

/// ヘルスチェックレスポンス
///
/// 管理画面の死活監視が `status == "ok"` を見るため、`status` と `message` の形は固定。
/// `version` は Cargo.toml のバージョンを示す。
///
/// ## 使用例
///
/// ```
/// use pgmanager_shared::HealthResponse;
///
/// let response = HealthResponse::ok("PG Manager Pro Server is running", "0.1.0");
/// assert_eq!(response.status, "ok");
/// ```
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// 稼働状態（稼働中は `"ok"`）
    pub status:  String,
    pub message: String,
    /// アプリケーションバージョン
    pub version: String,
}

impl HealthResponse {
    pub fn ok(message: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            status:  "ok".to_string(),
            message: message.into(),
            version: version.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_responseのserializeで正しいjson形状にする() {
        let json =
            serde_json::to_value(HealthResponse::ok("PG Manager Pro Server is running", "0.1.0"))
                .unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "status": "ok",
                "message": "PG Manager Pro Server is running",
                "version": "0.1.0"
            })
        );
    }
}
