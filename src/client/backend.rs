use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use super::{ClientError, SettingsApi, SnapshotSource};
use crate::settings::{SettingsPayload, SettingsRecord};
use crate::snapshot::Snapshot;

const STATS_PATH: &str = "/stats";
const SETTINGS_PATH: &str = "/settings";

/// HTTP client for the trading bot's UI endpoints.
///
/// No request timeout is set: a slow status request only delays its own
/// cycle, the scheduler keeps ticking.
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json(&self, path: &str) -> Result<Value, ClientError> {
        let resp = self.client.get(self.url(path)).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ClientError::Status(status));
        }
        let body = resp.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl SnapshotSource for BackendClient {
    async fn fetch_snapshot(&self) -> Result<Snapshot, ClientError> {
        let body = self.get_json(STATS_PATH).await?;
        debug!("Fetched status snapshot from {}", self.base_url);
        Ok(Snapshot::from(body))
    }
}

#[async_trait]
impl SettingsApi for BackendClient {
    async fn load_settings(&self) -> Result<SettingsRecord, ClientError> {
        let body = self.get_json(SETTINGS_PATH).await?;
        Ok(SettingsRecord::from(body))
    }

    async fn save_settings(&self, payload: &SettingsPayload) -> Result<(), ClientError> {
        let resp = self
            .client
            .post(self.url(SETTINGS_PATH))
            .json(payload)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ClientError::Status(status));
        }
        debug!("Settings accepted by backend ({})", status);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::State,
        http::StatusCode,
        response::IntoResponse,
        routing::get,
        Json, Router,
    };
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::sync::Mutex;
    use tokio_test::{assert_err, assert_ok};

    async fn spawn_backend(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_fetch_snapshot() {
        let app = Router::new().route(
            "/stats",
            get(|| async {
                Json(json!({
                    "prices": {"BTCUSDT": 65000},
                    "total_pnl": 12.5
                }))
            }),
        );
        let client = BackendClient::new(spawn_backend(app).await);

        let snapshot = assert_ok!(client.fetch_snapshot().await);
        assert_eq!(snapshot.view().price_text("BTCUSDT"), "65000");
        assert_eq!(snapshot.view().total_pnl_text(), "12.5000");
    }

    #[tokio::test]
    async fn test_non_success_status_is_error() {
        let app = Router::new().route(
            "/stats",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );
        let client = BackendClient::new(spawn_backend(app).await);

        let err = assert_err!(client.fetch_snapshot().await);
        assert_eq!(err.status(), Some(reqwest::StatusCode::INTERNAL_SERVER_ERROR));
    }

    #[tokio::test]
    async fn test_malformed_json_is_error() {
        let app = Router::new().route("/stats", get(|| async { "{not json" }));
        let client = BackendClient::new(spawn_backend(app).await);

        let err = assert_err!(client.fetch_snapshot().await);
        assert!(matches!(err, ClientError::Decode(_)));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = BackendClient::new(format!("http://{}", addr));
        let err = assert_err!(client.fetch_snapshot().await);
        assert!(matches!(err, ClientError::Transport(_)));
    }

    #[tokio::test]
    async fn test_recovers_after_failed_request() {
        let calls = Arc::new(AtomicUsize::new(0));
        let app = Router::new()
            .route(
                "/stats",
                get(|State(calls): State<Arc<AtomicUsize>>| async move {
                    if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                        StatusCode::SERVICE_UNAVAILABLE.into_response()
                    } else {
                        Json(json!({"prices": {"ETHUSDT": 3000}})).into_response()
                    }
                }),
            )
            .with_state(Arc::clone(&calls));
        let client = BackendClient::new(spawn_backend(app).await);

        assert_err!(client.fetch_snapshot().await);
        let snapshot = assert_ok!(client.fetch_snapshot().await);
        assert_eq!(snapshot.view().symbol_count(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_settings_round_trip() {
        let received: Arc<Mutex<Option<Value>>> = Arc::new(Mutex::new(None));
        let app = Router::new()
            .route(
                "/settings",
                get(|| async {
                    Json(json!({
                        "USE_TESTNET": "true",
                        "DRY_RUN": false,
                        "LEVERAGE": 3,
                        "UNIVERSE_SIZE": "200",
                        "MAX_POSITIONS": "3",
                        "STRATEGIES": "a,b",
                        "available_strategies": ["a", "b", "c"]
                    }))
                })
                .post(
                    |State(received): State<Arc<Mutex<Option<Value>>>>, Json(body): Json<Value>| async move {
                        *received.lock().await = Some(body);
                        Json(json!({"ok": true}))
                    },
                ),
            )
            .with_state(Arc::clone(&received));
        let client = BackendClient::new(format!("{}/", spawn_backend(app).await));

        let record = assert_ok!(client.load_settings().await);
        assert_eq!(record.dry_run.as_deref(), Some("false"));
        assert_eq!(record.leverage.as_deref(), Some("3"));
        assert_eq!(record.available_strategies, vec!["a", "b", "c"]);

        let payload = SettingsPayload {
            use_testnet: "true".to_string(),
            dry_run: "false".to_string(),
            leverage: "5".to_string(),
            universe_size: "200".to_string(),
            max_positions: "3".to_string(),
            strategies: "a,b".to_string(),
        };
        assert_ok!(client.save_settings(&payload).await);

        let body = received.lock().await.clone().unwrap();
        assert_eq!(body["LEVERAGE"], json!("5"));
        assert_eq!(body["STRATEGIES"], json!("a,b"));
        assert!(body.get("available_strategies").is_none());
    }

    #[tokio::test]
    async fn test_rejected_save_is_error() {
        let app = Router::new().route(
            "/settings",
            axum::routing::post(|| async { StatusCode::BAD_REQUEST }),
        );
        let client = BackendClient::new(spawn_backend(app).await);
        let payload = SettingsPayload {
            use_testnet: "true".to_string(),
            dry_run: "true".to_string(),
            leverage: "3".to_string(),
            universe_size: "200".to_string(),
            max_positions: "3".to_string(),
            strategies: "auto".to_string(),
        };

        let err = assert_err!(client.save_settings(&payload).await);
        assert_eq!(err.status(), Some(reqwest::StatusCode::BAD_REQUEST));
    }
}
