use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::session::{is_session_expired, Navigator, SessionGuard};
use super::token::TokenStore;
use super::{ApiRequest, ApiResponse, Transport};
use crate::config::AppConfig;
use crate::error::{ApiResult, TransportError};

/// `reqwest`-backed transport with bearer auth and session-expiry handling.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
    tokens: Arc<dyn TokenStore>,
    session: SessionGuard,
}

impl HttpTransport {
    pub fn new(
        config: &AppConfig,
        tokens: Arc<dyn TokenStore>,
        navigator: Arc<dyn Navigator>,
    ) -> ApiResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| TransportError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.api_base_url.clone(),
            tokens,
            session: SessionGuard::new(navigator, config.redirect_delay),
        })
    }

    pub fn session(&self) -> &SessionGuard {
        &self.session
    }

    /// Appends `path` to the base URL, keeping any path prefix the base has.
    fn url_for(&self, path: &str) -> ApiResult<Url> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Url::parse(&format!("{base}/{path}")).map_err(|e| TransportError::InvalidUrl(e.to_string()))
    }

    fn failure(&self, status: u16, body: &Value, check_session: bool) -> TransportError {
        let message = body.get("message").and_then(Value::as_str);
        let body_code = body
            .get("statusCode")
            .and_then(Value::as_u64)
            .and_then(|code| u16::try_from(code).ok());

        if check_session && is_session_expired(status, body_code, message) {
            let message = message.unwrap_or("Unauthorized").to_string();
            self.session.expire(&message);
            return TransportError::SessionExpired { message };
        }

        let message = message
            .or_else(|| body.get("error").and_then(Value::as_str))
            .map(str::to_owned)
            .unwrap_or_else(|| {
                reqwest::StatusCode::from_u16(status)
                    .ok()
                    .and_then(|s| s.canonical_reason())
                    .unwrap_or("Request failed")
                    .to_string()
            });
        TransportError::Api {
            status,
            message,
            body: body.clone(),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    async fn send(&self, request: ApiRequest) -> ApiResult<ApiResponse> {
        let url = self.url_for(&request.path)?;
        let cancel = self.session.current_token();

        let mut builder = self.client.request(request.method.into(), url);
        if request.authorized {
            match self.tokens.token() {
                Some(token) => builder = builder.bearer_auth(token),
                None => debug!("No admin token available, sending without authorization"),
            }
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let exchange = async move {
            let response = builder
                .send()
                .await
                .map_err(|e| TransportError::Network(e.to_string()))?;
            let status = response.status();
            let bytes = response
                .bytes()
                .await
                .map_err(|e| TransportError::Network(e.to_string()))?;

            // Plain-text bodies are kept as a string; only callers that need
            // `data.data` fail on them.
            let body = if bytes.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&bytes)
                    .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
            };
            Ok::<_, TransportError>((status, body))
        };

        let (status, body) = tokio::select! {
            result = exchange => result?,
            reason = cancel.cancelled() => {
                debug!(%reason, "Request cancelled");
                return Err(TransportError::Cancelled { reason });
            }
        };

        if status.is_success() {
            let response = ApiResponse::new(status.as_u16(), body);
            info!(status = response.status, message = response.message_or_default(), "Request succeeded");
            return Ok(response);
        }

        let error = self.failure(status.as_u16(), &body, request.check_session);
        warn!(status = status.as_u16(), error = %error, "Request failed");
        Err(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Product;
    use crate::services::ResourceService;
    use crate::transport::{InMemoryNavigator, MemoryTokenStore, ROOT_PATH};
    use axum::extract::Path;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;
    use std::time::Duration;

    async fn spawn_api() -> Url {
        let app = Router::new()
            .route(
                "/api/products",
                get(|| async { Json(json!({"message": "Products fetched", "data": {"data": [{"name": "Serum", "price": 10.0}]}})) }),
            )
            .route(
                "/api/orders",
                get(|headers: HeaderMap| async move {
                    let auth = headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("")
                        .to_string();
                    Json(json!({"data": {"data": []}, "auth": auth}))
                }),
            )
            .route(
                "/api/expired",
                get(|| async {
                    (StatusCode::UNAUTHORIZED, Json(json!({"message": "Session has expired", "statusCode": 401})))
                }),
            )
            .route(
                "/api/missing/{id}",
                get(|Path(id): Path<String>| async move {
                    (StatusCode::NOT_FOUND, Json(json!({"message": format!("No item {id}"), "statusCode": 404})))
                }),
            )
            .route(
                "/api/users/login",
                axum::routing::post(|| async {
                    (StatusCode::UNAUTHORIZED, Json(json!({"error": "Invalid credentials"})))
                }),
            )
            .route(
                "/api/products/{id}",
                axum::routing::delete(|| async { "Product deleted" }),
            )
            .route(
                "/api/blogs/{id}",
                get(|| async { "<html>not json</html>" }),
            )
            .route(
                "/api/users/bare-login",
                axum::routing::post(|| async { StatusCode::UNAUTHORIZED }),
            )
            .route(
                "/api/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    Json(json!({}))
                }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Url::parse(&format!("http://{addr}")).unwrap()
    }

    fn transport(base: Url, navigator: Arc<InMemoryNavigator>) -> HttpTransport {
        let config = AppConfig {
            api_base_url: base,
            redirect_delay: Duration::from_millis(10),
            ..AppConfig::default()
        };
        HttpTransport::new(&config, Arc::new(MemoryTokenStore::with_token("secret")), navigator).unwrap()
    }

    #[tokio::test]
    async fn test_success_carries_message_and_body() {
        let navigator = Arc::new(InMemoryNavigator::new("/products"));
        let http = transport(spawn_api().await, navigator);

        let response = http.send(ApiRequest::get("/api/products")).await.unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.message.as_deref(), Some("Products fetched"));
        assert_eq!(response.body["data"]["data"][0]["name"], json!("Serum"));
    }

    #[tokio::test]
    async fn test_bearer_only_when_authorized() {
        let navigator = Arc::new(InMemoryNavigator::new("/orders"));
        let http = transport(spawn_api().await, navigator);

        let open = http.send(ApiRequest::get("/api/orders")).await.unwrap();
        assert_eq!(open.body["auth"], json!(""));

        let authed = http.send(ApiRequest::get("/api/orders").authorized(true)).await.unwrap();
        assert_eq!(authed.body["auth"], json!("Bearer secret"));
    }

    #[tokio::test]
    async fn test_api_error_keeps_server_message() {
        let navigator = Arc::new(InMemoryNavigator::new("/products"));
        let http = transport(spawn_api().await, navigator.clone());

        let err = http.send(ApiRequest::get("/api/missing/42")).await.unwrap_err();
        assert_eq!(
            err,
            TransportError::Api {
                status: 404,
                message: "No item 42".into(),
                body: json!({"message": "No item 42", "statusCode": 404}),
            }
        );
        assert!(!http.session().current_token().is_cancelled());
        assert!(navigator.redirects().is_empty());
    }

    #[tokio::test]
    async fn test_unchecked_401_is_plain_api_error() {
        let navigator = Arc::new(InMemoryNavigator::new("/login"));
        let http = transport(spawn_api().await, navigator.clone());

        let request = ApiRequest::post("/api/users/login", json!({"mobile": "1", "password": "x"})).without_session_check();
        let err = http.send(request).await.unwrap_err();
        assert_eq!(
            err,
            TransportError::Api {
                status: 401,
                message: "Invalid credentials".into(),
                body: json!({"error": "Invalid credentials"}),
            }
        );
        assert!(!http.session().current_token().is_cancelled());
        assert!(navigator.redirects().is_empty());
    }

    #[tokio::test]
    async fn test_session_expiry_cancels_in_flight_and_redirects() {
        let navigator = Arc::new(InMemoryNavigator::new("/orders"));
        let http = Arc::new(transport(spawn_api().await, navigator.clone()));

        let slow = {
            let http = Arc::clone(&http);
            tokio::spawn(async move { http.send(ApiRequest::get("/api/slow")).await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;

        let err = http.send(ApiRequest::get("/api/expired")).await.unwrap_err();
        assert_eq!(err, TransportError::SessionExpired { message: "Session has expired".into() });

        let slow = slow.await.unwrap();
        assert_eq!(slow, Err(TransportError::Cancelled { reason: "Session has expired".into() }));

        for _ in 0..50 {
            if navigator.current_path() == ROOT_PATH {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(navigator.redirects(), vec![ROOT_PATH.to_string()]);
        assert!(!http.session().current_token().is_cancelled());
    }

    #[tokio::test]
    async fn test_plain_text_delete_still_succeeds() {
        let navigator = Arc::new(InMemoryNavigator::new("/products"));
        let http: Arc<dyn Transport> = Arc::new(transport(spawn_api().await, navigator));

        let response = http.send(ApiRequest::delete("/api/products/p1")).await.unwrap();
        assert_eq!(response.body, json!("Product deleted"));

        let service = ResourceService::<Product>::new(http);
        assert_eq!(service.delete("p1").await, Ok(()));
    }

    #[tokio::test]
    async fn test_plain_text_item_is_decode_error() {
        let navigator = Arc::new(InMemoryNavigator::new("/blogs"));
        let http = transport(spawn_api().await, navigator);

        let response = http.send(ApiRequest::get("/api/blogs/b1")).await.unwrap();
        assert!(matches!(response.into_item::<Product>(), Err(TransportError::Decode(_))));
    }

    #[tokio::test]
    async fn test_empty_error_body_is_kept_as_null() {
        let navigator = Arc::new(InMemoryNavigator::new("/login"));
        let http = transport(spawn_api().await, navigator);

        let request = ApiRequest::post("/api/users/bare-login", json!({})).without_session_check();
        match http.send(request).await.unwrap_err() {
            TransportError::Api { status, message, body } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Unauthorized");
                assert_eq!(body, Value::Null);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        let navigator = Arc::new(InMemoryNavigator::new("/"));
        let http = transport(Url::parse("http://127.0.0.1:9").unwrap(), navigator);

        let err = http.send(ApiRequest::get("/api/products")).await.unwrap_err();
        assert!(matches!(err, TransportError::Network(_)));
    }

    #[test]
    fn test_url_keeps_base_prefix() {
        let navigator = Arc::new(InMemoryNavigator::new("/"));
        let http = transport(Url::parse("https://shop.test/admin/").unwrap(), navigator);
        assert_eq!(http.url_for("/api/blogs").unwrap().as_str(), "https://shop.test/admin/api/blogs");
    }
}
