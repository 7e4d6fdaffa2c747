//! Router composition

use super::AppState;
use super::handlers::{create_session, get_session, health, next_turn, post_turn};
use axum::{
    Router,
    routing::{get, post},
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/v1/sessions", post(create_session))
        .route("/v1/sessions/{id}", get(get_session))
        .route("/v1/sessions/{id}/turns", post(post_turn))
        .route("/v1/interview/next-turn", post(next_turn))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::schema::RequestLimits;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use interview_application::{
        ConductInterviewUseCase, ConversationStore, GatewayError, GenerationRequest, LlmGateway,
        NextTurnUseCase, NoAccountService, NoReportGenerator, StoreError,
    };
    use interview_domain::{SessionId, Transcript, Turn};
    use serde_json::{Value, json};
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tower::ServiceExt;

    struct Canned {
        fail: AtomicBool,
    }

    #[async_trait]
    impl LlmGateway for Canned {
        fn name(&self) -> &str {
            "canned"
        }

        async fn generate(&self, request: &GenerationRequest) -> Result<String, GatewayError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(GatewayError::Timeout);
            }
            Ok(request.canned_text.clone())
        }
    }

    #[derive(Default)]
    struct Store {
        turns: Mutex<HashMap<String, Vec<Turn>>>,
        down: AtomicBool,
    }

    #[async_trait]
    impl ConversationStore for Store {
        async fn append_turn(&self, id: &SessionId, turn: &Turn) -> Result<(), StoreError> {
            if self.down.load(Ordering::SeqCst) {
                return Err(StoreError::Unavailable("down".to_string()));
            }
            self.turns
                .lock()
                .unwrap()
                .entry(id.to_string())
                .or_default()
                .push(turn.clone());
            Ok(())
        }

        async fn load_history(&self, id: &SessionId) -> Result<Transcript, StoreError> {
            if self.down.load(Ordering::SeqCst) {
                return Err(StoreError::Unavailable("down".to_string()));
            }
            Ok(self
                .turns
                .lock()
                .unwrap()
                .get(id.as_str())
                .cloned()
                .map(Transcript::from_turns)
                .unwrap_or_default())
        }
    }

    struct TestApp {
        router: Router,
        gateway: Arc<Canned>,
        store: Arc<Store>,
    }

    fn app() -> TestApp {
        let gateway = Arc::new(Canned {
            fail: AtomicBool::new(false),
        });
        let store = Arc::new(Store::default());
        let turns = Arc::new(NextTurnUseCase::new(
            gateway.clone(),
            Arc::new(NoAccountService),
            Arc::new(NoReportGenerator),
        ));
        let state = AppState {
            interview: Arc::new(ConductInterviewUseCase::new(turns.clone(), store.clone())),
            turns,
            limits: RequestLimits::default(),
        };
        TestApp {
            router: router(state),
            gateway,
            store,
        }
    }

    async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let response = router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    #[tokio::test]
    async fn test_health() {
        let app = app();
        let (status, body) = send(&app.router, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_session_flow() {
        let app = app();
        let (status, created) = send(&app.router, "POST", "/v1/sessions", None).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["stage"], "AWAITING_ENGAGEMENT");
        assert_eq!(created["done"], false);
        let id = created["session_id"].as_str().unwrap().to_string();

        let (status, turn) = send(
            &app.router,
            "POST",
            &format!("/v1/sessions/{}/turns", id),
            Some(json!({ "content": "yes let's go" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(turn["stage"], "DISCOVERY");

        let (status, session) =
            send(&app.router, "GET", &format!("/v1/sessions/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(session["transcript"].as_array().unwrap().len(), 3);
        assert_eq!(session["stage"], "DISCOVERY");
    }

    #[tokio::test]
    async fn test_unknown_session_is_404() {
        let app = app();
        let (status, body) = send(&app.router, "GET", "/v1/sessions/missing", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "not_found");
    }

    #[tokio::test]
    async fn test_malformed_and_oversized_bodies_are_422() {
        let app = app();
        let (_, created) = send(&app.router, "POST", "/v1/sessions", None).await;
        let uri = format!("/v1/sessions/{}/turns", created["session_id"].as_str().unwrap());

        let (status, body) =
            send(&app.router, "POST", &uri, Some(json!({ "text": "hi" }))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "malformed_request");

        let (status, body) = send(
            &app.router,
            "POST",
            &uri,
            Some(json!({ "content": "x".repeat(4001) })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "content_too_long");
    }

    #[tokio::test]
    async fn test_generation_failure_is_502_and_not_stored() {
        let app = app();
        let (_, created) = send(&app.router, "POST", "/v1/sessions", None).await;
        let id = created["session_id"].as_str().unwrap().to_string();
        app.gateway.fail.store(true, Ordering::SeqCst);

        let (status, body) = send(
            &app.router,
            "POST",
            &format!("/v1/sessions/{}/turns", id),
            Some(json!({ "content": "yes" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"], "generation_failed");

        let (_, session) = send(&app.router, "GET", &format!("/v1/sessions/{}", id), None).await;
        assert_eq!(session["transcript"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_store_failure_is_503() {
        let app = app();
        app.store.down.store(true, Ordering::SeqCst);
        let (status, body) = send(&app.router, "POST", "/v1/sessions", None).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], "store_unavailable");
    }

    #[tokio::test]
    async fn test_stateless_next_turn() {
        let app = app();
        let (status, body) = send(
            &app.router,
            "POST",
            "/v1/interview/next-turn",
            Some(json!({
                "history": [
                    { "role": "assistant", "content": "Hi, shall we start?" },
                    { "role": "user", "content": "sure" }
                ],
                "stage": "AWAITING_ENGAGEMENT"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["stage"], "DISCOVERY");
        assert!(body["utterance"].as_str().unwrap().contains("organisation"));
    }

    #[tokio::test]
    async fn test_stateless_stage_mismatch_is_409() {
        let app = app();
        let (status, body) = send(
            &app.router,
            "POST",
            "/v1/interview/next-turn",
            Some(json!({
                "history": [
                    { "role": "assistant", "content": "Hi" },
                    { "role": "user", "content": "sure" }
                ],
                "stage": "SCOPING"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "stage_mismatch");
    }

    #[tokio::test]
    async fn test_empty_history_with_later_stage_is_409() {
        let app = app();
        let (status, body) = send(
            &app.router,
            "POST",
            "/v1/interview/next-turn",
            Some(json!({ "history": [], "stage": "INTERVIEW_Q2" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "stage_mismatch");
    }
}
