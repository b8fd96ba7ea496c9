use abide_core::ai::{AiRequest, AiResponse};
use abide_core::{ScriptureProvider, TextGenerator};
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::{AppState, ErrorBody};

/// `POST /api/ai` with `{"action": ..., "payload": {...}}`.
///
/// Malformed envelopes and unknown actions are 400. Without an API key the
/// unavailable message is returned as a normal result. Generator failures
/// are 500.
pub async fn ai_handler<G, P>(State(state): State<AppState<G, P>>, body: Bytes) -> Response
where
    G: TextGenerator + 'static,
    P: ScriptureProvider + 'static,
{
    let request: AiRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            tracing::debug!("Rejected AI request body: {}", e);
            return (StatusCode::BAD_REQUEST, ErrorBody::new("Missing action or payload"))
                .into_response();
        }
    };

    let (action, payload) = match request.validate() {
        Ok(valid) => valid,
        Err(e) => return (StatusCode::BAD_REQUEST, ErrorBody::new(e)).into_response(),
    };

    match state.ai.run(action, &payload).await {
        Ok(result) => Json(AiResponse::Result { result }).into_response(),
        Err(e) if e.is_client_error() => {
            (StatusCode::BAD_REQUEST, ErrorBody::new(e)).into_response()
        }
        Err(e) => {
            tracing::error!("AI action {} failed: {}", action, e);
            (StatusCode::INTERNAL_SERVER_ERROR, ErrorBody::new(e)).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{send, FakeGenerator, FakeScripture};
    use super::super::{router, AppState};
    use abide_core::ai::UNAVAILABLE_MESSAGE;
    use abide_core::AiService;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::Router;
    use serde_json::{json, Value};

    fn app(service: AiService<FakeGenerator>) -> Router {
        router(AppState::new(service, FakeScripture::default()))
    }

    fn replying(reply: &str) -> Router {
        app(AiService::new(FakeGenerator {
            reply: Some(reply.to_string()),
        }))
    }

    fn post(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_situational_prayer_result() {
        let request = post(
            "/api/ai",
            json!({"action": "situationalPrayer", "payload": {"situation": "明天考試"}}),
        );

        let (status, body) = send(replying("主啊，求你賜平安"), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"result": "主啊，求你賜平安"}));
    }

    #[tokio::test]
    async fn test_alias_route() {
        let request = post(
            "/api/aiHandler",
            json!({"action": "smallGroupTopics", "payload": {"scripture": "雅各書 1"}}),
        );

        let (status, body) = send(replying(r#"["試煉", "智慧"]"#), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"], json!(["試煉", "智慧"]));
    }

    #[tokio::test]
    async fn test_missing_payload_is_bad_request() {
        let request = post("/api/ai", json!({"action": "quickRead"}));

        let (status, body) = send(replying("unused"), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_unknown_action_is_bad_request() {
        let request = post("/api/ai", json!({"action": "sermonWriter", "payload": {}}));

        let (status, body) = send(replying("unused"), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Unknown action: sermonWriter");
    }

    #[tokio::test]
    async fn test_non_json_body_is_bad_request() {
        let request = Request::post("/api/ai").body(Body::from("not json")).unwrap();

        let (status, _) = send(replying("unused"), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_without_key_returns_unavailable_text() {
        let request = post(
            "/api/ai",
            json!({"action": "quickRead", "payload": {"userInput": "詩篇 23"}}),
        );

        let (status, body) = send(app(AiService::unavailable()), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"], UNAVAILABLE_MESSAGE);
    }

    #[tokio::test]
    async fn test_unavailable_still_validates_envelope() {
        let request = post("/api/ai", json!({"payload": {}}));

        let (status, _) = send(app(AiService::unavailable()), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_generator_failure_is_server_error() {
        let failing = app(AiService::new(FakeGenerator { reply: None }));
        let request = post(
            "/api/ai",
            json!({"action": "scriptureAnalysis", "payload": {"book": "詩篇", "chapter": 23}}),
        );

        let (status, body) = send(failing, request).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().contains("model overloaded"));
    }
}
