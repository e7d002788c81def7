use actix_cors::Cors;
use actix_web::{App, HttpServer, Responder, Result, post, web};
use std::sync::Arc;
use tracing_subscriber::fmt;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use chat_relay::config::Settings;
use chat_relay::error::ApiError;
use chat_relay::fetcher::{GenAiBackend, ResponseFetcher, RetryPolicy};
use chat_relay::{ChatRequest, ChatResponse, ErrorResponse};

/// Shared per-worker state: the fetcher holds the provider client and the
/// retry policy, nothing else. Requests share no mutable state.
struct AppState {
    fetcher: ResponseFetcher,
}

#[utoipa::path(
    post,
    path = "/chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Generated reply or fallback text", body = ChatResponse),
        (status = 400, description = "Missing or empty message", body = ErrorResponse)
    )
)]
#[post("/chat")]
async fn chat(
    state: web::Data<AppState>,
    req: web::Json<ChatRequest>,
) -> Result<impl Responder, ApiError> {
    let request = req.into_inner();
    tracing::debug!(?request, "Received chat request");

    let Some(message) = request.message() else {
        tracing::warn!("Rejected chat request: no message provided");
        return Err(ApiError::bad_request("No message provided"));
    };

    let response = state.fetcher.fetch_response(message).await;

    Ok(web::Json(ChatResponse { response }))
}

#[derive(OpenApi)]
#[openapi(paths(chat), components(schemas(ChatRequest, ChatResponse, ErrorResponse)))]
struct ApiDoc;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    fmt().with_max_level(tracing::Level::INFO).init();

    dotenvy::dotenv().ok();

    let settings = Settings::from_env()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

    let backend = GenAiBackend::new(settings.model.clone(), settings.api_key.clone());
    let fetcher = ResponseFetcher::new(Arc::new(backend), RetryPolicy::default());
    let state = web::Data::new(AppState { fetcher });

    tracing::info!(
        port = settings.port,
        model = %settings.model,
        "Starting server, Swagger UI at /swagger-ui/"
    );

    let allowed_origins = settings.allowed_origins.clone();

    HttpServer::new(move || {
        let mut cors = Cors::default()
            .allowed_methods(vec!["POST"])
            .allowed_header(actix_web::http::header::CONTENT_TYPE);
        for origin in &allowed_origins {
            cors = cors.allowed_origin(origin);
        }

        App::new().app_data(state.clone()).wrap(cors).service(chat).service(
            SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-doc/openapi.json", ApiDoc::openapi()),
        )
    })
    .bind(("0.0.0.0", settings.port))?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use async_trait::async_trait;
    use chat_relay::error::ProviderError;
    use chat_relay::fetcher::{CompletionBackend, FALLBACK_RESPONSE};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Backend returning the same result on every call, counting calls.
    struct FixedBackend {
        reply: Result<String, ProviderError>,
        calls: AtomicUsize,
    }

    impl FixedBackend {
        fn ok(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                reply: Err(ProviderError::Fatal("connection refused".to_string())),
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CompletionBackend for FixedBackend {
        async fn complete(
            &self,
            _user_message: &str,
        ) -> Result<String, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply.clone()
        }
    }

    fn state_with(backend: &Arc<FixedBackend>) -> web::Data<AppState> {
        let fetcher = ResponseFetcher::new(
            Arc::clone(backend) as Arc<dyn CompletionBackend>,
            RetryPolicy::default(),
        );
        web::Data::new(AppState { fetcher })
    }

    #[actix_web::test]
    async fn test_chat_returns_generated_reply() {
        let backend = Arc::new(FixedBackend::ok("That sounds really hard. You are not alone."));
        let app = test::init_service(App::new().app_data(state_with(&backend)).service(chat)).await;

        let req = test::TestRequest::post()
            .uri("/chat")
            .set_json(serde_json::json!({"content": "I feel anxious today"}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);

        let body: ChatResponse = test::read_body_json(resp).await;
        assert!(!body.response.is_empty());
        assert_eq!(body.response, "That sounds really hard. You are not alone.");
        assert_eq!(backend.calls(), 1);
    }

    #[actix_web::test]
    async fn test_missing_content_rejected_without_provider_call() {
        let backend = Arc::new(FixedBackend::ok("unused"));
        let app = test::init_service(App::new().app_data(state_with(&backend)).service(chat)).await;

        let req = test::TestRequest::post()
            .uri("/chat")
            .set_json(serde_json::json!({}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body, serde_json::json!({"error": "No message provided"}));
        assert_eq!(backend.calls(), 0);
    }

    #[actix_web::test]
    async fn test_empty_content_rejected_without_provider_call() {
        let backend = Arc::new(FixedBackend::ok("unused"));
        let app = test::init_service(App::new().app_data(state_with(&backend)).service(chat)).await;

        let req = test::TestRequest::post()
            .uri("/chat")
            .set_json(serde_json::json!({"content": ""}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body, serde_json::json!({"error": "No message provided"}));
        assert_eq!(backend.calls(), 0);
    }

    #[actix_web::test]
    async fn test_provider_failure_returns_fallback_with_200() {
        let backend = Arc::new(FixedBackend::failing());
        let app = test::init_service(App::new().app_data(state_with(&backend)).service(chat)).await;

        let req = test::TestRequest::post()
            .uri("/chat")
            .set_json(serde_json::json!({"content": "hello"}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);

        let body: ChatResponse = test::read_body_json(resp).await;
        assert_eq!(body.response, FALLBACK_RESPONSE);
    }
}
