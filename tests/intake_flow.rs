//! End-to-end tests for the intake wizard.
//!
//! The HTTP tests spin up an Axum server on a random port that plays the
//! outfit service, and drive the real `HttpOutfitService` against it.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;

use anna::config::CredentialMode;
use anna::error::ApiError;
use anna::intake::{IntakeController, Reply, Step, prompts};
use anna::outfits::{
    GenerateRequest, GenerateResponse, GenerationMode, HttpOutfitService, OutfitService, Palette,
    ServiceMeta,
};

const ANSWERS: [&str; 9] = [
    "wedding",
    "casual sportief",
    "male relaxed",
    "26-35",
    "nl",
    "300",
    "skip",
    "navy, wit",
    "skip",
];

/// Stub service that records generated requests (no network).
#[derive(Default)]
struct RecordingService {
    requests: Mutex<Vec<Value>>,
}

#[async_trait]
impl OutfitService for RecordingService {
    async fn meta(&self) -> Result<ServiceMeta, ApiError> {
        Ok(ServiceMeta::default())
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, ApiError> {
        self.requests
            .lock()
            .unwrap()
            .push(serde_json::to_value(request).unwrap());
        Ok(GenerateResponse {
            outfits: vec![],
            explanation: "stub".into(),
            palette: Palette::default(),
            independent_note: None,
            country: None,
            currency: None,
            allocation: Default::default(),
        })
    }
}

#[tokio::test]
async fn nine_answers_and_ja_generate_once() {
    let service = Arc::new(RecordingService::default());
    let mut controller =
        IntakeController::new(service.clone(), CredentialMode::ClientSupplied, None);

    assert_eq!(controller.step(), Step::Purpose);
    for (i, answer) in ANSWERS.iter().enumerate() {
        assert_eq!(controller.step().index(), i);
        let replies = controller.submit(answer).await;
        assert_eq!(replies.len(), 1, "one prompt after {answer:?}");
    }
    assert_eq!(controller.step().index(), 9);
    assert!(service.requests.lock().unwrap().is_empty());

    controller.submit("ja").await;

    let requests = service.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    let payload = &requests[0];
    assert_eq!(payload["intake"]["country"], "NL");
    assert_eq!(payload["intake"]["budget_total"], 300.0);
    assert_eq!(payload["intake"]["styles"], json!(["casual", "sportief"]));
    assert_eq!(payload["intake"]["favorite_colors"], json!(["navy", "wit"]));
    assert_eq!(payload["intake"]["sizes"], json!({}));
    assert_eq!(payload["mode"], "demo");
    assert_eq!(payload["serpapi_api_key"], Value::Null);
    assert_eq!(payload["outfits_count"], 3);
}

#[tokio::test]
async fn empty_submissions_never_prompt() {
    let service = Arc::new(RecordingService::default());
    let mut controller = IntakeController::new(service, CredentialMode::ServerSide, None);
    for answer in ANSWERS {
        let before = controller.session().record().clone();
        assert!(controller.submit("  ").await.is_empty());
        assert_eq!(controller.session().record(), &before);
        controller.submit(answer).await;
    }
    let step = controller.step();
    assert!(controller.submit("").await.is_empty());
    assert_eq!(controller.step(), step);
}

// ── HTTP contract ─────────────────────────────────────────────────────

#[derive(Clone, Default)]
struct FakeBackend {
    received: Arc<Mutex<Vec<Value>>>,
}

async fn meta_handler() -> Json<Value> {
    Json(json!({"has_serpapi": true, "environment": "dev", "version": "0.3.0"}))
}

async fn generate_handler(
    State(backend): State<FakeBackend>,
    Json(body): Json<Value>,
) -> Json<Value> {
    let country = body["intake"]["country"].clone();
    backend.received.lock().unwrap().push(body);
    Json(json!({
        "palette": {"colors": ["navy", "white", "grey", "black", "stone"]},
        "outfits": [{
            "name": "Outfit 1",
            "items": [{
                "category": "outer",
                "title": "Navy overshirt (demo)",
                "price": 55,
                "currency": "EUR",
                "link": "#",
                "image": null,
                "merchant": "demo"
            }],
            "total": 55,
            "currency": "EUR"
        }],
        "explanation": "Rustig palet.",
        "country": country,
        "currency": "EUR"
    }))
}

async fn failing_generate_handler() -> (StatusCode, Json<Value>) {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({"detail": "intake.styles invalid"})),
    )
}

/// Start an Axum server on a random port and return its base URL.
async fn start_server(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    format!("http://127.0.0.1:{port}")
}

fn http_service(base: &str) -> HttpOutfitService {
    HttpOutfitService::new(base, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn http_meta_and_generate_round_trip() {
    let backend = FakeBackend::default();
    let app = Router::new()
        .route("/api/meta", get(meta_handler))
        .route("/api/generate", post(generate_handler))
        .with_state(backend.clone());
    let base = start_server(app).await;

    let mut controller = IntakeController::new(
        Arc::new(http_service(&base)),
        CredentialMode::ServerSide,
        None,
    );
    assert!(controller.probe_capabilities().await);
    assert_eq!(controller.generation_mode(), GenerationMode::Serpapi);

    for answer in ANSWERS {
        controller.submit(answer).await;
    }
    let replies = controller.submit("ja").await;

    assert_eq!(replies[0], Reply::Text(prompts::GENERATING.to_string()));
    let Reply::Outfits(response) = &replies[1] else {
        panic!("expected outfits, got {replies:?}");
    };
    assert_eq!(response.outfits[0].items[0].price, 55.0);
    assert_eq!(response.country.as_deref(), Some("NL"));
    assert!(controller.is_complete());

    let received = backend.received.lock().unwrap();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0]["mode"], "serpapi");
    assert_eq!(received[0]["serpapi_api_key"], Value::Null);
}

#[tokio::test]
async fn http_error_detail_surfaces_in_api_error() {
    let app = Router::new().route("/api/generate", post(failing_generate_handler));
    let base = start_server(app).await;
    let service = http_service(&base);

    let request = GenerateRequest {
        intake: Default::default(),
        mode: GenerationMode::Demo,
        serpapi_api_key: None,
        outfits_count: 3,
    };
    let err = service.generate(&request).await.unwrap_err();
    match err {
        ApiError::Status { status, detail, .. } => {
            assert_eq!(status, 422);
            assert_eq!(detail, "intake.styles invalid");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn http_failure_parks_at_confirm() {
    let app = Router::new().route("/api/generate", post(failing_generate_handler));
    let base = start_server(app).await;

    let mut controller = IntakeController::new(
        Arc::new(http_service(&base)),
        CredentialMode::ClientSupplied,
        None,
    );
    // No /api/meta route: the probe 404s and fails open.
    assert!(!controller.probe_capabilities().await);
    assert_eq!(controller.generation_mode(), GenerationMode::Demo);

    for answer in ANSWERS {
        controller.submit(answer).await;
    }
    let replies = controller.submit("ja").await;
    assert_eq!(
        replies.last(),
        Some(&Reply::Text(prompts::GENERATION_FAILED.to_string()))
    );
    assert_eq!(controller.step(), Step::Confirm);
    assert!(!controller.is_complete());
}
