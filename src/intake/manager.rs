//! IntakeController: drives an `IntakeSession` and performs the terminal
//! generation call against the outfit service.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};

use crate::config::{CredentialMode, OUTFITS_COUNT};
use crate::outfits::{GenerateRequest, GenerateResponse, GenerationMode, OutfitService};

use super::model::IntakeRecord;
use super::prompts;
use super::session::{IntakeSession, SessionStatus, SubmitOutcome};
use super::state::Step;

/// Something Anna shows in response to a submission.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Text(String),
    /// A generation result for the display layer to render.
    Outfits(GenerateResponse),
}

impl Reply {
    fn text(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

/// Coordinates the wizard: session state, credential policy, and the
/// outfit service.
pub struct IntakeController {
    session: IntakeSession,
    service: Arc<dyn OutfitService>,
    credential_mode: CredentialMode,
    client_key: Option<SecretString>,
    server_has_key: bool,
}

impl IntakeController {
    pub fn new(
        service: Arc<dyn OutfitService>,
        credential_mode: CredentialMode,
        client_key: Option<SecretString>,
    ) -> Self {
        Self {
            session: IntakeSession::new(),
            service,
            credential_mode,
            client_key,
            server_has_key: false,
        }
    }

    pub fn session(&self) -> &IntakeSession {
        &self.session
    }

    pub fn step(&self) -> Step {
        self.session.step()
    }

    pub fn is_complete(&self) -> bool {
        self.session.status() == SessionStatus::Complete
    }

    /// Ask the service whether it holds its own search key.
    ///
    /// Any failure counts as "no"; the wizard never waits on this.
    pub async fn probe_capabilities(&mut self) -> bool {
        self.server_has_key = match self.service.meta().await {
            Ok(meta) => meta.has_serpapi,
            Err(e) => {
                tracing::debug!("Capability probe failed, assuming no server key: {}", e);
                false
            }
        };
        self.server_has_key
    }

    /// The client key that goes on the wire, honoring the credential mode.
    fn effective_client_key(&self) -> Option<&str> {
        match self.credential_mode {
            CredentialMode::ServerSide => None,
            CredentialMode::ClientSupplied => self
                .client_key
                .as_ref()
                .map(|k| k.expose_secret())
                .filter(|k| !k.is_empty()),
        }
    }

    pub fn generation_mode(&self) -> GenerationMode {
        if self.effective_client_key().is_some() || self.server_has_key {
            GenerationMode::Serpapi
        } else {
            GenerationMode::Demo
        }
    }

    /// Replace the client key after the user saved new settings.
    pub fn set_client_key(&mut self, key: Option<SecretString>) {
        self.client_key = key;
    }

    /// Point at a different service, e.g. after the API base changed.
    pub fn set_service(&mut self, service: Arc<dyn OutfitService>) {
        self.service = service;
    }

    /// Process one user message and return what Anna says back.
    pub async fn submit(&mut self, text: &str) -> Vec<Reply> {
        match self.session.submit(text) {
            SubmitOutcome::Ignored => Vec::new(),
            SubmitOutcome::Advanced { prompt, .. } => prompt.map(Reply::text).into_iter().collect(),
            SubmitOutcome::Declined { reprompt } => vec![Reply::text(reprompt)],
            SubmitOutcome::Confirmed(record) => self.generate(record).await,
        }
    }

    fn build_request(&self, intake: IntakeRecord) -> GenerateRequest {
        GenerateRequest {
            intake,
            mode: self.generation_mode(),
            serpapi_api_key: self.effective_client_key().map(str::to_string),
            outfits_count: OUTFITS_COUNT,
        }
    }

    async fn generate(&mut self, record: IntakeRecord) -> Vec<Reply> {
        self.session.note(prompts::GENERATING);
        let mut replies = vec![Reply::text(prompts::GENERATING)];

        let request = self.build_request(record);
        tracing::info!(
            session = %self.session.id(),
            mode = %request.mode,
            country = %request.intake.country,
            "Generating outfits"
        );

        match self.service.generate(&request).await {
            Ok(response) => {
                tracing::info!(
                    session = %self.session.id(),
                    outfits = response.outfits.len(),
                    "Outfits generated"
                );
                self.session.finish_generation(true);
                self.session.note(&response.explanation);
                replies.push(Reply::Outfits(response));
            }
            Err(e) => {
                tracing::warn!(session = %self.session.id(), "Outfit generation failed: {}", e);
                self.session.finish_generation(false);
                self.session.note(prompts::GENERATION_FAILED);
                replies.push(Reply::text(prompts::GENERATION_FAILED));
            }
        }
        replies
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::error::ApiError;
    use crate::outfits::{Palette, ServiceMeta};

    /// Stub service recording every request it receives.
    struct StubService {
        has_serpapi: Option<bool>,
        fail_generate: bool,
        requests: Mutex<Vec<GenerateRequest>>,
    }

    impl StubService {
        fn new(has_serpapi: Option<bool>, fail_generate: bool) -> Arc<Self> {
            Arc::new(Self {
                has_serpapi,
                fail_generate,
                requests: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl OutfitService for StubService {
        async fn meta(&self) -> Result<ServiceMeta, ApiError> {
            match self.has_serpapi {
                Some(has_serpapi) => Ok(ServiceMeta {
                    has_serpapi,
                    ..Default::default()
                }),
                None => Err(ApiError::RequestFailed {
                    endpoint: "/api/meta".into(),
                    reason: "connection refused".into(),
                }),
            }
        }

        async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, ApiError> {
            self.requests.lock().unwrap().push(request.clone());
            if self.fail_generate {
                return Err(ApiError::Status {
                    endpoint: "/api/generate".into(),
                    status: 500,
                    detail: "boom".into(),
                });
            }
            Ok(GenerateResponse {
                outfits: vec![],
                explanation: "stub".into(),
                palette: Palette::default(),
                independent_note: None,
                country: Some(request.intake.country.clone()),
                currency: None,
                allocation: Default::default(),
            })
        }
    }

    async fn answer_all(controller: &mut IntakeController) {
        for answer in [
            "werk", "klassiek", "skip", "36-45", "be", "400", "skip", "skip", "skip",
        ] {
            controller.submit(answer).await;
        }
        assert_eq!(controller.step(), Step::Confirm);
    }

    #[tokio::test]
    async fn probe_failure_means_demo() {
        let stub = StubService::new(None, false);
        let mut controller = IntakeController::new(stub, CredentialMode::ServerSide, None);
        assert!(!controller.probe_capabilities().await);
        assert_eq!(controller.generation_mode(), GenerationMode::Demo);
    }

    #[tokio::test]
    async fn server_key_means_serpapi() {
        let stub = StubService::new(Some(true), false);
        let mut controller = IntakeController::new(stub, CredentialMode::ServerSide, None);
        controller.probe_capabilities().await;
        assert_eq!(controller.generation_mode(), GenerationMode::Serpapi);
    }

    #[tokio::test]
    async fn server_side_mode_never_sends_client_key() {
        let stub = StubService::new(Some(false), false);
        let mut controller = IntakeController::new(
            stub.clone(),
            CredentialMode::ServerSide,
            Some(SecretString::from("client-key".to_string())),
        );
        controller.probe_capabilities().await;
        assert_eq!(controller.generation_mode(), GenerationMode::Demo);

        answer_all(&mut controller).await;
        controller.submit("ja").await;

        let requests = stub.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].serpapi_api_key.is_none());
    }

    #[tokio::test]
    async fn client_mode_sends_stored_key() {
        let stub = StubService::new(Some(false), false);
        let mut controller = IntakeController::new(
            stub.clone(),
            CredentialMode::ClientSupplied,
            Some(SecretString::from("client-key".to_string())),
        );
        answer_all(&mut controller).await;
        controller.submit("ja").await;

        let requests = stub.requests.lock().unwrap();
        assert_eq!(requests[0].mode, GenerationMode::Serpapi);
        assert_eq!(requests[0].serpapi_api_key.as_deref(), Some("client-key"));
        assert_eq!(requests[0].outfits_count, 3);
    }

    #[tokio::test]
    async fn failure_apologises_and_allows_retry() {
        let stub = StubService::new(Some(false), true);
        let mut controller = IntakeController::new(stub.clone(), CredentialMode::ClientSupplied, None);
        answer_all(&mut controller).await;

        let replies = controller.submit("ja").await;
        assert_eq!(
            replies,
            vec![
                Reply::text(prompts::GENERATING),
                Reply::text(prompts::GENERATION_FAILED)
            ]
        );
        assert_eq!(controller.step(), Step::Confirm);
        assert!(!controller.is_complete());

        controller.submit("ja").await;
        assert_eq!(stub.requests.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn success_completes_session() {
        let stub = StubService::new(Some(false), false);
        let mut controller = IntakeController::new(stub.clone(), CredentialMode::ClientSupplied, None);
        answer_all(&mut controller).await;

        let replies = controller.submit("Ja").await;
        assert_eq!(replies.len(), 2);
        assert!(matches!(&replies[1], Reply::Outfits(r) if r.country.as_deref() == Some("BE")));
        assert!(controller.is_complete());

        assert!(controller.submit("ja").await.is_empty());
        assert_eq!(stub.requests.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn decline_reprompts_without_calling_service() {
        let stub = StubService::new(Some(false), false);
        let mut controller = IntakeController::new(stub.clone(), CredentialMode::ClientSupplied, None);
        answer_all(&mut controller).await;

        let replies = controller.submit("nee").await;
        assert_eq!(replies, vec![Reply::text(prompts::CONFIRM_AGAIN)]);
        assert!(stub.requests.lock().unwrap().is_empty());
    }
}
