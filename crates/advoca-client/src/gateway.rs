//! HTTP gateway to the advoca backend.

use std::sync::Arc;
use std::time::Duration;

use advoca_core::backend::{
    AnalysisBackend, AnalysisSurface, AuthBackend, AuthSuccess, FileBackend, ProgressSender,
};
use advoca_core::case::CaseResult;
use advoca_core::credentials::CredentialStore;
use advoca_core::error::{AdvocaError, Result};
use advoca_core::files::StoredFile;
use advoca_core::judgment::JudgmentPrediction;
use advoca_core::session::{SessionHandle, revoke_credentials};
use advoca_core::upload::{UploadReceipt, UploadSource};
use advoca_infrastructure::ConfigService;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::dto::{
    AnalyzeFileRequest, AuthResponse, ErrorBody, FilesResponse, HealthResponse, LoginRequest,
    PcrRequest, PredictRequest, ResultsResponse, ScrRequest, SignupRequest, UploadResponse,
};
use crate::upload_body;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// Retrieval and prediction endpoints run models server-side.
const ANALYSIS_TIMEOUT: Duration = Duration::from_secs(120);
const UPLOAD_TIMEOUT: Duration = Duration::from_secs(300);

const UNREACHABLE_MESSAGE: &str = "Unable to reach the server. Please try again.";
const GENERIC_FAILURE_MESSAGE: &str = "Request failed. Please try again.";

/// Single chokepoint for backend traffic.
///
/// Every authenticated request reads the bearer token live from the shared
/// session at send time, and every 401 response revokes the credentials and
/// terminates the session, whichever endpoint it came from. Login and
/// signup are the exception: they go out unauthenticated and a 401 there
/// means bad credentials, not an expired session.
pub struct ApiGateway {
    client: Client,
    base_url: String,
    session: SessionHandle,
    store: Arc<dyn CredentialStore>,
}

impl ApiGateway {
    pub fn new(
        base_url: impl Into<String>,
        session: SessionHandle,
        store: Arc<dyn CredentialStore>,
    ) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            session,
            store,
        }
    }

    /// Builds the gateway from the client configuration, honoring the
    /// `ADVOCA_API_URL` override.
    pub fn try_from_config(
        config: &ConfigService,
        session: SessionHandle,
        store: Arc<dyn CredentialStore>,
    ) -> Result<Self> {
        let env_override = std::env::var("ADVOCA_API_URL").ok();
        let base_url = config.get()?.resolve_base_url(env_override.as_deref());
        tracing::info!("[Gateway] Using backend at {}", base_url);
        Ok(Self::new(base_url, session, store))
    }

    /// The session this gateway authenticates from and terminates on 401.
    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// The token as of this call, not of gateway construction.
    async fn bearer(&self) -> Result<String> {
        self.session.token().await.ok_or(AdvocaError::Unauthorized)
    }

    /// Sends an authenticated request and applies the shared response
    /// policy: transport failures get a user-facing message, 401 revokes
    /// the session, other failures surface the backend's error body.
    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await.map_err(|e| {
            tracing::warn!("[Gateway] Request failed to send: {}", e);
            AdvocaError::transport(UNREACHABLE_MESSAGE)
        })?;

        if response.status() == StatusCode::UNAUTHORIZED {
            tracing::info!("[Gateway] Credentials rejected, terminating session");
            revoke_credentials(&self.session, self.store.as_ref()).await;
            return Err(AdvocaError::Unauthorized);
        }

        let status = response.status();
        if !status.is_success() {
            let message = Self::extract_error(response).await;
            return Err(AdvocaError::server(status.as_u16(), message));
        }

        Ok(response)
    }

    /// Sends an unauthenticated credential-exchange request. Any rejection
    /// here, 401 included, is about the submitted credentials and must not
    /// touch the current session.
    async fn post_credentials<B: Serialize>(&self, path: &str, body: &B) -> Result<Response> {
        let response = self
            .client
            .post(self.url(path))
            .timeout(REQUEST_TIMEOUT)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("[Gateway] Request failed to send: {}", e);
                AdvocaError::transport(UNREACHABLE_MESSAGE)
            })?;

        if !response.status().is_success() {
            let message = Self::extract_error(response).await;
            return Err(AdvocaError::auth(message));
        }

        Ok(response)
    }

    async fn post_json<B: Serialize>(
        &self,
        path: &str,
        body: &B,
        timeout: Duration,
    ) -> Result<Response> {
        let request = self
            .client
            .post(self.url(path))
            .timeout(timeout)
            .bearer_auth(self.bearer().await?)
            .json(body);
        self.send(request).await
    }

    async fn extract_error(response: Response) -> String {
        let raw = response.text().await.unwrap_or_default();
        serde_json::from_str::<ErrorBody>(&raw)
            .map(|body| body.error)
            .unwrap_or_else(|_| GENERIC_FAILURE_MESSAGE.to_string())
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        response
            .json::<T>()
            .await
            .map_err(|e| AdvocaError::serialization("json", e.to_string()))
    }

    /// Backend liveness probe.
    pub async fn health(&self) -> Result<HealthResponse> {
        let request = self
            .client
            .get(self.url("/health"))
            .timeout(REQUEST_TIMEOUT);
        let response = self.send(request).await?;
        Self::decode(response).await
    }
}

#[async_trait]
impl AuthBackend for ApiGateway {
    async fn login(&self, email: &str, password: &str) -> Result<AuthSuccess> {
        let response = self
            .post_credentials("/auth/login", &LoginRequest { email, password })
            .await?;
        let body: AuthResponse = Self::decode(response).await?;
        Ok(body.into_auth_success())
    }

    async fn signup(&self, email: &str, password: &str, name: &str) -> Result<AuthSuccess> {
        let response = self
            .post_credentials(
                "/auth/signup",
                &SignupRequest {
                    email,
                    password,
                    name,
                },
            )
            .await?;
        let body: AuthResponse = Self::decode(response).await?;
        Ok(body.into_auth_success())
    }

    async fn verify(&self) -> Result<()> {
        let request = self
            .client
            .get(self.url("/auth/verify"))
            .timeout(REQUEST_TIMEOUT)
            .bearer_auth(self.bearer().await?);
        self.send(request).await?;
        Ok(())
    }
}

#[async_trait]
impl FileBackend for ApiGateway {
    async fn upload(&self, source: &UploadSource, progress: ProgressSender) -> Result<UploadReceipt> {
        let part = upload_body::file_part(source, progress).await?;
        let form = reqwest::multipart::Form::new().part("file", part);
        let request = self
            .client
            .post(self.url("/upload"))
            .timeout(UPLOAD_TIMEOUT)
            .bearer_auth(self.bearer().await?)
            .multipart(form);
        let response = self.send(request).await?;
        let body: UploadResponse = Self::decode(response).await?;
        Ok(UploadReceipt {
            original_name: body
                .original_name
                .unwrap_or_else(|| source.file_name.clone()),
        })
    }

    async fn list_files(&self) -> Result<Vec<StoredFile>> {
        let request = self
            .client
            .get(self.url("/files"))
            .timeout(REQUEST_TIMEOUT)
            .bearer_auth(self.bearer().await?);
        let response = self.send(request).await?;
        let body: FilesResponse = Self::decode(response).await?;
        Ok(body.files)
    }
}

#[async_trait]
impl AnalysisBackend for ApiGateway {
    async fn similar_cases(&self, query: &str, k: usize) -> Result<Vec<CaseResult>> {
        let response = self
            .post_json("/scr", &ScrRequest { query, k }, ANALYSIS_TIMEOUT)
            .await?;
        let body: ResultsResponse = Self::decode(response).await?;
        Ok(body.results)
    }

    async fn precedent_cases(
        &self,
        query: &str,
        k: usize,
        explanation: bool,
    ) -> Result<Vec<CaseResult>> {
        let response = self
            .post_json(
                "/pcr",
                &PcrRequest {
                    query,
                    k,
                    explanation,
                },
                ANALYSIS_TIMEOUT,
            )
            .await?;
        let body: ResultsResponse = Self::decode(response).await?;
        Ok(body.results)
    }

    async fn analyze_file(
        &self,
        file_id: i64,
        surface: AnalysisSurface,
        k: usize,
    ) -> Result<Vec<CaseResult>> {
        let response = self
            .post_json(
                "/analyze-file",
                &AnalyzeFileRequest {
                    file_id,
                    analysis_type: surface.tag(),
                    k,
                },
                ANALYSIS_TIMEOUT,
            )
            .await?;
        let body: ResultsResponse = Self::decode(response).await?;
        Ok(body.results)
    }

    async fn predict_judgment(&self, case_text: &str) -> Result<JudgmentPrediction> {
        let response = self
            .post_json("/ljp/predict", &PredictRequest { case_text }, ANALYSIS_TIMEOUT)
            .await?;
        Self::decode(response).await
    }
}
