//! Backend service contracts.
//!
//! These traits are the seam between the client's state machines and the
//! HTTP layer: `advoca-client` implements them over the request gateway,
//! tests implement them in memory. Nothing in this crate opens a socket.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::case::CaseResult;
use crate::error::Result;
use crate::files::StoredFile;
use crate::judgment::JudgmentPrediction;
use crate::upload::{UploadReceipt, UploadSource};
use crate::user::UserProfile;

/// Token and profile returned by a successful login or signup.
#[derive(Debug, Clone)]
pub struct AuthSuccess {
    pub token: String,
    pub user: UserProfile,
}

/// Sender half of a per-transfer progress stream.
///
/// Values are fractions in `[0, 1]`; the stream is finite and ends when the
/// transfer resolves. Receivers treat it as best-effort.
pub type ProgressSender = mpsc::UnboundedSender<f32>;

/// Authentication operations.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<AuthSuccess>;
    async fn signup(&self, email: &str, password: &str, name: &str) -> Result<AuthSuccess>;
    /// Checks the current bearer token against the backend.
    async fn verify(&self) -> Result<()>;
}

/// File transfer and listing operations.
#[async_trait]
pub trait FileBackend: Send + Sync {
    /// Transfers one file, reporting progress through `progress`.
    async fn upload(&self, source: &UploadSource, progress: ProgressSender)
    -> Result<UploadReceipt>;

    /// Fetches the authoritative uploaded-files list.
    async fn list_files(&self) -> Result<Vec<StoredFile>>;
}

/// Which retrieval endpoint an analysis query is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisSurface {
    SimilarCases,
    Precedents,
}

impl AnalysisSurface {
    /// Tag understood by the generic analyze-file endpoint.
    pub fn tag(&self) -> &'static str {
        match self {
            AnalysisSurface::SimilarCases => "scr",
            AnalysisSurface::Precedents => "pcr",
        }
    }
}

/// Analysis query operations.
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    async fn similar_cases(&self, query: &str, k: usize) -> Result<Vec<CaseResult>>;

    async fn precedent_cases(
        &self,
        query: &str,
        k: usize,
        explanation: bool,
    ) -> Result<Vec<CaseResult>>;

    /// Runs retrieval over an already-uploaded file.
    async fn analyze_file(
        &self,
        file_id: i64,
        surface: AnalysisSurface,
        k: usize,
    ) -> Result<Vec<CaseResult>>;

    /// Predicts the judgment outcome for raw case text.
    async fn predict_judgment(&self, case_text: &str) -> Result<JudgmentPrediction>;
}
