//! Wire-format request and response bodies.

use advoca_core::case::CaseResult;
use advoca_core::files::StoredFile;
use advoca_core::backend::AuthSuccess;
use advoca_core::user::UserProfile;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct SignupRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub name: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AuthResponse {
    pub token: String,
    pub user: UserProfile,
}

impl AuthResponse {
    pub fn into_auth_success(self) -> AuthSuccess {
        AuthSuccess {
            token: self.token,
            user: self.user,
        }
    }
}

/// Error envelope the backend uses for every failure body.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UploadResponse {
    #[serde(default)]
    pub original_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FilesResponse {
    pub files: Vec<StoredFile>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ScrRequest<'a> {
    pub query: &'a str,
    pub k: usize,
}

#[derive(Debug, Serialize)]
pub(crate) struct PcrRequest<'a> {
    pub query: &'a str,
    pub k: usize,
    pub explanation: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct AnalyzeFileRequest<'a> {
    pub file_id: i64,
    #[serde(rename = "type")]
    pub analysis_type: &'a str,
    pub k: usize,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResultsResponse {
    #[serde(default)]
    pub results: Vec<CaseResult>,
}

#[derive(Debug, Serialize)]
pub(crate) struct PredictRequest<'a> {
    pub case_text: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}
