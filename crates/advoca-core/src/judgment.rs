//! Judgment prediction over free-form case text.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::backend::AnalysisBackend;
use crate::error::Result;
use crate::validate;

/// Evidence the model leaned on for one neighbor case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceCase {
    pub case_id: String,
    pub similarity: f64,
    pub snippet: String,
}

/// Optional breakdown of how neighbor cases shifted the prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JudgmentExplanation {
    pub prob_without_neighbors: f64,
    pub neighbor_influence: f64,
    #[serde(default)]
    pub evidence: Vec<EvidenceCase>,
}

/// The model's verdict for a case text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JudgmentPrediction {
    pub prediction: String,
    pub probability: f64,
    #[serde(default)]
    pub explanation: Option<JudgmentExplanation>,
}

/// Lifecycle of the current prediction request.
#[derive(Debug, Clone, PartialEq)]
pub enum JudgmentStatus {
    Idle,
    Loading,
    Success(JudgmentPrediction),
    Failure(String),
}

/// Whether a finished prediction was applied or superseded by a newer one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredictionFate {
    Applied,
    Superseded,
}

/// Drives the judgment-prediction surface.
///
/// Same stale-response discipline as the analysis coordinator: each
/// submission takes a generation number and only the latest generation may
/// write its outcome back.
pub struct JudgmentPredictor<B> {
    backend: Arc<B>,
    generation: AtomicU64,
    status: Arc<RwLock<JudgmentStatus>>,
}

impl<B: AnalysisBackend> JudgmentPredictor<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            backend,
            generation: AtomicU64::new(0),
            status: Arc::new(RwLock::new(JudgmentStatus::Idle)),
        }
    }

    /// Submits case text for prediction.
    pub async fn submit(&self, case_text: &str) -> Result<PredictionFate> {
        validate::case_text(case_text)?;

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        *self.status.write().await = JudgmentStatus::Loading;

        let outcome = self.backend.predict_judgment(case_text.trim()).await;

        let mut status = self.status.write().await;
        if generation != self.generation.load(Ordering::SeqCst) {
            tracing::debug!(
                "[Judgment] Discarding stale prediction for generation {}",
                generation
            );
            return Ok(PredictionFate::Superseded);
        }

        *status = match outcome {
            Ok(prediction) => JudgmentStatus::Success(prediction),
            Err(e) => JudgmentStatus::Failure(e.to_string()),
        };
        Ok(PredictionFate::Applied)
    }

    pub async fn is_loading(&self) -> bool {
        *self.status.read().await == JudgmentStatus::Loading
    }

    pub async fn status(&self) -> JudgmentStatus {
        self.status.read().await.clone()
    }

    /// Drops the current prediction and returns to `Idle`.
    pub async fn clear(&self) {
        *self.status.write().await = JudgmentStatus::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::AnalysisSurface;
    use crate::case::CaseResult;
    use crate::error::AdvocaError;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;

    struct MockJudgmentBackend {
        result: Result<JudgmentPrediction>,
        calls: AtomicUsize,
    }

    impl MockJudgmentBackend {
        fn predicting(prediction: &str, probability: f64) -> Self {
            Self {
                result: Ok(JudgmentPrediction {
                    prediction: prediction.to_string(),
                    probability,
                    explanation: None,
                }),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                result: Err(AdvocaError::server(503, message)),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl AnalysisBackend for MockJudgmentBackend {
        async fn similar_cases(&self, _query: &str, _k: usize) -> Result<Vec<CaseResult>> {
            unimplemented!("not exercised by these tests")
        }

        async fn precedent_cases(
            &self,
            _query: &str,
            _k: usize,
            _explanation: bool,
        ) -> Result<Vec<CaseResult>> {
            unimplemented!("not exercised by these tests")
        }

        async fn analyze_file(
            &self,
            _file_id: i64,
            _surface: AnalysisSurface,
            _k: usize,
        ) -> Result<Vec<CaseResult>> {
            unimplemented!("not exercised by these tests")
        }

        async fn predict_judgment(&self, _case_text: &str) -> Result<JudgmentPrediction> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone()
        }
    }

    #[tokio::test]
    async fn test_successful_prediction() {
        let predictor = JudgmentPredictor::new(Arc::new(MockJudgmentBackend::predicting(
            "plaintiff", 0.82,
        )));

        let fate = predictor.submit("The plaintiff alleges breach of contract.").await.unwrap();
        assert_eq!(fate, PredictionFate::Applied);

        match predictor.status().await {
            JudgmentStatus::Success(prediction) => {
                assert_eq!(prediction.prediction, "plaintiff");
                assert_eq!(prediction.probability, 0.82);
            }
            other => panic!("unexpected status: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_failure_is_surfaced_inline() {
        let predictor =
            JudgmentPredictor::new(Arc::new(MockJudgmentBackend::failing("LJP service not available")));

        predictor.submit("Some case text").await.unwrap();
        assert_eq!(
            predictor.status().await,
            JudgmentStatus::Failure("LJP service not available".to_string())
        );
    }

    #[tokio::test]
    async fn test_empty_text_is_rejected_locally() {
        let backend = Arc::new(MockJudgmentBackend::predicting("plaintiff", 0.5));
        let predictor = JudgmentPredictor::new(backend.clone());

        let err = predictor.submit("   ").await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
        assert_eq!(predictor.status().await, JudgmentStatus::Idle);
    }

    #[tokio::test]
    async fn test_clear_returns_to_idle() {
        let predictor = JudgmentPredictor::new(Arc::new(MockJudgmentBackend::predicting(
            "defendant", 0.6,
        )));
        predictor.submit("Case text").await.unwrap();
        predictor.clear().await;
        assert_eq!(predictor.status().await, JudgmentStatus::Idle);
    }

    #[test]
    fn test_prediction_deserializes_with_and_without_explanation() {
        let bare: JudgmentPrediction =
            serde_json::from_str(r#"{"prediction": "plaintiff", "probability": 0.7}"#).unwrap();
        assert_eq!(bare.explanation, None);

        let full: JudgmentPrediction = serde_json::from_str(
            r#"{
                "prediction": "defendant",
                "probability": 0.35,
                "explanation": {
                    "prob_without_neighbors": 0.5,
                    "neighbor_influence": -0.15,
                    "evidence": [
                        {"case_id": "C-12", "similarity": 0.91, "snippet": "..."}
                    ]
                }
            }"#,
        )
        .unwrap();
        let explanation = full.explanation.unwrap();
        assert_eq!(explanation.evidence.len(), 1);
        assert_eq!(explanation.evidence[0].case_id, "C-12");
    }
}
