//! Single-in-flight analysis queries with stale-response protection.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::RwLock;

use crate::backend::{AnalysisBackend, AnalysisSurface};
use crate::case::{CaseResult, ResultItem};
use crate::error::Result;
use crate::validate;

/// Lifecycle of the current analysis request.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisStatus {
    Idle,
    Loading,
    Success,
    Failure(String),
}

/// What the analysis surface renders.
///
/// Results are kept alongside the status so a failed submission leaves the
/// previous result set visible.
#[derive(Debug, Clone)]
pub struct AnalysisView {
    pub status: AnalysisStatus,
    pub results: Vec<ResultItem>,
}

/// Whether a finished submission was applied or lost the race to a newer
/// one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionFate {
    Applied,
    Superseded,
}

/// Drives one analysis surface.
///
/// At most one request is meant to be in flight (the view layer disables
/// the trigger through [`is_loading`](Self::is_loading)), but overlap is
/// handled regardless: every submission takes the next generation number
/// and a response is applied only while its generation is still the
/// latest, so a slow stale response can never overwrite fresher state.
pub struct AnalysisCoordinator<B> {
    backend: Arc<B>,
    surface: AnalysisSurface,
    generation: AtomicU64,
    view: Arc<RwLock<AnalysisView>>,
}

impl<B: AnalysisBackend> AnalysisCoordinator<B> {
    pub fn new(backend: Arc<B>, surface: AnalysisSurface) -> Self {
        Self {
            backend,
            surface,
            generation: AtomicU64::new(0),
            view: Arc::new(RwLock::new(AnalysisView {
                status: AnalysisStatus::Idle,
                results: Vec::new(),
            })),
        }
    }

    pub fn surface(&self) -> AnalysisSurface {
        self.surface
    }

    /// Submits a free-form text query to this surface's endpoint.
    pub async fn submit_text(&self, query: &str, k: usize) -> Result<SubmissionFate> {
        validate::query(query)?;
        let generation = self.begin().await;
        let outcome = match self.surface {
            AnalysisSurface::SimilarCases => self.backend.similar_cases(query.trim(), k).await,
            AnalysisSurface::Precedents => {
                self.backend.precedent_cases(query.trim(), k, false).await
            }
        };
        Ok(self.finish(generation, outcome).await)
    }

    /// Submits an already-uploaded file for analysis.
    pub async fn submit_file(&self, file_id: i64, k: usize) -> Result<SubmissionFate> {
        let generation = self.begin().await;
        let outcome = self.backend.analyze_file(file_id, self.surface, k).await;
        Ok(self.finish(generation, outcome).await)
    }

    async fn begin(&self) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.view.write().await.status = AnalysisStatus::Loading;
        generation
    }

    async fn finish(&self, generation: u64, outcome: Result<Vec<CaseResult>>) -> SubmissionFate {
        let mut view = self.view.write().await;
        if generation != self.generation.load(Ordering::SeqCst) {
            tracing::debug!(
                "[Analysis] Discarding stale response for generation {}",
                generation
            );
            return SubmissionFate::Superseded;
        }

        match outcome {
            Ok(results) => {
                // Replace wholesale; expand/collapse state starts over.
                view.results = results.into_iter().map(ResultItem::collapsed).collect();
                view.status = AnalysisStatus::Success;
            }
            Err(e) => {
                // Prior results stay visible under the inline error.
                view.status = AnalysisStatus::Failure(e.to_string());
            }
        }
        SubmissionFate::Applied
    }

    pub async fn is_loading(&self) -> bool {
        self.view.read().await.status == AnalysisStatus::Loading
    }

    pub async fn view(&self) -> AnalysisView {
        self.view.read().await.clone()
    }

    /// Flips one result's expand/collapse flag. Touches nothing else and
    /// issues no network call.
    pub async fn toggle_expanded(&self, index: usize) {
        let mut view = self.view.write().await;
        if let Some(item) = view.results.get_mut(index) {
            item.expanded = !item.expanded;
        }
    }

    /// Drops the result set and returns to `Idle`.
    pub async fn clear(&self) {
        let mut view = self.view.write().await;
        view.results.clear();
        view.status = AnalysisStatus::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AdvocaError;
    use crate::judgment::JudgmentPrediction;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::Semaphore;

    fn case(id: &str, score: f64) -> CaseResult {
        CaseResult {
            case_id: id.to_string(),
            score: Some(score),
            final_score: None,
            title: None,
            court: None,
            text_sample: None,
            date: None,
            judges: None,
            parties: None,
            keywords: None,
        }
    }

    /// Backend that answers each query with a single case named after it,
    /// optionally holding a named query until released.
    struct MockAnalysisBackend {
        gate: Semaphore,
        gated_query: Option<String>,
        calls: AtomicUsize,
        fail_with: Option<String>,
    }

    impl MockAnalysisBackend {
        fn immediate() -> Self {
            Self {
                gate: Semaphore::new(0),
                gated_query: None,
                calls: AtomicUsize::new(0),
                fail_with: None,
            }
        }

        fn gating(query: &str) -> Self {
            Self {
                gated_query: Some(query.to_string()),
                ..Self::immediate()
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                fail_with: Some(message.to_string()),
                ..Self::immediate()
            }
        }

        fn release(&self) {
            self.gate.add_permits(1);
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl AnalysisBackend for MockAnalysisBackend {
        async fn similar_cases(&self, query: &str, _k: usize) -> Result<Vec<CaseResult>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.gated_query.as_deref() == Some(query) {
                let _permit = self.gate.acquire().await.unwrap();
            }
            if let Some(message) = &self.fail_with {
                return Err(AdvocaError::server(500, message.clone()));
            }
            Ok(vec![case(query, 0.9)])
        }

        async fn precedent_cases(
            &self,
            query: &str,
            k: usize,
            _explanation: bool,
        ) -> Result<Vec<CaseResult>> {
            self.similar_cases(query, k).await
        }

        async fn analyze_file(
            &self,
            file_id: i64,
            _surface: AnalysisSurface,
            _k: usize,
        ) -> Result<Vec<CaseResult>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![case(&format!("file-{file_id}"), 0.8)])
        }

        async fn predict_judgment(&self, _case_text: &str) -> Result<JudgmentPrediction> {
            unimplemented!("not exercised by these tests")
        }
    }

    fn coordinator(backend: MockAnalysisBackend) -> AnalysisCoordinator<MockAnalysisBackend> {
        AnalysisCoordinator::new(Arc::new(backend), AnalysisSurface::SimilarCases)
    }

    #[tokio::test]
    async fn test_success_replaces_results_collapsed() {
        let c = coordinator(MockAnalysisBackend::immediate());

        let fate = c.submit_text("first", 10).await.unwrap();
        assert_eq!(fate, SubmissionFate::Applied);

        c.toggle_expanded(0).await;
        assert!(c.view().await.results[0].expanded);

        c.submit_text("second", 10).await.unwrap();
        let view = c.view().await;
        assert_eq!(view.status, AnalysisStatus::Success);
        assert_eq!(view.results.len(), 1);
        assert_eq!(view.results[0].case.case_id, "second");
        // New result set starts collapsed.
        assert!(!view.results[0].expanded);
    }

    #[tokio::test]
    async fn test_stale_response_is_discarded() {
        let backend = Arc::new(MockAnalysisBackend::gating("slow"));
        let c = Arc::new(AnalysisCoordinator::new(
            backend.clone(),
            AnalysisSurface::SimilarCases,
        ));

        // A is submitted first and held open by the gate.
        let first = {
            let c = c.clone();
            tokio::spawn(async move { c.submit_text("slow", 10).await })
        };
        tokio::task::yield_now().await;
        while backend.call_count() == 0 {
            tokio::task::yield_now().await;
        }

        // B is submitted second and resolves immediately.
        let fate = c.submit_text("fast", 10).await.unwrap();
        assert_eq!(fate, SubmissionFate::Applied);

        // Now A resolves, after B; it must be discarded.
        backend.release();
        let fate = first.await.unwrap().unwrap();
        assert_eq!(fate, SubmissionFate::Superseded);

        let view = c.view().await;
        assert_eq!(view.status, AnalysisStatus::Success);
        assert_eq!(view.results[0].case.case_id, "fast");
    }

    #[tokio::test]
    async fn test_failure_keeps_prior_results_visible() {
        let c = coordinator(MockAnalysisBackend::immediate());
        c.submit_text("first", 10).await.unwrap();

        let failing = coordinator(MockAnalysisBackend::failing("SCR service not available"));
        // Seed the failing coordinator with a prior result set.
        {
            let mut view = failing.view.write().await;
            view.results = vec![ResultItem::collapsed(case("prior", 0.5))];
            view.status = AnalysisStatus::Success;
        }

        failing.submit_text("query", 10).await.unwrap();
        let view = failing.view().await;
        assert_eq!(
            view.status,
            AnalysisStatus::Failure("SCR service not available".to_string())
        );
        assert_eq!(view.results.len(), 1);
        assert_eq!(view.results[0].case.case_id, "prior");
    }

    #[tokio::test]
    async fn test_empty_query_is_rejected_locally() {
        let c = coordinator(MockAnalysisBackend::immediate());
        let err = c.submit_text("   ", 10).await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "Please enter a query");
        assert_eq!(c.backend.call_count(), 0);
        assert_eq!(c.view().await.status, AnalysisStatus::Idle);
    }

    #[tokio::test]
    async fn test_toggle_is_local_and_isolated() {
        let backend = Arc::new(MockAnalysisBackend::immediate());
        let c = AnalysisCoordinator::new(backend.clone(), AnalysisSurface::SimilarCases);

        // Seed three results through a real submission.
        {
            let mut view = c.view.write().await;
            view.results = vec![
                ResultItem::collapsed(case("c0", 0.3)),
                ResultItem::collapsed(case("c1", 0.2)),
                ResultItem::collapsed(case("c2", 0.1)),
            ];
            view.status = AnalysisStatus::Success;
        }
        let calls_before = backend.call_count();

        c.toggle_expanded(2).await;

        let view = c.view().await;
        assert!(!view.results[0].expanded);
        assert!(!view.results[1].expanded);
        assert!(view.results[2].expanded);
        // No network call was issued.
        assert_eq!(backend.call_count(), calls_before);

        c.toggle_expanded(2).await;
        assert!(!c.view().await.results[2].expanded);
    }

    #[tokio::test]
    async fn test_submit_file_routes_by_surface() {
        let c = coordinator(MockAnalysisBackend::immediate());
        c.submit_file(7, 10).await.unwrap();
        let view = c.view().await;
        assert_eq!(view.results[0].case.case_id, "file-7");
    }

    #[tokio::test]
    async fn test_clear_returns_to_idle() {
        let c = coordinator(MockAnalysisBackend::immediate());
        c.submit_text("first", 10).await.unwrap();
        c.clear().await;
        let view = c.view().await;
        assert_eq!(view.status, AnalysisStatus::Idle);
        assert!(view.results.is_empty());
    }
}
