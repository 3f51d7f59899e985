//! HTTP client for the Career Copilot backend.
//!
//! All backend traffic goes through [`ApiClient`]:
//! - catalog lookups (professions, role skills, skill suggestions)
//! - resume analysis via multipart upload
//! - plan and focused-plan generation
//! - the startup health probe
//!
//! Every call except the health probe takes a [`CancelToken`] and
//! resolves to [`ClientError::Cancelled`] once its handle fires, so
//! screens can abandon requests without waiting them out.

use serde::Deserialize;
use tracing::{debug, trace};

use copilot_models::{FocusedPlan, FocusedPlanRequest, PlanRequest, PlanResponse, ResumeAnalysis};

use crate::cancel::CancelToken;
use crate::error::{ClientError, Result};

/// Default backend address.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Minimum trimmed query length before suggestions hit the network.
const MIN_SUGGEST_QUERY: usize = 2;

/// True when the file name carries the `.pdf` extension. Checked
/// before any upload so format problems never reach the network.
pub fn is_pdf_filename(name: &str) -> bool {
    name.to_lowercase().ends_with(".pdf")
}

/// Client for the Career Copilot planning backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HealthBody {
    #[serde(default)]
    status: String,
}

#[derive(Debug, Deserialize)]
struct ProfessionsBody {
    #[serde(default)]
    professions: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct SkillsBody {
    #[serde(default)]
    skills: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct SuggestionsBody {
    #[serde(default)]
    suggestions: Vec<String>,
}

impl ApiClient {
    /// Creates a client for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    /// The base URL this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Runs a request unless the token fires first.
    async fn execute<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        token: &CancelToken,
    ) -> Result<T> {
        tokio::select! {
            _ = token.cancelled() => {
                trace!("request cancelled before completion");
                Err(ClientError::Cancelled)
            }
            result = Self::run(request) => result,
        }
    }

    async fn run<T: serde::de::DeserializeOwned>(request: reqwest::RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = Self::error_message(response).await;
            debug!("backend rejected request: {} {}", status.as_u16(), message);
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.json().await?)
    }

    /// Normalizes an error body: prefer the `detail` field the backend
    /// puts into rejections, fall back to the reason phrase.
    async fn error_message(response: reqwest::Response) -> String {
        let reason = response
            .status()
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string();
        match response.json::<ErrorBody>().await {
            Ok(ErrorBody {
                detail: Some(detail),
            }) if !detail.is_empty() => detail,
            _ => reason,
        }
    }

    /// Probes `GET /health`. Never fails: any error counts as "down".
    pub async fn health(&self) -> bool {
        let response = match self.client.get(self.url("/health")).send().await {
            Ok(response) if response.status().is_success() => response,
            _ => return false,
        };
        match response.json::<HealthBody>().await {
            Ok(body) => body.status == "ok",
            Err(_) => false,
        }
    }

    /// Fetches the profession catalog.
    pub async fn professions(&self, token: &CancelToken) -> Result<Vec<String>> {
        let body: ProfessionsBody = self
            .execute(self.client.get(self.url("/api/professions")), token)
            .await?;
        debug!("loaded {} professions", body.professions.len());
        Ok(body.professions)
    }

    /// Fetches the recommended skills for a profession.
    pub async fn skills_for_role(
        &self,
        profession: &str,
        token: &CancelToken,
    ) -> Result<Vec<String>> {
        let request = self
            .client
            .get(self.url("/api/skills-for-role"))
            .query(&[("profession", profession)]);
        let body: SkillsBody = self.execute(request, token).await?;
        Ok(body.skills)
    }

    /// Fetches skill suggestions for a query. Queries shorter than two
    /// trimmed characters resolve to an empty list without touching
    /// the network.
    pub async fn suggest_skills(&self, query: &str, token: &CancelToken) -> Result<Vec<String>> {
        if query.trim().chars().count() < MIN_SUGGEST_QUERY {
            return Ok(Vec::new());
        }
        let request = self
            .client
            .get(self.url("/api/suggest-skills"))
            .query(&[("q", query)]);
        let body: SuggestionsBody = self.execute(request, token).await?;
        Ok(body.suggestions)
    }

    /// Uploads a resume for skill extraction.
    pub async fn analyze_resume(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
        token: &CancelToken,
    ) -> Result<ResumeAnalysis> {
        trace!("uploading resume {file_name} ({} bytes)", bytes.len());
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str("application/pdf")?;
        let form = reqwest::multipart::Form::new().part("file", part);
        let request = self.client.post(self.url("/api/analyze-resume")).multipart(form);
        self.execute(request, token).await
    }

    /// Requests a career plan for the collected goal and skills.
    pub async fn build_plan(
        &self,
        request: &PlanRequest,
        token: &CancelToken,
    ) -> Result<PlanResponse> {
        trace!("building plan for scenario {:?}", request.scenario);
        let request = self.client.post(self.url("/api/plan")).json(request);
        self.execute(request, token).await
    }

    /// Requests a focused plan for the selected gap skills.
    pub async fn focused_plan(
        &self,
        request: &FocusedPlanRequest,
        token: &CancelToken,
    ) -> Result<FocusedPlan> {
        let request = self.client.post(self.url("/api/focused-plan")).json(request);
        self.execute(request, token).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cancel::cancel_pair;
    use axum::extract::Query;
    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use copilot_models::{Grade, Scenario, SkillLevel, WizardState};
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[test]
    fn test_is_pdf_filename() {
        assert!(is_pdf_filename("resume.pdf"));
        assert!(is_pdf_filename("CV.PDF"));
        assert!(!is_pdf_filename("resume.docx"));
        assert!(!is_pdf_filename("pdf"));
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::new("http://localhost:8000/");
        assert_eq!(client.base_url(), "http://localhost:8000");
    }

    #[tokio::test]
    async fn test_professions_unwraps_envelope() {
        let app = Router::new().route(
            "/api/professions",
            get(|| async { Json(json!({"professions": ["Аналитик данных", "Продуктовый менеджер"]})) }),
        );
        let base = serve(app).await;

        let (_handle, token) = cancel_pair();
        let professions = ApiClient::new(&base).professions(&token).await.unwrap();

        assert_eq!(professions, vec!["Аналитик данных", "Продуктовый менеджер"]);
    }

    #[tokio::test]
    async fn test_skills_for_role_passes_profession_query() {
        let app = Router::new().route(
            "/api/skills-for-role",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                assert_eq!(params["profession"], "Аналитик данных");
                Json(json!({"skills": ["SQL", "Excel"]}))
            }),
        );
        let base = serve(app).await;

        let (_handle, token) = cancel_pair();
        let skills = ApiClient::new(&base)
            .skills_for_role("Аналитик данных", &token)
            .await
            .unwrap();

        assert_eq!(skills, vec!["SQL", "Excel"]);
    }

    #[tokio::test]
    async fn test_api_error_prefers_detail_field() {
        let app = Router::new().route(
            "/api/plan",
            post(|| async {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({"detail": "Добавьте хотя бы один навык"})),
                )
            }),
        );
        let base = serve(app).await;

        let (_handle, token) = cancel_pair();
        let request = PlanRequest {
            profession: "Аналитик данных".to_string(),
            grade: Grade::Middle,
            skills: vec![],
            scenario: Scenario::NextGrade,
            target_profession: None,
        };
        let err = ApiClient::new(&base)
            .build_plan(&request, &token)
            .await
            .unwrap_err();

        match err {
            ClientError::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Добавьте хотя бы один навык");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_api_error_falls_back_to_reason_phrase() {
        let app = Router::new().route(
            "/api/professions",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );
        let base = serve(app).await;

        let (_handle, token) = cancel_pair();
        let err = ApiClient::new(&base)
            .professions(&token)
            .await
            .unwrap_err();

        match err {
            ClientError::Api { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "Internal Server Error");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_short_suggest_query_skips_network() {
        let hits = Arc::new(AtomicUsize::new(0));
        let hits_in_handler = hits.clone();
        let app = Router::new().route(
            "/api/suggest-skills",
            get(move || {
                let hits = hits_in_handler.clone();
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    Json(json!({"suggestions": ["SQL"]}))
                }
            }),
        );
        let base = serve(app).await;
        let client = ApiClient::new(&base);
        let (_handle, token) = cancel_pair();

        assert!(client.suggest_skills("s", &token).await.unwrap().is_empty());
        assert!(client.suggest_skills("  s  ", &token).await.unwrap().is_empty());
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        assert_eq!(
            client.suggest_skills("sq", &token).await.unwrap(),
            vec!["SQL"]
        );
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_health_states() {
        let app = Router::new()
            .route("/health", get(|| async { Json(json!({"status": "ok"})) }));
        let base = serve(app).await;
        assert!(ApiClient::new(&base).health().await);

        let app = Router::new()
            .route("/health", get(|| async { Json(json!({"status": "degraded"})) }));
        let base = serve(app).await;
        assert!(!ApiClient::new(&base).health().await);

        let app = Router::new()
            .route("/health", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }));
        let base = serve(app).await;
        assert!(!ApiClient::new(&base).health().await);
    }

    #[tokio::test]
    async fn test_health_unreachable_backend_is_down() {
        // Bind and drop a listener so the port is free but closed.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        assert!(!ApiClient::new(format!("http://{addr}")).health().await);
    }

    #[tokio::test]
    async fn test_cancelled_request_resolves_as_cancelled() {
        let app = Router::new().route(
            "/api/professions",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Json(json!({"professions": []}))
            }),
        );
        let base = serve(app).await;

        let (handle, token) = cancel_pair();
        let client = ApiClient::new(&base);
        let call = tokio::spawn(async move { client.professions(&token).await });

        handle.cancel();
        let err = call.await.unwrap().unwrap_err();

        assert!(err.is_cancelled());
    }

    #[tokio::test]
    async fn test_build_plan_posts_exact_body() {
        let captured: Arc<Mutex<Option<Value>>> = Arc::new(Mutex::new(None));
        let captured_in_handler = captured.clone();
        let app = Router::new().route(
            "/api/plan",
            post(move |Json(body): Json<Value>| {
                let captured = captured_in_handler.clone();
                async move {
                    *captured.lock().unwrap() = Some(body);
                    Json(json!({"markdown": "# План"}))
                }
            }),
        );
        let base = serve(app).await;

        let mut state = WizardState {
            profession: "Аналитик данных".to_string(),
            scenario: Some(Scenario::NextGrade),
            grade: Grade::Middle,
            ..WizardState::default()
        };
        state.add_skill("SQL", SkillLevel::Basic);

        let (_handle, token) = cancel_pair();
        let request = PlanRequest::from_state(&state).unwrap();
        let response = ApiClient::new(&base)
            .build_plan(&request, &token)
            .await
            .unwrap();

        assert_eq!(response.markdown, "# План");
        assert_eq!(
            captured.lock().unwrap().take().unwrap(),
            json!({
                "profession": "Аналитик данных",
                "grade": "Специалист (Middle)",
                "skills": [{"name": "SQL", "level": 1.0}],
                "scenario": "Следующий грейд",
            })
        );
    }

    #[tokio::test]
    async fn test_analyze_resume_parses_extracted_skills() {
        let app = Router::new().route(
            "/api/analyze-resume",
            post(|| async { Json(json!({"skills": [{"name": "SQL", "level": 1.5}]})) }),
        );
        let base = serve(app).await;

        let (_handle, token) = cancel_pair();
        let analysis = ApiClient::new(&base)
            .analyze_resume("resume.pdf", b"%PDF-1.4".to_vec(), &token)
            .await
            .unwrap();

        assert_eq!(analysis.skills.len(), 1);
        assert_eq!(analysis.skills[0].level, SkillLevel::Advanced);
        assert!(analysis.error.is_none());
    }

    #[tokio::test]
    async fn test_focused_plan_roundtrip() {
        let app = Router::new().route(
            "/api/focused-plan",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["selected_skills"], json!(["SQL"]));
                Json(json!({
                    "tasks": [{"skill": "SQL", "items": ["Оптимизировать запросы"]}],
                    "communication": ["Запросите обратную связь"],
                    "learning": ["SQL Performance Explained"]
                }))
            }),
        );
        let base = serve(app).await;

        let state = WizardState {
            profession: "Аналитик данных".to_string(),
            scenario: Some(Scenario::NextGrade),
            ..WizardState::default()
        };
        let request = FocusedPlanRequest::from_state(&state, vec!["SQL".to_string()]).unwrap();

        let (_handle, token) = cancel_pair();
        let plan = ApiClient::new(&base)
            .focused_plan(&request, &token)
            .await
            .unwrap();

        assert_eq!(plan.tasks[0].skill, "SQL");
        assert_eq!(plan.learning.len(), 1);
    }
}
