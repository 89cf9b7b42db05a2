use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Form, Json, Router};
use chunk_model::{Answer, Citation};
use legal_service::{QaService, ServiceError};
use minijinja::Environment;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

const INDEX_TEMPLATE: &str = include_str!("../templates/index.html");

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<Mutex<QaService>>,
    pub templates: Arc<Environment<'static>>,
}

pub fn templates() -> Result<Environment<'static>, minijinja::Error> {
    let mut env = Environment::new();
    env.add_template("index.html", INDEX_TEMPLATE)?;
    Ok(env)
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index).post(submit))
        .route("/api/ask", axum::routing::post(api_ask))
        .route("/healthz", get(healthz))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct AskForm {
    pub question: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct SourceGroup {
    pub chapter: String,
    pub articles: Vec<String>,
}

#[derive(Debug, Default, Serialize)]
pub struct Page {
    pub question: String,
    pub answer: String,
    pub sources: Vec<SourceGroup>,
    pub error: Option<String>,
}

/// Fold consecutive citations of the same chapter into one group.
pub fn group_sources(citations: &[Citation]) -> Vec<SourceGroup> {
    let mut groups: Vec<SourceGroup> = Vec::new();
    for c in citations {
        match groups.last_mut() {
            Some(g) if g.chapter == c.chapter_label => g.articles.push(c.article_label.clone()),
            _ => groups.push(SourceGroup { chapter: c.chapter_label.clone(), articles: vec![c.article_label.clone()] }),
        }
    }
    groups
}

pub fn render_page(env: &Environment<'static>, page: &Page) -> Result<String, AppError> {
    let tmpl = env.get_template("index.html").map_err(AppError::template)?;
    tmpl.render(page).map_err(AppError::template)
}

#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }

    fn template(err: minijinja::Error) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, format!("template error: {err}"))
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        let status = match &err {
            ServiceError::Generation(_) | ServiceError::Embed(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, err.to_string())
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!(status = %self.status, message = %self.message, "request failed");
        (self.status, Json(ErrorBody { error: self.message })).into_response()
    }
}

/// Run one question on a blocking worker; the mutex keeps requests strictly sequential.
async fn ask_blocking(state: &AppState, question: String) -> Result<Answer, AppError> {
    if question.trim().is_empty() {
        return Err(AppError::new(StatusCode::BAD_REQUEST, "question is empty"));
    }
    let service = Arc::clone(&state.service);
    tokio::task::spawn_blocking(move || {
        let guard = service
            .lock()
            .map_err(|_| AppError::new(StatusCode::INTERNAL_SERVER_ERROR, "service lock poisoned"))?;
        guard.ask(&question).map_err(AppError::from)
    })
    .await
    .map_err(|e| AppError::new(StatusCode::INTERNAL_SERVER_ERROR, format!("worker failed: {e}")))?
}

async fn index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    Ok(Html(render_page(&state.templates, &Page::default())?))
}

async fn submit(State(state): State<AppState>, Form(form): Form<AskForm>) -> Result<Html<String>, AppError> {
    let mut page = Page { question: form.question.clone(), ..Page::default() };
    match ask_blocking(&state, form.question).await {
        Ok(answer) => {
            info!(sources = answer.sources.len(), "form question answered");
            page.answer = answer.answer;
            page.sources = group_sources(&answer.sources);
        }
        Err(err) => page.error = Some(err.message),
    }
    Ok(Html(render_page(&state.templates, &page)?))
}

async fn api_ask(State(state): State<AppState>, Json(req): Json<AskForm>) -> Result<Json<Answer>, AppError> {
    Ok(Json(ask_blocking(&state, req.question).await?))
}

async fn healthz() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consecutive_chapters_share_a_group() {
        let groups = group_sources(&[
            Citation::new("BAB I", "Pasal 1"),
            Citation::new("BAB I", "Pasal 2"),
            Citation::new("BAB IV", "Pasal 5"),
        ]);
        assert_eq!(
            groups,
            vec![
                SourceGroup { chapter: "BAB I".into(), articles: vec!["Pasal 1".into(), "Pasal 2".into()] },
                SourceGroup { chapter: "BAB IV".into(), articles: vec!["Pasal 5".into()] },
            ]
        );
    }

    #[test]
    fn page_renders_answer_and_escapes_question() {
        let env = templates().expect("template parses");
        let page = Page {
            question: "<b>pasal 5</b>".into(),
            answer: "Subjek Data Pribadi berhak...".into(),
            sources: vec![SourceGroup { chapter: "BAB IV".into(), articles: vec!["Pasal 5".into()] }],
            error: None,
        };
        let html = render_page(&env, &page).expect("render");
        assert!(html.contains("Subjek Data Pribadi berhak..."));
        assert!(html.contains("<li>Pasal 5</li>"));
        assert!(html.contains("&lt;b&gt;pasal 5"));
        assert!(!html.contains("<b>pasal 5"));
    }

    #[test]
    fn empty_page_has_form_only() {
        let env = templates().expect("template parses");
        let html = render_page(&env, &Page::default()).expect("render");
        assert!(html.contains("<form method=\"post\" action=\"/\">"));
        assert!(!html.contains("Jawaban</h2>"));
    }
}
