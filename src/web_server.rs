use anyhow::{Context, Result};
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, Redirect},
    routing::{get, post},
    serve, Form, Router,
};
use minijinja::{path_loader, Environment};
use minijinja_autoreload::AutoReloader;
use std::{net::SocketAddr, sync::Arc};
use tokio::sync::Mutex;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::{error, info};

use crate::constants;
use crate::session::InterviewSession;

/// One rendered line of the chat log, speaker-labelled for display.
#[derive(Clone, Debug, serde::Serialize)]
pub struct ChatEntry {
    pub speaker: String,
    pub text: String,
}

// Shared application state. Exactly one interview session lives behind the
// mutex; the lock exists to satisfy axum's shared-state requirements, turns
// are submitted one at a time.
#[derive(Clone)]
pub struct AppState {
    templates: Arc<AutoReloader>,
    session: Arc<Mutex<InterviewSession>>,
    chat_log: Arc<Mutex<Vec<ChatEntry>>>,
}

impl AppState {
    pub fn new(session: InterviewSession) -> Result<Self> {
        let templates = create_minijinja_env().context("Failed to initialize template engine")?;
        Ok(Self {
            templates: Arc::new(templates),
            session: Arc::new(Mutex::new(session)),
            chat_log: Arc::new(Mutex::new(Vec::new())),
        })
    }

    /// Runs the fixed opening trigger as the very first turn, before any
    /// human input, and records both sides in the chat log.
    pub async fn seed_opening_turn(&self) -> Result<()> {
        let mut session = self.session.lock().await;
        let reply = session
            .start_turn(constants::OPENING_TRIGGER)
            .await
            .context("Opening turn failed")?;

        let mut chat_log = self.chat_log.lock().await;
        chat_log.push(ChatEntry {
            speaker: constants::USER_SPEAKER.to_string(),
            text: constants::OPENING_TRIGGER.to_string(),
        });
        chat_log.push(ChatEntry {
            speaker: constants::ASSISTANT_SPEAKER.to_string(),
            text: reply,
        });
        Ok(())
    }
}

// Minijinja Environment setup
fn create_minijinja_env() -> Result<AutoReloader> {
    // AutoReloader for development convenience
    let reloader = AutoReloader::new(|notifier| {
        let loader = path_loader("templates");
        let mut env = Environment::new();
        env.set_loader(loader);
        notifier.watch_path("templates", true);
        Ok(env)
    });
    Ok(reloader)
}

async fn index_handler(State(state): State<AppState>) -> Result<Html<String>, Html<String>> {
    let chat_log = state.chat_log.lock().await.clone();
    let student_id = state.session.lock().await.student_id().to_string();

    state
        .templates
        .acquire_env()
        .and_then(|env| {
            env.get_template("index.html").and_then(|tmpl| {
                let context = minijinja::context! {
                    title => "口試練習",
                    student_id => student_id,
                    chat_log => minijinja::Value::from_serialize(&chat_log),
                };
                tmpl.render(context)
            })
        })
        .map(Html)
        .map_err(|e| {
            error!("Failed to get or render template: {}", e);
            Html(format!("Internal Server Error: {}", e))
        })
}

#[derive(serde::Deserialize)]
struct TurnForm {
    message: String,
}

// Accepts one free-text turn, asks the model for the next interviewer turn,
// and redirects back to the transcript view. A remote failure surfaces as a
// 502 with no retry; the user turn is already in the transcript at that point.
async fn turn_handler(
    State(state): State<AppState>,
    Form(form): Form<TurnForm>,
) -> Result<Redirect, (StatusCode, String)> {
    let message = form.message.trim().to_string();
    if message.is_empty() {
        return Ok(Redirect::to("/"));
    }

    let mut session = state.session.lock().await;
    let mut chat_log = state.chat_log.lock().await;

    chat_log.push(ChatEntry {
        speaker: constants::USER_SPEAKER.to_string(),
        text: message.clone(),
    });

    match session.start_turn(&message).await {
        Ok(reply) => {
            chat_log.push(ChatEntry {
                speaker: constants::ASSISTANT_SPEAKER.to_string(),
                text: reply,
            });
            Ok(Redirect::to("/"))
        }
        Err(e) => {
            error!("Turn failed: {}", e);
            Err((StatusCode::BAD_GATEWAY, format!("Turn failed: {}", e)))
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/turn", post(turn_handler))
        .nest_service("/static", ServeDir::new("static"))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

pub async fn start_web_server(port: u16, state: AppState) -> Result<()> {
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Web server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context(format!("Failed to bind to address {}", addr))?;

    serve(listener, app.into_make_service())
        .await
        .context("Web server failed")?;

    Ok(())
}
