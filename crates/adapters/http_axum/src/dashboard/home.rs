//! Dashboard home page — hub status, device cards and the message log.

use askama::Template;
use axum::extract::{Form, Path, State};
use axum::response::{Html, Redirect};
use serde::Deserialize;

use relaydash_app::controller::{DashboardSnapshot, UiAction};
use relaydash_app::message_log::LogEntry;
use relaydash_app::notice::Notice;
use relaydash_app::view::{DashboardView, DeviceCardView, Placeholder};
use relaydash_domain::device::Target;
use relaydash_domain::status::StatusIndicator;

use crate::error::ApiError;
use crate::state::AppState;

/// Home page template.
#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    refresh_seconds: u32,
    back: &'static str,
    status: StatusIndicator,
    connected: bool,
    placeholder: Option<Placeholder>,
    cards: Vec<DeviceCardView>,
    log: Vec<LogEntry>,
    notices: Vec<Notice>,
    panel_open: bool,
}

impl HomeTemplate {
    fn new(snapshot: &DashboardSnapshot, refresh_seconds: u32) -> Self {
        let (placeholder, cards) = match &snapshot.dashboard {
            DashboardView::Placeholder(placeholder) => (Some(*placeholder), Vec::new()),
            DashboardView::Devices(cards) => (None, cards.clone()),
        };
        Self {
            refresh_seconds,
            back: "/",
            status: snapshot.status.clone(),
            connected: snapshot.connected,
            placeholder,
            cards,
            log: snapshot.log.clone(),
            notices: snapshot.notices.clone(),
            panel_open: snapshot.panel.is_some(),
        }
    }
}

/// `GET /` — the live dashboard.
pub async fn index(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let snapshot = state.handle.snapshot();
    super::render(&HomeTemplate::new(&snapshot, state.refresh_seconds))
}

/// `POST /devices/:name/:target/toggle` — flip one relay (PRG).
pub async fn toggle(
    State(state): State<AppState>,
    Path((name, target)): Path<(String, String)>,
) -> Result<Redirect, ApiError> {
    let target: Target = target.parse()?;
    super::act(
        &state,
        UiAction::Toggle {
            device: name,
            target,
        },
        "/",
    )
    .await
}

/// Form data of the dismiss button.
#[derive(Debug, Default, Deserialize)]
pub struct DismissForm {
    /// Page to go back to.
    #[serde(default)]
    pub back: Option<String>,
}

/// `POST /notices/dismiss` — clear every notice (PRG).
pub async fn dismiss_notices(
    State(state): State<AppState>,
    Form(form): Form<DismissForm>,
) -> Result<Redirect, ApiError> {
    let to = match form.back.as_deref() {
        Some("/schedules") => "/schedules",
        _ => "/",
    };
    super::act(&state, UiAction::DismissNotices, to).await
}
