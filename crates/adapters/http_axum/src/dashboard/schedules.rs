//! Schedule panel page and its form targets.

use askama::Template;
use axum::extract::{Form, Path, State};
use axum::response::{Html, Redirect};
use serde::Deserialize;

use relaydash_app::controller::UiAction;
use relaydash_app::notice::Notice;
use relaydash_app::schedule_panel::ScheduleForm;
use relaydash_app::view::{CONFIRM_DELETE, PanelView, ScheduleListView};
use relaydash_domain::error::ValidationError;
use relaydash_domain::id::ScheduleId;
use relaydash_domain::schedule::{Weekday, WeekdaySet};

use crate::error::ApiError;
use crate::state::AppState;

/// Reload interval while an answer from the hub is awaited.
const PENDING_REFRESH_SECONDS: u32 = 1;

/// Schedule panel template.
#[derive(Template)]
#[template(path = "schedules.html")]
pub struct SchedulesTemplate {
    /// Only set while waiting, so a half-typed form is never wiped.
    refresh_seconds: Option<u32>,
    back: &'static str,
    notices: Vec<Notice>,
    panel: Option<PanelView>,
    confirm_text: &'static str,
}

/// `GET /schedules` — the panel, or a pointer back home when closed.
pub async fn panel(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let snapshot = state.handle.snapshot();
    let waiting = snapshot
        .panel
        .as_ref()
        .is_some_and(|panel| panel.busy || panel.list == ScheduleListView::Loading);
    super::render(&SchedulesTemplate {
        refresh_seconds: waiting.then_some(PENDING_REFRESH_SECONDS),
        back: "/schedules",
        notices: snapshot.notices.clone(),
        panel: snapshot.panel.clone(),
        confirm_text: CONFIRM_DELETE,
    })
}

/// `POST /schedules/open/:name`
pub async fn open(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Redirect, ApiError> {
    super::act(&state, UiAction::OpenSchedules { device: name }, "/schedules").await
}

/// `POST /schedules/close`
pub async fn close(State(state): State<AppState>) -> Result<Redirect, ApiError> {
    super::act(&state, UiAction::CloseSchedules, "/").await
}

/// Form data of the device selector.
#[derive(Debug, Deserialize)]
pub struct DeviceForm {
    pub device: String,
}

/// `POST /schedules/select`
pub async fn select(
    State(state): State<AppState>,
    Form(form): Form<DeviceForm>,
) -> Result<Redirect, ApiError> {
    super::act(
        &state,
        UiAction::SelectDevice {
            device: form.device,
        },
        "/schedules",
    )
    .await
}

/// Form data of the create / edit form.
///
/// Each weekday is its own checkbox; an unchecked box is simply absent.
#[derive(Debug, Default, Deserialize)]
pub struct ScheduleFields {
    pub target: String,
    pub state: String,
    #[serde(default)]
    pub time: String,
    pub day_mon: Option<String>,
    pub day_tue: Option<String>,
    pub day_wed: Option<String>,
    pub day_thu: Option<String>,
    pub day_fri: Option<String>,
    pub day_sat: Option<String>,
    pub day_sun: Option<String>,
}

impl ScheduleFields {
    fn is_checked(&self, day: Weekday) -> bool {
        let field = match day {
            Weekday::Mon => &self.day_mon,
            Weekday::Tue => &self.day_tue,
            Weekday::Wed => &self.day_wed,
            Weekday::Thu => &self.day_thu,
            Weekday::Fri => &self.day_fri,
            Weekday::Sat => &self.day_sat,
            Weekday::Sun => &self.day_sun,
        };
        field.is_some()
    }

    /// Parse the submitted fields.
    ///
    /// An empty weekday set is not an error here; the panel turns it into a
    /// notice.
    pub fn parse(&self) -> Result<ScheduleForm, ValidationError> {
        let mut days = WeekdaySet::new();
        for day in Weekday::ALL.into_iter().filter(|day| self.is_checked(*day)) {
            days.insert(day);
        }
        Ok(ScheduleForm {
            target: self.target.parse()?,
            state: self.state.parse()?,
            time: self.time.trim().to_string(),
            days,
        })
    }
}

/// `POST /schedules/submit` — create, or update when editing.
pub async fn submit(
    State(state): State<AppState>,
    Form(fields): Form<ScheduleFields>,
) -> Result<Redirect, ApiError> {
    let form = fields.parse()?;
    super::act(&state, UiAction::Submit(form), "/schedules").await
}

/// `POST /schedules/cancel`
pub async fn cancel(State(state): State<AppState>) -> Result<Redirect, ApiError> {
    super::act(&state, UiAction::CancelEdit, "/schedules").await
}

/// `POST /schedules/:id/edit`
pub async fn edit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Redirect, ApiError> {
    super::act(&state, UiAction::BeginEdit(ScheduleId::new(id)), "/schedules").await
}

/// `POST /schedules/:id/delete` — ask for confirmation.
pub async fn request_delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Redirect, ApiError> {
    super::act(&state, UiAction::RequestDelete(ScheduleId::new(id)), "/schedules").await
}

/// `POST /schedules/delete/confirm`
pub async fn confirm_delete(State(state): State<AppState>) -> Result<Redirect, ApiError> {
    super::act(&state, UiAction::ConfirmDelete, "/schedules").await
}

/// `POST /schedules/delete/dismiss`
pub async fn dismiss_delete(State(state): State<AppState>) -> Result<Redirect, ApiError> {
    super::act(&state, UiAction::DismissDelete, "/schedules").await
}
