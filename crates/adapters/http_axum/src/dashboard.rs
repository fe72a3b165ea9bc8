//! Server-side rendered HTML dashboard (no JavaScript).
//!
//! Pages:
//!   - `GET  /`           — hub status, device cards, message log
//!   - `GET  /schedules`  — schedule panel of the selected device
//!
//! Every other route is a form target that dispatches one action to the
//! controller and redirects (303) back to a page.

#[allow(clippy::missing_errors_doc)]
pub mod home;
#[allow(clippy::missing_errors_doc)]
pub mod schedules;

use askama::Template;
use axum::Router;
use axum::response::{Html, Redirect};
use axum::routing::{get, post};

use relaydash_app::controller::UiAction;

use crate::error::ApiError;
use crate::state::AppState;

/// Build the dashboard sub-router for SSR HTML pages.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::index))
        .route("/devices/{name}/{target}/toggle", post(home::toggle))
        .route("/notices/dismiss", post(home::dismiss_notices))
        .route("/schedules", get(schedules::panel))
        .route("/schedules/open/{name}", post(schedules::open))
        .route("/schedules/close", post(schedules::close))
        .route("/schedules/select", post(schedules::select))
        .route("/schedules/submit", post(schedules::submit))
        .route("/schedules/cancel", post(schedules::cancel))
        .route("/schedules/{id}/edit", post(schedules::edit))
        .route("/schedules/{id}/delete", post(schedules::request_delete))
        .route("/schedules/delete/confirm", post(schedules::confirm_delete))
        .route("/schedules/delete/dismiss", post(schedules::dismiss_delete))
}

fn render(template: &impl Template) -> Result<Html<String>, ApiError> {
    Ok(Html(template.render()?))
}

/// Dispatch `action` and redirect to `to` once the snapshot reflects it.
async fn act(state: &AppState, action: UiAction, to: &str) -> Result<Redirect, ApiError> {
    state.handle.dispatch(action).await?;
    Ok(Redirect::to(to))
}
