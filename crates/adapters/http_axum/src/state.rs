//! Shared application state for axum handlers.

use relaydash_app::controller::DashboardHandle;

/// Application state shared across all axum handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Access to the running dashboard controller.
    pub handle: DashboardHandle,
    /// Auto-reload interval of the dashboard page.
    pub refresh_seconds: u32,
}

impl AppState {
    #[must_use]
    pub fn new(handle: DashboardHandle, refresh_seconds: u32) -> Self {
        Self {
            handle,
            refresh_seconds,
        }
    }
}
