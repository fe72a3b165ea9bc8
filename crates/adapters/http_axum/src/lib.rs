//! # relaydash-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve a **server-side-rendered HTML dashboard** that works with
//!   **zero JavaScript**: pure HTML forms + `<meta http-equiv="refresh">`
//!   for live updates
//! - Map form submissions into [`UiAction`](relaydash_app::controller::UiAction)s
//!   sent to the dashboard controller (driving adapter)
//! - Render controller snapshots as HTML
//!
//! ## No-JS dashboard approach
//! - Every page is rendered server-side from the latest snapshot.
//! - Toggles, the schedule form and the delete confirmation are `<form>`
//!   elements that POST back to the server and redirect (PRG pattern).
//! - The controller acknowledges an action only once the snapshot reflects
//!   it, so the page after the redirect is never stale.
//!
//! ## Dependency rule
//! Depends on `relaydash-app` (controller handle and view models) and
//! `relaydash-domain` (parsing form values). Never leaks axum types into the
//! domain.

pub mod dashboard;
pub mod error;
pub mod router;
pub mod state;

#[cfg(test)]
mod testing;
