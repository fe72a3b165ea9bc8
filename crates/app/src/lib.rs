//! # relaydash-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `HubChannel` — emit commands over the real-time channel
//!   - `ScheduleApi` — schedule CRUD against the hub's REST API
//!   - `HubListener` — receive hub events from the transport
//! - Define **driving/inbound** use-cases:
//!   - `CommandDispatcher` — toggle a relay
//!   - `ScheduleService` — run one schedule REST call
//!   - `Controller` — the single owner of all dashboard state
//! - Hold the UI state machines (`DashboardState`, `SchedulePanel`) and the
//!   pure view models the adapters render
//!
//! ## Dependency rule
//! Depends on `relaydash-domain` only (plus `tokio::sync` for channels).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod controller;
pub mod dashboard;
pub mod message_log;
pub mod notice;
pub mod ports;
pub mod schedule_panel;
pub mod services;
pub mod view;
