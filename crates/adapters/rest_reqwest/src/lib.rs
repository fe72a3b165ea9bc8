//! # relaydash-adapter-rest-reqwest
//!
//! REST adapter — implements the `ScheduleApi` port against the hub.
//!
//! ## Responsibilities
//! - Build the schedule endpoints from a configured base URL
//! - Map `{success}` answers onto `Ok(())` or `Rejected`
//! - Map network failures and non-2xx statuses onto `Transport`
//!
//! ## Dependency rule
//! Same as other adapters: depends on `relaydash-app` and `relaydash-domain`.

pub mod client;
pub mod config;
pub mod error;

pub use client::RestScheduleApi;
pub use config::RestConfig;
pub use error::RestError;
