//! # relaydash-domain
//!
//! Pure domain model for the relaydash relay dashboard.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **Devices** (named microcontrollers exposing a lamp and a cooler relay)
//! - Define **Schedules** (weekday set + time of day → relay action, evaluated by the hub)
//! - Define the **hub status** indicator mapping
//! - Define the **messages** exchanged with the hub over the real-time channel
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod device;
pub mod message;
pub mod schedule;
pub mod status;
