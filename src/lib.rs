//! Core library surface for the spa booking calendar.
//!
//! `booking` holds the pure eligibility engine (tier privileges, priority
//! period, bookability and date selection) that everything else renders or
//! persists. The binary wires it to SQLite and a Ratatui front-end.
pub mod booking;
pub mod db;
pub mod error;
pub mod models;
pub mod ui;

/// Persistence entry points used by `main.rs` at startup.
pub use db::{default_data_dir, ensure_schema, resolve_membership};

pub use error::BookingError;
pub use models::{BookingRequest, MembershipTier, PrivilegeProfile, QueuedBooking};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
