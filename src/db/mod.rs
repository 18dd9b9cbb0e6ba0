//! Persistence module split across logical submodules.

mod bookings;
mod connection;
mod preferences;

pub use bookings::{fetch_queued_bookings, queue_booking};
pub use connection::{default_data_dir, ensure_schema, init_schema};
pub use preferences::{load_membership_level, resolve_membership, store_membership_level};
