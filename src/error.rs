use chrono::NaiveDate;
use thiserror::Error;

/// Reasons a booking draft cannot be turned into a request.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BookingError {
    #[error("Please select a date")]
    NoDateSelected,
    #[error("Please select a time slot")]
    NoTimeSelected,
    #[error("{0} is outside your booking window")]
    DateNotBookable(NaiveDate),
}
