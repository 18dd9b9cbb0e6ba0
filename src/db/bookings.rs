use anyhow::{anyhow, Context, Result};
use chrono::{Datelike, NaiveDateTime};
use log::info;
use rusqlite::{params, Connection, Error as SqlError, ErrorCode};

use crate::models::{BookingRequest, MembershipTier, QueuedBooking};

/// Storage format for `created_at`.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Store a booking request in the outbox under the next free reference for
/// the year of `now`.
pub fn queue_booking(
    conn: &Connection,
    tier: MembershipTier,
    request: &BookingRequest,
    now: NaiveDateTime,
) -> Result<QueuedBooking> {
    let reference = next_reference(conn, now.year())?;
    let payload = serde_json::to_string(request).context("failed to encode booking request")?;

    conn.execute(
        "INSERT INTO booking_requests (reference, tier, payload, created_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            reference,
            tier.key(),
            payload,
            now.format(TIMESTAMP_FORMAT).to_string()
        ],
    )
    .map_err(|err| map_reference_conflict(err, &reference))
    .context("failed to queue booking")?;

    info!("queued booking {reference} for {}", request.date);
    Ok(QueuedBooking {
        id: conn.last_insert_rowid(),
        reference,
        tier,
        request: request.clone(),
        created_at: now,
    })
}

/// Every queued booking, newest first.
pub fn fetch_queued_bookings(conn: &Connection) -> Result<Vec<QueuedBooking>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, reference, tier, payload, created_at
             FROM booking_requests
             ORDER BY id DESC",
        )
        .context("failed to prepare booking query")?;

    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
            ))
        })
        .context("failed to load bookings")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect bookings")?;

    rows.into_iter()
        .map(|(id, reference, tier, payload, created_at)| -> Result<QueuedBooking> {
            let request: BookingRequest = serde_json::from_str(&payload)
                .with_context(|| format!("booking {reference} has an unreadable payload"))?;
            let created_at = NaiveDateTime::parse_from_str(&created_at, TIMESTAMP_FORMAT)
                .with_context(|| format!("booking {reference} has an invalid timestamp"))?;
            Ok(QueuedBooking {
                id,
                reference,
                tier: MembershipTier::from_raw(&tier),
                request,
                created_at,
            })
        })
        .collect()
}

/// `CS-<year>-<n>` with `n` one past the highest sequence used that year.
/// Sequences are compared as numbers, so they keep growing past six digits.
fn next_reference(conn: &Connection, year: i32) -> Result<String> {
    let prefix = format!("CS-{year}-");
    let references = {
        let mut stmt = conn
            .prepare("SELECT reference FROM booking_requests WHERE reference LIKE ?1 || '%'")
            .context("failed to prepare reference lookup")?;
        let rows = stmt
            .query_map(params![prefix], |row| row.get::<_, String>(0))
            .context("failed to look up booking references")?
            .collect::<Result<Vec<_>, _>>()
            .context("failed to collect booking references")?;
        rows
    };

    let mut last = 0u64;
    for reference in references {
        let sequence = reference
            .strip_prefix(&prefix)
            .and_then(|n| n.parse::<u64>().ok())
            .ok_or_else(|| anyhow!("malformed booking reference {reference}"))?;
        last = last.max(sequence);
    }
    let next = last + 1;

    Ok(format!("{prefix}{next:06}"))
}

/// Turn a uniqueness violation on the reference column into a readable
/// message.
fn map_reference_conflict(err: SqlError, reference: &str) -> anyhow::Error {
    if matches!(
        err.sqlite_error_code(),
        Some(ErrorCode::ConstraintViolation)
    ) {
        anyhow!("Booking reference {reference} already exists.")
    } else {
        err.into()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::db::ensure_schema;
    use crate::models::AddonRequest;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    fn request(day: u32) -> BookingRequest {
        BookingRequest {
            service_id: 2,
            date: NaiveDate::from_ymd_opt(2024, 6, day).unwrap(),
            start_time: "14:00".to_string(),
            room_id: 1,
            technician_preference: "michael".to_string(),
            addons: vec![AddonRequest {
                addon_id: 1,
                quantity: 1,
            }],
            notes: "Pressure: deep".to_string(),
        }
    }

    #[test]
    fn references_increment_and_restart_per_year() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let conn = ensure_schema(temp.path())?;

        let first = queue_booking(&conn, MembershipTier::Base, &request(2), at(2024, 6, 1))?;
        let second = queue_booking(&conn, MembershipTier::Base, &request(3), at(2024, 6, 1))?;
        let next_year = queue_booking(&conn, MembershipTier::Base, &request(4), at(2025, 1, 2))?;

        assert_eq!(first.reference, "CS-2024-000001");
        assert_eq!(second.reference, "CS-2024-000002");
        assert_eq!(next_year.reference, "CS-2025-000001");
        Ok(())
    }

    #[test]
    fn sequence_keeps_counting_past_six_digits() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let conn = ensure_schema(temp.path())?;
        conn.execute(
            "INSERT INTO booking_requests (reference, tier, payload, created_at)
             VALUES ('CS-2024-999999', 'base', '{}', '2024-06-01 09:30:00')",
            [],
        )?;

        let first = queue_booking(&conn, MembershipTier::Base, &request(2), at(2024, 6, 1))?;
        let second = queue_booking(&conn, MembershipTier::Base, &request(3), at(2024, 6, 1))?;

        assert_eq!(first.reference, "CS-2024-1000000");
        assert_eq!(second.reference, "CS-2024-1000001");
        Ok(())
    }

    #[test]
    fn queued_bookings_read_back_newest_first() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let conn = ensure_schema(temp.path())?;

        queue_booking(&conn, MembershipTier::Premium, &request(2), at(2024, 6, 1))?;
        queue_booking(&conn, MembershipTier::Unlimited, &request(9), at(2024, 6, 1))?;

        let bookings = fetch_queued_bookings(&conn)?;
        assert_eq!(bookings.len(), 2);
        assert_eq!(bookings[0].reference, "CS-2024-000002");
        assert_eq!(bookings[0].tier, MembershipTier::Unlimited);
        assert_eq!(bookings[1].request, request(2));
        assert_eq!(bookings[1].created_at, at(2024, 6, 1));
        assert_eq!(bookings[1].summary(), "CS-2024-000001 · 2024-06-02 14:00");
        Ok(())
    }

    #[test]
    fn unreadable_payload_is_reported() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let conn = ensure_schema(temp.path())?;
        conn.execute(
            "INSERT INTO booking_requests (reference, tier, payload, created_at)
             VALUES ('CS-2024-000001', 'base', '{', '2024-06-01 09:30:00')",
            [],
        )?;

        let err = fetch_queued_bookings(&conn).unwrap_err();
        assert!(err.to_string().contains("CS-2024-000001"));
        Ok(())
    }
}
