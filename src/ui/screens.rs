use anyhow::{Context, Result};
use rusqlite::Connection;

use crate::db::fetch_queued_bookings;
use crate::models::QueuedBooking;

/// Outbox listing: every booking request queued on this machine.
pub(crate) struct BookingsScreen {
    pub(crate) bookings: Vec<QueuedBooking>,
    pub(crate) selected: usize,
}

impl BookingsScreen {
    pub(crate) fn load(conn: &Connection) -> Result<Self> {
        let bookings = fetch_queued_bookings(conn).context("failed to load queued bookings")?;
        Ok(Self {
            bookings,
            selected: 0,
        })
    }

    pub(crate) fn current(&self) -> Option<&QueuedBooking> {
        self.bookings.get(self.selected)
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        if self.bookings.is_empty() {
            return;
        }
        let len = self.bookings.len() as isize;
        let mut new = self.selected as isize + offset;
        if new < 0 {
            new = 0;
        }
        if new >= len {
            new = len - 1;
        }
        self.selected = new as usize;
    }

    pub(crate) fn select_first(&mut self) {
        self.selected = 0;
    }

    pub(crate) fn select_last(&mut self) {
        if !self.bookings.is_empty() {
            self.selected = self.bookings.len() - 1;
        }
    }

    /// Details for the highlighted booking, shown beside the list.
    pub(crate) fn detail_lines(&self) -> Vec<String> {
        let Some(booking) = self.current() else {
            return vec!["No bookings queued yet.".to_string()];
        };
        let request = &booking.request;
        let mut lines = vec![
            format!("Reference: {}", booking.reference),
            format!("Date: {} at {}", request.date.format("%A, %B %-d, %Y"), request.start_time),
            format!("Service #{} · Room {}", request.service_id, request.room_id),
            format!("Technician: {}", request.technician_preference),
            format!("Membership: {}", booking.tier.status_label()),
            format!("Queued: {}", booking.created_at.format("%Y-%m-%d %H:%M")),
        ];
        if !request.addons.is_empty() {
            let ids: Vec<String> = request
                .addons
                .iter()
                .map(|addon| format!("#{} ×{}", addon.addon_id, addon.quantity))
                .collect();
            lines.push(format!("Add-ons: {}", ids.join(", ")));
        }
        if !request.notes.is_empty() {
            lines.push(format!("Notes: {}", request.notes));
        }
        lines
    }
}
