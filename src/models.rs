//! Domain models shared by the eligibility engine, the SQLite outbox and the
//! TUI. These types stay plain data holders; the rules that act on them live
//! in `crate::booking`.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Membership level that drives booking privileges and discounts.
///
/// Raw values coming from the command line or the preference store are
/// normalized through [`MembershipTier::from_raw`], so the rest of the crate
/// only ever sees one of these four variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipTier {
    #[default]
    None,
    Base,
    Premium,
    Unlimited,
}

impl MembershipTier {
    /// Every tier in ascending order of privilege. The membership picker
    /// lists them in this order.
    pub const ALL: [MembershipTier; 4] = [
        MembershipTier::None,
        MembershipTier::Base,
        MembershipTier::Premium,
        MembershipTier::Unlimited,
    ];

    /// Normalize an untrusted tier string. Matching is case-insensitive and
    /// ignores surrounding whitespace; anything unrecognized (including an
    /// empty string) falls back to [`MembershipTier::None`].
    pub fn from_raw(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "base" => MembershipTier::Base,
            "premium" => MembershipTier::Premium,
            "unlimited" => MembershipTier::Unlimited,
            _ => MembershipTier::None,
        }
    }

    /// Same as [`MembershipTier::from_raw`] for values that may be absent.
    pub fn from_optional(raw: Option<&str>) -> Self {
        raw.map(Self::from_raw).unwrap_or_default()
    }

    /// Lowercase key used in the preference table and on the command line.
    pub fn key(&self) -> &'static str {
        match self {
            MembershipTier::None => "none",
            MembershipTier::Base => "base",
            MembershipTier::Premium => "premium",
            MembershipTier::Unlimited => "unlimited",
        }
    }

    /// Banner shown above the calendar.
    pub fn status_label(&self) -> &'static str {
        match self {
            MembershipTier::None => "NON-MEMBER",
            MembershipTier::Base => "BASE MEMBER",
            MembershipTier::Premium => "PREMIUM MEMBER",
            MembershipTier::Unlimited => "VIP UNLIMITED MEMBER",
        }
    }

    /// One-line summary of what the tier unlocks.
    pub fn benefits(&self) -> &'static str {
        match self {
            MembershipTier::None => {
                "Book up to 3 days ahead • Full pricing • Join membership for better access"
            }
            MembershipTier::Base => "Book up to 1 month ahead • 25% discount on all services",
            MembershipTier::Premium => {
                "Book up to 2 months ahead • Priority booking • 35% discount • Free services included"
            }
            MembershipTier::Unlimited => {
                "Book up to 3 months ahead • Priority access • All services included • VIP treatment"
            }
        }
    }
}

impl fmt::Display for MembershipTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Booking privileges derived from a [`MembershipTier`]. Computed once per
/// render pass and handed to the eligibility functions explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrivilegeProfile {
    pub is_member: bool,
    pub is_vip: bool,
    pub has_priority_booking: bool,
    pub can_book_priority_slots: bool,
    /// Furthest day (counted from today) this tier may book.
    pub max_advance_days: i64,
    /// Percentage off list price, 0 through 100.
    pub discount_percentage: u8,
}

impl PrivilegeProfile {
    /// Price after the member discount. Amounts are in cents; the discount
    /// is rounded down so members never pay more than the exact percentage.
    pub fn apply_discount(&self, amount_cents: u64) -> u64 {
        let discount = amount_cents * u64::from(self.discount_percentage.min(100)) / 100;
        amount_cents - discount
    }
}

/// Add-on line in a booking request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddonRequest {
    pub addon_id: u32,
    pub quantity: u32,
}

/// Payload handed to the booking backend. The JSON field names follow the
/// backend's create-booking endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub service_id: u32,
    pub date: NaiveDate,
    /// 24-hour `HH:MM`.
    pub start_time: String,
    pub room_id: u32,
    pub technician_preference: String,
    pub addons: Vec<AddonRequest>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,
}

/// A booking request stored in the local outbox.
#[derive(Debug, Clone, PartialEq)]
pub struct QueuedBooking {
    /// Primary key from the SQLite store.
    pub id: i64,
    /// Human-facing reference, `CS-<year>-<sequence>`.
    pub reference: String,
    pub tier: MembershipTier,
    pub request: BookingRequest,
    pub created_at: NaiveDateTime,
}

impl QueuedBooking {
    /// `CS-2024-000001 · 2024-06-01 10:00` style line for list views.
    pub fn summary(&self) -> String {
        format!(
            "{} · {} {}",
            self.reference,
            self.request.date.format("%Y-%m-%d"),
            self.request.start_time
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_raw_accepts_known_tiers_in_any_case() {
        assert_eq!(MembershipTier::from_raw("premium"), MembershipTier::Premium);
        assert_eq!(MembershipTier::from_raw(" Premium "), MembershipTier::Premium);
        assert_eq!(MembershipTier::from_raw("UNLIMITED"), MembershipTier::Unlimited);
        assert_eq!(MembershipTier::from_raw("base"), MembershipTier::Base);
    }

    #[test]
    fn from_raw_falls_back_to_none() {
        for raw in ["gold", "", "   ", "premium-plus", "none"] {
            assert_eq!(MembershipTier::from_raw(raw), MembershipTier::None, "{raw:?}");
        }
        assert_eq!(MembershipTier::from_optional(None), MembershipTier::None);
    }

    #[test]
    fn key_round_trips_through_from_raw() {
        for tier in MembershipTier::ALL {
            assert_eq!(MembershipTier::from_raw(tier.key()), tier);
        }
    }

    #[test]
    fn discount_rounds_in_favor_of_the_member() {
        let profile = PrivilegeProfile {
            is_member: true,
            is_vip: false,
            has_priority_booking: false,
            can_book_priority_slots: false,
            max_advance_days: 30,
            discount_percentage: 25,
        };
        assert_eq!(profile.apply_discount(10_000), 7_500);
        assert_eq!(profile.apply_discount(999), 750);
        assert_eq!(profile.apply_discount(0), 0);
    }

    #[test]
    fn booking_request_serializes_date_as_iso_day() {
        let request = BookingRequest {
            service_id: 1,
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            start_time: "10:00".to_string(),
            room_id: 1,
            technician_preference: "any".to_string(),
            addons: vec![AddonRequest {
                addon_id: 2,
                quantity: 1,
            }],
            notes: String::new(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["date"], "2024-06-01");
        assert_eq!(json["addons"][0]["addon_id"], 2);
        assert!(json.get("notes").is_none());
    }
}
