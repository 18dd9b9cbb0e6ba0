//! Date-level booking rules. Everything here is a pure function of the day
//! being rendered, the reference "today" and an explicit privilege profile.

use chrono::NaiveDate;

use crate::models::PrivilegeProfile;

/// Days from today at which the priority period starts. Independent of the
/// viewer's tier.
pub const PRIORITY_THRESHOLD_DAYS: i64 = 30;

/// Signed whole-day difference `date - today`.
pub fn days_ahead(date: NaiveDate, today: NaiveDate) -> i64 {
    date.signed_duration_since(today).num_days()
}

/// Whether `date` falls in the window reserved for priority-booking tiers.
pub fn is_priority_period(date: NaiveDate, today: NaiveDate) -> bool {
    days_ahead(date, today) >= PRIORITY_THRESHOLD_DAYS
}

/// Whether a holder of `profile` may book `date`. Rules run in order and the
/// first failing one decides.
///
/// The priority check only ever binds for tiers whose advance window reaches
/// the threshold without priority access. With the current table that is the
/// base tier alone, where it coincides with the window check; keep it anyway
/// so a rebalanced tier table cannot silently open priority days.
pub fn is_bookable(date: NaiveDate, today: NaiveDate, profile: &PrivilegeProfile) -> bool {
    if date < today {
        return false;
    }

    if days_ahead(date, today) > profile.max_advance_days {
        return false;
    }

    if is_priority_period(date, today) && !profile.can_book_priority_slots {
        return false;
    }

    true
}

#[cfg(test)]
mod tests {
    use chrono::Days;

    use super::*;
    use crate::booking::resolve_privileges;
    use crate::models::MembershipTier;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn ahead(days: u64) -> NaiveDate {
        today().checked_add_days(Days::new(days)).unwrap()
    }

    #[test]
    fn priority_period_starts_at_thirty_days() {
        assert!(!is_priority_period(ahead(29), today()));
        assert!(is_priority_period(ahead(30), today()));
        assert!(!is_priority_period(today(), today()));
    }

    #[test]
    fn past_dates_are_never_bookable() {
        let yesterday = today().pred_opt().unwrap();
        for tier in MembershipTier::ALL {
            let profile = resolve_privileges(tier);
            assert!(!is_bookable(yesterday, today(), &profile), "{tier}");
            assert!(is_bookable(today(), today(), &profile), "{tier}");
        }
    }

    #[test]
    fn non_members_get_three_days() {
        let profile = resolve_privileges(MembershipTier::None);
        assert!(is_bookable(ahead(3), today(), &profile));
        assert!(!is_bookable(ahead(4), today(), &profile));
        assert!(!is_bookable(ahead(5), today(), &profile));
    }

    #[test]
    fn base_tier_stops_before_the_priority_period() {
        let profile = resolve_privileges(MembershipTier::Base);
        assert!(is_bookable(ahead(29), today(), &profile));
        assert!(!is_bookable(ahead(30), today(), &profile));
    }

    #[test]
    fn premium_reaches_into_the_priority_period() {
        let profile = resolve_privileges(MembershipTier::Premium);
        assert!(is_bookable(ahead(45), today(), &profile));
        assert!(is_bookable(ahead(60), today(), &profile));
        assert!(!is_bookable(ahead(61), today(), &profile));
    }

    #[test]
    fn unlimited_books_ninety_days_out() {
        let profile = resolve_privileges(MembershipTier::Unlimited);
        assert!(is_bookable(ahead(90), today(), &profile));
        assert!(!is_bookable(ahead(91), today(), &profile));
    }

    #[test]
    fn priority_rule_binds_without_priority_access() {
        // A hypothetical tier with a long window but no priority slots.
        let profile = PrivilegeProfile {
            is_member: true,
            is_vip: false,
            has_priority_booking: false,
            can_book_priority_slots: false,
            max_advance_days: 45,
            discount_percentage: 0,
        };
        assert!(is_bookable(ahead(29), today(), &profile));
        assert!(!is_bookable(ahead(40), today(), &profile));
    }

    #[test]
    fn day_difference_crosses_month_and_year_boundaries() {
        let dec = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
        let jan = NaiveDate::from_ymd_opt(2024, 1, 30).unwrap();
        assert_eq!(days_ahead(jan, dec), 30);
        assert!(is_priority_period(jan, dec));
    }
}
