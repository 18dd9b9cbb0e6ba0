use crate::models::{MembershipTier, PrivilegeProfile};

/// Map a tier onto its booking privileges. The mapping is total: callers that
/// start from a raw string normalize it with [`MembershipTier::from_raw`]
/// first, which sends unknown values to the most restrictive profile.
pub fn resolve_privileges(tier: MembershipTier) -> PrivilegeProfile {
    match tier {
        MembershipTier::Unlimited => PrivilegeProfile {
            is_member: true,
            is_vip: true,
            has_priority_booking: true,
            can_book_priority_slots: true,
            max_advance_days: 90,
            discount_percentage: 100,
        },
        MembershipTier::Premium => PrivilegeProfile {
            is_member: true,
            is_vip: false,
            has_priority_booking: true,
            can_book_priority_slots: true,
            max_advance_days: 60,
            discount_percentage: 35,
        },
        MembershipTier::Base => PrivilegeProfile {
            is_member: true,
            is_vip: false,
            has_priority_booking: false,
            can_book_priority_slots: false,
            max_advance_days: 30,
            discount_percentage: 25,
        },
        MembershipTier::None => PrivilegeProfile {
            is_member: false,
            is_vip: false,
            has_priority_booking: false,
            can_book_priority_slots: false,
            max_advance_days: 3,
            discount_percentage: 0,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn premium_row_matches_table() {
        let profile = resolve_privileges(MembershipTier::from_raw("premium"));
        assert_eq!(profile.max_advance_days, 60);
        assert_eq!(profile.discount_percentage, 35);
        assert!(profile.is_member);
        assert!(!profile.is_vip);
        assert!(profile.has_priority_booking);
        assert!(profile.can_book_priority_slots);
    }

    #[test]
    fn every_tier_resolves_to_its_row() {
        let rows = [
            (MembershipTier::None, false, false, false, 3, 0),
            (MembershipTier::Base, true, false, false, 30, 25),
            (MembershipTier::Premium, true, false, true, 60, 35),
            (MembershipTier::Unlimited, true, true, true, 90, 100),
        ];
        for (tier, member, vip, priority, days, discount) in rows {
            let profile = resolve_privileges(tier);
            assert_eq!(profile.is_member, member, "{tier}");
            assert_eq!(profile.is_vip, vip, "{tier}");
            assert_eq!(profile.has_priority_booking, priority, "{tier}");
            assert_eq!(profile.can_book_priority_slots, priority, "{tier}");
            assert_eq!(profile.max_advance_days, days, "{tier}");
            assert_eq!(profile.discount_percentage, discount, "{tier}");
        }
    }

    #[test]
    fn unrecognized_input_gets_the_non_member_profile() {
        let none = resolve_privileges(MembershipTier::None);
        assert_eq!(resolve_privileges(MembershipTier::from_raw("gold")), none);
        assert_eq!(resolve_privileges(MembershipTier::from_raw("")), none);
        assert_eq!(resolve_privileges(MembershipTier::from_optional(None)), none);
    }
}
