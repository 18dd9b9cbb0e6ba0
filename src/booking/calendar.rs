use chrono::{Datelike, Days, Months, NaiveDate};

use super::eligibility::{is_bookable, is_priority_period};
use super::selection::DateSelection;
use crate::models::PrivilegeProfile;

/// Cells in a month grid: six Monday-first weeks.
pub const GRID_CELLS: usize = 42;

/// One rendered day with its presentation flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub is_today: bool,
    pub is_current_month: bool,
    pub is_bookable: bool,
    pub is_priority_period: bool,
    pub is_selected: bool,
    /// Priority day the viewer's tier cannot book.
    pub is_member_only: bool,
}

impl CalendarDay {
    pub fn new(
        date: NaiveDate,
        month: u32,
        today: NaiveDate,
        profile: &PrivilegeProfile,
        selection: &DateSelection,
    ) -> Self {
        let priority = is_priority_period(date, today);
        Self {
            date,
            is_today: date == today,
            is_current_month: date.month() == month,
            is_bookable: is_bookable(date, today, profile),
            is_priority_period: priority,
            is_selected: selection.contains(date),
            is_member_only: priority && !profile.can_book_priority_slots,
        }
    }

    /// Only bookable days of the displayed month accept clicks.
    pub fn is_clickable(&self) -> bool {
        self.is_current_month && self.is_bookable
    }
}

/// Grid of [`CalendarDay`]s for one month, rebuilt on every render pass.
#[derive(Debug, Clone)]
pub struct MonthGrid {
    pub first_of_month: NaiveDate,
    pub days: Vec<CalendarDay>,
}

impl MonthGrid {
    /// Build the grid for the month containing `anchor`, starting on the
    /// Monday on or before the first of that month.
    pub fn build(
        anchor: NaiveDate,
        today: NaiveDate,
        profile: &PrivilegeProfile,
        selection: &DateSelection,
    ) -> Self {
        let first_of_month = first_of_month(anchor);
        let lead = u64::from(first_of_month.weekday().num_days_from_monday());
        let start = first_of_month
            .checked_sub_days(Days::new(lead))
            .unwrap_or(first_of_month);

        let days = start
            .iter_days()
            .take(GRID_CELLS)
            .map(|date| CalendarDay::new(date, first_of_month.month(), today, profile, selection))
            .collect();

        Self {
            first_of_month,
            days,
        }
    }

    /// `June 2024`.
    pub fn month_title(&self) -> String {
        self.first_of_month.format("%B %Y").to_string()
    }

    pub fn weeks(&self) -> impl Iterator<Item = &[CalendarDay]> {
        self.days.chunks(7)
    }

    pub fn day(&self, date: NaiveDate) -> Option<&CalendarDay> {
        self.days
            .iter()
            .find(|day| day.date == date && day.is_current_month)
    }
}

/// First day of the month containing `date`.
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// The two months the calendar shows: the one containing `today` and the
/// next one.
pub fn visible_months(
    today: NaiveDate,
    profile: &PrivilegeProfile,
    selection: &DateSelection,
) -> [MonthGrid; 2] {
    let current = first_of_month(today);
    let next = current.checked_add_months(Months::new(1)).unwrap_or(current);
    [
        MonthGrid::build(current, today, profile, selection),
        MonthGrid::build(next, today, profile, selection),
    ]
}

#[cfg(test)]
mod tests {
    use chrono::Weekday;

    use super::*;
    use crate::booking::resolve_privileges;
    use crate::models::MembershipTier;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn grid_has_six_monday_first_weeks() {
        let profile = resolve_privileges(MembershipTier::Base);
        let grid = MonthGrid::build(
            date(2024, 6, 15),
            date(2024, 6, 1),
            &profile,
            &DateSelection::Empty,
        );
        assert_eq!(grid.days.len(), GRID_CELLS);
        assert_eq!(grid.days[0].date.weekday(), Weekday::Mon);
        // 1 June 2024 is a Saturday.
        assert_eq!(grid.days[0].date, date(2024, 5, 27));
        assert_eq!(grid.month_title(), "June 2024");
        assert_eq!(grid.weeks().count(), 6);

        let in_month = grid.days.iter().filter(|d| d.is_current_month).count();
        assert_eq!(in_month, 30);
    }

    #[test]
    fn month_starting_on_monday_has_no_lead_days() {
        let profile = resolve_privileges(MembershipTier::None);
        let grid = MonthGrid::build(
            date(2024, 7, 1),
            date(2024, 7, 1),
            &profile,
            &DateSelection::Empty,
        );
        assert_eq!(grid.days[0].date, date(2024, 7, 1));
        assert!(grid.days[0].is_today);
    }

    #[test]
    fn flags_follow_the_profile() {
        let today = date(2024, 6, 1);
        let profile = resolve_privileges(MembershipTier::None);
        let selection = DateSelection::Single(date(2024, 6, 2));
        let grid = MonthGrid::build(today, today, &profile, &selection);

        let tomorrow = grid.day(date(2024, 6, 2)).unwrap();
        assert!(tomorrow.is_bookable);
        assert!(tomorrow.is_selected);
        assert!(tomorrow.is_clickable());

        let later = grid.day(date(2024, 6, 10)).unwrap();
        assert!(!later.is_bookable);
        assert!(!later.is_member_only);

        let lead = grid.days[0];
        assert!(!lead.is_current_month);
        assert!(!lead.is_clickable());
    }

    #[test]
    fn priority_days_are_member_only_without_priority_access() {
        let today = date(2024, 6, 1);
        let base = resolve_privileges(MembershipTier::Base);
        let premium = resolve_privileges(MembershipTier::Premium);
        let [_, july_base] = visible_months(today, &base, &DateSelection::Empty);
        let [_, july_premium] = visible_months(today, &premium, &DateSelection::Empty);

        let day = date(2024, 7, 5);
        assert!(july_base.day(day).unwrap().is_member_only);
        assert!(!july_base.day(day).unwrap().is_bookable);
        assert!(!july_premium.day(day).unwrap().is_member_only);
        assert!(july_premium.day(day).unwrap().is_bookable);
    }

    #[test]
    fn visible_months_roll_over_the_year() {
        let profile = resolve_privileges(MembershipTier::Unlimited);
        let [dec, jan] = visible_months(date(2024, 12, 20), &profile, &DateSelection::Empty);
        assert_eq!(dec.month_title(), "December 2024");
        assert_eq!(jan.month_title(), "January 2025");
    }
}
