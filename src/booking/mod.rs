//! Membership-aware booking rules, split across logical submodules.

mod calendar;
mod eligibility;
mod privileges;
mod selection;
pub mod wizard;

pub use calendar::{first_of_month, visible_months, CalendarDay, MonthGrid, GRID_CELLS};
pub use eligibility::{days_ahead, is_bookable, is_priority_period, PRIORITY_THRESHOLD_DAYS};
pub use privileges::resolve_privileges;
pub use selection::DateSelection;
pub use wizard::{BookingDraft, PreferenceField, WizardStep};
