use chrono::NaiveDate;

/// Dates picked on the calendar: nothing, one day, or an inclusive range
/// ordered by calendar date regardless of click order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateSelection {
    #[default]
    Empty,
    Single(NaiveDate),
    /// Invariant: `start < end`.
    Range { start: NaiveDate, end: NaiveDate },
}

impl DateSelection {
    /// Apply a click on `clicked` and return the resulting selection.
    ///
    /// A second distinct day turns a single selection into a range; any click
    /// while a range is active starts over from that day.
    pub fn select(self, clicked: NaiveDate) -> Self {
        match self {
            DateSelection::Empty | DateSelection::Range { .. } => DateSelection::Single(clicked),
            DateSelection::Single(day) if day == clicked => DateSelection::Single(day),
            DateSelection::Single(day) => DateSelection::Range {
                start: day.min(clicked),
                end: day.max(clicked),
            },
        }
    }

    /// Every selected day, ascending.
    pub fn dates(&self) -> Vec<NaiveDate> {
        match *self {
            DateSelection::Empty => Vec::new(),
            DateSelection::Single(day) => vec![day],
            DateSelection::Range { start, end } => start.iter_days().take_while(|d| *d <= end).collect(),
        }
    }

    /// First selected day. The booking wizard books against this date.
    pub fn first(&self) -> Option<NaiveDate> {
        match *self {
            DateSelection::Empty => None,
            DateSelection::Single(day) => Some(day),
            DateSelection::Range { start, .. } => Some(start),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        match *self {
            DateSelection::Empty => false,
            DateSelection::Single(day) => day == date,
            DateSelection::Range { start, end } => start <= date && date <= end,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, DateSelection::Empty)
    }

    /// Short description for the status footer.
    pub fn describe(&self) -> String {
        match *self {
            DateSelection::Empty => "No date selected".to_string(),
            DateSelection::Single(day) => format!("{}", day.format("%a %d %b %Y")),
            DateSelection::Range { start, end } => format!(
                "{} → {} ({} days)",
                start.format("%d %b"),
                end.format("%d %b %Y"),
                self.dates().len()
            ),
        }
    }
}
