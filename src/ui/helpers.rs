use anyhow::Error;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::booking::{CalendarDay, MonthGrid};

/// Weekday header, Monday first to match the grid.
const WEEKDAY_HEADER: &str = " Mo  Tu  We  Th  Fr  Sa  Su";

/// Pick the cell style for one day. Layers are applied from the least to the
/// most specific: availability, then today, then selection, then the cursor.
pub(crate) fn day_style(day: &CalendarDay, is_cursor: bool) -> Style {
    let mut style = if !day.is_current_month {
        Style::default().fg(Color::DarkGray)
    } else if day.is_bookable {
        Style::default().fg(Color::Green)
    } else if day.is_member_only {
        Style::default().fg(Color::Magenta)
    } else {
        Style::default().fg(Color::Red).add_modifier(Modifier::DIM)
    };

    if day.is_today {
        style = style.add_modifier(Modifier::UNDERLINED);
    }
    if day.is_selected && day.is_current_month {
        style = style.add_modifier(Modifier::REVERSED | Modifier::BOLD);
    }
    if is_cursor && day.is_current_month {
        style = style.bg(Color::Yellow).fg(Color::Black);
    }
    style
}

/// Render a month grid as text lines, highlighting `cursor` when it falls in
/// the month.
pub(crate) fn month_lines(grid: &MonthGrid, cursor: chrono::NaiveDate) -> Vec<Line<'static>> {
    let mut lines = Vec::with_capacity(8);
    lines.push(Line::from(Span::styled(
        WEEKDAY_HEADER,
        Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD),
    )));

    for week in grid.weeks() {
        let spans: Vec<Span<'static>> = week
            .iter()
            .flat_map(|day| {
                let label = if day.is_current_month {
                    format!("{:>3}", day.date.format("%-d").to_string())
                } else {
                    "   ".to_string()
                };
                [
                    Span::styled(label, day_style(day, day.date == cursor)),
                    Span::raw(" "),
                ]
            })
            .collect();
        lines.push(Line::from(spans));
    }

    lines
}

/// Legend explaining the calendar colours.
pub(crate) fn legend_line() -> Line<'static> {
    Line::from(vec![
        Span::styled("■ available  ", Style::default().fg(Color::Green)),
        Span::styled("■ unavailable  ", Style::default().fg(Color::Red)),
        Span::styled("■ member-only  ", Style::default().fg(Color::Magenta)),
        Span::styled(
            "selected",
            Style::default().add_modifier(Modifier::REVERSED),
        ),
    ])
}

/// `$12.50` from 1250 cents.
pub(crate) fn format_cents(cents: u64) -> String {
    format!("${}.{:02}", cents / 100, cents % 100)
}

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for modal dialogs.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// Extract the most relevant error message from a chained error.
pub(crate) fn surface_error(err: &Error) -> String {
    err.chain()
        .last()
        .map(|cause| cause.to_string())
        .unwrap_or_else(|| err.to_string())
}

#[cfg(test)]
mod tests {
    use anyhow::{anyhow, Context};
    use chrono::NaiveDate;

    use super::*;
    use crate::booking::{resolve_privileges, DateSelection};
    use crate::models::MembershipTier;

    #[test]
    fn surface_error_prefers_root_cause() {
        let err = Err::<(), _>(anyhow!("disk full"))
            .context("failed to queue booking")
            .unwrap_err();
        assert_eq!(surface_error(&err), "disk full");
    }

    #[test]
    fn format_cents_pads_the_fraction() {
        assert_eq!(format_cents(6_500), "$65.00");
        assert_eq!(format_cents(1_205), "$12.05");
        assert_eq!(format_cents(0), "$0.00");
    }

    #[test]
    fn month_lines_has_header_plus_six_weeks() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let profile = resolve_privileges(MembershipTier::Base);
        let grid = MonthGrid::build(today, today, &profile, &DateSelection::Empty);
        let lines = month_lines(&grid, today);
        assert_eq!(lines.len(), 7);
    }

    #[test]
    fn cursor_outside_month_is_not_highlighted() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let profile = resolve_privileges(MembershipTier::Base);
        let grid = MonthGrid::build(today, today, &profile, &DateSelection::Empty);
        let lead = grid.days[0];
        assert_eq!(day_style(&lead, true), day_style(&lead, false));
        let first = grid.day(today).unwrap();
        assert_ne!(day_style(first, true), day_style(first, false));
    }
}
