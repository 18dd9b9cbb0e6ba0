use std::mem;

use anyhow::Result;
use chrono::{Days, Local, Months, NaiveDate};
use crossterm::event::KeyCode;
use log::debug;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;
use rusqlite::Connection;

use crate::booking::{
    first_of_month, is_bookable, resolve_privileges, visible_months, BookingDraft, CalendarDay,
    DateSelection, MonthGrid, WizardStep,
};
use crate::db::{queue_booking, store_membership_level};
use crate::models::{MembershipTier, PrivilegeProfile};

use super::forms::{BookingWizard, MembershipPicker};
use super::helpers::{centered_rect, format_cents, legend_line, month_lines, surface_error};
use super::screens::BookingsScreen;

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Header space for the membership banner.
const HEADER_HEIGHT: u16 = 4;
/// List price used to illustrate a tier's discount in the picker.
const REFERENCE_PRICE_CENTS: u64 = 10_000;

/// High-level navigation states.
enum Screen {
    Calendar,
    Bookings(BookingsScreen),
}

/// Modal overlays scoped to the current screen.
enum Mode {
    Normal,
    PickingMembership(MembershipPicker),
    Booking(BookingWizard),
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state shared across the TUI.
///
/// The calendar is recomputed from `(profile, today, selection)` on every
/// frame, so nothing here caches rendered days.
pub struct App {
    conn: Connection,
    today: NaiveDate,
    tier: MembershipTier,
    profile: PrivilegeProfile,
    selection: DateSelection,
    cursor: NaiveDate,
    screen: Screen,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    pub fn new(conn: Connection, tier: MembershipTier, today: NaiveDate) -> Self {
        Self {
            conn,
            today,
            tier,
            profile: resolve_privileges(tier),
            selection: DateSelection::Empty,
            cursor: today,
            screen: Screen::Calendar,
            mode: Mode::Normal,
            status: None,
        }
    }

    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mut mode = mem::replace(&mut self.mode, Mode::Normal);

        mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit)?,
            Mode::PickingMembership(picker) => self.handle_membership_picker(code, picker)?,
            Mode::Booking(wizard) => self.handle_booking_wizard(code, wizard)?,
        };

        self.mode = mode;
        Ok(exit)
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match self.screen {
            Screen::Calendar => {
                match code {
                    KeyCode::Char('q') | KeyCode::Esc => {
                        *exit = true;
                    }
                    KeyCode::Left => self.move_cursor(-1),
                    KeyCode::Right => self.move_cursor(1),
                    KeyCode::Up => self.move_cursor(-7),
                    KeyCode::Down => self.move_cursor(7),
                    KeyCode::Enter | KeyCode::Char(' ') => self.click_day(self.cursor),
                    KeyCode::Char('c') | KeyCode::Char('C') => {
                        self.selection = DateSelection::Empty;
                        self.set_status("Selection cleared.", StatusKind::Info);
                    }
                    KeyCode::Char('m') | KeyCode::Char('M') => {
                        self.clear_status();
                        return Ok(Mode::PickingMembership(MembershipPicker::new(self.tier)));
                    }
                    KeyCode::Char('b') | KeyCode::Char('B') => {
                        if self.selection.is_empty() {
                            self.set_status(
                                "Please select a date from the calendar first.",
                                StatusKind::Error,
                            );
                        } else {
                            self.clear_status();
                            let draft = BookingDraft::for_date(self.selection.first());
                            return Ok(Mode::Booking(BookingWizard::new(draft)));
                        }
                    }
                    KeyCode::Char('l') | KeyCode::Char('L') => {
                        self.clear_status();
                        self.screen = Screen::Bookings(BookingsScreen::load(&self.conn)?);
                    }
                    _ => {}
                }
                Ok(Mode::Normal)
            }
            Screen::Bookings(ref mut bookings) => {
                let mut back_to_calendar = false;
                match code {
                    KeyCode::Char('q') => {
                        *exit = true;
                    }
                    KeyCode::Esc | KeyCode::Char('l') | KeyCode::Char('L') => {
                        back_to_calendar = true;
                    }
                    KeyCode::Up => bookings.move_selection(-1),
                    KeyCode::Down => bookings.move_selection(1),
                    KeyCode::PageUp => bookings.move_selection(-5),
                    KeyCode::PageDown => bookings.move_selection(5),
                    KeyCode::Home => bookings.select_first(),
                    KeyCode::End => bookings.select_last(),
                    _ => {}
                }
                if back_to_calendar {
                    self.clear_status();
                    self.screen = Screen::Calendar;
                }
                Ok(Mode::Normal)
            }
        }
    }

    fn handle_membership_picker(
        &mut self,
        code: KeyCode,
        mut picker: MembershipPicker,
    ) -> Result<Mode> {
        match code {
            KeyCode::Esc => {
                self.set_status("Membership unchanged.", StatusKind::Info);
                Ok(Mode::Normal)
            }
            KeyCode::Up => {
                picker.move_selection(-1);
                Ok(Mode::PickingMembership(picker))
            }
            KeyCode::Down => {
                picker.move_selection(1);
                Ok(Mode::PickingMembership(picker))
            }
            KeyCode::Enter => {
                match self.set_tier(picker.current()) {
                    Ok(()) => self.set_status(
                        format!("Now viewing as {}.", self.tier.status_label()),
                        StatusKind::Info,
                    ),
                    Err(err) => self.set_status(surface_error(&err), StatusKind::Error),
                }
                Ok(Mode::Normal)
            }
            _ => Ok(Mode::PickingMembership(picker)),
        }
    }

    fn handle_booking_wizard(&mut self, code: KeyCode, mut wizard: BookingWizard) -> Result<Mode> {
        let on_preferences = wizard.step() == WizardStep::Preferences;
        match code {
            KeyCode::Esc => {
                self.set_status("Booking cancelled.", StatusKind::Info);
                return Ok(Mode::Normal);
            }
            KeyCode::Backspace => {
                wizard.step_back();
            }
            KeyCode::Up if !on_preferences => wizard.move_highlight(-1),
            KeyCode::Down if !on_preferences => wizard.move_highlight(1),
            KeyCode::Enter if !on_preferences => {
                wizard.choose_highlighted();
            }
            KeyCode::Tab | KeyCode::Down if on_preferences => wizard.next_field(),
            KeyCode::BackTab | KeyCode::Up if on_preferences => wizard.prev_field(),
            KeyCode::Left if on_preferences => wizard.cycle_field(-1),
            KeyCode::Right if on_preferences => wizard.cycle_field(1),
            KeyCode::Char(ch) if on_preferences && ch.is_ascii_digit() => {
                if let Some((label, included)) = wizard.toggle_addon_key(ch) {
                    let verb = if included { "Added" } else { "Removed" };
                    self.set_status(format!("{verb} {label}."), StatusKind::Info);
                }
            }
            KeyCode::Enter => return self.submit_booking(wizard),
            _ => {}
        }
        Ok(Mode::Booking(wizard))
    }

    /// Turn the wizard's draft into a request and queue it. Validation
    /// failures keep the wizard open with the message inline.
    fn submit_booking(&mut self, mut wizard: BookingWizard) -> Result<Mode> {
        let request = match wizard.draft.to_request(self.today, &self.profile) {
            Ok(request) => request,
            Err(err) => {
                wizard.error = Some(err.to_string());
                return Ok(Mode::Booking(wizard));
            }
        };

        // Stamp with the calendar's day so `--today` also drives references.
        let now = self.today.and_time(Local::now().time());
        match queue_booking(&self.conn, self.tier, &request, now) {
            Ok(queued) => {
                self.selection = DateSelection::Empty;
                self.set_status(
                    format!(
                        "Booking request {} queued for {} at {}.",
                        queued.reference,
                        request.date.format("%B %-d, %Y"),
                        request.start_time
                    ),
                    StatusKind::Info,
                );
                Ok(Mode::Normal)
            }
            Err(err) => {
                wizard.error = Some(surface_error(&err));
                Ok(Mode::Booking(wizard))
            }
        }
    }

    /// Apply a click on `date`. Only bookable days of the displayed months
    /// take part in selection.
    fn click_day(&mut self, date: NaiveDate) {
        let Some(day) = self.visible_day(date) else {
            return;
        };

        if !day.is_clickable() {
            debug!("rejected click on {date} for tier {}", self.tier);
            let message = if date < self.today {
                "Past dates cannot be booked.".to_string()
            } else if day.is_member_only {
                "Priority dates are reserved for Premium and Unlimited members.".to_string()
            } else {
                format!(
                    "Your membership books up to {} days ahead.",
                    self.profile.max_advance_days
                )
            };
            self.set_status(message, StatusKind::Error);
            return;
        }

        self.selection = self.selection.select(date);
        debug!("selection is now {:?}", self.selection);
        self.set_status(self.selection.describe(), StatusKind::Info);
    }

    /// Switch tier, persist it, and drop a selection the new tier may not
    /// book.
    fn set_tier(&mut self, tier: MembershipTier) -> Result<()> {
        store_membership_level(&self.conn, tier)?;
        self.tier = tier;
        self.profile = resolve_privileges(tier);

        let still_valid = self
            .selection
            .dates()
            .iter()
            .all(|date| is_bookable(*date, self.today, &self.profile));
        if !still_valid {
            debug!("selection {:?} reset after tier change", self.selection);
            self.selection = DateSelection::Empty;
        }
        Ok(())
    }

    fn months(&self) -> [MonthGrid; 2] {
        visible_months(self.today, &self.profile, &self.selection)
    }

    fn visible_day(&self, date: NaiveDate) -> Option<CalendarDay> {
        self.months()
            .iter()
            .find_map(|grid| grid.day(date).copied())
    }

    /// First and last day the cursor may visit: the two displayed months.
    fn cursor_bounds(&self) -> (NaiveDate, NaiveDate) {
        let start = first_of_month(self.today);
        let end = start
            .checked_add_months(Months::new(2))
            .and_then(|d| d.pred_opt())
            .unwrap_or(start);
        (start, end)
    }

    fn move_cursor(&mut self, offset: i64) {
        let moved = if offset >= 0 {
            self.cursor.checked_add_days(Days::new(offset as u64))
        } else {
            self.cursor.checked_sub_days(Days::new(offset.unsigned_abs()))
        };
        let (start, end) = self.cursor_bounds();
        if let Some(date) = moved {
            self.cursor = date.clamp(start, end);
        }
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        match &self.screen {
            Screen::Calendar => self.draw_calendar(frame, content_area),
            Screen::Bookings(bookings) => self.draw_bookings(frame, content_area, bookings),
        }

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        match &self.mode {
            Mode::PickingMembership(picker) => self.draw_membership_picker(frame, area, picker),
            Mode::Booking(wizard) => self.draw_booking_wizard(frame, area, wizard),
            Mode::Normal => {}
        }
    }

    fn draw_calendar(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(HEADER_HEIGHT),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);

        let status_style = if self.profile.is_member {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        let header = Paragraph::new(vec![
            Line::from(Span::styled(self.tier.status_label(), status_style)),
            Line::from(self.tier.benefits()),
        ])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("SELECT YOUR PREFERRED DATE"),
        )
        .wrap(Wrap { trim: true });
        frame.render_widget(header, chunks[0]);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[1]);
        for (grid, column) in self.months().iter().zip(columns.iter()) {
            let block = Block::default()
                .borders(Borders::ALL)
                .title(grid.month_title());
            let month = Paragraph::new(month_lines(grid, self.cursor))
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(month, *column);
        }

        frame.render_widget(Paragraph::new(legend_line()), chunks[2]);
    }

    fn draw_bookings(&self, frame: &mut Frame, area: Rect, bookings: &BookingsScreen) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(area);

        let items: Vec<ListItem> = bookings
            .bookings
            .iter()
            .map(|booking| ListItem::new(booking.summary()))
            .collect();
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title("Queued Bookings"))
            .highlight_style(Style::default().fg(Color::Yellow))
            .highlight_symbol("▶ ");
        let mut state = ListState::default();
        if !bookings.bookings.is_empty() {
            state.select(Some(bookings.selected));
        }
        frame.render_stateful_widget(list, columns[0], &mut state);

        let details: Vec<Line> = bookings
            .detail_lines()
            .into_iter()
            .map(Line::from)
            .collect();
        let detail = Paragraph::new(details)
            .block(Block::default().borders(Borders::ALL).title("Details"))
            .wrap(Wrap { trim: true });
        frame.render_widget(detail, columns[1]);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let instructions = self.footer_instructions();

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        match (&self.screen, &self.mode) {
            (_, Mode::PickingMembership(_)) => Line::from(vec![
                Span::styled("[↑↓]", key_style),
                Span::raw(" Navigate   "),
                Span::styled("[Enter]", key_style),
                Span::raw(" Switch   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Cancel"),
            ]),
            (_, Mode::Booking(_)) => Line::from(vec![
                Span::styled("[Enter]", key_style),
                Span::raw(" Confirm   "),
                Span::styled("[Backspace]", key_style),
                Span::raw(" Back   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Cancel"),
            ]),
            (Screen::Bookings(_), _) => Line::from(vec![
                Span::styled("[↑↓]", key_style),
                Span::raw(" Navigate   "),
                Span::styled("[L/Esc]", key_style),
                Span::raw(" Calendar   "),
                Span::styled("[Q]", key_style),
                Span::raw(" Quit"),
            ]),
            (Screen::Calendar, _) => Line::from(vec![
                Span::styled("[←↑↓→]", key_style),
                Span::raw(" Move   "),
                Span::styled("[Enter]", key_style),
                Span::raw(" Select   "),
                Span::styled("[B]", key_style),
                Span::raw(" Book   "),
                Span::styled("[C]", key_style),
                Span::raw(" Clear   "),
                Span::styled("[M]", key_style),
                Span::raw(" Membership   "),
                Span::styled("[L]", key_style),
                Span::raw(" Bookings   "),
                Span::styled("[Q]", key_style),
                Span::raw(" Quit"),
            ]),
        }
    }

    fn draw_membership_picker(&self, frame: &mut Frame, area: Rect, picker: &MembershipPicker) {
        let popup_area = centered_rect(50, 40, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Membership Level")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = picker.build_lines(self.tier);
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            picker.current().benefits(),
            Style::default().fg(Color::Gray),
        )));
        let profile = resolve_privileges(picker.current());
        lines.push(Line::from(Span::styled(
            format!(
                "Discount {}%: a {} service costs {}",
                profile.discount_percentage,
                format_cents(REFERENCE_PRICE_CENTS),
                format_cents(profile.apply_discount(REFERENCE_PRICE_CENTS))
            ),
            Style::default().fg(Color::Gray),
        )));

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn draw_booking_wizard(&self, frame: &mut Frame, area: Rect, wizard: &BookingWizard) {
        let popup_area = centered_rect(70, 80, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Book a Session").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let paragraph = Paragraph::new(wizard.build_lines()).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }
}
