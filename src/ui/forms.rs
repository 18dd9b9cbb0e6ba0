use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::booking::wizard::{find, ADDONS};
use crate::booking::{BookingDraft, PreferenceField, WizardStep};
use crate::models::MembershipTier;

/// Modal state for switching membership level.
pub(crate) struct MembershipPicker {
    pub(crate) selected: usize,
}

impl MembershipPicker {
    /// Open the picker with the current tier highlighted.
    pub(crate) fn new(current: MembershipTier) -> Self {
        let selected = MembershipTier::ALL
            .iter()
            .position(|tier| *tier == current)
            .unwrap_or(0);
        Self { selected }
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        let len = MembershipTier::ALL.len() as isize;
        self.selected = (self.selected as isize + offset).clamp(0, len - 1) as usize;
    }

    pub(crate) fn current(&self) -> MembershipTier {
        MembershipTier::ALL[self.selected]
    }

    pub(crate) fn build_lines(&self, active: MembershipTier) -> Vec<Line<'static>> {
        MembershipTier::ALL
            .iter()
            .enumerate()
            .map(|(idx, tier)| {
                let pointer = if idx == self.selected { "▶ " } else { "  " };
                let marker = if *tier == active { " (current)" } else { "" };
                let style = if idx == self.selected {
                    Style::default().fg(Color::Yellow)
                } else {
                    Style::default()
                };
                Line::from(vec![Span::styled(
                    format!("{pointer}{}{marker}", tier.status_label()),
                    style,
                )])
            })
            .collect()
    }
}

/// Modal state for the progressive booking wizard.
pub(crate) struct BookingWizard {
    pub(crate) draft: BookingDraft,
    /// Highlighted choice on single-choice steps.
    pub(crate) highlighted: usize,
    /// Focused field on the preferences step.
    pub(crate) field: PreferenceField,
    pub(crate) error: Option<String>,
}

impl BookingWizard {
    pub(crate) fn new(draft: BookingDraft) -> Self {
        Self {
            draft,
            highlighted: 0,
            field: PreferenceField::default(),
            error: None,
        }
    }

    pub(crate) fn step(&self) -> WizardStep {
        self.draft.current_step()
    }

    pub(crate) fn move_highlight(&mut self, offset: isize) {
        let len = self.step().choices().len() as isize;
        if len == 0 {
            return;
        }
        self.highlighted = (self.highlighted as isize + offset).clamp(0, len - 1) as usize;
    }

    /// Answer the current step with the highlighted choice and reset the
    /// highlight for the next step.
    pub(crate) fn choose_highlighted(&mut self) -> bool {
        let Some(choice) = self.step().choices().get(self.highlighted) else {
            return false;
        };
        let answered = self.draft.answer(choice.value);
        if answered {
            self.highlighted = 0;
            self.error = None;
        }
        answered
    }

    pub(crate) fn step_back(&mut self) -> bool {
        let moved = self.draft.step_back();
        if moved {
            self.highlighted = 0;
            self.error = None;
        }
        moved
    }

    pub(crate) fn next_field(&mut self) {
        self.field = self.field.next();
    }

    pub(crate) fn prev_field(&mut self) {
        self.field = self.field.prev();
    }

    pub(crate) fn cycle_field(&mut self, delta: isize) {
        self.draft.cycle_preference(self.field, delta);
    }

    /// Toggle the add-on bound to a digit key (`1` is the first add-on).
    pub(crate) fn toggle_addon_key(&mut self, ch: char) -> Option<(&'static str, bool)> {
        let idx = ch.to_digit(10)?.checked_sub(1)? as usize;
        let addon = ADDONS.get(idx)?;
        let included = self.draft.toggle_addon(addon.value);
        Some((addon.label, included))
    }

    /// Body lines for the modal, including the summary of earlier answers.
    pub(crate) fn build_lines(&self) -> Vec<Line<'static>> {
        let step = self.step();
        let dim = Style::default().fg(Color::Gray);
        let mut lines = Vec::new();

        if let Some(date) = self.draft.date {
            lines.push(Line::from(Span::styled(
                format!("Selected: {}", date.format("%A, %B %-d, %Y")),
                dim,
            )));
        }
        for (label, value) in [
            ("Time", self.draft.time),
            ("Technician", self.draft.technician),
            ("Session", self.draft.session_preference),
            ("Massage", self.draft.massage_type),
        ] {
            if let Some(value) = value {
                lines.push(Line::from(Span::styled(format!("{label}: {value}"), dim)));
            }
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("Step {} of 5 · {}", step.number(), step.title()),
            Style::default().add_modifier(Modifier::BOLD),
        )));

        if step == WizardStep::Preferences {
            for field in PreferenceField::ALL {
                let value = self
                    .draft
                    .preference(field)
                    .and_then(|value| find(field.choices(), value))
                    .map_or("<not set>", |choice| choice.label);
                let style = if field == self.field {
                    Style::default().fg(Color::Yellow)
                } else {
                    Style::default()
                };
                lines.push(Line::from(vec![
                    Span::raw(format!("{}: ", field.label())),
                    Span::styled(format!("◀ {value} ▶"), style),
                ]));
            }
            lines.push(Line::from(""));
            for (idx, addon) in ADDONS.iter().enumerate() {
                let checked = if self.draft.addons.contains(&addon.value) {
                    "[x]"
                } else {
                    "[ ]"
                };
                lines.push(Line::from(format!("{} {checked} {}", idx + 1, addon.label)));
            }
        } else {
            for (idx, choice) in step.choices().iter().enumerate() {
                if idx == self.highlighted {
                    lines.push(Line::from(Span::styled(
                        format!("▶ {}", choice.label),
                        Style::default().fg(Color::Yellow),
                    )));
                } else {
                    lines.push(Line::from(format!("  {}", choice.label)));
                }
            }
        }

        lines.push(Line::from(""));
        if let Some(error) = &self.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else if step == WizardStep::Preferences {
            lines.push(Line::from(Span::styled(
                "Tab/↑↓ field • ←→ change • 1-3 add-ons • Enter to book • Backspace back • Esc cancel",
                dim,
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "↑↓ choose • Enter to confirm • Backspace back • Esc cancel",
                dim,
            )));
        }

        lines
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn picker_starts_on_current_tier_and_clamps() {
        let mut picker = MembershipPicker::new(MembershipTier::Premium);
        assert_eq!(picker.current(), MembershipTier::Premium);
        picker.move_selection(5);
        assert_eq!(picker.current(), MembershipTier::Unlimited);
        picker.move_selection(-10);
        assert_eq!(picker.current(), MembershipTier::None);
    }

    #[test]
    fn wizard_walks_steps_with_highlight() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 2).unwrap();
        let mut wizard = BookingWizard::new(BookingDraft::for_date(Some(date)));
        wizard.move_highlight(2);
        assert!(wizard.choose_highlighted());
        assert_eq!(wizard.draft.time, Some("11:00"));
        assert_eq!(wizard.highlighted, 0);
        assert_eq!(wizard.step(), WizardStep::Technician);

        assert!(wizard.step_back());
        assert_eq!(wizard.step(), WizardStep::Time);
    }

    #[test]
    fn addon_keys_map_to_catalog_positions() {
        let mut wizard = BookingWizard::new(BookingDraft::default());
        assert_eq!(wizard.toggle_addon_key('2').map(|(_, on)| on), Some(true));
        assert_eq!(wizard.draft.addons, vec!["hot-stone"]);
        assert!(wizard.toggle_addon_key('0').is_none());
        assert!(wizard.toggle_addon_key('9').is_none());
        assert!(wizard.toggle_addon_key('x').is_none());
    }

    #[test]
    fn preference_focus_wraps_both_ways() {
        let mut wizard = BookingWizard::new(BookingDraft::default());
        assert_eq!(wizard.field, PreferenceField::Pressure);
        wizard.prev_field();
        assert_eq!(wizard.field, PreferenceField::Aromatherapy);
        wizard.next_field();
        assert_eq!(wizard.field, PreferenceField::Pressure);
        for field in PreferenceField::ALL {
            assert_eq!(field.next().prev(), field);
        }
    }
}
