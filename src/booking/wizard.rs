//! Progressive booking draft. Each step becomes available only once the
//! previous one is answered: time slot, technician, session preference,
//! massage type, then the free-form service preferences and add-ons.

use chrono::NaiveDate;

use super::eligibility::is_bookable;
use crate::error::BookingError;
use crate::models::{AddonRequest, BookingRequest, PrivilegeProfile};

/// Room used until the backend assigns one per service.
pub const DEFAULT_ROOM_ID: u32 = 1;

/// A selectable value with its display label and backend id (zero when the
/// backend does not need one).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Choice {
    pub value: &'static str,
    pub label: &'static str,
    pub id: u32,
}

const fn choice(value: &'static str, label: &'static str) -> Choice {
    Choice { value, label, id: 0 }
}

const fn with_id(value: &'static str, label: &'static str, id: u32) -> Choice {
    Choice { value, label, id }
}

pub const TIME_SLOTS: &[Choice] = &[
    choice("09:00", "9:00 AM - Morning Start"),
    choice("10:00", "10:00 AM - Mid Morning"),
    choice("11:00", "11:00 AM - Late Morning"),
    choice("12:00", "12:00 PM - Noon"),
    choice("13:00", "1:00 PM - Early Afternoon"),
    choice("14:00", "2:00 PM - Afternoon"),
    choice("15:00", "3:00 PM - Mid Afternoon"),
    choice("16:00", "4:00 PM - Late Afternoon"),
    choice("17:00", "5:00 PM - Early Evening"),
    choice("18:00", "6:00 PM - Evening"),
];

pub const TECHNICIANS: &[Choice] = &[
    choice("sarah", "Sarah Johnson - Facial & Skincare Specialist"),
    choice("michael", "Michael Chen - Massage Therapy Expert"),
    choice("emma", "Emma Rodriguez - Laser Treatment Professional"),
    choice("david", "David Kim - AI Massage Bed Specialist"),
    choice("any", "Any Available Technician"),
];

pub const SESSION_PREFERENCES: &[Choice] = &[
    choice("morning", "Morning Session (Energizing)"),
    choice("afternoon", "Afternoon Session (Balanced)"),
    choice("evening", "Evening Session (Relaxing)"),
    choice("flexible", "Flexible Timing"),
];

pub const MASSAGE_TYPES: &[Choice] = &[
    with_id("swedish", "Swedish Massage - Classic Relaxation", 1),
    with_id("deep-tissue", "Deep Tissue - Therapeutic", 2),
    with_id("hot-stone", "Hot Stone - Ultimate Relaxation", 3),
    with_id("ai-massage", "AI Massage Bed - High-Tech Experience", 4),
    with_id("couples", "Couples Massage - Shared Experience", 5),
    with_id("prenatal", "Prenatal Massage - Pregnancy Safe", 6),
];

pub const PRESSURE_LEVELS: &[Choice] = &[
    choice("light", "Light Pressure"),
    choice("medium", "Medium Pressure"),
    choice("firm", "Firm Pressure"),
    choice("deep", "Deep Pressure"),
];

pub const TEMPERATURES: &[Choice] = &[
    choice("cool", "Cool (68-70°F)"),
    choice("moderate", "Moderate (71-73°F)"),
    choice("warm", "Warm (74-76°F)"),
];

pub const MUSIC: &[Choice] = &[
    choice("nature", "Nature Sounds"),
    choice("classical", "Classical Music"),
    choice("ambient", "Ambient/Meditation"),
    choice("silence", "Silence/No Music"),
];

pub const AROMATHERAPY: &[Choice] = &[
    choice("lavender", "Lavender (Calming)"),
    choice("eucalyptus", "Eucalyptus (Refreshing)"),
    choice("peppermint", "Peppermint (Energizing)"),
    choice("none", "No Aromatherapy"),
];

pub const ADDONS: &[Choice] = &[
    with_id("aromatherapy", "Aromatherapy Upgrade", 1),
    with_id("hot-stone", "Hot Stone Add-on", 2),
    with_id("deep-tissue", "Deep Tissue Focus", 3),
];

/// Steps of the wizard in the order they unlock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    Time,
    Technician,
    SessionPreference,
    MassageType,
    Preferences,
}

impl WizardStep {
    pub fn title(&self) -> &'static str {
        match self {
            WizardStep::Time => "AVAILABLE TIME SLOTS",
            WizardStep::Technician => "PREFERRED TECHNICIAN",
            WizardStep::SessionPreference => "SESSION PREFERENCE",
            WizardStep::MassageType => "TYPE OF MASSAGE",
            WizardStep::Preferences => "SERVICE PREFERENCES",
        }
    }

    /// Single-choice options for the step; the preferences step is a form
    /// and returns an empty list.
    pub fn choices(&self) -> &'static [Choice] {
        match self {
            WizardStep::Time => TIME_SLOTS,
            WizardStep::Technician => TECHNICIANS,
            WizardStep::SessionPreference => SESSION_PREFERENCES,
            WizardStep::MassageType => MASSAGE_TYPES,
            WizardStep::Preferences => &[],
        }
    }

    /// 1-based position, for the "step n of 5" hint.
    pub fn number(&self) -> usize {
        match self {
            WizardStep::Time => 1,
            WizardStep::Technician => 2,
            WizardStep::SessionPreference => 3,
            WizardStep::MassageType => 4,
            WizardStep::Preferences => 5,
        }
    }
}

/// Fields on the final preferences step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PreferenceField {
    #[default]
    Pressure,
    Temperature,
    Music,
    Aromatherapy,
}

impl PreferenceField {
    pub const ALL: [PreferenceField; 4] = [
        PreferenceField::Pressure,
        PreferenceField::Temperature,
        PreferenceField::Music,
        PreferenceField::Aromatherapy,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PreferenceField::Pressure => "PRESSURE LEVEL",
            PreferenceField::Temperature => "ROOM TEMPERATURE",
            PreferenceField::Music => "MUSIC PREFERENCE",
            PreferenceField::Aromatherapy => "AROMATHERAPY",
        }
    }

    pub fn choices(&self) -> &'static [Choice] {
        match self {
            PreferenceField::Pressure => PRESSURE_LEVELS,
            PreferenceField::Temperature => TEMPERATURES,
            PreferenceField::Music => MUSIC,
            PreferenceField::Aromatherapy => AROMATHERAPY,
        }
    }

    pub fn next(&self) -> Self {
        match self {
            PreferenceField::Pressure => PreferenceField::Temperature,
            PreferenceField::Temperature => PreferenceField::Music,
            PreferenceField::Music => PreferenceField::Aromatherapy,
            PreferenceField::Aromatherapy => PreferenceField::Pressure,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            PreferenceField::Pressure => PreferenceField::Aromatherapy,
            PreferenceField::Temperature => PreferenceField::Pressure,
            PreferenceField::Music => PreferenceField::Temperature,
            PreferenceField::Aromatherapy => PreferenceField::Music,
        }
    }
}

/// Answers collected so far for one booking.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingDraft {
    pub date: Option<NaiveDate>,
    pub time: Option<&'static str>,
    pub technician: Option<&'static str>,
    pub session_preference: Option<&'static str>,
    pub massage_type: Option<&'static str>,
    pub pressure: Option<&'static str>,
    pub temperature: Option<&'static str>,
    pub music: Option<&'static str>,
    pub aromatherapy: Option<&'static str>,
    pub addons: Vec<&'static str>,
}

impl BookingDraft {
    pub fn for_date(date: Option<NaiveDate>) -> Self {
        Self {
            date,
            ..Self::default()
        }
    }

    /// First unanswered step. Once the massage type is set the draft stays on
    /// the preferences step.
    pub fn current_step(&self) -> WizardStep {
        if self.time.is_none() {
            WizardStep::Time
        } else if self.technician.is_none() {
            WizardStep::Technician
        } else if self.session_preference.is_none() {
            WizardStep::SessionPreference
        } else if self.massage_type.is_none() {
            WizardStep::MassageType
        } else {
            WizardStep::Preferences
        }
    }

    /// Answer the current single-choice step. Returns `false` when the value
    /// is not one of the step's choices.
    pub fn answer(&mut self, value: &str) -> bool {
        let step = self.current_step();
        let Some(choice) = find(step.choices(), value) else {
            return false;
        };
        let slot = match step {
            WizardStep::Time => &mut self.time,
            WizardStep::Technician => &mut self.technician,
            WizardStep::SessionPreference => &mut self.session_preference,
            WizardStep::MassageType => &mut self.massage_type,
            WizardStep::Preferences => return false,
        };
        *slot = Some(choice.value);
        true
    }

    /// Undo the most recent step answer so the user can pick again.
    pub fn step_back(&mut self) -> bool {
        let slots = [
            &mut self.massage_type,
            &mut self.session_preference,
            &mut self.technician,
            &mut self.time,
        ];
        for slot in slots {
            if slot.is_some() {
                *slot = None;
                return true;
            }
        }
        false
    }

    pub fn preference(&self, field: PreferenceField) -> Option<&'static str> {
        match field {
            PreferenceField::Pressure => self.pressure,
            PreferenceField::Temperature => self.temperature,
            PreferenceField::Music => self.music,
            PreferenceField::Aromatherapy => self.aromatherapy,
        }
    }

    fn preference_slot(&mut self, field: PreferenceField) -> &mut Option<&'static str> {
        match field {
            PreferenceField::Pressure => &mut self.pressure,
            PreferenceField::Temperature => &mut self.temperature,
            PreferenceField::Music => &mut self.music,
            PreferenceField::Aromatherapy => &mut self.aromatherapy,
        }
    }

    /// Move a preference through its choices, with "unset" sitting between
    /// the last and the first entry.
    pub fn cycle_preference(&mut self, field: PreferenceField, delta: isize) {
        let choices = field.choices();
        // Position 0 is "unset", 1..=len are the choices.
        let positions = choices.len() as isize + 1;
        let slot = self.preference_slot(field);
        let current = slot
            .and_then(|value| choices.iter().position(|c| c.value == value))
            .map_or(0, |idx| idx as isize + 1);
        let next = (current + delta).rem_euclid(positions);
        *slot = if next == 0 {
            None
        } else {
            Some(choices[next as usize - 1].value)
        };
    }

    /// Toggle an add-on by value. Returns whether it is now included.
    pub fn toggle_addon(&mut self, value: &str) -> bool {
        let Some(choice) = find(ADDONS, value) else {
            return false;
        };
        if let Some(idx) = self.addons.iter().position(|a| *a == choice.value) {
            self.addons.remove(idx);
            false
        } else {
            self.addons.push(choice.value);
            true
        }
    }

    /// Required fields, checked in the order the user fills them.
    pub fn validate(&self) -> Result<NaiveDate, BookingError> {
        let date = self.date.ok_or(BookingError::NoDateSelected)?;
        if self.time.is_none() {
            return Err(BookingError::NoTimeSelected);
        }
        Ok(date)
    }

    /// `Pressure: firm; Music: nature; Session: evening` style notes for the
    /// spa staff. Aromatherapy "none" is left out.
    pub fn special_requests(&self) -> String {
        let mut requests = Vec::new();
        if let Some(pressure) = self.pressure {
            requests.push(format!("Pressure: {pressure}"));
        }
        if let Some(temperature) = self.temperature {
            requests.push(format!("Temperature: {temperature}"));
        }
        if let Some(music) = self.music {
            requests.push(format!("Music: {music}"));
        }
        if let Some(scent) = self.aromatherapy.filter(|scent| *scent != "none") {
            requests.push(format!("Aromatherapy: {scent}"));
        }
        if let Some(session) = self.session_preference {
            requests.push(format!("Session: {session}"));
        }
        requests.join("; ")
    }

    /// Validate the draft, re-check the date against the viewer's privileges
    /// and build the backend payload.
    pub fn to_request(
        &self,
        today: NaiveDate,
        profile: &PrivilegeProfile,
    ) -> Result<BookingRequest, BookingError> {
        let date = self.validate()?;
        if !is_bookable(date, today, profile) {
            return Err(BookingError::DateNotBookable(date));
        }

        let service_id = self
            .massage_type
            .and_then(|value| find(MASSAGE_TYPES, value))
            .map_or(MASSAGE_TYPES[0].id, |c| c.id);

        let addons = self
            .addons
            .iter()
            .map(|value| AddonRequest {
                addon_id: find(ADDONS, value).map_or(ADDONS[0].id, |c| c.id),
                quantity: 1,
            })
            .collect();

        Ok(BookingRequest {
            service_id,
            date,
            start_time: self.time.unwrap_or_default().to_string(),
            room_id: DEFAULT_ROOM_ID,
            technician_preference: self.technician.unwrap_or("any").to_string(),
            addons,
            notes: self.special_requests(),
        })
    }
}

/// Look up a choice by its value.
pub fn find(choices: &'static [Choice], value: &str) -> Option<&'static Choice> {
    choices.iter().find(|c| c.value == value)
}
