//! Mood reminder windows and their on/off switches

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::clock::ClockTime;

/// A time range in which one mood reminder is sent
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ReminderWindow {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl ReminderWindow {
    pub const ALL: [ReminderWindow; 4] = [
        ReminderWindow::Morning,
        ReminderWindow::Afternoon,
        ReminderWindow::Evening,
        ReminderWindow::Night,
    ];

    /// First hour of the window
    pub fn start_hour(&self) -> u32 {
        match self {
            ReminderWindow::Morning => 9,
            ReminderWindow::Afternoon => 12,
            ReminderWindow::Evening => 16,
            ReminderWindow::Night => 20,
        }
    }

    /// Hour the window closes at (exclusive)
    pub fn end_hour(&self) -> u32 {
        match self {
            ReminderWindow::Morning => 12,
            ReminderWindow::Afternoon => 16,
            ReminderWindow::Evening => 20,
            ReminderWindow::Night => 23,
        }
    }

    pub fn contains_hour(&self, hour: u32) -> bool {
        (self.start_hour()..self.end_hour()).contains(&hour)
    }

    /// The window an hour falls in, if any
    pub fn for_hour(hour: u32) -> Option<Self> {
        Self::ALL.iter().copied().find(|w| w.contains_hour(hour))
    }

    /// Persisted switch key, e.g. `switch9To12`
    pub fn switch_key(&self) -> String {
        format!("switch{}To{}", self.start_hour(), self.end_hour())
    }

    /// Accepts `9-12`, `9To12` or the switch key
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim().trim_start_matches("switch");
        let (start, end) = text.split_once('-').or_else(|| text.split_once("To"))?;
        let start: u32 = start.trim().parse().ok()?;
        let end: u32 = end.trim().parse().ok()?;
        Self::ALL
            .iter()
            .copied()
            .find(|w| w.start_hour() == start && w.end_hour() == end)
    }
}

impl fmt::Display for ReminderWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:00-{:02}:00", self.start_hour(), self.end_hour())
    }
}

/// Which reminder windows are switched on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReminderSettings {
    pub morning: bool,
    pub afternoon: bool,
    pub evening: bool,
    pub night: bool,
}

impl ReminderSettings {
    /// Switches set on first launch
    pub fn first_launch() -> Self {
        Self {
            morning: true,
            afternoon: false,
            evening: true,
            night: false,
        }
    }

    pub fn is_enabled(&self, window: ReminderWindow) -> bool {
        match window {
            ReminderWindow::Morning => self.morning,
            ReminderWindow::Afternoon => self.afternoon,
            ReminderWindow::Evening => self.evening,
            ReminderWindow::Night => self.night,
        }
    }

    pub fn set(&mut self, window: ReminderWindow, enabled: bool) {
        match window {
            ReminderWindow::Morning => self.morning = enabled,
            ReminderWindow::Afternoon => self.afternoon = enabled,
            ReminderWindow::Evening => self.evening = enabled,
            ReminderWindow::Night => self.night = enabled,
        }
    }

    pub fn enabled_windows(&self) -> impl Iterator<Item = ReminderWindow> + '_ {
        ReminderWindow::ALL
            .into_iter()
            .filter(move |w| self.is_enabled(*w))
    }
}

/// A reminder planned for a specific day and time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedReminder {
    /// `{yyyy-MM-dd}{start}To{end}`
    pub id: String,
    pub date: NaiveDate,
    pub time: ClockTime,
    pub start_hour: u32,
    pub end_hour: u32,
}

impl PlannedReminder {
    pub fn new(date: NaiveDate, time: ClockTime, start_hour: u32, end_hour: u32) -> Self {
        Self {
            id: format!("{}{}To{}", date.format("%Y-%m-%d"), start_hour, end_hour),
            date,
            time,
            start_hour,
            end_hour,
        }
    }
}
