//! Calendar-day values and the month grid used by the availability form.
//!
//! A [`CalendarDay`] is a date with no time-of-day attached. Every lookup,
//! insertion and removal of selected dates goes through its equality, so two
//! values built from different instants on the same date are the same day.

use std::{collections::BTreeSet, fmt, str::FromStr};

use chrono::{DateTime, Datelike, Months, NaiveDate, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Column headers of the grid, Sunday first.
pub const WEEKDAY_HEADERS: [&str; 7] = ["Dom", "Seg", "Ter", "Qua", "Qui", "Sex", "Sáb"];

const MONTH_NAMES: [&str; 12] = [
    "janeiro",
    "fevereiro",
    "março",
    "abril",
    "maio",
    "junho",
    "julho",
    "agosto",
    "setembro",
    "outubro",
    "novembro",
    "dezembro",
];

pub const DEFAULT_YEAR: i32 = 2024;
pub const DEFAULT_MONTH: u32 = 11;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalendarError {
    #[error("invalid month {year}-{month:02}")]
    InvalidMonth { year: i32, month: u32 },
    #[error("invalid calendar date '{0}'")]
    InvalidDate(String),
}

/// Dates a user has toggled on, always in ascending calendar order.
pub type Selection = BTreeSet<CalendarDay>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CalendarDay(NaiveDate);

impl CalendarDay {
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self, CalendarError> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or_else(|| CalendarError::InvalidDate(format!("{year}-{month:02}-{day:02}")))
    }

    /// Takes the calendar date of `value` in its own timezone and drops the time.
    pub fn from_datetime<Tz: TimeZone>(value: &DateTime<Tz>) -> Self {
        Self(value.date_naive())
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Three-letter pt-BR weekday, as printed above each date chip.
    pub fn weekday_short(&self) -> &'static str {
        WEEKDAY_HEADERS[self.0.weekday().num_days_from_sunday() as usize]
    }
}

impl From<NaiveDate> for CalendarDay {
    fn from(value: NaiveDate) -> Self {
        Self(value)
    }
}

impl From<NaiveDateTime> for CalendarDay {
    fn from(value: NaiveDateTime) -> Self {
        Self(value.date())
    }
}

impl FromStr for CalendarDay {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Self)
            .map_err(|_| CalendarError::InvalidDate(s.to_string()))
    }
}

impl fmt::Display for CalendarDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// True when both values name the same (year, month, day).
pub fn is_same_day(a: &CalendarDay, b: &CalendarDay) -> bool {
    a.year() == b.year() && a.month() == b.month() && a.day() == b.day()
}

/// Removes `day` from the selection if present, otherwise inserts it.
pub fn toggle(selected: &Selection, day: CalendarDay) -> Selection {
    let mut next = selected.clone();
    if !next.remove(&day) {
        next.insert(day);
    }
    next
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarCell {
    /// Leading blank that aligns the 1st under its weekday column.
    Placeholder,
    Day { day: CalendarDay, is_today: bool },
}

impl CalendarCell {
    pub fn day(&self) -> Option<CalendarDay> {
        match self {
            Self::Placeholder => None,
            Self::Day { day, .. } => Some(*day),
        }
    }

    pub fn is_selectable(&self) -> bool {
        matches!(self, Self::Day { .. })
    }
}

/// The single month a deployment collects availability for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CalendarMonth {
    first: NaiveDate,
}

impl CalendarMonth {
    pub fn new(year: i32, month: u32) -> Result<Self, CalendarError> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or(CalendarError::InvalidMonth { year, month })?;
        // The last representable month has no successor to measure its length against.
        first
            .checked_add_months(Months::new(1))
            .ok_or(CalendarError::InvalidMonth { year, month })?;
        Ok(Self { first })
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    pub fn month(&self) -> u32 {
        self.first.month()
    }

    pub fn len(&self) -> usize {
        self.first
            .checked_add_months(Months::new(1))
            .map(|next| next.signed_duration_since(self.first).num_days())
            .and_then(|days| usize::try_from(days).ok())
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, day: &CalendarDay) -> bool {
        day.year() == self.year() && day.month() == self.month()
    }

    pub fn days(&self) -> impl Iterator<Item = CalendarDay> {
        self.first.iter_days().take(self.len()).map(CalendarDay)
    }

    /// Number of placeholders before the 1st, counting Sunday as column zero.
    pub fn leading_blanks(&self) -> usize {
        self.first.weekday().num_days_from_sunday() as usize
    }

    pub fn grid(&self, today: Option<CalendarDay>) -> Vec<CalendarCell> {
        let mut cells = Vec::with_capacity(self.leading_blanks() + self.len());
        cells.extend(std::iter::repeat(CalendarCell::Placeholder).take(self.leading_blanks()));
        cells.extend(self.days().map(|day| CalendarCell::Day {
            day,
            is_today: today.is_some_and(|today| is_same_day(&today, &day)),
        }));
        cells
    }

    pub fn title(&self) -> String {
        format!(
            "{} de {}",
            MONTH_NAMES[self.month() as usize - 1],
            self.year()
        )
    }
}

impl Default for CalendarMonth {
    fn default() -> Self {
        Self {
            first: NaiveDate::from_ymd_opt(DEFAULT_YEAR, DEFAULT_MONTH, 1).unwrap_or(NaiveDate::MIN),
        }
    }
}

/// Grid for `year`/`month`: placeholders first, then every day in ascending order.
pub fn days_in_month(year: i32, month: u32) -> Result<Vec<CalendarCell>, CalendarError> {
    Ok(CalendarMonth::new(year, month)?.grid(None))
}
