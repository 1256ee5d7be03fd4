//! Ordering and row shaping for the submission list.

use shared::{calendar::CalendarDay, domain::Submission};

use crate::collation;

pub const EMPTY_TITLE: &str = "Nenhuma disponibilidade registrada";
pub const EMPTY_HINT: &str = "Quando alguém registrar, aparecerá aqui.";

/// Submissions ordered by last name, locale-aware and stable. The input is
/// left untouched.
pub fn sorted_view(submissions: &[Submission]) -> Vec<Submission> {
    let mut sorted = submissions.to_vec();
    sorted.sort_by(|a, b| collation::compare(&a.last_name, &b.last_name));
    sorted
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateChip {
    pub weekday: &'static str,
    /// Zero-padded day of month.
    pub day: String,
}

impl From<CalendarDay> for DateChip {
    fn from(value: CalendarDay) -> Self {
        Self {
            weekday: value.weekday_short(),
            day: format!("{:02}", value.day()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    pub id: String,
    pub display_name: String,
    pub contract_label: &'static str,
    pub position_label: &'static str,
    pub dates: Vec<DateChip>,
}

impl From<&Submission> for ListEntry {
    fn from(value: &Submission) -> Self {
        Self {
            id: value.id.to_string(),
            display_name: value.full_name(),
            contract_label: value.contract.label(),
            position_label: value.position.label(),
            dates: value.dates.iter().copied().map(DateChip::from).collect(),
        }
    }
}

pub fn list_entries(submissions: &[Submission]) -> Vec<ListEntry> {
    sorted_view(submissions).iter().map(ListEntry::from).collect()
}

#[cfg(test)]
#[path = "tests/list_view_tests.rs"]
mod tests;
