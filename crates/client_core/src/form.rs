//! Availability form state and its submit flow.

use shared::{
    calendar::{toggle, CalendarCell, CalendarDay, CalendarMonth, Selection},
    domain::{ContractType, Position, Submission, SubmissionInput},
};
use tracing::{debug, info, warn};

use crate::{error::FormError, store::SubmissionStore};

/// A single user edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    FirstName(String),
    LastName(String),
    Contract(ContractType),
    Position(Position),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    pub first_name: String,
    pub last_name: String,
    pub contract: ContractType,
    pub position: Position,
    pub selected_dates: Selection,
}

impl FormFields {
    fn to_input(&self) -> SubmissionInput {
        SubmissionInput {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            contract: self.contract,
            position: self.position,
            dates: self.selected_dates.clone(),
        }
    }
}

/// What the presentation layer renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSnapshot {
    pub fields: FormFields,
    pub last_error: Option<FormError>,
}

pub struct FormController {
    month: CalendarMonth,
    fields: FormFields,
    last_error: Option<FormError>,
}

impl FormController {
    pub fn new(month: CalendarMonth) -> Self {
        Self {
            month,
            fields: FormFields::default(),
            last_error: None,
        }
    }

    pub fn month(&self) -> CalendarMonth {
        self.month
    }

    pub fn fields(&self) -> &FormFields {
        &self.fields
    }

    pub fn last_error(&self) -> Option<&FormError> {
        self.last_error.as_ref()
    }

    pub fn snapshot(&self) -> FormSnapshot {
        FormSnapshot {
            fields: self.fields.clone(),
            last_error: self.last_error.clone(),
        }
    }

    pub fn update_field(&mut self, field: Field) {
        match field {
            Field::FirstName(value) => self.fields.first_name = value,
            Field::LastName(value) => self.fields.last_name = value,
            Field::Contract(value) => self.fields.contract = value,
            Field::Position(value) => self.fields.position = value,
        }
    }

    /// Flips `day` in the selection. Days outside the form's month are ignored
    /// and `false` is returned.
    pub fn toggle_date(&mut self, day: CalendarDay) -> bool {
        if !self.month.contains(&day) {
            debug!(%day, month = %self.month.title(), "ignoring toggle outside month");
            return false;
        }
        self.fields.selected_dates = toggle(&self.fields.selected_dates, day);
        true
    }

    pub fn is_selected(&self, day: &CalendarDay) -> bool {
        self.fields.selected_dates.contains(day)
    }

    /// Grid cells paired with their selection state.
    pub fn calendar(&self, today: Option<CalendarDay>) -> Vec<(CalendarCell, bool)> {
        self.month
            .grid(today)
            .into_iter()
            .map(|cell| {
                let selected = cell.day().is_some_and(|day| self.is_selected(&day));
                (cell, selected)
            })
            .collect()
    }

    /// Validates locally, then creates through `store`.
    ///
    /// Local failures never reach the store. On success every field returns
    /// to its initial value; on a store failure the entered values stay put.
    pub async fn submit(&mut self, store: &dyn SubmissionStore) -> Result<Submission, FormError> {
        let input = match self.fields.to_input().normalized() {
            Ok(input) => input,
            Err(issue) => return Err(self.fail(issue.into())),
        };

        match store.create(input).await {
            Ok(submission) => {
                info!(submission_id = %submission.id, "availability submitted");
                self.fields = FormFields::default();
                self.last_error = None;
                Ok(submission)
            }
            Err(err) => {
                warn!(error = %err, "store rejected availability");
                Err(self.fail(err.into()))
            }
        }
    }

    fn fail(&mut self, err: FormError) -> FormError {
        self.last_error = Some(err.clone());
        err
    }
}

#[cfg(test)]
#[path = "tests/form_tests.rs"]
mod tests;
