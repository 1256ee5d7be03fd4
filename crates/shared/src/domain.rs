use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calendar::{CalendarDay, CalendarMonth, Selection};

/// Store-assigned submission identity. Opaque to clients.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionId(pub String);

impl SubmissionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! labelled_enum {
    ($name:ident, $kind:literal, { $($variant:ident => ($wire:literal, $label:literal)),+ $(,)? }) => {
        impl $name {
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire),+
                }
            }

            pub fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let needle = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| {
                        v.as_str().eq_ignore_ascii_case(needle)
                            || v.label().to_lowercase() == needle.to_lowercase()
                    })
                    .ok_or_else(|| UnknownVariant {
                        kind: $kind,
                        value: s.to_string(),
                    })
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractType {
    #[default]
    Intermittent,
    Freelancer,
}

labelled_enum!(ContractType, "contract", {
    Intermittent => ("intermittent", "Intermitente"),
    Freelancer => ("freelancer", "Freelancer"),
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    #[default]
    Monitor,
    Receptionist,
    Lifeguard,
    Cleaning,
}

labelled_enum!(Position, "position", {
    Monitor => ("monitor", "Monitor"),
    Receptionist => ("receptionist", "Recepcionista"),
    Lifeguard => ("lifeguard", "Socorrista"),
    Cleaning => ("cleaning", "Limpeza"),
});

/// Why an input cannot become a submission.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputIssue {
    #[error("first and last name are required")]
    MissingName,
    #[error("at least one availability date is required")]
    NoDatesSelected,
    #[error("date {day} is outside {month}")]
    OutsideMonth { day: CalendarDay, month: String },
}

/// Everything a submission carries except its identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionInput {
    pub first_name: String,
    pub last_name: String,
    pub contract: ContractType,
    pub position: Position,
    pub dates: Selection,
}

impl SubmissionInput {
    /// Trims both names and checks the required fields. Date-month checks are
    /// left to [`SubmissionInput::validate_for`].
    pub fn normalized(mut self) -> Result<Self, InputIssue> {
        self.first_name = self.first_name.trim().to_string();
        self.last_name = self.last_name.trim().to_string();
        if self.first_name.is_empty() || self.last_name.is_empty() {
            return Err(InputIssue::MissingName);
        }
        if self.dates.is_empty() {
            return Err(InputIssue::NoDatesSelected);
        }
        Ok(self)
    }

    pub fn validate_for(self, month: &CalendarMonth) -> Result<Self, InputIssue> {
        let input = self.normalized()?;
        if let Some(day) = input.dates.iter().find(|day| !month.contains(day)) {
            return Err(InputIssue::OutsideMonth {
                day: *day,
                month: month.title(),
            });
        }
        Ok(input)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub id: SubmissionId,
    pub first_name: String,
    pub last_name: String,
    pub contract: ContractType,
    pub position: Position,
    pub dates: Selection,
}

impl Submission {
    pub fn from_input(id: SubmissionId, input: SubmissionInput) -> Self {
        Self {
            id,
            first_name: input.first_name,
            last_name: input.last_name,
            contract: input.contract,
            position: input.position,
            dates: input.dates,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
