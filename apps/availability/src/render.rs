//! Plain-text rendering of the calendar and the submission list.

use std::fmt::Write as _;

use client_core::{ListEntry, EMPTY_HINT, EMPTY_TITLE};
use shared::calendar::{CalendarCell, CalendarMonth, WEEKDAY_HEADERS};

const CELL_WIDTH: usize = 4;

/// Month grid, Sunday first. Selected days are bracketed and today is
/// parenthesized.
pub fn calendar(month: &CalendarMonth, cells: &[(CalendarCell, bool)]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", month.title());

    let header: Vec<String> = WEEKDAY_HEADERS
        .iter()
        .map(|name| format!("{name:<CELL_WIDTH$}"))
        .collect();
    let _ = writeln!(out, "{}", header.concat().trim_end());

    for week in cells.chunks(WEEKDAY_HEADERS.len()) {
        let row: String = week
            .iter()
            .map(|(cell, selected)| calendar_cell(cell, *selected))
            .collect();
        let _ = writeln!(out, "{}", row.trim_end());
    }
    out
}

fn calendar_cell(cell: &CalendarCell, selected: bool) -> String {
    match cell {
        CalendarCell::Placeholder => " ".repeat(CELL_WIDTH),
        CalendarCell::Day { day, is_today } => {
            let (open, close) = match (selected, *is_today) {
                (true, _) => ('[', ']'),
                (false, true) => ('(', ')'),
                (false, false) => (' ', ' '),
            };
            format!("{open}{:02}{close}", day.day())
        }
    }
}

pub fn list(entries: &[ListEntry]) -> String {
    if entries.is_empty() {
        return format!("{EMPTY_TITLE}\n{EMPTY_HINT}\n");
    }

    let mut out = String::new();
    for entry in entries {
        let _ = writeln!(
            out,
            "{} ({}, {})",
            entry.display_name, entry.contract_label, entry.position_label
        );
        let chips: Vec<String> = entry
            .dates
            .iter()
            .map(|chip| format!("{} {}", chip.weekday, chip.day))
            .collect();
        let _ = writeln!(out, "  {}", chips.join("  "));
    }
    out
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
