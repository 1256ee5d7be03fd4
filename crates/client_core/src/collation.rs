//! Name ordering close to what a Portuguese-locale collator produces.
//!
//! Strings compare on base letters first (case and accents ignored), then on
//! accents, then on case with lowercase first. Equal at all three levels
//! means equal.

use std::cmp::Ordering;

use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

pub fn compare(a: &str, b: &str) -> Ordering {
    primary_key(a)
        .cmp(primary_key(b))
        .then_with(|| secondary_key(a).cmp(secondary_key(b)))
        .then_with(|| tertiary_key(a).cmp(tertiary_key(b)))
}

/// Decomposed, lowercased letters with every combining mark removed.
fn primary_key(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .map(base_letter)
}

/// Decomposed and lowercased, marks kept.
fn secondary_key(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd().flat_map(char::to_lowercase)
}

fn tertiary_key(s: &str) -> impl Iterator<Item = bool> + '_ {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .map(char::is_uppercase)
}

/// Letters with a stroke have no canonical decomposition.
fn base_letter(c: char) -> char {
    match c {
        'đ' => 'd',
        'ı' => 'i',
        'ł' => 'l',
        'ø' => 'o',
        other => other,
    }
}
