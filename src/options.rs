use crate::car::{CarRow, FilterField};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One entry in a picker's option list. The label mirrors the value since
/// the catalog uses its raw strings for display.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: &str) -> Self {
        SelectOption {
            value: value.to_string(),
            label: value.to_string(),
        }
    }
}

/// Derive the option list for `target` from the rows matching every
/// `(field, value)` constraint.
///
/// Values are trimmed, blanks are dropped, and duplicates collapse to the
/// first occurrence; the result keeps the order in which values first appear
/// in the filtered row sequence (no sorting).
pub fn derive_options(
    rows: &[CarRow],
    constraints: &[(FilterField, &str)],
    target: FilterField,
) -> Vec<SelectOption> {
    let mut seen = HashSet::new();
    let mut options = Vec::new();

    for row in rows {
        if constraints.iter().any(|(field, value)| !row.matches(*field, value)) {
            continue;
        }
        if let Some(value) = row.filter_value(target) {
            if seen.insert(value.to_string()) {
                options.push(SelectOption::new(value));
            }
        }
    }

    options
}

/// Distinct series names across the whole catalog.
pub fn series_options(rows: &[CarRow]) -> Vec<SelectOption> {
    derive_options(rows, &[], FilterField::Series)
}

/// Distinct grades within one series.
pub fn grade_options(rows: &[CarRow], series: &str) -> Vec<SelectOption> {
    derive_options(rows, &[(FilterField::Series, series)], FilterField::Grade)
}

/// Distinct colors within one series and grade.
pub fn color_options(rows: &[CarRow], series: &str, grade: &str) -> Vec<SelectOption> {
    derive_options(
        rows,
        &[(FilterField::Series, series), (FilterField::Grade, grade)],
        FilterField::Color,
    )
}
