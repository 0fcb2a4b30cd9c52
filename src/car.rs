use serde::{Deserialize, Serialize};

/// One vehicle trim record as read from the catalog spreadsheet.
///
/// Fields that some rows leave blank are optional; a missing cell and a
/// whitespace-only cell both count as "no value".
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct CarRow {
    pub series: String,
    pub category: String,
    pub grade: String,
    pub color: Option<String>,
    pub engine_cc: Option<f64>,
    pub motor_kw: Option<f64>,
    pub battery_type: Option<String>,
    pub battery_capacity_ah: Option<f64>,
    pub model: String,
}

/// The three filterable fields, in cascade order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterField {
    Series,
    Grade,
    Color,
}

/// Trim a raw cell value; whitespace-only input is "no value".
pub(crate) fn non_empty(s: &str) -> Option<&str> {
    let trimmed = s.trim();
    if trimmed.is_empty() { None } else { Some(trimmed) }
}

impl CarRow {
    /// The comparable value of one filter field, trimmed, or `None` when
    /// the row has no value there.
    pub fn filter_value(&self, field: FilterField) -> Option<&str> {
        match field {
            FilterField::Series => non_empty(&self.series),
            FilterField::Grade => non_empty(&self.grade),
            FilterField::Color => self.color.as_deref().and_then(non_empty),
        }
    }

    /// Trimmed equality against a candidate filter value. A candidate that
    /// trims to nothing matches no row.
    pub fn matches(&self, field: FilterField, value: &str) -> bool {
        match non_empty(value) {
            Some(wanted) => self.filter_value(field) == Some(wanted),
            None => false,
        }
    }
}
