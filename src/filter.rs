use crate::car::{CarRow, FilterField, non_empty};
use crate::options::{self, SelectOption};
use serde::{Deserialize, Serialize};

/// What the view shows when no filter is active: the whole catalog (table
/// variant) or nothing until a series is picked (card variant).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmptySelectionBehavior {
    ShowAll,
    #[default]
    ShowNone,
}

impl EmptySelectionBehavior {
    /// Parse the CLI spelling (`show-all` / `show-none`).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "show-all" | "showall" | "all" => Some(EmptySelectionBehavior::ShowAll),
            "show-none" | "shownone" | "none" => Some(EmptySelectionBehavior::ShowNone),
            _ => None,
        }
    }
}

/// The three nullable selection slots, in cascade order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub series: Option<String>,
    pub grade: Option<String>,
    pub color: Option<String>,
}

impl Selection {
    /// The active `(field, value)` constraints, in series → grade → color
    /// order. Slots holding whitespace-only values contribute nothing.
    pub fn constraints(&self) -> Vec<(FilterField, &str)> {
        let mut constraints = Vec::new();
        if let Some(series) = self.series.as_deref().and_then(non_empty) {
            constraints.push((FilterField::Series, series));
        }
        if let Some(grade) = self.grade.as_deref().and_then(non_empty) {
            constraints.push((FilterField::Grade, grade));
        }
        if let Some(color) = self.color.as_deref().and_then(non_empty) {
            constraints.push((FilterField::Color, color));
        }
        constraints
    }

    pub fn is_empty(&self) -> bool {
        self.constraints().is_empty()
    }
}

/// Apply every active slot as a trimmed-equality filter, in cascade order,
/// keeping the source row order. With no active slot the result is the whole
/// catalog or nothing, per `behavior`.
pub fn compute_visible_rows(
    rows: &[CarRow],
    selection: &Selection,
    behavior: EmptySelectionBehavior,
) -> Vec<CarRow> {
    let constraints = selection.constraints();
    if constraints.is_empty() {
        return match behavior {
            EmptySelectionBehavior::ShowAll => rows.to_vec(),
            EmptySelectionBehavior::ShowNone => Vec::new(),
        };
    }

    rows.iter()
        .filter(|row| constraints.iter().all(|(field, value)| row.matches(*field, value)))
        .cloned()
        .collect()
}

/// Owns the immutable row set and all derived filter state.
///
/// Every mutating call settles the full cascade before returning: option
/// lists are re-derived, stale downstream selections are cleared, and the
/// visible row set is recomputed. Callers never observe a half-applied
/// selection.
pub struct FilterController {
    rows: Vec<CarRow>,
    behavior: EmptySelectionBehavior,
    selection: Selection,
    series_opts: Vec<SelectOption>,
    grade_opts: Vec<SelectOption>,
    color_opts: Vec<SelectOption>,
    visible: Vec<CarRow>,
}

impl FilterController {
    pub fn new(rows: Vec<CarRow>, behavior: EmptySelectionBehavior) -> Self {
        let mut controller = FilterController {
            series_opts: options::series_options(&rows),
            rows,
            behavior,
            selection: Selection::default(),
            grade_opts: Vec::new(),
            color_opts: Vec::new(),
            visible: Vec::new(),
        };
        controller.recompute();
        controller
    }

    /// Pick a series (or clear it with `None`). Downstream slots always
    /// reset.
    pub fn select_series(&mut self, value: Option<String>) {
        self.selection.series = normalized(value);
        self.selection.grade = None;
        self.selection.color = None;
        self.recompute();
    }

    /// Pick a grade within the current series. The color slot resets.
    pub fn select_grade(&mut self, value: Option<String>) {
        self.selection.grade = normalized(value);
        self.selection.color = None;
        self.recompute();
    }

    /// Pick a color within the current series and grade.
    pub fn select_color(&mut self, value: Option<String>) {
        self.selection.color = normalized(value);
        self.recompute();
    }

    /// Reset every slot. Idempotent.
    pub fn clear_all(&mut self) {
        self.selection = Selection::default();
        self.recompute();
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn behavior(&self) -> EmptySelectionBehavior {
        self.behavior
    }

    pub fn series_options(&self) -> &[SelectOption] {
        &self.series_opts
    }

    pub fn grade_options(&self) -> &[SelectOption] {
        &self.grade_opts
    }

    pub fn color_options(&self) -> &[SelectOption] {
        &self.color_opts
    }

    pub fn visible_rows(&self) -> &[CarRow] {
        &self.visible
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Settle the cascade: validate each slot against its freshly derived
    /// option list (a value that is no longer offered clears itself and
    /// everything downstream), then recompute the visible rows.
    fn recompute(&mut self) {
        if let Some(series) = self.selection.series.as_deref() {
            if !contains_value(&self.series_opts, series) {
                self.selection.series = None;
                self.selection.grade = None;
                self.selection.color = None;
            }
        }

        self.grade_opts = match self.selection.series.as_deref() {
            Some(series) => options::grade_options(&self.rows, series),
            None => Vec::new(),
        };
        if let Some(grade) = self.selection.grade.as_deref() {
            if !contains_value(&self.grade_opts, grade) {
                self.selection.grade = None;
                self.selection.color = None;
            }
        }

        self.color_opts = match (self.selection.series.as_deref(), self.selection.grade.as_deref()) {
            (Some(series), Some(grade)) => options::color_options(&self.rows, series, grade),
            _ => Vec::new(),
        };
        if let Some(color) = self.selection.color.as_deref() {
            if !contains_value(&self.color_opts, color) {
                self.selection.color = None;
            }
        }

        self.visible = compute_visible_rows(&self.rows, &self.selection, self.behavior);
    }
}

fn contains_value(options: &[SelectOption], value: &str) -> bool {
    options.iter().any(|option| option.value == value)
}

fn normalized(value: Option<String>) -> Option<String> {
    value.as_deref().and_then(non_empty).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(series: &str, grade: &str, color: Option<&str>) -> CarRow {
        CarRow {
            series: series.to_string(),
            category: "Passenger".to_string(),
            grade: grade.to_string(),
            color: color.map(str::to_string),
            model: format!("{}-{}", series, grade),
            ..CarRow::default()
        }
    }

    fn catalog() -> Vec<CarRow> {
        vec![
            row("A", "G1", Some("Red")),
            row("A", "G1", Some("Blue")),
            row("A", "G2", Some("Red")),
            row("B", "G3", Some("Green")),
        ]
    }

    fn sel(series: Option<&str>, grade: Option<&str>, color: Option<&str>) -> Selection {
        Selection {
            series: series.map(str::to_string),
            grade: grade.map(str::to_string),
            color: color.map(str::to_string),
        }
    }

    fn option_values(options: &[SelectOption]) -> Vec<&str> {
        options.iter().map(|o| o.value.as_str()).collect()
    }

    #[test]
    fn empty_selection_follows_configured_behavior() {
        let rows = catalog();
        let none = Selection::default();
        assert_eq!(
            compute_visible_rows(&rows, &none, EmptySelectionBehavior::ShowAll),
            rows
        );
        assert!(compute_visible_rows(&rows, &none, EmptySelectionBehavior::ShowNone).is_empty());
    }

    #[test]
    fn full_selection_matches_exactly_in_source_order() {
        let rows = catalog();
        let visible = compute_visible_rows(
            &rows,
            &sel(Some("A"), Some("G1"), Some("Red")),
            EmptySelectionBehavior::ShowNone,
        );
        assert_eq!(visible, vec![rows[0].clone()]);

        let two = compute_visible_rows(
            &rows,
            &sel(Some("A"), Some("G1"), None),
            EmptySelectionBehavior::ShowNone,
        );
        assert_eq!(two, vec![rows[0].clone(), rows[1].clone()]);
    }

    #[test]
    fn equality_is_trimmed_on_both_sides() {
        let rows = vec![row("  A ", " G1 ", Some(" Red "))];
        let visible = compute_visible_rows(
            &rows,
            &sel(Some("A  "), Some("G1"), Some("  Red")),
            EmptySelectionBehavior::ShowNone,
        );
        assert_eq!(visible.len(), 1);
    }

    #[test]
    fn whitespace_only_slot_is_inactive() {
        let rows = catalog();
        let selection = sel(Some("   "), None, None);
        assert!(selection.is_empty());
        assert_eq!(
            compute_visible_rows(&rows, &selection, EmptySelectionBehavior::ShowAll).len(),
            rows.len()
        );
    }

    #[test]
    fn controller_walks_the_cascade() {
        let mut controller =
            FilterController::new(catalog(), EmptySelectionBehavior::ShowNone);
        assert_eq!(option_values(controller.series_options()), vec!["A", "B"]);
        assert!(controller.visible_rows().is_empty());

        controller.select_series(Some("A".to_string()));
        assert_eq!(option_values(controller.grade_options()), vec!["G1", "G2"]);
        assert!(controller.color_options().is_empty());

        controller.select_grade(Some("G1".to_string()));
        assert_eq!(option_values(controller.color_options()), vec!["Red", "Blue"]);
        assert_eq!(controller.visible_rows().len(), 2);

        controller.select_color(Some("Blue".to_string()));
        assert_eq!(controller.visible_rows().len(), 1);
        assert_eq!(controller.visible_rows()[0].color.as_deref(), Some("Blue"));
    }

    #[test]
    fn changing_series_resets_downstream_slots_and_lists() {
        let mut controller =
            FilterController::new(catalog(), EmptySelectionBehavior::ShowNone);
        controller.select_series(Some("A".to_string()));
        controller.select_grade(Some("G1".to_string()));
        controller.select_color(Some("Blue".to_string()));

        controller.select_series(Some("B".to_string()));
        assert_eq!(controller.selection().grade, None);
        assert_eq!(controller.selection().color, None);
        assert_eq!(option_values(controller.grade_options()), vec!["G3"]);
        assert!(controller.color_options().is_empty());
        assert_eq!(controller.visible_rows().len(), 1);
        assert_eq!(controller.visible_rows()[0].series, "B");
    }

    #[test]
    fn changing_grade_resets_color() {
        let mut controller =
            FilterController::new(catalog(), EmptySelectionBehavior::ShowNone);
        controller.select_series(Some("A".to_string()));
        controller.select_grade(Some("G1".to_string()));
        controller.select_color(Some("Red".to_string()));

        controller.select_grade(Some("G2".to_string()));
        assert_eq!(controller.selection().color, None);
        assert_eq!(option_values(controller.color_options()), vec!["Red"]);
        assert_eq!(controller.visible_rows().len(), 1);
    }

    #[test]
    fn clearing_series_empties_downstream_option_lists() {
        let mut controller =
            FilterController::new(catalog(), EmptySelectionBehavior::ShowNone);
        controller.select_series(Some("A".to_string()));
        controller.select_grade(Some("G1".to_string()));

        controller.select_series(None);
        assert_eq!(controller.selection(), &Selection::default());
        assert!(controller.grade_options().is_empty());
        assert!(controller.color_options().is_empty());
        assert!(controller.visible_rows().is_empty());
    }

    #[test]
    fn values_outside_the_option_list_clear_themselves() {
        let mut controller =
            FilterController::new(catalog(), EmptySelectionBehavior::ShowNone);

        controller.select_series(Some("Nonexistent".to_string()));
        assert_eq!(controller.selection().series, None);

        controller.select_series(Some("A".to_string()));
        controller.select_grade(Some("G9".to_string()));
        assert_eq!(controller.selection().grade, None);
        assert!(controller.color_options().is_empty());

        controller.select_grade(Some("G1".to_string()));
        controller.select_color(Some("Chartreuse".to_string()));
        assert_eq!(controller.selection().color, None);
        assert_eq!(controller.visible_rows().len(), 2);
    }

    #[test]
    fn grade_without_series_stays_unselected() {
        let mut controller =
            FilterController::new(catalog(), EmptySelectionBehavior::ShowNone);
        controller.select_grade(Some("G1".to_string()));
        assert_eq!(controller.selection().grade, None);
        assert!(controller.visible_rows().is_empty());
    }

    #[test]
    fn clear_all_is_idempotent() {
        let mut controller =
            FilterController::new(catalog(), EmptySelectionBehavior::ShowAll);
        controller.select_series(Some("A".to_string()));
        controller.select_grade(Some("G2".to_string()));

        controller.clear_all();
        let selection = controller.selection().clone();
        let visible = controller.visible_rows().to_vec();

        controller.clear_all();
        assert_eq!(controller.selection(), &selection);
        assert_eq!(controller.visible_rows(), visible.as_slice());
        assert_eq!(controller.visible_rows().len(), 4);
    }

    #[test]
    fn show_all_controller_starts_with_the_whole_catalog() {
        let controller = FilterController::new(catalog(), EmptySelectionBehavior::ShowAll);
        assert_eq!(controller.visible_rows().len(), 4);
        assert_eq!(controller.row_count(), 4);
    }

    #[test]
    fn empty_catalog_yields_no_options_and_no_rows() {
        let controller = FilterController::new(Vec::new(), EmptySelectionBehavior::ShowAll);
        assert!(controller.series_options().is_empty());
        assert!(controller.visible_rows().is_empty());
    }

    #[test]
    fn behavior_parses_cli_spellings() {
        assert_eq!(
            EmptySelectionBehavior::parse("show-all"),
            Some(EmptySelectionBehavior::ShowAll)
        );
        assert_eq!(
            EmptySelectionBehavior::parse("SHOW-NONE"),
            Some(EmptySelectionBehavior::ShowNone)
        );
        assert_eq!(EmptySelectionBehavior::parse("sideways"), None);
    }
}
