#![cfg(not(tarpaulin_include))]

use crate::car::CarRow;
use std::error::Error;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Column headers expected in the first worksheet row. Rows are keyed by
/// header name, so column order in the file does not matter.
pub const SERIES_HEADER: &str = "Series Name";
pub const CATEGORY_HEADER: &str = "Vehicle Category";
pub const GRADE_HEADER: &str = "Grade";
pub const COLOR_HEADER: &str = "Color";
pub const ENGINE_CC_HEADER: &str = "Engine Displacement (cc)";
pub const MOTOR_KW_HEADER: &str = "Motor Power (kW)";
pub const BATTERY_TYPE_HEADER: &str = "Battery Type";
pub const BATTERY_CAPACITY_HEADER: &str = "Battery Capacity (Ah)";
pub const MODEL_HEADER: &str = "Model Code";

/// Load the catalog from a CSV file
///
/// The first line is the header row; every following non-blank line becomes
/// one `CarRow`. Quoted fields with embedded commas and doubled quotes are
/// handled.
///
/// # Arguments
/// * `filepath` - Path to the CSV file to load
///
/// # Returns
/// * `Result<Vec<CarRow>, Box<dyn Error>>` - The loaded rows or an error
///
/// # Examples
/// ```no_run
/// use carfilter::loader::from_csv;
///
/// match from_csv("catalog.csv") {
///     Ok(rows) => println!("Loaded {} catalog rows", rows.len()),
///     Err(e) => eprintln!("Error loading CSV: {}", e),
/// }
/// ```
pub fn from_csv(filepath: impl AsRef<Path>) -> Result<Vec<CarRow>, Box<dyn Error>> {
    let file = File::open(filepath)?;
    let reader = BufReader::new(file);
    let lines: Vec<String> = reader.lines().collect::<Result<_, _>>()?;

    if lines.is_empty() {
        return Err("CSV file is empty".into());
    }

    let headers = parse_csv_row(&lines[0])?;
    let columns = ColumnMap::from_headers(headers.iter().map(String::as_str));

    let mut rows = Vec::new();
    for line in &lines[1..] {
        if line.trim().is_empty() {
            continue;
        }
        let fields = parse_csv_row(line)?;
        rows.push(columns.row_from_texts(&fields));
    }

    Ok(rows)
}

/// Load the catalog from an Excel file
///
/// Reads the first worksheet of an XLSX workbook, treating the first row as
/// headers and every following row as one record. Numeric cells feed the
/// numeric fields; anything else is read as text.
///
/// # Arguments
/// * `filepath` - Path to the Excel file to load
///
/// # Returns
/// * `Result<Vec<CarRow>, Box<dyn Error>>` - The loaded rows or an error
///
/// # Examples
/// ```no_run
/// use carfilter::loader::from_excel;
///
/// match from_excel("catalog.xlsx") {
///     Ok(rows) => println!("Loaded {} catalog rows", rows.len()),
///     Err(e) => eprintln!("Error loading Excel: {}", e),
/// }
/// ```
pub fn from_excel(filepath: impl AsRef<Path>) -> Result<Vec<CarRow>, Box<dyn Error>> {
    use calamine::{Reader, Xlsx, open_workbook};

    let mut workbook: Xlsx<_> = open_workbook(filepath)?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or("No sheets found in Excel file")?;

    let range = workbook.worksheet_range(&sheet_name)?;

    let mut sheet_rows = range.rows();
    let headers: Vec<String> = match sheet_rows.next() {
        Some(header_row) => header_row
            .iter()
            .map(|cell| cell_to_text(cell).unwrap_or_default())
            .collect(),
        None => return Err("Excel sheet is empty".into()),
    };
    let columns = ColumnMap::from_headers(headers.iter().map(String::as_str));

    let mut rows = Vec::new();
    for sheet_row in sheet_rows {
        let texts: Vec<String> = sheet_row
            .iter()
            .map(|cell| cell_to_text(cell).unwrap_or_default())
            .collect();
        if texts.iter().all(|text| text.trim().is_empty()) {
            continue;
        }
        rows.push(columns.row_from_texts(&texts));
    }

    Ok(rows)
}

/// Detect file type and load appropriate format
///
/// Examines the file extension and calls the CSV or Excel loader.
///
/// # Arguments
/// * `filepath` - Path to the file to load
///
/// # Returns
/// * `Result<Vec<CarRow>, Box<dyn Error>>` - The loaded rows or an error
pub fn load_catalog(filepath: impl AsRef<Path>) -> Result<Vec<CarRow>, Box<dyn Error>> {
    let path = filepath.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase());

    match extension.as_deref() {
        Some("csv") => from_csv(path),
        Some("xlsx") | Some("xls") => from_excel(path),
        Some(ext) => Err(format!("Unsupported file extension: {}", ext).into()),
        None => Err("File has no extension".into()),
    }
}

/// Load the catalog, degrading to an empty row set on any error.
///
/// This is the startup path: a missing or undecodable file is logged and the
/// application runs with no data and no options. No retry is performed.
pub fn load_catalog_or_empty(filepath: impl AsRef<Path>) -> Vec<CarRow> {
    let path = filepath.as_ref();
    match load_catalog(path) {
        Ok(rows) => rows,
        Err(e) => {
            log::error!("Error loading catalog from {}: {}", path.display(), e);
            Vec::new()
        }
    }
}

// Header-name -> column-index mapping for one worksheet.
#[derive(Default)]
struct ColumnMap {
    series: Option<usize>,
    category: Option<usize>,
    grade: Option<usize>,
    color: Option<usize>,
    engine_cc: Option<usize>,
    motor_kw: Option<usize>,
    battery_type: Option<usize>,
    battery_capacity: Option<usize>,
    model: Option<usize>,
}

impl ColumnMap {
    fn from_headers<'a>(headers: impl Iterator<Item = &'a str>) -> Self {
        let mut map = ColumnMap::default();
        for (index, header) in headers.enumerate() {
            match header.trim() {
                SERIES_HEADER => map.series = Some(index),
                CATEGORY_HEADER => map.category = Some(index),
                GRADE_HEADER => map.grade = Some(index),
                COLOR_HEADER => map.color = Some(index),
                ENGINE_CC_HEADER => map.engine_cc = Some(index),
                MOTOR_KW_HEADER => map.motor_kw = Some(index),
                BATTERY_TYPE_HEADER => map.battery_type = Some(index),
                BATTERY_CAPACITY_HEADER => map.battery_capacity = Some(index),
                MODEL_HEADER => map.model = Some(index),
                _ => {} // unknown columns are ignored
            }
        }
        map
    }

    fn row_from_texts(&self, fields: &[String]) -> CarRow {
        CarRow {
            series: text_field(fields, self.series).unwrap_or_default(),
            category: text_field(fields, self.category).unwrap_or_default(),
            grade: text_field(fields, self.grade).unwrap_or_default(),
            color: text_field(fields, self.color),
            engine_cc: number_field(fields, self.engine_cc),
            motor_kw: number_field(fields, self.motor_kw),
            battery_type: text_field(fields, self.battery_type),
            battery_capacity_ah: number_field(fields, self.battery_capacity),
            model: text_field(fields, self.model).unwrap_or_default(),
        }
    }
}

// Blank cells and absent columns both read as None.
fn text_field(fields: &[String], index: Option<usize>) -> Option<String> {
    index
        .and_then(|i| fields.get(i))
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn number_field(fields: &[String], index: Option<usize>) -> Option<f64> {
    text_field(fields, index).and_then(|value| value.parse().ok())
}

fn cell_to_text(cell: &calamine::Data) -> Option<String> {
    use calamine::Data;

    match cell {
        Data::Empty => None,
        Data::String(s) => Some(s.clone()),
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) => Some(f.to_string()),
        Data::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

// Parse a CSV row into a vector of strings
fn parse_csv_row(line: &str) -> Result<Vec<String>, Box<dyn Error>> {
    let mut result = Vec::new();
    let mut current_field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' => {
                if let Some(&next) = chars.peek() {
                    if next == '"' && in_quotes {
                        // Double quote inside quoted field - add a single quote
                        current_field.push('"');
                        chars.next();
                    } else {
                        // Toggle quote state
                        in_quotes = !in_quotes;
                    }
                } else {
                    in_quotes = !in_quotes;
                }
            }
            ',' if !in_quotes => {
                // End of field
                result.push(current_field);
                current_field = String::new();
            }
            _ => {
                current_field.push(c);
            }
        }
    }

    // Add the last field
    result.push(current_field);

    Ok(result)
}
