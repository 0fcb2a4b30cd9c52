#![cfg(not(tarpaulin_include))]

use crate::car::CarRow;
use crate::loader::{
    BATTERY_CAPACITY_HEADER, BATTERY_TYPE_HEADER, CATEGORY_HEADER, COLOR_HEADER, ENGINE_CC_HEADER,
    GRADE_HEADER, MODEL_HEADER, MOTOR_KW_HEADER, SERIES_HEADER,
};
use std::error::Error;

const EXPORT_HEADERS: [&str; 9] = [
    SERIES_HEADER,
    CATEGORY_HEADER,
    GRADE_HEADER,
    COLOR_HEADER,
    ENGINE_CC_HEADER,
    MOTOR_KW_HEADER,
    BATTERY_TYPE_HEADER,
    BATTERY_CAPACITY_HEADER,
    MODEL_HEADER,
];

/// Convert the visible rows to CSV format
///
/// Produces one header line followed by one line per row, with the same
/// column set and order as the input spreadsheet. Fields containing commas,
/// quotes, or newlines are quoted with doubled inner quotes.
///
/// # Arguments
/// * `rows` - The rows to export (normally the currently visible set)
///
/// # Returns
/// * `Result<String, Box<dyn Error>>` - CSV content as a string or an error
pub fn to_csv(rows: &[CarRow]) -> Result<String, Box<dyn Error>> {
    let mut csv_content = String::new();

    for (i, header) in EXPORT_HEADERS.iter().enumerate() {
        if i > 0 {
            csv_content.push(',');
        }
        csv_content.push_str(&escape_csv_field(header));
    }
    csv_content.push('\n');

    for row in rows {
        for (i, value) in row_texts(row).iter().enumerate() {
            if i > 0 {
                csv_content.push(',');
            }
            csv_content.push_str(&escape_csv_field(value));
        }
        csv_content.push('\n');
    }

    Ok(csv_content)
}

/// Convert the visible rows to XLSX format
///
/// Writes a single worksheet with a header row, string cells for the text
/// fields, and numeric cells for the numeric fields, returned as an
/// in-memory buffer ready to serve as a download.
///
/// # Arguments
/// * `rows` - The rows to export (normally the currently visible set)
///
/// # Returns
/// * `Result<Vec<u8>, Box<dyn Error>>` - XLSX file content as bytes or an error
pub fn to_xlsx(rows: &[CarRow]) -> Result<Vec<u8>, Box<dyn Error>> {
    use rust_xlsxwriter::{Workbook, Worksheet};

    let mut workbook = Workbook::new();
    let mut worksheet = Worksheet::new();

    for (col, header) in EXPORT_HEADERS.iter().enumerate() {
        worksheet.write_string(0, col as u16, *header)?;
    }

    for (r, row) in rows.iter().enumerate() {
        let line = (r + 1) as u32;
        worksheet.write_string(line, 0, row.series.as_str())?;
        worksheet.write_string(line, 1, row.category.as_str())?;
        worksheet.write_string(line, 2, row.grade.as_str())?;
        if let Some(color) = &row.color {
            worksheet.write_string(line, 3, color.as_str())?;
        }
        if let Some(engine_cc) = row.engine_cc {
            worksheet.write_number(line, 4, engine_cc)?;
        }
        if let Some(motor_kw) = row.motor_kw {
            worksheet.write_number(line, 5, motor_kw)?;
        }
        if let Some(battery_type) = &row.battery_type {
            worksheet.write_string(line, 6, battery_type.as_str())?;
        }
        if let Some(capacity) = row.battery_capacity_ah {
            worksheet.write_number(line, 7, capacity)?;
        }
        worksheet.write_string(line, 8, row.model.as_str())?;
    }

    workbook.push_worksheet(worksheet);

    let buffer = workbook.save_to_buffer()?;

    Ok(buffer)
}

fn row_texts(row: &CarRow) -> [String; 9] {
    [
        row.series.clone(),
        row.category.clone(),
        row.grade.clone(),
        row.color.clone().unwrap_or_default(),
        number_text(row.engine_cc),
        number_text(row.motor_kw),
        row.battery_type.clone().unwrap_or_default(),
        number_text(row.battery_capacity_ah),
        row.model.clone(),
    ]
}

fn number_text(value: Option<f64>) -> String {
    value.map(|n| n.to_string()).unwrap_or_default()
}

fn escape_csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
