//! Workbook writer

use rust_xlsxwriter::{ColNum, Format, RowNum, Url, Workbook, Worksheet, XlsxError};

use crate::error::ExportError;

use super::rows::{Cell, ExportRow, COLUMNS};

pub const SHEET_NAME: &str = "SonarQube Issues";
pub const CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Render rows into an xlsx buffer with a header row and one row per issue
pub fn write_workbook(rows: &[ExportRow]) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    write_header(worksheet)?;
    for (index, row) in rows.iter().enumerate() {
        write_row(worksheet, index as RowNum + 1, row)?;
    }

    Ok(workbook.save_to_buffer()?)
}

fn write_header(worksheet: &mut Worksheet) -> Result<(), XlsxError> {
    let bold = Format::new().set_bold();
    for (col, column) in COLUMNS.iter().enumerate() {
        let col = col as ColNum;
        worksheet.set_column_width(col, column.width)?;
        worksheet.write_string_with_format(0, col, column.header, &bold)?;
    }
    worksheet.set_freeze_panes(1, 0)?;
    Ok(())
}

fn write_row(worksheet: &mut Worksheet, row_num: RowNum, row: &ExportRow) -> Result<(), XlsxError> {
    for (col, cell) in row.cells().into_iter().enumerate() {
        let col = col as ColNum;
        match cell {
            Cell::Text(text) => {
                worksheet.write_string(row_num, col, text)?;
            }
            Cell::Blank => {}
            Cell::Link(link) => {
                worksheet.write_url(row_num, col, Url::new(&link.url).set_text(&link.text))?;
            }
        }
    }
    Ok(())
}
