use std::io::Cursor;

use calamine::{Reader, Xlsx};
use rust_xlsxwriter::{ColNum, DocProperties, ExcelDateTime, RowNum, Workbook};

use crate::{
    domain::{Batch, InputRecord},
    error::SheetError,
};

pub const FULL_NAME_COLUMN: &str = "Full Name";
pub const PROFILE_COLUMN: &str = "LinkedIn Profile";
pub const ROLE_COLUMN: &str = "Role";
pub const CONFIDENCE_COLUMN: &str = "Confidence";

pub const OUTPUT_FILENAME: &str = "lead_profile_results.xlsx";
pub const OUTPUT_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Every xlsx file is a zip archive.
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

pub struct Sheet {
    pub headers: Vec<String>,
    pub records: Vec<InputRecord>,
}

/// Reads an uploaded sheet, either an xlsx workbook (first worksheet) or a
/// UTF-8 CSV file. The first row holds the headers.
///
/// Rows and headers end up the same width: short rows are padded with empty
/// cells, and cells past the last header get an `Unnamed: <index>` header so
/// they are carried through like any other column.
pub fn read_sheet(data: &[u8]) -> Result<Sheet, SheetError> {
    let rows = match data.starts_with(ZIP_MAGIC) {
        true => read_xlsx_rows(data)?,
        false => read_csv_rows(data)?,
    };
    let mut rows = rows.into_iter();

    let mut headers = rows.next().unwrap_or_default();
    let name_idx = headers
        .iter()
        .position(|h| h == FULL_NAME_COLUMN)
        .ok_or_else(|| SheetError::MissingColumn(FULL_NAME_COLUMN.to_string()))?;

    let rows: Vec<Vec<String>> = rows.collect();
    let width = rows
        .iter()
        .map(|row| row.len())
        .fold(headers.len(), usize::max);
    headers.resize(width, String::new());
    for (idx, header) in headers.iter_mut().enumerate() {
        if header.is_empty() {
            *header = format!("Unnamed: {}", idx);
        }
    }

    let records: Vec<InputRecord> = rows
        .into_iter()
        .map(|mut cells| {
            cells.resize(width, String::new());
            InputRecord::new(cells[name_idx].clone(), cells)
        })
        .collect();

    log::info!("Read {} records with {} columns", records.len(), headers.len());

    Ok(Sheet { headers, records })
}

fn read_csv_rows(data: &[u8]) -> Result<Vec<Vec<String>>, SheetError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(data);

    let mut rows = Vec::new();
    for row in reader.records() {
        rows.push(row?.iter().map(|c| c.to_string()).collect());
    }

    Ok(rows)
}

fn read_xlsx_rows(data: &[u8]) -> Result<Vec<Vec<String>>, SheetError> {
    let mut workbook = Xlsx::new(Cursor::new(data))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(SheetError::NoWorksheet)??;

    Ok(range
        .rows()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .collect())
}

/// Writes the batch back as an xlsx workbook with the three enrichment
/// columns. A column that already exists under one of those names is
/// overwritten in place.
///
/// Pass-through cells are written as text, `Confidence` as a number.
pub fn write_sheet(headers: &[String], batch: &Batch) -> Result<Vec<u8>, SheetError> {
    let mut output_headers = headers.to_vec();
    let mut column_of = |name: &str| match output_headers.iter().position(|h| h == name) {
        Some(idx) => idx,
        None => {
            output_headers.push(name.to_string());
            output_headers.len() - 1
        }
    };
    let profile_idx = column_of(PROFILE_COLUMN);
    let role_idx = column_of(ROLE_COLUMN);
    let confidence_idx = column_of(CONFIDENCE_COLUMN);

    let mut workbook = Workbook::new();
    // Fixed creation time, so the same batch always gives the same bytes.
    let properties =
        DocProperties::new().set_creation_datetime(&ExcelDateTime::from_ymd(2000, 1, 1)?);
    workbook.set_properties(&properties);
    let worksheet = workbook.add_worksheet();

    for (col, header) in output_headers.iter().enumerate() {
        let (row, col) = cell_position(0, col)?;
        worksheet.write_string(row, col, header)?;
    }

    for (idx, enriched) in batch.iter().enumerate() {
        let mut cells = enriched.record().cells.clone();
        if cells.len() < output_headers.len() {
            cells.resize(output_headers.len(), String::new());
        }

        let extraction = enriched.extraction();
        cells[profile_idx] = extraction.profile_url.clone();
        cells[role_idx] = extraction.role.clone();

        for (col, cell) in cells.iter().enumerate() {
            if col == confidence_idx || cell.is_empty() {
                continue;
            }
            let (row, col) = cell_position(idx + 1, col)?;
            worksheet.write_string(row, col, cell)?;
        }
        let (row, col) = cell_position(idx + 1, confidence_idx)?;
        worksheet.write_number(row, col, extraction.confidence)?;
    }

    Ok(workbook.save_to_buffer()?)
}

fn cell_position(row: usize, col: usize) -> Result<(RowNum, ColNum), SheetError> {
    match (RowNum::try_from(row), ColNum::try_from(col)) {
        (Ok(r), Ok(c)) => Ok((r, c)),
        _ => Err(SheetError::TooLarge { row, col }),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use calamine::{Data, Reader, Xlsx};
    use rust_xlsxwriter::Workbook;

    use super::{read_sheet, write_sheet};
    use crate::{
        domain::{EnrichedRecord, ExtractionResult},
        error::SheetError,
    };

    fn output_rows(output: &[u8]) -> Vec<Vec<Data>> {
        let mut workbook = Xlsx::new(Cursor::new(output)).unwrap();
        let range = workbook.worksheet_range_at(0).unwrap().unwrap();
        range.rows().map(|row| row.to_vec()).collect()
    }

    fn text(value: &str) -> Data {
        Data::String(value.to_string())
    }

    #[test]
    fn reads_name_column_and_keeps_other_cells() {
        let data = b"Company,Full Name,Email\nAcme,Jane Doe,jane@acme.com\nGlobex, John Smith ,\n";
        let sheet = read_sheet(data).unwrap();

        assert_eq!(sheet.headers, vec!["Company", "Full Name", "Email"]);
        assert_eq!(sheet.records.len(), 2);
        assert_eq!(sheet.records[0].full_name, "Jane Doe");
        assert_eq!(
            sheet.records[0].cells,
            vec!["Acme", "Jane Doe", "jane@acme.com"]
        );
        assert_eq!(sheet.records[1].full_name, " John Smith ");
    }

    #[test]
    fn short_rows_are_padded() {
        let data = b"Full Name,Company\nJane Doe\n,Initech\n";
        let sheet = read_sheet(data).unwrap();

        assert_eq!(sheet.records[0].cells, vec!["Jane Doe", ""]);
        assert_eq!(sheet.records[1].full_name, "");
    }

    #[test]
    fn cells_past_the_last_header_get_their_own_column() {
        let sheet = read_sheet(b"Full Name,Company\nJane Doe,Acme,extra-note\n").unwrap();

        assert_eq!(sheet.headers, vec!["Full Name", "Company", "Unnamed: 2"]);
        assert_eq!(sheet.records[0].cells, vec!["Jane Doe", "Acme", "extra-note"]);

        let batch = vec![EnrichedRecord::resolved(
            sheet.records[0].clone(),
            ExtractionResult::new("https://www.linkedin.com/in/jd", "CTO", 90),
        )];
        let rows = output_rows(&write_sheet(&sheet.headers, &batch).unwrap());

        assert_eq!(
            rows[0],
            vec![
                text("Full Name"),
                text("Company"),
                text("Unnamed: 2"),
                text("LinkedIn Profile"),
                text("Role"),
                text("Confidence"),
            ]
        );
        assert_eq!(
            rows[1],
            vec![
                text("Jane Doe"),
                text("Acme"),
                text("extra-note"),
                text("https://www.linkedin.com/in/jd"),
                text("CTO"),
                Data::Float(90.0),
            ]
        );
    }

    #[test]
    fn missing_name_column_is_rejected() {
        let data = b"Name,Company\nJane Doe,Acme\n";

        match read_sheet(data) {
            Err(SheetError::MissingColumn(column)) => assert_eq!(column, "Full Name"),
            _ => panic!("expected a missing column error"),
        }
    }

    #[test]
    fn empty_file_is_rejected() {
        assert!(read_sheet(b"").is_err());
    }

    #[test]
    fn invalid_utf8_is_unreadable() {
        let data = b"Full Name\n\xff\xfe\xfd\n";

        assert!(matches!(read_sheet(data), Err(SheetError::Unreadable(_))));
    }

    #[test]
    fn broken_workbook_is_unreadable() {
        let data = b"PK\x03\x04 not really a zip archive";

        assert!(matches!(read_sheet(data), Err(SheetError::Workbook(_))));
    }

    #[test]
    fn reads_first_worksheet_of_a_workbook() {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.write_string(0, 0, "Full Name").unwrap();
        worksheet.write_string(0, 1, "Employees").unwrap();
        worksheet.write_string(1, 0, "Jane Doe").unwrap();
        worksheet.write_number(1, 1, 42).unwrap();
        worksheet.write_number(2, 1, 7).unwrap();
        let data = workbook.save_to_buffer().unwrap();

        let sheet = read_sheet(&data).unwrap();

        assert_eq!(sheet.headers, vec!["Full Name", "Employees"]);
        assert_eq!(sheet.records[0].cells, vec!["Jane Doe", "42"]);
        assert_eq!(sheet.records[1].full_name, "");
        assert_eq!(sheet.records[1].cells, vec!["", "7"]);
    }

    #[test]
    fn writes_enrichment_columns_after_original_ones() {
        let sheet = read_sheet(b"Full Name,Company\nJane Doe,Acme\n,Initech\n").unwrap();
        let batch = vec![
            EnrichedRecord::resolved(
                sheet.records[0].clone(),
                ExtractionResult::new("https://www.linkedin.com/in/jane-doe", "CTO, Acme", 91),
            ),
            EnrichedRecord::skipped(sheet.records[1].clone()),
        ];

        let rows = output_rows(&write_sheet(&sheet.headers, &batch).unwrap());

        assert_eq!(
            rows,
            vec![
                vec![
                    text("Full Name"),
                    text("Company"),
                    text("LinkedIn Profile"),
                    text("Role"),
                    text("Confidence"),
                ],
                vec![
                    text("Jane Doe"),
                    text("Acme"),
                    text("https://www.linkedin.com/in/jane-doe"),
                    text("CTO, Acme"),
                    Data::Float(91.0),
                ],
                vec![
                    Data::Empty,
                    text("Initech"),
                    text("not found"),
                    Data::Empty,
                    Data::Float(0.0),
                ],
            ]
        );
    }

    #[test]
    fn existing_output_columns_are_overwritten() {
        let sheet = read_sheet(b"Role,Full Name\nold role,Jane Doe\n").unwrap();
        let batch = vec![EnrichedRecord::failed(sheet.records[0].clone())];

        let rows = output_rows(&write_sheet(&sheet.headers, &batch).unwrap());

        assert_eq!(
            rows,
            vec![
                vec![
                    text("Role"),
                    text("Full Name"),
                    text("LinkedIn Profile"),
                    text("Confidence"),
                ],
                vec![
                    Data::Empty,
                    text("Jane Doe"),
                    text("not found"),
                    Data::Float(0.0),
                ],
            ]
        );
    }

    #[test]
    fn same_batch_gives_same_bytes() {
        let sheet = read_sheet(b"Full Name\nJane Doe\n").unwrap();
        let batch = vec![EnrichedRecord::failed(sheet.records[0].clone())];

        assert_eq!(
            write_sheet(&sheet.headers, &batch).unwrap(),
            write_sheet(&sheet.headers, &batch).unwrap()
        );
    }
}
