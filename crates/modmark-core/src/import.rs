//! Spreadsheet import and export.
//!
//! A rubric sheet has a header row followed by one row per criterion:
//!
//! ```text
//! title | description | totalScore | weight | criterion | score 1 | description 1 | score 2 | ...
//! ```
//!
//! The rubric header is read from the first data row; the same cells on later
//! rows are ignored. Each row's level pairs
//! are sorted by score, highest first, before being assigned to columns, and
//! every row must carry as many levels as the first one.

use std::path::Path;

use anyhow::{Context, Result};
use calamine::{open_workbook_auto, Data, Reader};

use crate::error::ParseError;
use crate::model::{Cell, NumericInput, Row, RubricMatrix};

/// Leading columns before the level pairs start.
const LEADING_COLUMNS: usize = 5;

/// A typed spreadsheet cell.
#[derive(Debug, Clone, PartialEq)]
pub enum SheetValue {
    Empty,
    Number(f64),
    Text(String),
    Bool(bool),
}

impl SheetValue {
    /// Text cell; whitespace-only text counts as empty.
    pub fn from_text(s: &str) -> Self {
        if s.trim().is_empty() {
            SheetValue::Empty
        } else {
            SheetValue::Text(s.to_string())
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            SheetValue::Empty => true,
            SheetValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    pub fn as_text(&self) -> String {
        match self {
            SheetValue::Empty => String::new(),
            SheetValue::Number(n) => n.to_string(),
            SheetValue::Text(s) => s.trim().to_string(),
            SheetValue::Bool(b) => b.to_string(),
        }
    }

    /// Numeric reading; text cells holding a number count.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            SheetValue::Number(n) => Some(*n),
            SheetValue::Text(s) => s.trim().parse::<f64>().ok(),
            SheetValue::Empty | SheetValue::Bool(_) => None,
        }
        .filter(|n| n.is_finite())
    }
}

impl From<&Data> for SheetValue {
    fn from(data: &Data) -> Self {
        match data {
            Data::Empty => SheetValue::Empty,
            Data::Int(i) => SheetValue::Number(*i as f64),
            Data::Float(f) => SheetValue::Number(*f),
            Data::String(s) => SheetValue::from_text(s),
            Data::Bool(b) => SheetValue::Bool(*b),
            other => SheetValue::Text(other.to_string()),
        }
    }
}

impl From<&str> for SheetValue {
    fn from(s: &str) -> Self {
        SheetValue::from_text(s)
    }
}

impl From<f64> for SheetValue {
    fn from(n: f64) -> Self {
        SheetValue::Number(n)
    }
}

fn read_error(path: &Path, err: impl std::fmt::Display) -> ParseError {
    ParseError::Read {
        path: path.display().to_string(),
        message: err.to_string(),
    }
}

/// Read the first sheet of a `.csv`, `.xlsx`, `.xlsm`, `.xlsb`, `.xls` or `.ods` file.
pub fn read_sheet(path: &Path) -> Result<Vec<Vec<SheetValue>>, ParseError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match ext.as_str() {
        "csv" => read_csv(path),
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => read_workbook(path),
        "" => Err(ParseError::UnsupportedFormat(format!(
            "{} has no file extension",
            path.display()
        ))),
        other => Err(ParseError::UnsupportedFormat(format!(".{other}"))),
    }
}

fn read_csv(path: &Path) -> Result<Vec<Vec<SheetValue>>, ParseError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| read_error(path, e))?;

    reader
        .records()
        .map(|record| {
            record
                .map(|r| r.iter().map(SheetValue::from_text).collect())
                .map_err(|e| read_error(path, e))
        })
        .collect()
}

fn read_workbook(path: &Path) -> Result<Vec<Vec<SheetValue>>, ParseError> {
    let mut workbook = open_workbook_auto(path).map_err(|e| read_error(path, e))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| read_error(path, "workbook has no sheets"))?
        .map_err(|e| read_error(path, e))?;

    Ok(range
        .rows()
        .map(|row| row.iter().map(SheetValue::from).collect())
        .collect())
}

/// Read and parse a rubric sheet in one step.
pub fn import_file(path: &Path) -> Result<RubricMatrix, ParseError> {
    let rows = read_sheet(path)?;
    let matrix = parse_rows(&rows)?;
    tracing::info!(
        path = %path.display(),
        criteria = matrix.row_count(),
        levels = matrix.column_count(),
        "imported rubric sheet"
    );
    Ok(matrix)
}

fn numeric_field(
    value: &SheetValue,
    row: usize,
    column: usize,
    field: &'static str,
) -> Result<NumericInput, ParseError> {
    if value.is_empty() {
        return Ok(NumericInput::default());
    }
    value
        .as_number()
        .map(NumericInput::from_number)
        .ok_or_else(|| ParseError::NotNumeric {
            row,
            column,
            field,
            value: value.as_text(),
        })
}

/// Rubric-level fields, read from the first data row only.
struct SheetHeader {
    title: String,
    description: String,
    total_score: NumericInput,
}

fn parse_header_fields(values: &[SheetValue], row: usize) -> Result<SheetHeader, ParseError> {
    Ok(SheetHeader {
        title: values[0].as_text(),
        description: values[1].as_text(),
        total_score: numeric_field(&values[2], row, 3, "total score")?,
    })
}

fn parse_data_row(values: &[SheetValue], row: usize) -> Result<Row, ParseError> {
    let found = values.iter().rposition(|v| !v.is_empty()).map_or(0, |i| i + 1);
    if found < LEADING_COLUMNS + 2 {
        return Err(ParseError::TooFewColumns {
            row,
            expected: LEADING_COLUMNS + 2,
            found,
        });
    }
    if (found - LEADING_COLUMNS) % 2 != 0 {
        return Err(ParseError::MissingDescription {
            row,
            column: found + 1,
        });
    }

    let weight = numeric_field(&values[3], row, 4, "criterion weight")?;
    let criteria_name = values[4].as_text();
    if criteria_name.is_empty() {
        return Err(ParseError::EmptyCriterion { row });
    }

    let mut levels = Vec::with_capacity((found - LEADING_COLUMNS) / 2);
    for (i, pair) in values[LEADING_COLUMNS..found].chunks_exact(2).enumerate() {
        let column = LEADING_COLUMNS + 2 * i + 1;
        let score = pair[0].as_number().ok_or_else(|| ParseError::NotNumeric {
            row,
            column,
            field: "level score",
            value: pair[0].as_text(),
        })?;
        levels.push((score, pair[1].as_text()));
    }
    levels.sort_by(|a, b| b.0.total_cmp(&a.0));

    let cells = levels
        .into_iter()
        .map(|(score, description)| Cell::new(description, NumericInput::from_number(score)))
        .collect();

    Ok(Row::with_cells(criteria_name, weight, cells))
}

/// Parse sheet rows (header first) into a matrix.
pub fn parse_rows(rows: &[Vec<SheetValue>]) -> Result<RubricMatrix, ParseError> {
    if rows.is_empty() {
        return Err(ParseError::MissingHeader);
    }

    let mut header: Option<SheetHeader> = None;
    let mut parsed: Vec<Row> = Vec::new();
    for (index, values) in rows.iter().enumerate().skip(1) {
        let row = index + 1;
        if values.iter().all(SheetValue::is_empty) {
            tracing::debug!(row, "skipping empty sheet row");
            continue;
        }

        let current = parse_data_row(values, row)?;
        match parsed.first() {
            Some(first) => {
                let expected = first.cells().len();
                let found = current.cells().len();
                if found != expected {
                    return Err(ParseError::RaggedRow {
                        row,
                        expected,
                        found,
                    });
                }
            }
            None => header = Some(parse_header_fields(values, row)?),
        }
        parsed.push(current);
    }

    let header = header.ok_or(ParseError::NoDataRows)?;
    let column_count = parsed.first().map_or(0, |r| r.cells().len());

    RubricMatrix::from_rows(
        header.title,
        header.description,
        header.total_score,
        column_count,
        parsed,
    )
    .map_err(|e| {
        // Rows are width-checked above.
        ParseError::Read {
            path: String::from("<rows>"),
            message: e.to_string(),
        }
    })
}

/// Lay a matrix out in the import row format, header first.
pub fn to_sheet_rows(matrix: &RubricMatrix) -> Vec<Vec<String>> {
    let mut header: Vec<String> = ["Title", "Description", "Total Score", "Weight", "Criterion"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    for column in matrix.columns() {
        header.push(format!("Level {} Score", column.level));
        header.push(format!("Level {} Description", column.level));
    }

    let mut out = vec![header];
    for row in matrix.rows() {
        let mut line = vec![
            matrix.title.clone(),
            matrix.description.clone(),
            matrix.total_score.to_string(),
            row.weight.to_string(),
            row.criteria_name.clone(),
        ];
        for cell in row.cells() {
            line.push(cell.score.to_string());
            line.push(cell.description.clone());
        }
        out.push(line);
    }
    out
}

/// Write a matrix to a CSV file that [`import_file`] can read back.
pub fn write_csv(matrix: &RubricMatrix, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    for line in to_sheet_rows(matrix) {
        writer.write_record(&line)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> Vec<SheetValue> {
        ["Title", "Description", "Total", "Weight", "Criterion", "S1", "D1", "S2", "D2"]
            .iter()
            .map(|s| SheetValue::from(*s))
            .collect()
    }

    fn row(values: &[SheetValue]) -> Vec<SheetValue> {
        values.to_vec()
    }

    fn t(s: &str) -> SheetValue {
        SheetValue::from(s)
    }

    fn n(v: f64) -> SheetValue {
        SheetValue::Number(v)
    }

    #[test]
    fn single_row_sorted_by_score_descending() {
        let rows = vec![
            header(),
            row(&[t("T"), t("D"), n(100.0), n(20.0), t("C1"), n(0.0), t("bad"), n(10.0), t("good")]),
        ];
        let m = parse_rows(&rows).unwrap();
        assert_eq!(m.title, "T");
        assert_eq!(m.description, "D");
        assert_eq!(m.total_score.value(), Some(100.0));
        assert_eq!(m.column_count(), 2);
        assert_eq!(m.rows()[0].criteria_name, "C1");
        assert_eq!(m.rows()[0].weight.value(), Some(20.0));
        assert_eq!(
            m.rows()[0].cells(),
            &[Cell::new("good", "10"), Cell::new("bad", "0")]
        );
    }

    #[test]
    fn already_sorted_row_keeps_order() {
        let rows = vec![
            header(),
            row(&[t("T"), t("D"), n(100.0), n(20.0), t("C1"), n(10.0), t("good"), n(0.0), t("bad")]),
        ];
        let m = parse_rows(&rows).unwrap();
        assert_eq!(m.cell(0, 0), Some(&Cell::new("good", "10")));
        assert_eq!(m.cell(0, 1), Some(&Cell::new("bad", "0")));
    }

    #[test]
    fn header_comes_from_first_row_and_text_numbers_parse() {
        let rows = vec![
            header(),
            row(&[t("Essay"), t("Final"), t("50"), t("30"), t("Thesis"), t("5"), t("sharp"), t("1"), t("vague")]),
            row(&[t("Ignored"), t("Ignored"), t("999"), t("20"), t("Style"), t("4"), t("fluent"), t("2"), t("stilted")]),
        ];
        let m = parse_rows(&rows).unwrap();
        assert_eq!(m.title, "Essay");
        assert_eq!(m.total_score.as_str(), "50");
        assert_eq!(m.row_count(), 2);
        assert_eq!(m.rows()[1].criteria_name, "Style");
        assert!(m.is_rectangular());
    }

    #[test]
    fn empty_rows_and_trailing_blank_pairs_are_skipped() {
        let rows = vec![
            header(),
            row(&[t("T"), t(""), n(10.0), n(1.0), t("A"), n(2.0), t("x"), SheetValue::Empty, SheetValue::Empty]),
            row(&[SheetValue::Empty, t("  ")]),
            row(&[t("T"), t(""), n(10.0), n(1.0), t("B"), n(3.0), t("y")]),
        ];
        let m = parse_rows(&rows).unwrap();
        assert_eq!(m.row_count(), 2);
        assert_eq!(m.column_count(), 1);
    }

    #[test]
    fn score_without_description_is_rejected() {
        let rows = vec![
            header(),
            row(&[t("T"), t("D"), n(10.0), n(1.0), t("A"), n(2.0), t("x"), n(1.0)]),
        ];
        assert_eq!(
            parse_rows(&rows),
            Err(ParseError::MissingDescription { row: 2, column: 9 })
        );
    }

    #[test]
    fn blank_description_inside_a_pair_is_kept() {
        let rows = vec![
            header(),
            row(&[t("T"), t("D"), n(10.0), n(1.0), t("A"), n(2.0), SheetValue::Empty, n(1.0), t("y")]),
        ];
        let m = parse_rows(&rows).unwrap();
        assert_eq!(m.cell(0, 0), Some(&Cell::new("", "2")));
        assert_eq!(m.cell(0, 1), Some(&Cell::new("y", "1")));
    }

    #[test]
    fn later_rows_header_cells_are_ignored() {
        let rows = vec![
            header(),
            row(&[t("T"), t("D"), n(10.0), n(1.0), t("A"), n(2.0), t("x")]),
            row(&[SheetValue::Empty, SheetValue::Empty, t("see above"), n(1.0), t("B"), n(3.0), t("y")]),
        ];
        let m = parse_rows(&rows).unwrap();
        assert_eq!(m.title, "T");
        assert_eq!(m.total_score.as_str(), "10");
        assert_eq!(m.rows()[1].criteria_name, "B");
    }

    #[test]
    fn first_row_total_score_must_be_numeric() {
        let rows = vec![
            header(),
            row(&[t("T"), t("D"), t("lots"), n(1.0), t("A"), n(2.0), t("x")]),
        ];
        assert!(matches!(
            parse_rows(&rows),
            Err(ParseError::NotNumeric { row: 2, column: 3, field: "total score", .. })
        ));
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let rows = vec![
            header(),
            row(&[t("T"), t("D"), n(10.0), n(1.0), t("A"), n(2.0), t("x"), n(1.0), t("y")]),
            row(&[t("T"), t("D"), n(10.0), n(1.0), t("B"), n(2.0), t("x")]),
        ];
        assert_eq!(
            parse_rows(&rows),
            Err(ParseError::RaggedRow {
                row: 3,
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn non_numeric_score_names_the_cell() {
        let rows = vec![
            header(),
            row(&[t("T"), t("D"), n(10.0), n(1.0), t("A"), t("ten"), t("x")]),
        ];
        assert_eq!(
            parse_rows(&rows),
            Err(ParseError::NotNumeric {
                row: 2,
                column: 6,
                field: "level score",
                value: "ten".into()
            })
        );
    }

    #[test]
    fn description_without_score_is_rejected() {
        let rows = vec![
            header(),
            row(&[t("T"), t("D"), n(10.0), n(1.0), t("A"), SheetValue::Empty, t("x")]),
        ];
        assert!(matches!(
            parse_rows(&rows),
            Err(ParseError::NotNumeric { row: 2, column: 6, .. })
        ));
    }

    #[test]
    fn non_numeric_weight() {
        let rows = vec![
            header(),
            row(&[t("T"), t("D"), n(10.0), t("heavy"), t("A"), n(1.0), t("x")]),
        ];
        assert!(matches!(
            parse_rows(&rows),
            Err(ParseError::NotNumeric { row: 2, column: 4, field: "criterion weight", .. })
        ));
    }

    #[test]
    fn missing_criterion_name() {
        let rows = vec![
            header(),
            row(&[t("T"), t("D"), n(10.0), n(5.0), SheetValue::Empty, n(1.0), t("x")]),
        ];
        assert_eq!(parse_rows(&rows), Err(ParseError::EmptyCriterion { row: 2 }));
    }

    #[test]
    fn too_few_columns() {
        let rows = vec![header(), row(&[t("T"), t("D"), n(10.0), n(5.0), t("A")])];
        assert_eq!(
            parse_rows(&rows),
            Err(ParseError::TooFewColumns {
                row: 2,
                expected: 7,
                found: 5
            })
        );
    }

    #[test]
    fn six_cells_is_too_few() {
        let rows = vec![header(), row(&[t("T"), t("D"), n(10.0), n(5.0), t("A"), n(1.0)])];
        assert_eq!(
            parse_rows(&rows),
            Err(ParseError::TooFewColumns {
                row: 2,
                expected: 7,
                found: 6
            })
        );
    }

    #[test]
    fn empty_sheets() {
        assert_eq!(parse_rows(&[]), Err(ParseError::MissingHeader));
        assert_eq!(parse_rows(&[header()]), Err(ParseError::NoDataRows));
        assert_eq!(
            parse_rows(&[header(), vec![SheetValue::Empty]]),
            Err(ParseError::NoDataRows)
        );
    }

    #[test]
    fn csv_export_then_import() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rubric.csv");
        std::fs::write(
            &path,
            "Title,Description,Total,Weight,Criterion,S1,D1,S2,D2\n\
             Lab,\"Weekly, graded\",40,25,Method,1,sloppy,4,rigorous\n\
             Lab,\"Weekly, graded\",40,15,Results,3,right,0,wrong\n",
        )
        .unwrap();

        let m = import_file(&path).unwrap();
        assert_eq!(m.description, "Weekly, graded");
        assert_eq!(m.cell(0, 0), Some(&Cell::new("rigorous", "4")));

        let out = dir.path().join("out.csv");
        write_csv(&m, &out).unwrap();
        let again = import_file(&out).unwrap();
        assert_eq!(again, m);
    }

    #[test]
    fn export_header_names_levels() {
        let mut m = RubricMatrix::empty();
        m.add_column();
        let rows = to_sheet_rows(&m);
        assert_eq!(rows[0].len(), 9);
        assert_eq!(rows[0][7], "Level 2 Score");
        assert_eq!(rows[1].len(), 9);
    }

    #[test]
    fn workbook_cells_map_to_sheet_values() {
        assert_eq!(SheetValue::from(&Data::Int(3)), SheetValue::Number(3.0));
        assert_eq!(SheetValue::from(&Data::Float(2.5)), SheetValue::Number(2.5));
        assert_eq!(
            SheetValue::from(&Data::String("Design".into())),
            SheetValue::Text("Design".into())
        );
        assert_eq!(SheetValue::from(&Data::String("  ".into())), SheetValue::Empty);
        assert_eq!(SheetValue::from(&Data::Bool(true)), SheetValue::Bool(true));
        assert_eq!(SheetValue::from(&Data::Empty), SheetValue::Empty);
    }

    #[test]
    fn xlsx_reads_first_sheet_only() {
        let path = Path::new("../../rubrics/midterm.xlsx");

        let rows = read_sheet(path).unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0][0], SheetValue::Text("Title".into()));
        assert_eq!(rows[1][2], SheetValue::Number(30.0));
        assert_eq!(rows[3][7], SheetValue::Number(2.5));

        let m = import_file(path).unwrap();
        assert_eq!(m.title, "Midterm Project");
        assert_eq!(m.total_score.as_str(), "30");
        assert_eq!(m.row_count(), 3);
        assert_eq!(m.column_count(), 3);
        assert_eq!(m.cell(0, 0), Some(&Cell::new("All cases handled", "15")));
        assert_eq!(m.cell(2, 1), Some(&Cell::new("Partial docs", "2.5")));
        assert_eq!(m.rows()[1].weight.as_str(), "30");
    }

    #[test]
    fn unsupported_extension() {
        let err = read_sheet(Path::new("rubric.pdf")).unwrap_err();
        assert_eq!(err, ParseError::UnsupportedFormat(".pdf".into()));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = read_sheet(Path::new("/nonexistent/rubric.csv")).unwrap_err();
        assert!(matches!(err, ParseError::Read { .. }));
    }
}
