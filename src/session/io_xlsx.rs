// Ballots exported from a form tool as an Excel workbook.

use calamine::{open_workbook, DataType, Reader, Xlsx};

use crate::session::*;

pub fn read_xlsx_ballots(path: String, source: &BallotSource) -> SessionResult<Vec<ParsedBallot>> {
    let voter_idx = source.voter_column_index()?;
    let first_pick = source.first_pick_column_index()?;
    let first_row = source.first_row_index()?;

    let mut workbook: Xlsx<_> =
        open_workbook(path.clone()).context(OpeningExcelSnafu { path: path.clone() })?;
    let wrange = match &source.worksheet_name {
        Some(name) => workbook.worksheet_range(name.as_str()),
        None => workbook.worksheet_range_at(0),
    }
    .context(EmptyExcelSnafu { path: path.clone() })?
    .context(OpeningExcelSnafu { path: path.clone() })?;

    let mut res: Vec<ParsedBallot> = Vec::new();
    for (idx, row) in wrange.rows().enumerate() {
        let lineno = idx + 1;
        if lineno < first_row {
            continue;
        }
        let voter = match row.get(voter_idx) {
            Some(cell) => read_cell(cell, lineno)?,
            None => None,
        };
        let voter = match voter {
            Some(v) => v,
            None => {
                warn!(
                    "read_xlsx_ballots: {}: row {}: no voter, skipping",
                    path, lineno
                );
                continue;
            }
        };
        let mut picks: Vec<String> = Vec::new();
        for cell in row.iter().skip(first_pick) {
            if let Some(p) = read_cell(cell, lineno)? {
                picks.push(p);
            }
        }
        debug!(
            "read_xlsx_ballots: row: {:?} voter: {:?} picks: {:?}",
            lineno, voter, picks
        );
        res.push(ParsedBallot { voter, picks });
    }
    Ok(res)
}

// Identities may come out of the spreadsheet as numbers.
fn read_cell(cell: &DataType, lineno: usize) -> SessionResult<Option<String>> {
    match cell {
        DataType::String(s) if s.trim().is_empty() => Ok(None),
        DataType::String(s) => Ok(Some(s.trim().to_string())),
        DataType::Empty => Ok(None),
        DataType::Int(i) => Ok(Some(i.to_string())),
        DataType::Float(f) if f.fract() == 0.0 => Ok(Some((*f as i64).to_string())),
        _ => ExcelWrongCellTypeSnafu {
            lineno,
            content: format!("{:?}", cell),
        }
        .fail(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_cells() {
        let cell = DataType::String(" ana ".to_string());
        assert_eq!(read_cell(&cell, 2).unwrap(), Some("ana".to_string()));
        let blank = DataType::String("  ".to_string());
        assert_eq!(read_cell(&blank, 2).unwrap(), None);
        assert_eq!(read_cell(&DataType::Empty, 2).unwrap(), None);
    }

    #[test]
    fn numeric_cells() {
        assert_eq!(
            read_cell(&DataType::Int(42), 3).unwrap(),
            Some("42".to_string())
        );
        // Integral floats are how spreadsheets usually store numbers.
        assert_eq!(
            read_cell(&DataType::Float(7.0), 3).unwrap(),
            Some("7".to_string())
        );
        assert!(matches!(
            read_cell(&DataType::Float(1.5), 3),
            Err(SessionError::ExcelWrongCellType { lineno: 3, .. })
        ));
    }

    #[test]
    fn other_cells() {
        assert!(matches!(
            read_cell(&DataType::Bool(true), 4),
            Err(SessionError::ExcelWrongCellType { lineno: 4, .. })
        ));
    }
}
