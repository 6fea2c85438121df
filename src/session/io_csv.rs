// Ballots exported as CSV files.

use crate::session::{io_common::collect_picks, *};

pub fn read_csv_ballots(path: String, source: &BallotSource) -> SessionResult<Vec<ParsedBallot>> {
    let voter_idx = source.voter_column_index()?;
    let first_pick = source.first_pick_column_index()?;
    let first_row = source.first_row_index()?;

    let rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(&path)
        .context(CsvOpenSnafu { path: path.clone() })?;

    let mut res: Vec<ParsedBallot> = Vec::new();
    for (idx, line_r) in rdr.into_records().enumerate() {
        // Rows start at 1, like in a spreadsheet.
        let lineno = idx + 1;
        if lineno < first_row {
            continue;
        }
        let line = line_r.context(CsvLineParseSnafu { lineno })?;
        let voter = line
            .get(voter_idx)
            .context(CsvLineTooShortSnafu { lineno })?
            .trim()
            .to_string();
        if voter.is_empty() {
            warn!(
                "read_csv_ballots: {}: line {}: no voter, skipping",
                path, lineno
            );
            continue;
        }
        let picks = collect_picks(line.iter().skip(first_pick));
        debug!(
            "read_csv_ballots: lineno: {:?} voter: {:?} picks: {:?}",
            lineno, voter, picks
        );
        res.push(ParsedBallot { voter, picks });
    }
    Ok(res)
}
