use crate::session::*;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    #[serde(rename = "sessionName")]
    pub session_name: String,
    #[serde(rename = "weekOf")]
    pub week_of: Option<String>,
    #[serde(rename = "outputPath")]
    pub output_path: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub session: String,
    #[serde(rename = "weekOf")]
    pub week_of: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct RosterEntry {
    pub id: String,
    pub name: String,
    pub role: String,
    pub title: Option<String>,
    pub team: String,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ProjectEntry {
    pub id: String,
    pub name: String,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct NominationEntry {
    pub candidate: String,
    pub project: String,
    pub justification: Option<String>,
    #[serde(rename = "nominatedBy")]
    pub nominated_by: String,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct InlineBallot {
    pub voter: String,
    #[serde(default)]
    pub picks: Vec<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct BallotSource {
    pub provider: String,
    pub ballots: Option<Vec<InlineBallot>>,
    #[serde(rename = "filePath")]
    pub file_path: Option<String>,
    #[serde(rename = "voterColumnIndex")]
    _voter_column_index: Option<JSValue>,
    #[serde(rename = "firstPickColumnIndex")]
    _first_pick_column_index: Option<JSValue>,
    #[serde(rename = "firstRowIndex")]
    _first_row_index: Option<JSValue>,
    #[serde(rename = "worksheetName")]
    pub worksheet_name: Option<String>,
}

impl BallotSource {
    /// The column of the voter identity, starting at 0.
    pub fn voter_column_index(&self) -> SessionResult<usize> {
        Ok(read_js_index(&self._voter_column_index, 1)? - 1)
    }

    /// The column of the first pick, starting at 0.
    pub fn first_pick_column_index(&self) -> SessionResult<usize> {
        Ok(read_js_index(&self._first_pick_column_index, 2)? - 1)
    }

    /// The first row holding a ballot, starting at 1 like spreadsheets do.
    pub fn first_row_index(&self) -> SessionResult<usize> {
        read_js_index(&self._first_row_index, 2)
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct SessionRules {
    #[serde(rename = "discardOneRandomBallot")]
    pub discard_one_random_ballot: Option<bool>,
    #[serde(rename = "enableExecutiveBonus")]
    pub enable_executive_bonus: Option<bool>,
    /// A non-negative integer, written either as a number or as a string.
    #[serde(rename = "randomSeed")]
    pub random_seed: Option<JSValue>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub candidate: String,
    #[serde(default)]
    pub dates: Vec<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(rename = "sessionSettings")]
    pub session_settings: SessionSettings,
    pub roster: Vec<RosterEntry>,
    #[serde(default)]
    pub projects: Vec<ProjectEntry>,
    #[serde(default)]
    pub nominations: Vec<NominationEntry>,
    #[serde(rename = "ballotSources", default)]
    pub ballot_sources: Vec<BallotSource>,
    pub rules: SessionRules,
    #[serde(default)]
    pub schedules: Vec<ScheduleEntry>,
}

pub fn read_summary(path: String) -> SessionResult<JSValue> {
    let contents = fs::read_to_string(path.clone()).context(OpeningJsonSnafu { path })?;
    debug!("read content: {:?}", contents);
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}

/// Reads a non-negative integer, written either as a number or as a string.
pub fn read_js_u64(x: &JSValue) -> Option<u64> {
    match x {
        JSValue::Number(n) => n.as_u64(),
        JSValue::String(s) => s.parse::<u64>().ok(),
        _ => None,
    }
}

/// Reads a 1-based index, written either as a number or as a string.
fn read_js_index(x: &Option<JSValue>, default: usize) -> SessionResult<usize> {
    let idx = match x {
        None => Some(default),
        Some(v) => read_js_u64(v).map(|x| x as usize),
    };
    match idx {
        Some(i) if i >= 1 => Ok(i),
        _ => ParsingJsonNumberSnafu {
            content: format!("{:?}", x),
        }
        .fail(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn indexes() {
        assert_eq!(read_js_index(&None, 2).unwrap(), 2);
        assert_eq!(read_js_index(&Some(json!(3)), 2).unwrap(), 3);
        assert_eq!(read_js_index(&Some(json!("4")), 2).unwrap(), 4);
        assert!(read_js_index(&Some(json!(0)), 2).is_err());
        assert!(read_js_index(&Some(json!("x")), 2).is_err());
        assert!(read_js_index(&Some(json!(true)), 2).is_err());
    }

    #[test]
    fn integers() {
        assert_eq!(read_js_u64(&json!(7)), Some(7));
        assert_eq!(read_js_u64(&json!("7")), Some(7));
        assert_eq!(read_js_u64(&json!(-7)), None);
        assert_eq!(read_js_u64(&json!(7.5)), None);
        assert_eq!(read_js_u64(&json!(null)), None);
    }

    #[test]
    fn source_defaults() {
        let s: BallotSource =
            serde_json::from_value(json!({"provider": "csv", "filePath": "b.csv"})).unwrap();
        assert_eq!(s.voter_column_index().unwrap(), 0);
        assert_eq!(s.first_pick_column_index().unwrap(), 1);
        assert_eq!(s.first_row_index().unwrap(), 2);
    }
}
