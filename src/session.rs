use log::{debug, info, warn};

use merit_core::builder::Builder;
use merit_core::schedule::{parse_dates, status, validate};
use merit_core::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::Path;

use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::session::config_reader::*;

pub mod config_reader;
mod io_common;
mod io_csv;
mod io_xlsx;

/// Rendered in place of people who are not in the roster.
const UNKNOWN_PERSON: &str = "Unknown";

#[derive(Debug, Snafu)]
pub enum SessionError {
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("No worksheet found in {path}"))]
    EmptyExcel { path: String },
    #[snafu(display("Unexpected cell content at row {lineno}: {content}"))]
    ExcelWrongCellType { lineno: usize, content: String },
    #[snafu(display("Error opening CSV file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error parsing CSV line {lineno}"))]
    CsvLineParse { source: csv::Error, lineno: usize },
    #[snafu(display("CSV line {lineno} has no voter column"))]
    CsvLineTooShort { lineno: usize },
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Error serializing the summary"))]
    SerializingJson { source: serde_json::Error },
    #[snafu(display("Expected a positive index, found {content}"))]
    ParsingJsonNumber { content: String },
    #[snafu(display("Error writing the summary to {path}"))]
    WritingSummary {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("The session file has no parent directory"))]
    MissingParentDir {},
    #[snafu(display("Unknown role {role:?} for {id}"))]
    UnknownRole { id: String, role: String },
    #[snafu(display("Unknown team {team:?} for {id}"))]
    UnknownTeam { id: String, team: String },
    #[snafu(display("Invalid schedule for {candidate}"))]
    InvalidSchedule {
        source: ScheduleErrors,
        candidate: String,
    },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

type SessionResult<T> = Result<T, SessionError>;

/// A ballot, as read from a source.
/// This is before checking the voter against the roster.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ParsedBallot {
    pub voter: String,
    pub picks: Vec<String>,
}

fn parse_role(entry: &RosterEntry) -> SessionResult<Role> {
    let role = match entry.role.as_str() {
        "member" => Role::Member,
        "manager" => Role::Manager,
        "executive" => Role::Executive,
        "sysadmin" => Role::SystemAdmin,
        "assistant" => Role::Assistant,
        x => {
            return UnknownRoleSnafu {
                id: entry.id.clone(),
                role: x,
            }
            .fail()
        }
    };
    Ok(role)
}

fn parse_team(entry: &RosterEntry) -> SessionResult<Team> {
    let team = match entry.team.as_str() {
        "engineering" => Team::Engineering,
        "product" => Team::Product,
        "design" => Team::Design,
        "operations" => Team::Operations,
        "support" => Team::Support,
        x => {
            return UnknownTeamSnafu {
                id: entry.id.clone(),
                team: x,
            }
            .fail()
        }
    };
    Ok(team)
}

fn read_roster(entries: &[RosterEntry]) -> SessionResult<Vec<Person>> {
    let mut res: Vec<Person> = Vec::new();
    for e in entries.iter() {
        res.push(Person {
            id: PersonId(e.id.clone()),
            name: e.name.clone(),
            role: parse_role(e)?,
            title: e.title.clone().unwrap_or_default(),
            team: parse_team(e)?,
        });
    }
    Ok(res)
}

fn read_ballot_source(root: &Path, source: &BallotSource) -> SessionResult<Vec<ParsedBallot>> {
    match source.provider.as_str() {
        "inline" => Ok(source
            .ballots
            .clone()
            .unwrap_or_default()
            .into_iter()
            .map(|b| ParsedBallot {
                voter: b.voter,
                picks: b
                    .picks
                    .into_iter()
                    .filter(|p| !p.trim().is_empty())
                    .collect(),
            })
            .collect()),
        provider @ ("csv" | "xlsx") => {
            let file_path = match &source.file_path {
                Some(p) => io_common::resolve_path(root, p),
                None => whatever!("Provider {:?} requires a filePath", provider),
            };
            info!("Attempting to read ballot file {:?}", file_path);
            if provider == "csv" {
                io_csv::read_csv_ballots(file_path, source)
            } else {
                io_xlsx::read_xlsx_ballots(file_path, source)
            }
        }
        x => whatever!("Provider not implemented {:?}", x),
    }
}

fn validate_rules(
    rules: &SessionRules,
    seed_override: Option<u64>,
) -> SessionResult<(ResultOptions, Option<u64>)> {
    let options = ResultOptions {
        discard_one_random_ballot: rules.discard_one_random_ballot.unwrap_or(false),
        enable_executive_bonus: rules.enable_executive_bonus.unwrap_or(false),
    };
    let seed = match (seed_override, &rules.random_seed) {
        (Some(s), _) => Some(s),
        (None, None) => None,
        (None, Some(s)) => match read_js_u64(s) {
            Some(x) => Some(x),
            None => whatever!("Cannot use randomSeed {:?}: not an integer", s),
        },
    };
    Ok((options, seed))
}

fn person_name(roster: &[Person], id: &PersonId) -> String {
    roster
        .iter()
        .find(|p| p.id == *id)
        .map(|p| p.name.clone())
        .unwrap_or_else(|| UNKNOWN_PERSON.to_string())
}

fn project_names(config: &SessionConfig, candidate: &PersonId) -> Vec<String> {
    let mut res: Vec<String> = Vec::new();
    for n in config.nominations.iter() {
        if n.candidate != candidate.0 {
            continue;
        }
        let name = config
            .projects
            .iter()
            .find(|p| p.id == n.project)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| n.project.clone());
        if !res.contains(&name) {
            res.push(name);
        }
    }
    res
}

fn schedules_to_json(
    config: &SessionConfig,
    roster: &[Person],
    results: &ComputedResults,
) -> SessionResult<Vec<JSValue>> {
    let mut l: Vec<JSValue> = Vec::new();
    for entry in config.schedules.iter() {
        let candidate = PersonId(entry.candidate.clone());
        let dates = parse_dates(entry.dates.as_slice()).context(InvalidScheduleSnafu {
            candidate: entry.candidate.clone(),
        })?;
        let target = results.days_for(&candidate) as usize;
        let check = validate(&dates);
        let st = status(dates.len(), target, check.reason());
        debug!(
            "schedules_to_json: {}: {:?} target {} -> {:?}",
            candidate, dates, target, st
        );
        l.push(json!({
            "candidate": entry.candidate,
            "name": person_name(roster, &candidate),
            "selected": dates.len(),
            "target": target,
            "message": st.message,
            "isError": st.is_error,
        }));
    }
    Ok(l)
}

fn build_summary_js(
    config: &SessionConfig,
    roster: &[Person],
    results: &ComputedResults,
    rejected: &[(String, String)],
) -> SessionResult<JSValue> {
    let c = OutputConfig {
        session: config.session_settings.session_name.clone(),
        week_of: config.session_settings.week_of.clone(),
    };
    let rows: Vec<JSValue> = results
        .rows
        .iter()
        .enumerate()
        .map(|(idx, r)| {
            json!({
                "rank": idx + 1,
                "candidate": r.candidate.0,
                "name": person_name(roster, &r.candidate),
                "votes": r.votes,
                "days": r.days,
                "projects": project_names(config, &r.candidate),
            })
        })
        .collect();
    let bonuses: Vec<JSValue> = results
        .bonuses
        .iter()
        .map(|b| json!({"candidate": b.candidate.0, "days": b.days}))
        .collect();
    let rejected_js: Vec<JSValue> = rejected
        .iter()
        .map(|(voter, reason)| json!({"voter": voter, "reason": reason}))
        .collect();
    Ok(json!({
        "config": c,
        "results": rows,
        "discardedBallot": results.discarded_voter.as_ref().map(|v| v.0.clone()),
        "bonuses": bonuses,
        "rejectedBallots": rejected_js,
        "schedules": schedules_to_json(config, roster, results)?,
    }))
}

fn write_summary(pretty_js: &str, out: Option<String>) -> SessionResult<()> {
    match out.as_deref() {
        None | Some("") | Some("stdout") => {
            println!("{}", pretty_js);
        }
        Some(path) => {
            info!("Writing summary to {:?}", path);
            fs::write(path, pretty_js).context(WritingSummarySnafu { path })?;
        }
    }
    Ok(())
}

/// Runs one session described by the file at `config_path` and returns its summary.
///
/// `seed` overrides the `randomSeed` of the session. Without any seed, the draws come
/// from the operating system and the summary may differ between runs.
pub fn run_session(
    config_path: String,
    check_summary_path: Option<String>,
    out: Option<String>,
    seed: Option<u64>,
) -> SessionResult<JSValue> {
    let config_p = Path::new(config_path.as_str());
    let config_str = fs::read_to_string(config_path.clone()).context(OpeningJsonSnafu {
        path: config_path.clone(),
    })?;
    let config: SessionConfig = serde_json::from_str(&config_str).context(ParsingJsonSnafu {})?;
    info!("config: {:?}", config);

    let (options, seed) = validate_rules(&config.rules, seed)?;
    let roster = read_roster(&config.roster)?;

    let nominations: Vec<Nomination> = config
        .nominations
        .iter()
        .map(|n| Nomination {
            candidate: PersonId(n.candidate.clone()),
            project: n.project.clone(),
            justification: n.justification.clone().unwrap_or_default(),
            nominated_by: PersonId(n.nominated_by.clone()),
        })
        .collect();

    let root_p = config_p.parent().context(MissingParentDirSnafu {})?;
    let mut data: Vec<ParsedBallot> = Vec::new();
    for source in config.ballot_sources.iter() {
        let mut source_data = read_ballot_source(root_p, source)?;
        data.append(&mut source_data);
    }
    info!("data: {:?}", data);

    let mut builder = Builder::new(&roster).nominations(&nominations);
    let mut rejected: Vec<(String, String)> = Vec::new();
    for pb in data.iter() {
        let ballot = Ballot {
            voter: PersonId(pb.voter.clone()),
            picks: pb.picks.iter().map(|p| PersonId(p.clone())).collect(),
        };
        if let Err(e) = builder.add_ballot(&ballot) {
            warn!("run_session: skipping ballot of {}: {}", pb.voter, e);
            rejected.push((pb.voter.clone(), e.to_string()));
        }
    }

    let mut picker: Box<dyn RandomPicker> = match seed {
        Some(s) => Box::new(SeededPicker::new(s)),
        None => {
            let p = SystemPicker::new();
            debug!(
                "run_session: cryptographic source: {}",
                p.is_cryptographic()
            );
            Box::new(p)
        }
    };
    let results = builder.compute(&options, picker.as_mut());
    info!("res {:?}", results);

    // Assemble the final json
    let result_js = build_summary_js(&config, &roster, &results, &rejected)?;
    let pretty_js_stats =
        serde_json::to_string_pretty(&result_js).context(SerializingJsonSnafu {})?;
    write_summary(
        &pretty_js_stats,
        out.or_else(|| config.session_settings.output_path.clone()),
    )?;

    // The reference summary, if provided for comparison
    if let Some(summary_p) = check_summary_path {
        let summary_ref = read_summary(summary_p)?;
        info!("summary: {:?}", summary_ref);
        let pretty_js_summary_ref =
            serde_json::to_string_pretty(&summary_ref).context(SerializingJsonSnafu {})?;
        if pretty_js_summary_ref != pretty_js_stats {
            warn!("Found differences with the reference string");
            print_diff(
                pretty_js_summary_ref.as_str(),
                pretty_js_stats.as_ref(),
                "\n",
            );
            whatever!("Difference detected between calculated summary and reference summary")
        }
    }

    Ok(result_js)
}

#[cfg(test)]
mod tests {
    use super::*;
    use snafu::{ErrorCompat, IntoError};

    fn test_dir() -> String {
        option_env!("MERIT_TEST_DIR")
            .unwrap_or(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data"))
            .to_string()
    }

    fn run_session_test(
        test_name: &str,
        config_lpath: &str,
        summary_lpath: &str,
    ) -> SessionResult<JSValue> {
        let test_dir = test_dir();
        info!("Running test {}", test_name);
        let res = run_session(
            format!("{}/{}/{}", test_dir, test_name, config_lpath),
            Some(format!("{}/{}/{}", test_dir, test_name, summary_lpath)),
            Some("stdout".to_string()),
            None,
        );
        if let Err(e) = &res {
            warn!("Error occured {:?}", e);
            eprintln!("An error occured {}", e);
            if let Some(bt) = ErrorCompat::backtrace(e) {
                eprintln!("trace: {}", bt);
            } else {
                eprintln!("No trace found");
            }
        }
        res
    }

    fn test_wrapper(test_name: &str) -> SessionResult<JSValue> {
        run_session_test(
            test_name,
            format!("{}_config.json", test_name).as_str(),
            format!("{}_expected_summary.json", test_name).as_str(),
        )
    }

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn entry(role: &str, team: &str) -> RosterEntry {
        RosterEntry {
            id: "x".to_string(),
            name: "X".to_string(),
            role: role.to_string(),
            title: None,
            team: team.to_string(),
        }
    }

    #[test]
    fn weekly_inline() {
        init();
        assert!(test_wrapper("weekly_inline").is_ok());
    }

    #[test]
    fn csv_ballots() {
        init();
        assert!(test_wrapper("csv_ballots").is_ok());
    }

    #[test]
    fn xlsx_ballots() {
        init();
        assert!(test_wrapper("xlsx_ballots").is_ok());
    }

    #[test]
    fn discard_single() {
        init();
        assert!(test_wrapper("discard_single").is_ok());
    }

    #[test]
    fn mismatched_reference_is_an_error() {
        init();
        let test_dir = test_dir();
        let res = run_session(
            format!("{}/weekly_inline/weekly_inline_config.json", test_dir),
            Some(format!(
                "{}/csv_ballots/csv_ballots_expected_summary.json",
                test_dir
            )),
            Some("stdout".to_string()),
            None,
        );
        assert!(matches!(res, Err(SessionError::Whatever { .. })));
    }

    #[test]
    fn seed_is_irrelevant_without_random_options() {
        init();
        let test_dir = test_dir();
        let path = format!("{}/weekly_inline/weekly_inline_config.json", test_dir);
        // The session disables both random options: the seed changes nothing.
        let a = run_session(path.clone(), None, Some("stdout".to_string()), Some(11)).unwrap();
        let b = run_session(path, None, Some("stdout".to_string()), None).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn missing_session_file() {
        init();
        let res = run_session("/nonexistent/session.json".to_string(), None, None, None);
        assert!(matches!(res, Err(SessionError::OpeningJson { .. })));
    }

    #[test]
    fn roles_and_teams() {
        assert_eq!(
            parse_role(&entry("executive", "design")).unwrap(),
            Role::Executive
        );
        assert_eq!(
            parse_role(&entry("sysadmin", "design")).unwrap(),
            Role::SystemAdmin
        );
        assert_eq!(parse_team(&entry("member", "support")).unwrap(), Team::Support);
        assert!(matches!(
            parse_role(&entry("ceo", "design")),
            Err(SessionError::UnknownRole { .. })
        ));
        assert!(matches!(
            parse_team(&entry("member", "legal")),
            Err(SessionError::UnknownTeam { .. })
        ));
    }

    #[test]
    fn rules_and_seeds() {
        let rules = SessionRules {
            discard_one_random_ballot: Some(true),
            enable_executive_bonus: None,
            random_seed: Some(json!("12")),
        };
        let (options, seed) = validate_rules(&rules, None).unwrap();
        assert!(options.discard_one_random_ballot);
        assert!(!options.enable_executive_bonus);
        assert_eq!(seed, Some(12));
        assert_eq!(validate_rules(&rules, Some(5)).unwrap().1, Some(5));

        let numeric = SessionRules {
            random_seed: Some(json!(12)),
            ..rules.clone()
        };
        assert_eq!(validate_rules(&numeric, None).unwrap().1, Some(12));

        for seed in [json!("twelve"), json!(-3), json!(1.5), json!(true)] {
            let bad = SessionRules {
                random_seed: Some(seed),
                ..rules.clone()
            };
            assert!(validate_rules(&bad, None).is_err());
        }
    }

    #[test]
    fn numeric_seed_in_session_file() {
        init();
        let path = format!("{}/discard_single/discard_single_config.json", test_dir());
        let config: SessionConfig =
            serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(config.rules.random_seed, Some(json!(7)));
        assert!(test_wrapper("discard_single").is_ok());
    }

    #[test]
    fn summary_serialization_has_its_own_label() {
        let source = serde_json::from_str::<JSValue>("{").unwrap_err();
        let e = SerializingJsonSnafu {}.into_error(source);
        assert_eq!(e.to_string(), "Error serializing the summary");
        let source = serde_json::from_str::<JSValue>("{").unwrap_err();
        let e = ParsingJsonSnafu {}.into_error(source);
        assert_eq!(e.to_string(), "Error parsing JSON");
    }

    #[test]
    fn unknown_people_render_as_placeholder() {
        assert_eq!(person_name(&[], &PersonId::from("ghost")), "Unknown");
    }
}
