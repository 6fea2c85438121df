// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// An opaque identity for a person of the roster.
///
/// Identities found in ballots or results are not guaranteed to match a
/// roster entry: callers that render them are expected to substitute a
/// placeholder for unknown identities.
#[derive(Eq, PartialEq, Debug, Clone, Hash, Ord, PartialOrd)]
pub struct PersonId(pub String);

impl PersonId {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for PersonId {
    fn from(s: &str) -> Self {
        PersonId(s.to_string())
    }
}

impl From<String> for PersonId {
    fn from(s: String) -> Self {
        PersonId(s)
    }
}

impl Display for PersonId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The roles of the roster. The set is closed.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum Role {
    Member,
    /// Line managers. They cast ballots.
    Manager,
    /// Casts a ballot and is the only role that may grant bonus days.
    Executive,
    SystemAdmin,
    Assistant,
}

impl Role {
    /// Only line managers and the executive cast ballots.
    pub fn can_vote(&self) -> bool {
        matches!(self, Role::Manager | Role::Executive)
    }

    pub fn grants_bonus(&self) -> bool {
        matches!(self, Role::Executive)
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum Team {
    Engineering,
    Product,
    Design,
    Operations,
    Support,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Person {
    pub id: PersonId,
    pub name: String,
    pub role: Role,
    pub title: String,
    pub team: Team,
}

/// An entry of the project catalog.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Project {
    pub id: String,
    pub name: String,
}

/// A candidate put forward for the work done on a project.
///
/// The same candidate may be nominated several times for different projects.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Nomination {
    pub candidate: PersonId,
    pub project: String,
    pub justification: String,
    pub nominated_by: PersonId,
}

/// The picks of one voter, in order of preference.
///
/// Picks are not deduplicated: a candidate listed twice counts twice in the tally.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Ballot {
    pub voter: PersonId,
    pub picks: Vec<PersonId>,
}

// ******** Output data structures *********

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ResultRow {
    pub candidate: PersonId,
    pub votes: u64,
    /// Home-office days awarded, bonus included.
    pub days: u32,
}

/// A bonus drawn for one pick of the executive's ballot.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct BonusAward {
    pub candidate: PersonId,
    pub days: u32,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ComputedResults {
    /// All the candidates with at least one vote, by decreasing number of votes.
    pub rows: Vec<ResultRow>,
    /// The voter whose ballot was set aside, if any.
    pub discarded_voter: Option<PersonId>,
    /// The bonus draws, in the order they were applied.
    pub bonuses: Vec<BonusAward>,
}

impl ComputedResults {
    pub fn days_for(&self, candidate: &PersonId) -> u32 {
        self.rows
            .iter()
            .find(|r| r.candidate == *candidate)
            .map(|r| r.days)
            .unwrap_or(0)
    }
}

/// Errors raised while assembling the ballots of a session.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum ResultErrors {
    UnknownVoter(PersonId),
    IneligibleVoter(PersonId),
    TooManyPicks(PersonId, usize),
    DuplicateBallot(PersonId),
}

impl Error for ResultErrors {}

impl Display for ResultErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResultErrors::UnknownVoter(id) => write!(f, "voter {} is not in the roster", id),
            ResultErrors::IneligibleVoter(id) => {
                write!(f, "voter {} does not hold a voting role", id)
            }
            ResultErrors::TooManyPicks(id, n) => {
                write!(
                    f,
                    "ballot of {} has {} picks (at most {} allowed)",
                    id, n, MAX_PICKS
                )
            }
            ResultErrors::DuplicateBallot(id) => write!(f, "voter {} already cast a ballot", id),
        }
    }
}

/// Errors for the schedule inputs that are not calendar dates.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum ScheduleErrors {
    InvalidDate(String),
}

impl Error for ScheduleErrors {}

impl Display for ScheduleErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScheduleErrors::InvalidDate(s) => write!(f, "not an ISO calendar date: {:?}", s),
        }
    }
}

// ********* Configuration **********

/// The maximum number of picks on a ballot.
pub const MAX_PICKS: usize = 3;

/// The number of rows eligible for the base day award.
pub const TOP_ROWS: usize = 3;

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct ResultOptions {
    /// Set aside one ballot, chosen at random, before counting.
    pub discard_one_random_ballot: bool,
    /// Let the executive grant 1 to 3 extra days to each of their picks.
    pub enable_executive_bonus: bool,
}

impl ResultOptions {
    pub const DEFAULT: ResultOptions = ResultOptions {
        discard_one_random_ballot: false,
        enable_executive_bonus: false,
    };
}
