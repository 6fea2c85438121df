pub use crate::config::*;
use crate::picker::RandomPicker;

use log::debug;

/// A builder for assembling the ballots of a session.
///
/// The builder owns the ballots. The result engine only ever sees an immutable
/// snapshot of them.
///
/// ```
/// use merit_core::builder::Builder;
/// use merit_core::*;
/// # use merit_core::ResultErrors;
///
/// let roster = vec![
///     Person {
///         id: PersonId::from("ana"),
///         name: "Ana".to_string(),
///         role: Role::Manager,
///         title: "Engineering Manager".to_string(),
///         team: Team::Engineering,
///     },
///     Person {
///         id: PersonId::from("bo"),
///         name: "Bo".to_string(),
///         role: Role::Member,
///         title: "Engineer".to_string(),
///         team: Team::Engineering,
///     },
/// ];
/// let mut builder = Builder::new(&roster);
/// builder.add_ballot_simple("ana", &["bo"])?;
/// // Members do not vote.
/// assert!(builder.add_ballot_simple("bo", &["ana"]).is_err());
///
/// let res = builder.compute(&ResultOptions::DEFAULT, &mut SystemPicker::new());
/// assert_eq!(res.rows[0].votes, 1);
///
/// # Ok::<(), ResultErrors>(())
/// ```
pub struct Builder {
    pub(crate) _roster: Vec<Person>,
    pub(crate) _nominations: Vec<Nomination>,
    pub(crate) _ballots: Vec<Ballot>,
}

impl Builder {
    pub fn new(roster: &[Person]) -> Builder {
        Builder {
            _roster: roster.to_vec(),
            _nominations: Vec::new(),
            _ballots: Vec::new(),
        }
    }

    pub fn nominations(self, noms: &[Nomination]) -> Builder {
        Builder {
            _roster: self._roster,
            _nominations: noms.to_vec(),
            _ballots: self._ballots,
        }
    }

    /// Adds a ballot from plain identities.
    pub fn add_ballot_simple(&mut self, voter: &str, picks: &[&str]) -> Result<(), ResultErrors> {
        self.add_ballot(&Ballot {
            voter: PersonId::from(voter),
            picks: picks.iter().map(|p| PersonId::from(*p)).collect(),
        })
    }

    /// Adds a ballot.
    ///
    /// The voter must be in the roster with a voting role, and may only vote once.
    /// Picks are not checked against the roster and may repeat a candidate.
    pub fn add_ballot(&mut self, ballot: &Ballot) -> Result<(), ResultErrors> {
        let voter = self
            ._roster
            .iter()
            .find(|p| p.id == ballot.voter)
            .ok_or_else(|| ResultErrors::UnknownVoter(ballot.voter.clone()))?;
        if !voter.role.can_vote() {
            return Err(ResultErrors::IneligibleVoter(ballot.voter.clone()));
        }
        if ballot.picks.len() > MAX_PICKS {
            return Err(ResultErrors::TooManyPicks(ballot.voter.clone(), ballot.picks.len()));
        }
        if self._ballots.iter().any(|b| b.voter == ballot.voter) {
            return Err(ResultErrors::DuplicateBallot(ballot.voter.clone()));
        }
        debug!("add_ballot: {} -> {:?}", ballot.voter, ballot.picks);
        self._ballots.push(ballot.clone());
        Ok(())
    }

    pub fn ballots(&self) -> &[Ballot] {
        &self._ballots
    }

    pub fn roster(&self) -> &[Person] {
        &self._roster
    }

    /// Runs the result engine on the current ballots.
    ///
    /// See [`crate::compute_results`]: the output varies between calls when
    /// randomized options are enabled.
    pub fn compute<P: RandomPicker + ?Sized>(
        &self,
        options: &ResultOptions,
        picker: &mut P,
    ) -> ComputedResults {
        crate::compute_results(
            &self._nominations,
            &self._ballots,
            &self._roster,
            options,
            picker,
        )
    }
}
