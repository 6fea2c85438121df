mod config;
mod picker;
use log::{debug, info};

use std::collections::{HashMap, HashSet};

pub mod builder;
pub mod manual;
pub mod schedule;

pub use crate::config::*;
pub use crate::picker::*;

// **** Private structures ****

// Running tally. Candidates keep the order in which they were first seen.
struct Tally {
    order: Vec<(PersonId, u64)>,
    index: HashMap<PersonId, usize>,
}

impl Tally {
    fn new() -> Tally {
        Tally {
            order: Vec::new(),
            index: HashMap::new(),
        }
    }

    fn add(&mut self, candidate: &PersonId) {
        match self.index.get(candidate) {
            Some(idx) => self.order[*idx].1 += 1,
            None => {
                self.index.insert(candidate.clone(), self.order.len());
                self.order.push((candidate.clone(), 1));
            }
        }
    }
}

/// Days granted by the base rule to a row of the top three.
fn base_days(distinct_voters: usize, executive_voted: bool) -> u32 {
    match distinct_voters {
        0 | 1 => 0,
        2 => 1,
        _ if executive_voted => 3,
        _ => 2,
    }
}

/// The executive is looked up by role only. The first one in roster order wins.
fn find_executive(roster: &[Person]) -> Option<&Person> {
    roster.iter().find(|p| p.role.grants_bonus())
}

/// Computes the ranked results of the vote.
///
/// Arguments:
/// * `nominations` the nominations of the week. They are only used for reporting: a
/// candidate with votes but without nomination is still counted.
/// * `ballots` a snapshot of the ballots, one per voter
/// * `roster` the people of the program, used to locate the executive
/// * `options` the randomized rules to apply
/// * `picker` the source of randomness
///
/// The output is not deterministic when any of the options is enabled: two calls with
/// the same inputs may discard a different ballot or draw different bonuses. With both
/// options disabled, the picker is never called and the output only depends on the inputs.
///
/// Identities that do not belong to the roster are counted like any other.
pub fn compute_results<P: RandomPicker + ?Sized>(
    nominations: &[Nomination],
    ballots: &[Ballot],
    roster: &[Person],
    options: &ResultOptions,
    picker: &mut P,
) -> ComputedResults {
    info!(
        "compute_results: {} ballots, {} nominations, options: {:?}",
        ballots.len(),
        nominations.len(),
        options
    );

    let executive = find_executive(roster);
    match executive {
        Some(p) => debug!("compute_results: executive is {} ({})", p.id, p.name),
        None => debug!("compute_results: no executive, bonus disabled"),
    }

    // Set aside one ballot if requested.
    let mut discarded: Option<usize> = None;
    if options.discard_one_random_ballot && !ballots.is_empty() {
        let idx = picker.pick(0, ballots.len() - 1);
        info!(
            "compute_results: discarding ballot of voter {}",
            ballots[idx].voter
        );
        discarded = Some(idx);
    }
    let counted: Vec<&Ballot> = ballots
        .iter()
        .enumerate()
        .filter(|(idx, _)| Some(*idx) != discarded)
        .map(|(_, b)| b)
        .collect();

    let mut tally = Tally::new();
    for b in counted.iter() {
        for cand in b.picks.iter() {
            tally.add(cand);
        }
    }

    {
        let nominated: HashSet<&PersonId> = nominations.iter().map(|n| &n.candidate).collect();
        for (cand, _) in tally.order.iter() {
            if !nominated.contains(cand) {
                debug!(
                    "compute_results: candidate {} received votes without nomination",
                    cand
                );
            }
        }
    }

    let mut rows: Vec<ResultRow> = tally
        .order
        .into_iter()
        .map(|(candidate, votes)| ResultRow {
            candidate,
            votes,
            days: 0,
        })
        .collect();
    // Stable: ties keep the order of first appearance.
    rows.sort_by(|a, b| b.votes.cmp(&a.votes));

    for row in rows.iter_mut().take(TOP_ROWS) {
        let voters: HashSet<&PersonId> = counted
            .iter()
            .filter(|b| b.picks.contains(&row.candidate))
            .map(|b| &b.voter)
            .collect();
        let executive_voted = executive.map_or(false, |e| voters.contains(&e.id));
        row.days = base_days(voters.len(), executive_voted);
        debug!(
            "compute_results: {}: {} votes, {} distinct voters, executive: {} -> {} days",
            row.candidate,
            row.votes,
            voters.len(),
            executive_voted,
            row.days
        );
    }

    let mut bonuses: Vec<BonusAward> = Vec::new();
    if options.enable_executive_bonus {
        let exec_ballot = executive.and_then(|e| counted.iter().find(|b| b.voter == e.id));
        match exec_ballot {
            Some(ballot) => {
                // Every pick of the executive gets a bonus, not only those in the top three.
                // The ballot was counted, so each of its picks has a row.
                for cand in ballot.picks.iter() {
                    let days = picker.pick(1, 3) as u32;
                    if let Some(row) = rows.iter_mut().find(|r| r.candidate == *cand) {
                        row.days += days;
                    }
                    info!(
                        "compute_results: executive bonus of {} days for {}",
                        days, cand
                    );
                    bonuses.push(BonusAward {
                        candidate: cand.clone(),
                        days,
                    });
                }
            }
            None => {
                debug!("compute_results: no counted executive ballot, no bonus");
            }
        }
    }

    ComputedResults {
        rows,
        discarded_voter: discarded.map(|idx| ballots[idx].voter.clone()),
        bonuses,
    }
}
