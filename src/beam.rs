//! Beam search over full remaining-season pick sequences.

use crate::domain::TeamSet;
use crate::lookup::TeamLookup;
use crate::matrix::WinMatrix;

/// Number of partial sequences retained per week.
pub const BEAM_WIDTH: usize = 5;

/// Label rendered for a week with no legal pick.
pub const NO_PICK: &str = "NONE";

/// A full remaining-season pick sequence and its joint survival probability
/// under independent game outcomes. `None` entries mark weeks where the
/// sequence had no legal pick left.
#[derive(Debug, Clone, PartialEq)]
pub struct Strategy {
    pub picks: Vec<Option<usize>>,
    pub survival: f64,
}
impl Strategy {
    /// Pick labels by week, dead-end weeks rendered as [`NO_PICK`].
    pub fn labels(&self, teams: &TeamLookup) -> Vec<String> {
        self.picks
            .iter()
            .map(|pick| match pick {
                Some(team) => teams[*team].to_string(),
                None => NO_PICK.to_string(),
            })
            .collect()
    }
}

#[derive(Debug, Clone)]
struct BeamState {
    used: TeamSet,
    picks: Vec<Option<usize>>,
    survival: f64,
}

/// Finds the pick sequence maximizing the product of win probabilities over
/// all remaining weeks, keeping the best [`BEAM_WIDTH`] partial sequences at
/// each depth. A state that runs out of teams carries on with survival 0, so
/// the search degrades rather than aborts.
pub fn search(matrix: &WinMatrix, used: TeamSet) -> Strategy {
    if matrix.is_empty() {
        return Strategy {
            picks: vec![],
            survival: 1.0,
        };
    }

    let mut frontier = vec![BeamState {
        used,
        picks: vec![],
        survival: 1.0,
    }];

    for week_index in 0..matrix.n_weeks() {
        let row = matrix.row(week_index);
        let mut successors: Vec<BeamState> = vec![];

        for state in &frontier {
            let mut any_available = false;
            for (team, &prob) in row.iter().enumerate() {
                if state.used.contains(team) || prob.is_nan() {
                    continue;
                }
                any_available = true;
                let mut picks = state.picks.clone();
                picks.push(Some(team));
                successors.push(BeamState {
                    used: state.used.with(team),
                    picks,
                    survival: state.survival * prob,
                });
            }
            if !any_available {
                let mut picks = state.picks.clone();
                picks.push(None);
                successors.push(BeamState {
                    used: state.used,
                    picks,
                    survival: 0.0,
                });
            }
        }

        successors.sort_by(|a, b| b.survival.partial_cmp(&a.survival).expect("survival is never NaN"));
        successors.truncate(BEAM_WIDTH);
        frontier = successors;
    }

    let best = frontier
        .into_iter()
        .next()
        .expect("frontier is never empty");
    Strategy {
        picks: best.picks,
        survival: best.survival,
    }
}

#[cfg(test)]
mod tests;
