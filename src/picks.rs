//! Pick submission and its pool-rule validation.

use chrono::Utc;

use crate::domain::error::PickError;
use crate::domain::Pick;
use crate::store::Store;

/// Records a pick for an entry, enforcing the pool rules: the entry must
/// exist and be alive, the team must exist and be fresh for this entry, and
/// the week must not already be decided. The model's current win probability
/// for the team, where one exists, is stamped on the stored pick.
pub fn submit_pick<S: Store>(
    store: &mut S,
    entry_id: u32,
    team_abbr: &str,
    season: u16,
    week: u8,
    is_recommended: bool,
) -> Result<Pick, PickError> {
    let entry = store.entry(entry_id).ok_or(PickError::EntryNotFound(entry_id))?;
    if !entry.is_alive {
        return Err(PickError::EntryEliminated(entry_id));
    }
    let team = store
        .team(team_abbr)
        .ok_or_else(|| PickError::TeamNotFound(team_abbr.to_string()))?;

    let prior_picks = store.picks_for_entry(entry_id);
    if let Some(prior) = prior_picks.iter().find(|pick| pick.team == team.abbr) {
        return Err(PickError::TeamAlreadyUsed {
            team: team.abbr,
            week: prior.week,
        });
    }
    if prior_picks
        .iter()
        .any(|pick| pick.season == season && pick.week == week)
    {
        return Err(PickError::WeekAlreadyPicked { week });
    }

    let win_prob = store
        .games(season, week, false, false)
        .into_iter()
        .filter(|game| game.week == week)
        .find_map(|game| game.win_prob_for(&team.abbr));

    let pick = Pick {
        entry_id,
        team: team.abbr,
        season,
        week,
        win_prob,
        is_recommended,
        outcome: None,
        submitted_at: Utc::now(),
    };
    store.insert_pick(pick.clone());
    Ok(pick)
}
