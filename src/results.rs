//! Post-result maintenance: refreshing win probabilities on upcoming games
//! and settling pick outcomes once a week completes.

use tracing::{debug, info};

use crate::feature::StatLine;
use crate::model::Predictor;
use crate::store::Store;

/// Recomputes `home_win_prob`/`away_win_prob` for every unplayed game of the
/// season, using each side's latest stats from strictly before the game's
/// week. Returns the number of games updated; played games are untouched.
pub fn update_win_probs<S: Store>(store: &mut S, predictor: &Predictor, season: u16) -> usize {
    let games = store.games(season, 0, true, false);
    let mut updated = 0;

    for game in games {
        let home = StatLine::resolve(
            store
                .latest_stats(&game.home, season, game.week, true)
                .as_ref(),
        );
        let away = StatLine::resolve(
            store
                .latest_stats(&game.away, season, game.week, true)
                .as_ref(),
        );
        let (p_home, p_away) = predictor.predict(&home, &away, game.neutral_site);
        store.set_game_win_prob(season, game.week, &game.home, p_home, p_away);
        updated += 1;
    }
    info!("updated win probabilities for {updated} games (season {season})");
    updated
}

/// Settles every undecided pick of `(season, week)` whose game has completed:
/// the pick's outcome becomes whether the picked team won, and a loss
/// eliminates the entry on the spot. Returns the number of picks settled.
pub fn settle_picks<S: Store>(store: &mut S, season: u16, week: u8) -> usize {
    let picks = store.picks_for_week(season, week);
    let mut settled = 0;

    for pick in picks {
        if pick.outcome.is_some() {
            continue;
        }
        let won = store
            .games(season, week, false, false)
            .into_iter()
            .filter(|game| game.week == week && game.is_played())
            .find_map(|game| game.won_by(&pick.team));
        let Some(won) = won else {
            debug!(
                "no completed game for {} in week {week}; pick left pending",
                pick.team
            );
            continue;
        };

        store.set_pick_outcome(pick.entry_id, season, week, won);
        if !won {
            if let Some(entry) = store.entry(pick.entry_id) {
                if entry.is_alive {
                    store.eliminate_entry(entry.id, week);
                    info!("entry {} eliminated in week {week} by {}", entry.id, pick.team);
                }
            }
        }
        settled += 1;
    }
    settled
}
