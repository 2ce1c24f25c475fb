//! Availability of strong teams over the remaining weeks.

use std::collections::BTreeMap;

use crate::domain::WeekMatchup;

/// Win probability at or above which a team counts as strong.
pub const STRONG_TEAM_THRESHOLD: f64 = 0.65;

/// Per future week, how many teams clear the threshold and have not been
/// burned yet. A week that drops toward zero is where an entry gets squeezed.
pub fn strong_teams_by_week(
    matchups_by_week: &BTreeMap<u8, Vec<WeekMatchup>>,
    used_teams: &[String],
    threshold: f64,
) -> BTreeMap<u8, usize> {
    matchups_by_week
        .iter()
        .map(|(&week, matchups)| {
            let strong_available = matchups
                .iter()
                .filter(|matchup| {
                    matchup.win_prob >= threshold
                        && !used_teams.iter().any(|used| used == &matchup.team)
                })
                .count();
            (week, strong_available)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::fixtures::matchups_from_rows;

    #[test]
    fn counts_only_unused_strong_teams() {
        let matchups_by_week = matchups_from_rows(
            5,
            &["A", "B", "C"],
            &[&[0.9, 0.7, 0.5], &[0.64, 0.65, 0.66]],
        );
        let scarcity =
            strong_teams_by_week(&matchups_by_week, &[], STRONG_TEAM_THRESHOLD);
        assert_eq!(2, scarcity[&5]);
        assert_eq!(2, scarcity[&6]);

        let scarcity = strong_teams_by_week(
            &matchups_by_week,
            &["A".to_string(), "C".to_string()],
            STRONG_TEAM_THRESHOLD,
        );
        assert_eq!(1, scarcity[&5]);
        assert_eq!(1, scarcity[&6]);
    }

    #[test]
    fn threshold_is_inclusive() {
        let matchups_by_week = matchups_from_rows(1, &["A"], &[&[0.65]]);
        let scarcity = strong_teams_by_week(&matchups_by_week, &[], STRONG_TEAM_THRESHOLD);
        assert_eq!(1, scarcity[&1]);
    }

    #[test]
    fn empty_map_stays_empty() {
        assert!(strong_teams_by_week(&BTreeMap::new(), &[], STRONG_TEAM_THRESHOLD).is_empty());
    }
}
