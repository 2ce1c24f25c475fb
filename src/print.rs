//! Console tables for the CLI binaries.

use std::collections::BTreeMap;

use stanza::style::{HAlign, Header, MinWidth, Styles};
use stanza::table::{Col, Row, Table};

use crate::domain::WeekMatchup;
use crate::model::fit::TrainReport;
use crate::portfolio::Recommendation;

/// Survival probabilities in descending order, annotated with the week's
/// matchup where one exists.
pub fn tabulate_survival(
    survival_probs: &BTreeMap<String, f64>,
    week_matchups: &[WeekMatchup],
) -> Table {
    let mut table = Table::default()
        .with_cols(vec![
            Col::new(Styles::default().with(MinWidth(6)).with(HAlign::Centred)),
            Col::new(Styles::default().with(MinWidth(10)).with(HAlign::Centred)),
            Col::new(Styles::default().with(MinWidth(10)).with(HAlign::Right)),
            Col::new(Styles::default().with(MinWidth(10)).with(HAlign::Right)),
        ])
        .with_row(Row::new(
            Styles::default().with(Header(true)),
            vec![
                "Team".into(),
                "Opponent".into(),
                "Win prob".into(),
                "Survival".into(),
            ],
        ));

    let mut ranked: Vec<_> = survival_probs.iter().collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(a.1).unwrap().then_with(|| a.0.cmp(b.0)));

    for (team, survival) in ranked {
        let matchup = week_matchups.iter().find(|matchup| &matchup.team == team);
        let opponent = matchup
            .map(|matchup| {
                if matchup.is_home {
                    format!("v {}", matchup.opponent)
                } else {
                    format!("@ {}", matchup.opponent)
                }
            })
            .unwrap_or_default();
        let win_prob = matchup
            .map(|matchup| format!("{:.3}", matchup.win_prob))
            .unwrap_or_default();
        table.push_row(Row::new(
            Styles::default(),
            vec![
                team.clone().into(),
                opponent.into(),
                win_prob.into(),
                format!("{survival:.4}").into(),
            ],
        ));
    }
    table
}

pub fn tabulate_scarcity(scarcity_by_week: &BTreeMap<u8, usize>) -> Table {
    let mut table = Table::default()
        .with_cols(vec![
            Col::new(Styles::default().with(MinWidth(6)).with(HAlign::Centred)),
            Col::new(Styles::default().with(MinWidth(14)).with(HAlign::Right)),
        ])
        .with_row(Row::new(
            Styles::default().with(Header(true)),
            vec!["Week".into(), "Strong teams".into()],
        ));
    for (week, available) in scarcity_by_week {
        table.push_row(Row::new(
            Styles::default(),
            vec![format!("{week}").into(), format!("{available}").into()],
        ));
    }
    table
}

pub fn tabulate_recommendations(recommendations: &[Recommendation]) -> Table {
    let mut table = Table::default()
        .with_cols(vec![
            Col::new(Styles::default().with(MinWidth(7)).with(HAlign::Centred)),
            Col::new(Styles::default().with(MinWidth(6)).with(HAlign::Centred)),
            Col::new(Styles::default().with(MinWidth(10)).with(HAlign::Right)),
            Col::new(Styles::default().with(MinWidth(10)).with(HAlign::Right)),
            Col::new(Styles::default().with(MinWidth(10)).with(HAlign::Right)),
            Col::new(Styles::default().with(MinWidth(24)).with(HAlign::Left)),
        ])
        .with_row(Row::new(
            Styles::default().with(Header(true)),
            vec![
                "Entry".into(),
                "Pick".into(),
                "Win prob".into(),
                "Survival".into(),
                "Coverage".into(),
                "Future picks".into(),
            ],
        ));

    for recommendation in recommendations {
        let win_prob = recommendation
            .win_prob
            .map(|prob| format!("{prob:.3}"))
            .unwrap_or_default();
        let future_picks = recommendation
            .strategy_picks
            .iter()
            .map(|(week, team)| format!("{week}:{team}"))
            .collect::<Vec<_>>()
            .join(" ");
        table.push_row(Row::new(
            Styles::default(),
            vec![
                format!("{}", recommendation.entry_id).into(),
                recommendation.team.clone().into(),
                win_prob.into(),
                format!("{:.4}", recommendation.survival_prob).into(),
                format!("{:.4}", recommendation.portfolio_coverage).into(),
                future_picks.into(),
            ],
        ));
    }
    table
}

pub fn tabulate_train_report(report: &TrainReport) -> Table {
    let mut table = Table::default()
        .with_cols(vec![
            Col::new(Styles::default().with(MinWidth(20)).with(HAlign::Left)),
            Col::new(Styles::default().with(MinWidth(12)).with(HAlign::Right)),
        ])
        .with_row(Row::new(
            Styles::default().with(Header(true)),
            vec!["Metric".into(), "Value".into()],
        ));
    let mut push = |metric: &str, value: String| {
        table.push_row(Row::new(
            Styles::default(),
            vec![metric.into(), value.into()],
        ));
    };
    push("Train samples", format!("{}", report.n_train_samples));
    push("Train Brier", format!("{:.4}", report.train_brier));
    push("Train log-loss", format!("{:.4}", report.train_log_loss));
    push("Home win rate", format!("{:.4}", report.home_win_rate));
    if let Some(validation) = &report.validation {
        push("Validation season", format!("{}", validation.season));
        push("Validation samples", format!("{}", validation.n_samples));
        push("Validation Brier", format!("{:.4}", validation.brier));
        push("Validation log-loss", format!("{:.4}", validation.log_loss));
        push("Validation accuracy", format!("{:.4}", validation.accuracy));
    }
    table
}
