//! A Monte Carlo and beam-search decision engine for NFL survivor pools.
//! Derives per-team survival probabilities conditional on a first-week pick,
//! optimal full-season pick sequences, and diversified recommendations across
//! a portfolio of entries, given per-game win probabilities.

#![allow(clippy::too_many_arguments)]

pub mod beam;
pub mod domain;
pub mod feature;
pub mod lookup;
pub mod matchup;
pub mod matrix;
pub mod mc;
pub mod model;
pub mod picks;
pub mod portfolio;
pub mod print;
pub mod results;
pub mod scarcity;
pub mod store;

#[doc = include_str!("../README.md")]
#[cfg(doc)]
fn readme() {}
