use thiserror::Error;

/// Rejections raised while validating a pick submission. The first two are
/// not-found conditions; the rest are conflicts with pool rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PickError {
    #[error("entry {0} not found")]
    EntryNotFound(u32),

    #[error("team {0} not found")]
    TeamNotFound(String),

    #[error("entry {0} is already eliminated")]
    EntryEliminated(u32),

    #[error("{team} already used by this entry (week {week})")]
    TeamAlreadyUsed { team: String, week: u8 },

    #[error("already have a pick for week {week}")]
    WeekAlreadyPicked { week: u8 },
}

/// Raised when the training corpus cannot support a fit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrainError {
    #[error("insufficient training data: only {samples} samples")]
    InsufficientData { samples: usize },
}
