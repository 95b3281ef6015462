use crate::core::FieldId;
use std::path::PathBuf;
use thiserror::Error;

/// Program errors. Field validation failures are not errors; they are
/// reported through toasts and [`crate::state::validation::StepResult`].
#[derive(Debug, Error)]
pub enum StepformError {
    #[error("failed to read form definition {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid form definition: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("form has no steps")]
    EmptyFlow,

    #[error("field `{0}` is declared more than once")]
    DuplicateField(FieldId),

    #[error("field `{0}` has no bound input")]
    UnboundField(FieldId),

    #[error("summary slot `{slot}` refers to unknown field `{field}`")]
    UnknownSummaryField { slot: String, field: FieldId },

    #[error("summary slot `{0}` must name exactly one of `field`, `join` or `ratio`")]
    InvalidSummarySlot(String),

    #[error("step index {index} is out of range ({len} steps)")]
    StepOutOfRange { index: usize, len: usize },

    #[error("step {index} is not the final step (last is {last})")]
    NotFinalStep { index: usize, last: usize },

    #[error("form action `{0}` is relative and no base URL was given")]
    RelativeAction(String),

    #[error("submission to {action} failed: {source}")]
    Submit {
        action: String,
        #[source]
        source: Box<ureq::Error>,
    },

    #[error("failed to write submission payload: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode submission payload: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StepformError>;
