pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod inputs;
pub mod notify;
pub mod runtime;
pub mod state;
pub mod ui;

pub use crate::core::FieldId;
pub use crate::error::{Result, StepformError};

pub use crate::state::field;
pub use crate::state::flow;
pub use crate::state::step;
pub use crate::state::summary;
pub use crate::state::validation;
pub use crate::state::wizard;

pub use crate::config::FormConfig;
pub use crate::inputs::{FieldRegistry, InputHandle, MemoryInput};
pub use crate::notify::{ToastConfig, ToastMessage, ToastQueue};
pub use crate::state::wizard::{FinishOutcome, FormParts, StepValidator};
