pub mod console;
pub mod submit;

pub use console::{Console, RunOutcome};
pub use submit::{
    DryRunSubmitter, FormMethod, FormPayload, FormSubmitter, FormTarget, HttpSubmitter,
    SubmitReceipt,
};
