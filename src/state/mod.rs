pub mod field;
pub mod flow;
pub mod step;
pub mod summary;
pub mod validation;
pub mod wizard;
