pub mod input;
pub mod registry;

pub use input::{InputHandle, MemoryInput};
pub use registry::FieldRegistry;
