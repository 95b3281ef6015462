/// Host-side access to one form control.
///
/// A browser host backs this with a DOM element, the console host and the
/// tests with [`MemoryInput`]. The validator only reads values and toggles
/// the invalid marking; it never owns the control.
pub trait InputHandle {
    fn value(&self) -> String;
    fn set_value(&mut self, value: &str);

    fn is_invalid(&self) -> bool;
    fn set_invalid(&mut self, invalid: bool);
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryInput {
    value: String,
    invalid: bool,
}

impl MemoryInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            invalid: false,
        }
    }
}

impl InputHandle for MemoryInput {
    fn value(&self) -> String {
        self.value.clone()
    }

    fn set_value(&mut self, value: &str) {
        self.value = value.to_string();
    }

    fn is_invalid(&self) -> bool {
        self.invalid
    }

    fn set_invalid(&mut self, invalid: bool) {
        self.invalid = invalid;
    }
}
