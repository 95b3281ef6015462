pub mod number;

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Name of a form field, shared by the step definition, the input handle
/// bound to it and the submitted payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldId(String);

impl FieldId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Borrow<str> for FieldId {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl AsRef<str> for FieldId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl From<String> for FieldId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for FieldId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<&String> for FieldId {
    fn from(value: &String) -> Self {
        Self(value.clone())
    }
}
