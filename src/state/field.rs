use crate::core::FieldId;
use crate::core::number::format_number;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldKind {
    #[default]
    Text,
    RequiredSelect,
    BoundedNumber,
}

/// Inclusive numeric bounds. A missing bound does not constrain.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NumberRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl NumberRange {
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }

    pub fn between(min: f64, max: f64) -> Self {
        Self::new(Some(min), Some(max))
    }

    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn contains(&self, value: f64) -> bool {
        if value.is_nan() {
            return false;
        }
        let above_min = self.min.is_none_or(|min| value >= min);
        let below_max = self.max.is_none_or(|max| value <= max);
        above_min && below_max
    }

    /// Human text for the allowed values, e.g. `between 18 and 99`.
    pub fn describe(&self) -> String {
        match (self.min, self.max) {
            (Some(min), Some(max)) => {
                format!("between {} and {}", format_number(min), format_number(max))
            }
            (Some(min), None) => format!("at least {}", format_number(min)),
            (None, Some(max)) => format!("at most {}", format_number(max)),
            (None, None) => "a number".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub id: FieldId,
    pub label: String,
    pub kind: FieldKind,
    pub required: bool,
    pub range: NumberRange,
}

impl FieldSpec {
    pub fn text(id: impl Into<FieldId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind: FieldKind::Text,
            required: false,
            range: NumberRange::unbounded(),
        }
    }

    pub fn select(id: impl Into<FieldId>, label: impl Into<String>) -> Self {
        Self {
            kind: FieldKind::RequiredSelect,
            required: true,
            ..Self::text(id, label)
        }
    }

    pub fn number(id: impl Into<FieldId>, label: impl Into<String>, range: NumberRange) -> Self {
        Self {
            kind: FieldKind::BoundedNumber,
            range,
            ..Self::text(id, label)
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn is_numeric(&self) -> bool {
        self.kind == FieldKind::BoundedNumber
    }

    pub fn is_required(&self) -> bool {
        self.required || self.kind == FieldKind::RequiredSelect
    }

    /// Whether a step check looks at this field at all.
    pub fn is_checked(&self) -> bool {
        self.is_numeric() || self.is_required()
    }
}
