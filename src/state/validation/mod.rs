//! Per-step field checks.
//!
//! A step check walks the step's required and numeric fields in order and
//! stops at the first failing one unless [`ValidationPolicy::ReportAll`] is
//! selected. Failing fields are marked invalid on their handle; passing
//! fields have any earlier marking cleared.

use crate::core::FieldId;
use crate::core::number::{format_number, parse_float_prefix};
use crate::inputs::FieldRegistry;
use crate::notify::ToastMessage;
use crate::state::field::{FieldSpec, NumberRange};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationPolicy {
    /// Stop at the first failing field and report only that one.
    #[default]
    FirstFailure,
    /// Check every field and report each failure.
    ReportAll,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldErrorKind {
    MissingRequiredValue,
    /// Not a number, or outside the allowed range.
    NumberOutOfRange { range: NumberRange },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidationIssue {
    pub field: FieldId,
    pub label: String,
    pub kind: FieldErrorKind,
}

impl ValidationIssue {
    pub fn new(field: &FieldSpec, kind: FieldErrorKind) -> Self {
        Self {
            field: field.id.clone(),
            label: display_label(field),
            kind,
        }
    }

    /// The toast shown for this issue.
    pub fn message(&self) -> ToastMessage {
        match self.kind {
            FieldErrorKind::MissingRequiredValue => ToastMessage::new()
                .field_name(self.label.as_str())
                .text(" is required."),
            FieldErrorKind::NumberOutOfRange { range } => {
                let message = ToastMessage::new()
                    .field_name(format!("{}:", self.label))
                    .line_break();
                match (range.min, range.max) {
                    (Some(min), Some(max)) => message
                        .text("Value must be between ")
                        .value(format_number(min))
                        .text(" and ")
                        .value(format_number(max)),
                    (Some(min), None) => message
                        .text("Value must be at least ")
                        .value(format_number(min)),
                    (None, Some(max)) => message
                        .text("Value must be at most ")
                        .value(format_number(max)),
                    (None, None) => message.text("Value must be a number"),
                }
            }
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            FieldErrorKind::MissingRequiredValue => write!(f, "{} is required", self.label),
            FieldErrorKind::NumberOutOfRange { range } => {
                write!(f, "{}: value must be {}", self.label, range.describe())
            }
        }
    }
}

/// A failed step check; never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct StepFailure {
    issues: Vec<ValidationIssue>,
}

impl StepFailure {
    fn new(issues: Vec<ValidationIssue>) -> Option<Self> {
        (!issues.is_empty()).then_some(Self { issues })
    }

    pub fn first(&self) -> &ValidationIssue {
        &self.issues[0]
    }

    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }
}

impl fmt::Display for StepFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, issue) in self.issues.iter().enumerate() {
            if idx > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

pub type StepResult = Result<(), StepFailure>;

/// Checks one raw value against a field definition.
pub fn check_field(field: &FieldSpec, raw: &str) -> Result<(), FieldErrorKind> {
    if field.is_numeric() {
        let in_range = parse_float_prefix(raw).is_some_and(|value| field.range.contains(value));
        if !in_range {
            return Err(FieldErrorKind::NumberOutOfRange { range: field.range });
        }
    } else if field.is_required() && raw.is_empty() {
        return Err(FieldErrorKind::MissingRequiredValue);
    }
    Ok(())
}

/// Checks `fields` against the values held by `registry`, marking handles
/// as it goes. Fields that are neither required nor numeric are skipped.
pub fn validate_fields<'a>(
    fields: impl IntoIterator<Item = &'a FieldSpec>,
    registry: &mut FieldRegistry,
    policy: ValidationPolicy,
) -> StepResult {
    let mut issues = Vec::new();

    for field in fields.into_iter().filter(|field| field.is_checked()) {
        let raw = registry.value(field.id.as_str()).unwrap_or_default();
        match check_field(field, &raw) {
            Ok(()) => registry.set_invalid(field.id.as_str(), false),
            Err(kind) => {
                registry.set_invalid(field.id.as_str(), true);
                issues.push(ValidationIssue::new(field, kind));
                if policy == ValidationPolicy::FirstFailure {
                    break;
                }
            }
        }
    }

    match StepFailure::new(issues) {
        Some(failure) => Err(failure),
        None => Ok(()),
    }
}

fn display_label(field: &FieldSpec) -> String {
    if field.label.is_empty() {
        field.id.to_string()
    } else {
        field.label.clone()
    }
}
