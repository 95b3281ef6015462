//! Form definitions loaded from YAML.

use crate::core::FieldId;
use crate::error::{Result, StepformError};
use crate::notify::ToastConfig;
use crate::runtime::submit::FormTarget;
use crate::state::field::{FieldKind, FieldSpec, NumberRange};
use crate::state::flow::Flow;
use crate::state::step::Step;
use crate::state::summary::{SummaryPlan, SummarySource};
use crate::state::validation::ValidationPolicy;
use crate::state::wizard::FormParts;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// The registration form shipped with the crate.
pub const BUNDLED_REGISTRATION: &str = include_str!("../forms/registration.yaml");

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormConfig {
    pub form: FormTarget,
    #[serde(default)]
    pub policy: ValidationPolicy,
    #[serde(default)]
    pub toast: ToastConfig,
    pub steps: Vec<StepConfig>,
    #[serde(default)]
    pub summary: Vec<SummarySlotConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepConfig {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldConfig {
    pub id: String,
    /// Name used in toasts; defaults to the id.
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub kind: FieldKind,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarySlotConfig {
    pub slot: String,
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub join: Option<JoinConfig>,
    #[serde(default)]
    pub ratio: Option<RatioConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinConfig {
    pub fields: Vec<String>,
    #[serde(default = "default_separator")]
    pub separator: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatioConfig {
    pub numerator: String,
    pub denominator: String,
    #[serde(default = "default_decimals")]
    pub decimals: usize,
}

fn default_separator() -> String {
    " ".to_string()
}

fn default_decimals() -> usize {
    2
}

impl FormConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| StepformError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml_str(&content)?;
        log::debug!(
            "loaded form definition {} with {} steps",
            path.display(),
            config.steps.len()
        );
        Ok(config)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn bundled() -> Result<Self> {
        Self::from_yaml_str(BUNDLED_REGISTRATION)
    }

    /// Field ids in declaration order.
    pub fn field_ids(&self) -> Vec<FieldId> {
        self.steps
            .iter()
            .flat_map(|step| step.fields.iter())
            .map(|field| FieldId::new(field.id.as_str()))
            .collect()
    }

    /// Checks ids and builds the runtime pieces of the form.
    pub fn into_parts(self) -> Result<FormParts> {
        if self.steps.is_empty() {
            return Err(StepformError::EmptyFlow);
        }

        let mut seen = HashSet::new();
        for id in self.field_ids() {
            if !seen.insert(id.clone()) {
                return Err(StepformError::DuplicateField(id));
            }
        }

        let summary = self
            .summary
            .into_iter()
            .try_fold(SummaryPlan::new(), |plan, slot| {
                let source = slot.source()?;
                if let Some(unknown) = source.fields().into_iter().find(|id| !seen.contains(*id)) {
                    return Err(StepformError::UnknownSummaryField {
                        slot: slot.slot.clone(),
                        field: unknown.clone(),
                    });
                }
                Ok(plan.slot(slot.slot, source))
            })?;

        let steps = self.steps.into_iter().map(StepConfig::into_step).collect();

        Ok(FormParts {
            flow: Flow::new(steps),
            summary,
            toast: self.toast,
            target: self.form,
            policy: self.policy,
        })
    }
}

impl StepConfig {
    fn into_step(self) -> Step {
        let fields = self.fields.into_iter().map(FieldConfig::into_spec).collect();
        let step = Step::new(self.id, self.title, fields);
        match self.description {
            Some(description) => step.with_description(description),
            None => step,
        }
    }
}

impl FieldConfig {
    fn into_spec(self) -> FieldSpec {
        let label = self.label.unwrap_or_else(|| self.id.clone());
        let spec = match self.kind {
            FieldKind::Text => FieldSpec::text(self.id, label),
            FieldKind::RequiredSelect => FieldSpec::select(self.id, label),
            FieldKind::BoundedNumber => {
                FieldSpec::number(self.id, label, NumberRange::new(self.min, self.max))
            }
        };
        if spec.kind != FieldKind::BoundedNumber && (self.min.is_some() || self.max.is_some()) {
            log::warn!("field `{}` is not numeric; min/max ignored", spec.id);
        }
        if self.required { spec.required() } else { spec }
    }
}

impl SummarySlotConfig {
    fn source(&self) -> Result<SummarySource> {
        match (&self.field, &self.join, &self.ratio) {
            (Some(field), None, None) => Ok(SummarySource::Field(FieldId::new(field.as_str()))),
            (None, Some(join), None) => Ok(SummarySource::Join {
                fields: join.fields.iter().map(FieldId::from).collect(),
                separator: join.separator.clone(),
            }),
            (None, None, Some(ratio)) => Ok(SummarySource::Ratio {
                numerator: FieldId::new(ratio.numerator.as_str()),
                denominator: FieldId::new(ratio.denominator.as_str()),
                decimals: ratio.decimals,
            }),
            _ => Err(StepformError::InvalidSummarySlot(self.slot.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::FormConfig;
    use crate::error::StepformError;
    use crate::runtime::submit::FormMethod;
    use crate::state::field::FieldKind;
    use crate::state::validation::ValidationPolicy;

    const MINIMAL: &str = r#"
form:
  action: /submit
steps:
  - id: personal
    title: Personal
    fields:
      - { id: first_name, label: First Name, required: true }
      - { id: Age, kind: bounded-number, min: 18, max: 99 }
summary:
  - { slot: age-val, field: Age }
"#;

    #[test]
    fn minimal_definition_uses_defaults() {
        let config = FormConfig::from_yaml_str(MINIMAL).expect("minimal form");
        assert_eq!(config.form.method, FormMethod::Post);
        assert_eq!(config.policy, ValidationPolicy::FirstFailure);
        assert_eq!(config.toast.timeout_ms, 5_000);

        let parts = config.into_parts().expect("parts");
        let age = parts.flow.find_field("Age").expect("age field");
        assert_eq!(age.kind, FieldKind::BoundedNumber);
        assert_eq!(age.label, "Age");
        assert_eq!(age.range.min, Some(18.0));
        assert!(parts.flow.find_field("first_name").expect("name").is_required());
        assert_eq!(parts.summary.slots().len(), 1);
    }

    #[test]
    fn duplicate_field_ids_are_rejected() {
        let yaml = MINIMAL.replace("id: Age", "id: first_name");
        let err = FormConfig::from_yaml_str(&yaml)
            .expect("parses")
            .into_parts()
            .err()
            .expect("duplicate");
        assert!(matches!(err, StepformError::DuplicateField(id) if id.as_str() == "first_name"));
    }

    #[test]
    fn summary_must_reference_known_fields() {
        let yaml = MINIMAL.replace("field: Age", "field: Weight");
        let err = FormConfig::from_yaml_str(&yaml)
            .expect("parses")
            .into_parts()
            .err()
            .expect("unknown field");
        assert!(matches!(err, StepformError::UnknownSummaryField { .. }));

        let ambiguous = MINIMAL.replace(
            "field: Age }",
            "field: Age, ratio: { numerator: Age, denominator: Age } }",
        );
        let err = FormConfig::from_yaml_str(&ambiguous)
            .expect("parses")
            .into_parts()
            .err()
            .expect("ambiguous slot");
        assert!(matches!(err, StepformError::InvalidSummarySlot(slot) if slot == "age-val"));
    }

    #[test]
    fn bundled_registration_form_is_valid() {
        let config = FormConfig::bundled().expect("bundled form parses");
        let parts = config.into_parts().expect("bundled form is consistent");
        assert!(parts.flow.len() >= 2);
        assert!(parts.flow.find_field("Cholesterol").is_some());
        assert!(parts.flow.find_field("HDL_Chol").is_some());
        assert!(
            parts
                .summary
                .slots()
                .iter()
                .any(|slot| slot.slot == "Ratio_Chol-val")
        );
        let last = parts.flow.last_index().expect("steps");
        assert!(parts.flow.step_at(last).expect("last").fields().is_empty());
    }

    #[test]
    fn malformed_yaml_is_a_parse_error() {
        let err = FormConfig::from_yaml_str("steps: [").expect_err("broken yaml");
        assert!(matches!(err, StepformError::Parse(_)));
    }
}
