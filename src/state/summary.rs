use crate::core::FieldId;
use crate::core::number::{coerce_number, format_fixed};
use crate::inputs::FieldRegistry;
use indexmap::IndexMap;

#[derive(Debug, Clone, PartialEq)]
pub enum SummarySource {
    /// Copy one field as typed.
    Field(FieldId),
    /// Concatenate several fields.
    Join {
        fields: Vec<FieldId>,
        separator: String,
    },
    /// `numerator / denominator` with a fixed number of decimals. A zero
    /// denominator shows as `Infinity` or `NaN`.
    Ratio {
        numerator: FieldId,
        denominator: FieldId,
        decimals: usize,
    },
}

impl SummarySource {
    pub fn fields(&self) -> Vec<&FieldId> {
        match self {
            Self::Field(id) => vec![id],
            Self::Join { fields, .. } => fields.iter().collect(),
            Self::Ratio {
                numerator,
                denominator,
                ..
            } => vec![numerator, denominator],
        }
    }

    fn render(&self, registry: &FieldRegistry) -> String {
        let value = |id: &FieldId| registry.value(id.as_str()).unwrap_or_default();
        match self {
            Self::Field(id) => value(id),
            Self::Join { fields, separator } => fields
                .iter()
                .map(value)
                .collect::<Vec<_>>()
                .join(separator),
            Self::Ratio {
                numerator,
                denominator,
                decimals,
            } => {
                let ratio = coerce_number(&value(numerator)) / coerce_number(&value(denominator));
                format_fixed(ratio, *decimals)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummarySlot {
    pub slot: String,
    pub source: SummarySource,
}

/// Which summary slots exist and how each is filled.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SummaryPlan {
    slots: Vec<SummarySlot>,
}

impl SummaryPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slot(mut self, slot: impl Into<String>, source: SummarySource) -> Self {
        self.slots.push(SummarySlot {
            slot: slot.into(),
            source,
        });
        self
    }

    pub fn field(self, slot: impl Into<String>, id: impl Into<FieldId>) -> Self {
        self.slot(slot, SummarySource::Field(id.into()))
    }

    pub fn join<I, T>(self, slot: impl Into<String>, fields: I, separator: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<FieldId>,
    {
        self.slot(
            slot,
            SummarySource::Join {
                fields: fields.into_iter().map(Into::into).collect(),
                separator: separator.into(),
            },
        )
    }

    pub fn ratio(
        self,
        slot: impl Into<String>,
        numerator: impl Into<FieldId>,
        denominator: impl Into<FieldId>,
        decimals: usize,
    ) -> Self {
        self.slot(
            slot,
            SummarySource::Ratio {
                numerator: numerator.into(),
                denominator: denominator.into(),
                decimals,
            },
        )
    }

    pub fn slots(&self) -> &[SummarySlot] {
        &self.slots
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn build(&self, registry: &FieldRegistry) -> SummaryView {
        let entries = self
            .slots
            .iter()
            .map(|slot| (slot.slot.clone(), slot.source.render(registry)))
            .collect();
        SummaryView { entries }
    }
}

/// Read-only recap shown on the confirmation step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummaryView {
    entries: IndexMap<String, String>,
}

impl SummaryView {
    pub fn get(&self, slot: &str) -> Option<&str> {
        self.entries.get(slot).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(slot, value)| (slot.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::SummaryPlan;
    use crate::inputs::FieldRegistry;

    fn plan() -> SummaryPlan {
        SummaryPlan::new()
            .join("fullname-val", ["first_name", "last_name"], " ")
            .field("age-val", "Age")
            .ratio("Ratio_Chol-val", "Cholesterol", "HDL_Chol", 2)
    }

    fn registry(cholesterol: &str, hdl: &str) -> FieldRegistry {
        let mut registry = FieldRegistry::with_memory_inputs([
            "first_name",
            "last_name",
            "Age",
            "Cholesterol",
            "HDL_Chol",
        ]);
        registry.set_value("first_name", "Ada");
        registry.set_value("last_name", "Lovelace");
        registry.set_value("Age", "45");
        registry.set_value("Cholesterol", cholesterol);
        registry.set_value("HDL_Chol", hdl);
        registry
    }

    #[test]
    fn summary_copies_joins_and_divides() {
        let view = plan().build(&registry("200", "50"));
        assert_eq!(view.get("fullname-val"), Some("Ada Lovelace"));
        assert_eq!(view.get("age-val"), Some("45"));
        assert_eq!(view.get("Ratio_Chol-val"), Some("4.00"));
        let slots: Vec<&str> = view.iter().map(|(slot, _)| slot).collect();
        assert_eq!(slots, vec!["fullname-val", "age-val", "Ratio_Chol-val"]);
    }

    #[test]
    fn halfway_ratio_rounds_up() {
        assert_eq!(
            plan().build(&registry("225", "40")).get("Ratio_Chol-val"),
            Some("5.63")
        );
    }

    #[test]
    fn zero_denominator_shows_non_finite_text() {
        assert_eq!(
            plan().build(&registry("200", "0")).get("Ratio_Chol-val"),
            Some("Infinity")
        );
        assert_eq!(
            plan().build(&registry("0", "")).get("Ratio_Chol-val"),
            Some("NaN")
        );
    }
}
