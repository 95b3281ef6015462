use crate::state::field::FieldSpec;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Pending,
    Active,
    Done,
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct Step {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub fields: Vec<FieldSpec>,
}

impl Step {
    pub fn new(id: impl Into<String>, title: impl Into<String>, fields: Vec<FieldSpec>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            fields,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Fields a step check visits, in declaration order.
    pub fn checked_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|field| field.is_checked())
    }

    pub fn builder(id: impl Into<String>, title: impl Into<String>) -> StepBuilder {
        StepBuilder::new(id, title)
    }
}

pub struct StepBuilder {
    id: String,
    title: String,
    description: Option<String>,
    fields: Vec<FieldSpec>,
}

impl StepBuilder {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            fields: Vec::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    pub fn fields(mut self, fields: impl IntoIterator<Item = FieldSpec>) -> Self {
        self.fields.extend(fields);
        self
    }

    pub fn build(self) -> Step {
        Step {
            id: self.id,
            title: self.title,
            description: self.description,
            fields: self.fields,
        }
    }
}
