use crate::state::field::FieldSpec;
use crate::state::step::{Step, StepStatus};

pub struct Flow {
    steps: Vec<Step>,
    current: usize,
    statuses: Vec<StepStatus>,
}

impl Flow {
    pub fn new(steps: Vec<Step>) -> Self {
        let mut statuses = vec![StepStatus::Pending; steps.len()];
        if !statuses.is_empty() {
            statuses[0] = StepStatus::Active;
        }
        Self {
            steps,
            current: 0,
            statuses,
        }
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn last_index(&self) -> Option<usize> {
        self.steps.len().checked_sub(1)
    }

    pub fn is_last(&self, index: usize) -> bool {
        self.last_index() == Some(index)
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn step_at(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    /// Every field of every step, in step then declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.steps.iter().flat_map(|step| step.fields.iter())
    }

    pub fn find_field(&self, id: &str) -> Option<&FieldSpec> {
        self.fields().find(|field| field.id.as_str() == id)
    }

    pub fn status_at(&self, index: usize) -> StepStatus {
        self.statuses
            .get(index)
            .copied()
            .unwrap_or(StepStatus::Pending)
    }

    pub fn current_status(&self) -> StepStatus {
        self.status_at(self.current)
    }

    pub fn complete_current(&mut self) {
        if let Some(status) = self.statuses.get_mut(self.current) {
            *status = StepStatus::Done;
        }
    }

    pub fn cancel_current(&mut self) {
        if let Some(status) = self.statuses.get_mut(self.current) {
            *status = StepStatus::Cancelled;
        }
    }

    pub fn has_next(&self) -> bool {
        self.current + 1 < self.steps.len()
    }

    pub fn advance(&mut self) -> bool {
        if !self.has_next() {
            return false;
        }
        self.go_to(self.current + 1)
    }

    /// Moves to `index`. Steps passed on the way forward are marked done,
    /// steps left behind on the way back return to pending.
    pub fn go_to(&mut self, index: usize) -> bool {
        if index >= self.steps.len() {
            return false;
        }
        if index > self.current {
            for status in &mut self.statuses[self.current..index] {
                *status = StepStatus::Done;
            }
        } else {
            for status in &mut self.statuses[index + 1..=self.current] {
                *status = StepStatus::Pending;
            }
        }
        self.current = index;
        self.statuses[index] = StepStatus::Active;
        true
    }
}
