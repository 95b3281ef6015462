//! The step-change controller a wizard host calls into.

use crate::error::{Result, StepformError};
use crate::inputs::FieldRegistry;
use crate::notify::{ToastConfig, ToastQueue};
use crate::runtime::submit::{FormPayload, FormSubmitter, FormTarget, SubmitReceipt};
use crate::state::flow::Flow;
use crate::state::summary::{SummaryPlan, SummaryView};
use crate::state::validation::{self, StepResult, ValidationPolicy};
use std::time::Instant;

/// Everything a form definition provides, before handles are bound.
pub struct FormParts {
    pub flow: Flow,
    pub summary: SummaryPlan,
    pub toast: ToastConfig,
    pub target: FormTarget,
    pub policy: ValidationPolicy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinishOutcome {
    /// The final step failed its check; nothing was sent.
    Blocked,
    Submitted(SubmitReceipt),
}

pub struct StepValidator {
    flow: Flow,
    registry: FieldRegistry,
    toasts: ToastQueue,
    summary_plan: SummaryPlan,
    summary: SummaryView,
    target: FormTarget,
    submitter: Box<dyn FormSubmitter>,
    policy: ValidationPolicy,
}

impl StepValidator {
    /// Fails when the flow is empty or a declared field has no handle in
    /// `registry`.
    pub fn new(
        parts: FormParts,
        registry: FieldRegistry,
        submitter: Box<dyn FormSubmitter>,
    ) -> Result<Self> {
        if parts.flow.is_empty() {
            return Err(StepformError::EmptyFlow);
        }
        if let Some(field) = parts
            .flow
            .fields()
            .find(|field| !registry.contains(field.id.as_str()))
        {
            return Err(StepformError::UnboundField(field.id.clone()));
        }

        Ok(Self {
            flow: parts.flow,
            registry,
            toasts: ToastQueue::new(parts.toast),
            summary_plan: parts.summary,
            summary: SummaryView::default(),
            target: parts.target,
            submitter,
            policy: parts.policy,
        })
    }

    /// Checks the required and numeric fields of `step_index`, marks their
    /// handles and raises one toast per reported issue. An index outside
    /// the flow has no fields and passes.
    pub fn validate_step(&mut self, step_index: usize) -> StepResult {
        let Some(step) = self.flow.step_at(step_index) else {
            log::debug!("no step at index {step_index}; nothing to check");
            return Ok(());
        };

        let result = validation::validate_fields(step.checked_fields(), &mut self.registry, self.policy);
        match &result {
            Ok(()) => log::debug!("step `{}` passed", step.id),
            Err(failure) => {
                log::debug!("step `{}` failed: {failure}", step.id);
                let now = Instant::now();
                for issue in failure.issues() {
                    self.toasts.push(issue.message(), now);
                }
            }
        }
        result
    }

    /// Host hook run before the wizard moves from `current` to `new`.
    /// Returns whether the move may happen.
    pub fn on_step_changing(&mut self, current: usize, new: usize) -> bool {
        let len = self.flow.len();
        if current >= len || new >= len {
            log::warn!("refused step change {current} -> {new}: flow has {len} steps");
            return false;
        }
        if current != self.flow.current_index() {
            log::debug!(
                "host reports step {current}, flow was at {}",
                self.flow.current_index()
            );
        }

        if new <= current {
            self.flow.go_to(new);
            return true;
        }

        if self.validate_step(current).is_err() {
            return false;
        }

        if self.flow.is_last(new) {
            self.rebuild_summary();
        }
        self.flow.go_to(new);
        true
    }

    /// Host hook run when the user confirms the final step. Checks that
    /// step, then sends every bound field to the form target. Any other
    /// index is refused without checking or sending.
    pub fn on_finished(&mut self, current: usize) -> Result<FinishOutcome> {
        if current >= self.flow.len() {
            return Err(StepformError::StepOutOfRange {
                index: current,
                len: self.flow.len(),
            });
        }
        if !self.flow.is_last(current) {
            return Err(StepformError::NotFinalStep {
                index: current,
                last: self.flow.len() - 1,
            });
        }
        if self.validate_step(current).is_err() {
            return Ok(FinishOutcome::Blocked);
        }

        let payload = FormPayload::from_registry(&self.registry);
        let receipt = self.submitter.submit(&self.target, &payload)?;
        log::info!(
            "form submitted to {} ({} fields): {receipt:?}",
            self.target.action,
            payload.entries().len()
        );
        self.flow.complete_current();
        Ok(FinishOutcome::Submitted(receipt))
    }

    pub fn rebuild_summary(&mut self) -> &SummaryView {
        self.summary = self.summary_plan.build(&self.registry);
        log::debug!("summary rebuilt with {} slots", self.summary.len());
        &self.summary
    }

    pub fn summary(&self) -> &SummaryView {
        &self.summary
    }

    pub fn flow(&self) -> &Flow {
        &self.flow
    }

    pub fn flow_mut(&mut self) -> &mut Flow {
        &mut self.flow
    }

    pub fn registry(&self) -> &FieldRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut FieldRegistry {
        &mut self.registry
    }

    pub fn toasts(&self) -> &ToastQueue {
        &self.toasts
    }

    pub fn toasts_mut(&mut self) -> &mut ToastQueue {
        &mut self.toasts
    }

    pub fn target(&self) -> &FormTarget {
        &self.target
    }

    pub fn policy(&self) -> ValidationPolicy {
        self.policy
    }
}

#[cfg(test)]
mod tests {
    use super::{FinishOutcome, FormParts, StepValidator};
    use crate::error::{Result, StepformError};
    use crate::inputs::FieldRegistry;
    use crate::notify::ToastConfig;
    use crate::runtime::submit::{
        FormMethod, FormPayload, FormSubmitter, FormTarget, SubmitReceipt,
    };
    use crate::state::field::{FieldSpec, NumberRange};
    use crate::state::flow::Flow;
    use crate::state::step::{Step, StepStatus};
    use crate::state::summary::SummaryPlan;
    use crate::state::validation::ValidationPolicy;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct CountingSubmitter {
        sent: Rc<RefCell<Vec<FormPayload>>>,
    }

    impl FormSubmitter for CountingSubmitter {
        fn submit(&mut self, _target: &FormTarget, payload: &FormPayload) -> Result<SubmitReceipt> {
            self.sent.borrow_mut().push(payload.clone());
            Ok(SubmitReceipt::Recorded)
        }
    }

    fn parts(policy: ValidationPolicy) -> FormParts {
        let flow = Flow::new(vec![
            Step::builder("personal", "Personal")
                .field(FieldSpec::text("first_name", "First Name").required())
                .field(FieldSpec::select("Gender", "Gender"))
                .field(FieldSpec::number("Age", "Age", NumberRange::between(18.0, 99.0)).required())
                .build(),
            Step::builder("labs", "Lab results")
                .field(FieldSpec::number(
                    "Cholesterol",
                    "Cholesterol",
                    NumberRange::between(0.0, 500.0),
                ))
                .field(FieldSpec::number(
                    "HDL_Chol",
                    "HDL Cholesterol",
                    NumberRange::new(Some(0.0), None),
                ))
                .build(),
            Step::builder("confirm", "Confirm")
                .field(FieldSpec::text("consent", "Consent").required())
                .build(),
        ]);
        FormParts {
            flow,
            summary: SummaryPlan::new()
                .field("first-val", "first_name")
                .ratio("Ratio_Chol-val", "Cholesterol", "HDL_Chol", 2),
            toast: ToastConfig::default(),
            target: FormTarget::new("/", FormMethod::Post),
            policy,
        }
    }

    fn wizard_with(policy: ValidationPolicy) -> (StepValidator, CountingSubmitter) {
        let submitter = CountingSubmitter::default();
        let registry = FieldRegistry::with_memory_inputs([
            "first_name",
            "Gender",
            "Age",
            "Cholesterol",
            "HDL_Chol",
            "consent",
        ]);
        let wizard = StepValidator::new(parts(policy), registry, Box::new(submitter.clone()))
            .expect("wizard");
        (wizard, submitter)
    }

    fn wizard() -> (StepValidator, CountingSubmitter) {
        wizard_with(ValidationPolicy::FirstFailure)
    }

    fn fill(wizard: &mut StepValidator, values: &[(&str, &str)]) {
        for (id, value) in values {
            assert!(wizard.registry_mut().set_value(id, value), "unknown field {id}");
        }
    }

    #[test]
    fn missing_handle_is_rejected() {
        let registry = FieldRegistry::with_memory_inputs(["first_name"]);
        let err = StepValidator::new(
            parts(ValidationPolicy::FirstFailure),
            registry,
            Box::new(CountingSubmitter::default()),
        )
        .err()
        .expect("unbound field");
        assert!(matches!(err, StepformError::UnboundField(id) if id.as_str() == "Gender"));
    }

    #[test]
    fn empty_required_field_blocks_with_toast() {
        let (mut wizard, _) = wizard();
        fill(&mut wizard, &[("Gender", "Female"), ("Age", "45")]);

        assert!(!wizard.on_step_changing(0, 1));
        assert_eq!(wizard.flow().current_index(), 0);
        assert_eq!(wizard.toasts().len(), 1);
        assert_eq!(
            wizard.toasts().visible()[0].message.plain_text(),
            "First Name is required."
        );
        assert!(wizard.registry().is_invalid("first_name"));
    }

    #[test]
    fn age_scenario_fails_then_passes() {
        let (mut wizard, _) = wizard();
        fill(&mut wizard, &[("first_name", "Ada"), ("Gender", "Female"), ("Age", "15")]);

        let failure = wizard.validate_step(0).expect_err("age 15 is out of range");
        assert_eq!(failure.first().field.as_str(), "Age");
        assert_eq!(
            wizard.toasts().visible()[0].message.plain_text(),
            "Age:\nValue must be between 18 and 99"
        );

        fill(&mut wizard, &[("Age", "45")]);
        assert!(wizard.validate_step(0).is_ok());
        assert!(!wizard.registry().is_invalid("Age"));
    }

    #[test]
    fn two_invalid_fields_raise_one_toast() {
        let (mut wizard, _) = wizard();
        fill(&mut wizard, &[("Age", "200")]);
        assert!(!wizard.on_step_changing(0, 1));
        assert_eq!(wizard.toasts().len(), 1);
        assert!(!wizard.registry().is_invalid("Age"));
    }

    #[test]
    fn report_all_raises_a_toast_per_field() {
        let (mut wizard, _) = wizard_with(ValidationPolicy::ReportAll);
        fill(&mut wizard, &[("Age", "200")]);
        assert!(!wizard.on_step_changing(0, 1));
        assert_eq!(wizard.toasts().len(), 3);
        assert_eq!(wizard.registry().invalid_ids().len(), 3);
    }

    #[test]
    fn other_steps_are_not_checked() {
        let (mut wizard, _) = wizard();
        fill(&mut wizard, &[("first_name", "Ada"), ("Gender", "Male"), ("Age", "30")]);
        assert!(wizard.on_step_changing(0, 1));
        assert_eq!(wizard.flow().current_index(), 1);
        assert_eq!(wizard.flow().status_at(0), StepStatus::Done);
        assert!(!wizard.registry().is_invalid("Cholesterol"));
        assert!(wizard.toasts().is_empty());
    }

    #[test]
    fn backward_moves_skip_checks() {
        let (mut wizard, _) = wizard();
        fill(&mut wizard, &[("first_name", "Ada"), ("Gender", "Male"), ("Age", "30")]);
        assert!(wizard.on_step_changing(0, 1));
        assert!(wizard.on_step_changing(1, 0));
        assert_eq!(wizard.flow().current_index(), 0);
        assert!(wizard.toasts().is_empty());
    }

    #[test]
    fn out_of_range_moves_are_refused() {
        let (mut wizard, _) = wizard();
        assert!(!wizard.on_step_changing(0, 3));
        assert!(!wizard.on_step_changing(7, 1));
        assert!(wizard.validate_step(9).is_ok());
    }

    #[test]
    fn entering_last_step_builds_summary() {
        let (mut wizard, _) = wizard();
        fill(
            &mut wizard,
            &[
                ("first_name", "Ada"),
                ("Gender", "Female"),
                ("Age", "36"),
                ("Cholesterol", "200"),
                ("HDL_Chol", "50"),
            ],
        );
        assert!(wizard.on_step_changing(0, 1));
        assert!(wizard.summary().is_empty());
        assert!(wizard.on_step_changing(1, 2));
        assert_eq!(wizard.summary().get("Ratio_Chol-val"), Some("4.00"));
        assert_eq!(wizard.summary().get("first-val"), Some("Ada"));

        // Re-entering the last step overwrites the summary.
        assert!(wizard.on_step_changing(2, 1));
        fill(&mut wizard, &[("HDL_Chol", "0")]);
        assert!(wizard.on_step_changing(1, 2));
        assert_eq!(wizard.summary().get("Ratio_Chol-val"), Some("Infinity"));
    }

    #[test]
    fn valid_last_step_submits_once() {
        let (mut wizard, submitter) = wizard();
        fill(
            &mut wizard,
            &[
                ("first_name", "Ada"),
                ("Gender", "Female"),
                ("Age", "36"),
                ("Cholesterol", "200"),
                ("HDL_Chol", "50"),
                ("consent", "yes"),
            ],
        );
        assert!(wizard.on_step_changing(0, 1));
        assert!(wizard.on_step_changing(1, 2));

        let outcome = wizard.on_finished(2).expect("submission");
        assert_eq!(outcome, FinishOutcome::Submitted(SubmitReceipt::Recorded));
        assert_eq!(wizard.flow().status_at(2), StepStatus::Done);

        let sent = submitter.sent.borrow();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].get("Age"), Some("36"));
        assert_eq!(sent[0].entries().len(), 6);
    }

    #[test]
    fn invalid_last_step_is_not_submitted() {
        let (mut wizard, submitter) = wizard();
        wizard.flow_mut().go_to(2);
        let outcome = wizard.on_finished(2).expect("finish hook");
        assert_eq!(outcome, FinishOutcome::Blocked);
        assert!(submitter.sent.borrow().is_empty());
        assert!(wizard.registry().is_invalid("consent"));
        assert!(matches!(
            wizard.on_finished(5),
            Err(StepformError::StepOutOfRange { index: 5, len: 3 })
        ));
    }

    #[test]
    fn finishing_before_the_last_step_is_refused() {
        let (mut wizard, submitter) = wizard();
        fill(&mut wizard, &[("first_name", "Ada"), ("Gender", "Female"), ("Age", "36")]);

        assert!(matches!(
            wizard.on_finished(0),
            Err(StepformError::NotFinalStep { index: 0, last: 2 })
        ));
        assert!(submitter.sent.borrow().is_empty());
        assert!(wizard.toasts().is_empty());
        assert!(!wizard.registry().is_invalid("consent"));
    }
}
