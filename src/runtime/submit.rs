//! Final form submission.

use crate::core::FieldId;
use crate::error::{Result, StepformError};
use crate::inputs::FieldRegistry;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::time::Duration;

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormMethod {
    Get,
    #[default]
    Post,
}

/// Where and how the form is sent; taken from the form definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormTarget {
    pub action: String,
    #[serde(default)]
    pub method: FormMethod,
}

impl FormTarget {
    pub fn new(action: impl Into<String>, method: FormMethod) -> Self {
        Self {
            action: action.into(),
            method,
        }
    }

    /// Absolute URL for the action, joining relative actions onto `base`.
    pub fn resolve(&self, base: Option<&str>) -> Result<String> {
        if self.action.starts_with("http://") || self.action.starts_with("https://") {
            return Ok(self.action.clone());
        }
        let Some(base) = base else {
            return Err(StepformError::RelativeAction(self.action.clone()));
        };
        let base = base.trim_end_matches('/');
        let path = self.action.trim_start_matches('/');
        Ok(format!("{base}/{path}"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormEntry {
    pub name: FieldId,
    pub value: String,
}

/// Submitted field values in form order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormPayload {
    entries: Vec<FormEntry>,
}

impl FormPayload {
    pub fn from_registry(registry: &FieldRegistry) -> Self {
        let entries = registry
            .values()
            .into_iter()
            .map(|(name, value)| FormEntry { name, value })
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[FormEntry] {
        &self.entries
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.name.as_str() == name)
            .map(|entry| entry.value.as_str())
    }

    pub fn pairs(&self) -> Vec<(&str, &str)> {
        self.entries
            .iter()
            .map(|entry| (entry.name.as_str(), entry.value.as_str()))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitReceipt {
    Sent { status: u16 },
    Recorded,
}

pub trait FormSubmitter {
    fn submit(&mut self, target: &FormTarget, payload: &FormPayload) -> Result<SubmitReceipt>;
}

/// Sends the payload the way a browser form would: url-encoded body for
/// POST, query string for GET.
pub struct HttpSubmitter {
    agent: ureq::Agent,
    base_url: Option<String>,
}

impl HttpSubmitter {
    pub fn new(base_url: Option<String>) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(HTTP_TIMEOUT).build();
        Self { agent, base_url }
    }
}

impl FormSubmitter for HttpSubmitter {
    fn submit(&mut self, target: &FormTarget, payload: &FormPayload) -> Result<SubmitReceipt> {
        let url = target.resolve(self.base_url.as_deref())?;
        let pairs = payload.pairs();
        log::info!(
            "submitting {} fields via {:?} to {url}",
            pairs.len(),
            target.method
        );

        let response = match target.method {
            FormMethod::Post => self.agent.post(&url).send_form(&pairs),
            FormMethod::Get => self.agent.get(&url).query_pairs(pairs.iter().copied()).call(),
        }
        .map_err(|source| StepformError::Submit {
            action: url.clone(),
            source: Box::new(source),
        })?;

        Ok(SubmitReceipt::Sent {
            status: response.status(),
        })
    }
}

/// Writes the payload as JSON instead of sending it.
pub struct DryRunSubmitter<W: Write> {
    out: W,
}

impl<W: Write> DryRunSubmitter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> FormSubmitter for DryRunSubmitter<W> {
    fn submit(&mut self, target: &FormTarget, payload: &FormPayload) -> Result<SubmitReceipt> {
        let document = serde_json::json!({
            "action": target.action,
            "method": target.method,
            "fields": payload,
        });
        serde_json::to_writer_pretty(&mut self.out, &document)?;
        writeln!(self.out)?;
        Ok(SubmitReceipt::Recorded)
    }
}
