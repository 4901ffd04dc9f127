use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DialogStep {
    Entry,
    AwaitingName,
    AwaitingTime,
    AwaitingConsent,
    RescheduleFlow,
    QuoteFlow,
    Done,
}

impl DialogStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            DialogStep::Entry => "entry",
            DialogStep::AwaitingName => "awaiting_name",
            DialogStep::AwaitingTime => "awaiting_time",
            DialogStep::AwaitingConsent => "awaiting_consent",
            DialogStep::RescheduleFlow => "reschedule_flow",
            DialogStep::QuoteFlow => "quote_flow",
            DialogStep::Done => "done",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            DialogStep::RescheduleFlow | DialogStep::QuoteFlow | DialogStep::Done
        )
    }

    /// Endpoint the provider posts the caller's answer to while in this step.
    pub fn action_path(&self) -> Option<&'static str> {
        match self {
            DialogStep::Entry => Some("/handle-input"),
            DialogStep::AwaitingName => Some("/schedule-name"),
            DialogStep::AwaitingTime => Some("/schedule-time"),
            DialogStep::AwaitingConsent => Some("/schedule-confirm"),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CallSession {
    pub call_sid: String,
    pub caller: Option<String>,
    pub step: DialogStep,
    pub name: Option<String>,
    pub preferred_time: Option<String>,
    pub consent: Option<bool>,
    /// Consecutive unrecognized or empty turns at the current step.
    pub retries: u32,
    pub turns: u32,
    pub last_activity: NaiveDateTime,
    pub expires_at: NaiveDateTime,
}

impl CallSession {
    pub fn new(call_sid: &str, now: NaiveDateTime) -> Self {
        Self {
            call_sid: call_sid.to_string(),
            caller: None,
            step: DialogStep::Entry,
            name: None,
            preferred_time: None,
            consent: None,
            retries: 0,
            turns: 0,
            last_activity: now,
            expires_at: now,
        }
    }

    pub fn record_name(&mut self, name: &str) {
        set_non_empty(&mut self.name, name);
    }

    pub fn record_preferred_time(&mut self, time: &str) {
        set_non_empty(&mut self.preferred_time, time);
    }

    pub fn record_caller(&mut self, caller: Option<&str>) {
        if let Some(caller) = caller {
            set_non_empty(&mut self.caller, caller);
        }
    }

    pub fn record_consent(&mut self, consent: bool) {
        self.consent = Some(consent);
    }
}

// Collected fields are never cleared by a blank answer.
fn set_non_empty(field: &mut Option<String>, value: &str) {
    let value = value.trim();
    if !value.is_empty() {
        *field = Some(value.to_string());
    }
}
