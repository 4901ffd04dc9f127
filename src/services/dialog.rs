use crate::config::AppConfig;
use crate::models::{
    CallSession, DialogStep, Gather, InputMode, Intent, NextAction, StepDescriptor, TurnInput,
};
use crate::services::intent::{classify, classify_with, CONSENT_RULES};

pub const ENTRY_PATH: &str = "/incoming-call";

const MENU_TIMEOUT_SECS: u32 = 5;
const SPEECH_TIMEOUT_SECS: u32 = 6;

/// The call-flow state machine. `advance` is the only place a session's step
/// or collected fields change.
#[derive(Debug, Clone)]
pub struct Dialog {
    business_name: String,
    agent_name: String,
    max_retries: u32,
}

impl Dialog {
    pub fn new(business_name: &str, agent_name: &str, max_retries: u32) -> Self {
        Self {
            business_name: business_name.to_string(),
            agent_name: agent_name.to_string(),
            max_retries,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(&config.business_name, &config.agent_name, config.max_retries)
    }

    /// Describes the session's current step without changing it.
    pub fn prompt(&self, session: &CallSession) -> StepDescriptor {
        let first_ask = session.retries == 0;

        match session.step {
            DialogStep::Entry => {
                let prompts = if session.turns == 0 && first_ask {
                    vec![
                        format!(
                            "Hi! Thanks for calling {}, this is {}.",
                            self.business_name, self.agent_name
                        ),
                        "We help businesses never miss a call, and never miss a job.".to_string(),
                        "A lot of important calls come in after hours or when business owners are busy, so I'm here to help.".to_string(),
                    ]
                } else {
                    vec![]
                };
                collect(
                    session.step,
                    prompts,
                    InputMode::Both,
                    MENU_TIMEOUT_SECS,
                    Some(1),
                    &[
                        "Press 1 to schedule a quick call back.",
                        "Press 2 to reschedule or cancel an appointment.",
                        "Press 3 if you're looking for a quote or more information.",
                        "Or just tell me what you're calling about.",
                    ],
                )
            }
            DialogStep::AwaitingName => {
                let prompts = if first_ask {
                    vec!["Great. Let's get your call back scheduled.".to_string()]
                } else {
                    vec![]
                };
                collect(
                    session.step,
                    prompts,
                    InputMode::Speech,
                    SPEECH_TIMEOUT_SECS,
                    None,
                    &["First, please tell me your name."],
                )
            }
            DialogStep::AwaitingTime => {
                let prompts = if first_ask {
                    vec![match &session.name {
                        Some(name) => format!("Thanks, {name}."),
                        None => "Thanks.".to_string(),
                    }]
                } else {
                    vec![]
                };
                collect(
                    session.step,
                    prompts,
                    InputMode::Speech,
                    SPEECH_TIMEOUT_SECS,
                    None,
                    &[
                        "What day and time works best for your call back?",
                        "For example, you can say tomorrow afternoon or Monday at 10 AM.",
                    ],
                )
            }
            DialogStep::AwaitingConsent => {
                let time = session.preferred_time.as_deref().unwrap_or("the time you chose");
                collect(
                    session.step,
                    vec![
                        format!("Great. I have you down for {time}."),
                        "We may send a confirmation text message.".to_string(),
                        "Standard messaging rates may apply.".to_string(),
                        "Do we have your permission to send that text?".to_string(),
                    ],
                    InputMode::Dtmf,
                    MENU_TIMEOUT_SECS,
                    Some(1),
                    &["Press 1 to confirm.", "Press 2 to decline."],
                )
            }
            DialogStep::RescheduleFlow => self.farewell(
                session.step,
                vec![
                    "No problem. Let's reschedule or cancel your appointment.".to_string(),
                    "In a moment, I'll ask for your name and the appointment details.".to_string(),
                ],
            ),
            DialogStep::QuoteFlow => self.farewell(
                session.step,
                vec![
                    "Perfect. Let's get you set up for a quote call back.".to_string(),
                    "In a moment, I'll ask what you need and where the job is located.".to_string(),
                ],
            ),
            DialogStep::Done => {
                let lines = match session.consent {
                    Some(true) => vec![
                        match &session.name {
                            Some(name) => format!("You're all set, {name}."),
                            None => "You're all set.".to_string(),
                        },
                        "We'll text you a confirmation and look forward to speaking with you."
                            .to_string(),
                    ],
                    Some(false) => {
                        vec!["No problem. We'll call you back without sending a text.".to_string()]
                    }
                    None => vec![
                        "Sorry, I'm having trouble understanding you.".to_string(),
                        "Please call back anytime.".to_string(),
                    ],
                };
                self.farewell(session.step, lines)
            }
        }
    }

    /// Handles an answer posted to `endpoint`. Only an answer to the prompt the
    /// session is waiting on advances it; anything else (a redelivered earlier
    /// turn, or a stale call that restarted) re-describes the current step.
    pub fn respond(
        &self,
        session: &mut CallSession,
        endpoint: &str,
        turn: &TurnInput,
    ) -> StepDescriptor {
        if session.step.is_terminal() || session.step.action_path() == Some(endpoint) {
            return self.advance(session, turn);
        }

        tracing::warn!(
            call_sid = %session.call_sid,
            step = session.step.as_str(),
            endpoint,
            "answer for another step, repeating current prompt"
        );
        self.prompt(session)
    }

    /// Applies one caller turn to the session and returns what to say next.
    /// Turns against a finished call re-describe its farewell unchanged.
    pub fn advance(&self, session: &mut CallSession, turn: &TurnInput) -> StepDescriptor {
        session.turns += 1;

        match session.step {
            DialogStep::Entry => {
                let intent = classify(&turn.digits, &turn.speech);
                tracing::debug!(call_sid = %session.call_sid, intent = intent.as_str(), "menu choice");
                match intent {
                    Intent::Schedule => self.enter(session, DialogStep::AwaitingName),
                    Intent::Reschedule => self.enter(session, DialogStep::RescheduleFlow),
                    Intent::Quote => self.enter(session, DialogStep::QuoteFlow),
                    _ => self.retry(
                        session,
                        "I'm sorry, I didn't quite catch that. Let's try again.",
                    ),
                }
            }
            DialogStep::AwaitingName => match turn.free_text() {
                "" => self.retry(session, "Sorry, I didn't catch that."),
                name => {
                    session.record_name(name);
                    self.enter(session, DialogStep::AwaitingTime)
                }
            },
            DialogStep::AwaitingTime => match turn.free_text() {
                "" => self.retry(session, "Sorry, I didn't catch the time."),
                time => {
                    session.record_preferred_time(time);
                    self.enter(session, DialogStep::AwaitingConsent)
                }
            },
            DialogStep::AwaitingConsent => {
                let intent = classify_with(CONSENT_RULES, &turn.digits, "");
                session.record_consent(intent == Intent::Confirm);
                self.enter(session, DialogStep::Done)
            }
            DialogStep::RescheduleFlow | DialogStep::QuoteFlow | DialogStep::Done => {
                self.prompt(session)
            }
        }
    }

    fn enter(&self, session: &mut CallSession, step: DialogStep) -> StepDescriptor {
        session.step = step;
        session.retries = 0;
        self.prompt(session)
    }

    fn retry(&self, session: &mut CallSession, apology: &str) -> StepDescriptor {
        if session.retries >= self.max_retries {
            tracing::info!(
                call_sid = %session.call_sid,
                step = session.step.as_str(),
                "retries exhausted, ending call"
            );
            return self.enter(session, DialogStep::Done);
        }

        session.retries += 1;

        if session.step == DialogStep::Entry {
            return StepDescriptor {
                step: session.step,
                prompts: vec![apology.to_string()],
                next: NextAction::Redirect(ENTRY_PATH.to_string()),
            };
        }

        let mut descriptor = self.prompt(session);
        descriptor.prompts.insert(0, apology.to_string());
        descriptor
    }

    fn farewell(&self, step: DialogStep, mut lines: Vec<String>) -> StepDescriptor {
        lines.push(format!("Thank you for calling {}. Goodbye.", self.business_name));
        StepDescriptor {
            step,
            prompts: lines,
            next: NextAction::Hangup,
        }
    }
}

fn collect(
    step: DialogStep,
    prompts: Vec<String>,
    mode: InputMode,
    timeout_secs: u32,
    num_digits: Option<u32>,
    asks: &[&str],
) -> StepDescriptor {
    let action = step.action_path().unwrap_or(ENTRY_PATH).to_string();
    StepDescriptor {
        step,
        prompts,
        next: NextAction::Collect(Gather {
            mode,
            timeout_secs,
            num_digits,
            action,
            prompts: asks.iter().map(|s| s.to_string()).collect(),
        }),
    }
}
