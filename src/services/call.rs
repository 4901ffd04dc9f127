use std::sync::Arc;

use chrono::Utc;

use crate::models::{DialogStep, StepDescriptor, TurnInput};
use crate::services::messaging::confirmation_text;
use crate::state::AppState;

/// Entry webhook: describes where the call currently stands without
/// consuming a turn. A first contact creates the session.
pub fn open_call(state: &Arc<AppState>, turn: &TurnInput) -> StepDescriptor {
    let now = Utc::now().naive_utc();
    state.sessions.transact(&turn.call_sid, now, |session| {
        session.record_caller(turn.caller.as_deref());
        tracing::info!(
            call_sid = %session.call_sid,
            step = session.step.as_str(),
            "entry webhook"
        );
        state.dialog.prompt(session)
    })
}

/// Turn-submission webhook: advances the call by one caller answer posted to
/// `endpoint`.
pub async fn process_turn(
    state: &Arc<AppState>,
    endpoint: &str,
    turn: &TurnInput,
) -> StepDescriptor {
    let now = Utc::now().naive_utc();

    let (descriptor, confirmation) = state.sessions.transact(&turn.call_sid, now, |session| {
        session.record_caller(turn.caller.as_deref());

        let from = session.step;
        let descriptor = state.dialog.respond(session, endpoint, turn);

        tracing::info!(
            call_sid = %session.call_sid,
            from = from.as_str(),
            to = session.step.as_str(),
            turn = session.turns,
            retries = session.retries,
            "processed turn"
        );

        let confirmed = from != DialogStep::Done
            && session.step == DialogStep::Done
            && session.consent == Some(true);
        let confirmation = if confirmed {
            session
                .caller
                .clone()
                .map(|to| (to, confirmation_text(session, &state.config.business_name)))
        } else {
            None
        };

        (descriptor, confirmation)
    });

    if let Some((to, body)) = confirmation {
        if let Err(e) = state.messaging.send_message(&to, &body).await {
            tracing::error!(error = %e, call_sid = %turn.call_sid, "failed to send confirmation SMS");
        }
    }

    descriptor
}
