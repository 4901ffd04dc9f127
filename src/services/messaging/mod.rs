pub mod twilio;

use async_trait::async_trait;

use crate::models::CallSession;

#[async_trait]
pub trait MessagingProvider: Send + Sync {
    async fn send_message(&self, to: &str, body: &str) -> anyhow::Result<()>;
}

/// Used when no SMS credentials are configured: records the text in the log.
pub struct LogOnlyProvider;

#[async_trait]
impl MessagingProvider for LogOnlyProvider {
    async fn send_message(&self, to: &str, body: &str) -> anyhow::Result<()> {
        tracing::info!(to, body, "SMS disabled, not sending");
        Ok(())
    }
}

pub fn confirmation_text(session: &CallSession, business_name: &str) -> String {
    let greeting = match &session.name {
        Some(name) => format!("Hi {name}, thanks for calling {business_name}."),
        None => format!("Thanks for calling {business_name}."),
    };
    let when = match &session.preferred_time {
        Some(time) => format!("We'll call you back {time}."),
        None => "We'll call you back soon.".to_string(),
    };
    format!("{greeting} {when} Reply STOP to opt out.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirmation_text_uses_collected_fields() {
        let mut session = CallSession::new("CA1", chrono::Utc::now().naive_utc());
        session.record_name("Jane");
        session.record_preferred_time("tomorrow at 10");
        assert_eq!(
            confirmation_text(&session, "OnCall Agency"),
            "Hi Jane, thanks for calling OnCall Agency. We'll call you back tomorrow at 10. Reply STOP to opt out."
        );
    }

    #[test]
    fn test_confirmation_text_without_fields() {
        let session = CallSession::new("CA1", chrono::Utc::now().naive_utc());
        let text = confirmation_text(&session, "OnCall Agency");
        assert!(text.starts_with("Thanks for calling OnCall Agency."));
        assert!(text.contains("soon"));
    }
}
