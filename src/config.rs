use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub business_name: String,
    pub agent_name: String,
    pub max_retries: u32,
    pub session_idle_minutes: i64,
    pub session_sweep_seconds: u64,
    pub admin_token: String,
    pub twilio_account_sid: String,
    pub twilio_auth_token: String,
    pub twilio_phone_number: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: parse_var("PORT", 3000),
            business_name: env::var("BUSINESS_NAME")
                .unwrap_or_else(|_| "OnCall Agency".to_string()),
            agent_name: env::var("AGENT_NAME").unwrap_or_else(|_| "Nova".to_string()),
            max_retries: parse_var("MAX_RETRIES", 2),
            session_idle_minutes: parse_var("SESSION_IDLE_MINUTES", 5),
            session_sweep_seconds: parse_var("SESSION_SWEEP_SECONDS", 60),
            admin_token: env::var("ADMIN_TOKEN").unwrap_or_else(|_| "changeme".to_string()),
            twilio_account_sid: env::var("TWILIO_ACCOUNT_SID").unwrap_or_default(),
            twilio_auth_token: env::var("TWILIO_AUTH_TOKEN").unwrap_or_default(),
            twilio_phone_number: env::var("TWILIO_PHONE_NUMBER").unwrap_or_default(),
        }
    }

    /// SMS can only go out when the account and sending number are both known.
    pub fn sms_enabled(&self) -> bool {
        !self.twilio_account_sid.is_empty()
            && !self.twilio_auth_token.is_empty()
            && !self.twilio_phone_number.is_empty()
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, default: T) -> T {
    parse_or(env::var(key).ok().as_deref(), default)
}

fn parse_or<T: std::str::FromStr>(raw: Option<&str>, default: T) -> T {
    raw.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}
