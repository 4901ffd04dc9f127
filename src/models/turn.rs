/// One webhook invocation's payload, reduced to the fields the dialog reads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TurnInput {
    pub call_sid: String,
    pub caller: Option<String>,
    pub digits: String,
    pub speech: String,
}

impl TurnInput {
    /// Builds a turn from provider form fields. The call identifier falls back
    /// to the caller number, then to a generated id, so a turn always has one.
    pub fn from_params(params: &[(String, String)]) -> Self {
        let field = |name: &str| {
            params
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let caller = field("From");
        let call_sid = field("CallSid")
            .or_else(|| caller.clone())
            .unwrap_or_else(|| {
                let generated = format!("anon-{}", uuid::Uuid::new_v4());
                tracing::warn!(call_sid = %generated, "webhook without CallSid or From");
                generated
            });

        Self {
            call_sid,
            caller,
            digits: field("Digits").unwrap_or_default(),
            speech: field("SpeechResult").unwrap_or_default(),
        }
    }

    pub fn digits(call_sid: &str, digits: &str) -> Self {
        Self {
            call_sid: call_sid.to_string(),
            digits: digits.to_string(),
            ..Self::default()
        }
    }

    pub fn speech(call_sid: &str, speech: &str) -> Self {
        Self {
            call_sid: call_sid.to_string(),
            speech: speech.to_string(),
            ..Self::default()
        }
    }

    /// Transcribed speech, the only source of free text.
    pub fn free_text(&self) -> &str {
        self.speech.trim()
    }
}
