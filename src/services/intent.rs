use crate::models::Intent;

pub struct IntentRule {
    pub intent: Intent,
    pub digit: &'static str,
    pub keywords: &'static [&'static str],
}

/// Main menu choices.
pub const MENU_RULES: &[IntentRule] = &[
    IntentRule {
        intent: Intent::Schedule,
        digit: "1",
        keywords: &["schedule", "book"],
    },
    IntentRule {
        intent: Intent::Reschedule,
        digit: "2",
        keywords: &["reschedule", "cancel"],
    },
    IntentRule {
        intent: Intent::Quote,
        digit: "3",
        keywords: &["quote", "price", "cost"],
    },
];

/// Answers to the SMS consent question (keypad only).
pub const CONSENT_RULES: &[IntentRule] = &[
    IntentRule {
        intent: Intent::Confirm,
        digit: "1",
        keywords: &[],
    },
    IntentRule {
        intent: Intent::Decline,
        digit: "2",
        keywords: &[],
    },
];

pub fn classify(digit: &str, speech: &str) -> Intent {
    classify_with(MENU_RULES, digit, speech)
}

/// A keypad match always wins over speech. Among speech matches the longest
/// keyword wins, so "reschedule" is not read as "schedule".
pub fn classify_with(rules: &[IntentRule], digit: &str, speech: &str) -> Intent {
    let digit = digit.trim();
    if !digit.is_empty() {
        if let Some(rule) = rules.iter().find(|r| r.digit == digit) {
            return rule.intent;
        }
    }

    let speech = speech.to_lowercase();
    if speech.trim().is_empty() {
        return Intent::Unrecognized;
    }

    rules
        .iter()
        .flat_map(|rule| rule.keywords.iter().map(move |kw| (rule.intent, *kw)))
        .filter(|(_, kw)| speech.contains(kw))
        .max_by_key(|(_, kw)| kw.len())
        .map(|(intent, _)| intent)
        .unwrap_or(Intent::Unrecognized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digits_map_to_menu() {
        assert_eq!(classify("1", ""), Intent::Schedule);
        assert_eq!(classify("2", ""), Intent::Reschedule);
        assert_eq!(classify("3", ""), Intent::Quote);
    }

    #[test]
    fn test_digit_beats_speech() {
        assert_eq!(classify("1", "cancel"), Intent::Schedule);
        assert_eq!(classify("3", "book me in"), Intent::Quote);
    }

    #[test]
    fn test_speech_keywords_case_insensitive() {
        assert_eq!(classify("", "I'd like to BOOK a call"), Intent::Schedule);
        assert_eq!(classify("", "I need a price"), Intent::Quote);
        assert_eq!(classify("", "How much does it Cost?"), Intent::Quote);
        assert_eq!(classify("", "Please cancel my appointment"), Intent::Reschedule);
    }

    #[test]
    fn test_reschedule_not_mistaken_for_schedule() {
        assert_eq!(classify("", "I need to reschedule"), Intent::Reschedule);
    }

    #[test]
    fn test_unmatched_digit_falls_through_to_speech() {
        assert_eq!(classify("9", "get a quote"), Intent::Quote);
        assert_eq!(classify("9", ""), Intent::Unrecognized);
    }

    #[test]
    fn test_unrecognized() {
        assert_eq!(classify("", ""), Intent::Unrecognized);
        assert_eq!(classify("", "hello there"), Intent::Unrecognized);
        assert_eq!(classify("  ", "   "), Intent::Unrecognized);
    }

    #[test]
    fn test_consent_rules() {
        assert_eq!(classify_with(CONSENT_RULES, "1", ""), Intent::Confirm);
        assert_eq!(classify_with(CONSENT_RULES, "2", ""), Intent::Decline);
        assert_eq!(classify_with(CONSENT_RULES, "7", "yes"), Intent::Unrecognized);
    }
}
