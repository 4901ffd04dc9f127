use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Schedule,
    Reschedule,
    Quote,
    Confirm,
    Decline,
    Unrecognized,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Schedule => "schedule",
            Intent::Reschedule => "reschedule",
            Intent::Quote => "quote",
            Intent::Confirm => "confirm",
            Intent::Decline => "decline",
            Intent::Unrecognized => "unrecognized",
        }
    }
}
