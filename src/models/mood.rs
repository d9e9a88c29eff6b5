use serde::{Deserialize, Serialize};
use validator::Validate;

/// Coarse emotional tone of a single user message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Positive,
    Neutral,
    Negative,
    Frustrated,
    Stressed,
    Curious,
}

impl Mood {
    /// German label used when the mood is rendered into a coach prompt
    pub fn label(&self) -> &'static str {
        match self {
            Mood::Positive => "positiv",
            Mood::Neutral => "neutral",
            Mood::Negative => "niedergeschlagen",
            Mood::Frustrated => "frustriert",
            Mood::Stressed => "gestresst",
            Mood::Curious => "neugierig",
        }
    }
}

impl std::fmt::Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Mood::Positive => "positive",
            Mood::Neutral => "neutral",
            Mood::Negative => "negative",
            Mood::Frustrated => "frustrated",
            Mood::Stressed => "stressed",
            Mood::Curious => "curious",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MoodResult {
    pub mood: Mood,
    /// Relative strength of the signal, 0..=1. Not a calibrated probability.
    pub confidence: f64,
    pub indicators: Vec<String>,
    /// 1..=10
    pub intensity_score: u8,
}

impl MoodResult {
    /// Result used when there is nothing to classify
    pub fn neutral_default() -> Self {
        Self {
            mood: Mood::Neutral,
            confidence: 0.5,
            indicators: vec![],
            intensity_score: 5,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResponseTone {
    Enthusiastic,
    Balanced,
    Empathetic,
    Patient,
    Concise,
    Explanatory,
}

impl ResponseTone {
    pub fn directive(&self) -> &'static str {
        match self {
            ResponseTone::Enthusiastic => "begeistert und anerkennend",
            ResponseTone::Balanced => "freundlich und sachlich",
            ResponseTone::Empathetic => "einfühlsam, ruhig und ohne Druck",
            ResponseTone::Patient => "geduldig und lösungsorientiert",
            ResponseTone::Concise => "knapp, klar und direkt auf den Punkt",
            ResponseTone::Explanatory => "erklärend und neugierig machend",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResponseLength {
    Short,
    Medium,
    Detailed,
}

impl ResponseLength {
    pub fn directive(&self) -> &'static str {
        match self {
            ResponseLength::Short => "kurz (2-3 Sätze)",
            ResponseLength::Medium => "mittel (ein kurzer Absatz)",
            ResponseLength::Detailed => "ausführlich, gerne mit Beispielen",
        }
    }
}

/// How a coach reply should be shaped for a given mood.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ResponseGuidelines {
    pub tone: ResponseTone,
    pub length: ResponseLength,
    pub use_emojis: bool,
    pub proactive_suggestions: bool,
    pub celebrate: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opening_phrase: Option<&'static str>,
    pub warmth_boost: i8,
    pub directness_boost: i8,
    pub challenge_boost: i8,
}

pub const DIAL_MIN: i32 = 1;
pub const DIAL_MAX: i32 = 10;

/// Conversational style sliders of a coach persona.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Validate)]
pub struct PersonaDials {
    #[validate(range(min = 1, max = 10, message = "energy must be 1-10"))]
    pub energy: i32,
    #[validate(range(min = 1, max = 10, message = "directness must be 1-10"))]
    pub directness: i32,
    #[validate(range(min = 1, max = 10, message = "warmth must be 1-10"))]
    pub warmth: i32,
    #[validate(range(min = 1, max = 10, message = "challenge must be 1-10"))]
    pub challenge: i32,
    #[validate(range(min = 1, max = 10, message = "humor must be 1-10"))]
    pub humor: i32,
    #[validate(range(min = 1, max = 10, message = "verbosity must be 1-10"))]
    pub verbosity: i32,
}

impl Default for PersonaDials {
    fn default() -> Self {
        Self {
            energy: 5,
            directness: 5,
            warmth: 5,
            challenge: 5,
            humor: 5,
            verbosity: 5,
        }
    }
}

/// Everything the chat handler needs from one message
#[derive(Debug, Clone, Serialize)]
pub struct MoodAnalysis {
    pub mood: MoodResult,
    pub guidelines: ResponseGuidelines,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dials: Option<PersonaDials>,
    pub prompt_section: String,
}
