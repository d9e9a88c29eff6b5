//! Rule-based mood detection for coach chat messages.
//!
//! A message is scored against five word lists and pattern lists (German and
//! English, plus emoji). The best-scoring category becomes the mood, which is
//! then turned into response guidelines, dial adjustments and a prompt
//! section for the persona prompt builder.
//!
//! Everything here is a pure function over the input and fixed tables.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::mood::{
    Mood, MoodAnalysis, MoodResult, PersonaDials, ResponseGuidelines, ResponseLength,
    ResponseTone, DIAL_MAX, DIAL_MIN,
};

const WORD_WEIGHT: f64 = 1.0;
const PATTERN_WEIGHT: f64 = 1.5;
const INTENSITY_MULTIPLIER: f64 = 1.3;
const NEUTRAL_BASELINE: f64 = 0.5;
const CONFIDENCE_SCALE: f64 = 5.0;
const MIN_TEXT_CHARS: usize = 2;
/// Neutral results below this confidence are not worth a prompt section
const NEUTRAL_PROMPT_THRESHOLD: f64 = 0.6;
const MAX_PROMPT_INDICATORS: usize = 3;

struct MoodCategory {
    mood: Mood,
    words: &'static [&'static str],
    patterns: Vec<Regex>,
}

fn compile_patterns(mood: Mood, sources: &[&str]) -> Vec<Regex> {
    sources
        .iter()
        .filter_map(|src| match Regex::new(src) {
            Ok(re) => Some(re),
            Err(e) => {
                tracing::warn!(mood = %mood, pattern = %src, error = %e, "Skipping invalid mood pattern");
                None
            }
        })
        .collect()
}

// Registration order doubles as the tie-break order.
static CATEGORIES: LazyLock<Vec<MoodCategory>> = LazyLock::new(|| {
    vec![
        MoodCategory {
            mood: Mood::Positive,
            words: &[
                "geschafft", "super", "toll", "klasse", "genial", "perfekt", "stolz",
                "freue mich", "freu mich", "glücklich", "motiviert", "endlich", "läuft gut",
                "bestleistung", "danke", "awesome", "great", "happy", "proud", "nailed",
            ],
            patterns: compile_patterns(
                Mood::Positive,
                &[
                    r"\b(?:hab|habe)['’]?s?\s+(?:es\s+)?geschafft\b",
                    r"\bneue[rsn]?\s+(?:pr|bestleistung|rekord|bestzeit)\b",
                    r"\b(?:läuft|lief|war)\s+(?:echt\s+|richtig\s+)?(?:super|gut|stark)\b",
                    r"[\x{1F4AA}\x{1F525}\x{1F389}\x{1F60A}\x{1F600}-\x{1F604}\x{1F64C}\x{1F44D}\x{2705}\x{1F973}\x{2764}]",
                ],
            ),
        },
        MoodCategory {
            mood: Mood::Negative,
            words: &[
                "keine lust", "sinnlos", "traurig", "deprimiert", "hoffnungslos", "aufgeben",
                "keinen sinn", "enttäuscht", "versagt", "versager", "nutzlos", "einsam",
                "unmotiviert", "schlecht drauf", "hopeless", "give up", "pointless", "sad",
            ],
            patterns: compile_patterns(
                Mood::Negative,
                &[
                    r"\bkeine\s+lust\b",
                    r"\b(?:alles|das|es)\s+(?:ist|bringt|hat)\s+(?:eh\s+)?(?:sinnlos|nichts|keinen\s+sinn)\b",
                    r"\bich\s+(?:kann|schaffe?)\s+(?:das\s+)?(?:einfach\s+)?nicht\s+mehr\b",
                    r"[\x{1F61E}\x{1F614}\x{1F622}\x{1F62D}\x{1F494}]",
                ],
            ),
        },
        MoodCategory {
            mood: Mood::Frustrated,
            words: &[
                "schon wieder", "problem", "nervt", "nervig", "genervt", "ärgerlich",
                "klappt nicht", "funktioniert nicht", "immer noch", "frustriert",
                "frustrierend", "stagniere", "plateau", "keine fortschritte", "annoying",
                "frustrating", "stuck",
            ],
            patterns: compile_patterns(
                Mood::Frustrated,
                &[
                    r"\bschon\s+wieder\b",
                    r"\bversteh\w*\s+(?:\w+\s+)?nicht\b",
                    r"\b(?:klappt|funktioniert|geht)\s+(?:\w+\s+)?(?:immer\s+noch\s+)?nicht\b",
                    r"\?{2,}",
                    r"[\x{1F624}\x{1F620}\x{1F621}\x{1F92C}\x{1F644}]",
                ],
            ),
        },
        MoodCategory {
            mood: Mood::Stressed,
            words: &[
                "keine zeit", "nur kurz", "kurz", "stress", "hektik", "hektisch", "eilig",
                "überfordert", "zu viel", "deadline", "busy", "hurry", "asap",
            ],
            patterns: compile_patterns(
                Mood::Stressed,
                &[
                    r"\bkeine\s+zeit\b",
                    r"\bnur\s+(?:ganz\s+)?kurz\b",
                    r"\b(?:bin|total|so)\s+(?:gestresst|im\s+stress|überfordert)\b",
                    r"\bschnell\s+(?:mal|noch)\b",
                    r"[\x{1F630}\x{1F629}\x{1F62B}\x{1F613}\x{23F0}]",
                ],
            ),
        },
        MoodCategory {
            mood: Mood::Curious,
            words: &[
                "wie viel", "wieviel", "wie oft", "wie lange", "warum", "wieso", "weshalb",
                "was ist", "was bringt", "erklär", "neugierig", "interessiert mich",
                "how much", "how many", "why", "curious", "wonder",
            ],
            patterns: compile_patterns(
                Mood::Curious,
                &[
                    r"\b(?:wie\s+viel|wieviel|wie\s+oft|wie\s+lange|warum|wieso|weshalb|was|welche[rsnm]?|how|why|what|which)\b[^?]*\?",
                    r"\bkannst\s+du\s+(?:mir\s+)?(?:das\s+)?erklären\b",
                    r"[\x{1F914}\x{2753}]",
                ],
            ),
        },
    ]
});

static INTENSITY_BOOSTERS: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:sehr|extrem\w*|mega|total|echt|richtig|voll|absolut|wirklich|unglaublich|komplett|really|very|extremely|totally)\b",
    )
    .ok()
});

struct CategoryScore {
    mood: Mood,
    score: f64,
    indicators: Vec<String>,
}

fn push_indicator(indicators: &mut Vec<String>, indicator: &str) {
    let indicator = indicator.trim();
    if !indicator.is_empty() && !indicators.iter().any(|i| i == indicator) {
        indicators.push(indicator.to_string());
    }
}

fn score_category(category: &MoodCategory, lower: &str, multiplier: f64) -> CategoryScore {
    let mut score = 0.0;
    let mut indicators = Vec::new();

    for word in category.words {
        if lower.contains(word) {
            score += WORD_WEIGHT * multiplier;
            push_indicator(&mut indicators, word);
        }
    }

    for pattern in &category.patterns {
        for m in pattern.find_iter(lower) {
            score += PATTERN_WEIGHT * multiplier;
            push_indicator(&mut indicators, m.as_str());
        }
    }

    CategoryScore {
        mood: category.mood,
        score,
        indicators,
    }
}

/// Classify the emotional tone of a user message.
pub fn detect_mood(text: &str) -> MoodResult {
    if text.trim().chars().count() < MIN_TEXT_CHARS {
        return MoodResult::neutral_default();
    }

    let lower = text.to_lowercase();
    let boosted = INTENSITY_BOOSTERS
        .as_ref()
        .is_some_and(|re| re.is_match(&lower));
    let multiplier = if boosted { INTENSITY_MULTIPLIER } else { 1.0 };

    let mut best = CategoryScore {
        mood: Mood::Neutral,
        score: NEUTRAL_BASELINE,
        indicators: vec![],
    };
    for category in CATEGORIES.iter() {
        let candidate = score_category(category, &lower, multiplier);
        if candidate.score > best.score {
            best = candidate;
        }
    }

    let confidence = (best.score / CONFIDENCE_SCALE).min(1.0);
    let intensity = (best.score * 2.0 + 3.0).round().clamp(1.0, 10.0) as u8;

    tracing::debug!(
        mood = %best.mood,
        score = best.score,
        boosted,
        indicators = best.indicators.len(),
        "Mood detected"
    );

    MoodResult {
        mood: best.mood,
        confidence,
        indicators: best.indicators,
        intensity_score: intensity,
    }
}

/// Fixed response policy per mood.
pub fn response_guidelines(result: &MoodResult) -> ResponseGuidelines {
    match result.mood {
        Mood::Positive => ResponseGuidelines {
            tone: ResponseTone::Enthusiastic,
            length: ResponseLength::Medium,
            use_emojis: true,
            proactive_suggestions: true,
            celebrate: true,
            opening_phrase: None,
            warmth_boost: 1,
            directness_boost: 0,
            challenge_boost: 1,
        },
        Mood::Neutral => ResponseGuidelines {
            tone: ResponseTone::Balanced,
            length: ResponseLength::Medium,
            use_emojis: false,
            proactive_suggestions: true,
            celebrate: false,
            opening_phrase: None,
            warmth_boost: 0,
            directness_boost: 0,
            challenge_boost: 0,
        },
        Mood::Negative => ResponseGuidelines {
            tone: ResponseTone::Empathetic,
            length: ResponseLength::Short,
            use_emojis: false,
            proactive_suggestions: false,
            celebrate: false,
            opening_phrase: Some("Das klingt gerade wirklich schwer."),
            warmth_boost: 3,
            directness_boost: -1,
            challenge_boost: -3,
        },
        Mood::Frustrated => ResponseGuidelines {
            tone: ResponseTone::Patient,
            length: ResponseLength::Medium,
            use_emojis: false,
            proactive_suggestions: true,
            celebrate: false,
            opening_phrase: Some("Lass uns das gemeinsam Schritt für Schritt lösen."),
            warmth_boost: 2,
            directness_boost: 1,
            challenge_boost: -2,
        },
        Mood::Stressed => ResponseGuidelines {
            tone: ResponseTone::Concise,
            length: ResponseLength::Short,
            use_emojis: false,
            proactive_suggestions: false,
            celebrate: false,
            opening_phrase: None,
            warmth_boost: 1,
            directness_boost: 2,
            challenge_boost: -2,
        },
        Mood::Curious => ResponseGuidelines {
            tone: ResponseTone::Explanatory,
            length: ResponseLength::Detailed,
            use_emojis: true,
            proactive_suggestions: true,
            celebrate: false,
            opening_phrase: None,
            warmth_boost: 0,
            directness_boost: 0,
            challenge_boost: 1,
        },
    }
}

fn boost_dial(value: i32, boost: i8) -> i32 {
    value
        .saturating_add(i32::from(boost))
        .clamp(DIAL_MIN, DIAL_MAX)
}

/// Returns a copy of `base` with warmth, directness and challenge shifted by
/// the guideline boosts and clamped to the dial range.
pub fn apply_mood_to_dials(base: &PersonaDials, guidelines: &ResponseGuidelines) -> PersonaDials {
    PersonaDials {
        warmth: boost_dial(base.warmth, guidelines.warmth_boost),
        directness: boost_dial(base.directness, guidelines.directness_boost),
        challenge: boost_dial(base.challenge, guidelines.challenge_boost),
        ..*base
    }
}

/// Prompt block describing the user's mood, or `""` for weak neutral signals.
pub fn build_mood_prompt_section(result: &MoodResult, guidelines: &ResponseGuidelines) -> String {
    if result.mood == Mood::Neutral && result.confidence < NEUTRAL_PROMPT_THRESHOLD {
        return String::new();
    }

    let mut lines = vec![
        "## Stimmung des Nutzers".to_string(),
        format!(
            "Erkannte Stimmung: {} (Konfidenz: {:.0}%)",
            result.mood.label(),
            result.confidence * 100.0
        ),
    ];

    if !result.indicators.is_empty() {
        let shown: Vec<String> = result
            .indicators
            .iter()
            .take(MAX_PROMPT_INDICATORS)
            .map(|i| format!("\"{}\"", i))
            .collect();
        lines.push(format!("Signale: {}", shown.join(", ")));
    }

    lines.push(String::new());
    lines.push("Passe deine Antwort an:".to_string());
    lines.push(format!("- Ton: {}", guidelines.tone.directive()));
    lines.push(format!("- Länge: {}", guidelines.length.directive()));
    lines.push(if guidelines.use_emojis {
        "- Emojis: erlaubt, aber sparsam".to_string()
    } else {
        "- Emojis: keine".to_string()
    });
    lines.push(if guidelines.proactive_suggestions {
        "- Proaktiv: biete konkrete nächste Schritte an".to_string()
    } else {
        "- Proaktiv: keine zusätzlichen Vorschläge, nur auf die Frage eingehen".to_string()
    });
    if guidelines.celebrate {
        lines.push("- Feiere den Erfolg ausdrücklich mit dem Nutzer".to_string());
    }
    if let Some(opening) = guidelines.opening_phrase {
        lines.push(format!("- Beginne deine Antwort mit: \"{}\"", opening));
    }

    lines.join("\n")
}

/// Runs the full pipeline for one chat message.
pub fn analyze(text: &str, dials: Option<&PersonaDials>) -> MoodAnalysis {
    let mood = detect_mood(text);
    let guidelines = response_guidelines(&mood);
    let dials = dials.map(|d| apply_mood_to_dials(d, &guidelines));
    let prompt_section = build_mood_prompt_section(&mood, &guidelines);

    MoodAnalysis {
        mood,
        guidelines,
        dials,
        prompt_section,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const ALL_MOODS: [Mood; 6] = [
        Mood::Positive,
        Mood::Neutral,
        Mood::Negative,
        Mood::Frustrated,
        Mood::Stressed,
        Mood::Curious,
    ];

    fn result_with(mood: Mood, confidence: f64) -> MoodResult {
        MoodResult {
            mood,
            confidence,
            indicators: vec!["test".into()],
            intensity_score: 5,
        }
    }

    #[test]
    fn test_all_patterns_compile() {
        let expected = [4, 4, 5, 5, 3];
        for (category, n) in CATEGORIES.iter().zip(expected) {
            assert_eq!(category.patterns.len(), n, "patterns for {}", category.mood);
        }
        assert!(INTENSITY_BOOSTERS.is_some());
    }

    #[test]
    fn test_short_text_is_neutral_default() {
        for text in ["", "x", " ", " x "] {
            let result = detect_mood(text);
            assert_eq!(result, MoodResult::neutral_default(), "input {:?}", text);
        }
    }

    #[test]
    fn test_detects_positive() {
        let result = detect_mood("Ich hab's geschafft!! 💪🔥");
        assert_eq!(result.mood, Mood::Positive);
        assert!(result.confidence > 0.0);
        assert!(!result.indicators.is_empty());
        assert!(result.indicators.iter().any(|i| i == "💪"));
    }

    #[test]
    fn test_detects_negative() {
        let result = detect_mood("Ich hab keine Lust mehr, alles ist sinnlos");
        assert_eq!(result.mood, Mood::Negative);
        assert!(result.indicators.contains(&"keine lust".to_string()));
    }

    #[test]
    fn test_detects_frustrated() {
        let result = detect_mood("Schon wieder das gleiche Problem, verstehe es nicht");
        assert_eq!(result.mood, Mood::Frustrated);
    }

    #[test]
    fn test_detects_stressed() {
        let result = detect_mood("Keine Zeit, nur kurz: wie viel Protein brauche ich?");
        assert_eq!(result.mood, Mood::Stressed);
    }

    #[test]
    fn test_detects_curious() {
        let result = detect_mood("Warum ist Kreatin eigentlich sinnvoll?");
        assert_eq!(result.mood, Mood::Curious);
    }

    #[test]
    fn test_plain_text_is_neutral_with_low_confidence() {
        let result = detect_mood("Heute Beine trainiert");
        assert_eq!(result.mood, Mood::Neutral);
        assert!((result.confidence - 0.1).abs() < 1e-9);
        assert_eq!(result.intensity_score, 4);
        assert!(result.indicators.is_empty());
    }

    #[test]
    fn test_booster_raises_score() {
        let plain = detect_mood("das nervt");
        let boosted = detect_mood("das nervt extrem");
        assert_eq!(plain.mood, Mood::Frustrated);
        assert_eq!(boosted.mood, Mood::Frustrated);
        assert!(boosted.confidence > plain.confidence);
    }

    #[test]
    fn test_confidence_and_intensity_are_bounded() {
        let result = detect_mood(
            "Schon wieder!!! Das nervt extrem, klappt nicht, funktioniert nicht, immer noch das Problem 😤😤😤",
        );
        assert_eq!(result.mood, Mood::Frustrated);
        assert!(result.confidence <= 1.0);
        assert_eq!(result.intensity_score, 10);
    }

    #[test]
    fn test_guidelines_are_deterministic() {
        for mood in ALL_MOODS {
            let a = response_guidelines(&result_with(mood, 0.2));
            let b = response_guidelines(&result_with(mood, 0.9));
            assert_eq!(a, b, "guidelines differ for {}", mood);
            assert_eq!(
                serde_json::to_string(&a).unwrap(),
                serde_json::to_string(&b).unwrap()
            );
        }
    }

    #[test]
    fn test_apply_mood_to_dials_keeps_other_dials() {
        let base = PersonaDials {
            energy: 7,
            humor: 2,
            verbosity: 9,
            ..PersonaDials::default()
        };
        let guidelines = response_guidelines(&result_with(Mood::Negative, 1.0));
        let adjusted = apply_mood_to_dials(&base, &guidelines);

        assert_eq!(adjusted.warmth, 8);
        assert_eq!(adjusted.directness, 4);
        assert_eq!(adjusted.challenge, 2);
        assert_eq!(adjusted.energy, 7);
        assert_eq!(adjusted.humor, 2);
        assert_eq!(adjusted.verbosity, 9);
        // base is untouched
        assert_eq!(base.warmth, 5);
    }

    #[test]
    fn test_apply_mood_to_dials_clamps() {
        let base = PersonaDials {
            warmth: 10,
            directness: 10,
            challenge: 1,
            ..PersonaDials::default()
        };
        let guidelines = response_guidelines(&result_with(Mood::Negative, 1.0));
        let adjusted = apply_mood_to_dials(&base, &guidelines);
        assert_eq!(adjusted.warmth, 10);
        assert_eq!(adjusted.directness, 9);
        assert_eq!(adjusted.challenge, 1);
    }

    proptest! {
        #[test]
        fn prop_adjusted_dials_stay_in_range(
            warmth in any::<i32>(),
            directness in any::<i32>(),
            challenge in any::<i32>(),
            warmth_boost in any::<i8>(),
            directness_boost in any::<i8>(),
            challenge_boost in any::<i8>(),
        ) {
            let base = PersonaDials { warmth, directness, challenge, ..PersonaDials::default() };
            let guidelines = ResponseGuidelines {
                warmth_boost,
                directness_boost,
                challenge_boost,
                ..response_guidelines(&MoodResult::neutral_default())
            };
            let adjusted = apply_mood_to_dials(&base, &guidelines);
            for value in [adjusted.warmth, adjusted.directness, adjusted.challenge] {
                prop_assert!((DIAL_MIN..=DIAL_MAX).contains(&value));
            }
        }
    }

    #[test]
    fn test_prompt_section_empty_for_weak_neutral() {
        let result = result_with(Mood::Neutral, 0.59);
        let guidelines = response_guidelines(&result);
        assert_eq!(build_mood_prompt_section(&result, &guidelines), "");
    }

    #[test]
    fn test_prompt_section_for_confident_neutral() {
        let result = result_with(Mood::Neutral, 0.6);
        let guidelines = response_guidelines(&result);
        assert!(!build_mood_prompt_section(&result, &guidelines).is_empty());
    }

    #[test]
    fn test_prompt_section_for_other_moods() {
        for mood in ALL_MOODS.into_iter().filter(|m| *m != Mood::Neutral) {
            let result = result_with(mood, 0.1);
            let guidelines = response_guidelines(&result);
            let section = build_mood_prompt_section(&result, &guidelines);
            assert!(section.contains(mood.label()), "section for {}", mood);
        }
    }

    #[test]
    fn test_prompt_section_lists_at_most_three_indicators() {
        let result = MoodResult {
            mood: Mood::Frustrated,
            confidence: 0.8,
            indicators: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            intensity_score: 7,
        };
        let guidelines = response_guidelines(&result);
        let section = build_mood_prompt_section(&result, &guidelines);
        assert!(section.contains("Signale: \"a\", \"b\", \"c\""));
        assert!(!section.contains("\"d\""));
        assert!(section.contains("Konfidenz: 80%"));
        assert!(section.contains("Schritt für Schritt"));
    }

    #[test]
    fn test_prompt_section_celebrates_positive() {
        let result = result_with(Mood::Positive, 0.9);
        let guidelines = response_guidelines(&result);
        let section = build_mood_prompt_section(&result, &guidelines);
        assert!(section.contains("Feiere den Erfolg"));
    }

    #[test]
    fn test_analyze_runs_full_pipeline() {
        let dials = PersonaDials::default();
        let analysis = analyze("Ich hab keine Lust mehr, alles ist sinnlos", Some(&dials));
        assert_eq!(analysis.mood.mood, Mood::Negative);
        assert_eq!(analysis.guidelines.tone, ResponseTone::Empathetic);
        assert_eq!(analysis.dials.map(|d| d.warmth), Some(8));
        assert!(analysis.prompt_section.contains("niedergeschlagen"));

        let without_dials = analyze("hallo", None);
        assert!(without_dials.dials.is_none());
    }
}
