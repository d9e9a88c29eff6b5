//! Free-text training log parsing.
//!
//! Turns a pasted workout log (German/English, any formatting) into a
//! [`TrainingSession`] plus a markdown summary. The parser never fails:
//! unrecognized lines are dropped and anything worth telling the user ends
//! up in `meta.warnings` and `session.notes`.

pub mod exercises;
pub mod markdown;
pub mod set_line;
pub mod supersets;

use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::{NaiveDate, Utc};
use regex::Regex;

use crate::models::training::{
    Exercise, ParseMeta, ParsedTrainingLog, TrainingSession, UNKNOWN_EXERCISE,
};

pub use exercises::{canonical_exercise_name, exercise_header, technique_hints};
pub use markdown::render_markdown;
pub use set_line::parse_set_line;
pub use supersets::detect_supersets;

use exercises::{movement_group, MovementGroup};
use set_line::has_set_shape;

pub const DEFAULT_SPLIT: &str = "custom";
pub const WARN_NO_EXERCISES: &str =
    "Keine Übungen erkannt. Bitte eine Übung pro Zeile und darunter die Sätze angeben (z. B. \"Bankdrücken\" und \"10x 100kg rpe 8\").";

/// Caller-supplied overrides for values the log may or may not contain.
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    pub session_date: Option<NaiveDate>,
    pub split_type: Option<String>,
}

static ISO_DATE_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\b(\d{4})-(\d{2})-(\d{2})\b").ok());
static GERMAN_DATE_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\b(\d{1,2})\.(\d{1,2})\.(\d{4}|\d{2})\b").ok());

const SPLIT_FILLER_WORDS: &[&str] = &[
    "day", "tag", "training", "workout", "einheit", "session", "heute", "a", "b",
];

const SPLIT_KEYWORDS: &[(&str, &str)] = &[
    ("push", "push"),
    ("pull", "pull"),
    ("legs", "legs"),
    ("leg", "legs"),
    ("beine", "legs"),
    ("beintag", "legs"),
    ("upper", "upper"),
    ("upper body", "upper"),
    ("oberkörper", "upper"),
    ("lower", "lower"),
    ("lower body", "lower"),
    ("unterkörper", "lower"),
    ("ganzkörper", "full_body"),
    ("full body", "full_body"),
    ("fullbody", "full_body"),
];

fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split(['\n', ';', '·', '|'])
        .map(str::trim)
        .filter(|l| !l.is_empty())
}

fn date_in_line(line: &str) -> Option<(NaiveDate, String)> {
    if let Some(caps) = ISO_DATE_RE.as_ref().and_then(|re| re.captures(line)) {
        let date = NaiveDate::from_ymd_opt(
            caps[1].parse().ok()?,
            caps[2].parse().ok()?,
            caps[3].parse().ok()?,
        )?;
        return Some((date, line.replacen(&caps[0], " ", 1)));
    }

    let caps = GERMAN_DATE_RE.as_ref()?.captures(line)?;
    let mut year: i32 = caps[3].parse().ok()?;
    if year < 100 {
        year += 2000;
    }
    let date = NaiveDate::from_ymd_opt(year, caps[2].parse().ok()?, caps[1].parse().ok()?)?;
    Some((date, line.replacen(&caps[0], " ", 1)))
}

/// Recognizes lines like "Push Day" or "Training: Oberkörper".
fn split_in_line(line: &str) -> Option<&'static str> {
    if line.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    let lower = line.to_lowercase();
    let words: Vec<&str> = lower
        .split(|c: char| !c.is_alphabetic())
        .filter(|w| !w.is_empty() && !SPLIT_FILLER_WORDS.contains(w))
        .collect();
    if words.is_empty() || words.len() > 2 {
        return None;
    }
    let phrase = words.join(" ");
    SPLIT_KEYWORDS
        .iter()
        .find(|(keyword, _)| *keyword == phrase)
        .map(|(_, split)| *split)
}

/// Guesses the split from the movement groups that were trained.
fn infer_split(exercises: &[Exercise]) -> &'static str {
    let groups: Vec<MovementGroup> = exercises
        .iter()
        .filter_map(|e| movement_group(&e.name))
        .collect();
    let push = groups.contains(&MovementGroup::Push);
    let pull = groups.contains(&MovementGroup::Pull);
    let legs = groups.contains(&MovementGroup::Legs);

    match (push, pull, legs) {
        (true, false, false) => "push",
        (false, true, false) => "pull",
        (false, false, true) => "legs",
        (true, true, false) => "upper",
        (_, _, true) if push || pull => "full_body",
        _ => DEFAULT_SPLIT,
    }
}

fn flush(current: &mut Option<Exercise>, exercises: &mut Vec<Exercise>) {
    if let Some(exercise) = current.take() {
        if exercise.sets.is_empty() {
            tracing::debug!(exercise = %exercise.name, "Discarding exercise without sets");
        } else {
            exercises.push(exercise);
        }
    }
}

fn start_exercise(
    name: String,
    notes: Option<String>,
    supersets: &BTreeMap<String, Vec<String>>,
) -> Exercise {
    let mut exercise = Exercise::new(name);
    exercise.notes = notes;
    exercise.superset_with = supersets
        .get(&exercise.name)
        .filter(|partners| !partners.is_empty())
        .map(|partners| partners.join(", "));
    exercise
}

/// Parses a raw training log. Always returns a session, possibly empty.
pub fn parse_training_log(raw_text: &str, options: &ParseOptions) -> ParsedTrainingLog {
    let supersets = detect_supersets(raw_text);
    let mut meta = ParseMeta::default();
    let mut exercises: Vec<Exercise> = Vec::new();
    let mut current: Option<Exercise> = None;
    let mut detected_date: Option<NaiveDate> = None;
    let mut detected_split: Option<&'static str> = None;

    for line in split_lines(raw_text) {
        meta.lines_total += 1;

        if !has_set_shape(line) {
            if let Some((date, rest)) = date_in_line(line) {
                detected_date.get_or_insert(date);
                if let Some(split) = split_in_line(&rest) {
                    detected_split.get_or_insert(split);
                }
                continue;
            }
            if let Some(split) = split_in_line(line) {
                detected_split.get_or_insert(split);
                continue;
            }
        }

        if let Some(header) = exercise_header(line) {
            flush(&mut current, &mut exercises);
            let mut exercise = start_exercise(header.name, header.notes, &supersets);
            if !header.remainder.is_empty() {
                if let Some(set) = parse_set_line(&header.remainder) {
                    exercise.sets.push(set);
                    meta.sets_parsed += 1;
                }
            }
            current = Some(exercise);
            continue;
        }

        if let Some(set) = parse_set_line(line) {
            let exercise = current.get_or_insert_with(|| {
                tracing::warn!(line = %line, "Set found before any exercise name");
                meta.warnings.push(format!(
                    "Satz ohne Übungsnamen gefunden (\"{line}\"). Er wurde \"{UNKNOWN_EXERCISE}\" zugeordnet."
                ));
                Exercise::new(UNKNOWN_EXERCISE)
            });
            exercise.sets.push(set);
            meta.sets_parsed += 1;
            continue;
        }

        meta.lines_ignored += 1;
        tracing::warn!(line = %line, "Ignoring line without exercise name or set");
    }
    flush(&mut current, &mut exercises);

    if exercises.is_empty() {
        tracing::warn!(lines = meta.lines_total, "No exercises recognized in training log");
        meta.warnings.push(WARN_NO_EXERCISES.to_string());
    }

    let split_type = options
        .split_type
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .or_else(|| detected_split.map(str::to_string))
        .unwrap_or_else(|| infer_split(&exercises).to_string());
    let session_date = options
        .session_date
        .or(detected_date)
        .unwrap_or_else(|| Utc::now().date_naive());

    let notes = if meta.warnings.is_empty() {
        None
    } else {
        Some(meta.warnings.join("\n"))
    };
    meta.supersets = supersets;

    let session = TrainingSession {
        session_date,
        split_type,
        exercises,
        notes,
    };
    let markdown = render_markdown(&session);

    tracing::debug!(
        exercises = session.exercises.len(),
        sets = meta.sets_parsed,
        ignored = meta.lines_ignored,
        warnings = meta.warnings.len(),
        "Training log parsed"
    );

    ParsedTrainingLog {
        session,
        markdown,
        meta,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::training::{SetEntry, WeightUnit};

    fn parse(text: &str) -> ParsedTrainingLog {
        parse_training_log(text, &ParseOptions::default())
    }

    #[test]
    fn test_single_exercise_single_set() {
        let parsed = parse("Bankdrücken\n10x 100kg rpe 8");
        assert_eq!(parsed.session.exercises.len(), 1);
        let exercise = &parsed.session.exercises[0];
        assert_eq!(exercise.name, "Bankdrücken");
        assert_eq!(
            exercise.sets,
            vec![SetEntry {
                weight: 100.0,
                reps: 10,
                rpe: Some(8.0),
                unit: WeightUnit::Kg,
            }]
        );
        assert!(parsed.meta.warnings.is_empty());
        assert!(parsed.session.notes.is_none());
    }

    #[test]
    fn test_pound_conversion() {
        let parsed = parse("Kniebeuge\n5x 225lb");
        let set = &parsed.session.exercises[0].sets[0];
        assert_eq!(set.reps, 5);
        assert!((set.weight - 102.1).abs() < 1e-9);
    }

    #[test]
    fn test_malformed_lines_are_dropped() {
        let parsed = parse("Bankdrücken\nfühlte mich gut heute\n10x 100kg rpe 8");
        assert_eq!(parsed.session.exercises.len(), 1);
        assert_eq!(parsed.session.exercises[0].sets.len(), 1);
        assert_eq!(parsed.meta.sets_parsed, 1);
        assert_eq!(parsed.meta.lines_ignored, 1);
    }

    #[test]
    fn test_orphan_sets_go_to_unknown_exercise() {
        let parsed = parse("10x 100kg rpe 8\n8x 100kg rpe 9\nKniebeuge\n5x 120kg");
        let exercises = &parsed.session.exercises;
        assert_eq!(exercises.len(), 2);
        assert_eq!(exercises[0].name, UNKNOWN_EXERCISE);
        assert_eq!(exercises[0].sets.len(), 2);
        assert_eq!(parsed.meta.warnings.len(), 1);
        assert!(parsed.meta.warnings[0].contains("ohne Übungsnamen"));
        assert!(parsed.session.notes.as_deref().unwrap().contains("ohne Übungsnamen"));
    }

    #[test]
    fn test_empty_input() {
        let parsed = parse("");
        assert!(parsed.session.exercises.is_empty());
        assert_eq!(parsed.meta.warnings, vec![WARN_NO_EXERCISES.to_string()]);
        assert!(parsed.markdown.contains("Keine Übungen erkannt"));
    }

    #[test]
    fn test_synonym_headers() {
        let parsed = parse("Latziehen\n10x 60kg\nLat Pulldown\n10x 55kg");
        let names: Vec<&str> = parsed
            .session
            .exercises
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(names, vec!["Pulldown", "Pulldown"]);
    }

    #[test]
    fn test_chatter_mentioning_an_exercise_keeps_the_block() {
        let parsed = parse(
            "Bankdrücken\n10x 80kg rpe 7\nSchulter hat beim Bankdrücken gezwickt\n8x 80kg rpe 9",
        );
        assert_eq!(parsed.session.exercises.len(), 1);
        assert_eq!(parsed.session.exercises[0].sets.len(), 2);
        assert_eq!(parsed.meta.lines_ignored, 1);

        let parsed = parse("Kniebeuge\n5x 100kg\nLunge brennt noch\n5x 100kg");
        let names: Vec<&str> = parsed
            .session
            .exercises
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(names, vec!["Kniebeuge"]);
        assert_eq!(parsed.session.exercises[0].sets.len(), 2);
    }

    #[test]
    fn test_rpe_with_punctuation_drives_progression() {
        let parsed = parse("Bankdrücken\n10x 100kg, rpe 9.\n8x 100kg (rpe 9,5)");
        let sets = &parsed.session.exercises[0].sets;
        assert_eq!(sets[0].rpe, Some(9.0));
        assert_eq!(sets[1].rpe, Some(9.5));
        assert!(parsed.markdown.contains("reduzieren"));
    }

    #[test]
    fn test_header_without_sets_is_discarded() {
        let parsed = parse("Bankdrücken\nKniebeuge\n5x 100kg");
        assert_eq!(parsed.session.exercises.len(), 1);
        assert_eq!(parsed.session.exercises[0].name, "Kniebeuge");
    }

    #[test]
    fn test_alternative_delimiters() {
        let parsed = parse("Bankdrücken · 10x 80kg · 8x 85kg | Rudern; 10x 60kg");
        let exercises = &parsed.session.exercises;
        assert_eq!(exercises.len(), 2);
        assert_eq!(exercises[0].sets.len(), 2);
        assert_eq!(exercises[1].name, "Rudern");
    }

    #[test]
    fn test_interleaved_supersets_keep_line_order() {
        let log = "Bankdrücken 10x 80kg\nRudern 10x 60kg\nBankdrücken 10x 80kg\nRudern 10x 60kg";
        let parsed = parse(log);
        let exercises = &parsed.session.exercises;
        assert_eq!(exercises.len(), 4);
        assert_eq!(exercises[0].superset_with.as_deref(), Some("Rudern"));
        assert_eq!(exercises[1].superset_with.as_deref(), Some("Bankdrücken"));
        assert_eq!(parsed.meta.supersets.len(), 2);
        assert_eq!(parsed.session.split_type, "upper");
    }

    #[test]
    fn test_session_date_and_split_from_log() {
        let parsed = parse("Push Day 12.03.2025\nBankdrücken\n10x 80kg");
        assert_eq!(
            parsed.session.session_date,
            NaiveDate::from_ymd_opt(2025, 3, 12).unwrap()
        );
        assert_eq!(parsed.session.split_type, "push");
        assert_eq!(parsed.meta.lines_ignored, 0);
    }

    #[test]
    fn test_options_override_log_values() {
        let options = ParseOptions {
            session_date: NaiveDate::from_ymd_opt(2024, 1, 2),
            split_type: Some("Oberkörper A".into()),
        };
        let parsed = parse_training_log("2025-03-12\nBeine\nKniebeuge\n5x 100kg", &options);
        assert_eq!(parsed.session.session_date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(parsed.session.split_type, "Oberkörper A");
    }

    #[test]
    fn test_split_inference() {
        assert_eq!(parse("Kniebeuge\n5x 100kg").session.split_type, "legs");
        assert_eq!(
            parse("Kniebeuge\n5x 100kg\nBankdrücken\n5x 80kg").session.split_type,
            "full_body"
        );
        assert_eq!(parse("Cable Flys\n12x 15kg").session.split_type, DEFAULT_SPLIT);
    }

    #[test]
    fn test_header_notes_are_kept() {
        let parsed = parse("Bankdrücken (enger Griff)\n10x 70kg");
        assert_eq!(
            parsed.session.exercises[0].notes.as_deref(),
            Some("enger Griff")
        );
    }

    #[test]
    fn test_markdown_is_rendered() {
        let parsed = parse("Bankdrücken\n10x 100kg rpe 8\n8x 100kg rpe 9");
        assert!(parsed.markdown.contains("## 1. Bankdrücken"));
        assert!(parsed.markdown.contains("| 2 | 100 kg | 8 | 9 | |"));
        assert!(parsed.markdown.contains("Gewicht halten"));
    }
}
