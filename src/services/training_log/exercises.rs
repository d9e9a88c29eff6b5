//! Exercise vocabulary: synonym canonicalization, header-line detection and
//! per-exercise technique hints.

use std::sync::LazyLock;

use regex::Regex;

use super::set_line::has_set_shape;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovementGroup {
    Push,
    Pull,
    Legs,
}

/// Raw name fragment (lowercase) -> canonical display name.
/// Matching is by substring; the longest matching fragment wins.
const EXERCISE_SYNONYMS: &[(&str, &str)] = &[
    ("lat pulldown", "Pulldown"),
    ("lat pull", "Pulldown"),
    ("latziehen", "Pulldown"),
    ("latzug", "Pulldown"),
    ("pulldown", "Pulldown"),
    ("bankdrücken", "Bankdrücken"),
    ("flachbank", "Bankdrücken"),
    ("bench press", "Bankdrücken"),
    ("bench", "Bankdrücken"),
    ("schrägbankdrücken", "Schrägbankdrücken"),
    ("schrägbank", "Schrägbankdrücken"),
    ("incline bench", "Schrägbankdrücken"),
    ("incline press", "Schrägbankdrücken"),
    ("kniebeuge", "Kniebeuge"),
    ("back squat", "Kniebeuge"),
    ("squat", "Kniebeuge"),
    ("frontkniebeuge", "Frontkniebeuge"),
    ("front squat", "Frontkniebeuge"),
    ("kreuzheben", "Kreuzheben"),
    ("deadlift", "Kreuzheben"),
    ("rumänisches kreuzheben", "Rumänisches Kreuzheben"),
    ("romanian deadlift", "Rumänisches Kreuzheben"),
    ("rdl", "Rumänisches Kreuzheben"),
    ("schulterdrücken", "Schulterdrücken"),
    ("overhead press", "Schulterdrücken"),
    ("military press", "Schulterdrücken"),
    ("ohp", "Schulterdrücken"),
    ("push press", "Push Press"),
    ("rudern", "Rudern"),
    ("barbell row", "Rudern"),
    ("bent over row", "Rudern"),
    ("cable row", "Rudern"),
    ("beinpresse", "Beinpresse"),
    ("leg press", "Beinpresse"),
    ("klimmzüge", "Klimmzüge"),
    ("klimmzug", "Klimmzüge"),
    ("pull-up", "Klimmzüge"),
    ("pull up", "Klimmzüge"),
    ("pullup", "Klimmzüge"),
    ("chin-up", "Klimmzüge"),
    ("dips", "Dips"),
    ("bizepscurls", "Bizepscurls"),
    ("bizeps curl", "Bizepscurls"),
    ("bicep curl", "Bizepscurls"),
    ("biceps curl", "Bizepscurls"),
    ("hammer curl", "Hammercurls"),
    ("hammercurl", "Hammercurls"),
    ("trizepsdrücken", "Trizepsdrücken"),
    ("pushdown", "Trizepsdrücken"),
    ("ausfallschritte", "Ausfallschritte"),
    ("lunges", "Ausfallschritte"),
    ("lunge", "Ausfallschritte"),
    ("hip thrust", "Hip Thrust"),
    ("seitheben", "Seitheben"),
    ("lateral raise", "Seitheben"),
    ("beinbeuger", "Leg Curl"),
    ("leg curl", "Leg Curl"),
    ("beinstrecker", "Leg Extension"),
    ("leg extension", "Leg Extension"),
    ("wadenheben", "Wadenheben"),
    ("calf raise", "Wadenheben"),
    ("face pull", "Face Pulls"),
];

struct ExerciseInfo {
    name: &'static str,
    group: MovementGroup,
    hints: &'static [&'static str],
}

const EXERCISE_INFO: &[ExerciseInfo] = &[
    ExerciseInfo {
        name: "Bankdrücken",
        group: MovementGroup::Push,
        hints: &[
            "Schulterblätter zusammen und nach unten ziehen, leichter Bogen im oberen Rücken",
            "Stange kontrolliert zur unteren Brust führen, Ellbogen ca. 45° zum Körper",
            "Füße fest in den Boden drücken (Leg Drive)",
        ],
    },
    ExerciseInfo {
        name: "Schrägbankdrücken",
        group: MovementGroup::Push,
        hints: &[
            "Bank auf 30-45° einstellen, nicht steiler",
            "Stange zur oberen Brust absenken",
        ],
    },
    ExerciseInfo {
        name: "Schulterdrücken",
        group: MovementGroup::Push,
        hints: &[
            "Gesäß und Bauch anspannen, kein Hohlkreuz",
            "Kopf nach hinten nehmen und die Stange in gerader Linie nach oben drücken",
        ],
    },
    ExerciseInfo {
        name: "Push Press",
        group: MovementGroup::Push,
        hints: &[
            "Kurzer, explosiver Dip aus den Knien, Oberkörper bleibt aufrecht",
            "Beinimpuls direkt in den Druck über Kopf übertragen",
        ],
    },
    ExerciseInfo {
        name: "Dips",
        group: MovementGroup::Push,
        hints: &[
            "Schultern weg von den Ohren halten",
            "Nur so tief gehen, wie die Schulter es schmerzfrei erlaubt",
        ],
    },
    ExerciseInfo {
        name: "Trizepsdrücken",
        group: MovementGroup::Push,
        hints: &["Ellbogen fest am Körper fixieren", "Unten kurz halten und voll strecken"],
    },
    ExerciseInfo {
        name: "Seitheben",
        group: MovementGroup::Push,
        hints: &[
            "Leicht gebeugte Arme, Bewegung aus der Schulter",
            "Nicht über Schulterhöhe schwingen, langsam absenken",
        ],
    },
    ExerciseInfo {
        name: "Pulldown",
        group: MovementGroup::Pull,
        hints: &[
            "Brust raus, Stange zur oberen Brust ziehen",
            "Ellbogen nach unten und hinten führen, nicht mit Schwung arbeiten",
        ],
    },
    ExerciseInfo {
        name: "Klimmzüge",
        group: MovementGroup::Pull,
        hints: &[
            "Aus dem vollen Hang starten, Schulterblätter zuerst aktivieren",
            "Kinn über die Stange, kein Kippen",
        ],
    },
    ExerciseInfo {
        name: "Rudern",
        group: MovementGroup::Pull,
        hints: &[
            "Neutraler Rücken, Rumpf stabil halten",
            "Zum Bauchnabel ziehen und Schulterblätter zusammenführen",
        ],
    },
    ExerciseInfo {
        name: "Face Pulls",
        group: MovementGroup::Pull,
        hints: &["Seil auf Augenhöhe ziehen, Hände nach außen rotieren"],
    },
    ExerciseInfo {
        name: "Bizepscurls",
        group: MovementGroup::Pull,
        hints: &["Ellbogen bleiben am Körper, kein Schwung aus dem Rücken"],
    },
    ExerciseInfo {
        name: "Hammercurls",
        group: MovementGroup::Pull,
        hints: &["Neutraler Griff, Handgelenke gerade halten"],
    },
    ExerciseInfo {
        name: "Kniebeuge",
        group: MovementGroup::Legs,
        hints: &[
            "Knie in Richtung der Fußspitzen schieben",
            "Rumpf vor dem Abstieg fest anspannen (Bracing)",
            "Mindestens bis zur Parallelen gehen, solange der Rücken neutral bleibt",
        ],
    },
    ExerciseInfo {
        name: "Frontkniebeuge",
        group: MovementGroup::Legs,
        hints: &["Ellbogen hoch halten, Oberkörper aufrecht"],
    },
    ExerciseInfo {
        name: "Kreuzheben",
        group: MovementGroup::Legs,
        hints: &[
            "Stange nah am Körper führen",
            "Neutraler Rücken, Hüfte und Knie gleichzeitig strecken",
            "Vor jedem Zug Spannung aufbauen, nicht ruckartig reißen",
        ],
    },
    ExerciseInfo {
        name: "Rumänisches Kreuzheben",
        group: MovementGroup::Legs,
        hints: &[
            "Hüfte nach hinten schieben, Knie nur leicht gebeugt",
            "Dehnung im Beinbizeps suchen, Rücken bleibt neutral",
        ],
    },
    ExerciseInfo {
        name: "Beinpresse",
        group: MovementGroup::Legs,
        hints: &[
            "Unterer Rücken bleibt am Polster",
            "Knie am Ende nicht durchstrecken",
        ],
    },
    ExerciseInfo {
        name: "Ausfallschritte",
        group: MovementGroup::Legs,
        hints: &["Vorderes Knie stabil über dem Fuß, aufrechter Oberkörper"],
    },
    ExerciseInfo {
        name: "Hip Thrust",
        group: MovementGroup::Legs,
        hints: &["Oben Gesäß maximal anspannen, Kinn zur Brust"],
    },
    ExerciseInfo {
        name: "Leg Curl",
        group: MovementGroup::Legs,
        hints: &["Hüfte auf dem Polster lassen, langsam ablassen"],
    },
    ExerciseInfo {
        name: "Leg Extension",
        group: MovementGroup::Legs,
        hints: &["Oben eine Sekunde halten, kontrolliert absenken"],
    },
    ExerciseInfo {
        name: "Wadenheben",
        group: MovementGroup::Legs,
        hints: &["Volle Dehnung unten, oben kurz halten"],
    },
];

const GENERIC_HINTS: &[&str] = &[
    "Exzentrische Phase kontrolliert ausführen (2-3 Sekunden)",
    "Volle Bewegungsamplitude nutzen",
    "Satz beenden, sobald die Technik nachlässt",
];

/// Words that mark a line as chatter or metadata rather than an exercise name
const NON_EXERCISE_WORDS: &[&str] = &[
    "ich", "mich", "mir", "mein", "meine", "war", "ist", "bin", "heute", "gestern", "gut",
    "schlecht", "müde", "fühlte", "gefühlt", "sehr", "aber", "und", "dann", "noch", "pause",
    "notiz", "notizen", "note", "notes", "training", "workout", "session", "einheit", "datum",
    "date", "felt", "today", "was", "rpe", "wdh", "kg", "lb", "lbs", "satz", "sätze", "set",
    "sets", "day", "tag", "insgesamt", "total", "aufwärmen", "warmup", "cooldown", "dehnen",
    "push", "pull", "legs", "beine", "upper", "lower", "oberkörper", "unterkörper", "ganzkörper",
    "hat", "hab", "habe", "beim", "bei", "tut", "weh", "brennt", "zwickt", "gezwickt", "schmerzen",
];

const MAX_HEADER_WORDS: usize = 5;
/// "Kurzhantel Bankdrücken" but not "Schulter hat beim Bankdrücken gezwickt"
const MAX_SYNONYM_PREFIX_WORDS: usize = 2;

static NOTES_RE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\(([^)]*)\)").ok());

/// An exercise name found at the start of a log line.
#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseHeader {
    pub name: String,
    pub notes: Option<String>,
    /// Text after the name, possibly an embedded set ("Bankdrücken 10x 80kg")
    pub remainder: String,
}

fn find_synonym_entry(lower: &str) -> Option<&'static (&'static str, &'static str)> {
    EXERCISE_SYNONYMS
        .iter()
        .filter(|(raw, _)| lower.contains(raw))
        .max_by_key(|(raw, _)| raw.len())
}

fn find_synonym(lower: &str) -> Option<&'static str> {
    find_synonym_entry(lower).map(|(_, canonical)| *canonical)
}

fn is_chatter_word(word: &str) -> bool {
    let word = word.trim_matches(|c: char| !c.is_alphanumeric());
    NON_EXERCISE_WORDS.contains(&word)
}

/// A head naming a known exercise is a header only when the words around
/// the synonym are not chatter and the synonym leads or the head is short.
fn is_synonym_header(lower: &str, raw: &str) -> bool {
    let rest = lower.replacen(raw, " ", 1);
    let rest: Vec<&str> = rest.split_whitespace().collect();
    if rest.iter().any(|w| is_chatter_word(w)) {
        return false;
    }
    lower.starts_with(raw) || rest.len() <= MAX_SYNONYM_PREFIX_WORDS
}

fn title_case(raw: &str) -> String {
    raw.split_whitespace()
        .map(|token| {
            let mut chars = token.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Maps a free-text exercise name to its canonical display name.
/// Unknown names are title-cased and passed through.
pub fn canonical_exercise_name(raw: &str) -> String {
    let trimmed = raw.trim();
    match find_synonym(&trimmed.to_lowercase()) {
        Some(canonical) => canonical.to_string(),
        None => title_case(trimmed),
    }
}

pub fn movement_group(name: &str) -> Option<MovementGroup> {
    EXERCISE_INFO.iter().find(|e| e.name == name).map(|e| e.group)
}

/// Coaching cues for a canonical exercise name, falling back to generic cues.
pub fn technique_hints(name: &str) -> &'static [&'static str] {
    EXERCISE_INFO
        .iter()
        .find(|e| e.name == name)
        .map(|e| e.hints)
        .unwrap_or(GENERIC_HINTS)
}

fn strip_list_marker(line: &str) -> &str {
    line.trim_start_matches(['-', '*', '•', '–', '>'])
        .trim_start()
}

/// Pulls "(…)" annotations out of a line. Returns the cleaned line and the
/// joined annotation text.
fn split_notes(line: &str) -> (String, Option<String>) {
    let Some(re) = NOTES_RE.as_ref() else {
        return (line.to_string(), None);
    };
    let notes: Vec<&str> = re
        .captures_iter(line)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
        .collect();
    let cleaned = re.replace_all(line, " ").to_string();
    let notes = if notes.is_empty() {
        None
    } else {
        Some(notes.join("; "))
    };
    (cleaned, notes)
}

/// Detects whether a log line starts with an exercise name.
///
/// Known synonyms count unless they are buried in chatter. Unknown names
/// count when the head is short and free of chatter words. Text after an
/// unknown name must look like a set.
pub fn exercise_header(line: &str) -> Option<ExerciseHeader> {
    let line = strip_list_marker(line.trim());
    let (line, notes) = split_notes(line);

    let split_at = line.find(|c: char| c.is_ascii_digit()).unwrap_or(line.len());
    let (head, remainder) = line.split_at(split_at);
    let head = head
        .trim()
        .trim_end_matches([':', '-', '–', ',', '=', '@'])
        .trim();
    let remainder = remainder.trim();

    if head.is_empty() || !head.chars().any(char::is_alphabetic) {
        return None;
    }

    let lower = head.to_lowercase();
    if let Some((raw, canonical)) = find_synonym_entry(&lower) {
        if !is_synonym_header(&lower, raw) {
            return None;
        }
        return Some(ExerciseHeader {
            name: canonical.to_string(),
            notes,
            remainder: remainder.to_string(),
        });
    }

    let words: Vec<&str> = lower.split_whitespace().collect();
    if words.len() > MAX_HEADER_WORDS {
        return None;
    }
    let is_chatter = words.iter().any(|w| {
        w.trim_matches(|c: char| !c.is_alphanumeric()).chars().count() < 2 || is_chatter_word(w)
    });
    if is_chatter {
        return None;
    }
    if !remainder.is_empty() && !has_set_shape(remainder) {
        return None;
    }

    Some(ExerciseHeader {
        name: title_case(head),
        notes,
        remainder: remainder.to_string(),
    })
}
