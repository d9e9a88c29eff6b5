//! Single set-line parsing.
//!
//! Three patterns are tried in order, each paired with its own extractor:
//!
//! 1. `10x 68kg rpe 7` (reps prefix, weight, unit, rpe)
//! 2. `10 wiederholungen 68kg rpe 7` (reps with suffix, weight, unit, rpe)
//! 3. `68kg 10x rpe7` (weight first, reps, mandatory rpe)
//!
//! An extractor may decline its match, in which case the next pattern gets
//! a turn. Patterns 1 and 2 fall back to a bare reps token anywhere in the
//! line when they matched without one. A missing RPE is looked up the same
//! way, so "(rpe 8)" in trailing text still counts. Lines shaped like
//! `3 x 10 x 80kg` (sets x reps x weight) are not treated as one set.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::models::training::{SetEntry, WeightUnit};

pub const LB_TO_KG: f64 = 0.45359237;
const RPE_MAX: f64 = 10.0;

const UNIT: &str = r"(kgs?|kilos?|kilogramm|lbs?|pfund)";
const NUMBER: &str = r"(\d+(?:\.\d+)?)";
const RPE: &str = r"(?:rpe|@)\s*(\d+(?:\.\d+)?)";
/// Trailing free text is allowed, but not another number right away. A
/// closing point or punctuation mark may follow the last number directly.
const TAIL: &str = r"(?P<tail>\.(?:\s+\D.*)?|[^\w\s.].*|\s+\D.*)?$";

#[derive(Debug, Clone, PartialEq)]
struct RawSet {
    reps: Option<u32>,
    weight: f64,
    unit: Option<WeightUnit>,
    rpe: Option<f64>,
}

struct SetPattern {
    name: &'static str,
    regex: Regex,
    extract: fn(&Captures) -> Option<RawSet>,
    reps_fallback: bool,
}

fn number<T: std::str::FromStr>(caps: &Captures, idx: usize) -> Option<T> {
    caps.get(idx).and_then(|m| m.as_str().parse().ok())
}

fn unit(caps: &Captures, idx: usize) -> Option<WeightUnit> {
    let raw = caps.get(idx)?.as_str();
    if raw.starts_with('k') {
        Some(WeightUnit::Kg)
    } else {
        // lb, lbs, pfund
        Some(WeightUnit::Lb)
    }
}

fn extract_reps_first(caps: &Captures) -> Option<RawSet> {
    let set = RawSet {
        reps: number(caps, 1),
        weight: number(caps, 2)?,
        unit: unit(caps, 3),
        rpe: number(caps, 4),
    };
    // A lone unitless number is not a set
    if set.reps.is_none() && set.unit.is_none() {
        return None;
    }
    Some(set)
}

fn extract_reps_suffix(caps: &Captures) -> Option<RawSet> {
    Some(RawSet {
        reps: number(caps, 1),
        weight: number(caps, 2)?,
        unit: unit(caps, 3),
        rpe: number(caps, 4),
    })
}

fn extract_weight_first(caps: &Captures) -> Option<RawSet> {
    Some(RawSet {
        weight: number(caps, 1)?,
        unit: unit(caps, 2),
        reps: number(caps, 3),
        rpe: number(caps, 4),
    })
}

fn build_pattern(
    name: &'static str,
    source: String,
    extract: fn(&Captures) -> Option<RawSet>,
    reps_fallback: bool,
) -> Option<SetPattern> {
    match Regex::new(&source) {
        Ok(regex) => Some(SetPattern {
            name,
            regex,
            extract,
            reps_fallback,
        }),
        Err(e) => {
            tracing::warn!(pattern = name, error = %e, "Skipping invalid set pattern");
            None
        }
    }
}

static SET_PATTERNS: LazyLock<Vec<SetPattern>> = LazyLock::new(|| {
    [
        build_pattern(
            "reps_x_weight",
            format!(r"^(?:(\d+)\s*[x×]\s*)?{NUMBER}\s*{UNIT}?(?:\s*{RPE})?{TAIL}"),
            extract_reps_first,
            true,
        ),
        build_pattern(
            "reps_suffix_weight",
            format!(
                r"^(\d+)\s*(?:wiederholungen|wdh\.?|reps?)?\s+{NUMBER}\s*{UNIT}?(?:\s*{RPE})?{TAIL}"
            ),
            extract_reps_suffix,
            true,
        ),
        build_pattern(
            "weight_first",
            format!(
                r"^{NUMBER}(?:\s*{UNIT}\s*|\s+)(\d+)\s*(?:[x×]|wiederholungen|wdh\.?|reps?)\s*{RPE}{TAIL}"
            ),
            extract_weight_first,
            false,
        ),
    ]
    .into_iter()
    .flatten()
    .collect()
});

static RPE_FALLBACK_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(RPE).ok());

/// "3 x 10 x 80kg" continues with another factor after a unitless number
static CHAINED_FACTOR_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^\s*[x×]\s*\d").ok());

static REPS_FALLBACK_RE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"\b(\d+)\s*(?:wiederholungen|wdh|reps?|[x×])|[x×]\s*(\d+)\b").ok()
});

static SET_LABEL_RE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^(?:[-*•–>]+\s*|(?:satz|set)\s*\d+\s*[:.)\-]?\s*|\d+[.)]\s+)").ok()
});

static DECIMAL_COMMA_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(\d),(\d)").ok());

static SET_SHAPE_RE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\d+\s*(?:[x×]|wdh\.?|wiederholungen)\s*\d+|\d+(?:[.,]\d+)?\s*(?:kg|lbs?)\s*\d+\s*(?:[x×]|wdh)|\d+(?:[.,]\d+)?\s*(?:kg|lbs?)\s*[x×]\s*\d+",
    )
    .ok()
});

/// Lower-cases, turns decimal commas into points and other commas into
/// spaces, collapses whitespace and strips bullets and "Satz N:" labels.
fn normalize(line: &str) -> String {
    let lower = line.to_lowercase();
    let lower = match DECIMAL_COMMA_RE.as_ref() {
        Some(re) => re.replace_all(&lower, "$1.$2").to_string(),
        None => lower,
    };
    let lower = lower.replace(',', " ");
    let mut normalized = lower.split_whitespace().collect::<Vec<_>>().join(" ");

    if let Some(re) = SET_LABEL_RE.as_ref() {
        // "- Satz 1: …" carries two labels
        for _ in 0..2 {
            let stripped = re.replace(&normalized, "").to_string();
            if stripped == normalized {
                break;
            }
            normalized = stripped;
        }
    }
    normalized
}

fn fallback_reps(line: &str) -> Option<u32> {
    let caps = REPS_FALLBACK_RE.as_ref()?.captures(line)?;
    number(&caps, 1).or_else(|| number(&caps, 2))
}

fn fallback_rpe(line: &str) -> Option<f64> {
    let caps = RPE_FALLBACK_RE.as_ref()?.captures(line)?;
    number(&caps, 1)
}

fn is_chained_factor(caps: &Captures, raw: &RawSet) -> bool {
    let tail = caps.name("tail").map_or("", |m| m.as_str());
    raw.unit.is_none()
        && CHAINED_FACTOR_RE
            .as_ref()
            .is_some_and(|re| re.is_match(tail))
}

fn to_kg(weight: f64, unit: Option<WeightUnit>) -> f64 {
    match unit {
        Some(WeightUnit::Lb) => (weight * LB_TO_KG * 10.0).round() / 10.0,
        _ => weight,
    }
}

/// True when the text contains something shaped like reps × weight.
pub fn has_set_shape(text: &str) -> bool {
    SET_SHAPE_RE.as_ref().is_some_and(|re| re.is_match(text))
}

/// Parses one free-text line into a set, or `None` if it is not a set line.
pub fn parse_set_line(line: &str) -> Option<SetEntry> {
    let normalized = normalize(line);
    if normalized.is_empty() {
        return None;
    }

    for pattern in SET_PATTERNS.iter() {
        let Some(caps) = pattern.regex.captures(&normalized) else {
            continue;
        };
        let Some(mut raw) = (pattern.extract)(&caps) else {
            continue;
        };
        if is_chained_factor(&caps, &raw) {
            tracing::debug!(line = %normalized, pattern = pattern.name, "Ambiguous sets x reps x weight line");
            continue;
        }
        if raw.reps.is_none() && pattern.reps_fallback {
            raw.reps = fallback_reps(&normalized);
        }
        if raw.rpe.is_none() {
            raw.rpe = fallback_rpe(&normalized);
        }

        let reps = match raw.reps {
            Some(reps) if reps > 0 => reps,
            _ => {
                tracing::debug!(line = %normalized, pattern = pattern.name, "Set line without reps");
                return None;
            }
        };

        let rpe = raw.rpe.filter(|rpe| *rpe > 0.0 && *rpe <= RPE_MAX);
        if raw.rpe.is_some() && rpe.is_none() {
            tracing::debug!(line = %normalized, "Discarding out-of-range RPE");
        }

        return Some(SetEntry {
            weight: to_kg(raw.weight, raw.unit),
            reps,
            rpe,
            unit: WeightUnit::Kg,
        });
    }

    None
}
