//! Heuristic superset detection.
//!
//! Two exercises count as a superset when they alternate on consecutive
//! lines that each carry an embedded set ("Bankdrücken 10x 80kg" followed by
//! "Rudern 10x 60kg"). A name-only header line ends the current group.
//! This depends on line adjacency only; there is no grammar behind it.

use std::collections::BTreeMap;

use super::exercises::exercise_header;
use super::set_line::has_set_shape;

fn record_group(group: &mut Vec<String>, supersets: &mut BTreeMap<String, Vec<String>>) {
    if group.len() >= 2 {
        for member in group.iter() {
            let partners = supersets.entry(member.clone()).or_default();
            for other in group.iter().filter(|o| *o != member) {
                if !partners.contains(other) {
                    partners.push(other.clone());
                }
            }
        }
    }
    group.clear();
}

/// Maps each exercise that is part of a superset to its partners.
pub fn detect_supersets(text: &str) -> BTreeMap<String, Vec<String>> {
    let mut supersets = BTreeMap::new();
    let mut group: Vec<String> = Vec::new();
    let mut previous: Option<String> = None;

    for line in text.split(['\n', ';']).map(str::trim).filter(|l| !l.is_empty()) {
        let Some(header) = exercise_header(line) else {
            continue;
        };

        if has_set_shape(&header.remainder) {
            if let Some(prev) = previous.as_ref().filter(|p| **p != header.name) {
                if group.is_empty() {
                    group.push(prev.clone());
                }
                if !group.contains(&header.name) {
                    group.push(header.name.clone());
                }
            }
        } else if !group.is_empty() {
            record_group(&mut group, &mut supersets);
        }

        previous = Some(header.name);
    }
    record_group(&mut group, &mut supersets);

    if !supersets.is_empty() {
        tracing::debug!(exercises = supersets.len(), "Supersets detected");
    }
    supersets
}
