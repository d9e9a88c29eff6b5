use std::fmt::Write;

use crate::models::training::{Exercise, TrainingSession};

use super::exercises::technique_hints;

const RPE_INCREASE_MAX: f64 = 7.0;
const RPE_HOLD_MAX: f64 = 8.5;

/// Load recommendation for the next session, based on average RPE.
pub fn progression_advice(exercise: &Exercise) -> String {
    match exercise.average_rpe() {
        None => "Keine RPE angegeben. Logge die RPE pro Satz, um eine Progressionsempfehlung zu bekommen.".to_string(),
        Some(avg) if avg <= RPE_INCREASE_MAX => format!(
            "Durchschnittliche RPE {avg:.1}: Gewicht beim nächsten Mal um 2,5-5 % steigern."
        ),
        Some(avg) if avg <= RPE_HOLD_MAX => format!(
            "Durchschnittliche RPE {avg:.1}: Gewicht halten und die Technik verfeinern."
        ),
        Some(avg) => format!(
            "Durchschnittliche RPE {avg:.1}: Gewicht reduzieren oder mehr Erholung einplanen."
        ),
    }
}

fn render_exercise(out: &mut String, index: usize, exercise: &Exercise) -> std::fmt::Result {
    writeln!(out, "## {}. {}", index + 1, exercise.name)?;
    if let Some(partners) = &exercise.superset_with {
        writeln!(out, "_Supersatz mit: {partners}_")?;
    }
    if let Some(notes) = &exercise.notes {
        writeln!(out, "_Notiz: {notes}_")?;
    }
    writeln!(out)?;

    writeln!(out, "| Satz | Gewicht | Wdh | RPE | Notizen |")?;
    writeln!(out, "|-----:|--------:|----:|----:|---------|")?;
    for (i, set) in exercise.sets.iter().enumerate() {
        let rpe = set.rpe.map_or_else(|| "-".to_string(), |r| r.to_string());
        writeln!(out, "| {} | {} kg | {} | {} | |", i + 1, set.weight, set.reps, rpe)?;
    }
    writeln!(out)?;

    writeln!(out, "**Technik-Hinweise**")?;
    for hint in technique_hints(&exercise.name) {
        writeln!(out, "- {hint}")?;
    }
    writeln!(out)?;
    writeln!(out, "**Progression:** {}", progression_advice(exercise))?;
    writeln!(out)
}

fn render_into(out: &mut String, session: &TrainingSession) -> std::fmt::Result {
    writeln!(out, "# Training vom {}", session.session_date.format("%d.%m.%Y"))?;
    writeln!(out, "**Split:** {}", session.split_type)?;
    writeln!(out)?;

    if session.exercises.is_empty() {
        writeln!(out, "_Keine Übungen erkannt._")?;
        writeln!(out)?;
    }
    for (i, exercise) in session.exercises.iter().enumerate() {
        render_exercise(out, i, exercise)?;
    }

    if let Some(notes) = &session.notes {
        writeln!(out, "**Hinweise**")?;
        for line in notes.lines() {
            writeln!(out, "> {line}")?;
        }
    }
    Ok(())
}

/// Human-readable summary of a parsed session with coaching hints.
pub fn render_markdown(session: &TrainingSession) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = render_into(&mut out, session);
    out.trim_end().to_string()
}
