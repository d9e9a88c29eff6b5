use axum::{extract::State, Json};
use validator::Validate;

use crate::dto::AnalyzeMoodRequest;
use crate::error::{AppError, AppResult};
use crate::models::mood::MoodAnalysis;
use crate::services::mood_analyzer;
use crate::AppState;

pub async fn analyze_mood(
    State(state): State<AppState>,
    Json(body): Json<AnalyzeMoodRequest>,
) -> AppResult<Json<MoodAnalysis>> {
    let text = body
        .text
        .as_deref()
        .ok_or_else(|| AppError::BadRequest("text is required".into()))?;

    let max_chars = state.config.max_message_chars;
    if text.chars().count() as u64 > max_chars {
        return Err(AppError::Validation(format!(
            "text must be at most {max_chars} characters"
        )));
    }
    body.validate()?;

    let analysis = mood_analyzer::analyze(text, body.dials.as_ref());

    tracing::info!(
        mood = %analysis.mood.mood,
        confidence = analysis.mood.confidence,
        intensity = analysis.mood.intensity_score,
        "Mood analyzed"
    );

    Ok(Json(analysis))
}
