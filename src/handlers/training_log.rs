use axum::{extract::State, Json};

use crate::dto::ParseTrainingLogRequest;
use crate::error::{AppError, AppResult};
use crate::models::training::ParsedTrainingLog;
use crate::services::training_log::{parse_training_log, ParseOptions};
use crate::AppState;

pub async fn parse_log(
    State(state): State<AppState>,
    Json(body): Json<ParseTrainingLogRequest>,
) -> AppResult<Json<ParsedTrainingLog>> {
    let raw_text = body
        .raw_text
        .ok_or_else(|| AppError::BadRequest("raw_text is required".into()))?;

    let max_chars = state.config.max_log_chars;
    if raw_text.chars().count() as u64 > max_chars {
        return Err(AppError::Validation(format!(
            "raw_text must be at most {max_chars} characters"
        )));
    }

    let options = ParseOptions {
        session_date: body.session_date,
        split_type: body.split_type,
    };

    // Parsing is CPU-bound; keep it off the async worker threads
    let parsed = tokio::task::spawn_blocking(move || parse_training_log(&raw_text, &options))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Training log parser panicked: {e}")))?;

    tracing::info!(
        exercises = parsed.session.exercises.len(),
        sets = parsed.meta.sets_parsed,
        warnings = parsed.meta.warnings.len(),
        "Training log parsed"
    );

    Ok(Json(parsed))
}
