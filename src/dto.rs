//! # FitCoach: Request/Response DTOs
//!
//! API contract types for the HTTP boundary. Response bodies reuse the
//! model types from `crate::models` directly; only the request shapes and
//! the health payload live here.
//!
//! Conventions:
//! - `*Request`  → deserialized from client JSON body
//! - `*Response` → serialized to client JSON
//! - Structural validation is expressed via `validator` derive macros;
//!   length limits depend on runtime config and are checked in handlers

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::mood::PersonaDials;

// ============================================================================
// Health
// ============================================================================

/// GET /health
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

// ============================================================================
// Mood
// ============================================================================

/// POST /api/mood/analyze
#[derive(Debug, Deserialize, Validate)]
pub struct AnalyzeMoodRequest {
    pub text: Option<String>,
    #[validate]
    pub dials: Option<PersonaDials>,
}

// ============================================================================
// Training log
// ============================================================================

/// POST /api/training-log/parse
#[derive(Debug, Deserialize)]
pub struct ParseTrainingLogRequest {
    pub raw_text: Option<String>,
    pub session_date: Option<NaiveDate>,
    pub split_type: Option<String>,
}
