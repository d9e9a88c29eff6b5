pub mod mood_analyzer;
pub mod training_log;
