pub mod health;
pub mod mood;
pub mod training_log;
