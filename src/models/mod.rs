pub mod mood;
pub mod training;
