pub mod engine;
pub mod prediction;
pub mod ranking;
