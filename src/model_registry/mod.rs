pub mod cache;
pub mod registry;
