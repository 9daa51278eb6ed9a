pub mod audit;
pub mod error;
pub mod types;
