pub mod batches;
pub mod cache;
pub mod export;
