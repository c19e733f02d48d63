pub mod database;
pub mod models;
pub mod swap_repository;

pub use database::Database;
pub use models::SwapRecord;
pub use swap_repository::{StoreError, SwapRepository, SwapStore, DUPLICATE_KEYWORD};
