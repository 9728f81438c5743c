pub mod gate;
pub mod repository;
pub mod types;
