pub mod db;
pub mod delivery;
pub mod session;
pub mod sweeper;
