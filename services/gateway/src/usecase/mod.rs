pub mod clear;
pub mod gateway;
pub mod issue;
pub mod verify;
