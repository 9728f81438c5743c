//! Identifier types shared across tfagate crates.
//!
//! Pure types only; no framework or storage dependencies.

pub mod id;
