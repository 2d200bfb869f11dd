//! Core types and trait definitions for the Voti grade tracker.
//!
//! No HTTP or database dependencies; every other crate builds on this one.

// `Send` bounds are spelled out on the `GradeStore` signatures.
#![allow(async_fn_in_trait)]

pub mod aggregate;
pub mod error;
pub mod grade;
pub mod provision;
pub mod store;
pub mod user;

pub use error::{Error, Result};
