//! Core types and trait definitions for the tribal lands toolkit.
//!
//! This crate is deliberately free of HTTP and database dependencies. The
//! store, lookup client and mapper all depend on it; it depends on nothing
//! proprietary.

pub mod error;
pub mod facility;
pub mod land;
pub mod mapping;
pub mod member;
pub mod source;
pub mod store;
pub mod tribe;

pub use error::{Error, Result};
