//! # schemata-core — Foundational Types
//!
//! This crate defines the data every other `schemata` crate passes around:
//! the loosely-typed [`Value`] tree, compiled regex literals ([`Pattern`]),
//! validation paths ([`PathSegment`]), and the layered [`Options`] set.
//! It knows nothing about schemas; the engine crate builds on it.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `schemata-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - Mappings preserve insertion order; positional coercion depends on it.

pub mod error;
pub mod options;
pub mod path;
pub mod pattern;
pub mod value;

// Re-export primary types for ergonomic imports.
pub use error::PatternError;
pub use options::{Options, CONFIDENTIAL_PLACEHOLDER, DEFAULT_MAX_DEPTH};
pub use path::{render_path, PathSegment};
pub use pattern::Pattern;
pub use value::{format_number, list_to_map, Map, Represent, Value};
