//! # Error Types
//!
//! Errors raised while building core values. Validation failures are never
//! reported through these types: a value that does not conform to a schema
//! produces diagnostics, not a Rust error. The regex primitive turns a
//! [`PatternError`] into an `invalid regex` diagnostic.

use thiserror::Error;

/// Error while parsing a `/pattern/flags` literal or compiling its pattern.
#[derive(Error, Debug)]
pub enum PatternError {
    /// The text is not of the form `/pattern/flags`.
    #[error("malformed regex literal {literal:?}: expected /pattern/flags")]
    MalformedLiteral {
        /// The rejected literal.
        literal: String,
    },

    /// The flag set contains something other than `i` and `m`.
    #[error("unsupported regex flags {flags:?}: only 'i' and 'm' are allowed")]
    UnsupportedFlags {
        /// The rejected flags.
        flags: String,
    },

    /// The pattern body failed to compile.
    #[error("invalid pattern {source_text:?}: {reason}")]
    Compile {
        /// The pattern body.
        source_text: String,
        /// Compiler message.
        reason: String,
    },
}
