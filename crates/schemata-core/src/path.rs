//! # Validation Paths
//!
//! A path is the ordered list of keys and indices leading from the
//! validation root to a node. Mapping keys (including the synthetic
//! `(multi: N)` and enum meta keys) are [`PathSegment::Key`]; sequence
//! positions are [`PathSegment::Index`].

use std::fmt;

use serde::{Serialize, Serializer};

/// One step of a validation path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// A mapping key.
    Key(String),
    /// A sequence position.
    Index(usize),
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(k) => f.write_str(k),
            Self::Index(i) => write!(f, "{i}"),
        }
    }
}

impl Serialize for PathSegment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Key(k) => serializer.serialize_str(k),
            Self::Index(i) => serializer.serialize_u64(*i as u64),
        }
    }
}

/// Render a path for humans: `(root)` for the empty path, otherwise
/// `$.key[0].other`.
pub fn render_path(path: &[PathSegment]) -> String {
    if path.is_empty() {
        return "(root)".to_string();
    }
    let mut out = String::from("$");
    for segment in path {
        match segment {
            PathSegment::Key(k) => {
                out.push('.');
                out.push_str(k);
            }
            PathSegment::Index(i) => {
                out.push('[');
                out.push_str(&i.to_string());
                out.push(']');
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_root() {
        assert_eq!(render_path(&[]), "(root)");
    }

    #[test]
    fn test_render_mixed_path() {
        let path = vec![
            PathSegment::from("users"),
            PathSegment::from(3usize),
            PathSegment::from("name"),
        ];
        assert_eq!(render_path(&path), "$.users[3].name");
    }

    #[test]
    fn test_serializes_keys_and_indices() {
        let path = vec![PathSegment::from("a"), PathSegment::from(1usize)];
        assert_eq!(serde_json::to_string(&path).unwrap(), r#"["a",1]"#);
    }
}
