//! Common types used across the platform

use serde::{Deserialize, Serialize};

/// Measurement unit for ingredient quantities
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    /// Grams, for weighed ingredients
    #[default]
    G,
    /// Pieces, for countable ingredients (eggs, boxes, liners)
    Piece,
}

impl Unit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::G => "g",
            Unit::Piece => "piece",
        }
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_wire_names() {
        assert_eq!(Unit::G.as_str(), "g");
        assert_eq!(Unit::Piece.to_string(), "piece");
        assert_eq!(Unit::default(), Unit::G);
    }
}
