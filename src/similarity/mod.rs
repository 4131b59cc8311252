// Similarity: inverted index, co-occurrence engine, and the sparse matrix.
//
// Two modes share one engine: user-based compares users through the items
// they share, item-based compares items through the users they share. The
// engine only sees "entities" and "intermediaries"; the mode decides which
// side of the TrainSet plays which role.

pub mod engine;
pub mod index;
pub mod matrix;

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Which entity the similarity matrix compares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// Users are similar when they interacted with the same items.
    #[default]
    User,
    /// Items are similar when the same users interacted with them.
    Item,
}

impl Mode {
    /// Neighborhood size used when none is configured.
    pub fn default_neighbors(self) -> usize {
        match self {
            Mode::User => 80,
            Mode::Item => 10,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::User => write!(f, "user"),
            Mode::Item => write!(f, "item"),
        }
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "user" | "user-based" => Ok(Mode::User),
            "item" | "item-based" => Ok(Mode::Item),
            other => Err(format!("unknown mode '{other}' (expected user or item)")),
        }
    }
}

/// How much each shared intermediary contributes to co-occurrence, and
/// whether rows get normalized afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Weighting {
    /// Every shared intermediary counts 1.
    #[default]
    Cooccurrence,
    /// A shared intermediary counts 1 / ln(1 + |bucket|), so items everyone
    /// has (or users who have everything) say little about similarity.
    InverseFrequency,
    /// Cosine scores rescaled by the geometric mean of both rows' maxima.
    PopularityNormalized,
}

impl fmt::Display for Weighting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Weighting::Cooccurrence => write!(f, "cooccurrence"),
            Weighting::InverseFrequency => write!(f, "inverse-frequency"),
            Weighting::PopularityNormalized => write!(f, "popularity-normalized"),
        }
    }
}

impl FromStr for Weighting {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cooccurrence" | "plain" => Ok(Weighting::Cooccurrence),
            "inverse-frequency" | "iif" | "iuf" => Ok(Weighting::InverseFrequency),
            "popularity-normalized" | "norm" => Ok(Weighting::PopularityNormalized),
            other => Err(format!(
                "unknown weighting '{other}' (expected cooccurrence, inverse-frequency or popularity-normalized)"
            )),
        }
    }
}
