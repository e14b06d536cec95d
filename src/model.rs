//! Member records handed to the layout core by the frontend.

use serde::{Deserialize, Serialize};

/// A team member as the frontend stores it.
///
/// Only `id`, `rank` and `relations` drive the algorithms; the rest is
/// carried through so renderers can label what was placed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub position: String,
    /// Importance weight. Higher rank => larger bubble.
    #[serde(default)]
    pub rank: f64,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default, alias = "profilePicUrl")]
    pub image: Option<String>,
    /// Ids this member reports to. May dangle, may form cycles.
    #[serde(default, alias = "connections")]
    pub relations: Vec<String>,
}

impl Member {
    pub fn new(id: impl Into<String>, rank: f64) -> Self {
        Self {
            id: id.into(),
            rank,
            ..Self::default()
        }
    }

    pub fn with_relations<I, S>(mut self, relations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.relations = relations.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_position(mut self, position: impl Into<String>) -> Self {
        self.position = position.into();
        self
    }

    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    /// Rank as the placement engine sees it: negative values and NaN count
    /// as zero. `+inf` is kept and sizes as the view maximum.
    pub fn effective_rank(&self) -> f64 {
        if self.rank.is_nan() { 0.0 } else { self.rank.max(0.0) }
    }

    pub fn reports_to(&self, id: &str) -> bool {
        self.relations.iter().any(|r| r == id)
    }
}
