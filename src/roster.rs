//! Views over the member list used by the team pages: category tabs, team
//! colouring, org-chart marker sizes and bubble container sizing.

use serde::{Deserialize, Serialize};

use crate::model::Member;

/// Distinct category names in first-appearance order.
pub fn categories(members: &[Member]) -> Vec<&str> {
    let mut out: Vec<&str> = Vec::new();
    for c in members.iter().flat_map(|m| m.categories.iter()) {
        if !out.contains(&c.as_str()) {
            out.push(c);
        }
    }
    out
}

/// Members tagged with `category`, highest rank first. Ties keep input order.
pub fn members_for_category<'a>(members: &'a [Member], category: &str) -> Vec<&'a Member> {
    let mut out: Vec<&Member> = members
        .iter()
        .filter(|m| m.categories.iter().any(|c| c == category))
        .collect();
    out.sort_by(|a, b| b.effective_rank().total_cmp(&a.effective_rank()));
    out
}

/// First member holding exactly `position`, e.g. the org-chart root.
pub fn find_by_position<'a>(members: &'a [Member], position: &str) -> Option<&'a Member> {
    members.iter().find(|m| m.position == position)
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Team {
    Leadership,
    Technical,
    Strategic,
}

impl Team {
    pub fn classify(member: &Member) -> Team {
        if member.rank >= 90.0 || member.position.contains("Head of") {
            return Team::Leadership;
        }
        let position = member.position.to_lowercase();
        if ["strategic", "events", "graphic"].iter().any(|k| position.contains(k)) {
            Team::Strategic
        } else {
            Team::Technical
        }
    }
}

/// Org-chart marker radius.
pub fn marker_radius(member: &Member) -> f64 {
    if Team::classify(member) == Team::Leadership {
        20.0
    } else if member.position.contains("VP") || member.position.contains("Director") {
        16.0
    } else {
        12.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub max_width: f64,
    /// Horizontal space left around the cloud.
    pub side_margin: f64,
    /// Share of the viewport height the cloud may take.
    pub height_fraction: f64,
    /// `(max member count, height)`, ascending; the last entry covers the rest.
    pub height_tiers: Vec<(usize, f64)>,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            max_width: 1000.0,
            side_margin: 100.0,
            height_fraction: 0.6,
            height_tiers: vec![(4, 300.0), (8, 400.0), (12, 500.0), (usize::MAX, 600.0)],
        }
    }
}

/// Bubble container size for a viewport and member count.
///
/// Small viewports can produce non-positive sizes; the placement engine
/// rejects those with `InvalidDimensions`.
pub fn container_size(
    viewport_width: f64,
    viewport_height: f64,
    count: usize,
    cfg: &ViewportConfig,
) -> (f64, f64) {
    let width = (viewport_width - cfg.side_margin).min(cfg.max_width);
    let tier = cfg
        .height_tiers
        .iter()
        .find(|(max, _)| count <= *max)
        .or(cfg.height_tiers.last())
        .map(|(_, h)| *h)
        .unwrap_or(400.0);
    let height = (viewport_height * cfg.height_fraction).min(tier);
    (width, height)
}
