// Bubble cloud layout.
//
// Packs one circle per member into a bounded container:
// - Deterministic: no randomness, no time budgets
// - Highest rank first, centered exactly in the container
// - Everyone else greedily takes the nearest free spot to the center
// - No overlap and inside padded bounds (best-effort under extreme density)
// - Sizes normalized against the highest rank of the current view
//
// Submodules:
// - spatial_grid: bucketed overlap queries
// - packing: size mapping, radial probing, spiral fallback
// - links: decorative connectors and overlap diagnostics
//
// Output:
// - Vec<Bubble> in placement order (descending rank).

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::error::LayoutError;
use crate::model::Member;

mod spatial_grid;
mod packing;
mod links;

pub use links::{nearby_links, overlapping_pairs, BubbleLink, DEFAULT_LINK_DISTANCE};
pub use packing::diameter_for_rank;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Circle {
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
}

impl Circle {
    pub fn distance_to(&self, other: &Circle) -> f64 {
        (self.cx - other.cx).hypot(self.cy - other.cy)
    }

    /// True when the two circumferences are closer than `gap`.
    pub fn overlaps(&self, other: &Circle, gap: f64) -> bool {
        self.distance_to(other) < self.r + other.r + gap
    }

    /// True when the whole circle lies within `[padding, dim - padding]`.
    pub fn inside(&self, width: f64, height: f64, padding: f64) -> bool {
        self.cx - self.r >= padding
            && self.cy - self.r >= padding
            && self.cx + self.r <= width - padding
            && self.cy + self.r <= height - padding
    }
}

/// One radial/angular step configuration of the placement search.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchStrategy {
    /// First probe distance from the center, as a multiple of the diameter.
    pub start_factor: f64,
    /// Distance added after each full turn.
    pub radial_step: f64,
    /// Angle between probes on one turn, in radians.
    pub angular_step: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackConfig {
    /// Diameter for the lowest rank (and for rank zero).
    pub min_diameter: f64,
    /// Diameter for the highest rank in the current set.
    pub max_diameter: f64,
    /// Clearance between a bubble and the container edge.
    pub padding: f64,
    /// Clearance between two bubble circumferences.
    pub min_gap: f64,
    /// Vertical scale applied around the center. 1.0 disables the oval.
    pub oval_ratio: f64,
    /// Max probe distance as a fraction of max(width, height).
    pub search_extent: f64,
    /// Start angle of member `i` is `i * base_angle_step` (mod 2π).
    pub base_angle_step: f64,
    /// Tried in order, coarse to fine.
    pub strategies: Vec<SearchStrategy>,
    /// Candidates the radial probe may test per member, across all strategies.
    pub probe_max_iterations: usize,
    /// Edge clearance accepted by the spiral fallback.
    pub fallback_padding: f64,
    /// Minimum center distance accepted by the spiral fallback.
    pub fallback_min_separation: f64,
    pub spiral_angle_step: f64,
    pub spiral_radius_step: f64,
    pub spiral_max_iterations: usize,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            min_diameter: 50.0,
            max_diameter: 120.0,
            padding: 10.0,
            min_gap: 2.0,
            oval_ratio: 0.75,
            search_extent: 0.8,
            base_angle_step: PI / 7.0,
            strategies: vec![
                SearchStrategy { start_factor: 0.6, radial_step: 6.0, angular_step: PI / 9.0 },
                SearchStrategy { start_factor: 0.6, radial_step: 2.0, angular_step: PI / 18.0 },
                SearchStrategy { start_factor: 0.3, radial_step: 1.0, angular_step: PI / 36.0 },
            ],
            probe_max_iterations: 20_000,
            fallback_padding: 2.0,
            fallback_min_separation: 0.5,
            spiral_angle_step: 0.35,
            spiral_radius_step: 0.5,
            spiral_max_iterations: 5000,
        }
    }
}

/// How a bubble ended up where it is.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    /// Highest rank, container center.
    Center,
    /// Found by the radial probe: no overlap, padded bounds.
    Probed,
    /// Spiral fallback: relaxed bounds, only exact coincidence avoided.
    Spiral,
    /// Nothing fit; centered on the container. May overlap.
    LastResort,
}

impl Placement {
    pub fn is_degraded(self) -> bool {
        matches!(self, Placement::Spiral | Placement::LastResort)
    }
}

/// A placed member. `x`/`y` is the top-left of the bounding square.
#[derive(Debug, Clone, PartialEq)]
pub struct Bubble<'a> {
    pub member: &'a Member,
    pub x: f64,
    pub y: f64,
    pub diameter: f64,
    pub placement: Placement,
}

impl Bubble<'_> {
    pub fn radius(&self) -> f64 {
        self.diameter / 2.0
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.radius(), self.y + self.radius())
    }

    pub fn circle(&self) -> Circle {
        let (cx, cy) = self.center();
        Circle { cx, cy, r: self.radius() }
    }
}

/// Lay out `members` in a `width` x `height` container with default tuning.
pub fn place(members: &[Member], width: f64, height: f64) -> Result<Vec<Bubble<'_>>, LayoutError> {
    place_with(members, width, height, &PackConfig::default())
}

/// Lay out `members` with explicit tuning.
///
/// Fails only on non-positive dimensions. Overcrowded containers degrade
/// (see [`Placement`]) rather than erroring.
pub fn place_with<'a>(
    members: &'a [Member],
    width: f64,
    height: f64,
    cfg: &PackConfig,
) -> Result<Vec<Bubble<'a>>, LayoutError> {
    if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
        return Err(LayoutError::InvalidDimensions { width, height });
    }
    Ok(packing::pack(members, width, height, cfg))
}
