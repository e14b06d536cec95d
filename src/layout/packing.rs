// Greedy circle packing around the container center.
//
// Members are placed one at a time in descending rank. Each takes the first
// free spot found by scanning rings outward from the center, trying the
// configured strategies coarse to fine. Candidates are validated on their
// oval-compressed position, which is also the position that is returned.
//
// When no strategy finds room, a spiral walk accepts the first in-bounds spot
// (relaxed padding) whose center does not coincide with another center. When
// even that fails, the member lands on the container center.

use std::f64::consts::TAU;

use tracing::{debug, trace, warn};

use super::spatial_grid::SpatialGrid;
use super::{Bubble, Circle, PackConfig, Placement};
use crate::model::Member;

/// Upper bound on probes per ring, whatever the angular step.
const MAX_STEPS_PER_TURN: usize = 720;

/// Diameter for `rank` relative to the highest rank of the current set.
///
/// Linear between `min_diameter` (rank 0) and `max_diameter` (rank ==
/// `max_rank`), clamped to that range. A non-positive `max_rank` maps
/// everything to `min_diameter`; an infinite rank maps to `max_diameter`.
pub fn diameter_for_rank(rank: f64, max_rank: f64, cfg: &PackConfig) -> f64 {
    let ratio = if rank == f64::INFINITY {
        1.0
    } else if max_rank > 0.0 && rank.is_finite() {
        rank / max_rank
    } else {
        0.0
    };
    let d = cfg.min_diameter + (cfg.max_diameter - cfg.min_diameter) * ratio;
    let lo = cfg.min_diameter.min(cfg.max_diameter);
    let hi = cfg.min_diameter.max(cfg.max_diameter);
    d.max(lo).min(hi)
}

/// Vertical compression around the container center.
#[derive(Debug, Copy, Clone)]
struct Oval {
    center_y: f64,
    ratio: f64,
}

impl Oval {
    fn new(center_y: f64, ratio: f64) -> Self {
        let ratio = if ratio.is_finite() && ratio > 0.0 { ratio } else { 1.0 };
        Self { center_y, ratio }
    }

    fn apply(&self, c: Circle) -> Circle {
        Circle { cy: self.center_y + (c.cy - self.center_y) * self.ratio, ..c }
    }
}

/// Shared state for one `pack` call.
struct Packer<'c> {
    cfg: &'c PackConfig,
    width: f64,
    height: f64,
    cx: f64,
    cy: f64,
    oval: Oval,
    /// Compressed (rendered) circles placed so far.
    grid: SpatialGrid,
}

impl Packer<'_> {
    fn at(&self, angle: f64, distance: f64, r: f64) -> Circle {
        Circle {
            cx: self.cx + angle.cos() * distance,
            cy: self.cy + angle.sin() * distance,
            r,
        }
    }

    fn base_angle(&self, index: usize) -> f64 {
        (index as f64 * self.cfg.base_angle_step).rem_euclid(TAU)
    }

    /// Radial probing. Returns the uncompressed circle.
    ///
    /// At most `probe_max_iterations` candidates are tried, counted across
    /// all strategies. A strategy whose radial step no longer moves the
    /// distance stops after its current ring.
    fn probe(&self, index: usize, r: f64) -> Option<Circle> {
        let max_distance = self.width.max(self.height) * self.cfg.search_extent;
        let base = self.base_angle(index);
        let mut budget = self.cfg.probe_max_iterations;

        for strategy in &self.cfg.strategies {
            if !(strategy.radial_step > 0.0 && strategy.angular_step > 0.0) {
                continue;
            }
            let turn = (TAU / strategy.angular_step).ceil() as usize;
            let steps = turn.clamp(1, MAX_STEPS_PER_TURN);
            let mut distance = (strategy.start_factor * 2.0 * r).max(0.0);

            while distance < max_distance {
                for k in 0..steps {
                    if budget == 0 {
                        trace!(index, "probe budget exhausted");
                        return None;
                    }
                    budget -= 1;

                    let candidate = self.at(base + k as f64 * strategy.angular_step, distance, r);
                    let shown = self.oval.apply(candidate);
                    if shown.inside(self.width, self.height, self.cfg.padding)
                        && !self.grid.overlaps_any(&shown, self.cfg.min_gap)
                    {
                        return Some(candidate);
                    }
                }
                let next = distance + strategy.radial_step;
                if next <= distance {
                    break;
                }
                distance = next;
            }
        }
        None
    }

    /// Expanding spiral with relaxed checks.
    fn spiral(&self, index: usize, r: f64) -> Option<Circle> {
        let mut angle = self.base_angle(index);
        let mut distance = 0.0;

        for _ in 0..self.cfg.spiral_max_iterations {
            let candidate = self.at(angle, distance, r);
            let shown = self.oval.apply(candidate);
            if shown.inside(self.width, self.height, self.cfg.fallback_padding)
                && !self.grid.near_center(&shown, self.cfg.fallback_min_separation)
            {
                return Some(candidate);
            }
            angle += self.cfg.spiral_angle_step;
            distance += self.cfg.spiral_radius_step;
        }
        None
    }

    fn place_one(&self, index: usize, r: f64) -> (Circle, Placement) {
        if index == 0 {
            return (self.at(0.0, 0.0, r), Placement::Center);
        }
        if let Some(c) = self.probe(index, r) {
            return (c, Placement::Probed);
        }
        if let Some(c) = self.spiral(index, r) {
            return (c, Placement::Spiral);
        }
        (self.at(0.0, 0.0, r), Placement::LastResort)
    }
}

/// Place every member. Dimensions are already validated.
pub(super) fn pack<'a>(
    members: &'a [Member],
    width: f64,
    height: f64,
    cfg: &PackConfig,
) -> Vec<Bubble<'a>> {
    if members.is_empty() {
        return Vec::new();
    }

    let max_rank = members.iter().map(Member::effective_rank).fold(0.0, f64::max);

    // Stable: equal ranks keep input order.
    let mut order: Vec<usize> = (0..members.len()).collect();
    order.sort_by(|&a, &b| {
        members[b].effective_rank().total_cmp(&members[a].effective_rank())
    });

    let (cx, cy) = (width / 2.0, height / 2.0);
    let mut packer = Packer {
        cfg,
        width,
        height,
        cx,
        cy,
        oval: Oval::new(cy, cfg.oval_ratio),
        grid: SpatialGrid::new(cfg.max_diameter.max(cfg.min_diameter) + cfg.min_gap.max(0.0)),
    };

    let mut placed: Vec<(usize, Circle, Placement)> = Vec::with_capacity(order.len());
    for (index, &mi) in order.iter().enumerate() {
        let member = &members[mi];
        let r = diameter_for_rank(member.effective_rank(), max_rank, cfg) / 2.0;
        let (circle, placement) = packer.place_one(index, r);

        if placement.is_degraded() {
            warn!(member = %member.id, ?placement, "no overlap-free spot, degraded placement");
        } else {
            trace!(member = %member.id, x = circle.cx, y = circle.cy, r, "placed");
        }

        packer.grid.insert(packer.oval.apply(circle));
        placed.push((mi, circle, placement));
    }

    let degraded = placed.iter().filter(|(_, _, p)| p.is_degraded()).count();
    debug!(placed = packer.grid.len(), degraded, width, height, "bubble cloud packed");

    // Oval compression as the final pass.
    placed
        .into_iter()
        .map(|(mi, circle, placement)| {
            let c = packer.oval.apply(circle);
            Bubble {
                member: &members[mi],
                x: c.cx - c.r,
                y: c.cy - c.r,
                diameter: 2.0 * c.r,
                placement,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{place, place_with, SearchStrategy};
    use proptest::prelude::*;

    const EPS: f64 = 1e-6;

    fn team(ranks: &[f64]) -> Vec<Member> {
        ranks
            .iter()
            .enumerate()
            .map(|(i, &r)| Member::new(format!("m{i}"), r))
            .collect()
    }

    fn assert_no_overlap(bubbles: &[Bubble<'_>], gap: f64) {
        for (i, a) in bubbles.iter().enumerate() {
            for b in &bubbles[i + 1..] {
                let (ca, cb) = (a.circle(), b.circle());
                assert!(
                    ca.distance_to(&cb) + EPS >= ca.r + cb.r + gap,
                    "{} and {} overlap",
                    a.member.id,
                    b.member.id
                );
            }
        }
    }

    fn assert_in_bounds(bubbles: &[Bubble<'_>], w: f64, h: f64, padding: f64) {
        for b in bubbles {
            let c = b.circle();
            assert!(
                c.cx - c.r + EPS >= padding
                    && c.cy - c.r + EPS >= padding
                    && c.cx + c.r <= w - padding + EPS
                    && c.cy + c.r <= h - padding + EPS,
                "{} out of bounds",
                b.member.id
            );
        }
    }

    #[test]
    fn test_diameter_linear_in_rank() {
        let cfg = PackConfig::default();
        assert_eq!(diameter_for_rank(100.0, 100.0, &cfg), 120.0);
        assert_eq!(diameter_for_rank(0.0, 100.0, &cfg), 50.0);
        assert!((diameter_for_rank(50.0, 100.0, &cfg) - 85.0).abs() < EPS);
    }

    #[test]
    fn test_diameter_normalized_per_view() {
        let cfg = PackConfig::default();
        // Same rank, different view maximum.
        assert_eq!(diameter_for_rank(60.0, 60.0, &cfg), 120.0);
        assert!(diameter_for_rank(60.0, 100.0, &cfg) < 120.0);
    }

    #[test]
    fn test_diameter_zero_max_rank() {
        let cfg = PackConfig::default();
        assert_eq!(diameter_for_rank(0.0, 0.0, &cfg), 50.0);
    }

    #[test]
    fn test_example_scenario() {
        let members = vec![
            Member::new("p", 100.0),
            Member::new("a", 80.0).with_relations(["p"]),
            Member::new("b", 80.0).with_relations(["p"]),
        ];
        let bubbles = place(&members, 400.0, 400.0).unwrap();
        assert_eq!(bubbles.len(), 3);

        let p = &bubbles[0];
        assert_eq!(p.member.id, "p");
        assert_eq!(p.placement, Placement::Center);
        assert_eq!(p.center(), (200.0, 200.0));
        assert_eq!(p.diameter, 120.0);

        assert_eq!(bubbles[1].member.id, "a");
        assert_eq!(bubbles[2].member.id, "b");
        assert_eq!(bubbles[1].diameter, bubbles[2].diameter);
        assert!(bubbles.iter().all(|b| !b.placement.is_degraded()));

        assert_no_overlap(&bubbles, 2.0);
        assert_in_bounds(&bubbles, 400.0, 400.0, 10.0);
    }

    #[test]
    fn test_tie_goes_to_first_in_input() {
        let members = team(&[50.0, 90.0, 90.0, 10.0]);
        let bubbles = place(&members, 500.0, 400.0).unwrap();
        assert_eq!(bubbles[0].member.id, "m1");
        assert_eq!(bubbles[0].center(), (250.0, 200.0));
        let ids: Vec<&str> = bubbles.iter().map(|b| b.member.id.as_str()).collect();
        assert_eq!(ids, vec!["m1", "m2", "m0", "m3"]);
    }

    #[test]
    fn test_all_zero_rank_does_not_crash() {
        let members = team(&[0.0, 0.0, 0.0]);
        let bubbles = place(&members, 300.0, 300.0).unwrap();
        assert_eq!(bubbles.len(), 3);
        assert!(bubbles.iter().all(|b| b.diameter == 50.0));
        assert_no_overlap(&bubbles, 2.0);
    }

    #[test]
    fn test_negative_rank_clamped_to_min() {
        let members = team(&[100.0, -20.0]);
        let bubbles = place(&members, 400.0, 400.0).unwrap();
        assert_eq!(bubbles[1].member.id, "m1");
        assert_eq!(bubbles[1].diameter, 50.0);
    }

    #[test]
    fn test_single_member_centered() {
        let members = team(&[7.0]);
        let bubbles = place(&members, 300.0, 200.0).unwrap();
        assert_eq!(bubbles.len(), 1);
        assert_eq!(bubbles[0].center(), (150.0, 100.0));
        assert_eq!(bubbles[0].diameter, 120.0);
    }

    #[test]
    fn test_no_overlap_realistic_team() {
        let ranks = [100.0, 95.0, 85.0, 85.0, 80.0, 80.0, 80.0, 70.0, 60.0, 60.0, 50.0, 50.0];
        let members = team(&ranks);
        let bubbles = place(&members, 1000.0, 500.0).unwrap();
        assert_eq!(bubbles.len(), ranks.len());
        assert!(bubbles.iter().all(|b| !b.placement.is_degraded()));
        assert_no_overlap(&bubbles, 2.0);
        assert_in_bounds(&bubbles, 1000.0, 500.0, 10.0);
    }

    #[test]
    fn test_overcrowded_uses_last_resort() {
        // Nothing but the first bubble can fit a 40x40 box.
        let members = team(&[10.0, 5.0]);
        let bubbles = place(&members, 40.0, 40.0).unwrap();
        assert_eq!(bubbles[0].placement, Placement::Center);
        assert_eq!(bubbles[1].placement, Placement::LastResort);
        assert_eq!(bubbles[1].center(), (20.0, 20.0));
    }

    #[test]
    fn test_spiral_fallback_when_probe_exhausted() {
        // A gap no container can honour forces every probe to fail.
        let cfg = PackConfig { min_gap: 10_000.0, ..PackConfig::default() };
        let members = team(&[10.0, 5.0, 5.0]);
        let bubbles = place_with(&members, 400.0, 400.0, &cfg).unwrap();
        assert_eq!(bubbles[0].placement, Placement::Center);
        assert_eq!(bubbles[1].placement, Placement::Spiral);
        assert_eq!(bubbles[2].placement, Placement::Spiral);

        // Relaxed checks still avoid coincident centers and stay in bounds.
        for (i, a) in bubbles.iter().enumerate() {
            for b in &bubbles[i + 1..] {
                assert!(a.circle().distance_to(&b.circle()) + EPS >= cfg.fallback_min_separation);
            }
        }
        assert_in_bounds(&bubbles, 400.0, 400.0, cfg.fallback_padding);
    }

    #[test]
    fn test_oval_compression_keeps_root_centered() {
        let members = team(&[100.0, 10.0, 10.0, 10.0, 10.0]);
        let flat = PackConfig { oval_ratio: 1.0, ..PackConfig::default() };
        let oval = place(&members, 500.0, 500.0).unwrap();
        let round = place_with(&members, 500.0, 500.0, &flat).unwrap();
        assert_eq!(oval[0].center(), round[0].center());
        assert_no_overlap(&oval, 2.0);
        assert_no_overlap(&round, 2.0);
    }

    #[test]
    fn test_degenerate_strategies_are_skipped() {
        let cfg = PackConfig {
            strategies: vec![
                SearchStrategy { start_factor: 0.5, radial_step: 0.0, angular_step: 0.1 },
                SearchStrategy { start_factor: 0.5, radial_step: 2.0, angular_step: 0.2 },
            ],
            ..PackConfig::default()
        };
        let members = team(&[100.0, 50.0]);
        let bubbles = place_with(&members, 400.0, 400.0, &cfg).unwrap();
        assert_eq!(bubbles[1].placement, Placement::Probed);
    }

    #[test]
    fn test_diameter_infinite_rank_is_max() {
        let cfg = PackConfig::default();
        assert_eq!(diameter_for_rank(f64::INFINITY, f64::INFINITY, &cfg), 120.0);
        assert_eq!(diameter_for_rank(100.0, f64::INFINITY, &cfg), 50.0);

        let members = team(&[100.0, f64::INFINITY]);
        let bubbles = place(&members, 400.0, 400.0).unwrap();
        assert_eq!(bubbles[0].member.id, "m1");
        assert_eq!(bubbles[0].diameter, 120.0);
        assert!(bubbles[0].diameter >= bubbles[1].diameter);
    }

    #[test]
    fn test_tiny_radial_step_terminates() {
        // The step vanishes against the start distance, so each ring is the same.
        let cfg = PackConfig {
            min_gap: 10_000.0,
            strategies: vec![SearchStrategy {
                start_factor: 0.6,
                radial_step: 1e-20,
                angular_step: 0.5,
            }],
            ..PackConfig::default()
        };
        let members = team(&[10.0, 5.0]);
        let bubbles = place_with(&members, 400.0, 400.0, &cfg).unwrap();
        assert_eq!(bubbles[1].placement, Placement::Spiral);
    }

    #[test]
    fn test_tiny_angular_step_is_capped() {
        let cfg = PackConfig {
            strategies: vec![SearchStrategy {
                start_factor: 0.6,
                radial_step: 2.0,
                angular_step: 1e-300,
            }],
            ..PackConfig::default()
        };
        let members = team(&[100.0, 50.0]);
        let bubbles = place_with(&members, 400.0, 400.0, &cfg).unwrap();
        assert_eq!(bubbles.len(), 2);
        assert_ne!(bubbles[1].placement, Placement::LastResort);
    }

    #[test]
    fn test_probe_budget_bounds_wide_container() {
        // Only the root fits a 40px tall strip; the probe must give up on
        // its budget rather than walk two million pixels of rings.
        let members = team(&[10.0, 5.0]);
        let bubbles = place(&members, 2.0e6, 40.0).unwrap();
        assert_eq!(bubbles[0].placement, Placement::Center);
        assert_eq!(bubbles[1].placement, Placement::LastResort);
    }

    #[test]
    fn test_zero_probe_budget_falls_back_to_spiral() {
        let cfg = PackConfig { probe_max_iterations: 0, ..PackConfig::default() };
        let members = team(&[100.0, 50.0]);
        let bubbles = place_with(&members, 400.0, 400.0, &cfg).unwrap();
        assert_eq!(bubbles[1].placement, Placement::Spiral);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        #[test]
        fn prop_no_overlap_and_in_bounds(ranks in proptest::collection::vec(0.0f64..100.0, 1..10)) {
            let members = team(&ranks);
            let bubbles = place(&members, 900.0, 600.0).unwrap();
            prop_assert_eq!(bubbles.len(), ranks.len());
            prop_assert!(bubbles.iter().all(|b| !b.placement.is_degraded()));
            assert_no_overlap(&bubbles, 2.0);
            assert_in_bounds(&bubbles, 900.0, 600.0, 10.0);
        }

        #[test]
        fn prop_deterministic(ranks in proptest::collection::vec(0.0f64..100.0, 1..12)) {
            let members = team(&ranks);
            let a = place(&members, 700.0, 500.0).unwrap();
            let b = place(&members, 700.0, 500.0).unwrap();
            prop_assert_eq!(a, b);
        }

        #[test]
        fn prop_size_monotonic(ranks in proptest::collection::vec(0.0f64..100.0, 2..12)) {
            let members = team(&ranks);
            let bubbles = place(&members, 800.0, 600.0).unwrap();
            for a in &bubbles {
                for b in &bubbles {
                    if a.member.rank > b.member.rank {
                        prop_assert!(a.diameter >= b.diameter);
                    }
                }
            }
        }

        #[test]
        fn prop_highest_rank_at_center(ranks in proptest::collection::vec(0.0f64..100.0, 1..10)) {
            let members = team(&ranks);
            let bubbles = place(&members, 640.0, 480.0).unwrap();
            let max = ranks.iter().cloned().fold(f64::MIN, f64::max);
            let first = ranks.iter().position(|&r| r == max).unwrap();
            prop_assert_eq!(&bubbles[0].member.id, &format!("m{first}"));
            prop_assert_eq!(bubbles[0].center(), (320.0, 240.0));
        }
    }
}
