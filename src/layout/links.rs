// Post-layout helpers over placed bubbles.

use serde::Serialize;

use super::Bubble;

/// Longest connector drawn between consecutive bubbles.
pub const DEFAULT_LINK_DISTANCE: f64 = 150.0;

/// A decorative connector between two bubble centers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BubbleLink {
    pub from: String,
    pub to: String,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

/// Link each bubble to the next one in placement order when their centers
/// are at most `max_distance` apart.
pub fn nearby_links(bubbles: &[Bubble<'_>], max_distance: f64) -> Vec<BubbleLink> {
    bubbles
        .windows(2)
        .filter_map(|pair| {
            let (a, b) = (&pair[0], &pair[1]);
            let ((x1, y1), (x2, y2)) = (a.center(), b.center());
            if (x2 - x1).hypot(y2 - y1) > max_distance {
                return None;
            }
            Some(BubbleLink {
                from: a.member.id.clone(),
                to: b.member.id.clone(),
                x1,
                y1,
                x2,
                y2,
            })
        })
        .collect()
}

/// Index pairs whose circumferences are closer than `gap`.
/// Empty for any layout that did not degrade.
pub fn overlapping_pairs(bubbles: &[Bubble<'_>], gap: f64) -> Vec<(usize, usize)> {
    let circles: Vec<_> = bubbles.iter().map(Bubble::circle).collect();
    let mut pairs = Vec::new();
    for (i, a) in circles.iter().enumerate() {
        for (j, b) in circles.iter().enumerate().skip(i + 1) {
            // Tolerate float noise from the top-left round trip.
            if a.overlaps(b, gap - 1e-9) {
                pairs.push((i, j));
            }
        }
    }
    pairs
}
