//! Planar ring helpers for rebuilding polygons from Esri ring lists.
//!
//! Esri polygons are a flat list of rings. Exteriors wind clockwise and
//! holes counter-clockwise, and nothing says which hole belongs to which
//! exterior. `GeoJSON` wants the opposite winding and explicit nesting, so
//! [`rings_to_polygons`] reverses every ring and assigns holes to the
//! exterior that contains them.

use arda_esri_models::{Position, Ring};

/// Returns `true` if the ring winds clockwise (y axis pointing up).
///
/// Uses the shoelace sum of `(x2 - x1) * (y2 + y1)`; degenerate rings
/// with zero area count as clockwise.
#[must_use]
pub fn ring_is_clockwise(ring: &[Position]) -> bool {
    let total: f64 = ring
        .windows(2)
        .map(|pair| (pair[1][0] - pair[0][0]) * (pair[1][1] + pair[0][1]))
        .sum();
    total >= 0.0
}

/// Returns a copy of the ring with the first position repeated at the
/// end if it is not already closed.
#[must_use]
pub fn close_ring(ring: &[Position]) -> Ring {
    let mut closed = ring.to_vec();
    if let (Some(first), Some(last)) = (ring.first(), ring.last()) {
        if !points_equal(first, last) {
            closed.push(first.clone());
        }
    }
    closed
}

#[allow(clippy::float_cmp)]
fn points_equal(a: &[f64], b: &[f64]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x == y)
}

/// Returns `true` if segment `a1-a2` intersects segment `b1-b2`.
///
/// Parallel and collinear segments never intersect.
#[must_use]
pub fn segments_intersect(a1: &[f64], a2: &[f64], b1: &[f64], b2: &[f64]) -> bool {
    let ua_t = (b2[0] - b1[0]) * (a1[1] - b1[1]) - (b2[1] - b1[1]) * (a1[0] - b1[0]);
    let ub_t = (a2[0] - a1[0]) * (a1[1] - b1[1]) - (a2[1] - a1[1]) * (a1[0] - b1[0]);
    let u_b = (b2[1] - b1[1]) * (a2[0] - a1[0]) - (b2[0] - b1[0]) * (a2[1] - a1[1]);

    if u_b == 0.0 {
        return false;
    }

    let ua = ua_t / u_b;
    let ub = ub_t / u_b;
    (0.0..=1.0).contains(&ua) && (0.0..=1.0).contains(&ub)
}

/// Returns `true` if any edge of `a` intersects any edge of `b`.
#[must_use]
pub fn rings_intersect(a: &[Position], b: &[Position]) -> bool {
    a.windows(2).any(|edge_a| {
        b.windows(2)
            .any(|edge_b| segments_intersect(&edge_a[0], &edge_a[1], &edge_b[0], &edge_b[1]))
    })
}

/// Even-odd point-in-ring test.
#[must_use]
pub fn ring_contains_point(ring: &[Position], point: &[f64]) -> bool {
    let mut contains = false;
    let Some(mut j) = ring.len().checked_sub(1) else {
        return false;
    };

    for (i, pi) in ring.iter().enumerate() {
        let pj = &ring[j];
        let crosses = (pi[1] <= point[1] && point[1] < pj[1])
            || (pj[1] <= point[1] && point[1] < pi[1]);
        if crosses && point[0] < (pj[0] - pi[0]) * (point[1] - pi[1]) / (pj[1] - pi[1]) + pi[0] {
            contains = !contains;
        }
        j = i;
    }

    contains
}

/// Returns `true` if `inner` lies entirely inside `outer`: no edges cross
/// and the first vertex of `inner` is inside `outer`.
#[must_use]
pub fn ring_contains_ring(outer: &[Position], inner: &[Position]) -> bool {
    let Some(first) = inner.first() else {
        return false;
    };
    !rings_intersect(outer, inner) && ring_contains_point(outer, first)
}

/// Rebuilds `GeoJSON` polygon coordinate arrays from an Esri ring list.
///
/// Each returned polygon is `[exterior, hole, hole, ...]` with the
/// exterior counter-clockwise and holes clockwise. Rings are closed
/// first; rings with fewer than four positions after closing are
/// dropped.
///
/// A hole goes to the most recently found exterior that contains it,
/// else to the most recent exterior it crosses, else it becomes an
/// exterior of its own.
#[must_use]
pub fn rings_to_polygons(rings: &[Ring]) -> Vec<Vec<Ring>> {
    let mut polygons: Vec<Vec<Ring>> = Vec::new();
    let mut holes: Vec<Ring> = Vec::new();

    for ring in rings {
        let mut ring = close_ring(ring);
        if ring.len() < 4 {
            continue;
        }
        let clockwise = ring_is_clockwise(&ring);
        ring.reverse();
        if clockwise {
            polygons.push(vec![ring]);
        } else {
            holes.push(ring);
        }
    }

    let mut uncontained = Vec::new();
    while let Some(hole) = holes.pop() {
        match polygons
            .iter_mut()
            .rev()
            .find(|polygon| ring_contains_ring(&polygon[0], &hole))
        {
            Some(polygon) => polygon.push(hole),
            None => uncontained.push(hole),
        }
    }

    while let Some(mut hole) = uncontained.pop() {
        match polygons
            .iter_mut()
            .rev()
            .find(|polygon| rings_intersect(&polygon[0], &hole))
        {
            Some(polygon) => polygon.push(hole),
            None => {
                hole.reverse();
                polygons.push(vec![hole]);
            }
        }
    }

    polygons
}
