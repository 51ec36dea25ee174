use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet, VecDeque};

use spade::handles::{FixedFaceHandle, FixedVertexHandle, InnerTag};
use spade::{ConstrainedDelaunayTriangulation, InsertionError, Point2 as SpadePoint2, Triangulation};

use crate::error::{GeometryError, Result};
use crate::math::{Point2, PLANE_EPSILON};

type Cdt = ConstrainedDelaunayTriangulation<SpadePoint2<f64>>;

/// Triangulates the region enclosed by a soup of cross-section segments.
///
/// Segments are the in-plane cuts of every triangle that straddled the
/// slicing plane. They are welded, inserted as constraint edges, and the
/// resulting triangles are kept by even-odd parity, so holes left by inner
/// shells stay open. Every returned triangle is counter-clockwise.
pub(crate) fn triangulate_cap(segments: &[(Point2, Point2)]) -> Result<Vec<[Point2; 3]>> {
    let mut cdt = Cdt::new();
    let mut welded: HashMap<(i64, i64), FixedVertexHandle> = HashMap::new();

    for (from, to) in segments {
        let a = insert_welded(&mut cdt, &mut welded, from)?;
        let b = insert_welded(&mut cdt, &mut welded, to)?;
        if a == b {
            continue;
        }
        if cdt.can_add_constraint(a, b) {
            cdt.add_constraint(a, b);
        } else {
            tracing::trace!("skipping cap segment crossing an existing constraint");
        }
    }

    if cdt.num_constraints() < 3 {
        return Ok(Vec::new());
    }

    let interior = classify_interior_faces(&cdt);
    let mut triangles = Vec::with_capacity(interior.len());
    for face in cdt.inner_faces() {
        if !interior.contains(&face.fix().index()) {
            continue;
        }
        let [a, b, c] = face.vertices().map(|v| {
            let p = v.position();
            Point2::new(p.x, p.y)
        });
        // spade yields counter-clockwise faces; keep the guarantee explicit.
        if (b - a).perp(&(c - a)) < 0.0 {
            triangles.push([a, c, b]);
        } else {
            triangles.push([a, b, c]);
        }
    }

    Ok(triangles)
}

/// Inserts a point, reusing the vertex of any earlier point in the same weld cell.
#[allow(clippy::cast_possible_truncation)]
fn insert_welded(
    cdt: &mut Cdt,
    welded: &mut HashMap<(i64, i64), FixedVertexHandle>,
    point: &Point2,
) -> Result<FixedVertexHandle> {
    let key = (
        (point.x / PLANE_EPSILON).round() as i64,
        (point.y / PLANE_EPSILON).round() as i64,
    );
    if let Some(&handle) = welded.get(&key) {
        return Ok(handle);
    }
    let handle = cdt
        .insert(SpadePoint2::new(point.x, point.y))
        .map_err(|e: InsertionError| GeometryError::Triangulation(format!("CDT insert: {e}")))?;
    welded.insert(key, handle);
    Ok(handle)
}

/// Even-odd fill: a face lies inside the cross-section when reaching it
/// from the outer face crosses an odd number of constraint edges.
fn classify_interior_faces(cdt: &Cdt) -> HashSet<usize> {
    let outer = cdt.outer_face().fix();
    let mut depths: HashMap<usize, u32> = HashMap::new();
    let mut queue: VecDeque<(FixedFaceHandle<InnerTag>, u32)> = VecDeque::new();

    let hull_faces = cdt
        .directed_edges()
        .filter(|edge| edge.face().fix() == outer)
        .filter_map(|edge| {
            let inner = edge.rev().face().as_inner()?;
            let crossed = cdt.is_constraint_edge(edge.as_undirected().fix());
            Some((inner.fix(), u32::from(crossed)))
        });
    for (face, depth) in hull_faces {
        if let Entry::Vacant(slot) = depths.entry(face.index()) {
            slot.insert(depth);
            queue.push_back((face, depth));
        }
    }

    while let Some((face, depth)) = queue.pop_front() {
        for edge in cdt.face(face).adjacent_edges() {
            let Some(neighbor) = edge.rev().face().as_inner() else {
                continue;
            };
            let next = depth + u32::from(cdt.is_constraint_edge(edge.as_undirected().fix()));
            if let Entry::Vacant(slot) = depths.entry(neighbor.fix().index()) {
                slot.insert(next);
                queue.push_back((neighbor.fix(), next));
            }
        }
    }

    depths
        .into_iter()
        .filter(|&(_, depth)| depth % 2 == 1)
        .map(|(index, _)| index)
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn ring(points: &[Point2]) -> Vec<(Point2, Point2)> {
        (0..points.len())
            .map(|i| (points[i], points[(i + 1) % points.len()]))
            .collect()
    }

    fn area(tris: &[[Point2; 3]]) -> f64 {
        tris.iter()
            .map(|[a, b, c]| (b - a).perp(&(c - a)) * 0.5)
            .sum()
    }

    #[test]
    fn square_cap_covers_square() {
        let segs = ring(&[p(0.0, 0.0), p(2.0, 0.0), p(2.0, 2.0), p(0.0, 2.0)]);
        let tris = triangulate_cap(&segs).unwrap();
        assert_eq!(tris.len(), 2);
        assert_relative_eq!(area(&tris), 4.0, epsilon = 1e-9);
    }

    #[test]
    fn unordered_segments_are_welded() {
        let mut segs = ring(&[p(0.0, 0.0), p(3.0, 0.0), p(0.0, 3.0)]);
        segs.reverse();
        segs[1] = (segs[1].1, segs[1].0);
        // Nudge one endpoint by less than the weld tolerance.
        segs[2].0.x += 1e-9;
        let tris = triangulate_cap(&segs).unwrap();
        assert_eq!(tris.len(), 1);
        assert_relative_eq!(area(&tris), 4.5, epsilon = 1e-6);
    }

    #[test]
    fn inner_ring_leaves_hole() {
        let mut segs = ring(&[p(0.0, 0.0), p(4.0, 0.0), p(4.0, 4.0), p(0.0, 4.0)]);
        segs.extend(ring(&[p(1.0, 1.0), p(3.0, 1.0), p(3.0, 3.0), p(1.0, 3.0)]));
        let tris = triangulate_cap(&segs).unwrap();
        assert_relative_eq!(area(&tris), 12.0, epsilon = 1e-9);
    }

    #[test]
    fn open_chain_produces_nothing() {
        let segs = vec![(p(0.0, 0.0), p(1.0, 0.0)), (p(1.0, 0.0), p(1.0, 1.0))];
        assert!(triangulate_cap(&segs).unwrap().is_empty());
    }
}
