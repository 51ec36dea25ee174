mod cap;
mod plane_slice;

pub use plane_slice::PlaneSlice;

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::error::Result;
use crate::math::{Point2, Point3, SlicePlane, Vector3, TOLERANCE};
use crate::mesh::{MaterialId, MaterialSlot, MeshSection, SliceableMesh, INSIDE_CUT_MATERIAL};

use cap::triangulate_cap;

/// What to do with the cross-section exposed by a slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapOption {
    /// Leave both halves as open shells.
    NoCap,
    /// Triangulate the cross-section into a new section on each half.
    NewCappedSection,
}

/// Splits `mesh` in place with `plane`, returning the other half.
///
/// Vertices with signed distance `>= 0` stay in `mesh`; the rest move to
/// the returned mesh. Triangles straddling the plane are cut at the exact
/// plane intersection. Both halves keep `mesh`'s material slots and section
/// layout. When every vertex lies on one side, `mesh` is left untouched and
/// `None` is returned.
///
/// # Errors
///
/// Returns an error if the cross-section cannot be triangulated.
pub fn slice_mesh(
    mesh: &mut SliceableMesh,
    plane: &SlicePlane,
    cap: CapOption,
    cap_material: Option<MaterialId>,
) -> Result<Option<SliceableMesh>> {
    let mut found_positive = false;
    let mut found_negative = false;
    for p in mesh.positions() {
        if plane.signed_distance(p) >= 0.0 {
            found_positive = true;
        } else {
            found_negative = true;
        }
    }
    if !(found_positive && found_negative) {
        return Ok(None);
    }

    let mut positive_sections = Vec::with_capacity(mesh.sections.len());
    let mut negative_sections = Vec::with_capacity(mesh.sections.len());
    let mut cut_segments: Vec<(Point2, Point2)> = Vec::new();

    for section in &mesh.sections {
        let mut splitter = SectionSplitter::new(section, plane);
        splitter.run(&mut cut_segments);
        positive_sections.push(splitter.positive);
        negative_sections.push(splitter.negative);
    }

    if cap == CapOption::NewCappedSection && !cut_segments.is_empty() {
        let triangles = triangulate_cap(&cut_segments)?;
        if !triangles.is_empty() {
            let slot = cap_slot(&mut mesh.material_slots, cap_material);
            positive_sections.push(cap_section(plane, &triangles, slot, false));
            negative_sections.push(cap_section(plane, &triangles, slot, true));
        }
    }

    tracing::trace!(
        segments = cut_segments.len(),
        sections = positive_sections.len(),
        "sliced mesh"
    );

    mesh.sections = positive_sections;
    Ok(Some(SliceableMesh {
        sections: negative_sections,
        material_slots: mesh.material_slots.clone(),
        body: mesh.body,
    }))
}

/// Finds the slot drawing `material`, preferring the inside-cut slot, or appends one.
fn cap_slot(slots: &mut Vec<MaterialSlot>, material: Option<MaterialId>) -> usize {
    let named = slots
        .iter()
        .position(|s| s.name == INSIDE_CUT_MATERIAL && s.material == material);
    if let Some(index) = named.or_else(|| slots.iter().position(|s| s.material == material)) {
        return index;
    }
    slots.push(MaterialSlot::new(INSIDE_CUT_MATERIAL, material));
    slots.len() - 1
}

/// Builds a cap section; `facing_normal` selects the side the cap faces.
fn cap_section(
    plane: &SlicePlane,
    triangles: &[[Point2; 3]],
    slot: usize,
    facing_normal: bool,
) -> MeshSection {
    let normal = if facing_normal {
        *plane.normal()
    } else {
        -*plane.normal()
    };
    let mut section = MeshSection::new(slot);
    for [a, b, c] in triangles {
        // Counter-clockwise in the plane's UV frame faces along the normal.
        let corners = if facing_normal { [a, b, c] } else { [a, c, b] };
        let tri = corners.map(|uv| section.push_vertex(plane.from_uv(uv), normal, *uv));
        section.indices.push(tri);
    }
    section
}

/// Which side of the plane a vertex belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Positive,
    Negative,
}

/// Splits one section into its positive and negative parts.
struct SectionSplitter<'a> {
    source: &'a MeshSection,
    plane: &'a SlicePlane,
    distances: Vec<f64>,
    positive: MeshSection,
    negative: MeshSection,
    positive_map: HashMap<u32, u32>,
    negative_map: HashMap<u32, u32>,
    // Sorted edge -> (index in positive, index in negative).
    intersections: HashMap<(u32, u32), (u32, u32)>,
}

impl<'a> SectionSplitter<'a> {
    fn new(source: &'a MeshSection, plane: &'a SlicePlane) -> Self {
        let distances = source
            .positions
            .iter()
            .map(|p| plane.signed_distance(p))
            .collect();
        Self {
            source,
            plane,
            distances,
            positive: MeshSection::new(source.material_slot),
            negative: MeshSection::new(source.material_slot),
            positive_map: HashMap::new(),
            negative_map: HashMap::new(),
            intersections: HashMap::new(),
        }
    }

    fn side(&self, index: u32) -> Side {
        if self.distances[index as usize] >= 0.0 {
            Side::Positive
        } else {
            Side::Negative
        }
    }

    fn run(&mut self, cut_segments: &mut Vec<(Point2, Point2)>) {
        let source = self.source;
        for &tri in &source.indices {
            let sides = tri.map(|i| self.side(i));
            if sides.iter().all(|&s| s == Side::Positive) {
                let mapped = tri.map(|i| self.map_vertex(Side::Positive, i));
                push_triangle(&mut self.positive, mapped);
                continue;
            }
            if sides.iter().all(|&s| s == Side::Negative) {
                let mapped = tri.map(|i| self.map_vertex(Side::Negative, i));
                push_triangle(&mut self.negative, mapped);
                continue;
            }

            // Rotate so the vertex alone on its side comes first; winding is kept.
            let lone = (0..3)
                .find(|&k| sides[k] != sides[(k + 1) % 3] && sides[k] != sides[(k + 2) % 3])
                .unwrap_or(0);
            let a = tri[lone];
            let b = tri[(lone + 1) % 3];
            let c = tri[(lone + 2) % 3];
            let lone_side = sides[lone];
            let other_side = match lone_side {
                Side::Positive => Side::Negative,
                Side::Negative => Side::Positive,
            };

            let ab = self.intersect(a, b);
            let ac = self.intersect(a, c);
            let pick = |pair: (u32, u32), side: Side| match side {
                Side::Positive => pair.0,
                Side::Negative => pair.1,
            };

            let a_lone = self.map_vertex(lone_side, a);
            let b_other = self.map_vertex(other_side, b);
            let c_other = self.map_vertex(other_side, c);

            let lone_section = self.section_mut(lone_side);
            push_triangle(lone_section, [a_lone, pick(ab, lone_side), pick(ac, lone_side)]);

            let other_section = self.section_mut(other_side);
            let ab_o = pick(ab, other_side);
            let ac_o = pick(ac, other_side);
            push_triangle(other_section, [ab_o, b_other, c_other]);
            push_triangle(other_section, [ab_o, c_other, ac_o]);

            let from = self.positive.positions[ab.0 as usize];
            let to = self.positive.positions[ac.0 as usize];
            if (to - from).norm() > TOLERANCE {
                cut_segments.push((self.plane.to_uv(&from), self.plane.to_uv(&to)));
            }
        }
    }

    fn section_mut(&mut self, side: Side) -> &mut MeshSection {
        match side {
            Side::Positive => &mut self.positive,
            Side::Negative => &mut self.negative,
        }
    }

    /// Maps a source vertex into one side, copying it on first use.
    fn map_vertex(&mut self, side: Side, index: u32) -> u32 {
        let map = match side {
            Side::Positive => &mut self.positive_map,
            Side::Negative => &mut self.negative_map,
        };
        if let Some(&mapped) = map.get(&index) {
            return mapped;
        }
        let i = index as usize;
        let target = match side {
            Side::Positive => &mut self.positive,
            Side::Negative => &mut self.negative,
        };
        let mapped = target.push_vertex(
            self.source.positions[i],
            self.source.normals[i],
            self.source.uvs[i],
        );
        map.insert(index, mapped);
        mapped
    }

    /// Creates (once per edge) the vertex where edge `i`-`j` crosses the plane.
    fn intersect(&mut self, i: u32, j: u32) -> (u32, u32) {
        let key = (i.min(j), i.max(j));
        if let Some(&pair) = self.intersections.get(&key) {
            return pair;
        }

        // Interpolate from a position-ordered endpoint pair so the same
        // geometric edge yields the same point in every section.
        let (from, to) = if cmp_points(
            &self.source.positions[i as usize],
            &self.source.positions[j as usize],
        ) == Ordering::Greater
        {
            (j as usize, i as usize)
        } else {
            (i as usize, j as usize)
        };
        let d_from = self.distances[from];
        let d_to = self.distances[to];
        let t = d_from / (d_from - d_to);

        let src = self.source;
        let lerped = Point3::from(src.positions[from].coords.lerp(&src.positions[to].coords, t));
        let position = self.plane.project(&lerped);
        let normal = lerp_normal(&src.normals[from], &src.normals[to], t);
        let uv = Point2::from(src.uvs[from].coords.lerp(&src.uvs[to].coords, t));

        let pair = (
            self.positive.push_vertex(position, normal, uv),
            self.negative.push_vertex(position, normal, uv),
        );
        self.intersections.insert(key, pair);
        pair
    }
}

/// Pushes a triangle unless it has collapsed to zero area.
fn push_triangle(section: &mut MeshSection, tri: [u32; 3]) {
    let [a, b, c] = tri.map(|i| section.positions[i as usize]);
    if (b - a).cross(&(c - a)).norm() > TOLERANCE {
        section.indices.push(tri);
    }
}

fn lerp_normal(a: &Vector3, b: &Vector3, t: f64) -> Vector3 {
    let n = a.lerp(b, t);
    n.try_normalize(TOLERANCE).unwrap_or(*a)
}

fn cmp_points(a: &Point3, b: &Point3) -> Ordering {
    a.x.total_cmp(&b.x)
        .then(a.y.total_cmp(&b.y))
        .then(a.z.total_cmp(&b.z))
}
