use crate::mesh::MeshData;
use facet_common::MAX_TESSELLATION;
use glam::Vec3;
use std::collections::HashMap;

/// Golden ratio, the icosahedron's long-to-short edge ratio.
const PHI: f32 = 1.618_034;

#[rustfmt::skip]
const ICOSAHEDRON_VERTICES: [[f32; 3]; 12] = [
    [-1.0,  PHI,  0.0], [ 1.0,  PHI,  0.0], [-1.0, -PHI,  0.0], [ 1.0, -PHI,  0.0],
    [ 0.0, -1.0,  PHI], [ 0.0,  1.0,  PHI], [ 0.0, -1.0, -PHI], [ 0.0,  1.0, -PHI],
    [ PHI,  0.0, -1.0], [ PHI,  0.0,  1.0], [-PHI,  0.0, -1.0], [-PHI,  0.0,  1.0],
];

#[rustfmt::skip]
const ICOSAHEDRON_FACES: [[u32; 3]; 20] = [
    [0, 11, 5], [0, 5, 1],  [0, 1, 7],   [0, 7, 10], [0, 10, 11],
    [1, 5, 9],  [5, 11, 4], [11, 10, 2], [10, 7, 6], [7, 1, 8],
    [3, 9, 4],  [3, 4, 2],  [3, 2, 6],   [3, 6, 8],  [3, 8, 9],
    [4, 9, 5],  [2, 4, 11], [6, 2, 10],  [8, 6, 7],  [9, 8, 1],
];

/// Vertex count of a subdivided icosphere once shared midpoints are merged.
pub fn icosphere_vertex_count(tessellation: u32) -> usize {
    10 * 4usize.pow(tessellation.min(MAX_TESSELLATION)) + 2
}

/// Triangle count of a subdivided icosphere.
pub fn icosphere_triangle_count(tessellation: u32) -> usize {
    20 * 4usize.pow(tessellation.min(MAX_TESSELLATION))
}

/// Unit-sphere subdivision state: directions plus the edge midpoint cache.
struct Subdivider {
    directions: Vec<Vec3>,
    midpoints: HashMap<(u32, u32), u32>,
}

impl Subdivider {
    fn midpoint(&mut self, a: u32, b: u32) -> u32 {
        let key = if a < b { (a, b) } else { (b, a) };
        if let Some(&index) = self.midpoints.get(&key) {
            return index;
        }
        let mid = (self.directions[a as usize] + self.directions[b as usize]).normalize();
        let index = self.directions.len() as u32;
        self.directions.push(mid);
        self.midpoints.insert(key, index);
        index
    }

    fn split(&mut self, faces: &[[u32; 3]]) -> Vec<[u32; 3]> {
        let mut out = Vec::with_capacity(faces.len() * 4);
        for &[a, b, c] in faces {
            let ab = self.midpoint(a, b);
            let bc = self.midpoint(b, c);
            let ca = self.midpoint(c, a);
            out.push([a, ab, ca]);
            out.push([b, bc, ab]);
            out.push([c, ca, bc]);
            out.push([ab, bc, ca]);
        }
        out
    }
}

/// Generate an icosphere by recursively splitting each icosahedron face into
/// four. Tessellation is clamped to `MAX_TESSELLATION`.
pub fn icosphere(center: Vec3, radius: f32, tessellation: u32) -> MeshData {
    let level = tessellation.min(MAX_TESSELLATION);
    let mut sub = Subdivider {
        directions: ICOSAHEDRON_VERTICES
            .iter()
            .map(|&v| Vec3::from_array(v).normalize())
            .collect(),
        midpoints: HashMap::new(),
    };

    let mut faces = ICOSAHEDRON_FACES.to_vec();
    for _ in 0..level {
        faces = sub.split(&faces);
        // Midpoints of the previous level are never shared with the next one.
        sub.midpoints.clear();
    }

    let positions = sub
        .directions
        .iter()
        .map(|&d| center + d * radius)
        .collect();
    let indices = faces.into_iter().flatten().collect();

    tracing::debug!(level, radius, "generated icosphere");

    MeshData {
        positions,
        normals: sub.directions,
        colors: None,
        indices,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_icosahedron() {
        let m = icosphere(Vec3::ZERO, 1.0, 0);
        assert_eq!(m.vertex_count(), 12);
        assert_eq!(m.triangle_count(), 20);
        assert!(m.validate().is_ok());
    }

    #[test]
    fn counts_for_every_level() {
        for n in 0..=MAX_TESSELLATION {
            let m = icosphere(Vec3::ZERO, 1.0, n);
            assert_eq!(m.vertex_count(), icosphere_vertex_count(n), "level {n}");
            assert_eq!(m.triangle_count(), icosphere_triangle_count(n), "level {n}");
            assert_eq!(m.triangle_count(), 20 * 4usize.pow(n));
        }
    }

    #[test]
    fn vertices_lie_on_sphere() {
        let center = Vec3::new(1.0, -2.0, 0.5);
        let radius = 2.5;
        for n in [0, 1, 3, 5] {
            let m = icosphere(center, radius, n);
            for p in &m.positions {
                let d = p.distance(center);
                assert!((d - radius).abs() < 1e-4, "level {n}: {d}");
            }
        }
    }

    #[test]
    fn normals_point_away_from_center() {
        let center = Vec3::new(0.0, 3.0, 0.0);
        let m = icosphere(center, 2.0, 2);
        for (p, n) in m.positions.iter().zip(&m.normals) {
            assert!((n.length() - 1.0).abs() < 1e-5);
            assert!((*p - center).normalize().dot(*n) > 0.9999);
        }
    }

    #[test]
    fn winding_faces_outward() {
        let m = icosphere(Vec3::ZERO, 1.0, 2);
        for [a, b, c] in m.triangles() {
            let face_normal = (b - a).cross(c - a);
            assert!(face_normal.dot(a + b + c) > 0.0);
        }
    }

    #[test]
    fn deterministic_output() {
        let a = icosphere(Vec3::ONE, 1.5, 4);
        let b = icosphere(Vec3::ONE, 1.5, 4);
        assert_eq!(a, b);
    }

    #[test]
    fn level_above_max_is_clamped() {
        assert_eq!(icosphere_vertex_count(12), icosphere_vertex_count(MAX_TESSELLATION));
        let m = icosphere(Vec3::ZERO, 1.0, MAX_TESSELLATION + 3);
        assert_eq!(m.triangle_count(), icosphere_triangle_count(MAX_TESSELLATION));
    }
}
