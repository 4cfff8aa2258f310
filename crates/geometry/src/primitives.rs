use crate::mesh::MeshData;
use glam::Vec3;

/// Quad in the XY plane spanning ±1, facing +Z.
pub fn square(center: Vec3) -> MeshData {
    let normal = Vec3::Z;
    let mut mesh = MeshData {
        positions: vec![
            Vec3::new(-1.0, -1.0, 0.0),
            Vec3::new(1.0, -1.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(-1.0, 1.0, 0.0),
        ],
        normals: vec![normal; 4],
        colors: None,
        indices: vec![0, 1, 2, 0, 2, 3],
    };
    mesh.translate(center);
    mesh
}

/// Cube spanning ±1 on every axis.
///
/// Four vertices per face so each face keeps a flat normal.
pub fn cube(center: Vec3) -> MeshData {
    let p = 1.0_f32;
    #[rustfmt::skip]
    let faces: [([f32; 3], [[f32; 3]; 4]); 6] = [
        ([0.0, 0.0, 1.0],  [[-p, -p,  p], [ p, -p,  p], [ p,  p,  p], [-p,  p,  p]]), // +Z
        ([0.0, 0.0, -1.0], [[ p, -p, -p], [-p, -p, -p], [-p,  p, -p], [ p,  p, -p]]), // -Z
        ([1.0, 0.0, 0.0],  [[ p, -p,  p], [ p, -p, -p], [ p,  p, -p], [ p,  p,  p]]), // +X
        ([-1.0, 0.0, 0.0], [[-p, -p, -p], [-p, -p,  p], [-p,  p,  p], [-p,  p, -p]]), // -X
        ([0.0, 1.0, 0.0],  [[-p,  p,  p], [ p,  p,  p], [ p,  p, -p], [-p,  p, -p]]), // +Y
        ([0.0, -1.0, 0.0], [[-p, -p, -p], [ p, -p, -p], [ p, -p,  p], [-p, -p,  p]]), // -Y
    ];

    let mut mesh = MeshData {
        positions: Vec::with_capacity(24),
        normals: Vec::with_capacity(24),
        colors: None,
        indices: Vec::with_capacity(36),
    };
    for (normal, corners) in faces {
        let base = mesh.positions.len() as u32;
        for corner in corners {
            mesh.positions.push(Vec3::from_array(corner) + center);
            mesh.normals.push(Vec3::from_array(normal));
        }
        mesh.indices
            .extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }
    mesh
}
