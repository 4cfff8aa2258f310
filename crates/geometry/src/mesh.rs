use glam::Vec3;

/// Errors from mesh validation.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum MeshError {
    #[error("index buffer length {0} is not a multiple of 3")]
    PartialTriangle(usize),
    #[error("index {index} at slot {slot} is out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        slot: usize,
        index: u32,
        vertex_count: usize,
    },
    #[error("{normals} normals for {positions} positions")]
    NormalCountMismatch { positions: usize, normals: usize },
    #[error("{colors} colors for {positions} positions")]
    ColorCountMismatch { positions: usize, colors: usize },
}

/// CPU-side triangle mesh, ready for upload.
///
/// Triangles are counter-clockwise when seen from outside.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub positions: Vec<Vec3>,
    /// One normal per position.
    pub normals: Vec<Vec3>,
    /// Optional per-vertex RGBA; backends substitute opaque white when absent.
    pub colors: Option<Vec<[f32; 4]>>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterate triangles as position triples.
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| {
            [
                self.positions[t[0] as usize],
                self.positions[t[1] as usize],
                self.positions[t[2] as usize],
            ]
        })
    }

    /// Check that the buffers agree with each other.
    pub fn validate(&self) -> Result<(), MeshError> {
        if self.indices.len() % 3 != 0 {
            return Err(MeshError::PartialTriangle(self.indices.len()));
        }
        if self.normals.len() != self.positions.len() {
            return Err(MeshError::NormalCountMismatch {
                positions: self.positions.len(),
                normals: self.normals.len(),
            });
        }
        if let Some(colors) = &self.colors {
            if colors.len() != self.positions.len() {
                return Err(MeshError::ColorCountMismatch {
                    positions: self.positions.len(),
                    colors: colors.len(),
                });
            }
        }
        let vertex_count = self.positions.len();
        for (slot, &index) in self.indices.iter().enumerate() {
            if index as usize >= vertex_count {
                return Err(MeshError::IndexOutOfRange {
                    slot,
                    index,
                    vertex_count,
                });
            }
        }
        Ok(())
    }

    /// Shift every position by `offset`.
    pub fn translate(&mut self, offset: Vec3) {
        for p in &mut self.positions {
            *p += offset;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> MeshData {
        MeshData {
            positions: vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            normals: vec![Vec3::Z; 3],
            colors: None,
            indices: vec![0, 1, 2],
        }
    }

    #[test]
    fn valid_triangle() {
        let m = triangle();
        assert_eq!(m.validate(), Ok(()));
        assert_eq!(m.triangle_count(), 1);
        assert_eq!(m.triangles().count(), 1);
    }

    #[test]
    fn out_of_range_index_rejected() {
        let mut m = triangle();
        m.indices[2] = 3;
        assert_eq!(
            m.validate(),
            Err(MeshError::IndexOutOfRange {
                slot: 2,
                index: 3,
                vertex_count: 3
            })
        );
    }

    #[test]
    fn partial_triangle_rejected() {
        let mut m = triangle();
        m.indices.push(0);
        assert_eq!(m.validate(), Err(MeshError::PartialTriangle(4)));
    }

    #[test]
    fn color_count_must_match() {
        let mut m = triangle();
        m.colors = Some(vec![[1.0; 4]; 2]);
        assert!(matches!(
            m.validate(),
            Err(MeshError::ColorCountMismatch { .. })
        ));
    }

    #[test]
    fn translate_moves_positions_only() {
        let mut m = triangle();
        m.translate(Vec3::new(0.0, 0.0, 2.0));
        assert_eq!(m.positions[1], Vec3::new(1.0, 0.0, 2.0));
        assert_eq!(m.normals[1], Vec3::Z);
    }
}
