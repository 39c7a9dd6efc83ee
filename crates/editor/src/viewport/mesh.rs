use glam::{DMat4, DVec3};

/// CPU-side triangle mesh in object-local coordinates.
///
/// This is the geometry behind every `RenderNode::Mesh`: the viewer draws it,
/// the selection controller raycasts against it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub positions: Vec<DVec3>,
    /// Three indices per triangle, counter-clockwise seen from outside
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Append a vertex and return its index
    pub fn push_vertex(&mut self, p: DVec3) -> u32 {
        self.positions.push(p);
        (self.positions.len() - 1) as u32
    }

    pub fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    /// Quad a-b-c-d split along the a-c diagonal
    pub fn push_quad(&mut self, a: u32, b: u32, c: u32, d: u32) {
        self.indices.extend_from_slice(&[a, b, c, a, c, d]);
    }

    /// Append another mesh, offsetting its indices
    pub fn append(&mut self, other: &MeshData) {
        let base = self.positions.len() as u32;
        self.positions.extend_from_slice(&other.positions);
        self.indices.extend(other.indices.iter().map(|i| i + base));
    }

    /// Corner positions of triangle `tri`
    pub fn triangle(&self, tri: usize) -> [DVec3; 3] {
        let i = tri * 3;
        [
            self.positions[self.indices[i] as usize],
            self.positions[self.indices[i + 1] as usize],
            self.positions[self.indices[i + 2] as usize],
        ]
    }

    /// Iterate all triangles as corner triples
    pub fn triangles(&self) -> impl Iterator<Item = [DVec3; 3]> + '_ {
        (0..self.triangle_count()).map(move |t| self.triangle(t))
    }

    /// Unit normal of triangle `tri` (zero for degenerate triangles)
    pub fn face_normal(&self, tri: usize) -> DVec3 {
        let [a, b, c] = self.triangle(tri);
        (b - a).cross(c - a).normalize_or_zero()
    }

    /// Copy of the mesh with every position transformed by `matrix`
    pub fn transformed(&self, matrix: &DMat4) -> MeshData {
        MeshData {
            positions: self
                .positions
                .iter()
                .map(|p| matrix.transform_point3(*p))
                .collect(),
            indices: self.indices.clone(),
        }
    }

    /// Axis-aligned extent (max - min); zero for an empty mesh
    pub fn extent(&self) -> DVec3 {
        if self.positions.is_empty() {
            return DVec3::ZERO;
        }
        let mut min = DVec3::splat(f64::MAX);
        let mut max = DVec3::splat(f64::MIN);
        for p in &self.positions {
            min = min.min(*p);
            max = max.max(*p);
        }
        max - min
    }
}
