//! Render resource bookkeeping
//!
//! Geometry buffers of placed objects are registered when the object enters
//! the scene and released when it leaves or its geometry is replaced.

use std::collections::HashMap;
use std::fmt;

use crate::viewport::mesh::MeshData;

/// Handle of a registered geometry buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GeometryId(u64);

impl fmt::Display for GeometryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "geom#{}", self.0)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    #[error("{0} is not registered")]
    NotRegistered(GeometryId),
    #[error("geometry was never registered")]
    NoHandle,
}

/// Live geometry registry
#[derive(Debug, Default)]
pub struct ResourceRegistry {
    next_id: u64,
    /// id → triangle count
    live: HashMap<GeometryId, usize>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, mesh: &MeshData) -> GeometryId {
        self.next_id += 1;
        let id = GeometryId(self.next_id);
        self.live.insert(id, mesh.triangle_count());
        id
    }

    pub fn release(&mut self, id: Option<GeometryId>) -> Result<(), ResourceError> {
        let id = id.ok_or(ResourceError::NoHandle)?;
        self.live
            .remove(&id)
            .map(|_| ())
            .ok_or(ResourceError::NotRegistered(id))
    }

    pub fn is_live(&self, id: GeometryId) -> bool {
        self.live.contains_key(&id)
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Triangles held by live geometry
    pub fn live_triangles(&self) -> usize {
        self.live.values().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;

    fn tri() -> MeshData {
        let mut m = MeshData::new();
        let a = m.push_vertex(DVec3::ZERO);
        let b = m.push_vertex(DVec3::X);
        let c = m.push_vertex(DVec3::Z);
        m.push_triangle(a, b, c);
        m
    }

    #[test]
    fn test_register_release() {
        let mut reg = ResourceRegistry::new();
        let a = reg.register(&tri());
        let b = reg.register(&tri());
        assert_ne!(a, b);
        assert_eq!(reg.live_count(), 2);
        assert_eq!(reg.live_triangles(), 2);
        reg.release(Some(a)).unwrap();
        assert!(!reg.is_live(a));
        assert_eq!(reg.live_count(), 1);
    }

    #[test]
    fn test_double_release_errors() {
        let mut reg = ResourceRegistry::new();
        let a = reg.register(&tri());
        reg.release(Some(a)).unwrap();
        assert!(matches!(reg.release(Some(a)), Err(ResourceError::NotRegistered(_))));
        assert!(matches!(reg.release(None), Err(ResourceError::NoHandle)));
    }
}
