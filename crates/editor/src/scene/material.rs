use std::rc::Rc;

use shared::Color;

/// Shared, immutable material. Identity (`Rc::ptr_eq`) matters: view-mode and
/// highlight restoration hand back the exact reference that was swapped out.
pub type MaterialRef = Rc<Material>;

/// Surface or line material
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub color: Color,
    /// 1.0 = opaque
    pub opacity: f64,
    /// Draw triangle edges only
    pub wireframe: bool,
    /// Highlight tint added on top of the base color
    pub emissive: Option<Color>,
}

impl Material {
    /// Opaque surface material
    pub fn solid(color: Color) -> Self {
        Self {
            color,
            opacity: 1.0,
            wireframe: false,
            emissive: None,
        }
    }

    /// Semi-transparent surface (sketch previews, work plane)
    pub fn translucent(color: Color, opacity: f64) -> Self {
        Self {
            opacity: opacity.clamp(0.0, 1.0),
            ..Self::solid(color)
        }
    }

    /// Line material for strokes and helpers
    pub fn line(color: Color) -> Self {
        Self::solid(color)
    }

    /// Flat black wireframe
    pub fn wireframe() -> Self {
        Self {
            wireframe: true,
            ..Self::solid(Color::BLACK)
        }
    }

    /// Copy of this material with a highlight tint
    pub fn highlighted(&self, tint: Color) -> Self {
        Self {
            emissive: Some(tint),
            ..self.clone()
        }
    }

    pub fn into_ref(self) -> MaterialRef {
        Rc::new(self)
    }
}
