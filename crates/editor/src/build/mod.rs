//! Shape building: work-plane profiles, primitive solids and sketch geometry.
//!
//! Everything here is pure; nothing touches the scene.

pub mod extrude;
pub mod primitives;
pub mod profile;

pub use extrude::{build_extrusion, flat_surface, outline_strokes, triangulate_profile};
pub use primitives::{build_default_primitive, build_primitive, PrimitiveDescriptor};
pub use profile::{
    build_profile, placement_origin, profile_for_params, sketch_params, Profile2D,
    ProfileOptions, SketchTool,
};
