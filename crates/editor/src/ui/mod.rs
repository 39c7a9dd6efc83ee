//! Side panels and toolbars of the viewer window

pub mod properties;
pub mod scene_tree;
pub mod sketch_toolbar;
pub mod status_bar;
pub mod toolbar;
