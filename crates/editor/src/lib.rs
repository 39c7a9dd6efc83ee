// Library crate: the editing core, exposed for the viewer binary, integration
// tests and scripted command sessions. GUI modules (app, ui, viewport panel)
// stay in the binary crate.

pub mod build;
pub mod command;
pub mod fixtures;
pub mod scene;
pub mod state;
pub mod validation;

/// Camera, mesh and picking math shared by the core and the viewport panel.
pub mod viewport {
    pub mod camera;
    pub mod edge;
    pub mod mesh;
    pub mod picking;
}
