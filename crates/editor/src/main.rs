mod app;
pub mod i18n;
mod ui;
mod viewport;

// Re-export library modules so that `crate::state`, `crate::scene`, etc.
// resolve to the lib crate types everywhere in the binary.
pub use scene_editor_lib::build;
pub use scene_editor_lib::scene;
pub use scene_editor_lib::state;

use app::SceneEditorApp;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scene_editor=info,scene_editor_lib=info".into()),
        )
        .init();

    // Parse --scene <path> argument
    let initial_scene = parse_scene_arg();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Scene Editor")
            .with_inner_size([1280.0, 820.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    if let Err(e) = eframe::run_native(
        "scene-editor",
        native_options,
        Box::new(move |cc| Ok(Box::new(SceneEditorApp::new(cc, initial_scene)))),
    ) {
        tracing::error!("Failed to start application: {e}");
    }
}

/// Contents of the file named by `--scene <path>`, if any
fn parse_scene_arg() -> Option<String> {
    let args: Vec<String> = std::env::args().collect();
    let mut i = 1;
    while i < args.len() {
        if args[i] == "--scene" && i + 1 < args.len() {
            let path = &args[i + 1];
            match std::fs::read_to_string(path) {
                Ok(json) => {
                    tracing::info!("Read scene file {path}");
                    return Some(json);
                }
                Err(e) => {
                    tracing::error!("Failed to read scene file {path}: {e}");
                }
            }
            break;
        }
        i += 1;
    }
    None
}
