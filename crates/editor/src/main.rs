use sceneforge_lib::state::EditorState;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sceneforge=info,sceneforge_lib=info".into()),
        )
        .init();

    let mut state = EditorState::new();

    // Initial scene: CLI argument takes priority, then autosave
    if let Some(path) = parse_scene_arg() {
        match state.load_scene(std::path::Path::new(&path)) {
            Ok(pending) => {
                if !pending.is_empty() {
                    tracing::info!("{} model imports deferred to the asset loader", pending.len());
                }
            }
            Err(e) => tracing::error!("failed to load scene {path}: {e}"),
        }
    } else if let Some(bundle) = EditorState::load_autosave() {
        let pending = state.apply_bundle(bundle);
        tracing::info!(
            "restored autosave ({} objects, {} deferred imports)",
            state.scene.entities.len(),
            pending.len()
        );
    }

    tracing::info!(
        "scene ready: {} objects, {} lights, {} groups, {} slides",
        state.scene.entities.len(),
        state.scene.lights.len(),
        state.scene.groups.len(),
        state.presentation.slides.len()
    );
}

fn parse_scene_arg() -> Option<String> {
    let args: Vec<String> = std::env::args().collect();
    let mut i = 1;
    while i < args.len() {
        if args[i] == "--scene" && i + 1 < args.len() {
            return Some(args[i + 1].clone());
        }
        i += 1;
    }
    None
}
