pub mod config;
pub mod editor;
pub mod error;
pub mod geometry;
pub mod logging;
pub mod script;
pub mod state;
pub mod storage;
pub mod workspace;

#[cfg(test)]
mod testing;

use std::path::{Path, PathBuf};

pub use error::{AppError, AppResult};

use config::AppConfig;
use editor::ToolRegistry;
use storage::DocumentFormat;
use workspace::Workspace;

/// Workspace with the tools named by the configured discovery list.
pub fn workspace_from_config(config: &AppConfig) -> Workspace {
    let registry =
        ToolRegistry::from_identifiers(config.tools.as_slice(), config.asset_dir.clone());
    tracing::debug!(tools = registry.len(), "tool registry built");
    Workspace::new(registry)
}

/// Replays the gesture script at `script_path` and writes the resulting
/// document to `output`, in the format implied by its extension.
pub fn replay(config: &AppConfig, script_path: &Path, output: &Path) -> AppResult<PathBuf> {
    let script = script::load_script(script_path)?;
    let mut workspace = workspace_from_config(config);
    let document = script::run_script(&mut workspace, &script, config)?;
    workspace.set_active(document)?;
    let saved = workspace.save_active(output, DocumentFormat::from_path(output))?;
    Ok(saved)
}

/// Entrypoint used by CLI bindings.
pub fn run(script_path: &Path, output: &Path) -> AppResult<PathBuf> {
    logging::init();
    tracing::info!("starting easel");

    let config = config::load_app_config();
    let saved = replay(&config, script_path, output)?;

    tracing::info!(path = %saved.display(), "replay complete");
    Ok(saved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::with_temp_root;

    #[test]
    fn replay_writes_the_scripted_document() {
        with_temp_root("replay", |root| {
            let script = root.join("gesture.json");
            std::fs::write(
                &script,
                r#"{"width": 16, "height": 16, "steps": [
                {"action": "select_tool", "tool": "pencil"},
                {"action": "pointer", "pointer": {"event": "pressed", "point": {"x": 1, "y": 1}}},
                {"action": "pointer", "pointer": {"event": "dragged", "point": {"x": 8, "y": 1}}},
                {"action": "pointer", "pointer": {"event": "released", "point": {"x": 8, "y": 8}}}
            ]}"#,
            )
            .expect("script should be written");

            let saved = replay(&AppConfig::default(), &script, &root.join("out"))
                .expect("replay should succeed");

            assert_eq!(saved, root.join("out.png"));
            let reopened = storage::load_document(&saved).expect("output should reopen");
            assert_eq!(reopened.dimensions(), (16, 16));
            assert_eq!(
                *reopened.pixels().get_pixel(4, 1),
                geometry::Color::BLACK.to_pixel()
            );
        });
    }

    #[test]
    fn config_discovery_list_limits_the_tools() {
        let config = AppConfig {
            tools: vec!["line".to_string(), "airbrush".to_string()],
            ..AppConfig::default()
        };
        let workspace = workspace_from_config(&config);
        assert_eq!(workspace.registry().len(), 1);
    }

    #[test]
    fn missing_script_is_reported() {
        let err = replay(
            &AppConfig::default(),
            Path::new("/nonexistent/easel/script.json"),
            Path::new("/nonexistent/easel/out.png"),
        )
        .expect_err("missing script must fail");
        assert!(matches!(err, AppError::Script(script::ScriptError::Io(_))));
    }
}
