pub mod init;
pub mod list;
pub mod play;
pub mod results;
pub mod validate;

use std::path::{Path, PathBuf};

use anyhow::Result;
use quizloop_catalog::{load_config_from, QuizloopConfig};

/// Load the config and apply a `--state-dir` override.
fn load_with_state_dir(
    config_path: Option<&Path>,
    state_dir: Option<PathBuf>,
) -> Result<QuizloopConfig> {
    let mut config = load_config_from(config_path)?;
    if let Some(dir) = state_dir {
        config.state_dir = dir;
    }
    Ok(config)
}
