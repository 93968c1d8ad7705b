use std::path::PathBuf;

use anyhow::Result;
use image::DynamicImage;

/// Debug configuration for pipeline execution
#[derive(Clone, Debug)]
pub struct DebugConfig {
    /// Root directory for debug outputs
    pub output_dir: PathBuf,
}

impl DebugConfig {
    /// The directory must be empty or non-existent
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self> {
        let output_dir = output_dir.into();
        if output_dir.exists() {
            let entries = std::fs::read_dir(&output_dir)?;
            if entries.count() > 0 {
                anyhow::bail!("Debug directory is not empty: {}", output_dir.display());
            }
        } else {
            std::fs::create_dir_all(&output_dir)?;
        }
        Ok(Self { output_dir })
    }

    /// Path of the dump for a stage, e.g. `03_edges.png`.
    pub fn stage_path(&self, step_index: usize, step_name: &str) -> PathBuf {
        let file_name = format!(
            "{:02}_{}.png",
            step_index,
            step_name.to_lowercase().replace(' ', "_")
        );
        self.output_dir.join(file_name)
    }
}

/// Context shared by all stages of one run
#[derive(Clone, Debug, Default)]
pub struct PipelineContext {
    pub debug: Option<DebugConfig>,
}

impl PipelineContext {
    /// Save an intermediate image if debug mode is enabled.
    ///
    /// Failures are logged and swallowed; a dump must never change the
    /// measurement outcome.
    pub fn save_stage(
        &self,
        step_index: usize,
        step_name: &str,
        image: impl FnOnce() -> DynamicImage,
    ) {
        let Some(debug) = &self.debug else {
            return;
        };
        let path = debug.stage_path(step_index, step_name);
        match image().save(&path) {
            Ok(()) => log::debug!("Debug: saved {}", path.display()),
            Err(e) => log::warn!("Failed to save debug image {}: {}", path.display(), e),
        }
    }
}
