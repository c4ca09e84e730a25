use std::path::PathBuf;
use std::time::Duration;

use crate::{
    ConfigError, DEFAULT_DATA_DIR, DEFAULT_ENGINE, DEFAULT_IMAGE_FORMAT,
    DEFAULT_RENDER_TIMEOUT_SECS, Template,
};

/// Where generated files go and how the layout engine is invoked.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub output_dir: PathBuf,
    /// `None` selects the bundled template.
    pub template: Option<PathBuf>,
    pub engine: String,
    pub format: String,
    pub timeout: Duration,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(
                std::env::var("GRAPHDOT_DATA_DIR")
                    .unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string()),
            ),
            template: std::env::var_os("GRAPHDOT_TEMPLATE").map(PathBuf::from),
            engine: std::env::var("GRAPHDOT_ENGINE")
                .unwrap_or_else(|_| DEFAULT_ENGINE.to_string()),
            format: std::env::var("GRAPHDOT_FORMAT")
                .unwrap_or_else(|_| DEFAULT_IMAGE_FORMAT.to_string()),
            timeout: Duration::from_secs(timeout_secs(
                std::env::var("GRAPHDOT_TIMEOUT_SECS").ok().as_deref(),
            )),
        }
    }
}

/// Zero, unparsable and unset values all fall back to the default.
fn timeout_secs(raw: Option<&str>) -> u64 {
    raw.and_then(|value| value.trim().parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .unwrap_or(DEFAULT_RENDER_TIMEOUT_SECS)
}

impl RenderConfig {
    pub fn load_template(&self) -> Result<Template, ConfigError> {
        match &self.template {
            Some(path) => Template::load(path),
            None => Ok(Template::builtin()),
        }
    }
}
