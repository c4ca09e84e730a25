use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("template file '{}' does not exist", .0.display())]
    TemplateMissing(PathBuf),
    #[error("failed to read template '{}'", path.display())]
    TemplateRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("template declares {found} substitution slots but {expected} fields are supplied")]
    SlotMismatch { expected: usize, found: usize },
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("no graph has been set on the annotation store")]
    MissingGraph,
    #[error("failed to write '{}'", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Why the layout engine did not produce an image. Never fatal to the caller.
#[derive(Debug, thiserror::Error)]
pub enum RenderFailure {
    #[error("DOT file '{}' does not exist", .0.display())]
    MissingDot(PathBuf),
    #[error("failed to start async runtime for the layout engine")]
    Runtime(#[source] std::io::Error),
    #[error("failed to launch layout engine '{engine}'")]
    Spawn {
        engine: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed while waiting for layout engine '{engine}'")]
    Wait {
        engine: String,
        #[source]
        source: std::io::Error,
    },
    #[error("layout engine '{engine}' exited with {}", exit_description(.code))]
    Exit { engine: String, code: Option<i32> },
    #[error("worker thread running layout engine '{engine}' panicked")]
    WorkerPanicked { engine: String },
    #[error("layout engine '{engine}' did not finish within {timeout:?}")]
    TimedOut {
        engine: String,
        timeout: std::time::Duration,
    },
}

fn exit_description(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "no status (terminated by signal)".to_string(),
    }
}
