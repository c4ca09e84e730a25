use std::cell::RefCell;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
#[cfg(feature = "graphviz")]
use std::process::Stdio;
use std::time::Duration;

use tracing::{debug, info};

use crate::{Error, RenderConfig, RenderFailure};

/// Persists DOT text and turns it into an image.
pub trait Renderer {
    /// Writes `dot` to a location derived from `name` and returns that path.
    fn persist(&self, name: &str, dot: &str) -> Result<PathBuf, Error>;

    /// Runs the layout step for a previously persisted `name`.
    fn render(&self, name: &str) -> Result<PathBuf, RenderFailure>;
}

/// Writes `<dir>/<name>.dot` and runs a Graphviz layout program on it.
#[derive(Debug, Clone)]
pub struct GraphvizRenderer {
    output_dir: PathBuf,
    engine: String,
    format: String,
    timeout: Duration,
}

impl GraphvizRenderer {
    pub fn new(config: &RenderConfig) -> Self {
        Self {
            output_dir: config.output_dir.clone(),
            engine: config.engine.clone(),
            format: config.format.clone(),
            timeout: config.timeout,
        }
    }

    pub fn dot_path(&self, name: &str) -> PathBuf {
        self.output_dir.join(format!("{name}.dot"))
    }

    pub fn image_path(&self, name: &str) -> PathBuf {
        self.output_dir.join(format!("{name}.{}", self.format))
    }

    #[cfg(feature = "graphviz")]
    async fn run_engine(&self, dot: &Path, image: &Path) -> Result<(), RenderFailure> {
        use tokio::process::Command;
        use tokio::time::timeout;

        let mut child = Command::new(&self.engine)
            .arg(dot)
            .arg(format!("-T{}", self.format))
            .arg("-o")
            .arg(image)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| RenderFailure::Spawn {
                engine: self.engine.clone(),
                source,
            })?;

        let waited = timeout(self.timeout, child.wait()).await;
        let status = match waited {
            Ok(status) => status.map_err(|source| RenderFailure::Wait {
                engine: self.engine.clone(),
                source,
            })?,
            Err(_) => {
                let _ = child.kill().await;
                return Err(RenderFailure::TimedOut {
                    engine: self.engine.clone(),
                    timeout: self.timeout,
                });
            }
        };

        if !status.success() {
            return Err(RenderFailure::Exit {
                engine: self.engine.clone(),
                code: status.code(),
            });
        }
        Ok(())
    }
}

impl Renderer for GraphvizRenderer {
    fn persist(&self, name: &str, dot: &str) -> Result<PathBuf, Error> {
        fs::create_dir_all(&self.output_dir).map_err(|source| Error::Io {
            path: self.output_dir.clone(),
            source,
        })?;

        let path = self.dot_path(name);
        let io_error = |source| Error::Io {
            path: path.clone(),
            source,
        };
        let mut file = File::create(&path).map_err(io_error)?;
        file.write_all(dot.as_bytes()).map_err(io_error)?;
        file.flush().map_err(io_error)?;

        info!(path = %path.display(), bytes = dot.len(), "wrote DOT file");
        Ok(path)
    }

    #[cfg(feature = "graphviz")]
    fn render(&self, name: &str) -> Result<PathBuf, RenderFailure> {
        let dot = self.dot_path(name);
        if !dot.is_file() {
            return Err(RenderFailure::MissingDot(dot));
        }
        let image = self.image_path(name);

        debug!(engine = %self.engine, dot = %dot.display(), "running layout engine");
        let run = || -> Result<(), RenderFailure> {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .map_err(RenderFailure::Runtime)?;
            runtime.block_on(self.run_engine(&dot, &image))
        };

        // A runtime cannot be started on a thread that is already driving one.
        if tokio::runtime::Handle::try_current().is_ok() {
            std::thread::scope(|scope| scope.spawn(run).join())
                .map_err(|_| RenderFailure::WorkerPanicked {
                    engine: self.engine.clone(),
                })??;
        } else {
            run()?;
        }

        Ok(image)
    }

    #[cfg(not(feature = "graphviz"))]
    fn render(&self, name: &str) -> Result<PathBuf, RenderFailure> {
        debug!(name, "layout engine support is disabled");
        Err(RenderFailure::Spawn {
            engine: self.engine.clone(),
            source: std::io::Error::new(
                std::io::ErrorKind::Unsupported,
                "built without the 'graphviz' feature",
            ),
        })
    }
}

/// Keeps documents in memory; rendering succeeds for anything persisted.
#[derive(Debug, Default)]
pub struct MemoryRenderer {
    documents: RefCell<HashMap<String, String>>,
}

impl MemoryRenderer {
    pub fn document(&self, name: &str) -> Option<String> {
        self.documents.borrow().get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.documents.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.borrow().is_empty()
    }
}

impl Renderer for MemoryRenderer {
    fn persist(&self, name: &str, dot: &str) -> Result<PathBuf, Error> {
        self.documents
            .borrow_mut()
            .insert(name.to_string(), dot.to_string());
        Ok(PathBuf::from(format!("{name}.dot")))
    }

    fn render(&self, name: &str) -> Result<PathBuf, RenderFailure> {
        if self.documents.borrow().contains_key(name) {
            Ok(PathBuf::from(format!("{name}.png")))
        } else {
            Err(RenderFailure::MissingDot(PathBuf::from(format!("{name}.dot"))))
        }
    }
}
