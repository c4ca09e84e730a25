use anyhow::{Context, Result, anyhow, bail};
use clap::{ArgAction, Parser, ValueEnum};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::Level;

use graphdot::{
    AnnotationStore, EdgeDedup, GraphvizRenderer, MarkupEngine, MarkupOptions, RenderConfig,
    Renderer, Scene,
};

const DEFAULT_GRAPH_NAME: &str = "graph";

#[derive(Debug, Clone, PartialEq, Eq)]
enum InputSource {
    Stdin,
    File(PathBuf),
}

#[derive(Debug, Parser)]
#[command(
    name = "graphdot",
    about = "Render a weighted directed graph and its annotations through Graphviz."
)]
pub struct RenderArgs {
    /// Path to the JSON scene file. Use '-' to read from stdin.
    #[arg(short = 'i', long = "input")]
    input: Option<String>,

    /// Base name of the generated files (defaults to the input file stem).
    #[arg(short = 'n', long = "name")]
    name: Option<String>,

    /// Directory receiving `<name>.dot` and the rendered image.
    #[arg(short = 'o', long = "out-dir")]
    out_dir: Option<PathBuf>,

    /// DOT template with nine `%s` slots (defaults to the bundled template).
    #[arg(short = 't', long = "template")]
    template: Option<PathBuf>,

    /// Graphviz layout program used to rasterize the DOT file.
    #[arg(long = "engine")]
    engine: Option<String>,

    /// Image format passed to the layout program as `-T<format>`.
    #[arg(short = 'e', long = "format")]
    format: Option<String>,

    /// Seconds to wait for the layout program before giving up.
    #[arg(long = "timeout")]
    timeout: Option<u64>,

    /// How duplicate edges are collapsed.
    #[arg(long = "dedup", value_enum, default_value_t = DedupArg::Endpoints)]
    dedup: DedupArg,

    /// Write the DOT file but skip the layout program.
    #[arg(long = "dot-only", action = ArgAction::SetTrue)]
    dot_only: bool,

    /// Print the DOT document to stdout instead of writing any files.
    #[arg(
        long = "stdout",
        action = ArgAction::SetTrue,
        conflicts_with_all = ["dot_only", "out_dir"]
    )]
    stdout: bool,

    /// Suppress informational output.
    #[arg(short = 'q', long = "quiet", action = ArgAction::SetTrue)]
    quiet: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
enum DedupArg {
    Endpoints,
    Rendered,
}

impl From<DedupArg> for EdgeDedup {
    fn from(value: DedupArg) -> Self {
        match value {
            DedupArg::Endpoints => EdgeDedup::Endpoints,
            DedupArg::Rendered => EdgeDedup::Rendered,
        }
    }
}

impl RenderArgs {
    fn log_level(&self) -> Level {
        if self.quiet {
            return Level::ERROR;
        }
        match self.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }

    fn render_config(&self) -> Result<RenderConfig> {
        let mut config = RenderConfig::default();
        if let Some(dir) = &self.out_dir {
            config.output_dir = dir.clone();
        }
        if let Some(template) = &self.template {
            config.template = Some(template.clone());
        }
        if let Some(engine) = &self.engine {
            config.engine = engine.clone();
        }
        if let Some(format) = &self.format {
            config.format = format.to_ascii_lowercase();
        }
        if let Some(secs) = self.timeout {
            config.timeout = Duration::from_secs(secs);
        }

        if config.timeout.is_zero() {
            bail!("--timeout must be greater than zero");
        }
        if config.format.is_empty() {
            bail!("--format must not be empty");
        }
        Ok(config)
    }
}

fn init_logging(level: Level) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

pub fn dispatch() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let render_args = match args.get(1).map(|s| s.as_str()) {
        Some("render") => RenderArgs::parse_from(
            std::iter::once(args[0].clone()).chain(args.iter().skip(2).cloned()),
        ),
        _ => RenderArgs::parse_from(args),
    };
    run_render(render_args)
}

fn run_render(cli: RenderArgs) -> Result<()> {
    init_logging(cli.log_level());

    let config = cli.render_config()?;
    let template = config
        .load_template()
        .context("failed to load DOT template")?;
    let options = MarkupOptions {
        dedup: cli.dedup.into(),
        ..MarkupOptions::default()
    };
    let engine = MarkupEngine::with_options(template, options)
        .context("DOT template cannot be used for graph markup")?;

    let input_source = parse_input(cli.input.as_deref())?;
    let definition = load_definition(&input_source)?;
    let scene = Scene::from_json(&definition).context("failed to parse scene JSON")?;

    let mut store = AnnotationStore::new();
    scene.apply(&mut store);

    if cli.stdout {
        let dot = engine.markup(&store)?;
        let mut stdout = io::stdout();
        stdout.write_all(dot.as_bytes())?;
        stdout.flush()?;
        return Ok(());
    }

    let name = resolve_name(cli.name.as_deref(), &input_source)?;
    let renderer = GraphvizRenderer::new(&config);

    if cli.dot_only {
        let dot = engine.markup(&store)?;
        let path = renderer.persist(&name, &dot)?;
        if !cli.quiet {
            println!("Generated DOT -> {}", path.display());
        }
        return Ok(());
    }

    let generated = engine.generate(&name, &store, &renderer)?;
    if !cli.quiet {
        println!("Generated DOT -> {}", generated.dot_path.display());
    }

    match generated.image {
        Ok(image) => {
            if !cli.quiet {
                println!("Generated image -> {}", image.display());
            }
            Ok(())
        }
        Err(failure) => Err(
            anyhow::Error::new(failure).context(format!("failed to render image for '{name}'"))
        ),
    }
}

fn parse_input(input: Option<&str>) -> Result<InputSource> {
    match input {
        Some("-") => Ok(InputSource::Stdin),
        Some(path_str) => {
            let path = PathBuf::from(path_str);
            if !path.exists() {
                return Err(anyhow!("input file '{path_str}' does not exist"));
            }
            Ok(InputSource::File(path))
        }
        None => Ok(InputSource::Stdin),
    }
}

fn resolve_name(name: Option<&str>, input: &InputSource) -> Result<String> {
    let name = match (name, input) {
        (Some(name), _) => name.to_string(),
        (None, InputSource::File(path)) => file_stem(path),
        (None, InputSource::Stdin) => DEFAULT_GRAPH_NAME.to_string(),
    };

    if name.trim().is_empty() {
        bail!("graph name must not be empty");
    }
    if name.contains(['/', '\\']) {
        bail!("graph name '{name}' must not contain path separators");
    }
    Ok(name)
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| DEFAULT_GRAPH_NAME.to_string())
}

fn load_definition(source: &InputSource) -> Result<String> {
    match source {
        InputSource::Stdin => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            if buffer.trim().is_empty() {
                Err(anyhow!("no scene supplied on stdin"))
            } else {
                Ok(buffer)
            }
        }
        InputSource::File(path) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("failed to read '{}'", path.display()))?;
            if contents.trim().is_empty() {
                Err(anyhow!("input file '{}' was empty", path.display()))
            } else {
                Ok(contents)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_defaults_to_input_stem() {
        let input = InputSource::File(PathBuf::from("scenes/route.json"));
        assert_eq!(resolve_name(None, &input).unwrap(), "route");
        assert_eq!(resolve_name(None, &InputSource::Stdin).unwrap(), "graph");
        assert_eq!(resolve_name(Some("custom"), &input).unwrap(), "custom");
    }

    #[test]
    fn name_rejects_separators() {
        assert!(resolve_name(Some("../escape"), &InputSource::Stdin).is_err());
        assert!(resolve_name(Some("  "), &InputSource::Stdin).is_err());
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let args = RenderArgs::parse_from(["graphdot", "--timeout", "0"]);
        assert!(args.render_config().is_err());
    }

    #[test]
    fn verbosity_maps_to_levels() {
        assert_eq!(RenderArgs::parse_from(["graphdot"]).log_level(), Level::WARN);
        assert_eq!(RenderArgs::parse_from(["graphdot", "-vv"]).log_level(), Level::DEBUG);
        assert_eq!(RenderArgs::parse_from(["graphdot", "-q"]).log_level(), Level::ERROR);
    }
}
