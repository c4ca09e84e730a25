pub mod annotations;
pub mod config;
pub mod error;
pub mod graph;
pub mod markup;
pub mod render;
pub mod scene;
pub mod template;
pub mod utils;

pub use annotations::*;
pub use config::*;
pub use error::*;
pub use graph::*;
pub use markup::*;
pub use render::*;
pub use scene::*;
pub use template::*;

pub const INFINITY_GLYPH: &str = "∞";
pub const INFINITY_COLOR: &str = "#ef2929";
pub const DEFAULT_LEGEND_COLOR: &str = "white";
pub const LEGEND_LINES: usize = 4;
pub const LEGEND_WIDTH: usize = 20;
pub const PATH_PENWIDTH: u32 = 2;
pub const DEFAULT_DATA_DIR: &str = "data/dot";
pub const DEFAULT_ENGINE: &str = "dot";
pub const DEFAULT_IMAGE_FORMAT: &str = "png";
pub const DEFAULT_RENDER_TIMEOUT_SECS: u64 = 30;

/// Order in which template slots are filled by [`MarkupEngine`].
pub const TEMPLATE_FIELDS: [&str; 9] = [
    "nodes",
    "edges",
    "rank",
    "source_sink",
    "legend_color",
    "legend_line_1",
    "legend_line_2",
    "legend_line_3",
    "legend_line_4",
];
