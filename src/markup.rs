use std::collections::HashSet;
use std::path::PathBuf;

use tracing::{debug, info, trace, warn};

use crate::utils::{escape_dot, pad_right, quote_id};
use crate::{
    AnnotationStore, ConfigError, Cost, Error, Graph, INFINITY_COLOR, INFINITY_GLYPH,
    LEGEND_LINES, LEGEND_WIDTH, PATH_PENWIDTH, RenderFailure, Renderer, TEMPLATE_FIELDS,
    Template,
};

/// How repeated edges are collapsed while emitting edge markup.
///
/// A [`Graph`] holds each `(from, to)` pair once, so both policies emit the
/// same edges for it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EdgeDedup {
    /// One edge per `(from, to)` pair.
    #[default]
    Endpoints,
    /// Drop an edge whose rendered line is byte-identical to one already
    /// emitted. Kept for output parity with older DOT files.
    Rendered,
}

#[derive(Debug, Clone)]
pub struct MarkupOptions {
    pub dedup: EdgeDedup,
    pub infinity_color: String,
    pub legend_width: usize,
}

impl Default for MarkupOptions {
    fn default() -> Self {
        Self {
            dedup: EdgeDedup::default(),
            infinity_color: INFINITY_COLOR.to_string(),
            legend_width: LEGEND_WIDTH,
        }
    }
}

/// Result of [`MarkupEngine::generate`].
#[derive(Debug)]
pub struct Generated {
    pub dot: String,
    pub dot_path: PathBuf,
    pub image: Result<PathBuf, RenderFailure>,
}

impl Generated {
    pub fn rendered(&self) -> bool {
        self.image.is_ok()
    }
}

/// Turns a graph plus its annotations into a DOT document.
#[derive(Debug, Clone)]
pub struct MarkupEngine {
    template: Template,
    options: MarkupOptions,
}

impl MarkupEngine {
    pub fn new(template: Template) -> Result<Self, ConfigError> {
        Self::with_options(template, MarkupOptions::default())
    }

    pub fn with_options(template: Template, options: MarkupOptions) -> Result<Self, ConfigError> {
        template.check_slots(TEMPLATE_FIELDS.len())?;
        Ok(Self { template, options })
    }

    pub fn options(&self) -> &MarkupOptions {
        &self.options
    }

    /// Node declarations and edge statements, in graph insertion order.
    pub fn parse_graph(&self, graph: &Graph, store: &AnnotationStore) -> (String, String) {
        let mut nodes = String::new();
        let mut edges = String::new();
        let mut seen_pairs: HashSet<(&str, &str)> = HashSet::new();
        let mut seen_lines: HashSet<String> = HashSet::new();

        for node in graph.nodes() {
            let color = store.node_color(node).unwrap_or_default();
            nodes.push_str(&format!(
                "{} [color=\"{}\"]
	",
                quote_id(node),
                escape_dot(color)
            ));

            for (to, cost) in graph.edges_from(node) {
                let line = self.edge_line(node, to, cost, store);
                let fresh = match self.options.dedup {
                    EdgeDedup::Endpoints => seen_pairs.insert((node, to)),
                    EdgeDedup::Rendered => seen_lines.insert(line.clone()),
                };
                if !fresh {
                    trace!(from = node, to, "skipping duplicate edge");
                    continue;
                }
                edges.push_str(&line);
                edges.push_str("\n\t");
            }
        }

        (nodes, edges)
    }

    fn edge_line(&self, from: &str, to: &str, cost: Cost, store: &AnnotationStore) -> String {
        let (label, style) = if store.is_infinite(from, to) {
            (
                INFINITY_GLYPH.to_string(),
                format!(
                    ", style=dashed, color=\"{}\"",
                    escape_dot(&self.options.infinity_color)
                ),
            )
        } else {
            let style = store
                .edge_color(from, to)
                .map(|color| {
                    format!(
                        ", penwidth={PATH_PENWIDTH}, color=\"{}\"",
                        escape_dot(color)
                    )
                })
                .unwrap_or_default();
            (cost.to_string(), style)
        };

        format!(
            "{} -> {} [label=\"{}\"{}]",
            quote_id(from),
            quote_id(to),
            label,
            style
        )
    }

    pub fn parse_rank(&self, store: &AnnotationStore) -> String {
        let mut rank = String::new();
        for group in store.ranks() {
            let members: Vec<String> = group.iter().map(|id| quote_id(id)).collect();
            rank.push_str(&format!("{{ rank=same; {} }}\n\t", members.join(" ")));
        }
        rank
    }

    pub fn parse_source_sink(&self, store: &AnnotationStore) -> String {
        let mut markup = String::new();
        if let Some(source) = store.source() {
            markup.push_str(&format!("{} [rank=\"source\"]\n\t", quote_id(source)));
        }
        if let Some(sink) = store.sink() {
            markup.push_str(&format!("{} [rank=\"sink\"]\n", quote_id(sink)));
        }
        markup
    }

    /// Exactly four fixed-width legend lines; missing lines are blank and
    /// anything past the fourth is ignored.
    pub fn parse_legend(&self, store: &AnnotationStore) -> [String; LEGEND_LINES] {
        let lines = store.legend_lines();
        std::array::from_fn(|index| {
            let text = lines.get(index).map(String::as_str).unwrap_or_default();
            escape_dot(&pad_right(text, self.options.legend_width))
        })
    }

    /// Template fields in slot order.
    pub fn fields(&self, store: &AnnotationStore) -> Result<Vec<String>, Error> {
        let graph = store.graph().ok_or(Error::MissingGraph)?;

        let (nodes, edges) = self.parse_graph(graph, store);
        let mut fields = Vec::with_capacity(TEMPLATE_FIELDS.len());
        fields.push(nodes);
        fields.push(edges);
        fields.push(self.parse_rank(store));
        fields.push(self.parse_source_sink(store));
        fields.push(escape_dot(store.legend_color()));
        fields.extend(self.parse_legend(store));

        Ok(fields)
    }

    /// Builds the DOT document without touching the filesystem.
    pub fn markup(&self, store: &AnnotationStore) -> Result<String, Error> {
        let fields = self.fields(store)?;
        let body = self.template.fill(fields.as_slice())?;

        if let Some(graph) = store.graph() {
            debug!(
                nodes = graph.node_count(),
                edges = graph.edge_count(),
                paths = store.paths().len(),
                ranks = store.ranks().len(),
                bytes = body.len(),
                "generated DOT markup"
            );
        }

        Ok(body)
    }

    /// Builds the document, persists it under `name` and asks the renderer
    /// for an image. A failed render is reported in the returned value.
    pub fn generate(
        &self,
        name: &str,
        store: &AnnotationStore,
        renderer: &dyn Renderer,
    ) -> Result<Generated, Error> {
        let dot = self.markup(store)?;
        let dot_path = renderer.persist(name, &dot)?;

        let image = renderer.render(name);
        match &image {
            Ok(path) => info!(name, image = %path.display(), "rendered graph image"),
            Err(failure) => warn!(name, error = %failure, "graph image was not rendered"),
        }

        Ok(Generated {
            dot,
            dot_path,
            image,
        })
    }
}
