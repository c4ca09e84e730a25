use crate::{DEFAULT_LEGEND_COLOR, Graph};

/// Highlight for a walk through the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathAnnotation {
    pub nodes: Vec<String>,
    pub node_color: String,
    pub edge_color: String,
}

impl PathAnnotation {
    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.iter().any(|node| node == id)
    }

    /// True when `from` is immediately followed by `to` somewhere in the walk.
    pub fn contains_edge(&self, from: &str, to: &str) -> bool {
        self.nodes
            .windows(2)
            .any(|pair| pair[0] == from && pair[1] == to)
    }
}

/// Rendering directives applied on top of a [`Graph`].
///
/// Nothing here resets itself: paths, ranks, infinity markers and legend
/// lines accumulate across generations until cleared.
#[derive(Debug, Clone)]
pub struct AnnotationStore {
    graph: Option<Graph>,
    paths: Vec<PathAnnotation>,
    ranks: Vec<Vec<String>>,
    infinite: Vec<(String, String)>,
    source: Option<String>,
    sink: Option<String>,
    legend_lines: Vec<String>,
    legend_color: String,
}

impl Default for AnnotationStore {
    fn default() -> Self {
        Self {
            graph: None,
            paths: Vec::new(),
            ranks: Vec::new(),
            infinite: Vec::new(),
            source: None,
            sink: None,
            legend_lines: Vec::new(),
            legend_color: DEFAULT_LEGEND_COLOR.to_string(),
        }
    }
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops every annotation and the graph. The legend color is kept.
    pub fn reset(&mut self) {
        let legend_color = std::mem::take(&mut self.legend_color);
        *self = Self {
            legend_color,
            ..Self::default()
        };
    }

    pub fn set_graph(&mut self, graph: Graph) {
        self.graph = Some(graph);
    }

    pub fn graph(&self) -> Option<&Graph> {
        self.graph.as_ref()
    }

    pub fn add_rank<I, S>(&mut self, nodes: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ranks.push(nodes.into_iter().map(Into::into).collect());
    }

    pub fn clear_ranks(&mut self) {
        self.ranks.clear();
    }

    pub fn ranks(&self) -> &[Vec<String>] {
        &self.ranks
    }

    pub fn add_path<I, S>(
        &mut self,
        nodes: I,
        node_color: impl Into<String>,
        edge_color: impl Into<String>,
    ) where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.paths.push(PathAnnotation {
            nodes: nodes.into_iter().map(Into::into).collect(),
            node_color: node_color.into(),
            edge_color: edge_color.into(),
        });
    }

    pub fn clear_paths(&mut self) {
        self.paths.clear();
    }

    pub fn paths(&self) -> &[PathAnnotation] {
        &self.paths
    }

    pub fn mark_infinite(&mut self, from: impl Into<String>, to: impl Into<String>) {
        self.infinite.push((from.into(), to.into()));
    }

    pub fn clear_infinite(&mut self) {
        self.infinite.clear();
    }

    pub fn is_infinite(&self, from: &str, to: &str) -> bool {
        self.infinite
            .iter()
            .any(|(marked_from, marked_to)| marked_from == from && marked_to == to)
    }

    /// Overwrites both markers; `None` (or an empty id) leaves that side unset.
    pub fn set_source_sink(&mut self, source: Option<&str>, sink: Option<&str>) {
        let normalize = |id: Option<&str>| id.filter(|id| !id.is_empty()).map(str::to_string);
        self.source = normalize(source);
        self.sink = normalize(sink);
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn sink(&self) -> Option<&str> {
        self.sink.as_deref()
    }

    pub fn set_legend_color(&mut self, color: impl Into<String>) {
        self.legend_color = color.into();
    }

    pub fn legend_color(&self) -> &str {
        &self.legend_color
    }

    pub fn add_legend_line(&mut self, text: impl Into<String>) {
        self.legend_lines.push(text.into());
    }

    pub fn clear_legend_lines(&mut self) {
        self.legend_lines.clear();
    }

    pub fn legend_lines(&self) -> &[String] {
        &self.legend_lines
    }

    /// Color of the last path containing `id`, if any.
    pub fn node_color(&self, id: &str) -> Option<&str> {
        self.paths
            .iter()
            .rev()
            .find(|path| path.contains_node(id))
            .map(|path| path.node_color.as_str())
    }

    /// Color of the last path walking `from -> to`, if any.
    pub fn edge_color(&self, from: &str, to: &str) -> Option<&str> {
        self.paths
            .iter()
            .rev()
            .find(|path| path.contains_edge(from, to))
            .map(|path| path.edge_color.as_str())
    }
}
