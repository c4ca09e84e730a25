use serde::{Deserialize, Serialize};

use crate::{AnnotationStore, Graph};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenePath {
    pub nodes: Vec<String>,
    #[serde(default)]
    pub node_color: String,
    #[serde(default)]
    pub edge_color: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneLegend {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default)]
    pub lines: Vec<String>,
}

/// A graph plus its rendering directives, as read from a JSON document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub graph: Graph,
    #[serde(default)]
    pub paths: Vec<ScenePath>,
    #[serde(default)]
    pub ranks: Vec<Vec<String>>,
    #[serde(default)]
    pub infinite: Vec<(String, String)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sink: Option<String>,
    #[serde(default)]
    pub legend: SceneLegend,
}

impl Scene {
    pub fn from_json(source: &str) -> serde_json::Result<Self> {
        serde_json::from_str(source)
    }

    /// Adds this scene's graph and directives to `store`, on top of
    /// whatever it already holds.
    pub fn apply(&self, store: &mut AnnotationStore) {
        store.set_graph(self.graph.clone());
        for path in &self.paths {
            store.add_path(
                path.nodes.iter().map(String::as_str),
                path.node_color.as_str(),
                path.edge_color.as_str(),
            );
        }
        for group in &self.ranks {
            store.add_rank(group.iter().map(String::as_str));
        }
        for (from, to) in &self.infinite {
            store.mark_infinite(from.as_str(), to.as_str());
        }
        if self.source.is_some() || self.sink.is_some() {
            store.set_source_sink(self.source.as_deref(), self.sink.as_deref());
        }
        if let Some(color) = &self.legend.color {
            store.set_legend_color(color.as_str());
        }
        for line in &self.legend.lines {
            store.add_legend_line(line.as_str());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENE: &str = r##"{
        "graph": {"A": {"B": 1, "C": 4}, "B": {"C": 2}, "C": {}},
        "paths": [{"nodes": ["A", "B", "C"], "node_color": "#729fcf", "edge_color": "#3465a4"}],
        "ranks": [["B", "C"]],
        "infinite": [["A", "C"]],
        "source": "A",
        "legend": {"color": "lightyellow", "lines": ["Shortest path A -> C", "Cost: 3"]}
    }"##;

    #[test]
    fn applies_every_directive() {
        let scene = Scene::from_json(SCENE).unwrap();
        let mut store = AnnotationStore::new();
        scene.apply(&mut store);

        assert_eq!(store.graph().map(Graph::edge_count), Some(3));
        assert_eq!(store.node_color("B"), Some("#729fcf"));
        assert_eq!(store.edge_color("B", "C"), Some("#3465a4"));
        assert_eq!(store.ranks(), &[vec!["B".to_string(), "C".to_string()]]);
        assert!(store.is_infinite("A", "C"));
        assert_eq!(store.source(), Some("A"));
        assert_eq!(store.sink(), None);
        assert_eq!(store.legend_color(), "lightyellow");
        assert_eq!(store.legend_lines().len(), 2);
    }

    #[test]
    fn only_graph_is_required() {
        let scene = Scene::from_json(r#"{"graph": {"A": {"B": 1}}}"#).unwrap();
        let mut store = AnnotationStore::new();
        scene.apply(&mut store);

        assert!(store.paths().is_empty());
        assert_eq!(store.legend_color(), "white");
    }

    #[test]
    fn missing_graph_is_rejected() {
        assert!(Scene::from_json(r#"{"paths": []}"#).is_err());
    }
}
