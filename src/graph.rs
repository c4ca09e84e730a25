use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::INFINITY_GLYPH;

/// Weight carried by an edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cost {
    Finite(f64),
    Infinite,
}

impl Cost {
    pub fn is_infinite(self) -> bool {
        matches!(self, Cost::Infinite)
    }
}

impl From<f64> for Cost {
    fn from(value: f64) -> Self {
        if value.is_infinite() {
            Cost::Infinite
        } else {
            Cost::Finite(value)
        }
    }
}

impl From<u32> for Cost {
    fn from(value: u32) -> Self {
        Cost::Finite(f64::from(value))
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cost::Finite(value) => write!(f, "{value}"),
            Cost::Infinite => f.write_str(INFINITY_GLYPH),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CostRepr {
    Number(f64),
    Text(String),
}

impl<'de> Deserialize<'de> for Cost {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match CostRepr::deserialize(deserializer)? {
            CostRepr::Number(value) if value.is_nan() || value < 0.0 => Err(
                serde::de::Error::custom(format!("edge cost must be non-negative, got {value}")),
            ),
            CostRepr::Number(value) => Ok(Cost::Finite(value)),
            CostRepr::Text(text) => match text.trim().to_ascii_lowercase().as_str() {
                "inf" | "infinity" | INFINITY_GLYPH => Ok(Cost::Infinite),
                other => Err(serde::de::Error::custom(format!(
                    "unrecognised edge cost '{other}'"
                ))),
            },
        }
    }
}

impl Serialize for Cost {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Cost::Finite(value) => serializer.serialize_f64(*value),
            Cost::Infinite => serializer.serialize_str("inf"),
        }
    }
}

/// Weighted directed graph keyed by node id, in first-insertion order.
///
/// Nodes that only appear as edge destinations are not required to have an
/// entry of their own; the layout engine treats them as implicit nodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Graph {
    adjacency: IndexMap<String, IndexMap<String, Cost>>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, id: impl Into<String>) -> &mut Self {
        self.adjacency.entry(id.into()).or_default();
        self
    }

    pub fn add_edge(
        &mut self,
        from: impl Into<String>,
        to: impl Into<String>,
        cost: impl Into<Cost>,
    ) -> &mut Self {
        self.adjacency
            .entry(from.into())
            .or_default()
            .insert(to.into(), cost.into());
        self
    }

    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.adjacency.keys().map(String::as_str)
    }

    pub fn edges_from(&self, id: &str) -> impl Iterator<Item = (&str, Cost)> {
        self.adjacency
            .get(id)
            .into_iter()
            .flat_map(|targets| targets.iter().map(|(to, cost)| (to.as_str(), *cost)))
    }

    /// All edges, grouped by source node in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str, Cost)> {
        self.adjacency.iter().flat_map(|(from, targets)| {
            targets
                .iter()
                .map(move |(to, cost)| (from.as_str(), to.as_str(), *cost))
        })
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(IndexMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_first_insertion_order() {
        let mut graph = Graph::new();
        graph.add_edge("C", "A", 3u32);
        graph.add_edge("A", "B", 1u32);
        graph.add_node("C");
        graph.add_edge("C", "B", 2u32);

        assert_eq!(graph.nodes().collect::<Vec<_>>(), vec!["C", "A"]);
        let targets: Vec<_> = graph.edges_from("C").map(|(to, _)| to).collect();
        assert_eq!(targets, vec!["A", "B"]);
        assert_eq!(graph.edge_count(), 3);
    }

    #[test]
    fn overwriting_an_edge_keeps_its_position() {
        let mut graph = Graph::new();
        graph.add_edge("A", "B", 1u32).add_edge("A", "C", 2u32);
        graph.add_edge("A", "B", 7u32);

        let edges: Vec<_> = graph.edges().collect();
        assert_eq!(
            edges,
            vec![("A", "B", Cost::Finite(7.0)), ("A", "C", Cost::Finite(2.0))]
        );
    }

    #[test]
    fn cost_display_uses_shortest_form() {
        assert_eq!(Cost::Finite(1.0).to_string(), "1");
        assert_eq!(Cost::Finite(2.5).to_string(), "2.5");
        assert_eq!(Cost::Infinite.to_string(), "∞");
        assert_eq!(Cost::from(f64::INFINITY), Cost::Infinite);
    }

    #[test]
    fn deserializes_json_adjacency() {
        let graph: Graph =
            serde_json::from_str(r#"{"B": {"C": 2}, "A": {"B": 1, "C": "inf"}, "C": {}}"#)
                .unwrap();

        assert_eq!(graph.nodes().collect::<Vec<_>>(), vec!["B", "A", "C"]);
        assert_eq!(
            graph.edges_from("A").collect::<Vec<_>>(),
            vec![("B", Cost::Finite(1.0)), ("C", Cost::Infinite)]
        );
    }

    #[test]
    fn rejects_negative_costs() {
        let err = serde_json::from_str::<Graph>(r#"{"A": {"B": -1}}"#).unwrap_err();
        assert!(err.to_string().contains("non-negative"));
    }

    #[test]
    fn missing_source_yields_no_edges() {
        let graph = Graph::new();
        assert_eq!(graph.edges_from("nope").count(), 0);
        assert!(graph.is_empty());
    }
}
