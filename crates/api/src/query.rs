//! Board queries - read-only access to board state.

use crate::Target;
use node::{CanvasPoint, CanvasSize, ElementId, ElementKind, ElementRef, LinkType};
use serde::{Deserialize, Serialize};

/// A query for board state (read-only).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Query {
    /// All elements, back to front.
    Sorted,

    /// The selected element.
    Selection,

    /// The highest z-index on the board.
    MaxZIndex,

    /// One element.
    Element { target: Target },

    /// Elements whose title contains `text`, ignoring case. Tasks first.
    Search { text: String },

    /// Elements as nodes and links as edges.
    Graph,
}

/// Response to a query.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QueryResult {
    Elements { elements: Vec<ElementInfo> },

    Selection { element: Option<ElementRef> },

    ZIndex { z_index: i32 },

    Element { element: ElementInfo },

    Graph {
        nodes: Vec<GraphNode>,
        edges: Vec<GraphEdge>,
    },

    Error { message: String },
}

/// Serializable element information, with defaults resolved.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ElementInfo {
    pub id: ElementId,
    pub kind: ElementKind,
    pub position: CanvasPoint,
    pub size: CanvasSize,
    pub title: String,
    pub z_index: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<ElementId>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub selected: bool,
}

/// A board element in a [`QueryResult::Graph`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: ElementId,
    pub kind: ElementKind,
    pub label: String,
    pub position: CanvasPoint,
}

/// A link in a [`QueryResult::Graph`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub id: ElementId,
    pub source: ElementRef,
    pub target: ElementRef,
    pub link_type: LinkType,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_tags() {
        assert_eq!(
            serde_json::to_value(Query::MaxZIndex).unwrap(),
            serde_json::json!({ "type": "max_z_index" })
        );
        let query: Query =
            serde_json::from_str(r#"{ "type": "element", "target": "selection" }"#).unwrap();
        assert_eq!(
            query,
            Query::Element {
                target: Target::Selection
            }
        );
    }

    #[test]
    fn search_and_graph_tags() {
        let query: Query = serde_json::from_str(r#"{ "type": "search", "text": "milk" }"#).unwrap();
        assert_eq!(
            query,
            Query::Search {
                text: "milk".into()
            }
        );
        assert_eq!(
            serde_json::to_value(QueryResult::Graph {
                nodes: vec![],
                edges: vec![],
            })
            .unwrap(),
            serde_json::json!({ "type": "graph", "nodes": [], "edges": [] })
        );
    }

    #[test]
    fn unselected_flag_is_omitted() {
        let info = ElementInfo {
            id: ElementId::from_u128(1),
            kind: ElementKind::Note,
            position: CanvasPoint::new(1.0, 2.0),
            size: CanvasSize::new(250.0, 150.0),
            title: "Untitled".into(),
            z_index: 0,
            parent: None,
            selected: false,
        };
        let json = serde_json::to_value(&info).unwrap();
        assert!(json.get("selected").is_none());
        assert_eq!(json["kind"], "note");
    }
}
