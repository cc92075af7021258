//! Visual dependency graph
//!
//! Nodes are course cards laid out by semester, edges are prerequisite
//! arrows. Both may carry course references in their data payload.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::course::CourseRef;

/// Canvas position of a node
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// UI callback invoked with the node id when the user deletes a card.
///
/// Lives only in memory; it is never written to storage.
#[derive(Clone)]
pub struct DeleteHandler(pub Rc<dyn Fn(&str)>);

impl DeleteHandler {
    pub fn new(f: impl Fn(&str) + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn call(&self, node_id: &str) {
        (self.0)(node_id)
    }
}

impl fmt::Debug for DeleteHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DeleteHandler")
    }
}

/// Node payload
#[derive(Debug, Clone, Default)]
pub struct NodeData {
    /// The course shown on this card
    pub lv: Option<CourseRef>,
    /// UI-only
    pub on_delete: Option<DeleteHandler>,
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone)]
pub struct GraphNode {
    pub id: String,
    /// Node renderer type (e.g. "course")
    pub kind: Option<String>,
    pub position: Position,
    pub data: NodeData,
}

impl GraphNode {
    pub fn new(id: impl Into<String>, position: Position) -> Self {
        Self {
            id: id.into(),
            kind: None,
            position,
            data: NodeData::default(),
        }
    }

    /// A course card node
    pub fn for_course(id: impl Into<String>, position: Position, course: &CourseRef) -> Self {
        let mut node = Self::new(id, position);
        node.kind = Some("course".to_string());
        node.data.lv = Some(Rc::clone(course));
        node
    }
}

/// Edge payload
#[derive(Debug, Clone, Default)]
pub struct EdgeData {
    pub source_course: Option<CourseRef>,
    pub target_course: Option<CourseRef>,
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone)]
pub struct GraphEdge {
    pub id: String,
    /// Source node id
    pub source: String,
    /// Target node id
    pub target: String,
    pub kind: Option<String>,
    pub data: EdgeData,
}

impl GraphEdge {
    pub fn new(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            kind: None,
            data: EdgeData::default(),
        }
    }

    /// A prerequisite arrow between two courses
    pub fn between(
        id: impl Into<String>,
        source: &GraphNode,
        target: &GraphNode,
    ) -> Self {
        let mut edge = Self::new(id, source.id.clone(), target.id.clone());
        edge.data.source_course = source.data.lv.clone();
        edge.data.target_course = target.data.lv.clone();
        edge
    }
}

/// Per-card UI state (expanded, pinned semester, ...)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseCardState {
    #[serde(default)]
    pub expanded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semester: Option<u32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Graph aggregate root
#[derive(Debug, Clone)]
pub struct Graph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    pub stroke_width: f64,
    pub stroke_color: String,
    pub semester_count: u32,
    /// Keyed by course-card id
    pub course_card_states: BTreeMap<String, CourseCardState>,
}

impl Graph {
    pub const DEFAULT_STROKE_WIDTH: f64 = 2.0;
    pub const DEFAULT_STROKE_COLOR: &'static str = "#64748b";
    pub const DEFAULT_SEMESTER_COUNT: u32 = 6;

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            stroke_width: Self::DEFAULT_STROKE_WIDTH,
            stroke_color: Self::DEFAULT_STROKE_COLOR.to_string(),
            semester_count: Self::DEFAULT_SEMESTER_COUNT,
            course_card_states: BTreeMap::new(),
        }
    }
}
