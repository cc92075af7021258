//! Durable record shapes
//!
//! Field names are camelCase to match what the web front-end stores.
//! Every container defaults missing fields so older records still load.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::model::{CourseCardState, CourseId, DegreeType, Module, Position, StartSemester};

/// Course with ids in place of references
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatCourse {
    pub id: CourseId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub credits: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semester: Option<u32>,
    /// Module codes
    #[serde(rename = "module", default)]
    pub modules: Vec<String>,
    /// Prerequisite ids; each entry may itself be an alias list
    #[serde(default)]
    pub prerequisites: Vec<CourseId>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FlatCourse {
    pub fn new(id: impl Into<CourseId>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            credits: 0.0,
            semester: None,
            modules: Vec::new(),
            prerequisites: Vec::new(),
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FlatCurriculum {
    pub credits: f64,
    pub modules: Vec<Module>,
    pub courses: Vec<FlatCourse>,
    pub degree_type: DegreeType,
    pub start_semester: StartSemester,
    pub major_module: String,
    pub minor_module: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StoredNodeData {
    /// Embedded course, flattened
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lv: Option<FlatCourse>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredNode {
    pub id: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub data: StoredNodeData,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredEdgeData {
    /// Primary id of the source course
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_course: Option<CourseId>,
    /// Primary id of the target course
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_course: Option<CourseId>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default)]
    pub data: StoredEdgeData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FlatGraph {
    pub nodes: Vec<StoredNode>,
    pub edges: Vec<StoredEdge>,
    pub stroke_width: f64,
    pub stroke_color: String,
    pub semester_count: u32,
    pub course_card_states: BTreeMap<String, CourseCardState>,
}

impl Default for FlatGraph {
    fn default() -> Self {
        crate::codec::encode_graph(&crate::model::Graph::default())
    }
}

/// The whole document written to the storage slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredState {
    pub curriculum: FlatCurriculum,
    /// Missing in records written before the graph view existed
    #[serde(default)]
    pub graph: FlatGraph,
    /// Opaque CSV import data owned by the UI
    #[serde(default)]
    pub csv: Value,
    /// Write time, ms since epoch
    #[serde(default)]
    pub timestamp: f64,
}

/// Just enough of a stored record to read its write time
#[derive(Debug, Deserialize)]
pub(crate) struct StoredHeader {
    #[serde(default)]
    pub timestamp: Option<f64>,
}
