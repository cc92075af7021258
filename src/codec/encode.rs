//! Live graph -> flat record

use std::rc::Weak;

use serde_json::{Map, Value};

use super::record::{
    FlatCourse, FlatCurriculum, FlatGraph, StoredEdge, StoredEdgeData, StoredNode,
    StoredNodeData,
};
use crate::model::{
    Course, CourseId, CourseRef, Curriculum, Graph, GraphEdge, GraphNode, Module,
};

/// Payload keys the UI attaches at runtime. Never persisted.
pub const UI_ONLY_FIELDS: &[&str] = &["onDelete", "onSelect", "selected", "dragging"];

fn primary_id(course: &CourseRef) -> Option<CourseId> {
    course.borrow().id.primary().map(CourseId::from)
}

fn strip_ui_fields(extra: &Map<String, Value>) -> Map<String, Value> {
    extra
        .iter()
        .filter(|(key, _)| !UI_ONLY_FIELDS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Replace module and prerequisite references with ids.
///
/// Prerequisites are written as their primary id, not their alias set.
/// Prerequisites that no longer exist are skipped.
pub fn encode_course(course: &Course) -> FlatCourse {
    FlatCourse {
        id: course.id.clone(),
        name: course.name.clone(),
        credits: course.credits,
        semester: course.semester,
        modules: course.modules.iter().map(|m| m.code.clone()).collect(),
        prerequisites: course
            .prerequisites
            .iter()
            .filter_map(Weak::upgrade)
            .filter_map(|p| primary_id(&p))
            .collect(),
        extra: course.extra.clone(),
    }
}

pub fn encode_node(node: &GraphNode) -> StoredNode {
    StoredNode {
        id: node.id.clone(),
        kind: node.kind.clone(),
        position: node.position,
        data: StoredNodeData {
            lv: node.data.lv.as_ref().map(|course| encode_course(&course.borrow())),
            extra: strip_ui_fields(&node.data.extra),
        },
    }
}

pub fn encode_edge(edge: &GraphEdge) -> StoredEdge {
    StoredEdge {
        id: edge.id.clone(),
        source: edge.source.clone(),
        target: edge.target.clone(),
        kind: edge.kind.clone(),
        data: StoredEdgeData {
            source_course: edge.data.source_course.as_ref().and_then(primary_id),
            target_course: edge.data.target_course.as_ref().and_then(primary_id),
            extra: strip_ui_fields(&edge.data.extra),
        },
    }
}

pub fn encode_curriculum(curriculum: &Curriculum) -> FlatCurriculum {
    FlatCurriculum {
        credits: curriculum.credits,
        modules: curriculum.modules.iter().map(|m| Module::clone(m)).collect(),
        courses: curriculum
            .courses
            .iter()
            .map(|c| encode_course(&c.borrow()))
            .collect(),
        degree_type: curriculum.degree_type,
        start_semester: curriculum.start_semester,
        major_module: curriculum.major_module.clone(),
        minor_module: curriculum.minor_module.clone(),
    }
}

pub fn encode_graph(graph: &Graph) -> FlatGraph {
    FlatGraph {
        nodes: graph.nodes.iter().map(encode_node).collect(),
        edges: graph.edges.iter().map(encode_edge).collect(),
        stroke_width: graph.stroke_width,
        stroke_color: graph.stroke_color.clone(),
        semester_count: graph.semester_count,
        course_card_states: graph.course_card_states.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DeleteHandler, Position};
    use serde_json::json;

    fn sample() -> (CourseRef, CourseRef) {
        let m1 = Module::new("M1", "Basics").into_ref();
        let cs1 = Course::new(CourseId::from(&["CS1", "INF-1"][..]), "Intro").into_ref();
        let mut cs2 = Course::new("CS2", "Algorithms");
        cs2.modules.push(m1);
        cs2.add_prerequisite(&cs1);
        (cs1, cs2.into_ref())
    }

    #[test]
    fn test_encode_course_uses_codes_and_primary_ids() {
        let (_cs1, cs2) = sample();
        let flat = encode_course(&cs2.borrow());

        assert_eq!(flat.id, CourseId::from("CS2"));
        assert_eq!(flat.modules, vec!["M1".to_string()]);
        // Primary id only, not the alias set
        assert_eq!(flat.prerequisites, vec![CourseId::from("CS1")]);
        // Input untouched
        assert_eq!(cs2.borrow().prerequisites.len(), 1);
        assert_eq!(cs2.borrow().modules.len(), 1);
    }

    #[test]
    fn test_encode_node_strips_ui_fields() {
        let (_cs1, cs2) = sample();
        let mut node = GraphNode::for_course("n-cs2", Position::new(10.0, 20.0), &cs2);
        node.data.on_delete = Some(DeleteHandler::new(|_| {}));
        node.data.extra.insert("onDelete".to_string(), json!("fn"));
        node.data.extra.insert("color".to_string(), json!("#fff"));

        let stored = encode_node(&node);
        let value = serde_json::to_value(&stored).unwrap();

        assert_eq!(value["data"]["lv"]["id"], json!("CS2"));
        assert_eq!(value["data"]["lv"]["prerequisites"], json!(["CS1"]));
        assert_eq!(value["data"]["color"], json!("#fff"));
        assert!(value["data"].get("onDelete").is_none());
        assert_eq!(value["type"], json!("course"));
    }

    #[test]
    fn test_encode_node_without_course_passes_through() {
        let mut node = GraphNode::new("label", Position::new(1.0, 2.0));
        node.data.extra.insert("text".to_string(), json!("Semester 1"));

        let stored = encode_node(&node);
        assert!(stored.data.lv.is_none());
        assert_eq!(stored.data.extra, node.data.extra);
        assert_eq!(stored.position, node.position);
    }

    #[test]
    fn test_encode_edge_writes_primary_ids() {
        let (cs1, cs2) = sample();
        let mut edge = GraphEdge::new("e1", "n-cs1", "n-cs2");
        edge.data.source_course = Some(cs1);
        edge.data.target_course = Some(cs2);

        let stored = encode_edge(&edge);
        assert_eq!(stored.data.source_course, Some(CourseId::from("CS1")));
        assert_eq!(stored.data.target_course, Some(CourseId::from("CS2")));
    }

    #[test]
    fn test_self_prerequisite_encodes() {
        let course = Course::new("LOOP", "Loop").into_ref();
        let weak = std::rc::Rc::downgrade(&course);
        course.borrow_mut().prerequisites.push(weak);

        let flat = encode_course(&course.borrow());
        assert_eq!(flat.prerequisites, vec![CourseId::from("LOOP")]);
    }

    #[test]
    fn test_encoded_curriculum_is_plain_json() {
        let (cs1, cs2) = sample();
        let curriculum = Curriculum {
            courses: vec![cs1, cs2.clone()],
            modules: cs2.borrow().modules.clone(),
            ..Default::default()
        };

        let json = serde_json::to_string(&encode_curriculum(&curriculum)).unwrap();
        let back: FlatCurriculum = serde_json::from_str(&json).unwrap();
        assert_eq!(back.courses.len(), 2);
        assert_eq!(back.courses[0].id, CourseId::from(&["CS1", "INF-1"][..]));
    }
}
