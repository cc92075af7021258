//! Flat record -> live graph
//!
//! Courses are rebuilt in two passes because prerequisites point at other
//! courses of the same batch:
//! 1. build every course with its modules resolved and no prerequisites
//! 2. index the new courses by every alias, then resolve prerequisites
//!
//! Unresolvable ids are dropped silently. A reference that resolves to a
//! course already in the list is dropped as well.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use super::index::{CourseIndex, ModuleIndex, course_index, module_index, resolve_first};
use super::record::{FlatCourse, FlatCurriculum, FlatGraph, StoredEdge, StoredNode};
use crate::model::{
    Course, CourseId, CourseRef, Curriculum, EdgeData, Graph, GraphEdge, GraphNode, ModuleRef,
    NodeData,
};

fn resolve_modules(codes: &[String], modules: &ModuleIndex) -> Vec<ModuleRef> {
    let mut resolved: Vec<ModuleRef> = Vec::with_capacity(codes.len());
    for code in codes {
        if let Some(module) = modules.get(code) {
            if !resolved.iter().any(|m| Rc::ptr_eq(m, module)) {
                resolved.push(Rc::clone(module));
            }
        }
    }
    resolved
}

fn resolve_course(id: &CourseId, courses: &CourseIndex) -> Option<CourseRef> {
    resolve_first(courses, id.keys())
}

fn resolve_prerequisites(ids: &[CourseId], courses: &CourseIndex) -> Vec<Weak<RefCell<Course>>> {
    let mut resolved: Vec<CourseRef> = Vec::with_capacity(ids.len());
    for id in ids {
        if let Some(course) = resolve_course(id, courses) {
            if !resolved.iter().any(|c| Rc::ptr_eq(c, &course)) {
                resolved.push(course);
            }
        }
    }
    resolved.iter().map(Rc::downgrade).collect()
}

/// First pass: a course with modules but no prerequisites yet
fn shell_course(flat: &FlatCourse, modules: &ModuleIndex) -> Course {
    Course {
        id: flat.id.clone(),
        name: flat.name.clone(),
        credits: flat.credits,
        semester: flat.semester,
        modules: resolve_modules(&flat.modules, modules),
        prerequisites: Vec::new(),
        extra: flat.extra.clone(),
    }
}

/// Rebuild a single course against existing indices.
///
/// Used for courses that live outside the batch being decoded, such as a
/// graph node whose course is not part of the curriculum.
pub fn decode_course(flat: &FlatCourse, courses: &CourseIndex, modules: &ModuleIndex) -> Course {
    let mut course = shell_course(flat, modules);
    course.prerequisites = resolve_prerequisites(&flat.prerequisites, courses);
    course
}

/// Rebuild a batch of courses, resolving prerequisites within the batch
pub fn decode_courses(flat: &[FlatCourse], modules: &[ModuleRef]) -> Vec<CourseRef> {
    let module_index = module_index(modules);

    let courses: Vec<CourseRef> = flat
        .iter()
        .map(|f| shell_course(f, &module_index).into_ref())
        .collect();

    let index = course_index(&courses);
    for (f, course) in flat.iter().zip(&courses) {
        let prerequisites = resolve_prerequisites(&f.prerequisites, &index);
        course.borrow_mut().prerequisites = prerequisites;
    }

    courses
}

/// Rebuild a node's embedded course.
///
/// A course known to the index is shared, never duplicated; other payload
/// fields come back unchanged.
pub fn decode_node(node: &StoredNode, courses: &CourseIndex, modules: &ModuleIndex) -> GraphNode {
    let lv = node.data.lv.as_ref().map(|flat| {
        resolve_course(&flat.id, courses)
            .unwrap_or_else(|| decode_course(flat, courses, modules).into_ref())
    });

    GraphNode {
        id: node.id.clone(),
        kind: node.kind.clone(),
        position: node.position,
        data: NodeData {
            lv,
            on_delete: None,
            extra: node.data.extra.clone(),
        },
    }
}

pub fn decode_edge(edge: &StoredEdge, courses: &CourseIndex) -> GraphEdge {
    GraphEdge {
        id: edge.id.clone(),
        source: edge.source.clone(),
        target: edge.target.clone(),
        kind: edge.kind.clone(),
        data: EdgeData {
            source_course: edge
                .data
                .source_course
                .as_ref()
                .and_then(|id| resolve_course(id, courses)),
            target_course: edge
                .data
                .target_course
                .as_ref()
                .and_then(|id| resolve_course(id, courses)),
            extra: edge.data.extra.clone(),
        },
    }
}

pub fn decode_curriculum(flat: &FlatCurriculum) -> Curriculum {
    let modules: Vec<ModuleRef> = flat.modules.iter().cloned().map(Rc::new).collect();
    let courses = decode_courses(&flat.courses, &modules);

    Curriculum {
        credits: flat.credits,
        modules,
        courses,
        degree_type: flat.degree_type,
        start_semester: flat.start_semester,
        major_module: flat.major_module.clone(),
        minor_module: flat.minor_module.clone(),
    }
}

/// Rebuild the graph against an already decoded curriculum.
///
/// A course that only lives in the graph is rebuilt once, by the first node
/// embedding it. Later nodes and edges naming it share that instance.
pub fn decode_graph(flat: &FlatGraph, curriculum: &Curriculum) -> Graph {
    let mut courses = course_index(&curriculum.courses);
    let modules = module_index(&curriculum.modules);

    let mut nodes = Vec::with_capacity(flat.nodes.len());
    for stored in &flat.nodes {
        let node = decode_node(stored, &courses, &modules);
        if let Some(lv) = &node.data.lv {
            for key in lv.borrow().id.keys() {
                courses
                    .entry(key.to_owned())
                    .or_insert_with(|| Rc::clone(lv));
            }
        }
        nodes.push(node);
    }

    Graph {
        nodes,
        edges: flat.edges.iter().map(|e| decode_edge(e, &courses)).collect(),
        stroke_width: flat.stroke_width,
        stroke_color: flat.stroke_color.clone(),
        semester_count: flat.semester_count,
        course_card_states: flat.course_card_states.clone(),
    }
}
