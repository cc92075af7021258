//! Live planning state
//!
//! These are the in-memory types the UI mutates. Courses and modules are
//! shared by reference so that every view of a course sees the same instance:
//! - `ModuleRef`: immutable shared module
//! - `CourseRef`: shared, mutable course
//!
//! Prerequisite links are `Weak` so that prerequisite cycles never keep
//! courses alive; ownership of courses sits in `Curriculum::courses` and in
//! the graph nodes/edges that embed them.

pub mod course;
pub mod curriculum;
pub mod graph;

pub use course::{Course, CourseId, CourseRef, Module, ModuleRef};
pub use curriculum::{Curriculum, DegreeType, StartSemester};
pub use graph::{
    CourseCardState, DeleteHandler, EdgeData, Graph, GraphEdge, GraphNode, NodeData, Position,
};
