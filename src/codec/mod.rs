//! Graph codec: live object graph <-> flat durable record
//!
//! The durable form holds ids only, never references, so it is acyclic and
//! safe to hand to `serde_json`. Decoding rebuilds shared references with
//! lookup tables built by [`index`]:
//! - `encode`: live -> flat
//! - `decode`: flat -> live (two-pass, so forward references resolve)
//! - `record`: the serde shapes of the durable record

pub mod decode;
pub mod encode;
pub mod index;
pub mod record;

pub use decode::{
    decode_course, decode_courses, decode_curriculum, decode_edge, decode_graph, decode_node,
};
pub use encode::{encode_course, encode_curriculum, encode_edge, encode_graph, encode_node};
pub use index::{CourseIndex, ModuleIndex, build_index, course_index, module_index};
pub use record::{
    FlatCourse, FlatCurriculum, FlatGraph, StoredEdge, StoredEdgeData, StoredNode,
    StoredNodeData, StoredState,
};
