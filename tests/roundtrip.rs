use std::rc::Rc;

use planner_state::codec::{
    StoredState, decode_curriculum, decode_graph, encode_curriculum, encode_graph,
};
use planner_state::model::{
    Course, CourseId, Curriculum, Graph, GraphEdge, GraphNode, Module, Position,
};
use proptest::collection::vec;
use proptest::prelude::*;
use serde_json::Value;

#[derive(Debug, Clone)]
struct CourseSpec {
    in_module: Vec<bool>,
    requires: Vec<bool>,
    aliased: bool,
    credits: u32,
}

#[derive(Debug, Clone)]
struct PlanSpec {
    module_count: usize,
    courses: Vec<CourseSpec>,
    edges: Vec<(usize, usize)>,
}

fn arb_plan() -> impl Strategy<Value = PlanSpec> {
    (1usize..8, 0usize..4).prop_flat_map(|(n, m)| {
        let course = (vec(any::<bool>(), m), vec(any::<bool>(), n), any::<bool>(), 0u32..30)
            .prop_map(|(in_module, requires, aliased, credits)| CourseSpec {
                in_module,
                requires,
                aliased,
                credits,
            });
        (vec(course, n), vec((0..n, 0..n), 0..6)).prop_map(move |(courses, edges)| PlanSpec {
            module_count: m,
            courses,
            edges,
        })
    })
}

fn build(spec: &PlanSpec) -> (Curriculum, Graph) {
    let modules: Vec<_> = (0..spec.module_count)
        .map(|j| Module::new(format!("M{j}"), format!("Module {j}")).into_ref())
        .collect();

    let courses: Vec<_> = spec
        .courses
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let id = if c.aliased {
                CourseId::from(vec![format!("C{i}"), format!("ALIAS{i}")])
            } else {
                CourseId::from(format!("C{i}"))
            };
            let mut course = Course::new(id, format!("Course {i}"));
            course.credits = f64::from(c.credits);
            course.modules = modules
                .iter()
                .zip(&c.in_module)
                .filter(|(_, member)| **member)
                .map(|(m, _)| Rc::clone(m))
                .collect();
            course.into_ref()
        })
        .collect();

    for (wanted, course) in spec.courses.iter().zip(&courses) {
        for (prereq, required) in courses.iter().zip(&wanted.requires) {
            if *required {
                course.borrow_mut().add_prerequisite(prereq);
            }
        }
    }

    let nodes: Vec<_> = courses
        .iter()
        .enumerate()
        .map(|(i, c)| GraphNode::for_course(format!("n{i}"), Position::new(0.0, i as f64), c))
        .collect();
    let edges = spec
        .edges
        .iter()
        .enumerate()
        .map(|(k, (a, b))| GraphEdge::between(format!("e{k}"), &nodes[*a], &nodes[*b]))
        .collect();

    let curriculum = Curriculum {
        credits: 180.0,
        modules,
        courses,
        ..Default::default()
    };
    let graph = Graph {
        nodes,
        edges,
        ..Default::default()
    };
    (curriculum, graph)
}

fn through_json(curriculum: &Curriculum, graph: &Graph) -> (Curriculum, Graph) {
    let record = StoredState {
        curriculum: encode_curriculum(curriculum),
        graph: encode_graph(graph),
        csv: Value::Null,
        timestamp: 0.0,
    };
    let json = serde_json::to_string(&record).unwrap();
    let record: StoredState = serde_json::from_str(&json).unwrap();
    let curriculum = decode_curriculum(&record.curriculum);
    let graph = decode_graph(&record.graph, &curriculum);
    (curriculum, graph)
}

fn assert_owned_by(curriculum: &Curriculum, course: &planner_state::model::CourseRef) {
    let id = course.borrow().id.primary().unwrap().to_string();
    let owner = curriculum.find_course(&id).unwrap();
    assert!(Rc::ptr_eq(&owner, course), "{id} is not shared");
}

proptest! {
    #[test]
    fn roundtrip_preserves_values(spec in arb_plan()) {
        let (curriculum, graph) = build(&spec);
        let (back_curriculum, back_graph) = through_json(&curriculum, &graph);

        prop_assert_eq!(encode_curriculum(&back_curriculum), encode_curriculum(&curriculum));
        prop_assert_eq!(encode_graph(&back_graph), encode_graph(&graph));
    }

    #[test]
    fn roundtrip_shares_course_instances(spec in arb_plan()) {
        let (curriculum, graph) = build(&spec);
        let (curriculum, graph) = through_json(&curriculum, &graph);

        for course in &curriculum.courses {
            for prereq in course.borrow().prerequisite_refs() {
                assert_owned_by(&curriculum, &prereq);
            }
            for module in &course.borrow().modules {
                let owner = curriculum.find_module(&module.code).unwrap();
                prop_assert!(Rc::ptr_eq(&owner, module));
            }
        }
        for node in &graph.nodes {
            assert_owned_by(&curriculum, node.data.lv.as_ref().unwrap());
        }
        for edge in &graph.edges {
            assert_owned_by(&curriculum, edge.data.source_course.as_ref().unwrap());
            assert_owned_by(&curriculum, edge.data.target_course.as_ref().unwrap());
        }
    }

    #[test]
    fn encoding_flat_input_is_stable(spec in arb_plan()) {
        let (curriculum, graph) = build(&spec);
        let flat = encode_curriculum(&curriculum);
        let flat_graph = encode_graph(&graph);

        let decoded = decode_curriculum(&flat);
        let decoded_graph = decode_graph(&flat_graph, &decoded);
        prop_assert_eq!(encode_curriculum(&decoded), flat);
        prop_assert_eq!(encode_graph(&decoded_graph), flat_graph);
    }
}

#[test]
fn alias_referenced_by_either_name() {
    let json = r#"{
        "credits": 0,
        "modules": [],
        "courses": [
            {"id": ["A", "B"]},
            {"id": "X", "prerequisites": ["A"]},
            {"id": "Y", "prerequisites": ["B"]}
        ]
    }"#;
    let curriculum = decode_curriculum(&serde_json::from_str(json).unwrap());

    let x = curriculum.courses[1].borrow().prerequisite_refs();
    let y = curriculum.courses[2].borrow().prerequisite_refs();
    assert!(Rc::ptr_eq(&x[0], &y[0]));
    assert!(Rc::ptr_eq(&x[0], &curriculum.courses[0]));
}

#[test]
fn two_courses_share_one_module() {
    let json = r#"{
        "modules": [{"code": "M1"}],
        "courses": [
            {"id": "CS1", "module": ["M1"], "prerequisites": []},
            {"id": "CS2", "module": ["M1"], "prerequisites": ["CS1"]}
        ]
    }"#;
    let curriculum = decode_curriculum(&serde_json::from_str(json).unwrap());

    let cs1 = &curriculum.courses[0];
    let cs2 = curriculum.courses[1].borrow();
    assert!(Rc::ptr_eq(&cs2.prerequisite_refs()[0], cs1));
    assert!(Rc::ptr_eq(&cs2.modules[0], &cs1.borrow().modules[0]));
    assert!(Rc::ptr_eq(&cs2.modules[0], &curriculum.modules[0]));
}

#[test]
fn graph_only_course_keeps_its_edge_links() {
    let ext = Course::new("EXT", "Elective abroad").into_ref();
    let n1 = GraphNode::for_course("n1", Position::new(0.0, 0.0), &ext);
    let n2 = GraphNode::for_course("n2", Position::new(0.0, 100.0), &ext);
    let edge = GraphEdge::between("e", &n1, &n2);
    let graph = Graph {
        nodes: vec![n1, n2],
        edges: vec![edge],
        ..Default::default()
    };

    let (curriculum, back) = through_json(&Curriculum::default(), &graph);
    assert!(curriculum.courses.is_empty());

    let a = back.nodes[0].data.lv.as_ref().unwrap();
    let b = back.nodes[1].data.lv.as_ref().unwrap();
    assert!(Rc::ptr_eq(a, b));
    assert!(Rc::ptr_eq(back.edges[0].data.source_course.as_ref().unwrap(), a));

    // A second save keeps the links
    let (_, again) = through_json(&curriculum, &back);
    assert_eq!(encode_graph(&again), encode_graph(&graph));
}
