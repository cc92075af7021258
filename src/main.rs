//! Planner State entry point
//!
//! The web build is driven from JavaScript through the library's `web`
//! bindings. Natively this runs a save/load smoke check against in-memory
//! storage.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Planner State (native) starting...");
    log::info!("Native mode uses in-memory storage - build for wasm32 to use LocalStorage");

    println!("\nRunning persistence smoke check...");
    smoke_check();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is `web::start`, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn smoke_check() {
    use std::rc::Rc;

    use planner_state::model::{Course, Curriculum, Graph, GraphEdge, GraphNode, Module, Position};
    use planner_state::platform::{ManualScheduler, MemoryStorage};
    use planner_state::{AppState, Settings, StateManager};

    let storage = MemoryStorage::new();
    let scheduler = ManualScheduler::new();
    let manager = StateManager::new(
        AppState::new(),
        storage.clone(),
        scheduler.clone(),
        Settings::default(),
    );
    manager.init();

    let basics = Module::new("M1", "Basics").into_ref();
    let mut intro = Course::new("CS1", "Introduction to Programming");
    intro.modules.push(basics.clone());
    let intro = intro.into_ref();
    let mut algorithms = Course::new("CS2", "Algorithms");
    algorithms.modules.push(basics.clone());
    algorithms.add_prerequisite(&intro);
    let algorithms = algorithms.into_ref();

    let n1 = GraphNode::for_course("n-cs1", Position::new(0.0, 0.0), &intro);
    let n2 = GraphNode::for_course("n-cs2", Position::new(0.0, 120.0), &algorithms);
    let edge = GraphEdge::between("e-cs1-cs2", &n1, &n2);

    manager.state().curriculum.set(Curriculum {
        credits: 180.0,
        modules: vec![basics],
        courses: vec![intro, algorithms],
        ..Default::default()
    });
    manager.state().graph.set(Graph {
        nodes: vec![n1, n2],
        edges: vec![edge],
        ..Default::default()
    });

    // Debounced autosave fires once for both changes
    scheduler.advance(u64::from(manager.settings().save_debounce_ms));
    assert!(manager.has_state(), "Autosave should have written the state");

    manager.state().curriculum.set(Curriculum::default());
    assert!(manager.load(), "Stored state should load");

    let curriculum = manager.state().curriculum.get();
    let graph = manager.state().graph.get();
    let cs1 = curriculum.find_course("CS1").expect("CS1 restored");
    let cs2 = curriculum.find_course("CS2").expect("CS2 restored");
    assert!(Rc::ptr_eq(&cs2.borrow().prerequisite_refs()[0], &cs1));
    assert!(Rc::ptr_eq(graph.nodes[0].data.lv.as_ref().expect("lv"), &cs1));
    assert!(Rc::ptr_eq(
        graph.edges[0].data.target_course.as_ref().expect("target"),
        &cs2
    ));

    manager.clear();
    assert!(!manager.has_state());
    println!("✓ Persistence smoke check passed!");
}
