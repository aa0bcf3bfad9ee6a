use campaign_graph::campaign::{GraphInput, InputEdge, NodeKind};
use campaign_graph::layout::{
    ManualClock, Simulation, SimulationConfig, SimulationDriver, seed_bounds, world_bounds,
};
use eframe::egui::pos2;

fn graph(ids: &[&str], links: &[(&str, &str)]) -> GraphInput {
    let mut input = GraphInput::default();
    for id in ids {
        input.node(*id, id.to_uppercase(), NodeKind::Character);
    }
    for (from, to) in links {
        input.edges.push(InputEdge::new(*from, *to));
    }
    input
}

fn run_until_still(simulation: &mut Simulation, max_steps: usize) -> Option<usize> {
    (1..=max_steps).find(|_| !simulation.step())
}

#[test]
fn chain_settles_at_the_link_length() {
    let config = SimulationConfig::default();
    let mut simulation = Simulation::seed(
        &graph(&["a", "b", "c"], &[("a", "b"), ("b", "c")]),
        config,
        0,
    );

    let steps = run_until_still(&mut simulation, 500);
    assert!(steps.is_some(), "chain still moving after 500 steps");

    let a = simulation.position("a").expect("a");
    let b = simulation.position("b").expect("b");
    let c = simulation.position("c").expect("c");
    let tolerance = config.target_link_length * 0.05;
    for (label, distance) in [("a-b", a.distance(b)), ("b-c", b.distance(c))] {
        assert!(
            (distance - config.target_link_length).abs() < tolerance,
            "{label} settled at {distance}"
        );
    }
}

#[test]
fn single_node_starts_inside_the_seed_rect_and_is_still() {
    let mut simulation = Simulation::seed(&graph(&["solo"], &[]), SimulationConfig::default(), 7);
    let position = simulation.position("solo").expect("seeded");
    assert!(seed_bounds().contains(position), "{position:?}");
    assert_eq!(simulation.velocity("solo"), Some(eframe::egui::Vec2::ZERO));

    assert!(!simulation.step());
}

#[test]
fn disconnected_nodes_spread_out() {
    let ids = (0..50).map(|i| format!("npc-{i}")).collect::<Vec<_>>();
    let refs = ids.iter().map(String::as_str).collect::<Vec<_>>();
    let mut simulation = Simulation::seed(&graph(&refs, &[]), SimulationConfig::default(), 3);

    let steps = run_until_still(&mut simulation, 5_000);
    assert!(steps.is_some(), "50 free nodes never came to rest");

    let positions = refs
        .iter()
        .map(|id| simulation.position(id).expect("seeded"))
        .collect::<Vec<_>>();
    let mut closest = f32::INFINITY;
    for (i, a) in positions.iter().enumerate() {
        for b in &positions[i + 1..] {
            closest = closest.min(a.distance(*b));
        }
    }
    assert!(closest > 5.0, "two nodes ended {closest} apart");
}

#[test]
fn positions_stay_in_the_world_under_absurd_repulsion() {
    let config = SimulationConfig {
        repulsion_strength: 1.0e9,
        ..SimulationConfig::default()
    };
    let ids = ["a", "b", "c", "d", "e", "f"];
    let mut simulation = Simulation::seed(&graph(&ids, &[("a", "b"), ("c", "d")]), config, 1);

    let world = world_bounds();
    for _ in 0..50 {
        simulation.step();
        for node in &simulation.snapshot().nodes {
            assert!(world.contains(node.pos()), "{} escaped to {:?}", node.id, node.pos());
        }
    }
}

#[test]
fn coincident_nodes_stay_finite() {
    let mut simulation = Simulation::seed(
        &graph(&["a", "b"], &[("a", "b")]),
        SimulationConfig::default(),
        0,
    );
    simulation.place("a", pos2(10.0, 10.0));
    simulation.place("b", pos2(10.0, 10.0));

    for _ in 0..3 {
        simulation.step();
        for id in ["a", "b"] {
            let position = simulation.position(id).expect("seeded");
            let velocity = simulation.velocity(id).expect("seeded");
            assert!(position.x.is_finite() && position.y.is_finite());
            assert!(velocity.x.is_finite() && velocity.y.is_finite());
        }
    }
    let a = simulation.position("a").expect("a");
    let b = simulation.position("b").expect("b");
    assert!(a.distance(b) > 0.0);
}

#[test]
fn long_range_repulsion_separates_far_components() {
    let ids = ["a", "b"];
    let local = SimulationConfig {
        center_force_strength: 0.0,
        ..SimulationConfig::default()
    };
    let global = SimulationConfig {
        long_range_repulsion: true,
        ..local
    };

    let mut without = Simulation::seed(&graph(&ids, &[]), local, 0);
    let mut with = Simulation::seed(&graph(&ids, &[]), global, 0);
    for simulation in [&mut without, &mut with] {
        simulation.place("a", pos2(-300.0, 0.0));
        simulation.place("b", pos2(300.0, 0.0));
        simulation.step();
    }

    assert_eq!(without.position("a"), Some(pos2(-300.0, 0.0)));
    assert!(with.position("a").expect("a").x < -300.0);
    assert!(with.position("b").expect("b").x > 300.0);
}

#[test]
fn driver_relaxes_a_graph_frame_by_frame() {
    let clock = ManualClock::new();
    let mut driver = SimulationDriver::new(clock.clone(), SimulationConfig::default());
    driver.initialize(graph(&["a", "b", "c"], &[("a", "b"), ("b", "c"), ("a", "ghost")]));

    let mut frames = 0;
    while clock.fire().is_some() {
        assert!(driver.on_frame());
        frames += 1;
        assert!(frames <= 500, "driver never went idle");
    }

    let snapshot = driver.snapshot();
    assert!(!driver.is_running());
    assert!(!snapshot.moving);
    assert_eq!(snapshot.revision, frames);
    assert_eq!(snapshot.edges.len(), 2);
}
