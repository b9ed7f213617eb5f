//! End-to-end scenarios driven through the public simulation API.

use planet_common::{SimParams, SimulationConfig, Vector2};
use planet_engine::{advance, Body, BodyId, EngineError, GravityModel, Simulation, WorldBounds};

const EPS: f64 = 1e-9;

fn params(width: f64, height: f64, g: f64) -> SimParams {
    SimParams {
        world_width: width,
        world_height: height,
        gravitational_constant: g,
        time_step: 0,
    }
}

fn body(id: u32, mass: f64, radius: f64, pos: (f64, f64), vel: (f64, f64), fixed: bool) -> Body {
    Body::new(
        BodyId(id),
        mass,
        radius,
        Vector2::new(pos.0, pos.1),
        Vector2::new(vel.0, vel.1),
        fixed,
    )
    .unwrap()
}

fn running(params: SimParams, bodies: Vec<Body>) -> Simulation {
    let mut sim = Simulation::from_parts(params, bodies).unwrap();
    sim.start();
    sim
}

#[test]
fn test_earth_moon_first_step() {
    let bodies = vec![
        body(0, 500.0, 20.0, (500.0, 350.0), (0.0, 0.0), false),
        body(1, 10.0, 5.0, (500.0, 500.0), (6.0, 0.0), false),
    ];
    let mut sim = running(params(1200.0, 700.0, 10.0), bodies);
    sim.step().unwrap();

    let earth = sim.body(BodyId(0)).unwrap();
    let moon = sim.body(BodyId(1)).unwrap();

    // The first step's velocity change is exactly that step's acceleration.
    let moon_pull: f64 = 10.0 * 500.0 / (150.0 * 150.0);
    let earth_pull = 10.0 * 10.0 / (150.0 * 150.0);
    assert!((moon_pull - 0.2222).abs() < 1e-4);

    assert!((moon.velocity.x - 6.0).abs() < EPS);
    assert!((moon.velocity.y + moon_pull).abs() < EPS);
    assert!((moon.position.x - 506.0).abs() < EPS);
    assert!((moon.position.y - (500.0 - moon_pull)).abs() < EPS);

    assert!(earth.velocity.x.abs() < EPS);
    assert!((earth.velocity.y - earth_pull).abs() < EPS);
    assert!((earth.velocity.y / moon.velocity.y.abs() - 10.0 / 500.0).abs() < EPS);
}

#[test]
fn test_equal_masses_keep_centre_of_mass() {
    let bodies = vec![
        body(0, 100.0, 5.0, (400.0, 350.0), (0.0, 0.0), false),
        body(1, 100.0, 5.0, (600.0, 350.0), (0.0, 0.0), false),
    ];
    let mut sim = running(params(1000.0, 700.0, 10.0), bodies);
    let start = sim.snapshot().center_of_mass;

    for _ in 0..50 {
        sim.step().unwrap();
        let com = sim.snapshot().center_of_mass;
        assert!((com.0 - start.0).abs() < EPS);
        assert!((com.1 - start.1).abs() < EPS);
    }

    // They did attract each other.
    assert!(sim.bodies()[0].position.x > 400.0);
    assert!(sim.bodies()[1].position.x < 600.0);
}

#[test]
fn test_fixed_body_never_moves() {
    let bodies = vec![
        body(0, 500.0, 20.0, (500.0, 350.0), (0.0, 0.0), true),
        body(1, 10.0, 5.0, (500.0, 500.0), (6.0, 0.0), false),
        body(2, 50.0, 8.0, (200.0, 200.0), (1.0, -2.0), false),
    ];
    let mut sim = running(params(1200.0, 700.0, 10.0), bodies);
    for _ in 0..500 {
        sim.step().unwrap();
        let earth = sim.body(BodyId(0)).unwrap();
        assert_eq!(earth.position, Vector2::new(500.0, 350.0));
        assert_eq!(earth.velocity, Vector2::zero());
    }
}

#[test]
fn test_wall_bounce_reflects_velocity() {
    let bodies = vec![body(0, 1.0, 5.0, (5.0, 350.0), (-5.0, 0.0), false)];
    let mut sim = running(params(1200.0, 700.0, 10.0), bodies);
    sim.step().unwrap();

    let b = &sim.bodies()[0];
    assert!(b.velocity.x > -5.0);
    assert_eq!(b.velocity.x, 5.0);
    assert_eq!(b.position.x, 10.0);
}

#[test]
fn test_head_on_collision_swaps_velocities() {
    let bodies = vec![
        body(0, 1.0, 10.0, (100.0, 100.0), (3.0, 0.0), false),
        body(1, 1.0, 10.0, (118.0, 100.0), (-3.0, 0.0), false),
    ];
    let mut sim = running(params(1000.0, 1000.0, 0.0), bodies);
    sim.step().unwrap();

    let (a, b) = (&sim.bodies()[0], &sim.bodies()[1]);
    assert!((a.velocity.x + 3.0).abs() < EPS);
    assert!((b.velocity.x - 3.0).abs() < EPS);
    assert!((a.momentum() + b.momentum()).magnitude() < EPS);
    // Impulse and half the 8-unit overlap are both folded into the positions.
    assert!((a.position.x - 93.0).abs() < EPS);
    assert!((b.position.x - 125.0).abs() < EPS);
    assert!(a.is_colliding_with(b.id));
    assert!(b.is_colliding_with(a.id));
    assert_eq!(sim.snapshot().contact_pairs, 1);

    // Moving apart now; the contact clears on the next step.
    sim.step().unwrap();
    assert!(!sim.bodies()[0].is_colliding_with(BodyId(1)));
    assert_eq!(sim.snapshot().contact_pairs, 0);
}

#[test]
fn test_exact_touch_after_separation_is_not_colliding() {
    let bodies = vec![
        body(0, 1.0, 10.0, (100.0, 100.0), (0.0, 0.0), false),
        body(1, 1.0, 10.0, (115.0, 100.0), (0.0, 0.0), false),
    ];
    let mut sim = running(params(1000.0, 1000.0, 0.0), bodies);

    // Overlapping by 5: flagged, then pushed apart to exactly touching.
    sim.step().unwrap();
    assert!(sim.bodies()[0].is_colliding_with(BodyId(1)));
    assert_eq!(sim.bodies()[0].position.x, 97.5);
    assert_eq!(sim.bodies()[1].position.x, 117.5);

    // Distance is exactly the radii sum: the flag is dropped and not re-entered.
    for _ in 0..3 {
        sim.step().unwrap();
        let (a, b) = (&sim.bodies()[0], &sim.bodies()[1]);
        assert_eq!((a.position - b.position).magnitude(), a.radius + b.radius);
        assert!(!a.is_colliding_with(b.id));
        assert!(!b.is_colliding_with(a.id));
    }
}

#[test]
fn test_sustained_overlap_gets_one_impulse() {
    // A fixed block and a ball sunk into it: only the step that starts the contact pushes.
    let bodies = vec![
        body(0, 1.0, 10.0, (100.0, 100.0), (0.0, 0.0), true),
        body(1, 1.0, 10.0, (110.0, 100.0), (1.0, 0.0), false),
    ];
    let mut sim = running(params(1000.0, 1000.0, 0.0), bodies);
    sim.step().unwrap();
    let after_first = sim.bodies()[1].velocity;
    assert!(after_first.x.abs() < EPS);
    assert!(sim.bodies()[1].is_colliding_with(BodyId(0)));

    // Still overlapping, still flagged, and no second impulse.
    sim.step().unwrap();
    let ball = &sim.bodies()[1];
    assert!(ball.is_colliding_with(BodyId(0)));
    assert_eq!(ball.velocity, after_first);
    assert!((ball.position.x - 120.0).abs() < 1e-6);
}

#[test]
fn test_advance_is_pure() {
    let bodies = vec![
        body(0, 5.0, 1.0, (10.0, 10.0), (0.0, 0.0), false),
        body(1, 5.0, 1.0, (20.0, 10.0), (0.0, 0.0), false),
    ];
    let bounds = WorldBounds::new(100.0, 100.0).unwrap();
    let gravity = GravityModel::new(10.0);
    let before = bodies.clone();
    let next = advance(&bodies, &bounds, &gravity).unwrap();
    assert_eq!(bodies, before);
    assert_ne!(next, before);
}

#[test]
fn test_degenerate_step_is_retryable() {
    let bodies = vec![
        body(0, 1.0, 1.0, (10.0, 10.0), (0.0, 0.0), false),
        body(1, 1.0, 1.0, (10.0, 10.0), (0.0, 0.0), false),
    ];
    let mut sim = running(params(100.0, 100.0, 10.0), bodies);
    for _ in 0..2 {
        assert!(matches!(sim.step(), Err(EngineError::DegenerateGeometry { .. })));
        assert_eq!(sim.current_step(), 0);
    }
}

#[test]
fn test_build_from_config() {
    let config = SimulationConfig::from_toml_str(
        r#"
        [universe]
        width = 1200.0
        height = 700.0

        [timing]
        total_steps = 10

        [[bodies]]
        name = "earth"
        mass = 500.0
        radius = 20.0
        position = [500.0, 350.0]

        [[bodies]]
        enabled = false
        mass = 1.0
        radius = 1.0
        position = [10.0, 10.0]

        [[bodies]]
        name = "moon"
        mass = 10.0
        radius = 5.0
        position = [500.0, 500.0]
        velocity = [6.0, 0.0]
        "#,
    )
    .unwrap();

    let mut sim = Simulation::new(&config).unwrap();
    assert_eq!(sim.current_body_count(), 2);
    let ids: Vec<BodyId> = sim.bodies().iter().map(|b| b.id).collect();
    assert_eq!(ids, vec![BodyId(0), BodyId(2)]);
    assert_eq!(sim.body(BodyId(2)).unwrap().name.as_deref(), Some("moon"));

    sim.start();
    for _ in 0..config.timing.total_steps {
        sim.step().unwrap();
        sim.record_snapshot();
    }
    assert_eq!(sim.get_recorded_snapshots().len(), 10);
    assert_eq!(sim.get_recorded_snapshots()[9].step, 10);
}

#[test]
fn test_invalid_body_in_config() {
    let config = SimulationConfig::from_toml_str(
        r#"
        [universe]
        width = 100.0
        height = 100.0

        [timing]
        total_steps = 1

        [[bodies]]
        mass = 1.0
        radius = 1.0
        position = [10.0, 10.0]

        [[bodies]]
        mass = 0.0
        radius = 1.0
        position = [50.0, 50.0]
        "#,
    )
    .unwrap();

    assert!(matches!(
        Simulation::new(&config),
        Err(EngineError::InvalidBodyConfig { slot: 1, .. })
    ));
}

#[test]
fn test_recorded_snapshots_survive_bincode() {
    let bodies = vec![
        body(0, 500.0, 20.0, (500.0, 350.0), (0.0, 0.0), true),
        body(1, 10.0, 5.0, (500.0, 500.0), (6.0, 0.0), false).with_name("moon"),
    ];
    let mut sim = running(params(1200.0, 700.0, 10.0), bodies);
    sim.record_snapshot();
    sim.step().unwrap();
    sim.record_snapshot();

    let bytes = bincode::serialize(sim.get_recorded_snapshots()).unwrap();
    let decoded: Vec<planet_common::Snapshot> = bincode::deserialize(&bytes).unwrap();
    assert_eq!(decoded.len(), 2);
    assert_eq!(decoded[1].step, 1);
    assert_eq!(decoded[1].bodies[1].name.as_deref(), Some("moon"));
    assert_eq!(decoded[1].position_of(1), sim.body(BodyId(1)).map(|b| b.position));
}
