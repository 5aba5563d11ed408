use std::f64::consts::{FRAC_PI_2, PI};

use flock_core::behavior::steering_force;
use flock_core::sim::wrap_angle;
use flock_core::{Agent, Flock, Pointer, SimConfig, Simulation, Vector2D, Viewport};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

const EPS: f64 = 1e-9;

fn pair(heading: f64) -> Simulation {
    let velocity = Vector2D::from_angle(heading) * 1.08;
    let a = Agent::new(Vector2D::new(200.0, 200.0), velocity, 1.0);
    let b = Agent::new(Vector2D::new(210.0, 200.0), velocity, 1.0);
    Simulation::from_flocks(
        SimConfig::default(),
        Viewport::new(800, 600, 1.0),
        vec![Flock::new(Vector2D::new(205.0, 200.0), vec![a, b])],
    )
}

fn pair_distance(sim: &Simulation) -> f64 {
    let agents = &sim.flocks()[0].agents;
    agents[0].position.distance(&agents[1].position)
}

#[test]
fn close_pair_moving_sideways_drifts_apart() {
    let mut sim = pair(-FRAC_PI_2);
    let before = pair_distance(&sim);
    sim.step(0.0, &mut StdRng::seed_from_u64(1));
    assert!(pair_distance(&sim) > before);
}

#[test]
fn close_pair_moving_along_their_axis_drifts_apart() {
    let mut sim = pair(0.0);
    let before = pair_distance(&sim);
    sim.step(0.0, &mut StdRng::seed_from_u64(1));
    let after = pair_distance(&sim);
    assert!(after > before, "{after} <= {before}");

    let agents = &sim.flocks()[0].agents;
    assert!(agents[0].speed() < agents[1].speed());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn speed_stays_in_band_and_positions_wrap(
        seed: u64,
        width in 50u32..1600,
        height in 50u32..1200,
        pointer in proptest::option::of((0.0f64..1600.0, 0.0f64..1200.0)),
    ) {
        let config = SimConfig::default();
        let mut rng = StdRng::seed_from_u64(seed);
        let viewport = Viewport::new(width, height, 1.0);
        let mut sim = Simulation::new(config.clone(), viewport, 0.0, &mut rng).unwrap();
        if let Some((x, y)) = pointer {
            sim.pointer_mut().move_to(x, y);
        }

        for frame in 1..=20u32 {
            sim.step(f64::from(frame) * 1000.0 / 60.0, &mut rng);
            for agent in sim.agents() {
                let cruise = agent.cruise_speed(config.base_speed);
                let speed = agent.speed();
                prop_assert!(speed >= 0.7 * cruise - EPS, "speed {} below {}", speed, 0.7 * cruise);
                prop_assert!(speed <= 1.3 * cruise + EPS, "speed {} above {}", speed, 1.3 * cruise);
                prop_assert!(agent.position.x >= 0.0 && agent.position.x < f64::from(width));
                prop_assert!(agent.position.y >= 0.0 && agent.position.y < f64::from(height));
            }
        }
    }

    #[test]
    fn drift_turn_never_exceeds_cap(heading in -PI..PI, offset in -PI..=PI) {
        let config = SimConfig::default();
        let mut agent = Agent::new(
            Vector2D::new(300.0, 300.0),
            Vector2D::from_angle(heading) * config.base_speed,
            1.0,
        );
        agent.target_heading = heading + offset;
        let before = agent.heading;
        let mut sim = Simulation::from_flocks(
            config.clone(),
            Viewport::new(800, 600, 1.0),
            vec![Flock::new(Vector2D::zero(), vec![agent])],
        );
        sim.step(0.0, &mut StdRng::seed_from_u64(0));

        let turned = wrap_angle(sim.flocks()[0].agents[0].heading - before).abs();
        prop_assert!(turned <= config.max_turn_rate / 60.0 + EPS, "turned {}", turned);
    }

    #[test]
    fn pointer_force_points_away(angle in -PI..PI, heading in -PI..PI) {
        let config = SimConfig::default();
        let pointer_at = Vector2D::new(400.0, 300.0);
        let agent = Agent::new(
            pointer_at + Vector2D::from_angle(angle) * 10.0,
            Vector2D::from_angle(heading) * config.base_speed,
            1.0,
        );
        let flock = Flock::new(pointer_at, vec![agent]);
        let mut pointer = Pointer::inactive();
        pointer.move_to(pointer_at.x, pointer_at.y);

        let force = steering_force(&flock, 0, &pointer, &config);
        let away = flock.agents[0].position - pointer_at;
        prop_assert!(force.magnitude() > 0.0);
        prop_assert!(force.dot(&away) > 0.0);
    }

    #[test]
    fn reseeding_matches_flock_definitions(seed: u64, width in 0u32..3000, height in 0u32..3000) {
        let config = SimConfig::default();
        let viewport = Viewport::new(width, height, 1.0);
        let mut rng = StdRng::seed_from_u64(seed);
        let mut sim = Simulation::new(config, viewport, 0.0, &mut rng).unwrap();
        for _ in 0..2 {
            let counts: Vec<usize> = sim.flocks().iter().map(Flock::len).collect();
            prop_assert_eq!(counts, vec![60, 72, 36]);
            sim.resize(viewport, 10.0, &mut rng);
        }
    }
}
