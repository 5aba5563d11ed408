//! Flock seeding.
//!
//! Every call builds brand new flocks; nothing from a previous seeding pass is
//! reused.

use rand::Rng;

use crate::agent::{Agent, Flock, Hsla};
use crate::config::SimConfig;
use crate::viewport::Viewport;
use crate::Vector2D;

/// Seed center and size of one flock for a concrete viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlockSpawn {
    pub center: Vector2D,
    pub count: usize,
}

/// Uniform sample in `[-amount, amount]`.
pub(crate) fn jitter<R: Rng + ?Sized>(rng: &mut R, amount: f64) -> f64 {
    if amount > 0.0 {
        rng.gen_range(-amount..=amount)
    } else {
        0.0
    }
}

/// Uniform sample between the bounds of the config's turn interval, in
/// either order.
pub(crate) fn turn_delay<R: Rng + ?Sized>(rng: &mut R, config: &SimConfig) -> f64 {
    let span = config.turn_interval_ms;
    let (low, high) = (span.min.min(span.max), span.min.max(span.max));
    if high > low {
        rng.gen_range(low..=high)
    } else {
        low
    }
}

/// Creates one agent around `center`.
pub fn seed_agent<R: Rng + ?Sized>(
    config: &SimConfig,
    center: Vector2D,
    now_ms: f64,
    rng: &mut R,
) -> Agent {
    let spawn = &config.spawn;
    let look = &config.appearance;

    let heading = spawn.base_heading + jitter(rng, spawn.heading_jitter);
    let speed_multiplier = config.speed_mix.pick(rng.gen::<f64>());
    let hue = look.hue + jitter(rng, look.hue_jitter);
    let lightness = look.lightness + jitter(rng, look.lightness_jitter);
    let diameter = look.diameter + jitter(rng, look.diameter_jitter);
    let position = Vector2D::new(
        center.x + jitter(rng, spawn.position_jitter),
        center.y + jitter(rng, spawn.position_jitter),
    );
    let next_turn_at = now_ms + turn_delay(rng, config);

    let velocity = Vector2D::from_angle(heading) * (config.base_speed * speed_multiplier);
    let mut agent = Agent::new(position, velocity, speed_multiplier)
        .with_turn_at(next_turn_at)
        .with_radius(diameter / 2.0)
        .with_color(Hsla::new(hue, look.saturation, lightness, look.alpha));
    // keep the exact seeded angle even when the speed is zero
    agent.heading = heading;
    agent.target_heading = heading;
    agent
}

/// Seeds every flock the config defines for `viewport`.
pub fn seed_flocks<R: Rng + ?Sized>(
    config: &SimConfig,
    viewport: &Viewport,
    now_ms: f64,
    rng: &mut R,
) -> Vec<Flock> {
    let flocks: Vec<Flock> = config
        .spawns(viewport)
        .into_iter()
        .map(|spawn| {
            let agents = (0..spawn.count)
                .map(|_| seed_agent(config, spawn.center, now_ms, rng))
                .collect();
            Flock::new(spawn.center, agents)
        })
        .collect();

    log::debug!(
        "seeded {} flocks ({} agents) for {}x{}",
        flocks.len(),
        flocks.iter().map(Flock::len).sum::<usize>(),
        viewport.width,
        viewport.height
    );

    flocks
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn viewport() -> Viewport {
        Viewport::new(1200, 800, 1.0)
    }

    #[test]
    fn seeds_documented_group_sizes() {
        let mut rng = StdRng::seed_from_u64(7);
        let flocks = seed_flocks(&SimConfig::default(), &viewport(), 0.0, &mut rng);
        let counts: Vec<usize> = flocks.iter().map(Flock::len).collect();
        assert_eq!(counts, vec![60, 72, 36]);
    }

    #[test]
    fn same_seed_same_flocks() {
        let config = SimConfig::default();
        let a = seed_flocks(&config, &viewport(), 0.0, &mut StdRng::seed_from_u64(99));
        let b = seed_flocks(&config, &viewport(), 0.0, &mut StdRng::seed_from_u64(99));
        for (fa, fb) in a.iter().zip(b.iter()) {
            for (x, y) in fa.agents.iter().zip(fb.agents.iter()) {
                assert_eq!(x.position, y.position);
                assert_eq!(x.heading, y.heading);
                assert_eq!(x.stroke, y.stroke);
            }
        }
    }

    #[test]
    fn agents_stay_inside_seed_window() {
        let config = SimConfig::default();
        let mut rng = StdRng::seed_from_u64(3);
        let now = 5_000.0;
        for flock in seed_flocks(&config, &viewport(), now, &mut rng) {
            for agent in &flock.agents {
                let offset = agent.position - flock.center;
                assert!(offset.x.abs() <= 40.0 && offset.y.abs() <= 40.0);
                assert!(agent.heading.abs() <= 0.2);
                assert!((1000.0..=4000.0).contains(&(agent.next_turn_at - now)));
                assert!((7.5..=12.5).contains(&agent.radius));
                assert!((0.0..=60.0).contains(&agent.color.hue));
                assert!((43.0..=67.0).contains(&agent.color.lightness));
                assert_eq!(agent.color.alpha, 0.8);
                assert!([0.9, 1.0, 1.1].contains(&agent.speed_multiplier));
                let cruise = agent.cruise_speed(config.base_speed);
                assert!((agent.speed() - cruise).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn speed_multiplier_distribution_is_roughly_right() {
        let config = SimConfig {
            agent_count: 5000,
            flocks: vec![crate::config::FlockDef::new(0.5, 0.5, 1.0)],
            ..SimConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(11);
        let flocks = seed_flocks(&config, &viewport(), 0.0, &mut rng);
        let agents = &flocks[0].agents;
        let fast = agents.iter().filter(|a| a.speed_multiplier == 1.1).count();
        let slow = agents.iter().filter(|a| a.speed_multiplier == 0.9).count();
        assert!((1250..=1750).contains(&fast), "fast = {fast}");
        assert!((750..=1250).contains(&slow), "slow = {slow}");
    }

    #[test]
    fn zero_jitter_is_allowed() {
        let mut config = SimConfig::default();
        config.spawn.position_jitter = 0.0;
        config.spawn.heading_jitter = 0.0;
        config.turn_interval_ms = crate::config::Span::new(500.0, 500.0);
        let mut rng = StdRng::seed_from_u64(1);
        let agent = seed_agent(&config, Vector2D::new(10.0, 20.0), 100.0, &mut rng);
        assert_eq!(agent.position, Vector2D::new(10.0, 20.0));
        assert_eq!(agent.heading, 0.0);
        assert_eq!(agent.next_turn_at, 600.0);
    }

    #[test]
    fn turn_delay_tolerates_swapped_or_collapsed_bounds() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut config = SimConfig::default();
        config.turn_interval_ms = crate::config::Span::new(4000.0, 1000.0);
        for _ in 0..50 {
            let delay = turn_delay(&mut rng, &config);
            assert!((1000.0..=4000.0).contains(&delay), "delay {delay}");
        }

        config.turn_interval_ms = crate::config::Span::new(2500.0, 2500.0);
        assert_eq!(turn_delay(&mut rng, &config), 2500.0);
    }
}
