//! Steering forces for one agent.
//!
//! All functions are pure: they read agents and the pointer and return a
//! force, leaving integration to [`crate::Simulation::step`].

use crate::agent::{Agent, Flock, Pointer};
use crate::config::SimConfig;
use crate::Vector2D;

/// Raw accumulators from one neighbor scan.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NeighborScan {
    /// Sum of neighbor velocities.
    pub alignment: Vector2D,
    /// Sum of neighbor positions.
    pub cohesion: Vector2D,
    /// Sum of push-away vectors from agents closer than the minimum separation.
    pub separation: Vector2D,
    pub count: usize,
}

/// Scans `others` (which must not contain `agent` itself).
pub fn scan<'a, I>(agent: &Agent, others: I, config: &SimConfig) -> NeighborScan
where
    I: Iterator<Item = &'a Agent>,
{
    let mut sums = NeighborScan::default();

    for other in others {
        let offset = other.position - agent.position;
        let distance = offset.magnitude();

        if distance < config.neighbor_radius {
            sums.alignment += other.velocity;
            sums.cohesion += other.position;
            sums.count += 1;
        }

        if distance > 0.0 && distance < config.min_separation {
            // full push when touching, none at the threshold
            let push = (config.min_separation - distance) / config.min_separation;
            sums.separation -= offset / distance * push;
        }
    }

    sums
}

/// Weighted blend of alignment, cohesion (seek toward the centroid) and
/// separation.
pub fn flocking<'a, I>(agent: &Agent, others: I, config: &SimConfig) -> Vector2D
where
    I: Iterator<Item = &'a Agent>,
{
    let sums = scan(agent, others, config);

    let (alignment, cohesion) = if sums.count > 0 {
        let n = sums.count as f64;
        (sums.alignment / n, sums.cohesion / n - agent.position)
    } else {
        (Vector2D::zero(), Vector2D::zero())
    };

    alignment * config.alignment_weight
        + cohesion * config.cohesion_weight
        + sums.separation * config.separation_weight
}

/// Push away from an active pointer, strongest right under it and zero at
/// `pointer_radius`.
pub fn pointer_repulsion(agent: &Agent, pointer: &Pointer, config: &SimConfig) -> Vector2D {
    if !pointer.active {
        return Vector2D::zero();
    }

    let away = agent.position - pointer.position();
    let distance = away.magnitude();
    if distance > 0.0 && distance < config.pointer_radius {
        let strength = (config.pointer_radius - distance) / config.pointer_radius;
        away / distance * (strength * config.pointer_weight)
    } else {
        Vector2D::zero()
    }
}

/// Total steering force on `flock.agents[index]`, capped at `max_force`.
pub fn steering_force(
    flock: &Flock,
    index: usize,
    pointer: &Pointer,
    config: &SimConfig,
) -> Vector2D {
    let agent = &flock.agents[index];
    let others = flock
        .agents
        .iter()
        .enumerate()
        .filter(|(j, _)| *j != index)
        .map(|(_, other)| other);

    let force = flocking(agent, others, config) + pointer_repulsion(agent, pointer, config);
    force.limit(config.max_force)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent_at(x: f64, y: f64) -> Agent {
        Agent::new(Vector2D::new(x, y), Vector2D::new(1.08, 0.0), 1.0)
    }

    #[test]
    fn scan_counts_neighbors_inside_radius() {
        let config = SimConfig::default();
        let me = agent_at(0.0, 0.0);
        let others = [agent_at(100.0, 0.0), agent_at(0.0, 499.0), agent_at(600.0, 0.0)];
        let sums = scan(&me, others.iter(), &config);
        assert_eq!(sums.count, 2);
        assert_eq!(sums.cohesion, Vector2D::new(100.0, 499.0));
        assert_eq!(sums.alignment, Vector2D::new(2.16, 0.0));
        assert_eq!(sums.separation, Vector2D::zero());
    }

    #[test]
    fn separation_ramps_linearly() {
        let config = SimConfig::default();
        let me = agent_at(0.0, 0.0);
        let touching = [agent_at(10.0, 0.0)];
        let sums = scan(&me, touching.iter(), &config);
        // 10px into a 40px threshold: 0.75 of full strength, pointing away
        assert!((sums.separation.x + 0.75).abs() < 1e-12);
        assert_eq!(sums.separation.y, 0.0);

        let at_threshold = [agent_at(40.0, 0.0)];
        assert_eq!(scan(&me, at_threshold.iter(), &config).separation, Vector2D::zero());
    }

    #[test]
    fn coincident_agents_do_not_divide_by_zero() {
        let config = SimConfig::default();
        let me = agent_at(5.0, 5.0);
        let twin = [agent_at(5.0, 5.0)];
        let sums = scan(&me, twin.iter(), &config);
        assert_eq!(sums.count, 1);
        assert_eq!(sums.separation, Vector2D::zero());
        assert!(flocking(&me, twin.iter(), &config).x.is_finite());
    }

    #[test]
    fn lone_agent_feels_no_flocking() {
        let config = SimConfig::default();
        let me = agent_at(5.0, 5.0);
        assert_eq!(flocking(&me, std::iter::empty(), &config), Vector2D::zero());
    }

    #[test]
    fn pointer_pushes_away_when_close() {
        let config = SimConfig::default();
        let me = agent_at(110.0, 100.0);
        let mut pointer = Pointer::inactive();
        pointer.move_to(100.0, 100.0);

        let force = pointer_repulsion(&me, &pointer, &config);
        let away = me.position - pointer.position();
        assert!(force.dot(&away) > 0.0);
        assert!((force.x - 3.5 * 60.0 / 70.0).abs() < 1e-12);
    }

    #[test]
    fn inactive_or_distant_pointer_is_ignored() {
        let config = SimConfig::default();
        let me = agent_at(110.0, 100.0);
        let mut pointer = Pointer::inactive();
        assert_eq!(pointer_repulsion(&me, &pointer, &config), Vector2D::zero());

        pointer.move_to(300.0, 100.0);
        assert_eq!(pointer_repulsion(&me, &pointer, &config), Vector2D::zero());
    }

    #[test]
    fn steering_force_is_capped() {
        let config = SimConfig::default();
        let flock = Flock::new(
            Vector2D::zero(),
            vec![agent_at(100.0, 100.0), agent_at(101.0, 100.0)],
        );
        let mut pointer = Pointer::inactive();
        pointer.move_to(95.0, 100.0);
        let force = steering_force(&flock, 0, &pointer, &config);
        assert!((force.magnitude() - config.max_force).abs() < 1e-12);
    }
}
