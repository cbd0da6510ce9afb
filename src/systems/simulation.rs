//! Fixed-step simulation system
//!
//! Manages the simulation loop including:
//! - Fixed time stepping of the physics world
//! - Periodic logging of body state
//! - Debug geometry collection on logged steps

use impulse2d_math::Vec2;
use impulse2d_physics::{DebugRenderer, LineBatch, PhysicsWorld};

use crate::config::{DebugConfig, SimulationConfig};

/// Result of a simulation update
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationResult {
    /// Steps completed so far
    pub step: u64,
    /// Contacts live during this step
    pub contacts: usize,
    /// Whether this step was logged (and drawn)
    pub logged: bool,
}

/// Debug renderer that buffers lines and counts the primitives drawn
#[derive(Debug, Default)]
pub struct ContactTally {
    /// Buffered line geometry
    pub lines: LineBatch,
    /// Number of contact markers drawn
    pub points: usize,
}

impl DebugRenderer for ContactTally {
    fn draw_line(&mut self, from: Vec2, to: Vec2) {
        self.lines.draw_line(from, to);
    }

    fn draw_point(&mut self, point: Vec2) {
        self.points += 1;
        self.lines.draw_point(point);
    }
}

/// Steps a physics world at a fixed rate
pub struct SimulationSystem {
    time_step: f32,
    log_interval: u64,
    draw_contacts: bool,
    debug: ContactTally,
}

impl SimulationSystem {
    /// Create a new simulation system
    pub fn new(simulation: &SimulationConfig, debug: &DebugConfig) -> Self {
        Self {
            time_step: simulation.time_step,
            log_interval: simulation.log_interval,
            draw_contacts: debug.draw_contacts,
            debug: ContactTally::default(),
        }
    }

    /// Advance the world by one fixed step
    pub fn update(&mut self, world: &mut PhysicsWorld) -> SimulationResult {
        world.update(self.time_step);

        let step = world.step_count();
        let logged = self.log_interval > 0 && step % self.log_interval == 0;

        if logged {
            self.log_state(world);
        }

        SimulationResult {
            step,
            contacts: world.pair_count(),
            logged,
        }
    }

    /// Run `steps` fixed steps and return the last result
    pub fn run(&mut self, world: &mut PhysicsWorld, steps: u64) -> Option<SimulationResult> {
        let mut last = None;
        for _ in 0..steps {
            last = Some(self.update(world));
        }
        last
    }

    /// Debug geometry from the most recent logged step
    pub fn debug_geometry(&self) -> &ContactTally {
        &self.debug
    }

    fn log_state(&mut self, world: &PhysicsWorld) {
        log::info!(
            "Step {} (t = {:.2}s): {} contacts",
            world.step_count(),
            world.step_count() as f32 * self.time_step,
            world.pair_count()
        );

        for (key, body) in world.bodies().filter(|(_, body)| !body.is_static()) {
            let id = world.body_id(key).map(|id| id.raw()).unwrap_or_default();
            log::info!(
                "  body {}: pos = ({:.3}, {:.3}) rot = {:.3}",
                id,
                body.position.x,
                body.position.y,
                body.rotation
            );
        }

        if self.draw_contacts {
            self.debug = ContactTally::default();
            world.draw(&mut self.debug);
            log::debug!(
                "Debug draw: {} lines, {} contact points",
                self.debug.lines.line_count(),
                self.debug.points
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneBuilder;
    use impulse2d_physics::PhysicsConfig;

    fn system(log_interval: u64) -> SimulationSystem {
        let simulation = SimulationConfig {
            log_interval,
            ..Default::default()
        };
        SimulationSystem::new(&simulation, &DebugConfig::default())
    }

    #[test]
    fn test_update_steps_world() {
        let mut world = SceneBuilder::new(PhysicsConfig::default())
            .add_circle(Vec2::new(0.0, 10.0), 0.5, 1.0)
            .unwrap()
            .build();

        let mut system = system(0);
        let result = system.update(&mut world);
        assert_eq!(result.step, 1);
        assert!(!result.logged);

        let result = system.run(&mut world, 9).unwrap();
        assert_eq!(result.step, 10);
        assert_eq!(world.step_count(), 10);
    }

    #[test]
    fn test_logged_steps_collect_debug_geometry() {
        let mut world = SceneBuilder::new(PhysicsConfig::default())
            .add_ground(0.0)
            .unwrap()
            .add_box(Vec2::new(0.0, 0.5), Vec2::new(1.0, 1.0), 1.0)
            .unwrap()
            .build();

        let mut system = system(30);
        let result = system.run(&mut world, 60).unwrap();

        assert!(result.logged);
        assert_eq!(result.contacts, 1);
        let debug = system.debug_geometry();
        assert_eq!(debug.points, 1);
        // plane + box outline + contact marker
        assert_eq!(debug.lines.line_count(), 1 + 4 + 4);
    }
}
