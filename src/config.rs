//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`I2D_SECTION__KEY`)

use figment::{Figment, providers::{Format, Toml, Env}};
use impulse2d_math::Vec2;
use serde::{Serialize, Deserialize};
use std::path::Path;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Physics solver configuration
    #[serde(default)]
    pub physics: PhysicsConfig,
    /// Fixed-step simulation loop
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Demo scene layout
    #[serde(default)]
    pub scene: SceneConfig,
    /// Debug configuration
    #[serde(default)]
    pub debug: DebugConfig,
}

impl AppConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. `config/default.toml`
    /// 2. `config/user.toml`
    /// 3. Environment variables (`I2D_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        // Load user config (optional)
        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // Environment variables override everything
        // I2D_PHYSICS__ITERATIONS=20 -> physics.iterations = 20
        figment = figment.merge(Env::prefixed("I2D_").split("__"));

        let config: Self = figment.extract().map_err(ConfigError::from)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.simulation.time_step.is_finite() && self.simulation.time_step > 0.0) {
            return Err(ConfigError::invalid(format!(
                "simulation.time_step must be positive, got {}",
                self.simulation.time_step
            )));
        }
        if !(self.physics.bias_factor > 0.0 && self.physics.bias_factor <= 1.0) {
            return Err(ConfigError::invalid(format!(
                "physics.bias_factor must be in (0, 1], got {}",
                self.physics.bias_factor
            )));
        }
        if self.physics.slop < 0.0 {
            return Err(ConfigError::invalid(format!(
                "physics.slop must not be negative, got {}",
                self.physics.slop
            )));
        }
        Ok(())
    }
}

/// Physics configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Gravity acceleration [x, y]
    pub gravity: [f32; 2],
    /// Solver iterations per step
    pub iterations: usize,
    /// Allowed penetration before position correction
    pub slop: f32,
    /// Position correction factor
    pub bias_factor: f32,
    /// Carry contact impulses between steps
    pub warm_starting: bool,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        let defaults = impulse2d_physics::PhysicsConfig::default();
        Self {
            gravity: defaults.gravity.to_array(),
            iterations: defaults.iterations,
            slop: defaults.slop,
            bias_factor: defaults.bias_factor,
            warm_starting: defaults.warm_starting,
        }
    }
}

impl PhysicsConfig {
    /// Convert to the physics engine's configuration
    pub fn to_physics_config(&self) -> impulse2d_physics::PhysicsConfig {
        impulse2d_physics::PhysicsConfig::new(Vec2::from(self.gravity), self.iterations)
            .with_slop(self.slop)
            .with_bias_factor(self.bias_factor)
            .with_warm_starting(self.warm_starting)
    }
}

/// Fixed-step simulation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Seconds advanced per step
    pub time_step: f32,
    /// Number of steps the headless runner performs
    pub steps: u64,
    /// Log body positions every N steps (0 disables)
    pub log_interval: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            time_step: 1.0 / 60.0,
            steps: 600,
            log_interval: 60,
        }
    }
}

/// Demo scene configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Y position of the ground plane
    pub ground_height: f32,
    /// Number of boxes in the stack
    pub box_stack_height: usize,
    /// Edge length of each stacked box
    pub box_size: f32,
    pub box_mass: f32,
    /// Number of circles dropped beside the stack
    pub circle_count: usize,
    pub circle_radius: f32,
    pub circle_mass: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            ground_height: 0.0,
            box_stack_height: 4,
            box_size: 1.0,
            box_mass: 1.0,
            circle_count: 3,
            circle_radius: 0.5,
            circle_mass: 1.0,
        }
    }
}

/// Debug configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
    /// Emit debug geometry for contacts on logged steps
    pub draw_contacts: bool,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            draw_contacts: true,
        }
    }
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl ConfigError {
    fn invalid(message: String) -> Self {
        ConfigError { message }
    }
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError {
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}
