//! impulse2d - headless 2D physics runner
//!
//! Builds the configured demo scene and steps it at a fixed rate,
//! logging body state as it goes.

use impulse2d::config::AppConfig;
use impulse2d::scene::SceneBuilder;
use impulse2d::systems::SimulationSystem;

fn main() {
    // Load configuration before logging so the configured level applies
    let (config, config_error) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    // Initialize logging; RUST_LOG still takes precedence
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.debug.log_level.as_str()),
    )
    .init();
    log::info!("Starting impulse2d");

    if let Some(e) = config_error {
        log::warn!("Failed to load config: {}. Using defaults.", e);
    }

    let mut world = match SceneBuilder::from_config(config.physics.to_physics_config(), &config.scene) {
        Ok(builder) => builder.build(),
        Err(e) => {
            log::error!("Failed to build scene: {}", e);
            std::process::exit(1);
        }
    };
    log::info!("Scene ready with {} bodies", world.body_count());

    let mut simulation = SimulationSystem::new(&config.simulation, &config.debug);
    match simulation.run(&mut world, config.simulation.steps) {
        Some(result) => log::info!(
            "Finished after {} steps with {} contacts",
            result.step,
            result.contacts
        ),
        None => log::info!("No steps requested"),
    }
}
