//! boatsim - headless boat force-model simulator

mod boats;
mod config;
mod script;

use anyhow::{ensure, Result};
use config::{config_path, SimConfig};
use engine_core::Time;
use hecs::World;
use physics::PhysicsWorld;
use script::DriveScript;
use std::time::Duration;

/// Wall-clock frame the loop pretends to render at.
const FRAME_SECONDS: f32 = 1.0 / 60.0;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let path = config_path(std::env::args().nth(1));
    let config = SimConfig::load(&path);
    ensure!(
        config.fixed_rate_hz.is_finite() && config.fixed_rate_hz > 0.0,
        "fixed_rate_hz must be positive, got {}",
        config.fixed_rate_hz
    );
    ensure!(
        config.duration_seconds.is_finite() && config.duration_seconds >= 0.0,
        "duration_seconds must be non-negative, got {}",
        config.duration_seconds
    );

    log::info!(
        "Starting boatsim: {} boat(s), {:.0} s at {:.0} Hz",
        config.boats.len(),
        config.duration_seconds,
        config.fixed_rate_hz
    );

    let mut time = Time::new();
    time.set_fixed_rate(config.fixed_rate_hz);

    let mut physics = PhysicsWorld::new(config.gravity);
    physics.set_timestep(time.fixed_timestep_seconds());

    let mut world = World::new();
    for spec in &config.boats {
        boats::spawn_boat(&mut world, &mut physics, spec, &config)?;
    }

    let script = DriveScript::new(config.script.clone());
    log::info!("Drive script has {} key(s)", script.len());

    let mut next_log = 0.0;
    let mut sim_time = 0.0;
    while sim_time < config.duration_seconds {
        time.advance(Duration::from_secs_f32(FRAME_SECONDS));
        while time.should_fixed_update() {
            let input = script.input_at(sim_time);
            boats::apply_boat_forces(&mut world, &mut physics, input);
            physics.step();
            boats::sync_boats(&mut world, &physics);
            sim_time = time.fixed_steps() as f32 * time.fixed_timestep_seconds();
        }

        if config.log_interval_seconds > 0.0 && sim_time >= next_log {
            boats::log_boats(&world, &physics, sim_time);
            next_log += config.log_interval_seconds;
        }
    }

    log::info!(
        "Finished: {} fixed steps over {:.1} s of frame time",
        time.fixed_steps(),
        time.elapsed_seconds()
    );
    boats::summarize(&world);
    Ok(())
}
