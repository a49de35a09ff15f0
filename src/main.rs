use anyhow::Result;
use log::{debug, error, info, trace, warn};
use rps_simulation::Simulation;
use simulation_common::{save_snapshots, SimulationConfig};
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

fn main() -> Result<()> {
    // Initialize the logger
    env_logger::init();

    info!("Starting rock-paper-scissors simulation...");

    // --- Load Configuration ---
    let config_path = std::env::args().nth(1).unwrap_or_else(|| "config.toml".to_string());
    let config = SimulationConfig::load(&config_path)?;
    info!("Loaded configuration from {}.", config_path);

    // --- Initialize Simulation ---
    let mut sim = Simulation::new(config.clone())?;
    info!("Initialized {} tokens: {}.", sim.current_token_count(), sim.kind_counts());
    debug!("Simulation Parameters: {:#?}", sim.params());

    // --- Simulation Loop ---
    let timing = &config.timing;
    let tick_interval = Duration::from_millis(timing.tick_interval_ms);
    let mut record_interval_steps = timing.record_interval_steps;
    if record_interval_steps == 0 {
        warn!("record_interval_steps is 0. Recording every step.");
        record_interval_steps = 1;
    }
    if timing.realtime {
        info!("Running in real time, one tick every {} ms.", timing.tick_interval_ms);
    }

    info!("Starting simulation loop for up to {} steps...", timing.total_steps);
    let start_time = Instant::now();
    let mut previous_print_time = start_time;
    let mut total_conversions = 0usize;

    // --- Initial Snapshot (step 0) ---
    sim.record_snapshot();

    for step in 0..timing.total_steps {
        let step_start_time = Instant::now();
        let report = sim.step();
        let step_duration = step_start_time.elapsed();
        total_conversions += report.conversions;

        let is_record_step = (step + 1) % record_interval_steps == 0;
        let is_last_step = step == timing.total_steps - 1;
        let settled = sim.dominant_kind();
        let stopping = timing.stop_when_settled && settled.is_some();

        if is_record_step || is_last_step || stopping {
            sim.record_snapshot();
        }

        // Print status periodically
        let current_time = Instant::now();
        let should_print_status = current_time.duration_since(previous_print_time).as_secs_f64() >= 5.0;
        if should_print_status || is_last_step || stopping {
            info!(
                "Step [{}/{}] | {} | Conversions so far: {} | Step Time: {:6.3} ms | Elapsed: {:.2} s",
                step + 1,
                timing.total_steps,
                sim.kind_counts(),
                total_conversions,
                step_duration.as_secs_f64() * 1000.0,
                start_time.elapsed().as_secs_f64()
            );
            previous_print_time = current_time;
        } else {
            trace!(
                "Step [{}/{}] completed in {:.3} ms ({} collisions, {} conversions)",
                step + 1,
                timing.total_steps,
                step_duration.as_secs_f64() * 1000.0,
                report.collisions,
                report.conversions
            );
        }

        if stopping {
            if let Some(kind) = settled {
                info!("Every token is now {} after {} steps. Stopping.", kind, step + 1);
            }
            break;
        }

        if timing.realtime {
            if let Some(remaining) = tick_interval.checked_sub(step_duration) {
                thread::sleep(remaining);
            }
        }
    }

    let total_duration = start_time.elapsed();
    info!(
        "Simulation finished after {} steps in {:.3} seconds. Final population: {}.",
        sim.current_step(),
        total_duration.as_secs_f64(),
        sim.kind_counts()
    );
    if sim.dominant_kind().is_none() {
        warn!("No kind has taken over yet; consider raising total_steps.");
    }

    // --- Save Recorded Data ---
    if config.output.save_snapshots {
        let format = config.output.format;
        let filename = PathBuf::from(format!("{}_snapshots.{}", config.output.base_filename, format.extension()));
        match save_snapshots(&filename, sim.recorded_snapshots(), format) {
            Ok(()) => info!(
                "{} snapshots saved to {} ({:?} format).",
                sim.recorded_snapshots().len(),
                filename.display(),
                format
            ),
            Err(e) => error!("Error saving snapshots to '{}': {:#}", filename.display(), e),
        }
    } else {
        info!("Skipping saving snapshots as per config (save_snapshots is false).");
    }

    // Save final token states if requested (separate from snapshots)
    if config.output.save_final_tokens {
        let filename = format!("{}_final_tokens.csv", config.output.base_filename);
        match write_final_tokens(&sim, &filename) {
            Ok(()) => info!("Final token states saved to {}", filename),
            Err(e) => error!("Error saving CSV file '{}': {:#}", filename, e),
        }
    } else {
        info!("Skipping saving final token states as per config.");
    }

    info!("Simulation Complete.");
    Ok(())
}

fn write_final_tokens(sim: &Simulation, filename: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(filename)?;
    writer.write_record(["kind", "x", "y", "vx", "vy"])?;
    for token in sim.token_states() {
        writer.write_record([
            token.kind.name().to_string(),
            format!("{:.2}", token.position.x),
            format!("{:.2}", token.position.y),
            format!("{:.2}", token.velocity.x),
            format!("{:.2}", token.velocity.y),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
