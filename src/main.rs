use anyhow::{Context, Result};
use std::time::Instant;
use std::fs::File;
use std::io::Write;
use log::{info, warn, error, debug, trace};

use planet_common::{SimulationConfig, Snapshot};
use planet_engine::Simulation;

fn main() -> Result<()> {
    // Initialize the logger
    env_logger::init();

    info!("Starting Planet Engine...");

    // --- Load Configuration ---
    let config_path = std::env::args().nth(1).unwrap_or_else(|| String::from("config.toml"));
    let config = SimulationConfig::load(&config_path)?;
    info!("Loaded configuration from {}", config_path);

    // --- Initialize Simulation ---
    let mut sim = Simulation::new(&config)
        .with_context(|| format!("Failed to build simulation from '{}'", config_path))?;
    info!(
        "Simulation initialized with {} bodies in a {:?} world.",
        sim.current_body_count(),
        sim.bounds()
    );
    debug!("Simulation Parameters: {:#?}", sim.params());

    // --- Simulation Loop ---
    let total_steps = config.timing.total_steps;
    let record_interval_steps = config.timing.record_interval_steps.max(1);
    info!("Recording snapshot every {} steps.", record_interval_steps);

    info!("Starting simulation loop for {} steps...", total_steps);
    let start_time = Instant::now();
    let mut previous_print_time = start_time;

    // --- Initial Snapshot (step = 0) ---
    sim.record_snapshot();

    sim.start();
    for step in 0..total_steps {
        let step_start_time = Instant::now();
        if let Err(e) = sim.step() {
            // State is unchanged after a failed step; report and stop the run.
            error!("Error during simulation step {}: {}", step + 1, e);
            sim.stop();
            anyhow::bail!("Simulation step failed: {}", e);
        }
        let step_duration = step_start_time.elapsed();

        let current_time = Instant::now();
        let print_interval_secs = 5.0;
        let should_print_status = current_time.duration_since(previous_print_time).as_secs_f64() >= print_interval_secs;
        let is_record_step = (step + 1) % record_interval_steps == 0;
        let is_last_step = step + 1 == total_steps;

        if is_record_step || is_last_step {
            sim.record_snapshot();
        }

        if should_print_status || is_last_step {
            let snapshot = sim.snapshot();
            info!(
                "Step [{}/{}] | KE: {:.4} | Contacts: {} | Step Time: {:6.3} ms | Elapsed: {:.2} s",
                step + 1,
                total_steps,
                snapshot.kinetic_energy,
                snapshot.contact_pairs,
                step_duration.as_secs_f64() * 1000.0,
                start_time.elapsed().as_secs_f64()
            );
            previous_print_time = current_time;
        } else {
            trace!(
                "Step [{}/{}] completed in {:.3} ms",
                step + 1,
                total_steps,
                step_duration.as_secs_f64() * 1000.0
            );
        }
    }
    sim.stop();

    let total_duration = start_time.elapsed();
    info!("Simulation finished in {:.3} seconds.", total_duration.as_secs_f64());

    // --- Save Recorded Data ---
    if config.output.save_stats {
        let output_format = config.output.format.as_deref().unwrap_or("json");
        save_snapshots(sim.get_recorded_snapshots(), &config.output.base_filename, output_format)?;
    } else {
        info!("Skipping saving snapshots as per config (save_stats is false).");
    }

    // Save final positions if requested (separate from full snapshots)
    if config.output.save_positions {
        let filename = format!("{}_final_positions.csv", config.output.base_filename);
        let mut writer = csv::Writer::from_path(&filename)
            .with_context(|| format!("Error creating CSV file '{}'", filename))?;
        writer.write_record(["id", "x", "y"])?;
        for (id, x, y) in sim.get_results() {
            writer.write_record(&[id.to_string(), format!("{:.4}", x), format!("{:.4}", y)])?;
        }
        writer.flush()?;
        info!("Final positions saved to {}", filename);
    } else {
        info!("Skipping saving final positions as per config.");
    }

    info!("Simulation Complete.");
    Ok(())
}

/// Writes all recorded snapshots in the requested format.
fn save_snapshots(snapshots: &[Snapshot], base_filename: &str, output_format: &str) -> Result<()> {
    let format = match output_format {
        "json" | "bincode" | "messagepack" => output_format,
        other => {
            warn!("Unknown output format: {}. Using JSON instead.", other);
            "json"
        }
    };

    match format {
        "bincode" => {
            let filename = format!("{}_snapshots.bin", base_filename);
            let file = File::create(&filename)
                .with_context(|| format!("Error creating snapshot file '{}'", filename))?;
            bincode::serialize_into(file, snapshots)
                .with_context(|| format!("Error serializing snapshots to bincode '{}'", filename))?;
            info!("All snapshots saved to {} (binary format)", filename);
        }
        "messagepack" => {
            let filename = format!("{}_snapshots.msgpack", base_filename);
            let mut file = File::create(&filename)
                .with_context(|| format!("Error creating snapshot file '{}'", filename))?;
            rmp_serde::encode::write(&mut file, snapshots)
                .with_context(|| format!("Error serializing snapshots to MessagePack '{}'", filename))?;
            info!("All snapshots saved to {} (MessagePack format)", filename);
        }
        _ => {
            let filename = format!("{}_snapshots.json", base_filename);
            let json_string = serde_json::to_string(snapshots).context("Error serializing snapshots to JSON")?;
            let mut file = File::create(&filename)
                .with_context(|| format!("Error creating snapshot file '{}'", filename))?;
            file.write_all(json_string.as_bytes())
                .with_context(|| format!("Error writing snapshot JSON to file '{}'", filename))?;
            info!("All snapshots saved to {} ({} KB)", filename, json_string.len() / 1024);
        }
    }
    Ok(())
}
