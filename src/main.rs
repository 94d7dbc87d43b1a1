/*!
 * Process Simulator - Main Entry Point
 *
 * Runs one automatic scheduling simulation followed by the
 * producer/consumer demonstration, then prints a JSON report.
 */

use anyhow::Context;
use process_simulator::{
    init_tracing, simulation, DemoReport, ProducerConsumer, SimulationConfig, SimulationReport,
    SimulatorError,
};
use serde::Serialize;
use tracing::{info, warn};

#[derive(Serialize)]
struct RunSummary {
    config: SimulationConfig,
    simulation: SimulationReport,
    producer_consumer: DemoReport,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = match SimulationConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{:?}", miette::Report::new(SimulatorError::from(err)));
            std::process::exit(2);
        }
    };

    init_tracing(config.trace_json);
    info!(
        policy = %config.policy,
        quantum = config.quantum,
        memory = config.memory_capacity,
        "Process simulator starting"
    );

    let simulation = simulation::run(&config).context("automatic simulation failed")?;

    let demo = ProducerConsumer::new(config.buffer_capacity, config.demo_items);
    let cancel = demo.cancel_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received; cancelling producer/consumer");
            cancel.cancel();
        }
    });
    let producer_consumer = demo.run().await.context("producer/consumer demo failed")?;

    let summary = RunSummary {
        config,
        simulation,
        producer_consumer,
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&summary).context("failed to encode report")?
    );
    Ok(())
}
