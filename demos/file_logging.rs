//! File logging example
//!
//! Demonstrates appending JSON lines to a file alongside console output.
//!
//! Run with: cargo run --example file_logging

use std::fs;
use transport_logger::prelude::*;

fn main() -> Result<()> {
    println!("=== Transport Logger - File Logging Example ===\n");

    let path = std::env::temp_dir().join("transport_logger_demo").join("app.log");

    let logger = Logger::builder()
        .min_level(LogLevel::Debug)
        .mode(OutputMode::Json)
        .transport(FileTransport::new(&path)?)
        .transport(ConsoleTransport::new())
        .build();

    let worker = logger.with_context("Worker");
    for job in 1..=3 {
        worker.info_with_meta("Job finished", LogMeta::new().with_field("job", job));
    }
    worker.error("Job 4 failed\nwith a multi-line reason");

    logger.flush()?;

    println!("\nContents of {}:", path.display());
    print!("{}", fs::read_to_string(&path)?);

    println!(
        "\nDispatched {} entries, {} transport faults",
        logger.metrics().total_dispatched(),
        logger.metrics().transport_faults()
    );
    println!("\n=== Example completed successfully! ===");

    Ok(())
}
