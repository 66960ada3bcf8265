//! Basic logger usage example
//!
//! Demonstrates pretty and JSON output, child loggers, metadata and fault
//! isolation with the console transport.
//!
//! Run with: cargo run --example basic_usage

use std::sync::Arc;
use transport_logger::prelude::*;
use transport_logger::{info, meta};

fn main() -> Result<()> {
    println!("=== Transport Logger - Basic Usage Example ===\n");

    let logger = Logger::builder()
        .min_level(LogLevel::Trace)
        .mode(OutputMode::Pretty)
        .transport(ConsoleTransport::new())
        .build();

    println!("1. Logging at different levels:");
    logger.trace("This is a trace message");
    logger.debug("This is a debug message");
    logger.info("This is an info message");
    logger.warn("This is a warning message");
    logger.error("This is an error message");
    logger.fatal("This is a fatal message");

    println!("\n2. Raising the threshold at runtime:");
    logger.set_level(LogLevel::Info);
    logger.debug("Debug message (hidden)");
    logger.info("Info message (visible)");

    println!("\n3. Child loggers and metadata:");
    let db = logger.with_context("Database");
    db.info_with_meta("Connected", meta! { "host" => "localhost", "port" => 5432 });
    info!(db, meta = meta! { "rows" => 42 }; "Query finished in {}ms", 17);

    println!("\n4. JSON mode:");
    let json = create_logger(
        LoggerConfig {
            level: Some(LogLevel::Debug),
            mode: Some(OutputMode::Json),
            context: Some("AuthService".to_string()),
            ..Default::default()
        },
        &Environment::development(),
    );
    json.warn_with_meta("Suspicious login attempt", meta! { "ip" => "192.168.1.1" });

    println!("\n5. A failing transport does not stop the others:");
    let guarded = Logger::builder()
        .transport(FnTransport::new("broken", |_: &LogEntry, _: &str| {
            Err(LoggerError::transport("broken", "sink offline"))
        }))
        .transport(ConsoleTransport::new())
        .on_fault(Arc::new(|fault: &TransportFault| {
            println!("   fault handler saw: {}", fault);
        }))
        .build();
    guarded.info("Still delivered to the console");

    logger.flush()?;
    println!("\n=== Example completed successfully! ===");

    Ok(())
}
