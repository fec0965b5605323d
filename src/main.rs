//! # chanlog demo
//!
//! Drives a short workload through a namespaced logger so the line layout,
//! colors, timers and call tracing can be seen in a terminal:
//!
//! 1. **Initialize diagnostics**: `tracing` subscriber, filtered by `RUST_LOG`
//! 2. **Parse arguments**: namespace, filter, colors, sink
//! 3. **Build the registry**: environment (`DEBUG`, `DEBUG_COLORS`) plus overrides
//! 4. **Run the workload**: enter/exit, timers, arguments, a child logger
//!
//! Example: `DEBUG='chanlog:*' chanlog --colors always -i 2`

use anyhow::Result;
use chanlog::{
    cli::{Args, SinkKind},
    logging, ChannelRegistry, Level, LogValue, Logger, TracingSink,
};
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

fn main() -> Result<()> {
    let args = Args::parse();

    // The tracing sink needs the subscriber to print everything down to TRACE.
    let directive = match (args.sink, args.verbose) {
        (SinkKind::Tracing, _) => "trace",
        (SinkKind::Console, true) => "debug",
        (SinkKind::Console, false) => "warn",
    };
    logging::init_subscriber(args.sink == SinkKind::Tracing, directive);

    info!("Starting chanlog demo");
    debug!("Configuration: {:?}", args);

    let config = args.registry_config()?;
    let registry = match args.sink {
        SinkKind::Console => ChannelRegistry::from_config(&config),
        SinkKind::Tracing => {
            let mut builder = ChannelRegistry::builder()
                .sink(Arc::new(TracingSink::new()))
                .use_colors(false);
            if let Some(filter) = &config.filter {
                builder = builder.filter(filter);
            }
            builder.build()
        }
    };
    debug!("Registry: {:?}", registry);

    let mut logger = registry.logger(&args.namespace);
    run_workload(&mut logger, args.iterations);

    info!("chanlog demo completed");
    Ok(())
}

/// Exercise every helper once per iteration.
fn run_workload(logger: &mut Logger, iterations: usize) {
    let namespace = logger.name().to_string();
    logger.enter(
        "run_workload",
        &[
            ("iterations", LogValue::from(iterations)),
            ("namespace", LogValue::from(namespace)),
        ],
    );

    let mut worker = logger.extend("worker");
    let mut total = 0usize;

    for i in 0..iterations {
        logger.time("iteration");
        logger.arg("i", i, None);

        worker.enter("step", &[("index", LogValue::from(i))]);
        std::thread::sleep(Duration::from_millis(5 * (i as u64 + 1)));
        total += i;
        worker.return_value(
            "step",
            serde_json::json!({ "index": i, "running_total": total }),
        );

        logger.debug_logger().log(
            "state after step %d: %O",
            vec![
                LogValue::from(i),
                LogValue::from(serde_json::json!({ "total": total, "done": i + 1 == iterations })),
            ],
        );
        logger.time_end("iteration", Some(Level::Info));
    }

    let click = LogValue::event("MouseEvent", "click", "<button id=\"run\">Run</button>");
    logger.info().log("ui event %s", vec![chanlog::serialize(&click).into()]);

    // Stopping a timer that never started only warns.
    logger.exit("never_started");
    logger.error().message("demo error line");

    logger.return_value("run_workload", total);
}
