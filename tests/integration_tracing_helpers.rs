use chanlog::clock::ManualClock;
use chanlog::{ChannelRegistry, Level, LogValue, Logger, MemorySink};
use chrono::{Local, TimeZone};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

struct Harness {
    registry: ChannelRegistry,
    sink: Arc<MemorySink>,
    clock: Arc<ManualClock>,
}

impl Harness {
    fn new() -> Self {
        let sink = Arc::new(MemorySink::new());
        let clock = Arc::new(ManualClock::new(
            Local.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap(),
        ));
        let registry = ChannelRegistry::builder()
            .sink(sink.clone())
            .clock(clock.clone())
            .build();
        Self {
            registry,
            sink,
            clock,
        }
    }

    fn logger(&self, namespace: &str) -> Logger {
        self.registry.logger(namespace)
    }
}

/// A traced call with nested timers, as a caller would instrument it.
#[test]
fn traced_call_emits_paired_lines() {
    let h = Harness::new();
    let mut logger = h.logger("svc:orders");

    logger.enter(
        "place_order",
        &[
            ("order_id", LogValue::from("A-17")),
            ("items", LogValue::from(json!([{"sku": "x", "qty": 2}]))),
        ],
    );
    h.clock.advance(Duration::from_millis(4));
    logger.time("db");
    h.clock.advance(Duration::from_millis(6));
    let db = logger.time_end("db", Some(Level::DebugLogger));
    let total = logger.return_value("place_order", json!({"status": "ok"}));

    assert_eq!(db.to_string(), "6.000");
    assert_eq!(total.to_string(), "10.000");
    assert_eq!(logger.timer_count(), 0);

    assert_eq!(
        h.sink.texts(),
        vec![
            "2024-03-01 09:30:00 TRACE[orders] ENTER: place_order(order_id: A-17, items: [ { sku: 'x', qty: 2 } ]) (+0ms)",
            "2024-03-01 09:30:00 DEBUGLOGGER[orders] (6.000ms) db (+0ms)",
            "2024-03-01 09:30:00 TRACE[orders] RETURN: (10.000ms) place_order > { status: 'ok' } (+10ms)",
        ]
    );
}

#[test]
fn time_end_immediately_is_small_and_removes_label() {
    let h = Harness::new();
    let mut logger = h.logger("svc");
    logger.time("L");
    let elapsed = logger.time_end("L", None);

    let ms = elapsed.as_millis_f64();
    assert!((0.0..50.0).contains(&ms));
    assert!(!logger.has_timer("L"));
}

#[test]
fn exit_reports_time_since_enter() {
    let h = Harness::new();
    let mut logger = h.logger("svc");

    logger.enter("f", &[("a", LogValue::from(1i64)), ("b", LogValue::from("s"))]);
    h.clock.advance(Duration::from_millis(2));
    let elapsed = logger.exit("f");

    assert_eq!(elapsed.duration(), Some(Duration::from_millis(2)));
    assert!(!logger.has_timer("f"));
}

#[test]
fn missing_label_never_panics() {
    let h = Harness::new();
    let mut logger = h.logger("svc");

    let elapsed = logger.time_end("ghost", Some(Level::Error));
    assert!(elapsed.as_millis_f64().is_nan());
    assert!(h.sink.texts_for("svc:error").is_empty());
    assert_eq!(
        h.sink.texts_for("svc:warn"),
        vec!["2024-03-01 09:30:00 WARN[] No such label 'ghost' for time_end (+0ms)"]
    );
}

#[test]
fn restarting_a_label_resets_its_start() {
    let h = Harness::new();
    let mut logger = h.logger("svc");

    logger.time("job");
    h.clock.advance(Duration::from_millis(100));
    logger.time("job");
    h.clock.advance(Duration::from_millis(1));
    assert_eq!(logger.time_end("job", None).to_string(), "1.000");
}

#[test]
fn arg_levels_and_rendering() {
    let h = Harness::new();
    let logger = h.logger("svc");

    logger.arg("x", json!({"a": 1}), None);
    logger.arg("x", 5i64, None);
    logger.arg("flag", true, Some(Level::Warn));

    let trace = h.sink.texts_for("svc:trace");
    assert!(trace[0].contains("x: { a: 1 }"));
    assert!(trace[1].contains("x: 5 "));
    assert!(h.sink.texts_for("svc:warn")[0].contains("flag: true"));
}
