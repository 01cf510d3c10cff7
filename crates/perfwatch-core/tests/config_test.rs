//! Tests for the perfwatch configuration system.

use std::sync::Mutex;
use std::time::Duration;

use perfwatch_core::config::{CliOverrides, PerfwatchConfig, StorageBackend};
use perfwatch_core::errors::{ConfigError, PerfwatchErrorCode};

/// Global mutex to serialize tests that modify environment variables.
static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn clear_perfwatch_env_vars() {
    for key in [
        "PERFWATCH_BENCH_ITERATIONS",
        "PERFWATCH_BENCH_WARMUP",
        "PERFWATCH_BENCH_TOLERANCE",
        "PERFWATCH_BENCH_FAILURE_CEILING",
        "PERFWATCH_MONITOR_THRESHOLD",
        "PERFWATCH_MONITOR_HYSTERESIS_MARGIN",
        "PERFWATCH_STORAGE_HISTORY_PATH",
    ] {
        std::env::remove_var(key);
    }
}

#[test]
fn defaults_resolve_to_documented_values() {
    let config = PerfwatchConfig::default();
    let bench = config.bench_settings().unwrap();
    assert_eq!(bench.iterations, 100);
    assert_eq!(bench.warmup, 1);
    assert!((bench.tolerance - 0.02).abs() < f64::EPSILON);
    assert!((bench.failure_ceiling - 0.1).abs() < f64::EPSILON);
    assert_eq!(bench.call_timeout, Some(Duration::from_secs(30)));
    let names: Vec<&str> = bench.tiers.tiers().iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, ["excellent", "good", "acceptable"]);
    assert_eq!(bench.tiers.worst(), "needs_optimization");

    let monitor = config.monitor_settings().unwrap();
    let memory = monitor.metric("memory");
    assert_eq!(memory.threshold, 85.0);
    assert_eq!(memory.hysteresis_margin, 5.0);
    assert_eq!(memory.alert_cooldown, Duration::ZERO);
    assert_eq!(memory.critical_threshold, None);
    assert_eq!(monitor.lock_timeout, Duration::from_millis(500));
    assert_eq!(monitor.read_timeout, Some(Duration::from_secs(10)));
    assert_eq!(monitor.tiers.worst(), "high");

    assert_eq!(config.storage.effective_backend(), StorageBackend::Jsonl);
}

#[test]
fn parses_full_document() {
    let config = PerfwatchConfig::from_toml(
        r#"
[bench]
iterations = 30
warmup = 2
tolerance = 0.05
call_timeout_ms = 0
worst_tier = "slow"

[[bench.tiers]]
name = "fast"
upper_bound = 2.0

[[bench.tiers]]
name = "ok"
upper_bound = 20.0

[bench.operations.auth_flow]
tolerance = 0.1
max_mean_ms = 2.0

[monitor]
threshold = 90.0
alert_cooldown_secs = 600

[monitor.metrics.load]
threshold = 80.0
hysteresis_margin = 10.0

[storage]
backend = "sqlite"
history_path = "history.db"
"#,
    )
    .unwrap();

    let bench = config.bench_settings().unwrap();
    assert_eq!(bench.iterations, 30);
    assert_eq!(bench.call_timeout, None);
    assert_eq!(bench.tiers.classify_value(1.5), "fast");
    assert_eq!(bench.tiers.classify_value(50.0), "slow");
    assert_eq!(bench.tolerance_for("auth_flow"), 0.1);
    assert_eq!(bench.tolerance_for("other"), 0.05);
    assert_eq!(bench.budget_for("auth_flow"), Some(2.0));
    assert_eq!(bench.budget_for("other"), None);

    let monitor = config.monitor_settings().unwrap();
    let load = monitor.metric("load");
    assert_eq!(load.threshold, 80.0);
    assert_eq!(load.hysteresis_margin, 10.0);
    assert_eq!(load.alert_cooldown, Duration::from_secs(600));
    assert_eq!(load.clear_level(), 70.0);
    let memory = monitor.metric("memory");
    assert_eq!(memory.threshold, 90.0);
    assert_eq!(memory.metric, "memory");

    assert_eq!(config.storage.effective_backend(), StorageBackend::Sqlite);
}

#[test]
fn non_increasing_tiers_are_fatal_at_load() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_perfwatch_env_vars();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("perfwatch.toml");
    std::fs::write(
        &path,
        r#"
[[bench.tiers]]
name = "good"
upper_bound = 5.0

[[bench.tiers]]
name = "excellent"
upper_bound = 1.0
"#,
    )
    .unwrap();

    let err = PerfwatchConfig::load(Some(&path), None).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidTiers { .. }), "got {err:?}");
    assert_eq!(err.error_code(), "INVALID_TIERS");
}

#[test]
fn health_tiers_resolve_per_metric() {
    let defaults = PerfwatchConfig::default().monitor_settings().unwrap();
    assert_eq!(defaults.tiers_for("memory").classify_value(75.0), "moderate");
    assert_eq!(defaults.tiers_for("disk").classify_value(75.0), "moderate");
    // Load is banded 60/80 out of the box.
    assert_eq!(defaults.tiers_for("load").classify_value(65.0), "moderate");
    assert_eq!(defaults.tiers_for("load").classify_value(81.0), "high");

    let config = PerfwatchConfig::from_toml(
        r#"
[monitor]
read_timeout_ms = 0

[[monitor.tiers]]
name = "fine"
upper_bound = 50.0

[[monitor.metrics.disk.tiers]]
name = "roomy"
upper_bound = 90.0
"#,
    )
    .unwrap();
    let monitor = config.monitor_settings().unwrap();
    assert_eq!(monitor.read_timeout, None);
    assert_eq!(monitor.tiers_for("disk").classify_value(85.0), "roomy");
    assert_eq!(monitor.tiers_for("memory").classify_value(85.0), "high");
    // Configured global tiers replace the built-in load bands.
    assert_eq!(monitor.tiers_for("load").classify_value(40.0), "fine");
    assert_eq!(monitor.metric("disk").threshold, 85.0);
}

#[test]
fn malformed_metric_tiers_are_rejected() {
    let config = PerfwatchConfig::from_toml(
        r#"
[[monitor.metrics.load.tiers]]
name = "a"
upper_bound = 80.0

[[monitor.metrics.load.tiers]]
name = "b"
upper_bound = 60.0
"#,
    )
    .unwrap();
    match config.validate() {
        Err(ConfigError::InvalidTiers { field, .. }) => {
            assert_eq!(field, "monitor.metrics.load.tiers")
        }
        other => panic!("expected invalid tiers, got {other:?}"),
    }
}

#[test]
fn equal_bounds_are_rejected() {
    let config = PerfwatchConfig::from_toml(
        r#"
[[monitor.tiers]]
name = "a"
upper_bound = 5.0

[[monitor.tiers]]
name = "b"
upper_bound = 5.0
"#,
    )
    .unwrap();
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidTiers { .. })
    ));
}

#[test]
fn invalid_values_are_rejected() {
    for doc in [
        "[bench]\niterations = 0",
        "[bench]\ntolerance = 1.5",
        "[bench]\nfailure_ceiling = -0.1",
        "[bench.operations.x]\nmax_mean_ms = 0.0",
        "[monitor]\nhysteresis_margin = -1.0",
        "[monitor]\nthreshold = 90.0\ncritical_threshold = 80.0",
        "[monitor.metrics.disk]\nhysteresis_margin = -2.0",
    ] {
        let config = PerfwatchConfig::from_toml(doc).unwrap();
        assert!(
            matches!(config.validate(), Err(ConfigError::ValidationFailed { .. })),
            "expected validation failure for {doc:?}"
        );
    }
}

#[test]
fn explicit_missing_file_is_an_error() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_perfwatch_env_vars();

    let dir = tempfile::tempdir().unwrap();
    let err = PerfwatchConfig::load(Some(&dir.path().join("nope.toml")), None).unwrap_err();
    assert!(matches!(err, ConfigError::FileNotFound { .. }));
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let err = PerfwatchConfig::from_toml("[bench\niterations = ").unwrap_err();
    assert!(matches!(err, ConfigError::ParseError { .. }));
}

#[test]
fn cli_overrides_env_overrides_file() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_perfwatch_env_vars();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("perfwatch.toml");
    std::fs::write(
        &path,
        "[bench]\niterations = 10\nwarmup = 3\ntolerance = 0.03\n\n[monitor]\nthreshold = 70.0\n",
    )
    .unwrap();

    std::env::set_var("PERFWATCH_BENCH_ITERATIONS", "20");
    std::env::set_var("PERFWATCH_BENCH_WARMUP", "4");
    std::env::set_var("PERFWATCH_MONITOR_THRESHOLD", "not-a-number");

    let cli = CliOverrides {
        iterations: Some(30),
        ..Default::default()
    };
    let config = PerfwatchConfig::load(Some(&path), Some(&cli)).unwrap();

    // CLI beats env, env beats file, unparseable env is ignored.
    assert_eq!(config.bench.iterations, Some(30));
    assert_eq!(config.bench.warmup, Some(4));
    assert_eq!(config.bench.tolerance, Some(0.03));
    assert_eq!(config.monitor.threshold, Some(70.0));

    clear_perfwatch_env_vars();
}

#[test]
fn toml_round_trip_preserves_settings() {
    let config = PerfwatchConfig::from_toml(
        r#"
[bench]
iterations = 7

[[bench.tiers]]
name = "fast"
upper_bound = 1.0

[monitor.metrics.memory]
threshold = 91.0
"#,
    )
    .unwrap();
    let text = config.to_toml().unwrap();
    let reparsed = PerfwatchConfig::from_toml(&text).unwrap();
    assert_eq!(reparsed.bench.iterations, Some(7));
    assert_eq!(reparsed.bench.tiers, config.bench.tiers);
    assert_eq!(reparsed.monitor_settings().unwrap().metric("memory").threshold, 91.0);
}
