//! Integration tests for preset loading and TOML scenario files.

use uced_sim::config::ScenarioConfig;
use uced_sim::pipeline::prepare_plan;

#[test]
fn every_preset_loads_and_validates() {
    for name in ScenarioConfig::PRESETS {
        let cfg = ScenarioConfig::from_preset(name).unwrap();
        let errors = cfg.validate();
        assert!(errors.is_empty(), "preset \"{name}\" should validate: {errors:?}");
    }
}

#[test]
fn demo_preset_runs_the_pipeline() {
    let cfg = ScenarioConfig::from_preset("demo").unwrap();
    assert!(prepare_plan(&cfg).is_ok());
}

#[test]
fn scenario_file_round_trips_through_the_pipeline() {
    let toml = r#"
[simulation]
year = 2023
seed = 123
uc_horizon_hours = 24
uc_interval_hours = 24
hourly_statistic = "mean"

[[thermal]]
name = "u1"
max_power_mw = 250.0
min_power_mw = 80.0

[[thermal]]
name = "u2"
max_power_mw = 120.0
min_power_mw = 40.0
initially_on = false

[renewable]
rating_mw = 90.0

[load]
peak_mw = 310.0
"#;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scenario.toml");
    std::fs::write(&path, toml).unwrap();

    let cfg = ScenarioConfig::from_toml_file(&path).unwrap();
    assert!(cfg.validate().is_empty());
    assert_eq!(cfg.thermal.len(), 2);

    let (system, series, plan) = prepare_plan(&cfg).unwrap();
    assert_eq!(system.thermal_capacity_mw(), 370.0);
    assert_eq!(series.demand_hourly.len(), 8760);
    assert_eq!(plan.uc_solve_count(), 365);
}

#[test]
fn seed_changes_synthetic_data_only() {
    let mut a = ScenarioConfig::demo();
    let mut b = ScenarioConfig::demo();
    a.simulation.seed = 1;
    b.simulation.seed = 2;

    let (_, series_a, plan_a) = prepare_plan(&a).unwrap();
    let (_, series_b, plan_b) = prepare_plan(&b).unwrap();
    assert_ne!(series_a.demand_fine, series_b.demand_fine);
    assert_eq!(plan_a.uc_solve_count(), plan_b.uc_solve_count());
}

#[test]
fn unknown_preset_is_reported() {
    let err = ScenarioConfig::from_preset("volcano").unwrap_err();
    assert_eq!(err.field, "preset");
    assert!(err.message.contains("volcano"));
}
