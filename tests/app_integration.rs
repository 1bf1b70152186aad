use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use tradedash::AppCommand;
use tradedash::cli::QueryArgs;
use tradedash::cli::report::ReportSection;
use tradedash::core::{FilterSelection, compute, filter, load, load_from_reader};

mod test_utils {
    use std::fs;
    use std::path::Path;

    pub const HEADER: &str = "year,reporter_iso3,partner_iso3,product_code,distance_km,fta_active,adval_tariff_pct,reporter_gdp_bln,partner_gdp_bln,reporter_pop_m,partner_pop_m,reporter_cpi,partner_cpi,export_value_usd_mln,quantity_tonnes,unit_price_usd_per_tonne";

    /// The three-record scenario: AAA exporting P1 to BBB and CCC.
    pub fn scenario_csv() -> String {
        format!(
            "{HEADER}\n\
             2019,AAA,BBB,P1,800,1,2,,,,,100,,10,2,5\n\
             2019,AAA,CCC,P1,1200,0,5,,,,,100,,20,4,5\n\
             2020,AAA,BBB,P1,800,1,0,,,,,110,,15,3,5\n"
        )
    }

    pub fn write_config(dir: &Path, data_path: &Path) -> std::path::PathBuf {
        let config_path = dir.join("config.yaml");
        let config_content = format!(
            r#"
data_path: "{}"
top_n: 10
baseline_year: 2020
"#,
            data_path.display()
        );
        fs::write(&config_path, config_content).expect("Failed to write config file");
        config_path
    }
}

fn sample_data_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("data/sample_trade_data.csv")
}

#[test_log::test]
fn test_end_to_end_scenario_from_csv() {
    let report = load_from_reader(test_utils::scenario_csv().as_bytes()).expect("load failed");
    let store = report.store;
    assert_eq!(store.len(), 3);

    let selection = FilterSelection::years(2019, 2020).with_reporters(["AAA"]);
    let dashboard = compute(&store, &selection, 15);
    info!(kpis = ?dashboard.kpis, "Computed scenario KPIs");

    let kpis = &dashboard.kpis;
    assert_eq!(kpis.total_export_value, 45.0);
    assert!((kpis.weighted_tariff.unwrap() - 120.0 / 45.0).abs() < 1e-12);
    assert!((kpis.fta_share.unwrap() - 25.0 / 45.0).abs() < 1e-12);
    assert_eq!(kpis.unique_partner_count, 2);

    let series = &dashboard.aggregates.nominal_vs_real;
    assert_eq!(series.len(), 2);
    assert_eq!(series[0].val, 30.0);
    assert_eq!(series[1].val, 15.0);
    assert!((series[0].real_val.unwrap() - 33.0).abs() < 1e-9);

    assert_eq!(dashboard.aggregates.fta_split_by_year.len(), 4);
    assert_eq!(dashboard.aggregates.distance_vs_value.len(), 2);
    assert_eq!(dashboard.aggregates.distance_vs_value[0].distance, Some(800.0));
}

#[test_log::test]
fn test_filter_is_idempotent_on_sample_data() {
    let store = load(sample_data_path()).expect("sample data should load").store;
    let selection = FilterSelection::years(2019, 2020)
        .with_partners(["MEX", "CHN"])
        .fta_only(false);

    let once = filter(&store, &selection);
    let twice = once.refine(&selection);
    assert_eq!(once.len(), twice.len());
    assert!(once.iter().zip(twice.iter()).all(|(a, b)| a == b));
}

#[test_log::test]
fn test_sample_data_drops_incomplete_rows() {
    let report = load(sample_data_path()).expect("sample data should load");
    assert_eq!(report.rows_read, 13);
    assert_eq!(report.rows_dropped, 1);

    let dims = report.store.dimensions();
    assert_eq!(dims.years, vec![2018, 2019, 2020]);
    assert_eq!(dims.reporters, vec!["CAN", "USA"]);
}

#[test_log::test]
fn test_schema_mismatch_is_rejected() {
    let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let data_path = dir.path().join("trade.csv");
    fs::write(&data_path, "year,reporter,partner\n2019,AAA,BBB\n").unwrap();

    let err = load(&data_path).unwrap_err();
    assert!(format!("{err:#}").contains("schema mismatch"));
}

#[test_log::test]
fn test_full_app_flow_for_every_command() {
    let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let data_path = dir.path().join("trade.csv");
    fs::write(&data_path, test_utils::scenario_csv()).unwrap();
    let config_path = test_utils::write_config(dir.path(), &data_path);
    let config_path = config_path.to_str().unwrap();

    let query = QueryArgs {
        data_path: Some(data_path.to_string_lossy().into_owned()),
        reporters: vec!["AAA".to_string()],
        ..QueryArgs::default()
    };
    let export_path = dir.path().join("dashboard.json");

    for command in [
        AppCommand::Dimensions,
        AppCommand::Summary,
        AppCommand::Report(None),
        AppCommand::Report(Some(ReportSection::Prices)),
        AppCommand::Export(Some(export_path.clone())),
    ] {
        let result = tradedash::run_command(command.clone(), Some(config_path), &query);
        assert!(
            result.is_ok(),
            "{command:?} failed with: {:?}",
            result.err()
        );
    }

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&export_path).unwrap()).unwrap();
    assert_eq!(json["top_n"], 10);
    assert_eq!(json["dashboard"]["kpis"]["total_export_value"], 45.0);
    assert_eq!(json["dashboard"]["kpis"]["unique_partner_count"], 2);
}

#[test_log::test]
fn test_explicit_data_flag_overrides_config() {
    let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let config_path =
        test_utils::write_config(dir.path(), &dir.path().join("does_not_exist.csv"));
    let export_path = dir.path().join("out.json");

    let query = QueryArgs {
        data_path: Some(sample_data_path().to_string_lossy().into_owned()),
        year_min: Some(2020),
        year_max: Some(2020),
        fta_only: Some(true),
        ..QueryArgs::default()
    };
    tradedash::run_command(
        AppCommand::Export(Some(export_path.clone())),
        config_path.to_str(),
        &query,
    )
    .expect("export should succeed with explicit data path");

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&export_path).unwrap()).unwrap();
    let kpis = &json["dashboard"]["kpis"];
    assert_eq!(kpis["fta_share"], 1.0);
    assert_eq!(json["dashboard"]["matched_records"], 3);
}

#[test_log::test]
fn test_missing_data_file_fails() {
    let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let missing = dir.path().join("missing.csv");
    let config_path = test_utils::write_config(dir.path(), &missing);
    let query = QueryArgs {
        data_path: Some(missing.to_string_lossy().into_owned()),
        ..QueryArgs::default()
    };

    let result = tradedash::run_command(AppCommand::Summary, config_path.to_str(), &query);
    assert!(result.is_err());
    assert!(format!("{:#}", result.unwrap_err()).contains("missing.csv"));
}
