//! Focused unit tests covering locate configuration and execution.

use super::helpers::{StubSourceBuilder, utf8_tempdir};
use super::*;
use crate::locate::{LocateConfig, config_from_layers_for_test, execute_locate};
use crate::store::CliCacheStore;
use rstest::rstest;
use std::time::Duration;
use transit_core::test_support::{StubTripSource, trip_collection};
use transit_core::{IdentifierPair, ResolutionStatus};
use transit_data::DEFAULT_BASE_URL;

fn vehicle_args(vehicle: &str) -> LocateArgs {
    LocateArgs {
        vehicle: Some(vehicle.to_owned()),
        ..LocateArgs::default()
    }
}

fn config_for(pair: IdentifierPair) -> LocateConfig {
    LocateConfig {
        pair,
        base_url: DEFAULT_BASE_URL.to_owned(),
        cache_db: None,
        ttl: Duration::from_secs(300),
        health_check: false,
    }
}

#[rstest]
#[case(None, None)]
#[case(Some("  "), Some(""))]
fn converting_without_selection_errors(
    #[case] vehicle: Option<&str>,
    #[case] route: Option<&str>,
) {
    let args = LocateArgs {
        vehicle: vehicle.map(str::to_owned),
        route: route.map(str::to_owned),
        ..LocateArgs::default()
    };
    let err = LocateConfig::try_from(args).expect_err("missing selection should error");
    match err {
        CliError::MissingSelection {
            vehicle,
            route,
            vehicle_env,
            route_env,
        } => {
            assert_eq!(vehicle, ARG_VEHICLE);
            assert_eq!(route, ARG_ROUTE);
            assert_eq!(vehicle_env, ENV_LOCATE_VEHICLE);
            assert_eq!(route_env, ENV_LOCATE_ROUTE);
        }
        other => panic!("expected MissingSelection, found {other:?}"),
    }
}

#[rstest]
fn locate_config_applies_defaults() {
    let config = LocateConfig::try_from(vehicle_args(" MTA NYCT_2257 ")).expect("config");
    assert_eq!(config.pair, IdentifierPair::from_input(Some("MTA NYCT_2257"), None));
    assert_eq!(config.base_url, DEFAULT_BASE_URL);
    assert_eq!(config.cache_db, None);
    assert_eq!(config.ttl, Duration::from_secs(300));
    assert!(!config.health_check);
}

#[rstest]
fn zero_ttl_is_rejected() {
    let args = LocateArgs {
        ttl_secs: Some(0),
        ..vehicle_args("NYCT_2257")
    };
    let err = LocateConfig::try_from(args).expect_err("zero ttl should error");
    match err {
        CliError::InvalidTtl { field } => assert_eq!(field, ARG_TTL_SECS),
        other => panic!("expected InvalidTtl, found {other:?}"),
    }
}

#[rstest]
#[case(&["transit", "locate", "--vehicle", "NYCT_2257"], None)]
#[case(&["transit", "locate", "--vehicle", "NYCT_2257", "--health-check"], Some(true))]
#[case(&["transit", "locate", "--route", "B6", "--health-check", "false"], Some(false))]
fn health_check_flag_parses(#[case] argv: &[&str], #[case] expected: Option<bool>) {
    let cli = Cli::try_parse_from(argv).expect("arguments should parse");
    match cli.command {
        Command::Locate(args) => assert_eq!(args.health_check, expected),
        Command::Suggest(_) => panic!("expected locate command"),
    }
}

#[rstest]
fn merge_layers_maps_configuration_errors() {
    use ortho_config::MergeComposer;
    use serde_json::json;

    let mut composer = MergeComposer::new();
    composer.push_cli(json!({ "ttl_secs": "soon" }));

    let err = config_from_layers_for_test(composer.layers())
        .expect_err("invalid config layer should map to CliError::Configuration");
    match err {
        CliError::Configuration(_) => {}
        other => panic!("expected CliError::Configuration, found {other:?}"),
    }
}

#[rstest]
fn merge_layers_honours_precedence() {
    use ortho_config::MergeComposer;
    use serde_json::json;

    let mut composer = MergeComposer::new();
    composer.push_file(
        json!({
            "base_url": "http://from-file:8000",
            "ttl_secs": 60,
            "route": "B8",
        }),
        None,
    );
    composer.push_environment(json!({
        "vehicle": "NYCT_2257",
        "ttl_secs": 120,
    }));
    composer.push_cli(json!({
        "route": "B6",
    }));

    let config =
        config_from_layers_for_test(composer.layers()).expect("merged config should build");
    assert_eq!(
        config.pair,
        IdentifierPair::from_input(Some("NYCT_2257"), Some("B6"))
    );
    assert_eq!(config.base_url, "http://from-file:8000");
    assert_eq!(config.ttl, Duration::from_secs(120));
}

#[rstest]
fn cache_store_creates_missing_parent_directories() {
    let (_tmp, root) = utf8_tempdir();
    let db = root.join("nested/cache/trips.db");

    let store = CliCacheStore::open(Some(&db)).expect("store should open");
    assert!(matches!(store, CliCacheStore::Sqlite(_)));
    assert!(root.join("nested/cache").is_dir());
}

#[rstest]
fn cache_store_defaults_to_memory() {
    let store = CliCacheStore::open(None).expect("store should open");
    assert!(matches!(store, CliCacheStore::Memory(_)));
}

#[rstest]
fn execute_locate_reports_ready_payload() {
    let builder = StubSourceBuilder::new(
        StubTripSource::default()
            .with_vehicle("NYCT_2257", trip_collection(&[("NYCT_2257", "B6"), ("NYCT_2257", "B8")])),
    );
    let config = config_for(IdentifierPair::from_input(Some("NYCT_2257"), Some("B8")));

    let payload = execute_locate(&config, &builder).expect("locate should run");
    assert_eq!(payload.status, ResolutionStatus::Ready);
    assert_eq!(payload.version, 1);
    assert_eq!(payload.features.len(), 1);
    assert_eq!(payload.data.map(|data| data.len()), Some(1));
    assert_eq!(builder.base_urls(), [DEFAULT_BASE_URL]);
}

#[rstest]
fn execute_locate_reports_failures_in_the_payload() {
    let builder = StubSourceBuilder::new(StubTripSource::default());
    let config = config_for(IdentifierPair::from_input(None, Some("B6")));

    let payload = execute_locate(&config, &builder).expect("locate should run");
    assert_eq!(payload.status, ResolutionStatus::Error);
    assert!(payload.data.is_none());
    let message = payload.message.expect("error message");
    assert!(
        message.starts_with("failed to fetch route B6"),
        "unexpected message {message}"
    );
}
