//! Tests for loading session configuration from disk.

use std::io::Write;

use strictly_scratch::{BudgetRange, ConfigErrorKind, PrizeId, SessionConfig, SessionController};
use tempfile::NamedTempFile;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(content.as_bytes()).expect("write config");
    file
}

#[test]
fn test_load_full_config() {
    let file = write_config(
        r#"
        card_count = 5
        prize_set = ["cherry", "bell"]
        unlock_threshold = 0.4
        reveal_threshold = 0.9
        brush_radius = 3

        [budget]
        min = 2
        max = 4

        [resolution]
        width = 32
        height = 16
        "#,
    );

    let config = SessionConfig::from_file(file.path()).unwrap();
    assert_eq!(*config.card_count(), 5);
    assert_eq!(
        config.prize_set(),
        &vec![PrizeId::from("cherry"), PrizeId::from("bell")]
    );
    assert_eq!(config.budget().min, 2);
    assert_eq!(config.budget().max, 4);
    assert_eq!(config.resolution().width, 32);
    assert_eq!(config.resolution().height, 16);
    assert_eq!(*config.brush_radius(), 3);

    let thresholds = config.thresholds().unwrap();
    assert_eq!(thresholds.unlock(), 0.4);
    assert_eq!(thresholds.reveal(), 0.9);

    let session = SessionController::start_seeded(config, 8).unwrap();
    assert_eq!(session.cards().len(), 5);
    assert!((2..=4).contains(&session.budget()));
}

#[test]
fn test_empty_file_uses_defaults() {
    let file = write_config("");
    let config = SessionConfig::from_file(file.path()).unwrap();
    assert_eq!(config, SessionConfig::default());
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = SessionConfig::from_file(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err.kind(), ConfigErrorKind::Io(_)));
}

#[test]
fn test_invalid_thresholds_rejected_on_load() {
    let file = write_config(
        r#"
        unlock_threshold = 0.8
        reveal_threshold = 0.8
        "#,
    );
    let err = SessionConfig::from_file(file.path()).unwrap_err();
    assert!(matches!(err.kind(), ConfigErrorKind::ThresholdOrder { .. }));
}

#[test]
fn test_budget_larger_than_deck_rejected_on_load() {
    let file = write_config(
        r#"
        card_count = 3
        [budget]
        min = 1
        max = 5
        "#,
    );
    let err = SessionConfig::from_file(file.path()).unwrap_err();
    assert_eq!(
        err.kind(),
        &ConfigErrorKind::BudgetExceedsCards { max: 5, cards: 3 }
    );
}

#[test]
fn test_fewer_cards_than_default_budget_needs_smaller_budget() {
    let file = write_config("card_count = 7\n");
    let err = SessionConfig::from_file(file.path()).unwrap_err();
    assert_eq!(
        err.kind(),
        &ConfigErrorKind::BudgetExceedsCards { max: 10, cards: 7 }
    );
}

#[test]
fn test_config_survives_toml_round_trip() {
    let config = SessionConfig::default()
        .with_card_count(7)
        .with_budget(BudgetRange::new(4, 7));
    let text = toml::to_string(&config).unwrap();
    let file = write_config(&text);
    assert_eq!(SessionConfig::from_file(file.path()).unwrap(), config);
}
