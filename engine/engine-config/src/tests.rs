//! Tests for the configuration module.

use super::*;

#[test]
fn test_default_config() {
    let config = EngineConfig::default();
    assert_eq!(config.engine.name, "goban");
    assert_eq!(config.engine.log_level, "info");
    assert_eq!(config.board.size, 9);
    assert!((config.board.komi - 7.5).abs() < f32::EPSILON);
}

#[test]
fn test_search_defaults() {
    let config = EngineConfig::default();
    assert_eq!(config.search.playout_count, 10_000);
    assert!((config.search.explore_rate - 1.0).abs() < f32::EPSILON);
    assert!((config.search.mature_update_threshold - 100.0).abs() < f32::EPSILON);
    assert!((config.search.prior_count - 1.0).abs() < f32::EPSILON);
    assert!(config.search.prior_mean.abs() < f32::EPSILON);
    assert!((config.search.resign_mean + 0.95).abs() < f32::EPSILON);
    assert!(config.search.rave_use);
    assert!(config.search.rave_update);
    assert!((config.search.rave_update_fraction - 0.5).abs() < f32::EPSILON);
    assert_eq!(config.search.tree_max_moves, 400);
    assert_eq!(config.search.max_nodes, 1_000_000);
    assert!((config.search.print_min_visits - 100.0).abs() < f32::EPSILON);
    assert_eq!(config.search.print_max_children, 4);
}

#[test]
fn test_partial_toml_keeps_defaults() {
    let config: EngineConfig = toml::from_str(
        r#"
        [board]
        size = 19

        [search]
        playout_count = 500
        rave_use = false
        "#,
    )
    .unwrap();

    assert_eq!(config.board.size, 19);
    // Unspecified keys fall back to defaults
    assert!((config.board.komi - 7.5).abs() < f32::EPSILON);
    assert_eq!(config.search.playout_count, 500);
    assert!(!config.search.rave_use);
    assert!(config.search.rave_update);
    assert_eq!(config.engine.name, "goban");
}

#[test]
fn test_empty_toml_is_all_defaults() {
    let config: EngineConfig = toml::from_str("").unwrap();
    assert_eq!(config.board.size, 9);
    assert_eq!(config.search.playout_count, 10_000);
}

#[test]
fn test_env_override_string_field() {
    std::env::set_var("GOBAN_ENGINE_NAME", "kiseki");
    let config = apply_env_overrides(EngineConfig::default());
    std::env::remove_var("GOBAN_ENGINE_NAME");

    assert_eq!(config.engine.name, "kiseki");
}

#[test]
fn test_env_override_parsed_fields() {
    std::env::set_var("GOBAN_BOARD_SIZE", "13");
    std::env::set_var("GOBAN_SEARCH_RESIGN_MEAN", "-0.8");
    std::env::set_var("GOBAN_SEARCH_RAVE_USE", "false");
    let config = apply_env_overrides(EngineConfig::default());
    std::env::remove_var("GOBAN_BOARD_SIZE");
    std::env::remove_var("GOBAN_SEARCH_RESIGN_MEAN");
    std::env::remove_var("GOBAN_SEARCH_RAVE_USE");

    assert_eq!(config.board.size, 13);
    assert!((config.search.resign_mean + 0.8).abs() < f32::EPSILON);
    assert!(!config.search.rave_use);
}

#[test]
fn test_env_override_ignores_garbage() {
    std::env::set_var("GOBAN_SEARCH_PLAYOUT_COUNT", "not-a-number");
    let config = apply_env_overrides(EngineConfig::default());
    std::env::remove_var("GOBAN_SEARCH_PLAYOUT_COUNT");

    assert_eq!(config.search.playout_count, 10_000);
}
