// Kept in its own test binary: it mutates the process environment.
use procmap_core::ConfigManager;

#[test]
fn test_environment_overrides_defaults() {
    std::env::set_var("PROCMAP__GRAPH__START_LABEL", "Begin");
    std::env::set_var("PROCMAP__INSIGHTS__KEEP_UNCOVERED", "false");

    let config = ConfigManager::load_from_sources(None).unwrap();
    assert_eq!(config.graph.start_label, "Begin");
    assert_eq!(config.graph.end_label, "Endknoten");
    assert!(!config.insights.keep_uncovered);

    std::env::remove_var("PROCMAP__GRAPH__START_LABEL");
    std::env::remove_var("PROCMAP__INSIGHTS__KEEP_UNCOVERED");
}
