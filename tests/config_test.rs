use tempfile::TempDir;

#[test]
fn test_config_lifecycle() {
    // Create a temporary directory for test config
    let temp_dir = TempDir::new().unwrap();

    // Override the config path for testing
    unsafe {
        std::env::set_var("XDG_CONFIG_HOME", temp_dir.path());
    }

    // Test that config doesn't exist initially
    assert!(!mp3_shuffle::config::Config::exists().unwrap());

    // A missing file means defaults
    let defaults = mp3_shuffle::config::Config::load().unwrap();
    assert_eq!(defaults.target_db, 89);
    assert_eq!(defaults.bitrate, "128k");

    // Create and save a config
    let config = mp3_shuffle::config::Config::new();
    config.save().unwrap();

    // Verify it exists now
    assert!(mp3_shuffle::config::Config::exists().unwrap());

    // Load and verify values
    let loaded = mp3_shuffle::config::Config::load().unwrap();
    assert_eq!(loaded, config);
    assert_eq!(loaded.trials_per_size, 100);
    assert!(!loaded.label_in_name);

    // Test config mutation
    let mut config = mp3_shuffle::config::Config::load().unwrap();
    config.set_value("label_in_name", "true").unwrap();
    config.set_value("target_db", "92").unwrap();
    config.save().unwrap();

    // Verify mutations persisted
    let reloaded = mp3_shuffle::config::Config::load().unwrap();
    assert!(reloaded.label_in_name);
    assert_eq!(reloaded.target_db, 92);
    assert_eq!(
        reloaded.interleave_options(Some(3)).seed,
        Some(3)
    );

    // Test invalid key and value
    let mut config = mp3_shuffle::config::Config::load().unwrap();
    assert!(config.set_value("invalid_key", "value").is_err());
    assert!(config.set_value("group_ratio", "0").is_err());

    // A hand-edited file that fails validation is rejected
    let path = mp3_shuffle::config::Config::config_path().unwrap();
    std::fs::write(&path, "group_ratio = 1.5\n").unwrap();
    assert!(mp3_shuffle::config::Config::load().is_err());
}
