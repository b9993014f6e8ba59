use serial_test::serial;
use std::fs;
use tempfile::tempdir;

use cpmove::config::{default_config_path, load_config, CONFIG_ENV};

#[test]
#[serial]
fn env_var_selects_the_config_file() {
    let td = tempdir().unwrap();
    let cfg = td.path().join("custom_config.xml");
    fs::write(&cfg, "<config><principal>ops</principal></config>").unwrap();

    // Process-wide env; serialized against other env tests.
    unsafe {
        std::env::set_var(CONFIG_ENV, &cfg);
    }

    assert_eq!(default_config_path().as_deref(), Some(cfg.as_path()));
    let (loaded, path) = load_config().expect("load_config");
    assert_eq!(loaded.principal, "ops");
    assert_eq!(path.as_deref(), Some(cfg.as_path()));

    unsafe {
        std::env::remove_var(CONFIG_ENV);
    }
}

#[test]
#[serial]
fn missing_env_file_means_defaults() {
    let td = tempdir().unwrap();
    unsafe {
        std::env::set_var(CONFIG_ENV, td.path().join("absent.xml"));
    }

    let (loaded, path) = load_config().expect("load_config");
    assert_eq!(loaded, cpmove::Config::default());
    assert!(path.is_none());

    unsafe {
        std::env::remove_var(CONFIG_ENV);
    }
}
