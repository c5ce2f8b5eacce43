//! Integration tests for TOML configuration loading.
//!
//! Uses figment::Jail for safe, sandboxed env var manipulation.

use figment::{
    Figment, Jail,
    providers::{Env, Format, Serialized, Toml},
};
use pulse_config::PulseConfig;
use pulse_core::Filter;

#[test]
fn loads_forge_config_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[forge]
api_url = "https://ghe.example.com/api/v3"
provider_name = "Enterprise"
token = "ghp_toml"
timeout_secs = 30
concurrency = 8
"#,
        )?;

        let config: PulseConfig = Figment::from(Serialized::defaults(PulseConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.forge.api_url, "https://ghe.example.com/api/v3");
        assert_eq!(config.forge.provider_name, "Enterprise");
        assert_eq!(config.forge.token, "ghp_toml");
        assert_eq!(config.forge.timeout_secs, 30);
        assert_eq!(config.forge.concurrency, 8);
        assert!(config.forge.user_agent.starts_with("pulse/"));
        assert!(config.forge.is_configured());
        Ok(())
    });
}

#[test]
fn loads_filter_config_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[filter]
store_path = "state/filter.json"
default_starred = true
default_age_days = 30
"#,
        )?;

        let config: PulseConfig = Figment::from(Serialized::defaults(PulseConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.filter.store_path, "state/filter.json");
        assert_eq!(
            config.filter.default_filter(),
            Filter::default().with_starred(true).with_age_days(30)
        );
        Ok(())
    });
}

#[test]
fn project_config_is_picked_up_by_load() {
    Jail::expect_with(|jail| {
        jail.create_dir(".pulse")?;
        jail.create_file(
            ".pulse/config.toml",
            r#"
[forge]
provider_name = "Local"
"#,
        )?;

        let config = PulseConfig::load().expect("config loads");
        assert_eq!(config.forge.provider_name, "Local");
        Ok(())
    });
}

#[test]
fn env_beats_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[forge]
token = "from_toml"
"#,
        )?;
        jail.set_env("PULSE_FORGE__TOKEN", "from_env");

        let config: PulseConfig = Figment::from(Serialized::defaults(PulseConfig::default()))
            .merge(Toml::file("config.toml"))
            .merge(Env::prefixed("PULSE_").split("__"))
            .extract()?;

        assert_eq!(config.forge.token, "from_env");
        Ok(())
    });
}

#[test]
fn invalid_values_fail_load() {
    Jail::expect_with(|jail| {
        jail.set_env("PULSE_FORGE__CONCURRENCY", "0");
        assert!(PulseConfig::load().is_err());
        Ok(())
    });
}
