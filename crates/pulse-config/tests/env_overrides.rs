use figment::Jail;
use pulse_config::PulseConfig;

#[test]
fn env_fills_nested_sections() {
    Jail::expect_with(|jail| {
        jail.set_env("PULSE_FORGE__TOKEN", "ghp_env");
        jail.set_env("PULSE_FORGE__API_URL", "http://localhost:8080");
        jail.set_env("PULSE_FILTER__DEFAULT_AGE_DAYS", "0");

        let config = PulseConfig::load().expect("config loads");
        assert_eq!(config.forge.token, "ghp_env");
        assert_eq!(config.forge.base_url(), "http://localhost:8080");
        assert_eq!(config.filter.default_filter().age_ms, 0);
        Ok(())
    });
}
