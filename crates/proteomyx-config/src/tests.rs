use super::*;
use pretty_assertions::assert_eq;
use std::collections::HashMap;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn test_empty_file_uses_defaults() {
    let config = Config::from_toml_str("").unwrap();
    assert_eq!(config.environment, Environment::Development);
    assert_eq!(config.server.port, 3001);
    assert_eq!(config.expansion.api_path, "/flaskapi/api");
    assert_eq!(config.expansion.timeout_secs, 30);
    assert_eq!(config.session.default_expansion_method, "PageRank");
    assert_eq!(config.session.default_interactome, "string");
    assert_eq!(config.session.idle_ttl_secs, 1800);
    assert!(config.validate().is_ok());
}

#[test]
fn test_service_url_follows_environment() {
    let expansion = ExpansionConfig::default();
    assert_eq!(
        expansion.service_url(Environment::Production).unwrap().as_str(),
        "http://nginx/flaskapi/api"
    );
    assert_eq!(
        expansion.service_url(Environment::Development).unwrap().as_str(),
        "http://localhost/flaskapi/api"
    );
}

#[test]
fn test_explicit_base_url_wins() {
    let config = Config::from_toml_str(
        r#"
        environment = "production"

        [expansion]
        base_url = "http://expander.internal:8080/"
        api_path = "api"
        "#,
    )
    .unwrap();
    assert_eq!(
        config.expansion.service_url(config.environment).unwrap().as_str(),
        "http://expander.internal:8080/api"
    );
}

#[test]
fn test_env_overrides() {
    let mut config = Config::default();
    config.apply_overrides(lookup_from(&[
        (ENVIRONMENT_VAR, "production"),
        (EXPANSION_URL_VAR, "http://10.0.0.5:9000"),
        (PORT_VAR, "8088"),
    ]));
    assert_eq!(config.environment, Environment::Production);
    assert_eq!(config.expansion.base_url.as_deref(), Some("http://10.0.0.5:9000"));
    assert_eq!(config.server.port, 8088);
    assert_eq!(config.bind_address(), "127.0.0.1:8088");
}

#[test]
fn test_bad_overrides_are_ignored() {
    let mut config = Config::default();
    config.apply_overrides(lookup_from(&[(ENVIRONMENT_VAR, "staging"), (PORT_VAR, "http")]));
    assert_eq!(config.environment, Environment::Development);
    assert_eq!(config.server.port, 3001);
}

#[test]
fn test_validate_rejects_bad_values() {
    let mut config = Config::default();
    config.expansion.timeout_secs = 0;
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

    let mut config = Config::default();
    config.expansion.base_url = Some("not a url".into());
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.server.port = 0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.session.idle_ttl_secs = 0;
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
}

#[test]
fn test_parse_error_surfaces() {
    let err = Config::from_toml_str("[server]\nport = \"abc\"").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn test_example_file_parses() {
    let config = Config::from_toml_str(include_str!("../../../proteomyx.example.toml")).unwrap();
    config.validate().unwrap();
    assert_eq!(config.bind_address(), "127.0.0.1:3001");
    assert_eq!(config.logging.filter, "proteomyx=debug,info");
}
