use envconf::{EnvConf, must_parse, parse};

// Every test uses its own prefix so parallel tests never share keys

#[derive(Debug, Default, EnvConf)]
pub struct ProcessConfig {
    #[envconf(default = "8080")]
    pub port: i32,
    #[envconf(vudou = "envconf_it_region")]
    pub region: String,
}

#[derive(Debug, Default, EnvConf)]
pub struct MustConfig {
    #[envconf(required = "true")]
    pub token: String,
}

#[test]
fn test_parse_reads_process_environment() {
    std::env::set_var("ENVCONF_IT_READ_PORT", "9191");
    std::env::set_var("ENVCONF_IT_REGION", "eu-west-1");
    let mut config = ProcessConfig::default();

    let written = parse("envconf_it_read", &mut config).unwrap();

    assert_eq!(written, 2);
    assert_eq!(config.port, 9191);
    assert_eq!(config.region, "eu-west-1");
}

#[test]
fn test_empty_process_value_counts_as_unset() {
    std::env::set_var("ENVCONF_IT_EMPTY_PORT", "");
    let mut config = ProcessConfig::default();

    parse("envconf_it_empty", &mut config).unwrap();

    assert_eq!(config.port, 8080);
}

#[test]
fn test_must_parse_succeeds() {
    std::env::set_var("ENVCONF_IT_MUST_OK_TOKEN", "secret");
    let mut config = MustConfig::default();

    assert_eq!(must_parse("envconf_it_must_ok", &mut config), 1);
    assert_eq!(config.token, "secret");
}

#[test]
#[should_panic(expected = "ENVCONF_IT_MUST_MISSING_TOKEN")]
fn test_must_parse_panics_on_missing_required() {
    let mut config = MustConfig::default();
    must_parse("envconf_it_must_missing", &mut config);
}
