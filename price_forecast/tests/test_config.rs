use pretty_assertions::assert_eq;
use price_forecast::config::{ENV_HORIZON, ENV_SEED, ENV_SMOOTHING_FACTOR, ENV_WINDOW_DAYS};
use price_forecast::{ForecastConfig, ForecastError, GeneratorConfig, Settings, SmoothingExtrapolation};
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_defaults() {
    let settings = Settings::default();
    assert_eq!(settings.forecast.horizon, 7);
    assert_eq!(settings.forecast.smoothing_factor, 0.3);
    assert_eq!(settings.forecast.blend_weights().unwrap(), (0.5, 0.5));
    assert_eq!(settings.forecast.extrapolation, SmoothingExtrapolation::Flat);
    assert_eq!(settings.generator.window_days, 90);
    assert_eq!(settings.generator.seed, None);
    assert!(settings.validate().is_ok());
}

#[test]
fn test_partial_json_keeps_defaults() {
    let json = r#"{
        "forecast": { "horizon": 14, "extrapolation": "last_slope" },
        "generator": { "seed": 11 }
    }"#;
    let settings = Settings::from_json_str(json).unwrap();

    assert_eq!(settings.forecast.horizon, 14);
    assert_eq!(settings.forecast.extrapolation, SmoothingExtrapolation::LastSlope);
    assert_eq!(settings.forecast.smoothing_factor, 0.3);
    assert_eq!(settings.generator.seed, Some(11));
    assert_eq!(settings.generator.window_days, 90);
}

#[test]
fn test_json_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, r#"{{ "forecast": {{ "smoothing_factor": 0.6 }} }}"#).unwrap();
    file.flush().unwrap();

    let settings = Settings::from_json_file(file.path()).unwrap();
    assert_eq!(settings.forecast.smoothing_factor, 0.6);
}

#[test]
fn test_invalid_json_values() {
    assert!(matches!(
        Settings::from_json_str(r#"{ "forecast": { "horizon": 0 } }"#),
        Err(ForecastError::ConfigurationError(_))
    ));
    assert!(matches!(
        Settings::from_json_str(r#"{ "forecast": { "horizon": -3 } }"#),
        Err(ForecastError::JsonError(_))
    ));
    assert!(matches!(
        Settings::from_json_str("not json"),
        Err(ForecastError::JsonError(_))
    ));
}

#[test]
fn test_env_overrides() {
    let vars = vec![
        (ENV_HORIZON, "10"),
        (ENV_SMOOTHING_FACTOR, " 0.5 "),
        (ENV_WINDOW_DAYS, "30"),
        (ENV_SEED, "1234"),
        ("PATH", "/usr/bin"),
    ];
    let settings = Settings::default().apply_vars(vars).unwrap();

    assert_eq!(settings.forecast.horizon, 10);
    assert_eq!(settings.forecast.smoothing_factor, 0.5);
    assert_eq!(settings.generator.window_days, 30);
    assert_eq!(settings.generator.seed, Some(1234));
}

#[test]
fn test_env_rejects_bad_values() {
    for (key, value) in [
        (ENV_HORIZON, "0"),
        (ENV_HORIZON, "-2"),
        (ENV_HORIZON, "seven"),
        (ENV_WINDOW_DAYS, "0"),
        (ENV_SMOOTHING_FACTOR, "1.5"),
    ] {
        assert!(
            matches!(
                Settings::default().apply_vars([(key, value)]),
                Err(ForecastError::ConfigurationError(_))
            ),
            "{}={} should be rejected",
            key,
            value
        );
    }
}

#[test]
fn test_blend_weights_normalised() {
    let config = ForecastConfig::default().with_weights(2.0, 6.0);
    assert_eq!(config.blend_weights().unwrap(), (0.25, 0.75));

    assert!(ForecastConfig::default().with_weights(0.0, 1.0).validate().is_ok());
    assert!(ForecastConfig::default()
        .with_weights(f64::NAN, 1.0)
        .validate()
        .is_err());
}

#[test]
fn test_generator_config_validation() {
    assert!(GeneratorConfig::default().validate().is_ok());
    assert!(GeneratorConfig {
        annual_drift: -0.2,
        ..GeneratorConfig::default()
    }
    .validate()
    .is_ok());
    assert!(GeneratorConfig {
        annual_drift: f64::INFINITY,
        ..GeneratorConfig::default()
    }
    .validate()
    .is_err());
}
