use markovian::error::MarkovianError;
use markovian::settings::Settings;

#[test]
fn defaults_are_valid() {
    let settings = Settings::default();
    settings.validate().expect("defaults validate");
    assert_eq!(settings.engine.step_limit, 10_000);
    assert_eq!(settings.engine.length_limit, Some(65_536));
    assert_eq!(settings.sampling.scales, vec![2, 4, 8, 16, 32, 64, 128]);
    assert_eq!(settings.server.bind, "127.0.0.1:5000");
}

#[test]
fn file_overrides_defaults() {
    let path = std::env::temp_dir().join("markovian_settings_override.toml");
    std::fs::write(
        &path,
        "[engine]\nstep_limit = 42\n\n[sampling]\nscales = [1, 3, 9]\ntolerance = 0.1\n",
    )
    .expect("write config");
    let settings = Settings::load(path.to_str()).expect("settings load");
    assert_eq!(settings.engine.step_limit, 42);
    assert_eq!(settings.sampling.scales, vec![1, 3, 9]);
    assert_eq!(settings.sampling.tolerance, 0.1);
    assert_eq!(settings.sampling.max_scales, 12, "untouched values keep defaults");
    let _ = std::fs::remove_file(&path);
}

#[test]
fn descending_scales_are_rejected() {
    let path = std::env::temp_dir().join("markovian_settings_descending.toml");
    std::fs::write(&path, "[sampling]\nscales = [8, 4]\n").expect("write config");
    let err = Settings::load(path.to_str()).unwrap_err();
    assert!(matches!(err, MarkovianError::Config(_)), "unexpected error: {err}");
    let _ = std::fs::remove_file(&path);
}

#[test]
fn missing_explicit_file_is_an_error() {
    let err = Settings::load(Some("/nonexistent/markovian.toml")).unwrap_err();
    assert!(matches!(err, MarkovianError::Config(_)));
}
