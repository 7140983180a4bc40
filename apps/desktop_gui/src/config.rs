use std::{fs, io::ErrorKind, path::Path, str::FromStr};

use serde::Deserialize;
use shared::error::SettingsError;
use transition_core::{
    spring::{
        DEFAULT_DAMPING_FRACTION, DEFAULT_RESPONSE_SECS, MAX_DAMPING_FRACTION, MAX_RESPONSE_SECS,
        MIN_DAMPING_FRACTION, MIN_RESPONSE_SECS,
    },
    SpringCurve,
};

pub const MIN_COLUMNS: usize = 1;
pub const MAX_COLUMNS: usize = 8;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub window_width: f32,
    pub window_height: f32,
    pub item_count: usize,
    pub columns: usize,
    pub log_filter: String,
    pub spring_response: f64,
    pub spring_damping_fraction: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_width: 430.0,
            window_height: 932.0,
            item_count: 20,
            columns: 2,
            log_filter: "info".into(),
            spring_response: DEFAULT_RESPONSE_SECS,
            spring_damping_fraction: DEFAULT_DAMPING_FRACTION,
        }
    }
}

impl Settings {
    pub fn spring_curve(&self) -> SpringCurve {
        SpringCurve::new(self.spring_response, self.spring_damping_fraction)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(MIN_COLUMNS..=MAX_COLUMNS).contains(&self.columns) {
            return Err(SettingsError::ColumnsOutOfRange {
                min: MIN_COLUMNS,
                max: MAX_COLUMNS,
                actual: self.columns,
            });
        }
        if self.item_count == 0 {
            return Err(SettingsError::NoItems);
        }
        if !(self.window_width > 0.0 && self.window_height > 0.0) {
            return Err(SettingsError::InvalidWindowSize {
                width: self.window_width,
                height: self.window_height,
            });
        }
        check_spring_range(
            "spring_response",
            self.spring_response,
            MIN_RESPONSE_SECS,
            MAX_RESPONSE_SECS,
        )?;
        check_spring_range(
            "spring_damping_fraction",
            self.spring_damping_fraction,
            MIN_DAMPING_FRACTION,
            MAX_DAMPING_FRACTION,
        )?;
        Ok(())
    }
}

fn check_spring_range(
    key: &'static str,
    actual: f64,
    min: f64,
    max: f64,
) -> Result<(), SettingsError> {
    if (min..=max).contains(&actual) {
        Ok(())
    } else {
        Err(SettingsError::SpringOutOfRange {
            key,
            min,
            max,
            actual,
        })
    }
}

pub fn load_settings(path: &Path) -> Result<Settings, SettingsError> {
    load_settings_with(path, |key| std::env::var(key).ok())
}

/// Defaults, then the TOML file at `path` if it exists, then `MORPH_*`
/// variables from `env`.
pub fn load_settings_with(
    path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> Result<Settings, SettingsError> {
    let mut settings = match fs::read_to_string(path) {
        Ok(raw) => toml::from_str::<Settings>(&raw).map_err(|source| SettingsError::Parse {
            path: path.display().to_string(),
            source,
        })?,
        Err(err) if err.kind() == ErrorKind::NotFound => Settings::default(),
        Err(source) => {
            return Err(SettingsError::Read {
                path: path.display().to_string(),
                source,
            })
        }
    };

    if let Some(v) = env_value::<f32>(&env, "MORPH_WINDOW_WIDTH")? {
        settings.window_width = v;
    }
    if let Some(v) = env_value::<f32>(&env, "MORPH_WINDOW_HEIGHT")? {
        settings.window_height = v;
    }
    if let Some(v) = env_value::<usize>(&env, "MORPH_ITEM_COUNT")? {
        settings.item_count = v;
    }
    if let Some(v) = env_value::<usize>(&env, "MORPH_COLUMNS")? {
        settings.columns = v;
    }
    if let Some(v) = env_value::<f64>(&env, "MORPH_SPRING_RESPONSE")? {
        settings.spring_response = v;
    }
    if let Some(v) = env_value::<f64>(&env, "MORPH_SPRING_DAMPING")? {
        settings.spring_damping_fraction = v;
    }
    if let Some(v) = env("MORPH_LOG").filter(|v| !v.trim().is_empty()) {
        settings.log_filter = v;
    }

    settings.validate()?;
    Ok(settings)
}

fn env_value<T: FromStr>(
    env: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, SettingsError> {
    let Some(raw) = env(key) else {
        return Ok(None);
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<T>()
        .map(Some)
        .map_err(|_| SettingsError::InvalidValue {
            key,
            value: raw.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashMap,
        env,
        path::PathBuf,
        sync::atomic::{AtomicUsize, Ordering},
        time::{SystemTime, UNIX_EPOCH},
    };

    use super::*;

    static NEXT_FILE: AtomicUsize = AtomicUsize::new(0);

    fn temp_settings_file(contents: &str) -> PathBuf {
        let suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        let seq = NEXT_FILE.fetch_add(1, Ordering::SeqCst);
        let path = env::temp_dir().join(format!("morph_settings_test_{suffix}_{seq}.toml"));
        fs::write(&path, contents).expect("write settings");
        path
    }

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn missing_file_yields_defaults() {
        let path = env::temp_dir().join("morph_settings_definitely_missing.toml");
        let settings = load_settings_with(&path, env_from(&[])).expect("defaults");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn file_values_then_env_overrides() {
        let path = temp_settings_file("columns = 3\nitem_count = 40\nlog_filter = \"debug\"\n");
        let settings = load_settings_with(
            &path,
            env_from(&[("MORPH_COLUMNS", "4"), ("MORPH_LOG", "  ")]),
        )
        .expect("settings");
        fs::remove_file(&path).expect("cleanup");

        assert_eq!(settings.columns, 4);
        assert_eq!(settings.item_count, 40);
        assert_eq!(settings.log_filter, "debug");
        assert_eq!(settings.window_width, Settings::default().window_width);
    }

    #[test]
    fn rejects_unparseable_env_value() {
        let path = env::temp_dir().join("morph_settings_definitely_missing.toml");
        let err = load_settings_with(&path, env_from(&[("MORPH_ITEM_COUNT", "many")]))
            .expect_err("invalid");
        assert!(matches!(
            err,
            SettingsError::InvalidValue {
                key: "MORPH_ITEM_COUNT",
                ..
            }
        ));
    }

    #[test]
    fn rejects_out_of_range_columns_and_bad_toml() {
        let path = temp_settings_file("columns = 0\n");
        let err = load_settings_with(&path, env_from(&[])).expect_err("columns");
        fs::remove_file(&path).expect("cleanup");
        assert!(matches!(
            err,
            SettingsError::ColumnsOutOfRange { actual: 0, .. }
        ));

        let path = temp_settings_file("columns = \"two\"\n");
        let err = load_settings_with(&path, env_from(&[])).expect_err("parse");
        fs::remove_file(&path).expect("cleanup");
        assert!(matches!(err, SettingsError::Parse { .. }));
    }

    #[test]
    fn rejects_spring_settings_outside_the_curve_range() {
        let path = env::temp_dir().join("morph_settings_definitely_missing.toml");
        let err = load_settings_with(&path, env_from(&[("MORPH_SPRING_RESPONSE", "1e20")]))
            .expect_err("response");
        assert!(matches!(
            err,
            SettingsError::SpringOutOfRange {
                key: "spring_response",
                ..
            }
        ));

        let path = temp_settings_file("spring_damping_fraction = 0.0\n");
        let err = load_settings_with(&path, env_from(&[])).expect_err("damping");
        fs::remove_file(&path).expect("cleanup");
        assert!(matches!(
            err,
            SettingsError::SpringOutOfRange {
                key: "spring_damping_fraction",
                ..
            }
        ));

        let nan = Settings {
            spring_response: f64::NAN,
            ..Settings::default()
        };
        assert!(nan.validate().is_err());
    }

    #[test]
    fn spring_settings_feed_the_curve() {
        let settings = Settings {
            spring_response: 0.3,
            spring_damping_fraction: 1.0,
            ..Settings::default()
        };
        assert_eq!(settings.spring_curve(), SpringCurve::new(0.3, 1.0));
    }
}
