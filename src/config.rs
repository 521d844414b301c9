use crate::constants::{
    DEFAULT_HOUR_LAYERS, DEFAULT_INFRASTRUCTURE_URL, DEFAULT_TIMETABLE_URL, MAX_HOUR_LAYERS,
    TIME_SCALE,
};
use serde::{Deserialize, Serialize};

/// Integer width of the index buffers, which fixes the restart sentinel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum IndexWidth {
    #[default]
    U16,
    U32,
}

impl std::str::FromStr for IndexWidth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "u16" | "16" => Ok(IndexWidth::U16),
            "u32" | "32" => Ok(IndexWidth::U32),
            other => Err(format!("Invalid index width: {other}")),
        }
    }
}

/// Settings for one viewer session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub infrastructure_url: String,
    pub timetable_url: String,
    pub time_scale: f64,
    pub hour_layers: u32,
    pub bucket_by_type: bool,
    pub index_width: IndexWidth,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            infrastructure_url: DEFAULT_INFRASTRUCTURE_URL.to_string(),
            timetable_url: DEFAULT_TIMETABLE_URL.to_string(),
            time_scale: TIME_SCALE,
            hour_layers: DEFAULT_HOUR_LAYERS,
            bucket_by_type: true,
            index_width: IndexWidth::default(),
        }
    }
}

impl ViewerConfig {
    /// Apply overrides from query parameters on top of the defaults.
    ///
    /// Recognised keys: `infrastructure`, `timetable`, `time_scale`,
    /// `hour_layers`, `bucket`, `index`.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first parameter whose value does not parse.
    pub fn from_params(param: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let mut config = Self::default();

        if let Some(url) = param("infrastructure").filter(|s| !s.is_empty()) {
            config.infrastructure_url = url;
        }
        if let Some(url) = param("timetable").filter(|s| !s.is_empty()) {
            config.timetable_url = url;
        }
        if let Some(value) = param("time_scale") {
            config.time_scale = value
                .parse::<f64>()
                .ok()
                .filter(|s| s.is_finite() && *s > 0.0)
                .ok_or_else(|| format!("Invalid time_scale: {value}"))?;
        }
        if let Some(value) = param("hour_layers") {
            config.hour_layers = value
                .parse::<u32>()
                .ok()
                .filter(|layers| *layers <= MAX_HOUR_LAYERS)
                .ok_or_else(|| {
                    format!("Invalid hour_layers: {value} (at most {MAX_HOUR_LAYERS})")
                })?;
        }
        if let Some(value) = param("bucket") {
            config.bucket_by_type =
                parse_flag(&value).ok_or_else(|| format!("Invalid bucket: {value}"))?;
        }
        if let Some(value) = param("index") {
            config.index_width = value.parse()?;
        }

        Ok(config)
    }

    /// Read overrides from the current page's query string
    ///
    /// # Errors
    ///
    /// Returns an error if the location is unavailable or a parameter is invalid.
    pub fn from_location() -> Result<Self, String> {
        let window = web_sys::window().ok_or("No window available")?;
        let search = window
            .location()
            .search()
            .map_err(|_| "Failed to read page location")?;
        let params = web_sys::UrlSearchParams::new_with_str(&search)
            .map_err(|_| "Failed to parse query string")?;
        Self::from_params(|key| params.get(key))
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn params(pairs: &[(&str, &str)]) -> Result<ViewerConfig, String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ViewerConfig::from_params(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = params(&[]).expect("defaults");
        assert_eq!(config, ViewerConfig::default());
        assert_eq!(config.infrastructure_url, "data/i1.json");
        assert_eq!(config.index_width, IndexWidth::U16);
        assert_eq!(config.hour_layers, 5);
        assert!(config.bucket_by_type);
    }

    #[test]
    fn test_overrides() {
        let config = params(&[
            ("infrastructure", "net.json"),
            ("timetable", "trains.json"),
            ("time_scale", "0.01"),
            ("hour_layers", "0"),
            ("bucket", "off"),
            ("index", "u32"),
        ])
        .expect("valid overrides");
        assert_eq!(config.infrastructure_url, "net.json");
        assert_eq!(config.timetable_url, "trains.json");
        assert_eq!(config.time_scale, 0.01);
        assert_eq!(config.hour_layers, 0);
        assert!(!config.bucket_by_type);
        assert_eq!(config.index_width, IndexWidth::U32);
    }

    #[test]
    fn test_empty_url_keeps_default() {
        let config = params(&[("timetable", "")]).expect("empty is ignored");
        assert_eq!(config.timetable_url, "data/tt1.json");
    }

    #[test]
    fn test_invalid_time_scale() {
        let err = params(&[("time_scale", "-1")]).expect_err("negative scale");
        assert!(err.contains("time_scale"));
        assert!(params(&[("time_scale", "fast")]).is_err());
    }

    #[test]
    fn test_invalid_index_width() {
        let err = params(&[("index", "u8")]).expect_err("u8 unsupported");
        assert_eq!(err, "Invalid index width: u8");
    }

    #[test]
    fn test_hour_layers_limit() {
        let config = params(&[("hour_layers", "48")]).expect("at the limit");
        assert_eq!(config.hour_layers, MAX_HOUR_LAYERS);

        let err = params(&[("hour_layers", "49")]).expect_err("past the limit");
        assert_eq!(err, "Invalid hour_layers: 49 (at most 48)");
        assert!(params(&[("hour_layers", "4294967295")]).is_err());
        assert!(params(&[("hour_layers", "-1")]).is_err());
    }

    #[test]
    fn test_invalid_flag() {
        assert!(params(&[("bucket", "maybe")]).is_err());
    }

    #[test]
    fn test_serde_fills_missing_fields() {
        let config: ViewerConfig =
            serde_json::from_str(r#"{"index_width": "u32"}"#).expect("partial config");
        assert_eq!(config.index_width, IndexWidth::U32);
        assert_eq!(config.time_scale, TIME_SCALE);
    }
}
