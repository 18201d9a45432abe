use std::collections::HashMap;
use std::path::PathBuf;

use serde::Deserialize;
use tracing::level_filters::LevelFilter;

pub const IP2LOCATION_BIN_PATH: &str = "ip2location.bin.path";
pub const IP2LOCATION_INPUT: &str = "ip2location.input";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ip2Location {
    /// Path to the geolocation database.
    pub bin_path: PathBuf,
    /// Record field holding the IP address to query.
    pub input: String,
}

impl Ip2Location {
    /// Reads the transform settings from a flat property map. Missing keys fall back to empty
    /// values; an empty path or field only shows up later as a per-record lookup error.
    pub fn from_props(props: &HashMap<String, String>) -> Self {
        Ip2Location {
            bin_path: props
                .get(IP2LOCATION_BIN_PATH)
                .map(PathBuf::from)
                .unwrap_or_default(),
            input: props.get(IP2LOCATION_INPUT).cloned().unwrap_or_default(),
        }
    }
}

/// Which side of the record the transform reads and rewrites.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Key,
    #[default]
    Value,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transform {
    pub side: Side,
    pub schemas_enable: bool,
}

#[derive(Debug, Clone)]
pub struct Log {
    pub level: LevelFilter,
}

impl Default for Log {
    fn default() -> Self {
        Log {
            level: LevelFilter::INFO,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub ip2location: Ip2Location,
    pub transform: Transform,
    pub log: Log,
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn from_props() {
        let mut props = HashMap::new();
        props.insert(IP2LOCATION_BIN_PATH.to_string(), "/data/DB1.BIN".to_string());
        props.insert(IP2LOCATION_INPUT.to_string(), "ip_address".to_string());
        props.insert("unrelated".to_string(), "x".to_string());

        let cfg = Ip2Location::from_props(&props);
        assert_eq!(cfg.bin_path, PathBuf::from("/data/DB1.BIN"));
        assert_eq!(cfg.input, "ip_address");
    }

    #[test]
    fn from_props_defaults_to_empty() {
        let cfg = Ip2Location::from_props(&HashMap::new());
        assert_eq!(cfg, Ip2Location::default());
        assert!(cfg.bin_path.as_os_str().is_empty());
        assert!(cfg.input.is_empty());
    }
}
