//! INI file configuration adapter.

use crate::domain::error::TradesimError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

#[derive(Debug)]
pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TradesimError> {
        let mut config = Ini::new();
        config
            .load(path.as_ref())
            .map_err(|reason| TradesimError::ConfigParse {
                file: path.as_ref().display().to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let mut config = Ini::new();
        config.read(content.to_string())?;
        Ok(Self { config })
    }

    fn parse_bool(value: &str) -> Option<bool> {
        match value.to_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.config
            .getint(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.config
            .getfloat(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.config
            .get(section, key)
            .as_ref()
            .and_then(|v| Self::parse_bool(v))
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn from_string_parses_config() {
        let content = r#"
[simulation]
tickers = AAPL,MSFT
initial_cash = 10000.0

[data]
source = csv
csv_dir = /data/prices
"#;
        let adapter = FileConfigAdapter::from_string(content).unwrap();
        assert_eq!(
            adapter.get_string("simulation", "tickers"),
            Some("AAPL,MSFT".to_string())
        );
        assert_eq!(
            adapter.get_string("data", "csv_dir"),
            Some("/data/prices".to_string())
        );
    }

    #[test]
    fn get_string_returns_none_for_missing_key() {
        let adapter =
            FileConfigAdapter::from_string("[simulation]\ninitial_cash = 100\n").unwrap();
        assert_eq!(adapter.get_string("simulation", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "key"), None);
    }

    #[test]
    fn get_int_returns_value() {
        let adapter = FileConfigAdapter::from_string("[decision]\nwindow = 20\n").unwrap();
        assert_eq!(adapter.get_int("decision", "window", 0), 20);
    }

    #[test]
    fn get_int_returns_default_for_missing() {
        let adapter = FileConfigAdapter::from_string("[decision]\n").unwrap();
        assert_eq!(adapter.get_int("decision", "missing", 42), 42);
    }

    #[test]
    fn get_int_returns_default_for_non_numeric() {
        let adapter = FileConfigAdapter::from_string("[decision]\nwindow = abc\n").unwrap();
        assert_eq!(adapter.get_int("decision", "window", 42), 42);
    }

    #[test]
    fn get_double_returns_value() {
        let adapter =
            FileConfigAdapter::from_string("[simulation]\ninitial_cash = 10000.5\n").unwrap();
        assert_eq!(adapter.get_double("simulation", "initial_cash", 0.0), 10000.5);
    }

    #[test]
    fn get_double_returns_default_for_missing() {
        let adapter = FileConfigAdapter::from_string("[simulation]\n").unwrap();
        assert_eq!(adapter.get_double("simulation", "missing", 99.9), 99.9);
    }

    #[test]
    fn get_double_returns_default_for_non_numeric() {
        let adapter =
            FileConfigAdapter::from_string("[simulation]\ninitial_cash = not_a_number\n").unwrap();
        assert_eq!(adapter.get_double("simulation", "initial_cash", 99.9), 99.9);
    }

    #[test]
    fn get_bool_returns_true_values() {
        let adapter =
            FileConfigAdapter::from_string("[output]\na = true\nb = yes\nc = 1\n").unwrap();
        assert!(adapter.get_bool("output", "a", false));
        assert!(adapter.get_bool("output", "b", false));
        assert!(adapter.get_bool("output", "c", false));
    }

    #[test]
    fn get_bool_returns_false_values() {
        let adapter =
            FileConfigAdapter::from_string("[output]\na = false\nb = no\nc = 0\n").unwrap();
        assert!(!adapter.get_bool("output", "a", true));
        assert!(!adapter.get_bool("output", "b", true));
        assert!(!adapter.get_bool("output", "c", true));
    }

    #[test]
    fn get_bool_returns_default_for_missing() {
        let adapter = FileConfigAdapter::from_string("[output]\n").unwrap();
        assert!(adapter.get_bool("output", "missing", true));
        assert!(!adapter.get_bool("output", "missing", false));
    }

    #[test]
    fn from_file_reads_config() {
        let content = "[output]\ndir = /var/runs\n";
        let file = create_temp_config(content);
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(
            adapter.get_string("output", "dir"),
            Some("/var/runs".to_string())
        );
    }

    #[test]
    fn from_file_returns_config_parse_error_for_missing_file() {
        let err = FileConfigAdapter::from_file("/nonexistent/path/config.ini").unwrap_err();
        assert!(matches!(err, TradesimError::ConfigParse { .. }));
    }

    #[test]
    fn handles_all_config_sections() {
        let content = r#"
[simulation]
tickers = AAPL
initial_cash = 10000.0
transaction_cost_rate = 0.001

[data]
source = sqlite
price_field = adj_close

[decision]
provider = momentum
buy_threshold = 0.25

[output]
dir = runs
"#;
        let adapter = FileConfigAdapter::from_string(content).unwrap();

        assert_eq!(
            adapter.get_string("simulation", "tickers"),
            Some("AAPL".to_string())
        );
        assert_eq!(adapter.get_double("simulation", "initial_cash", 0.0), 10000.0);
        assert_eq!(
            adapter.get_double("simulation", "transaction_cost_rate", 0.0),
            0.001
        );
        assert_eq!(
            adapter.get_string("data", "price_field"),
            Some("adj_close".to_string())
        );
        assert_eq!(
            adapter.get_string("decision", "provider"),
            Some("momentum".to_string())
        );
        assert_eq!(adapter.get_double("decision", "buy_threshold", 0.0), 0.25);
        assert_eq!(adapter.get_string("output", "dir"), Some("runs".to_string()));
    }
}
