use crate::error::ConfigError;
use core_types::LeverageKey;
use serde::de::{self, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;

/// The root configuration structure for a rolling-window run.
///
/// Every section has defaults, so an empty file (or no file at all) is a valid configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RunConfig {
    pub data: DataSettings,
    pub window: WindowSettings,
    /// The leverage multipliers to simulate, in output column order.
    #[serde(deserialize_with = "one_or_many_leverages")]
    pub leverage: Vec<f64>,
    pub metrics: MetricsSettings,
    pub output: OutputSettings,
}

/// Accepts a list (`leverage = [1, 2.5]`) as well as a single multiplier (`leverage = 3`).
///
/// The environment produces either shape: `LEVWIN_LEVERAGE=3` arrives as a number and
/// `LEVWIN_LEVERAGE=1,2.5` as a list of strings.
fn one_or_many_leverages<'de, D>(deserializer: D) -> Result<Vec<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    struct Leverages;

    impl<'de> Visitor<'de> for Leverages {
        type Value = Vec<f64>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a leverage multiplier or a list of them")
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
            Ok(vec![value as f64])
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
            Ok(vec![value as f64])
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
            Ok(vec![value])
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            value
                .split(',')
                .map(|part| {
                    part.trim()
                        .parse::<f64>()
                        .map_err(|_| E::invalid_value(de::Unexpected::Str(part), &self))
                })
                .collect()
        }

        fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let mut leverages = Vec::with_capacity(seq.size_hint().unwrap_or(0));
            while let Some(leverage) = seq.next_element::<f64>()? {
                leverages.push(leverage);
            }
            Ok(leverages)
        }
    }

    deserializer.deserialize_any(Leverages)
}

/// Where the price history lives and which columns to read from it.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DataSettings {
    /// Path to the price CSV. Usually supplied on the command line.
    pub path: Option<PathBuf>,
    pub date_column: String,
    pub price_column: String,
    /// When set, an additional unleveraged dividend-reinvested column is produced.
    pub dividend_column: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WindowSettings {
    /// Number of holding periods per window. Each window covers `size + 1` observations.
    pub size: usize,
    /// The sampling frequency of the input data, used for annualization.
    pub frequency: SamplingFrequency,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct MetricsSettings {
    /// Add the unleveraged price return of the underlying as a column.
    pub underlying: bool,
    /// Compute the per-column summary statistics table (includes Sharpe ratios).
    pub summary: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputSettings {
    pub dir: PathBuf,
    /// Render boxplots of the return distributions.
    pub plot: bool,
    /// Mirror log output into a file inside `dir`.
    pub log_file: bool,
}

/// The sampling frequency of the observation sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum SamplingFrequency {
    Day,
    #[default]
    Month,
    Year,
}

impl SamplingFrequency {
    pub fn periods_per_year(&self) -> u32 {
        match self {
            SamplingFrequency::Day => 252,
            SamplingFrequency::Month => 12,
            SamplingFrequency::Year => 1,
        }
    }

    /// The chrono format used to render date-like window labels at this frequency.
    pub fn label_format(&self) -> &'static str {
        match self {
            SamplingFrequency::Day => "%Y-%m-%d",
            SamplingFrequency::Month => "%Y-%m",
            SamplingFrequency::Year => "%Y",
        }
    }
}

impl RunConfig {
    /// Checks the configuration and returns the canonical leverage keys, in the requested order.
    pub fn validate(&self) -> Result<Vec<LeverageKey>, ConfigError> {
        if self.window.size == 0 {
            return Err(ConfigError::ValidationError(
                "window.size must be at least 1".to_string(),
            ));
        }
        if self.leverage.is_empty() {
            return Err(ConfigError::ValidationError(
                "at least one leverage value is required".to_string(),
            ));
        }
        if self.data.date_column.trim().is_empty() || self.data.price_column.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "data.date_column and data.price_column must not be empty".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        let mut keys = Vec::with_capacity(self.leverage.len());
        for &value in &self.leverage {
            let key = LeverageKey::new(value)?;
            if !seen.insert(key.clone()) {
                return Err(ConfigError::ValidationError(format!(
                    "leverage {value} duplicates an earlier value (column key '{key}')"
                )));
            }
            keys.push(key);
        }

        Ok(keys)
    }
}

// --- Default Implementations ---
// Used when neither a file nor the environment sets a value.

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            data: DataSettings::default(),
            window: WindowSettings::default(),
            leverage: vec![1.0, 2.0],
            metrics: MetricsSettings::default(),
            output: OutputSettings::default(),
        }
    }
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            path: None,
            date_column: "date".to_string(),
            price_column: "sp_real_price".to_string(),
            dividend_column: None,
        }
    }
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            size: 252,
            frequency: SamplingFrequency::Month,
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            plot: false,
            log_file: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let keys = RunConfig::default().validate().unwrap();
        let rendered: Vec<&str> = keys.iter().map(|k| k.key()).collect();
        assert_eq!(rendered, vec!["1", "2"]);
    }

    #[test]
    fn rejects_zero_window() {
        let mut config = RunConfig::default();
        config.window.size = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn rejects_colliding_leverage_keys() {
        let mut config = RunConfig::default();
        config.leverage = vec![1.0, 2.0, 1.00];
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_empty_and_non_finite_leverage() {
        let mut config = RunConfig::default();
        config.leverage = vec![];
        assert!(config.validate().is_err());

        config.leverage = vec![f64::NAN];
        assert!(config.validate().is_err());
    }

    #[test]
    fn frequency_constants() {
        assert_eq!(SamplingFrequency::Day.periods_per_year(), 252);
        assert_eq!(SamplingFrequency::Month.periods_per_year(), 12);
        assert_eq!(SamplingFrequency::Year.periods_per_year(), 1);
        assert_eq!(SamplingFrequency::Month.label_format(), "%Y-%m");
    }
}
