use chrono::{Local, NaiveDateTime};
use core_types::LeverageKey;
use std::path::{Path, PathBuf};

/// Names the artifacts of one run.
///
/// Every file shares the output directory, the leverage tag and the timestamp taken when the
/// run started: `<name>_lev_<k1>_<k2>_run_<YYYYmmdd_HHMMSS>.<ext>`.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutputs {
    dir: PathBuf,
    leverage_tag: String,
    timestamp: String,
}

impl RunOutputs {
    pub fn new<'a>(
        dir: impl Into<PathBuf>,
        leverages: impl IntoIterator<Item = &'a LeverageKey>,
    ) -> Self {
        Self::at(dir, leverages, Local::now().naive_local())
    }

    /// Same as `new`, with a fixed timestamp.
    pub fn at<'a>(
        dir: impl Into<PathBuf>,
        leverages: impl IntoIterator<Item = &'a LeverageKey>,
        started: NaiveDateTime,
    ) -> Self {
        let leverage_tag = leverages
            .into_iter()
            .map(LeverageKey::key)
            .collect::<Vec<_>>()
            .join("_");
        Self {
            dir: dir.into(),
            leverage_tag,
            timestamp: started.format("%Y%m%d_%H%M%S").to_string(),
        }
    }

    pub fn path(&self, name: &str, ext: &str) -> PathBuf {
        self.dir.join(format!(
            "{name}_lev_{}_run_{}.{ext}",
            self.leverage_tag, self.timestamp
        ))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn names_follow_the_run_pattern() {
        let keys: Vec<LeverageKey> = [1.0, 2.5, 10.0]
            .iter()
            .map(|l| LeverageKey::new(*l).unwrap())
            .collect();
        let started = NaiveDate::from_ymd_opt(2025, 3, 9)
            .unwrap()
            .and_hms_opt(14, 5, 7)
            .unwrap();

        let outputs = RunOutputs::at("out", &keys, started);

        assert_eq!(
            outputs.path("returns", "csv"),
            PathBuf::from("out/returns_lev_1_2.5_10_run_20250309_140507.csv")
        );
        assert_eq!(
            outputs.path("returns_log", "svg"),
            PathBuf::from("out/returns_log_lev_1_2.5_10_run_20250309_140507.svg")
        );
    }
}
