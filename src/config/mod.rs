use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::errors::LedgerError;

/// Knobs for the rate solver.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SolverConfig {
    /// Starting rate for Newton-Raphson, as a fraction (0.1 = 10%).
    pub initial_guess: f64,
    pub max_iterations: u32,
    /// Iteration cap for the bisection fallback.
    pub bisection_iterations: u32,
    pub npv_tolerance: f64,
    pub rate_tolerance: f64,
    /// Days per year used to annualize.
    pub day_count_basis: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            initial_guess: 0.1,
            max_iterations: 100,
            bisection_iterations: 200,
            npv_tolerance: 1e-6,
            rate_tolerance: 1e-9,
            day_count_basis: 365.0,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReportConfig {
    /// Write each computed report as CSV into `output_dir`.
    pub write_csv: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
}

impl ReportConfig {
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub solver: SolverConfig,
    pub report: ReportConfig,
}

impl Config {
    /// Reads a JSON config, falling back to defaults when the file is absent.
    pub fn load(path: &Path) -> Result<Self, LedgerError> {
        if path.exists() {
            let data = fs::read_to_string(path)?;
            Self::from_json(&data)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_json(data: &str) -> Result<Self, LedgerError> {
        Ok(serde_json::from_str(data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.solver.max_iterations, 100);
        assert!(!config.report.write_csv);
    }

    #[test]
    fn partial_json_keeps_remaining_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "solver": {{ "max_iterations": 40 }}, "report": {{ "write_csv": true, "output_dir": "out" }} }}"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.solver.max_iterations, 40);
        assert_eq!(config.solver.day_count_basis, 365.0);
        assert!(config.report.write_csv);
        assert_eq!(config.report.output_dir(), PathBuf::from("out"));
    }

    #[test]
    fn malformed_json_is_a_serde_error() {
        let err = Config::from_json("{ solver: ").unwrap_err();
        assert!(matches!(err, LedgerError::Serde(_)));
    }
}
