//! Configuration for locating and running the CFO tools.
//!
//! Lookup order used by [`CfoConfig::discover`]:
//!
//! 1. `<project_root>/.cfo.yaml`
//! 2. `~/.cfo/config.yaml`
//! 3. built-in defaults
//!
//! ```yaml
//! scripts_dir: .claude/skills/cfo/scripts
//! interpreter: python3
//! timeout_secs: 120
//! alert_threshold: 1500.0
//! tools:
//!   analyzer: analyze_costs.py
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{CfoError, Result};
use crate::logging::cfo_home;

/// File name looked up in the project root.
pub const PROJECT_CONFIG_FILE: &str = ".cfo.yaml";

/// Default scripts location, relative to the project root.
pub const DEFAULT_SCRIPTS_DIR: &str = ".claude/skills/cfo/scripts";

/// Default sample billing export used by the demo, relative to the project root.
pub const DEFAULT_SAMPLE_BILL: &str = ".claude/skills/cfo/examples/sample-data/aws-sample-bill.csv";

/// Monthly cost above which the threshold check warns (USD).
pub const DEFAULT_ALERT_THRESHOLD: f64 = 1000.0;

/// Top-level CFO configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CfoConfig {
    /// Directory holding the tool scripts. Relative paths resolve against the project root.
    pub scripts_dir: PathBuf,

    /// Program used to run each script. `None` executes the script directly.
    pub interpreter: Option<String>,

    /// Script file names for each tool
    pub tools: ToolScripts,

    /// Optional deadline per tool run in seconds. `None` waits indefinitely.
    pub timeout_secs: Option<u64>,

    /// Threshold for the monthly cost alert (USD)
    pub alert_threshold: f64,

    /// Billing export used by the demo. Relative paths resolve against the project root.
    pub sample_bill: PathBuf,
}

impl Default for CfoConfig {
    fn default() -> Self {
        Self {
            scripts_dir: PathBuf::from(DEFAULT_SCRIPTS_DIR),
            interpreter: Some("python".to_string()),
            tools: ToolScripts::default(),
            timeout_secs: None,
            alert_threshold: DEFAULT_ALERT_THRESHOLD,
            sample_bill: PathBuf::from(DEFAULT_SAMPLE_BILL),
        }
    }
}

/// Script names of the three external tools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolScripts {
    /// Codebase cost analyzer
    pub analyzer: String,

    /// Billing export parser
    pub billing_parser: String,

    /// Cost forecaster
    pub forecaster: String,
}

impl Default for ToolScripts {
    fn default() -> Self {
        Self {
            analyzer: "analyze_costs.py".to_string(),
            billing_parser: "parse_bills.py".to_string(),
            forecaster: "forecast.py".to_string(),
        }
    }
}

impl CfoConfig {
    /// Create a configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                CfoError::ConfigNotFound {
                    path: path.to_path_buf(),
                    source: Some(e),
                }
            } else {
                CfoError::io("reading config", path, e)
            }
        })?;

        let config: Self = serde_yaml::from_str(&content)
            .map_err(|e| CfoError::config_invalid(path, e.to_string()))?;
        config.validate().map_err(|message| CfoError::config_invalid(path, message))?;

        debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Find and load the configuration for a project, falling back to defaults.
    pub fn discover(project_root: &Path) -> Result<Self> {
        let project_file = project_root.join(PROJECT_CONFIG_FILE);
        if project_file.is_file() {
            return Self::load(&project_file);
        }

        if let Ok(home) = cfo_home() {
            let user_file = home.join("config.yaml");
            if user_file.is_file() {
                return Self::load(&user_file);
            }
        }

        debug!("no configuration file found, using defaults");
        Ok(Self::default())
    }

    /// Validate field values, returning a description of the first problem.
    pub fn validate(&self) -> std::result::Result<(), String> {
        for (name, script) in [
            ("tools.analyzer", &self.tools.analyzer),
            ("tools.billing_parser", &self.tools.billing_parser),
            ("tools.forecaster", &self.tools.forecaster),
        ] {
            if script.trim().is_empty() {
                return Err(format!("{name} must not be empty"));
            }
        }

        if matches!(self.interpreter.as_deref(), Some(i) if i.trim().is_empty()) {
            return Err("interpreter must not be empty; omit it to run scripts directly".into());
        }

        if !self.alert_threshold.is_finite() || self.alert_threshold < 0.0 {
            return Err(format!(
                "alert_threshold must be a non-negative number, got {}",
                self.alert_threshold
            ));
        }

        if self.timeout_secs == Some(0) {
            return Err("timeout_secs must be greater than zero".into());
        }

        Ok(())
    }

    /// Scripts directory resolved against the project root.
    pub fn resolved_scripts_dir(&self, project_root: &Path) -> PathBuf {
        resolve(project_root, &self.scripts_dir)
    }

    /// Sample billing export resolved against the project root.
    pub fn resolved_sample_bill(&self, project_root: &Path) -> PathBuf {
        resolve(project_root, &self.sample_bill)
    }

    /// Set the scripts directory.
    pub fn with_scripts_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scripts_dir = dir.into();
        self
    }

    /// Set the interpreter (`None` runs scripts directly).
    pub fn with_interpreter(mut self, interpreter: Option<&str>) -> Self {
        self.interpreter = interpreter.map(str::to_string);
        self
    }

    /// Set a per-run timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }
}

fn resolve(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}
