//! Run-setup record written by the simulator next to its step files
//!
//! The record is a single line of whitespace-separated fields:
//! `total_steps dt [...] integrator`. The integrator tag is the last field.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SetupError;

/// Conventional file name of the run-setup record
pub const SETUP_FILE_NAME: &str = "setup.txt";

/// Global parameters of one simulator run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSetup {
    /// Number of integrator steps the simulator executed
    pub total_steps: u64,
    /// Integrator step size
    pub dt: f64,
    /// Integrator name tag, e.g. `verlet`
    pub integrator: String,
}

impl RunSetup {
    /// Parses the first line of a run-setup record
    ///
    /// # Errors
    ///
    /// `MissingField` naming the first absent field, or `InvalidField` when
    /// `total_steps` is not an unsigned integer or `dt` is not a positive
    /// finite number.
    ///
    /// # Examples
    ///
    /// ```
    /// use snapshots::setup::RunSetup;
    ///
    /// let setup = RunSetup::parse("1000 0.01 verlet").unwrap();
    /// assert_eq!(setup.total_steps, 1000);
    /// assert_eq!(setup.dt, 0.01);
    /// assert_eq!(setup.integrator, "verlet");
    /// ```
    pub fn parse(text: &str) -> Result<Self, SetupError> {
        let line = text.lines().next().unwrap_or_default();
        let fields: Vec<&str> = line.split_whitespace().collect();

        let steps_token = fields
            .first()
            .ok_or(SetupError::MissingField { field: "total_steps" })?;
        let total_steps = steps_token
            .parse::<u64>()
            .map_err(|_| invalid("total_steps", steps_token))?;

        let dt_token = fields.get(1).ok_or(SetupError::MissingField { field: "dt" })?;
        let dt = dt_token
            .parse::<f64>()
            .ok()
            .filter(|dt| dt.is_finite() && *dt > 0.0)
            .ok_or_else(|| invalid("dt", dt_token))?;

        let integrator = fields[2..]
            .last()
            .ok_or(SetupError::MissingField { field: "integrator" })?
            .to_string();

        Ok(Self {
            total_steps,
            dt,
            integrator,
        })
    }

    /// Reads and parses a run-setup file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SetupError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| SetupError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Simulated duration of the whole run, `total_steps · dt`
    pub fn duration(&self) -> f64 {
        self.total_steps as f64 * self.dt
    }
}

fn invalid(field: &'static str, value: &str) -> SetupError {
    SetupError::InvalidField {
        field,
        value: value.to_string(),
    }
}
