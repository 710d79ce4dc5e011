use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Invalid value for '{parameter}': {reason}")]
    InvalidValue {
        parameter: &'static str,
        reason: String,
    },

    #[error("Unknown {kind} '{value}'. Expected one of: {expected}")]
    UnknownVariant {
        kind: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Which factorization solves each pathway's linear system.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SolverBackend {
    /// Column-pivoting Householder QR.
    #[default]
    ColPivQr,
    /// LU with partial pivoting.
    Lu,
}

impl SolverBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            SolverBackend::ColPivQr => "col-piv-qr",
            SolverBackend::Lu => "lu",
        }
    }
}

impl fmt::Display for SolverBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SolverBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "col-piv-qr" | "qr" => Ok(SolverBackend::ColPivQr),
            "lu" => Ok(SolverBackend::Lu),
            _ => Err(ConfigError::UnknownVariant {
                kind: "solver backend",
                value: s.to_string(),
                expected: "col-piv-qr, lu",
            }),
        }
    }
}

/// What to do when a pathway's linear system cannot be solved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SingularPolicy {
    /// Fill the affected cells with `NaN`, record the failure and keep scoring.
    #[default]
    Flag,
    /// Fail the whole invocation with the first failure in pathway order.
    Abort,
}

impl FromStr for SingularPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "flag" => Ok(SingularPolicy::Flag),
            "abort" => Ok(SingularPolicy::Abort),
            _ => Err(ConfigError::UnknownVariant {
                kind: "singular-system policy",
                value: s.to_string(),
                expected: "flag, abort",
            }),
        }
    }
}

/// How a permuted fold-change matrix is drawn from the observed one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PermutationScheme {
    /// Shuffle each sample's values across genes independently.
    #[default]
    WithinSample,
    /// Apply one shuffle of the gene rows to every sample.
    GeneLabels,
}

impl fmt::Display for PermutationScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PermutationScheme::WithinSample => f.write_str("within-sample"),
            PermutationScheme::GeneLabels => f.write_str("gene-labels"),
        }
    }
}

impl FromStr for PermutationScheme {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "within-sample" => Ok(PermutationScheme::WithinSample),
            "gene-labels" => Ok(PermutationScheme::GeneLabels),
            _ => Err(ConfigError::UnknownVariant {
                kind: "permutation scheme",
                value: s.to_string(),
                expected: "within-sample, gene-labels",
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SolverConfig {
    pub backend: SolverBackend,
    /// Relative pivot tolerance; `None` uses `order * f64::EPSILON`.
    pub tolerance: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScoringConfig {
    pub solver: SolverConfig,
    pub on_singular: SingularPolicy,
}

impl ScoringConfig {
    /// Checks values that the builder would have rejected.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(tolerance) = self.solver.tolerance {
            if !tolerance.is_finite() || tolerance <= 0.0 || tolerance >= 1.0 {
                return Err(ConfigError::InvalidValue {
                    parameter: "tolerance",
                    reason: format!("must lie strictly between 0 and 1, got {tolerance}"),
                });
            }
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct ScoringConfigBuilder {
    backend: Option<SolverBackend>,
    tolerance: Option<f64>,
    on_singular: Option<SingularPolicy>,
}

impl ScoringConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn backend(mut self, backend: SolverBackend) -> Self {
        self.backend = Some(backend);
        self
    }
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = Some(tolerance);
        self
    }
    pub fn on_singular(mut self, policy: SingularPolicy) -> Self {
        self.on_singular = Some(policy);
        self
    }

    pub fn build(self) -> Result<ScoringConfig, ConfigError> {
        let config = ScoringConfig {
            solver: SolverConfig {
                backend: self.backend.unwrap_or_default(),
                tolerance: self.tolerance,
            },
            on_singular: self.on_singular.unwrap_or_default(),
        };
        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PermuteConfig {
    pub scheme: PermutationScheme,
    /// Seed for a reproducible permutation; `None` draws from system entropy.
    pub seed: Option<u64>,
}
