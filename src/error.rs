//! Error type of the public API.

use thiserror::Error;

use crate::validation::Violation;

#[derive(Debug, Error)]
pub enum FinancingError {
    #[error("invalid quote: {}", join_violations(.0))]
    Validation(Vec<Violation>),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),
}

impl FinancingError {
    /// Violations carried by a validation failure, empty for any other error.
    pub fn violations(&self) -> &[Violation] {
        match self {
            Self::Validation(violations) => violations,
            _ => &[],
        }
    }
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

pub type Result<T> = std::result::Result<T, FinancingError>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn validation_error_lists_every_violation() {
        let error = FinancingError::Validation(vec![Violation::NonPositiveTotal, Violation::NoPeriods]);

        assert_eq!(
            error.to_string(),
            "invalid quote: Captura un monto total mayor a 0. Captura meses (mayor a 0)."
        );
        assert_eq!(error.violations().len(), 2);
    }
}
