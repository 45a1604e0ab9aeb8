//! Domain types for sextant-io.

use crate::IoError;

/// A validated experiment name used to prefix output artifacts.
///
/// Must match `[a-zA-Z0-9_-]+`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperimentName(String);

impl ExperimentName {
    /// Parse and validate an experiment name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::InvalidExperimentName`] if the name is empty or
    /// contains characters outside `[a-zA-Z0-9_-]`.
    pub fn new(name: impl Into<String>) -> Result<Self, IoError> {
        let name = name.into();
        if name.is_empty()
            || !name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(IoError::InvalidExperimentName { name });
        }
        Ok(Self(name))
    }

    /// Return the experiment name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Return the artifact file name `{experiment}_{kind}.json`.
    pub(crate) fn artifact(&self, kind: &str) -> String {
        format!("{}_{kind}.json", self.0)
    }
}

impl std::fmt::Display for ExperimentName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&str> for ExperimentName {
    type Error = IoError;

    fn try_from(name: &str) -> Result<Self, Self::Error> {
        Self::new(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_word_characters_and_dashes() {
        let name = ExperimentName::new("q3-sales_2024").unwrap();
        assert_eq!(name.as_str(), "q3-sales_2024");
        assert_eq!(name.artifact("metrics"), "q3-sales_2024_metrics.json");
    }

    #[test]
    fn rejects_empty() {
        assert!(matches!(
            ExperimentName::new(""),
            Err(IoError::InvalidExperimentName { .. })
        ));
    }

    #[test]
    fn rejects_path_separators() {
        for bad in ["../escape", "a/b", "with space", "dot.name"] {
            assert!(
                ExperimentName::try_from(bad).is_err(),
                "{bad:?} should be rejected"
            );
        }
    }
}
