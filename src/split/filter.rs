//! Include/exclude key filter shared by configuration resolution and splitting.

use thiserror::Error;

/// Key filter validation error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    /// Both include and exclude lists are populated
    #[error("Cannot specify both includeKeys and excludeKeys. Choose one approach.")]
    Conflicting,
}

/// Which top-level keys of the token document are processed.
///
/// The two lists are mutually exclusive; leaving both empty selects every
/// non-metadata key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyFilter {
    pub include_keys: Vec<String>,
    pub exclude_keys: Vec<String>,
}

impl KeyFilter {
    /// Filter that processes every key.
    pub fn all() -> Self {
        Self::default()
    }

    /// Filter that processes only the given keys, in the given order.
    pub fn include<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { include_keys: keys.into_iter().map(Into::into).collect(), exclude_keys: vec![] }
    }

    /// Filter that processes every key except the given ones.
    pub fn exclude<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { include_keys: vec![], exclude_keys: keys.into_iter().map(Into::into).collect() }
    }

    /// Check mutual exclusivity.
    pub fn validate(&self) -> Result<(), FilterError> {
        if !self.include_keys.is_empty() && !self.exclude_keys.is_empty() {
            return Err(FilterError::Conflicting);
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.include_keys.is_empty() && self.exclude_keys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_list_is_valid() {
        assert!(KeyFilter::all().validate().is_ok());
        assert!(KeyFilter::include(["Themes/ZRH"]).validate().is_ok());
        assert!(KeyFilter::exclude(["global"]).validate().is_ok());
    }

    #[test]
    fn test_both_lists_conflict() {
        let filter = KeyFilter {
            include_keys: vec!["a".to_string()],
            exclude_keys: vec!["b".to_string()],
        };
        assert_eq!(filter.validate(), Err(FilterError::Conflicting));
        // Same answer every time
        assert_eq!(filter.validate(), Err(FilterError::Conflicting));
    }
}
