//! ID validation and cleaning utilities for PubMed and PMC identifiers

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PubMedError, Result};

/// A validated PubMed ID (PMID)
///
/// # Examples
///
/// ```
/// use pubmed_gateway::common::PubMedId;
///
/// let pmid = PubMedId::parse("  31978945  ").unwrap();
/// assert_eq!(pmid.as_u32(), 31978945);
/// assert_eq!(pmid.to_string(), "31978945");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PubMedId {
    value: u32,
}

impl PubMedId {
    /// Parse a PMID from a string, trimming surrounding whitespace
    ///
    /// # Errors
    ///
    /// Returns `PubMedError::InvalidPmid` for empty, non-numeric, zero or
    /// out-of-range input.
    ///
    /// ```
    /// use pubmed_gateway::common::PubMedId;
    ///
    /// assert!(PubMedId::parse("").is_err());
    /// assert!(PubMedId::parse("abc").is_err());
    /// assert!(PubMedId::parse("0").is_err());
    /// assert!(PubMedId::parse("-123").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let invalid = || PubMedError::InvalidPmid {
            pmid: s.to_string(),
        };

        let trimmed = s.trim();
        if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let value = trimmed.parse::<u32>().map_err(|_| invalid())?;
        if value == 0 {
            return Err(invalid());
        }

        Ok(Self { value })
    }

    pub fn as_u32(&self) -> u32 {
        self.value
    }
}

impl fmt::Display for PubMedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl FromStr for PubMedId {
    type Err = PubMedError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// A validated PubMed Central ID (PMC ID)
///
/// Always rendered in the canonical `PMC<digits>` form, whatever form it was
/// parsed from.
///
/// ```
/// use pubmed_gateway::common::PmcId;
///
/// assert_eq!(PmcId::parse("PMC7906746").unwrap().to_string(), "PMC7906746");
/// assert_eq!(PmcId::parse("7906746").unwrap().to_string(), "PMC7906746");
/// assert_eq!(PmcId::parse(" pmc7906746 ").unwrap().to_string(), "PMC7906746");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PmcId {
    value: u32,
}

impl PmcId {
    /// Parse a PMC ID, accepting an optional case-insensitive `PMC` prefix
    ///
    /// # Errors
    ///
    /// Returns `PubMedError::InvalidPmcid` when nothing numeric remains after the
    /// prefix, or the number is zero or out of range.
    pub fn parse(s: &str) -> Result<Self> {
        let invalid = || PubMedError::InvalidPmcid {
            pmcid: s.to_string(),
        };

        let trimmed = s.trim();
        let numeric_part = match trimmed.get(..3) {
            Some(prefix) if prefix.eq_ignore_ascii_case("PMC") => &trimmed[3..],
            _ => trimmed,
        };

        if numeric_part.is_empty() || !numeric_part.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let value = numeric_part.parse::<u32>().map_err(|_| invalid())?;
        if value == 0 {
            return Err(invalid());
        }

        Ok(Self { value })
    }

    /// Numeric part without the `PMC` prefix
    pub fn numeric_part(&self) -> u32 {
        self.value
    }
}

impl fmt::Display for PmcId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PMC{}", self.value)
    }
}

impl FromStr for PmcId {
    type Err = PubMedError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
