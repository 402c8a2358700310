use crate::error::{GenerateError, Result};

pub const DEFAULT_PREFIX: &str = "H";
pub const DEFAULT_WIDTH: usize = 3;

/// `"H"` followed by the number zero-padded to at least three digits.
///
/// `format_identifier(7) == "H007"`, `format_identifier(1234) == "H1234"`.
pub fn format_identifier(sequence_number: u64) -> String {
    format!(
        "{}{:0width$}",
        DEFAULT_PREFIX,
        sequence_number,
        width = DEFAULT_WIDTH
    )
}

/// Prefix and minimum counter width used to build identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdScheme {
    prefix: String,
    width: usize,
}

impl IdScheme {
    pub fn new(prefix: impl Into<String>, width: usize) -> Result<Self> {
        let prefix = prefix.into();
        if !is_path_safe(&prefix) {
            return Err(GenerateError::InvalidPrefix(prefix));
        }
        Ok(Self { prefix, width })
    }

    pub fn format(&self, sequence_number: u64) -> String {
        format!("{}{:0width$}", self.prefix, sequence_number, width = self.width)
    }

    /// Identifiers for `first..=last`, in order, formatted as they are pulled.
    pub fn range(&self, first: u64, last: u64) -> Result<impl Iterator<Item = String> + '_> {
        if first > last {
            return Err(GenerateError::InvalidRange { first, last });
        }
        Ok((first..=last).map(move |n| self.format(n)))
    }
}

impl Default for IdScheme {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            width: DEFAULT_WIDTH,
        }
    }
}

// Empty is allowed: identifiers are then plain numbers.
fn is_path_safe(prefix: &str) -> bool {
    prefix
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
