use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A vote as submitted by a client.
///
/// The option index is deliberately signed so that a negative submission
/// reaches the bounds check and gets the proper error instead of dying in
/// deserialization.
#[derive(Debug, Serialize, Deserialize)]
pub struct VoteSpec {
    /// Zero-based index into the poll's options.
    pub option: i64,
    /// Double-submit copy of the `csrfToken` cookie.
    #[serde(rename = "csrfToken")]
    pub csrf_token: Option<String>,
}

impl VoteSpec {
    /// Bounds-check the option index against the poll's option count.
    pub fn checked_option(&self, num_options: usize) -> Result<u32> {
        if self.option >= 0 && (self.option as u64) < num_options as u64 {
            Ok(self.option as u32)
        } else {
            Err(Error::InvalidOption)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(option: i64) -> VoteSpec {
        VoteSpec {
            option,
            csrf_token: None,
        }
    }

    #[test]
    fn in_range_indices_pass() {
        assert_eq!(0, spec(0).checked_option(2).unwrap());
        assert_eq!(1, spec(1).checked_option(2).unwrap());
    }

    #[test]
    fn out_of_range_indices_fail() {
        // One past the end.
        assert!(matches!(spec(2).checked_option(2), Err(Error::InvalidOption)));
        // Negative.
        assert!(matches!(spec(-1).checked_option(2), Err(Error::InvalidOption)));
        // No options at all (cannot happen for a stored poll, but the check
        // must not panic).
        assert!(spec(0).checked_option(0).is_err());
    }
}
