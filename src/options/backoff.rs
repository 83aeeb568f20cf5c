use crate::error::{Error, Result};

/// Reconnect backoff curve: wait time grows as `factor * exponent_base^attempt`,
/// capped at `num_retries` attempts before giving up.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BackoffStrategy {
    pub num_retries: u32,
    pub factor: u32,
    pub exponent_base: u32,
}

impl Default for BackoffStrategy {
    fn default() -> Self {
        BackoffStrategy {
            num_retries: 5,
            factor: 100,
            exponent_base: 2,
        }
    }
}

impl BackoffStrategy {
    /// All three fields are already non-negative by virtue of being unsigned;
    /// the one remaining rule from §4.4 is that a retry curve with zero
    /// retries and a nonzero factor is nonsensical configuration noise, not a
    /// hard error — this crate leaves that alone and only rejects a zero
    /// `exponent_base`, which would make every backoff interval after the
    /// first collapse to zero.
    pub fn validate(&self) -> Result<()> {
        if self.exponent_base == 0 {
            return Err(Error::validation("backoff exponent_base must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn zero_exponent_base_is_rejected() {
        let backoff = BackoffStrategy {
            exponent_base: 0,
            ..BackoffStrategy::default()
        };
        assert!(backoff.validate().is_err());
    }

    #[test]
    fn default_backoff_validates() {
        assert!(BackoffStrategy::default().validate().is_ok());
    }
}
