use crate::category::CharClass;
use anyhow::{Result, bail};

/// A complexity requirement: at least `min_count` characters of the
/// given class must appear in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Constraint {
    class: CharClass,
    min_count: u32,
}

impl Constraint {
    pub fn new(class: CharClass, min_count: u32) -> Result<Self> {
        if min_count < 1 {
            bail!("Invalid character count: {}; must be >= 1", min_count);
        }
        Ok(Self { class, min_count })
    }

    /// `min_count` of 1.
    pub fn at_least_one(class: CharClass) -> Self {
        Self {
            class,
            min_count: 1,
        }
    }

    pub fn class(&self) -> CharClass {
        self.class
    }

    pub fn min_count(&self) -> u32 {
        self.min_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_count_rejected() {
        let result = Constraint::new(CharClass::Lu, 0);
        assert!(result.is_err());
        assert!(
            result.unwrap_err().to_string().contains("must be >= 1"),
            "Error should state the lower bound"
        );
    }

    #[test]
    fn test_valid_constraint() {
        let c = Constraint::new(CharClass::No, 2).unwrap();
        assert_eq!(c.class(), CharClass::No);
        assert_eq!(c.min_count(), 2);
        assert_eq!(Constraint::at_least_one(CharClass::So).min_count(), 1);
    }
}
