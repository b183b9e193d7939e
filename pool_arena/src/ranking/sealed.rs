//! Opaque sealed values.

use serde::{Serialize, Serializer};
use std::fmt;

/// Placeholder emitted wherever a sealed value would be displayed
pub const SEALED_PLACEHOLDER: &str = "***";

/// A value the public API cannot read.
///
/// Only this crate can unseal it, to derive bucket summaries. Formatting and
/// serialization print a placeholder instead of the contents. A concrete
/// encryption scheme can replace the plain wrapper without touching callers.
#[derive(Clone, PartialEq)]
pub struct SealedValue<T>(T);

impl<T> SealedValue<T> {
    pub(crate) fn seal(value: T) -> Self {
        Self(value)
    }

    pub(crate) fn unseal(&self) -> &T {
        &self.0
    }
}

impl<T> fmt::Debug for SealedValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SealedValue({})", SEALED_PLACEHOLDER)
    }
}

impl<T> Serialize for SealedValue<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(SEALED_PLACEHOLDER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_hides_contents() {
        let sealed = SealedValue::seal(2847.5_f64);
        let printed = format!("{:?}", sealed);
        assert_eq!(printed, "SealedValue(***)");
        assert!(!printed.contains("2847"));
    }

    #[test]
    fn test_serialize_hides_contents() {
        let sealed = SealedValue::seal(1_456_i64);
        assert_eq!(serde_json::to_string(&sealed).unwrap(), "\"***\"");
    }

    #[test]
    fn test_crate_can_unseal() {
        let sealed = SealedValue::seal(42_u32);
        assert_eq!(*sealed.unseal(), 42);
    }
}
