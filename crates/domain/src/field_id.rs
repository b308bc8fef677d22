use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};

use formcraft_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque field identifier, unique within one form document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FieldId(String);

impl FieldId {
    /// Creates a field identifier from an existing value.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        if value.is_empty() {
            return Err(AppError::Validation(
                "field id must not be empty".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for FieldId {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<FieldId> for String {
    fn from(value: FieldId) -> Self {
        value.0
    }
}

impl Display for FieldId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

/// Source of fresh field identifiers.
///
/// Injected wherever fields are created so that several fields created in the
/// same instant still receive distinct identifiers.
pub trait FieldIdGenerator: Send + Sync {
    /// Returns an identifier that this generator has not returned before.
    fn next_id(&self) -> FieldId;
}

/// Generates random UUID-based field identifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomFieldIdGenerator;

impl FieldIdGenerator for RandomFieldIdGenerator {
    fn next_id(&self) -> FieldId {
        FieldId(Uuid::new_v4().simple().to_string())
    }
}

/// Generates `<prefix><n>` identifiers from a monotonic counter.
#[derive(Debug)]
pub struct SequentialFieldIdGenerator {
    prefix: String,
    next: AtomicU64,
}

impl SequentialFieldIdGenerator {
    /// Creates a generator starting at `1` with the given prefix.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(1),
        }
    }
}

impl Default for SequentialFieldIdGenerator {
    fn default() -> Self {
        Self::new("field-")
    }
}

impl FieldIdGenerator for SequentialFieldIdGenerator {
    fn next_id(&self) -> FieldId {
        let value = self.next.fetch_add(1, Ordering::Relaxed);
        FieldId(format!("{}{value}", self.prefix))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::{FieldId, FieldIdGenerator, RandomFieldIdGenerator, SequentialFieldIdGenerator};

    #[test]
    fn field_id_rejects_empty_value() {
        assert!(FieldId::new("").is_err());
    }

    #[test]
    fn sequential_generator_counts_up() {
        let generator = SequentialFieldIdGenerator::new("f");
        assert_eq!(generator.next_id().as_str(), "f1");
        assert_eq!(generator.next_id().as_str(), "f2");
    }

    #[test]
    fn random_generator_does_not_repeat_within_a_burst() {
        let generator = RandomFieldIdGenerator;
        let ids: HashSet<FieldId> = (0..256).map(|_| generator.next_id()).collect();
        assert_eq!(ids.len(), 256);
    }

    #[test]
    fn field_id_deserialization_rejects_empty_string() {
        let decoded = serde_json::from_str::<FieldId>("\"\"");
        assert!(decoded.is_err());
    }
}
