//! Small helpers shared by the domain modules.

use serde::{Deserialize, Deserializer};

/// Deserialize a field that distinguishes "absent" from explicit `null`.
///
/// Pair with `#[serde(default)]`: a missing key stays `None`, `null` becomes
/// `Some(None)` and a value becomes `Some(Some(value))`.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Apply a three-state update to an optional field.
pub fn merge_nullable<T>(field: &mut Option<T>, update: Option<Option<T>>) {
    if let Some(value) = update {
        *field = value;
    }
}
