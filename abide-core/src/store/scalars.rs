//! Scalar values: the grace counter and the dark-mode flag.

use serde_json::Value;

use super::{KeyValueStore, StoreError, StoreKey};

/// Reads the grace counter. A missing or non-integer value reads as zero.
pub fn grace_points<S: KeyValueStore + ?Sized>(store: &S) -> Result<u64, StoreError> {
    let value = match store.get_json(StoreKey::GracePoints) {
        Ok(value) => value,
        Err(StoreError::Corrupt(key, e)) => {
            tracing::warn!("Ignoring unreadable {}: {}", key, e);
            None
        }
        Err(e) => return Err(e),
    };

    Ok(value.as_ref().and_then(counter_value).unwrap_or(0))
}

/// Stores the grace counter.
pub fn set_grace_points<S: KeyValueStore + ?Sized>(
    store: &mut S,
    points: u64,
) -> Result<(), StoreError> {
    store.set(StoreKey::GracePoints, &points.to_string())
}

/// Reads the dark-mode flag. Anything other than `true` reads as off.
pub fn dark_mode<S: KeyValueStore + ?Sized>(store: &S) -> Result<bool, StoreError> {
    Ok(matches!(
        store.get(StoreKey::DarkMode)?.as_deref().map(str::trim),
        Some("true")
    ))
}

/// Stores the dark-mode flag.
pub fn set_dark_mode<S: KeyValueStore + ?Sized>(
    store: &mut S,
    enabled: bool,
) -> Result<(), StoreError> {
    store.set(StoreKey::DarkMode, if enabled { "true" } else { "false" })
}

/// Interprets a JSON value as a counter: a non-negative integer, also
/// accepting floats with no fractional part.
pub(crate) fn counter_value(value: &Value) -> Option<u64> {
    if let Some(n) = value.as_u64() {
        return Some(n);
    }
    let f = value.as_f64()?;
    if f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 {
        Some(f as u64)
    } else {
        None
    }
}
