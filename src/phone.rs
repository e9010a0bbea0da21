//! Phone number canonicalization.
//!
//! A [`PhoneKey`] is the sole join key between the carrier side and
//! platform-side user records: two raw strings that parse to the same
//! number must produce the same key. Normalization is a pure function —
//! no network, no process state.

use std::fmt;

use phonenumber::{Mode, country};

use crate::error::RelayError;

/// A canonicalized phone number in the home region's national display
/// format, e.g. `(555) 123-4567`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhoneKey(String);

impl PhoneKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Canonicalize a raw phone string.
///
/// Absent or empty input yields `Ok(None)` — not an error. A non-empty
/// string that cannot be parsed as a phone number fails with
/// [`RelayError::Parse`], which callers treat as terminal for the event,
/// not for the process.
pub fn normalize(raw: Option<&str>, region: country::Id) -> Result<Option<PhoneKey>, RelayError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    let parsed = phonenumber::parse(Some(region), raw).map_err(|e| RelayError::Parse {
        raw: raw.to_string(),
        reason: e.to_string(),
    })?;

    Ok(Some(PhoneKey(
        parsed.format().mode(Mode::National).to_string(),
    )))
}

// ── Tests ───────────────────────────────────────────────────────────
