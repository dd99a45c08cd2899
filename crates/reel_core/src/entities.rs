//! Candidate identity and display payload.
//!
//! The engine treats candidates as opaque beyond identity and count; the
//! payload fields exist only so collaborators (loader, CLI, records) can
//! show something meaningful for a pick.

use alloc::string::{String, ToString};
use core::fmt;
use core::str::FromStr;

use crate::errors::CoreError;

#[cfg(feature = "serde")]
use serde::{
    de::{Error as DeError, Unexpected},
    Deserialize, Deserializer, Serialize,
};

fn is_token(s: &str) -> bool {
    if !(1..=64).contains(&s.len()) {
        return false;
    }
    s.bytes().all(|b| {
        matches!(b,
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' |
            b'_' | b'-' | b':' | b'.'
        )
    })
}

/// Candidate token with strict charset (1..=64 of `[A-Za-z0-9_.:-]`).
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct CandidateId(String);

impl CandidateId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CandidateId {
    type Err = CoreError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if is_token(s) {
            Ok(Self(s.to_string()))
        } else {
            Err(CoreError::InvalidToken)
        }
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for CandidateId {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        if is_token(&s) {
            Ok(CandidateId(s))
        } else {
            Err(D::Error::invalid_value(
                Unexpected::Str(&s),
                &"token [A-Za-z0-9_.:-], len 1..=64",
            ))
        }
    }
}

/// Maximum star rating in tenths (5.0 stars).
pub const RATING_TENTHS_MAX: u16 = 50;

/// One entry of the candidate list. Immutable for the duration of a spin.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Candidate {
    pub candidate_id: CandidateId,
    pub title: String,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub year: Option<u16>,
    /// Star rating in tenths (0..=50); integer-only, no floats on the wire.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub rating_tenths: Option<u16>,
}

/// Domain checks beyond what parsing enforces.
pub fn validate_candidate(c: &Candidate) -> Result<(), CoreError> {
    if c.title.is_empty() {
        return Err(CoreError::DomainOutOfRange("title"));
    }
    if let Some(r) = c.rating_tenths {
        if r > RATING_TENTHS_MAX {
            return Err(CoreError::DomainOutOfRange("rating_tenths"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    fn cand(id: &str, title: &str) -> Candidate {
        Candidate {
            candidate_id: id.parse().unwrap(),
            title: title.to_string(),
            year: None,
            rating_tenths: None,
        }
    }

    #[test]
    fn token_charset_enforced() {
        assert!("film:2917".parse::<CandidateId>().is_ok());
        assert!("a.b-c_d".parse::<CandidateId>().is_ok());
        assert!("".parse::<CandidateId>().is_err());
        assert!("has space".parse::<CandidateId>().is_err());
        assert!("über".parse::<CandidateId>().is_err());
        let long = "x".repeat(65);
        assert!(long.parse::<CandidateId>().is_err());
    }

    #[test]
    fn candidate_domains() {
        assert!(validate_candidate(&cand("f:1", "Stalker")).is_ok());

        let mut c = cand("f:2", "");
        assert_eq!(
            validate_candidate(&c),
            Err(CoreError::DomainOutOfRange("title"))
        );

        c.title = "Ran".to_string();
        c.rating_tenths = Some(51);
        assert_eq!(
            validate_candidate(&c),
            Err(CoreError::DomainOutOfRange("rating_tenths"))
        );
        c.rating_tenths = Some(50);
        assert!(validate_candidate(&c).is_ok());
    }
}
