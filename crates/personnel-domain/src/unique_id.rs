//! Public employee identifier (`NNNN-NNNN`).

use std::fmt;
use std::str::FromStr;

use rand::RngExt;
use serde::{Deserialize, Serialize};

/// Total length of a unique id including the hyphen.
pub const UNIQUE_ID_LEN: usize = 9;

const HYPHEN_AT: usize = 4;

/// Human-readable employee identifier, distinct from the numeric primary key.
///
/// Eight decimal digits split by a hyphen, e.g. `0427-9135`. Assigned once at
/// registration and never changed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UniqueId(String);

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("malformed unique id: {0}")]
pub struct MalformedUniqueId(pub String);

impl UniqueId {
    /// Draw a fresh id from the thread-local CSPRNG; every digit is uniform in 0–9.
    pub fn generate() -> Self {
        let mut rng = rand::rng();
        let mut id = String::with_capacity(UNIQUE_ID_LEN);
        for pos in 0..UNIQUE_ID_LEN {
            if pos == HYPHEN_AT {
                id.push('-');
            } else {
                id.push(char::from(b'0' + rng.random_range(0..10u8)));
            }
        }
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn is_well_formed(s: &str) -> bool {
        s.len() == UNIQUE_ID_LEN
            && s.bytes().enumerate().all(|(pos, b)| {
                if pos == HYPHEN_AT {
                    b == b'-'
                } else {
                    b.is_ascii_digit()
                }
            })
    }
}

impl FromStr for UniqueId {
    type Err = MalformedUniqueId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if Self::is_well_formed(s) {
            Ok(Self(s.to_owned()))
        } else {
            Err(MalformedUniqueId(s.to_owned()))
        }
    }
}

impl TryFrom<String> for UniqueId {
    type Error = MalformedUniqueId;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        if Self::is_well_formed(&s) {
            Ok(Self(s))
        } else {
            Err(MalformedUniqueId(s))
        }
    }
}

impl From<UniqueId> for String {
    fn from(id: UniqueId) -> Self {
        id.0
    }
}

impl fmt::Display for UniqueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
