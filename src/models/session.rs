// src/models/session.rs

//! Chambers and legislative sessions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// First regular session the site publishes bill histories for.
const BASELINE_ORDINAL: u32 = 71;
/// Calendar year of the baseline session.
const BASELINE_YEAR: u32 = 2001;

/// A legislative chamber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chamber {
    /// Senate
    Upper,
    /// Assembly
    Lower,
}

impl Chamber {
    pub fn as_str(&self) -> &'static str {
        match self {
            Chamber::Upper => "upper",
            Chamber::Lower => "lower",
        }
    }
}

impl fmt::Display for Chamber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Chamber {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "upper" | "senate" => Ok(Chamber::Upper),
            "lower" | "assembly" => Ok(Chamber::Lower),
            other => Err(AppError::validation(format!("unknown chamber '{other}'"))),
        }
    }
}

/// Who performed an action. Bills move between chambers and to the governor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Actor {
    Upper,
    Lower,
    Executive,
}

impl From<Chamber> for Actor {
    fn from(chamber: Chamber) -> Self {
        match chamber {
            Chamber::Upper => Actor::Upper,
            Chamber::Lower => Actor::Lower,
        }
    }
}

/// A configured session: the human identifier and the site's URL slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    /// Human identifier, e.g. `80`
    pub identifier: String,

    /// URL path token, e.g. `80th2019` or `31st2020Special`
    pub slug: String,
}

impl SessionInfo {
    pub fn new(identifier: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            slug: slug.into(),
        }
    }

    /// Resolve the calendar year for this session.
    ///
    /// Special sessions carry their year in the slug. Regular sessions derive
    /// it from the ordinal, two years apart starting from the 71st session in
    /// 2001. Earlier sessions yield [`AppError::UnsupportedSession`].
    pub fn resolve(&self) -> Result<Session> {
        let unsupported = || AppError::UnsupportedSession(self.identifier.clone());

        if self.slug.contains("Special") {
            let year = self
                .slug
                .get(4..8)
                .and_then(|y| y.parse::<u32>().ok())
                .ok_or_else(unsupported)?;
            return Ok(Session {
                identifier: self.identifier.clone(),
                slug: self.slug.clone(),
                year,
                special: true,
            });
        }

        let ordinal = self
            .slug
            .get(..2)
            .and_then(|o| o.parse::<u32>().ok())
            .ok_or_else(unsupported)?;
        if ordinal < BASELINE_ORDINAL {
            return Err(unsupported());
        }

        Ok(Session {
            identifier: self.identifier.clone(),
            slug: self.slug.clone(),
            year: (ordinal - BASELINE_ORDINAL) * 2 + BASELINE_YEAR,
            special: false,
        })
    }
}

/// A resolved session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub identifier: String,
    pub slug: String,
    pub year: u32,
    pub special: bool,
}
