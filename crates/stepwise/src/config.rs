//! Runtime configuration.
//!
//! Only one knob exists today: the [`MatchPolicy`] deciding what happens when
//! several step definitions match the same step line. It is read from
//! `STEPWISE_MATCH_POLICY` unless a process-wide override is set.

use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};

/// Environment variable consulted by [`match_policy`].
pub const MATCH_POLICY_ENV: &str = "STEPWISE_MATCH_POLICY";

const OVERRIDE_UNSET: u8 = 0;
const OVERRIDE_ALL: u8 = 1;
const OVERRIDE_MOST_SPECIFIC: u8 = 2;

static MATCH_POLICY_OVERRIDE: AtomicU8 = AtomicU8::new(OVERRIDE_UNSET);

/// What to run when more than one definition matches a step line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchPolicy {
    /// Run every matching definition in registration order.
    #[default]
    All,
    /// Run only the definition with the highest specificity score. Ties go to
    /// the earliest registration.
    MostSpecific,
}

impl MatchPolicy {
    /// Spelling accepted by the environment variable.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::MostSpecific => "most-specific",
        }
    }

    const fn to_override(self) -> u8 {
        match self {
            Self::All => OVERRIDE_ALL,
            Self::MostSpecific => OVERRIDE_MOST_SPECIFIC,
        }
    }
}

/// Unrecognised match policy text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown match policy '{0}' (expected 'all' or 'most-specific')")]
pub struct MatchPolicyParseError(pub String);

impl FromStr for MatchPolicy {
    type Err = MatchPolicyParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else if trimmed.eq_ignore_ascii_case("most-specific")
            || trimmed.eq_ignore_ascii_case("most_specific")
        {
            Ok(Self::MostSpecific)
        } else {
            Err(MatchPolicyParseError(trimmed.to_owned()))
        }
    }
}

fn env_match_policy() -> Option<MatchPolicy> {
    let raw = std::env::var(MATCH_POLICY_ENV).ok()?;
    raw.parse()
        .map_err(|err| log::warn!("ignoring {MATCH_POLICY_ENV}: {err}"))
        .ok()
}

fn override_state() -> Option<MatchPolicy> {
    match MATCH_POLICY_OVERRIDE.load(Ordering::Relaxed) {
        OVERRIDE_ALL => Some(MatchPolicy::All),
        OVERRIDE_MOST_SPECIFIC => Some(MatchPolicy::MostSpecific),
        _ => None,
    }
}

/// The match policy in effect for runners that do not set their own.
#[must_use]
pub fn match_policy() -> MatchPolicy {
    override_state()
        .or_else(env_match_policy)
        .unwrap_or_default()
}

/// Override the match policy for the whole process.
pub fn set_match_policy(policy: MatchPolicy) {
    MATCH_POLICY_OVERRIDE.store(policy.to_override(), Ordering::Relaxed);
}

/// Drop the process-wide override and fall back to the environment.
pub fn clear_match_policy_override() {
    MATCH_POLICY_OVERRIDE.store(OVERRIDE_UNSET, Ordering::Relaxed);
}
