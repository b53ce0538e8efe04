use std::path::PathBuf;

use anyhow::Context;

use crate::registry::GuardPolicy;

pub const STATE_ENV: &str = "GRADEBOOK_STATE";
pub const GUARD_POLICY_ENV: &str = "GRADEBOOK_GUARD_POLICY";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Snapshot used when `--state` is not given.
    pub state_path: Option<PathBuf>,
    pub guard_policy: GuardPolicy,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let state_path = lookup(STATE_ENV)
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        let guard_policy = match lookup(GUARD_POLICY_ENV) {
            Some(value) if !value.trim().is_empty() => value
                .parse()
                .with_context(|| format!("{GUARD_POLICY_ENV} is invalid"))?,
            _ => GuardPolicy::default(),
        };

        Ok(Self {
            state_path,
            guard_policy,
        })
    }

    /// Command line wins over the environment.
    pub fn resolve_state_path(&self, cli_state: Option<PathBuf>) -> anyhow::Result<PathBuf> {
        cli_state
            .or_else(|| self.state_path.clone())
            .with_context(|| format!("no snapshot given: pass --state or set {STATE_ENV}"))
    }
}
