use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

/// 1 GiB; enough for 22 cities
pub const DEFAULT_MAX_TABLE_BYTES: usize = 1 << 30;

/// How the state table is filled
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Top-down recursion that only visits states reachable from the start
    #[default]
    Memoized,
    /// Iterative fill over all visited sets, supersets first
    BottomUp,
}

impl Strategy {
    pub const VARIANTS: [&'static str; 2] = ["memoized", "bottom-up"];
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "memoized" => Ok(Self::Memoized),
            "bottom-up" => Ok(Self::BottomUp),
            _ => Err(format!(
                "unknown strategy {s:?}; expected one of {:?}",
                Self::VARIANTS
            )),
        }
    }
}

impl Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Memoized => write!(f, "memoized"),
            Self::BottomUp => write!(f, "bottom-up"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverConfig {
    pub strategy: Strategy,
    /// Upper bound on the memory of the state table; larger instances are rejected
    /// before anything is allocated.
    pub max_table_bytes: usize,
    /// Verify table and tour invariants after each solve
    pub paranoid: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            max_table_bytes: DEFAULT_MAX_TABLE_BYTES,
            paranoid: true,
        }
    }
}

impl SolverConfig {
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_max_table_bytes(mut self, max_table_bytes: usize) -> Self {
        self.max_table_bytes = max_table_bytes;
        self
    }

    pub fn with_paranoid(mut self, paranoid: bool) -> Self {
        self.paranoid = paranoid;
        self
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_strategy() {
        for name in Strategy::VARIANTS {
            let strategy: Strategy = name.parse().unwrap();
            assert_eq!(strategy.to_string(), name);
        }
        assert!("greedy".parse::<Strategy>().is_err());
    }

    #[test]
    fn serde_names() {
        assert_eq!(
            serde_json::to_string(&Strategy::BottomUp).unwrap(),
            "\"bottom-up\""
        );

        let config: SolverConfig = serde_json::from_str(
            r#"{"strategy": "bottom-up", "max_table_bytes": 1024, "paranoid": false}"#,
        )
        .unwrap();
        assert_eq!(
            config,
            SolverConfig::default()
                .with_strategy(Strategy::BottomUp)
                .with_max_table_bytes(1024)
                .with_paranoid(false)
        );
    }
}
