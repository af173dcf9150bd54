use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A bot deployment whose scenario data is fetched independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Dev,
    Prod,
    Stg,
}

#[derive(Debug, Error)]
#[error("Unknown environment '{0}' (expected one of: dev, prod, stg)")]
pub struct UnknownEnvironment(pub String);

impl Environment {
    /// Declared order. Every multi-environment operation iterates in this order.
    pub const ALL: [Environment; 3] = [Environment::Dev, Environment::Prod, Environment::Stg];

    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Dev => "dev",
            Environment::Prod => "prod",
            Environment::Stg => "stg",
        }
    }

    /// Upper-case tag used in text reports, e.g. `DEV`.
    pub fn label(self) -> &'static str {
        match self {
            Environment::Dev => "DEV",
            Environment::Prod => "PROD",
            Environment::Stg => "STG",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = UnknownEnvironment;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dev" => Ok(Environment::Dev),
            "prod" => Ok(Environment::Prod),
            "stg" => Ok(Environment::Stg),
            _ => Err(UnknownEnvironment(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("PROD".parse::<Environment>().unwrap(), Environment::Prod);
        assert_eq!(" stg ".parse::<Environment>().unwrap(), Environment::Stg);
        assert!("qa".parse::<Environment>().is_err());
    }

    #[test]
    fn test_declared_order_matches_ord() {
        let mut sorted = Environment::ALL.to_vec();
        sorted.sort();
        assert_eq!(sorted, Environment::ALL.to_vec());
    }

    #[test]
    fn test_serializes_lowercase() {
        let json = serde_json::to_string(&Environment::Dev).unwrap();
        assert_eq!(json, "\"dev\"");
    }
}
