// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Run configuration from flags and environment.
//!
//! Flags win over the environment. `PLEDGE_TASK_BUDGET` caps how many
//! tasks a single queue drain may run.

use pledge_rt::QueueConfig;
use thiserror::Error;

pub const BUDGET_ENV: &str = "PLEDGE_TASK_BUDGET";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CliError {
    #[error("unknown option: {0}")]
    UnknownOption(String),
    #[error("{0} needs a value")]
    MissingValue(&'static str),
    #[error("invalid task budget '{value}' from {source_name}: expected a positive integer")]
    InvalidBudget {
        value: String,
        source_name: &'static str,
    },
}

/// Options for `pledge conformance`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunConfig {
    /// Case id or section prefix, e.g. `2.3` or `2.2.6.1`.
    pub filter: Option<String>,
    pub task_budget: Option<usize>,
    pub json: bool,
}

impl RunConfig {
    /// Parse command arguments (after the subcommand) with `env` as the
    /// environment lookup.
    pub fn parse<F>(args: &[String], env: F) -> Result<Self, CliError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = RunConfig::default();
        if let Some(raw) = env(BUDGET_ENV) {
            config.task_budget = Some(parse_budget(&raw, BUDGET_ENV)?);
        }

        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--json" => config.json = true,
                "--filter" | "-f" => {
                    let value = iter.next().ok_or(CliError::MissingValue("--filter"))?;
                    config.filter = Some(value.clone());
                }
                "--budget" => {
                    let value = iter.next().ok_or(CliError::MissingValue("--budget"))?;
                    config.task_budget = Some(parse_budget(value, "--budget")?);
                }
                other => return Err(CliError::UnknownOption(other.to_string())),
            }
        }
        Ok(config)
    }

    pub fn queue_config(&self) -> QueueConfig {
        QueueConfig {
            task_budget: self.task_budget,
            ..QueueConfig::default()
        }
    }
}

fn parse_budget(raw: &str, source_name: &'static str) -> Result<usize, CliError> {
    match raw.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(CliError::InvalidBudget {
            value: raw.to_string(),
            source_name,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn defaults() {
        let config = RunConfig::parse(&[], no_env).unwrap();
        assert_eq!(config, RunConfig::default());
        assert_eq!(config.queue_config(), QueueConfig::default());
    }

    #[test]
    fn flags() {
        let config =
            RunConfig::parse(&args(&["--filter", "2.3", "--budget", "50", "--json"]), no_env)
                .unwrap();
        assert_eq!(config.filter.as_deref(), Some("2.3"));
        assert_eq!(config.task_budget, Some(50));
        assert!(config.json);
    }

    #[test]
    fn env_budget_and_flag_override() {
        let env = |key: &str| (key == BUDGET_ENV).then(|| "20".to_string());
        assert_eq!(RunConfig::parse(&[], env).unwrap().task_budget, Some(20));
        let config = RunConfig::parse(&args(&["--budget", "7"]), env).unwrap();
        assert_eq!(config.task_budget, Some(7));
    }

    #[test]
    fn bad_budget() {
        let err = RunConfig::parse(&args(&["--budget", "0"]), no_env).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid task budget '0' from --budget: expected a positive integer"
        );
        let env = |_: &str| Some("lots".to_string());
        assert!(matches!(
            RunConfig::parse(&[], env),
            Err(CliError::InvalidBudget { source_name: BUDGET_ENV, .. })
        ));
    }

    #[test]
    fn missing_value_and_unknown() {
        assert_eq!(
            RunConfig::parse(&args(&["--filter"]), no_env),
            Err(CliError::MissingValue("--filter"))
        );
        assert_eq!(
            RunConfig::parse(&args(&["--verbose"]), no_env),
            Err(CliError::UnknownOption("--verbose".to_string()))
        );
    }
}
