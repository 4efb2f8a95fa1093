use std::fs;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

use crate::aml::Watchlist;
use crate::domain::RiskPolicy;
use crate::rules::RuleSet;

/// Errors that can occur during policy loading.
#[derive(Error, Debug)]
pub enum PolicyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Load a risk policy from a YAML file.
///
/// Rejects any policy that fails validation; a running engine keeps its
/// previous policy rather than accept a broken one.
pub fn load_policy(path: impl AsRef<Path>) -> Result<RiskPolicy, PolicyError> {
    let content = fs::read_to_string(path)?;
    let policy: RiskPolicy = serde_yaml::from_str(&content)?;

    policy.validate().map_err(PolicyError::Validation)?;

    Ok(policy)
}

/// Load a watchlist from a text file.
///
/// Expected format: one name per line, # for comments.
pub fn load_watchlist(path: impl AsRef<Path>) -> Result<Watchlist, PolicyError> {
    let content = fs::read_to_string(path)?;

    let names = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'));

    Ok(Watchlist::from_names(names))
}

/// Policy loader that manages policy and watchlist loading.
pub struct PolicyLoader {
    policy_path: String,
    watchlist_path: String,
}

impl PolicyLoader {
    /// Create a new policy loader.
    pub fn new(policy_path: impl Into<String>, watchlist_path: impl Into<String>) -> Self {
        PolicyLoader {
            policy_path: policy_path.into(),
            watchlist_path: watchlist_path.into(),
        }
    }

    /// Load policy and watchlist, returning a compiled RuleSet.
    pub fn load(&self) -> Result<(RiskPolicy, RuleSet), PolicyError> {
        let policy = load_policy(&self.policy_path)?;
        let watchlist = load_watchlist(&self.watchlist_path)?;

        let ruleset = RuleSet::from_policy(policy.clone(), Arc::new(watchlist));

        Ok((policy, ruleset))
    }

    /// Load only the policy (without rebuilding rules).
    pub fn load_policy(&self) -> Result<RiskPolicy, PolicyError> {
        load_policy(&self.policy_path)
    }

    /// Load only the watchlist.
    pub fn load_watchlist(&self) -> Result<Watchlist, PolicyError> {
        load_watchlist(&self.watchlist_path)
    }

    /// Get the policy file path.
    pub fn policy_path(&self) -> &str {
        &self.policy_path
    }

    /// Get the watchlist file path.
    pub fn watchlist_path(&self) -> &str {
        &self.watchlist_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const POLICY_YAML: &str = r#"
policy_version: "test-1.0"
weights:
  behavioral: 0.4
  transactional: 0.3
  technical: 0.2
  geographic: 0.1
levels:
  medium: 0.3
  high: 0.6
  critical: 0.8
block_threshold: 0.6
aml_block_threshold: 0.9
hold_threshold: 0.85
sar_threshold: 0.8
rules:
  unusual_amount_multiplier: 3
  round_amount_modulus: 1000
  round_amount_min: 5000
  rapid_succession_count: 5
  impossible_travel_km: 500
  impossible_travel_window_secs: 3600
  suspicious_agents: ["curl", "python-requests"]
aml:
  ctr_threshold: 10000
  structuring_band_pct: 0.1
  structuring_count: 3
  structuring_window_hours: 24
  layering_min_hops: 4
  layering_amount_tolerance_pct: 0.05
"#;

    #[test]
    fn test_load_policy() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{POLICY_YAML}").unwrap();

        let policy = load_policy(file.path()).unwrap();

        assert_eq!(policy.version, "test-1.0");
        assert_eq!(policy.rules.unusual_amount_multiplier, rust_decimal::Decimal::new(3, 0));
        assert_eq!(policy.rules.suspicious_agents.len(), 2);
    }

    #[test]
    fn test_load_policy_rejects_bad_weights() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", POLICY_YAML.replace("behavioral: 0.4", "behavioral: 0.9")).unwrap();

        let result = load_policy(file.path());
        assert!(matches!(result, Err(PolicyError::Validation(_))));
    }

    #[test]
    fn test_load_policy_rejects_malformed_yaml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "policy_version: [unclosed").unwrap();

        let result = load_policy(file.path());
        assert!(matches!(result, Err(PolicyError::Yaml(_))));
    }

    #[test]
    fn test_load_watchlist() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
# consolidated watchlist
Ivan Petrov
Maria  Gonzalez

# another entry
John Smith
"#
        )
        .unwrap();

        let watchlist = load_watchlist(file.path()).unwrap();

        assert_eq!(watchlist.len(), 3);
        assert!(watchlist.contains("ivan petrov"));
        assert!(watchlist.contains("Maria Gonzalez")); // whitespace collapsed
        assert!(!watchlist.contains("# consolidated watchlist"));
    }

    #[test]
    fn test_policy_loader() {
        let mut policy_file = NamedTempFile::new().unwrap();
        write!(policy_file, "{POLICY_YAML}").unwrap();

        let mut watchlist_file = NamedTempFile::new().unwrap();
        writeln!(watchlist_file, "Ivan Petrov").unwrap();

        let loader = PolicyLoader::new(
            policy_file.path().to_string_lossy(),
            watchlist_file.path().to_string_lossy(),
        );

        let (policy, ruleset) = loader.load().unwrap();

        assert_eq!(policy.version, "test-1.0");
        assert_eq!(ruleset.rule_count(), 6);
        assert_eq!(ruleset.version(), "test-1.0");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = load_policy("/nonexistent/policy.yaml");
        assert!(matches!(result, Err(PolicyError::Io(_))));
    }
}
