//! Draft defaults from TOML (`[defaults]` section)

use ballot_domain::{CalculationBase, ConfigIssue, ConfigIssueCode, DraftDefaults, Severity};
use serde::{Deserialize, Serialize};

/// Raw draft defaults from TOML
///
/// Applied to fields a submitted draft leaves out.
///
/// # Example
///
/// ```toml
/// [defaults]
/// minimum_pass_percentage = 67
/// calculation_base = "votes_present"   # "total_vote" or "votes_present"
/// discrete_voting = true
/// allow_extensions = false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDefaultsConfig {
    /// Signed so that out-of-range values can be reported instead of
    /// failing deserialization
    pub minimum_pass_percentage: i64,
    pub calculation_base: String,
    pub discrete_voting: bool,
    pub allow_extensions: bool,
}

impl Default for FileDefaultsConfig {
    fn default() -> Self {
        let defaults = DraftDefaults::default();
        Self {
            minimum_pass_percentage: defaults.minimum_pass_percentage as i64,
            calculation_base: defaults.calculation_base.as_str().to_string(),
            discrete_voting: defaults.discrete_voting,
            allow_extensions: defaults.allow_extensions,
        }
    }
}

impl FileDefaultsConfig {
    /// Parse calculation_base string into CalculationBase enum
    pub fn parse_calculation_base(&self) -> (CalculationBase, Vec<ConfigIssue>) {
        match self.calculation_base.parse::<CalculationBase>() {
            Ok(base) => (base, vec![]),
            Err(_) => {
                let issue = ConfigIssue {
                    severity: Severity::Warning,
                    code: ConfigIssueCode::InvalidEnumValue {
                        field: "defaults.calculation_base".to_string(),
                        value: self.calculation_base.clone(),
                        valid_values: vec!["total_vote".to_string(), "votes_present".to_string()],
                    },
                    message: format!(
                        "defaults.calculation_base: unknown value '{}', falling back to 'total_vote'",
                        self.calculation_base
                    ),
                };
                (CalculationBase::default(), vec![issue])
            }
        }
    }

    /// Convert into domain defaults, collecting every issue found
    pub fn to_draft_defaults(&self) -> (DraftDefaults, Vec<ConfigIssue>) {
        let mut defaults = DraftDefaults {
            discrete_voting: self.discrete_voting,
            allow_extensions: self.allow_extensions,
            ..DraftDefaults::default()
        };

        let (base, mut issues) = self.parse_calculation_base();
        defaults.calculation_base = base;

        match u8::try_from(self.minimum_pass_percentage) {
            Ok(percentage) if (1..=100).contains(&percentage) => {
                defaults.minimum_pass_percentage = percentage;
            }
            _ => issues.push(ConfigIssue {
                severity: Severity::Error,
                code: ConfigIssueCode::OutOfRange {
                    field: "defaults.minimum_pass_percentage".to_string(),
                    value: self.minimum_pass_percentage,
                },
                message: format!(
                    "defaults.minimum_pass_percentage must be between 1 and 100, got {}",
                    self.minimum_pass_percentage
                ),
            }),
        }

        (defaults, issues)
    }
}
