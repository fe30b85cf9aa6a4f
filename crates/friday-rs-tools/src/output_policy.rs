//! Tool output truncation policy.

use friday_rs_config::OutputPolicyConfig;

/// Policy that bounds the size of tool result strings.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolOutputPolicy {
    /// Maximum number of characters kept from a result.
    pub max_chars: usize,
    /// Text appended when a result was cut.
    pub truncation_marker: String,
}

impl Default for ToolOutputPolicy {
    /// Default output policy with conservative limits.
    fn default() -> Self {
        Self::from(&OutputPolicyConfig::default())
    }
}

impl From<&OutputPolicyConfig> for ToolOutputPolicy {
    fn from(config: &OutputPolicyConfig) -> Self {
        Self {
            max_chars: config.max_result_chars,
            truncation_marker: config.truncation_marker.clone(),
        }
    }
}

impl ToolOutputPolicy {
    /// Apply the policy to a result string.
    pub fn apply(&self, value: String) -> String {
        match value.char_indices().nth(self.max_chars) {
            None => value,
            Some((end, _)) => {
                let mut truncated = value[..end].to_string();
                truncated.push_str(&self.truncation_marker);
                truncated
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ToolOutputPolicy;
    use pretty_assertions::assert_eq;

    fn policy(max_chars: usize) -> ToolOutputPolicy {
        ToolOutputPolicy {
            max_chars,
            truncation_marker: "[cut]".to_string(),
        }
    }

    #[test]
    fn short_results_pass_through() {
        assert_eq!(policy(10).apply("hello".to_string()), "hello");
        assert_eq!(policy(5).apply("hello".to_string()), "hello");
    }

    #[test]
    fn long_results_are_cut_on_char_boundaries() {
        assert_eq!(policy(3).apply("héllo wörld".to_string()), "hél[cut]");
    }

    #[test]
    fn zero_budget_keeps_only_marker() {
        assert_eq!(policy(0).apply("abc".to_string()), "[cut]");
    }
}
