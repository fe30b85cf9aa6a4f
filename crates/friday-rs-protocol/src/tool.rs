/// Errors returned by tools and tool adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ToolError {
    /// Capability name was not found in registry.
    #[error("Unknown capability: {0}")]
    ToolNotFound(String),
    /// Tool received invalid arguments.
    #[error("{0}")]
    InvalidArguments(String),
    /// A required credential, executable, or provider is missing.
    #[error("{0}")]
    Unavailable(String),
    /// Tool execution failed.
    #[error("{0}")]
    ExecutionFailed(String),
    /// Tool execution was denied by the operating system.
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    /// The external action did not finish within its bound.
    #[error("{0}")]
    TimedOut(String),
}

impl ToolError {
    /// Whether the message should be rendered verbatim, without a capability prefix.
    pub fn is_verbatim(&self) -> bool {
        matches!(
            self,
            ToolError::ToolNotFound(_) | ToolError::InvalidArguments(_) | ToolError::TimedOut(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::ToolError;
    use pretty_assertions::assert_eq;

    #[test]
    fn unknown_capability_renders_name() {
        let err = ToolError::ToolNotFound("teleport".to_string());
        assert_eq!(err.to_string(), "Unknown capability: teleport");
        assert!(err.is_verbatim());
    }

    #[test]
    fn execution_failures_need_a_prefix() {
        let err = ToolError::ExecutionFailed("boom".to_string());
        assert_eq!(err.to_string(), "boom");
        assert!(!err.is_verbatim());
    }
}
