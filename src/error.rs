use thiserror::Error;

/// JSON-RPC error codes used on the MCP wire.
pub const INVALID_PARAMS: i64 = -32602;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INTERNAL_ERROR: i64 = -32603;
pub const PARSE_ERROR: i64 = -32700;
pub const INVALID_REQUEST: i64 = -32600;

/// Failure of a single tool call.
///
/// The first three variants are the taxonomy callers see. `Other` carries
/// anything unanticipated with its message left untouched.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("{0}")]
    InvalidParams(String),

    #[error("Unknown tool: {0}")]
    MethodNotFound(String),

    #[error("{0}")]
    Internal(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ToolError {
    pub fn invalid_params(msg: impl Into<String>) -> Self {
        Self::InvalidParams(msg.into())
    }

    pub fn missing(field: &str) -> Self {
        Self::InvalidParams(format!("Missing required parameter: {field}"))
    }

    pub fn code(&self) -> i64 {
        match self {
            ToolError::InvalidParams(_) => INVALID_PARAMS,
            ToolError::MethodNotFound(_) => METHOD_NOT_FOUND,
            ToolError::Internal(_) | ToolError::Other(_) => INTERNAL_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_not_found_names_the_tool() {
        let err = ToolError::MethodNotFound("get_everything".to_string());
        assert_eq!(err.to_string(), "Unknown tool: get_everything");
        assert_eq!(err.code(), METHOD_NOT_FOUND);
    }

    #[test]
    fn missing_names_the_field() {
        let err = ToolError::missing("networkId");
        assert_eq!(err.to_string(), "Missing required parameter: networkId");
        assert_eq!(err.code(), INVALID_PARAMS);
    }

    #[test]
    fn other_keeps_original_message() {
        let err = ToolError::from(anyhow::anyhow!("relative URL without a base"));
        assert_eq!(err.to_string(), "relative URL without a base");
        assert_eq!(err.code(), INTERNAL_ERROR);
    }
}
