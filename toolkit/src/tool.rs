//! Tool abstraction
//!
//! A tool is what an agent runtime sees: a name, a natural-language
//! description, a JSON schema for its arguments, and an async entry point
//! that always answers with text.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use auction_agent_core::Error;

/// Everything an agent runtime needs to offer a tool to a model
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolDefinition {
    /// Tool name
    pub name: String,
    /// What the tool does, written for the model
    pub description: String,
    /// JSON schema of the arguments object
    pub parameters: Value,
}

impl ToolDefinition {
    /// Function-calling shape used by chat completion APIs
    pub fn to_function_spec(&self) -> Value {
        json!({
            "type": "function",
            "function": {
                "name": self.name,
                "description": self.description,
                "parameters": self.parameters,
            }
        })
    }
}

/// An agent-callable action
#[async_trait]
pub trait Tool: Send + Sync {
    /// Name, description and argument schema
    fn definition(&self) -> ToolDefinition;

    /// Run the tool. Failures are reported in the returned text, never raised.
    async fn call(&self, args: Value) -> String;
}

/// Deserialize tool arguments, reporting schema mismatches as validation errors
pub fn parse_args<T: DeserializeOwned>(args: Value) -> auction_agent_core::Result<T> {
    serde_json::from_value(args).map_err(|e| Error::validation(format!("Invalid arguments: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_spec_shape() {
        let definition = ToolDefinition {
            name: "finalize_nft_auction".to_string(),
            description: "Finalize an NFT auction.".to_string(),
            parameters: json!({"type": "object"}),
        };
        let spec = definition.to_function_spec();
        assert_eq!(spec["type"], "function");
        assert_eq!(spec["function"]["name"], "finalize_nft_auction");
        assert_eq!(spec["function"]["parameters"]["type"], "object");
    }

    #[test]
    fn test_parse_args_reports_validation() {
        #[derive(Debug, Deserialize)]
        struct Args {
            #[allow(dead_code)]
            token_id: u64,
        }
        let err = parse_args::<Args>(json!({"token_id": "one"})).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().starts_with("Validation error: Invalid arguments"));
    }
}
