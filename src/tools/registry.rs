use crate::markdown::Fixer;
use crate::tools::markdown::{LintAndFixMarkdown, ScanMarkdown};
use crate::types::{AppError, Result, ToolDefinition};
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::fmt;
use std::sync::Arc;

/// The fixed set of tools this crate exposes to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolId {
    LintAndFixMarkdown,
    ScanMarkdown,
}

impl ToolId {
    pub const ALL: [ToolId; 2] = [ToolId::LintAndFixMarkdown, ToolId::ScanMarkdown];

    /// Function name as declared in the tool schema.
    pub fn name(self) -> &'static str {
        match self {
            ToolId::LintAndFixMarkdown => "lint_and_fix_markdown",
            ToolId::ScanMarkdown => "scan_markdown",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.name() == name)
    }
}

impl fmt::Display for ToolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Text handed back to the model for one tool call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    pub content: String,
    pub success: bool,
}

/// A strongly typed tool handler.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Arguments decoded from the model's JSON; also the source of the parameter schema.
    type Args: DeserializeOwned + JsonSchema + Send;

    fn id(&self) -> ToolId;

    fn description(&self) -> &'static str;

    async fn call(&self, args: Self::Args) -> ToolOutput;

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.id().name().to_string(),
            description: self.description().to_string(),
            parameters: parameters_schema::<Self::Args>(),
        }
    }
}

/// JSON schema for a tool's arguments, trimmed to the function-calling shape.
fn parameters_schema<A: JsonSchema>() -> Value {
    let schema = schemars::SchemaGenerator::default().into_root_schema_for::<A>();
    let mut value = serde_json::to_value(&schema).unwrap_or_else(|_| json!({ "type": "object" }));
    if let Some(object) = value.as_object_mut() {
        object.remove("$schema");
        object.remove("title");
    }
    value
}

/// Arguments may also arrive as the model's undecoded JSON text.
async fn invoke<T: Tool>(tool: &T, args: Value) -> Result<ToolOutput> {
    let decoded = match args {
        Value::String(raw) => serde_json::from_str::<T::Args>(&raw),
        other => serde_json::from_value::<T::Args>(other),
    };
    let args = decoded.map_err(|e| {
        AppError::InvalidInput(format!("Invalid arguments for {}: {}", tool.id(), e))
    })?;
    Ok(tool.call(args).await)
}

/// Static table from [`ToolId`] to its handler.
pub struct ToolRegistry {
    lint_and_fix: LintAndFixMarkdown,
    scan: ScanMarkdown,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new(Arc::new(Fixer::default()))
    }
}

impl ToolRegistry {
    /// Build the registry with every tool sharing one fixer configuration.
    pub fn new(fixer: Arc<Fixer>) -> Self {
        Self {
            lint_and_fix: LintAndFixMarkdown::new(fixer.clone()),
            scan: ScanMarkdown::new(fixer),
        }
    }

    pub fn definition(&self, id: ToolId) -> ToolDefinition {
        match id {
            ToolId::LintAndFixMarkdown => self.lint_and_fix.definition(),
            ToolId::ScanMarkdown => self.scan.definition(),
        }
    }

    pub fn get_tool_definitions(&self) -> Vec<ToolDefinition> {
        ToolId::ALL.into_iter().map(|id| self.definition(id)).collect()
    }

    pub async fn execute(&self, name: &str, args: Value) -> Result<ToolOutput> {
        match ToolId::from_name(name) {
            Some(ToolId::LintAndFixMarkdown) => invoke(&self.lint_and_fix, args).await,
            Some(ToolId::ScanMarkdown) => invoke(&self.scan, args).await,
            None => Err(AppError::NotFound(format!("Tool not found: {}", name))),
        }
    }

    /// Get a list of all registered tool names
    pub fn tool_names(&self) -> Vec<&'static str> {
        ToolId::ALL.into_iter().map(ToolId::name).collect()
    }

    /// Check if a tool is registered
    pub fn has_tool(&self, name: &str) -> bool {
        ToolId::from_name(name).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_id_round_trip_names() {
        for id in ToolId::ALL {
            assert_eq!(ToolId::from_name(id.name()), Some(id));
        }
        assert_eq!(ToolId::from_name("calculator"), None);
    }

    #[test]
    fn test_registry_tools() {
        let registry = ToolRegistry::default();
        assert_eq!(registry.tool_names(), vec!["lint_and_fix_markdown", "scan_markdown"]);
        assert!(registry.has_tool("lint_and_fix_markdown"));
        assert!(!registry.has_tool("nonexistent_tool"));
    }

    #[test]
    fn test_get_tool_definitions() {
        let registry = ToolRegistry::default();
        let definitions = registry.get_tool_definitions();

        assert_eq!(definitions.len(), 2);
        for def in &definitions {
            assert!(!def.name.is_empty());
            assert!(!def.description.is_empty());
            assert_eq!(def.parameters["type"], "object");
            assert!(def.parameters.get("$schema").is_none());
        }
    }

    #[test]
    fn test_lint_schema_declares_required_file_path() {
        let def = ToolRegistry::default().definition(ToolId::LintAndFixMarkdown);
        assert_eq!(def.name, "lint_and_fix_markdown");
        assert_eq!(def.parameters["properties"]["file_path"]["type"], "string");
        assert!(def.parameters["required"]
            .as_array()
            .unwrap()
            .contains(&json!("file_path")));
    }

    #[tokio::test]
    async fn test_nonexistent_tool() {
        let registry = ToolRegistry::default();
        let result = registry.execute("nonexistent_tool", json!({})).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_invalid_arguments() {
        let registry = ToolRegistry::default();
        let result = registry
            .execute("lint_and_fix_markdown", json!({ "path": "./input.md" }))
            .await;
        match result {
            Err(AppError::InvalidInput(msg)) => assert!(msg.contains("file_path")),
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_json_text_names_parse_error() {
        let registry = ToolRegistry::default();
        let result = registry
            .execute("lint_and_fix_markdown", json!("{\"file_path\": "))
            .await;
        match result {
            Err(AppError::InvalidInput(msg)) => {
                assert!(msg.starts_with("Invalid arguments for lint_and_fix_markdown: EOF"));
            }
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_json_text_arguments_are_decoded() {
        let registry = ToolRegistry::default();
        let output = registry
            .execute("scan_markdown", json!("{\"file_path\": \"./no-such-dir/x.md\"}"))
            .await
            .unwrap();
        assert!(!output.success);
    }
}
