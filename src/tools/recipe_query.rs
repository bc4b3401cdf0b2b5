//! RecipeQuery：按饮品名查配方

use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::core::ToolError;
use crate::knowledge::KnowledgeStore;
use crate::tools::{parse_args, schema_of, Tool};

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct RecipeQueryArgs {
    /// The name of the coffee drink (e.g., latte, cappuccino, espresso, flat white, caramel macchiato)
    pub drink: String,
}

pub struct RecipeQueryTool {
    store: Arc<KnowledgeStore>,
}

impl RecipeQueryTool {
    pub fn new(store: Arc<KnowledgeStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for RecipeQueryTool {
    fn name(&self) -> &str {
        "RecipeQuery"
    }

    fn description(&self) -> &str {
        "Look up the recipe for a specific coffee drink by name. Returns ingredients and steps."
    }

    fn parameters_schema(&self) -> Value {
        schema_of::<RecipeQueryArgs>()
    }

    async fn execute(&self, args: Value) -> Result<Value, ToolError> {
        let RecipeQueryArgs { drink } = parse_args(self.name(), args)?;
        match self.store.query(&drink).await {
            Some(recipe) => {
                tracing::debug!(drink = %drink, found = %recipe.name, "recipe found");
                Ok(json!(recipe))
            }
            None => {
                tracing::warn!(drink = %drink, "no recipe found");
                Ok(json!({ "error": format!("Sorry, I couldn't find a recipe for '{drink}'.") }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::Recipe;
    use tempfile::TempDir;

    async fn tool_with(recipes: &[Recipe]) -> (TempDir, RecipeQueryTool) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("recipes.json");
        std::fs::write(&path, serde_json::to_string(recipes).unwrap()).unwrap();
        (dir, RecipeQueryTool::new(Arc::new(KnowledgeStore::new(path))))
    }

    #[tokio::test]
    async fn test_found_returns_recipe_fields() {
        let (_dir, tool) =
            tool_with(&[Recipe::new("Cappuccino", ["espresso", "foam"], ["Pull", "Top"])]).await;
        let out = tool.execute(json!({"drink": "cappu"})).await.unwrap();
        assert_eq!(
            out,
            json!({"name": "Cappuccino", "ingredients": ["espresso", "foam"], "steps": ["Pull", "Top"]})
        );
    }

    #[tokio::test]
    async fn test_not_found_is_error_payload_not_failure() {
        let (_dir, tool) = tool_with(&[]).await;
        let out = tool.execute(json!({"drink": "xyz"})).await.unwrap();
        assert_eq!(out["error"], "Sorry, I couldn't find a recipe for 'xyz'.");
    }

    #[tokio::test]
    async fn test_missing_drink_is_invalid_args() {
        let (_dir, tool) = tool_with(&[]).await;
        let err = tool.execute(json!({})).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidArgs { .. }));
    }
}
