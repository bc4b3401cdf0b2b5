//! AddRecipe：从自由文本抽取配方并写入知识库

use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::core::ToolError;
use crate::knowledge::{KnowledgeStore, RecipeExtractor};
use crate::tools::{parse_args, schema_of, Tool};

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AddRecipeArgs {
    /// The recipe as free text (e.g., 'Mocha: 1 shot espresso, 1 tbsp chocolate syrup...')
    pub recipe_text: String,
}

pub struct AddRecipeTool {
    extractor: Arc<RecipeExtractor>,
    store: Arc<KnowledgeStore>,
}

impl AddRecipeTool {
    pub fn new(extractor: Arc<RecipeExtractor>, store: Arc<KnowledgeStore>) -> Self {
        Self { extractor, store }
    }
}

#[async_trait]
impl Tool for AddRecipeTool {
    fn name(&self) -> &str {
        "AddRecipe"
    }

    fn description(&self) -> &str {
        "Parse a recipe from text and add it to the knowledge base."
    }

    fn parameters_schema(&self) -> Value {
        schema_of::<AddRecipeArgs>()
    }

    async fn execute(&self, args: Value) -> Result<Value, ToolError> {
        let AddRecipeArgs { recipe_text } = parse_args(self.name(), args)?;
        tracing::debug!(recipe_text = %recipe_text, "AddRecipe invoked");

        let recipe = self.extractor.extract(&recipe_text).await?;
        self.store.append(recipe.clone()).await.inspect_err(|e| {
            tracing::error!(path = %self.store.path().display(), error = %e, "failed to write new recipe");
        })?;

        Ok(json!({ "success": true, "recipe": recipe }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::ExtractionError;
    use crate::llm::MockLlmClient;
    use tempfile::TempDir;

    async fn setup(llm_reply: &str) -> (TempDir, Arc<KnowledgeStore>, AddRecipeTool) {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(KnowledgeStore::new(dir.path().join("recipes.json")));
        store.create_if_missing().await.unwrap();
        let llm = Arc::new(MockLlmClient::scripted([llm_reply]));
        let extractor = Arc::new(RecipeExtractor::new(llm, 5));
        let tool = AddRecipeTool::new(extractor, store.clone());
        (dir, store, tool)
    }

    #[tokio::test]
    async fn test_add_success_persists() {
        let (_dir, store, tool) = setup(
            r#"Here you go: {"name":"Cortado","ingredients":["espresso","warm milk"],"steps":["Pull","Add milk"]}"#,
        )
        .await;

        let out = tool
            .execute(json!({"recipeText": "Cortado: espresso cut with warm milk"}))
            .await
            .unwrap();

        assert_eq!(out["success"], true);
        assert_eq!(out["recipe"]["name"], "Cortado");
        assert_eq!(store.query("cortado").await.unwrap().ingredients.len(), 2);
    }

    #[tokio::test]
    async fn test_unparsable_leaves_store_unchanged() {
        let (_dir, store, tool) = setup("I don't know that one.").await;

        let err = tool
            .execute(json!({"recipeText": "???"}))
            .await
            .unwrap_err();

        assert!(matches!(err, ToolError::Extraction(ExtractionError::Unparsable)));
        assert!(store.load_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_store_failure_is_reported() {
        let (dir, _store, tool) =
            setup(r#"{"name":"Mocha","ingredients":[],"steps":[]}"#).await;
        std::fs::write(dir.path().join("recipes.json"), "oops").unwrap();

        let err = tool
            .execute(json!({"recipeText": "Mocha"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Store(_)));

        let payload = err.to_payload();
        let message = payload["error"].as_str().unwrap();
        assert!(message.starts_with("Recipes knowledge base is corrupt"));
        assert!(!message.contains(dir.path().to_str().unwrap()));
    }
}
