//! 配方知识库：数据模型与校验、JSON 文件存储、自由文本抽取

pub mod extractor;
pub mod recipe;
pub mod store;

pub use extractor::{parse_recipe_response, ExtractionError, ParseStage, RecipeExtractor};
pub use recipe::{validate, Recipe};
pub use store::{KnowledgeStore, StoreError};
