//! 配方知识库（单个 JSON 数组文件）
//!
//! - `query` 不加锁：读到旧数据可以接受；写入经临时文件 + rename 完成，读者不会看到半个文件。
//! - `append` 是对整份集合的读-改-写，由单写者锁串行化，并发追加不会丢更新。

use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::sync::Mutex;

use crate::knowledge::Recipe;

/// 知识库读写错误（PersistenceError / ValidationError）。
/// 消息文本会回灌给模型，不含文件路径；路径只进日志。
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Could not read existing recipes knowledge base: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Recipes knowledge base is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to save new recipe to knowledge base: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Recipe failed validation: {0}")]
    Validation(String),
}

/// 知识库：唯一持有底层文件的组件
#[derive(Debug)]
pub struct KnowledgeStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl KnowledgeStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 启动时调用：文件不存在则写入空数组
    pub async fn create_if_missing(&self) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        if tokio::fs::metadata(&self.path).await.is_ok() {
            return Ok(());
        }
        tracing::info!(path = %self.path.display(), "seeding empty recipes knowledge base");
        self.persist(&[]).await
    }

    /// 读取全部配方；文件缺失或内容损坏都是错误
    pub async fn load_all(&self) -> Result<Vec<Recipe>, StoreError> {
        let data = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| StoreError::Read {
                path: self.path.clone(),
                source,
            })?;
        serde_json::from_str(&data).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    /// 按名称查找（大小写不敏感子串），返回存储顺序中的第一条。
    /// 读失败按"无结果"处理，只记日志，不打断对话。
    pub async fn query(&self, term: &str) -> Option<Recipe> {
        let recipes = match self.load_all().await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to load recipes, treating store as empty");
                return None;
            }
        };
        let term_lower = term.to_lowercase();
        tracing::debug!(term, total = recipes.len(), "searching for recipe");
        recipes.into_iter().find(|r| r.matches(&term_lower))
    }

    /// 追加一条配方并整体写回。调用方应已校验，这里仍会再查一次。
    pub async fn append(&self, recipe: Recipe) -> Result<(), StoreError> {
        if !recipe.is_valid() {
            return Err(StoreError::Validation("recipe name must be non-empty".into()));
        }

        let _guard = self.write_lock.lock().await;
        let mut recipes = self.load_all().await?;
        let name = recipe.name.clone();
        recipes.push(recipe);
        self.persist(&recipes).await?;
        tracing::info!(recipe = %name, total = recipes.len(), "recipe appended");
        Ok(())
    }

    /// 写临时文件再 rename 覆盖；调用方须持有 write_lock
    async fn persist(&self, recipes: &[Recipe]) -> Result<(), StoreError> {
        let write_err = |source| StoreError::Write {
            path: self.path.clone(),
            source,
        };
        let json = serde_json::to_string_pretty(recipes).map_err(|e| {
            write_err(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        })?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await.map_err(write_err)?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(write_err)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use tempfile::TempDir;

    async fn empty_store(dir: &TempDir) -> KnowledgeStore {
        let store = KnowledgeStore::new(dir.path().join("recipes.json"));
        store.create_if_missing().await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_append_then_query_returns_equal_record() {
        let dir = TempDir::new().unwrap();
        let store = empty_store(&dir).await;
        let r = Recipe::new("Flat White", ["espresso", "microfoam"], ["Pull", "Pour"]);

        store.append(r.clone()).await.unwrap();

        assert_eq!(store.query("Flat White").await, Some(r));
    }

    #[tokio::test]
    async fn test_query_case_insensitive_substring_and_not_found() {
        let dir = TempDir::new().unwrap();
        let store = empty_store(&dir).await;
        store
            .append(Recipe::new("Caffe Latte", ["espresso", "milk"], ["Pull", "Steam"]))
            .await
            .unwrap();

        let found = store.query("latte").await.unwrap();
        assert_eq!(found.name, "Caffe Latte");
        assert!(store.query("xyz").await.is_none());
    }

    #[tokio::test]
    async fn test_query_returns_first_match_in_stored_order() {
        let dir = TempDir::new().unwrap();
        let store = empty_store(&dir).await;
        store.append(Recipe::new("Iced Latte", ["ice"], ["a"])).await.unwrap();
        store.append(Recipe::new("Caffe Latte", ["milk"], ["b"])).await.unwrap();

        assert_eq!(store.query("LATTE").await.unwrap().name, "Iced Latte");
    }

    #[tokio::test]
    async fn test_persisted_format_is_pretty_json_array() {
        let dir = TempDir::new().unwrap();
        let store = empty_store(&dir).await;
        store.append(Recipe::new("Espresso", ["coffee"], ["Pull"])).await.unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert!(raw.starts_with("[\n  {\n    \"name\": \"Espresso\""));
        assert!(!dir.path().join("recipes.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_corrupt_store_query_degrades_append_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("recipes.json");
        std::fs::write(&path, "{not json").unwrap();
        let store = KnowledgeStore::new(&path);

        assert!(store.query("latte").await.is_none());
        let err = store
            .append(Recipe::new("Mocha", ["chocolate"], ["Mix"]))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{not json");
    }

    #[tokio::test]
    async fn test_missing_store_append_fails() {
        let dir = TempDir::new().unwrap();
        let store = KnowledgeStore::new(dir.path().join("absent.json"));
        let err = store
            .append(Recipe::new("Mocha", ["chocolate"], ["Mix"]))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Read { .. }));
        assert!(!err.to_string().contains("absent.json"));
    }

    #[tokio::test]
    async fn test_append_rejects_empty_name() {
        let dir = TempDir::new().unwrap();
        let store = empty_store(&dir).await;
        let err = store
            .append(Recipe::new("", ["x"], ["y"]))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert!(store.load_all().await.unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_appends_do_not_lose_updates() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(empty_store(&dir).await);

        let mut handles = Vec::new();
        for i in 0..16 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .append(Recipe::new(format!("Drink {i}"), ["water"], ["boil"]))
                    .await
            }));
        }
        for h in handles {
            h.await.unwrap().unwrap();
        }

        let all = store.load_all().await.unwrap();
        assert_eq!(all.len(), 16);
        for i in 0..16 {
            assert!(all.iter().any(|r| r.name == format!("Drink {i}")));
        }
    }
}
