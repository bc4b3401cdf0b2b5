//! 工具箱：配方查询、配方录入、日期时间，以及注册表与执行器

pub mod add_recipe;
pub mod datetime;
pub mod executor;
pub mod recipe_query;
pub mod registry;
pub mod schema;

pub use add_recipe::{AddRecipeArgs, AddRecipeTool};
pub use datetime::CurrentDateTimeTool;
pub use executor::ToolExecutor;
pub use recipe_query::{RecipeQueryArgs, RecipeQueryTool};
pub use registry::{parse_args, schema_of, Tool, ToolRegistry};
pub use schema::{final_answer_schema_json, tool_call_schema_json};
