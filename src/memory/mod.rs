//! 记忆层：单会话对话历史 + 按会话 ID 索引的内存 checkpoint

pub mod conversation;
pub mod session;

pub use conversation::{ConversationMemory, Message, Role};
pub use session::{SessionHandle, SessionStore};
