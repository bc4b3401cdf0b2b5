//! 外部通道集成（需对应 feature）

#[cfg(feature = "server")]
pub mod http;
