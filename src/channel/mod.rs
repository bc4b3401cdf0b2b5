//! 通道层：入站/出站消息、最终回答合约、响应路由

pub mod answer;
pub mod message;
pub mod router;

pub use answer::FinalAnswer;
pub use message::{Attachment, InboundMessage, OutboundMessage, ADAPTIVE_CARD_CONTENT_TYPE};
pub use router::{ResponseRouter, RoutingError};
