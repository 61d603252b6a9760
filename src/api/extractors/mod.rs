/*
 * Responsibility
 * - request から handler が使う値を取り出す extractor 群
 */
pub mod inbound;
pub mod user_id;

pub use inbound::InboundRequest;
pub use user_id::extract_user_id;
