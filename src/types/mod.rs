pub mod product;
pub mod signal;

pub use product::{ArtifactKind, ArtifactSet, Product};
pub use signal::{Signal, SignalStatus};

/// 内容生成返回的结构化数据（顶层必须是JSON对象）
pub type Payload = serde_json::Map<String, serde_json::Value>;
