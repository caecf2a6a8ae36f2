use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::catalog::ProductType;

/// 产物类型
///
/// 旧数据里可能出现其他扩展名（如 `docx`），以 `Other` 原样保留。
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(from = "String", into = "String")]
pub enum ArtifactKind {
    Csv,
    Html,
    Pdf,
    Json,
    Other(String),
}

impl From<String> for ArtifactKind {
    fn from(kind: String) -> Self {
        match kind.as_str() {
            "csv" => ArtifactKind::Csv,
            "html" => ArtifactKind::Html,
            "pdf" => ArtifactKind::Pdf,
            "json" => ArtifactKind::Json,
            _ => ArtifactKind::Other(kind),
        }
    }
}

impl From<ArtifactKind> for String {
    fn from(kind: ArtifactKind) -> Self {
        kind.to_string()
    }
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArtifactKind::Csv => write!(f, "csv"),
            ArtifactKind::Html => write!(f, "html"),
            ArtifactKind::Pdf => write!(f, "pdf"),
            ArtifactKind::Json => write!(f, "json"),
            ArtifactKind::Other(kind) => f.write_str(kind),
        }
    }
}

/// 成功生成的产物集合，只包含成功的类型
pub type ArtifactSet = BTreeMap<ArtifactKind, PathBuf>;

/// 由信号生成的数字产品
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Product {
    pub id: String,
    pub signal_id: String,
    pub name: String,
    pub description: String,
    pub files: ArtifactSet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_type: Option<ProductType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Product {
    /// 生成新的产品ID，带 `prod_` 前缀以区别于信号ID
    pub fn new_id() -> String {
        format!("prod_{}", &uuid::Uuid::new_v4().simple().to_string()[..12])
    }
}
