//! 记录存储：以整个JSON数组为单位读写的扁平集合

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::config::Config;

/// 整集合读改写的存储抽象
///
/// `load` 返回的顺序即插入顺序，选择策略依赖它打破平局。
/// 不提供并发写保护，调用方需保证单进程串行使用。
pub trait RecordStore<R>: Send + Sync {
    fn load(&self) -> Result<Vec<R>>;

    /// 用 `records` 覆盖整个集合，文件实现会保留其中无法解码的旧记录
    fn save(&self, records: &[R]) -> Result<()>;
}

/// 基于单个JSON数组文件的存储
pub struct JsonFileStore<R> {
    path: PathBuf,
    _record: PhantomData<fn() -> R>,
}

impl<R> JsonFileStore<R> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _record: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        self.sibling_path(".tmp")
    }

    fn sibling_path(&self, suffix: &str) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(suffix);
        self.path.with_file_name(name)
    }
}

/// 磁盘上文件的原始内容
enum RawContent {
    /// 文件不存在或为空
    Empty,
    Records(Vec<Value>),
    /// 不是合法的JSON数组
    Malformed(serde_json::Error),
}

impl<R> JsonFileStore<R> {
    fn backup_path(&self) -> PathBuf {
        self.sibling_path(".corrupt")
    }

    fn read_raw(&self) -> Result<RawContent> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(RawContent::Empty),
            Err(e) => {
                return Err(e).context(format!("Failed to read store {}", self.path.display()));
            }
        };

        if content.trim().is_empty() {
            return Ok(RawContent::Empty);
        }

        Ok(match serde_json::from_str::<Vec<Value>>(&content) {
            Ok(records) => RawContent::Records(records),
            Err(e) => RawContent::Malformed(e),
        })
    }
}

impl<R> RecordStore<R> for JsonFileStore<R>
where
    R: Serialize + DeserializeOwned,
{
    fn load(&self) -> Result<Vec<R>> {
        let raw = match self.read_raw()? {
            RawContent::Empty => return Ok(Vec::new()),
            RawContent::Malformed(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "store file is corrupt, treating it as an empty list"
                );
                return Ok(Vec::new());
            }
            RawContent::Records(raw) => raw,
        };

        let mut records = Vec::with_capacity(raw.len());
        for (index, value) in raw.into_iter().enumerate() {
            match serde_json::from_value::<R>(value) {
                Ok(record) => records.push(record),
                Err(e) => tracing::warn!(
                    path = %self.path.display(),
                    index,
                    error = %e,
                    "skipping a record that cannot be decoded, it stays on disk"
                ),
            }
        }
        Ok(records)
    }

    /// 覆盖写入；旧文件中无法解码的记录原样保留在最前面，
    /// 无法解析的旧文件先备份为 `<name>.corrupt`
    fn save(&self, records: &[R]) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let mut values: Vec<Value> = match self.read_raw()? {
            RawContent::Empty => Vec::new(),
            RawContent::Malformed(_) => {
                let backup = self.backup_path();
                fs::copy(&self.path, &backup)
                    .context(format!("Failed to back up corrupt store to {}", backup.display()))?;
                tracing::warn!(backup = %backup.display(), "corrupt store backed up before overwrite");
                Vec::new()
            }
            RawContent::Records(raw) => raw
                .into_iter()
                .filter(|value| serde_json::from_value::<R>(value.clone()).is_err())
                .collect(),
        };
        for record in records {
            values.push(serde_json::to_value(record)?);
        }

        let content = serde_json::to_string_pretty(&values)?;
        let temp_path = self.temp_path();
        fs::write(&temp_path, content)
            .context(format!("Failed to write {}", temp_path.display()))?;
        fs::rename(&temp_path, &self.path)
            .context(format!("Failed to replace store {}", self.path.display()))?;
        Ok(())
    }
}

/// 内存存储，主要用于测试
pub struct MemoryStore<R> {
    records: Mutex<Vec<R>>,
}

impl<R> MemoryStore<R> {
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    pub fn with_records(records: Vec<R>) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }
}

impl<R> Default for MemoryStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> RecordStore<R> for MemoryStore<R>
where
    R: Clone + Send,
{
    fn load(&self) -> Result<Vec<R>> {
        let records = self
            .records
            .lock()
            .map_err(|_| anyhow::anyhow!("memory store lock poisoned"))?;
        Ok(records.clone())
    }

    fn save(&self, records: &[R]) -> Result<()> {
        let mut guard = self
            .records
            .lock()
            .map_err(|_| anyhow::anyhow!("memory store lock poisoned"))?;
        *guard = records.to_vec();
        Ok(())
    }
}

/// 确保目录与数据库文件存在
pub fn ensure_layout(config: &Config) -> Result<()> {
    for dir in [&config.db_dir, &config.products_dir, &config.templates_dir] {
        fs::create_dir_all(dir).context(format!("Failed to create {}", dir.display()))?;
    }

    for path in [config.signals_path(), config.products_path()] {
        if !path.exists() {
            fs::write(&path, "[]").context(format!("Failed to seed {}", path.display()))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests;
