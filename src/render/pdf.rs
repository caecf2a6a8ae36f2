use anyhow::{Context, Result, bail};
use std::path::Path;
use std::process::Command;

use crate::config::PdfConfig;

/// HTML转PDF
pub trait PdfRenderer: Send + Sync {
    fn render_pdf(&self, html_path: &Path, pdf_path: &Path) -> Result<()>;
}

/// 调用外部命令（默认 wkhtmltopdf）完成转换
///
/// 调用形式：`<command> <args...> <html_path> <pdf_path>`
pub struct CommandPdfRenderer {
    command: String,
    args: Vec<String>,
}

impl CommandPdfRenderer {
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
        }
    }

    /// 按配置创建，禁用时返回 `None`
    pub fn from_config(config: &PdfConfig) -> Option<Self> {
        if !config.enabled || config.command.trim().is_empty() {
            return None;
        }
        Some(Self::new(config.command.clone(), config.args.clone()))
    }
}

impl PdfRenderer for CommandPdfRenderer {
    fn render_pdf(&self, html_path: &Path, pdf_path: &Path) -> Result<()> {
        let output = Command::new(&self.command)
            .args(&self.args)
            .arg(html_path)
            .arg(pdf_path)
            .output()
            .context(format!("Failed to launch PDF renderer `{}`", self.command))?;

        if !output.status.success() {
            bail!(
                "PDF renderer `{}` exited with {}: {}",
                self.command,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        if !pdf_path.is_file() {
            bail!("PDF renderer `{}` produced no output file", self.command);
        }
        Ok(())
    }
}
