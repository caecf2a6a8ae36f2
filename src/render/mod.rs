//! 产物渲染：CSV导出、HTML模板、PDF转换与原始JSON

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::catalog::{ProductType, dispatch};
use crate::config::Config;
use crate::types::{ArtifactKind, ArtifactSet, Payload};

pub mod csv;
pub mod pdf;
pub mod template;

pub use pdf::{CommandPdfRenderer, PdfRenderer};
pub use template::TemplateEngine;

/// 渲染能力：尽力而为，失败的产物类型直接缺席
pub trait Renderer: Send + Sync {
    fn render(&self, product_type: ProductType, payload: &Payload, out_dir: &Path) -> ArtifactSet;
}

/// 默认渲染器
pub struct ArtifactRenderer {
    templates: TemplateEngine,
    pdf: Option<Box<dyn PdfRenderer>>,
}

impl ArtifactRenderer {
    pub fn new(templates: TemplateEngine, pdf: Option<Box<dyn PdfRenderer>>) -> Self {
        Self { templates, pdf }
    }

    pub fn from_config(config: &Config) -> Self {
        let pdf = CommandPdfRenderer::from_config(&config.pdf)
            .map(|renderer| Box::new(renderer) as Box<dyn PdfRenderer>);
        Self::new(TemplateEngine::new(config.templates_dir.clone()), pdf)
    }

    fn write_csv(&self, product_type: ProductType, payload: &Payload, out_dir: &Path) -> Result<Option<PathBuf>> {
        let Some(table) = product_type.csv_table() else {
            return Ok(None);
        };
        let path = out_dir.join(format!("{}.csv", product_type));
        fs::write(&path, csv::to_csv(&table, payload)?)
            .context(format!("Failed to write {}", path.display()))?;
        Ok(Some(path))
    }

    fn write_html(&self, product_type: ProductType, payload: &Payload, out_dir: &Path) -> Result<PathBuf> {
        let html = self.templates.render(dispatch(product_type).template, payload)?;
        let path = out_dir.join(format!("{}.html", product_type));
        fs::write(&path, html).context(format!("Failed to write {}", path.display()))?;
        Ok(path)
    }

    fn write_json(&self, product_type: ProductType, payload: &Payload, out_dir: &Path) -> Result<PathBuf> {
        let path = out_dir.join(format!("{}_data.json", product_type));
        fs::write(&path, serde_json::to_string_pretty(payload)?)
            .context(format!("Failed to write {}", path.display()))?;
        Ok(path)
    }
}

impl Renderer for ArtifactRenderer {
    fn render(&self, product_type: ProductType, payload: &Payload, out_dir: &Path) -> ArtifactSet {
        let mut files = ArtifactSet::new();

        match self.write_csv(product_type, payload, out_dir) {
            Ok(Some(path)) => {
                println!("✅ CSV saved: {}", path.display());
                files.insert(ArtifactKind::Csv, path);
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(product_type = %product_type, error = %format!("{:#}", e), "CSV export failed"),
        }

        let html_path = match self.write_html(product_type, payload, out_dir) {
            Ok(path) => {
                println!("✅ HTML saved: {}", path.display());
                files.insert(ArtifactKind::Html, path.clone());
                Some(path)
            }
            Err(e) => {
                tracing::warn!(product_type = %product_type, error = %format!("{:#}", e), "HTML render failed");
                None
            }
        };

        if let (Some(html_path), Some(pdf)) = (html_path, self.pdf.as_ref()) {
            let pdf_path = out_dir.join(format!("{}.pdf", product_type));
            match pdf.render_pdf(&html_path, &pdf_path) {
                Ok(()) => {
                    println!("✅ PDF generated: {}", pdf_path.display());
                    files.insert(ArtifactKind::Pdf, pdf_path);
                }
                Err(e) => {
                    tracing::warn!(product_type = %product_type, error = %format!("{:#}", e), "PDF generation failed")
                }
            }
        }

        match self.write_json(product_type, payload, out_dir) {
            Ok(path) => {
                println!("✅ JSON data saved: {}", path.display());
                files.insert(ArtifactKind::Json, path);
            }
            Err(e) => tracing::warn!(product_type = %product_type, error = %format!("{:#}", e), "JSON dump failed"),
        }

        files
    }
}
