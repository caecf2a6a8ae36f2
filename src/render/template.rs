//! 基于Handlebars的HTML模板渲染

use anyhow::{Context, Result};
use handlebars::{Handlebars, handlebars_helper};
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;

/// 模板文件缺失时使用的通用模板
const FALLBACK_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="id">
<head>
<meta charset="utf-8">
<title>{{name}}</title>
<style>
  body { font-family: "Helvetica Neue", Arial, sans-serif; margin: 2.5em; color: #222; }
  h1 { color: #8b3a1a; margin-bottom: 0.2em; }
  .description { color: #555; font-size: 1.05em; }
  section { margin-top: 1.5em; page-break-inside: avoid; }
  pre { background: #f6f3ef; padding: 1em; white-space: pre-wrap; font-size: 0.85em; }
</style>
</head>
<body>
<h1>{{name}}</h1>
<p class="description">{{description}}</p>
{{#each this}}
{{#unless (is_header @key)}}
<section>
  <h2>{{title_case @key}}</h2>
  <pre>{{json this}}</pre>
</section>
{{/unless}}
{{/each}}
</body>
</html>
"#;

/// 数字千分位格式化（印尼习惯使用 `.`）
pub fn format_number(value: &Value) -> String {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    let Some(number) = number else {
        return match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
    };

    let rounded = number.round();
    let digits = format!("{}", rounded.abs() as u64);
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    if rounded < 0.0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

fn title_case(key: &str) -> String {
    key.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn join_values(values: &Value, separator: &str) -> String {
    match values {
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(separator),
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

handlebars_helper!(number_format: |value: Json| format_number(value));
handlebars_helper!(currency_format: |value: Json| format!("Rp {}", format_number(value)));
handlebars_helper!(join_helper: |values: Json, separator: str| join_values(values, separator));
handlebars_helper!(json_helper: |value: Json| match value {
    Value::String(s) => s.clone(),
    other => serde_json::to_string_pretty(other).unwrap_or_default(),
});
handlebars_helper!(title_case_helper: |key: str| title_case(key));
handlebars_helper!(is_header: |key: str| key == "name" || key == "description");

/// 模板引擎
pub struct TemplateEngine {
    handlebars: Handlebars<'static>,
    templates_dir: PathBuf,
}

impl TemplateEngine {
    pub fn new(templates_dir: impl Into<PathBuf>) -> Self {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(false);
        handlebars.register_helper("number_format", Box::new(number_format));
        handlebars.register_helper("currency_format", Box::new(currency_format));
        handlebars.register_helper("join", Box::new(join_helper));
        handlebars.register_helper("json", Box::new(json_helper));
        handlebars.register_helper("title_case", Box::new(title_case_helper));
        handlebars.register_helper("is_header", Box::new(is_header));

        Self {
            handlebars,
            templates_dir: templates_dir.into(),
        }
    }

    /// 读取模板源码，模板文件不存在时使用通用模板
    fn template_source(&self, template_ref: &str) -> Result<String> {
        let path = self.templates_dir.join(template_ref);
        if path.is_file() {
            return std::fs::read_to_string(&path)
                .context(format!("Failed to read template {}", path.display()));
        }

        tracing::debug!(template = template_ref, "template file not found, using fallback layout");
        Ok(FALLBACK_TEMPLATE.to_string())
    }

    /// 使用模板渲染数据
    pub fn render<T: Serialize>(&self, template_ref: &str, data: &T) -> Result<String> {
        let source = self.template_source(template_ref)?;
        let html = self
            .handlebars
            .render_template(&source, data)
            .context(format!("Failed to render template {}", template_ref))?;
        Ok(html)
    }
}
