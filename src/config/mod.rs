use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// 默认配置文件名
pub const DEFAULT_CONFIG_FILE: &str = "autopreneur.toml";

/// LLM Provider类型
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub enum LLMProvider {
    #[serde(rename = "openai")]
    #[default]
    OpenAI,
    #[serde(rename = "deepseek")]
    DeepSeek,
    #[serde(rename = "anthropic")]
    Anthropic,
    #[serde(rename = "ollama")]
    Ollama,
}

impl std::fmt::Display for LLMProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LLMProvider::OpenAI => write!(f, "openai"),
            LLMProvider::DeepSeek => write!(f, "deepseek"),
            LLMProvider::Anthropic => write!(f, "anthropic"),
            LLMProvider::Ollama => write!(f, "ollama"),
        }
    }
}

impl std::str::FromStr for LLMProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(LLMProvider::OpenAI),
            "deepseek" => Ok(LLMProvider::DeepSeek),
            "anthropic" => Ok(LLMProvider::Anthropic),
            "ollama" => Ok(LLMProvider::Ollama),
            _ => Err(format!("Unknown provider: {}", s)),
        }
    }
}

/// 应用程序配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct Config {
    /// 信号与产品数据库目录（signals.json / products.json / 调研报告）
    pub db_dir: PathBuf,

    /// 产品产物输出目录，每个产品一个子目录
    pub products_dir: PathBuf,

    /// HTML模板目录
    pub templates_dir: PathBuf,

    /// 评分结果无法解析时使用的兜底分数
    pub score_fallback: u8,

    /// LLM模型配置
    pub llm: LLMConfig,

    /// PDF渲染配置
    pub pdf: PdfConfig,

    /// 是否启用详细日志
    pub verbose: bool,
}

/// LLM模型配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct LLMConfig {
    /// LLM Provider类型
    pub provider: LLMProvider,

    /// LLM API KEY
    pub api_key: String,

    /// LLM API基地址
    pub api_base_url: String,

    /// 模型名称
    pub model: String,

    /// 最大tokens
    pub max_tokens: u32,

    /// 评分温度
    pub temperature: f64,

    /// 调研温度
    pub research_temperature: f64,

    /// 内容生成温度
    pub content_temperature: f64,

    /// 重试次数
    pub retry_attempts: u32,

    /// 重试间隔（毫秒）
    pub retry_delay_ms: u64,

    /// 单次调用超时时间（秒）
    pub timeout_seconds: u64,
}

/// PDF渲染配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct PdfConfig {
    /// 是否生成PDF
    pub enabled: bool,

    /// HTML转PDF的外部命令
    pub command: String,

    /// 追加在输入/输出路径之前的参数
    pub args: Vec<String>,
}

impl Config {
    /// 从文件加载配置
    pub fn from_file(path: &Path) -> Result<Self> {
        let mut file =
            File::open(path).context(format!("Failed to open config file: {:?}", path))?;
        let mut content = String::new();
        file.read_to_string(&mut content)
            .context("Failed to read config file")?;

        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// signals.json 路径
    pub fn signals_path(&self) -> PathBuf {
        self.db_dir.join("signals.json")
    }

    /// products.json 路径
    pub fn products_path(&self) -> PathBuf {
        self.db_dir.join("products.json")
    }

    /// 某个信号的调研报告路径
    pub fn report_path(&self, signal_id: &str) -> PathBuf {
        self.db_dir.join(format!("report_{}.md", signal_id))
    }

    /// 某个产品的输出目录
    pub fn product_dir(&self, product_id: &str) -> PathBuf {
        self.products_dir.join(product_id)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_dir: PathBuf::from("db"),
            products_dir: PathBuf::from("products"),
            templates_dir: PathBuf::from("templates"),
            score_fallback: 50,
            llm: LLMConfig::default(),
            pdf: PdfConfig::default(),
            verbose: false,
        }
    }
}

impl Default for LLMConfig {
    fn default() -> Self {
        let api_key = std::env::var("AUTOPRENEUR_LLM_API_KEY")
            .or_else(|_| std::env::var("OPENAI_API_KEY"))
            .unwrap_or_default();

        Self {
            provider: LLMProvider::default(),
            api_key,
            api_base_url: String::from("https://api.openai.com/v1"),
            model: String::from("gpt-4o-mini"),
            max_tokens: 8192,
            temperature: 0.0,
            research_temperature: 0.7,
            content_temperature: 0.8,
            retry_attempts: 3,
            retry_delay_ms: 2000,
            timeout_seconds: 120,
        }
    }
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            command: String::from("wkhtmltopdf"),
            args: vec![String::from("--quiet"), String::from("--encoding"), String::from("utf-8")],
        }
    }
}
