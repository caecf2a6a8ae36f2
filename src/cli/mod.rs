use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::{Config, DEFAULT_CONFIG_FILE, LLMProvider};

/// Autopreneur - 由Rust与AI驱动的数字产品工坊
#[derive(Parser, Debug)]
#[command(name = "autopreneur")]
#[command(
    about = "Researches market topics into scored signals and assembles the best ones into digital products (HTML, PDF, CSV and JSON)."
)]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// 配置文件路径
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// 是否启用详细日志
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// LLM Provider (openai, deepseek, anthropic, ollama)
    #[arg(long, global = true)]
    pub llm_provider: Option<String>,

    /// LLM API KEY
    #[arg(long, global = true)]
    pub llm_api_key: Option<String>,

    /// LLM API基地址
    #[arg(long, global = true)]
    pub llm_api_base_url: Option<String>,

    /// 模型名称
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// 单次模型调用超时（秒）
    #[arg(long, global = true)]
    pub timeout_seconds: Option<u64>,

    /// 评分无法解析时的兜底分数
    #[arg(long, global = true, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub score_fallback: Option<u8>,

    /// 不生成PDF
    #[arg(long, global = true)]
    pub no_pdf: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// 调研主题并保存为新信号
    Scan {
        /// 调研主题，例如 "kalender konten ramadan untuk toko muslim"
        #[arg(required = true, num_args = 1..)]
        topic: Vec<String>,
    },

    /// 选择一个 `new` 信号并组装成产品
    Generate {
        /// 产品类型，默认 caption_bank（同时导出CSV）
        #[arg(short = 't', long, default_value = "caption_bank")]
        product_type: String,

        /// 按 `list signals` 中 `new` 信号的序号（1起始）手动选择；缺省时自动选择最高分
        #[arg(short, long)]
        pick: Option<usize>,
    },

    /// 列出信号或产品
    List {
        #[arg(value_enum, default_value_t = ListTarget::Signals)]
        target: ListTarget,
    },

    /// 各状态数量统计
    Status,

    /// 查看信号的调研报告
    Report { signal_id: String },

    /// 列出所有产品类型与套装
    Types,

    /// 把 `failed` 信号恢复为 `new`
    Reset { signal_id: String },

    /// 检查数据库一致性
    Check,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListTarget {
    Signals,
    Products,
}

impl Args {
    /// 将CLI参数转换为配置
    pub fn into_config(self) -> Result<(Config, Command)> {
        let mut config = match &self.config {
            // 显式指定的配置文件必须可读
            Some(config_path) => Config::from_file(config_path)
                .context(format!("Failed to load config file {}", config_path.display()))?,
            None => {
                let default_config_path = std::env::current_dir()
                    .unwrap_or_else(|_| PathBuf::from("."))
                    .join(DEFAULT_CONFIG_FILE);

                if default_config_path.exists() {
                    Config::from_file(&default_config_path).context(format!(
                        "Failed to load default config file {}",
                        default_config_path.display()
                    ))?
                } else {
                    Config::default()
                }
            }
        };

        // 覆盖LLM配置
        if let Some(provider_str) = self.llm_provider {
            match provider_str.parse::<LLMProvider>() {
                Ok(provider) => config.llm.provider = provider,
                Err(_) => eprintln!(
                    "⚠️ Warning: unknown provider {}, keeping {}",
                    provider_str, config.llm.provider
                ),
            }
        }
        if let Some(llm_api_base_url) = self.llm_api_base_url {
            config.llm.api_base_url = llm_api_base_url;
        }
        if let Some(llm_api_key) = self.llm_api_key {
            config.llm.api_key = llm_api_key;
        }
        if let Some(model) = self.model {
            config.llm.model = model;
        }
        if let Some(timeout_seconds) = self.timeout_seconds {
            config.llm.timeout_seconds = timeout_seconds;
        }

        if let Some(score_fallback) = self.score_fallback {
            config.score_fallback = score_fallback;
        }
        if self.no_pdf {
            config.pdf.enabled = false;
        }
        config.verbose = config.verbose || self.verbose;

        Ok((config, self.command))
    }
}
