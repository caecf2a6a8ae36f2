//! 子命令执行：把核心流程的结果打印到终端

use anyhow::{Result, bail};
use serde_json::json;

use crate::catalog::{ProductType, Suite};
use crate::cli::{Command, ListTarget};
use crate::config::Config;
use crate::context::Workshop;
use crate::lifecycle::{SelectionMode, pending_signals};
use crate::llm::client::LLMClient;
use crate::render::template::format_number;
use crate::types::SignalStatus;

/// 执行一个子命令
pub async fn run(config: Config, command: Command) -> Result<()> {
    match command {
        Command::Scan { topic } => scan(config, &topic.join(" ")).await,
        Command::Generate { product_type, pick } => generate(config, &product_type, pick).await,
        Command::List { target } => list(&Workshop::new(config)?, target),
        Command::Status => status(&Workshop::new(config)?),
        Command::Report { signal_id } => {
            let report = Workshop::new(config)?.read_report(&signal_id)?;
            println!("{}", report);
            Ok(())
        }
        Command::Types => {
            types();
            Ok(())
        }
        Command::Reset { signal_id } => {
            let signal = Workshop::new(config)?.reset_signal(&signal_id)?;
            println!("♻️ Signal {} is `{}` again", signal.id, signal.status);
            Ok(())
        }
        Command::Check => check(&Workshop::new(config)?),
    }
}

/// 启动时检查模型连接，再创建工作台
async fn connected_workshop(config: Config) -> Result<Workshop> {
    let llm_client = LLMClient::new(config.llm.clone())?;
    llm_client.check_connection().await?;
    Ok(Workshop::with_llm(config, llm_client))
}

async fn scan(config: Config, topic: &str) -> Result<()> {
    let workshop = connected_workshop(config).await?;

    println!("🔍 Researching \"{}\"...", topic.trim());
    let signal = workshop.create_signal(topic).await?;

    println!("✅ Signal {} saved with score {}/100", signal.id, signal.score);
    println!("   Report: {}", signal.report_file.display());
    Ok(())
}

async fn generate(config: Config, product_type: &str, pick: Option<usize>) -> Result<()> {
    // 先校验输入，不触发任何模型调用
    let product_type: ProductType = product_type.parse()?;
    let mode = pick.map_or(SelectionMode::Auto, SelectionMode::Manual);

    let llm_client = LLMClient::new(config.llm.clone())?;
    let workshop = Workshop::with_llm(config, llm_client.clone());
    let Some(signal) = workshop.pick_signal(mode)? else {
        println!("💤 No new signals to generate from. Run `autopreneur scan <topic>` first.");
        return Ok(());
    };

    llm_client.check_connection().await?;
    println!(
        "🏗️ Building {} from signal {} ({}/100): {}",
        product_type, signal.id, signal.score, signal.topic
    );
    let product = workshop.assemble_product(&signal.id, product_type).await?;

    println!("✅ Product {} ready: {}", product.id, product.name);
    if product.files.is_empty() {
        println!("⚠️ No artifact could be rendered, see the log for details");
    }
    for (kind, path) in &product.files {
        println!("   {:<4} {}", kind.to_string(), path.display());
    }
    Ok(())
}

fn list(workshop: &Workshop, target: ListTarget) -> Result<()> {
    match target {
        ListTarget::Signals => {
            let signals = workshop.list_signals()?;
            if signals.is_empty() {
                println!("No signals yet.");
                return Ok(());
            }

            // `generate --pick N` 的序号只覆盖 `new` 信号
            let pending: Vec<&str> = pending_signals(&signals).iter().map(|s| s.id.as_str()).collect();
            for signal in &signals {
                let pick = pending
                    .iter()
                    .position(|id| *id == signal.id)
                    .map(|i| format!("[{}]", i + 1))
                    .unwrap_or_default();
                println!(
                    "{:>5} {}  {:>3}  {:<10} {}",
                    pick,
                    signal.id,
                    signal.score,
                    signal.status.to_string(),
                    signal.topic
                );
            }
        }
        ListTarget::Products => {
            let products = workshop.list_products()?;
            if products.is_empty() {
                println!("No products yet.");
                return Ok(());
            }

            for product in &products {
                let product_type = product
                    .product_type
                    .map(|pt| pt.to_string())
                    .unwrap_or_else(|| "-".to_string());
                let kinds: Vec<String> = product.files.keys().map(|kind| kind.to_string()).collect();
                println!(
                    "{}  {:<18} {}  [{}]  <- {}",
                    product.id,
                    product_type,
                    product.name,
                    kinds.join(", "),
                    product.signal_id
                );
            }
        }
    }
    Ok(())
}

fn status(workshop: &Workshop) -> Result<()> {
    let summary = workshop.summary()?;

    println!("📊 Signals:  {}", summary.signals);
    println!("   {:<11} {}", SignalStatus::New.to_string(), summary.new);
    println!("   {:<11} {}", SignalStatus::Generating.to_string(), summary.generating);
    println!("   {:<11} {}", SignalStatus::Generated.to_string(), summary.generated);
    println!("   {:<11} {}", SignalStatus::Failed.to_string(), summary.failed);
    println!("📦 Products: {}", summary.products);
    Ok(())
}

fn types() {
    for suite in Suite::ALL {
        println!(
            "📁 {} ({}) - bundle Rp {}",
            suite.display_name(),
            suite,
            format_number(&json!(suite.bundle_price()))
        );
        for product_type in suite.products() {
            println!("   {}", product_type);
        }
    }
}

fn check(workshop: &Workshop) -> Result<()> {
    let findings = workshop.check()?;
    if findings.is_empty() {
        println!("✅ Signals and products are consistent");
        return Ok(());
    }

    for finding in &findings {
        eprintln!("⚠️ {}", finding);
    }
    bail!("{} problem(s) found", findings.len())
}
