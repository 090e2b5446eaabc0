//! # 示例应用程序
//!
//! 演示能力注册与解析：从配置文件加载存储配置，按名称解析键值存储能力并执行命令。

mod stores;

use anyhow::Context;
use clap::{Parser, Subcommand};
use config_abstractions::FnValidator;
use di_abstractions::{CapabilityRegistry, CapabilityResolver, RegistrationPolicy};
use infrastructure_common::{CancellationToken, Execute, ValidationError};
use infrastructure_composition::{CapabilityHost, LoggingConfig};
use std::path::PathBuf;
use stores::{FileStoreCfg, KeyValue, KvCommand, KvOp, MemoryStoreCfg};
use tracing::{info, warn};

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "demo-app")]
#[command(about = "能力注册与解析示例")]
struct Args {
    /// 配置文件路径
    #[arg(short, long, default_value = "demo-app/config/capabilities.toml")]
    config: PathBuf,

    /// 日志级别（覆盖配置文件的 host.logging）
    #[arg(long)]
    log_level: Option<String>,

    /// 拒绝与已绑定形状冲突的注册
    #[arg(long)]
    strict: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 列出配置和绑定
    List,
    /// 读取键
    Get {
        /// 配置名称
        store: String,
        /// 键
        key: String,
    },
    /// 写入键
    Put {
        /// 配置名称
        store: String,
        /// 键
        key: String,
        /// 值
        value: String,
    },
    /// 健康检查
    Health,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let host = build_host(&args)?;

    match args.command {
        Command::List => list(&host),
        Command::Get { store, key } => {
            let value = run(&host, &store, KvOp::Get { key: key.clone() }).await?;
            match value {
                Some(value) => println!("{}", value),
                None => println!("{} 中不存在键 {}", store, key),
            }
        }
        Command::Put { store, key, value } => {
            let previous = run(&host, &store, KvOp::Put { key, value }).await?;
            if let Some(previous) = previous {
                info!("覆盖旧值: {}", previous);
            }
        }
        Command::Health => {
            let report = host.health_report().await;
            for entry in &report.entries {
                println!("{:<16} {:?}", entry.name, entry.status);
            }
            println!("overall: {:?}", report.overall());
        }
    }

    Ok(())
}

/// 构建能力宿主
fn build_host(args: &Args) -> anyhow::Result<CapabilityHost> {
    let mut builder = CapabilityHost::builder()
        .register_kind::<FileStoreCfg>("file")
        .register_kind::<MemoryStoreCfg>("memory")
        .add_validator::<MemoryStoreCfg, _>(FnValidator::new("capacity", |cfg: &MemoryStoreCfg| {
            if cfg.capacity == 0 {
                Err(vec![ValidationError::invalid_field_value(
                    "capacity",
                    "0",
                    "容量必须大于 0",
                )])
            } else {
                Ok(())
            }
        }))
        .add_config_env_vars("DEMO")
        .scan_module(format!("{}::stores", module_path!()));

    if args.config.exists() {
        builder = builder.add_config_file(&args.config)?;
    } else {
        warn!("配置文件不存在: {}", args.config.display());
    }

    if let Some(level) = &args.log_level {
        let level = level
            .parse::<tracing::Level>()
            .with_context(|| format!("无效的日志级别: {}", level))?;
        builder = builder.with_logging(LoggingConfig {
            level,
            ..LoggingConfig::default()
        });
    }

    if args.strict {
        builder = builder.with_policy(RegistrationPolicy::Strict);
    }

    let host = builder.build()?;
    for message in host.load_report().failure_messages() {
        message.log();
    }
    Ok(host)
}

/// 列出配置和绑定
fn list(host: &CapabilityHost) {
    println!("configurations:");
    for name in host.configuration_names() {
        println!("  {}", name);
    }

    println!("bindings:");
    for binding in host.registry().bindings() {
        println!("  #{} {}", binding.sequence, binding.descriptor);
    }
}

/// 按配置名称解析存储并执行操作
async fn run(host: &CapabilityHost, store: &str, op: KvOp) -> anyhow::Result<Option<String>> {
    let resolved = host.resolve::<dyn KeyValue, _>(store).into_result()?;
    let command = KvCommand {
        configuration: resolved.configuration,
        op,
    };

    let value = resolved
        .capability
        .execute(command, CancellationToken::new())
        .await
        .into_result()?;
    Ok(value)
}
