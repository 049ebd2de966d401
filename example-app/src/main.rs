//! # 示例应用程序
//!
//! 演示如何使用 Lorn DI 绑定组件、验证依赖图并从上下文中解析对象图

use anyhow::{Context as _, Result};
use clap::Parser;
use component_macros::Injectable;
use di_abstractions::{ComponentRegistry, ContextExt, Provider, Qualifier, ScopeKind};
use di_impl::ContextConfig;
use infrastructure_common::ContainerConfig;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "example-app")]
#[command(about = "Lorn DI 示例应用")]
struct Args {
    /// 配置文件路径
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 以 debug 级别记录每次解析
    #[arg(long)]
    trace: bool,

    /// 日志过滤表达式
    #[arg(long, default_value = "info")]
    log_level: String,
}

/// 广告库存仓储
pub trait InventoryRepository: Send + Sync {
    fn available(&self, slot: &str) -> usize;
}

/// 投放服务
pub trait DeliveryService: Send + Sync {
    fn deliver(&self, slot: &str) -> Result<String>;
}

/// 审计器
pub trait Auditor: Send + Sync {
    fn audit(&self, message: &str);
}

/// 内存仓储
#[derive(Injectable)]
#[component(singleton, implements = dyn InventoryRepository)]
struct InMemoryRepository {
    #[inject]
    #[named("region")]
    region: Arc<String>,
}

impl InventoryRepository for InMemoryRepository {
    fn available(&self, slot: &str) -> usize {
        slot.len() + self.region.len()
    }
}

/// 投放服务实现，经由提供者延迟取得审计器
#[derive(Injectable)]
#[component(implements = dyn DeliveryService)]
struct DefaultDeliveryService {
    #[inject]
    repository: Arc<dyn InventoryRepository>,
    #[inject]
    auditor: Provider<dyn Auditor>,
}

impl DeliveryService for DefaultDeliveryService {
    fn deliver(&self, slot: &str) -> Result<String> {
        let available = self.repository.available(slot);
        self.auditor.get()?.audit(slot);
        Ok(format!("{slot}: 可用库存 {available}"))
    }
}

static AUDITS: AtomicUsize = AtomicUsize::new(0);

/// 审计器，配置启用池化作用域时按池化绑定
#[derive(Injectable)]
#[component(implements = dyn Auditor)]
struct LoggingAuditor {
    #[inject]
    #[named("region")]
    region: Arc<String>,
}

impl Auditor for LoggingAuditor {
    fn audit(&self, message: &str) {
        let count = AUDITS.fetch_add(1, Ordering::SeqCst) + 1;
        info!("审计 #{} [{}]: {}", count, self.region, message);
    }
}

/// 按容器配置绑定示例对象图
fn build_registry(container_config: &ContainerConfig, trace: bool) -> Result<ContextConfig> {
    let mut config = ContextConfig::from_config(container_config)?
        .with_trace_resolution(trace || container_config.trace_resolution);

    config.bind_instance_qualified(
        Arc::new(String::from("cn-east")),
        &[Qualifier::named("region")],
    );
    config
        .bind_type::<dyn InventoryRepository, InMemoryRepository>()?
        .bind_type::<dyn DeliveryService, DefaultDeliveryService>()?;

    if container_config.register_pooled_scope {
        config.bind_type_with::<dyn Auditor, LoggingAuditor>(&[ScopeKind::pooled().into()])?;
    } else {
        info!("池化作用域未启用，审计器按默认作用域绑定");
        config.bind_type::<dyn Auditor, LoggingAuditor>()?;
    }

    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&args.log_level))
        .init();

    info!("启动 Lorn DI 示例应用");

    let container_config =
        ContainerConfig::load(args.config.as_deref()).context("加载容器配置失败")?;

    let config = build_registry(&container_config, args.trace)?;
    let context = config.get_context().context("生成上下文失败")?;

    let delivery: Arc<dyn DeliveryService> =
        context.resolve()?.context("投放服务未绑定")?;

    for slot in ["banner", "splash", "feed"] {
        info!("{}", delivery.deliver(slot)?);
    }

    info!("应用已完成，共审计 {} 次", AUDITS.load(Ordering::SeqCst));
    Ok(())
}
