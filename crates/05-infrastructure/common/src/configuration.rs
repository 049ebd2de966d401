//! 容器配置
//!
//! 通过 `config` crate 从可选配置文件与 `LORN_DI_` 前缀的环境变量加载。

use crate::errors::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::Path;
use tracing::{debug, error};

/// 环境变量前缀
pub const ENV_PREFIX: &str = "LORN_DI";

/// 默认池化容量
pub const DEFAULT_POOL_CAPACITY: usize = 2;

/// 容器配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    /// 池化作用域中每个绑定最多持有的实例数量
    pub pool_capacity: usize,
    /// 是否注册池化作用域
    pub register_pooled_scope: bool,
    /// 是否以 debug 级别记录每次解析
    pub trace_resolution: bool,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            pool_capacity: DEFAULT_POOL_CAPACITY,
            register_pooled_scope: false,
            trace_resolution: false,
        }
    }
}

impl ContainerConfig {
    /// 从配置文件（可选）和环境变量加载配置
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            debug!("加载容器配置文件: {}", path.display());
            builder = builder.add_source(config::File::from(path).required(false));
        }

        let settings = builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()
            .map_err(|e| {
                error!("配置构建失败: {}", e);
                ConfigError::from(e)
            })?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        debug!("容器配置加载完成: {:?}", config);
        Ok(config)
    }

    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        self.pool_capacity().map(|_| ())
    }

    /// 池化容量
    pub fn pool_capacity(&self) -> ConfigResult<NonZeroUsize> {
        NonZeroUsize::new(self.pool_capacity).ok_or_else(|| ConfigError::ValidationError {
            message: "pool_capacity 必须大于 0".to_string(),
        })
    }
}
