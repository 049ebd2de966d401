//! 解析上下文实现

use di_abstractions::{ComponentProvider, Context, DeferredHandle, Resolved};
use infrastructure_common::{ComponentIdentity, ComponentRef, DependencyResult, IndirectionWrapper};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

pub(crate) type ProviderMap = HashMap<ComponentIdentity, Arc<dyn ComponentProvider>>;

/// 解析上下文
///
/// 验证通过后生成的只读视图，可在线程间共享。
/// 延迟句柄持有上下文的克隆，在图生成之后可以任意多次调用。
#[derive(Clone)]
pub struct ContextImpl {
    providers: Arc<ProviderMap>,
    trace_resolution: bool,
}

impl ContextImpl {
    pub(crate) fn new(providers: ProviderMap, trace_resolution: bool) -> Self {
        Self {
            providers: Arc::new(providers),
            trace_resolution,
        }
    }

    /// 组件是否存在
    pub fn contains(&self, identity: &ComponentIdentity) -> bool {
        self.providers.contains_key(identity)
    }

    /// 所有组件标识
    pub fn components(&self) -> Vec<ComponentIdentity> {
        self.providers.keys().cloned().collect()
    }

    fn deferred(&self, provider: &Arc<dyn ComponentProvider>) -> DeferredHandle {
        let context = self.clone();
        let provider = Arc::clone(provider);
        Arc::new(move || provider.get(&context))
    }
}

impl Context for ContextImpl {
    fn get(&self, reference: &ComponentRef) -> DependencyResult<Option<Resolved>> {
        if self.trace_resolution {
            debug!("解析组件: {}", reference);
        }

        if let Some(IndirectionWrapper::Unsupported(wrapper)) = reference.wrapper() {
            debug!("不支持的包装类型: {}, 返回空", wrapper);
            return Ok(None);
        }

        let Some(provider) = self.providers.get(reference.component()) else {
            return Ok(None);
        };

        match reference.wrapper() {
            Some(IndirectionWrapper::Provider) => Ok(Some(Resolved::Deferred(self.deferred(provider)))),
            _ => provider.get(self).map(|instance| Some(Resolved::Instance(instance))),
        }
    }
}

impl fmt::Debug for ContextImpl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextImpl")
            .field("components", &self.providers.len())
            .field("trace_resolution", &self.trace_resolution)
            .finish()
    }
}
