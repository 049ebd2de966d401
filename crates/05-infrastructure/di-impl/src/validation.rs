//! 依赖图验证
//!
//! 以深度优先搜索检查缺失依赖与循环依赖。

use di_abstractions::{DependencyGraph, DependencyGraphValidator};
use infrastructure_common::{ComponentIdentity, DependencyError, DependencyResult};
use std::collections::HashSet;
use tracing::debug;

/// 默认依赖图验证器
///
/// 以完整的组件标识（类型 + 限定符）为键。经由间接包装的依赖只检查是否绑定，
/// 不会沿其继续搜索，因此不参与循环判定。
#[derive(Debug, Default)]
pub struct DefaultDependencyGraphValidator;

impl DependencyGraphValidator for DefaultDependencyGraphValidator {
    fn validate(&self, graph: &DependencyGraph) -> DependencyResult<()> {
        debug!("开始验证依赖图，共 {} 个组件", graph.len());
        let mut validated = HashSet::new();
        let mut visiting = Vec::new();

        // 按名称排序，使同时存在多处错误时报告稳定
        let mut components: Vec<_> = graph.keys().collect();
        components.sort_by_cached_key(|component| component.to_string());

        for component in components {
            self.dfs_check(component, graph, &mut validated, &mut visiting)?;
        }

        Ok(())
    }
}

impl DefaultDependencyGraphValidator {
    fn dfs_check(
        &self,
        current: &ComponentIdentity,
        graph: &DependencyGraph,
        validated: &mut HashSet<ComponentIdentity>,
        visiting: &mut Vec<ComponentIdentity>,
    ) -> DependencyResult<()> {
        if validated.contains(current) {
            return Ok(());
        }

        debug!("检查组件依赖: {}", current);
        visiting.push(current.clone());

        for dependency in graph.get(current).into_iter().flatten() {
            let identity = dependency.component();
            if !graph.contains_key(identity) {
                return Err(DependencyError::DependencyNotFound {
                    component: current.clone(),
                    dependency: identity.clone(),
                });
            }

            if dependency.is_wrapped() {
                continue;
            }

            if let Some(position) = visiting.iter().position(|visited| visited == identity) {
                let mut path = visiting[position..].to_vec();
                path.push(identity.clone());
                return Err(DependencyError::CyclicDependency { path });
            }

            self.dfs_check(identity, graph, validated, visiting)?;
        }

        visiting.pop();
        validated.insert(current.clone());

        Ok(())
    }
}
