//! Shared rate-limit groups.
//!
//! Routes declaring the same limit name share one limiter. The first
//! declaration of a name seeds its rate and capacity; later ones only fill
//! fields that are still empty.

use crate::error::{CliResult, GenerateError};
use crate::parser::RouteProperties;
use tracing::debug;

/// One shared limiter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LimitGroup {
    /// Name from `@limit`.
    pub name: String,
    /// Tokens added per second.
    pub num: u32,
    /// Bucket capacity.
    pub cap: u32,
}

/// Routes plus the shared limiters they reference, threaded from
/// resolution to emission.
#[derive(Debug, Clone, Default)]
pub struct BuildContext {
    /// Routes in discovery order.
    pub routes: Vec<RouteProperties>,
    /// Named limiters in first-encounter order.
    pub limiters: Vec<LimitGroup>,
}

impl BuildContext {
    /// Look up a limiter by name.
    pub fn limiter(&self, name: &str) -> Option<&LimitGroup> {
        self.limiters.iter().find(|group| group.name == name)
    }
}

/// Merges named `@limit` declarations into [`LimitGroup`]s.
pub struct LimitResolver;

impl LimitResolver {
    /// Group the routes' named limits and build the context.
    pub fn resolve(routes: Vec<RouteProperties>) -> CliResult<BuildContext> {
        let mut merged: Vec<crate::annotation::Limit> = Vec::new();

        for route in &routes {
            let Some(name) = route.limit.name.as_deref() else {
                continue;
            };
            match merged.iter_mut().find(|l| l.name.as_deref() == Some(name)) {
                Some(existing) => existing.fill_from(&route.limit),
                None => merged.push(route.limit.clone()),
            }
        }

        let mut limiters = Vec::with_capacity(merged.len());
        for limit in merged {
            let name = limit.name.unwrap_or_default();
            let Some(num) = limit.num else {
                return Err(GenerateError::LimitWithoutRate { name }.into());
            };
            let cap = limit.cap.unwrap_or(num);
            debug!(limiter = %name, num, cap, "Resolved limiter");
            limiters.push(LimitGroup { name, num, cap });
        }

        Ok(BuildContext { routes, limiters })
    }
}
