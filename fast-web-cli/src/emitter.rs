//! Route table emitter.
//!
//! Turns a [`BuildContext`] into the source of a `load_routers` function that
//! registers every route on an axum `Router`. Output depends only on the
//! context, so unchanged sources always produce byte-identical files.

use crate::error::{CliResult, GenerateError};
use crate::parser::RouteProperties;
use crate::resolver::BuildContext;
use std::collections::BTreeSet;
use std::fmt::Write as _;

/// Marker line at the top of every generated file.
pub const GENERATED_HEADER: &str = "//! Code generated by fast-wgen. DO NOT EDIT.";

/// Generated source plus counts for the summary line.
#[derive(Debug, Clone)]
pub struct GeneratedOutput {
    /// Complete Rust source.
    pub content: String,

    /// Number of registered routes.
    pub route_count: usize,

    /// Number of shared limiters.
    pub limiter_count: usize,

    /// Number of imported handler modules.
    pub module_count: usize,
}

/// Writes the route table.
#[derive(Debug, Clone)]
pub struct CodeEmitter {
    /// Wrap handlers with `fast_web::wrap` instead of registering them as-is.
    wrap: bool,
}

impl CodeEmitter {
    /// Create an emitter; `wrap` selects wrap mode over bare mode.
    pub fn new(wrap: bool) -> Self {
        Self { wrap }
    }

    /// Emit the route table for `ctx`.
    pub fn emit(&self, ctx: &BuildContext) -> CliResult<GeneratedOutput> {
        let modules = self.modules(&ctx.routes)?;
        let limiters = limiter_idents(ctx)?;

        let mut routing = BTreeSet::new();
        let mut items = BTreeSet::new();
        let mut registrations = Vec::with_capacity(ctx.routes.len());

        for route in &ctx.routes {
            let function = routing_fn(&route.http_method).ok_or_else(|| {
                GenerateError::UnsupportedMethod {
                    method: route.http_method.clone(),
                    path: route.path.clone(),
                }
            })?;
            routing.insert(function);

            let alias = module_alias(&route.package_path);
            let handler = self.handler_expr(route, &alias, &mut items);

            let layer = match (&route.limit.name, route.limit.num, route.limit.cap) {
                (Some(name), _, _) => {
                    let ident = limiters
                        .iter()
                        .find(|(group, _)| group == name)
                        .map(|(_, ident)| ident.as_str())
                        .unwrap_or_default();
                    format!(".route_layer({ident}.layer())")
                }
                (None, Some(num), Some(cap)) => {
                    items.insert("RateLimiter");
                    format!(".route_layer(RateLimiter::new({num}, {cap}).layer())")
                }
                _ => String::new(),
            };

            let path = route_path(&route.path).ok_or_else(|| GenerateError::UnnamedCapture {
                path: route.path.clone(),
            })?;
            registrations.push(format!(
                "    let router = router.route(\"{path}\", {function}({handler}){layer});"
            ));
        }
        if !limiters.is_empty() {
            items.insert("RateLimiter");
        }

        let mut out = String::new();
        let _ = writeln!(out, "{GENERATED_HEADER}");
        let _ = writeln!(out, "#![allow(non_snake_case)]");
        let _ = writeln!(out);
        let _ = writeln!(out, "use axum::Router;");
        if !routing.is_empty() {
            let _ = writeln!(out, "use axum::routing::{};", import_group(&routing));
        }
        if !items.is_empty() {
            let _ = writeln!(out, "use fast_web::{};", import_group(&items));
        }
        if !modules.is_empty() {
            let _ = writeln!(out);
            for (module, alias) in &modules {
                let _ = writeln!(out, "use {module} as {alias};");
            }
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "/// Register every annotated route on `router`.");
        let _ = writeln!(out, "pub fn load_routers<S>(router: Router<S>) -> Router<S>");
        let _ = writeln!(out, "where");
        let _ = writeln!(out, "    S: Clone + Send + Sync + 'static,");
        let _ = writeln!(out, "{{");
        for (name, ident) in &limiters {
            if let Some(group) = ctx.limiter(name) {
                let _ = writeln!(
                    out,
                    "    let {ident} = RateLimiter::new({}, {});",
                    group.num, group.cap
                );
            }
        }
        if !limiters.is_empty() && !registrations.is_empty() {
            let _ = writeln!(out);
        }
        for line in &registrations {
            let _ = writeln!(out, "{line}");
        }
        let _ = writeln!(out, "    router");
        let _ = writeln!(out, "}}");

        Ok(GeneratedOutput {
            content: out,
            route_count: ctx.routes.len(),
            limiter_count: limiters.len(),
            module_count: modules.len(),
        })
    }

    /// Distinct module paths with their aliases, first-seen order.
    fn modules(&self, routes: &[RouteProperties]) -> CliResult<Vec<(String, String)>> {
        let mut modules: Vec<(String, String)> = Vec::new();
        for route in routes {
            if modules.iter().any(|(m, _)| *m == route.package_path) {
                continue;
            }
            let alias = module_alias(&route.package_path);
            if let Some((first, _)) = modules.iter().find(|(_, a)| *a == alias) {
                return Err(GenerateError::AliasConflict {
                    first: first.clone(),
                    second: route.package_path.clone(),
                    alias,
                }
                .into());
            }
            modules.push((route.package_path.clone(), alias));
        }
        Ok(modules)
    }

    fn handler_expr(
        &self,
        route: &RouteProperties,
        alias: &str,
        items: &mut BTreeSet<&'static str>,
    ) -> String {
        let target = match &route.receiver_name {
            Some(receiver) => format!("{alias}::{receiver}::{}", route.method_name),
            None => format!("{alias}::{}", route.method_name),
        };
        if !self.wrap {
            return target;
        }

        if route.descriptor.receiver.is_some() {
            items.insert("method");
            items.insert("wrap");
            format!("wrap(method({target}))")
        } else if route.descriptor.is_plain() {
            items.insert("plain");
            format!("plain({target})")
        } else {
            items.insert("wrap");
            format!("wrap({target})")
        }
    }
}

/// Import alias for a module path: split on `::`, `/` and `.`, upper-case
/// each segment's first letter, concatenate.
pub fn module_alias(path: &str) -> String {
    path.split("::")
        .flat_map(|s| s.split(['/', '.']))
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect()
}

/// Rewrite `:name` segments into axum's `{name}` captures. `None` when a
/// segment is `:` or `{}` alone.
pub fn route_path(path: &str) -> Option<String> {
    let segments = path
        .split('/')
        .map(|segment| match segment.strip_prefix(':') {
            Some("") => None,
            Some(name) => Some(format!("{{{name}}}")),
            None if segment == "{}" => None,
            None => Some(segment.to_string()),
        })
        .collect::<Option<Vec<_>>>()?;
    Some(segments.join("/"))
}

/// Local variable name for a shared limiter.
pub fn limiter_ident(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("limit_{sanitized}")
}

fn limiter_idents(ctx: &BuildContext) -> CliResult<Vec<(String, String)>> {
    let mut idents: Vec<(String, String)> = Vec::with_capacity(ctx.limiters.len());
    for group in &ctx.limiters {
        let ident = limiter_ident(&group.name);
        if let Some((first, _)) = idents.iter().find(|(_, i)| *i == ident) {
            return Err(GenerateError::LimiterConflict {
                first: first.clone(),
                second: group.name.clone(),
                ident,
            }
            .into());
        }
        idents.push((group.name.clone(), ident));
    }
    Ok(idents)
}

/// axum routing function for an upper-cased HTTP method.
pub fn routing_fn(method: &str) -> Option<&'static str> {
    Some(match method {
        "GET" => "get",
        "POST" => "post",
        "PUT" => "put",
        "DELETE" => "delete",
        "PATCH" => "patch",
        "HEAD" => "head",
        "OPTIONS" => "options",
        "TRACE" => "trace",
        "ANY" => "any",
        _ => return None,
    })
}

fn import_group(names: &BTreeSet<&str>) -> String {
    if names.len() == 1 {
        names.iter().map(|s| s.to_string()).collect()
    } else {
        let joined: Vec<&str> = names.iter().copied().collect();
        format!("{{{}}}", joined.join(", "))
    }
}
