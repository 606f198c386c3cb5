//! Rust source parser for extracting annotated routes.
//!
//! This module parses Rust source files using `syn` and extracts every
//! function or inherent method whose doc comment carries an `@router` line.
//! Inline modules are walked recursively unless they are `#[cfg(test)]`.
//!
//! Besides the annotation, each route records a [`HandlerDescriptor`] built
//! from the function signature, so the emitter can tell plain handlers from
//! ones that need wrapping.

use crate::annotation::{Limit, parse_limit, parse_router, tag_line};
use crate::error::{CliResult, ParseError};
use crate::scanner::SourceFile;
use fast_web::{HandlerDescriptor, ParameterSpec, ReturnShape};
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use syn::spanned::Spanned;
use syn::{
    Attribute, Expr, ExprLit, FnArg, GenericArgument, ImplItem, Item, Lit, Meta, PathArguments,
    ReturnType, Signature, Type,
};
use tracing::debug;

/// Source location for error reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    /// File path.
    pub file: PathBuf,

    /// Line number (1-indexed).
    pub line: usize,

    /// Column number (1-indexed).
    pub column: usize,
}

/// One discovered endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteProperties {
    /// HTTP method, upper-cased.
    pub http_method: String,

    /// Route path.
    pub path: String,

    /// Last segment of [`package_path`](Self::package_path).
    pub package_name: String,

    /// Module path of the handler, e.g. `crate::api::user`.
    pub package_path: String,

    /// Function or method name.
    pub method_name: String,

    /// Self type of the enclosing `impl` block, if any.
    pub receiver_name: Option<String>,

    /// Declared rate limit; empty when the handler has no `@limit` line.
    pub limit: Limit,

    /// Shape derived from the signature.
    pub descriptor: HandlerDescriptor,

    /// Where the handler is declared.
    pub location: SourceLocation,
}

impl RouteProperties {
    /// `Type::method` or `function`, for messages.
    pub fn qualified_name(&self) -> String {
        match &self.receiver_name {
            Some(receiver) => format!("{receiver}::{}", self.method_name),
            None => self.method_name.clone(),
        }
    }
}

/// Placeholder names declared with `path_key!(Name = "placeholder")`, per
/// declaring module.
#[derive(Debug, Default, Clone)]
pub struct PathKeys {
    keys: HashMap<String, Vec<(String, String)>>,
}

impl PathKeys {
    /// Record every `path_key!` invocation in `items`, including inline modules.
    pub fn collect(&mut self, items: &[Item], module: &str) {
        for item in items {
            match item {
                Item::Macro(item) if item.mac.path.segments.last().is_some_and(|s| s.ident == "path_key") => {
                    if let Some((name, key)) = parse_path_key(&item.mac.tokens.to_string()) {
                        self.keys
                            .entry(name)
                            .or_default()
                            .push((module.to_string(), key));
                    }
                }
                Item::Mod(item) => {
                    if let Some((_, items)) = &item.content {
                        self.collect(items, &format!("{module}::{}", item.ident));
                    }
                }
                _ => {}
            }
        }
    }

    /// Placeholder for key type `name` used from `module`.
    ///
    /// A declaration in `module` itself wins. Otherwise every declaration of
    /// `name` must agree; `Err` carries the conflicting placeholders. An
    /// undeclared name resolves to itself.
    pub fn resolve(&self, name: &str, module: &str) -> Result<String, Vec<String>> {
        let Some(declared) = self.keys.get(name) else {
            return Ok(name.to_string());
        };
        if let Some((_, key)) = declared.iter().find(|(m, _)| m == module) {
            return Ok(key.clone());
        }
        let mut placeholders: Vec<String> = declared.iter().map(|(_, key)| key.clone()).collect();
        placeholders.sort();
        placeholders.dedup();
        match placeholders.as_slice() {
            [key] => Ok(key.clone()),
            _ => Err(placeholders),
        }
    }
}

fn parse_path_key(tokens: &str) -> Option<(String, String)> {
    let (left, right) = tokens.split_once('=')?;
    let name = left.split_whitespace().last()?.to_string();
    let key = right.trim().trim_matches('"').to_string();
    Some((name, key))
}

/// Parser for Rust source files.
#[derive(Debug)]
pub struct RouteParser {
    /// First segment of every module path.
    crate_prefix: String,
}

impl Default for RouteParser {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteParser {
    /// Create a new parser with default settings.
    pub fn new() -> Self {
        Self {
            crate_prefix: "crate".to_string(),
        }
    }

    /// Set the first segment of generated module paths.
    pub fn with_crate_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.crate_prefix = prefix.into();
        self
    }

    /// Parse all files and extract their routes in file order, then declaration order.
    ///
    /// Stops at the first error.
    pub fn parse_files(&self, sources: &[SourceFile]) -> CliResult<Vec<RouteProperties>> {
        let mut parsed = Vec::with_capacity(sources.len());
        for source in sources {
            let syntax = parse_syntax(&source.content, &source.path)?;
            let module = module_path_for(&source.path, &source.relative_path, &self.crate_prefix);
            parsed.push((source, module, syntax));
        }

        let mut keys = PathKeys::default();
        for (_, module, syntax) in &parsed {
            keys.collect(&syntax.items, module);
        }

        let mut routes = Vec::new();
        for (source, module, syntax) in &parsed {
            let mut visit = Visit {
                file: &source.path,
                keys: &keys,
                routes: Vec::new(),
            };
            visit.items(&syntax.items, module)?;
            routes.extend(visit.routes);
        }
        Ok(routes)
    }

    /// Parse source code of a single file whose module path is `module`.
    pub fn parse_source(
        &self,
        content: &str,
        file_path: &Path,
        module: &str,
    ) -> CliResult<Vec<RouteProperties>> {
        let syntax = parse_syntax(content, file_path)?;
        let mut keys = PathKeys::default();
        keys.collect(&syntax.items, module);

        let mut visit = Visit {
            file: file_path,
            keys: &keys,
            routes: Vec::new(),
        };
        visit.items(&syntax.items, module)?;
        Ok(visit.routes)
    }
}

fn parse_syntax(content: &str, file_path: &Path) -> Result<syn::File, ParseError> {
    syn::parse_file(content).map_err(|e| {
        let start = e.span().start();
        ParseError::syntax(file_path.to_path_buf(), start.line, start.column + 1, e.to_string())
    })
}

struct Visit<'a> {
    file: &'a Path,
    keys: &'a PathKeys,
    routes: Vec<RouteProperties>,
}

impl Visit<'_> {
    fn items(&mut self, items: &[Item], module: &str) -> Result<(), ParseError> {
        for item in items {
            match item {
                Item::Fn(item) => self.function(&item.attrs, &item.sig, None, module)?,
                Item::Impl(item) if item.trait_.is_none() => {
                    let owner = type_name(&item.self_ty);
                    for impl_item in &item.items {
                        if let ImplItem::Fn(method) = impl_item {
                            self.function(&method.attrs, &method.sig, owner.as_deref(), module)?;
                        }
                    }
                }
                Item::Mod(item) if !is_cfg_test(&item.attrs) => {
                    if let Some((_, items)) = &item.content {
                        self.items(items, &format!("{module}::{}", item.ident))?;
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn function(
        &mut self,
        attrs: &[Attribute],
        sig: &Signature,
        owner: Option<&str>,
        module: &str,
    ) -> Result<(), ParseError> {
        let docs = doc_lines(attrs);
        let Some((router, line)) = docs.iter().find_map(|(text, line)| {
            tag_line(text)
                .filter(|t| t.tag == "@router")
                .map(|t| (t, *line))
        }) else {
            return Ok(());
        };

        let function = match owner {
            Some(owner) => format!("{owner}::{}", sig.ident),
            None => sig.ident.to_string(),
        };
        let tag = parse_router(router.remainder).ok_or_else(|| {
            ParseError::annotation(self.file.to_path_buf(), line, &function, router.line)
        })?;
        let limit = find_limit(&docs, self.file, &function)?;

        let mut params = Vec::with_capacity(sig.inputs.len());
        for arg in &sig.inputs {
            if let FnArg::Typed(arg) = arg {
                let spec = param_spec(&arg.ty, self.keys, module).map_err(|(name, placeholders)| {
                    ParseError::PathKey {
                        file: self.file.to_path_buf(),
                        line,
                        function: function.clone(),
                        name,
                        placeholders: placeholders.join(", "),
                    }
                })?;
                params.push(spec);
            }
        }
        let mut descriptor = HandlerDescriptor::new(params, return_shapes(&sig.output));
        if let Some(receiver) = sig.receiver() {
            if receiver.reference.is_some() || receiver.colon_token.is_some() {
                return Err(ParseError::Receiver {
                    file: self.file.to_path_buf(),
                    line,
                    function,
                });
            }
            if let Some(owner) = owner {
                descriptor = descriptor.with_receiver(owner);
            }
        }

        let start = sig.ident.span().start();
        let route = RouteProperties {
            http_method: tag.method,
            path: tag.path,
            package_name: module.rsplit("::").next().unwrap_or(module).to_string(),
            package_path: module.to_string(),
            method_name: sig.ident.to_string(),
            receiver_name: owner.map(str::to_string),
            limit,
            descriptor,
            location: SourceLocation {
                file: self.file.to_path_buf(),
                line: start.line,
                column: start.column + 1,
            },
        };
        debug!(
            route = %format!("{} {}", route.http_method, route.path),
            handler = %format!("{}::{}", route.package_path, route.qualified_name()),
            "Found route"
        );
        self.routes.push(route);
        Ok(())
    }
}

fn find_limit(docs: &[(String, usize)], file: &Path, function: &str) -> Result<Limit, ParseError> {
    for (text, line) in docs {
        if let Some(tag) = tag_line(text).filter(|t| t.tag == "@limit") {
            return parse_limit(tag.remainder).ok_or_else(|| {
                ParseError::limit(file.to_path_buf(), *line, function, tag.line)
            });
        }
    }
    Ok(Limit::default())
}

/// Doc comment lines with the source line of their attribute.
pub fn doc_lines(attrs: &[Attribute]) -> Vec<(String, usize)> {
    let mut lines = Vec::new();
    for attr in attrs.iter().filter(|a| a.path().is_ident("doc")) {
        if let Meta::NameValue(meta) = &attr.meta {
            if let Expr::Lit(ExprLit {
                lit: Lit::Str(text),
                ..
            }) = &meta.value
            {
                let line = attr.span().start().line;
                lines.extend(text.value().lines().map(|l| (l.to_string(), line)));
            }
        }
    }
    lines
}

fn is_cfg_test(attrs: &[Attribute]) -> bool {
    attrs.iter().any(|attr| {
        attr.path().is_ident("cfg")
            && attr
                .parse_args::<syn::Ident>()
                .is_ok_and(|ident| ident == "test")
    })
}

/// Self type name without references, pointers, parentheses or generics.
fn type_name(ty: &Type) -> Option<String> {
    match ty {
        Type::Path(path) => path.path.segments.last().map(|s| s.ident.to_string()),
        Type::Reference(r) => type_name(&r.elem),
        Type::Ptr(p) => type_name(&p.elem),
        Type::Paren(p) => type_name(&p.elem),
        Type::Group(g) => type_name(&g.elem),
        _ => None,
    }
}

fn first_type_arg(ty: &Type) -> Option<&Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    let PathArguments::AngleBracketed(args) = &path.path.segments.last()?.arguments else {
        return None;
    };
    args.args.iter().find_map(|arg| match arg {
        GenericArgument::Type(ty) => Some(ty),
        _ => None,
    })
}

/// Parameter kind of `ty`. `Err` names a path key with conflicting
/// placeholders.
fn param_spec(
    ty: &Type,
    keys: &PathKeys,
    module: &str,
) -> Result<ParameterSpec, (String, Vec<String>)> {
    let Some(name) = type_name_of_path(ty) else {
        return Ok(ParameterSpec::Unsupported);
    };
    Ok(match name.as_str() {
        "RequestContext" => ParameterSpec::RequestContext,
        "SecToken" => ParameterSpec::AuthToken,
        "Body" => ParameterSpec::StructBody,
        "BoxedBody" => ParameterSpec::StructBodyPointer,
        "PathParam" => {
            let key = first_type_arg(ty)
                .and_then(type_name_of_path)
                .unwrap_or_default();
            let placeholder = keys.resolve(&key, module).map_err(|found| (key, found))?;
            ParameterSpec::path(placeholder)
        }
        "HashMap" | "BTreeMap" | "Map" => ParameterSpec::GenericMap,
        _ => ParameterSpec::Unsupported,
    })
}

fn type_name_of_path(ty: &Type) -> Option<String> {
    match ty {
        Type::Path(path) => path.path.segments.last().map(|s| s.ident.to_string()),
        _ => None,
    }
}

fn is_unit(ty: &Type) -> bool {
    matches!(ty, Type::Tuple(t) if t.elems.is_empty())
}

fn payload_shape(ty: Option<&Type>) -> ReturnShape {
    match ty.and_then(type_name_of_path).as_deref() {
        Some("Envelope") => ReturnShape::Envelope,
        _ => ReturnShape::Payload,
    }
}

fn return_shapes(output: &ReturnType) -> Vec<ReturnShape> {
    let ReturnType::Type(_, ty) = output else {
        return Vec::new();
    };
    let ty = match ty.as_ref() {
        Type::Paren(p) => p.elem.as_ref(),
        ty => ty,
    };
    if is_unit(ty) {
        return Vec::new();
    }
    match type_name_of_path(ty).as_deref() {
        Some("Result") => match first_type_arg(ty) {
            Some(inner) if is_unit(inner) => vec![ReturnShape::Error],
            inner => vec![payload_shape(inner), ReturnShape::Error],
        },
        Some("Envelope") => vec![ReturnShape::Envelope],
        Some("Data") => vec![payload_shape(first_type_arg(ty))],
        _ => vec![ReturnShape::Payload],
    }
}

/// Module path of `file`: `prefix` followed by the file's path inside its
/// crate's `src/` directory, without `lib.rs`, `main.rs` or `mod.rs`.
///
/// Files outside any crate fall back to `relative`, their path below the
/// scan root.
pub fn module_path_for(file: &Path, relative: &Path, prefix: &str) -> String {
    let canonical = std::fs::canonicalize(file).unwrap_or_else(|_| file.to_path_buf());
    let in_src = canonical
        .ancestors()
        .skip(1)
        .find(|dir| dir.join("Cargo.toml").is_file())
        .and_then(|root| canonical.strip_prefix(root.join("src")).ok())
        .map(Path::to_path_buf);
    let rel = in_src.unwrap_or_else(|| relative.to_path_buf());

    let mut segments = vec![prefix.to_string()];
    let mut parts: Vec<String> = rel
        .with_extension("")
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    if matches!(
        parts.last().map(String::as_str),
        Some("lib" | "main" | "mod")
    ) {
        parts.pop();
    }
    segments.extend(parts);
    segments.join("::")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_code(code: &str) -> Vec<RouteProperties> {
        RouteParser::new()
            .parse_source(code, Path::new("user.rs"), "crate::api::user")
            .unwrap()
    }

    #[test]
    fn test_free_function_route() {
        let routes = parse_code(
            r#"
            /// Fetch one user.
            /// @router /user/{id} [get]
            pub async fn get_user(id: PathParam<UserId>) -> Result<User, ApiError> {
                todo!()
            }

            pub async fn not_routed() {}
            "#,
        );

        assert_eq!(routes.len(), 1);
        let route = &routes[0];
        assert_eq!(route.http_method, "GET");
        assert_eq!(route.path, "/user/{id}");
        assert_eq!(route.method_name, "get_user");
        assert_eq!(route.package_name, "user");
        assert_eq!(route.package_path, "crate::api::user");
        assert_eq!(route.receiver_name, None);
        assert!(route.limit.is_empty());
        assert_eq!(route.location.line, 4);
        assert_eq!(
            route.descriptor.params,
            vec![ParameterSpec::path("UserId")]
        );
        assert_eq!(
            route.descriptor.returns,
            vec![ReturnShape::Payload, ReturnShape::Error]
        );
    }

    #[test]
    fn test_path_key_resolves_placeholder() {
        let routes = parse_code(
            r#"
            fast_web::path_key!(pub UserId = "id");

            /// @router /user/{id} [GET]
            async fn get_user(id: PathParam<UserId>) {}
            "#,
        );
        assert_eq!(routes[0].descriptor.params, vec![ParameterSpec::path("id")]);
    }

    fn source(relative: &str, content: &str) -> SourceFile {
        SourceFile {
            path: Path::new("/nowhere").join(relative),
            relative_path: PathBuf::from(relative),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_path_keys_are_scoped_by_module() {
        let user = source(
            "user.rs",
            "fast_web::path_key!(Id = \"id\");\n/// @router /user/{id} [GET]\nasync fn get(id: PathParam<Id>) {}\n",
        );
        let order = source(
            "order.rs",
            "fast_web::path_key!(Id = \"oid\");\n/// @router /order/{oid} [GET]\nasync fn get(id: PathParam<Id>) {}\n",
        );

        let routes = RouteParser::new().parse_files(&[order, user]).unwrap();
        assert_eq!(routes[0].descriptor.params, vec![ParameterSpec::path("oid")]);
        assert_eq!(routes[1].descriptor.params, vec![ParameterSpec::path("id")]);
    }

    #[test]
    fn test_conflicting_imported_path_key() {
        let user = source("user.rs", "fast_web::path_key!(Id = \"id\");\n");
        let order = source("order.rs", "fast_web::path_key!(Id = \"oid\");\n");
        let admin = source(
            "admin.rs",
            "use crate::user::Id;\n/// @router /admin/{id} [GET]\nasync fn get(id: PathParam<Id>) {}\n",
        );

        let err = RouteParser::new()
            .parse_files(&[admin, order, user])
            .unwrap_err();
        assert!(matches!(
            err,
            crate::error::CliError::Parse(ParseError::PathKey { ref name, .. }) if name == "Id"
        ));
    }

    #[test]
    fn test_imported_path_key_with_one_declaration() {
        let user = source("user.rs", "fast_web::path_key!(pub UserId = \"id\");\n");
        let admin = source(
            "admin.rs",
            "use crate::user::UserId;\n/// @router /admin/{id} [GET]\nasync fn get(id: PathParam<UserId>) {}\n",
        );

        let routes = RouteParser::new().parse_files(&[admin, user]).unwrap();
        assert_eq!(routes[0].descriptor.params, vec![ParameterSpec::path("id")]);
    }

    #[test]
    fn test_method_route_has_receiver() {
        let routes = parse_code(
            r#"
            pub struct UserApi;

            impl UserApi {
                /// @router /user/list [POST]
                /// @limit 10 20 userLimit
                pub async fn list(self, page: Body<PageParams>) -> Envelope {
                    todo!()
                }

                /// @router /user/count [GET]
                pub async fn count() -> Data<u64> {
                    todo!()
                }
            }

            impl Display for UserApi {
                /// @router /ignored [GET]
                fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result { todo!() }
            }
            "#,
        );

        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].receiver_name.as_deref(), Some("UserApi"));
        assert_eq!(routes[0].descriptor.receiver.as_deref(), Some("UserApi"));
        assert_eq!(routes[0].descriptor.params, vec![ParameterSpec::StructBody]);
        assert_eq!(routes[0].descriptor.returns, vec![ReturnShape::Envelope]);
        assert_eq!(routes[0].limit.name.as_deref(), Some("userLimit"));
        assert_eq!(routes[0].limit.num, Some(10));
        assert_eq!(routes[0].limit.cap, Some(20));

        assert_eq!(routes[1].receiver_name.as_deref(), Some("UserApi"));
        assert_eq!(routes[1].descriptor.receiver, None);
    }

    #[test]
    fn test_only_first_router_line_counts() {
        let routes = parse_code(
            r#"
            /// @router /first [GET]
            /// @router /second [POST]
            async fn twice() {}
            "#,
        );
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].path, "/first");
    }

    #[test]
    fn test_inline_modules() {
        let routes = parse_code(
            r#"
            mod admin {
                /// @router /admin/ping [GET]
                async fn ping(ctx: RequestContext) {}
            }

            #[cfg(test)]
            mod tests {
                /// @router /test [GET]
                async fn hidden() {}
            }
            "#,
        );
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].package_path, "crate::api::user::admin");
        assert_eq!(routes[0].package_name, "admin");
        assert!(routes[0].descriptor.is_plain());
    }

    #[test]
    fn test_malformed_router_line() {
        let err = RouteParser::new()
            .parse_source(
                "/// @router foo\nfn broken() {}",
                Path::new("bad.rs"),
                "crate::bad",
            )
            .unwrap_err();
        assert!(matches!(
            err,
            crate::error::CliError::Parse(ParseError::Annotation { line: 1, .. })
        ));
    }

    #[test]
    fn test_malformed_limit_line() {
        let err = RouteParser::new()
            .parse_source(
                "/// @router /a [GET]\n/// @limit fast\nfn limited() {}",
                Path::new("bad.rs"),
                "crate::bad",
            )
            .unwrap_err();
        assert!(matches!(
            err,
            crate::error::CliError::Parse(ParseError::Limit { line: 2, .. })
        ));
    }

    #[test]
    fn test_borrowed_receiver_rejected() {
        let err = RouteParser::new()
            .parse_source(
                "struct A; impl A {\n/// @router /a [GET]\nfn a(&self) {} }",
                Path::new("a.rs"),
                "crate::a",
            )
            .unwrap_err();
        assert!(matches!(
            err,
            crate::error::CliError::Parse(ParseError::Receiver { .. })
        ));
    }

    #[test]
    fn test_parse_syntax_error() {
        let err = RouteParser::new()
            .parse_source("fn broken( {", Path::new("broken.rs"), "crate")
            .unwrap_err();
        assert!(matches!(
            err,
            crate::error::CliError::Parse(ParseError::Syntax { .. })
        ));
    }

    #[test]
    fn test_return_shapes() {
        let shapes = |src: &str| {
            let sig: Signature = syn::parse_str(src).unwrap();
            return_shapes(&sig.output)
        };
        assert!(shapes("fn a()").is_empty());
        assert!(shapes("fn a() -> ()").is_empty());
        assert_eq!(shapes("fn a() -> Result<(), E>"), vec![ReturnShape::Error]);
        assert_eq!(
            shapes("fn a() -> Result<Envelope, E>"),
            vec![ReturnShape::Envelope, ReturnShape::Error]
        );
        assert_eq!(shapes("fn a() -> String"), vec![ReturnShape::Payload]);
    }

    #[test]
    fn test_param_specs() {
        let keys = PathKeys::default();
        let spec = |src: &str| param_spec(&syn::parse_str::<Type>(src).unwrap(), &keys, "crate").unwrap();
        assert_eq!(spec("RequestContext"), ParameterSpec::RequestContext);
        assert_eq!(spec("fast_web::SecToken"), ParameterSpec::AuthToken);
        assert_eq!(spec("BoxedBody<User>"), ParameterSpec::StructBodyPointer);
        assert_eq!(spec("HashMap<String, Value>"), ParameterSpec::GenericMap);
        assert_eq!(spec("&str"), ParameterSpec::Unsupported);
        assert_eq!(spec("Unbound<u8>"), ParameterSpec::Unsupported);
    }

    #[test]
    fn test_module_path_in_crate() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("Cargo.toml"), "[package]").unwrap();
        std::fs::create_dir_all(dir.path().join("src/api")).unwrap();
        for file in ["src/api/user.rs", "src/api/mod.rs", "src/lib.rs"] {
            std::fs::write(dir.path().join(file), "").unwrap();
        }

        let path = |file: &str| module_path_for(&dir.path().join(file), Path::new(file), "crate");
        assert_eq!(path("src/api/user.rs"), "crate::api::user");
        assert_eq!(path("src/api/mod.rs"), "crate::api");
        assert_eq!(path("src/lib.rs"), "crate");
    }

    #[test]
    fn test_module_path_outside_crate() {
        assert_eq!(
            module_path_for(
                Path::new("/nowhere/handlers/user.rs"),
                Path::new("handlers/user.rs"),
                "crate"
            ),
            "crate::handlers::user"
        );
    }
}
