//! Argument binding.
//!
//! Every handler argument type implements [`Bind`], which names its
//! [`ParameterSpec`] and materializes a value from the [`RequestContext`].
//!
//! | Argument type | Spec | Source |
//! |---------------|------|--------|
//! | [`RequestContext`] | `RequestContext` | the request itself |
//! | [`SecToken`] | `AuthToken` | request extension, zero value if absent |
//! | [`Body<T>`] | `StructBody` | JSON body or form, then [`Validate`] |
//! | [`BoxedBody<T>`] | `StructBodyPointer` | same, boxed |
//! | [`PathParam<K>`] | `PathString` | placeholder named by `K` |
//! | `HashMap<String, V>`, `BTreeMap<String, V>` | `GenericMap` | JSON object body |
//! | [`Unbound<T>`] | `Unsupported` | `T::default()` |

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};

use crate::auth::SecToken;
use crate::context::RequestContext;
use crate::descriptor::ParameterSpec;
use crate::error::BindError;
use crate::validation::{self, Validate};

/// A type that can be materialized as one handler argument.
pub trait Bind: Sized + Send + 'static {
    /// How this argument is bound.
    fn spec() -> ParameterSpec;

    /// Produce the argument for this request.
    fn bind(ctx: &RequestContext) -> Result<Self, BindError>;
}

impl Bind for RequestContext {
    fn spec() -> ParameterSpec {
        ParameterSpec::RequestContext
    }

    fn bind(ctx: &RequestContext) -> Result<Self, BindError> {
        Ok(ctx.clone())
    }
}

impl Bind for SecToken {
    fn spec() -> ParameterSpec {
        ParameterSpec::AuthToken
    }

    fn bind(ctx: &RequestContext) -> Result<Self, BindError> {
        Ok(ctx.extension::<SecToken>().unwrap_or_default())
    }
}

// =============================================================================
// Struct bodies
// =============================================================================

/// A struct decoded from the request and validated.
///
/// Decoding starts from `T::default()`: fields the client leaves out keep their
/// zero value, and an empty body yields the zero value itself.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Body<T>(pub T);

impl<T> Body<T> {
    /// Unwrap the decoded value.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for Body<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> DerefMut for Body<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.0
    }
}

impl<T> Bind for Body<T>
where
    T: DeserializeOwned + Serialize + Default + Validate + Send + 'static,
{
    fn spec() -> ParameterSpec {
        ParameterSpec::StructBody
    }

    fn bind(ctx: &RequestContext) -> Result<Self, BindError> {
        decode_struct(ctx).map(Body)
    }
}

/// Like [`Body`], for large structs handed over on the heap.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoxedBody<T>(pub Box<T>);

impl<T> Deref for BoxedBody<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> Bind for BoxedBody<T>
where
    T: DeserializeOwned + Serialize + Default + Validate + Send + 'static,
{
    fn spec() -> ParameterSpec {
        ParameterSpec::StructBodyPointer
    }

    fn bind(ctx: &RequestContext) -> Result<Self, BindError> {
        decode_struct(ctx).map(|value| BoxedBody(Box::new(value)))
    }
}

fn decode_struct<T>(ctx: &RequestContext) -> Result<T, BindError>
where
    T: DeserializeOwned + Serialize + Default + Validate,
{
    let value: T = if ctx.is_json() {
        decode_json(ctx.body())?
    } else if ctx.is_form() {
        decode_form(ctx.body())?
    } else {
        decode_form(ctx.query().unwrap_or_default().as_bytes())?
    };

    validation::check(&value, crate::config().locale).map_err(BindError::Validation)?;
    Ok(value)
}

/// Decode JSON over the zero value of `T`.
pub(crate) fn decode_json<T>(body: &[u8]) -> Result<T, BindError>
where
    T: DeserializeOwned + Serialize + Default,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    let mut base = serde_json::to_value(T::default())?;
    let incoming: Value = serde_json::from_slice(body)?;
    overlay(&mut base, incoming);
    Ok(serde_json::from_value(base)?)
}

/// Decode `a=1&b=x` pairs over the zero value of `T`.
///
/// A value replacing a number or boolean field is parsed as such, and a
/// repeated key fills a sequence field. Fields whose zero value is `null`
/// (`Option<_>`) or an object take the value as JSON when it parses, falling
/// back to the raw string.
pub(crate) fn decode_form<T>(raw: &[u8]) -> Result<T, BindError>
where
    T: DeserializeOwned + Serialize + Default,
{
    let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(raw)?;
    if pairs.is_empty() {
        return Ok(T::default());
    }
    let base = serde_json::to_value(T::default())?;
    let Value::Object(zero) = &base else {
        return Ok(serde_urlencoded::from_bytes(raw)?);
    };

    let mut grouped: Vec<(String, Vec<String>)> = Vec::new();
    for (key, value) in pairs {
        match grouped.iter_mut().find(|(k, _)| *k == key) {
            Some((_, values)) => values.push(value),
            None => grouped.push((key, vec![value])),
        }
    }

    let mut typed = zero.clone();
    let mut literal = zero.clone();
    let mut guessed = false;
    for (key, values) in grouped {
        let field = zero.get(&key);
        let (value, is_guess) = form_value(&key, field, values.clone())?;
        guessed |= is_guess;
        literal.insert(key.clone(), if is_guess { strings(field, values) } else { value.clone() });
        typed.insert(key, value);
    }

    match serde_json::from_value(Value::Object(typed)) {
        Ok(value) => Ok(value),
        Err(err) if guessed => {
            serde_json::from_value(Value::Object(literal)).map_err(|_| BindError::from(err))
        }
        Err(err) => Err(err.into()),
    }
}

/// Convert the values of one form key against the field's zero value. The flag
/// is set when the type had to be guessed from the text.
fn form_value(
    key: &str,
    zero: Option<&Value>,
    mut values: Vec<String>,
) -> Result<(Value, bool), BindError> {
    if let Some(Value::Array(_)) = zero {
        let items = values.into_iter().map(guess).collect();
        return Ok((Value::Array(items), true));
    }
    let raw = values.pop().unwrap_or_default();
    let value = match zero {
        Some(Value::Number(_)) => raw
            .parse::<serde_json::Number>()
            .map(Value::Number)
            .map_err(|_| BindError::decode(format!("invalid number for '{key}': {raw}")))?,
        Some(Value::Bool(_)) => raw
            .parse::<bool>()
            .map(Value::Bool)
            .map_err(|_| BindError::decode(format!("invalid boolean for '{key}': {raw}")))?,
        Some(Value::String(_)) => Value::String(raw),
        _ => return Ok((guess(raw), true)),
    };
    Ok((value, false))
}

fn guess(raw: String) -> Value {
    serde_json::from_str(&raw).unwrap_or(Value::String(raw))
}

fn strings(zero: Option<&Value>, mut values: Vec<String>) -> Value {
    match zero {
        Some(Value::Array(_)) => Value::Array(values.into_iter().map(Value::String).collect()),
        _ => values.pop().map(Value::String).unwrap_or(Value::Null),
    }
}

fn overlay(base: &mut Value, incoming: Value) {
    match (base, incoming) {
        (Value::Object(base), Value::Object(incoming)) => {
            for (key, value) in incoming {
                match base.get_mut(&key) {
                    Some(existing) if existing.is_object() && value.is_object() => {
                        overlay(existing, value)
                    }
                    _ => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, incoming) => *base = incoming,
    }
}

// =============================================================================
// Path parameters
// =============================================================================

/// Names the route placeholder a [`PathParam`] binds to.
///
/// Declare keys with [`path_key!`](crate::path_key).
pub trait PathKey: Send + 'static {
    /// Placeholder name, as written between braces in the route path.
    const NAME: &'static str;
}

/// Declare a [`PathKey`] marker type.
///
/// ```rust,ignore
/// fast_web::path_key!(pub UserId = "id");
///
/// async fn get_user(id: PathParam<UserId>) -> Result<User, ApiError> { ... }
/// ```
#[macro_export]
macro_rules! path_key {
    ($(#[$meta:meta])* $vis:vis $name:ident = $key:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy)]
        $vis struct $name;

        impl $crate::PathKey for $name {
            const NAME: &'static str = $key;
        }
    };
}

/// The path parameter named by `K`. A route without that placeholder binds "".
pub struct PathParam<K> {
    value: String,
    _key: PhantomData<fn() -> K>,
}

impl<K> PathParam<K> {
    /// Wrap a value.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            _key: PhantomData,
        }
    }

    /// The raw value.
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Take the raw value.
    pub fn into_inner(self) -> String {
        self.value
    }

    /// Parse the value, e.g. into an id.
    pub fn parse<F: std::str::FromStr>(&self) -> Result<F, F::Err> {
        self.value.parse()
    }
}

impl<K> Deref for PathParam<K> {
    type Target = str;

    fn deref(&self) -> &str {
        &self.value
    }
}

impl<K> Clone for PathParam<K> {
    fn clone(&self) -> Self {
        Self::new(self.value.clone())
    }
}

impl<K> fmt::Debug for PathParam<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PathParam").field(&self.value).finish()
    }
}

impl<K> fmt::Display for PathParam<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl<K: PathKey> Bind for PathParam<K> {
    fn spec() -> ParameterSpec {
        ParameterSpec::path(K::NAME)
    }

    fn bind(ctx: &RequestContext) -> Result<Self, BindError> {
        Ok(Self::new(ctx.path_param(K::NAME).unwrap_or_default()))
    }
}

// =============================================================================
// Generic maps
// =============================================================================

fn decode_map(ctx: &RequestContext) -> Result<Map<String, Value>, BindError> {
    let body = ctx.body();
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }
    Ok(serde_json::from_slice(body)?)
}

impl<V> Bind for HashMap<String, V>
where
    V: DeserializeOwned + Send + 'static,
{
    fn spec() -> ParameterSpec {
        ParameterSpec::GenericMap
    }

    fn bind(ctx: &RequestContext) -> Result<Self, BindError> {
        decode_map(ctx)?
            .into_iter()
            .map(|(key, value)| Ok((key, serde_json::from_value(value)?)))
            .collect()
    }
}

impl<V> Bind for BTreeMap<String, V>
where
    V: DeserializeOwned + Send + 'static,
{
    fn spec() -> ParameterSpec {
        ParameterSpec::GenericMap
    }

    fn bind(ctx: &RequestContext) -> Result<Self, BindError> {
        decode_map(ctx)?
            .into_iter()
            .map(|(key, value)| Ok((key, serde_json::from_value(value)?)))
            .collect()
    }
}

impl Bind for Map<String, Value> {
    fn spec() -> ParameterSpec {
        ParameterSpec::GenericMap
    }

    fn bind(ctx: &RequestContext) -> Result<Self, BindError> {
        decode_map(ctx)
    }
}

// =============================================================================
// Unsupported
// =============================================================================

/// An argument the binder leaves at its default value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Unbound<T>(pub T);

impl<T: Default + Send + 'static> Bind for Unbound<T> {
    fn spec() -> ParameterSpec {
        ParameterSpec::Unsupported
    }

    fn bind(_ctx: &RequestContext) -> Result<Self, BindError> {
        Ok(Unbound(T::default()))
    }
}
