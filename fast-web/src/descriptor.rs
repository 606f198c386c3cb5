//! Handler shape descriptors.
//!
//! A [`HandlerDescriptor`] lists how each argument of a handler is bound and
//! which return slots it produces. At run time it is derived from the handler's
//! Rust signature through [`Bind::spec`](crate::Bind::spec) and
//! [`ReturnSlots::shapes`](crate::ReturnSlots::shapes); the route generator
//! builds the same value from source syntax.

use std::fmt;

/// How one handler argument is materialized from a request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParameterSpec {
    /// The request-scoped [`RequestContext`](crate::RequestContext).
    RequestContext,
    /// The [`SecToken`](crate::SecToken) attached by the auth filter, or its zero value.
    AuthToken,
    /// A struct decoded from the body and validated.
    StructBody,
    /// Same as [`StructBody`](Self::StructBody), handed over boxed.
    StructBodyPointer,
    /// The path parameter whose placeholder is `name`.
    PathString {
        /// Placeholder name in the route path.
        name: String,
    },
    /// A string-keyed map decoded from the JSON body.
    GenericMap,
    /// Not bound; the handler receives the type's default value.
    Unsupported,
}

impl ParameterSpec {
    /// Path parameter spec for `name`.
    pub fn path(name: impl Into<String>) -> Self {
        Self::PathString { name: name.into() }
    }

    /// Whether binding reads the request body.
    pub fn reads_body(&self) -> bool {
        matches!(
            self,
            Self::StructBody | Self::StructBodyPointer | Self::GenericMap
        )
    }
}

impl fmt::Display for ParameterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RequestContext => write!(f, "RequestContext"),
            Self::AuthToken => write!(f, "AuthToken"),
            Self::StructBody => write!(f, "StructBody"),
            Self::StructBodyPointer => write!(f, "StructBodyPointer"),
            Self::PathString { name } => write!(f, "PathString({name})"),
            Self::GenericMap => write!(f, "GenericMap"),
            Self::Unsupported => write!(f, "Unsupported"),
        }
    }
}

/// Declared kind of one return slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReturnShape {
    /// A serializable payload.
    Payload,
    /// A ready-made [`Envelope`](crate::Envelope).
    Envelope,
    /// The conventional error slot. Only valid as the last slot.
    Error,
}

/// Resolved, immutable shape of a bindable handler.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct HandlerDescriptor {
    /// Receiver type name for methods, without reference or generics.
    pub receiver: Option<String>,
    /// Argument specs in declaration order.
    pub params: Vec<ParameterSpec>,
    /// Return slots in declaration order.
    pub returns: Vec<ReturnShape>,
}

impl HandlerDescriptor {
    /// Create a descriptor for a free function.
    pub fn new(params: Vec<ParameterSpec>, returns: Vec<ReturnShape>) -> Self {
        Self {
            receiver: None,
            params,
            returns,
        }
    }

    /// Attach a receiver type name.
    pub fn with_receiver(mut self, receiver: impl Into<String>) -> Self {
        self.receiver = Some(receiver.into());
        self
    }

    /// Plain transport handler: no returns and exactly one `RequestContext` argument.
    pub fn is_plain(&self) -> bool {
        self.returns.is_empty() && self.params == [ParameterSpec::RequestContext]
    }

    /// Whether the last slot is the error slot.
    pub fn has_error_slot(&self) -> bool {
        self.returns.last() == Some(&ReturnShape::Error)
    }

    /// Index of the payload slot: the last slot unless it is the error slot,
    /// in which case the one before it.
    pub fn payload_index(&self) -> Option<usize> {
        match self.returns.len() {
            0 => None,
            n if self.has_error_slot() => n.checked_sub(2),
            n => Some(n - 1),
        }
    }

    /// Placeholder names of all path parameters, in argument order.
    pub fn path_names(&self) -> impl Iterator<Item = &str> {
        self.params.iter().filter_map(|p| match p {
            ParameterSpec::PathString { name } => Some(name.as_str()),
            _ => None,
        })
    }
}

impl fmt::Display for HandlerDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(receiver) = &self.receiver {
            write!(f, "{receiver}::")?;
        }
        let params: Vec<String> = self.params.iter().map(ToString::to_string).collect();
        let returns: Vec<String> = self.returns.iter().map(|r| format!("{r:?}")).collect();
        write!(f, "({}) -> ({})", params.join(", "), returns.join(", "))
    }
}
