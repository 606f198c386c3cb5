//! Handler traits and utilities
//!
//! [`Handler`] is implemented for async functions of up to eight arguments
//! whose argument types implement [`Bind`] and whose output implements
//! [`ReturnSlots`]. The implementation binds every argument in order, then
//! hands back the call's future; the first binding failure stops the call.
//!
//! Methods are bound through [`method`]: the receiver is taken by value and
//! created with `Default::default()` on every call.

use futures::future::BoxFuture;
use std::future::Future;
use std::marker::PhantomData;

use crate::binder::Bind;
use crate::context::RequestContext;
use crate::descriptor::HandlerDescriptor;
use crate::encoder::{ReturnSlots, Slot};
use crate::error::BindError;

/// Future yielding a handler's return slots.
pub type SlotFuture = BoxFuture<'static, Vec<Slot>>;

/// A function the dispatcher can bind and call.
///
/// `Args` is the tuple of argument types; it only disambiguates the impls.
pub trait Handler<Args>: Clone + Send + Sync + Sized + 'static {
    /// Shape derived from the argument and output types.
    fn descriptor() -> HandlerDescriptor;

    /// Bind every argument from `ctx` and start the call.
    fn invoke(&self, ctx: &RequestContext) -> Result<SlotFuture, BindError>;
}

macro_rules! impl_handler {
    ($($ty:ident),*) => {
        #[allow(non_snake_case, unused_variables)]
        impl<F, Fut, R, $($ty,)*> Handler<($($ty,)*)> for F
        where
            F: Fn($($ty),*) -> Fut + Clone + Send + Sync + 'static,
            Fut: Future<Output = R> + Send + 'static,
            R: ReturnSlots,
            $($ty: Bind,)*
        {
            fn descriptor() -> HandlerDescriptor {
                HandlerDescriptor::new(vec![$(<$ty as Bind>::spec()),*], R::shapes())
            }

            fn invoke(&self, ctx: &RequestContext) -> Result<SlotFuture, BindError> {
                $(let $ty = <$ty as Bind>::bind(ctx)?;)*
                let call = (self)($($ty),*);
                Ok(Box::pin(async move { call.await.into_slots() }))
            }
        }

        #[allow(non_snake_case, unused_variables)]
        impl<Recv, F, Fut, R, $($ty,)*> Handler<(Recv, $($ty,)*)> for Method<Recv, F>
        where
            Recv: Default + Send + 'static,
            F: Fn(Recv, $($ty),*) -> Fut + Clone + Send + Sync + 'static,
            Fut: Future<Output = R> + Send + 'static,
            R: ReturnSlots,
            $($ty: Bind,)*
        {
            fn descriptor() -> HandlerDescriptor {
                HandlerDescriptor::new(vec![$(<$ty as Bind>::spec()),*], R::shapes())
                    .with_receiver(short_type_name::<Recv>())
            }

            fn invoke(&self, ctx: &RequestContext) -> Result<SlotFuture, BindError> {
                $(let $ty = <$ty as Bind>::bind(ctx)?;)*
                let call = (self.f)(Recv::default(), $($ty),*);
                Ok(Box::pin(async move { call.await.into_slots() }))
            }
        }
    };
}

impl_handler!();
impl_handler!(A1);
impl_handler!(A1, A2);
impl_handler!(A1, A2, A3);
impl_handler!(A1, A2, A3, A4);
impl_handler!(A1, A2, A3, A4, A5);
impl_handler!(A1, A2, A3, A4, A5, A6);
impl_handler!(A1, A2, A3, A4, A5, A6, A7);
impl_handler!(A1, A2, A3, A4, A5, A6, A7, A8);

/// A method bound to a fresh `Recv::default()` receiver per call.
pub struct Method<Recv, F> {
    f: F,
    _receiver: PhantomData<fn() -> Recv>,
}

impl<Recv, F: Clone> Clone for Method<Recv, F> {
    fn clone(&self) -> Self {
        Self {
            f: self.f.clone(),
            _receiver: PhantomData,
        }
    }
}

/// Bind a by-value method such as `UserApi::list`.
///
/// ```rust,ignore
/// #[derive(Default)]
/// struct UserApi;
///
/// impl UserApi {
///     async fn list(self, page: Body<PageParams>) -> Result<PageResult<User>, ApiError> { ... }
/// }
///
/// router.route("/user/list", post(wrap(method(UserApi::list))));
/// ```
pub fn method<Recv, F>(f: F) -> Method<Recv, F> {
    Method {
        f,
        _receiver: PhantomData,
    }
}

/// Last path segment of a type name, without generic arguments.
fn short_type_name<T>() -> String {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binder::Body;
    use crate::descriptor::{ParameterSpec, ReturnShape};
    use crate::envelope::Envelope;

    #[derive(Default)]
    struct Api;

    impl Api {
        async fn ping(self, _ctx: RequestContext) -> Envelope {
            Envelope::ok("pong")
        }
    }

    async fn create(_body: Body<serde_json::Value>) -> Result<u32, String> {
        Ok(1)
    }

    async fn nothing() {}

    async fn plain(_ctx: RequestContext) {}

    fn descriptor_of<Args, H: Handler<Args>>(_h: H) -> HandlerDescriptor {
        H::descriptor()
    }

    #[test]
    fn test_function_descriptor() {
        let d = descriptor_of(create);
        assert_eq!(d.receiver, None);
        assert_eq!(d.params, vec![ParameterSpec::StructBody]);
        assert_eq!(d.returns, vec![ReturnShape::Payload, ReturnShape::Error]);
    }

    #[test]
    fn test_method_descriptor() {
        let d = descriptor_of(method(Api::ping));
        assert_eq!(d.receiver.as_deref(), Some("Api"));
        assert_eq!(d.params, vec![ParameterSpec::RequestContext]);
        assert_eq!(d.returns, vec![ReturnShape::Envelope]);
    }

    #[test]
    fn test_zero_arity_and_plain() {
        let d = descriptor_of(nothing);
        assert!(d.params.is_empty());
        assert!(d.returns.is_empty());
        assert!(descriptor_of(plain).is_plain());
    }

    #[test]
    fn test_short_type_name() {
        assert_eq!(short_type_name::<Api>(), "Api");
        assert_eq!(short_type_name::<Vec<String>>(), "Vec");
    }
}
