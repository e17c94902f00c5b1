//! Handler system.
//!
//! Handlers are plain async functions whose parameters implement
//! [`FromContext`], in the style popularized by Axum: the [`Handler`] trait
//! has blanket implementations for functions of 0 to 8 extractable
//! parameters, and [`into_handler`] erases them for storage inside a
//! [`Feature`](crate::feature::Feature).
//!
//! ```rust,ignore
//! // All of these are valid handlers:
//! async fn no_params() {}
//! async fn with_event(ctx: Interaction) {}
//! async fn with_session(ctx: Interaction, session: BoxedSession) {}
//! ```

use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;
use std::sync::Arc;

use crate::context::InteractionContext;
use crate::extractor::FromContext;

/// A type alias for a boxed, pinned future that is `Send`.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

// ============================================================================
// Handler Trait
// ============================================================================

/// The core trait for interaction handlers.
///
/// Implemented automatically for async functions taking 0..=8 parameters
/// that implement [`FromContext`] and returning `()`.
pub trait Handler<T>: Clone + Send + Sync + 'static {
    /// The future returned by calling this handler.
    type Future: Future<Output = ()> + Send + 'static;

    /// Calls the handler with the given context.
    fn call(self, ctx: Arc<InteractionContext>) -> Self::Future;
}

// ============================================================================
// Type Erasure
// ============================================================================

/// A wrapper that pairs a handler function with its parameter marker type.
pub struct HandlerFn<F, T> {
    f: F,
    _marker: PhantomData<fn() -> T>,
}

impl<F, T> HandlerFn<F, T> {
    /// Creates a new handler function wrapper.
    pub fn new(f: F) -> Self {
        Self {
            f,
            _marker: PhantomData,
        }
    }
}

impl<F: Clone, T> Clone for HandlerFn<F, T> {
    fn clone(&self) -> Self {
        Self {
            f: self.f.clone(),
            _marker: PhantomData,
        }
    }
}

/// A type-erased handler that can be stored in collections.
pub type BoxedHandler = Arc<dyn ErasedHandler + Send + Sync>;

/// Type-erased handler trait for dynamic dispatch.
pub trait ErasedHandler: Send + Sync {
    /// Executes the handler with the given context.
    fn call(&self, ctx: Arc<InteractionContext>) -> BoxFuture<'static, ()>;
}

impl<F, T> ErasedHandler for HandlerFn<F, T>
where
    F: Handler<T> + Send + Sync,
    T: 'static,
{
    fn call(&self, ctx: Arc<InteractionContext>) -> BoxFuture<'static, ()> {
        let f = self.f.clone();
        Box::pin(async move {
            f.call(ctx).await;
        })
    }
}

/// Converts a handler function into a boxed handler.
pub fn into_handler<F, T>(f: F) -> BoxedHandler
where
    F: Handler<T> + Send + Sync + 'static,
    T: 'static,
{
    Arc::new(HandlerFn::new(f))
}

// ============================================================================
// Blanket Implementations
// ============================================================================

// Functions with no parameters.
impl<F, Fut> Handler<()> for F
where
    F: FnOnce() -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    type Future = Fut;

    fn call(self, _ctx: Arc<InteractionContext>) -> Self::Future {
        (self)()
    }
}

/// Generates `Handler` implementations for functions of a given arity.
macro_rules! impl_handler {
    ($($ty:ident),*) => {
        #[allow(non_snake_case, unused_variables)]
        impl<F, Fut, $($ty,)*> Handler<($($ty,)*)> for F
        where
            F: FnOnce($($ty,)*) -> Fut + Clone + Send + Sync + 'static,
            Fut: Future<Output = ()> + Send + 'static,
            $( $ty: FromContext + Send + 'static, )*
        {
            type Future = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

            fn call(self, ctx: Arc<InteractionContext>) -> Self::Future {
                Box::pin(async move {
                    $(
                        let Ok($ty) = $ty::from_context(&ctx) else { return };
                    )*

                    (self)($($ty,)*).await;
                })
            }
        }
    };
}

impl_handler!(T1);
impl_handler!(T1, T2);
impl_handler!(T1, T2, T3);
impl_handler!(T1, T2, T3, T4);
impl_handler!(T1, T2, T3, T4, T5);
impl_handler!(T1, T2, T3, T4, T5, T6);
impl_handler!(T1, T2, T3, T4, T5, T6, T7);
impl_handler!(T1, T2, T3, T4, T5, T6, T7, T8);
