//! Text transform hooks applied around numeric calculation.
//!
//! The display round trip runs through two named operations:
//!
//! - [`TransformHooks::before_calc`]: field text → text handed to the number parser
//! - [`TransformHooks::after_calc`]: formatted number → literal text written to the field
//!
//! Both default to identity. [`AnyHooks`] wraps any implementation in an
//! `Arc` so settings stay cheap to clone.
//!
//! ```rust
//! use rs_spinner::hooks::{AnyHooks, FnHooks};
//!
//! // Thousands separators on display, stripped before parsing
//! let hooks = AnyHooks::new(FnHooks::new(
//!     |text: &str| text.replace(',', ""),
//!     |text: &str| {
//!         if text.len() > 3 {
//!             let (head, tail) = text.split_at(text.len() - 3);
//!             format!("{head},{tail}")
//!         } else {
//!             text.to_string()
//!         }
//!     },
//! ));
//!
//! assert_eq!(hooks.before_calc("1,500"), "1500");
//! assert_eq!(hooks.after_calc("1500"), "1,500");
//! ```

use std::sync::Arc;

/// Strategy for transforming field text before parsing and after formatting.
///
/// Implement only the operation you need; the other stays identity.
pub trait TransformHooks {
    /// Transform raw field text before it is parsed as a number.
    fn before_calc(&self, text: &str) -> String {
        text.to_string()
    }

    /// Transform formatted text before it is written to the field.
    fn after_calc(&self, text: &str) -> String {
        text.to_string()
    }
}

/// Identity hooks (the default).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Identity;

impl TransformHooks for Identity {}

fn identity(text: &str) -> String {
    text.to_string()
}

/// Hooks built from two closures.
#[derive(Clone)]
pub struct FnHooks<B, A> {
    before: B,
    after: A,
}

impl<B, A> FnHooks<B, A>
where
    B: Fn(&str) -> String,
    A: Fn(&str) -> String,
{
    /// Create hooks from a `before_calc` and an `after_calc` closure.
    pub fn new(before: B, after: A) -> Self {
        Self { before, after }
    }
}

impl<B: Fn(&str) -> String> FnHooks<B, fn(&str) -> String> {
    /// Only transform text before parsing.
    pub fn before(before: B) -> Self {
        Self {
            before,
            after: identity,
        }
    }
}

impl<A: Fn(&str) -> String> FnHooks<fn(&str) -> String, A> {
    /// Only transform text after formatting.
    pub fn after(after: A) -> Self {
        Self {
            before: identity,
            after,
        }
    }
}

impl<B, A> TransformHooks for FnHooks<B, A>
where
    B: Fn(&str) -> String,
    A: Fn(&str) -> String,
{
    fn before_calc(&self, text: &str) -> String {
        (self.before)(text)
    }

    fn after_calc(&self, text: &str) -> String {
        (self.after)(text)
    }
}

/// Type-erased, cheaply cloneable transform hooks.
///
/// Equality is identity of the wrapped instance: two `AnyHooks` compare
/// equal only if one was cloned from the other. This is what
/// [`Settings::apply`](crate::Settings::apply) uses to detect a hook change.
#[derive(Clone)]
pub struct AnyHooks {
    inner: Arc<dyn TransformHooks + Send + Sync>,
    identity: bool,
}

impl core::fmt::Debug for AnyHooks {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AnyHooks")
            .field("identity", &self.identity)
            .finish()
    }
}

impl AnyHooks {
    /// Wrap a concrete hook implementation.
    pub fn new<H: TransformHooks + Send + Sync + 'static>(hooks: H) -> Self {
        Self {
            inner: Arc::new(hooks),
            identity: false,
        }
    }

    /// Identity hooks.
    pub fn identity() -> Self {
        Self {
            inner: Arc::new(Identity),
            identity: true,
        }
    }

    /// Returns true for the built-in identity hooks.
    pub fn is_identity(&self) -> bool {
        self.identity
    }

    /// Transform raw field text before parsing.
    pub fn before_calc(&self, text: &str) -> String {
        self.inner.before_calc(text)
    }

    /// Transform formatted text before writing it to the field.
    pub fn after_calc(&self, text: &str) -> String {
        self.inner.after_calc(text)
    }
}

impl Default for AnyHooks {
    fn default() -> Self {
        Self::identity()
    }
}

impl PartialEq for AnyHooks {
    fn eq(&self, other: &Self) -> bool {
        (self.identity && other.identity) || Arc::ptr_eq(&self.inner, &other.inner)
    }
}
