//! Shrinkers and the shrink-search that minimizes a failing value.

use std::marker::PhantomData;
use std::sync::Arc;

use log::{debug, trace};
use num_traits::PrimInt;

use crate::property::Property;

/// Produces a finite, ordered, lazily evaluated sequence of simpler candidates
///
/// The sequence must terminate and must never contain the input value itself.
pub trait Shrinker<T> {
    /// Create an iterator of shrunk values
    fn shrink(&self, value: &T) -> Box<dyn Iterator<Item = T>>;
}

/// Shared, type-erased shrinker
pub struct BoxedShrinker<T> {
    inner: Arc<dyn Shrinker<T> + Send + Sync>,
}

impl<T> BoxedShrinker<T> {
    pub fn new<S: Shrinker<T> + Send + Sync + 'static>(shrinker: S) -> Self {
        Self {
            inner: Arc::new(shrinker),
        }
    }
}

impl<T> Clone for BoxedShrinker<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Shrinker<T> for BoxedShrinker<T> {
    fn shrink(&self, value: &T) -> Box<dyn Iterator<Item = T>> {
        self.inner.shrink(value)
    }
}

impl<T> std::fmt::Debug for BoxedShrinker<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoxedShrinker")
            .field("type", &std::any::type_name::<T>())
            .finish()
    }
}

/// Shrinker backed by a closure, see [`from_fn`]
#[derive(Clone)]
pub struct FnShrinker<F> {
    f: F,
}

impl<T, F> Shrinker<T> for FnShrinker<F>
where
    F: Fn(&T) -> Box<dyn Iterator<Item = T>>,
{
    fn shrink(&self, value: &T) -> Box<dyn Iterator<Item = T>> {
        (self.f)(value)
    }
}

/// Turn a closure returning any iterable of candidates into a [`Shrinker`]
pub fn from_fn<T, I, F>(f: F) -> FnShrinker<impl Fn(&T) -> Box<dyn Iterator<Item = T>>>
where
    T: 'static,
    F: Fn(&T) -> I,
    I: IntoIterator<Item = T>,
    I::IntoIter: 'static,
{
    FnShrinker {
        f: move |value: &T| Box::new(f(value).into_iter()) as Box<dyn Iterator<Item = T>>,
    }
}

/// Successive halvings of an integer, truncating toward zero
///
/// Starts at `value / 2` and stops before reaching zero, so the magnitudes are strictly
/// decreasing, every item has magnitude at least one, and `|value| < 2` yields nothing.
#[derive(Debug, Clone)]
pub struct Halving<T> {
    next: T,
}

impl<T: PrimInt> Halving<T> {
    pub fn new(value: T) -> Self {
        Self {
            next: value / two(),
        }
    }
}

impl<T: PrimInt> Iterator for Halving<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.next.is_zero() {
            return None;
        }
        let current = self.next;
        self.next = current / two();
        Some(current)
    }
}

fn two<T: PrimInt>() -> T {
    T::one() + T::one()
}

/// Shrinks integers by repeated halving, see [`Halving`]
#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerShrinker;

impl<T: PrimInt + 'static> Shrinker<T> for IntegerShrinker {
    fn shrink(&self, value: &T) -> Box<dyn Iterator<Item = T>> {
        Box::new(Halving::new(*value))
    }
}

/// Never proposes a candidate
///
/// Used for sequences: a failing container is reported exactly as generated.
#[derive(Debug, Clone, Copy)]
pub struct EmptyShrinker<T> {
    _phantom: PhantomData<fn() -> T>,
}

impl<T> EmptyShrinker<T> {
    pub fn new() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<T> Default for EmptyShrinker<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> Shrinker<T> for EmptyShrinker<T> {
    fn shrink(&self, _value: &T) -> Box<dyn Iterator<Item = T>> {
        Box::new(std::iter::empty())
    }
}

/// Result of a shrink-search
#[derive(Debug, Clone, PartialEq)]
pub struct ShrinkResult<T> {
    /// Value that originally failed
    pub original: T,
    /// Last candidate that still failed, or the original if none did
    pub minimal: T,
    /// Number of failing candidates accepted
    pub shrink_steps: usize,
    /// True when the candidate sequence ran out without the property holding
    pub exhausted: bool,
}

impl<T: Clone> ShrinkResult<T> {
    /// Result for a value whose type has no shrinker
    pub fn no_shrinking(original: T) -> Self {
        Self {
            minimal: original.clone(),
            original,
            shrink_steps: 0,
            exhausted: true,
        }
    }
}

/// Minimize a failing value with a single pass over its candidate sequence
///
/// The sequence is produced once from `original`. Candidates are tried in order: each one
/// that still falsifies the property becomes the current minimum, and the walk stops at
/// the first candidate for which the property holds. Newly found minima are not shrunk
/// again.
pub fn shrink_search<T, P>(
    original: T,
    shrinker: Option<&dyn Shrinker<T>>,
    property: &P,
) -> ShrinkResult<T>
where
    T: Clone,
    P: Property<T> + ?Sized,
{
    let Some(shrinker) = shrinker else {
        return ShrinkResult::no_shrinking(original);
    };

    let mut minimal = None;
    let mut shrink_steps = 0;
    let mut exhausted = true;

    for candidate in shrinker.shrink(&original) {
        if property.holds(&candidate) {
            trace!("Shrink candidate {} passes, stopping", shrink_steps + 1);
            exhausted = false;
            break;
        }
        shrink_steps += 1;
        trace!("Shrink step {}: found smaller failing value", shrink_steps);
        minimal = Some(candidate);
    }

    debug!("Shrinking completed after {} steps", shrink_steps);

    ShrinkResult {
        minimal: minimal.unwrap_or_else(|| original.clone()),
        original,
        shrink_steps,
        exhausted,
    }
}
