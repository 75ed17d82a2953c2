//! Core generator trait and type-erased generator handles.

use std::sync::Arc;

use crate::config::GeneratorConfig;

/// Produces random values of `T` from a random source
pub trait Generator<T> {
    /// Generate a random value of type T using the provided RNG and configuration
    fn generate(&self, rng: &mut dyn rand::RngCore, config: &GeneratorConfig) -> T;
}

/// Shared, type-erased generator
///
/// Cloning is cheap; all clones invoke the same underlying generator.
pub struct BoxedGenerator<T> {
    inner: Arc<dyn Generator<T> + Send + Sync>,
}

impl<T> BoxedGenerator<T> {
    pub fn new<G: Generator<T> + Send + Sync + 'static>(generator: G) -> Self {
        Self {
            inner: Arc::new(generator),
        }
    }
}

impl<T> Clone for BoxedGenerator<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Generator<T> for BoxedGenerator<T> {
    fn generate(&self, rng: &mut dyn rand::RngCore, config: &GeneratorConfig) -> T {
        self.inner.generate(rng, config)
    }
}

impl<T> std::fmt::Debug for BoxedGenerator<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoxedGenerator")
            .field("type", &std::any::type_name::<T>())
            .finish()
    }
}

/// Generator backed by a closure, see [`from_fn`]
#[derive(Clone)]
pub struct FnGenerator<F> {
    f: F,
}

impl<T, F> Generator<T> for FnGenerator<F>
where
    F: Fn(&mut dyn rand::RngCore, &GeneratorConfig) -> T,
{
    fn generate(&self, rng: &mut dyn rand::RngCore, config: &GeneratorConfig) -> T {
        (self.f)(rng, config)
    }
}

/// Turn a closure into a [`Generator`]
///
/// ```rust
/// use arbcheck::generator::{Generator, from_fn};
/// use arbcheck::GeneratorConfig;
/// use rand::Rng;
///
/// let dice = from_fn(|rng, _config| rng.gen_range(1..=6u8));
/// let mut rng = arbcheck::create_seeded_rng(3);
/// let roll = dice.generate(&mut rng, &GeneratorConfig::default());
/// assert!((1..=6).contains(&roll));
/// ```
pub fn from_fn<T, F>(f: F) -> FnGenerator<F>
where
    F: Fn(&mut dyn rand::RngCore, &GeneratorConfig) -> T,
{
    FnGenerator { f }
}

/// A generator that always produces the same value
#[derive(Debug, Clone)]
pub struct ConstantGenerator<T> {
    value: T,
}

impl<T: Clone> ConstantGenerator<T> {
    pub fn new(value: T) -> Self {
        Self { value }
    }
}

impl<T: Clone> Generator<T> for ConstantGenerator<T> {
    fn generate(&self, _rng: &mut dyn rand::RngCore, _config: &GeneratorConfig) -> T {
        self.value.clone()
    }
}
