//! The Arbitrary binding: a generator paired with an optional shrinker.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::config::GeneratorConfig;
use crate::generator::{BoxedGenerator, Generator};
use crate::shrink::{BoxedShrinker, Shrinker};

/// Session-scoped size counter shared by every clone of a binding
///
/// Sequence generators read and advance it on every invocation, so successive draws
/// produce progressively larger samples.
#[derive(Debug, Clone, Default)]
pub struct GenerationSize {
    counter: Arc<AtomicUsize>,
}

impl GenerationSize {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value without advancing
    pub fn current(&self) -> usize {
        self.counter.load(Ordering::SeqCst)
    }

    /// Return the current value and advance the counter by one
    pub fn advance(&self) -> usize {
        self.counter.fetch_add(1, Ordering::SeqCst)
    }
}

/// Binding of a generator and an optional shrinker for `T`
///
/// Immutable once built; clones share the generator, the shrinker and the generation
/// size counter.
pub struct Arbitrary<T> {
    generator: BoxedGenerator<T>,
    shrinker: Option<BoxedShrinker<T>>,
    generation_size: GenerationSize,
}

impl<T> Arbitrary<T> {
    /// Binding with a generator and no shrinker
    pub fn new<G>(generator: G) -> Self
    where
        G: Generator<T> + Send + Sync + 'static,
    {
        Self::from_parts(BoxedGenerator::new(generator), None, GenerationSize::new())
    }

    /// Binding with both a generator and a shrinker
    pub fn with_shrinker<G, S>(generator: G, shrinker: S) -> Self
    where
        G: Generator<T> + Send + Sync + 'static,
        S: Shrinker<T> + Send + Sync + 'static,
    {
        Self::from_parts(
            BoxedGenerator::new(generator),
            Some(BoxedShrinker::new(shrinker)),
            GenerationSize::new(),
        )
    }

    pub fn from_parts(
        generator: BoxedGenerator<T>,
        shrinker: Option<BoxedShrinker<T>>,
        generation_size: GenerationSize,
    ) -> Self {
        Self {
            generator,
            shrinker,
            generation_size,
        }
    }

    pub fn generator(&self) -> &BoxedGenerator<T> {
        &self.generator
    }

    pub fn shrinker(&self) -> Option<&BoxedShrinker<T>> {
        self.shrinker.as_ref()
    }

    pub fn has_shrinker(&self) -> bool {
        self.shrinker.is_some()
    }

    pub fn generation_size(&self) -> &GenerationSize {
        &self.generation_size
    }

    /// Draw one value
    pub fn generate(&self, rng: &mut dyn rand::RngCore, config: &GeneratorConfig) -> T {
        self.generator.generate(rng, config)
    }
}

impl<T> Clone for Arbitrary<T> {
    fn clone(&self) -> Self {
        Self {
            generator: self.generator.clone(),
            shrinker: self.shrinker.clone(),
            generation_size: self.generation_size.clone(),
        }
    }
}

impl<T> std::fmt::Debug for Arbitrary<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Arbitrary")
            .field("type", &std::any::type_name::<T>())
            .field("has_shrinker", &self.has_shrinker())
            .field("generation_size", &self.generation_size.current())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::ConstantGenerator;
    use crate::rng::create_seeded_rng;
    use crate::shrink::IntegerShrinker;

    #[test]
    fn test_binding_without_shrinker() {
        let arbitrary = Arbitrary::new(ConstantGenerator::new('x'));
        let mut rng = create_seeded_rng(0);

        assert!(!arbitrary.has_shrinker());
        assert_eq!(
            arbitrary.generate(&mut rng, &GeneratorConfig::default()),
            'x'
        );
    }

    #[test]
    fn test_binding_with_shrinker() {
        let arbitrary = Arbitrary::with_shrinker(ConstantGenerator::new(8i64), IntegerShrinker);
        assert!(arbitrary.has_shrinker());

        let shrinker = arbitrary.shrinker().unwrap();
        assert_eq!(shrinker.shrink(&8).collect::<Vec<_>>(), vec![4, 2, 1]);
    }

    #[test]
    fn test_generation_size_is_shared_between_clones() {
        let arbitrary = Arbitrary::new(ConstantGenerator::new(0u8));
        let clone = arbitrary.clone();

        assert_eq!(arbitrary.generation_size().advance(), 0);
        assert_eq!(clone.generation_size().advance(), 1);
        assert_eq!(arbitrary.generation_size().current(), 2);
    }
}
