//! Generators for primitive types and sequences, and their default bindings.

use num_traits::PrimInt;
use rand::Rng;
use rand::distributions::uniform::SampleUniform;

use crate::arbitrary::{Arbitrary, GenerationSize};
use crate::config::GeneratorConfig;
use crate::generator::{BoxedGenerator, Generator};
use crate::shrink::{BoxedShrinker, EmptyShrinker, IntegerShrinker};

/// Generator for boolean values
#[derive(Debug, Clone, Copy, Default)]
pub struct BoolGenerator;

impl Generator<bool> for BoolGenerator {
    fn generate(&self, rng: &mut dyn rand::RngCore, _config: &GeneratorConfig) -> bool {
        rng.r#gen()
    }
}

/// Generator for integer types, uniform over an inclusive range
#[derive(Debug, Clone, Copy)]
pub struct IntGenerator<T> {
    min: T,
    max: T,
}

impl<T> IntGenerator<T>
where
    T: Copy + PartialOrd,
{
    pub fn new(min: T, max: T) -> Self {
        Self { min, max }
    }
}

impl<T: PrimInt> IntGenerator<T> {
    /// Create a generator for the full range of the type
    pub fn full_range() -> Self {
        Self::new(T::min_value(), T::max_value())
    }
}

impl<T> Generator<T> for IntGenerator<T>
where
    T: SampleUniform + PartialOrd + Copy,
{
    fn generate(&self, rng: &mut dyn rand::RngCore, _config: &GeneratorConfig) -> T {
        rng.gen_range(self.min..=self.max)
    }
}

/// Generator for character values, uniform over an inclusive range of scalar values
#[derive(Debug, Clone, Copy)]
pub struct CharGenerator {
    start: char,
    end: char,
}

impl CharGenerator {
    /// Every Unicode scalar value
    pub fn full_range() -> Self {
        Self::with_range('\0', char::MAX)
    }

    pub fn ascii_printable() -> Self {
        Self::with_range(' ', '~')
    }

    pub fn with_range(start: char, end: char) -> Self {
        Self { start, end }
    }
}

impl Default for CharGenerator {
    fn default() -> Self {
        Self::full_range()
    }
}

impl Generator<char> for CharGenerator {
    fn generate(&self, rng: &mut dyn rand::RngCore, _config: &GeneratorConfig) -> char {
        rng.gen_range(self.start..=self.end)
    }
}

/// Generator for strings
///
/// Draws a length in `[0, max_length]` first, then that many independent characters.
/// Without an explicit bound, `GeneratorConfig::max_string_length` applies.
#[derive(Debug, Clone, Default)]
pub struct StringGenerator {
    char_generator: CharGenerator,
    max_length: Option<usize>,
}

impl StringGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_char_generator(char_generator: CharGenerator) -> Self {
        Self {
            char_generator,
            max_length: None,
        }
    }

    pub fn max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }
}

impl Generator<String> for StringGenerator {
    fn generate(&self, rng: &mut dyn rand::RngCore, config: &GeneratorConfig) -> String {
        let max_len = self.max_length.unwrap_or(config.max_string_length);
        let length = rng.gen_range(0..=max_len);

        (0..length)
            .map(|_| self.char_generator.generate(rng, config))
            .collect()
    }
}

/// Generator for `Vec<T>` built from an element generator
///
/// Each invocation reads the shared generation size and advances it, then draws a
/// length in `[0, size]` and that many independent elements.
#[derive(Debug, Clone)]
pub struct SequenceGenerator<T> {
    element: BoxedGenerator<T>,
    size: GenerationSize,
}

impl<T> SequenceGenerator<T> {
    pub fn new(element: BoxedGenerator<T>, size: GenerationSize) -> Self {
        Self { element, size }
    }
}

impl<T> Generator<Vec<T>> for SequenceGenerator<T> {
    fn generate(&self, rng: &mut dyn rand::RngCore, config: &GeneratorConfig) -> Vec<T> {
        let bound = self.size.advance();
        let length = rng.gen_range(0..=bound);

        (0..length)
            .map(|_| self.element.generate(rng, config))
            .collect()
    }
}

/// Full-range integers, shrunk by halving
pub fn integer<T>() -> Arbitrary<T>
where
    T: PrimInt + SampleUniform + Send + Sync + 'static,
{
    Arbitrary::with_shrinker(IntGenerator::<T>::full_range(), IntegerShrinker)
}

/// Any character; no shrinker
pub fn character() -> Arbitrary<char> {
    Arbitrary::new(CharGenerator::full_range())
}

/// Either boolean; no shrinker
pub fn boolean() -> Arbitrary<bool> {
    Arbitrary::new(BoolGenerator)
}

/// Strings of any characters, bounded by the configured maximum length; no shrinker
pub fn string() -> Arbitrary<String> {
    Arbitrary::new(StringGenerator::new())
}

/// Sequences of `element`, sized by `size`, with the empty shrinker
pub fn sequence<T>(element: &Arbitrary<T>, size: GenerationSize) -> Arbitrary<Vec<T>>
where
    T: Send + Sync + 'static,
{
    let generator = SequenceGenerator::new(element.generator().clone(), size.clone());
    Arbitrary::from_parts(
        BoxedGenerator::new(generator),
        Some(BoxedShrinker::new(EmptyShrinker::new())),
        size,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::ConstantGenerator;
    use crate::rng::create_seeded_rng;
    use crate::shrink::Shrinker;

    #[test]
    fn test_int_generator_full_range() {
        let generator = IntGenerator::<i8>::full_range();
        let mut rng = create_seeded_rng(42);
        let config = GeneratorConfig::default();

        let values: Vec<i8> = (0..2000)
            .map(|_| generator.generate(&mut rng, &config))
            .collect();
        assert!(values.iter().any(|v| *v < -100));
        assert!(values.iter().any(|v| *v > 100));
    }

    #[test]
    fn test_int_generator_custom_range() {
        let generator = IntGenerator::new(-3i64, 3);
        let mut rng = create_seeded_rng(7);
        let config = GeneratorConfig::default();

        for _ in 0..200 {
            let value = generator.generate(&mut rng, &config);
            assert!((-3..=3).contains(&value));
        }
    }

    #[test]
    fn test_bool_generator_produces_both() {
        let mut rng = create_seeded_rng(11);
        let config = GeneratorConfig::default();
        let values: Vec<bool> = (0..100)
            .map(|_| BoolGenerator.generate(&mut rng, &config))
            .collect();

        assert!(values.contains(&true));
        assert!(values.contains(&false));
    }

    #[test]
    fn test_char_generator_range() {
        let generator = CharGenerator::ascii_printable();
        let mut rng = create_seeded_rng(3);
        let config = GeneratorConfig::default();

        for _ in 0..200 {
            let c = generator.generate(&mut rng, &config);
            assert!((' '..='~').contains(&c));
        }
    }

    #[test]
    fn test_string_generator_respects_config_bound() {
        let generator = StringGenerator::new();
        let mut rng = create_seeded_rng(5);
        let config = GeneratorConfig::new(4);

        for _ in 0..100 {
            let value = generator.generate(&mut rng, &config);
            assert!(value.chars().count() <= 4);
        }
    }

    #[test]
    fn test_string_generator_explicit_bound_wins() {
        let chars = CharGenerator::ascii_printable();
        let generator = StringGenerator::with_char_generator(chars).max_length(2);
        let mut rng = create_seeded_rng(5);
        let config = GeneratorConfig::default();

        for _ in 0..100 {
            let value = generator.generate(&mut rng, &config);
            assert!(value.len() <= 2);
        }
    }

    #[test]
    fn test_sequence_generator_grows_with_generation_size() {
        let size = GenerationSize::new();
        let generator = SequenceGenerator::new(
            BoxedGenerator::new(ConstantGenerator::new(1u8)),
            size.clone(),
        );
        let mut rng = create_seeded_rng(9);
        let config = GeneratorConfig::default();

        // The first draw is bounded by zero
        assert!(generator.generate(&mut rng, &config).is_empty());

        for call in 1..50 {
            let value = generator.generate(&mut rng, &config);
            assert!(value.len() <= call);
            assert!(value.iter().all(|v| *v == 1));
        }
        assert_eq!(size.current(), 50);
    }

    #[test]
    fn test_default_bindings() {
        assert!(integer::<i32>().has_shrinker());
        assert!(integer::<u16>().has_shrinker());
        assert!(!character().has_shrinker());
        assert!(!boolean().has_shrinker());
        assert!(!string().has_shrinker());
    }

    #[test]
    fn test_sequence_binding_never_shrinks() {
        let arbitrary = sequence(&integer::<i32>(), GenerationSize::new());
        let shrinker = arbitrary.shrinker().unwrap();
        assert_eq!(shrinker.shrink(&vec![5, 6, 7]).count(), 0);
    }
}
