//! Typed registry mapping types to their Arbitrary bindings.
//!
//! A [`Registry`] is a table keyed by [`TypeId`]. Scalar bindings are stored as-is;
//! sequence bindings store a composer that resolves the element binding from the same
//! registry whenever the sequence is looked up, so a missing element type is reported at
//! lookup time, before anything is drawn.
//!
//! A hand-written `Vec<T>` binding is either registered as a plain type through
//! [`Registry::register_arbitrary`], which knows nothing about `T`, or through
//! [`Registry::register_sequence_arbitrary`], which records `T` and keeps the same
//! element check as a composed sequence.
//!
//! The process-wide registry behind [`register`], [`lookup`] and friends is created on
//! first use and pre-populated by [`Registry::with_defaults`].

use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::{OnceLock, PoisonError, RwLock};

use log::debug;
use num_traits::PrimInt;
use rand::distributions::uniform::SampleUniform;

use crate::arbitrary::{Arbitrary, GenerationSize};
use crate::config::GeneratorConfig;
use crate::descriptor::TypeDescriptor;
use crate::error::ConfigurationError;
use crate::generator::Generator;
use crate::primitives;
use crate::shrink::Shrinker;

type ErasedBinding = Box<dyn Any + Send + Sync>;

/// Fails when the element type of a container entry has no binding
type ElementCheck = fn(&Registry, &TypeDescriptor) -> Result<(), ConfigurationError>;

/// Resolve `T` as the element of `container`
///
/// A missing `T` is reported as `ElementNotRegistered` against `container`; deeper
/// failures propagate unchanged so the innermost missing type is named.
fn resolve_element<T: 'static>(
    registry: &Registry,
    container: &TypeDescriptor,
) -> Result<Arbitrary<T>, ConfigurationError> {
    registry.lookup::<T>().map_err(|err| match err {
        ConfigurationError::NotRegistered { descriptor } => {
            ConfigurationError::ElementNotRegistered {
                container: container.clone(),
                element: descriptor,
            }
        }
        other => other,
    })
}

fn require_element<T: 'static>(
    registry: &Registry,
    container: &TypeDescriptor,
) -> Result<(), ConfigurationError> {
    resolve_element::<T>(registry, container).map(|_| ())
}

/// Builds a binding from other registry entries at lookup time
trait Compose: Send + Sync {
    fn compose(
        &self,
        registry: &Registry,
        container: &TypeDescriptor,
    ) -> Result<ErasedBinding, ConfigurationError>;
}

/// Composes `Vec<T>` from the binding registered for `T`
struct SequenceComposer<T> {
    size: GenerationSize,
    _phantom: PhantomData<fn() -> T>,
}

impl<T: Send + Sync + 'static> Compose for SequenceComposer<T> {
    fn compose(
        &self,
        registry: &Registry,
        container: &TypeDescriptor,
    ) -> Result<ErasedBinding, ConfigurationError> {
        let element = resolve_element::<T>(registry, container)?;
        Ok(Box::new(primitives::sequence(&element, self.size.clone())))
    }
}

enum Binding {
    Plain(ErasedBinding),
    /// Prebuilt `Vec<T>` binding that still requires `T` to be registered
    Sequence {
        binding: ErasedBinding,
        element: ElementCheck,
    },
    Composed(Box<dyn Compose>),
}

struct Entry {
    descriptor: TypeDescriptor,
    binding: Binding,
}

/// Table of Arbitrary bindings, at most one per type
pub struct Registry {
    entries: HashMap<TypeId, Entry>,
}

impl Registry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Registry holding the built-in bindings
    ///
    /// Integers of every width (full range, halving shrinker), `char`, `bool` and `String`
    /// (no shrinker), and sequences of `i32`, `i64`, `char`, `bool`, `String` and `Vec<i32>`.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register_integers();
        registry.register_arbitrary(primitives::character());
        registry.register_arbitrary(primitives::boolean());
        registry.register_arbitrary(primitives::string());

        registry.register_sequence::<i32>();
        registry.register_sequence::<i64>();
        registry.register_sequence::<char>();
        registry.register_sequence::<bool>();
        registry.register_sequence::<String>();
        registry.register_sequence::<Vec<i32>>();
        registry
    }

    fn register_integers(&mut self) {
        fn integer<T>(registry: &mut Registry)
        where
            T: PrimInt + SampleUniform + Send + Sync + 'static,
        {
            registry.register_arbitrary(primitives::integer::<T>());
        }

        integer::<i8>(self);
        integer::<i16>(self);
        integer::<i32>(self);
        integer::<i64>(self);
        integer::<i128>(self);
        integer::<isize>(self);
        integer::<u8>(self);
        integer::<u16>(self);
        integer::<u32>(self);
        integer::<u64>(self);
        integer::<u128>(self);
        integer::<usize>(self);
    }

    /// Register a generator without a shrinker, replacing any previous binding for `T`
    pub fn register<T, G>(&mut self, generator: G)
    where
        T: 'static,
        G: Generator<T> + Send + Sync + 'static,
    {
        self.register_arbitrary(Arbitrary::new(generator));
    }

    /// Register a generator and a shrinker, replacing any previous binding for `T`
    pub fn register_with_shrinker<T, G, S>(&mut self, generator: G, shrinker: S)
    where
        T: 'static,
        G: Generator<T> + Send + Sync + 'static,
        S: Shrinker<T> + Send + Sync + 'static,
    {
        self.register_arbitrary(Arbitrary::with_shrinker(generator, shrinker));
    }

    /// Install a prebuilt binding, replacing any previous binding for `T`
    ///
    /// The binding is opaque: for `T = Vec<E>` no element check is made on lookup. Use
    /// [`Registry::register_sequence_arbitrary`] to keep one.
    pub fn register_arbitrary<T: 'static>(&mut self, arbitrary: Arbitrary<T>) {
        self.insert(
            TypeDescriptor::of::<T>(),
            Binding::Plain(Box::new(arbitrary)),
        );
    }

    /// Make `Vec<T>` resolvable, composed from whatever is registered for `T`
    ///
    /// `T` itself does not need to be registered yet; it is resolved on every lookup.
    /// The sequence size counter starts at zero and lives as long as this entry.
    pub fn register_sequence<T: Send + Sync + 'static>(&mut self) {
        let composer = SequenceComposer::<T> {
            size: GenerationSize::new(),
            _phantom: PhantomData,
        };
        self.insert(
            TypeDescriptor::sequence_of::<T>(),
            Binding::Composed(Box::new(composer)),
        );
    }

    /// Install a prebuilt `Vec<T>` binding, replacing any previous binding for `Vec<T>`
    ///
    /// The entry records `T` as its element, and lookups of `Vec<T>` fail with
    /// `ElementNotRegistered` while `T` has no binding, even though the stored generator
    /// never consults it.
    pub fn register_sequence_arbitrary<T: 'static>(&mut self, arbitrary: Arbitrary<Vec<T>>) {
        self.insert(
            TypeDescriptor::sequence_of::<T>(),
            Binding::Sequence {
                binding: Box::new(arbitrary),
                element: require_element::<T>,
            },
        );
    }

    fn insert(&mut self, descriptor: TypeDescriptor, binding: Binding) {
        let entry = Entry {
            descriptor: descriptor.clone(),
            binding,
        };
        let replaced = self.entries.insert(descriptor.id(), entry).is_some();
        if replaced {
            debug!("Replaced Arbitrary binding for `{}'", descriptor);
        } else {
            debug!("Registered Arbitrary binding for `{}'", descriptor);
        }
    }

    /// Resolve the binding for `T`
    ///
    /// Container element types are resolved recursively and eagerly.
    pub fn lookup<T: 'static>(&self) -> Result<Arbitrary<T>, ConfigurationError> {
        let Some(entry) = self.entries.get(&TypeId::of::<T>()) else {
            debug!("No Arbitrary binding for `{}'", type_name::<T>());
            return Err(ConfigurationError::not_registered::<T>());
        };

        let mismatch = || ConfigurationError::SignatureMismatch {
            descriptor: entry.descriptor.clone(),
            expected: type_name::<T>(),
        };

        match &entry.binding {
            Binding::Plain(erased) => erased
                .downcast_ref::<Arbitrary<T>>()
                .cloned()
                .ok_or_else(mismatch),
            Binding::Sequence { binding, element } => {
                element(self, &entry.descriptor)?;
                binding
                    .downcast_ref::<Arbitrary<T>>()
                    .cloned()
                    .ok_or_else(mismatch)
            }
            Binding::Composed(composer) => {
                let erased = composer.compose(self, &entry.descriptor)?;
                erased
                    .downcast::<Arbitrary<T>>()
                    .map(|arbitrary| *arbitrary)
                    .map_err(|_| mismatch())
            }
        }
    }

    /// Whether `T` resolves to a generator, including its element types
    pub fn has_generator<T: 'static>(&self) -> bool {
        self.lookup::<T>().is_ok()
    }

    /// Whether `T` resolves to a binding that carries a shrinker
    pub fn has_shrinker<T: 'static>(&self) -> bool {
        self.lookup::<T>()
            .map(|arbitrary| arbitrary.has_shrinker())
            .unwrap_or(false)
    }

    /// Resolve `T` and draw a single value from it
    pub fn generate<T: 'static>(
        &self,
        rng: &mut dyn rand::RngCore,
        config: &GeneratorConfig,
    ) -> Result<T, ConfigurationError> {
        Ok(self.lookup::<T>()?.generate(rng, config))
    }

    /// Remove the binding for `T`
    pub fn remove<T: 'static>(&mut self) -> bool {
        self.entries.remove(&TypeId::of::<T>()).is_some()
    }

    /// The descriptor `T` was registered under
    pub fn descriptor<T: 'static>(&self) -> Option<&TypeDescriptor> {
        self.entries
            .get(&TypeId::of::<T>())
            .map(|entry| &entry.descriptor)
    }

    /// Descriptors of every registered type, in no particular order
    pub fn descriptors(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.entries.values().map(|entry| &entry.descriptor)
    }

    pub fn contains<T: 'static>(&self) -> bool {
        self.entries.contains_key(&TypeId::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.descriptors()).finish()
    }
}

static GLOBAL_REGISTRY: OnceLock<RwLock<Registry>> = OnceLock::new();

/// The process-wide registry, populated with the defaults on first use
pub fn global_registry() -> &'static RwLock<Registry> {
    GLOBAL_REGISTRY.get_or_init(|| RwLock::new(Registry::with_defaults()))
}

/// Run `f` with shared access to the process-wide registry
pub fn with_global<R>(f: impl FnOnce(&Registry) -> R) -> R {
    let registry = global_registry()
        .read()
        .unwrap_or_else(PoisonError::into_inner);
    f(&registry)
}

fn with_global_mut<R>(f: impl FnOnce(&mut Registry) -> R) -> R {
    let mut registry = global_registry()
        .write()
        .unwrap_or_else(PoisonError::into_inner);
    f(&mut registry)
}

/// Register a generator for `T` in the process-wide registry
pub fn register<T, G>(generator: G)
where
    T: 'static,
    G: Generator<T> + Send + Sync + 'static,
{
    with_global_mut(|registry| registry.register(generator));
}

/// Register a generator and shrinker for `T` in the process-wide registry
pub fn register_with_shrinker<T, G, S>(generator: G, shrinker: S)
where
    T: 'static,
    G: Generator<T> + Send + Sync + 'static,
    S: Shrinker<T> + Send + Sync + 'static,
{
    with_global_mut(|registry| registry.register_with_shrinker(generator, shrinker));
}

/// Install a prebuilt binding in the process-wide registry
pub fn register_arbitrary<T: 'static>(arbitrary: Arbitrary<T>) {
    with_global_mut(|registry| registry.register_arbitrary(arbitrary));
}

/// Install a prebuilt `Vec<T>` binding in the process-wide registry, keeping the element check
pub fn register_sequence_arbitrary<T: 'static>(arbitrary: Arbitrary<Vec<T>>) {
    with_global_mut(|registry| registry.register_sequence_arbitrary(arbitrary));
}

/// Make `Vec<T>` resolvable in the process-wide registry
pub fn register_sequence<T: Send + Sync + 'static>() {
    with_global_mut(|registry| registry.register_sequence::<T>());
}

/// Resolve `T` in the process-wide registry
pub fn lookup<T: 'static>() -> Result<Arbitrary<T>, ConfigurationError> {
    with_global(|registry| registry.lookup::<T>())
}

pub fn has_generator<T: 'static>() -> bool {
    with_global(|registry| registry.has_generator::<T>())
}

pub fn has_shrinker<T: 'static>() -> bool {
    with_global(|registry| registry.has_shrinker::<T>())
}

/// Draw a single `T` using the process-wide registry
pub fn generate<T: 'static>(
    rng: &mut dyn rand::RngCore,
    config: &GeneratorConfig,
) -> Result<T, ConfigurationError> {
    with_global(|registry| registry.generate::<T>(rng, config))
}
