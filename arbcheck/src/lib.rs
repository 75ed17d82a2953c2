//! # arbcheck - QuickCheck-style property testing
//!
//! arbcheck draws random inputs for a boolean property, evaluates the property against
//! each one, and on the first failure searches the failing value's shrink candidates for a
//! smaller counterexample before reporting it.
//!
//! Generators and shrinkers are bound to types in a [`Registry`]. A process-wide registry
//! comes pre-populated with integers, `char`, `bool`, `String` and a few sequence types;
//! a single run can also bypass it with an explicit [`Arbitrary`] binding.
//!
//! ## Quick Start
//!
//! ```rust
//! use arbcheck::{Registry, Runner, TestConfig};
//!
//! let registry = Registry::with_defaults();
//! let mut runner = Runner::new(TestConfig::default().with_seed(7));
//!
//! let outcome = runner
//!     .run_in(&registry, |n: &i32| (*n as i64).abs() >= 0)
//!     .unwrap();
//! assert_eq!(outcome.summary(), "Passed 100 tests.");
//!
//! let outcome = runner.run_in(&registry, |n: &i32| *n < 10).unwrap();
//! assert!(outcome.failed);
//! assert!(outcome.minimal_counterexample.unwrap() >= 10);
//! ```

// Public modules
pub mod arbitrary;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod execution;
pub mod generator;
pub mod primitives;
pub mod property;
pub mod registry;
pub mod report;
pub mod rng;
pub mod shrink;

// Re-export the main public API
pub use arbitrary::{Arbitrary, GenerationSize};
pub use config::{
    ConfigError, ConfigManager, GeneratorConfig, GlobalConfig, TestConfig, create_test_config,
    get_global_config, set_global_config,
};
pub use descriptor::TypeDescriptor;
pub use error::{CheckError, ConfigurationError};
pub use execution::{Runner, TrialOutcome, check, check_with, check_with_config, verbose_check};
pub use generator::{BoxedGenerator, ConstantGenerator, Generator};
pub use primitives::{
    BoolGenerator, CharGenerator, IntGenerator, SequenceGenerator, StringGenerator,
};
pub use property::{Not, Property};
pub use registry::{
    Registry, global_registry, has_generator, has_shrinker, lookup, register, register_arbitrary,
    register_sequence, register_sequence_arbitrary, register_with_shrinker,
};
pub use report::{Repr, summarize};
pub use rng::{DefaultRngProvider, RngProvider, create_rng, create_seeded_rng};
pub use shrink::{
    BoxedShrinker, EmptyShrinker, Halving, IntegerShrinker, ShrinkResult, Shrinker, shrink_search,
};
