//! Trial execution: generate, evaluate, and shrink on the first failure.

use std::fmt;
use std::io::Write;

use log::{debug, trace};
use rand::Rng;
use rand::rngs::StdRng;

use crate::arbitrary::Arbitrary;
use crate::config::{TestConfig, create_test_config};
use crate::error::CheckError;
use crate::property::Property;
use crate::registry::{self, Registry};
use crate::report::{self, Repr};
use crate::rng::{create_rng, create_seeded_rng};
use crate::shrink::{Shrinker, shrink_search};

/// Outcome of one runner invocation
#[derive(Debug, Clone, PartialEq)]
pub struct TrialOutcome<T> {
    /// Trials executed, including the failing one
    pub trials_run: usize,
    /// Whether some trial falsified the property
    pub failed: bool,
    /// The value drawn on the failing trial
    pub failing_value: Option<T>,
    /// Failing shrink candidates accepted by the shrink-search
    pub shrink_count: usize,
    /// Smallest failing value found, equal to the failing value when nothing shrank
    pub minimal_counterexample: Option<T>,
    /// Seed of the random source, when the runner created it
    pub seed: Option<u64>,
}

impl<T> TrialOutcome<T> {
    /// Every trial passed
    pub fn passed(trials_run: usize, seed: Option<u64>) -> Self {
        Self {
            trials_run,
            failed: false,
            failing_value: None,
            shrink_count: 0,
            minimal_counterexample: None,
            seed,
        }
    }

    /// Trial `trials_run` failed with `failing_value`
    pub fn falsified(
        trials_run: usize,
        failing_value: T,
        minimal_counterexample: T,
        shrink_count: usize,
        seed: Option<u64>,
    ) -> Self {
        Self {
            trials_run,
            failed: true,
            failing_value: Some(failing_value),
            shrink_count,
            minimal_counterexample: Some(minimal_counterexample),
            seed,
        }
    }

    pub fn is_success(&self) -> bool {
        !self.failed
    }

    /// The value to report: the minimal counterexample, else the failing value
    pub fn counterexample(&self) -> Option<&T> {
        self.minimal_counterexample
            .as_ref()
            .or(self.failing_value.as_ref())
    }
}

impl<T: Repr> TrialOutcome<T> {
    /// One-line summary, see [`report::summarize`]
    pub fn summary(&self) -> String {
        report::summarize(self)
    }
}

impl<T: Repr> fmt::Display for TrialOutcome<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

/// Runs properties against generated values
///
/// Each runner owns its random source. Trials are strictly sequential: every draw
/// advances the one source, so a given seed always reproduces the same run.
pub struct Runner {
    config: TestConfig,
    rng: StdRng,
    seed: Option<u64>,
    output: Box<dyn Write>,
}

impl Runner {
    /// Create a runner seeded from `config.seed`, or from a freshly drawn seed
    pub fn new(config: TestConfig) -> Self {
        let seed = config.seed.unwrap_or_else(|| create_rng().r#gen());
        Self {
            config,
            rng: create_seeded_rng(seed),
            seed: Some(seed),
            output: Box::new(std::io::stdout()),
        }
    }

    /// Create a runner around an existing random source
    pub fn with_rng(config: TestConfig, rng: StdRng) -> Self {
        Self {
            config,
            rng,
            seed: None,
            output: Box::new(std::io::stdout()),
        }
    }

    /// Send verbose lines and summaries to `output` instead of standard output
    pub fn with_output(mut self, output: impl Write + 'static) -> Self {
        self.output = Box::new(output);
        self
    }

    pub fn config(&self) -> &TestConfig {
        &self.config
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Run `property` with the binding registered for `T` in the process-wide registry
    pub fn run<T, P>(&mut self, property: P) -> Result<TrialOutcome<T>, CheckError>
    where
        T: Clone + Repr + 'static,
        P: Property<T>,
    {
        self.config.validate()?;
        let arbitrary = registry::lookup::<T>()?;
        self.execute(&arbitrary, &property)
    }

    /// Run `property` with the binding registered for `T` in `registry`
    pub fn run_in<T, P>(
        &mut self,
        registry: &Registry,
        property: P,
    ) -> Result<TrialOutcome<T>, CheckError>
    where
        T: Clone + Repr + 'static,
        P: Property<T>,
    {
        self.config.validate()?;
        let arbitrary = registry.lookup::<T>()?;
        self.execute(&arbitrary, &property)
    }

    /// Run `property` with an explicit binding, bypassing every registry
    pub fn run_with<T, P>(
        &mut self,
        arbitrary: &Arbitrary<T>,
        property: P,
    ) -> Result<TrialOutcome<T>, CheckError>
    where
        T: Clone + Repr + 'static,
        P: Property<T>,
    {
        self.config.validate()?;
        self.execute(arbitrary, &property)
    }

    /// Like [`Runner::run`], then write the summary line
    pub fn check<T, P>(&mut self, property: P) -> Result<TrialOutcome<T>, CheckError>
    where
        T: Clone + Repr + 'static,
        P: Property<T>,
    {
        let outcome = self.run(property)?;
        self.write_summary(&outcome)?;
        Ok(outcome)
    }

    /// Like [`Runner::run_in`], then write the summary line
    pub fn check_in<T, P>(
        &mut self,
        registry: &Registry,
        property: P,
    ) -> Result<TrialOutcome<T>, CheckError>
    where
        T: Clone + Repr + 'static,
        P: Property<T>,
    {
        let outcome = self.run_in(registry, property)?;
        self.write_summary(&outcome)?;
        Ok(outcome)
    }

    /// Like [`Runner::run_with`], then write the summary line
    pub fn check_with<T, P>(
        &mut self,
        arbitrary: &Arbitrary<T>,
        property: P,
    ) -> Result<TrialOutcome<T>, CheckError>
    where
        T: Clone + Repr + 'static,
        P: Property<T>,
    {
        let outcome = self.run_with(arbitrary, property)?;
        self.write_summary(&outcome)?;
        Ok(outcome)
    }

    fn write_summary<T: Repr>(&mut self, outcome: &TrialOutcome<T>) -> Result<(), CheckError> {
        writeln!(self.output, "{}", outcome.summary())?;
        self.output.flush()?;
        Ok(())
    }

    fn execute<T, P>(
        &mut self,
        arbitrary: &Arbitrary<T>,
        property: &P,
    ) -> Result<TrialOutcome<T>, CheckError>
    where
        T: Clone + Repr + 'static,
        P: Property<T> + ?Sized,
    {
        let trials = self.config.trials;
        let generator_config = &self.config.generator_config;

        for trial in 1..=trials {
            let value = arbitrary.generate(&mut self.rng, generator_config);
            let passed = property.holds(&value);
            trace!("Trial {} {}", trial, if passed { "passed" } else { "failed" });

            if self.config.verbose {
                writeln!(self.output, "{}", report::trial_line(trial, &value, passed))?;
            }

            if !passed {
                debug!(
                    "Property falsified on trial {} (seed: {:?}), shrinking",
                    trial, self.seed
                );
                let shrinker = arbitrary.shrinker().map(|s| s as &dyn Shrinker<T>);
                let result = shrink_search(value, shrinker, property);
                return Ok(TrialOutcome::falsified(
                    trial,
                    result.original,
                    result.minimal,
                    result.shrink_steps,
                    self.seed,
                ));
            }
        }

        debug!("All {} trials passed", trials);
        Ok(TrialOutcome::passed(trials, self.seed))
    }
}

impl fmt::Debug for Runner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runner")
            .field("config", &self.config)
            .field("seed", &self.seed)
            .finish()
    }
}

/// Check a property against the process-wide registry and print the summary
pub fn check<T, P>(property: P) -> Result<TrialOutcome<T>, CheckError>
where
    T: Clone + Repr + 'static,
    P: Property<T>,
{
    Runner::new(create_test_config()).check(property)
}

/// Like [`check`], with an explicit configuration
pub fn check_with_config<T, P>(
    config: TestConfig,
    property: P,
) -> Result<TrialOutcome<T>, CheckError>
where
    T: Clone + Repr + 'static,
    P: Property<T>,
{
    Runner::new(config).check(property)
}

/// Like [`check`], printing one line per trial
pub fn verbose_check<T, P>(property: P) -> Result<TrialOutcome<T>, CheckError>
where
    T: Clone + Repr + 'static,
    P: Property<T>,
{
    Runner::new(create_test_config().verbose()).check(property)
}

/// Check a property with an explicit binding and print the summary
pub fn check_with<T, P>(
    arbitrary: &Arbitrary<T>,
    property: P,
) -> Result<TrialOutcome<T>, CheckError>
where
    T: Clone + Repr + 'static,
    P: Property<T>,
{
    Runner::new(create_test_config()).check_with(arbitrary, property)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigurationError;
    use crate::generator::{ConstantGenerator, from_fn};
    use crate::shrink::IntegerShrinker;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use std::sync::atomic::{AtomicI32, Ordering};

    /// Write sink that can be inspected after the runner has taken ownership
    #[derive(Clone, Default)]
    struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

    impl SharedBuffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.borrow().clone()).unwrap()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("sink closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn seeded(trials: usize) -> TestConfig {
        TestConfig::default().with_trials(trials).with_seed(1234)
    }

    #[test]
    fn test_all_trials_pass() {
        let registry = Registry::with_defaults();
        let mut runner = Runner::new(seeded(100));

        let outcome = runner.run_in(&registry, |_: &i32| true).unwrap();
        assert_eq!(outcome, TrialOutcome::passed(100, Some(1234)));
        assert_eq!(outcome.summary(), "Passed 100 tests.");
    }

    #[test]
    fn test_stops_at_first_failure() {
        let calls = Cell::new(0);
        let arbitrary = Arbitrary::new(ConstantGenerator::new(5i32));
        let mut runner = Runner::new(seeded(100));

        let outcome = runner
            .run_with(&arbitrary, |value: &i32| {
                calls.set(calls.get() + 1);
                calls.get() < 3 || *value != 5
            })
            .unwrap();

        assert!(outcome.failed);
        assert_eq!(outcome.trials_run, 3);
        assert_eq!(calls.get(), 3);
        assert_eq!(outcome.failing_value, Some(5));
        assert_eq!(outcome.minimal_counterexample, Some(5));
        assert_eq!(outcome.shrink_count, 0);
    }

    #[test]
    fn test_override_shrinks_to_boundary() {
        let arbitrary = Arbitrary::with_shrinker(ConstantGenerator::new(640i32), IntegerShrinker);
        let mut runner = Runner::new(seeded(100));

        let outcome = runner
            .run_with(&arbitrary, |value: &i32| *value < 10)
            .unwrap();
        assert_eq!(outcome.trials_run, 1);
        assert_eq!(outcome.failing_value, Some(640));
        assert_eq!(outcome.minimal_counterexample, Some(10));
        assert_eq!(outcome.shrink_count, 6);
        assert_eq!(
            outcome.summary(),
            "Failed after 1 tests (with 6 shrinks), with input `10'"
        );
    }

    #[test]
    fn test_no_shrinker_reports_failing_value() {
        let registry = Registry::with_defaults();
        let mut runner = Runner::new(seeded(100));

        let outcome = runner.run_in(&registry, |_: &bool| false).unwrap();
        assert_eq!(outcome.trials_run, 1);
        assert_eq!(outcome.shrink_count, 0);
        assert_eq!(outcome.failing_value, outcome.minimal_counterexample);
    }

    #[test]
    fn test_unregistered_type_is_configuration_error() {
        #[derive(Debug, Clone)]
        struct Opaque;
        impl Repr for Opaque {
            fn repr(&self) -> String {
                "opaque".to_string()
            }
        }

        let evaluated = Cell::new(false);
        let registry = Registry::with_defaults();
        let mut runner = Runner::new(seeded(100));

        let err = runner
            .run_in(&registry, |_: &Opaque| {
                evaluated.set(true);
                true
            })
            .unwrap_err();
        assert_eq!(
            err,
            CheckError::Configuration(ConfigurationError::not_registered::<Opaque>())
        );
        assert!(!evaluated.get());
    }

    #[test]
    fn test_invalid_config_runs_nothing() {
        let arbitrary = Arbitrary::new(ConstantGenerator::new(1u8));
        let mut runner = Runner::new(seeded(0));

        let err = runner.run_with(&arbitrary, |_: &u8| true).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_verbose_output_lines() {
        let counter = AtomicI32::new(0);
        let arbitrary = Arbitrary::new(from_fn(move |_rng, _config| {
            counter.fetch_add(1, Ordering::SeqCst) + 1
        }));
        let buffer = SharedBuffer::default();
        let mut runner = Runner::new(seeded(10).verbose()).with_output(buffer.clone());

        let outcome = runner
            .check_with(&arbitrary, |value: &i32| *value < 3)
            .unwrap();
        assert_eq!(outcome.trials_run, 3);
        assert_eq!(
            buffer.contents(),
            "Trial 1: `1' passed\n\
             Trial 2: `2' passed\n\
             Trial 3: `3' failed\n\
             Failed after 3 tests, with input `3'\n"
        );
    }

    #[test]
    fn test_quiet_check_writes_only_summary() {
        let registry = Registry::with_defaults();
        let buffer = SharedBuffer::default();
        let mut runner = Runner::new(seeded(25)).with_output(buffer.clone());

        runner.check_in(&registry, |_: &char| true).unwrap();
        assert_eq!(buffer.contents(), "Passed 25 tests.\n");
    }

    #[test]
    fn test_output_failure_propagates() {
        let arbitrary = Arbitrary::new(ConstantGenerator::new(1u8));
        let mut runner = Runner::new(seeded(5).verbose()).with_output(FailingWriter);

        let err = runner.run_with(&arbitrary, |_: &u8| true).unwrap_err();
        assert_eq!(
            err,
            CheckError::Output {
                message: "sink closed".to_string()
            }
        );
    }

    #[test]
    fn test_injected_rng_has_no_seed() {
        let arbitrary = Arbitrary::new(ConstantGenerator::new(1u8));
        let mut runner = Runner::with_rng(seeded(5), create_seeded_rng(3));

        assert_eq!(runner.seed(), None);
        let outcome = runner.run_with(&arbitrary, |_: &u8| true).unwrap();
        assert_eq!(outcome.seed, None);
    }

    #[test]
    fn test_unseeded_runner_records_its_seed() {
        let runner = Runner::new(TestConfig::default());
        assert!(runner.seed().is_some());
    }
}
