//! Configuration types for controlling trial execution and value generation.

use std::cell::RefCell;

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Invalid number of trials (must be > 0)
    InvalidTrials(usize),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidTrials(n) => {
                write!(f, "Invalid trials count: {} (must be > 0)", n)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Default upper bound for generated string lengths
pub const DEFAULT_MAX_STRING_LENGTH: usize = 255;

/// Default number of trials per property
pub const DEFAULT_TRIALS: usize = 100;

/// Configuration handed to every generator invocation
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    /// Inclusive upper bound for string lengths
    pub max_string_length: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            max_string_length: DEFAULT_MAX_STRING_LENGTH,
        }
    }
}

impl GeneratorConfig {
    pub fn new(max_string_length: usize) -> Self {
        Self { max_string_length }
    }
}

/// Configuration for a single property run
#[derive(Debug, Clone, PartialEq)]
pub struct TestConfig {
    /// Number of trials to run before declaring success
    pub trials: usize,
    /// Emit one line per trial to the output sink
    pub verbose: bool,
    /// Optional seed for reproducible runs
    pub seed: Option<u64>,
    /// Generator configuration
    pub generator_config: GeneratorConfig,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            trials: DEFAULT_TRIALS,
            verbose: false,
            seed: None,
            generator_config: GeneratorConfig::default(),
        }
    }
}

impl TestConfig {
    /// Create a new test configuration with validation
    pub fn new(
        trials: usize,
        verbose: bool,
        seed: Option<u64>,
        generator_config: GeneratorConfig,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            trials,
            verbose,
            seed,
            generator_config,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the test configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.trials == 0 {
            return Err(ConfigError::InvalidTrials(self.trials));
        }
        Ok(())
    }

    pub fn with_trials(mut self, trials: usize) -> Self {
        self.trials = trials;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }
}

/// Global configuration for default test behavior
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalConfig {
    pub default_trials: usize,
    pub default_seed: Option<u64>,
    pub generator_config: GeneratorConfig,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            default_trials: DEFAULT_TRIALS,
            default_seed: None,
            generator_config: GeneratorConfig::default(),
        }
    }
}

impl GlobalConfig {
    /// Validate the global configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_trials == 0 {
            return Err(ConfigError::InvalidTrials(self.default_trials));
        }
        Ok(())
    }
}

/// Holds the global configuration for the current thread
#[derive(Debug, Default)]
pub struct ConfigManager {
    global_config: GlobalConfig,
}

impl ConfigManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn global_config(&self) -> &GlobalConfig {
        &self.global_config
    }

    pub fn set_global_config(&mut self, global_config: GlobalConfig) -> Result<(), ConfigError> {
        global_config.validate()?;
        self.global_config = global_config;
        Ok(())
    }

    /// Create a test configuration that inherits from global defaults
    pub fn create_test_config(&self) -> TestConfig {
        TestConfig {
            trials: self.global_config.default_trials,
            verbose: false,
            seed: self.global_config.default_seed,
            generator_config: self.global_config.generator_config.clone(),
        }
    }
}

thread_local! {
    static CONFIG_MANAGER: RefCell<ConfigManager> = RefCell::new(ConfigManager::new());
}

/// Get the current global configuration
pub fn get_global_config() -> GlobalConfig {
    CONFIG_MANAGER.with(|manager| manager.borrow().global_config().clone())
}

/// Set the global configuration
pub fn set_global_config(config: GlobalConfig) -> Result<(), ConfigError> {
    CONFIG_MANAGER.with(|manager| manager.borrow_mut().set_global_config(config))
}

/// Create a test configuration that inherits from global defaults
pub fn create_test_config() -> TestConfig {
    CONFIG_MANAGER.with(|manager| manager.borrow().create_test_config())
}
