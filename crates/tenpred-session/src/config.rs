//! Session configuration

/// Environment variable toggling parallel evaluation (`0`/`false` disables)
pub const PARALLEL_ENV: &str = "TENPRED_PARALLEL";

/// Environment variable with the minimum sample count for parallel evaluation
pub const MIN_PARALLEL_SAMPLES_ENV: &str = "TENPRED_MIN_PARALLEL_SAMPLES";

/// Configuration for evaluating requests across samples
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictConfig {
    /// Evaluate samples in parallel (requires the `parallel` feature)
    pub enable_parallel: bool,
    /// Minimum number of selected samples to go parallel
    /// Set to 0 to always go parallel when enabled
    pub min_samples_for_parallel: usize,
}

impl Default for PredictConfig {
    /// Built-in defaults, overridden by `TENPRED_PARALLEL` and
    /// `TENPRED_MIN_PARALLEL_SAMPLES` when set
    fn default() -> Self {
        let base = Self::new();

        let enable_parallel = std::env::var(PARALLEL_ENV)
            .map(|s| parse_flag(&s).unwrap_or(base.enable_parallel))
            .unwrap_or(base.enable_parallel);

        let min_samples_for_parallel = std::env::var(MIN_PARALLEL_SAMPLES_ENV)
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(base.min_samples_for_parallel);

        Self {
            enable_parallel,
            min_samples_for_parallel,
        }
    }
}

impl PredictConfig {
    /// Built-in defaults, ignoring the environment
    pub fn new() -> Self {
        Self {
            enable_parallel: true,
            min_samples_for_parallel: 8,
        }
    }

    /// Defaults with environment overrides
    pub fn from_env() -> Self {
        Self::default()
    }

    /// Enable or disable parallel evaluation
    pub fn enable_parallel(mut self, enable: bool) -> Self {
        self.enable_parallel = enable;
        self
    }

    /// Set the minimum sample count for parallel evaluation
    pub fn min_samples_for_parallel(mut self, min_samples: usize) -> Self {
        self.min_samples_for_parallel = min_samples;
        self
    }

    /// Whether `sample_count` samples should be evaluated in parallel
    #[inline]
    pub fn should_use_parallel(&self, sample_count: usize) -> bool {
        if !cfg!(feature = "parallel") || !self.enable_parallel {
            return false;
        }
        if self.min_samples_for_parallel == 0 {
            return true;
        }
        sample_count >= self.min_samples_for_parallel
    }
}

fn parse_flag(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
