use crate::probability::ProbabilityMode;

/// Tunable parameters shared by the search and probability bots.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BotParams {
    /// Sampled deals per search decision (default: 100)
    pub search_iterations: usize,

    /// Cards explored per seat at every search node (default: 1)
    pub branch_factor: usize,

    /// Constrained deal attempts before ignoring suit knowledge (default: 10)
    pub sampler_attempts: usize,

    /// Win probability a card needs to count towards a bid (default: 0.5)
    pub win_threshold: f64,

    /// Estimator used by the probability bot (default: simulated)
    pub probability_mode: ProbabilityMode,

    /// Shuffles per opponent in simulated mode (default: 1000)
    pub simulation_iterations: usize,
}

impl Default for BotParams {
    fn default() -> Self {
        Self {
            search_iterations: 100,
            branch_factor: 1,
            sampler_attempts: 10,
            win_threshold: 0.5,
            probability_mode: ProbabilityMode::Simulated,
            simulation_iterations: 1000,
        }
    }
}

impl BotParams {
    pub fn from_env() -> Self {
        Self::from_reader(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whichever `WIZ_*` values parse; invalid values
    /// are ignored.
    pub fn from_reader<F>(mut read: F) -> Self
    where
        F: FnMut(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let positive = |raw: String| raw.trim().parse::<usize>().ok().filter(|value| *value > 0);

        let search_iterations = read("WIZ_SEARCH_ITERATIONS")
            .and_then(positive)
            .unwrap_or(defaults.search_iterations);

        let branch_factor = read("WIZ_SEARCH_BRANCH_FACTOR")
            .and_then(positive)
            .unwrap_or(defaults.branch_factor);

        let sampler_attempts = read("WIZ_SAMPLER_ATTEMPTS")
            .and_then(positive)
            .unwrap_or(defaults.sampler_attempts);

        let win_threshold = read("WIZ_WIN_THRESHOLD")
            .and_then(|raw| raw.trim().parse::<f64>().ok())
            .filter(|value| value.is_finite() && (0.0..=1.0).contains(value))
            .unwrap_or(defaults.win_threshold);

        let probability_mode = read("WIZ_PROB_MODE")
            .and_then(|raw| ProbabilityMode::parse(&raw))
            .unwrap_or(defaults.probability_mode);

        let simulation_iterations = read("WIZ_PROB_SIM_ITERATIONS")
            .and_then(positive)
            .unwrap_or(defaults.simulation_iterations);

        Self {
            search_iterations,
            branch_factor,
            sampler_attempts,
            win_threshold,
            probability_mode,
            simulation_iterations,
        }
    }
}
