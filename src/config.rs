/*!
 * Simulation Configuration
 * Settings fixed for the lifetime of one run, loaded from the environment
 *
 * Environment variables:
 * - PROCSIM_POLICY: fcfs | sjf | priority | round_robin (default: fcfs)
 * - PROCSIM_QUANTUM: round-robin quantum, 1..=10 (default: 2)
 * - PROCSIM_MEMORY: memory pool size (default: 4096)
 * - PROCSIM_BUFFER_CAPACITY: bounded buffer slots (default: 5)
 * - PROCSIM_SLICE_LIMIT: round-robin slices per batch (default: 100)
 * - PROCSIM_DEMO_ITEMS: items moved by the producer/consumer demo (default: 10)
 * - PROCSIM_SEED: workload seed (default: random)
 * - PROCSIM_TRACE_JSON: JSON log output (default: false)
 */

use crate::core::errors::{ConfigError, ConfigResult};
use crate::core::limits::{
    DEFAULT_BUFFER_CAPACITY, DEFAULT_DEMO_ITEMS, DEFAULT_MEMORY_CAPACITY, DEFAULT_QUANTUM,
    DEFAULT_SLICE_LIMIT, MAX_QUANTUM, MIN_QUANTUM,
};
use crate::core::types::{MemoryUnits, Tick};
use crate::process::types::SchedulingPolicy;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Configuration for one simulation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub policy: SchedulingPolicy,
    pub quantum: Tick,
    pub memory_capacity: MemoryUnits,
    pub buffer_capacity: usize,
    pub slice_limit: usize,
    pub demo_items: usize,
    pub seed: Option<u64>,
    pub trace_json: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            policy: SchedulingPolicy::default(),
            quantum: DEFAULT_QUANTUM,
            memory_capacity: DEFAULT_MEMORY_CAPACITY,
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            slice_limit: DEFAULT_SLICE_LIMIT,
            demo_items: DEFAULT_DEMO_ITEMS,
            seed: None,
            trace_json: false,
        }
    }
}

impl SimulationConfig {
    /// Load from `PROCSIM_*` variables, falling back to defaults
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary key lookup, then validate
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(policy) = lookup("PROCSIM_POLICY") {
            config.policy = policy.parse()?;
        }
        if let Some(quantum) = parse_var(&lookup, "PROCSIM_QUANTUM")? {
            config.quantum = quantum;
        }
        if let Some(memory) = parse_var(&lookup, "PROCSIM_MEMORY")? {
            config.memory_capacity = memory;
        }
        if let Some(capacity) = parse_var(&lookup, "PROCSIM_BUFFER_CAPACITY")? {
            config.buffer_capacity = capacity;
        }
        if let Some(limit) = parse_var(&lookup, "PROCSIM_SLICE_LIMIT")? {
            config.slice_limit = limit;
        }
        if let Some(items) = parse_var(&lookup, "PROCSIM_DEMO_ITEMS")? {
            config.demo_items = items;
        }
        config.seed = parse_var(&lookup, "PROCSIM_SEED")?;
        if let Some(json) = lookup("PROCSIM_TRACE_JSON") {
            config.trace_json = json == "1" || json.eq_ignore_ascii_case("true");
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if !(MIN_QUANTUM..=MAX_QUANTUM).contains(&self.quantum) {
            return Err(ConfigError::InvalidQuantum {
                value: self.quantum,
                min: MIN_QUANTUM,
                max: MAX_QUANTUM,
            });
        }
        if self.memory_capacity == 0 {
            return Err(ConfigError::InvalidCapacity("memory_capacity"));
        }
        if self.buffer_capacity == 0 {
            return Err(ConfigError::InvalidCapacity("buffer_capacity"));
        }
        if self.slice_limit == 0 {
            return Err(ConfigError::InvalidCapacity("slice_limit"));
        }
        Ok(())
    }

    pub fn with_policy(mut self, policy: SchedulingPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> ConfigResult<Option<T>> {
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { key, value: raw }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = SimulationConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, SimulationConfig::default());
        assert_eq!(config.quantum, 2);
        assert_eq!(config.memory_capacity, 4096);
    }

    #[test]
    fn test_overrides() {
        let config = SimulationConfig::from_lookup(lookup(&[
            ("PROCSIM_POLICY", "rr"),
            ("PROCSIM_QUANTUM", "4"),
            ("PROCSIM_SEED", "42"),
            ("PROCSIM_TRACE_JSON", "true"),
        ]))
        .unwrap();
        assert_eq!(config.policy, SchedulingPolicy::RoundRobin);
        assert_eq!(config.quantum, 4);
        assert_eq!(config.seed, Some(42));
        assert!(config.trace_json);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert_eq!(
            SimulationConfig::from_lookup(lookup(&[("PROCSIM_QUANTUM", "0")])).unwrap_err(),
            ConfigError::InvalidQuantum {
                value: 0,
                min: 1,
                max: 10
            }
        );
        assert_eq!(
            SimulationConfig::from_lookup(lookup(&[("PROCSIM_MEMORY", "lots")])).unwrap_err(),
            ConfigError::InvalidValue {
                key: "PROCSIM_MEMORY",
                value: "lots".into()
            }
        );
        assert!(matches!(
            SimulationConfig::from_lookup(lookup(&[("PROCSIM_POLICY", "lottery")])),
            Err(ConfigError::InvalidPolicy(_))
        ));
        assert_eq!(
            SimulationConfig::from_lookup(lookup(&[("PROCSIM_BUFFER_CAPACITY", "0")])).unwrap_err(),
            ConfigError::InvalidCapacity("buffer_capacity")
        );
    }

    #[test]
    fn test_serde_defaults_missing_fields() {
        let config: SimulationConfig = serde_json::from_str(r#"{"policy":"sjf"}"#).unwrap();
        assert_eq!(config.policy, SchedulingPolicy::Sjf);
        assert_eq!(config.buffer_capacity, 5);
    }
}
