//! Configuration management for the Health Calculators backend
//!
//! Configuration is loaded hierarchically:
//! 1. Default values (in code)
//! 2. TOML config files (config/development.toml or config/production.toml)
//! 3. Environment variables (prefix: HC__)

use anyhow::{bail, Result};
use health_calc_shared::cycle::CycleLimits;
use health_calc_shared::CalculatorSettings;
use serde::{Deserialize, Serialize};
use std::env;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    #[serde(default)]
    pub calculators: CalculatorConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout_secs: u64,
}

/// Calculator tunables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculatorConfig {
    pub min_cycle_length_days: i64,
    pub max_cycle_length_days: i64,
    pub fertile_lead_days: i64,
    pub weight_gain_tolerance_lbs: f64,
    pub upcoming_cycles: u32,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        let settings = CalculatorSettings::default();
        Self {
            min_cycle_length_days: settings.cycle_limits.min_cycle_length_days,
            max_cycle_length_days: settings.cycle_limits.max_cycle_length_days,
            fertile_lead_days: settings.fertile_lead_days,
            weight_gain_tolerance_lbs: settings.weight_gain_tolerance_lbs,
            upcoming_cycles: settings.upcoming_cycles,
        }
    }
}

impl CalculatorConfig {
    /// Settings handed to the calculator core
    pub fn to_settings(&self) -> CalculatorSettings {
        CalculatorSettings {
            cycle_limits: CycleLimits {
                min_cycle_length_days: self.min_cycle_length_days,
                max_cycle_length_days: self.max_cycle_length_days,
                ..CycleLimits::default()
            },
            fertile_lead_days: self.fertile_lead_days,
            weight_gain_tolerance_lbs: self.weight_gain_tolerance_lbs,
            upcoming_cycles: self.upcoming_cycles,
        }
    }
}

/// Prometheus exporter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    pub enabled: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                request_timeout_secs: 30,
            },
            calculators: CalculatorConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from files and environment
    ///
    /// Loading order (later sources override earlier):
    /// 1. Default values
    /// 2. Config file based on RUST_ENV (development.toml or production.toml)
    /// 3. Environment variables with HC__ prefix
    pub fn load() -> Result<Self> {
        let env = env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string());
        let config_file = format!("config/{}.toml", env);

        let config = config::Config::builder()
            .add_source(config::Config::try_from(&AppConfig::default())?)
            .add_source(config::File::with_name(&config_file).required(false))
            // e.g., HC__SERVER__PORT=9000 sets server.port
            .add_source(config::Environment::with_prefix("HC").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Check if running in production mode
    pub fn is_production() -> bool {
        env::var("RUST_ENV")
            .map(|v| v == "production")
            .unwrap_or(false)
    }

    /// Reject settings the calculators cannot work with
    pub fn validate(&self) -> Result<()> {
        let calc = &self.calculators;
        let luteal_max = CycleLimits::default().max_luteal_phase_days;

        if calc.min_cycle_length_days > calc.max_cycle_length_days {
            bail!(
                "calculators.min_cycle_length_days ({}) exceeds max_cycle_length_days ({})",
                calc.min_cycle_length_days,
                calc.max_cycle_length_days
            );
        }
        if calc.min_cycle_length_days <= luteal_max {
            bail!(
                "calculators.min_cycle_length_days must be greater than {}",
                luteal_max
            );
        }
        if calc.fertile_lead_days < 0 {
            bail!("calculators.fertile_lead_days cannot be negative");
        }
        if !calc.weight_gain_tolerance_lbs.is_finite() || calc.weight_gain_tolerance_lbs < 0.0 {
            bail!("calculators.weight_gain_tolerance_lbs must be a non-negative number");
        }
        if !(1..=12).contains(&calc.upcoming_cycles) {
            bail!("calculators.upcoming_cycles must be between 1 and 12");
        }
        if self.server.request_timeout_secs == 0 {
            bail!("server.request_timeout_secs must be positive");
        }
        Ok(())
    }
}
