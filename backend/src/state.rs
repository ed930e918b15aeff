//! Application state management
//!
//! Shared, read-only state passed to every handler via Axum's state
//! extraction. Built once at start-up; cloning only bumps reference counts.

use crate::config::AppConfig;
use health_calc_shared::CalculatorSettings;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Calculator tunables derived from `config.calculators`
    pub settings: CalculatorSettings,
    /// Present when the Prometheus recorder is installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(config: AppConfig, metrics: Option<PrometheusHandle>) -> Self {
        let settings = config.calculators.to_settings();
        Self {
            config: Arc::new(config),
            settings,
            metrics,
        }
    }

    /// Get a reference to the configuration
    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[inline]
    pub fn settings(&self) -> &CalculatorSettings {
        &self.settings
    }
}
