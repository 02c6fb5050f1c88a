// EV S-Curve Engine - Core Library
// Exposes all modules for use in the CLI, TUI dashboard, API server, and tests

pub mod config;
pub mod curve;
pub mod export;
pub mod format;
pub mod metrics;
pub mod timeline;

// Re-export commonly used types
pub use config::{ConfigError, Phase, PhaseSchedule, ProjectConfig, AGGREGATE_PHASE_ID};
pub use curve::{s_curve, CurveGenerator, MonthlySample, EV_REALIZATION, EV_SKEW, PV_SKEW};
pub use export::{export_series, write_series_csv};
pub use format::{fmt_cost, fmt_cost_opt, fmt_index, fmt_pct, PLACEHOLDER};
pub use metrics::{EvMetrics, Health};
pub use timeline::{month_date, month_label, month_labels};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
