// 🗂️ Project Configuration - Phases, Schedules, Horizon
// Immutable configuration validated eagerly at load time.
//
// The curve generator is total over a valid configuration, so every
// degenerate input (zero-length schedule, non-positive budget, aggregate
// budget drift) is rejected here, before a generator ever exists.

use anyhow::{Context as AnyhowContext, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Phase id reserved for the project-wide rollup series.
pub const AGGREGATE_PHASE_ID: &str = "ALL";

// ============================================================================
// PHASE & SCHEDULE
// ============================================================================

/// A named project segment with its total planned cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    pub id: String,
    pub display_name: String,
    /// Budget at Completion - total planned cost, must be > 0
    pub bac: f64,
}

/// Timing parameters bound to a phase.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseSchedule {
    /// Month offset from project start where planned work begins
    pub start_month: i32,
    /// Month offset where planned work completes; must exceed start_month
    pub end_month: i32,
    /// Reporting lag of the earned-value curve behind plan, in months
    pub ev_delay: i32,
    /// Multiplier from earned value to actual cost (>1 = overspend)
    pub ac_variance: f64,
}

impl PhaseSchedule {
    pub fn duration(&self) -> i32 {
        self.end_month - self.start_month
    }
}

// ============================================================================
// CONFIG ERRORS
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// endMonth <= startMonth would divide by zero in progress normalization
    InvalidSchedule {
        phase: String,
        start_month: i32,
        end_month: i32,
    },
    NonPositiveBac {
        phase: String,
        bac: f64,
    },
    /// A real phase has no schedule row
    MissingSchedule {
        phase: String,
    },
    /// A schedule row references a phase id not in the phase table
    UnknownPhase {
        phase: String,
    },
    /// The ALL phase BAC must equal the sum of the real phases' BACs
    AggregateBacMismatch {
        aggregate: f64,
        sum: f64,
    },
    DataDateOutOfRange {
        data_date: u32,
        horizon_months: u32,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidSchedule {
                phase,
                start_month,
                end_month,
            } => write!(
                f,
                "phase '{}': end_month ({}) must be greater than start_month ({})",
                phase, end_month, start_month
            ),
            ConfigError::NonPositiveBac { phase, bac } => {
                write!(f, "phase '{}': BAC must be positive, got {}", phase, bac)
            }
            ConfigError::MissingSchedule { phase } => {
                write!(f, "phase '{}': no schedule defined", phase)
            }
            ConfigError::UnknownPhase { phase } => {
                write!(f, "schedule references unknown phase '{}'", phase)
            }
            ConfigError::AggregateBacMismatch { aggregate, sum } => write!(
                f,
                "aggregate BAC ({}) does not equal sum of phase BACs ({})",
                aggregate, sum
            ),
            ConfigError::DataDateOutOfRange {
                data_date,
                horizon_months,
            } => write!(
                f,
                "data date ({}) falls outside the {}-month horizon",
                data_date, horizon_months
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// PROJECT CONFIG
// ============================================================================

/// Full project configuration: phase table, schedule table, horizon and
/// data date. Set once at startup and never mutated; series generation is
/// deterministic given the same configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub project_name: String,
    /// Calendar date anchoring month index 0 (used only for axis labels)
    pub start_date: NaiveDate,
    /// Total number of months generated for every series
    pub horizon_months: u32,
    /// Last month index with reported actuals; ev/ac are absent after it
    pub data_date: u32,
    /// Phase table in display order; may include the "ALL" rollup
    pub phases: Vec<Phase>,
    /// Schedule table keyed by phase id; the "ALL" rollup has no schedule
    pub schedules: HashMap<String, PhaseSchedule>,
}

impl ProjectConfig {
    /// Load a configuration from a JSON file and validate it.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {:?}", path))?;
        let config: ProjectConfig = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse config file {:?}", path))?;
        config.validate()?;
        Ok(config)
    }

    pub fn phase(&self, id: &str) -> Option<&Phase> {
        self.phases.iter().find(|p| p.id == id)
    }

    pub fn schedule(&self, id: &str) -> Option<&PhaseSchedule> {
        self.schedules.get(id)
    }

    /// All phases except the "ALL" rollup, in display order.
    pub fn real_phases(&self) -> impl Iterator<Item = &Phase> {
        self.phases.iter().filter(|p| p.id != AGGREGATE_PHASE_ID)
    }

    pub fn aggregate_phase(&self) -> Option<&Phase> {
        self.phase(AGGREGATE_PHASE_ID)
    }

    /// Validate every invariant the curve generator relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for phase in &self.phases {
            if phase.bac <= 0.0 {
                return Err(ConfigError::NonPositiveBac {
                    phase: phase.id.clone(),
                    bac: phase.bac,
                });
            }
        }

        for phase in self.real_phases() {
            match self.schedules.get(&phase.id) {
                None => {
                    return Err(ConfigError::MissingSchedule {
                        phase: phase.id.clone(),
                    })
                }
                Some(sched) if sched.end_month <= sched.start_month => {
                    return Err(ConfigError::InvalidSchedule {
                        phase: phase.id.clone(),
                        start_month: sched.start_month,
                        end_month: sched.end_month,
                    });
                }
                Some(_) => {}
            }
        }

        for id in self.schedules.keys() {
            if self.phase(id).is_none() || id == AGGREGATE_PHASE_ID {
                return Err(ConfigError::UnknownPhase { phase: id.clone() });
            }
        }

        if let Some(aggregate) = self.aggregate_phase() {
            let sum: f64 = self.real_phases().map(|p| p.bac).sum();
            if (aggregate.bac - sum).abs() > 1e-6 {
                return Err(ConfigError::AggregateBacMismatch {
                    aggregate: aggregate.bac,
                    sum,
                });
            }
        }

        if self.data_date >= self.horizon_months {
            return Err(ConfigError::DataDateOutOfRange {
                data_date: self.data_date,
                horizon_months: self.horizon_months,
            });
        }

        Ok(())
    }

    /// Built-in Northern Treatment Plant demo project: five real phases
    /// plus the ALL rollup, seven-year horizon, data date at month 36.
    pub fn demo() -> Self {
        let phases = vec![
            Phase {
                id: "ALL".to_string(),
                display_name: "NTP - All Phases".to_string(),
                bac: 49_136_385.0,
            },
            Phase {
                id: "PESA".to_string(),
                display_name: "Preliminary Engineering".to_string(),
                bac: 4_030_560.0,
            },
            Phase {
                id: "DBA-DESIGN".to_string(),
                display_name: "Design Build - Design".to_string(),
                bac: 2_917_710.0,
            },
            Phase {
                id: "DBA-CONST".to_string(),
                display_name: "Design Build - Construction".to_string(),
                bac: 39_377_160.0,
            },
            Phase {
                id: "PERMIT".to_string(),
                display_name: "Permitting".to_string(),
                bac: 1_420_720.0,
            },
            Phase {
                id: "PM".to_string(),
                display_name: "Project Management".to_string(),
                bac: 1_390_235.0,
            },
        ];

        let mut schedules = HashMap::new();
        schedules.insert(
            "PESA".to_string(),
            PhaseSchedule {
                start_month: 0,
                end_month: 18,
                ev_delay: 1,
                ac_variance: 1.04,
            },
        );
        schedules.insert(
            "DBA-DESIGN".to_string(),
            PhaseSchedule {
                start_month: 12,
                end_month: 42,
                ev_delay: 2,
                ac_variance: 1.08,
            },
        );
        schedules.insert(
            "DBA-CONST".to_string(),
            PhaseSchedule {
                start_month: 24,
                end_month: 72,
                ev_delay: 3,
                ac_variance: 1.12,
            },
        );
        schedules.insert(
            "PERMIT".to_string(),
            PhaseSchedule {
                start_month: 0,
                end_month: 60,
                ev_delay: 1,
                ac_variance: 0.98,
            },
        );
        schedules.insert(
            "PM".to_string(),
            PhaseSchedule {
                start_month: 0,
                end_month: 78,
                ev_delay: 0,
                ac_variance: 1.02,
            },
        );

        ProjectConfig {
            project_name: "Northern Treatment Plant".to_string(),
            start_date: NaiveDate::from_ymd_opt(2011, 8, 1).unwrap(),
            horizon_months: 84,
            data_date: 36,
            phases,
            schedules,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
