// 📈 Curve Generator - Synthetic EV S-curves
// Produces, per phase, a monthly series of Planned Value, Earned Value and
// Actual Cost over the project horizon using a skewed sigmoid shape,
// schedule offsets and deterministic pseudo-noise.
//
// The generator is a pure function of the project configuration: the same
// config always yields byte-identical series. Degenerate schedules never
// reach this module; config validation rejects them first.

use crate::config::{Phase, PhaseSchedule, ProjectConfig, AGGREGATE_PHASE_ID};
use crate::timeline;
use serde::{Deserialize, Serialize};

// ============================================================================
// SHAPE CONSTANTS
// ============================================================================

/// Sigmoid skew for the planned-value curve
pub const PV_SKEW: f64 = 0.38;
/// Sigmoid skew for the earned-value curve (slightly more back-loaded)
pub const EV_SKEW: f64 = 0.35;
/// Earned value never perfectly matches plan
pub const EV_REALIZATION: f64 = 0.92;

const PV_NOISE_FREQ: f64 = 7.3;
const PV_NOISE_AMPLITUDE: f64 = 0.015;
const AC_NOISE_FREQ: f64 = 5.1;
const AC_NOISE_AMPLITUDE: f64 = 0.02;

// ============================================================================
// SHAPE FUNCTION
// ============================================================================

/// Skewed sigmoid over [0, 1]: slow start, fast middle, slow finish.
/// Returns 0 for t <= 0 and 1 for t >= 1, so callers never divide by zero
/// or take a fractional power of a negative number.
pub fn s_curve(t: f64, skew: f64) -> f64 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }
    let a = 1.0 / skew;
    t.powf(a) / (t.powf(a) + (1.0 - t).powf(a))
}

// ============================================================================
// MONTHLY SAMPLE
// ============================================================================

/// One time-series point for one phase. `ev`/`ac` are `None` for months
/// past the data date ("no actuals reported yet"); `pv` is a plan and is
/// defined for the entire horizon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySample {
    /// Axis label, e.g. "Aug 14"
    pub month: String,
    pub month_index: u32,
    /// Cumulative planned value, whole currency units
    pub pv: i64,
    /// Cumulative earned value; absent past the data date
    pub ev: Option<i64>,
    /// Cumulative actual cost; absent past the data date
    pub ac: Option<i64>,
}

// ============================================================================
// CURVE GENERATOR
// ============================================================================

pub struct CurveGenerator<'a> {
    config: &'a ProjectConfig,
}

impl<'a> CurveGenerator<'a> {
    pub fn new(config: &'a ProjectConfig) -> Self {
        CurveGenerator { config }
    }

    /// Full monthly series for a phase id. The "ALL" id yields the rollup
    /// across every real phase. Returns `None` for an unknown id.
    pub fn phase_series(&self, phase_id: &str) -> Option<Vec<MonthlySample>> {
        if phase_id == AGGREGATE_PHASE_ID {
            self.config.aggregate_phase()?;
            return Some(self.aggregate_series());
        }
        let phase = self.config.phase(phase_id)?;
        let sched = self.config.schedule(phase_id)?;
        Some(self.scheduled_series(phase, sched))
    }

    /// Series for one scheduled (non-rollup) phase.
    fn scheduled_series(&self, phase: &Phase, sched: &PhaseSchedule) -> Vec<MonthlySample> {
        let bac = phase.bac;
        let duration = sched.duration() as f64;
        let start = sched.start_month as f64;
        let delay = sched.ev_delay as f64;
        // Stable per-phase noise offset, derived from the id
        let k = phase.id.len() as f64;
        let data_date = self.config.data_date;

        (0..self.config.horizon_months)
            .map(|i| {
                let m = i as f64;
                let t = (m - start) / duration;
                let t_ev = (m - start - delay) / duration;

                let mut pv = s_curve(t, PV_SKEW) * bac;
                let mut ev = if i <= data_date {
                    Some(s_curve(t_ev, EV_SKEW) * bac * EV_REALIZATION)
                } else {
                    None
                };
                let mut ac = ev.map(|v| v * sched.ac_variance);

                if i as i32 > sched.end_month {
                    pv = bac;
                }
                if t < 0.0 {
                    pv = 0.0;
                }
                if t_ev < 0.0 {
                    ev = ev.map(|_| 0.0);
                }

                // Noise lands after the clamps, so months at the tail can sit
                // up to 1.5% above BAC. PV and EV share one factor per month;
                // AC wobbles independently.
                let noise = 1.0 + (m * PV_NOISE_FREQ + k).sin() * PV_NOISE_AMPLITUDE;
                pv *= noise;
                ev = ev.map(|v| v * noise);
                ac = ac.map(|v| v * (1.0 + (m * AC_NOISE_FREQ).sin() * AC_NOISE_AMPLITUDE));

                MonthlySample {
                    month: timeline::month_label(self.config.start_date, i),
                    month_index: i,
                    pv: pv.round() as i64,
                    ev: ev.map(|v| v.round() as i64),
                    ac: ac.map(|v| v.round() as i64),
                }
            })
            .collect()
    }

    /// Rollup series: per month, pv sums every real phase; ev/ac sum only
    /// the phases reporting that month and are present only if at least one
    /// constituent reports actuals.
    fn aggregate_series(&self) -> Vec<MonthlySample> {
        let per_phase: Vec<Vec<MonthlySample>> = self
            .config
            .real_phases()
            .filter_map(|p| {
                let sched = self.config.schedule(&p.id)?;
                Some(self.scheduled_series(p, sched))
            })
            .collect();

        (0..self.config.horizon_months as usize)
            .map(|i| {
                let mut pv = 0i64;
                let mut ev = 0i64;
                let mut ac = 0i64;
                let mut has_actuals = false;

                for series in &per_phase {
                    let sample = &series[i];
                    pv += sample.pv;
                    if let Some(v) = sample.ev {
                        ev += v;
                        has_actuals = true;
                    }
                    if let Some(v) = sample.ac {
                        ac += v;
                    }
                }

                MonthlySample {
                    month: timeline::month_label(self.config.start_date, i as u32),
                    month_index: i as u32,
                    pv,
                    ev: if has_actuals { Some(ev) } else { None },
                    ac: if has_actuals { Some(ac) } else { None },
                }
            })
            .collect()
    }

    /// The sample at the data date for a phase, i.e. the slice the EV
    /// metrics snapshot is taken from.
    pub fn data_date_sample(&self, phase_id: &str) -> Option<MonthlySample> {
        let series = self.phase_series(phase_id)?;
        series.into_iter().nth(self.config.data_date as usize)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProjectConfig;

    #[test]
    fn test_s_curve_boundaries() {
        for skew in [0.1, 0.35, 0.38, 0.5, 0.9] {
            assert_eq!(s_curve(0.0, skew), 0.0);
            assert_eq!(s_curve(-0.5, skew), 0.0);
            assert_eq!(s_curve(1.0, skew), 1.0);
            assert_eq!(s_curve(1.5, skew), 1.0);

            let mid = s_curve(0.5, skew);
            assert!(mid > 0.0 && mid < 1.0, "S(0.5, {}) = {}", skew, mid);
        }
    }

    #[test]
    fn test_s_curve_is_monotonic() {
        let mut prev = 0.0;
        for step in 0..=100 {
            let t = step as f64 / 100.0;
            let v = s_curve(t, EV_SKEW);
            assert!(v >= prev, "S-curve decreased at t={}", t);
            prev = v;
        }
    }

    #[test]
    fn test_series_covers_full_horizon() {
        let config = ProjectConfig::demo();
        let gen = CurveGenerator::new(&config);

        for phase in &config.phases {
            let series = gen.phase_series(&phase.id).unwrap();
            assert_eq!(series.len(), config.horizon_months as usize);
            for (i, sample) in series.iter().enumerate() {
                assert_eq!(sample.month_index, i as u32);
            }
        }
    }

    #[test]
    fn test_pv_non_negative_and_capped_after_end() {
        let config = ProjectConfig::demo();
        let gen = CurveGenerator::new(&config);

        for phase in config.real_phases() {
            let sched = config.schedule(&phase.id).unwrap();
            let series = gen.phase_series(&phase.id).unwrap();

            for sample in &series {
                assert!(sample.pv >= 0, "{}: negative pv", phase.id);
                if sample.month_index as i32 >= sched.end_month {
                    // Post-clamp noise allows up to 1.5% above BAC
                    let ceiling = phase.bac * 1.016;
                    assert!(
                        (sample.pv as f64) <= ceiling,
                        "{}: pv {} above noise ceiling at month {}",
                        phase.id,
                        sample.pv,
                        sample.month_index
                    );
                }
            }
        }
    }

    #[test]
    fn test_pv_zero_before_start() {
        let config = ProjectConfig::demo();
        let gen = CurveGenerator::new(&config);

        let series = gen.phase_series("DBA-CONST").unwrap();
        let sched = config.schedule("DBA-CONST").unwrap();
        for sample in &series {
            if (sample.month_index as i32) < sched.start_month {
                assert_eq!(sample.pv, 0);
            }
        }
    }

    #[test]
    fn test_actuals_absent_past_data_date() {
        let config = ProjectConfig::demo();
        let gen = CurveGenerator::new(&config);

        for phase in &config.phases {
            let series = gen.phase_series(&phase.id).unwrap();
            for sample in &series {
                if sample.month_index > config.data_date {
                    assert!(sample.ev.is_none(), "{}: ev past data date", phase.id);
                    assert!(sample.ac.is_none(), "{}: ac past data date", phase.id);
                } else {
                    assert!(sample.ev.is_some(), "{}: ev missing before data date", phase.id);
                    assert!(sample.ac.is_some(), "{}: ac missing before data date", phase.id);
                }
            }
        }
    }

    #[test]
    fn test_ev_zero_before_delayed_start() {
        let config = ProjectConfig::demo();
        let gen = CurveGenerator::new(&config);

        let sched = config.schedule("DBA-DESIGN").unwrap();
        let series = gen.phase_series("DBA-DESIGN").unwrap();
        for sample in &series {
            let i = sample.month_index as i32;
            if i < sched.start_month + sched.ev_delay && sample.month_index <= config.data_date {
                assert_eq!(sample.ev, Some(0));
                assert_eq!(sample.ac, Some(0));
            }
        }
    }

    #[test]
    fn test_aggregate_pv_matches_constituent_sum() {
        let config = ProjectConfig::demo();
        let gen = CurveGenerator::new(&config);

        let all = gen.phase_series("ALL").unwrap();
        let constituents: Vec<_> = config
            .real_phases()
            .map(|p| gen.phase_series(&p.id).unwrap())
            .collect();
        let tolerance = constituents.len() as i64;

        for (i, sample) in all.iter().enumerate() {
            let sum: i64 = constituents.iter().map(|s| s[i].pv).sum();
            assert!(
                (sample.pv - sum).abs() <= tolerance,
                "aggregate pv {} vs sum {} at month {}",
                sample.pv,
                sum,
                i
            );
        }
    }

    #[test]
    fn test_aggregate_actuals_presence() {
        let config = ProjectConfig::demo();
        let gen = CurveGenerator::new(&config);

        let all = gen.phase_series("ALL").unwrap();
        for sample in &all {
            if sample.month_index <= config.data_date {
                assert!(sample.ev.is_some());
                assert!(sample.ac.is_some());
            } else {
                assert!(sample.ev.is_none());
                assert!(sample.ac.is_none());
            }
        }
    }

    #[test]
    fn test_generation_is_deterministic() {
        let config = ProjectConfig::demo();
        let gen = CurveGenerator::new(&config);

        for phase in &config.phases {
            let first = gen.phase_series(&phase.id).unwrap();
            let second = gen.phase_series(&phase.id).unwrap();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_unknown_phase_yields_none() {
        let config = ProjectConfig::demo();
        let gen = CurveGenerator::new(&config);

        assert!(gen.phase_series("NOPE").is_none());
        assert!(gen.data_date_sample("NOPE").is_none());
    }

    #[test]
    fn test_data_date_sample_matches_series_slice() {
        let config = ProjectConfig::demo();
        let gen = CurveGenerator::new(&config);

        let series = gen.phase_series("PESA").unwrap();
        let slice = gen.data_date_sample("PESA").unwrap();
        assert_eq!(slice, series[config.data_date as usize]);
    }

    #[test]
    fn test_samples_carry_calendar_labels() {
        let config = ProjectConfig::demo();
        let gen = CurveGenerator::new(&config);

        let series = gen.phase_series("PM").unwrap();
        assert_eq!(series[0].month, "Aug 11");
        assert_eq!(series[36].month, "Aug 14");
    }
}
