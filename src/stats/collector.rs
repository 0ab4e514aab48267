//! Statistics collector
//!
//! Accumulates counts and Routine wait samples from dispatch events and turns
//! them, together with per-unit time accounting, into a [`Metrics`] record.

use super::metrics::{Metrics, UnitMetrics};
use crate::dispatch::DispatchEvent;
use crate::fleet::Unit;
use crate::model::Severity;
use crate::sim::SimTime;

#[derive(Debug, Default, Clone)]
pub struct StatsCollector {
    arrivals: [u64; Severity::ALL.len()],
    served: [u64; Severity::ALL.len()],
    completed: [u64; Severity::ALL.len()],
    redirections: u64,
    routine_waits: Vec<SimTime>,
}

impl StatsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, event: &DispatchEvent) {
        match event {
            DispatchEvent::Arrival { severity, .. } => self.arrivals[severity.tier()] += 1,
            DispatchEvent::TreatmentStarted {
                severity,
                waited_secs,
                ..
            } => {
                self.served[severity.tier()] += 1;
                // Critical waits are not tracked.
                if *severity == Severity::Routine {
                    self.routine_waits.push(SimTime(*waited_secs));
                }
            }
            DispatchEvent::TreatmentFinished { severity, .. } => {
                self.completed[severity.tier()] += 1
            }
            DispatchEvent::Redirected { .. } => self.redirections += 1,
            _ => {}
        }
    }

    pub fn arrivals(&self, severity: Severity) -> u64 {
        self.arrivals[severity.tier()]
    }

    pub fn served(&self, severity: Severity) -> u64 {
        self.served[severity.tier()]
    }

    pub fn routine_waits(&self) -> &[SimTime] {
        &self.routine_waits
    }

    pub fn average_wait(&self) -> f64 {
        if self.routine_waits.is_empty() {
            return 0.0;
        }
        let sum: u64 = self.routine_waits.iter().map(|w| w.0).sum();
        sum as f64 / self.routine_waits.len() as f64
    }

    pub fn finalize(&self, elapsed: SimTime, units: &[Unit], pending_at_end: usize) -> Metrics {
        let per_unit: Vec<UnitMetrics> = units
            .iter()
            .map(|u| {
                let t = u.times();
                UnitMetrics {
                    unit: u.id(),
                    home: u.home(),
                    busy_secs: t.busy.0,
                    hq_secs: t.hq.0,
                    homeward_secs: t.homeward.0,
                    utilization: fraction(t.busy.0, elapsed.0, 0.0),
                    hq_fraction: fraction(t.hq.0, elapsed.0, 1.0),
                }
            })
            .collect();

        let unit_secs = elapsed.0.saturating_mul(units.len() as u64);
        let busy: u64 = per_unit.iter().map(|u| u.busy_secs).sum();
        let hq: u64 = per_unit.iter().map(|u| u.hq_secs).sum();
        let average_wait_secs = self.average_wait();

        Metrics {
            elapsed_secs: elapsed.0,
            utilization: fraction(busy, unit_secs, 0.0),
            hq_fraction: fraction(hq, unit_secs, 1.0),
            average_wait_secs,
            average_wait_minutes: average_wait_secs / 60.0,
            routine_waits_secs: self.routine_waits.iter().map(|w| w.0).collect(),
            critical_case_count: self.arrivals(Severity::Critical),
            routine_case_count: self.arrivals(Severity::Routine),
            critical_served: self.served(Severity::Critical),
            routine_served: self.served(Severity::Routine),
            critical_completed: self.completed[Severity::Critical.tier()],
            routine_completed: self.completed[Severity::Routine.tier()],
            redirections: self.redirections,
            pending_at_end,
            units: per_unit,
        }
    }
}

/// `num / den`, or `if_empty` when nothing elapsed. An idle fleet over an
/// empty horizon is at HQ by definition.
fn fraction(num: u64, den: u64, if_empty: f64) -> f64 {
    if den == 0 {
        return if_empty;
    }
    num as f64 / den as f64
}
