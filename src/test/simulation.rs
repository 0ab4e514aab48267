use std::collections::{HashMap, HashSet};

use crate::dispatch::{DispatchEvent, StrategyKind};
use crate::error::ConfigError;
use crate::model::{DistrictId, EmergencyId, Severity, UnitId};
use crate::scenario::{InjectedEmergency, SimConfig};
use crate::sim::{SimTime, Simulation};
use crate::trace::TraceLogger;

fn quiet(hours: u64) -> SimConfig {
    SimConfig::default()
        .injected_only()
        .with_horizon(SimTime::from_hours(hours))
}

fn run_traced(config: SimConfig) -> (crate::stats::Metrics, TraceLogger) {
    let mut sim = Simulation::new(config.with_trace(true)).expect("valid config");
    let metrics = sim.run().expect("run");
    let trace = sim.take_trace().expect("trace enabled");
    (metrics, trace)
}

fn events(trace: &TraceLogger) -> impl Iterator<Item = &DispatchEvent> {
    trace.events.iter().map(|e| &e.event)
}

#[test]
fn empty_hour_keeps_the_unit_at_hq() {
    let mut sim = Simulation::new(quiet(1)).expect("valid config");
    let m = sim.run().expect("run");
    assert_eq!(m.elapsed_secs, 3600);
    assert_eq!(m.utilization, 0.0);
    assert_eq!(m.hq_fraction, 1.0);
    assert_eq!(m.average_wait_secs, 0.0);
    assert_eq!(m.critical_case_count + m.routine_case_count, 0);
    assert_eq!(sim.now(), sim.horizon());
}

#[test]
fn zero_horizon_never_steps() {
    let mut sim =
        Simulation::new(SimConfig::default().with_horizon(SimTime::ZERO)).expect("valid config");
    let m = sim.run().expect("run");
    assert_eq!(sim.steps(), 0);
    assert_eq!(m.elapsed_secs, 0);
    assert_eq!(m.utilization, 0.0);
    assert_eq!(m.hq_fraction, 1.0);
    assert_eq!(m.critical_case_count + m.routine_case_count, 0);
}

#[test]
fn single_critical_case_is_served() {
    let cfg = quiet(2).inject(InjectedEmergency::new(3, Severity::Critical, 0));
    let mut sim = Simulation::new(cfg).expect("valid config");
    let m = sim.run().expect("run");
    assert_eq!(m.critical_case_count, 1);
    assert_eq!(m.critical_served, 1);
    assert!(m.utilization > 0.0);
    assert!(m.hq_fraction < 1.0);
    // Critical waits are not part of the average.
    assert!(m.routine_waits_secs.is_empty());
    assert_eq!(m.average_wait_secs, 0.0);
}

#[test]
fn five_criticals_keep_one_unit_busy_most_of_two_hours() {
    let mut cfg = quiet(2);
    for _ in 0..5 {
        cfg = cfg.inject(InjectedEmergency::new(3, Severity::Critical, 0).with_treatment_secs(600));
    }
    let mut sim = Simulation::new(cfg).expect("valid config");
    let m = sim.run().expect("run");
    assert_eq!(m.critical_served, 5);
    assert_eq!(m.critical_completed, 5);
    assert!(m.utilization > 0.5, "utilization {}", m.utilization);
    assert_eq!(m.pending_at_end, 0);
}

#[test]
fn routine_waits_only_count_routine_cases() {
    let cfg = quiet(3)
        .inject(InjectedEmergency::new(1, Severity::Critical, 0).with_treatment_secs(600))
        .inject(InjectedEmergency::new(1, Severity::Routine, 0).with_treatment_secs(600));
    let mut sim = Simulation::new(cfg).expect("valid config");
    let m = sim.run().expect("run");
    assert_eq!(m.critical_served, 1);
    assert_eq!(m.routine_served, 1);
    assert_eq!(m.routine_waits_secs.len(), 1);
    // The routine case waited for the whole critical treatment.
    assert!(m.routine_waits_secs[0] > 600);
    assert_eq!(m.average_wait_secs, m.routine_waits_secs[0] as f64);
    assert_eq!(m.average_wait_minutes, m.average_wait_secs / 60.0);
}

#[test]
fn critical_arrival_redirects_the_only_unit() {
    let cfg = quiet(3)
        .inject(InjectedEmergency::new(4, Severity::Routine, 0).with_treatment_secs(1800))
        .inject(InjectedEmergency::new(0, Severity::Critical, 300).with_treatment_secs(600));
    let (m, trace) = run_traced(cfg);

    assert_eq!(m.redirections, 1);
    assert!(events(&trace).any(|e| matches!(
        e,
        DispatchEvent::Redirected {
            bumped: EmergencyId(0),
            emergency: EmergencyId(1),
            to: DistrictId(0),
            ..
        }
    )));
    let first_started = events(&trace).find_map(|e| match e {
        DispatchEvent::TreatmentStarted { emergency, .. } => Some(*emergency),
        _ => None,
    });
    assert_eq!(first_started, Some(EmergencyId(1)));
    assert_eq!(m.critical_served, 1);
    assert_eq!(m.routine_served, 1);
}

#[test]
fn redirect_is_skipped_without_preemption() {
    let mut cfg = quiet(3)
        .inject(InjectedEmergency::new(4, Severity::Routine, 0).with_treatment_secs(1800))
        .inject(InjectedEmergency::new(0, Severity::Critical, 300).with_treatment_secs(600));
    cfg.preemption = false;
    let (m, trace) = run_traced(cfg);
    assert_eq!(m.redirections, 0);
    let first_started = events(&trace).find_map(|e| match e {
        DispatchEvent::TreatmentStarted { emergency, .. } => Some(*emergency),
        _ => None,
    });
    assert_eq!(first_started, Some(EmergencyId(0)));
}

#[test]
fn every_started_treatment_matches_the_units_last_assignment() {
    let cfg = SimConfig::default()
        .with_fleet(vec![DistrictId(0), DistrictId(5)], 3)
        .with_horizon(SimTime::from_hours(12))
        .with_seed(7);
    let (_, trace) = run_traced(cfg);

    let mut committed: HashMap<UnitId, EmergencyId> = HashMap::new();
    let mut started = HashSet::new();
    let mut checked = 0;
    for event in events(&trace) {
        match event {
            DispatchEvent::Assigned { unit, emergency, .. }
            | DispatchEvent::Redirected { unit, emergency, .. }
            | DispatchEvent::Chained { unit, emergency, .. } => {
                committed.insert(*unit, *emergency);
            }
            DispatchEvent::TreatmentStarted { unit, emergency, .. } => {
                assert_eq!(committed.get(unit), Some(emergency));
                assert!(started.insert(*emergency), "{emergency} treated twice");
                checked += 1;
            }
            _ => {}
        }
    }
    assert!(checked > 0);
}

#[test]
fn unit_time_adds_up_for_every_configuration() {
    let configs = [
        SimConfig::default().with_strategy(StrategyKind::Fifo),
        SimConfig::default().with_strategy(StrategyKind::Nearest),
        SimConfig::default().with_strategy(StrategyKind::Random),
        SimConfig::default().with_strategy(StrategyKind::HighestPriorityFirst),
        SimConfig::default().with_fleet(vec![DistrictId(0), DistrictId(5), DistrictId(9)], 4),
        SimConfig {
            recall_homeward: true,
            ..SimConfig::default().with_fleet(vec![DistrictId(2)], 2)
        },
    ];
    for cfg in configs {
        let cfg = cfg.with_horizon(SimTime::from_hours(10));
        let mut sim = Simulation::new(cfg).expect("valid config");
        let m = sim.run().expect("run");
        for unit in sim.units() {
            assert_eq!(unit.times().total(), SimTime(m.elapsed_secs));
        }
        assert!((0.0..=1.0).contains(&m.utilization));
        assert!((0.0..=1.0).contains(&m.hq_fraction));
        assert!(m.utilization + m.hq_fraction <= 1.0 + 1e-9);
    }
}

#[test]
fn same_seed_same_metrics() {
    let cfg = SimConfig::default()
        .with_strategy(StrategyKind::Random)
        .with_fleet(vec![DistrictId(1), DistrictId(6)], 2)
        .with_seed(99);
    let a = Simulation::new(cfg.clone()).expect("valid config").run().expect("run");
    let b = Simulation::new(cfg).expect("valid config").run().expect("run");
    assert_eq!(a, b);
    assert!(a.critical_case_count + a.routine_case_count > 0);
}

#[test]
fn units_are_spread_round_robin_over_hqs() {
    let cfg = quiet(1).with_fleet(vec![DistrictId(0), DistrictId(5)], 3);
    let sim = Simulation::new(cfg).expect("valid config");
    let homes: Vec<_> = sim.units().iter().map(|u| u.home()).collect();
    assert_eq!(homes, vec![DistrictId(0), DistrictId(5), DistrictId(0)]);
}

#[test]
fn negative_district_is_rejected_up_front_and_at_runtime() {
    let bad = InjectedEmergency::new(-1, Severity::Critical, 0);
    let expected = ConfigError::DistrictOutOfRange {
        index: -1,
        districts: 10,
    };

    let err = Simulation::new(quiet(1).inject(bad)).expect_err("negative district");
    assert_eq!(err, expected);

    let mut sim = Simulation::new(quiet(1)).expect("valid config");
    assert_eq!(sim.inject(bad), Err(expected));
    assert_eq!(sim.inject(InjectedEmergency::new(9, Severity::Routine, 60)), Ok(()));
}

#[test]
fn trace_samples_follow_the_clock() {
    let cfg = quiet(2).inject(InjectedEmergency::new(3, Severity::Critical, 0));
    let (_, trace) = run_traced(cfg);
    assert!(!trace.samples.is_empty());
    assert!(trace.samples.windows(2).all(|w| w[0].t_secs <= w[1].t_secs));
    assert!(trace.samples.iter().all(|s| s.units.len() == 1));
    assert!(trace.samples.iter().all(|s| s.t_secs < 7200));
}

#[test]
fn case_injected_in_the_past_counts_its_full_wait() {
    let mut sim = Simulation::new(quiet(3)).expect("valid config");
    sim.inject(InjectedEmergency::new(1, Severity::Routine, 7_000))
        .expect("valid district");
    sim.step().expect("step");
    assert_eq!(sim.now(), SimTime(7_000));
    sim.inject(InjectedEmergency::new(1, Severity::Routine, 100).with_treatment_secs(60))
        .expect("valid district");
    let m = sim.run().expect("run");
    assert_eq!(m.routine_case_count, 2);
    // the back-dated case waited at least since t = 100
    assert!(m.routine_waits_secs.iter().any(|&w| w >= 6_900), "{m:?}");
}
