//! Event loop
//!
//! Time moves in variable jumps: each step fires whatever is due now
//! (arrivals, then unit phase ends, then idle-unit dispatch), then jumps to
//! the nearest of the next arrival, the next phase end and the horizon.

use tracing::{debug, info};

use super::clock::SimulationClock;
use super::rng::SimRng;
use super::time::SimTime;
use crate::dispatch::{DispatchEvent, DispatchQueue, Dispatcher};
use crate::error::ConfigError;
use crate::fleet::Unit;
use crate::model::{EmergencyGenerator, TravelModel, UnitId};
use crate::scenario::{InjectedEmergency, SimConfig};
use crate::stats::{Metrics, StatsCollector};
use crate::trace::{TraceLogger, TraceSample, UnitSnapshot};

#[derive(Debug)]
pub struct Simulation {
    horizon: SimTime,
    clock: SimulationClock,
    rng: SimRng,
    travel: TravelModel,
    generator: EmergencyGenerator,
    dispatcher: Dispatcher,
    stats: StatsCollector,
    trace: Option<TraceLogger>,
    pending_events: Vec<DispatchEvent>,
    steps: u64,
}

impl Simulation {
    /// Validates the configuration and builds a run at t = 0. Nothing is
    /// stepped until [`Simulation::step`] or [`Simulation::run`].
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let n = config.districts.len();

        let mut generator = EmergencyGenerator::new(
            config.districts.populations(),
            config.mean_interarrival_secs,
            config.critical_probability,
            config.treatment,
        )?;
        for em in &config.injected {
            generator.inject(em.to_case(n)?)?;
        }

        let units = (0..config.units)
            .map(|i| {
                config
                    .home_of(i)
                    .map(|home| Unit::new(UnitId(i), home))
                    .ok_or(ConfigError::NoHqs)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let dispatcher = Dispatcher::new(
            units,
            config.strategy.build(),
            config.preemption,
            config.recall_homeward,
        );

        Ok(Self {
            horizon: config.horizon,
            clock: SimulationClock::default(),
            rng: SimRng::seed_from_u64(config.seed),
            travel: TravelModel::new(config.districts),
            generator,
            dispatcher,
            stats: StatsCollector::new(),
            trace: config.trace.then(TraceLogger::default),
            pending_events: Vec::new(),
            steps: 0,
        })
    }

    pub fn now(&self) -> SimTime {
        self.clock.now()
    }

    pub fn horizon(&self) -> SimTime {
        self.horizon
    }

    pub fn queue(&self) -> &DispatchQueue {
        self.dispatcher.queue()
    }

    pub fn units(&self) -> &[Unit] {
        self.dispatcher.units()
    }

    pub fn stats(&self) -> &StatsCollector {
        &self.stats
    }

    pub fn trace(&self) -> Option<&TraceLogger> {
        self.trace.as_ref()
    }

    pub fn take_trace(&mut self) -> Option<TraceLogger> {
        self.trace.take()
    }

    /// Number of loop iterations executed so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Schedules an extra case. Fails on an out-of-range district.
    pub fn inject(&mut self, em: InjectedEmergency) -> Result<(), ConfigError> {
        let case = em.to_case(self.travel.district_count())?;
        self.generator.inject(case)
    }

    /// Runs to the horizon and returns the metrics.
    #[tracing::instrument(skip(self), fields(
        strategy = %self.dispatcher.strategy().kind(),
        units = self.dispatcher.units().len(),
        horizon_secs = self.horizon.0,
    ))]
    pub fn run(&mut self) -> Result<Metrics, ConfigError> {
        info!("▶️  starting simulation");
        while self.step()? {}
        let metrics = self.metrics();
        info!(
            steps = self.steps,
            utilization = metrics.utilization,
            hq_fraction = metrics.hq_fraction,
            average_wait_minutes = metrics.average_wait_minutes,
            "✅ simulation finished"
        );
        Ok(metrics)
    }

    /// One iteration: fire what is due, then jump. Returns `false` once the
    /// horizon is reached (a zero horizon never steps).
    pub fn step(&mut self) -> Result<bool, ConfigError> {
        if self.clock.now() >= self.horizon {
            return Ok(false);
        }
        self.fire_due()?;
        self.sample();

        let delta = self.next_jump();
        self.clock.advance(delta);
        self.generator.advance(delta);
        self.dispatcher.advance(delta);
        self.steps += 1;
        Ok(true)
    }

    fn fire_due(&mut self) -> Result<(), ConfigError> {
        let now = self.clock.now();
        for em in self.generator.due_arrivals(now, &mut self.rng) {
            self.dispatcher
                .on_arrival(em, &self.travel, &mut self.rng, &mut self.pending_events)?;
        }
        self.dispatcher
            .complete_due(now, &self.travel, &mut self.rng, &mut self.pending_events)?;
        self.dispatcher
            .dispatch_idle(&self.travel, &mut self.rng, &mut self.pending_events)?;

        for event in self.pending_events.drain(..) {
            self.stats.record(&event);
            if let Some(trace) = self.trace.as_mut() {
                trace.push_event(now.0, event);
            }
        }
        Ok(())
    }

    /// `min(next phase end, next arrival, time left)`.
    fn next_jump(&self) -> SimTime {
        let now = self.clock.now();
        let mut delta = self.clock.until(self.horizon);
        if let Some(t) = self.dispatcher.next_deadline() {
            delta = delta.min(t);
        }
        if let Some(t) = self.generator.time_to_next(now) {
            delta = delta.min(t);
        }
        debug!(now = now.0, delta = delta.0, queued = self.queue().len(), "jump");
        delta
    }

    fn sample(&mut self) {
        let Some(trace) = self.trace.as_mut() else {
            return;
        };
        let units = self
            .dispatcher
            .units()
            .iter()
            .map(|u| UnitSnapshot {
                unit: u.id(),
                location: u.location(),
                phase: u.kind(),
                destination: u.destination(),
                emergency: u.emergency().map(|em| em.id),
                remaining_secs: u.remaining().map(SimTime::secs),
            })
            .collect();
        trace.push_sample(TraceSample {
            t_secs: self.clock.now().0,
            queue_lengths: self.dispatcher.queue().lengths(),
            units,
        });
    }

    /// Metrics as of the current time.
    pub fn metrics(&self) -> Metrics {
        self.stats.finalize(
            self.clock.now(),
            self.dispatcher.units(),
            self.dispatcher.queue().len(),
        )
    }
}
