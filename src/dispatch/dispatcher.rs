//! Dispatcher
//!
//! Matches units against pending cases. It is the only component that moves
//! an emergency between the queue and a unit. Units are always visited in
//! index order and a chosen case leaves the queue immediately, so two units
//! can never be handed the same case.

use tracing::{debug, info, trace};

use super::event::DispatchEvent;
use super::queue::DispatchQueue;
use super::strategy::{DispatchStrategy, SelectionContext};
use crate::error::ConfigError;
use crate::fleet::{Arrival, Unit, UnitPhase};
use crate::model::{Emergency, EmergencyId, TravelModel};
use crate::sim::{SimRng, SimTime};

#[derive(Debug)]
pub struct Dispatcher {
    queue: DispatchQueue,
    units: Vec<Unit>,
    strategy: Box<dyn DispatchStrategy>,
    /// Critical arrivals may reroute a unit bound for a Routine case.
    preemption: bool,
    /// Homeward-bound units count as idle and can be handed new cases.
    recall_homeward: bool,
}

impl Dispatcher {
    pub fn new(
        units: Vec<Unit>,
        strategy: Box<dyn DispatchStrategy>,
        preemption: bool,
        recall_homeward: bool,
    ) -> Self {
        Self {
            queue: DispatchQueue::new(),
            units,
            strategy,
            preemption,
            recall_homeward,
        }
    }

    pub fn queue(&self) -> &DispatchQueue {
        &self.queue
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    pub fn strategy(&self) -> &dyn DispatchStrategy {
        self.strategy.as_ref()
    }

    fn is_idle(&self, unit: &Unit) -> bool {
        unit.is_at_hq() || (self.recall_homeward && unit.is_homeward())
    }

    /// Idle now, or idle once this instant's phase ends are processed.
    fn is_available(&self, unit: &Unit) -> bool {
        self.is_idle(unit) || unit.frees_up_now()
    }

    /// Time until the earliest unit phase ends, if any unit is active.
    pub fn next_deadline(&self) -> Option<SimTime> {
        self.units.iter().filter_map(Unit::remaining).min()
    }

    pub fn advance(&mut self, delta: SimTime) {
        for unit in &mut self.units {
            unit.advance(delta);
        }
    }

    /// Queues a new case. A Critical case may preempt a unit still on its way
    /// to a Routine case when nobody is idle.
    pub fn on_arrival(
        &mut self,
        em: Emergency,
        travel: &TravelModel,
        rng: &mut SimRng,
        out: &mut Vec<DispatchEvent>,
    ) -> Result<(), ConfigError> {
        travel.check(em.district)?;
        out.push(DispatchEvent::Arrival {
            emergency: em.id,
            district: em.district,
            severity: em.severity,
            treatment_secs: em.treatment.0,
        });
        let critical = em.is_critical().then_some(em.id);
        self.queue.enqueue(em);

        if let Some(id) = critical {
            if self.preemption {
                self.preempt(id, travel, rng, out)?;
            }
        }
        Ok(())
    }

    fn preempt(
        &mut self,
        critical_id: EmergencyId,
        travel: &TravelModel,
        rng: &mut SimRng,
        out: &mut Vec<DispatchEvent>,
    ) -> Result<(), ConfigError> {
        if self.units.iter().any(|u| self.is_available(u)) {
            return Ok(());
        }
        let Some(idx) = self.units.iter().position(Unit::is_redirectable) else {
            return Ok(());
        };
        let Some(critical) = self.queue.take_id(critical_id) else {
            return Ok(());
        };

        let unit = &mut self.units[idx];
        let (origin, destination, ratio) = match unit.phase() {
            UnitPhase::Traveling(leg) => (leg.origin, leg.destination, leg.ratio_traveled()),
            _ => {
                self.queue.reinsert_front(critical);
                return Ok(());
            }
        };
        let to = critical.district;
        let travel_time = travel.travel_time_redirect(origin, destination, to, ratio, rng)?;
        let emergency = critical.id;

        match unit.redirect(critical, travel_time) {
            Ok(bumped) => {
                info!(
                    unit = %unit.id(),
                    bumped = %bumped.id,
                    emergency = %emergency,
                    ratio_traveled = ratio,
                    travel_secs = travel_time.0,
                    "🚨 redirected to critical case"
                );
                out.push(DispatchEvent::Redirected {
                    unit: unit.id(),
                    bumped: bumped.id,
                    emergency,
                    to,
                    ratio_traveled: ratio,
                    travel_secs: travel_time.0,
                });
                self.queue.reinsert_front(bumped);
            }
            Err(critical) => self.queue.reinsert_front(critical),
        }
        Ok(())
    }

    /// Fires every unit phase that has run out, in unit order. Zero-length
    /// phases are chained within the same instant.
    pub fn complete_due(
        &mut self,
        now: SimTime,
        travel: &TravelModel,
        rng: &mut SimRng,
        out: &mut Vec<DispatchEvent>,
    ) -> Result<(), ConfigError> {
        for idx in 0..self.units.len() {
            while self.units[idx].is_due() {
                if self.units[idx].treatment_done() {
                    self.finish_treatment(idx, travel, rng, out)?;
                    continue;
                }
                let unit = &mut self.units[idx];
                match unit.arrive(now) {
                    Some(Arrival::ReturnedToHq) => {
                        debug!(unit = %unit.id(), district = %unit.location(), "back at HQ");
                        out.push(DispatchEvent::ReturnedToHq {
                            unit: unit.id(),
                            district: unit.location(),
                        });
                    }
                    Some(Arrival::StartedTreatment {
                        emergency,
                        severity,
                        waited,
                    }) => {
                        debug!(
                            unit = %unit.id(),
                            emergency = %emergency,
                            severity = ?severity,
                            waited_secs = waited.0,
                            "treatment started"
                        );
                        out.push(DispatchEvent::TreatmentStarted {
                            unit: unit.id(),
                            emergency,
                            severity,
                            district: unit.location(),
                            waited_secs: waited.0,
                        });
                    }
                    None => break,
                }
            }
        }
        Ok(())
    }

    /// Care is over: take the next case straight from the scene, or head home.
    fn finish_treatment(
        &mut self,
        idx: usize,
        travel: &TravelModel,
        rng: &mut SimRng,
        out: &mut Vec<DispatchEvent>,
    ) -> Result<(), ConfigError> {
        let ctx = SelectionContext {
            unit: self.units[idx].id(),
            location: self.units[idx].location(),
        };
        let next = match self.strategy.select(&ctx, &self.queue, travel, rng)? {
            Some(slot) => self.queue.take(slot),
            None => None,
        };
        let destination = next
            .as_ref()
            .map(|em| em.district)
            .unwrap_or(self.units[idx].home());
        let travel_time = travel.travel_time(ctx.location, destination, rng)?;
        let next_id = next.as_ref().map(|em| em.id);

        let unit = &mut self.units[idx];
        match unit.finish_treatment(next, travel_time) {
            Ok(done) => {
                debug!(unit = %unit.id(), emergency = %done.id, "treatment finished");
                out.push(DispatchEvent::TreatmentFinished {
                    unit: unit.id(),
                    emergency: done.id,
                    severity: done.severity,
                });
                match next_id {
                    Some(emergency) => out.push(DispatchEvent::Chained {
                        unit: unit.id(),
                        emergency,
                        from: ctx.location,
                        to: destination,
                        travel_secs: travel_time.0,
                    }),
                    None => out.push(DispatchEvent::HeadingHome {
                        unit: unit.id(),
                        from: ctx.location,
                        travel_secs: travel_time.0,
                    }),
                }
            }
            Err(Some(next)) => self.queue.reinsert_front(next),
            Err(None) => {}
        }
        Ok(())
    }

    /// Hands pending cases to idle units, lowest unit index first.
    pub fn dispatch_idle(
        &mut self,
        travel: &TravelModel,
        rng: &mut SimRng,
        out: &mut Vec<DispatchEvent>,
    ) -> Result<(), ConfigError> {
        for idx in 0..self.units.len() {
            if self.queue.is_empty() {
                break;
            }
            if !self.is_idle(&self.units[idx]) {
                continue;
            }
            let ctx = SelectionContext {
                unit: self.units[idx].id(),
                location: self.units[idx].location(),
            };
            let Some(slot) = self.strategy.select(&ctx, &self.queue, travel, rng)? else {
                continue;
            };
            let Some(em) = self.queue.take(slot) else {
                continue;
            };
            trace!(unit = %ctx.unit, emergency = %em.id, "selected by {}", self.strategy.kind());

            let unit = &mut self.units[idx];
            let emergency = em.id;
            let to = em.district;
            let homeward_leg = match unit.phase() {
                UnitPhase::Traveling(leg) => Some((
                    leg.origin,
                    leg.destination,
                    leg.ratio_traveled(),
                    leg.reroute_origin(),
                )),
                _ => None,
            };
            let recalled = homeward_leg.is_some();
            let (from, travel_time, result) = match homeward_leg {
                // Recall: blend the elapsed part of the homeward leg.
                Some((origin, home, ratio, from)) => {
                    let t = travel.travel_time_redirect(origin, home, to, ratio, rng)?;
                    (from, t, unit.recall(em, t))
                }
                None => {
                    let from = unit.location();
                    let t = travel.travel_time(from, to, rng)?;
                    (from, t, unit.assign(em, t))
                }
            };
            match result {
                Ok(()) => {
                    debug!(
                        unit = %unit.id(),
                        emergency = %emergency,
                        from = %from,
                        to = %to,
                        travel_secs = travel_time.0,
                        recalled,
                        "unit dispatched"
                    );
                    out.push(DispatchEvent::Assigned {
                        unit: unit.id(),
                        emergency,
                        from,
                        to,
                        travel_secs: travel_time.0,
                        recalled,
                    });
                }
                Err(em) => self.queue.reinsert_front(em),
            }
        }
        Ok(())
    }
}
