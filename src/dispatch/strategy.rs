//! Dispatch strategies
//!
//! A strategy only chooses; it never mutates the queue. The dispatcher removes
//! the chosen case.

use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::queue::{DispatchQueue, QueueSlot};
use crate::error::ConfigError;
use crate::model::{DistrictId, TravelModel, UnitId};
use crate::sim::SimRng;

/// What a strategy knows about the unit it is choosing for.
#[derive(Debug, Clone, Copy)]
pub struct SelectionContext {
    pub unit: UnitId,
    pub location: DistrictId,
}

/// Case-selection policy.
pub trait DispatchStrategy: fmt::Debug {
    fn kind(&self) -> StrategyKind;

    /// Picks the next pending case for the unit, or `None` if the queue is
    /// empty.
    fn select(
        &self,
        ctx: &SelectionContext,
        queue: &DispatchQueue,
        travel: &TravelModel,
        rng: &mut SimRng,
    ) -> Result<Option<QueueSlot>, ConfigError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Oldest case of the highest non-empty tier
    Fifo,
    /// Closest case (base matrix) of the highest non-empty tier
    #[serde(alias = "closest")]
    Nearest,
    /// Uniformly random case of the highest non-empty tier
    Random,
    /// Most severe case overall, earliest arrival first
    #[serde(alias = "high_priority_first", alias = "highest-priority-first")]
    HighestPriorityFirst,
}

impl StrategyKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StrategyKind::Fifo => "fifo",
            StrategyKind::Nearest => "nearest",
            StrategyKind::Random => "random",
            StrategyKind::HighestPriorityFirst => "highest-priority-first",
        }
    }

    pub fn build(self) -> Box<dyn DispatchStrategy> {
        match self {
            StrategyKind::Fifo => Box::new(Fifo),
            StrategyKind::Nearest => Box::new(Nearest),
            StrategyKind::Random => Box::new(RandomPick),
            StrategyKind::HighestPriorityFirst => Box::new(HighestPriorityFirst),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "fifo" => Ok(StrategyKind::Fifo),
            "nearest" | "closest" => Ok(StrategyKind::Nearest),
            "random" => Ok(StrategyKind::Random),
            "highest-priority-first" | "high-priority-first" | "hpf" => {
                Ok(StrategyKind::HighestPriorityFirst)
            }
            _ => Err(ConfigError::UnknownStrategy(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Fifo;

impl DispatchStrategy for Fifo {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Fifo
    }

    fn select(
        &self,
        _ctx: &SelectionContext,
        queue: &DispatchQueue,
        _travel: &TravelModel,
        _rng: &mut SimRng,
    ) -> Result<Option<QueueSlot>, ConfigError> {
        let Some(severity) = queue.top_tier() else {
            return Ok(None);
        };
        Ok(queue
            .tier(severity)
            .iter()
            .enumerate()
            .min_by_key(|(_, em)| em.arrived_at)
            .map(|(index, _)| QueueSlot { severity, index }))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Nearest;

impl DispatchStrategy for Nearest {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Nearest
    }

    fn select(
        &self,
        ctx: &SelectionContext,
        queue: &DispatchQueue,
        travel: &TravelModel,
        _rng: &mut SimRng,
    ) -> Result<Option<QueueSlot>, ConfigError> {
        let Some(severity) = queue.top_tier() else {
            return Ok(None);
        };
        // Base matrix, not a fresh draw, so the choice is stable.
        let mut best: Option<(usize, f64)> = None;
        for (index, em) in queue.tier(severity).iter().enumerate() {
            let dist = travel.base_secs(ctx.location, em.district)?;
            if best.is_none_or(|(_, d)| dist < d) {
                best = Some((index, dist));
            }
        }
        Ok(best.map(|(index, _)| QueueSlot { severity, index }))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RandomPick;

impl DispatchStrategy for RandomPick {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Random
    }

    fn select(
        &self,
        _ctx: &SelectionContext,
        queue: &DispatchQueue,
        _travel: &TravelModel,
        rng: &mut SimRng,
    ) -> Result<Option<QueueSlot>, ConfigError> {
        let Some(severity) = queue.top_tier() else {
            return Ok(None);
        };
        let index = rng.index(queue.tier(severity).len());
        Ok(Some(QueueSlot { severity, index }))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HighestPriorityFirst;

impl DispatchStrategy for HighestPriorityFirst {
    fn kind(&self) -> StrategyKind {
        StrategyKind::HighestPriorityFirst
    }

    fn select(
        &self,
        _ctx: &SelectionContext,
        queue: &DispatchQueue,
        _travel: &TravelModel,
        _rng: &mut SimRng,
    ) -> Result<Option<QueueSlot>, ConfigError> {
        Ok(queue
            .iter()
            .min_by_key(|(_, em)| (Reverse(em.severity.value()), em.arrived_at))
            .map(|(slot, _)| slot))
    }
}
