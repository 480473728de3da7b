//! Delivery agent (bike) movement logic
//!
//! Standalone implementation that doesn't depend on any rendering host.

use std::collections::VecDeque;

use super::road_network::SimRoadNetwork;
use super::types::{AgentId, HouseId, Position};

/// Seconds of negligible progress before an agent forces a re-route
pub const STUCK_TIMEOUT: f32 = 5.0;

/// Result of an agent update indicating what action should be taken
#[derive(Debug, Clone, PartialEq)]
pub enum AgentUpdateResult {
    /// Agent continues moving (or is idle awaiting a target)
    Continue,
    /// Agent drained its waypoint queue with a target set: delivery done
    Delivered(HouseId),
    /// Agent made no meaningful progress for too long; the world must
    /// re-run target assignment and recompute the route
    NeedsReroute,
}

/// A delivery bike in the simulation
///
/// State machine: Idle (no target) -> Routed (target + non-empty waypoint
/// queue) -> Arriving (queue drained, target still set) -> removed once the
/// delivery is scored. The queue is non-empty iff a target is assigned and
/// the agent has not yet arrived.
#[derive(Debug, Clone)]
pub struct SimAgent {
    pub id: AgentId,
    pub position: Position,
    /// Movement speed in canvas units per simulated second
    pub speed: f32,
    /// The house this agent is delivering to, by ID (houses are never
    /// removed mid-session, so a held ID always resolves)
    pub target: Option<HouseId>,
    /// Remaining waypoints, front = next stop
    pub waypoints: VecDeque<Position>,
    /// Seconds spent without snapping to a waypoint
    pub stuck_timer: f32,
}

impl SimAgent {
    pub fn new(id: AgentId, position: Position, speed: f32) -> Self {
        Self {
            id,
            position,
            speed,
            target: None,
            waypoints: VecDeque::new(),
            stuck_timer: 0.0,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.target.is_none()
    }

    /// Install a freshly planned route toward `target`
    pub fn assign(&mut self, target: HouseId, waypoints: Vec<Position>) {
        self.target = Some(target);
        self.waypoints = waypoints.into();
        self.stuck_timer = 0.0;
    }

    /// Advance the agent by one tick
    ///
    /// Movement is modulated by the congestion factor at the agent's
    /// current position. The stuck timer accrues on every tick that does
    /// not snap to a waypoint and resets on every tick that does.
    pub fn update(&mut self, delta_secs: f32, network: &SimRoadNetwork) -> AgentUpdateResult {
        let target = match self.target {
            Some(target) => target,
            None => return AgentUpdateResult::Continue,
        };

        let next = match self.waypoints.front() {
            Some(next) => *next,
            None => return AgentUpdateResult::Delivered(target),
        };

        if self.stuck_timer > STUCK_TIMEOUT {
            return AgentUpdateResult::NeedsReroute;
        }

        let factor = network.congestion_factor_at(&self.position);
        let step = self.speed * factor * delta_secs;

        if self.position.distance(&next) <= step {
            self.position = next;
            self.waypoints.pop_front();
            self.stuck_timer = 0.0;
        } else {
            self.position = self.position.move_toward(&next, step);
            self.stuck_timer += delta_secs;
        }

        AgentUpdateResult::Continue
    }
}
