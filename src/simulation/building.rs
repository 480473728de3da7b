//! Building types for the delivery simulation
//!
//! Shops and houses - standalone implementations.

use super::types::{HouseId, Position, ShopId};

/// Simulated seconds between organic demand increments at a house
pub const DEMAND_INTERVAL: f32 = 10.0;

/// Default node footprint in canvas units (used by the map display and by
/// hosts that render the world)
pub const NODE_SIZE: f32 = 30.0;

/// A pizza shop: spawns delivery bikes, has no demand state
#[derive(Debug, Clone)]
pub struct SimShop {
    pub id: ShopId,
    /// Center of the shop; road endpoints snap here
    pub position: Position,
    pub width: f32,
    pub height: f32,
}

impl SimShop {
    pub fn new(id: ShopId, position: Position) -> Self {
        Self {
            id,
            position,
            width: NODE_SIZE,
            height: NODE_SIZE,
        }
    }
}

/// A house accumulating delivery demand over time
///
/// Houses are never removed during a session, so a `HouseId` held by an
/// agent always resolves for as long as the agent lives.
#[derive(Debug, Clone)]
pub struct SimHouse {
    pub id: HouseId,
    /// Center of the house; road endpoints snap here
    pub position: Position,
    pub width: f32,
    pub height: f32,
    /// Pending delivery orders
    pub demand: u32,
    /// Seconds since the last organic demand increment
    pub demand_timer: f32,
}

impl SimHouse {
    pub fn new(id: HouseId, position: Position) -> Self {
        Self {
            id,
            position,
            width: NODE_SIZE,
            height: NODE_SIZE,
            demand: 0,
            demand_timer: 0.0,
        }
    }

    /// Accrue the demand timer
    /// Returns true when a new order was generated this tick
    pub fn update(&mut self, delta_secs: f32) -> bool {
        self.demand_timer += delta_secs;
        if self.demand_timer >= DEMAND_INTERVAL {
            self.demand_timer = 0.0;
            self.demand += 1;
            true
        } else {
            false
        }
    }

    /// Claim one pending order for an agent assignment
    /// Demand never goes below zero
    pub fn claim_order(&mut self) {
        self.demand = self.demand.saturating_sub(1);
    }
}
