//! Standalone delivery simulation module
//!
//! This module contains all the core delivery simulation logic. It runs
//! independently of any rendering host and can be exercised from the
//! console or from tests without booting up a game.

mod agent;
mod building;
mod game_state;
mod road_network;
mod router;
mod types;
mod world;

// Re-export public types for external use
// These may not be used within this crate but are part of the public API
#[allow(unused_imports)]
pub use agent::{AgentUpdateResult, SimAgent, STUCK_TIMEOUT};
#[allow(unused_imports)]
pub use building::{SimHouse, SimShop, DEMAND_INTERVAL};
#[allow(unused_imports)]
pub use game_state::{
    GameOverReport, GameState, DAY_SECONDS, DELIVERY_REWARD, DEMAND_CEILING, MAX_AGENTS_BASE,
    ROAD_BUDGET_PER_DAY, STARTING_ROAD_BUDGET,
};
#[allow(unused_imports)]
pub use road_network::SimRoadNetwork;
#[allow(unused_imports)]
pub use router::{plan_route, MAX_ROUTE_STEPS};
#[allow(unused_imports)]
pub use types::{
    AgentId, HouseId, NodeId, Position, RoadId, ShopId, SimId, SimRoad, CONGESTION_RADIUS,
    CONGESTION_SLOWDOWN, CONGESTION_TRAFFIC_THRESHOLD, SNAP_RADIUS, TRAFFIC_DECAY_PER_SECOND,
};
pub use world::{SimWorld, TICK_SECONDS};
