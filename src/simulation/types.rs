//! Core types for the delivery simulation
//!
//! These are standalone types that don't depend on any rendering host.

/// A unique identifier for simulation entities
/// This is a simple wrapper around a usize for type safety
///
/// IDs are handed out by a monotonic counter, so the derived `Ord` orders
/// entities by creation time. Collections keyed by these IDs iterate in
/// creation order, which is the tie-break for every "first encountered"
/// rule in the routing heuristics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SimId(pub usize);

/// A wrapper type for shop IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShopId(pub SimId);

/// A wrapper type for house IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HouseId(pub SimId);

/// A wrapper type for road IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoadId(pub SimId);

/// A wrapper type for agent (bike) IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AgentId(pub SimId);

/// A node on the map: either a shop or a house
///
/// Road endpoints snap to nodes, and the nearest-node scan iterates shops
/// and houses uniformly through this tag instead of duck-typing over two
/// separate collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeId {
    Shop(ShopId),
    House(HouseId),
}

/// A 2D position in canvas space
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Position) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Move up to `max_step` units toward `target`, stopping exactly on it
    /// when it is within reach.
    pub fn move_toward(&self, target: &Position, max_step: f32) -> Position {
        let dx = target.x - self.x;
        let dy = target.y - self.y;
        let len = (dx * dx + dy * dy).sqrt();
        if len <= max_step || len == 0.0 {
            *target
        } else {
            Position {
                x: self.x + dx / len * max_step,
                y: self.y + dy / len * max_step,
            }
        }
    }
}

/// A road segment connecting the centers of two nodes
///
/// `traffic` is the congestion counter: incremented each time the router
/// steps across the segment, decayed toward zero every tick. It never goes
/// negative.
#[derive(Debug, Clone)]
pub struct SimRoad {
    pub id: RoadId,
    pub start_node: NodeId,
    pub end_node: NodeId,
    pub start_pos: Position,
    pub end_pos: Position,
    pub length: f32,
    pub traffic: f32,
}

impl SimRoad {
    pub fn new(
        id: RoadId,
        start_node: NodeId,
        end_node: NodeId,
        start_pos: Position,
        end_pos: Position,
    ) -> Self {
        let length = start_pos.distance(&end_pos);
        Self {
            id,
            start_node,
            end_node,
            start_pos,
            end_pos,
            length,
            traffic: 0.0,
        }
    }
}

/// Maximum distance at which a road endpoint snaps to a node, and at which
/// a node counts as a candidate entry for the router
pub const SNAP_RADIUS: f32 = 50.0;

/// Traffic level above which a segment counts as congested
pub const CONGESTION_TRAFFIC_THRESHOLD: f32 = 5.0;

/// Distance from a congested segment endpoint within which agents slow down
pub const CONGESTION_RADIUS: f32 = 20.0;

/// Speed multiplier applied to agents near a congested segment
pub const CONGESTION_SLOWDOWN: f32 = 0.5;

/// Rate at which road traffic counters decay, per simulated second
pub const TRAFFIC_DECAY_PER_SECOND: f32 = 0.3;
