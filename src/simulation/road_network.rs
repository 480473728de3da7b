//! Road network storage and congestion tracking
//!
//! Standalone implementation that doesn't depend on any rendering host.
//! Roads are kept in insertion order: the greedy router's tie-breaks depend
//! on a stable scan order.

use super::types::{
    NodeId, Position, RoadId, SimRoad, CONGESTION_RADIUS, CONGESTION_SLOWDOWN,
    CONGESTION_TRAFFIC_THRESHOLD, TRAFFIC_DECAY_PER_SECOND,
};

/// The player-built road network, plus per-segment traffic counters
#[derive(Debug, Default)]
pub struct SimRoadNetwork {
    /// All road segments, in creation order
    roads: Vec<SimRoad>,
}

impl SimRoadNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a road to the network. Snap resolution and budget checks happen
    /// in the world layer; by the time a road reaches here it is valid.
    pub fn add_road(&mut self, road: SimRoad) -> RoadId {
        let id = road.id;
        self.roads.push(road);
        id
    }

    /// Gets a road by ID
    pub fn get_road(&self, road_id: RoadId) -> Option<&SimRoad> {
        self.roads.iter().find(|road| road.id == road_id)
    }

    /// Gets a road by ID, mutably
    pub fn get_road_mut(&mut self, road_id: RoadId) -> Option<&mut SimRoad> {
        self.roads.iter_mut().find(|road| road.id == road_id)
    }

    /// Checks whether a road already connects two nodes (either direction)
    pub fn road_exists_between(&self, a: NodeId, b: NodeId) -> bool {
        self.roads.iter().any(|road| {
            (road.start_node == a && road.end_node == b)
                || (road.start_node == b && road.end_node == a)
        })
    }

    /// All roads in creation order
    pub fn roads(&self) -> &[SimRoad] {
        &self.roads
    }

    /// Mutable access for the router's traffic bookkeeping
    pub fn roads_mut(&mut self) -> &mut [SimRoad] {
        &mut self.roads
    }

    /// Get number of roads
    pub fn road_count(&self) -> usize {
        self.roads.len()
    }

    /// Decay every traffic counter, clamped at zero
    ///
    /// Traffic only rises when the router steps across a segment, so this
    /// produces the lagging congestion signal the agents react to.
    pub fn decay_traffic(&mut self, delta_secs: f32) {
        let decay = TRAFFIC_DECAY_PER_SECOND * delta_secs;
        for road in &mut self.roads {
            road.traffic = (road.traffic - decay).max(0.0);
        }
    }

    /// Speed multiplier for an agent at `position`
    ///
    /// Half speed while within `CONGESTION_RADIUS` of an endpoint of any
    /// segment whose traffic exceeds the congestion threshold, full speed
    /// otherwise.
    pub fn congestion_factor_at(&self, position: &Position) -> f32 {
        let congested = self.roads.iter().any(|road| {
            road.traffic > CONGESTION_TRAFFIC_THRESHOLD
                && (position.distance(&road.start_pos) <= CONGESTION_RADIUS
                    || position.distance(&road.end_pos) <= CONGESTION_RADIUS)
        });

        if congested {
            CONGESTION_SLOWDOWN
        } else {
            1.0
        }
    }

    /// Drop all roads (session reset)
    pub fn clear(&mut self) {
        self.roads.clear();
    }
}
