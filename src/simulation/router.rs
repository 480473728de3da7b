//! Greedy route planning over the road network
//!
//! This is deliberately NOT shortest-path search. Bikes follow a myopic
//! nearest-segment heuristic, and the stuck-detection and congestion
//! mechanics depend on that heuristic's imperfection: it can wander, double
//! back, or dead-end, and agents recover through forced re-routes rather
//! than better planning. Do not replace it with Dijkstra.

use ordered_float::OrderedFloat;

use super::road_network::SimRoadNetwork;
use super::types::{Position, SNAP_RADIUS};

/// Hard cap on greedy steps per route
///
/// The greedy stepper can oscillate between two mutually-nearest endpoints
/// forever; once the cap is hit the route falls back to a direct hop at the
/// target, the same fallback used when no segment is reachable.
pub const MAX_ROUTE_STEPS: usize = 64;

/// Plan a waypoint sequence from `start` to `target`.
///
/// Each step scans every segment in both traversal directions. A segment
/// endpoint within `SNAP_RADIUS` of the current position is a candidate
/// entry; the candidate whose opposite endpoint lies closest to the target
/// wins. Ties go to the earliest-created segment, forward direction first
/// (the tie-break key includes the scan index, so selection is fully
/// deterministic). Selected segments get their traffic counter bumped by
/// one.
///
/// The loop ends once the current position is within `arrive_distance` of
/// the target (one movement step for the requesting agent). When no
/// candidate exists the route finishes with a direct off-road hop to the
/// target; planning never fails.
pub fn plan_route(
    network: &mut SimRoadNetwork,
    start: Position,
    target: Position,
    arrive_distance: f32,
) -> Vec<Position> {
    let mut waypoints = Vec::new();
    let mut current = start;

    while current.distance(&target) > arrive_distance {
        if waypoints.len() >= MAX_ROUTE_STEPS {
            waypoints.push(target);
            break;
        }

        let candidate = network
            .roads()
            .iter()
            .enumerate()
            .flat_map(|(index, road)| {
                [
                    (index, 0usize, road.start_pos, road.end_pos),
                    (index, 1usize, road.end_pos, road.start_pos),
                ]
            })
            .filter(|(_, _, entry, _)| entry.distance(&current) <= SNAP_RADIUS)
            .min_by_key(|(index, direction, _, exit)| {
                (OrderedFloat(exit.distance(&target)), *index, *direction)
            });

        match candidate {
            Some((index, _, _, exit)) => {
                waypoints.push(exit);
                current = exit;
                network.roads_mut()[index].traffic += 1.0;
            }
            None => {
                waypoints.push(target);
                break;
            }
        }
    }

    // Already in arrival range: still hand back the target so the agent's
    // arrival bookkeeping runs on the next movement tick.
    if waypoints.is_empty() {
        waypoints.push(target);
    }

    waypoints
}
