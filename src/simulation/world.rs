//! Main simulation world that ties everything together
//!
//! This is the entry point for running the delivery simulation without any
//! rendering dependencies. All state lives on `SimWorld`; every subsystem
//! mutates it only inside `tick`, in a fixed order, so the order-dependent
//! heuristics (demand claimed before routing, routing before movement)
//! stay stable.

use anyhow::{Context, Result};
use log::{debug, info, warn};
use ordered_float::OrderedFloat;
use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;
use std::collections::BTreeMap;

use super::agent::{AgentUpdateResult, SimAgent};
use super::building::{SimHouse, SimShop};
use super::game_state::{GameOverReport, GameState, DEMAND_CEILING};
use super::road_network::SimRoadNetwork;
use super::router::plan_route;
use super::types::{
    AgentId, HouseId, NodeId, Position, RoadId, ShopId, SimId, SimRoad, SNAP_RADIUS,
};

/// Fixed simulation timestep in seconds
///
/// All tuning constants (demand interval, stuck timeout, spawn probability)
/// assume a 1/60 step. Hosts feed wall-clock time into
/// [`SimWorld::advance`], which runs whole fixed steps, so simulation
/// behavior is independent of the render frame rate.
pub const TICK_SECONDS: f32 = 1.0 / 60.0;

/// Per-shop, per-tick probability of spawning a delivery bike
pub const AGENT_SPAWN_PROBABILITY: f32 = 0.02;

/// Bike speed range in canvas units per second (1.5-2.5 units per tick)
pub const AGENT_SPEED_RANGE: std::ops::Range<f32> = 90.0..150.0;

/// Playfield bounds in canvas units
pub const WORLD_WIDTH: f32 = 800.0;
pub const WORLD_HEIGHT: f32 = 600.0;

/// The main simulation world
pub struct SimWorld {
    /// Road network with per-segment traffic counters
    pub road_network: SimRoadNetwork,

    /// All shops, iterated in creation order
    pub shops: BTreeMap<ShopId, SimShop>,

    /// All houses, iterated in creation order
    pub houses: BTreeMap<HouseId, SimHouse>,

    /// All delivery bikes, iterated in creation order
    pub agents: BTreeMap<AgentId, SimAgent>,

    /// Game state: score, day, road budget
    pub game_state: GameState,

    /// Next ID to assign
    next_id: usize,

    /// Leftover wall-clock time not yet consumed by a full tick
    tick_accumulator: f32,

    /// Optional seeded RNG for reproducible simulations
    rng: Option<StdRng>,
}

impl Default for SimWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl SimWorld {
    fn new_internal(rng: Option<StdRng>) -> Self {
        Self {
            road_network: SimRoadNetwork::new(),
            shops: BTreeMap::new(),
            houses: BTreeMap::new(),
            agents: BTreeMap::new(),
            game_state: GameState::new(),
            next_id: 0,
            tick_accumulator: 0.0,
            rng,
        }
    }

    /// Create an empty world
    pub fn new() -> Self {
        Self::new_internal(None)
    }

    /// Create an empty world with a seeded RNG for reproducible simulations
    pub fn new_with_seed(seed: u64) -> Self {
        Self::new_internal(Some(StdRng::seed_from_u64(seed)))
    }

    /// Get a random value in the given range, using seeded RNG if available
    fn random_range(&mut self, range: std::ops::Range<f32>) -> f32 {
        match &mut self.rng {
            Some(rng) => rng.random_range(range),
            None => rand::rng().random_range(range),
        }
    }

    fn next_sim_id(&mut self) -> SimId {
        let id = SimId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Add a shop at a position (the position is the shop's center)
    pub fn add_shop(&mut self, position: Position) -> ShopId {
        let id = ShopId(self.next_sim_id());
        self.shops.insert(id, SimShop::new(id, position));
        id
    }

    /// Add a house at a position (the position is the house's center)
    pub fn add_house(&mut self, position: Position) -> HouseId {
        let id = HouseId(self.next_sim_id());
        self.houses.insert(id, SimHouse::new(id, position));
        id
    }

    /// Center position of a node
    pub fn node_position(&self, node: NodeId) -> Option<Position> {
        match node {
            NodeId::Shop(id) => self.shops.get(&id).map(|shop| shop.position),
            NodeId::House(id) => self.houses.get(&id).map(|house| house.position),
        }
    }

    /// Find the node nearest to a position, among those within the snap
    /// radius. Shops and houses are scanned uniformly; distance ties go to
    /// the lowest node ID (creation order).
    pub fn find_nearest_node(&self, position: &Position) -> Option<NodeId> {
        self.shops
            .values()
            .map(|shop| (NodeId::Shop(shop.id), shop.position))
            .chain(
                self.houses
                    .values()
                    .map(|house| (NodeId::House(house.id), house.position)),
            )
            .filter(|(_, center)| center.distance(position) <= SNAP_RADIUS)
            .min_by_key(|(node, center)| (OrderedFloat(center.distance(position)), *node))
            .map(|(node, _)| node)
    }

    /// Handle a road-drawing gesture: two endpoint coordinates in node
    /// space. Each endpoint snaps to the nearest node within the snap
    /// radius; the road connects the two node centers.
    ///
    /// Returns `None` without side effects when either endpoint has no
    /// nearby node, both resolve to the same node, the nodes are already
    /// connected, or the road budget is exhausted. Rejections are silent
    /// game rules, not errors.
    pub fn add_road_between(&mut self, from: Position, to: Position) -> Option<RoadId> {
        let start_node = match self.find_nearest_node(&from) {
            Some(node) => node,
            None => {
                debug!("road gesture rejected: no node near start {from:?}");
                return None;
            }
        };
        let end_node = match self.find_nearest_node(&to) {
            Some(node) => node,
            None => {
                debug!("road gesture rejected: no node near end {to:?}");
                return None;
            }
        };

        if start_node == end_node {
            debug!("road gesture rejected: both ends snap to {start_node:?}");
            return None;
        }

        if self.road_network.road_exists_between(start_node, end_node) {
            debug!("road gesture rejected: {start_node:?} and {end_node:?} already connected");
            return None;
        }

        if !self.game_state.spend_road() {
            debug!("road gesture rejected: road budget exhausted");
            return None;
        }

        // Both nodes resolved above, so the fallbacks cannot fire
        let start_pos = self.node_position(start_node).unwrap_or_default();
        let end_pos = self.node_position(end_node).unwrap_or_default();

        let id = RoadId(self.next_sim_id());
        let road = SimRoad::new(id, start_node, end_node, start_pos, end_pos);
        Some(self.road_network.add_road(road))
    }

    /// Spawn an idle delivery bike at a shop
    ///
    /// Returns `Ok(None)` when the concurrent-agent cap is reached.
    pub fn spawn_agent(&mut self, shop_id: ShopId) -> Result<Option<AgentId>> {
        if self.agents.len() >= self.game_state.max_agents() {
            return Ok(None);
        }

        let position = self
            .shops
            .get(&shop_id)
            .map(|shop| shop.position)
            .context("Shop not found")?;

        let speed = self.random_range(AGENT_SPEED_RANGE);
        let id = AgentId(self.next_sim_id());
        self.agents.insert(id, SimAgent::new(id, position, speed));
        Ok(Some(id))
    }

    /// Assign (or re-assign) a delivery target to an agent
    ///
    /// Picks the house with the highest positive demand, ties to the lowest
    /// ID, claims one order from it, and plans a route. A stuck agent whose
    /// re-assignment finds no demanding house keeps its current target and
    /// only gets a fresh route; previously claimed demand is never
    /// restored. An idle agent with no demanding house stays idle.
    pub fn assign_target(&mut self, agent_id: AgentId) -> Result<()> {
        let (position, speed, current_target) = {
            let agent = self.agents.get(&agent_id).context("Agent not found")?;
            (agent.position, agent.speed, agent.target)
        };

        let mut best: Option<(u32, HouseId)> = None;
        for house in self.houses.values() {
            if house.demand > 0 && best.map_or(true, |(demand, _)| house.demand > demand) {
                best = Some((house.demand, house.id));
            }
        }

        let target = match (best, current_target) {
            (Some((_, house_id)), _) => {
                self.houses
                    .get_mut(&house_id)
                    .context("Selected house not found")?
                    .claim_order();
                house_id
            }
            // No pending demand anywhere: a stuck agent keeps delivering to
            // its old target, an idle agent keeps waiting.
            (None, Some(existing)) => existing,
            (None, None) => return Ok(()),
        };

        let destination = self
            .houses
            .get(&target)
            .map(|house| house.position)
            .context("Target house not found")?;

        let waypoints = plan_route(
            &mut self.road_network,
            position,
            destination,
            speed * TICK_SECONDS,
        );

        self.agents
            .get_mut(&agent_id)
            .context("Agent not found")?
            .assign(target, waypoints);

        Ok(())
    }

    /// Probabilistically spawn bikes from shops, up to the agent cap
    fn spawn_agents(&mut self) {
        let shop_ids: Vec<ShopId> = self.shops.keys().copied().collect();

        for shop_id in shop_ids {
            if self.random_range(0.0..1.0) < AGENT_SPAWN_PROBABILITY {
                if let Err(err) = self.spawn_agent(shop_id) {
                    warn!("failed to spawn agent at {shop_id:?}: {err:#}");
                }
            }
        }
    }

    /// Accrue demand at every house; returns the ID of a house whose demand
    /// breached the ceiling, if any
    fn update_houses(&mut self, delta_secs: f32) -> Option<HouseId> {
        let mut breached = None;
        for house in self.houses.values_mut() {
            house.update(delta_secs);
            if house.demand > DEMAND_CEILING && breached.is_none() {
                breached = Some(house.id);
            }
        }
        breached
    }

    /// Spawn the periodic map growth for a new day: one new house every
    /// day, one new shop every third day
    fn grow_map(&mut self) {
        let x = self.random_range(40.0..WORLD_WIDTH - 40.0);
        let y = self.random_range(40.0..WORLD_HEIGHT - 40.0);
        self.add_house(Position::new(x, y));

        if self.game_state.day % 3 == 0 {
            let x = self.random_range(40.0..WORLD_WIDTH - 40.0);
            let y = self.random_range(40.0..WORLD_HEIGHT - 40.0);
            self.add_shop(Position::new(x, y));
        }
    }

    /// Clear all session state and re-seed one shop and one house
    pub fn reset_session(&mut self) {
        self.road_network.clear();
        self.shops.clear();
        self.houses.clear();
        self.agents.clear();
        self.game_state = GameState::new();
        self.tick_accumulator = 0.0;
        self.seed_session();
    }

    /// Seed the starting shop and house for a fresh session
    pub fn seed_session(&mut self) {
        let shop_x = self.random_range(60.0..WORLD_WIDTH / 2.0);
        let shop_y = self.random_range(60.0..WORLD_HEIGHT - 60.0);
        self.add_shop(Position::new(shop_x, shop_y));

        let house_x = self.random_range(WORLD_WIDTH / 2.0..WORLD_WIDTH - 60.0);
        let house_y = self.random_range(60.0..WORLD_HEIGHT - 60.0);
        self.add_house(Position::new(house_x, house_y));
    }

    /// Run one fixed simulation step
    ///
    /// Returns a final report when a house's demand breached the ceiling
    /// this tick; the session has already been reset by the time the report
    /// is returned.
    pub fn tick(&mut self, delta_secs: f32) -> Option<GameOverReport> {
        if self.game_state.advance_time(delta_secs) {
            info!(
                "day {} begins: road budget {}",
                self.game_state.day, self.game_state.road_budget
            );
            self.grow_map();
        }

        if let Some(house_id) = self.update_houses(delta_secs) {
            let report = self.game_state.report();
            info!(
                "game over: {house_id:?} demand exceeded {DEMAND_CEILING} \
                 (day {}, score {})",
                report.day, report.score
            );
            self.reset_session();
            return Some(report);
        }

        self.spawn_agents();

        // Target assignment for idle agents
        let idle_agents: Vec<AgentId> = self
            .agents
            .iter()
            .filter(|(_, agent)| agent.is_idle())
            .map(|(id, _)| *id)
            .collect();
        for agent_id in idle_agents {
            if let Err(err) = self.assign_target(agent_id) {
                warn!("assignment failed for {agent_id:?}: {err:#}");
            }
        }

        // Movement; removals and re-routes are collected during iteration
        // and applied afterwards, never mid-scan
        let mut delivered = Vec::new();
        let mut needs_reroute = Vec::new();
        for (agent_id, agent) in self.agents.iter_mut() {
            match agent.update(delta_secs, &self.road_network) {
                AgentUpdateResult::Continue => {}
                AgentUpdateResult::Delivered(house_id) => delivered.push((*agent_id, house_id)),
                AgentUpdateResult::NeedsReroute => needs_reroute.push(*agent_id),
            }
        }

        for agent_id in needs_reroute {
            debug!("{agent_id:?} stuck, forcing re-route");
            if let Err(err) = self.assign_target(agent_id) {
                warn!("re-route failed for {agent_id:?}: {err:#}");
            }
        }

        for (agent_id, house_id) in delivered {
            self.game_state.record_delivery();
            debug!("{agent_id:?} delivered to {house_id:?}");
            self.agents.remove(&agent_id);
        }

        self.road_network.decay_traffic(delta_secs);

        None
    }

    /// Feed wall-clock time into the simulation, running as many whole
    /// fixed steps as it covers. Leftover time carries to the next call.
    pub fn advance(&mut self, elapsed_secs: f32) -> Vec<GameOverReport> {
        let mut reports = Vec::new();
        self.tick_accumulator += elapsed_secs;
        while self.tick_accumulator >= TICK_SECONDS {
            self.tick_accumulator -= TICK_SECONDS;
            if let Some(report) = self.tick(TICK_SECONDS) {
                reports.push(report);
            }
        }
        reports
    }

    /// Create a demo world with a handful of nodes and pre-drawn roads
    pub fn create_demo_world() -> Self {
        Self::build_demo_world(SimWorld::new())
    }

    /// Create a demo world with a seeded RNG for reproducible simulations
    pub fn create_demo_world_with_seed(seed: u64) -> Self {
        Self::build_demo_world(SimWorld::new_with_seed(seed))
    }

    /// Internal helper to build the demo world structure
    fn build_demo_world(mut world: SimWorld) -> Self {
        let shop_a = Position::new(120.0, 300.0);
        let shop_b = Position::new(430.0, 480.0);
        let house_a = Position::new(300.0, 300.0);
        let house_b = Position::new(520.0, 220.0);
        let house_c = Position::new(680.0, 420.0);

        world.add_shop(shop_a);
        world.add_shop(shop_b);
        world.add_house(house_a);
        world.add_house(house_b);
        world.add_house(house_c);

        // Pre-draw the road gestures a player would make: a chain from the
        // first shop through the houses, plus a spur from the second shop.
        world.add_road_between(shop_a, house_a);
        world.add_road_between(house_a, house_b);
        world.add_road_between(house_b, house_c);
        world.add_road_between(shop_b, house_c);
        world.add_road_between(shop_b, house_a);

        world
    }

    /// Print a summary of the world state
    pub fn print_summary(&self) {
        println!("=== Delivery Simulation Summary ===");
        println!("{}", self.game_state.summary());
        println!(
            "Shops: {}, Houses: {}, Roads: {}, Bikes: {}",
            self.shops.len(),
            self.houses.len(),
            self.road_network.road_count(),
            self.agents.len()
        );

        println!("--- Houses ---");
        for house in self.houses.values() {
            println!(
                "  House {:?}: demand={}, next order in {:.1}s",
                house.id.0,
                house.demand,
                super::building::DEMAND_INTERVAL - house.demand_timer
            );
        }

        if !self.agents.is_empty() {
            println!("--- Active Bikes ---");
            for agent in self.agents.values() {
                println!(
                    "  Bike {:?}: speed={:.0}, position=({:.0}, {:.0}), waypoints={}, stuck={:.1}s",
                    agent.id.0,
                    agent.speed,
                    agent.position.x,
                    agent.position.y,
                    agent.waypoints.len(),
                    agent.stuck_timer
                );
            }
        }

        let congested = self
            .road_network
            .roads()
            .iter()
            .filter(|road| road.traffic > super::types::CONGESTION_TRAFFIC_THRESHOLD)
            .count();
        println!(
            "Congested segments: {}/{}",
            congested,
            self.road_network.road_count()
        );
    }

    /// Draw a visual map of the world in the terminal
    pub fn draw_map(&self) {
        const COLS: usize = 80;
        const ROWS: usize = 30;

        let mut grid = vec![vec![' '; COLS]; ROWS];

        let to_grid = |pos: &Position| -> (usize, usize) {
            let col = (pos.x / WORLD_WIDTH * COLS as f32) as usize;
            let row = (pos.y / WORLD_HEIGHT * ROWS as f32) as usize;
            (row.min(ROWS - 1), col.min(COLS - 1))
        };

        // Draw roads (Bresenham-like between endpoint cells)
        for road in self.road_network.roads() {
            let (start_row, start_col) = to_grid(&road.start_pos);
            let (end_row, end_col) = to_grid(&road.end_pos);

            let dx = (end_col as i32 - start_col as i32).abs();
            let dy = (end_row as i32 - start_row as i32).abs();
            let sx = if start_col < end_col { 1 } else { -1 };
            let sy = if start_row < end_row { 1 } else { -1 };

            let glyph = if road.traffic > super::types::CONGESTION_TRAFFIC_THRESHOLD {
                '#'
            } else {
                '.'
            };

            let mut err = dx - dy;
            let mut x = start_col as i32;
            let mut y = start_row as i32;

            loop {
                if x >= 0 && x < COLS as i32 && y >= 0 && y < ROWS as i32 {
                    let (ux, uy) = (x as usize, y as usize);
                    if grid[uy][ux] == ' ' || grid[uy][ux] == '.' {
                        grid[uy][ux] = glyph;
                    }
                }

                if x == end_col as i32 && y == end_row as i32 {
                    break;
                }

                let e2 = 2 * err;
                if e2 > -dy {
                    err -= dy;
                    x += sx;
                }
                if e2 < dx {
                    err += dx;
                    y += sy;
                }
            }
        }

        for shop in self.shops.values() {
            let (row, col) = to_grid(&shop.position);
            grid[row][col] = 'S';
        }

        for house in self.houses.values() {
            let (row, col) = to_grid(&house.position);
            grid[row][col] = 'H';
        }

        for agent in self.agents.values() {
            let (row, col) = to_grid(&agent.position);
            if grid[row][col] == ' ' || grid[row][col] == '.' || grid[row][col] == '#' {
                grid[row][col] = 'b';
            }
        }

        println!("\n=== World Map ===");
        println!("Legend: S=Shop, H=House, b=Bike, .=Road, #=Congested road");
        println!();
        for row in &grid {
            let line: String = row.iter().collect();
            println!("{}", line);
        }
        println!();
    }
}
