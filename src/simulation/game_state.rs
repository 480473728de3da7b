//! Game state tracking for the delivery game
//!
//! Tracks the player's score, road budget, and day progression, and
//! describes the game-over condition. Game-over is expected, not a fault:
//! the world reports a summary and resets the session.

/// Score awarded per completed delivery
pub const DELIVERY_REWARD: u32 = 10;

/// Road budget granted at the start of a session
pub const STARTING_ROAD_BUDGET: u32 = 10;

/// Roads replenished at each day rollover
pub const ROAD_BUDGET_PER_DAY: u32 = 3;

/// Simulated seconds per game day
pub const DAY_SECONDS: f32 = 30.0;

/// A house whose demand exceeds this ends the session
pub const DEMAND_CEILING: u32 = 5;

/// Concurrent agent cap is this base plus the current day count
pub const MAX_AGENTS_BASE: usize = 2;

/// Final summary reported when a session ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameOverReport {
    pub day: u32,
    pub score: u32,
    pub deliveries: usize,
}

/// Game state that tracks player progress and resources
#[derive(Debug, Clone)]
pub struct GameState {
    /// Player's current score
    pub score: u32,

    /// Total deliveries completed this session
    pub deliveries_completed: usize,

    /// Elapsed game days
    pub day: u32,

    /// Remaining roads the player may draw; never goes negative
    pub road_budget: u32,

    /// Session time in simulated seconds
    pub time: f32,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Create a new game state with starting conditions
    pub fn new() -> Self {
        Self {
            score: 0,
            deliveries_completed: 0,
            day: 0,
            road_budget: STARTING_ROAD_BUDGET,
            time: 0.0,
        }
    }

    /// Advance session time, rolling the day counter and replenishing the
    /// road budget on each rollover
    /// Returns true when a new day started this tick
    pub fn advance_time(&mut self, delta_secs: f32) -> bool {
        let previous_day = (self.time / DAY_SECONDS) as u32;
        self.time += delta_secs;
        let current_day = (self.time / DAY_SECONDS) as u32;

        if current_day > previous_day {
            self.day = current_day;
            self.road_budget += ROAD_BUDGET_PER_DAY;
            true
        } else {
            false
        }
    }

    /// Maximum concurrent agents, growing with elapsed days
    pub fn max_agents(&self) -> usize {
        MAX_AGENTS_BASE + self.day as usize
    }

    /// Try to consume one unit of road budget
    /// Returns true if successful, false if the budget is exhausted
    pub fn spend_road(&mut self) -> bool {
        if self.road_budget > 0 {
            self.road_budget -= 1;
            true
        } else {
            false
        }
    }

    /// Record a completed delivery and award the reward
    pub fn record_delivery(&mut self) {
        self.deliveries_completed += 1;
        self.score += DELIVERY_REWARD;
    }

    /// Snapshot the final summary for a game-over report
    pub fn report(&self) -> GameOverReport {
        GameOverReport {
            day: self.day,
            score: self.score,
            deliveries: self.deliveries_completed,
        }
    }

    /// Get a summary string for display
    pub fn summary(&self) -> String {
        format!(
            "Score: {} | Deliveries: {} | Day: {} | Roads left: {} | Time: {:.1}s",
            self.score, self.deliveries_completed, self.day, self.road_budget, self.time
        )
    }
}
