//! Goal planner: picks the next identifier to elicit

use honeypot_core::{BeliefRecord, Goal};

/// Stateless next-goal selection over the belief record
#[derive(Debug, Clone, Copy, Default)]
pub struct GoalPlanner;

impl GoalPlanner {
    pub fn new() -> Self {
        Self
    }

    /// First goal in priority order whose slot is still empty, else stall
    pub fn next_goal(&self, beliefs: &BeliefRecord) -> Goal {
        Goal::PRIORITY
            .iter()
            .copied()
            .find(|goal| goal.identifier().is_some_and(|kind| !beliefs.is_set(kind)))
            .unwrap_or(Goal::Stall)
    }
}
