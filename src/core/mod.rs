mod engine;
mod types;

pub use engine::{
    ASSUMED_SAVINGS_RATE, BARISTA_MULTIPLE, COAST_TARGET_AGE, FAT_MULTIPLE, GOAL_BARISTA_SHARE,
    GOAL_FAT_SHARE, GOAL_LEAN_SHARE, LEAN_MULTIPLE, RATE_EPSILON, TRADITIONAL_MULTIPLE,
    fire_targets, future_value, goal_targets, real_rate, required_savings, years_to_target,
};
pub use types::{FireTargets, PlanField, PlanInput, PlanMode, SavingsPlan, Timeline};
