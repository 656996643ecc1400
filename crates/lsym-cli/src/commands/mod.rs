pub mod group;
pub mod state_info;
pub mod tiers;
