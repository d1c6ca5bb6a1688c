pub mod detail;
pub mod failover;
pub mod health;
pub mod search;

pub mod util;
