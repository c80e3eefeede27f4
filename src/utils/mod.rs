pub mod table;
pub mod ratelimit;

pub use table::{Align, Table};
pub use ratelimit::{check_api_budget, check_cooldown};
