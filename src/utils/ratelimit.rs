use std::collections::{HashMap, VecDeque};
use std::time::{SystemTime, UNIX_EPOCH};
use lazy_static::lazy_static;
use serenity::model::id::UserId;
use tokio::sync::Mutex;

const COOLDOWN_SECONDS: u64 = 5;
/// CoinGecko's public tier allows roughly 30 calls per minute
const API_CALLS_PER_WINDOW: usize = 30;
const API_WINDOW_MS: u64 = 60_000;

lazy_static! {
    static ref COMMAND_COOLDOWNS: Mutex<Cooldowns> = Mutex::new(Cooldowns::new(COOLDOWN_SECONDS));
    static ref API_BUDGET: Mutex<SlidingWindow> =
        Mutex::new(SlidingWindow::new(API_CALLS_PER_WINDOW, API_WINDOW_MS));
}

/// Last-use timestamps per (user, command)
pub struct Cooldowns {
    seconds: u64,
    last_used: HashMap<(UserId, String), u64>,
}

impl Cooldowns {
    pub fn new(seconds: u64) -> Self {
        Self {
            seconds,
            last_used: HashMap::new(),
        }
    }

    /// Record a use at `now_secs` or return the seconds still to wait
    pub fn check(&mut self, user_id: UserId, command: &str, now_secs: u64) -> Result<(), u64> {
        let key = (user_id, command.to_string());
        if let Some(&last) = self.last_used.get(&key) {
            let elapsed = now_secs.saturating_sub(last);
            if elapsed < self.seconds {
                return Err(self.seconds - elapsed);
            }
        }
        self.last_used.insert(key, now_secs);
        Ok(())
    }
}

/// At most `limit` events in any trailing `window_ms`
pub struct SlidingWindow {
    limit: usize,
    window_ms: u64,
    events: VecDeque<u64>,
}

impl SlidingWindow {
    pub fn new(limit: usize, window_ms: u64) -> Self {
        Self {
            limit,
            window_ms,
            events: VecDeque::new(),
        }
    }

    /// Record an event at `now_ms` or return the milliseconds until a slot frees
    pub fn try_acquire(&mut self, now_ms: u64) -> Result<(), u64> {
        while self.events.front().is_some_and(|&t| t + self.window_ms <= now_ms) {
            self.events.pop_front();
        }

        if self.events.len() >= self.limit {
            let oldest = self.events.front().copied().unwrap_or(now_ms);
            return Err((oldest + self.window_ms).saturating_sub(now_ms));
        }

        self.events.push_back(now_ms);
        Ok(())
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Per-user command cooldown; Err carries the remaining seconds
pub async fn check_cooldown(user_id: UserId, command: &str) -> Result<(), u64> {
    COMMAND_COOLDOWNS
        .lock()
        .await
        .check(user_id, command, now_millis() / 1000)
}

/// Reserve one outbound CoinGecko call; Err carries the wait in milliseconds
pub async fn check_api_budget() -> Result<(), u64> {
    API_BUDGET.lock().await.try_acquire(now_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cooldown_per_user_and_command() {
        let mut cooldowns = Cooldowns::new(5);
        let alice = UserId::new(1);
        let bob = UserId::new(2);

        assert!(cooldowns.check(alice, "$chart", 100).is_ok());
        assert_eq!(cooldowns.check(alice, "$chart", 102), Err(3));
        assert!(cooldowns.check(alice, "$coins", 102).is_ok());
        assert!(cooldowns.check(bob, "$chart", 102).is_ok());
        assert!(cooldowns.check(alice, "$chart", 105).is_ok());
    }

    #[test]
    fn test_sliding_window() {
        let mut window = SlidingWindow::new(2, 1_000);

        assert!(window.try_acquire(0).is_ok());
        assert!(window.try_acquire(400).is_ok());
        assert_eq!(window.try_acquire(600), Err(400));
        assert!(window.try_acquire(1_000).is_ok());
        assert_eq!(window.try_acquire(1_100), Err(300));
    }
}
