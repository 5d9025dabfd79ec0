//! A per-host leaky-bucket rate limiter (spec.md §4.2): capacity `R` starts
//! per 1-second window. Acquiring a slot blocks the caller until a token is
//! free rather than rejecting, matching the original's `aiolimiter.AsyncLimiter`.

use std::collections::VecDeque;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

pub struct RateLimiter {
    capacity: usize,
    window: Duration,
    starts: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    pub fn new(capacity: u32, window: Duration) -> Self {
        Self {
            capacity: capacity.max(1) as usize,
            window,
            starts: Mutex::new(VecDeque::with_capacity(capacity as usize)),
        }
    }

    /// Blocks until a new request is allowed to start, then records it.
    pub async fn acquire(&self) {
        loop {
            let wait = {
                let mut starts = self.starts.lock().await;
                let now = Instant::now();
                while let Some(&oldest) = starts.front() {
                    if now.duration_since(oldest) >= self.window {
                        starts.pop_front();
                    } else {
                        break;
                    }
                }

                if starts.len() < self.capacity {
                    starts.push_back(now);
                    None
                } else {
                    let oldest = *starts.front().expect("checked len >= capacity > 0");
                    Some(self.window.saturating_sub(now.duration_since(oldest)))
                }
            };

            match wait {
                None => return,
                Some(duration) => tokio::time::sleep(duration).await,
            }
        }
    }
}
