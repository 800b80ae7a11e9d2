//! Rate Limiting Module
//! 
//! Remote reads are paced by a pluggable `RateLimiter`:
//! - FixedInterval: sleeps a fixed delay after every successful read
//! - Unlimited: never sleeps (tests, local nodes)

mod limiter;

pub use limiter::{FixedInterval, RateLimiter, Unlimited};
