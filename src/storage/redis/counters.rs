//! Fixed-window counters backed by one Lua script
//!
//! INCR and the first-hit PEXPIRE run inside a single script invocation, so a
//! window can never be left without an expiry and no two instances observe
//! the same count.

use super::pool::RedisPool;
use crate::storage::{CounterStore, WindowCount};
use crate::utils::error::{GatewayError, Result};
use async_trait::async_trait;
use std::sync::LazyLock;
use std::time::Duration;

static FIXED_WINDOW: LazyLock<redis::Script> = LazyLock::new(|| {
    redis::Script::new(
        r#"
local current = redis.call('INCR', KEYS[1])
if current == 1 then
    redis.call('PEXPIRE', KEYS[1], ARGV[1])
end
local ttl = redis.call('PTTL', KEYS[1])
if ttl < 0 then
    redis.call('PEXPIRE', KEYS[1], ARGV[1])
    ttl = tonumber(ARGV[1])
end
return {current, ttl}
"#,
    )
});

#[async_trait]
impl CounterStore for RedisPool {
    async fn increment(&self, key: &str, window: Duration) -> Result<WindowCount> {
        let window_ms = u64::try_from(window.as_millis())
            .map_err(|_| GatewayError::validation("Rate limit window too large"))?
            .max(1);

        let mut conn = self.connection();
        let (count, ttl_ms): (i64, i64) = FIXED_WINDOW
            .key(key)
            .arg(window_ms)
            .invoke_async(&mut conn)
            .await
            .map_err(GatewayError::Redis)?;

        Ok(WindowCount {
            count: count.max(0) as u64,
            reset_after: Duration::from_millis(ttl_ms.max(0) as u64),
        })
    }

    async fn health_check(&self) -> Result<()> {
        self.ping().await
    }
}
