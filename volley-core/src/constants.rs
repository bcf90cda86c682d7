use std::time::Duration;

/// Concurrency used by the batch runner when the caller asks for zero.
pub const DEFAULT_BATCH_CONCURRENCY: usize = 5;

/// Concurrency used by the load runner when the caller asks for zero.
pub const DEFAULT_LOAD_CONCURRENCY: usize = 10;

/// Duration used by the load runner when the caller asks for zero.
pub const DEFAULT_LOAD_DURATION: Duration = Duration::from_secs(30);

/// Maximum number of body bytes kept in a [`ResponseSnapshot`](crate::ResponseSnapshot).
pub const SNAPSHOT_BODY_LIMIT: usize = 4096;

/// Status codes at or above this are failures in load mode.
pub const LOAD_FAILURE_STATUS: u16 = 400;
