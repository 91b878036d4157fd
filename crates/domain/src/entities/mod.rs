pub mod candle;
pub mod pool;
pub mod protocol_stats;
pub mod swap;

// Re-export for easier access
pub use candle::{Candle, CandleKey};
pub use pool::{Pool, PoolId};
pub use protocol_stats::ProtocolStats;
pub use swap::Swap;
