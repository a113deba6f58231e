mod connect;
mod error;
mod keyspace;
mod load;
mod store;

pub use connect::{connect, target_url, AuthType, TargetParams};
pub use error::{RedisError, RedisResult};
pub use keyspace::parse_keyspace;
pub use load::load_checkpoint;
pub use store::RedisStore;
