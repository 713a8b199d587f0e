pub use crate::builder::{CacheBuilder, PolicyKind};
pub use crate::ds::{GhostList, NodeIndex, OrderList, ShardSelector};
pub use crate::error::CacheError;
pub use crate::policy::arc::ArcCache;
pub use crate::policy::lfu::{LfuCache, DEFAULT_MAX_AVERAGE};
pub use crate::policy::lru::LruCache;
pub use crate::policy::lru_k::LruKCache;
pub use crate::policy::sharded::{ShardedLfuCache, ShardedLruCache};
pub use crate::traits::{CachePolicy, PurgeableCache, RemovableCache};
