// ── Subnet store ──
//
// Live subnet records backed by a pluggable repository.

mod collection;
mod repository;
mod subnet_store;

pub use collection::Snapshot;
pub use repository::{JsonFileRepository, MemoryRepository, RepositoryError, SubnetRepository};
pub use subnet_store::{StoreOptions, SubnetStore};
