pub mod kv;
pub use kv::{KvStore, MemoryKvStore, PgKvStore};
pub mod lead_repo;
pub use lead_repo::LeadRepository;
pub mod profile_repo;
pub use profile_repo::ProfileRepository;
pub mod fields_repo;
pub use fields_repo::FieldRepository;
