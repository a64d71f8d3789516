//! 对象存储实现

mod memory;
mod supabase;

pub use memory::{InMemoryObjectStorage, StoredBlob};
pub use supabase::SupabaseStorage;
