//! SemSort entry persistence
//!
//! Supabase (PostgREST) and local JSON file stores behind one trait

mod json_file;
mod store;
mod supabase;
mod types;

pub use json_file::JsonFileStore;
pub use store::{build_store, EntryStore};
pub use supabase::SupabaseStore;
pub use types::{PostgrestError, SupabaseRow};
