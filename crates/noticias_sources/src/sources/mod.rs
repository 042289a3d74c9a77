pub mod contentful;
pub mod local;
pub mod supabase;

pub use contentful::ContentfulSource;
pub use local::LocalSource;
pub use supabase::SupabaseSource;
