pub mod fields;
pub mod resolver;
pub mod sources;

pub use resolver::Resolver;
pub use sources::contentful::ContentfulSource;
pub use sources::local::LocalSource;
pub use sources::supabase::SupabaseSource;

pub mod prelude {
    pub use crate::resolver::Resolver;
    pub use crate::sources::contentful::ContentfulSource;
    pub use crate::sources::local::LocalSource;
    pub use crate::sources::supabase::SupabaseSource;
    pub use noticias_core::{Error, Noticia, NoticiaSource, Result};
}
