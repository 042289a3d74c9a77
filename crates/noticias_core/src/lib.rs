pub mod error;
pub mod richtext;
pub mod slug;
pub mod source;
pub mod types;

pub use error::Error;
pub use slug::slugify;
pub use source::NoticiaSource;
pub use types::{sort_recent_first, Body, Noticia, Origen};

pub type Result<T> = std::result::Result<T, Error>;

pub mod prelude {
    pub use crate::source::NoticiaSource;
    pub use crate::types::{Body, Noticia, Origen};
    pub use crate::{Error, Result};
}
