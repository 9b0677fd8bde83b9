pub mod crossref;
pub mod fallback;
pub mod model;
pub mod resolver;

pub use crossref::CrossrefClient;
pub use model::{Article, Author, MetadataSource};
pub use resolver::MetadataResolver;
