pub mod catalog;
pub mod event;
pub mod query;

pub use catalog::EventCatalog;
pub use event::Event;
pub use query::{CatalogQuery, QueryError, SortKey};
