pub mod document;
pub mod query;
pub mod store;

pub use document::Document;

pub use query::{
    Condition, Direction, DocumentQuery, Field, Projection, SortField,
};

pub use store::{DocumentStore, StoreError};
