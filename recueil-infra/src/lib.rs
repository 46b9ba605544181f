pub mod store;

pub use store::{
    CompiledQuery, GroqCompiler, MemoryDocumentStore, SanityConfig, SanityDocumentStore,
};
