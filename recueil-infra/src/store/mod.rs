//! DocumentStore 的实现
//!
//! - `memory`: 在进程内对 JSON 文档求值，用于本地开发和测试
//! - `sanity`: 将查询编译为 GROQ 并通过 HTTP 发送给 Sanity

pub mod groq;
pub mod memory;
pub mod sanity;

pub use groq::{CompiledQuery, GroqCompiler};
pub use memory::MemoryDocumentStore;
pub use sanity::{SanityConfig, SanityDocumentStore};
