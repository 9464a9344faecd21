//! Vector store implementations

mod chroma;
mod in_memory;

pub use chroma::ChromaVectorStore;
pub use in_memory::InMemoryVectorStore;
