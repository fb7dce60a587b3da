//! Evidence source adapters

mod chroma;
mod in_memory;
mod tavily;

pub use chroma::ChromaRetriever;
pub use in_memory::InMemoryRetriever;
pub use tavily::TavilySearcher;
