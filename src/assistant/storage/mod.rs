//! Vector index backends for knowledge retrieval.

pub mod mongo_index;
pub mod pinecone_index;
pub mod sqlite_index;
pub mod sqlite_vec_loader;
pub mod vector_index;

pub use mongo_index::{MongoIndex, MongoTarget};
pub use pinecone_index::PineconeIndex;
pub use sqlite_index::SqliteVecIndex;
pub use sqlite_vec_loader::init_sqlite_vec_extension;
pub use vector_index::{IndexMatch, StoreFuture, VectorIndex};
