pub type Result<T, E = crate::error::RagError> = std::result::Result<T, E>;
