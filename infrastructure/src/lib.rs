pub mod binding;
pub mod config;
pub mod document_loader;
pub mod google_client;
mod http;
pub mod local_embedder;
pub mod openai_client;
pub mod providers;
pub mod search;
pub mod vector_store;
