pub mod document_loader;
pub mod toml_loader;

pub use document_loader::load_all_documents;
pub use toml_loader::load_template;
