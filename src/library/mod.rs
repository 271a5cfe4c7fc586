/// Workflow library import
/// 
/// Turns a directory of n8n workflow exports into catalog records. Each file is
/// validated, run through the metadata extractor, and upserted by title.

pub mod importer;

pub use importer::{FileOutcome, ImportError, ImportReport, LibraryImporter};
