pub mod archive_service;
pub mod document_service;
pub mod failure_log;
pub mod order_source;

pub use archive_service::{ArchiveService, ArchiveSummary, ZipArchiver};
pub use document_service::{append_image_pages, ChromeDocumentService, DocumentService};
pub use failure_log::FailureLog;
pub use order_source::{download_csv_file, CsvOrderSource, OrderSource};
