pub mod compress;
pub mod extract;
pub mod filter;
pub mod report;

pub use compress::{ArchiveCompressor, ResourceFile};
pub use extract::ArchiveExtractor;
pub use filter::{entry_base_name, ArchiveFilter};
pub use report::{EntryRecord, Operation, TransferProgress, TransferReport};
