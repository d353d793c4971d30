pub mod constants;

mod bucket;
pub use bucket::Bucket;

mod file_header;
pub use file_header::FileHeader;

mod hash_file;
pub use hash_file::HashFile;

mod hash_file_options;
pub use hash_file_options::HashFileOptions;

mod id_iterator;
pub use id_iterator::IdIterator;

mod positional_io;
