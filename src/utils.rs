mod compute_key_hash;
pub use compute_key_hash::compute_key_hash;

mod format_bytes;
pub use format_bytes::format_bytes;

mod parse_hash;
pub use parse_hash::parse_hash;

mod prefix_file_name;
pub use prefix_file_name::prefix_file_name;

mod verify_file_existence;
pub use verify_file_existence::verify_file_existence;
