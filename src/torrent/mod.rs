pub mod metadata;
pub mod infohash;

pub use infohash::{compute_info_hash, info_hash_of_encoded, InfoHash};
pub use metadata::{build_metainfo, create_info_from_path, TorrentInfo};
