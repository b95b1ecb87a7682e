// lib.rs - Piece hashing and info-hash fingerprinting of single files

pub mod bencode;
pub mod config;
pub mod engine;
pub mod error;
pub mod file_io;
pub mod hasher;
pub mod piece_manager;
pub mod progress;
pub mod torrent;

// Re-export commonly used types for easier testing
pub use bencode::{bvalue_to_json, encode_bvalue, BValue};
pub use config::Config;
pub use error::HashError;
pub use file_io::ChunkSource;
pub use hasher::{HashAlgorithm, PieceHasher};
pub use piece_manager::{expected_piece_count, PieceManager, PiecesBlob};
pub use progress::ProgressTracker;
pub use torrent::{build_metainfo, compute_info_hash, create_info_from_path, InfoHash, TorrentInfo};
