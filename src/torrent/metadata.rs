use std::collections::HashMap;
use std::ffi::OsStr;
use std::path::Path;

use log::info;

use crate::bencode::{encode_bvalue, BValue};
use crate::config::Config;
use crate::error::HashError;
use crate::hasher::PieceHasher;
use crate::piece_manager::{PieceManager, PiecesBlob};
use crate::torrent::infohash::{info_hash_of_encoded, InfoHash};

/// Describes a single file: what gets encoded into the info dict.
#[derive(Debug, Clone)]
pub struct TorrentInfo {
    pub length: u64,           // Total size of the file
    pub name: Vec<u8>,         // Name of the file, used verbatim
    pub piece_length: u64,     // Size of each piece
    pub pieces: PiecesBlob,    // One digest per piece
}

impl TorrentInfo {
    pub fn to_bvalue(&self) -> Result<BValue, HashError> {
        build_metainfo(&self.name, self.length, self.piece_length, self.pieces.as_bytes())
    }

    /// The encoded info dict.
    pub fn encode(&self) -> Result<Vec<u8>, HashError> {
        Ok(encode_bvalue(&self.to_bvalue()?))
    }

    pub fn info_hash<H: PieceHasher>(&self, hasher: &H) -> Result<InfoHash, HashError> {
        info_hash_of_encoded(&self.encode()?, hasher)
    }
}

/// Builds the info dict with its four required keys.
pub fn build_metainfo(
    name: &[u8],
    total_length: u64,
    piece_length: u64,
    pieces: &[u8],
) -> Result<BValue, HashError> {
    let mut map = HashMap::new();

    // "length"
    map.insert(b"length".to_vec(), BValue::Integer(to_integer(total_length)?));

    // "name"
    map.insert(b"name".to_vec(), BValue::ByteString(name.to_vec()));

    // "piece length"
    map.insert(b"piece length".to_vec(), BValue::Integer(to_integer(piece_length)?));

    // "pieces"
    map.insert(b"pieces".to_vec(), BValue::ByteString(pieces.to_vec()));

    Ok(BValue::Dict(map))
}

fn to_integer(n: u64) -> Result<i64, HashError> {
    i64::try_from(n).map_err(|_| HashError::LengthOverflow(n))
}

/// Raw bytes of an OS string, unchanged where the platform allows it.
#[cfg(unix)]
fn os_str_bytes(s: &OsStr) -> Vec<u8> {
    use std::os::unix::ffi::OsStrExt;
    s.as_bytes().to_vec()
}

#[cfg(not(unix))]
fn os_str_bytes(s: &OsStr) -> Vec<u8> {
    s.to_string_lossy().into_owned().into_bytes()
}

/// Hashes the file at `path` with the settings in `config`.
///
/// `name` defaults to the last path component and is used byte for byte.
pub fn create_info_from_path<P: AsRef<Path>>(
    path: P,
    name: Option<&OsStr>,
    config: &Config,
) -> Result<TorrentInfo, HashError> {
    let path = path.as_ref();
    config.validate()?;

    let name = match name.or_else(|| path.file_name()) {
        Some(n) => os_str_bytes(n),
        None => return Err(HashError::Config(format!("cannot derive a name from {:?}", path))),
    };

    let piece_size = usize::try_from(config.piece_length)
        .map_err(|_| HashError::InvalidPieceSize(config.piece_length))?;
    let manager = PieceManager::new(piece_size, config.algorithm)?;
    let pieces = manager.process_path(path, config.show_progress)?;

    let length = pieces.source_length();

    info!(
        "{:?}: {} bytes, {} pieces, {}",
        path,
        length,
        pieces.piece_count(),
        config.algorithm
    );

    Ok(TorrentInfo {
        length,
        name,
        piece_length: config.piece_length,
        pieces,
    })
}
