// infohash.rs
use std::fmt;

use crate::bencode::{encode_bvalue, BValue};
use crate::error::HashError;
use crate::hasher::PieceHasher;

/// Digest of the encoded info dict.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InfoHash(Vec<u8>);

impl InfoHash {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

impl fmt::Display for InfoHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl AsRef<[u8]> for InfoHash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Encodes `metainfo` and hashes the resulting bytes.
pub fn compute_info_hash<H: PieceHasher>(metainfo: &BValue, hasher: &H) -> Result<InfoHash, HashError> {
    let encoded = encode_bvalue(metainfo);
    info_hash_of_encoded(&encoded, hasher)
}

/// Hashes an already encoded info dict.
pub fn info_hash_of_encoded<H: PieceHasher>(encoded: &[u8], hasher: &H) -> Result<InfoHash, HashError> {
    Ok(InfoHash(hasher.hash(encoded)?))
}
