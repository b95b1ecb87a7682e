// piece_manager.rs
use std::io::Read;

use log::{debug, info};

use crate::error::HashError;
use crate::file_io::ChunkSource;
use crate::hasher::PieceHasher;
use crate::progress::ProgressTracker;

/// Concatenated piece digests, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PiecesBlob {
    bytes: Vec<u8>,
    piece_count: usize,
    digest_size: usize,
    source_length: u64,
}

impl PiecesBlob {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn piece_count(&self) -> usize {
        self.piece_count
    }

    pub fn digest_size(&self) -> usize {
        self.digest_size
    }

    /// Number of source bytes that were hashed.
    pub fn source_length(&self) -> u64 {
        self.source_length
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Digest of piece `index`.
    pub fn piece(&self, index: usize) -> Option<&[u8]> {
        if index >= self.piece_count {
            return None;
        }
        let start = index * self.digest_size;
        Some(&self.bytes[start..start + self.digest_size])
    }

    pub fn iter(&self) -> impl Iterator<Item = &[u8]> {
        self.bytes.chunks_exact(self.digest_size.max(1))
    }
}

/// `ceil(file_size / piece_size)`, zero for an empty source.
pub fn expected_piece_count(file_size: u64, piece_size: u64) -> u64 {
    if piece_size == 0 {
        return 0;
    }
    file_size.div_ceil(piece_size)
}

/// Piece count as a `usize`, saturating where it does not fit.
fn piece_total(file_size: u64, piece_size: usize) -> usize {
    usize::try_from(expected_piece_count(file_size, piece_size as u64)).unwrap_or(usize::MAX)
}

/// Hashes every chunk of a source and collects the digests in order.
pub struct PieceManager<H> {
    piece_size: usize,
    hasher: H,
}

impl<H: PieceHasher> PieceManager<H> {
    pub fn new(piece_size: usize, hasher: H) -> Result<Self, HashError> {
        if piece_size == 0 {
            return Err(HashError::InvalidPieceSize(0));
        }
        Ok(Self { piece_size, hasher })
    }

    pub fn piece_size(&self) -> usize {
        self.piece_size
    }

    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// Opens `path` and hashes it.
    pub fn process_path<P: AsRef<std::path::Path>>(
        &self,
        path: P,
        show_progress: bool,
    ) -> Result<PiecesBlob, HashError> {
        let mut source = ChunkSource::open(path, self.piece_size)?;
        let total = source
            .file_size()
            .map(|size| piece_total(size, self.piece_size))
            .unwrap_or(0);
        let mut progress = ProgressTracker::new(total, show_progress);
        let blob = self.process_with_progress(&mut source, Some(&mut progress))?;
        progress.finish();
        Ok(blob)
    }

    /// Drives `source` to exhaustion. Any read or hash failure aborts the
    /// whole run; a partially filled blob is never returned.
    pub fn process<R: Read>(&self, source: &mut ChunkSource<R>) -> Result<PiecesBlob, HashError> {
        self.process_with_progress(source, None)
    }

    pub fn process_with_progress<R: Read>(
        &self,
        source: &mut ChunkSource<R>,
        mut progress: Option<&mut ProgressTracker>,
    ) -> Result<PiecesBlob, HashError> {
        if source.piece_size() != self.piece_size {
            return Err(HashError::PieceSizeMismatch {
                expected: self.piece_size,
                actual: source.piece_size(),
            });
        }

        let digest_size = self.hasher.digest_size();
        let capacity = source
            .file_size()
            .and_then(|size| piece_total(size, self.piece_size).checked_mul(digest_size))
            .unwrap_or(0);
        let mut bytes = Vec::with_capacity(capacity);
        let mut piece_count = 0usize;

        while let Some(chunk) = source.next_chunk()? {
            let digest = self.hasher.hash(&chunk)?;
            if digest.len() != digest_size {
                return Err(HashError::HasherInit(format!(
                    "digest for piece {} is {} bytes, expected {}",
                    piece_count,
                    digest.len(),
                    digest_size
                )));
            }
            debug!("Piece {} ({} bytes) hashed", piece_count, chunk.len());

            bytes.extend_from_slice(&digest);
            piece_count += 1;
            if let Some(progress) = progress.as_deref_mut() {
                progress.increment();
            }
        }

        info!(
            "Hashed {} bytes into {} pieces of up to {} bytes",
            source.bytes_read(),
            piece_count,
            self.piece_size
        );

        Ok(PiecesBlob {
            bytes,
            piece_count,
            digest_size,
            source_length: source.bytes_read(),
        })
    }
}

/// Reads `reader` in `piece_size` chunks, returning the pieces blob and the
/// number of pieces.
pub fn process<R: Read, H: PieceHasher>(
    reader: R,
    piece_size: usize,
    hasher: H,
) -> Result<(Vec<u8>, usize), HashError> {
    let mut source = ChunkSource::new(reader, piece_size)?;
    let blob = PieceManager::new(piece_size, hasher)?.process(&mut source)?;
    let count = blob.piece_count();
    Ok((blob.into_bytes(), count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hasher::{HashAlgorithm, SHA1_LEN, SHA256_LEN};
    use std::cell::Cell;
    use std::io::{self, Cursor};

    /// Fails on the nth call.
    struct FailingHasher {
        calls: Cell<usize>,
        fail_on: usize,
    }

    impl PieceHasher for FailingHasher {
        fn digest_size(&self) -> usize {
            4
        }

        fn hash(&self, data: &[u8]) -> Result<Vec<u8>, HashError> {
            let call = self.calls.get();
            self.calls.set(call + 1);
            if call == self.fail_on {
                return Err(HashError::HasherInit("context allocation failed".into()));
            }
            Ok((data.len() as u32).to_be_bytes().to_vec())
        }
    }

    /// Claims 20 bytes but produces 3.
    struct LyingHasher;

    impl PieceHasher for LyingHasher {
        fn digest_size(&self) -> usize {
            20
        }

        fn hash(&self, _data: &[u8]) -> Result<Vec<u8>, HashError> {
            Ok(vec![1, 2, 3])
        }
    }

    #[test]
    fn test_expected_piece_count() {
        assert_eq!(expected_piece_count(0, 1024), 0);
        assert_eq!(expected_piece_count(1, 1024), 1);
        assert_eq!(expected_piece_count(1024, 1024), 1);
        assert_eq!(expected_piece_count(1025, 1024), 2);
        assert_eq!(expected_piece_count(2500, 1024), 3);
    }

    #[test]
    fn test_piece_total_saturates() {
        assert_eq!(piece_total(2500, 1024), 3);
        assert_eq!(piece_total(0, 1024), 0);
        assert_eq!(piece_total(u64::MAX, 1), usize::try_from(u64::MAX).unwrap_or(usize::MAX));
    }

    #[test]
    fn test_piece_count_and_blob_length() {
        for (size, piece) in [(0usize, 16usize), (1, 16), (16, 16), (17, 16), (2500, 1024), (4096, 1)] {
            let data = vec![0xabu8; size];
            let (blob, count) = process(Cursor::new(data), piece, HashAlgorithm::Sha1).unwrap();
            assert_eq!(count as u64, expected_piece_count(size as u64, piece as u64));
            assert_eq!(blob.len(), count * SHA1_LEN);
        }
    }

    #[test]
    fn test_blob_is_ordered_concatenation() {
        let data: Vec<u8> = (0..2500u32).map(|i| (i % 251) as u8).collect();
        let (blob, count) = process(Cursor::new(data.clone()), 1024, HashAlgorithm::Sha1).unwrap();
        assert_eq!(count, 3);

        let mut expected = Vec::new();
        for chunk in data.chunks(1024) {
            expected.extend(HashAlgorithm::Sha1.hash(chunk).unwrap());
        }
        assert_eq!(blob, expected);
    }

    #[test]
    fn test_sha256_blob() {
        let (blob, count) = process(Cursor::new(vec![1u8; 100]), 30, HashAlgorithm::Sha256).unwrap();
        assert_eq!(count, 4);
        assert_eq!(blob.len(), 4 * SHA256_LEN);
    }

    #[test]
    fn test_pieces_blob_accessors() {
        let manager = PieceManager::new(1024, HashAlgorithm::Sha1).unwrap();
        let mut source = ChunkSource::new(Cursor::new(vec![5u8; 2500]), 1024).unwrap();
        let blob = manager.process(&mut source).unwrap();

        assert_eq!(blob.piece_count(), 3);
        assert_eq!(blob.digest_size(), SHA1_LEN);
        assert_eq!(blob.source_length(), 2500);
        assert_eq!(blob.len(), 60);
        assert_eq!(blob.iter().count(), 3);
        assert_eq!(blob.piece(0), blob.piece(1));
        assert_ne!(blob.piece(1), blob.piece(2));
        assert_eq!(
            blob.piece(2).unwrap(),
            HashAlgorithm::Sha1.hash(&[5u8; 452]).unwrap().as_slice()
        );
        assert!(blob.piece(3).is_none());
    }

    #[test]
    fn test_hasher_failure_aborts() {
        let hasher = FailingHasher { calls: Cell::new(0), fail_on: 1 };
        let result = process(Cursor::new(vec![0u8; 100]), 10, &hasher);
        assert!(matches!(result, Err(HashError::HasherInit(_))));
        assert_eq!(hasher.calls.get(), 2);
    }

    #[test]
    fn test_wrong_digest_length_is_fatal() {
        let result = process(Cursor::new(vec![0u8; 10]), 4, LyingHasher);
        assert!(matches!(result, Err(HashError::HasherInit(_))));
    }

    #[test]
    fn test_read_failure_aborts() {
        struct FailAfterFirst(bool);
        impl Read for FailAfterFirst {
            fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
                if self.0 {
                    return Err(io::Error::new(io::ErrorKind::Other, "boom"));
                }
                self.0 = true;
                buf.fill(0);
                Ok(buf.len())
            }
        }

        let result = process(FailAfterFirst(false), 8, HashAlgorithm::Sha1);
        assert!(matches!(result, Err(HashError::IoRead { .. })));
    }

    #[test]
    fn test_zero_piece_size() {
        assert!(PieceManager::new(0, HashAlgorithm::Sha1).is_err());
        assert!(process(Cursor::new(vec![1u8]), 0, HashAlgorithm::Sha1).is_err());
    }

    #[test]
    fn test_mismatched_source_piece_size() {
        let manager = PieceManager::new(64, HashAlgorithm::Sha1).unwrap();
        let mut source = ChunkSource::new(Cursor::new(vec![0u8; 10]), 32).unwrap();
        match manager.process(&mut source) {
            Err(e @ HashError::PieceSizeMismatch { expected: 64, actual: 32 }) => {
                let message = e.to_string();
                assert!(message.contains("64") && message.contains("32"), "{}", message);
            }
            other => panic!("expected PieceSizeMismatch, got {:?}", other.map(|b| b.piece_count())),
        }
    }

    #[test]
    fn test_process_with_progress() {
        let manager = PieceManager::new(10, HashAlgorithm::Sha1).unwrap();
        let mut source = ChunkSource::new(Cursor::new(vec![0u8; 35]), 10).unwrap();
        let mut progress = ProgressTracker::hidden(4);
        manager.process_with_progress(&mut source, Some(&mut progress)).unwrap();
        assert!(progress.is_complete());
        assert_eq!(progress.get_progress(), (4, 4));
    }
}
