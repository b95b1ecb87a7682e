// src/file_io.rs
use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;

use log::debug;

use crate::error::HashError;

/// Reads a byte source sequentially in chunks of `piece_size` bytes.
///
/// Every chunk is exactly `piece_size` long except possibly the last one,
/// which holds whatever remains. An empty source yields no chunks at all.
pub struct ChunkSource<R> {
	reader: R,
	piece_size: usize,
	file_size: Option<u64>,
	offset: u64,
	done: bool,
}

impl ChunkSource<BufReader<File>> {
	/// Opens the file at `path`. Fails before any chunk is read if the file
	/// cannot be opened.
	pub fn open<P: AsRef<Path>>(path: P, piece_size: usize) -> Result<Self, HashError> {
		let path = path.as_ref();
		let unavailable = |source| HashError::IoUnavailable {
			path: path.to_path_buf(),
			source,
		};

		let file = File::open(path).map_err(unavailable)?;
		let metadata = file.metadata().map_err(unavailable)?;
		if metadata.is_dir() {
			return Err(unavailable(std::io::Error::new(
				ErrorKind::InvalidInput,
				"path is a directory",
			)));
		}

		debug!("Opened {:?} ({} bytes)", path, metadata.len());
		let mut source = Self::new(BufReader::new(file), piece_size)?;
		source.file_size = Some(metadata.len());
		Ok(source)
	}
}

impl<R: Read> ChunkSource<R> {
	pub fn new(reader: R, piece_size: usize) -> Result<Self, HashError> {
		if piece_size == 0 {
			return Err(HashError::InvalidPieceSize(0));
		}
		Ok(Self {
			reader,
			piece_size,
			file_size: None,
			offset: 0,
			done: false,
		})
	}

	pub fn piece_size(&self) -> usize {
		self.piece_size
	}

	/// Total size of the source, when it is known up front.
	pub fn file_size(&self) -> Option<u64> {
		self.file_size
	}

	/// Bytes handed out so far.
	pub fn bytes_read(&self) -> u64 {
		self.offset
	}

	/// Reads the next chunk, or `None` once the source is exhausted.
	pub fn next_chunk(&mut self) -> Result<Option<Vec<u8>>, HashError> {
		if self.done {
			return Ok(None);
		}

		let mut buffer = vec![0u8; self.piece_size];
		let mut filled = 0;

		// short reads are legal, keep going until the piece is full or EOF
		while filled < self.piece_size {
			match self.reader.read(&mut buffer[filled..]) {
				Ok(0) => break,
				Ok(n) => filled += n,
				Err(e) if e.kind() == ErrorKind::Interrupted => continue,
				Err(source) => {
					self.done = true;
					return Err(HashError::IoRead {
						offset: self.offset + filled as u64,
						source,
					});
				}
			}
		}

		if filled < self.piece_size {
			self.done = true;
		}
		if filled == 0 {
			return Ok(None);
		}

		buffer.truncate(filled);
		self.offset += filled as u64;
		Ok(Some(buffer))
	}
}

impl<R: Read> Iterator for ChunkSource<R> {
	type Item = Result<Vec<u8>, HashError>;

	fn next(&mut self) -> Option<Self::Item> {
		self.next_chunk().transpose()
	}
}
