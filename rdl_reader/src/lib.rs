pub mod psx;
pub(crate) mod impls;

use std::io::{self, Read};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReadError {
	/// The stream ended before the level was fully read.
	#[error("level data ended early: {0}")]
	Io(#[from] io::Error),
	/// A structural reference did not resolve to an existing entry.
	#[error("{kind} index {index} out of range ({len} available)")]
	BadIndex {
		kind: &'static str,
		index: i32,
		len: usize,
	},
}

pub type Result<T> = std::result::Result<T, ReadError>;

pub(crate) trait Readable: Sized {
	fn read<R: Read>(reader: &mut R) -> Result<Self>;
}

pub(crate) fn read_vec<R: Read, T: Readable>(reader: &mut R, len: usize) -> Result<Vec<T>> {
	let mut vec = Vec::with_capacity(len);
	for _ in 0..len {
		vec.push(T::read(reader)?);
	}
	Ok(vec)
}

pub(crate) fn skip<R: Read>(reader: &mut R, num: usize) -> Result<()> {
	let mut buf = [0];
	for _ in 0..num {
		reader.read_exact(&mut buf)?;
	}
	Ok(())
}

/// Reads one fixed-size record slot: `read` consumes the active variant's
/// fields, then the unread remainder of the slot is discarded, leaving the
/// cursor exactly `size` bytes past the slot start for every variant.
pub(crate) fn read_slot<R: Read, T>(
	reader: &mut R, size: u64, read: impl FnOnce(&mut io::Take<&mut R>) -> Result<T>,
) -> Result<T> {
	let mut slot = reader.take(size);
	let val = read(&mut slot)?;
	let rest = slot.limit() as usize;
	skip(&mut slot, rest)?;
	Ok(val)
}

pub(crate) fn check_index(kind: &'static str, index: i32, len: usize) -> Result<usize> {
	if index >= 0 && (index as usize) < len {
		Ok(index as usize)
	} else {
		Err(ReadError::BadIndex { kind, index, len })
	}
}
