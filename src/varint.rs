//! Unsigned LEB128 variable-length integers.
//!
//! Each byte carries 7 bits of the value, least significant group first. The
//! high bit is set on every byte except the last. Values wider than 64 bits
//! decode to a [`BigUint`], assembled from the 7-bit groups directly so the
//! result never depends on the platform word size.

use std::io;

use num_bigint::BigUint;

use crate::error::{DecodeError, DecodeResult};

const PAYLOAD_MASK: u8 = 0x7f;
const CONTINUATION: u8 = 0x80;

/// Longest encoding of a [`u64`].
pub const MAX_U64_LEN: usize = 10;

/// A decoded varint: a machine word when it fits, arbitrary precision otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Varint {
    Word(u64),
    Big(BigUint),
}

/// Write `value` at the start of `buffer`, returning the number of bytes written.
///
/// The caller guarantees room for the encoding ([`MAX_U64_LEN`] always suffices).
#[allow(clippy::cast_possible_truncation)]
pub fn write_u64(mut value: u64, buffer: &mut [u8]) -> usize {
    let mut pos = 0;
    loop {
        let group = (value as u8) & PAYLOAD_MASK;
        value >>= 7;
        if value == 0 {
            buffer[pos] = group;
            return pos + 1;
        }
        buffer[pos] = group | CONTINUATION;
        pos += 1;
    }
}

/// Append the encoding of `value` to `out`.
pub fn write_big(value: &BigUint, out: &mut Vec<u8>) {
    let groups = value.to_radix_le(128);
    let last = groups.len().saturating_sub(1);
    out.reserve(groups.len());
    for (i, group) in groups.into_iter().enumerate() {
        out.push(if i == last { group } else { group | CONTINUATION });
    }
}

/// A source of single bytes for the decoder.
pub trait ByteSource {
    /// Return the next byte, or `None` once the source is exhausted.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::Io`] if the underlying reader fails.
    fn next_byte(&mut self) -> DecodeResult<Option<u8>>;
}

pub struct SliceSource<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> SliceSource<'a> {
    #[must_use]
    pub const fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }
}

impl ByteSource for SliceSource<'_> {
    fn next_byte(&mut self) -> DecodeResult<Option<u8>> {
        let byte = self.bytes.get(self.pos).copied();
        if byte.is_some() {
            self.pos += 1;
        }
        Ok(byte)
    }
}

/// Reads one byte per call so nothing past the encoded value is consumed.
pub struct ReadSource<R> {
    reader: R,
}

impl<R: io::Read> ReadSource<R> {
    pub const fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: io::Read> ByteSource for ReadSource<R> {
    fn next_byte(&mut self) -> DecodeResult<Option<u8>> {
        let mut byte = [0u8; 1];
        loop {
            match self.reader.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(byte[0])),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }
    }
}

/// Read one varint, returning it with the number of bytes consumed.
///
/// # Errors
///
/// Returns [`DecodeError::Incomplete`] if the source runs out before a byte
/// without the continuation bit is seen.
pub fn read(source: &mut impl ByteSource) -> DecodeResult<(Varint, usize)> {
    let mut word = 0u64;
    let mut overflow: Option<Vec<u8>> = None;
    let mut count = 0usize;

    loop {
        let byte = source.next_byte()?.ok_or(DecodeError::Incomplete)?;
        let group = byte & PAYLOAD_MASK;
        let shift = count.saturating_mul(7);

        if let Some(groups) = overflow.as_mut() {
            groups.push(group);
        } else if group_fits(group, shift) {
            if group != 0 {
                word |= u64::from(group) << shift;
            }
        } else {
            let mut groups = split_groups(word, count);
            groups.push(group);
            overflow = Some(groups);
        }

        count += 1;
        if byte & CONTINUATION == 0 {
            break;
        }
    }

    let value = match overflow {
        None => Varint::Word(word),
        Some(groups) => Varint::Big(
            BigUint::from_radix_le(&groups, 128).expect("7-bit groups are valid base-128 digits"),
        ),
    };
    Ok((value, count))
}

/// Read one varint that must not exceed `max`.
///
/// Returns `Ok(None)` as soon as a group pushes the value past `max`. The rest
/// of that varint is left unread and nothing is buffered, so an unbounded run
/// of continuation bytes cannot grow memory.
///
/// # Errors
///
/// Returns [`DecodeError::Incomplete`] if the source runs out first.
pub fn read_at_most(source: &mut impl ByteSource, max: u64) -> DecodeResult<Option<(u64, usize)>> {
    let mut word = 0u64;
    let mut count = 0usize;

    loop {
        let byte = source.next_byte()?.ok_or(DecodeError::Incomplete)?;
        let group = byte & PAYLOAD_MASK;
        if group != 0 {
            let shift = count.saturating_mul(7);
            if !group_fits(group, shift) {
                return Ok(None);
            }
            word |= u64::from(group) << shift;
            if word > max {
                return Ok(None);
            }
        }

        count += 1;
        if byte & CONTINUATION == 0 {
            return Ok(Some((word, count)));
        }
    }
}

#[inline]
fn group_fits(group: u8, shift: usize) -> bool {
    group == 0 || (shift < 64 && u64::from(group) <= u64::MAX >> shift)
}

/// Re-split an accumulated word into `count` base-128 digits.
#[allow(clippy::cast_possible_truncation)]
fn split_groups(word: u64, count: usize) -> Vec<u8> {
    (0..count)
        .map(|i| {
            let shift = u32::try_from(i * 7).unwrap_or(u32::MAX);
            (word.checked_shr(shift).unwrap_or(0) as u8) & PAYLOAD_MASK
        })
        .collect()
}
