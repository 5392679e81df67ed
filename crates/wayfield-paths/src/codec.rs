//! Binary persistence for precomputed structures.
//!
//! All integers and floats are little-endian. The layouts are fixed and
//! byte-exact for round-trip compatibility:
//!
//! - **DirectionMap**: `i32 target`, `i32 tile_count`, then one direction
//!   byte per tile.
//! - **DijkstraMap**: `i32 target`, `i32 tile_count`, then
//!   `(u8 direction, f32 distance)` per tile.
//! - **Atlases**: `i32 width`, `i32 height`, then per tile a presence byte
//!   (0 = no entry, 1 = entry follows) and, if present, the entry payload
//!   in the corresponding map layout minus the header (the slot index *is*
//!   the entry's target).
//!
//! Fields are not persisted — their reached lists are transient and cheap
//! to regenerate. Atlas writers/readers work entry by entry and accept a
//! cancellation token plus progress reporter.

use std::io::{Read, Write};

use wayfield_core::{Direction, Size};

use crate::atlas::{DijkstraAtlas, DirectionAtlas};
use crate::dijkstra_map::DijkstraMap;
use crate::direction_map::DirectionMap;
use crate::task::{CancelToken, Progress};

/// Errors while encoding or decoding a persisted structure.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// Underlying stream failure (including truncated input).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A direction byte outside the 0..=9 code range.
    #[error("invalid direction code {code}")]
    BadDirectionCode { code: u8 },

    /// Encoded tile count disagrees with the grid dimensions.
    #[error("tile count {got} does not match the expected {expected}")]
    SizeMismatch { expected: usize, got: usize },

    /// Encoded target index outside the tile array.
    #[error("target index {index} out of range for {len} tiles")]
    BadTargetIndex { index: i32, len: usize },

    /// A negative count or dimension in a header.
    #[error("invalid header field {got}")]
    BadHeader { got: i32 },

    /// An atlas presence byte other than 0 or 1.
    #[error("invalid presence byte {byte}")]
    BadPresenceByte { byte: u8 },
}

// ── Primitive readers ───────────────────────────────────────────

fn read_u8(r: &mut impl Read) -> Result<u8, CodecError> {
    let mut buf = [0u8; 1];
    r.read_exact(&mut buf)?;
    Ok(buf[0])
}

fn read_i32_le(r: &mut impl Read) -> Result<i32, CodecError> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(i32::from_le_bytes(buf))
}

fn read_f32_le(r: &mut impl Read) -> Result<f32, CodecError> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(f32::from_le_bytes(buf))
}

fn read_direction(r: &mut impl Read) -> Result<Direction, CodecError> {
    let code = read_u8(r)?;
    Direction::from_code(code).ok_or(CodecError::BadDirectionCode { code })
}

fn check_header(size: Size, target: i32, count: i32) -> Result<usize, CodecError> {
    if count < 0 {
        return Err(CodecError::BadHeader { got: count });
    }
    let got = count as usize;
    let expected = size.len();
    if got != expected {
        return Err(CodecError::SizeMismatch { expected, got });
    }
    if target < 0 || target as usize >= got {
        return Err(CodecError::BadTargetIndex {
            index: target,
            len: got,
        });
    }
    Ok(target as usize)
}

// ── DirectionMap ────────────────────────────────────────────────

impl DirectionMap {
    /// Encode into the fixed binary layout.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(8 + self.dirs.len());
        buf.extend_from_slice(&(self.target as i32).to_le_bytes());
        buf.extend_from_slice(&(self.dirs.len() as i32).to_le_bytes());
        buf.extend(self.dirs.iter().map(|d| d.to_code()));
        buf
    }

    /// Write the encoded form to a stream.
    pub fn write_to<W: Write>(&self, w: &mut W) -> Result<(), CodecError> {
        w.write_all(&self.to_bytes())?;
        Ok(())
    }

    /// Decode a map generated for a grid of the given dimensions.
    pub fn read_from<R: Read>(r: &mut R, size: Size) -> Result<Self, CodecError> {
        let target = read_i32_le(r)?;
        let count = read_i32_le(r)?;
        let target = check_header(size, target, count)?;
        let mut dirs = Vec::with_capacity(count as usize);
        for _ in 0..count {
            dirs.push(read_direction(r)?);
        }
        Ok(Self { size, target, dirs })
    }

    /// Decode from a byte slice; inverse of [`to_bytes`](Self::to_bytes).
    pub fn from_bytes(bytes: &[u8], size: Size) -> Result<Self, CodecError> {
        Self::read_from(&mut &bytes[..], size)
    }
}

// ── DijkstraMap ─────────────────────────────────────────────────

impl DijkstraMap {
    /// Encode into the fixed binary layout.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(8 + self.dirs.len() * 5);
        buf.extend_from_slice(&(self.target as i32).to_le_bytes());
        buf.extend_from_slice(&(self.dirs.len() as i32).to_le_bytes());
        for (dir, dist) in self.dirs.iter().zip(&self.dists) {
            buf.push(dir.to_code());
            buf.extend_from_slice(&dist.to_le_bytes());
        }
        buf
    }

    /// Write the encoded form to a stream.
    pub fn write_to<W: Write>(&self, w: &mut W) -> Result<(), CodecError> {
        w.write_all(&self.to_bytes())?;
        Ok(())
    }

    /// Decode a map generated for a grid of the given dimensions.
    pub fn read_from<R: Read>(r: &mut R, size: Size) -> Result<Self, CodecError> {
        let target = read_i32_le(r)?;
        let count = read_i32_le(r)?;
        let target = check_header(size, target, count)?;
        let mut dirs = Vec::with_capacity(count as usize);
        let mut dists = Vec::with_capacity(count as usize);
        for _ in 0..count {
            dirs.push(read_direction(r)?);
            dists.push(read_f32_le(r)?);
        }
        Ok(Self {
            size,
            target,
            dirs,
            dists,
        })
    }

    /// Decode from a byte slice; inverse of [`to_bytes`](Self::to_bytes).
    pub fn from_bytes(bytes: &[u8], size: Size) -> Result<Self, CodecError> {
        Self::read_from(&mut &bytes[..], size)
    }
}

// ── Atlas helpers ───────────────────────────────────────────────

fn read_atlas_size(r: &mut impl Read) -> Result<Size, CodecError> {
    let width = read_i32_le(r)?;
    let height = read_i32_le(r)?;
    if width < 0 {
        return Err(CodecError::BadHeader { got: width });
    }
    if height < 0 {
        return Err(CodecError::BadHeader { got: height });
    }
    Ok(Size::new(width, height))
}

fn read_presence(r: &mut impl Read) -> Result<bool, CodecError> {
    match read_u8(r)? {
        0 => Ok(false),
        1 => Ok(true),
        byte => Err(CodecError::BadPresenceByte { byte }),
    }
}

// ── DirectionAtlas ──────────────────────────────────────────────

impl DirectionAtlas {
    /// Write the encoded form to a stream, one entry at a time.
    ///
    /// Returns `false` (with a partially written stream) if the token was
    /// cancelled; callers own stream cleanup in that case.
    pub fn write_to_with<W: Write>(
        &self,
        w: &mut W,
        cancel: &CancelToken,
        progress: &Progress,
    ) -> Result<bool, CodecError> {
        w.write_all(&self.size.width.to_le_bytes())?;
        w.write_all(&self.size.height.to_le_bytes())?;
        let len = self.maps.len();
        for (done, entry) in self.maps.iter().enumerate() {
            if cancel.is_cancelled() {
                return Ok(false);
            }
            progress.report(done as f32 / len.max(1) as f32);
            match entry {
                None => w.write_all(&[0u8])?,
                Some(map) => {
                    w.write_all(&[1u8])?;
                    let codes: Vec<u8> = map.dirs.iter().map(|d| d.to_code()).collect();
                    w.write_all(&codes)?;
                }
            }
        }
        progress.report(1.0);
        Ok(true)
    }

    /// Write the encoded form to a stream.
    pub fn write_to<W: Write>(&self, w: &mut W) -> Result<(), CodecError> {
        self.write_to_with(w, &CancelToken::new(), &Progress::sink())?;
        Ok(())
    }

    /// Encode into the fixed binary layout.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        match self.write_to(&mut buf) {
            Ok(()) => buf,
            // Writing into a Vec cannot fail.
            Err(_) => unreachable!("in-memory write failed"),
        }
    }

    /// Decode an atlas, one entry at a time; `Ok(None)` means cancelled.
    pub fn read_from_with<R: Read>(
        r: &mut R,
        cancel: &CancelToken,
        progress: &Progress,
    ) -> Result<Option<Self>, CodecError> {
        let size = read_atlas_size(r)?;
        let len = size.len();
        let mut maps: Vec<Option<DirectionMap>> = Vec::with_capacity(len);
        for slot in 0..len {
            if cancel.is_cancelled() {
                return Ok(None);
            }
            progress.report(slot as f32 / len.max(1) as f32);
            if !read_presence(r)? {
                maps.push(None);
                continue;
            }
            let mut dirs = Vec::with_capacity(len);
            for _ in 0..len {
                dirs.push(read_direction(r)?);
            }
            maps.push(Some(DirectionMap {
                size,
                target: slot,
                dirs,
            }));
        }
        progress.report(1.0);
        Ok(Some(Self { size, maps }))
    }

    /// Decode an atlas from a stream.
    pub fn read_from<R: Read>(r: &mut R) -> Result<Self, CodecError> {
        match Self::read_from_with(r, &CancelToken::new(), &Progress::sink())? {
            Some(atlas) => Ok(atlas),
            None => unreachable!("decode cancelled without a cancel request"),
        }
    }

    /// Decode from a byte slice; inverse of [`to_bytes`](Self::to_bytes).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        Self::read_from(&mut &bytes[..])
    }
}

// ── DijkstraAtlas ───────────────────────────────────────────────

impl DijkstraAtlas {
    /// Write the encoded form to a stream, one entry at a time.
    ///
    /// Returns `false` (with a partially written stream) if the token was
    /// cancelled.
    pub fn write_to_with<W: Write>(
        &self,
        w: &mut W,
        cancel: &CancelToken,
        progress: &Progress,
    ) -> Result<bool, CodecError> {
        w.write_all(&self.size.width.to_le_bytes())?;
        w.write_all(&self.size.height.to_le_bytes())?;
        let len = self.maps.len();
        for (done, entry) in self.maps.iter().enumerate() {
            if cancel.is_cancelled() {
                return Ok(false);
            }
            progress.report(done as f32 / len.max(1) as f32);
            match entry {
                None => w.write_all(&[0u8])?,
                Some(map) => {
                    w.write_all(&[1u8])?;
                    let mut payload = Vec::with_capacity(map.dirs.len() * 5);
                    for (dir, dist) in map.dirs.iter().zip(&map.dists) {
                        payload.push(dir.to_code());
                        payload.extend_from_slice(&dist.to_le_bytes());
                    }
                    w.write_all(&payload)?;
                }
            }
        }
        progress.report(1.0);
        Ok(true)
    }

    /// Write the encoded form to a stream.
    pub fn write_to<W: Write>(&self, w: &mut W) -> Result<(), CodecError> {
        self.write_to_with(w, &CancelToken::new(), &Progress::sink())?;
        Ok(())
    }

    /// Encode into the fixed binary layout.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        match self.write_to(&mut buf) {
            Ok(()) => buf,
            Err(_) => unreachable!("in-memory write failed"),
        }
    }

    /// Decode an atlas, one entry at a time; `Ok(None)` means cancelled.
    pub fn read_from_with<R: Read>(
        r: &mut R,
        cancel: &CancelToken,
        progress: &Progress,
    ) -> Result<Option<Self>, CodecError> {
        let size = read_atlas_size(r)?;
        let len = size.len();
        let mut maps: Vec<Option<DijkstraMap>> = Vec::with_capacity(len);
        for slot in 0..len {
            if cancel.is_cancelled() {
                return Ok(None);
            }
            progress.report(slot as f32 / len.max(1) as f32);
            if !read_presence(r)? {
                maps.push(None);
                continue;
            }
            let mut dirs = Vec::with_capacity(len);
            let mut dists = Vec::with_capacity(len);
            for _ in 0..len {
                dirs.push(read_direction(r)?);
                dists.push(read_f32_le(r)?);
            }
            maps.push(Some(DijkstraMap {
                size,
                target: slot,
                dirs,
                dists,
            }));
        }
        progress.report(1.0);
        Ok(Some(Self { size, maps }))
    }

    /// Decode an atlas from a stream.
    pub fn read_from<R: Read>(r: &mut R) -> Result<Self, CodecError> {
        match Self::read_from_with(r, &CancelToken::new(), &Progress::sink())? {
            Some(atlas) => Ok(atlas),
            None => unreachable!("decode cancelled without a cancel request"),
        }
    }

    /// Decode from a byte slice; inverse of [`to_bytes`](Self::to_bytes).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        Self::read_from(&mut &bytes[..])
    }
}
