//! Minimal TIFF directory reader for asserting on written DNG files.

use std::collections::HashMap;

#[derive(Debug, Clone, Copy)]
pub struct IfdEntry {
    pub field_type: u16,
    pub count: u32,
    /// Inline value for single SHORT/LONG entries, otherwise the raw value/offset field
    pub value: u32,
}

fn little_endian(bytes: &[u8]) -> bool {
    match &bytes[..2] {
        b"II" => true,
        b"MM" => false,
        other => panic!("not a TIFF header: {:?}", other),
    }
}

fn read_u16(bytes: &[u8], at: usize, le: bool) -> u16 {
    let b = [bytes[at], bytes[at + 1]];
    if le { u16::from_le_bytes(b) } else { u16::from_be_bytes(b) }
}

fn read_u32(bytes: &[u8], at: usize, le: bool) -> u32 {
    let b = [bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]];
    if le { u32::from_le_bytes(b) } else { u32::from_be_bytes(b) }
}

/// Offsets of every IFD in the main chain.
pub fn ifd_offsets(bytes: &[u8]) -> Vec<u32> {
    let le = little_endian(bytes);
    assert_eq!(read_u16(bytes, 2, le), 42, "not a classic TIFF");

    let mut offsets = Vec::new();
    let mut next = read_u32(bytes, 4, le);
    while next != 0 {
        offsets.push(next);
        let count = read_u16(bytes, next as usize, le) as usize;
        next = read_u32(bytes, next as usize + 2 + count * 12, le);
    }
    offsets
}

/// Entries of the IFD at `index` in the main chain, keyed by tag.
pub fn ifd_entries(bytes: &[u8], index: usize) -> HashMap<u16, IfdEntry> {
    let le = little_endian(bytes);
    let offset = ifd_offsets(bytes)[index] as usize;
    let count = read_u16(bytes, offset, le) as usize;

    (0..count)
        .map(|i| {
            let at = offset + 2 + i * 12;
            let tag = read_u16(bytes, at, le);
            let field_type = read_u16(bytes, at + 2, le);
            let entry_count = read_u32(bytes, at + 4, le);
            let value = match (field_type, entry_count) {
                (3, 1) => read_u16(bytes, at + 8, le) as u32,
                _ => read_u32(bytes, at + 8, le),
            };
            (
                tag,
                IfdEntry {
                    field_type,
                    count: entry_count,
                    value,
                },
            )
        })
        .collect()
}
