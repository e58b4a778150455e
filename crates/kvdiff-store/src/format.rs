//! Table file format: header and record framing.
//!
//! ```text
//! [4 bytes: magic "KVDT"]
//! [4 bytes: format version (big-endian u32)]
//! repeated, in strictly ascending key order:
//!   [4 bytes: payload length (little-endian u32)]
//!   [4 bytes: CRC32 of payload (little-endian u32)]
//!   [N bytes: payload (bincode-serialized Entry)]
//! ```

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use crate::entry::Entry;
use crate::error::{StoreError, StoreResult};

/// Name of the table file inside a store directory.
pub const TABLE_FILE_NAME: &str = "table.kvt";

/// Magic bytes at the start of every table file.
pub const TABLE_MAGIC: &[u8; 4] = b"KVDT";

/// Current table format version.
pub const TABLE_VERSION: u32 = 1;

/// File header size: 4 bytes magic + 4 bytes version.
pub const FILE_HEADER_SIZE: u64 = 8;

/// Record header size: 4 bytes length + 4 bytes CRC.
pub const RECORD_HEADER_SIZE: u64 = 8;

/// Path of the table file for a store directory.
pub fn table_path(dir: &Path) -> PathBuf {
    dir.join(TABLE_FILE_NAME)
}

pub fn write_file_header<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(TABLE_MAGIC)?;
    w.write_all(&TABLE_VERSION.to_be_bytes())?;
    Ok(())
}

/// Read and validate the file header.
pub fn read_file_header<R: Read>(r: &mut R) -> StoreResult<()> {
    let mut buf = [0u8; FILE_HEADER_SIZE as usize];
    match r.read_exact(&mut buf) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
            return Err(StoreError::Corrupt {
                offset: 0,
                reason: "table file shorter than header".into(),
            });
        }
        Err(e) => return Err(e.into()),
    }

    if &buf[0..4] != TABLE_MAGIC {
        return Err(StoreError::InvalidMagic {
            expected: String::from_utf8_lossy(TABLE_MAGIC).into(),
            actual: String::from_utf8_lossy(&buf[0..4]).into(),
        });
    }
    let version = u32::from_be_bytes([buf[4], buf[5], buf[6], buf[7]]);
    if version != TABLE_VERSION {
        return Err(StoreError::UnsupportedVersion(version));
    }
    Ok(())
}

/// Frame an entry as a record. Returns the full record bytes.
pub fn encode_record(entry: &Entry, max_record_bytes: u32) -> StoreResult<Vec<u8>> {
    let payload =
        bincode::serialize(entry).map_err(|e| StoreError::Serialization(e.to_string()))?;
    if payload.len() as u64 > max_record_bytes as u64 {
        return Err(StoreError::RecordTooLarge {
            len: payload.len() as u64,
            max: max_record_bytes,
        });
    }

    let mut record = Vec::with_capacity(RECORD_HEADER_SIZE as usize + payload.len());
    record.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    record.extend_from_slice(&crc32fast::hash(&payload).to_le_bytes());
    record.extend_from_slice(&payload);
    Ok(record)
}

/// Read the record starting at `offset`.
///
/// Returns `Ok(None)` on a clean end of file (no bytes left). Anything else
/// short of a complete, checksummed, decodable record is `Corrupt`.
/// On success returns the entry and the number of bytes consumed.
pub fn read_record<R: Read>(
    r: &mut R,
    offset: u64,
    max_record_bytes: u32,
) -> StoreResult<Option<(Entry, u64)>> {
    let mut header = [0u8; RECORD_HEADER_SIZE as usize];
    let filled = read_up_to(r, &mut header)?;
    if filled == 0 {
        return Ok(None);
    }
    if filled < header.len() {
        return Err(StoreError::Corrupt {
            offset,
            reason: format!("truncated record header ({filled} of {} bytes)", header.len()),
        });
    }

    let length = u32::from_le_bytes([header[0], header[1], header[2], header[3]]);
    let expected_crc = u32::from_le_bytes([header[4], header[5], header[6], header[7]]);

    if length == 0 {
        return Err(StoreError::Corrupt {
            offset,
            reason: "zero-length record".into(),
        });
    }
    if length > max_record_bytes {
        return Err(StoreError::Corrupt {
            offset,
            reason: format!("record length {length} exceeds limit {max_record_bytes}"),
        });
    }

    let mut payload = vec![0u8; length as usize];
    match r.read_exact(&mut payload) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
            return Err(StoreError::Corrupt {
                offset,
                reason: "truncated record payload".into(),
            });
        }
        Err(e) => return Err(e.into()),
    }

    let actual_crc = crc32fast::hash(&payload);
    if actual_crc != expected_crc {
        return Err(StoreError::Corrupt {
            offset,
            reason: format!("CRC mismatch: expected {expected_crc:08x}, computed {actual_crc:08x}"),
        });
    }

    let entry: Entry = bincode::deserialize(&payload).map_err(|e| StoreError::Corrupt {
        offset,
        reason: format!("undecodable record: {e}"),
    })?;

    Ok(Some((entry, RECORD_HEADER_SIZE + length as u64)))
}

/// Fill `buf` as far as the reader allows. Returns the number of bytes read.
fn read_up_to<R: Read>(r: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match r.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const MAX: u32 = 1024;

    #[test]
    fn header_roundtrip() {
        let mut buf = Vec::new();
        write_file_header(&mut buf).unwrap();
        assert_eq!(buf.len() as u64, FILE_HEADER_SIZE);
        read_file_header(&mut Cursor::new(buf)).unwrap();
    }

    #[test]
    fn header_bad_magic() {
        let mut buf = b"NOPE".to_vec();
        buf.extend_from_slice(&TABLE_VERSION.to_be_bytes());
        let err = read_file_header(&mut Cursor::new(buf)).unwrap_err();
        assert!(matches!(err, StoreError::InvalidMagic { .. }));
    }

    #[test]
    fn header_bad_version() {
        let mut buf = TABLE_MAGIC.to_vec();
        buf.extend_from_slice(&7u32.to_be_bytes());
        let err = read_file_header(&mut Cursor::new(buf)).unwrap_err();
        assert!(matches!(err, StoreError::UnsupportedVersion(7)));
    }

    #[test]
    fn header_too_short() {
        let err = read_file_header(&mut Cursor::new(b"KV".to_vec())).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { offset: 0, .. }));
    }

    #[test]
    fn record_decodes_and_reports_size() {
        let entry = Entry::new("key", "value", 3);
        let record = encode_record(&entry, MAX).unwrap();
        let (decoded, consumed) = read_record(&mut Cursor::new(&record), 8, MAX)
            .unwrap()
            .expect("record present");
        assert_eq!(decoded, entry);
        assert_eq!(consumed, record.len() as u64);
    }

    #[test]
    fn empty_input_is_clean_end() {
        let got = read_record(&mut Cursor::new(Vec::<u8>::new()), 8, MAX).unwrap();
        assert!(got.is_none());
    }

    #[test]
    fn partial_header_is_corrupt() {
        let err = read_record(&mut Cursor::new(vec![1u8, 0, 0]), 8, MAX).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { offset: 8, .. }));
    }

    #[test]
    fn flipped_payload_bit_fails_crc() {
        let mut record = encode_record(&Entry::new("k", "v", 0), MAX).unwrap();
        let last = record.len() - 1;
        record[last] ^= 0xFF;
        let err = read_record(&mut Cursor::new(record), 8, MAX).unwrap_err();
        match err {
            StoreError::Corrupt { reason, .. } => assert!(reason.contains("CRC")),
            other => panic!("expected Corrupt, got {other:?}"),
        }
    }

    #[test]
    fn truncated_payload_is_corrupt() {
        let mut record = encode_record(&Entry::new("k", "value", 0), MAX).unwrap();
        record.truncate(record.len() - 2);
        let err = read_record(&mut Cursor::new(record), 8, MAX).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));
    }

    #[test]
    fn oversized_record_rejected_on_encode() {
        let entry = Entry::new("k", vec![0u8; 64], 0);
        let err = encode_record(&entry, 16).unwrap_err();
        assert!(matches!(err, StoreError::RecordTooLarge { max: 16, .. }));
    }

    #[test]
    fn oversized_length_rejected_on_read() {
        let record = encode_record(&Entry::new("k", vec![0u8; 64], 0), MAX).unwrap();
        let err = read_record(&mut Cursor::new(record), 8, 16).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));
    }
}
