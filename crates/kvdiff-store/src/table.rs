use std::fs::{self, File};
use std::io::{self, BufReader, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::TableOptions;
use crate::entry::Entry;
use crate::error::{StoreError, StoreResult};
use crate::format::{read_file_header, read_record, table_path, FILE_HEADER_SIZE};
use crate::traits::{OrderedCursor, OrderedStore};

/// A read-only handle on a table store directory.
///
/// Opening validates the directory and the table file header; records are
/// only read through cursors, one at a time.
#[derive(Clone, Debug)]
pub struct TableStore {
    dir: PathBuf,
    path: PathBuf,
    options: TableOptions,
}

impl TableStore {
    /// Open the store in `dir` for reading.
    pub fn open_read_only(dir: impl AsRef<Path>) -> StoreResult<Self> {
        Self::open_with(dir, TableOptions::default())
    }

    pub fn open_with(dir: impl AsRef<Path>, options: TableOptions) -> StoreResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        match fs::metadata(&dir) {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => return Err(StoreError::NotFound(dir)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(dir));
            }
            Err(e) => return Err(e.into()),
        }
        let path = table_path(&dir);
        if !path.is_file() {
            return Err(StoreError::MissingTable(dir));
        }

        let mut reader = BufReader::new(File::open(&path)?);
        read_file_header(&mut reader)?;

        debug!(path = %path.display(), "table store opened");
        Ok(Self { dir, path, options })
    }

    /// The store directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The table file inside the store directory.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OrderedStore for TableStore {
    type Cursor = TableCursor;

    fn cursor(&self) -> StoreResult<TableCursor> {
        let file = File::open(&self.path)?;
        let mut cursor = TableCursor {
            reader: BufReader::new(file),
            offset: FILE_HEADER_SIZE,
            current: None,
            failed: None,
            max_record_bytes: self.options.max_record_bytes,
        };
        cursor.seek_to_start()?;
        Ok(cursor)
    }
}

/// Streaming cursor over a table file.
///
/// Holds exactly one decoded entry; everything else stays on disk until the
/// cursor reaches it. The file handle closes when the cursor is dropped.
///
/// A read error is sticky: the cursor becomes invalid and every later
/// `advance` fails again until `seek_to_start`.
pub struct TableCursor {
    reader: BufReader<File>,
    /// Offset of the next unread record.
    offset: u64,
    current: Option<Entry>,
    /// Offset and reason of the read that failed.
    failed: Option<(u64, String)>,
    max_record_bytes: u32,
}

impl TableCursor {
    fn load_next(&mut self) -> StoreResult<()> {
        let record_offset = self.offset;
        let result = self.read_next(record_offset);
        if let Err(err) = &result {
            self.current = None;
            self.failed = Some(match err {
                StoreError::Corrupt { offset, reason } => (*offset, reason.clone()),
                other => (record_offset, other.to_string()),
            });
        }
        result
    }

    fn read_next(&mut self, record_offset: u64) -> StoreResult<()> {
        let next = read_record(&mut self.reader, record_offset, self.max_record_bytes)?;

        match next {
            Some((entry, consumed)) => {
                if let Some(prev) = &self.current {
                    if entry.key <= prev.key {
                        return Err(StoreError::OutOfOrder {
                            offset: record_offset,
                            key: entry.key_hex(),
                        });
                    }
                }
                self.offset += consumed;
                self.current = Some(entry);
            }
            None => self.current = None,
        }
        Ok(())
    }
}

impl OrderedCursor for TableCursor {
    fn seek_to_start(&mut self) -> StoreResult<()> {
        self.reader.seek(SeekFrom::Start(FILE_HEADER_SIZE))?;
        self.offset = FILE_HEADER_SIZE;
        self.current = None;
        self.failed = None;
        self.load_next()
    }

    fn valid(&self) -> bool {
        self.current.is_some()
    }

    fn current(&self) -> Option<&Entry> {
        self.current.as_ref()
    }

    fn advance(&mut self) -> StoreResult<()> {
        if let Some((offset, reason)) = &self.failed {
            return Err(StoreError::Corrupt {
                offset: *offset,
                reason: reason.clone(),
            });
        }
        if self.current.is_none() {
            return Ok(());
        }
        self.load_next()
    }
}

impl std::fmt::Debug for TableCursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableCursor")
            .field("offset", &self.offset)
            .field("valid", &self.current.is_some())
            .field("failed", &self.failed.is_some())
            .finish()
    }
}
