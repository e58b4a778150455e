use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::TableOptions;
use crate::entry::Entry;
use crate::error::{StoreError, StoreResult};
use crate::format::{encode_record, table_path, write_file_header, FILE_HEADER_SIZE};

/// Builds a table store directory from entries supplied in ascending key order.
///
/// Records go to `table.kvt.tmp` first; [`finish`](TableWriter::finish)
/// flushes, optionally fsyncs, and atomically renames the file into place.
/// A writer dropped before `finish` leaves only the temp file behind, which
/// readers ignore.
pub struct TableWriter {
    tmp_path: PathBuf,
    final_path: PathBuf,
    writer: BufWriter<File>,
    last_key: Option<Vec<u8>>,
    count: u64,
    offset: u64,
    options: TableOptions,
}

impl TableWriter {
    /// Start a new table in `dir` with default options.
    pub fn create(dir: &Path) -> StoreResult<Self> {
        Self::create_with(dir, TableOptions::default())
    }

    /// Start a new table in `dir`, creating the directory if needed.
    pub fn create_with(dir: &Path, options: TableOptions) -> StoreResult<Self> {
        fs::create_dir_all(dir)?;
        let final_path = table_path(dir);
        let tmp_path = final_path.with_extension("kvt.tmp");

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&tmp_path)?;
        let mut writer = BufWriter::new(file);
        write_file_header(&mut writer)?;

        Ok(Self {
            tmp_path,
            final_path,
            writer,
            last_key: None,
            count: 0,
            offset: FILE_HEADER_SIZE,
            options,
        })
    }

    /// Append one entry. Its key must be strictly greater than the previous one.
    pub fn append(&mut self, entry: &Entry) -> StoreResult<()> {
        if let Some(last) = &self.last_key {
            if entry.key.as_slice() <= last.as_slice() {
                return Err(StoreError::OutOfOrder {
                    offset: self.offset,
                    key: entry.key_hex(),
                });
            }
        }

        let record = encode_record(entry, self.options.max_record_bytes)?;
        self.writer.write_all(&record)?;
        self.offset += record.len() as u64;
        self.count += 1;
        self.last_key = Some(entry.key.clone());
        Ok(())
    }

    /// Number of entries appended so far.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Flush, sync, and move the table into place. Returns the entry count.
    pub fn finish(mut self) -> StoreResult<u64> {
        self.writer.flush()?;
        if self.options.sync_on_finish {
            self.writer.get_ref().sync_all()?;
        }
        fs::rename(&self.tmp_path, &self.final_path)?;

        debug!(
            path = %self.final_path.display(),
            entries = self.count,
            bytes = self.offset,
            "table written"
        );
        Ok(self.count)
    }

    /// Write `entries` (already in ascending key order) as the table in `dir`.
    pub fn write_all<I>(dir: &Path, entries: I) -> StoreResult<u64>
    where
        I: IntoIterator<Item = Entry>,
    {
        let mut writer = Self::create(dir)?;
        for entry in entries {
            writer.append(&entry)?;
        }
        writer.finish()
    }
}
