use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::process::ExitCode;

use anyhow::{bail, Context};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use tracing::info;

use kvdiff_diff::{diff_from_start, DiffSummary};
use kvdiff_render::{DecoderChain, JsonRenderer, RenderConfig, ReportRenderer, TextRenderer};
use kvdiff_store::{
    Entry, MemoryStore, OrderedCursor, OrderedStore, TableCursor, TableStore, TableWriter,
    TABLE_FILE_NAME,
};

use crate::cli::*;

/// Both stores hold identical entries.
pub const EXIT_IDENTICAL: u8 = 0;
/// At least one divergence was reported.
pub const EXIT_DIVERGED: u8 = 1;
/// The run failed before completing.
pub const EXIT_FAILED: u8 = 2;

pub fn run_command(cli: Cli) -> anyhow::Result<ExitCode> {
    match cli.command {
        Command::Diff(args) => cmd_diff(args),
        Command::Import(args) => cmd_import(args),
        Command::Dump(args) => cmd_dump(args),
    }
}

fn cmd_diff(args: DiffArgs) -> anyhow::Result<ExitCode> {
    if args.color {
        colored::control::set_override(true);
    }
    let summary = run_diff(&args, io::stdout().lock())?;
    Ok(ExitCode::from(exit_status(&summary)))
}

pub fn exit_status(summary: &DiffSummary) -> u8 {
    if summary.any_mismatch() {
        EXIT_DIVERGED
    } else {
        EXIT_IDENTICAL
    }
}

impl DiffArgs {
    fn render_config(&self) -> RenderConfig {
        RenderConfig {
            pretty: !self.raw,
            color: self.color,
            max_dump_bytes: self.max_dump_bytes,
        }
    }
}

/// Open both stores, stream the report to `out`, and return the summary.
///
/// Both stores and their cursors are dropped before this returns, on the
/// error path as well.
pub fn run_diff<W: Write>(args: &DiffArgs, out: W) -> anyhow::Result<DiffSummary> {
    let mut cursor_a = open_cursor(&args.store_a, "store A")?;
    let mut cursor_b = open_cursor(&args.store_b, "store B")?;

    info!(
        store_a = %args.store_a.display(),
        store_b = %args.store_b.display(),
        "diffing stores"
    );

    let config = args.render_config();
    match args.format {
        OutputFormat::Text => {
            let mut renderer = TextRenderer::new(out, config);
            render(&mut cursor_a, &mut cursor_b, &mut renderer)
        }
        OutputFormat::Json => {
            let decoders = if config.pretty {
                DecoderChain::standard()
            } else {
                DecoderChain::empty()
            };
            let mut renderer = JsonRenderer::new(out, decoders);
            render(&mut cursor_a, &mut cursor_b, &mut renderer)
        }
    }
}

fn open_cursor(dir: &std::path::Path, what: &str) -> anyhow::Result<TableCursor> {
    let store = TableStore::open_read_only(dir)
        .with_context(|| format!("opening {what} at {}", dir.display()))?;
    store
        .cursor()
        .with_context(|| format!("reading {what} at {}", dir.display()))
}

fn render<R: ReportRenderer>(
    a: &mut TableCursor,
    b: &mut TableCursor,
    renderer: &mut R,
) -> anyhow::Result<DiffSummary> {
    let summary = diff_from_start(a, b, renderer)?;
    renderer.finish(&summary).context("writing summary")?;
    Ok(summary)
}

/// One entry as exchanged by `import` and `dump`.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
struct EntryRecord {
    key: String,
    value: String,
    #[serde(default)]
    meta: u8,
}

impl EntryRecord {
    fn into_entry(self) -> anyhow::Result<Entry> {
        let key = hex::decode(&self.key).with_context(|| format!("key {:?} is not hex", self.key))?;
        let value =
            hex::decode(&self.value).with_context(|| format!("value for key {} is not hex", self.key))?;
        Ok(Entry::new(key, value, self.meta))
    }
}

impl From<&Entry> for EntryRecord {
    fn from(entry: &Entry) -> Self {
        Self {
            key: hex::encode(&entry.key),
            value: hex::encode(&entry.value),
            meta: entry.meta,
        }
    }
}

fn cmd_import(args: ImportArgs) -> anyhow::Result<ExitCode> {
    let input: Box<dyn BufRead> = if args.input == "-" {
        Box::new(io::stdin().lock())
    } else {
        let file = File::open(&args.input).with_context(|| format!("opening {}", args.input))?;
        Box::new(BufReader::new(file))
    };

    let count = import_entries(&args, input)?;
    println!(
        "{} Imported {} entries into {}",
        "✓".green().bold(),
        count.to_string().bold(),
        args.dir.display()
    );
    Ok(ExitCode::SUCCESS)
}

/// Read JSON-lines entries and write them as a table. Later lines win on
/// duplicate keys; input order does not matter.
fn import_entries<R: BufRead>(args: &ImportArgs, input: R) -> anyhow::Result<u64> {
    if !args.force && args.dir.join(TABLE_FILE_NAME).exists() {
        bail!(
            "{} already holds a table; pass --force to replace it",
            args.dir.display()
        );
    }

    let mut store = MemoryStore::new();
    for (lineno, line) in input.lines().enumerate() {
        let line = line.context("reading input")?;
        if line.trim().is_empty() {
            continue;
        }
        let record: EntryRecord = serde_json::from_str(&line)
            .with_context(|| format!("line {}: invalid entry", lineno + 1))?;
        let entry = record
            .into_entry()
            .with_context(|| format!("line {}", lineno + 1))?;
        store.put(entry.key, entry.value, entry.meta);
    }

    let count = TableWriter::write_all(&args.dir, store.entries())
        .with_context(|| format!("writing store at {}", args.dir.display()))?;
    info!(dir = %args.dir.display(), entries = count, "store imported");
    Ok(count)
}

fn cmd_dump(args: DumpArgs) -> anyhow::Result<ExitCode> {
    dump_entries(&args, io::stdout().lock())?;
    Ok(ExitCode::SUCCESS)
}

fn dump_entries<W: Write>(args: &DumpArgs, mut out: W) -> anyhow::Result<u64> {
    let mut cursor = open_cursor(&args.dir, "store")?;
    let mut count = 0;
    while let Some(entry) = cursor.current() {
        serde_json::to_writer(&mut out, &EntryRecord::from(entry))?;
        out.write_all(b"\n")?;
        count += 1;
        cursor.advance()?;
    }
    out.flush()?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn write_store(dir: &Path, entries: &[(&str, &str, u8)]) {
        TableWriter::write_all(
            dir,
            entries.iter().map(|(k, v, m)| Entry::new(*k, *v, *m)),
        )
        .unwrap();
    }

    fn diff_args(a: &Path, b: &Path, format: OutputFormat) -> DiffArgs {
        DiffArgs {
            store_a: a.to_path_buf(),
            store_b: b.to_path_buf(),
            format,
            raw: false,
            color: false,
            max_dump_bytes: None,
        }
    }

    #[test]
    fn identical_stores_exit_zero() {
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();
        write_store(a.path(), &[("k1", "v1", 0)]);
        write_store(b.path(), &[("k1", "v1", 0)]);

        let mut out = Vec::new();
        let summary = run_diff(&diff_args(a.path(), b.path(), OutputFormat::Text), &mut out).unwrap();
        assert_eq!(exit_status(&summary), EXIT_IDENTICAL);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "\nSummary:\nNum keys(A): 1\nNum keys(B): 1\n"
        );
    }

    #[test]
    fn diverging_stores_exit_one() {
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();
        write_store(a.path(), &[("k1", "x", 0), ("k3", "z", 0)]);
        write_store(b.path(), &[("k1", "x", 0), ("k2", "y", 0), ("k3", "z", 0)]);

        let mut out = Vec::new();
        let summary = run_diff(&diff_args(a.path(), b.path(), OutputFormat::Text), &mut out).unwrap();
        assert_eq!(exit_status(&summary), EXIT_DIVERGED);
        assert_eq!(summary.count_a, 2);
        assert_eq!(summary.count_b, 3);

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Key present in one KV store but not the other:\nK(B):\n"));
        assert!(text.ends_with("Num keys(A): 2\nNum keys(B): 3\n"));
    }

    #[test]
    fn json_format_emits_lines() {
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();
        write_store(a.path(), &[("k", "v", 0)]);
        write_store(b.path(), &[("k", "v", 1)]);

        let mut out = Vec::new();
        run_diff(&diff_args(a.path(), b.path(), OutputFormat::Json), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("\"kind\":\"value_mismatch\""));
        assert!(lines[1].contains("\"kind\":\"summary\""));
    }

    #[test]
    fn missing_store_is_fatal() {
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();
        write_store(a.path(), &[]);

        let err = run_diff(
            &diff_args(a.path(), &b.path().join("absent"), OutputFormat::Text),
            Vec::new(),
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("opening store B"));
    }

    #[test]
    fn corrupt_record_in_store_b_is_fatal() {
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();
        let entries = [("k1", "v1", 0), ("k2", "v2", 0), ("k3", "v3", 0)];
        write_store(a.path(), &entries);
        write_store(b.path(), &entries);

        let table = b.path().join(TABLE_FILE_NAME);
        let mut bytes = std::fs::read(&table).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xFF;
        std::fs::write(&table, bytes).unwrap();

        let err = run_diff(
            &diff_args(a.path(), b.path(), OutputFormat::Text),
            Vec::new(),
        )
        .unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("store B"), "got: {message}");
        assert!(message.contains("corrupt record"), "got: {message}");
        assert!(matches!(
            err.downcast_ref::<kvdiff_diff::DiffError>(),
            Some(kvdiff_diff::DiffError::Store { side: kvdiff_diff::Side::B, .. })
        ));
    }

    #[test]
    fn import_then_dump() {
        let dir = tempfile::tempdir().unwrap();
        let store = dir.path().join("store");
        let input = "{\"key\":\"62\",\"value\":\"32\",\"meta\":1}\n\
                     \n\
                     {\"key\":\"61\",\"value\":\"31\"}\n\
                     {\"key\":\"62\",\"value\":\"33\",\"meta\":4}\n";
        let args = ImportArgs {
            dir: store.clone(),
            input: "-".into(),
            force: false,
        };
        assert_eq!(import_entries(&args, input.as_bytes()).unwrap(), 2);

        let mut out = Vec::new();
        let count = dump_entries(&DumpArgs { dir: store }, &mut out).unwrap();
        assert_eq!(count, 2);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "{\"key\":\"61\",\"value\":\"31\",\"meta\":0}\n{\"key\":\"62\",\"value\":\"33\",\"meta\":4}\n"
        );
    }

    #[test]
    fn import_refuses_to_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        write_store(dir.path(), &[("a", "1", 0)]);
        let mut args = ImportArgs {
            dir: dir.path().to_path_buf(),
            input: "-".into(),
            force: false,
        };
        assert!(import_entries(&args, "".as_bytes()).is_err());

        args.force = true;
        assert_eq!(import_entries(&args, "".as_bytes()).unwrap(), 0);
    }

    #[test]
    fn import_rejects_bad_hex() {
        let dir = tempfile::tempdir().unwrap();
        let args = ImportArgs {
            dir: dir.path().join("s"),
            input: "-".into(),
            force: false,
        };
        let err = import_entries(&args, "{\"key\":\"zz\",\"value\":\"\"}\n".as_bytes()).unwrap_err();
        assert!(format!("{err:#}").contains("line 1"));
    }
}
