use std::fmt;
use std::fs::{self, File};
use std::io::{BufWriter, Write};

use camino::Utf8Path;

use crate::error::PeptabError;

/// 1-based ordinal of a row inside one table, assigned at write time.
///
/// Surrogate ids are never reused, reordered or reclaimed; a failed write
/// does not consume one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RowId(u64);

impl RowId {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Append-only writer for one flat TSV table.
///
/// Each successful `write` appends one tab-delimited row and returns the
/// surrogate id of the row just written. Exactly one instance exists per
/// output table and it is never shared across threads.
#[derive(Debug)]
pub struct SequentialTableWriter<W: Write> {
    table: &'static str,
    sink: W,
    count: u64,
}

impl SequentialTableWriter<BufWriter<File>> {
    /// Opens (creating or truncating) the table file at `path`.
    pub fn create(table: &'static str, path: &Utf8Path) -> Result<Self, PeptabError> {
        let file = fs::File::create(path.as_std_path()).map_err(|err| PeptabError::TableOpen {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        Ok(Self::new(table, BufWriter::new(file)))
    }
}

impl<W: Write> SequentialTableWriter<W> {
    pub fn new(table: &'static str, sink: W) -> Self {
        Self {
            table,
            sink,
            count: 0,
        }
    }

    /// Appends one row; the returned id is the counter value after the
    /// increment. The counter only advances once the sink accepted the row.
    pub fn write(&mut self, fields: &[&str]) -> Result<RowId, PeptabError> {
        let mut line = fields.join("\t");
        line.push('\n');
        self.sink
            .write_all(line.as_bytes())
            .map_err(|err| PeptabError::RowWrite {
                table: self.table.to_string(),
                message: err.to_string(),
            })?;
        self.count += 1;
        Ok(RowId(self.count))
    }

    /// Surrogate id of the row written last, if any row was written.
    pub fn last_id(&self) -> Option<RowId> {
        (self.count > 0).then_some(RowId(self.count))
    }

    pub fn rows_written(&self) -> u64 {
        self.count
    }

    /// Flushes and releases the sink. Call exactly once, after all writes.
    pub fn close(mut self) -> Result<(), PeptabError> {
        self.sink.flush().map_err(|err| PeptabError::TableClose {
            table: self.table.to_string(),
            message: err.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn write_assigns_one_based_increasing_ids() {
        let mut writer = SequentialTableWriter::new("peptides", Vec::new());
        assert_eq!(writer.last_id(), None);

        let first = writer.write(&["AAK", "AAK"]).unwrap();
        let second = writer.write(&["BBR", "BBR"]).unwrap();
        assert_eq!(first.value(), 1);
        assert_eq!(second.value(), 2);
        assert_eq!(writer.last_id(), Some(second));
    }

    #[test]
    fn rows_are_tab_delimited_lines() {
        let mut sink = Vec::new();
        {
            let writer_sink = &mut sink;
            let mut writer = SequentialTableWriter::new("uniprot_entries", writer_sink);
            writer.write(&["P12345", "7", "5"]).unwrap();
            writer.write(&["Q67890", "2", "9"]).unwrap();
            writer.close().unwrap();
        }
        assert_eq!(sink, b"P12345\t7\t5\nQ67890\t2\t9\n");
    }

    struct FailingSink;

    impl Write for FailingSink {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("disk full"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn failed_write_does_not_consume_an_id() {
        let mut writer = SequentialTableWriter::new("go_cross_references", FailingSink);
        let err = writer.write(&["1", "GO:0008150"]).unwrap_err();
        assert_matches!(err, PeptabError::RowWrite { .. });
        assert_eq!(writer.rows_written(), 0);
        assert_eq!(writer.last_id(), None);
    }
}
