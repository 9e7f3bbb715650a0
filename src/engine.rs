use std::collections::HashSet;
use std::fs::File;
use std::io::{BufWriter, Write};

use camino::Utf8PathBuf;
use serde::Serialize;
use tracing::{debug, warn};

use crate::domain::ReferenceFamily;
use crate::error::PeptabError;
use crate::record::{Record, unify_sequence};
use crate::taxonomy::TaxonValidator;
use crate::writer::{RowId, SequentialTableWriter};

/// Digestion bounds and diagnostics switch, supplied by the CLI layer.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    pub peptide_min: usize,
    pub peptide_max: usize,
    pub verbose: bool,
}

/// Handle to a parent row that was actually written.
///
/// Child rows can only be emitted against a handle produced by a parent
/// write, which makes the foreign-key ordering a type-level requirement
/// instead of a convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryId(RowId);

impl EntryId {
    pub fn row(&self) -> RowId {
        self.0
    }
}

/// Output file locations for the six tables.
#[derive(Debug, Clone)]
pub struct TablePaths {
    pub uniprot_entries: Utf8PathBuf,
    pub peptides: Utf8PathBuf,
    pub go_references: Utf8PathBuf,
    pub ec_references: Utf8PathBuf,
    pub interpro_references: Utf8PathBuf,
    pub kegg_references: Utf8PathBuf,
}

/// The six table writers, one per output table, exclusively owned by the
/// engine for the run's duration.
#[derive(Debug)]
pub struct TableSet<W: Write> {
    pub uniprot_entries: SequentialTableWriter<W>,
    pub peptides: SequentialTableWriter<W>,
    pub go_references: SequentialTableWriter<W>,
    pub ec_references: SequentialTableWriter<W>,
    pub interpro_references: SequentialTableWriter<W>,
    pub kegg_references: SequentialTableWriter<W>,
}

impl TableSet<BufWriter<File>> {
    /// Opens all six output files; any failure here is a setup failure and
    /// aborts the run before the first record.
    pub fn create(paths: &TablePaths) -> Result<Self, PeptabError> {
        Ok(Self {
            uniprot_entries: SequentialTableWriter::create("uniprot_entries", &paths.uniprot_entries)?,
            peptides: SequentialTableWriter::create("peptides", &paths.peptides)?,
            go_references: SequentialTableWriter::create("go_cross_references", &paths.go_references)?,
            ec_references: SequentialTableWriter::create("ec_cross_references", &paths.ec_references)?,
            interpro_references: SequentialTableWriter::create(
                "interpro_cross_references",
                &paths.interpro_references,
            )?,
            kegg_references: SequentialTableWriter::create("kegg_cross_references", &paths.kegg_references)?,
        })
    }
}

impl<W: Write> TableSet<W> {
    fn reference_writer(&mut self, family: ReferenceFamily) -> &mut SequentialTableWriter<W> {
        match family {
            ReferenceFamily::Go => &mut self.go_references,
            ReferenceFamily::Ec => &mut self.ec_references,
            ReferenceFamily::InterPro => &mut self.interpro_references,
            ReferenceFamily::Kegg => &mut self.kegg_references,
        }
    }
}

/// Per-record outcome of [`NormalizationEngine::store`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOutcome {
    /// Parent row written; children emitted against the returned handle.
    Stored(EntryId),
    /// Unknown taxon id; zero rows emitted in every table.
    SkippedInvalidTaxon,
    /// The parent row write itself failed; zero rows emitted for the record.
    ParentWriteFailed,
}

/// Row counts reported at the end of a run.
#[derive(Debug, Clone, Serialize)]
pub struct RunStats {
    pub uniprot_entries: u64,
    pub peptides: u64,
    pub go_references: u64,
    pub ec_references: u64,
    pub interpro_references: u64,
    pub kegg_references: u64,
    pub skipped_records: u64,
    pub distinct_invalid_taxa: usize,
    pub finished_at: String,
}

/// Converts one record at a time into rows across the six tables, tying the
/// children to the parent row through its surrogate id.
///
/// The writes for one record are not transactional: if a child write fails
/// midway, rows already written for that record persist. The engine logs the
/// failure and moves on.
#[derive(Debug)]
pub struct NormalizationEngine<W: Write> {
    validator: TaxonValidator,
    tables: TableSet<W>,
    options: EngineOptions,
    invalid_taxa: HashSet<i32>,
    skipped_records: u64,
}

impl<W: Write> NormalizationEngine<W> {
    pub fn new(validator: TaxonValidator, tables: TableSet<W>, options: EngineOptions) -> Self {
        Self {
            validator,
            tables,
            options,
            invalid_taxa: HashSet::new(),
            skipped_records: 0,
        }
    }

    /// Processes one record fully: parent row, peptide fan-out, then the four
    /// cross-reference tables. Row-write failures are logged and skipped, not
    /// propagated.
    pub fn store(&mut self, record: &Record) -> StoreOutcome {
        let entry = match self.write_entry(record) {
            Some(entry) => entry,
            None => return StoreOutcome::SkippedInvalidTaxon,
        };
        let Some(entry) = entry else {
            return StoreOutcome::ParentWriteFailed;
        };
        let parent = entry.row().to_string();

        let summary = annotation_summary(record);
        for peptide in record.digest(self.options.peptide_min, self.options.peptide_max) {
            let unified = unify_sequence(peptide);
            let fields = [unified.as_str(), peptide, parent.as_str(), summary.as_str()];
            match self.tables.peptides.write(&fields) {
                Ok(row) => {
                    if self.options.verbose {
                        debug!("peptides row {row}: {unified} <- {peptide} (entry {parent})");
                    }
                }
                Err(err) => warn!("{err}"),
            }
        }

        for (family, ids) in record.references() {
            for id in ids {
                let writer = self.tables.reference_writer(family);
                match writer.write(&[parent.as_str(), id.as_str()]) {
                    Ok(row) => {
                        if self.options.verbose {
                            debug!("{} row {row}: entry {parent} -> {id}", family.table_name());
                        }
                    }
                    Err(err) => warn!("{err}"),
                }
            }
        }

        StoreOutcome::Stored(entry)
    }

    /// Validates the taxon and writes the parent row.
    ///
    /// `None` means the taxon was unknown; `Some(None)` means the row write
    /// itself failed and the record must produce no children.
    fn write_entry(&mut self, record: &Record) -> Option<Option<EntryId>> {
        if !self.validator.is_valid(record.taxon_id) {
            self.skipped_records += 1;
            if self.invalid_taxa.insert(record.taxon_id) {
                warn!(
                    "{} added to the list of {} invalid taxon ids",
                    record.taxon_id,
                    self.invalid_taxa.len()
                );
            }
            return None;
        }

        let version = record.version.to_string();
        let taxon_id = record.taxon_id.to_string();
        let entry_type = record.entry_type.to_string();
        let fields = [
            record.accession.as_str(),
            version.as_str(),
            taxon_id.as_str(),
            entry_type.as_str(),
            record.name.as_str(),
            record.sequence.as_str(),
        ];

        match self.tables.uniprot_entries.write(&fields) {
            Ok(row) => {
                if self.options.verbose {
                    debug!("uniprot_entries row {row}: {}", record.accession);
                }
                Some(Some(EntryId(row)))
            }
            Err(err) => {
                warn!("{err}");
                Some(None)
            }
        }
    }

    /// Distinct invalid taxon ids seen so far in this run.
    pub fn invalid_taxa(&self) -> &HashSet<i32> {
        &self.invalid_taxa
    }

    /// Closes all six writers exactly once; close failures are logged and do
    /// not fail the run.
    pub fn finish(self) -> RunStats {
        let stats = RunStats {
            uniprot_entries: self.tables.uniprot_entries.rows_written(),
            peptides: self.tables.peptides.rows_written(),
            go_references: self.tables.go_references.rows_written(),
            ec_references: self.tables.ec_references.rows_written(),
            interpro_references: self.tables.interpro_references.rows_written(),
            kegg_references: self.tables.kegg_references.rows_written(),
            skipped_records: self.skipped_records,
            distinct_invalid_taxa: self.invalid_taxa.len(),
            finished_at: chrono::Utc::now().to_rfc3339(),
        };

        let TableSet {
            uniprot_entries,
            peptides,
            go_references,
            ec_references,
            interpro_references,
            kegg_references,
        } = self.tables;
        for result in [
            uniprot_entries.close(),
            peptides.close(),
            go_references.close(),
            ec_references.close(),
            interpro_references.close(),
            kegg_references.close(),
        ] {
            if let Err(err) = result {
                warn!("{err}");
            }
        }

        stats
    }
}

/// Denormalized per-peptide functional-annotation summary.
///
/// Family order is fixed (GO, EC, InterPro, KEGG); within one family the
/// record's own ordering is kept. The identical string is repeated on every
/// peptide row of one parent, trading storage for simpler bulk loads.
pub fn annotation_summary(record: &Record) -> String {
    let mut parts = Vec::new();
    for (family, ids) in record.references() {
        for id in ids {
            parts.push(format!("{}{}", family.summary_prefix(), id));
        }
    }
    parts.join(";")
}
