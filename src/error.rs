use camino::Utf8PathBuf;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum PeptabError {
    #[error("invalid entry type: {0}")]
    InvalidEntryType(String),

    #[error("invalid taxon id: {0}")]
    InvalidTaxonId(String),

    #[error("invalid entry version: {0}")]
    InvalidVersion(String),

    #[error("missing header line in record stream")]
    MissingHeader,

    #[error("missing column in record stream: {0}")]
    MissingColumn(String),

    #[error("malformed record line: {0}")]
    MalformedRecord(String),

    #[error("failed to read record stream: {0}")]
    RecordRead(String),

    #[error("failed to read taxonomy file at {0}")]
    TaxonomyRead(Utf8PathBuf),

    #[error("failed to parse taxonomy file: {0}")]
    TaxonomyParse(String),

    #[error("failed to open table file at {path}: {message}")]
    TableOpen { path: Utf8PathBuf, message: String },

    #[error("failed to write row to table {table}: {message}")]
    RowWrite { table: String, message: String },

    #[error("failed to close table {table}: {message}")]
    TableClose { table: String, message: String },
}
