use std::collections::HashMap;
use std::io::{BufRead, Lines};

use crate::error::PeptabError;
use crate::record::Record;

const COL_ACCESSION: &str = "Entry";
const COL_SEQUENCE: &str = "Sequence";
const COL_NAME: &str = "Protein names";
const COL_VERSION: &str = "Version (entry)";
const COL_EC: &str = "EC number";
const COL_GO: &str = "Gene ontology IDs";
const COL_INTERPRO: &str = "Cross-reference (InterPro)";
const COL_KEGG: &str = "Cross-reference (KEGG)";
const COL_STATUS: &str = "Status";
const COL_TAXON: &str = "Organism ID";

/// Streaming parser for headered UniProt TSV exports.
///
/// Columns are resolved by header name, so the input column order does not
/// matter. The KEGG column is absent from older exports and is optional.
#[derive(Debug)]
pub struct TabRecordParser<R: BufRead> {
    lines: Lines<R>,
    columns: HashMap<String, usize>,
}

impl<R: BufRead> TabRecordParser<R> {
    pub fn new(reader: R) -> Result<Self, PeptabError> {
        let mut lines = reader.lines();
        let header = match lines.next() {
            None => return Err(PeptabError::MissingHeader),
            Some(line) => line.map_err(|err| PeptabError::RecordRead(err.to_string()))?,
        };

        let mut columns = HashMap::new();
        for (index, name) in header.split('\t').enumerate() {
            columns.insert(name.trim().to_string(), index);
        }
        for required in [
            COL_ACCESSION,
            COL_SEQUENCE,
            COL_NAME,
            COL_VERSION,
            COL_EC,
            COL_GO,
            COL_INTERPRO,
            COL_STATUS,
            COL_TAXON,
        ] {
            if !columns.contains_key(required) {
                return Err(PeptabError::MissingColumn(required.to_string()));
            }
        }

        Ok(Self { lines, columns })
    }

    fn field<'a>(&self, fields: &[&'a str], column: &str) -> Result<&'a str, PeptabError> {
        let index = self.columns[column];
        fields
            .get(index)
            .map(|value| value.trim())
            .ok_or_else(|| PeptabError::MalformedRecord(format!("missing field {column}")))
    }

    /// Splits a `;`-separated cross-reference cell, dropping empty ids.
    fn reference_list<'a>(
        &self,
        fields: &[&'a str],
        column: &str,
    ) -> Result<Vec<String>, PeptabError> {
        let Some(&index) = self.columns.get(column) else {
            return Ok(Vec::new());
        };
        let cell = fields
            .get(index)
            .map(|value| value.trim())
            .ok_or_else(|| PeptabError::MalformedRecord(format!("missing field {column}")))?;
        Ok(cell
            .split(';')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect())
    }

    fn parse_line(&self, line: &str) -> Result<Record, PeptabError> {
        let fields: Vec<&str> = line.split('\t').collect();

        let version_field = self.field(&fields, COL_VERSION)?;
        let version: u32 = version_field
            .parse()
            .map_err(|_| PeptabError::InvalidVersion(version_field.to_string()))?;
        let taxon_field = self.field(&fields, COL_TAXON)?;
        let taxon_id: i32 = taxon_field
            .parse()
            .map_err(|_| PeptabError::InvalidTaxonId(taxon_field.to_string()))?;

        Ok(Record {
            accession: self.field(&fields, COL_ACCESSION)?.to_string(),
            version,
            taxon_id,
            entry_type: self.field(&fields, COL_STATUS)?.parse()?,
            name: self.field(&fields, COL_NAME)?.to_string(),
            sequence: self.field(&fields, COL_SEQUENCE)?.to_string(),
            go_references: self.reference_list(&fields, COL_GO)?,
            ec_references: self.reference_list(&fields, COL_EC)?,
            interpro_references: self.reference_list(&fields, COL_INTERPRO)?,
            kegg_references: self.reference_list(&fields, COL_KEGG)?,
        })
    }
}

impl<R: BufRead> Iterator for TabRecordParser<R> {
    type Item = Result<Record, PeptabError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(err) => return Some(Err(PeptabError::RecordRead(err.to_string()))),
            };
            if line.trim().is_empty() {
                continue;
            }
            return Some(self.parse_line(&line));
        }
    }
}
