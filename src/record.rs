use std::collections::HashSet;

use crate::domain::{EntryType, ReferenceFamily};

/// One validated per-protein annotation record, as produced by the parser.
///
/// Immutable once built; the engine reads it but never changes it.
#[derive(Debug, Clone)]
pub struct Record {
    pub accession: String,
    pub version: u32,
    pub taxon_id: i32,
    pub entry_type: EntryType,
    pub name: String,
    pub sequence: String,
    pub go_references: Vec<String>,
    pub ec_references: Vec<String>,
    pub interpro_references: Vec<String>,
    pub kegg_references: Vec<String>,
}

impl Record {
    /// Tryptic digestion of the full sequence.
    ///
    /// Cleaves after `K` or `R` unless the next residue is `P`, keeps
    /// fragments whose length falls within `[min_len, max_len]`, and drops
    /// duplicates while preserving first-occurrence order.
    pub fn digest(&self, min_len: usize, max_len: usize) -> Vec<&str> {
        let content = self.sequence.as_bytes();
        let length = content.len();

        let mut seen = HashSet::new();
        let mut result = Vec::new();
        let mut start = 0usize;

        for (i, c) in content.iter().enumerate() {
            if (*c == b'K' || *c == b'R') && (i + 1 < length && content[i + 1] != b'P') {
                let fragment = &self.sequence[start..i + 1];
                if fragment.len() >= min_len && fragment.len() <= max_len && seen.insert(fragment) {
                    result.push(fragment);
                }
                start = i + 1;
            }
        }

        let tail = &self.sequence[start..];
        if tail.len() >= min_len && tail.len() <= max_len && seen.insert(tail) {
            result.push(tail);
        }

        result
    }

    /// Cross-reference lists in the fixed family order (GO, EC, InterPro,
    /// KEGG) used for both the cross-reference tables and the annotation
    /// summary.
    pub fn references(&self) -> [(ReferenceFamily, &[String]); 4] {
        [
            (ReferenceFamily::Go, self.go_references.as_slice()),
            (ReferenceFamily::Ec, self.ec_references.as_slice()),
            (ReferenceFamily::InterPro, self.interpro_references.as_slice()),
            (ReferenceFamily::Kegg, self.kegg_references.as_slice()),
        ]
    }
}

/// Collapse Isoleucine onto Leucine.
///
/// The two residues are isobaric, so mass-spectrometry identification has to
/// group peptides on the unified form while the original stays displayable.
pub fn unify_sequence(peptide: &str) -> String {
    peptide.replace('I', "L")
}
