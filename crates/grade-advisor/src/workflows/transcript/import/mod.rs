//! CSV transcript exports to [`Transcript`] snapshots.
//!
//! Rows are typed by their `Type` cell: `MO` opens a module, `EM` attaches an
//! element to the open module and `SE` starts a semester whose key is
//! inherited by the following modules.

mod assembler;
mod normalizer;
mod parser;

use super::Transcript;
use assembler::TranscriptAssembler;
use std::io::Read;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum TranscriptImportError {
    #[error("failed to read transcript export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid transcript CSV data: {0}")]
    Csv(#[from] csv::Error),
}

/// Imported snapshot plus counts of rows the assembler could not place.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedTranscript {
    pub transcript: Transcript,
    pub orphan_elements: usize,
    pub ignored_rows: usize,
}

pub struct TranscriptImporter;

impl TranscriptImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<ImportedTranscript, TranscriptImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<ImportedTranscript, TranscriptImportError> {
        let mut assembler = TranscriptAssembler::new();
        for record in parser::parse_records(reader)? {
            assembler.push(record);
        }

        let orphan_elements = assembler.orphan_elements;
        let ignored_rows = assembler.ignored_rows;
        let transcript = Transcript::new(assembler.finish());

        tracing::debug!(
            modules = transcript.modules().len(),
            orphan_elements,
            ignored_rows,
            "transcript imported"
        );

        Ok(ImportedTranscript {
            transcript,
            orphan_elements,
            ignored_rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::transcript::domain::SessionOutcome;
    use parser::RowKind;
    use std::io::Cursor;

    const HEADER: &str =
        "Name,Type,Session 1 Grade,Session 1 Result,Session 2 Grade,Session 2 Result,Semester\n";

    fn import(body: &str) -> ImportedTranscript {
        TranscriptImporter::from_reader(Cursor::new(format!("{HEADER}{body}")))
            .expect("import succeeds")
    }

    #[test]
    fn element_rows_attach_to_the_open_module() {
        let imported = import(
            "Mechanics,MO,8,Non Validé,,,S1\n\
Exam,EM,10,,,,\n\
Lab,EM,6,,,,\n\
Algebra,MO,14.5,Validé,,,S1\n\
Homework,EM,\"14,5\",,,,\n",
        );

        let modules = imported.transcript.modules();
        assert_eq!(modules.len(), 2);
        assert_eq!(modules[0].name, "Mechanics");
        assert_eq!(modules[0].session1_outcome, SessionOutcome::Failed);
        assert!(!modules[0].passed);
        assert_eq!(modules[0].elements.len(), 2);
        assert_eq!(modules[0].elements[1].session1_grade, 6.0);
        assert_eq!(modules[1].final_grade, 14.5);
        assert_eq!(modules[1].elements[0].session1_grade, 14.5);
        assert_eq!(imported.orphan_elements, 0);
    }

    #[test]
    fn orphan_elements_are_skipped_and_counted() {
        let imported = import(
            "Stray,EM,10,,,,\n\
Optics,MO,9,Rattrapage,12,Validé,\n",
        );

        assert_eq!(imported.orphan_elements, 1);
        let modules = imported.transcript.modules();
        assert_eq!(modules.len(), 1);
        assert!(modules[0].elements.is_empty());
        assert_eq!(modules[0].final_grade, 12.0);
        assert!(modules[0].passed);
    }

    #[test]
    fn semester_rows_are_inherited_until_overridden() {
        let imported = import(
            "Semestre 1,SE,,,,,\n\
Analysis,MO,11,Non Validé,,,\n\
Physics,MO,13,Validé,,,Autumn\n\
Semestre 2,SE,,,,,\n\
Networks,MO,12,Validé,,,\n",
        );

        let semesters: Vec<Option<&str>> = imported
            .transcript
            .modules()
            .iter()
            .map(|module| module.semester.as_deref())
            .collect();
        assert_eq!(
            semesters,
            vec![Some("Semestre 1"), Some("Autumn"), Some("Semestre 2")]
        );
    }

    #[test]
    fn semester_row_closes_the_open_module() {
        let imported = import(
            "Analysis,MO,11,Non Validé,,,\n\
Semestre 2,SE,,,,,\n\
Exam,EM,9,,,,\n",
        );

        assert_eq!(imported.orphan_elements, 1);
        assert!(imported.transcript.modules()[0].elements.is_empty());
    }

    #[test]
    fn unknown_row_types_and_bad_grades_never_fail() {
        let imported = import(
            "Totals,XX,,,,,\n\
Databases,MO,ABS,Ajourné,n/a,Admis,\n",
        );

        assert_eq!(imported.ignored_rows, 1);
        let module = &imported.transcript.modules()[0];
        assert_eq!(module.session1_grade, 0.0);
        assert_eq!(module.session2_grade, 0.0);
        assert!(module.passed);
    }

    #[test]
    fn french_headers_and_short_rows_are_accepted() {
        let csv = "Nom,Type,Note S1,Résultat S1,Note S2,Résultat S2,Semestre\n\
Chimie,MO,10,Rattrapage,11,Non Validé,S3\n\
TP,EM,9\n";
        let imported = TranscriptImporter::from_reader(Cursor::new(csv)).expect("import succeeds");

        let module = &imported.transcript.modules()[0];
        assert_eq!(module.name, "Chimie");
        assert_eq!(module.final_grade, 11.0);
        assert_eq!(module.semester.as_deref(), Some("S3"));
        assert_eq!(module.elements[0].session1_grade, 9.0);
    }

    #[test]
    fn names_are_cleaned_of_invisible_characters() {
        assert_eq!(
            normalizer::normalize_for_tests("\u{feff}Signal   Processing\u{200b}"),
            "Signal Processing"
        );
        assert_eq!(parser::row_kind_for_tests(" mo "), RowKind::Module);
        assert_eq!(
            parser::row_kind_for_tests("zz"),
            RowKind::Other("ZZ".to_string())
        );
    }

    #[test]
    fn importer_from_path_propagates_io_errors() {
        let error = TranscriptImporter::from_path("./does-not-exist.csv")
            .expect_err("expected io error");

        match error {
            TranscriptImportError::Io(_) => {}
            other => panic!("expected io error, got {other:?}"),
        }
    }
}
