use super::normalizer::{normalize_code, normalize_name};
use crate::workflows::transcript::domain::parse_grade;
use serde::{Deserialize, Deserializer};
use std::io::Read;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum RowKind {
    Module,
    Element,
    Semester,
    Other(String),
}

impl RowKind {
    fn from_code(code: &str) -> Self {
        match normalize_code(code).as_str() {
            "MO" | "MODULE" => Self::Module,
            "EM" | "ELEMENT" => Self::Element,
            "SE" | "SEMESTER" | "SEMESTRE" => Self::Semester,
            other => Self::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct TranscriptRecord {
    pub(crate) kind: RowKind,
    pub(crate) name: String,
    pub(crate) session1_grade: f64,
    pub(crate) session1_result: String,
    pub(crate) session2_grade: f64,
    pub(crate) session2_result: String,
    pub(crate) semester: Option<String>,
}

pub(crate) fn parse_records<R: Read>(reader: R) -> Result<Vec<TranscriptRecord>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let mut records = Vec::new();

    for record in csv_reader.deserialize::<TranscriptRow>() {
        let row = record?;
        records.push(TranscriptRecord {
            kind: RowKind::from_code(&row.kind),
            name: normalize_name(&row.name),
            session1_grade: row.session1_grade.as_deref().map(parse_grade).unwrap_or(0.0),
            session1_result: row.session1_result.unwrap_or_default(),
            session2_grade: row.session2_grade.as_deref().map(parse_grade).unwrap_or(0.0),
            session2_result: row.session2_result.unwrap_or_default(),
            semester: row.semester.map(|value| normalize_name(&value)),
        });
    }

    Ok(records)
}

#[derive(Debug, Deserialize)]
struct TranscriptRow {
    #[serde(rename = "Name", alias = "Nom", alias = "Intitulé", default)]
    name: String,
    #[serde(rename = "Type", default)]
    kind: String,
    #[serde(
        rename = "Session 1 Grade",
        alias = "Note S1",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    session1_grade: Option<String>,
    #[serde(
        rename = "Session 1 Result",
        alias = "Résultat S1",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    session1_result: Option<String>,
    #[serde(
        rename = "Session 2 Grade",
        alias = "Note S2",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    session2_grade: Option<String>,
    #[serde(
        rename = "Session 2 Result",
        alias = "Résultat S2",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    session2_result: Option<String>,
    #[serde(
        rename = "Semester",
        alias = "Semestre",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    semester: Option<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

#[cfg(test)]
pub(crate) fn row_kind_for_tests(code: &str) -> RowKind {
    RowKind::from_code(code)
}
