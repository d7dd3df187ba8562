use super::report::resolve_final_grade;
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

/// Registrar verdict recorded for one session of a module.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionOutcome {
    #[default]
    Pending,
    Passed,
    MakeupRequired,
    Failed,
    Deferred,
    Admitted,
    Unrecognized(String),
}

impl SessionOutcome {
    pub fn from_label(raw: &str) -> Self {
        let trimmed = raw.trim();
        match normalize_label(trimmed).as_str() {
            "" => Self::Pending,
            "valide" | "v" | "passed" | "pass" => Self::Passed,
            "rattrapage" | "rat" | "makeup" | "makeup required" | "makeup-required" => {
                Self::MakeupRequired
            }
            "non valide" | "nv" | "failed" | "fail" => Self::Failed,
            "ajourne" | "aj" | "deferred" => Self::Deferred,
            "admis" | "adm" | "admitted" => Self::Admitted,
            _ => Self::Unrecognized(trimmed.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Pending => "Pending",
            Self::Passed => "Passed",
            Self::MakeupRequired => "Makeup Required",
            Self::Failed => "Failed",
            Self::Deferred => "Deferred",
            Self::Admitted => "Admitted",
            Self::Unrecognized(raw) => raw,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Session-one verdicts after which element grades are read from session two.
    pub fn awaits_second_session(&self) -> bool {
        matches!(self, Self::MakeupRequired | Self::Deferred)
    }
}

fn normalize_label(value: &str) -> String {
    let folded: String = value
        .chars()
        .map(|ch| match ch {
            'é' | 'è' | 'ê' | 'ë' | 'É' | 'È' | 'Ê' => 'e',
            other => other,
        })
        .collect();
    folded
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Parses a grade cell; anything that is not a finite, non-negative number reads as 0.
pub fn parse_grade(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    trimmed
        .replace(',', ".")
        .parse::<f64>()
        .map(sanitize_grade)
        .unwrap_or(0.0)
}

fn sanitize_grade(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// How the weights of a module's elements were obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightEstimate {
    #[default]
    Uniform,
    Solved,
    Matched,
}

impl WeightEstimate {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Uniform => "Equal weights",
            Self::Solved => "Solved from module grade",
            Self::Matched => "Matched weight profile",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightConfidence {
    EqualHigh,
    VariableMedium,
    Estimated,
}

impl WeightConfidence {
    pub const fn label(self) -> &'static str {
        match self {
            Self::EqualHigh => "Equal coefficients (high confidence)",
            Self::VariableMedium => "Variable coefficients (medium confidence)",
            Self::Estimated => "Estimated coefficients",
        }
    }
}

/// Graded sub-component of a module.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: String,
    pub session1_grade: f64,
    pub session2_grade: f64,
    pub resolved_grade: f64,
    pub raw_weight: f64,
    pub normalized_weight: f64,
    pub points_to_add: f64,
    pub contribution_before: f64,
    pub contribution_after: f64,
}

impl Element {
    pub fn new(name: impl Into<String>, session1_grade: f64, session2_grade: f64) -> Self {
        Self {
            name: name.into(),
            session1_grade: sanitize_grade(session1_grade),
            session2_grade: sanitize_grade(session2_grade),
            resolved_grade: sanitize_grade(session1_grade),
            raw_weight: 0.0,
            normalized_weight: 0.0,
            points_to_add: 0.0,
            contribution_before: 0.0,
            contribution_after: 0.0,
        }
    }

    pub fn projected_grade(&self) -> f64 {
        self.resolved_grade + self.points_to_add
    }

    /// Module grade gained by the planned points.
    pub fn module_impact(&self) -> f64 {
        self.contribution_after - self.contribution_before
    }
}

/// Gradable curriculum unit owning its elements.
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    pub name: String,
    pub session1_grade: f64,
    pub session2_grade: f64,
    pub session1_outcome: SessionOutcome,
    pub session2_outcome: SessionOutcome,
    pub final_grade: f64,
    pub passed: bool,
    pub semester: Option<String>,
    pub elements: Vec<Element>,
    pub weight_estimate: WeightEstimate,
}

impl Module {
    pub fn new(
        name: impl Into<String>,
        session1_grade: f64,
        session1_outcome: SessionOutcome,
        session2_grade: f64,
        session2_outcome: SessionOutcome,
    ) -> Self {
        let mut module = Self {
            name: name.into(),
            session1_grade: sanitize_grade(session1_grade),
            session2_grade: sanitize_grade(session2_grade),
            session1_outcome,
            session2_outcome,
            final_grade: 0.0,
            passed: false,
            semester: None,
            elements: Vec::new(),
            weight_estimate: WeightEstimate::Uniform,
        };
        let (final_grade, passed) = resolve_final_grade(&module);
        module.final_grade = final_grade;
        module.passed = passed;
        module
    }

    pub fn from_record(record: ModuleRecord) -> Self {
        let ModuleRecord {
            name,
            session1_grade,
            session1_outcome,
            session2_grade,
            session2_outcome,
            semester,
            elements,
        } = record;

        let mut module = Self::new(
            name,
            session1_grade,
            SessionOutcome::from_label(&session1_outcome),
            session2_grade,
            SessionOutcome::from_label(&session2_outcome),
        );
        module.semester = semester.filter(|value| !value.trim().is_empty());
        module.elements = elements
            .into_iter()
            .map(|element| Element::new(element.name, element.session1_grade, element.session2_grade))
            .collect();
        module
    }

    pub fn with_semester(mut self, semester: impl Into<String>) -> Self {
        self.semester = Some(semester.into());
        self
    }

    pub fn with_element(mut self, element: Element) -> Self {
        self.elements.push(element);
        self
    }

    /// Whether the planner should look for points to add.
    pub fn needs_remediation(&self, pass_threshold: f64) -> bool {
        !self.passed && self.final_grade < pass_threshold
    }

    pub fn weighted_grade(&self) -> f64 {
        self.elements
            .iter()
            .map(|element| element.normalized_weight * element.resolved_grade)
            .sum()
    }

    pub fn weight_confidence(&self) -> WeightConfidence {
        match self.elements.as_slice() {
            [first, second] => {
                if (first.normalized_weight - second.normalized_weight).abs() < 0.1 {
                    WeightConfidence::EqualHigh
                } else {
                    WeightConfidence::VariableMedium
                }
            }
            _ => WeightConfidence::Estimated,
        }
    }
}

/// Module as supplied by an extraction collaborator over JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModuleRecord {
    pub name: String,
    #[serde(default, deserialize_with = "lenient_grade")]
    pub session1_grade: f64,
    #[serde(default)]
    pub session1_outcome: String,
    #[serde(default, deserialize_with = "lenient_grade")]
    pub session2_grade: f64,
    #[serde(default)]
    pub session2_outcome: String,
    #[serde(default)]
    pub semester: Option<String>,
    #[serde(default)]
    pub elements: Vec<ElementRecord>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ElementRecord {
    pub name: String,
    #[serde(default, deserialize_with = "lenient_grade")]
    pub session1_grade: f64,
    #[serde(default, deserialize_with = "lenient_grade")]
    pub session2_grade: f64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawGrade {
    Number(f64),
    Text(String),
    Other(IgnoredAny),
}

fn lenient_grade<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawGrade>::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawGrade::Number(value)) => sanitize_grade(value),
        Some(RawGrade::Text(text)) => parse_grade(&text),
        Some(RawGrade::Other(_)) | None => 0.0,
    })
}
