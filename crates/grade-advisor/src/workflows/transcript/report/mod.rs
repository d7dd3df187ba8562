mod aggregate;
mod summary;
pub mod views;

pub use aggregate::{
    general_average, resolve_final_grade, semester_averages, session_averages, status,
    AdmissionStatus, SemesterAverage, SessionAverages,
};
pub use summary::TranscriptReport;
