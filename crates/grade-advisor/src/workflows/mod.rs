pub mod remediation;
pub mod transcript;
