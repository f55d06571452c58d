use std::{
    num::{ParseFloatError, ParseIntError},
    path::PathBuf,
};
use thiserror::Error;

pub type VcfParseResult<T> = std::result::Result<T, VcfParseError>;

#[derive(Debug, Error)]
pub enum VcfParseError {
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    ParseInt(#[from] ParseIntError),
    #[error(transparent)]
    ParseFloat(#[from] ParseFloatError),
    #[error("Invalid gzip header: {}", path.display())]
    InvalidGzipHeader { path: PathBuf },
    #[error("Malformed VCF header at line {line}: {message}")]
    MalformedHeader { line: usize, message: String },
    #[error("Invalid VCF column header at line {line}: {message}")]
    InvalidColumnHeader { line: usize, message: String },
    #[error("Missing VCF column header line (#CHROM ...) in {}", path.display())]
    MissingColumnHeader { path: PathBuf },
    #[error("Malformed VCF record at line {line}: {message}")]
    MalformedRecord { line: usize, message: String },
    #[error("Invalid config location '{value}' (expected one of info, format, vep, filter, pref)")]
    InvalidLocation { value: String },
    #[error("Annotation '{annotation}' not found in the {location} fields of the VCF header")]
    MissingAnnotation {
        annotation: String,
        location: String,
    },
    #[error("Invalid classification '{value}' (expected an integer from 0 to 5)")]
    InvalidClassification { value: String },
}

impl VcfParseError {
    pub fn message(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }
}

#[macro_export]
macro_rules! vcf_parse_error {
    ($($arg:tt)*) => {
        $crate::error::VcfParseError::message(format!($($arg)*))
    };
}
