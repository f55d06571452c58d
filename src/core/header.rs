use crate::{constants::*, error::VcfParseError, utils::util::Result};
use std::{collections::HashSet, fmt, str::FromStr};

/// Declared cardinality of an INFO or FORMAT field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Number {
    Count(usize),
    /// `A`: one value per alternate allele
    PerAltAllele,
    /// `R`: one value per allele, reference included
    PerAllele,
    /// `G`: one value per possible genotype
    PerGenotype,
    /// `.`: unknown or variable
    Unknown,
}

impl FromStr for Number {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "A" => Ok(Number::PerAltAllele),
            "R" => Ok(Number::PerAllele),
            "G" => Ok(Number::PerGenotype),
            "." => Ok(Number::Unknown),
            _ => s
                .parse::<usize>()
                .map(Number::Count)
                .map_err(|_| format!("Invalid Number '{s}'")),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Count(n) => write!(f, "{n}"),
            Number::PerAltAllele => write!(f, "A"),
            Number::PerAllele => write!(f, "R"),
            Number::PerGenotype => write!(f, "G"),
            Number::Unknown => write!(f, "."),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Integer,
    Float,
    Flag,
    Character,
    String,
}

impl FromStr for FieldType {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "Integer" => Ok(FieldType::Integer),
            "Float" => Ok(FieldType::Float),
            "Flag" => Ok(FieldType::Flag),
            "Character" => Ok(FieldType::Character),
            "String" => Ok(FieldType::String),
            _ => Err(format!("Invalid Type '{s}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDefinition {
    pub id: String,
    pub number: Number,
    pub field_type: FieldType,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterDefinition {
    pub id: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum HeaderLine {
    FileFormat(String),
    Filter(FilterDefinition),
    Info(FieldDefinition),
    Format(FieldDefinition),
    /// Any other `##KEY=<k=v,...>` line, e.g. SAMPLE or contig
    Structured {
        key: String,
        fields: Vec<(String, String)>,
    },
    Unstructured {
        key: String,
        value: String,
    },
}

#[derive(Debug, Clone)]
pub struct VcfHeader {
    pub file_format: String,
    pub lines: Vec<HeaderLine>,
    samples: Vec<String>,
    vep_fields: Vec<String>,
}

impl VcfHeader {
    pub fn samples(&self) -> &[String] {
        &self.samples
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    pub fn infos(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.lines.iter().filter_map(|line| match line {
            HeaderLine::Info(def) => Some(def),
            _ => None,
        })
    }

    pub fn formats(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.lines.iter().filter_map(|line| match line {
            HeaderLine::Format(def) => Some(def),
            _ => None,
        })
    }

    pub fn info(&self, id: &str) -> Option<&FieldDefinition> {
        self.infos().find(|def| def.id == id)
    }

    pub fn format(&self, id: &str) -> Option<&FieldDefinition> {
        self.formats().find(|def| def.id == id)
    }

    /// VEP sub-field names declared by the CSQ INFO description, empty when absent.
    pub fn vep_fields(&self) -> &[String] {
        &self.vep_fields
    }

    pub fn vep_field_index(&self, name: &str) -> Option<usize> {
        self.vep_fields.iter().position(|f| f == name)
    }

    pub fn has_vep(&self) -> bool {
        !self.vep_fields.is_empty()
    }
}

/// Accumulates `##` lines until the `#CHROM` column header closes the header.
#[derive(Debug, Default)]
pub struct HeaderParser {
    file_format: Option<String>,
    lines: Vec<HeaderLine>,
}

impl HeaderParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_meta_line(&mut self, line: &str, line_number: usize) -> Result<()> {
        let header_line = parse_meta_line(line, line_number)?;
        if let HeaderLine::FileFormat(ref version) = header_line {
            if self.file_format.is_some() {
                return Err(VcfParseError::MalformedHeader {
                    line: line_number,
                    message: "duplicate ##fileformat line".to_string(),
                });
            }
            self.file_format = Some(version.clone());
        }
        self.lines.push(header_line);
        Ok(())
    }

    pub fn finish(self, column_header: &str, line_number: usize) -> Result<VcfHeader> {
        let file_format = self.file_format.ok_or_else(|| VcfParseError::MalformedHeader {
            line: line_number,
            message: "missing ##fileformat line".to_string(),
        })?;
        let samples = parse_column_header(column_header, line_number)?;
        let vep_fields = self
            .lines
            .iter()
            .find_map(|line| match line {
                HeaderLine::Info(def) if def.id == VEP_INFO_ID => Some(vep_fields_from(def)),
                _ => None,
            })
            .unwrap_or_default();

        Ok(VcfHeader {
            file_format,
            lines: self.lines,
            samples,
            vep_fields,
        })
    }
}

fn vep_fields_from(def: &FieldDefinition) -> Vec<String> {
    match def.description.split_once(VEP_FORMAT_MARKER) {
        Some((_, layout)) => layout.split('|').map(|f| f.trim().to_string()).collect(),
        None => {
            log::warn!(
                "{} INFO description has no '{}' layout, VEP columns are unavailable",
                VEP_INFO_ID,
                VEP_FORMAT_MARKER.trim()
            );
            Vec::new()
        }
    }
}

pub fn parse_meta_line(line: &str, line_number: usize) -> Result<HeaderLine> {
    let malformed = |message: String| VcfParseError::MalformedHeader {
        line: line_number,
        message,
    };

    let content = line
        .strip_prefix("##")
        .ok_or_else(|| malformed(format!("expected a '##' prefix: {line}")))?;
    let (key, value) = content
        .split_once('=')
        .ok_or_else(|| malformed(format!("expected '##key=value': {line}")))?;

    if key == "fileformat" {
        return Ok(HeaderLine::FileFormat(value.to_string()));
    }

    let Some(body) = value.strip_prefix('<') else {
        return Ok(HeaderLine::Unstructured {
            key: key.to_string(),
            value: value.to_string(),
        });
    };
    let body = match body.strip_suffix('>') {
        Some(body) => body,
        None => {
            log::warn!(
                "Header line {} is missing its closing '>', parsing it as if present: {}",
                line_number,
                line
            );
            body
        }
    };

    let fields = split_structured(body).map_err(malformed)?;
    match key {
        "INFO" => Ok(HeaderLine::Info(field_definition(&fields).map_err(malformed)?)),
        "FORMAT" => Ok(HeaderLine::Format(
            field_definition(&fields).map_err(malformed)?,
        )),
        "FILTER" => {
            let id = required(&fields, "ID").map_err(malformed)?;
            Ok(HeaderLine::Filter(FilterDefinition {
                id,
                description: optional(&fields, "Description"),
            }))
        }
        _ => Ok(HeaderLine::Structured {
            key: key.to_string(),
            fields,
        }),
    }
}

fn required(fields: &[(String, String)], key: &str) -> std::result::Result<String, String> {
    fields
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.clone())
        .ok_or_else(|| format!("{key} field missing"))
}

fn optional(fields: &[(String, String)], key: &str) -> String {
    required(fields, key).unwrap_or_default()
}

fn field_definition(fields: &[(String, String)]) -> std::result::Result<FieldDefinition, String> {
    Ok(FieldDefinition {
        id: required(fields, "ID")?,
        number: required(fields, "Number")?.parse()?,
        field_type: required(fields, "Type")?.parse()?,
        description: optional(fields, "Description"),
    })
}

/// Splits `k=v,k="quoted, value"` on commas outside quotes.
fn split_structured(body: &str) -> std::result::Result<Vec<(String, String)>, String> {
    let mut fields = Vec::new();
    let mut key = String::new();
    let mut value = String::new();
    let mut in_value = false;
    let mut in_quotes = false;

    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' if in_quotes => {
                if let Some(escaped) = chars.next() {
                    value.push(escaped);
                }
            }
            '"' if in_value => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                push_field(&mut fields, &mut key, &mut value, in_value)?;
                in_value = false;
            }
            '=' if !in_value => in_value = true,
            _ if in_value => value.push(c),
            _ => key.push(c),
        }
    }

    if in_quotes {
        return Err(format!("unterminated quoted value in '<{body}'"));
    }
    if in_value || !key.trim().is_empty() {
        push_field(&mut fields, &mut key, &mut value, in_value)?;
    }
    Ok(fields)
}

fn push_field(
    fields: &mut Vec<(String, String)>,
    key: &mut String,
    value: &mut String,
    in_value: bool,
) -> std::result::Result<(), String> {
    let k = std::mem::take(key).trim().to_string();
    let v = std::mem::take(value);
    if k.is_empty() {
        return Err("empty key in structured header line".to_string());
    }
    if !in_value {
        return Err(format!("field '{k}' has no value"));
    }
    fields.push((k, v));
    Ok(())
}

fn parse_column_header(line: &str, line_number: usize) -> Result<Vec<String>> {
    let invalid = |message: String| VcfParseError::InvalidColumnHeader {
        line: line_number,
        message,
    };

    let columns: Vec<&str> = line.trim_end_matches(['\r', '\n']).split('\t').collect();
    if columns.len() < MANDATORY_COLUMNS.len() {
        return Err(invalid(format!(
            "expected at least {} tab-separated columns, found {}",
            MANDATORY_COLUMNS.len(),
            columns.len()
        )));
    }
    for (found, expected) in columns.iter().zip(MANDATORY_COLUMNS.iter()) {
        if found != expected {
            return Err(invalid(format!("expected column '{expected}', found '{found}'")));
        }
    }

    let Some((format, sample_columns)) = columns[MANDATORY_COLUMNS.len()..].split_first() else {
        return Ok(Vec::new());
    };
    if *format != FORMAT_COLUMN {
        return Err(invalid(format!(
            "expected column '{FORMAT_COLUMN}' before sample columns, found '{format}'"
        )));
    }

    let mut seen = HashSet::new();
    let mut samples = Vec::with_capacity(sample_columns.len());
    for sample in sample_columns {
        if sample.is_empty() {
            return Err(invalid("empty sample name".to_string()));
        }
        if !seen.insert(*sample) {
            return Err(invalid(format!("duplicate sample name '{sample}'")));
        }
        samples.push(sample.to_string());
    }
    Ok(samples)
}
