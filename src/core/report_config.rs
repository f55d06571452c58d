use super::header::VcfHeader;
use crate::{constants::*, error::VcfParseError, utils::util::Result};
use std::{collections::HashMap, fmt, str::FromStr};

/// Where the value of a report column comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Info,
    Format,
    Vep,
    Filter,
    Pref,
}

impl FromStr for Location {
    type Err = VcfParseError;
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "info" => Ok(Location::Info),
            "format" => Ok(Location::Format),
            "vep" => Ok(Location::Vep),
            "filter" => Ok(Location::Filter),
            "pref" => Ok(Location::Pref),
            _ => Err(VcfParseError::InvalidLocation {
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Info => write!(f, "info"),
            Location::Format => write!(f, "format"),
            Location::Vep => write!(f, "vep"),
            Location::Filter => write!(f, "filter"),
            Location::Pref => write!(f, "pref"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConfigEntry {
    pub annotation: String,
    pub location: Location,
    pub alias: Option<String>,
}

impl ConfigEntry {
    pub fn new(annotation: impl Into<String>, location: Location) -> Self {
        Self {
            annotation: annotation.into(),
            location,
            alias: None,
        }
    }

    pub fn column_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.annotation)
    }

    /// Parses one tab-separated config row; blank and `#` lines yield `None`.
    pub fn parse_line(line: &str, line_number: usize) -> Result<Option<Self>> {
        let trimmed = line.trim_end_matches(['\r', '\n']);
        if trimmed.trim().is_empty() || trimmed.starts_with('#') {
            return Ok(None);
        }
        let columns: Vec<&str> = trimmed.split('\t').collect();
        let (annotation, location, alias) = match &columns[..] {
            [annotation, location] => (*annotation, *location, None),
            [annotation, location, alias] => (*annotation, *location, Some(*alias)),
            _ => {
                return Err(crate::vcf_parse_error!(
                    "Config line {}: expected 2 or 3 tab-separated columns, found {}",
                    line_number,
                    columns.len()
                ))
            }
        };
        if annotation.is_empty() {
            return Err(crate::vcf_parse_error!(
                "Config line {}: empty annotation name",
                line_number
            ));
        }
        let location = location
            .parse::<Location>()
            .map_err(|e| crate::vcf_parse_error!("Config line {}: {}", line_number, e))?;
        let alias = alias
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(str::to_string);

        Ok(Some(Self {
            annotation: annotation.to_string(),
            location,
            alias,
        }))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportConfig {
    pub entries: Vec<ConfigEntry>,
}

impl ReportConfig {
    pub fn new(entries: Vec<ConfigEntry>) -> Self {
        Self { entries }
    }

    /// Every annotation the header offers, in header order.
    pub fn from_header(header: &VcfHeader) -> Self {
        let mut entries = vec![
            ConfigEntry::new(DEFAULT_FILTER_ANNOTATION, Location::Filter),
            ConfigEntry::new(DEFAULT_PREF_ANNOTATION, Location::Pref),
        ];
        entries.extend(
            header
                .infos()
                .filter(|def| def.id != VEP_INFO_ID)
                .map(|def| ConfigEntry::new(def.id.clone(), Location::Info)),
        );
        entries.extend(
            header
                .formats()
                .map(|def| ConfigEntry::new(def.id.clone(), Location::Format)),
        );
        entries.extend(
            header
                .vep_fields()
                .iter()
                .map(|field| ConfigEntry::new(field.clone(), Location::Vep)),
        );

        // INFO and FORMAT may share an ID (e.g. DP); suffix the location onto both
        let mut name_counts: HashMap<String, usize> = HashMap::new();
        for entry in &entries {
            *name_counts.entry(entry.annotation.clone()).or_insert(0) += 1;
        }
        for entry in &mut entries {
            if name_counts.get(&entry.annotation).is_some_and(|&n| n > 1) {
                entry.alias = Some(format!("{}_{}", entry.annotation, entry.location));
            }
        }
        Self { entries }
    }

    pub fn validate(&self, header: &VcfHeader) -> Result<()> {
        if self.entries.is_empty() {
            return Err(crate::vcf_parse_error!("Config contains no annotations"));
        }
        for entry in &self.entries {
            let found = match entry.location {
                Location::Info => header.info(&entry.annotation).is_some(),
                Location::Format => header.format(&entry.annotation).is_some(),
                Location::Vep => header.vep_field_index(&entry.annotation).is_some(),
                Location::Filter | Location::Pref => true,
            };
            if !found {
                return Err(VcfParseError::MissingAnnotation {
                    annotation: entry.annotation.clone(),
                    location: entry.location.to_string(),
                });
            }
        }
        Ok(())
    }

    /// `annotation<TAB>location[<TAB>alias]` lines, loadable again as a config file.
    pub fn listing(&self) -> String {
        self.entries
            .iter()
            .map(|entry| match &entry.alias {
                Some(alias) => format!("{}\t{}\t{}\n", entry.annotation, entry.location, alias),
                None => format!("{}\t{}\n", entry.annotation, entry.location),
            })
            .collect()
    }

    pub fn uses(&self, location: Location) -> bool {
        self.entries.iter().any(|entry| entry.location == location)
    }
}
