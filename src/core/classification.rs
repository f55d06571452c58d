use super::record::VariantKey;
use crate::{error::VcfParseError, utils::util::Result};
use std::{collections::HashMap, fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Artifact,
    Benign,
    LikelyBenign,
    Vus,
    LikelyPathogenic,
    Pathogenic,
}

impl Classification {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Classification::Artifact),
            1 => Some(Classification::Benign),
            2 => Some(Classification::LikelyBenign),
            3 => Some(Classification::Vus),
            4 => Some(Classification::LikelyPathogenic),
            5 => Some(Classification::Pathogenic),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Classification::Artifact => "Artifact",
            Classification::Benign => "Benign",
            Classification::LikelyBenign => "Likely benign",
            Classification::Vus => "VUS",
            Classification::LikelyPathogenic => "Likely pathogenic",
            Classification::Pathogenic => "Pathogenic",
        }
    }
}

impl FromStr for Classification {
    type Err = VcfParseError;
    fn from_str(s: &str) -> Result<Self> {
        s.trim()
            .parse::<u8>()
            .ok()
            .and_then(Classification::from_code)
            .ok_or_else(|| VcfParseError::InvalidClassification {
                value: s.to_string(),
            })
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Default, Clone)]
pub struct KnownVariants {
    variants: HashMap<VariantKey, Classification>,
}

impl KnownVariants {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the previous classification when the key was already present.
    pub fn insert(&mut self, key: VariantKey, classification: Classification) -> Option<Classification> {
        self.variants.insert(key, classification)
    }

    pub fn get(&self, key: &VariantKey) -> Option<Classification> {
        self.variants.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }
}
