use clap::ValueEnum;
use std::{collections::HashSet, fmt};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Strictness {
    /// Transcripts must match exactly, including the version
    High,
    /// Transcripts match regardless of the version after the final '.'
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PreferredStatus {
    Preferred,
    NotPreferred,
    #[default]
    Unknown,
}

impl fmt::Display for PreferredStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreferredStatus::Preferred => write!(f, "True"),
            PreferredStatus::NotPreferred => write!(f, "False"),
            PreferredStatus::Unknown => write!(f, "Unknown"),
        }
    }
}

/// `NM_001007553.2` -> `NM_001007553`
pub fn strip_version(transcript: &str) -> &str {
    match transcript.rsplit_once('.') {
        Some((base, version)) if !base.is_empty() && version.chars().all(|c| c.is_ascii_digit()) => {
            base
        }
        _ => transcript,
    }
}

#[derive(Debug, Clone)]
pub struct PreferredTranscripts {
    transcripts: HashSet<String>,
    strictness: Strictness,
}

impl PreferredTranscripts {
    pub fn new<I, S>(transcripts: I, strictness: Strictness) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let transcripts = transcripts
            .into_iter()
            .map(|t| Self::normalize(t.as_ref(), strictness).to_string())
            .collect();
        Self {
            transcripts,
            strictness,
        }
    }

    fn normalize(transcript: &str, strictness: Strictness) -> &str {
        let transcript = transcript.trim();
        match strictness {
            Strictness::High => transcript,
            Strictness::Low => strip_version(transcript),
        }
    }

    pub fn len(&self) -> usize {
        self.transcripts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transcripts.is_empty()
    }

    pub fn status(&self, transcript: Option<&str>) -> PreferredStatus {
        match transcript {
            None => PreferredStatus::Unknown,
            Some(t) if self.transcripts.contains(Self::normalize(t, self.strictness)) => {
                PreferredStatus::Preferred
            }
            Some(_) => PreferredStatus::NotPreferred,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_version() {
        assert_eq!(strip_version("NM_001007553.2"), "NM_001007553");
        assert_eq!(strip_version("NM_001007553"), "NM_001007553");
        assert_eq!(strip_version("ENST00000380152.7"), "ENST00000380152");
        assert_eq!(strip_version("odd.name"), "odd.name");
    }

    #[test]
    fn test_status_high_strictness() {
        let pt = PreferredTranscripts::new(["NM_001007553.1"], Strictness::High);
        assert_eq!(pt.status(Some("NM_001007553.1")), PreferredStatus::Preferred);
        assert_eq!(pt.status(Some("NM_001007553.2")), PreferredStatus::NotPreferred);
        assert_eq!(pt.status(None), PreferredStatus::Unknown);
    }

    #[test]
    fn test_status_low_strictness() {
        let pt = PreferredTranscripts::new(["NM_001007553.1", "NM_000059.3"], Strictness::Low);
        assert_eq!(pt.len(), 2);
        assert_eq!(pt.status(Some("NM_001007553.2")), PreferredStatus::Preferred);
        assert_eq!(pt.status(Some("NM_001007553")), PreferredStatus::Preferred);
        assert_eq!(pt.status(Some("NM_000060.1")), PreferredStatus::NotPreferred);
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(PreferredStatus::Preferred.to_string(), "True");
        assert_eq!(PreferredStatus::NotPreferred.to_string(), "False");
        assert_eq!(PreferredStatus::default().to_string(), "Unknown");
    }
}
