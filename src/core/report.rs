use super::{
    classification::{Classification, KnownVariants},
    header::{FieldType, Number, VcfHeader},
    record::{allele_value, VariantKey, VcfRecord},
    report_config::{Location, ReportConfig},
    transcripts::{PreferredStatus, PreferredTranscripts},
    vep::{self, VepAnnotation},
};
use crate::{constants::*, utils::util::Result};

#[derive(Debug, Clone, PartialEq)]
enum ColumnSource {
    Info {
        id: String,
        number: Number,
        is_flag: bool,
    },
    Format {
        id: String,
        number: Number,
    },
    Vep {
        index: usize,
    },
    Filter,
    Pref,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportColumn {
    pub name: String,
    source: ColumnSource,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub sample: Option<String>,
    pub variant: VariantKey,
    /// Last reference base covered by the variant
    pub end: u64,
    pub transcript: Option<String>,
    pub classification: Option<Classification>,
    pub preferred: PreferredStatus,
    values: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct VariantReport {
    pub columns: Vec<ReportColumn>,
    pub rows: Vec<ReportRow>,
    samples: Vec<String>,
    vep_field_count: usize,
    vep_allele_field: Option<usize>,
    vep_transcript_field: Option<usize>,
    expand_vep: bool,
}

impl VariantReport {
    /// Resolves the config against the header into report columns.
    pub fn new(header: &VcfHeader, config: &ReportConfig) -> Result<Self> {
        config.validate(header)?;

        let columns = config
            .entries
            .iter()
            .map(|entry| -> Result<ReportColumn> {
                let source = match entry.location {
                    Location::Info => {
                        let def = header.info(&entry.annotation).ok_or_else(|| {
                            crate::vcf_parse_error!("INFO {} not in header", entry.annotation)
                        })?;
                        ColumnSource::Info {
                            id: def.id.clone(),
                            number: def.number,
                            is_flag: def.field_type == FieldType::Flag,
                        }
                    }
                    Location::Format => {
                        let def = header.format(&entry.annotation).ok_or_else(|| {
                            crate::vcf_parse_error!("FORMAT {} not in header", entry.annotation)
                        })?;
                        ColumnSource::Format {
                            id: def.id.clone(),
                            number: def.number,
                        }
                    }
                    Location::Vep => ColumnSource::Vep {
                        index: header.vep_field_index(&entry.annotation).ok_or_else(|| {
                            crate::vcf_parse_error!("VEP field {} not in header", entry.annotation)
                        })?,
                    },
                    Location::Filter => ColumnSource::Filter,
                    Location::Pref => ColumnSource::Pref,
                };
                Ok(ReportColumn {
                    name: entry.column_name().to_string(),
                    source,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let expand_vep =
            header.has_vep() && (config.uses(Location::Vep) || config.uses(Location::Pref));

        Ok(Self {
            columns,
            rows: Vec::new(),
            samples: header.samples().to_vec(),
            vep_field_count: header.vep_fields().len(),
            vep_allele_field: header.vep_field_index(VEP_ALLELE_FIELD),
            vep_transcript_field: header.vep_field_index(VEP_TRANSCRIPT_FIELD),
            expand_vep,
        })
    }

    pub fn samples(&self) -> &[String] {
        &self.samples
    }

    /// Adds one row per reportable alt allele, carrying sample and matching VEP
    /// annotation. Returns the number of rows added.
    pub fn add_record(&mut self, record: &VcfRecord) -> usize {
        let annotations = match (self.expand_vep, record.info(VEP_INFO_ID)) {
            (true, Some(Some(csq))) => vep::parse_csq(csq, self.vep_field_count),
            _ => Vec::new(),
        };
        let vep_alleles = vep::vep_alleles(&record.reference, &record.alternates);
        let sample_slots: Vec<Option<usize>> = if self.samples.is_empty() {
            vec![None]
        } else {
            (0..self.samples.len()).map(Some).collect()
        };

        let before = self.rows.len();
        for (alt_index, _) in record.reportable_alternates() {
            let Some(variant) = record.key(alt_index) else {
                continue;
            };
            let mut matching: Vec<Option<&VepAnnotation>> = vep::annotations_for_allele(
                &annotations,
                self.vep_allele_field,
                &vep_alleles[alt_index],
            )
            .map(Some)
            .collect();
            if matching.is_empty() {
                matching.push(None);
            }

            for &sample_index in &sample_slots {
                if sample_index.is_some_and(|si| !record.carries_allele(si, alt_index)) {
                    continue;
                }
                for annotation in &matching {
                    let values = self
                        .columns
                        .iter()
                        .map(|column| cell(&column.source, record, sample_index, alt_index, *annotation))
                        .collect();
                    let transcript = annotation
                        .and_then(|a| vep::transcript(a, self.vep_transcript_field));
                    self.rows.push(ReportRow {
                        sample: sample_index.map(|si| self.samples[si].clone()),
                        variant: variant.clone(),
                        end: record.end(),
                        transcript,
                        classification: None,
                        preferred: PreferredStatus::Unknown,
                        values,
                    });
                }
            }
        }
        self.rows.len() - before
    }

    /// Labels every row's transcript; returns how many rows are preferred.
    pub fn apply_preferred_transcripts(&mut self, preferred: &PreferredTranscripts) -> usize {
        let mut count = 0;
        for row in &mut self.rows {
            row.preferred = preferred.status(row.transcript.as_deref());
            if row.preferred == PreferredStatus::Preferred {
                count += 1;
            }
        }
        count
    }

    /// Copies classifications onto matching rows; returns the number of rows classified.
    pub fn apply_known_variants(&mut self, known: &KnownVariants) -> usize {
        let mut count = 0;
        for row in &mut self.rows {
            row.classification = known.get(&row.variant);
            if row.classification.is_some() {
                count += 1;
            }
        }
        count
    }

    /// Copy of the report keeping only rows accepted by `keep`.
    pub fn filter_rows<F>(&self, keep: F) -> Self
    where
        F: Fn(&ReportRow) -> bool,
    {
        Self {
            rows: self.rows.iter().filter(|row| keep(row)).cloned().collect(),
            columns: self.columns.clone(),
            samples: self.samples.clone(),
            ..*self
        }
    }

    pub fn header_row(&self) -> Vec<&str> {
        FIXED_COLUMNS
            .iter()
            .copied()
            .chain(self.columns.iter().map(|c| c.name.as_str()))
            .collect()
    }

    pub fn render_row(&self, row: &ReportRow) -> Vec<String> {
        let mut cells = Vec::with_capacity(FIXED_COLUMNS.len() + self.columns.len());
        cells.push(row.sample.clone().unwrap_or_default());
        cells.push(row.variant.to_string());
        cells.push(
            row.classification
                .map(|c| c.label().to_string())
                .unwrap_or_default(),
        );
        for (column, value) in self.columns.iter().zip(&row.values) {
            match column.source {
                ColumnSource::Pref => cells.push(row.preferred.to_string()),
                _ => cells.push(value.clone()),
            }
        }
        cells
    }

    pub fn rows_for_sample<'a>(
        &'a self,
        sample: Option<&'a str>,
    ) -> impl Iterator<Item = &'a ReportRow> + 'a {
        self.rows
            .iter()
            .filter(move |row| row.sample.as_deref() == sample)
    }
}

fn cell(
    source: &ColumnSource,
    record: &VcfRecord,
    sample_index: Option<usize>,
    alt_index: usize,
    annotation: Option<&VepAnnotation>,
) -> String {
    let alt_count = record.alternates.len();
    match source {
        ColumnSource::Info {
            id,
            number,
            is_flag,
        } => match record.info(id) {
            None => String::new(),
            Some(None) if *is_flag => "True".to_string(),
            Some(None) => String::new(),
            Some(Some(value)) => allele_value(value, *number, alt_index, alt_count),
        },
        ColumnSource::Format { id, number } => sample_index
            .and_then(|si| record.sample_value(si, id))
            .map(|value| allele_value(value, *number, alt_index, alt_count))
            .unwrap_or_default(),
        ColumnSource::Vep { index } => annotation
            .map(|a| a.get(*index).to_string())
            .unwrap_or_default(),
        ColumnSource::Filter => record.filter.clone(),
        ColumnSource::Pref => String::new(),
    }
}
