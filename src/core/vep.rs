/// One `|`-delimited CSQ entry, aligned with the header's VEP sub-fields.
#[derive(Debug, Clone, PartialEq)]
pub struct VepAnnotation {
    values: Vec<String>,
}

impl VepAnnotation {
    pub fn get(&self, field_index: usize) -> &str {
        self.values.get(field_index).map_or("", String::as_str)
    }
}

pub fn parse_csq(value: &str, field_count: usize) -> Vec<VepAnnotation> {
    value
        .split(',')
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let mut values: Vec<String> = entry.split('|').map(str::to_string).collect();
            if values.len() != field_count {
                log::trace!(
                    "CSQ entry has {} sub-fields, header declares {}: {}",
                    values.len(),
                    field_count,
                    entry
                );
            }
            values.resize(field_count.max(values.len()), String::new());
            VepAnnotation { values }
        })
        .collect()
}

/// VEP allele strings for `alternates`: the shared first base of indels is trimmed
/// and an empty allele is written as `-`.
pub fn vep_alleles(reference: &str, alternates: &[String]) -> Vec<String> {
    let first = reference.as_bytes().first();
    let shares_first_base = alternates
        .iter()
        .all(|alt| alt.as_bytes().first() == first);
    let any_length_differs = alternates.iter().any(|alt| alt.len() != reference.len());

    alternates
        .iter()
        .map(|alt| {
            if shares_first_base && any_length_differs {
                match alt.get(1..).unwrap_or_default() {
                    "" => "-".to_string(),
                    trimmed => trimmed.to_string(),
                }
            } else {
                alt.clone()
            }
        })
        .collect()
}

/// Annotations that describe the given alternate allele. Without an `Allele`
/// sub-field every annotation applies.
pub fn annotations_for_allele<'a>(
    annotations: &'a [VepAnnotation],
    allele_field: Option<usize>,
    vep_allele: &'a str,
) -> impl Iterator<Item = &'a VepAnnotation> {
    annotations
        .iter()
        .filter(move |annotation| allele_field.is_none_or(|i| annotation.get(i) == vep_allele))
}

/// Transcript ID of an annotation, `None` without a Feature field or when it is empty.
pub fn transcript(annotation: &VepAnnotation, transcript_field: Option<usize>) -> Option<String> {
    let value = annotation.get(transcript_field?);
    (!value.is_empty()).then(|| value.to_string())
}
