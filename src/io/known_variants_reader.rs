use super::vcf_reader::VcfReader;
use crate::{
    constants::CLASSIFICATION_INFO_ID,
    core::classification::{Classification, KnownVariants},
    utils::util::Result,
};
use std::path::Path;

/// Loads classified variants from a VCF carrying an INFO `Classification` code per alt.
pub fn read_known_variants(path: &Path) -> Result<KnownVariants> {
    let mut reader = VcfReader::from_path(path)?;
    let mut known = KnownVariants::new();
    let mut skipped = 0usize;

    for record in reader.records() {
        let record = record?;
        let Some(Some(value)) = record.info(CLASSIFICATION_INFO_ID) else {
            log::warn!(
                "Known variant {}:{} has no {} annotation, skipping",
                record.chrom,
                record.pos,
                CLASSIFICATION_INFO_ID
            );
            skipped += 1;
            continue;
        };

        let codes: Vec<&str> = value.split(',').collect();
        for (alt_index, _) in record.alternates.iter().enumerate() {
            let code = if codes.len() == record.alternates.len() {
                codes[alt_index]
            } else {
                value
            };
            let classification: Classification = code.parse().map_err(|e| {
                crate::vcf_parse_error!(
                    "Known variant {}:{} in {}: {}",
                    record.chrom,
                    record.pos,
                    path.display(),
                    e
                )
            })?;
            if let Some(key) = record.key(alt_index) {
                if let Some(previous) = known.insert(key.clone(), classification) {
                    log::debug!(
                        "Known variant {} listed more than once ({} replaced by {})",
                        key,
                        previous,
                        classification
                    );
                }
            }
        }
    }

    if known.is_empty() {
        log::warn!("No classified variants found in {}", path.display());
    }
    log::info!(
        "Loaded {} known variants from {} ({} skipped)",
        known.len(),
        path.display(),
        skipped
    );
    Ok(known)
}
