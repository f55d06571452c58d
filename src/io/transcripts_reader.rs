use super::readers::{numbered_lines, open_text_reader};
use crate::{
    core::transcripts::{PreferredTranscripts, Strictness},
    utils::util::Result,
};
use std::path::Path;

/// Reads a tab-separated preferred transcripts file, transcripts in the second column.
pub fn read_preferred_transcripts(
    path: &Path,
    strictness: Strictness,
) -> Result<PreferredTranscripts> {
    let reader = open_text_reader(path)?;
    let mut transcripts = Vec::new();
    for line in numbered_lines(reader, path) {
        let (line_number, line) = line?;
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }
        let transcript = line
            .split('\t')
            .nth(1)
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                crate::vcf_parse_error!(
                    "Preferred transcripts line {} of {} has no transcript in the second column",
                    line_number,
                    path.display()
                )
            })?;
        transcripts.push(transcript.to_string());
    }

    let preferred = PreferredTranscripts::new(transcripts, strictness);
    if preferred.is_empty() {
        log::warn!(
            "No preferred transcripts found in {}, every transcript will be labelled 'False'",
            path.display()
        );
    }
    log::info!(
        "Loaded {} preferred transcripts from {} (strictness: {:?})",
        preferred.len(),
        path.display(),
        strictness
    );
    Ok(preferred)
}
