use super::readers::open_text_reader;
use crate::{
    core::{
        header::{HeaderParser, VcfHeader},
        record::VcfRecord,
    },
    error::VcfParseError,
    utils::util::Result,
};
use std::{
    io::{BufRead, BufReader, Read},
    path::{Path, PathBuf},
};

const UTF8_BOM: char = '\u{feff}';

/// Streaming VCF text reader: the header is parsed on open, records on demand.
pub struct VcfReader {
    path: PathBuf,
    reader: BufReader<Box<dyn Read + Send>>,
    header: VcfHeader,
    line_number: usize,
    buffer: String,
}

impl VcfReader {
    pub fn from_path(path: &Path) -> Result<Self> {
        log::trace!("Start loading VCF {:?}", path);
        let reader = open_text_reader(path)?;
        let vcf = Self::from_buf_reader(reader, path)?;
        log::trace!(
            "Finished loading VCF header {:?}: {} header lines, {} sample(s)",
            path,
            vcf.header.lines.len(),
            vcf.header.sample_count()
        );
        Ok(vcf)
    }

    pub fn from_reader<R: Read + Send + 'static>(reader: R, source: &Path) -> Result<Self> {
        Self::from_buf_reader(BufReader::new(Box::new(reader)), source)
    }

    fn from_buf_reader(mut reader: BufReader<Box<dyn Read + Send>>, source: &Path) -> Result<Self> {
        let mut parser = HeaderParser::new();
        let mut line_number = 0;
        let mut buffer = String::new();

        let header = loop {
            buffer.clear();
            let n = reader.read_line(&mut buffer).map_err(|e| {
                crate::vcf_parse_error!(
                    "Error reading VCF header from {} at line {}: {}",
                    source.display(),
                    line_number + 1,
                    e
                )
            })?;
            if n == 0 {
                return Err(VcfParseError::MissingColumnHeader {
                    path: source.to_path_buf(),
                });
            }
            line_number += 1;

            let mut line = buffer.trim_end_matches(['\r', '\n']);
            if line_number == 1 {
                line = line.trim_start_matches(UTF8_BOM);
            }
            if line.starts_with("##") {
                parser.push_meta_line(line, line_number)?;
            } else if line.starts_with('#') {
                break parser.finish(line, line_number)?;
            } else if line.trim().is_empty() {
                log::debug!("Skipping blank line {} in VCF header", line_number);
            } else {
                return Err(VcfParseError::MalformedHeader {
                    line: line_number,
                    message: "data line found before the #CHROM column header".to_string(),
                });
            }
        };

        Ok(VcfReader {
            path: source.to_path_buf(),
            reader,
            header,
            line_number,
            buffer,
        })
    }

    pub fn header(&self) -> &VcfHeader {
        &self.header
    }

    /// Next data record, `None` at end of input. Blank lines are skipped.
    pub fn next_record(&mut self) -> Result<Option<VcfRecord>> {
        loop {
            self.buffer.clear();
            let n = self.reader.read_line(&mut self.buffer).map_err(|e| {
                crate::vcf_parse_error!(
                    "Error reading record from {} at line {}: {}",
                    self.path.display(),
                    self.line_number + 1,
                    e
                )
            })?;
            if n == 0 {
                return Ok(None);
            }
            self.line_number += 1;

            let line = self.buffer.trim_end_matches(['\r', '\n']);
            if line.trim().is_empty() {
                continue;
            }
            if line.starts_with('#') {
                return Err(VcfParseError::MalformedRecord {
                    line: self.line_number,
                    message: "header line found after the #CHROM column header".to_string(),
                });
            }
            return VcfRecord::from_line(line, self.header.sample_count(), self.line_number)
                .map(Some);
        }
    }

    pub fn records(&mut self) -> impl Iterator<Item = Result<VcfRecord>> + '_ {
        std::iter::from_fn(move || self.next_record().transpose())
    }
}
