use crate::{error::VcfParseError, utils::util::Result};
use flate2::read::MultiGzDecoder;
use std::{
    fs::File,
    io::{BufRead, BufReader, Read as ioRead},
    path::Path,
};

fn is_gzipped(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();
    path_str.ends_with(".gz") || path_str.ends_with(".gzip") || path_str.ends_with(".bgz")
}

/// Opens a plain or gzip/BGZF compressed text file, chosen by extension.
pub fn open_text_reader(path: &Path) -> Result<BufReader<Box<dyn ioRead + Send>>> {
    let file = File::open(path).map_err(|error| {
        crate::vcf_parse_error!("Failed to open file {}: {error}", path.display())
    })?;
    if is_gzipped(path) {
        let gz_decoder = MultiGzDecoder::new(file);
        if gz_decoder.header().is_some() {
            Ok(BufReader::new(Box::new(gz_decoder)))
        } else {
            Err(VcfParseError::InvalidGzipHeader {
                path: path.to_path_buf(),
            })
        }
    } else {
        Ok(BufReader::new(Box::new(file)))
    }
}

/// Iterates over the lines of a text file with 1-based line numbers, attaching
/// the path and line number to read errors.
pub fn numbered_lines<'a>(
    reader: impl BufRead + 'a,
    path: &'a Path,
) -> impl Iterator<Item = Result<(usize, String)>> + 'a {
    reader.lines().enumerate().map(move |(i, line)| {
        line.map(|line| (i + 1, line)).map_err(|e| {
            crate::vcf_parse_error!(
                "Error reading {} at line {}: {}",
                path.display(),
                i + 1,
                e
            )
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::{write::GzEncoder, Compression};
    use std::io::{Read, Write};
    use tempfile::tempdir;

    #[test]
    fn open_text_reader_reads_plain_file() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("plain.txt");
        std::fs::write(&path, "a\nb\n")?;
        let lines: Vec<(usize, String)> =
            numbered_lines(open_text_reader(&path)?, &path).collect::<Result<_>>()?;
        assert_eq!(lines, [(1, "a".to_string()), (2, "b".to_string())]);
        Ok(())
    }

    #[test]
    fn open_text_reader_decompresses_gzip() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("compressed.vcf.gz");
        let mut encoder = GzEncoder::new(std::fs::File::create(&path)?, Compression::default());
        encoder.write_all(b"##fileformat=VCFv4.2\n")?;
        encoder.finish()?;

        let mut text = String::new();
        open_text_reader(&path)?.read_to_string(&mut text)?;
        assert_eq!(text, "##fileformat=VCFv4.2\n");
        Ok(())
    }

    #[test]
    fn open_text_reader_rejects_invalid_gzip() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("not_really.vcf.gz");
        std::fs::write(&path, "plain text")?;
        let err = open_text_reader(&path).err().unwrap();
        assert!(matches!(err, VcfParseError::InvalidGzipHeader { .. }));
        Ok(())
    }

    #[test]
    fn open_text_reader_reports_missing_file() {
        let dir = tempdir().expect("temp dir should be created");
        assert!(open_text_reader(&dir.path().join("missing.vcf")).is_err());
    }
}
