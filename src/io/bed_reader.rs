use super::readers::{numbered_lines, open_text_reader};
use crate::{
    constants::BED_EXTENSIONS,
    core::containers::interval_tree::{Interval, IntervalTree},
    utils::util::{strip_extensions, Result},
};
use std::{
    collections::{HashMap, HashSet},
    path::{Path, PathBuf},
};

/// Region name from the BED 4th column, if any.
pub type RegionName = Option<String>;

pub type BedIntervalTree = IntervalTree<u64, RegionName>;

/// Converts a 0-based half-open BED line into a 1-based closed interval.
/// Returns `None` for zero-length regions.
pub fn line_to_interval(line: &str) -> Result<Option<(String, Interval<u64, RegionName>)>> {
    const MIN_FIELD_COUNT: usize = 3;
    let split_line: Vec<&str> = line.split_whitespace().collect();
    if split_line.len() < MIN_FIELD_COUNT {
        return Err(crate::vcf_parse_error!(
            "Expected at least {} fields in the format 'chrom start end [name]', found {}: {}",
            MIN_FIELD_COUNT,
            split_line.len(),
            line
        ));
    }

    let chrom = split_line[0];
    let start: u64 = split_line[1]
        .parse()
        .map_err(|e| crate::vcf_parse_error!("Invalid start position '{}': {}", split_line[1], e))?;
    let end: u64 = split_line[2]
        .parse()
        .map_err(|e| crate::vcf_parse_error!("Invalid end position '{}': {}", split_line[2], e))?;
    if end < start {
        return Err(crate::vcf_parse_error!(
            "End position {} is before start position {}",
            end,
            start
        ));
    }
    if end == start {
        return Ok(None);
    }

    let name = split_line
        .get(3)
        .filter(|name| !name.is_empty())
        .map(|name| name.to_string());
    Ok(Some((chrom.to_owned(), Interval::new(start + 1, end, name))))
}

fn is_comment(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty()
        || trimmed.starts_with('#')
        || trimmed.starts_with("track")
        || trimmed.starts_with("browser")
}

pub struct BedMap {
    pub name: String,
    pub interval_map: HashMap<String, BedIntervalTree>,
    pub region_count: usize,
}

impl BedMap {
    pub fn new<P: AsRef<Path>>(bed_path: P) -> Result<Self> {
        let bed_path = bed_path.as_ref();
        let reader = open_text_reader(bed_path)?;
        let mut interval_map: HashMap<String, Vec<Interval<u64, RegionName>>> = HashMap::new();
        let mut region_count = 0;

        for result_line in numbered_lines(reader, bed_path) {
            let (line_number, line) = result_line?;
            if is_comment(&line) {
                continue;
            }
            let parsed = line_to_interval(&line)
                .map_err(|e| crate::vcf_parse_error!("Error at BED line {}: {}", line_number, e))?;
            match parsed {
                Some((chrom, interval)) => {
                    interval_map.entry(chrom).or_default().push(interval);
                    region_count += 1;
                }
                None => log::warn!(
                    "Skipping zero-length region at {} line {}",
                    bed_path.display(),
                    line_number
                ),
            }
        }

        let interval_trees: HashMap<String, BedIntervalTree> = interval_map
            .into_iter()
            .map(|(chrom, intervals)| (chrom, IntervalTree::new(intervals)))
            .collect();

        log::debug!(
            "Loaded {} region(s) on {} contig(s) from {}",
            region_count,
            interval_trees.len(),
            bed_path.display()
        );
        Ok(BedMap {
            name: strip_extensions(bed_path, &BED_EXTENSIONS),
            interval_map: interval_trees,
            region_count,
        })
    }

    /// Whether the 1-based closed span `[start, end]` on `chrom` touches any region.
    pub fn overlaps(&self, chrom: &str, start: u64, end: u64) -> bool {
        self.interval_map
            .get(chrom)
            .is_some_and(|tree| tree.overlaps_any(start, end))
    }
}

/// BED files (`*.bed`, `*.bed.gz`) directly inside `folder`, sorted by name.
/// Two files sharing a stem (`a.bed`, `a.bed.gz`) would write the same reports and are rejected.
pub fn list_bed_files(folder: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(folder).map_err(|e| {
        crate::vcf_parse_error!("Failed to read BED folder {}: {}", folder.display(), e)
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry?.path();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        if path.is_file() && (name.ends_with(".bed") || name.ends_with(".bed.gz")) {
            paths.push(path);
        }
    }
    paths.sort();

    let mut stems = HashSet::new();
    for path in &paths {
        let stem = strip_extensions(path, &BED_EXTENSIONS);
        if !stems.insert(stem.clone()) {
            return Err(crate::vcf_parse_error!(
                "BED folder {} holds more than one BED file named '{}'",
                folder.display(),
                stem
            ));
        }
    }
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    #[test]
    fn test_line_to_interval_valid() {
        let (chrom, interval) = line_to_interval("chr1\t100\t200\tBRCA2_ex11")
            .unwrap()
            .unwrap();
        assert_eq!(chrom, "chr1");
        assert_eq!(interval.start, 101);
        assert_eq!(interval.stop, 200);
        assert_eq!(interval.value.as_deref(), Some("BRCA2_ex11"));

        let (_, interval) = line_to_interval("chr1\t0\t1").unwrap().unwrap();
        assert_eq!((interval.start, interval.stop), (1, 1));
        assert_eq!(interval.value, None);
    }

    #[test]
    fn test_line_to_interval_invalid() {
        assert!(line_to_interval("chr1\t100").is_err());
        assert!(line_to_interval("chr1\tabc\t200").is_err());
        assert!(line_to_interval("chr1\t100\txyz").is_err());
        assert!(line_to_interval("chr1\t200\t100").is_err());
        assert!(line_to_interval("chr1\t100\t100").unwrap().is_none());
    }

    #[test]
    fn test_line_to_interval_space_separated() {
        let (chrom, interval) = line_to_interval("chr1 100  200 exon_3").unwrap().unwrap();
        assert_eq!(chrom, "chr1");
        assert_eq!((interval.start, interval.stop), (101, 200));
        assert_eq!(interval.value.as_deref(), Some("exon_3"));
    }

    #[test]
    fn test_bed_map_overlaps() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        writeln!(temp_file, "track name=panel")?;
        writeln!(temp_file, "# comment")?;
        writeln!(temp_file, "chr1\t10\t20\tregion1")?;
        writeln!(temp_file, "chr2\t30\t40")?;
        writeln!(temp_file, "chr1\t50\t50")?;
        temp_file.flush()?;

        let bed_map = BedMap::new(temp_file.path())?;
        assert_eq!(bed_map.interval_map.len(), 2);
        assert_eq!(bed_map.region_count, 2);

        // BED 10-20 covers 1-based positions 11..=20
        assert!(!bed_map.overlaps("chr1", 10, 10));
        assert!(bed_map.overlaps("chr1", 11, 11));
        assert!(bed_map.overlaps("chr1", 20, 20));
        assert!(!bed_map.overlaps("chr1", 21, 21));
        assert!(bed_map.overlaps("chr1", 8, 12));
        assert!(!bed_map.overlaps("chr1", 50, 50));
        assert!(bed_map.overlaps("chr2", 35, 36));
        assert!(!bed_map.overlaps("chr3", 35, 36));
        Ok(())
    }

    #[test]
    fn test_bed_map_bad_line_reports_line_number() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        writeln!(temp_file, "chr1\t10\t20")?;
        writeln!(temp_file, "chr1\tten\t20")?;
        temp_file.flush()?;
        let err = BedMap::new(temp_file.path()).err().unwrap();
        assert!(err.to_string().contains("BED line 2"));
        Ok(())
    }

    #[test]
    fn test_bed_map_name_and_empty_file() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("cancer_panel.bed");
        std::fs::write(&path, "")?;
        let bed_map = BedMap::new(&path)?;
        assert_eq!(bed_map.name, "cancer_panel");
        assert!(bed_map.interval_map.is_empty());
        Ok(())
    }

    #[test]
    fn test_list_bed_files() -> Result<()> {
        let dir = tempdir()?;
        for name in ["b.bed", "a.BED", "c.bed.gz", "notes.txt"] {
            std::fs::write(dir.path().join(name), "")?;
        }
        std::fs::create_dir(dir.path().join("nested.bed"))?;
        let names: Vec<String> = list_bed_files(dir.path())?
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["a.BED", "b.bed", "c.bed.gz"]);
        Ok(())
    }

    #[test]
    fn test_list_bed_files_rejects_shared_stem() -> Result<()> {
        let dir = tempdir()?;
        for name in ["a.bed", "a.bed.gz", "b.bed"] {
            std::fs::write(dir.path().join(name), "")?;
        }
        let err = list_bed_files(dir.path()).err().unwrap();
        assert!(err.to_string().contains("'a'"));
        Ok(())
    }
}
