use super::header::Number;
use crate::{constants::*, error::VcfParseError, utils::util::Result};
use std::fmt;

/// Identity of a single alternate allele, used to join report rows with known variants.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VariantKey {
    pub chrom: String,
    pub pos: u64,
    pub reference: String,
    pub alternate: String,
}

impl fmt::Display for VariantKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}{}>{}",
            self.chrom, self.pos, self.reference, self.alternate
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VcfRecord {
    pub chrom: String,
    pub pos: u64,
    pub id: String,
    pub reference: String,
    pub alternates: Vec<String>,
    pub qual: String,
    pub filter: String,
    info: Vec<(String, Option<String>)>,
    format_keys: Vec<String>,
    samples: Vec<Vec<String>>,
}

impl VcfRecord {
    pub fn from_line(line: &str, sample_count: usize, line_number: usize) -> Result<Self> {
        let malformed = |message: String| VcfParseError::MalformedRecord {
            line: line_number,
            message,
        };

        let columns: Vec<&str> = line.trim_end_matches(['\r', '\n']).split('\t').collect();
        let expected = MANDATORY_COLUMNS.len() + if sample_count > 0 { 1 + sample_count } else { 0 };
        let sites_only_with_format = sample_count == 0 && columns.len() == expected + 1;
        if columns.len() != expected && !sites_only_with_format {
            return Err(malformed(format!(
                "expected {} tab-separated columns for {} sample(s), found {}",
                expected,
                sample_count,
                columns.len()
            )));
        }

        let pos: u64 = columns[1]
            .parse()
            .map_err(|e| malformed(format!("invalid POS '{}': {}", columns[1], e)))?;
        if pos == 0 {
            return Err(malformed("POS must be >= 1".to_string()));
        }
        if pos > MAX_POSITION {
            return Err(malformed(format!(
                "POS {} exceeds the maximum of {}",
                pos, MAX_POSITION
            )));
        }
        if columns[3].is_empty() {
            return Err(malformed("empty REF".to_string()));
        }

        let alternates = match columns[4] {
            MISSING_VALUE => Vec::new(),
            alts => alts.split(',').map(str::to_string).collect(),
        };

        let info = match columns[7] {
            MISSING_VALUE | "" => Vec::new(),
            info => info
                .split(';')
                .filter(|entry| !entry.is_empty())
                .map(|entry| match entry.split_once('=') {
                    Some((key, value)) => (key.to_string(), Some(value.to_string())),
                    None => (entry.to_string(), None),
                })
                .collect(),
        };

        let (format_keys, samples) = match columns.get(MANDATORY_COLUMNS.len()) {
            Some(format) if sample_count > 0 => {
                let keys: Vec<String> = format.split(':').map(str::to_string).collect();
                let samples = columns[MANDATORY_COLUMNS.len() + 1..]
                    .iter()
                    .map(|sample| sample.split(':').map(str::to_string).collect())
                    .collect();
                (keys, samples)
            }
            _ => (Vec::new(), Vec::new()),
        };

        Ok(VcfRecord {
            chrom: columns[0].to_string(),
            pos,
            id: columns[2].to_string(),
            reference: columns[3].to_string(),
            alternates,
            qual: columns[5].to_string(),
            filter: columns[6].to_string(),
            info,
            format_keys,
            samples,
        })
    }

    pub fn is_pass(&self) -> bool {
        self.filter == PASS_FILTER
    }

    /// Last reference base covered by the record.
    pub fn end(&self) -> u64 {
        self.pos + self.reference.len() as u64 - 1
    }

    pub fn key(&self, alt_index: usize) -> Option<VariantKey> {
        self.alternates.get(alt_index).map(|alt| VariantKey {
            chrom: self.chrom.clone(),
            pos: self.pos,
            reference: self.reference.clone(),
            alternate: alt.clone(),
        })
    }

    /// Alternate alleles that can appear in a report: `*` and `.` are skipped.
    pub fn reportable_alternates(&self) -> impl Iterator<Item = (usize, &str)> {
        self.alternates
            .iter()
            .enumerate()
            .filter(|(_, alt)| *alt != SPANNING_DELETION && *alt != MISSING_VALUE)
            .map(|(i, alt)| (i, alt.as_str()))
    }

    /// `None` when the key is absent, `Some(None)` for a flag.
    pub fn info(&self, key: &str) -> Option<Option<&str>> {
        self.info
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_deref())
    }

    pub fn sample_value(&self, sample_index: usize, key: &str) -> Option<&str> {
        let field_index = self.format_keys.iter().position(|k| k == key)?;
        self.samples
            .get(sample_index)?
            .get(field_index)
            .map(String::as_str)
    }

    pub fn genotype(&self, sample_index: usize) -> Option<Genotype> {
        self.sample_value(sample_index, GENOTYPE_FORMAT_ID)
            .map(Genotype::parse)
    }

    /// A sample without a called genotype is treated as carrying every allele.
    pub fn carries_allele(&self, sample_index: usize, alt_index: usize) -> bool {
        match self.genotype(sample_index) {
            Some(gt) if !gt.is_missing() => gt.contains(alt_index + 1),
            _ => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Genotype {
    pub alleles: Vec<Option<usize>>,
}

impl Genotype {
    pub fn parse(s: &str) -> Self {
        let alleles = s
            .split(['/', '|'])
            .map(|allele| allele.parse::<usize>().ok())
            .collect();
        Self { alleles }
    }

    pub fn is_missing(&self) -> bool {
        self.alleles.iter().all(Option::is_none)
    }

    pub fn contains(&self, allele_index: usize) -> bool {
        self.alleles.contains(&Some(allele_index))
    }
}

/// Narrows a comma-separated INFO/FORMAT value to what concerns one alternate allele.
pub fn allele_value(value: &str, number: Number, alt_index: usize, alt_count: usize) -> String {
    if value == MISSING_VALUE {
        return String::new();
    }
    let items: Vec<&str> = value.split(',').collect();
    let selected = match number {
        Number::PerAltAllele if items.len() == alt_count => items[alt_index].to_string(),
        Number::PerAllele if items.len() == alt_count + 1 => {
            format!("{},{}", items[0], items[alt_index + 1])
        }
        _ => value.to_string(),
    };
    if selected == MISSING_VALUE {
        String::new()
    } else {
        selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINE: &str =
        "1\t12345\trs1\tA\tG,T\t50\tPASS\tDP=30;AF=0.25,0.5;DB\tGT:AD:DP\t0/1:10,8,2:20\t1|2:.:15";

    #[test]
    fn test_from_line() {
        let record = VcfRecord::from_line(LINE, 2, 20).unwrap();
        assert_eq!(record.chrom, "1");
        assert_eq!(record.pos, 12345);
        assert_eq!(record.alternates, ["G", "T"]);
        assert!(record.is_pass());
        assert_eq!(record.info("DP"), Some(Some("30")));
        assert_eq!(record.info("DB"), Some(None));
        assert_eq!(record.info("MQ"), None);
        assert_eq!(record.sample_value(0, "AD"), Some("10,8,2"));
        assert_eq!(record.sample_value(1, "AD"), Some("."));
        assert_eq!(record.sample_value(1, "GQ"), None);
        assert_eq!(record.sample_value(2, "DP"), None);
        assert_eq!(record.end(), 12345);
    }

    #[test]
    fn test_from_line_errors() {
        assert!(matches!(
            VcfRecord::from_line(LINE, 1, 20),
            Err(VcfParseError::MalformedRecord { line: 20, .. })
        ));
        assert!(VcfRecord::from_line("1\t12345\t.\tA\tG", 0, 1).is_err());
        assert!(VcfRecord::from_line("1\tpos\t.\tA\tG\t.\tPASS\t.", 0, 1).is_err());
        assert!(VcfRecord::from_line("1\t0\t.\tA\tG\t.\tPASS\t.", 0, 1).is_err());
    }

    #[test]
    fn test_pos_above_vcf_limit_is_rejected() {
        for pos in ["18446744073709551615", "2147483648"] {
            let line = format!("1\t{pos}\t.\tAC\tG\t.\tPASS\t.");
            assert!(matches!(
                VcfRecord::from_line(&line, 0, 7),
                Err(VcfParseError::MalformedRecord { line: 7, .. })
            ));
        }
        let record = VcfRecord::from_line("1\t2147483647\t.\tAC\tG\t.\tPASS\t.", 0, 7).unwrap();
        assert_eq!(record.end(), 2_147_483_648);
    }

    #[test]
    fn test_trailing_sample_fields_dropped() {
        let line = "1\t10\t.\tA\tG\t.\tPASS\t.\tGT:AD:DP\t0/1\t0/0:5,0";
        let record = VcfRecord::from_line(line, 2, 3).unwrap();
        assert_eq!(record.sample_value(0, "GT"), Some("0/1"));
        assert_eq!(record.sample_value(0, "AD"), None);
        assert_eq!(record.sample_value(0, "DP"), None);
        assert_eq!(record.sample_value(1, "AD"), Some("5,0"));
        assert_eq!(record.sample_value(1, "DP"), None);
        assert!(record.carries_allele(0, 0));
        assert!(!record.carries_allele(1, 0));
    }

    #[test]
    fn test_sites_only_record() {
        let record = VcfRecord::from_line("X\t100\t.\tAC\t.\t.\t.\t.", 0, 1).unwrap();
        assert!(record.alternates.is_empty());
        assert!(!record.is_pass());
        assert_eq!(record.end(), 101);
        assert_eq!(record.reportable_alternates().count(), 0);
        assert!(record.carries_allele(0, 0));
    }

    #[test]
    fn test_reportable_alternates_skip_spanning_deletion() {
        let record =
            VcfRecord::from_line("1\t10\t.\tA\tG,*\t.\tLowQual;q10\t.", 0, 1).unwrap();
        let alts: Vec<(usize, &str)> = record.reportable_alternates().collect();
        assert_eq!(alts, [(0, "G")]);
        assert_eq!(record.filter, "LowQual;q10");
    }

    #[test]
    fn test_carries_allele() {
        let record = VcfRecord::from_line(LINE, 2, 20).unwrap();
        assert!(record.carries_allele(0, 0));
        assert!(!record.carries_allele(0, 1));
        assert!(record.carries_allele(1, 0));
        assert!(record.carries_allele(1, 1));

        let hom_ref = "1\t10\t.\tA\tG\t.\tPASS\t.\tGT\t0/0";
        let record = VcfRecord::from_line(hom_ref, 1, 1).unwrap();
        assert!(!record.carries_allele(0, 0));

        let missing = "1\t10\t.\tA\tG\t.\tPASS\t.\tGT\t./.";
        let record = VcfRecord::from_line(missing, 1, 1).unwrap();
        assert!(record.carries_allele(0, 0));
    }

    #[test]
    fn test_genotype_parse() {
        assert_eq!(Genotype::parse("0|1").alleles, [Some(0), Some(1)]);
        assert_eq!(Genotype::parse("1/2").alleles, [Some(1), Some(2)]);
        assert!(Genotype::parse(".").is_missing());
        assert!(!Genotype::parse("./1").is_missing());
    }

    #[test]
    fn test_allele_value() {
        assert_eq!(allele_value("0.25,0.5", Number::PerAltAllele, 1, 2), "0.5");
        assert_eq!(allele_value("10,8,2", Number::PerAllele, 1, 2), "10,2");
        assert_eq!(allele_value("10,8,2", Number::PerAllele, 0, 2), "10,8");
        assert_eq!(allele_value("30", Number::Count(1), 1, 2), "30");
        assert_eq!(allele_value("1,2,3", Number::PerAltAllele, 0, 2), "1,2,3");
        assert_eq!(allele_value(".", Number::Unknown, 0, 1), "");
        assert_eq!(allele_value("0.1,.", Number::PerAltAllele, 1, 2), "");
    }

    #[test]
    fn test_variant_key_display() {
        let record = VcfRecord::from_line(LINE, 2, 20).unwrap();
        assert_eq!(record.key(1).unwrap().to_string(), "1:12345A>T");
        assert!(record.key(2).is_none());
    }
}
