use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use flate2::Compression;
use flate2::write::GzEncoder;

///
/// A gene span in BED coordinates (0-based start, half-open end).
///
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct GeneSpan {
    pub chrom: String,
    pub start: u32,
    pub end: u32,
    pub gene: String,
}

impl GeneSpan {
    pub fn as_string(&self) -> String {
        format!("{}\t{}\t{}\t{}", self.chrom, self.start, self.end, self.gene)
    }
}

///
/// A panel of target genes.
///
#[derive(Debug, Clone)]
pub struct GenePanel {
    pub spans: Vec<GeneSpan>,
}

impl GenePanel {
    ///
    /// Built-in cardiac panel with rough GRCh38 gene spans. For exact canonical
    /// transcript bounds query a gene model instead.
    ///
    pub fn cardiac() -> Self {
        let spans = [
            ("MYH7", "14", 23872933, 23904751),
            ("MYBPC3", "11", 47317013, 47363695),
            ("TNNT2", "1", 201359228, 201378015),
            ("TTN", "2", 178525989, 178807423),
            ("SCN5A", "3", 38589545, 38691305),
            ("KCNQ1", "11", 2589737, 2817649),
        ]
        .into_iter()
        .map(|(gene, chrom, start, end)| GeneSpan {
            chrom: chrom.to_string(),
            start,
            end,
            gene: gene.to_string(),
        })
        .collect();

        GenePanel { spans }
    }

    pub fn genes(&self) -> Vec<&str> {
        self.spans.iter().map(|s| s.gene.as_str()).collect()
    }
}

pub trait BedWrite {
    ///
    /// Write data to disk as bed file
    ///
    /// # Arguments
    /// - path: the path to the file to dump to
    fn write_bed<T: AsRef<Path>>(&self, path: T) -> std::io::Result<()>;

    ///
    /// Write data to disk as bed.gz file
    ///
    /// # Arguments
    /// - path: the path to the file to dump to
    fn write_bed_gz<T: AsRef<Path>>(&self, path: T) -> std::io::Result<()>;
}

impl BedWrite for GenePanel {
    fn write_bed<T: AsRef<Path>>(&self, path: T) -> std::io::Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut file = BufWriter::new(File::create(path)?);

        for span in &self.spans {
            writeln!(file, "{}", span.as_string())?;
        }
        file.flush()
    }

    fn write_bed_gz<T: AsRef<Path>>(&self, path: T) -> std::io::Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = File::create(path)?;
        let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::best());

        for span in &self.spans {
            writeln!(encoder, "{}", span.as_string())?;
        }

        encoder.finish()?;
        Ok(())
    }
}
