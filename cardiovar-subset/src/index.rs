use std::ffi::OsString;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use noodles::bgzf;
use noodles::core::Position;
use noodles::csi::binning_index::index::header::{self, Format, format::CoordinateSystem};
use noodles::csi::binning_index::index::reference_sequence::bin::Chunk;
use noodles::tabix;

use crate::consts::{SHARD_CHROM_COLUMN, SHARD_POS_COLUMN, TABIX_EXTENSION};
use crate::error::{Result, SubsetError};

///
/// `<path>.tbi`
///
pub fn index_path_for(path: &Path) -> PathBuf {
    let mut index = OsString::from(path.as_os_str());
    index.push(".");
    index.push(TABIX_EXTENSION);
    PathBuf::from(index)
}

///
/// Writes tab-delimited rows into a BGZF file and builds a tabix index over them as
/// they go, with both start and end bound to the position column (`tabix -s 1 -b 2 -e 2`).
///
/// Rows must arrive grouped by chromosome and sorted by position within a chromosome.
///
pub struct IndexedTsvWriter {
    path: PathBuf,
    writer: bgzf::Writer<File>,
    indexer: tabix::index::Indexer,
    records: usize,
}

impl IndexedTsvWriter {
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)?;

        let index_header = header::Builder::default()
            .set_format(Format::Generic(CoordinateSystem::Gff))
            .set_reference_sequence_name_index(SHARD_CHROM_COLUMN)
            .set_start_position_index(SHARD_POS_COLUMN)
            .set_end_position_index(Some(SHARD_POS_COLUMN))
            .set_line_comment_prefix(b'#')
            .set_line_skip_count(0)
            .build();

        let mut indexer = tabix::index::Indexer::default();
        indexer.set_header(index_header);

        Ok(IndexedTsvWriter {
            path: path.to_path_buf(),
            writer: bgzf::Writer::new(file),
            indexer,
            records: 0,
        })
    }

    /// Write a header line. It starts with `#`, so the index skips it.
    pub fn write_header(&mut self, line: &str) -> Result<()> {
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    pub fn write_record(&mut self, chrom: &str, pos: u64, line: &str) -> Result<()> {
        let position = usize::try_from(pos)
            .ok()
            .and_then(Position::new)
            .ok_or_else(|| SubsetError::InvalidIndexPosition {
                chrom: chrom.to_string(),
                pos,
            })?;

        let start = self.writer.virtual_position();
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")?;
        let end = self.writer.virtual_position();

        self.indexer
            .add_record(chrom, position, position, Chunk::new(start, end))?;
        self.records += 1;
        Ok(())
    }

    pub fn records(&self) -> usize {
        self.records
    }

    ///
    /// Close the BGZF stream (writing the EOF block) and write the `.tbi` index.
    /// Returns the index path.
    ///
    pub fn finish(self) -> Result<PathBuf> {
        self.writer.finish()?;

        let index = self.indexer.build();
        let index_path = index_path_for(&self.path);
        let mut writer = tabix::io::Writer::new(File::create(&index_path)?);
        writer.write_index(&index)?;

        Ok(index_path)
    }
}
