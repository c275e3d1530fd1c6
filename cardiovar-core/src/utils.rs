use std::ffi::OsStr;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use flate2::read::MultiGzDecoder;

use crate::consts::MISSING_VALUE;
use crate::errors::{CoreError, Result};

/// Read buffer for variant and reference files; dbNSFP shards run to several GB.
const READ_BUFFER_CAPACITY: usize = 256 * 1024;

///
/// Check whether a path points at a gzip (or bgzip) container, judged by extension only.
///
pub fn is_gzipped(path: &Path) -> bool {
    matches!(
        path.extension().and_then(OsStr::to_str),
        Some("gz") | Some("bgz")
    )
}

///
/// Get a reader for either a gzip'd or non-gzip'd file.
///
/// `MultiGzDecoder` is used so that bgzip output (a chain of gzip members) is read to the end.
///
/// # Arguments
///
/// - path: path to the file to read
///
pub fn get_dynamic_reader(path: &Path) -> Result<BufReader<Box<dyn Read>>> {
    let file = File::open(path).map_err(|source| CoreError::FileOpen {
        path: path.to_path_buf(),
        source,
    })?;
    let file: Box<dyn Read> = match is_gzipped(path) {
        true => Box::new(MultiGzDecoder::new(file)),
        false => Box::new(file),
    };

    Ok(BufReader::with_capacity(READ_BUFFER_CAPACITY, file))
}

///
/// Lazy, line-oriented reader over a plain or compressed text file.
///
/// Invalid UTF-8 is replaced with U+FFFD instead of failing the stream, so a few
/// malformed bytes never abort an otherwise valid file. Line terminators (`\n`, `\r\n`)
/// are stripped. The stream is consumed once; reopen the path to read it again.
///
pub struct RecordStream {
    reader: Box<dyn BufRead>,
    buf: Vec<u8>,
}

impl RecordStream {
    pub fn new<R: BufRead + 'static>(reader: R) -> Self {
        RecordStream {
            reader: Box::new(reader),
            buf: Vec::with_capacity(4096),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        Ok(RecordStream::new(get_dynamic_reader(path)?))
    }
}

impl Iterator for RecordStream {
    type Item = std::io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => None,
            Ok(_) => {
                let mut end = self.buf.len();
                if end > 0 && self.buf[end - 1] == b'\n' {
                    end -= 1;
                }
                if end > 0 && self.buf[end - 1] == b'\r' {
                    end -= 1;
                }
                Some(Ok(String::from_utf8_lossy(&self.buf[..end]).into_owned()))
            }
            Err(e) => Some(Err(e)),
        }
    }
}

///
/// Strip an optional `chr` prefix from a chromosome name.
///
pub fn strip_chr_prefix(chrom: &str) -> &str {
    let chrom = chrom.trim();
    chrom.strip_prefix("chr").unwrap_or(chrom)
}

///
/// Normalize a chromosome name for shard lookup: strip `chr`, and fold the
/// mitochondrial aliases (`MT`, `Mt`, `mt`) to `M`.
///
pub fn normalize_chrom(chrom: &str) -> String {
    let chrom = strip_chr_prefix(chrom);
    match chrom {
        "MT" | "Mt" | "mt" => "M".to_string(),
        _ => chrom.to_string(),
    }
}

///
/// Find the value of `key` in a semicolon separated `key=value` INFO column.
///
/// Flags (entries without `=`) and empty values never match.
///
pub fn info_value<'a>(info: &'a str, key: &str) -> Option<&'a str> {
    info.split(';')
        .filter_map(|entry| entry.split_once('='))
        .find(|(k, v)| *k == key && !v.is_empty())
        .map(|(_, v)| v)
}

///
/// A raw annotation value is missing when it is empty or the VCF missing marker.
///
pub fn is_missing(value: &str) -> bool {
    value.is_empty() || value == MISSING_VALUE
}
