use base64::{engine::general_purpose, Engine as _};
use quick_xml::de::from_reader;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::io::BufRead;
use std::path::Path;
use std::sync::OnceLock;
use thiserror::Error;
use uom::si::f32::Time;
use uom::si::time::{minute, second};
use zune_inflate::DeflateDecoder;

pub mod annotate;
pub mod fragment;
pub mod layout;
pub mod matching;
pub mod peaks;
pub mod render;
pub mod residue;

use peaks::Peak;

#[derive(Error, Debug)]
pub enum ScanSourceError {
    #[error("error reading mzXML file: {0}")]
    Io(#[from] std::io::Error),
    #[error("mzXML parsing error: {0}")]
    XmlFormat(#[from] quick_xml::de::DeError),
    #[error("gzip/zlib decoding error: {0}")]
    Inflate(#[from] zune_inflate::errors::InflateDecodeErrors),
    #[error("base64 parsing error, peak data is not parsable: {0}")]
    Base64Decode(#[from] base64::DecodeError),
    #[error("unsupported peak precision: f_{0}")]
    UnsupportedPrecision(u8),
    #[error("no scan with number {num} in this file")]
    ScanNotFound { num: u32 },
}

fn base64_decode(data: &str) -> Result<Vec<u8>, ScanSourceError> {
    Ok(general_purpose::STANDARD.decode(data)?)
}

/**A parsed mzXML file holding the scan tree of a single run.
Peak data stays base64-encoded until a scan is asked for its peaks.
*/
#[derive(Debug)]
pub struct MzXmlFile {
    mzxml: MzXml,
}

impl MzXmlFile {
    ///Open an mzXML file from disk, transparently inflating a gzip container.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ScanSourceError> {
        let mut bytes = std::fs::read(path)?;
        if bytes.starts_with(&[0x1f, 0x8b]) {
            let mut decoder = DeflateDecoder::new(&bytes);
            bytes = decoder.decode_gzip()?;
        }
        Self::from_reader(&bytes[..])
    }

    ///Parse an uncompressed mzXML document from any buffered reader.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, ScanSourceError> {
        let mzxml: MzXml = from_reader(reader)?;
        Ok(MzXmlFile { mzxml })
    }

    /**Return an iterator over every scan in the run, depth first.
    mzXML nests fragmentation scans inside their survey scan, so a plain
    walk over the top level would miss the MS2 scans this tool targets.
    */
    pub fn scans(&self) -> ScanIter<'_> {
        ScanIter {
            stack: self.mzxml.ms_run.scans.iter().rev().collect(),
        }
    }

    pub fn scan(&self, num: u32) -> Option<&Scan> {
        self.scans().find(|s| s.num() == num)
    }

    ///Decode the peak list of the scan with the given number.
    pub fn peaks_for_scan(&self, num: u32) -> Result<Vec<Peak>, ScanSourceError> {
        self.scan(num)
            .ok_or(ScanSourceError::ScanNotFound { num })?
            .peaks()
    }
}

pub struct ScanIter<'a> {
    stack: Vec<&'a Scan>,
}

impl<'a> Iterator for ScanIter<'a> {
    type Item = &'a Scan;

    fn next(&mut self) -> Option<Self::Item> {
        let scan = self.stack.pop()?;
        self.stack.extend(scan.children.iter().rev());
        Some(scan)
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
#[serde(rename = "mzXML")]
struct MzXml {
    ms_run: MsRun,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
struct MsRun {
    #[serde(rename = "@scanCount")]
    scan_count: Option<usize>,
    #[serde(rename = "scan", default)]
    scans: Vec<Scan>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename = "scan")]
#[serde(rename_all = "camelCase")]
pub struct Scan {
    #[serde(rename = "@num")]
    num: u32,
    #[serde(rename = "@msLevel")]
    ms_level: Option<u16>,
    #[serde(rename = "@peaksCount")]
    peaks_count: Option<usize>,
    #[serde(rename = "@retentionTime")]
    retention_time: Option<String>,
    peaks: PeakData,
    #[serde(rename = "scan", default)]
    children: Vec<Scan>,
}

impl Scan {
    pub fn num(&self) -> u32 {
        self.num
    }

    pub fn ms_level(&self) -> Option<u16> {
        self.ms_level
    }

    ///Return the retention time, parsed from the xs:duration attribute.
    pub fn rt(&self) -> Option<Time> {
        static RT_PATTERN: OnceLock<Regex> = OnceLock::new();
        let re = RT_PATTERN.get_or_init(|| {
            Regex::new(r"^PT(?:([0-9]+(?:\.[0-9]+)?)M)?(?:([0-9]+(?:\.[0-9]+)?)S)?$")
                .expect("retention time pattern should compile")
        });
        let raw = self.retention_time.as_deref()?;
        let caps = re.captures(raw)?;
        let minutes: f32 = caps
            .get(1)
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(0.0);
        let seconds: f32 = caps
            .get(2)
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(0.0);
        Some(Time::new::<minute>(minutes) + Time::new::<second>(seconds))
    }

    /**Return the decoded peak list as (m/z, intensity) pairs.
    mzXML stores peaks as base64 text in network (big-endian) byte order,
    interleaved m/z then intensity, optionally zlib-compressed.
    */
    pub fn peaks(&self) -> Result<Vec<Peak>, ScanSourceError> {
        self.peaks.decode()
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
struct PeakData {
    #[serde(rename = "@precision")]
    precision: Option<u8>,
    #[serde(rename = "@byteOrder")]
    byte_order: Option<String>,
    #[serde(rename = "@compressionType")]
    compression_type: Option<String>,
    #[serde(rename = "@contentType")]
    content_type: Option<String>,
    #[serde(rename = "$value", default)]
    data: Option<String>,
}

impl PeakData {
    fn decode(&self) -> Result<Vec<Peak>, ScanSourceError> {
        let text = match &self.data {
            Some(t) => t.trim(),
            None => return Ok(Vec::new()),
        };
        if text.is_empty() {
            return Ok(Vec::new());
        }
        let mut binary = base64_decode(text)?;
        if matches!(self.compression_type.as_deref(), Some("zlib")) {
            let mut decoder = DeflateDecoder::new(&binary);
            binary = decoder.decode_zlib()?;
        }
        let mut values = Vec::new();
        match self.precision.unwrap_or(32) {
            32 => {
                for chunk in binary.chunks_exact(4) {
                    let mut buffer = [0u8; 4];
                    buffer.copy_from_slice(chunk);
                    values.push(f32::from_be_bytes(buffer) as f64);
                }
            }
            64 => {
                for chunk in binary.chunks_exact(8) {
                    let mut buffer = [0u8; 8];
                    buffer.copy_from_slice(chunk);
                    values.push(f64::from_be_bytes(buffer));
                }
            }
            p => return Err(ScanSourceError::UnsupportedPrecision(p)),
        }
        Ok(values
            .chunks_exact(2)
            .map(|pair| Peak {
                mz: pair[0],
                intensity: pair[1],
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use crate::*;
    use std::io::Write;
    use uom::si::time::second;

    fn encode_pairs(pairs: &[(f32, f32)]) -> String {
        let mut bytes = Vec::new();
        for (mz, intensity) in pairs {
            bytes.extend_from_slice(&mz.to_be_bytes());
            bytes.extend_from_slice(&intensity.to_be_bytes());
        }
        general_purpose::STANDARD.encode(bytes)
    }

    fn sample_mzxml() -> String {
        let ms1 = encode_pairs(&[(400.25, 1000.0), (410.5, 250.0)]);
        let ms2 = encode_pairs(&[(72.1, 50.0), (147.0, 100.0)]);
        format!(
            r#"<?xml version="1.0" encoding="ISO-8859-1"?>
<mzXML xmlns="http://sashimi.sourceforge.net/schema/">
 <msRun scanCount="2">
  <scan num="19" msLevel="1" peaksCount="2" retentionTime="PT353.43S">
   <peaks precision="32" byteOrder="network" contentType="m/z-int">{ms1}</peaks>
   <scan num="20" msLevel="2" peaksCount="2" retentionTime="PT356.28S">
    <peaks precision="32" byteOrder="network" contentType="m/z-int">{ms2}</peaks>
   </scan>
  </scan>
 </msRun>
</mzXML>"#
        )
    }

    fn assert_pairs_eq(peaks: &[Peak], expected: &[(f32, f32)]) {
        assert_eq!(peaks.len(), expected.len());
        for (peak, (mz, intensity)) in peaks.iter().zip(expected) {
            assert!((peak.mz - *mz as f64).abs() < 1e-3);
            assert!((peak.intensity - *intensity as f64).abs() < 1e-3);
        }
    }

    #[test]
    fn finds_nested_scan_and_decodes_peaks() {
        let file = MzXmlFile::from_reader(sample_mzxml().as_bytes()).unwrap();
        assert_eq!(file.scans().count(), 2);
        let peaks = file.peaks_for_scan(20).unwrap();
        assert_pairs_eq(&peaks, &[(72.1, 50.0), (147.0, 100.0)]);
        assert_eq!(file.scan(20).unwrap().ms_level(), Some(2));
    }

    #[test]
    fn missing_scan_number_is_an_error() {
        let file = MzXmlFile::from_reader(sample_mzxml().as_bytes()).unwrap();
        match file.peaks_for_scan(99) {
            Err(ScanSourceError::ScanNotFound { num: 99 }) => {}
            other => panic!("expected ScanNotFound, got {:?}", other.map(|p| p.len())),
        }
    }

    #[test]
    fn retention_time_parses_to_seconds() {
        let file = MzXmlFile::from_reader(sample_mzxml().as_bytes()).unwrap();
        let rt = file.scan(19).unwrap().rt().unwrap();
        assert!((rt.get::<second>() - 353.43).abs() < 1e-3);
    }

    #[test]
    fn sixty_four_bit_peaks_decode() {
        let mut bytes = Vec::new();
        for value in [72.1f64, 50.0, 147.0, 100.0] {
            bytes.extend_from_slice(&value.to_be_bytes());
        }
        let xml = format!(
            r#"<mzXML><msRun scanCount="1">
 <scan num="1" msLevel="2">
  <peaks precision="64" byteOrder="network">{}</peaks>
 </scan>
</msRun></mzXML>"#,
            general_purpose::STANDARD.encode(bytes)
        );
        let file = MzXmlFile::from_reader(xml.as_bytes()).unwrap();
        let peaks = file.peaks_for_scan(1).unwrap();
        assert_pairs_eq(&peaks, &[(72.1, 50.0), (147.0, 100.0)]);
    }

    #[test]
    fn zlib_compressed_peaks_decode() {
        let mut raw = Vec::new();
        for value in [72.1f32, 50.0, 147.0, 100.0] {
            raw.extend_from_slice(&value.to_be_bytes());
        }
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(&raw).unwrap();
        let compressed = encoder.finish().unwrap();
        let xml = format!(
            r#"<mzXML><msRun scanCount="1">
 <scan num="1" msLevel="2">
  <peaks precision="32" byteOrder="network" compressionType="zlib">{}</peaks>
 </scan>
</msRun></mzXML>"#,
            general_purpose::STANDARD.encode(compressed)
        );
        let file = MzXmlFile::from_reader(xml.as_bytes()).unwrap();
        let peaks = file.peaks_for_scan(1).unwrap();
        assert_pairs_eq(&peaks, &[(72.1, 50.0), (147.0, 100.0)]);
    }

    #[test]
    fn gzipped_container_round_trips_through_disk() {
        let mut encoder =
            flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(sample_mzxml().as_bytes()).unwrap();
        let compressed = encoder.finish().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.mzxml.gz");
        std::fs::write(&path, compressed).unwrap();
        let file = MzXmlFile::open(&path).unwrap();
        let peaks = file.peaks_for_scan(20).unwrap();
        assert_pairs_eq(&peaks, &[(72.1, 50.0), (147.0, 100.0)]);
    }
}
