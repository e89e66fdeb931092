//! Source Map (v3) decoding and generation.
//!
//! Only the pieces the rewriter needs: parse an input map, decode its
//! `mappings` into absolute segments, and encode a new map from segments.
//! Index maps (`sections`) are not supported.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced while reading an input source map.
#[derive(Debug, Error)]
pub enum SourceMapError {
    #[error("invalid source map JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("unsupported source map version {0}, expected 3")]
    UnsupportedVersion(u32),
    #[error("malformed mappings segment '{segment}' on generated line {line}")]
    MalformedSegment { line: u32, segment: String },
    #[error("mapping references source index {index} but only {count} sources exist")]
    SourceOutOfRange { index: u32, count: usize },
}

/// Base64 VLQ codec used by the `mappings` field.
pub mod vlq {
    const BASE64: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";
    const CONTINUATION: i64 = 0b10_0000;
    const MASK: i64 = 0b1_1111;

    /// Encode a single signed value.
    pub fn encode(value: i64) -> String {
        let mut out = String::new();
        encode_into(&mut out, value);
        out
    }

    /// Append the encoding of `value` to `out`.
    pub fn encode_into(out: &mut String, value: i64) {
        // Sign lives in the least significant bit.
        let mut rest = if value < 0 {
            ((-value) << 1) | 1
        } else {
            value << 1
        };
        loop {
            let mut digit = rest & MASK;
            rest >>= 5;
            if rest > 0 {
                digit |= CONTINUATION;
            }
            out.push(BASE64[digit as usize] as char);
            if rest == 0 {
                break;
            }
        }
    }

    fn digit_value(byte: u8) -> Option<i64> {
        let value = match byte {
            b'A'..=b'Z' => byte - b'A',
            b'a'..=b'z' => byte - b'a' + 26,
            b'0'..=b'9' => byte - b'0' + 52,
            b'+' => 62,
            b'/' => 63,
            _ => return None,
        };
        Some(i64::from(value))
    }

    /// Decode one value from the front of `input`.
    ///
    /// Returns the value and the number of bytes consumed.
    pub fn decode(input: &str) -> Option<(i64, usize)> {
        let mut result = 0i64;
        let mut shift = 0u32;
        for (idx, byte) in input.bytes().enumerate() {
            let digit = digit_value(byte)?;
            if shift > 60 {
                return None;
            }
            result += (digit & MASK) << shift;
            shift += 5;
            if digit & CONTINUATION == 0 {
                let negative = result & 1 == 1;
                let magnitude = result >> 1;
                return Some((if negative { -magnitude } else { magnitude }, idx + 1));
            }
        }
        None
    }
}

/// The JSON shape of a v3 source map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSourceMap {
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_root: Option<String>,
    #[serde(default)]
    pub sources: Vec<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources_content: Option<Vec<Option<String>>>,
    #[serde(default)]
    pub names: Vec<String>,
    #[serde(default)]
    pub mappings: String,
}

impl RawSourceMap {
    /// Parse and validate a v3 map from JSON text.
    pub fn from_json(json: &str) -> Result<Self, SourceMapError> {
        let raw: RawSourceMap = serde_json::from_str(json)?;
        raw.validated()
    }

    /// Validate a v3 map already parsed into a JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self, SourceMapError> {
        let raw: RawSourceMap = serde_json::from_value(value)?;
        raw.validated()
    }

    fn validated(self) -> Result<Self, SourceMapError> {
        if self.version != 3 {
            return Err(SourceMapError::UnsupportedVersion(self.version));
        }
        Ok(self)
    }

    /// Decode `mappings` into absolute segments.
    pub fn decode_mappings(&self) -> Result<Vec<Mapping>, SourceMapError> {
        let mappings = decode_mappings(&self.mappings)?;
        let count = self.sources.len();
        if let Some(bad) = mappings
            .iter()
            .filter_map(|m| m.original)
            .find(|orig| orig.source as usize >= count)
        {
            return Err(SourceMapError::SourceOutOfRange {
                index: bad.source,
                count,
            });
        }
        Ok(mappings)
    }

    pub fn to_json(&self) -> String {
        // Strings and integers only; serialization cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Where a generated position came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OriginalLocation {
    pub source: u32,
    pub line: u32,
    pub column: u32,
    pub name: Option<u32>,
}

/// One decoded segment, with absolute coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mapping {
    pub generated_line: u32,
    pub generated_column: u32,
    /// `None` for generated-only segments.
    pub original: Option<OriginalLocation>,
}

/// Decode a `mappings` string into absolute segments, in generated order.
pub fn decode_mappings(mappings: &str) -> Result<Vec<Mapping>, SourceMapError> {
    let mut decoded = Vec::new();
    let mut prev_source = 0i64;
    let mut prev_line = 0i64;
    let mut prev_column = 0i64;
    let mut prev_name = 0i64;

    for (line_idx, line) in mappings.split(';').enumerate() {
        let generated_line = line_idx as u32;
        let mut prev_generated_column = 0i64;

        for segment in line.split(',').filter(|s| !s.is_empty()) {
            let malformed = || SourceMapError::MalformedSegment {
                line: generated_line,
                segment: segment.to_string(),
            };
            let mut fields = [0i64; 5];
            let mut count = 0usize;
            let mut rest = segment;
            while !rest.is_empty() {
                if count == fields.len() {
                    return Err(malformed());
                }
                let (value, consumed) = vlq::decode(rest).ok_or_else(malformed)?;
                fields[count] = value;
                count += 1;
                rest = &rest[consumed..];
            }

            prev_generated_column += fields[0];
            let generated_column = u32::try_from(prev_generated_column).map_err(|_| malformed())?;

            let original = match count {
                1 => None,
                4 | 5 => {
                    prev_source += fields[1];
                    prev_line += fields[2];
                    prev_column += fields[3];
                    let name = if count == 5 {
                        prev_name += fields[4];
                        Some(u32::try_from(prev_name).map_err(|_| malformed())?)
                    } else {
                        None
                    };
                    Some(OriginalLocation {
                        source: u32::try_from(prev_source).map_err(|_| malformed())?,
                        line: u32::try_from(prev_line).map_err(|_| malformed())?,
                        column: u32::try_from(prev_column).map_err(|_| malformed())?,
                        name,
                    })
                }
                _ => return Err(malformed()),
            };

            decoded.push(Mapping {
                generated_line,
                generated_column,
                original,
            });
        }
    }

    Ok(decoded)
}

/// Builds a v3 source map from absolute mappings.
#[derive(Debug, Clone, Default)]
pub struct SourceMapGenerator {
    file: Option<String>,
    source_root: Option<String>,
    sources: Vec<Option<String>>,
    sources_content: Vec<Option<String>>,
    names: Vec<String>,
    mappings: Vec<Mapping>,
}

impl SourceMapGenerator {
    pub fn new(file: Option<String>) -> Self {
        SourceMapGenerator {
            file,
            ..Default::default()
        }
    }

    pub fn set_source_root(&mut self, root: Option<String>) {
        self.source_root = root;
    }

    /// Register a source file and return its index.
    pub fn add_source(&mut self, source: Option<String>) -> u32 {
        self.add_source_with_content(source, None)
    }

    pub fn add_source_with_content(&mut self, source: Option<String>, content: Option<String>) -> u32 {
        self.sources.push(source);
        self.sources_content.push(content);
        (self.sources.len() - 1) as u32
    }

    pub fn add_name(&mut self, name: String) -> u32 {
        self.names.push(name);
        (self.names.len() - 1) as u32
    }

    pub fn add_mapping(&mut self, mapping: Mapping) {
        self.mappings.push(mapping);
    }

    pub fn mapping_count(&self) -> usize {
        self.mappings.len()
    }

    /// Encode the accumulated state into a raw map.
    pub fn to_raw(&self) -> RawSourceMap {
        let mut ordered = self.mappings.clone();
        ordered.sort_by_key(|m| (m.generated_line, m.generated_column));

        let mut encoded = String::new();
        let mut line = 0u32;
        let mut prev_generated_column = 0i64;
        let mut prev_source = 0i64;
        let mut prev_line = 0i64;
        let mut prev_column = 0i64;
        let mut prev_name = 0i64;
        let mut first_in_line = true;

        for mapping in &ordered {
            while line < mapping.generated_line {
                encoded.push(';');
                line += 1;
                prev_generated_column = 0;
                first_in_line = true;
            }
            if !first_in_line {
                encoded.push(',');
            }
            first_in_line = false;

            let column = i64::from(mapping.generated_column);
            vlq::encode_into(&mut encoded, column - prev_generated_column);
            prev_generated_column = column;

            if let Some(orig) = mapping.original {
                vlq::encode_into(&mut encoded, i64::from(orig.source) - prev_source);
                vlq::encode_into(&mut encoded, i64::from(orig.line) - prev_line);
                vlq::encode_into(&mut encoded, i64::from(orig.column) - prev_column);
                prev_source = i64::from(orig.source);
                prev_line = i64::from(orig.line);
                prev_column = i64::from(orig.column);
                if let Some(name) = orig.name {
                    vlq::encode_into(&mut encoded, i64::from(name) - prev_name);
                    prev_name = i64::from(name);
                }
            }
        }

        let sources_content = if self.sources_content.iter().any(Option::is_some) {
            Some(self.sources_content.clone())
        } else {
            None
        };

        RawSourceMap {
            version: 3,
            file: self.file.clone(),
            source_root: self.source_root.clone(),
            sources: self.sources.clone(),
            sources_content,
            names: self.names.clone(),
            mappings: encoded,
        }
    }

    pub fn to_json(&self) -> String {
        self.to_raw().to_json()
    }
}

#[cfg(test)]
#[path = "../tests/source_map_tests.rs"]
mod tests;
