//! Raw text and hyperlink extraction from uploaded PDF, DOCX and TXT files.

use std::io::{Cursor, Read};

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::intake::links::{categorize_links, extract_links_from_text};
use crate::intake::validation::file_extension;
use crate::models::resume::ResumeLinks;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("File type '{0}' is not supported. Allowed types: pdf, docx, txt")]
    UnsupportedType(String),

    #[error("Uploaded file is empty!")]
    EmptyFile,

    #[error("Could not read PDF: {0}")]
    Pdf(String),

    #[error("Could not read DOCX: {0}")]
    Docx(String),

    #[error("Failed to extract text from the uploaded file.")]
    Empty,

    #[error("DOCX part '{name}' expands beyond {limit} bytes")]
    TooLarge { name: String, limit: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Pdf,
    Docx,
    Txt,
}

impl FileKind {
    pub fn from_file_name(file_name: &str) -> Result<Self, ExtractionError> {
        match file_extension(file_name).as_str() {
            "pdf" => Ok(FileKind::Pdf),
            "docx" => Ok(FileKind::Docx),
            "txt" => Ok(FileKind::Txt),
            other => Err(ExtractionError::UnsupportedType(other.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    pub text: String,
    pub links: ResumeLinks,
}

/// Decompressed size cap for one DOCX part. The upload limit only bounds the compressed archive.
const MAX_XML_BYTES: u64 = 20 * 1024 * 1024;

/// Paragraph properties hold tab stop definitions (`<w:tabs><w:tab .../>`), not content.
static DOCX_PARAGRAPH_PROPS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<w:pPr>.*?</w:pPr>").expect("valid docx pPr regex"));
/// A text run, or a tab / line break element, in document order.
static DOCX_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<w:t(?:\s[^>]*)?>([^<]*)</w:t>|<w:(tab|br|cr)(?:\s[^>]*)?/>")
        .expect("valid docx token regex")
});
static XML_ENTITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(#[xX][0-9A-Fa-f]+|#[0-9]+|lt|gt|quot|apos|amp);").expect("valid entity regex")
});
static DOCX_RELATIONSHIP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<Relationship\s[^>]*>").expect("valid rels regex"));
static REL_TARGET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"Target="([^"]+)""#).expect("valid target regex"));

/// Extracts trimmed text plus categorized links. Blocking; PDF parsing in particular
/// can be slow, so async callers should run this on a blocking thread.
pub fn extract_document(kind: FileKind, bytes: &[u8]) -> Result<ExtractedDocument, ExtractionError> {
    if bytes.is_empty() {
        return Err(ExtractionError::EmptyFile);
    }

    let (text, links) = match kind {
        FileKind::Pdf => {
            let text = pdf_extract::extract_text_from_mem(bytes)
                .map_err(|e| ExtractionError::Pdf(e.to_string()))?;
            let links = extract_links_from_text(&text);
            (text, links)
        }
        FileKind::Docx => {
            let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
                .map_err(|e| ExtractionError::Docx(e.to_string()))?;
            let body = read_zip_entry(&mut archive, "word/document.xml", MAX_XML_BYTES)?
                .ok_or_else(|| ExtractionError::Docx("missing word/document.xml".into()))?;
            let text = docx_paragraph_text(&body);

            let urls = match read_zip_entry(&mut archive, "word/_rels/document.xml.rels", MAX_XML_BYTES)? {
                Some(rels) => docx_external_targets(&rels),
                None => Vec::new(),
            };
            let text_links = extract_links_from_text(&text);
            let mut links = categorize_links(urls.iter().map(String::as_str));
            merge_links(&mut links, text_links);
            (text, links)
        }
        FileKind::Txt => {
            let text = decode_text(bytes);
            let links = extract_links_from_text(&text);
            (text, links)
        }
    };

    let text = text.trim().to_string();
    if text.is_empty() {
        return Err(ExtractionError::Empty);
    }
    Ok(ExtractedDocument { text, links })
}

/// Reads one archive entry, refusing to inflate more than `limit` bytes.
/// The declared size is checked first; the read itself is capped too since headers can lie.
fn read_zip_entry(
    archive: &mut zip::ZipArchive<Cursor<&[u8]>>,
    name: &str,
    limit: u64,
) -> Result<Option<String>, ExtractionError> {
    let too_large = || ExtractionError::TooLarge {
        name: name.to_string(),
        limit,
    };

    let file = match archive.by_name(name) {
        Ok(f) => f,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(ExtractionError::Docx(e.to_string())),
    };
    if file.size() > limit {
        return Err(too_large());
    }

    let mut contents = String::new();
    file.take(limit + 1)
        .read_to_string(&mut contents)
        .map_err(|e| ExtractionError::Docx(e.to_string()))?;
    if contents.len() as u64 > limit {
        return Err(too_large());
    }
    Ok(Some(contents))
}

/// One output line per `<w:p>` paragraph. `<w:tab/>` becomes a tab and
/// `<w:br/>` / `<w:cr/>` a line break.
fn docx_paragraph_text(document_xml: &str) -> String {
    let body = DOCX_PARAGRAPH_PROPS.replace_all(document_xml, "");
    body.split("</w:p>")
        .map(|paragraph| {
            let mut line = String::new();
            for caps in DOCX_TOKEN.captures_iter(paragraph) {
                match (caps.get(1), caps.get(2).map(|m| m.as_str())) {
                    (Some(run), _) => line.push_str(&decode_xml_entities(run.as_str())),
                    (None, Some("tab")) => line.push('\t'),
                    (None, Some(_)) => line.push('\n'),
                    (None, None) => {}
                }
            }
            line
        })
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// External hyperlink targets declared in the document relationships part.
fn docx_external_targets(rels_xml: &str) -> Vec<String> {
    DOCX_RELATIONSHIP
        .find_iter(rels_xml)
        .map(|m| m.as_str())
        .filter(|rel| rel.contains(r#"TargetMode="External""#))
        .filter_map(|rel| REL_TARGET.captures(rel))
        .filter_map(|caps| caps.get(1))
        .map(|m| decode_xml_entities(m.as_str()))
        .collect()
}

fn merge_links(into: &mut ResumeLinks, from: ResumeLinks) {
    fn extend_unique(dst: &mut Vec<String>, src: Vec<String>) {
        for item in src {
            if !dst.contains(&item) {
                dst.push(item);
            }
        }
    }
    extend_unique(&mut into.github.profile, from.github.profile);
    extend_unique(&mut into.github.project, from.github.project);
    extend_unique(&mut into.linkedin.profile, from.linkedin.profile);
    extend_unique(&mut into.portfolio, from.portfolio);
    extend_unique(&mut into.other, from.other);
    extend_unique(&mut into.email, from.email);
}

/// Decodes the predefined entities and numeric character references in one pass.
/// References to invalid code points are left as written.
fn decode_xml_entities(s: &str) -> String {
    XML_ENTITY
        .replace_all(s, |caps: &regex::Captures| {
            let entity = &caps[1];
            let decoded = match entity {
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "amp" => Some('&'),
                _ => {
                    let code = match entity.strip_prefix("#x").or_else(|| entity.strip_prefix("#X")) {
                        Some(hex) => u32::from_str_radix(hex, 16).ok(),
                        None => entity[1..].parse::<u32>().ok(),
                    };
                    code.and_then(char::from_u32)
                }
            };
            decoded.map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}

/// UTF-8 when valid, otherwise every byte is taken as a Latin-1 code point.
pub fn decode_text(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}
