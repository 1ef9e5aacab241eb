//! Vocabulary loading (boundary adapter).
//!
//! This crate sits at the interop boundary: it parses RDF-shaped vocabulary
//! sources (untrusted) into a [`TripleStore`] and does nothing else. Parsing
//! is delegated to **Sophia** for the serializations controlled vocabularies
//! are published in:
//!
//! - Turtle (`.ttl`)
//! - N-Triples (`.nt`)
//! - RDF/XML (`.rdf`, `.owl`, `.xml`)
//!
//! A missing source degrades to an empty, queryable store (the service keeps
//! answering, with no matches). A parse failure on a source that does exist
//! is an error.
//!
//! Statements involving blank nodes are dropped: the label and hierarchy
//! predicates the engine reads connect IRIs in the vocabularies served here.

use lexigraph_store::{Term, TripleStore};
use sophia::api::prelude::*;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VocabFormat {
    Turtle,
    NTriples,
    RdfXml,
}

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("unsupported vocabulary format: .{0}")]
    UnsupportedFormat(String),
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse vocabulary: {0}")]
    Parse(String),
}

#[derive(Debug, thiserror::Error)]
#[error("{message}")]
struct SinkError {
    message: String,
}

impl SinkError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// ============================================================================
// Term model (display-form re-parsing)
// ============================================================================

enum ParsedTerm {
    Iri(String),
    Blank,
    Literal {
        lexical: String,
        language: Option<String>,
    },
}

fn unescape_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Parse one term in its N-Triples-ish display form.
fn parse_term_display(term: &str) -> Result<ParsedTerm, SinkError> {
    let s = term.trim();

    if let Some(iri) = s.strip_prefix('<').and_then(|t| t.strip_suffix('>')) {
        return Ok(ParsedTerm::Iri(iri.to_string()));
    }

    if s.starts_with("_:") {
        return Ok(ParsedTerm::Blank);
    }

    if s.starts_with('"') {
        let mut end_quote = None;
        let mut prev_was_escape = false;
        for (i, ch) in s.char_indices().skip(1) {
            if ch == '"' && !prev_was_escape {
                end_quote = Some(i);
                break;
            }
            prev_was_escape = ch == '\\' && !prev_was_escape;
        }
        let Some(end) = end_quote else {
            return Err(SinkError::new(format!(
                "invalid literal term (missing closing quote): {s}"
            )));
        };

        let lexical = unescape_literal(&s[1..end]);
        let rest = s[end + 1..].trim();

        // Language tag is kept; a datatype annotation is recognized and
        // discarded (no lookup reads one).
        let language = rest.strip_prefix('@').map(|lang| lang.to_string());

        return Ok(ParsedTerm::Literal { lexical, language });
    }

    Err(SinkError::new(format!("unsupported RDF term form: {s}")))
}

fn term_from_parsed(parsed: ParsedTerm) -> Option<Term> {
    match parsed {
        ParsedTerm::Iri(iri) => Some(Term::Iri(iri)),
        ParsedTerm::Literal { lexical, language } => Some(Term::Literal { lexical, language }),
        ParsedTerm::Blank => None,
    }
}

/// Insert one parsed statement, skipping anything blank-node shaped.
fn sink_statement(
    store: &mut TripleStore,
    subject: &str,
    predicate: &str,
    object: &str,
) -> Result<(), SinkError> {
    let ParsedTerm::Iri(subject) = parse_term_display(subject)? else {
        return Ok(());
    };
    let ParsedTerm::Iri(predicate) = parse_term_display(predicate)? else {
        return Ok(());
    };
    let Some(object) = term_from_parsed(parse_term_display(object)?) else {
        return Ok(());
    };
    store.insert(subject, predicate, object);
    Ok(())
}

// ============================================================================
// Loading
// ============================================================================

pub fn format_for_path(path: &Path) -> Result<VocabFormat, IngestError> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_lowercase();
    match ext.as_str() {
        "ttl" | "turtle" => Ok(VocabFormat::Turtle),
        "nt" | "ntriples" => Ok(VocabFormat::NTriples),
        "rdf" | "owl" | "xml" => Ok(VocabFormat::RdfXml),
        other => Err(IngestError::UnsupportedFormat(other.to_string())),
    }
}

/// Load a vocabulary source from disk.
///
/// A missing source is not an error: the caller gets an empty store and the
/// degrade is logged.
pub fn load_vocab(path: &Path) -> Result<TripleStore, IngestError> {
    if !path.is_file() {
        tracing::warn!(path = %path.display(), "vocabulary source missing, serving empty store");
        return Ok(TripleStore::new());
    }
    let format = format_for_path(path)?;
    let bytes = std::fs::read(path).map_err(|source| IngestError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let store = parse_vocab(&bytes, format)?;
    tracing::debug!(path = %path.display(), triples = store.len(), "vocabulary loaded");
    Ok(store)
}

pub fn parse_vocab(bytes: &[u8], format: VocabFormat) -> Result<TripleStore, IngestError> {
    let cursor = io::Cursor::new(bytes);
    let reader = io::BufReader::new(cursor);
    let mut store = TripleStore::new();

    match format {
        VocabFormat::NTriples => {
            let mut parser = sophia::turtle::parser::nt::parse_bufread(reader);
            parser
                .try_for_each_triple(|t| -> Result<(), SinkError> {
                    sink_statement(
                        &mut store,
                        &t.s().to_string(),
                        &t.p().to_string(),
                        &t.o().to_string(),
                    )
                })
                .map_err(|e| IngestError::Parse(format!("N-Triples: {e}")))?;
        }
        VocabFormat::Turtle => {
            let mut parser = sophia::turtle::parser::turtle::parse_bufread(reader);
            parser
                .try_for_each_triple(|t| -> Result<(), SinkError> {
                    sink_statement(
                        &mut store,
                        &t.s().to_string(),
                        &t.p().to_string(),
                        &t.o().to_string(),
                    )
                })
                .map_err(|e| IngestError::Parse(format!("Turtle: {e}")))?;
        }
        VocabFormat::RdfXml => {
            let mut parser = sophia::xml::parser::parse_bufread(reader);
            parser
                .try_for_each_triple(|t| -> Result<(), SinkError> {
                    sink_statement(
                        &mut store,
                        &t.s().to_string(),
                        &t.p().to_string(),
                        &t.o().to_string(),
                    )
                })
                .map_err(|e| IngestError::Parse(format!("RDF/XML: {e}")))?;
        }
    }

    Ok(store)
}
