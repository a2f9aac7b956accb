//! Populate a [`MemoryStore`] from serialized RDF text using Sophia.
//!
//! Parsing goes through Sophia's display form of each term, which keeps this
//! module independent of Sophia's term generics.

use crate::ns::XSD_NS;
use crate::store::MemoryStore;
use crate::term::{Literal, Node, Term, Triple};
use anyhow::{anyhow, bail, Context, Result};
use sophia::api::prelude::*;
// Our `Triple` shadows the prelude's; keep the accessor trait in scope.
use sophia::api::triple::Triple as _;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RdfFormat {
    NTriples,
    Turtle,
    RdfXml,
}

impl RdfFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "nt" | "ntriples" => Some(RdfFormat::NTriples),
            "ttl" | "turtle" => Some(RdfFormat::Turtle),
            "rdf" | "owl" | "xml" => Some(RdfFormat::RdfXml),
            _ => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("{message}")]
struct TripleSinkError {
    message: String,
}

impl From<anyhow::Error> for TripleSinkError {
    fn from(value: anyhow::Error) -> Self {
        Self {
            message: format!("{value:#}"),
        }
    }
}

/// Split `"lexical"suffix` at the closing quote. `None` if `s` is not quoted
/// or the quote never closes.
fn split_quoted(s: &str) -> Option<(&str, &str)> {
    let body = s.strip_prefix('"')?;
    let mut escaped = false;
    let end = body.char_indices().find_map(|(i, ch)| {
        let close = ch == '"' && !escaped;
        escaped = ch == '\\' && !escaped;
        close.then_some(i)
    })?;
    Some((&body[..end], body[end + 1..].trim()))
}

fn hex_char(chars: &mut std::str::Chars<'_>, digits: usize) -> Result<char> {
    let hex: String = chars.by_ref().take(digits).collect();
    if hex.len() != digits {
        bail!("truncated \\u escape: {hex}");
    }
    let code = u32::from_str_radix(&hex, 16).with_context(|| format!("bad \\u escape: {hex}"))?;
    char::from_u32(code).ok_or_else(|| anyhow!("escape is not a scalar value: {hex}"))
}

/// Decode the N-Triples string escapes (ECHAR and UCHAR).
fn unescape(raw: &str) -> Result<String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let decoded = match chars.next() {
            Some('n') => '\n',
            Some('r') => '\r',
            Some('t') => '\t',
            Some('b') => '\u{8}',
            Some('f') => '\u{c}',
            Some(q @ ('"' | '\'' | '\\')) => q,
            Some('u') => hex_char(&mut chars, 4)?,
            Some('U') => hex_char(&mut chars, 8)?,
            Some(other) => bail!("unknown escape \\{other}"),
            None => bail!("dangling backslash in {raw:?}"),
        };
        out.push(decoded);
    }
    Ok(out)
}

/// Parse the N-Triples-like display form of a single term.
///
/// `xsd:string` literals come back untyped, so they compare equal to the
/// plain literals built by hand.
pub(crate) fn parse_term(term: &str) -> Result<Term> {
    let s = term.trim();

    if let Some(iri) = s.strip_prefix('<').and_then(|t| t.strip_suffix('>')) {
        return Ok(Node::iri(iri).into());
    }
    if let Some(label) = s.strip_prefix("_:") {
        return Ok(Node::blank(label).into());
    }

    let (raw, suffix) = split_quoted(s).ok_or_else(|| anyhow!("unsupported RDF term form: {s}"))?;
    let lexical = unescape(raw)?;

    let literal = if let Some(lang) = suffix.strip_prefix('@') {
        Literal::lang(lexical, lang)
    } else if let Some(dt) = suffix.strip_prefix("^^") {
        let dt = dt.trim();
        let dt = dt.strip_prefix('<').and_then(|t| t.strip_suffix('>')).unwrap_or(dt);
        match dt.strip_prefix(XSD_NS) {
            Some("string") => Literal::plain(lexical),
            _ => Literal::typed(lexical, dt),
        }
    } else {
        Literal::plain(lexical)
    };
    Ok(literal.into())
}

fn parse_node(term: &str) -> Result<Node> {
    parse_term(term)?
        .into_node()
        .ok_or_else(|| anyhow!("expected IRI or blank node, got literal: {term}"))
}

fn to_triple(s: &str, p: &str, o: &str) -> Result<Option<Triple>> {
    let subject = parse_node(s)?;
    let Node::Iri(predicate) = parse_node(p)? else {
        return Ok(None);
    };
    let object = parse_term(o)?;
    Ok(Some(Triple {
        subject,
        predicate,
        object,
    }))
}

/// Parse serialized RDF into triples, in document order.
pub fn parse_triples(bytes: &[u8], format: RdfFormat) -> Result<Vec<Triple>> {
    let reader = std::io::BufReader::new(std::io::Cursor::new(bytes));
    let mut out: Vec<Triple> = Vec::new();

    match format {
        RdfFormat::NTriples => {
            let mut parser = sophia::turtle::parser::nt::parse_bufread(reader);
            parser
                .try_for_each_triple(|t| -> std::result::Result<(), TripleSinkError> {
                    let parsed =
                        to_triple(&t.s().to_string(), &t.p().to_string(), &t.o().to_string())?;
                    out.extend(parsed);
                    Ok(())
                })
                .map_err(|e| anyhow!("failed to parse N-Triples: {e}"))?;
        }
        RdfFormat::Turtle => {
            let mut parser = sophia::turtle::parser::turtle::parse_bufread(reader);
            parser
                .try_for_each_triple(|t| -> std::result::Result<(), TripleSinkError> {
                    let parsed =
                        to_triple(&t.s().to_string(), &t.p().to_string(), &t.o().to_string())?;
                    out.extend(parsed);
                    Ok(())
                })
                .map_err(|e| anyhow!("failed to parse Turtle: {e}"))?;
        }
        RdfFormat::RdfXml => {
            let mut parser = sophia::xml::parser::parse_bufread(reader);
            parser
                .try_for_each_triple(|t| -> std::result::Result<(), TripleSinkError> {
                    let parsed =
                        to_triple(&t.s().to_string(), &t.p().to_string(), &t.o().to_string())?;
                    out.extend(parsed);
                    Ok(())
                })
                .map_err(|e| anyhow!("failed to parse RDF/XML: {e}"))?;
        }
    }

    Ok(out)
}

impl MemoryStore {
    /// Parse `bytes` and add the triples; returns how many were new.
    pub fn load(&mut self, bytes: &[u8], format: RdfFormat) -> Result<usize> {
        let triples = parse_triples(bytes, format)?;
        let parsed = triples.len();
        let added = self.extend(triples);
        tracing::debug!(?format, parsed, added, "loaded RDF into memory store");
        Ok(added)
    }

    pub fn from_turtle(text: &str) -> Result<Self> {
        let mut store = Self::new();
        store.load(text.as_bytes(), RdfFormat::Turtle)?;
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ns::{RDFS_LABEL, RDF_TYPE};
    use crate::store::GraphStore;

    #[test]
    fn parses_display_forms() {
        assert_eq!(
            parse_term("<http://example.org/a>").unwrap(),
            Term::Node(Node::iri("http://example.org/a"))
        );
        assert_eq!(
            parse_term("_:b0").unwrap(),
            Term::Node(Node::blank("b0"))
        );
        assert_eq!(
            parse_term("\"say \\\"hi\\\"\"@en").unwrap(),
            Term::Literal(Literal::lang("say \"hi\"", "en"))
        );
        assert_eq!(
            parse_term("\"3\"^^<http://www.w3.org/2001/XMLSchema#integer>").unwrap(),
            Term::Literal(Literal::typed(
                "3",
                "http://www.w3.org/2001/XMLSchema#integer"
            ))
        );
        assert!(parse_term("\"open").is_err());
        assert!(parse_term("42").is_err());
    }

    #[test]
    fn decodes_unicode_escapes_and_untypes_xsd_string() {
        assert_eq!(
            parse_term(r#""\u0F40\U0001F600 ok""#).unwrap(),
            Term::Literal(Literal::plain("\u{0F40}\u{1F600} ok"))
        );
        assert_eq!(
            parse_term("\"x\"^^<http://www.w3.org/2001/XMLSchema#string>").unwrap(),
            Term::Literal(Literal::plain("x"))
        );
        assert!(parse_term(r#""\u12""#).is_err());
        assert!(parse_term(r#""\q""#).is_err());
    }

    #[test]
    fn turtle_triples_expose_sophia_accessors() {
        let ttl = r#"
@prefix ex: <http://example.org/> .
ex:a ex:p "v"@en ; ex:q ex:b .
"#;
        let triples = parse_triples(ttl.as_bytes(), RdfFormat::Turtle).expect("turtle");
        assert_eq!(
            triples,
            vec![
                Triple::new(
                    Node::iri("http://example.org/a"),
                    "http://example.org/p",
                    Literal::lang("v", "en")
                ),
                Triple::new(
                    Node::iri("http://example.org/a"),
                    "http://example.org/q",
                    Node::iri("http://example.org/b")
                ),
            ]
        );
    }

    #[test]
    fn loads_ntriples() {
        let nt = r#"
<http://example.org/Steel> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://example.org/Metal> .
<http://example.org/Steel> <http://www.w3.org/2000/01/rdf-schema#label> "Steel"@en .
"#;
        let mut store = MemoryStore::new();
        let added = store.load(nt.as_bytes(), RdfFormat::NTriples).expect("nt");
        assert_eq!(added, 2);

        let steel = Node::iri("http://example.org/Steel");
        let types = store.each(Some(&steel), Some(RDF_TYPE), None);
        assert_eq!(types, vec![Term::Node(Node::iri("http://example.org/Metal"))]);

        let labels = store.each(Some(&steel), Some(RDFS_LABEL), None);
        assert_eq!(labels, vec![Term::Literal(Literal::lang("Steel", "en"))]);
    }

    #[test]
    fn loads_turtle_lists_as_first_rest_chains() {
        let ttl = r#"
@prefix ex: <http://example.org/> .
ex:w ex:parts ( "a" "b" ) .
"#;
        let store = MemoryStore::from_turtle(ttl).expect("turtle");
        let head = store
            .any(
                Some(&Node::iri("http://example.org/w")),
                Some("http://example.org/parts"),
                None,
            )
            .and_then(Term::into_node)
            .expect("list head");
        let list = store.collection(&head).expect("collection");
        assert!(list.is_collection());
        match list {
            Node::Collection { elements, .. } => {
                let lexicals: Vec<&str> = elements
                    .iter()
                    .filter_map(Term::as_literal)
                    .map(|l| l.lexical.as_str())
                    .collect();
                assert_eq!(lexicals, vec!["a", "b"]);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn extension_maps_to_format() {
        assert_eq!(RdfFormat::from_extension("TTL"), Some(RdfFormat::Turtle));
        assert_eq!(RdfFormat::from_extension("nt"), Some(RdfFormat::NTriples));
        assert_eq!(RdfFormat::from_extension("json"), None);
    }
}
