//! Extraction of ranking entries from a `TopSites` response body.

use quick_xml::Reader;
use quick_xml::events::Event;
use tracing::debug;

use crate::RankingEntry;
use crate::error::XmlError;

/// Parse every `Site` element of a response into a [`RankingEntry`].
///
/// Returns an empty vector when the document holds no sites. A site missing
/// its `DataUrl` or `Country/Rank` fails the whole parse.
///
/// # Errors
///
/// Returns [`XmlError::MissingElement`] for an incomplete site,
/// [`XmlError::ParseError`] for a non-numeric rank, and
/// [`XmlError::QuickXml`] for malformed XML.
///
/// # Examples
///
/// ```
/// use topsites_xml::{RankingEntry, parse_ranking};
///
/// let xml = b"<Sites><Site><DataUrl>a.com</DataUrl><Country><Rank>1</Rank></Country></Site></Sites>";
/// assert_eq!(parse_ranking(xml).unwrap(), vec![RankingEntry::new(1, "a.com")]);
/// ```
pub fn parse_ranking(xml: &[u8]) -> Result<Vec<RankingEntry>, XmlError> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut entries = Vec::new();
    loop {
        match reader.read_event()? {
            Event::Start(e) if e.local_name().as_ref() == b"Site" => {
                entries.push(deserialize_site(&mut reader)?);
            }
            Event::Empty(e) if e.local_name().as_ref() == b"Site" => {
                return Err(XmlError::MissingElement("Site/DataUrl".to_string()));
            }
            Event::Eof => break,
            // Descend into every other element.
            _ => {}
        }
    }

    debug!(entries = entries.len(), "Parsed ranking entries");
    Ok(entries)
}

/// Read a `Site` element's children through its end tag.
fn deserialize_site(reader: &mut Reader<&[u8]>) -> Result<RankingEntry, XmlError> {
    let mut data_url = None;
    let mut rank = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match local_name(&e)?.as_str() {
                "DataUrl" => data_url = Some(read_text_content(reader)?),
                "Country" => rank = deserialize_country_rank(reader)?,
                _ => skip_element(reader)?,
            },
            Event::End(_) => break,
            Event::Eof => {
                return Err(XmlError::UnexpectedElement(
                    "unexpected EOF in Site".to_string(),
                ));
            }
            _ => {}
        }
    }

    let item = data_url
        .filter(|url| !url.is_empty())
        .ok_or_else(|| XmlError::MissingElement("Site/DataUrl".to_string()))?;
    let rank = rank.ok_or_else(|| XmlError::MissingElement("Site/Country/Rank".to_string()))?;

    Ok(RankingEntry {
        rank: parse_rank(&rank)?,
        item,
    })
}

/// Read a `Country` element and return the text of its `Rank` child, if any.
fn deserialize_country_rank(reader: &mut Reader<&[u8]>) -> Result<Option<String>, XmlError> {
    let mut rank = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                if local_name(&e)? == "Rank" {
                    rank = Some(read_text_content(reader)?);
                } else {
                    skip_element(reader)?;
                }
            }
            Event::End(_) => break,
            Event::Eof => {
                return Err(XmlError::UnexpectedElement(
                    "unexpected EOF in Country".to_string(),
                ));
            }
            _ => {}
        }
    }

    Ok(rank.filter(|r| !r.is_empty()))
}

fn local_name(e: &quick_xml::events::BytesStart<'_>) -> Result<String, XmlError> {
    let name = e.local_name();
    std::str::from_utf8(name.as_ref())
        .map(ToOwned::to_owned)
        .map_err(|err| XmlError::ParseError(err.to_string()))
}

/// Read the text content of the current element and consume its end tag.
///
/// Character and predefined entity references arrive as separate
/// `GeneralRef` events and are resolved in place.
fn read_text_content(reader: &mut Reader<&[u8]>) -> Result<String, XmlError> {
    let mut text = String::new();
    loop {
        match reader.read_event()? {
            Event::Text(e) => {
                let decoded = e
                    .decode()
                    .map_err(|err| XmlError::ParseError(err.to_string()))?;
                text.push_str(&decoded);
            }
            Event::GeneralRef(e) => {
                let resolved = e
                    .resolve_char_ref()
                    .map_err(|err| XmlError::ParseError(err.to_string()))?;
                if let Some(ch) = resolved {
                    text.push(ch);
                } else {
                    let name = e
                        .decode()
                        .map_err(|err| XmlError::ParseError(err.to_string()))?;
                    let entity = quick_xml::escape::resolve_predefined_entity(&name)
                        .ok_or_else(|| XmlError::ParseError(format!("unknown entity &{name};")))?;
                    text.push_str(entity);
                }
            }
            Event::End(_) => {
                return Ok(text);
            }
            Event::Eof => {
                return Err(XmlError::UnexpectedElement(
                    "unexpected EOF while reading text content".to_string(),
                ));
            }
            _ => {}
        }
    }
}

/// Skip over an element and all its children.
fn skip_element(reader: &mut Reader<&[u8]>) -> Result<(), XmlError> {
    let mut depth: u32 = 1;
    loop {
        match reader.read_event()? {
            Event::Start(_) => depth += 1,
            Event::End(_) => {
                depth -= 1;
                if depth == 0 {
                    return Ok(());
                }
            }
            Event::Eof => {
                return Err(XmlError::UnexpectedElement(
                    "unexpected EOF while skipping element".to_string(),
                ));
            }
            _ => {}
        }
    }
}

fn parse_rank(s: &str) -> Result<u32, XmlError> {
    s.trim()
        .parse::<u32>()
        .map_err(|e| XmlError::ParseError(format!("invalid rank '{s}': {e}")))
}
