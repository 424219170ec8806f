use crate::ast::{Element, Node};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("empty input")]
    Empty,
    #[error("malformed xml at byte {position}: {message}")]
    Malformed { position: u64, message: String },
    #[error("closing tag </{0}> without a matching open tag")]
    UnexpectedClose(String),
    #[error("element <{0}> is never closed")]
    Unclosed(String),
    #[error("document has more than one root element")]
    MultipleRoots,
}

/// Parse an XML document into its root [`Element`].
///
/// Whitespace around text is trimmed and whitespace-only text is dropped, so
/// indentation between elements never shows up as content.
pub fn parse_document(input: &str) -> Result<Element, ParseError> {
    let mut reader = Reader::from_str(input);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let event = reader.read_event().map_err(|e| ParseError::Malformed {
            position: reader.error_position() as u64,
            message: e.to_string(),
        })?;

        match event {
            Event::Start(start) => stack.push(open_element(&reader, &start)?),
            Event::Empty(start) => {
                let element = open_element(&reader, &start)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(end) => {
                let name = String::from_utf8_lossy(end.local_name().as_ref()).into_owned();
                let element = stack.pop().ok_or(ParseError::UnexpectedClose(name))?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(text) => {
                let text = text.unescape().map_err(|e| ParseError::Malformed {
                    position: reader.buffer_position() as u64,
                    message: e.to_string(),
                })?;
                push_text(&mut stack, text.into_owned());
            }
            Event::CData(data) => {
                let text = String::from_utf8_lossy(&data.into_inner()).into_owned();
                push_text(&mut stack, text);
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions, doctypes.
            _ => {}
        }
    }

    if let Some(open) = stack.pop() {
        return Err(ParseError::Unclosed(open.name));
    }
    root.ok_or(ParseError::Empty)
}

fn open_element(reader: &Reader<&[u8]>, start: &BytesStart<'_>) -> Result<Element, ParseError> {
    let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
    let mut element = Element::new(name);

    for attr in start.attributes() {
        let attr = attr.map_err(|e| ParseError::Malformed {
            position: reader.buffer_position() as u64,
            message: e.to_string(),
        })?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value().map_err(|e| ParseError::Malformed {
            position: reader.buffer_position() as u64,
            message: e.to_string(),
        })?;
        element.set_attr(key, value.into_owned());
    }

    Ok(element)
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), ParseError> {
    match stack.last_mut() {
        Some(parent) => {
            parent.push(Node::Element(element));
            Ok(())
        }
        None if root.is_some() => Err(ParseError::MultipleRoots),
        None => {
            *root = Some(element);
            Ok(())
        }
    }
}

fn push_text(stack: &mut [Element], text: String) {
    // Text outside the root element carries no meaning for a grammar.
    if text.is_empty() {
        return;
    }
    if let Some(parent) = stack.last_mut() {
        parent.push(Node::Text(text));
    }
}
