//! Decoders for the BoardGameGeek XML API 2 feeds.
//!
//! Two documents are understood: the collection feed (`/xmlapi2/collection`),
//! which yields the object ids a user owns, and the thing feed
//! (`/xmlapi2/thing`), which yields names, player counts and polls for one
//! game. Both are read with a streaming `quick_xml` reader; unknown elements
//! are skipped.
//!
//! The provider reports some failures (e.g. an unknown username) with a 200
//! status and an `<errors><error><message>` body. Those are surfaced as
//! [`FeedError::Provider`].

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::FeedError;
use crate::model::{Collection, CollectionItem, GameMetadata, GameName, Poll, PollRow, VoteTally};

/// Collects `<message>` text found under an `<error>`/`<errors>` element.
#[derive(Default)]
struct ProviderErrors {
    depth: usize,
    messages: Vec<String>,
}

impl ProviderErrors {
    fn enter(&mut self, tag: &str) {
        if tag == "error" || tag == "errors" {
            self.depth += 1;
        }
    }

    fn leave(&mut self, tag: &str) {
        if (tag == "error" || tag == "errors") && self.depth > 0 {
            self.depth -= 1;
        }
    }

    fn text(&mut self, tag: &str, text: &str) {
        if self.depth > 0 && tag == "message" {
            self.messages.push(text.trim().to_string());
        }
    }

    fn into_error(self) -> Option<FeedError> {
        if self.messages.is_empty() {
            None
        } else {
            Some(FeedError::provider(self.messages.join("; ")))
        }
    }
}

fn tag_name(name: &[u8]) -> String {
    String::from_utf8_lossy(name).to_string()
}

fn attr_value(e: &BytesStart<'_>, key: &[u8]) -> Result<Option<String>, FeedError> {
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.as_ref() == key {
            return Ok(Some(attr.unescape_value()?.to_string()));
        }
    }
    Ok(None)
}

fn parse_u32(field: &'static str, value: &str) -> Result<u32, FeedError> {
    value
        .trim()
        .parse()
        .map_err(|_| FeedError::invalid_number(field, value))
}

fn numeric_attr(e: &BytesStart<'_>, key: &[u8], field: &'static str) -> Result<u32, FeedError> {
    match attr_value(e, key)? {
        Some(v) => parse_u32(field, &v),
        None => Ok(0),
    }
}

fn start_poll(e: &BytesStart<'_>) -> Result<Poll, FeedError> {
    Ok(Poll {
        name: attr_value(e, b"name")?.unwrap_or_default(),
        total_votes: numeric_attr(e, b"totalvotes", "poll totalvotes")?,
        rows: Vec::new(),
    })
}

fn start_row(e: &BytesStart<'_>) -> Result<PollRow, FeedError> {
    Ok(PollRow {
        label: attr_value(e, b"numplayers")?,
        tallies: Vec::new(),
    })
}

fn parse_tally(e: &BytesStart<'_>) -> Result<VoteTally, FeedError> {
    Ok(VoteTally {
        value: attr_value(e, b"value")?.unwrap_or_default(),
        num_votes: numeric_attr(e, b"numvotes", "result numvotes")?,
    })
}

/// Decode a thing feed. Only the first `<item>` is read.
pub fn parse_thing(bytes: &[u8]) -> Result<GameMetadata, FeedError> {
    let mut xml = Reader::from_reader(bytes);
    xml.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut game = GameMetadata::default();
    let mut errors = ProviderErrors::default();

    let mut seen_item = false;
    let mut in_item = false;
    let mut current_tag = String::new();
    let mut current_poll: Option<Poll> = None;
    let mut current_row: Option<PollRow> = None;

    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Start(ref e) => {
                let tag = tag_name(e.name().as_ref());
                errors.enter(&tag);
                match tag.as_str() {
                    "item" if !seen_item => {
                        seen_item = true;
                        in_item = true;
                    }
                    "poll" if in_item => current_poll = Some(start_poll(e)?),
                    "results" if current_poll.is_some() => current_row = Some(start_row(e)?),
                    _ => {}
                }
                current_tag = tag;
            }
            Event::Empty(ref e) => {
                let tag = tag_name(e.name().as_ref());
                if in_item {
                    match tag.as_str() {
                        "name" if current_poll.is_none() => {
                            game.names.push(GameName {
                                value: attr_value(e, b"value")?.unwrap_or_default(),
                                kind: attr_value(e, b"type")?.unwrap_or_default(),
                            });
                        }
                        "minplayers" => {
                            game.min_players = numeric_attr(e, b"value", "minplayers")?;
                        }
                        "maxplayers" => {
                            game.max_players = numeric_attr(e, b"value", "maxplayers")?;
                        }
                        "result" => {
                            if let Some(ref mut row) = current_row {
                                row.tallies.push(parse_tally(e)?);
                            }
                        }
                        "results" => {
                            if let Some(ref mut poll) = current_poll {
                                poll.rows.push(start_row(e)?);
                            }
                        }
                        "poll" => game.polls.push(start_poll(e)?),
                        _ => {}
                    }
                }
            }
            Event::Text(ref e) => {
                let text = e.unescape()?;
                errors.text(&current_tag, &text);
                if in_item && current_tag == "description" {
                    game.description
                        .get_or_insert_with(String::new)
                        .push_str(&text);
                }
            }
            Event::End(ref e) => {
                let tag = tag_name(e.name().as_ref());
                errors.leave(&tag);
                match tag.as_str() {
                    "item" if in_item => in_item = false,
                    "poll" => {
                        if let Some(poll) = current_poll.take() {
                            game.polls.push(poll);
                        }
                    }
                    "results" => {
                        if let (Some(row), Some(poll)) = (current_row.take(), current_poll.as_mut())
                        {
                            poll.rows.push(row);
                        }
                    }
                    _ => {}
                }
                current_tag.clear();
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if let Some(err) = errors.into_error() {
        return Err(err);
    }
    if !seen_item {
        return Err(FeedError::MissingItem);
    }

    Ok(game)
}

/// Decode a collection feed into its items, in feed order.
pub fn parse_collection(bytes: &[u8]) -> Result<Collection, FeedError> {
    let mut xml = Reader::from_reader(bytes);
    xml.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut collection = Collection::default();
    let mut errors = ProviderErrors::default();

    let mut current_tag = String::new();

    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Start(ref e) => {
                let tag = tag_name(e.name().as_ref());
                errors.enter(&tag);
                if tag == "item" {
                    collection.items.push(collection_item(e)?);
                }
                current_tag = tag;
            }
            Event::Empty(ref e) => {
                if e.name().as_ref() == b"item" {
                    collection.items.push(collection_item(e)?);
                }
            }
            Event::Text(ref e) => {
                let text = e.unescape()?;
                errors.text(&current_tag, &text);
            }
            Event::End(ref e) => {
                let tag = tag_name(e.name().as_ref());
                errors.leave(&tag);
                current_tag.clear();
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if let Some(err) = errors.into_error() {
        return Err(err);
    }

    log::debug!("Decoded collection with {} items", collection.items.len());
    Ok(collection)
}

fn collection_item(e: &BytesStart<'_>) -> Result<CollectionItem, FeedError> {
    let object_id = attr_value(e, b"objectid")?.unwrap_or_default();
    Ok(CollectionItem::new(object_id))
}
