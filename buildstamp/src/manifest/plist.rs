//! XML property-list documents (`Info.plist`).
//!
//! The document keeps the original XML text and edits it by streaming
//! events, so formatting, comments, and nested structures it does not touch
//! survive a round trip. Field access addresses the `<key>`/value pairs of
//! the top-level `<dict>`; nested dicts and arrays pass through untouched.

use quick_xml::{
    Reader, Writer,
    events::{BytesEnd, BytesStart, BytesText, Event},
};

use crate::{error::Error, traits::ManifestDocument};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    text: String,
}

impl Document {
    /// Validates and wraps property-list XML.
    pub fn parse(text: &str) -> Result<Self, Error> {
        let mut reader = Reader::from_str(text);
        let mut depth = 0usize;
        let mut has_root_dict = false;

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    if matches!(e.name().as_ref(), b"dict" | b"array") {
                        if depth == 0 && e.name().as_ref() == b"dict" {
                            has_root_dict = true;
                        }
                        depth += 1;
                    }
                }
                Event::End(e) => {
                    if matches!(e.name().as_ref(), b"dict" | b"array") {
                        depth = depth.saturating_sub(1);
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !has_root_dict {
            return Err(Error::invalid_manifest(
                "property list has no top-level dict",
            ));
        }
        Ok(Document {
            text: text.to_string(),
        })
    }

    /// The backing XML text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Reads the value of a top-level key. Boolean values come back as
    /// `true`/`false`; container values are not addressable as fields.
    pub fn get(&self, key: &str) -> Option<String> {
        self.find_value(key).ok().flatten()
    }

    fn find_value(&self, key: &str) -> Result<Option<String>, Error> {
        let mut reader = Reader::from_str(&self.text);
        let mut depth = 0usize;
        let mut key_matches = false;

        loop {
            match reader.read_event()? {
                Event::Start(e) => match e.name().as_ref() {
                    b"dict" | b"array" => {
                        if key_matches && depth == 1 {
                            return Ok(None);
                        }
                        depth += 1;
                    }
                    b"key" if depth == 1 => {
                        let name = reader.read_text(e.name())?;
                        key_matches = name.as_ref() == key;
                    }
                    _ if key_matches && depth == 1 => {
                        let value = reader.read_text(e.name())?;
                        return Ok(Some(value.into_owned()));
                    }
                    _ => {}
                },
                Event::Empty(e) if key_matches && depth == 1 => {
                    let value = match e.name().as_ref() {
                        b"true" => "true",
                        b"false" => "false",
                        _ => "",
                    };
                    return Ok(Some(value.to_string()));
                }
                Event::End(e) => {
                    if matches!(e.name().as_ref(), b"dict" | b"array") {
                        depth = depth.saturating_sub(1);
                    }
                }
                Event::Eof => return Ok(None),
                _ => {}
            }
        }
    }

    /// Sets a top-level key to a `<string>` value, replacing whatever value
    /// element the key had. A missing key is appended to the top-level
    /// dict.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), Error> {
        let mut reader = Reader::from_str(&self.text);
        let mut writer = Writer::new(Vec::new());
        let mut depth = 0usize;
        let mut replace_next = false;
        let mut replaced = false;

        loop {
            let event = reader.read_event()?;
            match event {
                Event::Start(e) => {
                    let name = e.name().as_ref().to_vec();
                    match name.as_slice() {
                        b"dict" | b"array" => {
                            if replace_next && depth == 1 {
                                // Container value of the matched key:
                                // swallowed wholesale and replaced by a
                                // string.
                                reader.read_to_end(e.name())?;
                                write_string_value(&mut writer, value)?;
                                replace_next = false;
                                replaced = true;
                            } else {
                                depth += 1;
                                writer.write_event(Event::Start(e))?;
                            }
                        }
                        b"key" if depth == 1 => {
                            let text = reader.read_text(e.name())?;
                            replace_next = !replaced && text.as_ref() == key;
                            writer.write_event(Event::Start(e))?;
                            writer.write_event(Event::Text(BytesText::new(&text)))?;
                            writer.write_event(Event::End(BytesEnd::new("key")))?;
                        }
                        _ => {
                            if replace_next && depth == 1 {
                                reader.read_to_end(e.name())?;
                                write_string_value(&mut writer, value)?;
                                replace_next = false;
                                replaced = true;
                            } else {
                                writer.write_event(Event::Start(e))?;
                            }
                        }
                    }
                }
                Event::Empty(e) => {
                    if replace_next && depth == 1 {
                        write_string_value(&mut writer, value)?;
                        replace_next = false;
                        replaced = true;
                    } else {
                        writer.write_event(Event::Empty(e))?;
                    }
                }
                Event::End(e) => {
                    if matches!(e.name().as_ref(), b"dict" | b"array") {
                        if depth == 1 && e.name().as_ref() == b"dict" && !replaced {
                            // Key absent: append the pair at the end of the
                            // top-level dict.
                            writer.write_event(Event::Start(BytesStart::new("key")))?;
                            writer.write_event(Event::Text(BytesText::new(key)))?;
                            writer.write_event(Event::End(BytesEnd::new("key")))?;
                            write_string_value(&mut writer, value)?;
                            writer.write_event(Event::Text(BytesText::new("\n")))?;
                            replaced = true;
                        }
                        depth = depth.saturating_sub(1);
                    }
                    writer.write_event(Event::End(e))?;
                }
                Event::Eof => break,
                other => writer.write_event(other)?,
            }
        }

        if !replaced {
            return Err(Error::invalid_manifest(
                "property list has no top-level dict",
            ));
        }

        self.text = String::from_utf8(writer.into_inner())
            .map_err(|e| Error::invalid_manifest(e.to_string()))?;
        Ok(())
    }
}

fn write_string_value<W: std::io::Write>(writer: &mut Writer<W>, value: &str) -> Result<(), Error> {
    writer.write_event(Event::Start(BytesStart::new("string")))?;
    writer.write_event(Event::Text(BytesText::new(value)))?;
    writer.write_event(Event::End(BytesEnd::new("string")))?;
    Ok(())
}

impl ManifestDocument for Document {
    fn from_reader<R: std::io::BufRead>(mut reader: R) -> Result<Self, Error> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Document::parse(&text)
    }

    fn to_writer<W: std::io::Write>(&self, mut writer: W) -> Result<(), Error> {
        writer.write_all(self.text.as_bytes())?;
        Ok(())
    }

    fn get_field(&self, name: &str) -> Option<String> {
        self.get(name)
    }

    fn set_field(&mut self, name: &str, value: &str) -> Result<(), Error> {
        self.set(name, value)
    }
}
