//! Android manifest documents (`AndroidManifest.xml`).
//!
//! Field access addresses the attributes of the root `<manifest>` element,
//! which is where the version pair lives. The rest of the document streams
//! through untouched.

use quick_xml::{
    Reader, Writer,
    events::{BytesStart, Event},
};

use crate::{error::Error, traits::ManifestDocument};

pub const VERSION_CODE_ATTR: &str = "android:versionCode";
pub const VERSION_NAME_ATTR: &str = "android:versionName";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    text: String,
}

impl Document {
    /// Validates and wraps Android manifest XML.
    pub fn parse(text: &str) -> Result<Self, Error> {
        let mut reader = Reader::from_str(text);
        let mut root_seen = false;

        loop {
            match reader.read_event()? {
                Event::Start(e) | Event::Empty(e) => {
                    if !root_seen {
                        if e.name().as_ref() != b"manifest" {
                            return Err(Error::invalid_manifest(
                                "root element is not <manifest>",
                            ));
                        }
                        root_seen = true;
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !root_seen {
            return Err(Error::invalid_manifest("no root <manifest> element"));
        }
        Ok(Document {
            text: text.to_string(),
        })
    }

    /// The backing XML text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Reads an attribute of the root `<manifest>` element.
    pub fn get(&self, name: &str) -> Option<String> {
        self.find_attribute(name).ok().flatten()
    }

    fn find_attribute(&self, name: &str) -> Result<Option<String>, Error> {
        let mut reader = Reader::from_str(&self.text);

        loop {
            match reader.read_event()? {
                Event::Start(e) | Event::Empty(e) => {
                    for attr in e.attributes().with_checks(false) {
                        let attr = attr.map_err(|err| Error::invalid_manifest(err.to_string()))?;
                        if attr.key.as_ref() == name.as_bytes() {
                            return Ok(Some(attr.unescape_value()?.into_owned()));
                        }
                    }
                    return Ok(None);
                }
                Event::Eof => return Ok(None),
                _ => {}
            }
        }
    }

    /// Sets or adds an attribute on the root `<manifest>` element.
    pub fn set(&mut self, name: &str, value: &str) -> Result<(), Error> {
        let mut reader = Reader::from_str(&self.text);
        let mut writer = Writer::new(Vec::new());
        let mut rewritten = false;

        loop {
            let event = reader.read_event()?;
            match event {
                Event::Start(e) if !rewritten && e.name().as_ref() == b"manifest" => {
                    writer.write_event(Event::Start(with_attribute(&e, name, value)?))?;
                    rewritten = true;
                }
                Event::Empty(e) if !rewritten && e.name().as_ref() == b"manifest" => {
                    writer.write_event(Event::Empty(with_attribute(&e, name, value)?))?;
                    rewritten = true;
                }
                Event::Eof => break,
                other => writer.write_event(other)?,
            }
        }

        if !rewritten {
            return Err(Error::invalid_manifest("no root <manifest> element"));
        }

        self.text = String::from_utf8(writer.into_inner())
            .map_err(|e| Error::invalid_manifest(e.to_string()))?;
        Ok(())
    }
}

/// Rebuilds the manifest start tag with one attribute replaced or appended.
fn with_attribute(
    element: &BytesStart,
    name: &str,
    value: &str,
) -> Result<BytesStart<'static>, Error> {
    let mut rebuilt = BytesStart::new("manifest");
    let mut found = false;

    for attr in element.attributes().with_checks(false) {
        let attr = attr.map_err(|err| Error::invalid_manifest(err.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        if key == name {
            rebuilt.push_attribute((key.as_str(), value));
            found = true;
        } else {
            let existing = attr.unescape_value()?;
            rebuilt.push_attribute((key.as_str(), existing.as_ref()));
        }
    }
    if !found {
        rebuilt.push_attribute((name, value));
    }

    Ok(rebuilt)
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

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    const ANDROID_MANIFEST: &str = indoc! {r#"
        <?xml version="1.0" encoding="utf-8"?>
        <manifest xmlns:android="http://schemas.android.com/apk/res/android"
            package="com.example.demo"
            android:versionCode="1"
            android:versionName="1.2">
            <application android:label="Demo">
                <activity android:name=".MainActivity" />
            </application>
        </manifest>
    "#};

    #[test]
    fn test_get_version_attributes() {
        let document = Document::parse(ANDROID_MANIFEST).unwrap();
        assert_eq!(document.get(VERSION_CODE_ATTR).as_deref(), Some("1"));
        assert_eq!(document.get(VERSION_NAME_ATTR).as_deref(), Some("1.2"));
        assert_eq!(document.get("package").as_deref(), Some("com.example.demo"));
    }

    #[test]
    fn test_get_missing_attribute() {
        let document = Document::parse(ANDROID_MANIFEST).unwrap();
        assert_eq!(document.get("android:installLocation"), None);
    }

    #[test]
    fn test_set_replaces_attribute() {
        let mut document = Document::parse(ANDROID_MANIFEST).unwrap();
        document.set(VERSION_CODE_ATTR, "42").unwrap();
        assert_eq!(document.get(VERSION_CODE_ATTR).as_deref(), Some("42"));
        // The body of the manifest is untouched.
        assert!(document.as_str().contains("android:name=\".MainActivity\""));
        assert_eq!(document.get("package").as_deref(), Some("com.example.demo"));
    }

    #[test]
    fn test_set_adds_missing_attribute() {
        let manifest = indoc! {r#"
            <manifest xmlns:android="http://schemas.android.com/apk/res/android"
                package="com.example.demo">
            </manifest>
        "#};
        let mut document = Document::parse(manifest).unwrap();
        document.set(VERSION_CODE_ATTR, "7").unwrap();
        assert_eq!(document.get(VERSION_CODE_ATTR).as_deref(), Some("7"));
    }

    #[test]
    fn test_nested_elements_keep_their_attributes() {
        let mut document = Document::parse(ANDROID_MANIFEST).unwrap();
        document.set(VERSION_NAME_ATTR, "1.2.42").unwrap();
        assert!(document.as_str().contains("android:label=\"Demo\""));
        assert_eq!(document.get(VERSION_NAME_ATTR).as_deref(), Some("1.2.42"));
    }

    #[test]
    fn test_parse_rejects_non_manifest_root() {
        let result = Document::parse("<resources></resources>");
        assert!(matches!(result, Err(Error::InvalidManifest(_))));
    }
}
