pub mod android;
pub mod plist;

// Reexporting the documents for easier access
pub use android::Document as AndroidManifestDocument;
pub use plist::Document as PlistDocument;

use crate::error::Error;

/// The two concrete manifest document kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestKind {
    /// An XML property list (`Info.plist`).
    PropertyList,
    /// An `AndroidManifest.xml`.
    AndroidManifest,
}

impl ManifestKind {
    pub fn extension(&self) -> &'static str {
        match self {
            ManifestKind::PropertyList => "plist",
            ManifestKind::AndroidManifest => "xml",
        }
    }

    /// Checks that `text` parses as this document kind.
    pub fn validate(&self, text: &str) -> Result<(), Error> {
        match self {
            ManifestKind::PropertyList => plist::Document::parse(text).map(|_| ()),
            ManifestKind::AndroidManifest => android::Document::parse(text).map(|_| ()),
        }
    }
}
