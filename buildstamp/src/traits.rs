use crate::error::Error;

/// Capability shared by the concrete manifest document kinds: load into a
/// typed document, read and mutate top-level fields, serialize back out.
pub trait ManifestDocument: Sized {
    /// Parse from any reader.
    fn from_reader<R: std::io::BufRead>(reader: R) -> Result<Self, Error>;

    /// Parse from file path.
    fn read_from<P: AsRef<std::path::Path>>(path: P) -> Result<Self, Error> {
        let file = std::fs::File::open(path).map_err(Error::Io)?;
        let reader = std::io::BufReader::new(file);
        Self::from_reader(reader)
    }

    /// Write to any writer (file, memory, etc.).
    fn to_writer<W: std::io::Write>(&self, writer: W) -> Result<(), Error>;

    /// Write to file path.
    fn write_to<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), Error> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        self.to_writer(writer)
    }

    /// Read a top-level field, if present.
    fn get_field(&self, name: &str) -> Option<String>;

    /// Set or insert a top-level field.
    fn set_field(&mut self, name: &str, value: &str) -> Result<(), Error>;
}
