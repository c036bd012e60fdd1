//! Reading documents from disk and resolving `import` declarations.
//!
//! The concrete syntax is chosen by extension: `.logic` text, `.json` or
//! `.xml`. Imported modules are looked up as `<dir>/<Name>.<ext>` in each
//! module directory in turn.

use std::fmt;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use logic_fmt::{json, xml, JsonError, XmlError};
use logic_parser::{parse_with_spans, ImportLoader, ParseError, Program, SourceMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Text,
    Json,
    Xml,
}

impl Format {
    pub const ALL: [Format; 3] = [Format::Text, Format::Json, Format::Xml];

    pub fn extension(self) -> &'static str {
        match self {
            Format::Text => "logic",
            Format::Json => "json",
            Format::Xml => "xml",
        }
    }

    pub fn from_path(path: &Path) -> Option<Format> {
        let ext = path.extension()?.to_str()?;
        Format::ALL.into_iter().find(|f| f.extension() == ext)
    }
}

#[derive(Debug)]
pub enum LoadError {
    Io { path: PathBuf, message: String },
    UnknownFormat { path: PathBuf },
    Parse(ParseError),
    Json(JsonError),
    Xml(XmlError),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io { path, message } => {
                write!(f, "Failed to read '{}': {}", path.display(), message)
            }
            LoadError::UnknownFormat { path } => write!(
                f,
                "'{}' has no known extension (expected .logic, .json or .xml)",
                path.display()
            ),
            LoadError::Parse(e) => write!(f, "Parse error: {}", e),
            LoadError::Json(e) => write!(f, "{}", e),
            LoadError::Xml(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for LoadError {}

/// The format and text of an input file.
pub fn read_source(path: &Path) -> Result<(Format, String), LoadError> {
    let format = Format::from_path(path).ok_or_else(|| LoadError::UnknownFormat {
        path: path.to_path_buf(),
    })?;
    let source = std::fs::read_to_string(path).map_err(|e| LoadError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    Ok((format, source))
}

pub fn read_program(path: &Path) -> Result<Program, LoadError> {
    let (format, source) = read_source(path)?;
    Ok(decode(format, &source)?.0)
}

/// Decode `source`. Only text documents carry spans.
pub fn decode(format: Format, source: &str) -> Result<(Program, SourceMap), LoadError> {
    match format {
        Format::Text => {
            let parsed = parse_with_spans(source).map_err(LoadError::Parse)?;
            Ok((parsed.program, parsed.source_map))
        }
        Format::Json => Ok((
            json::decode_program(source).map_err(LoadError::Json)?,
            SourceMap::default(),
        )),
        Format::Xml => Ok((
            xml::decode_program(source).map_err(LoadError::Xml)?,
            SourceMap::default(),
        )),
    }
}

/// Loads imported modules from a list of directories.
///
/// Modules that exist but fail to decode are kept in [`ModuleLoader::failures`]
/// so the caller can report the real cause instead of "not found".
pub struct ModuleLoader {
    dirs: Vec<PathBuf>,
    failures: Vec<LoadError>,
}

impl ModuleLoader {
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        ModuleLoader {
            dirs,
            failures: Vec::new(),
        }
    }

    pub fn failures(&self) -> &[LoadError] {
        &self.failures
    }

    fn find(&self, name: &str) -> Option<PathBuf> {
        self.dirs.iter().find_map(|dir| {
            Format::ALL
                .into_iter()
                .map(|format| dir.join(format!("{}.{}", name, format.extension())))
                .find(|path| path.is_file())
        })
    }
}

impl ImportLoader for ModuleLoader {
    fn load(&mut self, name: &str) -> Option<Program> {
        let path = self.find(name)?;
        match read_program(&path) {
            Ok(program) => Some(program),
            Err(err) => {
                self.failures.push(err);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logic_parser::{expand_imports, parse, ImportError};

    #[test]
    fn format_by_extension() {
        assert_eq!(Format::from_path(Path::new("a/b.logic")), Some(Format::Text));
        assert_eq!(Format::from_path(Path::new("tokens.json")), Some(Format::Json));
        assert_eq!(Format::from_path(Path::new("tokens.xml")), Some(Format::Xml));
        assert_eq!(Format::from_path(Path::new("README")), None);
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = read_source(Path::new("notes.txt")).unwrap_err();
        assert!(matches!(err, LoadError::UnknownFormat { .. }));
    }

    #[test]
    fn imports_resolve_across_directories_and_formats() {
        let dir = tempfile::tempdir().unwrap();
        let lib = dir.path().join("lib");
        std::fs::create_dir_all(&lib).unwrap();

        let colors = parse("let primary: Color = #color(css: \"red\")").unwrap();
        std::fs::write(
            lib.join("Colors.json"),
            json::encode_program(&colors).unwrap(),
        )
        .unwrap();
        std::fs::write(
            dir.path().join("Spacing.logic"),
            "import Colors\nlet small: Number = 4",
        )
        .unwrap();

        let main = parse("import Spacing\nlet x: Number = small").unwrap();
        let mut loader = ModuleLoader::new(vec![dir.path().to_path_buf(), lib]);
        let expanded = expand_imports(main, &mut loader).unwrap();

        let names: Vec<&str> = expanded
            .declarations()
            .filter_map(|d| d.name().map(|p| p.name.as_str()))
            .collect();
        assert_eq!(names, vec!["primary", "small", "x"]);
        assert!(loader.failures().is_empty());
    }

    #[test]
    fn broken_modules_are_kept_as_failures() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Broken.xml"), "<Program>").unwrap();

        let main = parse("import Broken").unwrap();
        let mut loader = ModuleLoader::new(vec![dir.path().to_path_buf()]);
        let err = expand_imports(main, &mut loader).unwrap_err();

        assert_eq!(
            err,
            ImportError::NotFound {
                name: "Broken".into()
            }
        );
        assert!(matches!(loader.failures(), [LoadError::Xml(_)]));
    }
}
