//! Language abstraction

use serde::{Deserialize, Serialize};

/// Source languages a frontend can be registered for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    C,
    Cpp,
    Java,
    Go,
    Python,
    TypeScript,
}

impl Language {
    pub fn name(&self) -> &'static str {
        match self {
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::Java => "java",
            Language::Go => "go",
            Language::Python => "python",
            Language::TypeScript => "typescript",
        }
    }

    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Language::C => &["c", "h"],
            Language::Cpp => &["cpp", "cc", "cxx", "hpp", "hh"],
            Language::Java => &["java"],
            Language::Go => &["go"],
            Language::Python => &["py", "pyi"],
            Language::TypeScript => &["ts", "tsx"],
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.to_lowercase();
        [
            Language::C,
            Language::Cpp,
            Language::Java,
            Language::Go,
            Language::Python,
            Language::TypeScript,
        ]
        .into_iter()
        .find(|lang| lang.extensions().contains(&ext.as_str()))
    }

    pub fn from_file_path(path: &str) -> Option<Self> {
        let (_, ext) = path.rsplit_once('.')?;
        Self::from_extension(ext)
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
