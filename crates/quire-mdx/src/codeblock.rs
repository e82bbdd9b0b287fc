//! Code block extraction and code example grouping.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Programming language of a code block.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(into = "String")]
pub enum Language {
    Bash,
    Curl,
    Cpp,
    Go,
    Html,
    Java,
    JavaScript,
    Json,
    Python,
    Scss,
    Toml,
    TypeScript,
    Tsx,
    Yaml,
    /// Any other info string, kept verbatim (lowercased)
    Other(String),
    #[default]
    Unknown,
}

impl Language {
    /// Parse language from code fence info string.
    pub fn from_info(info: &str) -> Self {
        let lang = info.split_whitespace().next().unwrap_or("");
        match lang.to_lowercase().as_str() {
            "" => Self::Unknown,
            "bash" | "sh" | "shell" => Self::Bash,
            "curl" => Self::Curl,
            "cpp" | "c++" => Self::Cpp,
            "go" | "golang" => Self::Go,
            "html" => Self::Html,
            "java" => Self::Java,
            "js" | "javascript" => Self::JavaScript,
            "json" => Self::Json,
            "python" | "py" => Self::Python,
            "scss" => Self::Scss,
            "toml" => Self::Toml,
            "ts" | "typescript" => Self::TypeScript,
            "tsx" => Self::Tsx,
            "yaml" | "yml" => Self::Yaml,
            other => Self::Other(other.to_string()),
        }
    }

    /// Canonical identifier, used for language preferences.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Bash => "bash",
            Self::Curl => "curl",
            Self::Cpp => "cpp",
            Self::Go => "go",
            Self::Html => "html",
            Self::Java => "java",
            Self::JavaScript => "js",
            Self::Json => "json",
            Self::Python => "python",
            Self::Scss => "scss",
            Self::Toml => "toml",
            Self::TypeScript => "ts",
            Self::Tsx => "tsx",
            Self::Yaml => "yaml",
            Self::Other(name) => name,
            Self::Unknown => "",
        }
    }

    /// Display label shown in the language selector.
    pub fn label(&self) -> &str {
        match self {
            Self::Bash => "bash",
            Self::Curl => "cURL",
            Self::Cpp => "C++",
            Self::Go => "Go",
            Self::Html => "html",
            Self::Java => "Java",
            Self::JavaScript => "JavaScript",
            Self::Json => "json",
            Self::Python => "Python",
            Self::Scss => "SCSS",
            Self::Toml => "TOML",
            Self::TypeScript => "TypeScript",
            Self::Tsx => "TSX",
            Self::Yaml => "YAML",
            Self::Other(name) => name,
            Self::Unknown => "",
        }
    }
}

impl From<Language> for String {
    fn from(lang: Language) -> Self {
        lang.as_str().to_string()
    }
}

/// A parsed code block from MDX.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CodeBlock {
    /// Unique identifier for this block (format: block-{line_number})
    pub id: String,

    /// Programming language
    pub language: Language,

    /// Source code content
    pub source: String,

    /// Line number where the block starts (1-indexed)
    pub line_number: usize,

    /// Optional filename hint from info string
    pub filename: Option<String>,
}

impl CodeBlock {
    /// Create a new code block.
    pub fn new(language: Language, source: String, line_number: usize) -> Self {
        Self {
            id: format!("block-{}", line_number),
            language,
            source,
            line_number,
            filename: None,
        }
    }
}

/// A `<CodeExample>` block: the same example written in several languages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CodeExample {
    /// Optional heading shown above the snippets
    pub title: Option<String>,

    /// Optional link to the full example source
    pub href: Option<String>,

    /// Snippets in document order
    pub snippets: Vec<CodeBlock>,

    /// Line number of the opening tag (1-indexed)
    pub line_number: usize,
}

impl CodeExample {
    /// Create an empty example opened at `line_number`.
    pub fn new(title: Option<String>, href: Option<String>, line_number: usize) -> Self {
        Self {
            title,
            href,
            snippets: Vec::new(),
            line_number,
        }
    }

    /// Languages available in the selector, in snippet order.
    pub fn available_languages(&self) -> Vec<&Language> {
        self.snippets.iter().map(|s| &s.language).collect()
    }

    /// Whether a language selector is needed rather than a fixed label.
    pub fn has_language_select(&self) -> bool {
        self.snippets.len() > 1
    }

    /// Pick the snippet to display.
    ///
    /// The preferred language (from a saved preference or `?lang=` query) wins
    /// when present; otherwise the first snippet is shown.
    pub fn select(&self, preferred: Option<&str>) -> Option<&CodeBlock> {
        let wanted = preferred.map(Language::from_info);

        wanted
            .and_then(|lang| self.snippets.iter().find(|s| s.language == lang))
            .or_else(|| self.snippets.first())
    }

    /// Text placed on the clipboard by the copy button.
    pub fn copy_text(&self, preferred: Option<&str>) -> Option<&str> {
        self.select(preferred).map(|s| s.source.as_str())
    }
}

/// Parse a `<CodeExample ...>` opening tag into its `(title, href)` attributes.
///
/// Returns `None` when `html` is not a CodeExample opening tag.
pub fn parse_code_example_tag(html: &str) -> Option<(Option<String>, Option<String>)> {
    static OPEN: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"^\s*<CodeExample\b([^>]*)>").expect("Invalid CodeExample regex")
    });
    static ATTR: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r#"([a-zA-Z]+)\s*=\s*"([^"]*)""#).expect("Invalid attribute regex")
    });

    let caps = OPEN.captures(html)?;
    let attrs = caps.get(1).map(|m| m.as_str()).unwrap_or("");

    let mut title = None;
    let mut href = None;
    for attr in ATTR.captures_iter(attrs) {
        match &attr[1] {
            "title" => title = Some(attr[2].to_string()),
            "href" => href = Some(attr[2].to_string()),
            _ => {}
        }
    }

    Some((title, href))
}

/// Extract filename from code fence info string if present.
///
/// Supports formats like:
/// - `js filename="server.js"`
/// - `js file=server.js`
pub fn extract_filename(info: &str) -> Option<String> {
    if let Some(start) = info.find("filename=\"") {
        let rest = &info[start + 10..];
        if let Some(end) = rest.find('"') {
            return Some(rest[..end].to_string());
        }
    }

    if let Some(start) = info.find("file=") {
        let rest = &info[start + 5..];
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        let filename = rest[..end].trim_matches('"');
        if !filename.is_empty() {
            return Some(filename.to_string());
        }
    }

    None
}
