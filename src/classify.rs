//! Language classification for extracted code blocks.
//!
//! Maps a block's declared hint (when present) or its content to one of a
//! closed set of canonical extension tokens. The hint always wins; content
//! heuristics are an ordered cascade of predicate→token pairs evaluated in
//! sequence and short-circuited on the first match. The cascade is a
//! best-effort heuristic, not a parser: adversarial snippets (JSON with
//! embedded HTML tags, brace-heavy prose) can land on a neighboring token,
//! and the rule order is the contract that keeps those cases stable.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Serialize, Serializer};

/// Canonical extension token for a classified block.
///
/// Most tokens are file suffixes. `Dockerfile` and `Makefile` denote the
/// entire filename instead of a suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtensionToken {
    Py,
    Java,
    Html,
    Css,
    Js,
    Sql,
    Cs,
    Cpp,
    Txt,
    Yml,
    Json,
    Xml,
    Properties,
    Ini,
    Conf,
    Cfg,
    Toml,
    Sh,
    Ps1,
    Dockerfile,
    Makefile,
    Md,
    Csv,
    Env,
    Gradle,
    Kt,
}

/// Every token, in the order used for listings.
pub const ALL_TOKENS: &[ExtensionToken] = &[
    ExtensionToken::Py,
    ExtensionToken::Java,
    ExtensionToken::Kt,
    ExtensionToken::Gradle,
    ExtensionToken::Cs,
    ExtensionToken::Cpp,
    ExtensionToken::Js,
    ExtensionToken::Html,
    ExtensionToken::Css,
    ExtensionToken::Sql,
    ExtensionToken::Sh,
    ExtensionToken::Ps1,
    ExtensionToken::Json,
    ExtensionToken::Xml,
    ExtensionToken::Yml,
    ExtensionToken::Toml,
    ExtensionToken::Properties,
    ExtensionToken::Ini,
    ExtensionToken::Conf,
    ExtensionToken::Cfg,
    ExtensionToken::Env,
    ExtensionToken::Csv,
    ExtensionToken::Md,
    ExtensionToken::Dockerfile,
    ExtensionToken::Makefile,
    ExtensionToken::Txt,
];

impl ExtensionToken {
    /// The canonical string form: a suffix for most tokens, a full filename
    /// for `Dockerfile` and `Makefile`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtensionToken::Py => "py",
            ExtensionToken::Java => "java",
            ExtensionToken::Html => "html",
            ExtensionToken::Css => "css",
            ExtensionToken::Js => "js",
            ExtensionToken::Sql => "sql",
            ExtensionToken::Cs => "cs",
            ExtensionToken::Cpp => "cpp",
            ExtensionToken::Txt => "txt",
            ExtensionToken::Yml => "yml",
            ExtensionToken::Json => "json",
            ExtensionToken::Xml => "xml",
            ExtensionToken::Properties => "properties",
            ExtensionToken::Ini => "ini",
            ExtensionToken::Conf => "conf",
            ExtensionToken::Cfg => "cfg",
            ExtensionToken::Toml => "toml",
            ExtensionToken::Sh => "sh",
            ExtensionToken::Ps1 => "ps1",
            ExtensionToken::Dockerfile => "Dockerfile",
            ExtensionToken::Makefile => "Makefile",
            ExtensionToken::Md => "md",
            ExtensionToken::Csv => "csv",
            ExtensionToken::Env => "env",
            ExtensionToken::Gradle => "gradle",
            ExtensionToken::Kt => "kt",
        }
    }

    /// Whether this token names the whole file rather than a suffix.
    pub fn is_bare_filename(&self) -> bool {
        matches!(self, ExtensionToken::Dockerfile | ExtensionToken::Makefile)
    }
}

impl std::fmt::Display for ExtensionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ExtensionToken {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Hint alias map: normalized hint → token.
///
/// `java`, `javascript` and `gradle` are present for completeness but are
/// resolved by the substring rule in [`classify`] before this map is
/// consulted.
static HINT_ALIASES: LazyLock<HashMap<&'static str, ExtensionToken>> = LazyLock::new(|| {
    let mut m = HashMap::new();

    // Python
    m.insert("python", ExtensionToken::Py);
    m.insert("py", ExtensionToken::Py);

    // Java family
    m.insert("java", ExtensionToken::Java);
    m.insert("gradle", ExtensionToken::Gradle);
    m.insert("kotlin", ExtensionToken::Kt);
    m.insert("kt", ExtensionToken::Kt);

    // Web
    m.insert("html", ExtensionToken::Html);
    m.insert("css", ExtensionToken::Css);
    m.insert("javascript", ExtensionToken::Js);
    m.insert("js", ExtensionToken::Js);

    // C family
    m.insert("csharp", ExtensionToken::Cs);
    m.insert("cs", ExtensionToken::Cs);
    m.insert("c++", ExtensionToken::Cpp);
    m.insert("cpp", ExtensionToken::Cpp);

    // Data and query
    m.insert("sql", ExtensionToken::Sql);
    m.insert("json", ExtensionToken::Json);
    m.insert("xml", ExtensionToken::Xml);
    m.insert("csv", ExtensionToken::Csv);

    // Config formats
    m.insert("yaml", ExtensionToken::Yml);
    m.insert("yml", ExtensionToken::Yml);
    m.insert("properties", ExtensionToken::Properties);
    m.insert("ini", ExtensionToken::Ini);
    m.insert("conf", ExtensionToken::Conf);
    m.insert("cfg", ExtensionToken::Cfg);
    m.insert("toml", ExtensionToken::Toml);
    m.insert("env", ExtensionToken::Env);

    // Shells
    m.insert("sh", ExtensionToken::Sh);
    m.insert("bash", ExtensionToken::Sh);
    m.insert("powershell", ExtensionToken::Ps1);
    m.insert("ps1", ExtensionToken::Ps1);

    // Named files
    m.insert("dockerfile", ExtensionToken::Dockerfile);
    m.insert("makefile", ExtensionToken::Makefile);

    // Prose
    m.insert("md", ExtensionToken::Md);
    m.insert("markdown", ExtensionToken::Md);
    m.insert("text", ExtensionToken::Txt);
    m.insert("txt", ExtensionToken::Txt);

    m
});

/// Hint aliases that resolve to `token`, sorted for stable listings.
pub fn aliases_for(token: ExtensionToken) -> Vec<&'static str> {
    let mut aliases: Vec<&'static str> = HINT_ALIASES
        .iter()
        .filter(|(_, t)| **t == token)
        .map(|(alias, _)| *alias)
        .collect();
    aliases.sort_unstable();
    aliases
}

/// Classify a block's language as a canonical extension token.
///
/// A non-empty hint always wins and the content is never inspected; without
/// one the content heuristics run in priority order. Total: unknown hints and
/// unrecognized content both land on `txt`. Input is trimmed internally, so
/// surrounding whitespace never changes the outcome.
pub fn classify(content: &str, hint: Option<&str>) -> ExtensionToken {
    let content = content.trim();
    if let Some(hint) = hint {
        let hint = hint.trim().to_lowercase();
        if !hint.is_empty() {
            return classify_hint(&hint);
        }
    }
    classify_content(content)
}

fn classify_hint(hint: &str) -> ExtensionToken {
    match hint {
        "dockerfile" => return ExtensionToken::Dockerfile,
        "makefile" => return ExtensionToken::Makefile,
        _ => {}
    }
    // Substring test so build-script tags like `gradle-kts` or `java17`
    // still land on java. Runs before the alias map, which also routes the
    // `javascript` hint to java.
    if hint.contains("java") || hint.contains("gradle") {
        return ExtensionToken::Java;
    }
    HINT_ALIASES.get(hint).copied().unwrap_or(ExtensionToken::Txt)
}

type Predicate = fn(&str) -> bool;

/// Content heuristics in strict priority order; the first hit wins.
///
/// The order is load-bearing: Java outranks the C-family and brace checks,
/// XML outranks JSON, and the weak CSS test carries an exclusion list against
/// HTML/Java/Python/JS lookalikes.
const CONTENT_RULES: &[(Predicate, ExtensionToken)] = &[
    (has_public_java_type, ExtensionToken::Java),
    (has_bare_java_type, ExtensionToken::Java),
    (looks_like_csharp, ExtensionToken::Cs),
    (looks_like_python, ExtensionToken::Py),
    (looks_like_html, ExtensionToken::Html),
    (looks_like_css, ExtensionToken::Css),
    (looks_like_javascript, ExtensionToken::Js),
    (looks_like_sql, ExtensionToken::Sql),
    (looks_like_c_cpp, ExtensionToken::Cpp),
    (looks_like_xml, ExtensionToken::Xml),
    (looks_like_json, ExtensionToken::Json),
    (is_generic_brace_block, ExtensionToken::Txt),
];

fn classify_content(content: &str) -> ExtensionToken {
    for (rule_matches, token) in CONTENT_RULES {
        if rule_matches(content) {
            log::debug!("content heuristic matched {token}");
            return *token;
        }
    }
    ExtensionToken::Txt
}

const PUBLIC_JAVA_TYPES: &[&str] = &[
    "public class",
    "public interface",
    "public enum",
    "public record",
    "public @interface",
];

fn has_public_java_type(content: &str) -> bool {
    PUBLIC_JAVA_TYPES.iter().any(|marker| content.contains(marker))
}

const BARE_JAVA_TYPES: &[&str] = &[" class ", " interface ", " enum ", " record "];
const NOT_JAVA: &[&str] = &["def ", "function ", "#include"];

fn has_bare_java_type(content: &str) -> bool {
    BARE_JAVA_TYPES.iter().any(|marker| content.contains(marker))
        && !NOT_JAVA.iter().any(|marker| content.contains(marker))
}

fn looks_like_csharp(content: &str) -> bool {
    content.trim_start().starts_with("using ")
        && content.contains("namespace")
        && (content.contains(';') || content.contains('{'))
}

static PYTHON_DEF: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bdef\s+\w+\s*\(").unwrap());

fn looks_like_python(content: &str) -> bool {
    PYTHON_DEF.is_match(content) || content.contains("import ")
}

fn looks_like_html(content: &str) -> bool {
    let lower = content.trim().to_lowercase();
    lower.starts_with("<!doctype html") || (lower.contains("<html") && lower.contains("</html"))
}

const NOT_CSS: &[&str] = &["<html", "public class", "def ", "function"];

static CSS_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\w+(-\w+)*\s*:\s*\w+)|(\.\w+\s*\{)|(#\w+\s*\{)").unwrap());

fn looks_like_css(content: &str) -> bool {
    let lower = content.to_lowercase();
    if lower.contains("<style>") {
        return true;
    }
    content.contains('{')
        && content.contains('}')
        && (content.contains(':') || content.contains(';'))
        && !NOT_CSS.iter().any(|marker| content.contains(marker))
        && CSS_SHAPE.is_match(&lower)
}

const JS_MARKERS: &[&str] = &["function ", "console.log", "var ", "let ", "const "];

fn looks_like_javascript(content: &str) -> bool {
    JS_MARKERS.iter().any(|marker| content.contains(marker))
}

const SQL_MARKERS: &[&str] = &["SELECT ", "INSERT INTO", "UPDATE ", "DELETE FROM"];

fn looks_like_sql(content: &str) -> bool {
    let upper = content.to_uppercase();
    SQL_MARKERS.iter().any(|marker| upper.contains(marker))
}

fn looks_like_c_cpp(content: &str) -> bool {
    content.contains("#include") || content.contains("int main(")
}

fn looks_like_xml(content: &str) -> bool {
    let trimmed = content.trim();
    let lower = trimmed.to_lowercase();
    if lower.starts_with("<?xml") {
        return true;
    }
    trimmed.starts_with('<')
        && trimmed.contains("</")
        && trimmed.contains('>')
        && !lower.starts_with("<!doctype html")
}

static JSON_KEY_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""\s*:\s*(?:"(?:\\.|[^"\\])*"|true|false|null|-?\d+(?:\.\d+)?(?:[eE][+-]?\d+)?|\{|\[)"#)
        .unwrap()
});

fn looks_like_json(content: &str) -> bool {
    let trimmed = content.trim();
    let bracketed = (trimmed.starts_with('{') && trimmed.ends_with('}'))
        || (trimmed.starts_with('[') && trimmed.ends_with(']'));
    bracketed && JSON_KEY_VALUE.is_match(trimmed)
}

fn is_generic_brace_block(content: &str) -> bool {
    content.contains('{') && content.contains('}') && content.contains(';')
}

static PUBLIC_JAVA_TYPE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"public\s+(class|interface|enum|@?interface|record)\s+(\w+)").unwrap()
});

static ANY_JAVA_TYPE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(class|interface|enum|@?interface|record)\s+(\w+)").unwrap());

/// Extract the identifier of the first Java type declaration.
///
/// Public types win over non-public ones since they dictate the filename;
/// returns `None` when the block declares no type at all.
pub fn extract_type_name(content: &str) -> Option<&str> {
    PUBLIC_JAVA_TYPE_NAME
        .captures(content)
        .or_else(|| ANY_JAVA_TYPE_NAME.captures(content))
        .and_then(|caps| caps.get(2))
        .map(|name| name.as_str())
}
