pub const PLAINTEXT: &str = "plaintext";
pub const MARKDOWN: &str = "markdown";

const EXTENSION_TABLE: &[(&str, &str)] = &[
    ("js", "javascript"),
    ("jsx", "jsx"),
    ("ts", "typescript"),
    ("tsx", "tsx"),
    ("py", "python"),
    ("java", "java"),
    ("cpp", "cpp"),
    ("c", "c"),
    ("cs", "csharp"),
    ("php", "php"),
    ("rb", "ruby"),
    ("go", "go"),
    ("rs", "rust"),
    ("swift", "swift"),
    ("kt", "kotlin"),
    ("scala", "scala"),
    ("html", "html"),
    ("htm", "html"),
    ("css", "css"),
    ("scss", "scss"),
    ("sass", "sass"),
    ("less", "less"),
    ("json", "json"),
    ("xml", "xml"),
    ("yaml", "yaml"),
    ("yml", "yaml"),
    ("sql", "sql"),
    ("sh", "bash"),
    ("bash", "bash"),
    ("ps1", "powershell"),
    ("md", "markdown"),
    ("txt", "plaintext"),
    ("csv", "csv"),
    ("ini", "ini"),
    ("conf", "ini"),
    ("dockerfile", "dockerfile"),
    ("vue", "vue"),
    ("svelte", "svelte"),
];

/// Map a file name to its language tag. Total: anything unrecognised is `plaintext`.
///
/// The extension is everything after the last `.`, or the whole name when
/// there is no dot (so `Dockerfile` classifies as `dockerfile`).
pub fn classify(file_name: &str) -> &'static str {
    let ext = file_name.rsplit('.').next().unwrap_or_default().to_lowercase();
    EXTENSION_TABLE
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, tag)| *tag)
        .unwrap_or(PLAINTEXT)
}

/// Human readable language name for a tag.
pub fn language_name(tag: &str) -> &'static str {
    match tag {
        "javascript" => "JavaScript",
        "jsx" => "JSX",
        "typescript" => "TypeScript",
        "tsx" => "TSX",
        "python" => "Python",
        "java" => "Java",
        "cpp" => "C++",
        "c" => "C",
        "csharp" => "C#",
        "php" => "PHP",
        "ruby" => "Ruby",
        "go" => "Go",
        "rust" => "Rust",
        "swift" => "Swift",
        "kotlin" => "Kotlin",
        "scala" => "Scala",
        "html" => "HTML",
        "css" => "CSS",
        "scss" => "SCSS",
        "sass" => "Sass",
        "less" => "Less",
        "json" => "JSON",
        "xml" => "XML",
        "yaml" => "YAML",
        "sql" => "SQL",
        "bash" => "Bash",
        "powershell" => "PowerShell",
        "markdown" => "Markdown",
        "plaintext" => "Plain Text",
        "csv" => "CSV",
        "ini" => "INI",
        "dockerfile" => "Dockerfile",
        "vue" => "Vue",
        "svelte" => "Svelte",
        _ => "Unknown",
    }
}

/// Tags that are never highlighted.
pub fn is_unstyled(tag: &str) -> bool {
    tag == PLAINTEXT || tag == MARKDOWN
}
