// src/explorer/language.rs
// =============================================================================
// Filename -> language tag mapping.
//
// The tag picks a syntax grammar in whatever renders the file. Detection is
// a pure function: same name in, same tag out, "text" when nothing matches.
//
// Order of checks:
//   1. Well-known extensionless or manifest files (Dockerfile, Cargo.toml...)
//   2. The extension after the last '.'
// =============================================================================

/// Tag used when nothing else matches.
pub const DEFAULT_LANGUAGE: &str = "text";

// Files recognised by their whole basename (the last path segment). A match
// wins over the extension table.
const SPECIAL_FILES: &[(&str, &str)] = &[
    ("dockerfile", "dockerfile"),
    ("makefile", "makefile"),
    ("cmake", "cmake"),
    ("gradle", "gradle"),
    ("rakefile", "ruby"),
    ("gemfile", "ruby"),
    ("package.json", "json"),
    ("composer.json", "json"),
    ("cargo.toml", "toml"),
    ("pyproject.toml", "toml"),
];

const EXTENSIONS: &[(&str, &str)] = &[
    // Web
    ("js", "javascript"),
    ("jsx", "jsx"),
    ("ts", "typescript"),
    ("tsx", "tsx"),
    ("html", "html"),
    ("htm", "html"),
    ("css", "css"),
    ("scss", "scss"),
    ("sass", "sass"),
    ("less", "less"),
    ("vue", "vue"),
    ("svelte", "svelte"),
    // Programming languages
    ("py", "python"),
    ("java", "java"),
    ("cpp", "cpp"),
    ("c", "c"),
    ("cc", "cpp"),
    ("cxx", "cpp"),
    ("h", "c"),
    ("hpp", "cpp"),
    ("cs", "csharp"),
    ("php", "php"),
    ("rb", "ruby"),
    ("go", "go"),
    ("rs", "rust"),
    ("swift", "swift"),
    ("kt", "kotlin"),
    ("scala", "scala"),
    ("r", "r"),
    ("m", "objectivec"),
    ("mm", "objectivec"),
    // Scripting
    ("sh", "bash"),
    ("bash", "bash"),
    ("zsh", "bash"),
    ("fish", "bash"),
    ("ps1", "powershell"),
    ("psm1", "powershell"),
    ("bat", "batch"),
    ("cmd", "batch"),
    // Data formats
    ("json", "json"),
    ("xml", "xml"),
    ("yaml", "yaml"),
    ("yml", "yaml"),
    ("toml", "toml"),
    ("ini", "ini"),
    ("cfg", "ini"),
    ("conf", "ini"),
    // Database
    ("sql", "sql"),
    ("mysql", "sql"),
    ("pgsql", "sql"),
    // Markup
    ("md", "markdown"),
    ("markdown", "markdown"),
    ("tex", "latex"),
    ("rst", "restructuredtext"),
    // Build and config
    ("dockerfile", "dockerfile"),
    ("docker", "dockerfile"),
    ("makefile", "makefile"),
    ("cmake", "cmake"),
    ("gradle", "gradle"),
    ("maven", "xml"),
    // Other
    ("lua", "lua"),
    ("perl", "perl"),
    ("haskell", "haskell"),
    ("clojure", "clojure"),
    ("elm", "elm"),
    ("dart", "dart"),
    ("solidity", "solidity"),
    ("zig", "zig"),
    ("nim", "nim"),
    ("crystal", "crystal"),
    ("julia", "julia"),
    ("ocaml", "ocaml"),
    ("fsharp", "fsharp"),
    ("vb", "vbnet"),
    ("vbnet", "vbnet"),
    ("prolog", "prolog"),
    ("erlang", "erlang"),
    ("elixir", "elixir"),
    ("groovy", "groovy"),
    ("d", "d"),
    ("ada", "ada"),
    ("fortran", "fortran"),
    ("cobol", "cobol"),
    ("pascal", "pascal"),
    ("delphi", "pascal"),
    ("assembly", "assembly"),
    ("asm", "assembly"),
    ("s", "assembly"),
    ("llvm", "llvm"),
    ("wat", "webassembly"),
    ("wasm", "webassembly"),
];

/// Languages a user can pin, as `(tag, label)`.
pub const LANGUAGES: &[(&str, &str)] = &[
    ("javascript", "JavaScript"),
    ("jsx", "JSX"),
    ("typescript", "TypeScript"),
    ("tsx", "TSX"),
    ("html", "HTML"),
    ("css", "CSS"),
    ("scss", "SCSS"),
    ("sass", "Sass"),
    ("less", "Less"),
    ("vue", "Vue"),
    ("svelte", "Svelte"),
    ("python", "Python"),
    ("java", "Java"),
    ("cpp", "C++"),
    ("c", "C"),
    ("csharp", "C#"),
    ("php", "PHP"),
    ("ruby", "Ruby"),
    ("go", "Go"),
    ("rust", "Rust"),
    ("swift", "Swift"),
    ("kotlin", "Kotlin"),
    ("scala", "Scala"),
    ("r", "R"),
    ("objectivec", "Objective-C"),
    ("bash", "Bash"),
    ("powershell", "PowerShell"),
    ("batch", "Batch"),
    ("json", "JSON"),
    ("xml", "XML"),
    ("yaml", "YAML"),
    ("toml", "TOML"),
    ("ini", "INI"),
    ("sql", "SQL"),
    ("markdown", "Markdown"),
    ("latex", "LaTeX"),
    ("restructuredtext", "reStructuredText"),
    ("dockerfile", "Dockerfile"),
    ("makefile", "Makefile"),
    ("cmake", "CMake"),
    ("gradle", "Gradle"),
    ("lua", "Lua"),
    ("perl", "Perl"),
    ("haskell", "Haskell"),
    ("clojure", "Clojure"),
    ("elm", "Elm"),
    ("dart", "Dart"),
    ("solidity", "Solidity"),
    ("zig", "Zig"),
    ("nim", "Nim"),
    ("crystal", "Crystal"),
    ("julia", "Julia"),
    ("ocaml", "OCaml"),
    ("fsharp", "F#"),
    ("vbnet", "VB.NET"),
    ("prolog", "Prolog"),
    ("erlang", "Erlang"),
    ("elixir", "Elixir"),
    ("groovy", "Groovy"),
    ("d", "D"),
    ("ada", "Ada"),
    ("fortran", "Fortran"),
    ("cobol", "COBOL"),
    ("pascal", "Pascal"),
    ("assembly", "Assembly"),
    ("llvm", "LLVM"),
    ("webassembly", "WebAssembly"),
    (DEFAULT_LANGUAGE, "Plain Text"),
];

/// Detects the language tag for a file name or repository path.
///
/// Never fails; unknown names map to [`DEFAULT_LANGUAGE`].
pub fn detect_language(filename: &str) -> &'static str {
    let name = filename.to_lowercase();
    let basename = name.rsplit('/').next().unwrap_or(&name);

    if let Some((_, tag)) = SPECIAL_FILES.iter().find(|(special, _)| *special == basename) {
        return *tag;
    }

    // With no '.', the whole name acts as the extension.
    let extension = basename.rsplit('.').next().unwrap_or(basename);

    EXTENSIONS
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, tag)| *tag)
        .unwrap_or(DEFAULT_LANGUAGE)
}

/// Whether `tag` is one of the selectable languages.
pub fn is_known_language(tag: &str) -> bool {
    LANGUAGES.iter().any(|(known, _)| *known == tag)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_special_files() {
        assert_eq!(detect_language("Dockerfile"), "dockerfile");
        assert_eq!(detect_language("a/b/Makefile"), "makefile");
        assert_eq!(detect_language("Gemfile"), "ruby");
        assert_eq!(detect_language("crates/core/Cargo.toml"), "toml");
        assert_eq!(detect_language("package.json"), "json");
    }

    #[test]
    fn test_special_files_match_the_last_segment_only() {
        assert_eq!(detect_language("docker/compose/Dockerfile"), "dockerfile");
        assert_eq!(detect_language("Makefile/notes.md"), "markdown");
        assert_eq!(detect_language("gemfile/"), "text");
    }

    #[test]
    fn test_suffix_match_needs_a_separator() {
        // "mydockerfile" is not a Dockerfile and has no known extension
        assert_eq!(detect_language("mydockerfile"), "text");
        assert_eq!(detect_language("notes/xmakefile.txt"), "text");
    }

    #[test]
    fn test_extensions() {
        assert_eq!(detect_language("main.rs"), "rust");
        assert_eq!(detect_language("a.py"), "python");
        assert_eq!(detect_language("src/App.JSX"), "jsx");
        assert_eq!(detect_language("config.yml"), "yaml");
        assert_eq!(detect_language("archive.tar.gz"), "text");
    }

    #[test]
    fn test_unknown_defaults_to_text() {
        assert_eq!(detect_language("README"), "text");
        assert_eq!(detect_language(""), "text");
        assert_eq!(detect_language("LICENSE"), "text");
    }

    #[test]
    fn test_detection_is_deterministic() {
        for name in ["main.go", "Dockerfile", "weird.name.", "x"] {
            assert_eq!(detect_language(name), detect_language(name));
        }
    }

    #[test]
    fn test_every_detected_tag_is_selectable() {
        for (_, tag) in EXTENSIONS.iter().chain(SPECIAL_FILES) {
            assert!(is_known_language(tag), "{tag} missing from LANGUAGES");
        }
        assert!(!is_known_language("klingon"));
    }
}
