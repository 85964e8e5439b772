use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use regex::Regex;
use tokio::fs;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::catalog::LocaleCatalog;
use crate::config::Config;
use crate::error::{Result, LocsyncError};

/// One sighting of a key in the scanned tree
#[derive(Debug, Clone)]
pub struct KeyOccurrence {
    pub file: PathBuf,
    /// Matched line with one line of surrounding text, matched line marked
    pub context: String,
}

/// A literal source string marked for localization. Identity is the exact
/// text; the same text found in several files is one key with several
/// occurrences.
#[derive(Debug, Clone)]
pub struct TranslationKey {
    pub text: String,
    pub occurrences: Vec<KeyOccurrence>,
}

/// Ordered set of regex rules recognizing key occurrences. Each rule must
/// carry one capture group holding the quoted literal.
pub struct PatternSet {
    rules: Vec<Regex>,
}

impl PatternSet {
    pub fn compile(patterns: &[String]) -> Result<Self> {
        let mut rules = Vec::with_capacity(patterns.len());
        for pattern in patterns {
            let rule = Regex::new(pattern)?;
            if rule.captures_len() < 2 {
                return Err(LocsyncError::Config(format!(
                    "Key pattern has no capture group: {}",
                    pattern
                )));
            }
            rules.push(rule);
        }
        Ok(Self { rules })
    }

    /// All captured key texts in a document, deduplicated, dynamic keys
    /// rejected. Order follows first appearance across the rule list.
    pub fn extract(&self, document: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut keys = Vec::new();

        for rule in &self.rules {
            for captures in rule.captures_iter(document) {
                if let Some(capture) = captures.get(1) {
                    let text = capture.as_str();
                    if is_static_key(text) && seen.insert(text.to_string()) {
                        keys.push(text.to_string());
                    }
                }
            }
        }

        keys
    }
}

/// Keys built at runtime (interpolation, variable substitution) are never
/// proposed for the catalog.
fn is_static_key(text: &str) -> bool {
    !text.is_empty() && !text.contains(['$', '{', '}'])
}

/// Matched line plus one line of text before and after, the matched line
/// prefixed with a marker.
fn key_context(document: &str, key: &str) -> String {
    let lines: Vec<&str> = document.lines().collect();

    for (number, line) in lines.iter().enumerate() {
        if line.contains(key) {
            let start = number.saturating_sub(1);
            let end = (number + 1).min(lines.len().saturating_sub(1));

            let mut context = Vec::new();
            for i in start..=end {
                let marker = if i == number { ">>> " } else { "    " };
                context.push(format!("{}{}", marker, lines[i].trim()));
            }
            return context.join("\n");
        }
    }

    String::new()
}

/// Result of one pass over the configured scan paths
#[derive(Debug, Default)]
pub struct ScanReport {
    /// Unique keys in first-seen order
    pub keys: Vec<TranslationKey>,
    /// Source files skipped because they could not be read
    pub skipped_files: usize,
}

/// Coverage numbers derived from a scan plus the check-locale oracle
#[derive(Debug, Clone, PartialEq)]
pub struct Statistics {
    pub total_keys: usize,
    pub missing_keys: usize,
    pub translated_keys: usize,
    pub coverage_percentage: f64,
}

/// Walks the configured paths and extracts translation-key candidates.
/// Pure over its inputs: the same tree and pattern set yield the same keys.
pub struct Scanner {
    patterns: PatternSet,
    scan_paths: Vec<PathBuf>,
    file_extensions: Vec<String>,
}

impl Scanner {
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            patterns: PatternSet::compile(&config.patterns)?,
            scan_paths: config.scan_paths.iter().map(PathBuf::from).collect(),
            file_extensions: config.file_extensions.clone(),
        })
    }

    /// Extensions are matched as dotted suffixes so compound forms such as
    /// "blade.php" work.
    fn is_target_file(&self, path: &Path) -> bool {
        let name = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name,
            None => return false,
        };
        self.file_extensions
            .iter()
            .any(|ext| name.ends_with(&format!(".{}", ext)))
    }

    /// Scan every configured path. Unreadable files are skipped with a
    /// warning and counted in the report; they never abort the scan.
    pub async fn scan(&self) -> Result<ScanReport> {
        let mut report = ScanReport::default();
        let mut index: HashMap<String, usize> = HashMap::new();

        for base in &self.scan_paths {
            if !base.is_dir() {
                debug!("Skipping missing scan path: {}", base.display());
                continue;
            }

            for entry in WalkDir::new(base)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
            {
                let path = entry.path();
                if !self.is_target_file(path) {
                    continue;
                }

                let document = match fs::read_to_string(path).await {
                    Ok(content) => content,
                    Err(e) => {
                        warn!("Skipping unreadable file {}: {}", path.display(), e);
                        report.skipped_files += 1;
                        continue;
                    }
                };

                for text in self.patterns.extract(&document) {
                    let occurrence = KeyOccurrence {
                        file: path.to_path_buf(),
                        context: key_context(&document, &text),
                    };

                    match index.get(&text) {
                        Some(&i) => report.keys[i].occurrences.push(occurrence),
                        None => {
                            index.insert(text.clone(), report.keys.len());
                            report.keys.push(TranslationKey {
                                text,
                                occurrences: vec![occurrence],
                            });
                        }
                    }
                }
            }
        }

        debug!(
            "Scan complete: {} unique keys, {} unreadable files skipped",
            report.keys.len(),
            report.skipped_files
        );

        Ok(report)
    }
}

/// A key is missing iff the oracle resolves it to the key text itself. A
/// translation that legitimately equals its key is indistinguishable from
/// an untranslated one; that is a documented limit of the heuristic.
pub fn is_missing(key: &TranslationKey, oracle: &LocaleCatalog) -> bool {
    oracle.resolve(&key.text) == key.text
}

/// Keys from the report that lack a translation in the oracle's locale
pub fn find_missing(report: &ScanReport, oracle: &LocaleCatalog) -> Vec<TranslationKey> {
    report
        .keys
        .iter()
        .filter(|key| is_missing(key, oracle))
        .cloned()
        .collect()
}

/// Coverage totals over one scan; an empty scan counts as full coverage
pub fn statistics(report: &ScanReport, oracle: &LocaleCatalog) -> Statistics {
    let total = report.keys.len();
    let missing = report
        .keys
        .iter()
        .filter(|key| is_missing(key, oracle))
        .count();
    let translated = total - missing;
    let coverage = if total > 0 {
        (translated as f64 / total as f64 * 10000.0).round() / 100.0
    } else {
        100.0
    };

    Statistics {
        total_keys: total,
        missing_keys: missing,
        translated_keys: translated,
        coverage_percentage: coverage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn test_patterns() -> PatternSet {
        PatternSet::compile(&[
            r#"t!\(\s*"((?:[^"\\]|\\.)+)""#.to_string(),
            r#"__\(\s*"((?:[^"\\]|\\.)+)"\s*\)"#.to_string(),
        ])
        .unwrap()
    }

    fn oracle_with(entries: &[(&str, &str)]) -> LocaleCatalog {
        LocaleCatalog {
            locale: "en".to_string(),
            entries: entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    #[test]
    fn test_extract_captures_quoted_literals() {
        let patterns = test_patterns();
        let document = r#"let a = t!("Welcome"); let b = __("Goodbye");"#;
        assert_eq!(patterns.extract(document), vec!["Welcome", "Goodbye"]);
    }

    #[test]
    fn test_extract_deduplicates() {
        let patterns = test_patterns();
        let document = r#"t!("Welcome"); t!("Welcome"); __("Welcome")"#;
        assert_eq!(patterns.extract(document), vec!["Welcome"]);
    }

    #[test]
    fn test_dynamic_keys_rejected() {
        let patterns = test_patterns();
        let document = r#"t!("prefix.{suffix}"); t!("$variable"); t!("Kept")"#;
        assert_eq!(patterns.extract(document), vec!["Kept"]);
    }

    #[test]
    fn test_pattern_without_capture_group_rejected() {
        let result = PatternSet::compile(&[r#"t!\("[^"]+"\)"#.to_string()]);
        assert!(matches!(result, Err(LocsyncError::Config(_))));
    }

    #[test]
    fn test_invalid_regex_rejected() {
        let result = PatternSet::compile(&["(unclosed".to_string()]);
        assert!(matches!(result, Err(LocsyncError::Pattern(_))));
    }

    #[test]
    fn test_context_marks_matched_line() {
        let document = "fn render() {\n    t!(\"Welcome\")\n}";
        let context = key_context(document, "Welcome");
        assert_eq!(context, "    fn render() {\n>>> t!(\"Welcome\")\n    }");
    }

    #[test]
    fn test_context_at_document_start() {
        let document = "t!(\"First\")\nsecond line";
        let context = key_context(document, "First");
        assert_eq!(context, ">>> t!(\"First\")\n    second line");
    }

    #[tokio::test]
    async fn test_scan_collects_occurrences_across_files() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("src");
        std::fs::create_dir_all(&src).unwrap();
        std::fs::write(src.join("a.rs"), r#"t!("Welcome"); t!("Goodbye")"#).unwrap();
        std::fs::write(src.join("b.rs"), r#"t!("Welcome")"#).unwrap();
        std::fs::write(src.join("ignored.txt"), r#"t!("Hidden")"#).unwrap();

        let mut config = Config::default();
        config.scan_paths = vec![src.to_string_lossy().into_owned()];
        config.file_extensions = vec!["rs".to_string()];

        let scanner = Scanner::from_config(&config).unwrap();
        let report = scanner.scan().await.unwrap();

        assert_eq!(report.keys.len(), 2);
        let welcome = report.keys.iter().find(|k| k.text == "Welcome").unwrap();
        assert_eq!(welcome.occurrences.len(), 2);
        assert_eq!(report.skipped_files, 0);
    }

    #[tokio::test]
    async fn test_scan_matches_compound_extensions() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("views");
        std::fs::create_dir_all(&src).unwrap();
        std::fs::write(src.join("home.blade.php"), r#"__("Welcome")"#).unwrap();

        let mut config = Config::default();
        config.scan_paths = vec![src.to_string_lossy().into_owned()];
        config.file_extensions = vec!["blade.php".to_string()];
        config.patterns = vec![r#"__\(\s*"((?:[^"\\]|\\.)+)"\s*\)"#.to_string()];

        let scanner = Scanner::from_config(&config).unwrap();
        let report = scanner.scan().await.unwrap();
        assert_eq!(report.keys.len(), 1);
        assert_eq!(report.keys[0].text, "Welcome");
    }

    #[test]
    fn test_missing_detection_uses_identity_heuristic() {
        let oracle = oracle_with(&[("Welcome", "Bienvenido"), ("Same", "Same")]);
        let report = ScanReport {
            keys: ["Welcome", "Goodbye", "Same"]
                .iter()
                .map(|text| TranslationKey {
                    text: text.to_string(),
                    occurrences: vec![],
                })
                .collect(),
            skipped_files: 0,
        };

        let missing = find_missing(&report, &oracle);
        let names: Vec<&str> = missing.iter().map(|k| k.text.as_str()).collect();
        // "Same" resolves to its own text, so the heuristic counts it missing
        assert_eq!(names, vec!["Goodbye", "Same"]);
    }

    #[test]
    fn test_statistics_rounding() {
        let oracle = oracle_with(&[("One", "Uno"), ("Two", "Dos")]);
        let report = ScanReport {
            keys: ["One", "Two", "Three"]
                .iter()
                .map(|text| TranslationKey {
                    text: text.to_string(),
                    occurrences: vec![],
                })
                .collect(),
            skipped_files: 0,
        };

        let stats = statistics(&report, &oracle);
        assert_eq!(stats.total_keys, 3);
        assert_eq!(stats.missing_keys, 1);
        assert_eq!(stats.translated_keys, 2);
        assert_eq!(stats.coverage_percentage, 66.67);
    }

    #[test]
    fn test_statistics_empty_scan_is_full_coverage() {
        let oracle = oracle_with(&[]);
        let stats = statistics(&ScanReport::default(), &oracle);
        assert_eq!(stats.coverage_percentage, 100.0);
    }
}
