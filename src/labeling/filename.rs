//! Weak labeling rules derived from filenames.

use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

use super::Label;

pub const FILENAME_RULESET_VERSION: i64 = 1;

/// A label inferred from a filename, with the rule that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct FilenameLabel {
    pub label: Label,
    pub rule_id: &'static str,
}

#[derive(Debug)]
struct Rule {
    id: &'static str,
    label: Label,
    regex: Regex,
}

/// Ordered rule table; the first match wins, positive rules first.
///
/// Ordering matters: a name like `no_tumor_3.jpg` matches the tumor keyword
/// before the negative keyword, reproducing the upload-folder convention
/// this pipeline inherits (`Y_*`/`*tumor*` positive, `N_*`/`*no*` negative).
fn rules() -> &'static [Rule] {
    static RULES: OnceLock<Vec<Rule>> = OnceLock::new();
    RULES.get_or_init(|| {
        let mut rules = Vec::new();

        let mut push = |id: &'static str, label: Label, pattern: &'static str| {
            rules.push(Rule {
                id,
                label,
                regex: Regex::new(pattern).expect("filename label regex must compile"),
            });
        };

        push("tumor.prefix", Label::Tumor, r"(?i)^y");
        push("tumor.keyword", Label::Tumor, r"(?i)tumor");
        push("clear.prefix", Label::NoTumor, r"(?i)^n");
        push("clear.keyword", Label::NoTumor, r"(?i)no");

        rules
    })
}

/// Infer a label from a path's file name, or `None` when no rule matches.
pub fn label_for_path(path: &Path) -> Option<FilenameLabel> {
    let name = path.file_name()?.to_str()?;
    for rule in rules() {
        if rule.regex.is_match(name) {
            return Some(FilenameLabel {
                label: rule.label,
                rule_id: rule.id,
            });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn prefixed_names_label_both_classes() {
        let tumor = label_for_path(&PathBuf::from("uploads/Y_12.jpg")).unwrap();
        assert_eq!(tumor.label, Label::Tumor);
        assert_eq!(tumor.rule_id, "tumor.prefix");

        let clear = label_for_path(&PathBuf::from("uploads/N_3.png")).unwrap();
        assert_eq!(clear.label, Label::NoTumor);
        assert_eq!(clear.rule_id, "clear.prefix");
    }

    #[test]
    fn keyword_names_label_case_insensitively() {
        let tumor = label_for_path(&PathBuf::from("scan_Tumor_axial.png")).unwrap();
        assert_eq!(tumor.label, Label::Tumor);
        assert_eq!(tumor.rule_id, "tumor.keyword");
    }

    #[test]
    fn positive_rules_win_over_negative_keywords() {
        // Inherited convention quirk: "no_tumor" still reads as positive
        // because the tumor keyword is checked first.
        let label = label_for_path(&PathBuf::from("no_tumor_3.jpg")).unwrap();
        assert_eq!(label.label, Label::Tumor);
    }

    #[test]
    fn unrelated_names_stay_unlabeled() {
        assert_eq!(label_for_path(&PathBuf::from("scan_042.jpg")), None);
    }

    #[test]
    fn includes_ruleset_version_constant() {
        assert_eq!(FILENAME_RULESET_VERSION, 1);
    }
}
