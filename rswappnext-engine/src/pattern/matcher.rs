use super::compiler::{CompiledRule, PatternCompiler};
use crate::core::{MatchOutcome, PatternRule, RulePattern};

/// 标量规则匹配器
/// 对所有 (候选, 模式) 组合做子串搜索，取置信度最高者，
/// 置信度相同时取字典序更大的版本号
pub struct RuleMatcher;

impl RuleMatcher {
    pub fn match_rule<S: AsRef<str>>(rule: &PatternRule, candidates: &[S]) -> MatchOutcome {
        let compiled: Vec<&CompiledRule> = rule
            .patterns()
            .iter()
            .filter_map(RulePattern::compiled)
            .collect();
        Self::best_of(&compiled, candidates)
    }

    /// 直接使用原始模式字符串（每次重新编译）
    pub fn match_raw<S: AsRef<str>>(raws: &[&str], candidates: &[S]) -> MatchOutcome {
        let owned: Vec<CompiledRule> = raws
            .iter()
            .filter_map(|raw| PatternCompiler::compile(raw).ok())
            .collect();
        let compiled: Vec<&CompiledRule> = owned.iter().collect();
        Self::best_of(&compiled, candidates)
    }

    fn best_of<S: AsRef<str>>(rules: &[&CompiledRule], candidates: &[S]) -> MatchOutcome {
        let mut best = MatchOutcome::miss();

        for candidate in candidates {
            let candidate = candidate.as_ref();
            for rule in rules {
                let Some(regex) = rule.regex() else {
                    continue;
                };
                let Some(captures) = regex.captures(candidate) else {
                    continue;
                };

                let version = rule.version.render(&captures);
                if rule.confidence > best.confidence
                    || (rule.confidence == best.confidence && version > best.version)
                {
                    best = MatchOutcome::hit(version, rule.confidence);
                }
            }
        }

        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_match() {
        let outcome = RuleMatcher::match_raw(&["apache"], &["nginx/1.25.3"]);
        assert_eq!(outcome, MatchOutcome::miss());
        assert_eq!(outcome.confidence, 0);
    }

    #[test]
    fn test_version_from_capture() {
        let outcome = RuleMatcher::match_raw(&[r"nginx(?:/([\d.]+))?\;version:\1"], &["nginx/1.25.3"]);
        assert_eq!(outcome, MatchOutcome::hit("1.25.3", 100));
    }

    #[test]
    fn test_highest_confidence_wins() {
        let outcome = RuleMatcher::match_raw(
            &[r"wp-content\;confidence:40", r"wp-includes/js/([\d.]+)\;version:\1\;confidence:60"],
            &["/wp-content/x.js", "/wp-includes/js/6.4/y.js"],
        );
        assert_eq!(outcome, MatchOutcome::hit("6.4", 60));
    }

    #[test]
    fn test_equal_confidence_prefers_greater_version() {
        let outcome = RuleMatcher::match_raw(
            &[r"lib-(\d+)\;version:\1"],
            &["lib-1", "lib-3", "lib-2"],
        );
        assert_eq!(outcome.version, "3");
    }

    #[test]
    fn test_zero_confidence_without_version_is_not_a_hit() {
        let outcome = RuleMatcher::match_raw(&[r"tracker\;confidence:0"], &["tracker.js"]);
        assert!(!outcome.matched);
    }

    #[test]
    fn test_uncompilable_pattern_is_skipped() {
        let outcome = RuleMatcher::match_raw(&[r"(r)\1eact", "react"], &["react-dom"]);
        assert_eq!(outcome, MatchOutcome::hit("", 100));
    }

    #[test]
    fn test_match_rule_uses_cached_patterns() {
        let rule = PatternRule::list([r"jquery-(\d+(?:\.\d+)+)\;version:\1", "jquery"]);
        let first = RuleMatcher::match_rule(&rule, &["jquery-3.7.1.min.js"]);
        let second = RuleMatcher::match_rule(&rule, &["jquery-3.7.1.min.js"]);
        assert_eq!(first, MatchOutcome::hit("3.7.1", 100));
        assert_eq!(first, second);
    }

    #[test]
    fn test_look_around_patterns_still_match() {
        let ahead = RuleMatcher::match_raw(&[r"foo(?!bar)"], &["foobaz"]);
        assert_eq!(ahead, MatchOutcome::hit("", 100));

        let behind = RuleMatcher::match_raw(&[r"(?<=/)wp-content\;confidence:50"], &["/wp-content/x"]);
        assert_eq!(behind, MatchOutcome::hit("", 50));
    }

    #[test]
    fn test_lone_brace_pattern_matches() {
        let outcome = RuleMatcher::match_raw(&["__NUXT__={"], &["window.__NUXT__={a:1}"]);
        assert_eq!(outcome, MatchOutcome::hit("", 100));
    }
}
