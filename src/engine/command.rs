//! Free-text approval grammar for the chat surface. Anything that doesn't
//! parse is ordinary conversational input and goes to the assistant.

use once_cell::sync::Lazy;
use regex::Regex;

/// Structured reading of a chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedCommand {
    /// "approve all" / "approve everything"
    ApproveAll,
    /// "approve 1, 2 and #4", or the bare "#2" shorthand
    ApproveNumbers(Vec<u32>),
    /// Not an approval command at all.
    NoMatch,
}

static SHORTHAND: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*#(\d+)\s*$").unwrap());
static APPROVE_ALL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bapprove\s+(?:all|everything)\b").unwrap());
static APPROVE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bapprove\b").unwrap());
static NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"#?(\d+)").unwrap());

/// Parse chat input into an approval command. Case-insensitive and
/// whitespace-tolerant; numbers may be `#`-prefixed and joined by commas or
/// "and".
pub fn parse(text: &str) -> ParsedCommand {
    if let Some(caps) = SHORTHAND.captures(text) {
        if let Ok(n) = caps[1].parse::<u32>() {
            return ParsedCommand::ApproveNumbers(vec![n]);
        }
    }

    if APPROVE_ALL.is_match(text) {
        return ParsedCommand::ApproveAll;
    }

    if let Some(keyword) = APPROVE.find(text) {
        let tail = &text[keyword.end()..];
        let numbers: Vec<u32> = NUMBER
            .captures_iter(tail)
            .filter_map(|caps| caps[1].parse().ok())
            .collect();
        if !numbers.is_empty() {
            return ParsedCommand::ApproveNumbers(numbers);
        }
    }

    ParsedCommand::NoMatch
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approve_all_variants() {
        assert_eq!(parse("approve all"), ParsedCommand::ApproveAll);
        assert_eq!(parse("Approve Everything"), ParsedCommand::ApproveAll);
        assert_eq!(
            parse("please approve all of these"),
            ParsedCommand::ApproveAll
        );
    }

    #[test]
    fn approve_with_hash_numbers() {
        assert_eq!(
            parse("Approve #1 and #3"),
            ParsedCommand::ApproveNumbers(vec![1, 3])
        );
    }

    #[test]
    fn approve_with_plain_numbers_and_commas() {
        assert_eq!(
            parse("approve 2, 4 and 5"),
            ParsedCommand::ApproveNumbers(vec![2, 4, 5])
        );
    }

    #[test]
    fn hash_shorthand() {
        assert_eq!(parse("#2"), ParsedCommand::ApproveNumbers(vec![2]));
        assert_eq!(parse("  #12  "), ParsedCommand::ApproveNumbers(vec![12]));
    }

    #[test]
    fn conversational_input_is_no_match() {
        assert_eq!(parse("what should I do"), ParsedCommand::NoMatch);
        assert_eq!(parse("should I approve of this plan?"), ParsedCommand::NoMatch);
        assert_eq!(parse(""), ParsedCommand::NoMatch);
    }

    #[test]
    fn numbers_before_the_keyword_are_ignored() {
        assert_eq!(parse("3 things to approve"), ParsedCommand::NoMatch);
    }
}
