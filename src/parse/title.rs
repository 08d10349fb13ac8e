/// A task title split into its text and trailing labels
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedTitle {
    pub text: String,
    /// From trailing `#tag` words (without the `#`)
    pub tags: Vec<String>,
    /// From trailing `@name` words (without the `@`)
    pub collaborators: Vec<String>,
}

/// Split trailing `#tag` and `@name` words off a title.
///
/// Only words at the end are taken, so `Fix #3 parser crash #bug` keeps
/// `#3` in the text. Label order is preserved.
pub fn parse_title_labels(s: &str) -> ParsedTitle {
    let s = s.trim();
    let mut tags = Vec::new();
    let mut collaborators = Vec::new();
    let mut remaining = s;

    loop {
        let trimmed = remaining.trim_end();
        if trimmed.is_empty() {
            break;
        }
        let (head, last_word) = match trimmed.rfind(char::is_whitespace) {
            Some(pos) => (&trimmed[..pos], trimmed[pos..].trim_start()),
            None => ("", trimmed),
        };
        if let Some(tag) = label(last_word, '#') {
            tags.push(tag.to_string());
        } else if let Some(name) = label(last_word, '@') {
            collaborators.push(name.to_string());
        } else {
            break;
        }
        remaining = head;
    }

    tags.reverse();
    collaborators.reverse();
    ParsedTitle {
        text: remaining.trim_end().to_string(),
        tags,
        collaborators,
    }
}

fn label(word: &str, sigil: char) -> Option<&str> {
    word.strip_prefix(sigil)
        .filter(|rest| !rest.is_empty() && !rest.contains(['#', '@']))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_title() {
        let parsed = parse_title_labels("Buy milk");
        assert_eq!(parsed.text, "Buy milk");
        assert!(parsed.tags.is_empty());
        assert!(parsed.collaborators.is_empty());
    }

    #[test]
    fn trailing_labels_in_order() {
        let parsed = parse_title_labels("Ship release #work @ana #urgent @bo");
        assert_eq!(parsed.text, "Ship release");
        assert_eq!(parsed.tags, vec!["work", "urgent"]);
        assert_eq!(parsed.collaborators, vec!["ana", "bo"]);
    }

    #[test]
    fn inner_hash_stays_in_text() {
        let parsed = parse_title_labels("Fix #3 parser crash #bug");
        assert_eq!(parsed.text, "Fix #3 parser crash");
        assert_eq!(parsed.tags, vec!["bug"]);
    }

    #[test]
    fn labels_only_leaves_empty_text() {
        let parsed = parse_title_labels("#core @me");
        assert_eq!(parsed.text, "");
        assert_eq!(parsed.tags, vec!["core"]);
        assert_eq!(parsed.collaborators, vec!["me"]);
    }

    #[test]
    fn bare_sigils_are_text() {
        let parsed = parse_title_labels("Email # @");
        assert_eq!(parsed.text, "Email # @");
    }
}
