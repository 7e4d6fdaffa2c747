//! Reading visitor replies
//!
//! Each stage has its own notion of a "sufficient" reply. The readers here
//! are deliberately forgiving: the visitor types free text, and anything the
//! rules cannot read simply keeps the interview at the current stage.

use super::email::EmailAddress;
use crate::core::string::words;

const POSITIVE: &[&str] = &[
    "yes", "yeah", "yea", "yep", "yup", "y", "sure", "ok", "okay", "ready", "absolutely",
    "definitely", "certainly", "go", "let's", "lets", "start", "begin", "alright", "fine",
    "great", "please", "interested", "course",
];

const NEGATIVE: &[&str] = &[
    "no", "nope", "nah", "not", "don't", "dont", "never", "later", "stop", "wait", "isn't",
    "aren't", "can't", "cannot", "won't",
];

/// Negations that read as agreement, as `(first, second)` word pairs
const AGREEING_NEGATIONS: &[(&str, &str)] = &[
    ("no", "problem"),
    ("no", "problems"),
    ("no", "worries"),
    ("why", "not"),
];

/// Whether a reply reads as a positive opt-in.
///
/// A single negative word outweighs any number of positive ones, so
/// `"not ready yet"` is not affirmative. Phrases such as `"no problem"` or
/// `"why not"` count as agreement rather than negation.
pub fn is_affirmative(reply: &str) -> bool {
    let words = words(reply);
    let mut agreed = false;
    let mut i = 0;
    while i < words.len() {
        let word = words[i].as_str();
        let pair = words.get(i + 1).map(|next| (word, next.as_str()));
        if pair.is_some_and(|pair| AGREEING_NEGATIONS.contains(&pair)) {
            agreed = true;
            i += 2;
            continue;
        }
        if NEGATIVE.contains(&word) {
            return false;
        }
        agreed |= POSITIVE.contains(&word);
        i += 1;
    }
    agreed
}

/// Whether a reply carries any text at all
pub fn is_substantive(reply: &str) -> bool {
    reply.chars().any(|c| c.is_alphanumeric())
}

/// Organisation details from a discovery reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganisationReply {
    pub name: String,
    pub industry: String,
}

/// Split a discovery reply into organisation name and industry.
///
/// Splits on the first `,`, `;`, newline, `" - "` or `" in "`. Without a
/// separator the whole reply is used for both fields.
pub fn read_organisation(reply: &str) -> Option<OrganisationReply> {
    let text = reply.trim();
    if !is_substantive(text) {
        return None;
    }

    let lowered = text.to_ascii_lowercase();
    let separators: [(&str, usize); 5] = [(",", 1), (";", 1), ("\n", 1), (" - ", 3), (" in ", 4)];
    let split_at = separators
        .iter()
        .filter_map(|(sep, len)| lowered.find(sep).map(|pos| (pos, *len)))
        .min_by_key(|(pos, _)| *pos);

    let (name, industry) = match split_at {
        Some((pos, len)) => (&text[..pos], &text[pos + len..]),
        None => (text, text),
    };

    let name = clean_fragment(name);
    let industry = clean_fragment(industry);
    match (name.is_empty(), industry.is_empty()) {
        (false, false) => Some(OrganisationReply { name, industry }),
        (false, true) => Some(OrganisationReply {
            industry: name.clone(),
            name,
        }),
        (true, false) => Some(OrganisationReply {
            name: industry.clone(),
            industry,
        }),
        (true, true) => None,
    }
}

fn clean_fragment(fragment: &str) -> String {
    let trimmed = fragment
        .trim()
        .trim_matches(|c: char| c.is_ascii_punctuation() && c != '&')
        .trim();
    let lowered = trimmed.to_ascii_lowercase();
    for prefix in [
        "we're in ",
        "we are in ",
        "we're ",
        "we are ",
        "it's ",
        "its ",
        "the industry is ",
        "industry: ",
    ] {
        if lowered.starts_with(prefix) {
            return trimmed[prefix.len()..].trim().to_string();
        }
    }
    trimmed.to_string()
}

/// Read an employee count from a scoping reply.
///
/// Understands `"about 40"`, `"1,200"`, `"2k"` and ranges such as
/// `"50-100"` or `"50 to 100"` (the upper bound wins).
pub fn read_employee_count(reply: &str) -> Option<u32> {
    let mut numbers: Vec<u64> = Vec::new();
    let chars: Vec<char> = reply.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        if !chars[i].is_ascii_digit() {
            i += 1;
            continue;
        }
        let mut value: u64 = 0;
        while i < chars.len() {
            let c = chars[i];
            if let Some(d) = c.to_digit(10) {
                value = value.saturating_mul(10).saturating_add(d as u64);
                i += 1;
            } else if c == ','
                && chars.get(i + 1).is_some_and(|n| n.is_ascii_digit())
                && chars.get(i + 3).is_some_and(|n| n.is_ascii_digit())
            {
                // thousands separator
                i += 1;
            } else {
                break;
            }
        }
        if chars.get(i).is_some_and(|c| *c == 'k' || *c == 'K')
            && !chars.get(i + 1).is_some_and(|c| c.is_alphabetic())
        {
            value = value.saturating_mul(1000);
            i += 1;
        }
        numbers.push(value);
    }

    numbers
        .into_iter()
        .max()
        .and_then(|n| u32::try_from(n).ok())
        .filter(|n| *n > 0)
}

/// Find an email address in an account-creation reply
pub fn read_email(reply: &str) -> Option<EmailAddress> {
    EmailAddress::find_in(reply)
}
