//! Pure matching functions: given a raw message and the session's
//! nick and command prefix, decide whether a hook fires and extract
//! its argument. No I/O, no registry access.

use regex::RegexBuilder;

use crate::hook::PatternCaptures;

/// Outcome of one command-form match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandMatch {
    /// Text after the command word, original case, untrimmed past the
    /// single separating whitespace character. `None` for a bare
    /// command with no argument.
    pub argument: Option<String>,
    /// True when the command arrived via the explicit `nick:` form.
    pub addressed: bool,
}

/// `^cmd$|^cmd\s(.*)$`, case-insensitive, with the command escaped.
fn command_regex(command: &str) -> Option<regex::Regex> {
    let word = regex::escape(command);
    RegexBuilder::new(&format!("^{word}$|^{word}\\s(.*)$"))
        .case_insensitive(true)
        .build()
        .ok()
}

fn apply(re: &regex::Regex, text: &str, addressed: bool) -> Option<CommandMatch> {
    re.captures(text).map(|caps| CommandMatch {
        argument: caps.get(1).map(|m| m.as_str().to_owned()),
        addressed,
    })
}

/// Match one command hook against a raw message.
///
/// Public context recognizes two independent prefix forms:
/// `<prefix><cmd>` (addressed = false) and `<nick>: <cmd>`
/// (addressed = true). Private context additionally matches the bare
/// command, since every private message is implicitly addressed to
/// the bot. A message can therefore yield more than one match.
pub fn match_command(
    body: &str,
    nick: &str,
    prefix: &str,
    private: bool,
    command: &str,
) -> Vec<CommandMatch> {
    let Some(re) = command_regex(command) else {
        return Vec::new();
    };
    let mut matches = Vec::new();

    if private {
        if let Some(m) = apply(&re, body, false) {
            matches.push(m);
        }
    }

    let stripped = if let Some(rest) = body.strip_prefix(prefix) {
        Some((rest, false))
    } else {
        nick_addressed_rest(body, nick).map(|rest| (rest, true))
    };

    if let Some((rest, addressed)) = stripped {
        if let Some(m) = apply(&re, rest, addressed) {
            matches.push(m);
        }
    }

    matches
}

/// Strip a leading `nick:` address (case-insensitive on the nick)
/// plus any following whitespace; `None` when the message is not
/// addressed to the nick.
fn nick_addressed_rest<'a>(body: &'a str, nick: &str) -> Option<&'a str> {
    let head = body.get(..nick.len() + 1)?;
    let mut expected = nick.to_owned();
    expected.push(':');
    if !head.eq_ignore_ascii_case(&expected) {
        return None;
    }
    Some(body[nick.len() + 1..].trim_start())
}

/// Match one keyword hook against every whitespace-delimited token.
/// Each matching token fires independently; the returned arguments
/// are the captures after the keyword literal, in token order.
pub fn match_keyword(body: &str, keyword: &str) -> Vec<String> {
    let Ok(re) = RegexBuilder::new(&format!("^{}(.+)", regex::escape(keyword)))
        .case_insensitive(true)
        .build()
    else {
        return Vec::new();
    };

    body.split_whitespace()
        .filter_map(|token| re.captures(token))
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_owned()))
        .collect()
}

/// Search a pattern hook's regex anywhere in the raw message.
pub fn match_pattern(re: &regex::Regex, body: &str) -> Option<PatternCaptures> {
    re.captures(body).map(|caps| PatternCaptures {
        matched: caps
            .get(0)
            .map(|m| m.as_str().to_owned())
            .unwrap_or_default(),
        groups: (1..caps.len())
            .map(|i| caps.get(i).map(|m| m.as_str().to_owned()))
            .collect(),
    })
}
