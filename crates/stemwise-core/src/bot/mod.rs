//! Leadership-themed stem completion via a hosted chat model.
//!
//! This path is independent of the corpus: it sends each stem to a chat
//! model with [`LEADERSHIP_PROMPT`] and parses the four labelled fields of
//! the reply as best it can. Nothing about the reply is enforced.

mod openai;

use std::io::Write;

use serde::Serialize;

use crate::error::{BotError, BotResult};

pub use openai::{DEFAULT_API_BASE, DEFAULT_API_KEY_ENV, DEFAULT_MODEL, DEFAULT_TEMPERATURE, OpenAiChat};

/// Prompt template; `{stem}` is replaced by the stem being completed.
pub const LEADERSHIP_PROMPT: &str = "You are helping complete a measure of implicit leadership traits.
Given a word fragment with underscores (_) representing missing letters, provide possible completions
that relate to leadership characteristics.

Consider these aspects:
1. The word should fit the exact pattern (underscores represent exact letter positions)
2. The word should relate to leadership traits or characteristics
3. Provide a brief explanation of how the word relates to leadership

Word fragment to complete: {stem}
Required pattern: Each _ represents exactly one letter

Please provide:
1. Your top word completion
2. How this word relates to leadership
3. Alternative completions (if any)
4. Brief explanation of why this is a good leadership-related completion

Format your response as:
COMPLETION: [primary word]
LEADERSHIP RELEVANCE: [explanation]
ALTERNATIVES: [other possible words]
REASONING: [brief explanation]";

/// Stems from the study's leadership measure, spaced as presented to participants.
pub const STUDY_STEMS: &[&str] = &[
    "_ OY A L",
    "_ ATURE",
    "HON _ _",
    "BRA _ _ _",
    "_ _ ART",
    "THOU _ _ _ _ _ _",
    "CHAR _ _ _ _",
    "L _ VLEY",
    "_ _ MBLE",
    "CRE _ _ _ _ _",
    "SENS _ _ _ _ _",
    "_ OC _ _ _",
    "_ A L M",
    "_ A I R",
    "W A _ _",
    "BRU _ _ _",
    "_ _ _ ONG",
    "F I _ _",
    "_ AN _ _",
    "C O _ _ _",
    "C R U _ _",
];

/// Fill the prompt template for `stem`.
pub fn render_prompt(stem: &str) -> String {
    LEADERSHIP_PROMPT.replace("{stem}", stem)
}

/// Something that answers a single-turn chat prompt.
pub trait ChatBackend {
    /// Send `prompt` as the user message and return the reply text.
    fn chat(&self, prompt: &str) -> BotResult<String>;
}

/// The labelled fields of a reply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LeadershipCompletion {
    /// Primary completion.
    pub completion: String,
    /// How the word relates to leadership.
    pub leadership_relevance: String,
    /// Alternative completions.
    pub alternatives: Vec<String>,
    /// Why it is a good leadership-related completion.
    pub reasoning: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Completion,
    Relevance,
    Alternatives,
    Reasoning,
}

const FIELD_LABELS: &[(&str, Field)] = &[
    ("COMPLETION", Field::Completion),
    ("LEADERSHIP RELEVANCE", Field::Relevance),
    ("ALTERNATIVES", Field::Alternatives),
    ("REASONING", Field::Reasoning),
];

impl LeadershipCompletion {
    /// Parse a free-text reply.
    ///
    /// A field starts at a line beginning with its label and a colon (any
    /// case, optionally wrapped in markdown emphasis) and runs until the next
    /// label. Text before the first label is ignored; missing fields stay empty.
    pub fn parse(reply: &str) -> Self {
        let mut fields: Vec<(Field, Vec<&str>)> = Vec::new();

        for line in reply.lines() {
            match split_label(line) {
                Some((field, rest)) => fields.push((field, vec![rest])),
                None => {
                    if let Some((_, lines)) = fields.last_mut() {
                        lines.push(line.trim());
                    }
                }
            }
        }

        let mut parsed = Self::default();
        for (field, lines) in fields {
            let text = clean_value(&lines.join("\n"));
            match field {
                Field::Completion => parsed.completion = text,
                Field::Relevance => parsed.leadership_relevance = text,
                Field::Alternatives => parsed.alternatives = split_alternatives(&text),
                Field::Reasoning => parsed.reasoning = text,
            }
        }
        parsed
    }
}

/// Match `LABEL: rest` at the start of a line.
fn split_label(line: &str) -> Option<(Field, &str)> {
    let trimmed = line.trim().trim_start_matches(['*', '#', '-', ' ']);
    let (label, rest) = trimmed.split_once(':')?;
    let label = label.trim().trim_end_matches('*').trim();
    FIELD_LABELS
        .iter()
        .find(|(name, _)| label.eq_ignore_ascii_case(name))
        .map(|(_, field)| (*field, rest.trim_start_matches('*').trim()))
}

fn clean_value(text: &str) -> String {
    let text = text.trim();
    let text = text
        .strip_prefix('[')
        .and_then(|t| t.strip_suffix(']'))
        .unwrap_or(text);
    text.trim().to_string()
}

fn split_alternatives(text: &str) -> Vec<String> {
    text.split([',', ';', '\n'])
        .map(|alt| alt.trim().trim_start_matches(['-', '*', ' ']).trim())
        .filter(|alt| {
            !alt.is_empty() && !alt.eq_ignore_ascii_case("none") && !alt.eq_ignore_ascii_case("n/a")
        })
        .map(str::to_string)
        .collect()
}

/// A stem with the model's reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StemReply {
    /// The stem as sent.
    pub stem: String,
    /// Raw reply text.
    pub response: String,
    /// Fields parsed from the reply.
    pub parsed: LeadershipCompletion,
}

/// Drives a [`ChatBackend`] over stems.
#[derive(Debug)]
pub struct LeadershipStemBot<B> {
    backend: B,
}

impl<B: ChatBackend> LeadershipStemBot<B> {
    /// Create a bot over `backend`.
    pub const fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Complete a single stem.
    #[tracing::instrument(skip(self))]
    pub fn complete_stem(&self, stem: &str) -> BotResult<StemReply> {
        let response = self.backend.chat(&render_prompt(stem))?;
        if response.trim().is_empty() {
            return Err(BotError::EmptyResponse {
                stem: stem.to_string(),
            });
        }
        let parsed = LeadershipCompletion::parse(&response);
        tracing::debug!(completion = %parsed.completion, "stem completed");
        Ok(StemReply {
            stem: stem.to_string(),
            response,
            parsed,
        })
    }

    /// Complete each stem in order; a failed stem does not stop the rest.
    pub fn process_stems<S: AsRef<str>>(&self, stems: &[S]) -> Vec<(String, BotResult<StemReply>)> {
        stems
            .iter()
            .map(|stem| {
                let stem = stem.as_ref();
                let result = self.complete_stem(stem);
                if let Err(ref e) = result {
                    tracing::warn!(stem, error = %e, "stem completion failed");
                }
                (stem.to_string(), result)
            })
            .collect()
    }
}

/// Write the plain-text completions report.
pub fn write_report<W: Write>(replies: &[StemReply], out: &mut W) -> BotResult<()> {
    writeln!(out, "LEADERSHIP WORD STEM COMPLETIONS")?;
    writeln!(out, "==============================")?;
    writeln!(out)?;
    for reply in replies {
        writeln!(out, "Stem: {}", reply.stem)?;
        writeln!(out, "Response:\n{}", reply.response)?;
        writeln!(out, "{}", "-".repeat(50))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct ScriptedChat {
        replies: RefCell<Vec<BotResult<String>>>,
        prompts: RefCell<Vec<String>>,
    }

    impl ScriptedChat {
        fn new(replies: Vec<BotResult<String>>) -> Self {
            Self {
                replies: RefCell::new(replies.into_iter().rev().collect()),
                prompts: RefCell::new(Vec::new()),
            }
        }
    }

    impl ChatBackend for ScriptedChat {
        fn chat(&self, prompt: &str) -> BotResult<String> {
            self.prompts.borrow_mut().push(prompt.to_string());
            self.replies
                .borrow_mut()
                .pop()
                .unwrap_or_else(|| Ok(String::new()))
        }
    }

    const REPLY: &str = "COMPLETION: Loyal
LEADERSHIP RELEVANCE: Loyal leaders earn trust
and keep commitments.
ALTERNATIVES: Royal, Joyal
REASONING: Loyalty is a core ILT dimension.";

    #[test]
    fn prompt_embeds_the_stem() {
        let prompt = render_prompt("_ OY A L");
        assert!(prompt.contains("Word fragment to complete: _ OY A L\n"));
        assert!(!prompt.contains("{stem}"));
    }

    #[test]
    fn parses_all_four_fields() {
        let parsed = LeadershipCompletion::parse(REPLY);
        assert_eq!(parsed.completion, "Loyal");
        assert_eq!(
            parsed.leadership_relevance,
            "Loyal leaders earn trust\nand keep commitments."
        );
        assert_eq!(parsed.alternatives, vec!["Royal", "Joyal"]);
        assert_eq!(parsed.reasoning, "Loyalty is a core ILT dimension.");
    }

    #[test]
    fn parses_markdown_and_brackets_loosely() {
        let reply = "Sure! Here you go.\n**Completion:** [Humble]\n**Alternatives:** none";
        let parsed = LeadershipCompletion::parse(reply);
        assert_eq!(parsed.completion, "Humble");
        assert!(parsed.alternatives.is_empty());
        assert!(parsed.reasoning.is_empty());
    }

    #[test]
    fn unstructured_reply_parses_to_empty_fields() {
        let parsed = LeadershipCompletion::parse("I think the answer is calm.");
        assert_eq!(parsed, LeadershipCompletion::default());
    }

    #[test]
    fn alternatives_split_on_lines_and_semicolons() {
        let parsed = LeadershipCompletion::parse("ALTERNATIVES:\n- Brainy\n- Brawny; Brassy");
        assert_eq!(parsed.alternatives, vec!["Brainy", "Brawny", "Brassy"]);
    }

    #[test]
    fn bot_keeps_going_after_a_failed_stem() {
        let chat = ScriptedChat::new(vec![
            Ok(REPLY.to_string()),
            Err(BotError::Request("503".into())),
            Ok("COMPLETION: Calm".to_string()),
        ]);
        let bot = LeadershipStemBot::new(chat);
        let results = bot.process_stems(&["_ OY A L", "HON _ _", "_ A L M"]);

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].1.as_ref().unwrap().parsed.completion, "Loyal");
        assert!(results[1].1.is_err());
        assert_eq!(results[2].1.as_ref().unwrap().parsed.completion, "Calm");
        assert!(bot.backend.prompts.borrow()[2].contains("_ A L M"));
    }

    #[test]
    fn blank_reply_is_an_error() {
        let bot = LeadershipStemBot::new(ScriptedChat::new(vec![Ok("  \n".to_string())]));
        let err = bot.complete_stem("WA__").unwrap_err();
        assert!(matches!(err, BotError::EmptyResponse { .. }));
    }

    #[test]
    fn report_lists_each_stem_and_response() {
        let bot = LeadershipStemBot::new(ScriptedChat::new(vec![Ok(REPLY.to_string())]));
        let reply = bot.complete_stem("_ OY A L").unwrap();

        let mut buf = Vec::new();
        write_report(&[reply], &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.starts_with("LEADERSHIP WORD STEM COMPLETIONS\n"));
        assert!(text.contains("Stem: _ OY A L\nResponse:\nCOMPLETION: Loyal\n"));
        assert!(text.ends_with(&format!("{}\n", "-".repeat(50))));
    }
}
