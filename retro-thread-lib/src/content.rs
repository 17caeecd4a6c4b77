//! Prompts for the text model and the checks its output must pass before
//! anything is published.

use crate::error::ThreadError;
use crate::records::GameRecord;

/// Hard limit on a single post, counted in characters.
pub const MAX_POST_CHARS: usize = 280;

pub const SYSTEM_PROMPT: &str = "You are a bot that generates engaging content to be posted on social networks.
You are very knowledgeable about vintage 8-bit computers and old computer games from the eighties.
I will give you the name of computer game, and you will generate a short
text telling an anecdote about the game or describing a particularly
memorable aspect of the game.
Your style should be vivid, epic and inspiring but concise with short sentences.
You can make moderate use of emojis.
You will split the text into several lines of maximum 250 characters each to be shared as a thread on Twitter.";

pub fn user_prompt(record: &GameRecord) -> String {
    format!(
        "Game title: \"{}\" on platform: \"{}\".",
        record.title, record.platform
    )
}

/// Characters that end a line of model output. `\r\n` splits into an empty
/// piece, which is dropped with the other empty lines.
fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Split model output into posts: one per line, empty lines dropped.
pub fn split_posts(text: &str) -> Vec<String> {
    text.split(is_line_break)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn validate_posts(posts: &[String]) -> Result<(), ThreadError> {
    if posts.is_empty() {
        return Err(ThreadError::EmptyThread);
    }

    for (index, post) in posts.iter().enumerate() {
        let length = post.chars().count();
        if length > MAX_POST_CHARS {
            return Err(ThreadError::PostTooLong {
                index,
                length,
                max: MAX_POST_CHARS,
            });
        }
    }

    Ok(())
}

/// Posts of a thread, in order. Never empty and every post fits the limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadContent {
    posts: Vec<String>,
}

impl ThreadContent {
    pub fn from_generated(text: &str) -> Result<Self, ThreadError> {
        Self::new(split_posts(text))
    }

    pub fn new(posts: Vec<String>) -> Result<Self, ThreadError> {
        validate_posts(&posts)?;
        Ok(Self { posts })
    }

    pub fn posts(&self) -> &[String] {
        &self.posts
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}
