//! Prompt markdown parsing.
//!
//! ```text
//! ## Good
//! ### Chad Walk
//! Walking in like you own the place.
//! Bias: 9
//! ## Bad
//! ### Ohio Moment
//! Only in Ohio.
//! ```
use regex::Regex;
use thiserror::Error;

pub const DEFAULT_BIAS_MAGNITUDE: i32 = 5;
pub const MAX_BIAS_MAGNITUDE: i32 = 10;

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("invalid built-in pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("line {line}: meme `{title}` appears before any `## Good` or `## Bad` section")]
    NoSection { line: usize, title: String },
    #[error("line {line}: unknown section `{name}` (expected Good or Bad)")]
    UnknownSection { line: usize, name: String },
    #[error("line {line}: bias `{value}` is not an integer")]
    InvalidBias { line: usize, value: String },
}

/// One meme described in the prompt file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemePrompt {
    pub title: String,
    pub description: String,
    pub is_good: bool,
    /// Unsigned strength in `[1, MAX_BIAS_MAGNITUDE]`; the sign comes from the section.
    pub bias_magnitude: i32,
    pub line: usize,
}

impl MemePrompt {
    #[must_use]
    pub const fn signed_bias(&self) -> i32 {
        if self.is_good {
            self.bias_magnitude
        } else {
            -self.bias_magnitude
        }
    }
}

pub struct PromptParser {
    heading: Regex,
    bias: Regex,
}

impl PromptParser {
    /// # Errors
    ///
    /// Returns an error only if a built-in pattern fails to compile.
    pub fn new() -> Result<Self, PromptError> {
        Ok(Self {
            heading: Regex::new(r"^(#{1,3})\s+(.+?)\s*#*\s*$")?,
            bias: Regex::new(r"(?i)^bias\s*:\s*(\S+)\s*$")?,
        })
    }

    /// Parse the whole prompt document.
    ///
    /// # Errors
    ///
    /// Returns the first structural problem, with its 1-based line number.
    pub fn parse(&self, markdown: &str) -> Result<Vec<MemePrompt>, PromptError> {
        let mut prompts: Vec<MemePrompt> = Vec::new();
        let mut section: Option<bool> = None;
        let mut in_entry = false;

        for (index, raw) in markdown.lines().enumerate() {
            let line_no = index + 1;
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }

            if let Some(caps) = self.heading.captures(line) {
                let level = caps[1].len();
                let text = caps[2].trim().to_string();
                match level {
                    1 => in_entry = false,
                    2 => {
                        section = Some(parse_section(&text, line_no)?);
                        in_entry = false;
                    }
                    _ => {
                        let Some(is_good) = section else {
                            return Err(PromptError::NoSection {
                                line: line_no,
                                title: text,
                            });
                        };
                        prompts.push(MemePrompt {
                            title: text,
                            description: String::new(),
                            is_good,
                            bias_magnitude: DEFAULT_BIAS_MAGNITUDE,
                            line: line_no,
                        });
                        in_entry = true;
                    }
                }
                continue;
            }

            let Some(current) = prompts.last_mut().filter(|_| in_entry) else {
                log::debug!("line {line_no}: skipping text outside a meme entry");
                continue;
            };

            if let Some(caps) = self.bias.captures(line) {
                let value = &caps[1];
                let parsed: i32 = value.parse().map_err(|_| PromptError::InvalidBias {
                    line: line_no,
                    value: value.to_string(),
                })?;
                current.bias_magnitude = parsed.saturating_abs().clamp(1, MAX_BIAS_MAGNITUDE);
                continue;
            }

            if !current.description.is_empty() {
                current.description.push(' ');
            }
            current.description.push_str(line);
        }

        Ok(prompts)
    }
}

fn parse_section(name: &str, line: usize) -> Result<bool, PromptError> {
    let lowered = name.to_ascii_lowercase();
    if lowered.starts_with("good") {
        Ok(true)
    } else if lowered.starts_with("bad") {
        Ok(false)
    } else {
        Err(PromptError::UnknownSection {
            line,
            name: name.to_string(),
        })
    }
}
