//! Operator prompt shown while the scheduler is paused.

use async_trait::async_trait;
#[cfg(test)]
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::thread;
use tokio::sync::mpsc;

/// Source of operator answers.
#[async_trait]
pub trait Prompt: Send {
    /// Show `question` and read one answer. `None` means end of input.
    async fn ask(&mut self, question: &str) -> io::Result<Option<String>>;
}

type LineReceiver = mpsc::UnboundedReceiver<io::Result<String>>;

/// Prompt on stderr, answer from stdin.
///
/// Stdin is read by a detached thread started on the first question, so a
/// pending read never holds up shutdown. Stderr keeps the question out of
/// JSON output on stdout.
#[derive(Debug, Default)]
pub struct StdinPrompt {
    lines: Option<LineReceiver>,
}

impl StdinPrompt {
    /// Create a prompt reading from the process stdin.
    pub fn new() -> Self {
        Self { lines: None }
    }

    fn lines(&mut self) -> io::Result<&mut LineReceiver> {
        if self.lines.is_none() {
            let (tx, rx) = mpsc::unbounded_channel();
            thread::Builder::new()
                .name("stdin-reader".into())
                .spawn(move || {
                    for line in io::stdin().lock().lines() {
                        if tx.send(line).is_err() {
                            break;
                        }
                    }
                })?;
            self.lines = Some(rx);
        }
        self.lines
            .as_mut()
            .ok_or_else(|| io::Error::other("stdin reader unavailable"))
    }
}

#[async_trait]
impl Prompt for StdinPrompt {
    async fn ask(&mut self, question: &str) -> io::Result<Option<String>> {
        let lines = self.lines()?;
        // Anything typed while probing is not an answer
        while lines.try_recv().is_ok() {}

        {
            let mut err = io::stderr().lock();
            write!(err, "\n{}", console::style(question).bold())?;
            err.flush()?;
        }

        lines.recv().await.transpose()
    }
}

/// Prompt answering from a fixed script, then reporting end of input.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct ScriptedPrompt {
    answers: VecDeque<String>,
    asked: usize,
}

#[cfg(test)]
impl ScriptedPrompt {
    /// Create a prompt that replays `answers` in order.
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            asked: 0,
        }
    }

    /// Number of times the prompt was shown.
    pub fn asked(&self) -> usize {
        self.asked
    }
}

#[cfg(test)]
#[async_trait]
impl Prompt for ScriptedPrompt {
    async fn ask(&mut self, _question: &str) -> io::Result<Option<String>> {
        self.asked += 1;
        Ok(self.answers.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_prompt() {
        let mut prompt = ScriptedPrompt::new(["menu", "stop"]);
        assert_eq!(prompt.ask("?").await.unwrap().as_deref(), Some("menu"));
        assert_eq!(prompt.ask("?").await.unwrap().as_deref(), Some("stop"));
        assert_eq!(prompt.ask("?").await.unwrap(), None);
        assert_eq!(prompt.asked(), 3);
    }
}
