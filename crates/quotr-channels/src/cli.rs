use std::io::{self, BufRead, BufReader, IsTerminal, Stdout, Write};

use quotr_core::channel::{Channel, ChannelError, ChannelMessage};

const QUERY_PROMPT: &str = "💬 Enter your query here";

enum Source {
    /// Interactive prompt on a terminal.
    Terminal,
    /// Line-by-line reads from a pipe, file, or test buffer.
    Lines(Option<Box<dyn BufRead + Send>>),
}

/// CLI channel that reads queries from stdin and renders results to a writer.
pub struct CliChannel<W: Write + Send = Stdout> {
    source: Source,
    out: W,
}

impl CliChannel<Stdout> {
    /// Prompt with `dialoguer` when stdin is a terminal, otherwise read lines.
    #[must_use]
    pub fn new() -> Self {
        let source = if io::stdin().is_terminal() {
            Source::Terminal
        } else {
            Source::Lines(Some(Box::new(BufReader::new(io::stdin()))))
        };
        Self {
            source,
            out: io::stdout(),
        }
    }
}

impl Default for CliChannel<Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write + Send> CliChannel<W> {
    #[must_use]
    pub fn with_io(input: impl BufRead + Send + 'static, out: W) -> Self {
        Self {
            source: Source::Lines(Some(Box::new(input))),
            out,
        }
    }

    #[must_use]
    pub fn writer(&self) -> &W {
        &self.out
    }

    fn write_block(&mut self, text: &str) -> Result<(), ChannelError> {
        writeln!(self.out, "{text}")?;
        self.out.flush()?;
        Ok(())
    }

    async fn read_line(&mut self) -> Result<Option<String>, ChannelError> {
        match &mut self.source {
            Source::Terminal => tokio::task::spawn_blocking(prompt_terminal)
                .await
                .map_err(|e| ChannelError::Other(e.to_string()))?,
            Source::Lines(slot) => {
                let mut reader = slot.take().ok_or(ChannelError::ChannelClosed)?;
                let (reader, result) = tokio::task::spawn_blocking(move || {
                    let mut line = String::new();
                    let result = reader.read_line(&mut line).map(|n| (n > 0).then_some(line));
                    (reader, result)
                })
                .await
                .map_err(|e| ChannelError::Other(e.to_string()))?;
                *slot = Some(reader);
                Ok(result?)
            }
        }
    }
}

fn prompt_terminal() -> Result<Option<String>, ChannelError> {
    let result = dialoguer::Input::<String>::new()
        .with_prompt(QUERY_PROMPT)
        .allow_empty(true)
        .interact_text();
    match result {
        Ok(line) => Ok(Some(line)),
        Err(dialoguer::Error::IO(e))
            if matches!(
                e.kind(),
                io::ErrorKind::UnexpectedEof | io::ErrorKind::Interrupted
            ) =>
        {
            Ok(None)
        }
        Err(e) => Err(ChannelError::Other(e.to_string())),
    }
}

impl<W: Write + Send> Channel for CliChannel<W> {
    async fn recv(&mut self) -> Result<Option<ChannelMessage>, ChannelError> {
        let Some(line) = self.read_line().await? else {
            return Ok(None);
        };
        let text = line.trim();
        if text == "exit" || text == "quit" {
            return Ok(None);
        }
        // A blank line is still a trigger; validation answers it with a warning.
        Ok(Some(ChannelMessage {
            text: text.to_owned(),
        }))
    }

    async fn send_status(&mut self, text: &str) -> Result<(), ChannelError> {
        self.write_block(&format!("✅ {text}"))
    }

    async fn send_warning(&mut self, text: &str) -> Result<(), ChannelError> {
        self.write_block(&format!("⚠️  {text}"))
    }

    async fn send_error(&mut self, text: &str) -> Result<(), ChannelError> {
        self.write_block(&format!("❌ {text}"))
    }

    async fn send_recommendation(&mut self, text: &str) -> Result<(), ChannelError> {
        self.write_block(&format!("\n🧠 Best Quotation Recommendation:\n{text}\n"))
    }
}
