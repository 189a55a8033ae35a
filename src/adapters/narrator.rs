use crate::core::Narrator;
use crate::utils::error::Result;
use std::io::Write;

/// 把敘述寫到任意 `Write` (預設是 stdout)
pub struct ConsoleNarrator<W: Write + Send = std::io::Stdout> {
    out: W,
    lines: usize,
}

impl ConsoleNarrator<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> ConsoleNarrator<W> {
    pub fn new(out: W) -> Self {
        Self { out, lines: 0 }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> Narrator for ConsoleNarrator<W> {
    fn line(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, "{}", text)?;
        self.lines += 1;
        Ok(())
    }

    fn lines_written(&self) -> usize {
        self.lines
    }
}

/// In-memory narrator; keeps every line for later inspection.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    lines: Vec<String>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|line| line.contains(needle))
    }
}

impl Narrator for Transcript {
    fn line(&mut self, text: &str) -> Result<()> {
        self.lines.push(text.to_string());
        Ok(())
    }

    fn lines_written(&self) -> usize {
        self.lines.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_narrator_writes_lines() {
        let mut narrator = ConsoleNarrator::new(Vec::new());
        narrator.line("first").unwrap();
        narrator.section("TITLE").unwrap();
        assert_eq!(narrator.lines_written(), 5);

        let written = String::from_utf8(narrator.into_inner()).unwrap();
        assert!(written.starts_with("first\n\n===="));
        assert!(written.contains("\nTITLE\n"));
    }

    #[test]
    fn test_transcript_insights() {
        let mut transcript = Transcript::new();
        transcript
            .insights("KEY INSIGHTS:", &["one", "two"])
            .unwrap();
        assert!(transcript.contains("• one"));
        assert!(transcript.contains("• two"));
        assert_eq!(transcript.lines().last().unwrap(), &"=".repeat(60));
    }
}
