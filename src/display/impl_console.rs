use crate::display::interface::Display;
use std::error::Error;
use std::io::{BufRead, Write};

const WIDTH: usize = 44;

pub struct DisplayConsole<W: Write + Send + Sync> {
    out: W,
    last_screen: Vec<String>,
    acknowledge: Option<Box<dyn BufRead + Send + Sync>>,
}

impl DisplayConsole<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send + Sync> DisplayConsole<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            last_screen: vec![],
            acknowledge: None,
        }
    }

    /// Alerts block until a line is read from `input`. Without this the
    /// alert returns at once and the next command serves as acknowledgement.
    pub fn acknowledged_by(mut self, input: Box<dyn BufRead + Send + Sync>) -> Self {
        self.acknowledge = Some(input);
        self
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send + Sync> Display for DisplayConsole<W> {
    fn show(&mut self, lines: &[String]) -> Result<(), Box<dyn Error + Send + Sync>> {
        if lines == self.last_screen.as_slice() {
            return Ok(());
        }

        writeln!(self.out, "┌{}┐", "─".repeat(WIDTH))?;
        for line in lines {
            writeln!(self.out, "│ {:<width$} │", line, width = WIDTH - 2)?;
        }
        writeln!(self.out, "└{}┘", "─".repeat(WIDTH))?;
        self.out.flush()?;

        self.last_screen = lines.to_vec();
        Ok(())
    }

    fn alert(&mut self, message: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        writeln!(self.out)?;
        writeln!(self.out, "  *** {} ***", message)?;
        writeln!(self.out)?;

        if let Some(input) = self.acknowledge.as_mut() {
            write!(self.out, "  Press Enter to continue ")?;
            self.out.flush()?;
            let mut line = String::new();
            input.read_line(&mut line)?;
            return Ok(());
        }

        self.out.flush()?;
        Ok(())
    }
}
