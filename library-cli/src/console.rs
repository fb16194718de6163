//! Terminal-backed field supplier.

use std::io::{self, BufRead, Write};

use library_kernel::{Field, FieldSupplier};

/// Line that ends multi-line input.
pub const BODY_TERMINATOR: &str = "---";

/// Asks for each field on `output` and reads answers from `input`.
pub struct ConsoleSupplier<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ConsoleSupplier<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }

    fn read_block(&mut self) -> io::Result<String> {
        let mut lines = Vec::new();
        while let Some(line) = self.read_line()? {
            if line.trim() == BODY_TERMINATOR {
                break;
            }
            lines.push(line);
        }
        Ok(lines.join("\n"))
    }
}

impl<R: BufRead, W: Write> FieldSupplier for ConsoleSupplier<R, W> {
    fn supply_field(&mut self, field: Field, default: Option<&str>) -> io::Result<String> {
        if field.is_multiline() {
            writeln!(
                self.output,
                "{field} (finish with a line containing only {BODY_TERMINATOR}):"
            )?;
            self.output.flush()?;
            return self.read_block();
        }

        match default {
            Some(default) => write!(self.output, "{field} [{default}]: ")?,
            None => write!(self.output, "{field}: ")?,
        }
        self.output.flush()?;
        self.read_line()?.ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("input ended before {field} was entered"),
            )
        })
    }
}
