//! Rendering targets for the `check` and `generate` summaries.

/// Sink the two command summaries are written to.
///
/// `CheckReport` lists the declared types and any unreachable ones;
/// `GenerateReport` lists entry points, helper-only types and the fate of
/// the output file. Both speak in these terms and leave layout to the sink.
pub trait Output {
    /// Heading for a group of types, e.g. `Entry points (2)`.
    fn heading(&mut self, title: &str);

    /// `package: models` style line.
    fn field(&mut self, key: &str, value: &str);

    /// One type under the current heading.
    fn item(&mut self, text: &str);

    /// A file the run created or rewrote.
    fn written(&mut self, path: &str);

    fn warning(&mut self, msg: &str);

    /// Free-standing status line such as `kodec.toml is valid`.
    fn note(&mut self, text: &str);

    fn blank(&mut self);
}

/// A command summary.
pub trait Report {
    fn render(&self, out: &mut dyn Output);
}

/// Prints to stdout, warnings to stderr.
#[derive(Debug, Default)]
pub struct TerminalOutput;

impl TerminalOutput {
    pub fn new() -> Self {
        Self
    }
}

impl Output for TerminalOutput {
    fn heading(&mut self, title: &str) {
        println!("{}:", title);
    }

    fn field(&mut self, key: &str, value: &str) {
        println!("{}: {}", key, value);
    }

    fn item(&mut self, text: &str) {
        println!("  - {}", text);
    }

    fn written(&mut self, path: &str) {
        println!("  + {}", path);
    }

    fn warning(&mut self, msg: &str) {
        eprintln!("warning: {}", msg);
    }

    fn note(&mut self, text: &str) {
        println!("{}", text);
    }

    fn blank(&mut self) {
        println!();
    }
}

/// Collects rendered lines so report tests can compare them.
#[cfg(test)]
#[derive(Default)]
pub struct BufferOutput {
    pub lines: Vec<String>,
}

#[cfg(test)]
impl Output for BufferOutput {
    fn heading(&mut self, title: &str) {
        self.lines.push(format!("{}:", title));
    }

    fn field(&mut self, key: &str, value: &str) {
        self.lines.push(format!("{}: {}", key, value));
    }

    fn item(&mut self, text: &str) {
        self.lines.push(format!("  - {}", text));
    }

    fn written(&mut self, path: &str) {
        self.lines.push(format!("  + {}", path));
    }

    fn warning(&mut self, msg: &str) {
        self.lines.push(format!("warning: {}", msg));
    }

    fn note(&mut self, text: &str) {
        self.lines.push(text.to_string());
    }

    fn blank(&mut self) {
        self.lines.push(String::new());
    }
}
