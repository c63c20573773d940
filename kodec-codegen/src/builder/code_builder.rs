//! Code builder utility for generating properly indented code.

/// Fluent API for building code with proper indentation.
///
/// Generated sources are tab-indented, the way `gofmt` lays them out.
///
/// # Example
///
/// ```
/// use kodec_codegen::CodeBuilder;
///
/// let code = CodeBuilder::new()
///     .line("func main() {")
///     .indent()
///     .line("println(\"Hello, world!\")")
///     .dedent()
///     .line("}")
///     .build();
///
/// assert_eq!(code, "func main() {\n\tprintln(\"Hello, world!\")\n}\n");
/// ```
#[derive(Debug, Clone)]
pub struct CodeBuilder {
    indent_level: usize,
    buffer: String,
}

const INDENT: &str = "\t";

impl CodeBuilder {
    /// Create a new, empty CodeBuilder.
    pub fn new() -> Self {
        Self {
            indent_level: 0,
            buffer: String::new(),
        }
    }

    /// Add a line of code with current indentation.
    pub fn line(mut self, s: &str) -> Self {
        self.write_indent();
        self.buffer.push_str(s);
        self.buffer.push('\n');
        self
    }

    /// Add a blank line (no indentation).
    pub fn blank(mut self) -> Self {
        self.buffer.push('\n');
        self
    }

    /// Increase indentation level.
    pub fn indent(mut self) -> Self {
        self.indent_level += 1;
        self
    }

    /// Decrease indentation level.
    pub fn dedent(mut self) -> Self {
        self.indent_level = self.indent_level.saturating_sub(1);
        self
    }

    /// Add a block with a closing line.
    ///
    /// # Example
    ///
    /// ```
    /// use kodec_codegen::CodeBuilder;
    ///
    /// let code = CodeBuilder::new()
    ///     .block_with_close("if ok {", "}", |b| b.line("return"))
    ///     .build();
    ///
    /// assert_eq!(code, "if ok {\n\treturn\n}\n");
    /// ```
    pub fn block_with_close<F>(self, header: &str, close: &str, f: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        let builder = self.line(header).indent();
        f(builder).dedent().line(close)
    }

    /// Fallible variant of [`CodeBuilder::block_with_close`].
    pub fn try_block<F, E>(self, header: &str, close: &str, f: F) -> Result<Self, E>
    where
        F: FnOnce(Self) -> Result<Self, E>,
    {
        let builder = self.line(header).indent();
        Ok(f(builder)?.dedent().line(close))
    }

    /// Add a line comment (`// text`).
    pub fn comment(mut self, text: &str) -> Self {
        self.write_indent();
        self.buffer.push_str("// ");
        self.buffer.push_str(text);
        self.buffer.push('\n');
        self
    }

    /// Add content only when a value is present.
    pub fn when_some<T, F>(self, value: Option<T>, f: F) -> Self
    where
        F: FnOnce(Self, T) -> Self,
    {
        match value {
            Some(value) => f(self, value),
            None => self,
        }
    }

    /// Iterate and add content for each item.
    pub fn each<T, I, F>(mut self, items: I, f: F) -> Self
    where
        I: IntoIterator<Item = T>,
        F: Fn(Self, T) -> Self,
    {
        for item in items {
            self = f(self, item);
        }
        self
    }

    /// Consume the builder and return the generated code.
    pub fn build(self) -> String {
        self.buffer
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.buffer.push_str(INDENT);
        }
    }
}

impl Default for CodeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_line() {
        let code = CodeBuilder::new().line("x := 1").build();
        assert_eq!(code, "x := 1\n");
    }

    #[test]
    fn test_indentation() {
        let code = CodeBuilder::new()
            .line("func main() {")
            .indent()
            .line("println(\"Hello\")")
            .dedent()
            .line("}")
            .build();

        assert_eq!(code, "func main() {\n\tprintln(\"Hello\")\n}\n");
    }

    #[test]
    fn test_dedent_saturates() {
        let code = CodeBuilder::new().dedent().line("x").build();
        assert_eq!(code, "x\n");
    }

    #[test]
    fn test_try_block_propagates_error() {
        let result: Result<CodeBuilder, &str> =
            CodeBuilder::new().try_block("for {", "}", |_| Err("boom"));
        assert_eq!(result.unwrap_err(), "boom");

        let code = CodeBuilder::new()
            .try_block::<_, &str>("for {", "}", |b| Ok(b.line("break")))
            .unwrap()
            .build();
        assert_eq!(code, "for {\n\tbreak\n}\n");
    }

    #[test]
    fn test_comment_and_blank() {
        let code = CodeBuilder::new()
            .comment("suppress unused package warning")
            .blank()
            .line("var _ = 1")
            .build();

        assert_eq!(code, "// suppress unused package warning\n\nvar _ = 1\n");
    }

    #[test]
    fn test_conditional() {
        let with_tags = CodeBuilder::new()
            .when_some(Some("!js"), |b, tags| b.line(&format!("//go:build {}", tags)))
            .line("package models")
            .build();

        let without_tags = CodeBuilder::new()
            .when_some(None::<&str>, |b, tags| b.line(&format!("//go:build {}", tags)))
            .line("package models")
            .build();

        assert_eq!(with_tags, "//go:build !js\npackage models\n");
        assert_eq!(without_tags, "package models\n");
    }

    #[test]
    fn test_each() {
        let code = CodeBuilder::new()
            .line("import (")
            .indent()
            .each(["json \"encoding/json\"", "fmt \"fmt\""], |b, line| b.line(line))
            .dedent()
            .line(")")
            .build();

        assert_eq!(code, "import (\n\tjson \"encoding/json\"\n\tfmt \"fmt\"\n)\n");
    }
}
