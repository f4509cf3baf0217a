//! Emission context and output buffer.
//!
//! `EmitContext` pairs the schema being rendered with an indentation-aware
//! text buffer. Generated C++ indents with tabs; access specifiers are
//! written at column zero regardless of the current level.

use astcc_ir::{Schema, SymbolId, Visibility};

/// Width of the `//===` and `//---` rules around top-level sections.
const SECTION_RULE_WIDTH: usize = 95;

/// Width of the `//---` rule under a member comment inside a class.
const MEMBER_RULE_WIDTH: usize = 81;

/// Emission state for one output file.
pub struct EmitContext<'a> {
    /// The validated schema being rendered.
    pub schema: &'a Schema,
    /// Current indentation level.
    indent: usize,
    /// Generated code output.
    output: String,
}

impl<'a> EmitContext<'a> {
    pub fn new(schema: &'a Schema) -> Self {
        Self {
            schema,
            indent: 0,
            output: String::with_capacity(4096),
        }
    }

    /// Increase indentation level.
    pub fn indent(&mut self) {
        self.indent += 1;
    }

    /// Decrease indentation level.
    pub fn dedent(&mut self) {
        debug_assert!(self.indent > 0, "dedent called with zero indent");
        self.indent = self.indent.saturating_sub(1);
    }

    /// Write indentation to output.
    pub fn write_indent(&mut self) {
        for _ in 0..self.indent {
            self.output.push('\t');
        }
    }

    /// Write a string to output.
    pub fn write(&mut self, s: &str) {
        self.output.push_str(s);
    }

    /// Write a line to output (with indentation and newline).
    pub fn writeln(&mut self, s: &str) {
        self.write_indent();
        self.output.push_str(s);
        self.output.push('\n');
    }

    /// Write a newline.
    pub fn newline(&mut self) {
        self.output.push('\n');
    }

    /// Write an access specifier line such as `public:`.
    pub fn access(&mut self, visibility: Visibility) {
        self.output.push_str(visibility.keyword());
        self.output.push_str(":\n");
    }

    /// Write a top-level `//---` rule.
    pub fn section_rule(&mut self) {
        self.rule('-', SECTION_RULE_WIDTH);
    }

    /// Write a top-level `//===` rule.
    pub fn banner_rule(&mut self) {
        self.rule('=', SECTION_RULE_WIDTH);
    }

    /// Write the three-line comment block that introduces a class member.
    pub fn member_comment(&mut self, text: &str) {
        self.writeln("//");
        self.writeln(&format!("// -- {text}"));
        self.write_indent();
        self.rule('-', MEMBER_RULE_WIDTH);
    }

    fn rule(&mut self, fill: char, width: usize) {
        self.output.push_str("//");
        for _ in 0..width {
            self.output.push(fill);
        }
        self.output.push('\n');
    }

    /// Take the generated output.
    pub fn take_output(&mut self) -> String {
        std::mem::take(&mut self.output)
    }

    /// Name of a type or node symbol as written in the schema.
    #[inline]
    pub fn type_name(&self, ty: SymbolId) -> &'a str {
        self.schema.type_name(ty)
    }

    /// A declaration of `name` with type `ty`; node-kind types are pointers.
    pub fn declarator(&self, ty: SymbolId, name: &str) -> String {
        let star = if self.schema.symbols.is_node(ty) { "*" } else { "" };
        format!("{} {star}{name}", self.type_name(ty))
    }
}
