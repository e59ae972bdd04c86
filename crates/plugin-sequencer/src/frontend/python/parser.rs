//! Python parser using tree-sitter.

use std::path::Path;
use tree_sitter::{Node, Parser};

use crate::diagnostic::{SequencerError, Span};
use super::ast::*;

/// Python parser.
pub struct PythonParser {
    parser: Parser,
}

/// Public callables of one source file.
#[derive(Debug, Clone)]
pub struct ParsedModule {
    pub operations: Vec<OperationSignature>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Module,
    Class,
}

impl PythonParser {
    /// Creates a new Python parser.
    pub fn new() -> Result<Self, SequencerError> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .map_err(|_| SequencerError::ParserInitFailed)?;
        Ok(Self { parser })
    }

    /// Parses a Python source file.
    pub fn parse(&mut self, source: &str, path: &Path) -> Result<ParsedModule, SequencerError> {
        let tree = self.parser.parse(source, None).ok_or_else(|| SequencerError::UnparsableSource {
            path: path.to_path_buf(),
            line: 1,
            column: 1,
            message: "parser produced no syntax tree".to_string(),
        })?;

        let root = tree.root_node();
        let mut visitor = Visitor::new(source, path);
        if root.has_error() {
            return Err(visitor.syntax_error(root));
        }
        visitor.visit_block(root, Scope::Module)?;

        Ok(ParsedModule {
            operations: visitor.operations,
        })
    }
}

/// AST visitor that extracts callables from tree-sitter nodes.
struct Visitor<'a> {
    source: &'a str,
    path: &'a Path,
    operations: Vec<OperationSignature>,
}

impl<'a> Visitor<'a> {
    fn new(source: &'a str, path: &'a Path) -> Self {
        Self {
            source,
            path,
            operations: Vec::new(),
        }
    }

    fn span(&self, node: Node) -> Span {
        Span::new(node.start_position().row, node.start_position().column)
    }

    fn node_text(&self, node: Node) -> &str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }

    fn unparsable(&self, node: Node, message: impl Into<String>) -> SequencerError {
        let (line, column) = self.span(node).start();
        SequencerError::UnparsableSource {
            path: self.path.to_path_buf(),
            line,
            column,
            message: message.into(),
        }
    }

    fn syntax_error(&self, root: Node) -> SequencerError {
        match first_error(root) {
            Some(node) if node.is_missing() => {
                self.unparsable(node, format!("missing `{}`", node.kind()))
            }
            Some(node) => {
                let text: String = self.node_text(node).chars().take(40).collect();
                self.unparsable(node, format!("unexpected `{}`", text.trim()))
            }
            None => self.unparsable(root, "syntax error"),
        }
    }

    /// Visits the statements of a module or class body.
    fn visit_block(&mut self, node: Node, scope: Scope) -> Result<(), SequencerError> {
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "function_definition" => {
                    if let Some(op) = self.visit_function(child, scope)? {
                        self.operations.push(op);
                    }
                }
                "class_definition" => self.visit_class(child)?,
                "decorated_definition" => {
                    // Decorated functions are internal; decorated classes still
                    // contribute their undecorated methods.
                    if let Some(definition) = child.child_by_field_name("definition") {
                        if definition.kind() == "class_definition" {
                            self.visit_class(definition)?;
                        }
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn visit_class(&mut self, node: Node) -> Result<(), SequencerError> {
        if let Some(body) = node.child_by_field_name("body") {
            self.visit_block(body, Scope::Class)?;
        }
        Ok(())
    }

    fn visit_function(&self, node: Node, scope: Scope) -> Result<Option<OperationSignature>, SequencerError> {
        let name = match node.child_by_field_name("name") {
            Some(n) => self.node_text(n).to_string(),
            None => return Ok(None),
        };
        if name.starts_with('_') || is_async(node) {
            return Ok(None);
        }

        let mut names = Vec::new();
        let mut defaults = Vec::new();
        if let Some(params) = node.child_by_field_name("parameters") {
            self.collect_positional(params, &mut names, &mut defaults)?;
        }

        let mut parameters: Vec<Parameter> = names
            .into_iter()
            .map(|name| Parameter { name, default: None })
            .collect();

        // Defaults bind to the tail of the positional list.
        let offset = parameters.len() - defaults.len();
        for (i, default) in defaults.iter().enumerate() {
            parameters[offset + i].default = default.render();
        }

        if scope == Scope::Class && !parameters.is_empty() {
            parameters.remove(0);
        }

        Ok(Some(OperationSignature { name, parameters }))
    }

    /// Collects positional parameters and their defaults. Stops at `*`,
    /// `*args` or `**kwargs`: keyword-only parameters are not positional.
    fn collect_positional(
        &self,
        params: Node,
        names: &mut Vec<String>,
        defaults: &mut Vec<DefaultValue>,
    ) -> Result<(), SequencerError> {
        let mut cursor = params.walk();
        for param in params.named_children(&mut cursor) {
            let (name, value) = match param.kind() {
                "identifier" => (self.node_text(param).to_string(), None),
                "typed_parameter" => match param.named_child(0) {
                    Some(inner) if inner.kind() == "identifier" => {
                        (self.node_text(inner).to_string(), None)
                    }
                    _ => break,
                },
                "default_parameter" | "typed_default_parameter" => {
                    let name = param
                        .child_by_field_name("name")
                        .map(|n| self.node_text(n).to_string())
                        .unwrap_or_default();
                    (name, param.child_by_field_name("value"))
                }
                "list_splat_pattern" | "dictionary_splat_pattern" | "keyword_separator" => break,
                _ => continue,
            };

            match value {
                Some(value) => defaults.push(self.default_value(value)),
                None if !defaults.is_empty() => {
                    return Err(self.unparsable(
                        param,
                        format!("parameter '{}' without a default follows a parameter with a default", name),
                    ));
                }
                None => {}
            }
            names.push(name);
        }
        Ok(())
    }

    fn default_value(&self, node: Node) -> DefaultValue {
        match node.kind() {
            "parenthesized_expression" => match node.named_child(0) {
                Some(inner) if node.named_child_count() == 1 => self.default_value(inner),
                _ => DefaultValue::Unsupported,
            },
            "list" => {
                let mut cursor = node.walk();
                let items = node
                    .named_children(&mut cursor)
                    .filter_map(|item| self.literal(item))
                    .collect();
                DefaultValue::List(items)
            }
            "dictionary" => {
                let mut cursor = node.walk();
                let pairs = node
                    .named_children(&mut cursor)
                    .filter(|child| child.kind() == "pair")
                    .filter_map(|pair| {
                        let key = self.literal(pair.child_by_field_name("key")?)?;
                        let value = self.literal(pair.child_by_field_name("value")?)?;
                        Some((key, value))
                    })
                    .collect();
                DefaultValue::Dict(pairs)
            }
            _ => self
                .literal(node)
                .map(DefaultValue::Scalar)
                .unwrap_or(DefaultValue::Unsupported),
        }
    }

    fn literal(&self, node: Node) -> Option<Literal> {
        match node.kind() {
            "string" => parse_string_literal(self.node_text(node)),
            "concatenated_string" => {
                let mut cursor = node.walk();
                let mut text = String::new();
                for part in node.named_children(&mut cursor) {
                    match self.literal(part)? {
                        Literal::Str(s) => text.push_str(&s),
                        _ => return None,
                    }
                }
                Some(Literal::Str(text))
            }
            "integer" | "float" => Some(Literal::Number(self.node_text(node).to_string())),
            "true" => Some(Literal::Bool(true)),
            "false" => Some(Literal::Bool(false)),
            "none" => Some(Literal::None),
            "ellipsis" => Some(Literal::Ellipsis),
            "unary_operator" => {
                let operator = node.child_by_field_name("operator")?;
                let argument = node.child_by_field_name("argument")?;
                if self.node_text(operator) != "-" {
                    return None;
                }
                match self.literal(argument)? {
                    Literal::Number(text) if !text.starts_with('-') => {
                        Some(Literal::Number(format!("-{}", text)))
                    }
                    _ => None,
                }
            }
            "parenthesized_expression" if node.named_child_count() == 1 => {
                self.literal(node.named_child(0)?)
            }
            _ => None,
        }
    }
}

fn is_async(node: Node) -> bool {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).any(|child| child.kind() == "async");
    found
}

fn first_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .filter(|child| child.has_error() || child.is_missing())
        .find_map(first_error)
}

/// Parses a Python string literal. Returns `None` for f-strings.
fn parse_string_literal(text: &str) -> Option<Literal> {
    let quote_start = text.find(['\'', '"'])?;
    let prefix = text[..quote_start].to_ascii_lowercase();
    if prefix.contains('f') || prefix.contains('t') {
        return None;
    }

    let rest = &text[quote_start..];
    let delimiter = if rest.starts_with("\"\"\"") {
        "\"\"\""
    } else if rest.starts_with("'''") {
        "'''"
    } else {
        &rest[..1]
    };
    let inner = rest.strip_prefix(delimiter)?.strip_suffix(delimiter)?;

    if prefix.contains('b') {
        return Some(Literal::Bytes(inner.to_string()));
    }
    if prefix.contains('r') {
        return Some(Literal::Str(inner.to_string()));
    }
    Some(Literal::Str(unescape(inner)))
}

fn unescape(inner: &str) -> String {
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('\n') => {}
            Some('\\') => out.push('\\'),
            Some('\'') => out.push('\''),
            Some('"') => out.push('"'),
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('a') => out.push('\x07'),
            Some('b') => out.push('\x08'),
            Some('f') => out.push('\x0c'),
            Some('v') => out.push('\x0b'),
            Some(d @ '0'..='7') => {
                let mut value = d.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match chars.peek().and_then(|c| c.to_digit(8)) {
                        Some(digit) => {
                            value = value * 8 + digit;
                            chars.next();
                        }
                        None => break,
                    }
                }
                out.extend(char::from_u32(value));
            }
            Some(kind @ ('x' | 'u' | 'U')) => {
                let width = match kind {
                    'x' => 2,
                    'u' => 4,
                    _ => 8,
                };
                let digits: String = chars.clone().take(width).collect();
                match u32::from_str_radix(&digits, 16).ok().and_then(char::from_u32) {
                    Some(ch) if digits.len() == width => {
                        out.push(ch);
                        for _ in 0..width {
                            chars.next();
                        }
                    }
                    _ => {
                        out.push('\\');
                        out.push(kind);
                    }
                }
            }
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Result<Vec<OperationSignature>, SequencerError> {
        let mut parser = PythonParser::new().unwrap();
        parser.parse(source, Path::new("client.py")).map(|m| m.operations)
    }

    fn defaults(op: &OperationSignature) -> Vec<(&str, &str)> {
        op.parameters
            .iter()
            .map(|p| (p.name.as_str(), p.default_text()))
            .collect()
    }

    #[test]
    fn test_default_recovery() {
        let ops = parse(
            r#"
class Client:
    def measure(self, pin_name="Pin1", level=6.0):
        pass
"#,
        )
        .unwrap();

        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].name, "measure");
        assert_eq!(defaults(&ops[0]), vec![("pin_name", "Pin1"), ("level", "6.0")]);
    }

    #[test]
    fn test_typed_parameters() {
        let ops = parse(
            r#"
class Client:
    def measure(
        self,
        pin_names: typing.Iterable[str] = ["Pin1"],
        voltage_level: float = 6.0,
        config: dict = {"mode": "fast", 1: True},
    ) -> Outputs:
        pass

    def register_pin_map(self, pin_map_path: pathlib.Path) -> None:
        pass
"#,
        )
        .unwrap();

        assert_eq!(
            defaults(&ops[0]),
            vec![
                ("pin_names", "['Pin1']"),
                ("voltage_level", "6.0"),
                ("config", "{'mode': 'fast', 1: True}"),
            ]
        );
        assert_eq!(ops[1].name, "register_pin_map");
        assert_eq!(defaults(&ops[1]), vec![("pin_map_path", "")]);
    }

    #[test]
    fn test_trailing_defaults_bind_to_tail() {
        let ops = parse("class C:\n    def f(self, a, b, c=1, d=None):\n        pass\n").unwrap();
        assert_eq!(defaults(&ops[0]), vec![("a", ""), ("b", ""), ("c", "1"), ("d", "None")]);
    }

    #[test]
    fn test_private_and_decorated_are_skipped() {
        let ops = parse(
            r#"
class Client:
    def __init__(self, x=1):
        pass

    @property
    def pin_map_context(self):
        return None

    def _get_stub(self):
        pass

    def cancel(self) -> bool:
        return False
"#,
        )
        .unwrap();

        let names: Vec<_> = ops.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["cancel"]);
        assert!(ops[0].parameters.is_empty());
    }

    #[test]
    fn test_module_functions_keep_first_parameter() {
        let ops = parse("def helper(path, retries=3):\n    pass\n").unwrap();
        assert_eq!(defaults(&ops[0]), vec![("path", ""), ("retries", "3")]);
    }

    #[test]
    fn test_nested_functions_are_not_surface() {
        let ops = parse("def outer():\n    def inner(x=1):\n        pass\n    return inner\n").unwrap();
        let names: Vec<_> = ops.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["outer"]);
    }

    #[test]
    fn test_keyword_only_parameters_are_ignored() {
        let ops = parse("class C:\n    def f(self, a=1, *, b=2, **kwargs):\n        pass\n").unwrap();
        assert_eq!(defaults(&ops[0]), vec![("a", "1")]);
    }

    #[test]
    fn test_unsupported_defaults_are_empty() {
        let ops = parse(
            "class C:\n    def f(self, a=os.getcwd(), b=(1, 2), c=f\"x{y}\", d=-1.5, e=[1, x, 'y']):\n        pass\n",
        )
        .unwrap();
        assert_eq!(
            defaults(&ops[0]),
            vec![("a", ""), ("b", ""), ("c", ""), ("d", "-1.5"), ("e", "[1, 'y']")]
        );
    }

    #[test]
    fn test_string_forms() {
        let ops = parse(
            "def f(a='it\\'s', b=r'C:\\path', c=\"x\" \"y\", d=b'raw', e='''tri'''):\n    pass\n",
        )
        .unwrap();
        assert_eq!(
            defaults(&ops[0]),
            vec![("a", "it's"), ("b", "C:\\path"), ("c", "xy"), ("d", "b'raw'"), ("e", "tri")]
        );
    }

    #[test]
    fn test_async_functions_are_skipped() {
        let ops = parse("async def fetch(x=1):\n    pass\n\ndef sync(x=1):\n    pass\n").unwrap();
        let names: Vec<_> = ops.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["sync"]);
    }

    #[test]
    fn test_syntax_error_is_unparsable() {
        let err = parse("class C:\n    def f(self, a=1:\n        pass\n").unwrap_err();
        assert!(matches!(err, SequencerError::UnparsableSource { .. }));
    }

    #[test]
    fn test_non_trailing_default_is_unparsable() {
        let err = parse("def f(a=1, b):\n    pass\n").unwrap_err();
        match err {
            SequencerError::UnparsableSource { line, .. } => assert_eq!(line, 1),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape(r"a\nb"), "a\nb");
        assert_eq!(unescape(r"\x41\101\u00e9"), "AAé");
        assert_eq!(unescape(r"\d"), "\\d");
    }
}
