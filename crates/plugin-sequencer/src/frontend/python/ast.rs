//! Callable surface recovered from a generated Python client.

/// A public callable and its positional parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationSignature {
    pub name: String,
    /// Declaration order, receiver excluded.
    pub parameters: Vec<Parameter>,
}

impl OperationSignature {
    /// Name-based heuristic for pin map registration calls.
    pub fn is_pin_map(&self) -> bool {
        self.name.to_ascii_lowercase().contains("pin")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    /// Default rendered the way Python's `str()` prints it. `None` when the
    /// parameter has no default or the default is not a plain literal.
    pub default: Option<String>,
}

impl Parameter {
    /// The default, or `""` when there is none.
    pub fn default_text(&self) -> &str {
        self.default.as_deref().unwrap_or("")
    }
}

/// A constant expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Str(String),
    /// Source text between the quotes.
    Bytes(String),
    /// Source text, sign included.
    Number(String),
    Bool(bool),
    None,
    Ellipsis,
}

impl Literal {
    /// `str(value)`
    pub fn to_display(&self) -> String {
        match self {
            Literal::Str(s) => s.clone(),
            _ => self.to_repr(),
        }
    }

    /// `repr(value)`
    pub fn to_repr(&self) -> String {
        match self {
            Literal::Str(s) => repr_str(s),
            Literal::Bytes(raw) => format!("b'{}'", raw),
            Literal::Number(text) => text.clone(),
            Literal::Bool(true) => "True".to_string(),
            Literal::Bool(false) => "False".to_string(),
            Literal::None => "None".to_string(),
            Literal::Ellipsis => "Ellipsis".to_string(),
        }
    }
}

/// A parameter default, classified by how much of it can be recovered.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultValue {
    Scalar(Literal),
    /// Constant elements only; other elements are dropped.
    List(Vec<Literal>),
    /// Constant key/value pairs only.
    Dict(Vec<(Literal, Literal)>),
    Unsupported,
}

impl DefaultValue {
    pub fn render(&self) -> Option<String> {
        match self {
            DefaultValue::Scalar(literal) => Some(literal.to_display()),
            DefaultValue::List(items) => {
                let items: Vec<String> = items.iter().map(Literal::to_repr).collect();
                Some(format!("[{}]", items.join(", ")))
            }
            DefaultValue::Dict(pairs) => {
                // Later duplicates overwrite earlier values in place, like a dict literal.
                let mut entries: Vec<(String, String)> = Vec::new();
                for (key, value) in pairs {
                    let key = key.to_repr();
                    let value = value.to_repr();
                    match entries.iter_mut().find(|(k, _)| *k == key) {
                        Some(entry) => entry.1 = value,
                        None => entries.push((key, value)),
                    }
                }
                let entries: Vec<String> = entries
                    .into_iter()
                    .map(|(k, v)| format!("{}: {}", k, v))
                    .collect();
                Some(format!("{{{}}}", entries.join(", ")))
            }
            DefaultValue::Unsupported => None,
        }
    }
}

fn repr_str(s: &str) -> String {
    let quote = if s.contains('\'') && !s.contains('"') { '"' } else { '\'' };
    let mut out = String::with_capacity(s.len() + 2);
    out.push(quote);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if (c as u32) < 0x20 || c as u32 == 0x7f => {
                out.push_str(&format!("\\x{:02x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}
