use std::collections::BTreeMap;

/// Represents ways to address a widget through the automation harness.
///
/// Two spellings are understood:
/// - symbolic names from the object map, e.g. `:Qt Creator_FilenameQComboBox`
/// - real names, a property map such as
///   `{type='QLabel' name='msgLabel' text?='<html>*' visible='1'}`
///
/// In real names `?=` marks a wildcard comparison (`*` and `?`), and a value may
/// itself be a nested real name in braces (used for `container` and `window`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ObjectName {
    /// Name resolved by the harness' object map
    Symbolic(String),
    /// Inline property map
    Real(BTreeMap<String, PropertyMatch>),
    /// Represents an unparseable name, with a reason.
    Invalid(String),
}

/// A single `key=value` (or `key?=value`) constraint of a real name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PropertyMatch {
    pub value: String,
    pub wildcard: bool,
}

impl PropertyMatch {
    pub fn exact(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            wildcard: false,
        }
    }

    pub fn wildcard(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            wildcard: true,
        }
    }

    /// Check an actual property value against this constraint.
    pub fn matches(&self, actual: &str) -> bool {
        if self.wildcard {
            wildcard_match(&self.value, actual)
        } else {
            self.value == actual
        }
    }
}

impl ObjectName {
    /// Build a real name from exact `key=value` pairs.
    pub fn real<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let props: BTreeMap<String, PropertyMatch> = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), PropertyMatch::exact(v)))
            .collect();
        if props.is_empty() {
            ObjectName::Invalid("A real name needs at least one property".to_string())
        } else {
            ObjectName::Real(props)
        }
    }

    /// Name of an item (model index, combo entry, menu entry) inside `container`.
    pub fn item(container: &ObjectName, text: &str) -> Self {
        ObjectName::real([
            ("container", container.to_string()),
            ("text", text.to_string()),
            ("type", "QModelIndex".to_string()),
        ])
    }

    /// Add or replace a constraint on a real name. Other variants are returned unchanged.
    pub fn with(mut self, key: &str, value: PropertyMatch) -> Self {
        if let ObjectName::Real(props) = &mut self {
            props.insert(key.to_string(), value);
        }
        self
    }

    /// Constraint for `key`, if this is a real name that carries one.
    pub fn property(&self, key: &str) -> Option<&PropertyMatch> {
        match self {
            ObjectName::Real(props) => props.get(key),
            _ => None,
        }
    }

    /// The nested container of a real name, parsed.
    pub fn container(&self) -> Option<ObjectName> {
        self.property("container")
            .map(|c| ObjectName::from(c.value.as_str()))
    }

    pub fn is_valid(&self) -> bool {
        !matches!(self, ObjectName::Invalid(_))
    }
}

impl std::fmt::Display for ObjectName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ObjectName::Symbolic(name) => write!(f, "{name}"),
            ObjectName::Real(props) => {
                write!(f, "{{")?;
                for (i, (key, m)) in props.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    let op = if m.wildcard { "?=" } else { "=" };
                    if m.value.starts_with('{') && m.value.ends_with('}') {
                        write!(f, "{key}{op}{}", m.value)?;
                    } else {
                        write!(f, "{key}{op}'{}'", escape(&m.value))?;
                    }
                }
                write!(f, "}}")
            }
            ObjectName::Invalid(reason) => write!(f, "<invalid: {reason}>"),
        }
    }
}

impl From<&str> for ObjectName {
    fn from(s: &str) -> Self {
        let s = s.trim();
        if s.starts_with(':') {
            return ObjectName::Symbolic(s.to_string());
        }
        if s.starts_with('{') {
            return match parse_real_name(s) {
                Ok(props) => ObjectName::Real(props),
                Err(reason) => ObjectName::Invalid(reason),
            };
        }
        ObjectName::Invalid(format!(
            "Unknown object name format: \"{s}\". Use ':Symbolic_Name' or {{key='value' ...}}."
        ))
    }
}

impl From<String> for ObjectName {
    fn from(s: String) -> Self {
        ObjectName::from(s.as_str())
    }
}

impl From<&ObjectName> for ObjectName {
    fn from(name: &ObjectName) -> Self {
        name.clone()
    }
}

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

fn parse_real_name(s: &str) -> Result<BTreeMap<String, PropertyMatch>, String> {
    let chars: Vec<char> = s.chars().collect();
    let mut props = BTreeMap::new();
    let mut pos = 1; // skip '{'

    loop {
        while pos < chars.len() && chars[pos].is_whitespace() {
            pos += 1;
        }
        match chars.get(pos) {
            None => return Err("Unterminated real name, missing '}'".to_string()),
            Some('}') => {
                if pos + 1 != chars.len() {
                    return Err(format!(
                        "Unexpected trailing text after position {}",
                        pos + 1
                    ));
                }
                break;
            }
            Some(_) => {}
        }

        let key_start = pos;
        while pos < chars.len() && (chars[pos].is_alphanumeric() || chars[pos] == '_') {
            pos += 1;
        }
        if key_start == pos {
            return Err(format!("Expected a property name at position {pos}"));
        }
        let key: String = chars[key_start..pos].iter().collect();

        let wildcard = match (chars.get(pos), chars.get(pos + 1)) {
            (Some('?'), Some('=')) => {
                pos += 2;
                true
            }
            (Some('='), _) => {
                pos += 1;
                false
            }
            _ => return Err(format!("Expected '=' or '?=' after '{key}'")),
        };

        let value = match chars.get(pos) {
            Some('\'') => {
                pos += 1;
                let mut value = String::new();
                loop {
                    match chars.get(pos) {
                        None => return Err(format!("Unterminated value for '{key}'")),
                        Some('\\') => {
                            if let Some(next) = chars.get(pos + 1) {
                                value.push(*next);
                            }
                            pos += 2;
                        }
                        Some('\'') => {
                            pos += 1;
                            break;
                        }
                        Some(c) => {
                            value.push(*c);
                            pos += 1;
                        }
                    }
                }
                value
            }
            Some('{') => {
                let start = pos;
                let mut depth = 0usize;
                let mut in_quote = false;
                while pos < chars.len() {
                    match chars[pos] {
                        '\\' if in_quote => pos += 1,
                        '\'' => in_quote = !in_quote,
                        '{' if !in_quote => depth += 1,
                        '}' if !in_quote => {
                            depth -= 1;
                            if depth == 0 {
                                break;
                            }
                        }
                        _ => {}
                    }
                    pos += 1;
                }
                if depth != 0 {
                    return Err(format!("Unbalanced nested name for '{key}'"));
                }
                pos += 1;
                chars[start..pos].iter().collect()
            }
            _ => return Err(format!("Value of '{key}' must be quoted or a nested name")),
        };

        props.insert(key, PropertyMatch { value, wildcard });
    }

    if props.is_empty() {
        return Err("A real name needs at least one property".to_string());
    }
    Ok(props)
}

/// Glob-style comparison: `*` matches any run of characters, `?` exactly one.
pub fn wildcard_match(pattern: &str, text: &str) -> bool {
    let p: Vec<char> = pattern.chars().collect();
    let t: Vec<char> = text.chars().collect();
    let (mut pi, mut ti) = (0, 0);
    let mut star: Option<usize> = None;
    let mut star_t = 0;

    while ti < t.len() {
        if pi < p.len() && (p[pi] == '?' || p[pi] == t[ti]) {
            pi += 1;
            ti += 1;
        } else if pi < p.len() && p[pi] == '*' {
            star = Some(pi);
            star_t = ti;
            pi += 1;
        } else if let Some(s) = star {
            pi = s + 1;
            star_t += 1;
            ti = star_t;
        } else {
            return false;
        }
    }
    while pi < p.len() && p[pi] == '*' {
        pi += 1;
    }
    pi == p.len()
}
