//! Redis-style key patterns.
//!
//! `SCAN ... MATCH` accepts `*`, `?`, `[...]` (with `^` negation and `a-z`
//! ranges) and `\` escapes. The in-memory backend and request validation
//! both go through [`KeyPattern`], which rewrites that syntax into a
//! `glob::Pattern` so that every backend selects the same keys.
//!
//! The only deliberate difference: an unterminated or empty `[...]` is
//! rejected here, where Redis would silently match nothing useful.

use std::collections::BTreeSet;

use glob::Pattern;

use crate::error::{StoreError, StoreResult};

/// Compiled Redis-style pattern.
///
/// # Examples
///
/// ```
/// use backoffice_store::KeyPattern;
///
/// let pattern = KeyPattern::new("tok[^A]").unwrap();
/// assert!(pattern.matches("tokB"));
/// assert!(!pattern.matches("tokA"));
/// ```
#[derive(Debug, Clone)]
pub struct KeyPattern {
    source: String,
    compiled: Pattern,
}

impl KeyPattern {
    /// Parses a Redis pattern.
    ///
    /// # Errors
    ///
    /// `StoreError::InvalidPattern` for empty patterns and for unterminated
    /// or empty character classes.
    pub fn new(pattern: &str) -> StoreResult<Self> {
        let invalid = |reason: &str| StoreError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: reason.to_string(),
        };

        if pattern.is_empty() {
            return Err(invalid("pattern is empty"));
        }

        let translated = to_glob(pattern).map_err(invalid)?;
        let compiled = Pattern::new(&translated).map_err(|e| invalid(e.msg))?;

        Ok(Self {
            source: pattern.to_string(),
            compiled,
        })
    }

    pub fn matches(&self, key: &str) -> bool {
        self.compiled.matches(key)
    }

    /// The pattern as written by the caller.
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl std::fmt::Display for KeyPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}

/// Reescribe la sintaxis de Redis a la del crate `glob`.
fn to_glob(pattern: &str) -> Result<String, &'static str> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len() + 8);
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '*' => {
                // `glob` reserva `**` para componentes de path
                while i < chars.len() && chars[i] == '*' {
                    i += 1;
                }
                out.push('*');
            },
            '?' => {
                out.push('?');
                i += 1;
            },
            '\\' if i + 1 < chars.len() => {
                push_literal(&mut out, chars[i + 1]);
                i += 2;
            },
            '[' => {
                let (class, next) = CharClass::parse(&chars, i + 1)?;
                class.write_glob(&mut out)?;
                i = next;
            },
            c => {
                push_literal(&mut out, c);
                i += 1;
            },
        }
    }

    Ok(out)
}

fn push_literal(out: &mut String, c: char) {
    match c {
        '?' | '*' | '[' | ']' => {
            out.push('[');
            out.push(c);
            out.push(']');
        },
        c => out.push(c),
    }
}

/// Contenido de un `[...]` ya parseado.
#[derive(Debug, Default)]
struct CharClass {
    negated: bool,
    chars: BTreeSet<char>,
    ranges: Vec<(char, char)>,
}

impl CharClass {
    /// Parses from just after `[`. Returns the class and the index after `]`.
    fn parse(chars: &[char], mut i: usize) -> Result<(Self, usize), &'static str> {
        let mut class = Self::default();

        if chars.get(i) == Some(&'^') {
            class.negated = true;
            i += 1;
        }

        loop {
            match chars.get(i) {
                None => return Err("unterminated character class"),
                Some(']') => return Ok((class, i + 1)),
                Some('\\') if i + 1 < chars.len() => {
                    class.chars.insert(chars[i + 1]);
                    i += 2;
                },
                Some(&start) if chars.get(i + 1) == Some(&'-') && i + 2 < chars.len() => {
                    let end = chars[i + 2];
                    // Redis acepta rangos invertidos
                    let (lo, hi) = if start <= end { (start, end) } else { (end, start) };
                    class.add_range(lo, hi);
                    i += 3;
                },
                Some(&c) => {
                    class.chars.insert(c);
                    i += 1;
                },
            }
        }
    }

    /// Adds a range, peeling off endpoints that `glob` would misread as
    /// syntax (`]` closes the class, `!` negates, `-` starts a range).
    fn add_range(&mut self, mut lo: char, mut hi: char) {
        if hi == ']' {
            self.chars.insert(']');
            match char::from_u32(u32::from(']') - 1) {
                Some(prev) if lo <= prev => hi = prev,
                _ => return,
            }
        }
        for special in ['!', '-', ']'] {
            if lo == special {
                self.chars.insert(special);
                match char::from_u32(u32::from(special) + 1) {
                    Some(next) if next <= hi => lo = next,
                    _ => return,
                }
            }
        }
        if lo == hi {
            self.chars.insert(lo);
        } else {
            self.ranges.push((lo, hi));
        }
    }

    fn write_glob(&self, out: &mut String) -> Result<(), &'static str> {
        if self.chars.is_empty() && self.ranges.is_empty() {
            if self.negated {
                // `[^]` en Redis es cualquier caracter
                out.push('?');
                return Ok(());
            }
            return Err("empty character class");
        }

        // Orden: `]` primero, rangos, resto, luego `!` y `-` al final
        let mut body = String::new();
        if self.chars.contains(&']') {
            body.push(']');
        }
        for (lo, hi) in &self.ranges {
            body.push(*lo);
            body.push('-');
            body.push(*hi);
        }
        for &c in self.chars.iter() {
            if !matches!(c, ']' | '-' | '!') {
                body.push(c);
            }
        }
        if self.chars.contains(&'!') {
            body.push('!');
        }
        if self.chars.contains(&'-') {
            body.push('-');
        }

        if !self.negated && body.starts_with('!') {
            // Solo `!` (o `!-`): sin corchetes `!` es literal
            if body == "!" {
                out.push('!');
            } else {
                out.push_str("[-!]");
            }
            return Ok(());
        }

        out.push('[');
        if self.negated {
            out.push('!');
        }
        out.push_str(&body);
        out.push(']');
        Ok(())
    }
}
