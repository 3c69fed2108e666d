//! Route templates with positional placeholders.
//!
//! WeCom routes carry their parameters in the query string, e.g.
//! `/user/get?access_token=%s&userid=%s`. A template is parsed once and its
//! placeholder count is checked against the supplied values when a `Route`
//! or `TokenRoute` is constructed, so rendering itself cannot fail.
//!
//! Recognized sequences: `%s`, `%d` and `%v` are placeholders, `%%` is a
//! literal percent sign. Values are inserted verbatim.

use std::fmt;
use std::str::FromStr;

use crate::error::ApiError;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    Literal(String),
    Slot,
}

/// A parsed route template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTemplate {
    source: String,
    pieces: Vec<Piece>,
}

impl RouteTemplate {
    pub fn parse(template: &str) -> Result<Self, ApiError> {
        let mut pieces = Vec::new();
        let mut literal = String::new();
        let mut chars = template.chars();

        while let Some(c) = chars.next() {
            if c != '%' {
                literal.push(c);
                continue;
            }
            match chars.next() {
                Some('%') => literal.push('%'),
                Some('s' | 'd' | 'v') => {
                    if !literal.is_empty() {
                        pieces.push(Piece::Literal(std::mem::take(&mut literal)));
                    }
                    pieces.push(Piece::Slot);
                }
                Some(other) => {
                    return Err(ApiError::InvalidRoute(format!(
                        "unsupported verb %{other} in {template:?}"
                    )))
                }
                None => {
                    return Err(ApiError::InvalidRoute(format!(
                        "dangling % at end of {template:?}"
                    )))
                }
            }
        }
        if !literal.is_empty() {
            pieces.push(Piece::Literal(literal));
        }

        Ok(Self {
            source: template.to_string(),
            pieces,
        })
    }

    /// Number of placeholders in the template.
    pub fn placeholders(&self) -> usize {
        self.pieces.iter().filter(|p| matches!(p, Piece::Slot)).count()
    }

    // Callers guarantee `values` yields exactly `placeholders()` items.
    fn render<'a>(&self, mut values: impl Iterator<Item = &'a str>) -> String {
        let mut out = String::with_capacity(self.source.len());
        for piece in &self.pieces {
            match piece {
                Piece::Literal(s) => out.push_str(s),
                Piece::Slot => out.push_str(values.next().unwrap_or_default()),
            }
        }
        out
    }

    fn check_arity(&self, expected: usize) -> Result<(), ApiError> {
        let found = self.placeholders();
        if found == expected {
            return Ok(());
        }
        Err(ApiError::InvalidRoute(format!(
            "{:?} has {found} placeholder(s) but {expected} value(s) were given",
            self.source
        )))
    }
}

impl FromStr for RouteTemplate {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for RouteTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// A route whose placeholders are all bound to caller-supplied values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    template: RouteTemplate,
    values: Vec<String>,
}

impl Route {
    pub fn new<I, V>(template: &str, values: I) -> Result<Self, ApiError>
    where
        I: IntoIterator<Item = V>,
        V: fmt::Display,
    {
        let template = RouteTemplate::parse(template)?;
        let values: Vec<String> = values.into_iter().map(|v| v.to_string()).collect();
        template.check_arity(values.len())?;
        Ok(Self { template, values })
    }

    /// Route without placeholders.
    pub fn fixed(template: &str) -> Result<Self, ApiError> {
        Self::new(template, std::iter::empty::<&str>())
    }

    pub fn path(&self) -> String {
        self.template.render(self.values.iter().map(String::as_str))
    }
}

/// A route whose first placeholder is reserved for the access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRoute {
    template: RouteTemplate,
    values: Vec<String>,
}

impl TokenRoute {
    /// `values` bind the placeholders after the token, in order.
    pub fn new<I, V>(template: &str, values: I) -> Result<Self, ApiError>
    where
        I: IntoIterator<Item = V>,
        V: fmt::Display,
    {
        let template = RouteTemplate::parse(template)?;
        let values: Vec<String> = values.into_iter().map(|v| v.to_string()).collect();
        template.check_arity(values.len() + 1)?;
        Ok(Self { template, values })
    }

    /// Route whose only placeholder is the token.
    pub fn token_only(template: &str) -> Result<Self, ApiError> {
        Self::new(template, std::iter::empty::<&str>())
    }

    pub fn path(&self, token: &str) -> String {
        let values = std::iter::once(token).chain(self.values.iter().map(String::as_str));
        self.template.render(values)
    }
}
