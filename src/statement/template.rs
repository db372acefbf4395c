//! Statement template text grammar.
//!
//! ```text
//! {KEYWORD}            abstract keyword, variant 0
//! {KEYWORD#n}          variant n of a keyword
//! <token_type>         construct with default parameters
//! <token_type:k=v,..>  construct with parameters (columns, type, bound)
//! ```
//!
//! Everything else is a separator copied verbatim into every rendering.
//! Output files hold one statement per line, so a line break in the template
//! text (and any spaces around it) collapses to a single space.

use crate::error::{GenError, Result};
use crate::keywords::KeywordCatalog;
use crate::token::{ConstructRegistry, TokenInfo, TokenParams, TokenType};
use once_cell::sync::Lazy;
use regex::Regex;

static PLACEHOLDER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{([A-Z][A-Z0-9_]*)(?:#(\d+))?\}|<([a-z][a-z_]*)(?::([^>]*))?>")
        .unwrap()
});

static LINE_BREAK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]*[\r\n]+[ \t]*").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Keyword { name: String, variant: usize },
    Construct(TokenInfo),
}

/// A parsed, named statement template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    name: String,
    segments: Vec<Segment>,
    weight: u32,
}

impl Template {
    pub fn parse(name: impl Into<String>, text: &str) -> Result<Self> {
        let name = name.into();
        let text = LINE_BREAK_RE.replace_all(text.trim(), " ");
        let text = text.as_ref();
        let mut segments = Vec::new();
        let mut last = 0;

        for caps in PLACEHOLDER_RE.captures_iter(text) {
            let Some(whole) = caps.get(0) else { continue };
            if whole.start() > last {
                segments.push(Segment::Text(text[last..whole.start()].to_string()));
            }
            last = whole.end();

            if let Some(keyword) = caps.get(1) {
                let variant = match caps.get(2) {
                    Some(n) => n.as_str().parse().map_err(|_| {
                        GenError::InvalidArgument(format!(
                            "template `{name}`: bad variant index in `{}`",
                            whole.as_str()
                        ))
                    })?,
                    None => 0,
                };
                segments.push(Segment::Keyword {
                    name: keyword.as_str().to_string(),
                    variant,
                });
            } else if let Some(token) = caps.get(3) {
                let token_type: TokenType = token.as_str().parse()?;
                let params = match caps.get(4) {
                    Some(p) => TokenParams::parse(p.as_str())?,
                    None => TokenParams::default(),
                };
                segments.push(Segment::Construct(TokenInfo::with_params(token_type, params)));
            }
        }
        if last < text.len() {
            segments.push(Segment::Text(text[last..].to_string()));
        }

        if !segments.iter().any(|s| !matches!(s, Segment::Text(_))) {
            return Err(GenError::InvalidArgument(format!(
                "template `{name}` has no keywords or constructs"
            )));
        }

        Ok(Self {
            name,
            segments,
            weight: 1,
        })
    }

    pub fn with_weight(mut self, weight: u32) -> Self {
        self.weight = weight;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn weight(&self) -> u32 {
        self.weight
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Keyword { name, .. } => Some(name.as_str()),
            _ => None,
        })
    }

    pub fn constructs(&self) -> impl Iterator<Item = &TokenInfo> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Construct(info) => Some(info),
            _ => None,
        })
    }

    /// True when every keyword the template names is enabled.
    pub fn is_enabled(&self, catalog: &dyn KeywordCatalog) -> bool {
        self.keywords().all(|k| catalog.is_enabled(k))
    }

    /// [`is_enabled`](Self::is_enabled), plus every construct has a
    /// renderer whose own keywords are enabled.
    pub fn is_available(&self, catalog: &dyn KeywordCatalog, registry: &ConstructRegistry) -> bool {
        self.is_enabled(catalog)
            && self.constructs().all(|info| {
                registry
                    .get(info.token_type)
                    .is_ok_and(|c| c.is_available(catalog))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sql_datagen::DataType;

    #[test]
    fn test_parse_segments() {
        let t = Template::parse("t", "{DQL_SELECT#1} <select_exp:columns=0> FROM <from_item>;")
            .unwrap();
        assert_eq!(
            t.segments(),
            &[
                Segment::Keyword {
                    name: "DQL_SELECT".to_string(),
                    variant: 1
                },
                Segment::Text(" ".to_string()),
                Segment::Construct(TokenInfo::with_params(
                    TokenType::SelectExp,
                    TokenParams {
                        columns: Some(0),
                        ..Default::default()
                    }
                )),
                Segment::Text(" FROM ".to_string()),
                Segment::Construct(TokenInfo::new(TokenType::FromItem)),
                Segment::Text(";".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_type_param() {
        let t = Template::parse("t", "{DQL_GROUP_BY} <group_exp:type=date>").unwrap();
        let info = t.constructs().next().unwrap();
        assert_eq!(info.params.data_type, Some(DataType::Date));
    }

    #[test]
    fn test_parse_rejects_unknown_construct() {
        assert!(matches!(
            Template::parse("t", "{DQL_SELECT} <pivot_exp>"),
            Err(GenError::UnsupportedConstruct(_))
        ));
        assert!(matches!(
            Template::parse("t", "just text"),
            Err(GenError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_parse_collapses_line_breaks() {
        let t = Template::parse("t", "{DQL_SELECT} <select_exp>\r\n   {DQL_FROM}\n<from_item>\n")
            .unwrap();
        let texts: Vec<&str> = t
            .segments()
            .iter()
            .filter_map(|s| match s {
                Segment::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(texts, vec![" ", " ", " "]);
    }
}
