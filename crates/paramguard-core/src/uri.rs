//! # URI Template Matching
//!
//! Structural validation of URI templates and concrete request paths, and
//! segment-wise matching of one against the other.
//!
//! A template is a `/`-separated path whose segments are either literals
//! (`[a-zA-Z0-9-._~!$&'()*+,;=:@%]*`) or variables written `{name}` with
//! `name` in `[a-zA-Z0-9_]+`. Repeated, leading and trailing slashes carry
//! no meaning: both sides are split on runs of `/` before comparison, so
//! `/api//user/` and `/api/user` have the same two segments.
//!
//! ## Two variable predicates
//!
//! [`is_path_variable`] is a whole-segment check used by template
//! validation and matching. [`has_path_variable`] is a substring search
//! used only to pre-classify registry keys. They disagree on inputs such as
//! `/api/x{id}` and are deliberately kept apart.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::TemplateError;

/// Literal substituted for each `{name}` before the structural path check.
const VARIABLE_PLACEHOLDER: &str = "var";

static HAS_PATH_VARIABLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{[a-zA-Z0-9_]+\}").expect("static regex"));

static PATH_VARIABLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\{([a-zA-Z0-9_]+)\}$").expect("static regex"));

static VARIABLE_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_]+$").expect("static regex"));

static LITERAL_SEGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9\-._~!$&'()*+,;=:@%]*$").expect("static regex"));

static URI_PATH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(/[a-zA-Z0-9\-._~!$&'()*+,;=:@%{}]*)+$").expect("static regex")
});

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// Split a path on runs of `/`, dropping the empty pieces.
fn split_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Return the variable name if `segment` is exactly `{name}`.
fn variable_name(segment: &str) -> Option<&str> {
    PATH_VARIABLE
        .captures(segment)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Whether `uri` has the structure of an absolute URI path.
///
/// Purely syntactic: braces are accepted as ordinary characters, so this
/// holds for templates as well as concrete paths.
pub fn is_uri(uri: &str) -> bool {
    !is_blank(uri) && URI_PATH.is_match(uri)
}

/// Whether `segment` is a single `{name}` path variable.
pub fn is_path_variable(segment: &str) -> bool {
    !is_blank(segment) && PATH_VARIABLE.is_match(segment)
}

/// Whether `name` is usable as a path variable name.
pub fn is_valid_variable_name(name: &str) -> bool {
    !is_blank(name) && VARIABLE_NAME.is_match(name)
}

/// Whether `template` is a well-formed path once every `{name}` is
/// replaced by a placeholder literal.
pub fn is_uri_structure_valid(template: &str) -> bool {
    if is_blank(template) {
        return false;
    }
    let sanitized = HAS_PATH_VARIABLE.replace_all(template, VARIABLE_PLACEHOLDER);
    is_uri(&sanitized)
}

/// Whether `template` contains a `{name}` anywhere, not necessarily as a
/// whole segment. A fast pre-filter, not a validity check.
pub fn has_path_variable(template: &str) -> bool {
    !is_blank(template) && HAS_PATH_VARIABLE.is_match(template)
}

/// Whether `template` is a valid URI template.
pub fn is_valid_uri_template(template: &str) -> bool {
    UriTemplate::parse(template).is_ok()
}

/// Match a concrete path against a template given as a string.
///
/// Returns a non-matching result when either side is malformed.
pub fn match_uri_to_template(uri: &str, template: &str) -> MatchResult {
    match UriTemplate::parse(template) {
        Ok(parsed) => parsed.match_uri(uri),
        Err(_) => MatchResult::miss(uri, template),
    }
}

/// One segment of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Must equal the request segment byte for byte.
    Literal(String),
    /// Captures whatever the request has at this position.
    Variable(String),
}

/// A validated URI template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UriTemplate {
    raw: String,
    segments: Vec<Segment>,
}

impl UriTemplate {
    /// Validate and parse a template.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::Blank`] for empty or whitespace input,
    /// [`TemplateError::InvalidSegment`] when a segment is neither a
    /// variable nor a legal literal, and [`TemplateError::InvalidStructure`]
    /// when the substituted template is not an absolute path.
    pub fn parse(template: &str) -> Result<Self, TemplateError> {
        if is_blank(template) {
            return Err(TemplateError::Blank);
        }

        let mut segments = Vec::new();
        for piece in split_segments(template) {
            let segment = match variable_name(piece) {
                Some(name) if is_valid_variable_name(name) => Segment::Variable(name.to_string()),
                Some(_) => {
                    return Err(TemplateError::InvalidSegment {
                        template: template.to_string(),
                        segment: piece.to_string(),
                    })
                }
                None if LITERAL_SEGMENT.is_match(piece) => Segment::Literal(piece.to_string()),
                None => {
                    return Err(TemplateError::InvalidSegment {
                        template: template.to_string(),
                        segment: piece.to_string(),
                    })
                }
            };
            segments.push(segment);
        }

        if !is_uri_structure_valid(template) {
            return Err(TemplateError::InvalidStructure(template.to_string()));
        }

        Ok(Self {
            raw: template.to_string(),
            segments,
        })
    }

    /// The template exactly as configured.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Parsed segments, empty pieces excluded.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Whether any whole segment is a variable.
    pub fn has_variables(&self) -> bool {
        self.segments
            .iter()
            .any(|s| matches!(s, Segment::Variable(_)))
    }

    /// Names of the variable segments, in path order.
    pub fn variable_names(&self) -> Vec<&str> {
        self.segments
            .iter()
            .filter_map(|s| match s {
                Segment::Variable(name) => Some(name.as_str()),
                Segment::Literal(_) => None,
            })
            .collect()
    }

    /// Match a concrete request path against this template.
    ///
    /// A variable segment captures the request segment unconditionally.
    /// A literal mismatch or a segment-count mismatch yields a miss with no
    /// variables, never a partial capture.
    pub fn match_uri(&self, uri: &str) -> MatchResult {
        if !is_uri(uri) {
            return MatchResult::miss(uri, &self.raw);
        }

        let parts: Vec<&str> = split_segments(uri).collect();
        if parts.len() != self.segments.len() {
            return MatchResult::miss(uri, &self.raw);
        }

        let mut variables = BTreeMap::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Variable(name) => {
                    variables.insert(name.clone(), part.to_string());
                }
                Segment::Literal(literal) if literal == part => {}
                Segment::Literal(_) => return MatchResult::miss(uri, &self.raw),
            }
        }

        MatchResult {
            matched: true,
            uri: uri.to_string(),
            template: self.raw.clone(),
            variables,
        }
    }
}

impl FromStr for UriTemplate {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for UriTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Outcome of matching one concrete path against one template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    /// Whether the path matched.
    pub matched: bool,
    /// The concrete path that was matched.
    pub uri: String,
    /// The template it was matched against.
    pub template: String,
    /// Captured variables. Always empty when `matched` is false.
    pub variables: BTreeMap<String, String>,
}

impl MatchResult {
    fn miss(uri: &str, template: &str) -> Self {
        Self {
            matched: false,
            uri: uri.to_string(),
            template: template.to_string(),
            variables: BTreeMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn valid_template_with_two_variables() {
        assert!(is_valid_uri_template("/api/user/{userId}/order/{orderId}"));
    }

    #[test]
    fn blank_template_rejected() {
        assert!(!is_valid_uri_template(""));
        assert!(!is_valid_uri_template("   "));
        assert_eq!(UriTemplate::parse(""), Err(TemplateError::Blank));
    }

    #[test]
    fn illegal_variable_characters_rejected() {
        let err = UriTemplate::parse("/api/user/{userId}/order/{orderId!}").unwrap_err();
        assert_eq!(
            err,
            TemplateError::InvalidSegment {
                template: "/api/user/{userId}/order/{orderId!}".to_string(),
                segment: "{orderId!}".to_string(),
            }
        );
    }

    #[test]
    fn glued_variables_are_not_a_segment() {
        assert!(!is_valid_uri_template("/api/{a}{b}"));
        assert!(!is_valid_uri_template("/api/x{id}"));
    }

    #[test]
    fn relative_template_rejected_on_structure() {
        assert_eq!(
            UriTemplate::parse("api/{id}"),
            Err(TemplateError::InvalidStructure("api/{id}".to_string()))
        );
    }

    #[test]
    fn path_variable_predicate() {
        assert!(is_path_variable("{userId}"));
        assert!(!is_path_variable("userId"));
        assert!(!is_path_variable("{user-id}"));
        assert!(!is_path_variable(""));
    }

    #[test]
    fn variable_name_predicate() {
        assert!(is_valid_variable_name("userId"));
        assert!(is_valid_variable_name("user_id_2"));
        assert!(!is_valid_variable_name("user-id"));
        assert!(!is_valid_variable_name(" "));
    }

    #[test]
    fn structure_check_substitutes_variables() {
        assert!(is_uri_structure_valid("/api/user/{userId}/order/{orderId}"));
        assert!(!is_uri_structure_valid("invalid//uri"));
        assert!(!is_uri_structure_valid(""));
    }

    #[test]
    fn uri_predicate() {
        assert!(is_uri("/api/user/123"));
        assert!(is_uri("/"));
        assert!(is_uri("//api///user/"));
        assert!(!is_uri("invalid uri"));
        assert!(!is_uri("/api/user 1"));
        assert!(!is_uri("api/user"));
        assert!(!is_uri(""));
    }

    #[test]
    fn has_path_variable_is_a_substring_search() {
        assert!(has_path_variable("/api/user/{userId}/order/{orderId}"));
        assert!(has_path_variable("/api/user/{userId}/order"));
        assert!(!has_path_variable("/api/user/123/order/456"));
        assert!(!has_path_variable(""));
        // Looser than the whole-segment check.
        assert!(has_path_variable("/api/x{id}"));
        assert!(!is_path_variable("x{id}"));
    }

    #[test]
    fn match_captures_variables() {
        let result =
            match_uri_to_template("/api/user/123/order/456", "/api/user/{userId}/order/{orderId}");
        assert!(result.matched);
        assert_eq!(result.template, "/api/user/{userId}/order/{orderId}");
        assert_eq!(result.uri, "/api/user/123/order/456");
        let expected: BTreeMap<String, String> = [("userId", "123"), ("orderId", "456")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        assert_eq!(result.variables, expected);
    }

    #[test]
    fn segment_count_mismatch_misses() {
        let result = match_uri_to_template("/api/user/123", "/api/user/{userId}/order/{orderId}");
        assert!(!result.matched);
        assert!(result.variables.is_empty());
    }

    #[test]
    fn literal_mismatch_discards_captures() {
        let result =
            match_uri_to_template("/api/admin/123/order/456", "/api/user/{userId}/order/{orderId}");
        assert!(!result.matched);
        assert!(result.variables.is_empty());

        // The mismatch comes after a capture; nothing partial leaks out.
        let result = match_uri_to_template("/api/user/123/orders/456", "/api/user/{userId}/order/{orderId}");
        assert!(!result.matched);
        assert!(result.variables.is_empty());
    }

    #[test]
    fn repeated_slashes_are_collapsed() {
        let result = match_uri_to_template("//api/user//7/", "/api/user/{id}");
        assert!(result.matched);
        assert_eq!(result.variables.get("id").map(String::as_str), Some("7"));
    }

    #[test]
    fn malformed_inputs_miss() {
        assert!(!match_uri_to_template("not a path", "/api/{id}").matched);
        assert!(!match_uri_to_template("/api/1", "/api/{id!}").matched);
    }

    #[test]
    fn variable_captures_any_content() {
        let result = match_uri_to_template("/files/a%20b{c}", "/files/{name}");
        assert!(result.matched);
        assert_eq!(result.variables["name"], "a%20b{c}");
    }

    #[test]
    fn root_template_matches_root() {
        let template = UriTemplate::parse("/").unwrap();
        assert!(template.segments().is_empty());
        assert!(template.match_uri("/").matched);
        assert!(!template.match_uri("/a").matched);
    }

    #[test]
    fn template_accessors() {
        let template: UriTemplate = "/user/{userId}/call/{callId}".parse().unwrap();
        assert!(template.has_variables());
        assert_eq!(template.variable_names(), vec!["userId", "callId"]);
        assert_eq!(template.to_string(), "/user/{userId}/call/{callId}");
        assert!(!UriTemplate::parse("/user/list").unwrap().has_variables());
    }

    /// One template position: whether it is a variable, its literal text,
    /// the request text, and whether the request reuses the literal.
    fn position() -> impl Strategy<Value = (bool, String, String, bool)> {
        (any::<bool>(), "[a-z0-9]{1,6}", "[a-z0-9]{1,6}", any::<bool>())
    }

    fn build(positions: &[(bool, String, String, bool)]) -> (String, String) {
        let mut template = String::new();
        let mut uri = String::new();
        for (i, (is_var, literal, other, reuse)) in positions.iter().enumerate() {
            template.push('/');
            if *is_var {
                template.push_str(&format!("{{v{i}}}"));
            } else {
                template.push_str(literal);
            }
            uri.push('/');
            uri.push_str(if *reuse { literal } else { other });
        }
        (template, uri)
    }

    proptest! {
        /// With equal segment counts, a match happens exactly when every
        /// literal position agrees.
        #[test]
        fn match_iff_literals_agree(positions in prop::collection::vec(position(), 1..6)) {
            let (template, uri) = build(&positions);
            let expected = positions.iter().all(|(is_var, literal, other, reuse)| {
                *is_var || *reuse || literal == other
            });
            let result = match_uri_to_template(&uri, &template);
            prop_assert_eq!(result.matched, expected);
            if expected {
                let var_count = positions.iter().filter(|p| p.0).count();
                prop_assert_eq!(result.variables.len(), var_count);
            } else {
                prop_assert!(result.variables.is_empty());
            }
        }

        /// Different segment counts never match, whatever the literals.
        #[test]
        fn count_mismatch_never_matches(
            positions in prop::collection::vec(position(), 1..6),
            extra in "[a-z0-9]{1,6}",
        ) {
            let (template, uri) = build(&positions);
            let longer = format!("{uri}/{extra}");
            let result = match_uri_to_template(&longer, &template);
            prop_assert!(!result.matched);
            prop_assert!(result.variables.is_empty());
        }

        /// Validation is a pure function of its input.
        #[test]
        fn template_validation_is_stable(input in "\\PC{0,24}") {
            prop_assert_eq!(is_valid_uri_template(&input), is_valid_uri_template(&input));
        }
    }
}
