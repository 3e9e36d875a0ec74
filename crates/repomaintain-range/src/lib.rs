//! Evaluation of npm-style version requirement strings.
//!
//! Requirement strings come from `package.json` files and registry responses
//! and are untrusted free text. Evaluation therefore never fails: anything
//! that cannot be parsed is tagged [`RangeMatch::Unparsable`], which every
//! caller treats as satisfied. The tag is kept distinct from
//! [`RangeMatch::Satisfied`] so callers can log a warning and tests can tell
//! the two apart.
//!
//! npm range semantics (caret, tilde, `||`) differ from cargo's defaults,
//! which is why this module exists instead of `semver::VersionReq`.

use repomaintain_core::BumpType;
use semver::Version;

/// Outcome of evaluating a version against a requirement string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeMatch {
    Satisfied,
    Unsatisfied,
    /// The requirement could not be parsed; treated as satisfied (fail-open).
    Unparsable,
}

impl RangeMatch {
    /// Whether the requirement is considered fulfilled under the fail-open
    /// policy.
    #[must_use]
    pub fn is_satisfied(self) -> bool {
        !matches!(self, Self::Unsatisfied)
    }
}

/// Evaluate `version` against an npm requirement string.
///
/// `||`-joined alternatives are split first; whitespace-joined terms inside
/// each alternative must all hold. The empty requirement and `*` accept any
/// version.
#[must_use]
pub fn evaluate(version: &Version, requirement: &str) -> RangeMatch {
    let requirement = requirement.trim();
    if requirement.is_empty() {
        return RangeMatch::Satisfied;
    }

    let mut saw_unparsable = false;
    for alternative in requirement.split("||") {
        match evaluate_conjunction(version, alternative) {
            RangeMatch::Satisfied => return RangeMatch::Satisfied,
            RangeMatch::Unparsable => saw_unparsable = true,
            RangeMatch::Unsatisfied => {}
        }
    }

    if saw_unparsable {
        RangeMatch::Unparsable
    } else {
        RangeMatch::Unsatisfied
    }
}

/// Shorthand for `evaluate(..).is_satisfied()`.
#[must_use]
pub fn satisfies(version: &Version, requirement: &str) -> bool {
    evaluate(version, requirement).is_satisfied()
}

fn evaluate_conjunction(version: &Version, terms: &str) -> RangeMatch {
    let mut outcome = RangeMatch::Satisfied;
    for term in terms.split_whitespace() {
        match evaluate_term(version, term) {
            RangeMatch::Satisfied => {}
            // An unparsable term makes the whole conjunction unparsable,
            // even when another term already failed.
            RangeMatch::Unparsable => return RangeMatch::Unparsable,
            RangeMatch::Unsatisfied => outcome = RangeMatch::Unsatisfied,
        }
    }
    if terms.split_whitespace().next().is_none() {
        return RangeMatch::Unparsable;
    }
    outcome
}

fn evaluate_term(version: &Version, term: &str) -> RangeMatch {
    if term == "*" {
        return RangeMatch::Satisfied;
    }

    let (operator, remainder) = split_operator(term);
    let Some(anchor) = extract_anchor(remainder) else {
        return RangeMatch::Unparsable;
    };

    let holds = match operator {
        Operator::Caret => {
            // ^X.Y.Z := >=X.Y.Z <(X+1).0.0
            *version >= anchor && *version < Version::new(anchor.major + 1, 0, 0)
        }
        Operator::Tilde => {
            // ~X.Y.Z := >=X.Y.Z <X.(Y+1).0
            *version >= anchor && *version < Version::new(anchor.major, anchor.minor + 1, 0)
        }
        Operator::GreaterEq => *version >= anchor,
        Operator::LessEq => *version <= anchor,
        Operator::Greater => *version > anchor,
        Operator::Less => *version < anchor,
        Operator::Exact => *version == anchor,
    };

    if holds {
        RangeMatch::Satisfied
    } else {
        RangeMatch::Unsatisfied
    }
}

#[derive(Debug, Clone, Copy)]
enum Operator {
    Caret,
    Tilde,
    GreaterEq,
    LessEq,
    Greater,
    Less,
    Exact,
}

fn split_operator(term: &str) -> (Operator, &str) {
    if let Some(rest) = term.strip_prefix('^') {
        (Operator::Caret, rest)
    } else if let Some(rest) = term.strip_prefix('~') {
        (Operator::Tilde, rest)
    } else if let Some(rest) = term.strip_prefix(">=") {
        (Operator::GreaterEq, rest)
    } else if let Some(rest) = term.strip_prefix("<=") {
        (Operator::LessEq, rest)
    } else if let Some(rest) = term.strip_prefix('>') {
        (Operator::Greater, rest)
    } else if let Some(rest) = term.strip_prefix('<') {
        (Operator::Less, rest)
    } else if let Some(rest) = term.strip_prefix('=') {
        (Operator::Exact, rest)
    } else {
        (Operator::Exact, term)
    }
}

/// Extract the concrete anchor version from a requirement fragment.
///
/// Strips a leading run of non-digit characters, takes the first
/// dot-delimited run of digits (one to three components) and right-pads
/// missing components with zero. Returns `None` when no digit is found,
/// in which case the whole range must be treated as unparsable.
#[must_use]
pub fn extract_anchor(fragment: &str) -> Option<Version> {
    let start = fragment.find(|c: char| c.is_ascii_digit())?;
    let digits_and_dots: String = fragment[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    let mut parts = [0u64; 3];
    let mut count = 0;
    for piece in digits_and_dots.split('.') {
        if count == 3 || piece.is_empty() || !piece.chars().all(|c| c.is_ascii_digit()) {
            break;
        }
        parts[count] = piece.parse().ok()?;
        count += 1;
    }

    if count == 0 {
        return None;
    }
    Some(Version::new(parts[0], parts[1], parts[2]))
}

/// Coerce free-form user input (`"2"`, `"v1.4"`) into a strict version.
#[must_use]
pub fn coerce(input: &str) -> Option<Version> {
    extract_anchor(input.trim())
}

/// The leading prefix operator of a requirement: the run of characters
/// before the first digit or space (possibly empty, e.g. `"~"` or `">="`).
#[must_use]
pub fn range_prefix(requirement: &str) -> &str {
    let end = requirement
        .find(|c: char| c.is_ascii_digit() || c == ' ')
        .unwrap_or(requirement.len());
    &requirement[..end]
}

/// Compute the next patch/minor/major version.
#[must_use]
pub fn bump_version(version: &Version, bump: BumpType) -> Version {
    match bump {
        BumpType::Major => Version::new(version.major + 1, 0, 0),
        BumpType::Minor => Version::new(version.major, version.minor + 1, 0),
        BumpType::Patch => Version::new(version.major, version.minor, version.patch + 1),
    }
}
