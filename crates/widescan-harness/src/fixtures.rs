//! Fixture loading and management.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Expected value of one assigning conversion, rendered for comparison.
///
/// Narrow char/string conversions render as `Str` (the engine's UTF-8
/// convention makes them valid strings); wide ones as `Wide`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum ExpectedValue {
    Signed(i64),
    Unsigned(u64),
    Float(f64),
    Str(String),
    Wide(Vec<u32>),
    Count(usize),
}

/// A single fixture test case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureCase {
    /// Case identifier.
    pub name: String,
    /// Scan input; chars map one-to-one to wide chars.
    pub input: String,
    /// Scan format.
    pub format: String,
    /// POSIX/C spec section reference.
    pub spec_section: String,
    /// Expected return value (assigned count or EOF).
    pub expected_ret: i32,
    /// Expected assigned values, in directive order.
    pub expected_values: Vec<ExpectedValue>,
}

/// A collection of fixture cases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureSet {
    /// Schema version.
    pub version: String,
    /// Case family name.
    pub family: String,
    /// Individual test cases.
    pub cases: Vec<FixtureCase>,
}

impl FixtureSet {
    /// Load fixture set from JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize fixture set to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load fixture set from a file path.
    pub fn from_file(path: &std::path::Path) -> Result<Self, crate::HarnessError> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&content)?)
    }
}

/// SHA-256 digest of fixture bytes, lowercase hex. Used by the artifact
/// index to pin verification runs to exact fixture content.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let digest = hasher.finalize();
    let mut out = String::with_capacity(64);
    for b in digest {
        out.push_str(&format!("{b:02x}"));
    }
    out
}

/// The built-in conformance corpus the `capture` command writes out.
///
/// One case per behavior family; the expectation values were derived by
/// hand from the POSIX fwscanf rules.
pub fn builtin_corpus() -> FixtureSet {
    use ExpectedValue as V;
    let case = |name: &str,
                input: &str,
                format: &str,
                spec_section: &str,
                expected_ret: i32,
                expected_values: Vec<ExpectedValue>| FixtureCase {
        name: name.into(),
        input: input.into(),
        format: format.into(),
        spec_section: spec_section.into(),
        expected_ret,
        expected_values,
    };

    FixtureSet {
        version: "1".into(),
        family: "wscanf".into(),
        cases: vec![
            case(
                "two_ints",
                "42 7",
                "%d %d",
                "C11 7.29.2.12",
                2,
                vec![V::Signed(42), V::Signed(7)],
            ),
            case("no_conversions", "plain", "plain", "C11 7.29.2.12", 0, vec![]),
            case("empty_input_eof", "", "%d", "C11 7.29.2.2p16", -1, vec![]),
            case(
                "matching_failure_partial",
                "8 x",
                "%d %d",
                "C11 7.29.2.2p16",
                1,
                vec![V::Signed(8)],
            ),
            case(
                "auto_base",
                "0x1f 017 19",
                "%i %i %i",
                "C11 7.29.2.2p12",
                3,
                vec![V::Signed(31), V::Signed(15), V::Signed(19)],
            ),
            case(
                "unsigned_bases",
                "17 ff 19",
                "%o %x %u",
                "C11 7.29.2.2p12",
                3,
                vec![V::Unsigned(15), V::Unsigned(255), V::Unsigned(19)],
            ),
            case(
                "width_splits_field",
                "1234",
                "%2d%2d",
                "C11 7.29.2.2p11",
                2,
                vec![V::Signed(12), V::Signed(34)],
            ),
            case(
                "float_family",
                "2.5 -1e3 0x1p4",
                "%f %e %g",
                "C11 7.29.2.2p12",
                3,
                vec![V::Float(2.5), V::Float(-1000.0), V::Float(16.0)],
            ),
            case(
                "legacy_long_double",
                "3.25",
                "%Lf",
                "legacy long-double convention",
                1,
                vec![V::Float(3.25)],
            ),
            case(
                "string_and_width",
                "  alphabet",
                "%5s",
                "C11 7.29.2.2p12",
                1,
                vec![V::Str("alpha".into())],
            ),
            case(
                "wide_string",
                "wide rest",
                "%ls",
                "C11 7.29.2.2p12",
                1,
                vec![V::Wide("wide".chars().map(|c| c as u32).collect())],
            ),
            case(
                "char_no_skip",
                " x",
                "%c",
                "C11 7.29.2.2p8",
                1,
                vec![V::Str(" ".into())],
            ),
            case(
                "scanset_negated",
                "a,b;rest",
                "%[^;];%s",
                "C11 7.29.2.2p12",
                2,
                vec![V::Str("a,b".into()), V::Str("rest".into())],
            ),
            case(
                "suppression",
                "skip 9",
                "%*s %d",
                "C11 7.29.2.2p9",
                1,
                vec![V::Signed(9)],
            ),
            case(
                "count_directive",
                "ab 12",
                "%s %d%n",
                "C11 7.29.2.2p12",
                2,
                vec![V::Str("ab".into()), V::Signed(12), V::Count(5)],
            ),
            case(
                "percent_escape",
                "50% off",
                "%d%% %s",
                "C11 7.29.2.2p12",
                2,
                vec![V::Signed(50), V::Str("off".into())],
            ),
            case(
                "overflow_clamps",
                "99999999999999999999",
                "%lld",
                "C11 7.29.2.2p12",
                1,
                vec![V::Signed(i64::MAX)],
            ),
        ],
    }
}
