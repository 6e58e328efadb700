//! Fixture execution engine.

use crate::fixtures::{ExpectedValue, FixtureCase, FixtureSet};
use widescan_core::engine::{ScanValue, scan_wide};
use widescan_core::wide::widen;

/// Outcome of replaying one fixture case.
#[derive(Debug, Clone)]
pub struct VerificationResult {
    pub case_name: String,
    pub spec_section: String,
    pub passed: bool,
    pub expected: String,
    pub actual: String,
    pub diff: Option<String>,
}

/// Runs a fixture set against the engine and collects verification results.
pub struct TestRunner {
    /// Name of the test campaign.
    pub campaign: String,
}

impl TestRunner {
    /// Create a new test runner.
    #[must_use]
    pub fn new(campaign: impl Into<String>) -> Self {
        Self {
            campaign: campaign.into(),
        }
    }

    /// Run all fixtures in a set and return results.
    pub fn run(&self, fixture_set: &FixtureSet) -> Vec<VerificationResult> {
        fixture_set.cases.iter().map(execute_case).collect()
    }
}

fn execute_case(case: &FixtureCase) -> VerificationResult {
    let report = scan_wide(&widen(&case.input), &widen(&case.format));
    let actual_ret = report.ret();
    let actual_values: Vec<ExpectedValue> = report.values.iter().map(render_value).collect();

    let ret_ok = actual_ret == case.expected_ret;
    let values_ok = actual_values.len() == case.expected_values.len()
        && actual_values
            .iter()
            .zip(case.expected_values.iter())
            .all(|(a, e)| values_match(a, e));

    let expected = render_outcome(case.expected_ret, &case.expected_values);
    let actual = render_outcome(actual_ret, &actual_values);
    let passed = ret_ok && values_ok;

    VerificationResult {
        case_name: case.name.clone(),
        spec_section: case.spec_section.clone(),
        passed,
        diff: (!passed).then(|| format!("expected {expected}, got {actual}")),
        expected,
        actual,
    }
}

/// Render an engine value in fixture terms.
fn render_value(v: &ScanValue) -> ExpectedValue {
    match v {
        ScanValue::Signed(x) => ExpectedValue::Signed(*x),
        ScanValue::Unsigned(x) => ExpectedValue::Unsigned(*x),
        ScanValue::Float(x) => ExpectedValue::Float(*x),
        ScanValue::Chars(b) | ScanValue::Str(b) => {
            ExpectedValue::Str(String::from_utf8_lossy(b).into_owned())
        }
        ScanValue::WideChars(w) | ScanValue::WideStr(w) => ExpectedValue::Wide(w.clone()),
        ScanValue::Count(n) => ExpectedValue::Count(*n),
    }
}

/// Value comparison with bitwise float equality, so fixtures can pin
/// infinities (and NaN, if a case ever wants one).
fn values_match(a: &ExpectedValue, b: &ExpectedValue) -> bool {
    match (a, b) {
        (ExpectedValue::Float(x), ExpectedValue::Float(y)) => x.to_bits() == y.to_bits(),
        _ => a == b,
    }
}

fn render_outcome(ret: i32, values: &[ExpectedValue]) -> String {
    format!("ret={ret} values={values:?}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::builtin_corpus;

    #[test]
    fn test_builtin_corpus_passes() {
        let runner = TestRunner::new("unit");
        let results = runner.run(&builtin_corpus());
        let failures: Vec<_> = results.iter().filter(|r| !r.passed).collect();
        assert!(failures.is_empty(), "failing cases: {failures:?}");
    }

    #[test]
    fn test_divergence_is_reported() {
        let mut set = builtin_corpus();
        set.cases[0].expected_ret = 99;
        let results = TestRunner::new("unit").run(&set);
        assert!(!results[0].passed);
        assert!(results[0].diff.as_deref().unwrap().contains("ret=99"));
    }

    #[test]
    fn test_float_match_is_bitwise() {
        assert!(values_match(
            &ExpectedValue::Float(f64::INFINITY),
            &ExpectedValue::Float(f64::INFINITY)
        ));
        assert!(!values_match(
            &ExpectedValue::Float(0.1),
            &ExpectedValue::Float(0.2)
        ));
    }
}
