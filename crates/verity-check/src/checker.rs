//! The checker contract: a named, fixed-arity predicate over dynamic values.

use std::sync::Arc;

use crate::value::Value;

/// Display name and ordered parameter names of a checker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckerInfo {
    pub name: String,
    pub params: Vec<String>,
}

impl CheckerInfo {
    pub fn new(name: impl Into<String>, params: &[&str]) -> Self {
        Self {
            name: name.into(),
            params: params.iter().map(|p| (*p).to_string()).collect(),
        }
    }
}

/// Rewritten argument slots returned by a checker that replaced an opaque
/// obtained value with a more diagnosable one (an error with its message,
/// a function with its panic payload).
#[derive(Debug, Clone, PartialEq)]
pub struct ParamView {
    pub params: Vec<Value>,
    pub names: Vec<String>,
}

impl ParamView {
    /// Copies `params`/`names` and replaces slot `index`.
    pub fn replace(
        params: &[Value],
        names: &[String],
        index: usize,
        value: Value,
        name: &str,
    ) -> Self {
        let mut view = Self {
            params: params.to_vec(),
            names: names.to_vec(),
        };
        if let Some(slot) = view.params.get_mut(index) {
            *slot = value;
        }
        if let Some(slot) = view.names.get_mut(index) {
            *slot = name.to_string();
        }
        view
    }
}

/// Outcome of one check.
///
/// `passed == true` never carries an error. An error message marks a usage
/// fault (bad argument shape, regex that does not compile, uncomparable
/// operands); callers surface it the same way as a plain failure.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckResult {
    pub passed: bool,
    pub error: Option<String>,
    pub view: Option<ParamView>,
}

impl CheckResult {
    pub fn pass() -> Self {
        Self::from_bool(true)
    }

    pub fn fail() -> Self {
        Self::from_bool(false)
    }

    pub fn from_bool(passed: bool) -> Self {
        Self {
            passed,
            error: None,
            view: None,
        }
    }

    pub fn usage(message: impl Into<String>) -> Self {
        Self {
            passed: false,
            error: Some(message.into()),
            view: None,
        }
    }

    pub fn with_view(mut self, view: ParamView) -> Self {
        self.view = Some(view);
        self
    }

    pub fn is_usage_fault(&self) -> bool {
        self.error.is_some()
    }

    /// Error text, empty when the check held or simply failed.
    pub fn message(&self) -> &str {
        self.error.as_deref().unwrap_or("")
    }

    /// Params to render: the rewritten ones when the checker produced them.
    pub fn params<'a>(&'a self, original: &'a [Value]) -> &'a [Value] {
        self.view.as_ref().map_or(original, |v| &v.params)
    }

    pub fn names<'a>(&'a self, original: &'a [String]) -> &'a [String] {
        self.view.as_ref().map_or(original, |v| &v.names)
    }
}

pub trait Checker: Send + Sync {
    fn info(&self) -> CheckerInfo;

    /// `params` and `names` both have `info().params.len()` entries.
    fn check(&self, params: &[Value], names: &[String]) -> CheckResult;
}

impl<C: Checker + ?Sized> Checker for Arc<C> {
    fn info(&self) -> CheckerInfo {
        (**self).info()
    }

    fn check(&self, params: &[Value], names: &[String]) -> CheckResult {
        (**self).check(params, names)
    }
}

impl<C: Checker + ?Sized> Checker for Box<C> {
    fn info(&self) -> CheckerInfo {
        (**self).info()
    }

    fn check(&self, params: &[Value], names: &[String]) -> CheckResult {
        (**self).check(params, names)
    }
}

/// Negation combinator.
///
/// Inverts the wrapped checker's verdict and names itself `Not(<inner>)`.
/// Usage faults are not predicate outcomes and pass through unchanged, so
/// `Not(Not(x))` always agrees with `x`.
pub struct Not {
    inner: Arc<dyn Checker>,
}

impl Not {
    pub fn new(inner: impl Checker + 'static) -> Self {
        Self {
            inner: Arc::new(inner),
        }
    }

    pub fn wrap(inner: Arc<dyn Checker>) -> Self {
        Self { inner }
    }
}

impl Checker for Not {
    fn info(&self) -> CheckerInfo {
        let inner = self.inner.info();
        CheckerInfo {
            name: format!("Not({})", inner.name),
            params: inner.params,
        }
    }

    fn check(&self, params: &[Value], names: &[String]) -> CheckResult {
        let mut result = self.inner.check(params, names);
        if !result.is_usage_fault() {
            result.passed = !result.passed;
        }
        result
    }
}

/// Runs `checker` against `params` with the checker's own parameter names.
pub fn run_check(checker: &dyn Checker, params: &[Value]) -> CheckResult {
    let info = checker.info();
    debug_assert_eq!(
        params.len(),
        info.params.len(),
        "{} takes {} params",
        info.name,
        info.params.len()
    );
    let result = checker.check(params, &info.params);
    if let Some(error) = &result.error {
        tracing::debug!(checker = %info.name, error = %error, "check usage fault");
    } else {
        tracing::trace!(checker = %info.name, passed = result.passed, "check evaluated");
    }
    result
}
