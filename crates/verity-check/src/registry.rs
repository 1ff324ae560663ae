use std::sync::Arc;

use crate::checker::{Checker, Not};
use crate::checkers::{
    Contains, DeepContains, DeepEquals, Equals, ErrorMatches, FitsTypeOf, HasLen, Implements,
    IsNil, Matches, NotNil, PanicMatches, Panics,
};

pub fn builtin_checkers() -> Vec<Arc<dyn Checker>> {
    vec![
        Arc::new(IsNil),
        Arc::new(NotNil),
        Arc::new(Equals),
        Arc::new(DeepEquals),
        Arc::new(HasLen),
        Arc::new(Matches),
        Arc::new(ErrorMatches),
        Arc::new(Panics),
        Arc::new(PanicMatches),
        Arc::new(FitsTypeOf),
        Arc::new(Implements),
        Arc::new(Contains),
        Arc::new(DeepContains),
    ]
}

/// Resolves a checker by display name, including nested `Not(...)` wrappers.
pub fn lookup(name: &str) -> Option<Arc<dyn Checker>> {
    let name = name.trim();
    if let Some(inner) = name
        .strip_prefix("Not(")
        .and_then(|rest| rest.strip_suffix(')'))
    {
        return lookup(inner).map(|inner| Arc::new(Not::wrap(inner)) as Arc<dyn Checker>);
    }
    builtin_checkers()
        .into_iter()
        .find(|checker| checker.info().name == name)
}
