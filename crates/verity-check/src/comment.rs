use std::fmt;

/// Extra text attached to an assertion and printed with its failure.
pub trait CheckComment {
    fn check_comment_string(&self) -> String;
}

/// A comment formatted up front; build it with [`comment!`](crate::comment!).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment(String);

impl Comment {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }
}

impl CheckComment for Comment {
    fn check_comment_string(&self) -> String {
        self.0.clone()
    }
}

impl fmt::Display for Comment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl CheckComment for str {
    fn check_comment_string(&self) -> String {
        self.to_string()
    }
}

impl CheckComment for String {
    fn check_comment_string(&self) -> String {
        self.clone()
    }
}

/// Builds a [`Comment`] with `format!` arguments.
#[macro_export]
macro_rules! comment {
    ($($arg:tt)*) => {
        $crate::Comment::new(::std::format!($($arg)*))
    };
}
