//! Call-site naming: turns a source location into the `path: function`
//! pair printed in report headers.

use std::path::{Path, PathBuf};

/// Source location of a test or fixture method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallSite {
    pub file: &'static str,
    pub line: u32,
    /// Fully qualified function path as produced by [`std::any::type_name`].
    pub function: &'static str,
}

impl CallSite {
    pub const fn new(file: &'static str, line: u32, function: &'static str) -> Self {
        Self {
            file,
            line,
            function,
        }
    }
}

/// Captures the [`CallSite`] of the enclosing function.
#[macro_export]
macro_rules! call_site {
    () => {{
        fn here() {}
        fn name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        let name = name_of(here);
        $crate::callsite::CallSite::new(
            ::std::file!(),
            ::std::line!(),
            name.strip_suffix("::here").unwrap_or(name),
        )
    }};
}

/// `Type.method` (or `module.function`) from a fully qualified function path.
///
/// Closure frames are dropped and trait-qualified paths
/// (`<a::Suite as b::Fixture>::set_up`) are reduced to the implementing type.
pub fn nice_function_name(full: &str) -> String {
    let mut name = full.trim();
    while let Some(outer) = name.strip_suffix("::{{closure}}") {
        name = outer;
    }
    if name.is_empty() {
        return "<unknown function>".to_string();
    }

    if let Some((qualified, method)) = name
        .strip_prefix('<')
        .and_then(|rest| rest.rsplit_once(">::"))
    {
        let ty = qualified.split(" as ").next().unwrap_or(qualified);
        return format!("{}.{}", last_segment(ty), method);
    }

    let mut segments = name.rsplit("::");
    match (segments.next(), segments.next()) {
        (Some(function), Some(owner)) => format!("{}.{}", owner, function),
        (Some(function), None) => function.to_string(),
        _ => "<unknown function>".to_string(),
    }
}

fn last_segment(path: &str) -> &str {
    let base = path.split('<').next().unwrap_or(path);
    match base.rfind("::") {
        Some(idx) => &path[idx + 2..],
        None => path,
    }
}

/// Renders call sites relative to a base directory.
#[derive(Debug, Clone, Default)]
pub struct CallSiteNamer {
    base_dir: Option<PathBuf>,
}

impl CallSiteNamer {
    pub fn new(base_dir: Option<PathBuf>) -> Self {
        Self { base_dir }
    }

    /// Paths are shown relative to the working directory of the process.
    pub fn from_current_dir() -> Self {
        Self::new(std::env::current_dir().ok())
    }

    /// `file:line`, relative to the base directory when under it.
    pub fn path(&self, site: Option<&CallSite>) -> String {
        let Some(site) = site else {
            return "<unknown path>".to_string();
        };
        let file = Path::new(site.file);
        let shown = self
            .base_dir
            .as_deref()
            .and_then(|base| file.strip_prefix(base).ok())
            .unwrap_or(file);
        format!("{}:{}", shown.display(), site.line)
    }

    pub fn function(&self, site: Option<&CallSite>) -> String {
        match site {
            Some(site) => nice_function_name(site.function),
            None => "<unknown function>".to_string(),
        }
    }
}
