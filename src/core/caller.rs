//! Call-site resolution by stack introspection
//!
//! The resolver walks the live stack from the innermost frame outwards and
//! reports the first frame that does not belong to an excluded type or
//! module. Frames of this crate, of the stack-capture machinery, of the
//! standard library and of the `log` facade are always excluded, so the
//! reported frame is the code that called the logging entry point rather than
//! the formatter that asked the question.

use super::config::LoggerConfiguration;
use super::error::{LoggerError, Result};
use std::fmt;

/// Frames examined before giving up.
pub const MAX_STACK_DEPTH: usize = 128;

/// Modules excluded for every resolver, besides this crate's own root module.
///
/// `__rustc` holds the panic entry points such as `rust_begin_unwind`.
const ALWAYS_EXCLUDED_MODULES: &[&str] =
    &["backtrace", "std", "core", "alloc", "log", "__rustc"];

/// Identity of one stack frame: declaring type path, method, parameter types, line.
///
/// Free functions use their enclosing module path as the type path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    pub type_path: String,
    pub method: String,
    pub parameter_types: Vec<String>,
    pub line: Option<u32>,
}

impl CallSite {
    pub fn new(type_path: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            type_path: type_path.into(),
            method: method.into(),
            parameter_types: Vec::new(),
            line: None,
        }
    }

    #[must_use]
    pub fn with_parameters<I, S>(mut self, parameter_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parameter_types = parameter_types.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }

    /// Build a frame from a demangled symbol such as `app::net::Server::start`
    /// or `<app::Job as app::Task>::run`.
    ///
    /// Returns `None` for symbols without a Rust path (C runtime, libc, ...).
    pub fn from_symbol(symbol: &str, line: Option<u32>) -> Option<Self> {
        let symbol = strip_hash(symbol.trim());

        let (type_prefix, rest) = if symbol.starts_with('<') {
            let close = matching_angle(symbol)?;
            let inner = &symbol[1..close];
            let self_type = inner.split(" as ").next().unwrap_or(inner).trim();
            let rest = symbol[close + 1..].strip_prefix("::")?;
            (Some(self_type), rest)
        } else {
            (None, symbol)
        };

        let mut segments = split_path(rest);
        // Drop a trailing turbofish such as `::<u32>`
        if segments.len() > 1 && segments.last().is_some_and(|s| s.starts_with('<')) {
            segments.pop();
        }
        let method = segments.pop()?;

        let type_path = match type_prefix {
            Some(self_type) => {
                let mut parts = vec![self_type];
                parts.extend(segments);
                parts.join("::")
            }
            None if segments.is_empty() => return None,
            None => segments.join("::"),
        };

        Some(Self {
            type_path,
            method: method.to_string(),
            parameter_types: Vec::new(),
            line,
        })
    }
}

impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}.{}({}) : ",
            self.type_path,
            self.method,
            self.parameter_types.join(", ")
        )?;
        match self.line {
            Some(line) => write!(f, "{}]", line),
            None => f.write_str("?]"),
        }
    }
}

/// Remove the `::h0123456789abcdef` suffix of legacy mangled names.
fn strip_hash(symbol: &str) -> &str {
    match symbol.rsplit_once("::") {
        Some((head, tail))
            if tail.len() == 17
                && tail.starts_with('h')
                && tail[1..].chars().all(|c| c.is_ascii_hexdigit()) =>
        {
            head
        }
        _ => symbol,
    }
}

/// Index of the `>` closing the `<` at position 0.
fn matching_angle(symbol: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut prev = '\0';
    for (idx, c) in symbol.char_indices() {
        match c {
            '<' => depth += 1,
            // `->` in fn pointer types is not a bracket
            '>' if prev != '-' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(idx);
                }
            }
            _ => {}
        }
        prev = c;
    }
    None
}

/// Split on `::` outside of generic brackets.
fn split_path(path: &str) -> Vec<&str> {
    let bytes = path.as_bytes();
    let mut segments = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'<' => depth += 1,
            b'>' if i == 0 || bytes[i - 1] != b'-' => depth = depth.saturating_sub(1),
            b':' if depth == 0 && bytes.get(i + 1) == Some(&b':') => {
                segments.push(&path[start..i]);
                i += 2;
                start = i;
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    segments.push(&path[start..]);
    segments.retain(|s| !s.is_empty());
    segments
}

/// `path` is `module` itself or lives somewhere below it.
fn in_module(path: &str, module: &str) -> bool {
    let module = module.trim_end_matches("::");
    path == module
        || (path.starts_with(module) && path[module.len()..].starts_with("::"))
}

fn crate_root() -> &'static str {
    let path = module_path!();
    path.split("::").next().unwrap_or(path)
}

/// Finds the first frame outside the excluded types and modules.
///
/// Built-in exclusions match whole `::` segments, so `log` never hides a
/// `logger_app` frame. Configured module prefixes match the start of the
/// frame's type path as plain text.
#[derive(Debug, Clone)]
pub struct CallerResolver {
    builtin_modules: Vec<&'static str>,
    excluded_types: Vec<String>,
    excluded_modules: Vec<String>,
}

impl CallerResolver {
    /// Resolver with the built-in exclusions plus those of `config`.
    pub fn new(config: &LoggerConfiguration) -> Self {
        let mut builtin_modules = vec![crate_root()];
        builtin_modules.extend_from_slice(ALWAYS_EXCLUDED_MODULES);

        Self {
            builtin_modules,
            excluded_types: config.excluded_caller_types.clone(),
            excluded_modules: config.excluded_caller_modules.clone(),
        }
    }

    pub fn exclude_type(&mut self, type_path: impl Into<String>) {
        self.excluded_types.push(type_path.into());
    }

    pub fn exclude_module(&mut self, module: impl Into<String>) {
        self.excluded_modules.push(module.into());
    }

    pub fn excluded_types(&self) -> &[String] {
        &self.excluded_types
    }

    /// Configured module prefixes, without the built-in ones.
    pub fn excluded_modules(&self) -> &[String] {
        &self.excluded_modules
    }

    pub fn is_caller_frame(&self, frame: &CallSite) -> bool {
        let path = frame.type_path.as_str();
        !self.excluded_types.iter().any(|t| t == path)
            && !self.builtin_modules.iter().any(|m| in_module(path, m))
            && !self.excluded_modules.iter().any(|m| path.starts_with(m.as_str()))
    }

    /// Resolve the caller on the live stack of the current thread.
    pub fn resolve(&self) -> Result<CallSite> {
        let mut found: Option<CallSite> = None;
        let mut depth = 0usize;

        backtrace::trace(|frame| {
            depth += 1;
            backtrace::resolve_frame(frame, |symbol| {
                if found.is_some() {
                    return;
                }
                let Some(name) = symbol.name() else {
                    return;
                };
                let rendered = format!("{:#}", name);
                if let Some(candidate) = CallSite::from_symbol(&rendered, symbol.lineno()) {
                    if self.is_caller_frame(&candidate) {
                        found = Some(candidate);
                    }
                }
            });
            found.is_none() && depth < MAX_STACK_DEPTH
        });

        found.ok_or(LoggerError::NoCallerFound)
    }

    /// Apply the same filter to an already captured stack, innermost frame first.
    pub fn resolve_frames<I>(&self, frames: I) -> Result<CallSite>
    where
        I: IntoIterator<Item = CallSite>,
    {
        frames
            .into_iter()
            .take(MAX_STACK_DEPTH)
            .find(|frame| self.is_caller_frame(frame))
            .ok_or(LoggerError::NoCallerFound)
    }
}
