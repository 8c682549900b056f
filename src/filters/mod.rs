//! Filters transform the value of a placeholder before it is output, e.g.
//! `{{~color|sel(red)}}`.

pub mod builtins;

use crate::tracing_macros::trace;
use crate::value::Chunk;
use crate::Engine;

pub type FilterFn = dyn Fn(&Chunk<'_>, &str, &[&str]) -> String + Send + Sync + 'static;

pub fn new<F, A>(f: F) -> Box<FilterFn>
where
    F: Filter<A>,
{
    Box::new(move |chunk: &Chunk<'_>, value: &str, args: &[&str]| f.apply(chunk, value, args))
}

/// Represents any filter function.
///
/// This trait is used by [`Engine::add_filter`] to accept functions and
/// closures of three shapes. The piped value is always passed as a `&str` and
/// arguments are the comma separated text inside the parentheses, trimmed
/// and with surrounding quotes removed.
///
/// - `Fn(&str) -> R`
/// - `Fn(&str, &[&str]) -> R`
/// - `Fn(&Chunk, &str, &[&str]) -> R` for filters that look up other tags
///
/// where `R` implements `Into<String>`.
///
/// # Examples
///
/// ```
/// use chunky::{Chunk, Engine};
///
/// let mut engine = Engine::new();
/// engine.add_filter("upper", str::to_uppercase);
/// engine.add_filter("or", |s: &str, args: &[&str]| {
///     if s.is_empty() { args.concat() } else { s.to_owned() }
/// });
///
/// let mut chunk = Chunk::new();
/// chunk.set("name", "ada");
/// let out = engine.compile("{{~name|upper}}")?.render(&chunk)?;
/// assert_eq!(out, "ADA");
/// # Ok::<(), chunky::Error>(())
/// ```
pub trait Filter<A>: Send + Sync + 'static {
    #[doc(hidden)]
    fn apply(&self, chunk: &Chunk<'_>, value: &str, args: &[&str]) -> String;
}

#[doc(hidden)]
pub struct Plain;

#[doc(hidden)]
pub struct WithArgs;

#[doc(hidden)]
pub struct WithChunk;

impl<F, R> Filter<Plain> for F
where
    F: Fn(&str) -> R + Send + Sync + 'static,
    R: Into<String>,
{
    fn apply(&self, _: &Chunk<'_>, value: &str, _: &[&str]) -> String {
        self(value).into()
    }
}

impl<F, R> Filter<WithArgs> for F
where
    F: Fn(&str, &[&str]) -> R + Send + Sync + 'static,
    R: Into<String>,
{
    fn apply(&self, _: &Chunk<'_>, value: &str, args: &[&str]) -> String {
        self(value, args).into()
    }
}

impl<F, R> Filter<WithChunk> for F
where
    F: Fn(&Chunk<'_>, &str, &[&str]) -> R + Send + Sync + 'static,
    R: Into<String>,
{
    fn apply(&self, chunk: &Chunk<'_>, value: &str, args: &[&str]) -> String {
        self(chunk, value, args).into()
    }
}

/// Applies a chain of filters such as `sel(red)|upper` to a value.
///
/// Unknown filters leave the value unchanged.
pub fn apply_chain(engine: &Engine, chunk: &Chunk<'_>, value: &str, chain: &str) -> String {
    let mut value = value.to_owned();
    for call in chain.split('|') {
        let (name, args) = split_call(call);
        match engine.functions.get(name) {
            Some(f) => value = f(chunk, &value, &args),
            None => {
                trace!(name, "unknown filter");
            }
        }
    }
    value
}

/// Splits `name(a, "b")` into its name and arguments.
fn split_call(call: &str) -> (&str, Vec<&str>) {
    let call = call.trim();
    match call.split_once('(') {
        Some((name, rest)) => {
            let rest = rest.trim_end();
            let rest = rest.strip_suffix(')').unwrap_or(rest);
            let args = if rest.trim().is_empty() {
                Vec::new()
            } else {
                rest.split(',').map(unquote).collect()
            };
            (name.trim(), args)
        }
        None => (call, Vec::new()),
    }
}

fn unquote(arg: &str) -> &str {
    let arg = arg.trim();
    for q in ['"', '\''] {
        if let Some(inner) = arg
            .strip_prefix(q)
            .and_then(|a| a.strip_suffix(q))
        {
            return inner;
        }
    }
    arg
}
