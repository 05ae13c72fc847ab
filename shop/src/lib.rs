//! Single-character command-line option parsing.
//!
//! A [`Registry`] compiles an option table from a compact spec string
//! (`"vn:f:h"`, where a `:` right after a character marks that option as
//! argument-taking) or from an explicit list of [`Opt`] builders. One
//! left-to-right pass over the argument vector records which options were
//! invoked and collects their values; typed accessors convert the collected
//! strings on demand.
//!
//! Combined short options are supported (`-vn 42`), and an argument-taking
//! option may carry its value in the same token (`-fdata.txt`) or in the
//! next one (`-f data.txt`). Only the last option of a combined group may
//! take an argument. Repeating an option collects multiple values
//! (`-t 1 -t 2`); `-t 1 2` does not.
//!
//! ```
//! use shop::{Registry, ValueKind};
//!
//! let mut opts = Registry::from_spec("vn:f:h")?;
//! opts.describe('v', None, "Enable verbose output")?;
//! opts.describe('n', Some(ValueKind::Int), "Number (int)")?;
//! opts.describe('f', Some(ValueKind::Str), "Filename (string)")?;
//! opts.describe('h', None, "Show this help message")?;
//!
//! opts.track_from(["demo", "-vn", "42", "-fdata.txt"])?;
//!
//! assert!(opts.used('v').is_some());
//! assert_eq!(opts.get::<i64>('n', 0), Some(42));
//! assert_eq!(opts.first::<String>('f').as_deref(), Some("data.txt"));
//! # Ok::<(), shop::Error>(())
//! ```

use std::collections::HashMap;
use std::io::{self, Write};

// ============================================================================
// Result and Error types
// ============================================================================

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The command line named an option that was never registered.
    #[error("unknown option: '-{0}'")]
    UnknownOption(char),

    /// An argument-taking option ended the command line with no value after
    /// it. Carries the full option token (e.g. `-vf`).
    #[error("option '{0}' requires an argument but none was supplied")]
    MissingValue(String),

    /// The same name was registered twice.
    #[error("option '-{0}' registered more than once")]
    DuplicateOption(char),

    /// The name collides with the spec-string dialect or the option marker.
    #[error("invalid option name {0:?}")]
    BadName(char),

    /// `describe` was called for a name that is not in the table.
    #[error("no option '-{0}' registered")]
    NotRegistered(char),
}

impl Error {
    /// True for errors caused by the command line being tracked, as opposed
    /// to misuse of the option table by the embedding program. Callers
    /// typically print usage errors and exit, and treat the rest as bugs.
    pub fn is_usage(&self) -> bool {
        matches!(self, Error::UnknownOption(_) | Error::MissingValue(_))
    }
}

// ============================================================================
// ValueKind and typed values
// ============================================================================

/// Conversion applied to a stored value when it is retrieved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Str,
    Int,
    Float,
    Bool,
}

impl ValueKind {
    fn convert(self, raw: &str) -> Option<Value> {
        match self {
            ValueKind::Str => Some(Value::Str(raw.to_owned())),
            ValueKind::Int => raw.parse().ok().map(Value::Int),
            ValueKind::Float => raw.parse().ok().map(Value::Float),
            // Exact literals only; anything else is false, never an error.
            ValueKind::Bool => Some(Value::Bool(matches!(raw, "true" | "yes" | "1" | "on"))),
        }
    }
}

/// A converted option value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

/// Narrows a [`Value`] to the type requested by the caller.
pub trait FromValue: Sized {
    fn from_value(value: Value) -> Option<Self>;
}

impl FromValue for String {
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl FromValue for i64 {
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Int(n) => Some(n),
            _ => None,
        }
    }
}

impl FromValue for i32 {
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Int(n) => i32::try_from(n).ok(),
            _ => None,
        }
    }
}

impl FromValue for u32 {
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Int(n) => u32::try_from(n).ok(),
            _ => None,
        }
    }
}

impl FromValue for f64 {
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Float(x) => Some(x),
            _ => None,
        }
    }
}

impl FromValue for f32 {
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Float(x) => Some(x as f32),
            _ => None,
        }
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(b),
            _ => None,
        }
    }
}

// ============================================================================
// Opt — option builder
// ============================================================================

/// One entry of an explicit option list.
pub struct Opt {
    name: char,
    takes_arg: bool,
    description: Option<String>,
    kind: Option<ValueKind>,
}

impl Opt {
    pub fn new(name: char) -> Self {
        Opt {
            name,
            takes_arg: false,
            description: None,
            kind: None,
        }
    }

    pub fn takes_arg(mut self) -> Self {
        self.takes_arg = true;
        self
    }

    pub fn description(mut self, text: &str) -> Self {
        self.description = Some(text.to_string());
        self
    }

    pub fn kind(mut self, kind: ValueKind) -> Self {
        self.kind = Some(kind);
        self
    }
}

// ============================================================================
// OptionDef — one registered option
// ============================================================================

/// The registry's record for one option.
#[derive(Debug, Clone)]
pub struct OptionDef {
    name: char,
    takes_arg: bool,
    description: Option<String>,
    kind: Option<ValueKind>,
    used: bool,
    values: Vec<String>,
}

impl OptionDef {
    pub fn name(&self) -> char {
        self.name
    }

    pub fn takes_arg(&self) -> bool {
        self.takes_arg
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn kind(&self) -> Option<ValueKind> {
        self.kind
    }

    /// True once the option has appeared on a tracked command line.
    pub fn used(&self) -> bool {
        self.used
    }

    /// Raw values in command-line order. Empty for flag options.
    pub fn values(&self) -> &[String] {
        &self.values
    }
}

// ============================================================================
// Registry
// ============================================================================

/// The option table for one parsing session.
///
/// Owns every [`OptionDef`] and its collected values; all other operations
/// borrow it. Dropping the registry releases everything, so there is no
/// explicit teardown; [`Registry::reset`] clears tracked state for reuse.
pub struct Registry {
    options: Vec<OptionDef>,
    index: HashMap<char, usize>,
}

impl Registry {
    /// Build a registry from a compact spec string.
    ///
    /// Every character registers an option; a `:` immediately after it
    /// marks the option as argument-taking. `:` and space are separators
    /// and register nothing themselves, so `"vn:f:h"` and `"v n: f: h"`
    /// describe the same table.
    pub fn from_spec(spec: &str) -> Result<Registry> {
        let mut registry = Registry {
            options: Vec::new(),
            index: HashMap::new(),
        };
        let mut chars = spec.chars().peekable();
        while let Some(c) = chars.next() {
            if c == ':' || c == ' ' {
                continue;
            }
            let takes_arg = chars.peek() == Some(&':');
            registry.add(c, takes_arg, None, None)?;
        }
        Ok(registry)
    }

    /// Build a registry from an explicit list of options.
    pub fn from_options<I>(opts: I) -> Result<Registry>
    where
        I: IntoIterator<Item = Opt>,
    {
        let mut registry = Registry {
            options: Vec::new(),
            index: HashMap::new(),
        };
        for opt in opts {
            registry.add(opt.name, opt.takes_arg, opt.description, opt.kind)?;
        }
        Ok(registry)
    }

    fn add(
        &mut self,
        name: char,
        takes_arg: bool,
        description: Option<String>,
        kind: Option<ValueKind>,
    ) -> Result<()> {
        if name == '\0' || name == ':' || name == ' ' || name == '-' {
            return Err(Error::BadName(name));
        }
        if self.index.contains_key(&name) {
            return Err(Error::DuplicateOption(name));
        }
        self.index.insert(name, self.options.len());
        self.options.push(OptionDef {
            name,
            takes_arg,
            description,
            kind,
            used: false,
            values: Vec::new(),
        });
        Ok(())
    }

    /// Attach a conversion kind and help text to a registered option.
    pub fn describe(&mut self, name: char, kind: Option<ValueKind>, text: &str) -> Result<()> {
        let slot = *self.index.get(&name).ok_or(Error::NotRegistered(name))?;
        let opt = &mut self.options[slot];
        opt.kind = kind;
        opt.description = Some(text.to_string());
        Ok(())
    }

    /// Track the process argument vector.
    pub fn track(&mut self) -> Result<()> {
        self.track_from(std::env::args())
    }

    /// Track an explicit argument vector. Element 0 is the program name and
    /// is skipped; tokens not starting with `-` are ignored.
    pub fn track_from<I>(&mut self, argv: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let args: Vec<String> = argv.into_iter().map(|a| a.as_ref().to_owned()).collect();

        let mut i = 1;
        while i < args.len() {
            let arg = &args[i];
            if !arg.starts_with('-') {
                i += 1;
                continue;
            }

            // A run of combined option names; the first argument-taking one
            // ends the run, with its value either bundled in this token or
            // pending in the next.
            let names: Vec<char> = arg.chars().skip(1).collect();
            let mut pending = false;
            for (pos, &name) in names.iter().enumerate() {
                let slot = *self.index.get(&name).ok_or(Error::UnknownOption(name))?;
                let opt = &mut self.options[slot];
                opt.used = true;
                if opt.takes_arg {
                    if pos + 1 < names.len() {
                        opt.values.push(names[pos + 1..].iter().collect());
                    } else {
                        pending = true;
                    }
                    break;
                }
            }

            if pending {
                i += 1;
                if i >= args.len() {
                    return Err(Error::MissingValue(arg.clone()));
                }
                // Re-scan the token for the option that owns the value;
                // there is at most one, since the run stopped at it.
                for &name in &names {
                    if let Some(&slot) = self.index.get(&name) {
                        if self.options[slot].takes_arg {
                            self.options[slot].values.push(args[i].clone());
                            break;
                        }
                    }
                }
            }

            i += 1;
        }
        Ok(())
    }

    fn find(&self, name: char) -> Option<&OptionDef> {
        self.index.get(&name).map(|&slot| &self.options[slot])
    }

    /// The descriptor for `name`, if the option appeared on the command
    /// line.
    pub fn used(&self, name: char) -> Option<&OptionDef> {
        self.find(name).filter(|opt| opt.used)
    }

    /// Number of values collected for `name`; 0 for unknown names.
    pub fn count(&self, name: char) -> usize {
        self.find(name).map_or(0, |opt| opt.values.len())
    }

    /// The `idx`-th raw value of `name`.
    pub fn value(&self, name: char, idx: usize) -> Option<&str> {
        self.find(name)?.values.get(idx).map(String::as_str)
    }

    /// The `idx`-th value of `name` converted per the registered kind.
    ///
    /// `None` when the name is unknown, the option is unused or flag-only,
    /// no kind was registered, `idx` is out of bounds, or the conversion
    /// fails. Never mutates the store.
    pub fn get<T: FromValue>(&self, name: char, idx: usize) -> Option<T> {
        let opt = self.find(name)?;
        if !opt.used || !opt.takes_arg {
            return None;
        }
        let kind = opt.kind?;
        let raw = opt.values.get(idx)?;
        T::from_value(kind.convert(raw)?)
    }

    /// Convenience accessor for the common single-value case.
    pub fn first<T: FromValue>(&self, name: char) -> Option<T> {
        self.get(name, 0)
    }

    /// Typed values of `name` in command-line order, ending at the first
    /// index the accessor misses.
    pub fn values_of<T: FromValue>(&self, name: char) -> impl Iterator<Item = T> + '_ {
        (0usize..).map_while(move |idx| self.get(name, idx))
    }

    /// All registered options, in registration order.
    pub fn options(&self) -> &[OptionDef] {
        &self.options
    }

    /// Clear used flags and collected values, keeping the registrations, so
    /// the registry can track another argument vector.
    pub fn reset(&mut self) {
        for opt in &mut self.options {
            opt.used = false;
            opt.values.clear();
        }
    }

    // ------------------------------------------------------------------
    // Listings
    // ------------------------------------------------------------------

    /// Write one help line per option: a `*` marker for argument-taking
    /// options, the name, and the description (empty if never described).
    pub fn write_help<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for opt in &self.options {
            let marker = if opt.takes_arg { '*' } else { ' ' };
            writeln!(
                out,
                "{} -{}    {}",
                marker,
                opt.name,
                opt.description.as_deref().unwrap_or("")
            )?;
        }
        Ok(())
    }

    pub fn print_help(&self) {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        let _ = self.write_help(&mut out);
    }

    /// Write the diagnostic table: every option's description, used state,
    /// kind, and comma-joined values, with over-wide cells ellipsized.
    pub fn write_verbose<W: Write>(&self, out: &mut W) -> io::Result<()> {
        const DESC_WIDTH: usize = 20;
        const ARG_WIDTH: usize = 10;

        writeln!(out)?;
        writeln!(
            out,
            "{:<6}  {:<dw$}  {:<6}  {:<10}  {:<aw$}",
            "Option",
            "Description",
            "Used",
            "Type",
            "Argument",
            dw = DESC_WIDTH,
            aw = ARG_WIDTH
        )?;
        writeln!(
            out,
            "{:<6}  {:<dw$}  {:<6}  {:<10}  {:<aw$}",
            "------",
            "-----------",
            "----",
            "----",
            "--------",
            dw = DESC_WIDTH,
            aw = ARG_WIDTH
        )?;

        for opt in &self.options {
            let desc = ellipsize(opt.description.as_deref().unwrap_or(""), DESC_WIDTH);
            write!(
                out,
                "-{}      {:<dw$}  {:<6}  {:<10}  ",
                opt.name,
                desc,
                if opt.used { "yes" } else { "no" },
                if opt.takes_arg { "with-arg" } else { "flag" },
                dw = DESC_WIDTH
            )?;
            let mut sep = "";
            for value in &opt.values {
                write!(out, "{}{}", sep, ellipsize(value, ARG_WIDTH))?;
                sep = ",";
            }
            writeln!(out)?;
        }
        Ok(())
    }

    pub fn print_verbose(&self) {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        let _ = self.write_verbose(&mut out);
    }
}

/// Truncate `s` to `width` characters, the last three of them `...`.
fn ellipsize(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut cut: String = s.chars().take(width - 3).collect();
        cut.push_str("...");
        cut
    }
}

// ============================================================================
// Tests
// ============================================================================
