use crate::core::{Arg, BindingError, Result, Value};

pub const GENERIC_NAME_PREFIX: &str = "param";

/// The role a declared parameter plays in a mapper method call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Value,
    RowBounds,
    RowHandler,
}

impl ParamKind {
    pub fn is_special(&self) -> bool {
        matches!(self, Self::RowBounds | Self::RowHandler)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Value => "value",
            Self::RowBounds => "row bounds",
            Self::RowHandler => "row handler",
        }
    }
}

/// Declaration-time metadata for one mapper method parameter.
///
/// `name` is the source-declared identifier (when the build preserves it),
/// `explicit_name` is an externally attached name that always wins over it.
#[derive(Debug, Clone)]
pub struct ParamDecl {
    pub name: Option<String>,
    pub explicit_name: Option<String>,
    pub kind: ParamKind,
}

impl ParamDecl {
    /// A plain value parameter with its source-declared name.
    pub fn value(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            explicit_name: None,
            kind: ParamKind::Value,
        }
    }

    /// A plain value parameter whose source name was not preserved.
    pub fn anonymous() -> Self {
        Self {
            name: None,
            explicit_name: None,
            kind: ParamKind::Value,
        }
    }

    pub fn row_bounds() -> Self {
        Self {
            name: None,
            explicit_name: None,
            kind: ParamKind::RowBounds,
        }
    }

    pub fn row_handler() -> Self {
        Self {
            name: None,
            explicit_name: None,
            kind: ParamKind::RowHandler,
        }
    }

    /// Attach an explicit external name, overriding any declared one.
    pub fn explicit(mut self, name: impl Into<String>) -> Self {
        self.explicit_name = Some(name.into());
        self
    }
}

/// Ordered mapping from parameter position to external name.
///
/// Special parameters (bounds, handlers) are never entered, but positions of
/// the remaining parameters keep their original indices:
///
/// - `m(a, b)` with explicit names M, N -> `{0: "M", 1: "N"}`
/// - `m(a, b)` without names            -> `{0: "0", 1: "1"}`
/// - `m(a, bounds, b)` without names    -> `{0: "0", 2: "1"}`
#[derive(Debug, Clone)]
pub struct NameTable {
    entries: Vec<(usize, String)>,
    has_explicit_names: bool,
}

impl NameTable {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn has_explicit_names(&self) -> bool {
        self.has_explicit_names
    }

    /// Assigned names in position order, as referenced by command
    /// parameter placeholders.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(_, n)| n.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.entries.iter().map(|(p, n)| (*p, n.as_str()))
    }

    fn contains_name(&self, name: &str) -> bool {
        self.entries.iter().any(|(_, n)| n == name)
    }
}

/// Ordered name -> value mapping handed to the engine for multi-parameter
/// methods. Lookup of an unknown name fails listing what is available.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamMap {
    entries: Vec<(String, Value)>,
}

impl ParamMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    pub fn get(&self, name: &str) -> Result<&Value> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
            .ok_or_else(|| BindingError::ParameterNotFound {
                name: name.to_string(),
                available: self.entries.iter().map(|(n, _)| n.clone()).collect(),
            })
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The parameter object handed to the engine: absent, one raw value, or a
/// named map.
#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    None,
    Single(Value),
    Named(ParamMap),
}

impl Param {
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Named lookup; a `Single` param answers no names.
    pub fn get(&self, name: &str) -> Result<&Value> {
        match self {
            Self::Named(map) => map.get(name),
            _ => Err(BindingError::ParameterNotFound {
                name: name.to_string(),
                available: Vec::new(),
            }),
        }
    }
}

/// Builds the immutable [`NameTable`] for a method and adapts positional
/// call arguments into the engine-facing [`Param`].
#[derive(Debug, Clone)]
pub struct ParamNameResolver {
    table: NameTable,
}

impl ParamNameResolver {
    pub fn new(use_actual_param_name: bool, params: &[ParamDecl]) -> Self {
        let mut entries: Vec<(usize, String)> = Vec::new();
        let mut has_explicit_names = false;

        for (position, decl) in params.iter().enumerate() {
            if decl.kind.is_special() {
                continue;
            }
            let name = match (&decl.explicit_name, &decl.name) {
                (Some(explicit), _) => {
                    has_explicit_names = true;
                    explicit.clone()
                }
                (None, Some(declared)) if use_actual_param_name => declared.clone(),
                // fall back to the count of names assigned so far
                _ => entries.len().to_string(),
            };
            entries.push((position, name));
        }

        Self {
            table: NameTable {
                entries,
                has_explicit_names,
            },
        }
    }

    pub fn table(&self) -> &NameTable {
        &self.table
    }

    pub fn names(&self) -> Vec<&str> {
        self.table.names()
    }

    /// Adapt positional arguments to the command parameter.
    ///
    /// A single non-explicit parameter is passed through raw. Otherwise the
    /// named map additionally carries `param1..paramN` aliases in sequence
    /// order, never overwriting a name already present in the table.
    pub fn resolve(&self, args: &[Arg]) -> Result<Param> {
        if args.is_empty() || self.table.is_empty() {
            return Ok(Param::None);
        }

        if !self.table.has_explicit_names && self.table.len() == 1 {
            let (position, _) = self.table.entries[0];
            return Ok(Param::Single(self.value_at(args, position)?.clone()));
        }

        let mut map = ParamMap::new();
        for (sequence, (position, name)) in self.table.entries.iter().enumerate() {
            let value = self.value_at(args, *position)?.clone();
            map.insert(name.clone(), value.clone());

            let alias = format!("{}{}", GENERIC_NAME_PREFIX, sequence + 1);
            if !self.table.contains_name(&alias) {
                map.insert(alias, value);
            }
        }
        Ok(Param::Named(map))
    }

    fn value_at<'a>(&self, args: &'a [Arg], position: usize) -> Result<&'a Value> {
        match args.get(position) {
            Some(Arg::Value(v)) => Ok(v),
            Some(other) => Err(BindingError::TypeMismatch(format!(
                "argument {} is a {:?}, expected a value",
                position, other
            ))),
            None => Err(BindingError::TypeMismatch(format!(
                "method declares a parameter at position {} but only {} arguments were given",
                position,
                args.len()
            ))),
        }
    }
}
