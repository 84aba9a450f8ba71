use super::Variable;
use indexmap::IndexMap;

/// The ordered namespaces a query's names are looked up in.
///
/// The default scope holds a single unprefixed namespace for the fields of the
/// query's root record.
#[derive(Debug, Clone)]
pub struct Scope {
    namespaces: Vec<Namespace>,
    conflict: Conflict,
}

/// What happens when a name is bound by more than one namespace.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Conflict {
    /// The first namespace in scope order wins.
    #[default]
    FirstMatch,

    /// The name is rejected as ambiguous.
    Reject,
}

/// A set of names, optionally reachable only through a prefix.
///
/// Unprefixed namespaces bind their names directly. A prefixed namespace
/// binds only its prefix: `r.name`, `params.lang`.
#[derive(Debug, Clone)]
pub struct Namespace {
    pub prefix: Option<String>,
    pub kind: NamespaceKind,
}

#[derive(Debug, Clone)]
pub enum NamespaceKind {
    /// The fields of the query's root record
    Record,

    /// Named variables
    Vars(IndexMap<String, Variable>),
}

impl Scope {
    /// A scope without any namespace.
    pub fn new() -> Scope {
        Scope {
            namespaces: vec![],
            conflict: Conflict::default(),
        }
    }

    pub fn push(&mut self, namespace: Namespace) -> &mut Self {
        self.namespaces.push(namespace);
        self
    }

    pub fn conflict(&mut self, conflict: Conflict) -> &mut Self {
        self.conflict = conflict;
        self
    }

    pub fn conflict_policy(&self) -> Conflict {
        self.conflict
    }

    pub fn namespaces(&self) -> &[Namespace] {
        &self.namespaces
    }
}

impl Default for Scope {
    fn default() -> Self {
        let mut scope = Scope::new();
        scope.push(Namespace::record());
        scope
    }
}

impl Namespace {
    pub fn record() -> Namespace {
        Namespace {
            prefix: None,
            kind: NamespaceKind::Record,
        }
    }

    pub fn record_as(prefix: impl Into<String>) -> Namespace {
        Namespace {
            prefix: Some(prefix.into()),
            kind: NamespaceKind::Record,
        }
    }

    pub fn vars(vars: impl IntoIterator<Item = Variable>) -> Namespace {
        Namespace {
            prefix: None,
            kind: NamespaceKind::Vars(Self::collect(vars)),
        }
    }

    pub fn vars_as(prefix: impl Into<String>, vars: impl IntoIterator<Item = Variable>) -> Namespace {
        Namespace {
            prefix: Some(prefix.into()),
            kind: NamespaceKind::Vars(Self::collect(vars)),
        }
    }

    fn collect(vars: impl IntoIterator<Item = Variable>) -> IndexMap<String, Variable> {
        vars.into_iter().map(|var| (var.name.clone(), var)).collect()
    }

    /// Human readable name for diagnostics.
    pub fn describe(&self) -> &str {
        match (&self.prefix, &self.kind) {
            (Some(prefix), _) => prefix,
            (None, NamespaceKind::Record) => "record",
            (None, NamespaceKind::Vars(_)) => "variables",
        }
    }
}
