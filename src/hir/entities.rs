//! Entity model: modules, classes, functions, variables and imports.
//!
//! Entities form a closed sum type ([`Entity`]) over `Arc`-shared kind
//! structs. A module owns its children; the [`Registry`](super::Registry)
//! indexes every node of every tree by qualified name.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use smol_str::SmolStr;

use crate::base::Location;
use crate::core::text_utils::last_segment;
use crate::docstring::ParsedDoc;

// ============================================================================
// Shared entity data
// ============================================================================

/// Public or private by naming convention (or `__all__`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

/// Fields every entity carries
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct EntityInfo {
    pub name: SmolStr,
    pub qualified_name: Arc<str>,
    pub parent: Option<Arc<str>>,
    pub location: Location,
    /// Cleaned documentation comment
    pub docstring: Option<String>,
    /// Present iff `docstring` is present
    pub parsed_doc: Option<ParsedDoc>,
    pub decorators: Vec<Decorator>,
    pub visibility: Visibility,
}

impl EntityInfo {
    pub fn has_decorator(&self, known: &KnownDecorator) -> bool {
        self.decorators.iter().any(|d| d.known.as_ref() == Some(known))
    }
}

/// A decorator as written plus what it was recognized as
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Decorator {
    pub text: String,
    pub known: Option<KnownDecorator>,
}

impl Decorator {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let known = KnownDecorator::recognize(&text);
        Self { text, known }
    }
}

/// Decorators with meaning to the analysis
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum KnownDecorator {
    StaticMethod,
    ClassMethod,
    Property,
    CachedProperty,
    /// `@<prop>.setter`
    Setter(SmolStr),
    /// `@<prop>.getter`
    Getter(SmolStr),
    /// `@<prop>.deleter`
    Deleter(SmolStr),
    AbstractMethod,
    Dataclass,
    Overload,
}

impl KnownDecorator {
    /// Recognize normalized decorator text; call arguments are ignored.
    pub fn recognize(text: &str) -> Option<Self> {
        let head = text.split('(').next().unwrap_or(text).trim();
        let known = match head {
            "staticmethod" => Self::StaticMethod,
            "classmethod" => Self::ClassMethod,
            "property" | "builtins.property" => Self::Property,
            "cached_property" | "functools.cached_property" => Self::CachedProperty,
            "abstractmethod" | "abc.abstractmethod" => Self::AbstractMethod,
            "dataclass" | "dataclasses.dataclass" => Self::Dataclass,
            "overload" | "typing.overload" | "typing_extensions.overload" => Self::Overload,
            _ => {
                let (prop, accessor) = head.rsplit_once('.')?;
                if prop.contains('.') {
                    return None;
                }
                let prop = SmolStr::new(prop);
                match accessor {
                    "setter" => Self::Setter(prop),
                    "getter" => Self::Getter(prop),
                    "deleter" => Self::Deleter(prop),
                    _ => return None,
                }
            }
        };
        Some(known)
    }

    /// Property name for accessor decorators
    pub fn accessor_of(&self) -> Option<&str> {
        match self {
            Self::Setter(p) | Self::Getter(p) | Self::Deleter(p) => Some(p.as_str()),
            _ => None,
        }
    }

    pub fn is_property_like(&self) -> bool {
        matches!(
            self,
            Self::Property | Self::CachedProperty | Self::Setter(_) | Self::Getter(_) | Self::Deleter(_)
        )
    }
}

// ============================================================================
// Entity kinds
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Module {
    pub info: EntityInfo,
    pub path: Arc<Path>,
    /// Defined by an `__init__` file
    pub is_package: bool,
    pub imports: Vec<Arc<Import>>,
    pub variables: Vec<Arc<Variable>>,
    pub functions: Vec<Arc<Function>>,
    pub classes: Vec<Arc<Class>>,
    /// Literal strings of `__all__`, when it is a list or tuple of strings
    pub exports: Option<Vec<String>>,
}

/// What sort of class a definition is, judged from bases and decorators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ClassKind {
    #[default]
    Regular,
    Protocol,
    Enum,
    Exception,
    Dataclass,
    NamedTuple,
    TypedDict,
}

impl ClassKind {
    /// Classify from normalized base expressions and decorators.
    pub fn classify(bases: &[String], decorators: &[Decorator]) -> Self {
        if decorators
            .iter()
            .any(|d| d.known == Some(KnownDecorator::Dataclass))
        {
            return ClassKind::Dataclass;
        }
        for base in bases {
            let head = base.split('[').next().unwrap_or(base);
            let name = last_segment(head);
            match name {
                "Protocol" => return ClassKind::Protocol,
                "Enum" | "IntEnum" | "StrEnum" | "Flag" | "IntFlag" => return ClassKind::Enum,
                "NamedTuple" => return ClassKind::NamedTuple,
                "TypedDict" => return ClassKind::TypedDict,
                _ if name.ends_with("Exception") || name.ends_with("Error") => {
                    return ClassKind::Exception;
                }
                _ => {}
            }
        }
        ClassKind::Regular
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Class {
    pub info: EntityInfo,
    /// Base expressions as written; keyword arguments excluded
    pub bases: Vec<String>,
    pub metaclass: Option<String>,
    /// Other class keywords as `name=value`
    pub keywords: Vec<String>,
    pub methods: Vec<Arc<Function>>,
    pub variables: Vec<Arc<Variable>>,
    pub classes: Vec<Arc<Class>>,
    pub imports: Vec<Arc<Import>>,
    pub is_abstract: bool,
    pub kind: ClassKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ParamKind {
    PositionalOnly,
    PositionalOrKeyword,
    VarPositional,
    KeywordOnly,
    VarKeyword,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Parameter {
    pub name: SmolStr,
    pub annotation: Option<String>,
    pub default: Option<String>,
    pub kind: ParamKind,
}

impl Parameter {
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FunctionFlags {
    pub is_constructor: bool,
    pub is_property: bool,
    pub is_async: bool,
    pub is_static: bool,
    pub is_classmethod: bool,
    pub is_abstract: bool,
    pub is_overload: bool,
}

/// A call made directly in a function body
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CallSite {
    /// Normalized callee expression, e.g. `self.helper` or `os.path.join`
    pub callee: String,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Function {
    pub info: EntityInfo,
    pub params: Vec<Parameter>,
    pub returns: Option<String>,
    pub flags: FunctionFlags,
    /// Owning class for methods
    pub owner: Option<Arc<str>>,
    pub calls: Vec<CallSite>,
    pub functions: Vec<Arc<Function>>,
    pub classes: Vec<Arc<Class>>,
    pub variables: Vec<Arc<Variable>>,
    pub imports: Vec<Arc<Import>>,
}

impl Function {
    pub fn is_method(&self) -> bool {
        self.owner.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum VariableScope {
    Module,
    Class,
    /// `self.x = ...` inside a method
    Instance,
    Local,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Mutability {
    Final,
    Constant,
    Mutable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Variable {
    pub info: EntityInfo,
    pub annotation: Option<String>,
    pub value: Option<String>,
    pub scope: VariableScope,
    pub mutability: Mutability,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ImportedName {
    pub name: SmolStr,
    pub alias: Option<SmolStr>,
}

/// Where an import points, decided when the registry is sealed
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ImportResolution {
    /// A module parsed in this run
    Resolved(Arc<str>),
    /// An absolute import of something not parsed in this run
    External,
    /// Relative import escaping the root; also the value before sealing
    #[default]
    Unresolved,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Import {
    pub info: EntityInfo,
    /// Source module as written: `os.path`, `..pkg`, `.`
    pub module: String,
    /// Leading-dot count
    pub level: u32,
    pub names: Vec<ImportedName>,
    pub is_from: bool,
    pub is_wildcard: bool,
    pub resolution: ImportResolution,
}

impl Import {
    /// Module path without the leading dots
    pub fn module_path(&self) -> &str {
        self.module.trim_start_matches('.')
    }

    /// The name `imported` binds in the importing scope.
    ///
    /// `import a.b` binds `a`; `import a.b as c` and `from m import x as c` bind `c`.
    pub fn bound_name<'a>(&self, imported: &'a ImportedName) -> &'a str {
        match &imported.alias {
            Some(alias) => alias.as_str(),
            None if self.is_from => imported.name.as_str(),
            None => imported.name.split('.').next().unwrap_or(&imported.name),
        }
    }

    /// Every `(bound name, imported name)` pair
    pub fn bindings(&self) -> impl Iterator<Item = (&str, &ImportedName)> + '_ {
        self.names.iter().map(|n| (self.bound_name(n), n))
    }
}

// ============================================================================
// Sum type
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum EntityKind {
    Module,
    Class,
    Function,
    Variable,
    Import,
}

impl EntityKind {
    pub fn display(&self) -> &'static str {
        match self {
            EntityKind::Module => "module",
            EntityKind::Class => "class",
            EntityKind::Function => "function",
            EntityKind::Variable => "variable",
            EntityKind::Import => "import",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display())
    }
}

/// Any entity in the registry
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Entity {
    Module(Arc<Module>),
    Class(Arc<Class>),
    Function(Arc<Function>),
    Variable(Arc<Variable>),
    Import(Arc<Import>),
}

impl Entity {
    pub fn info(&self) -> &EntityInfo {
        match self {
            Entity::Module(m) => &m.info,
            Entity::Class(c) => &c.info,
            Entity::Function(f) => &f.info,
            Entity::Variable(v) => &v.info,
            Entity::Import(i) => &i.info,
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Module(_) => EntityKind::Module,
            Entity::Class(_) => EntityKind::Class,
            Entity::Function(_) => EntityKind::Function,
            Entity::Variable(_) => EntityKind::Variable,
            Entity::Import(_) => EntityKind::Import,
        }
    }

    pub fn name(&self) -> &str {
        &self.info().name
    }

    pub fn qualified_name(&self) -> &Arc<str> {
        &self.info().qualified_name
    }

    pub fn location(&self) -> &Location {
        &self.info().location
    }

    pub fn as_module(&self) -> Option<&Arc<Module>> {
        match self {
            Entity::Module(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_class(&self) -> Option<&Arc<Class>> {
        match self {
            Entity::Class(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&Arc<Function>> {
        match self {
            Entity::Function(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_variable(&self) -> Option<&Arc<Variable>> {
        match self {
            Entity::Variable(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_import(&self) -> Option<&Arc<Import>> {
        match self {
            Entity::Import(i) => Some(i),
            _ => None,
        }
    }

    /// Direct children in source order within each kind
    pub fn children(&self) -> Vec<Entity> {
        fn collect(
            imports: &[Arc<Import>],
            variables: &[Arc<Variable>],
            functions: &[Arc<Function>],
            classes: &[Arc<Class>],
        ) -> Vec<Entity> {
            imports
                .iter()
                .cloned()
                .map(Entity::Import)
                .chain(variables.iter().cloned().map(Entity::Variable))
                .chain(functions.iter().cloned().map(Entity::Function))
                .chain(classes.iter().cloned().map(Entity::Class))
                .collect()
        }
        match self {
            Entity::Module(m) => collect(&m.imports, &m.variables, &m.functions, &m.classes),
            Entity::Class(c) => collect(&c.imports, &c.variables, &c.methods, &c.classes),
            Entity::Function(f) => collect(&f.imports, &f.variables, &f.functions, &f.classes),
            Entity::Variable(_) | Entity::Import(_) => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("staticmethod", Some(KnownDecorator::StaticMethod))]
    #[case("abc.abstractmethod", Some(KnownDecorator::AbstractMethod))]
    #[case("dataclass(frozen=True)", Some(KnownDecorator::Dataclass))]
    #[case("typing.overload", Some(KnownDecorator::Overload))]
    #[case("functools.cached_property", Some(KnownDecorator::CachedProperty))]
    #[case("value.setter", Some(KnownDecorator::Setter("value".into())))]
    #[case("value.deleter", Some(KnownDecorator::Deleter("value".into())))]
    #[case("app.route('/')", None)]
    #[case("a.b.setter", None)]
    #[case("lru_cache(maxsize=None)", None)]
    fn test_recognize_decorator(#[case] text: &str, #[case] expected: Option<KnownDecorator>) {
        assert_eq!(KnownDecorator::recognize(text), expected);
    }

    #[rstest]
    #[case(&["Base"], ClassKind::Regular)]
    #[case(&["enum.IntEnum"], ClassKind::Enum)]
    #[case(&["ValueError"], ClassKind::Exception)]
    #[case(&["BaseException"], ClassKind::Exception)]
    #[case(&["typing.Protocol[T]"], ClassKind::Protocol)]
    #[case(&["NamedTuple"], ClassKind::NamedTuple)]
    #[case(&["TypedDict"], ClassKind::TypedDict)]
    fn test_classify_by_base(#[case] bases: &[&str], #[case] expected: ClassKind) {
        let bases: Vec<String> = bases.iter().map(|b| b.to_string()).collect();
        assert_eq!(ClassKind::classify(&bases, &[]), expected);
    }

    #[test]
    fn test_dataclass_decorator_wins() {
        let decorators = vec![Decorator::new("dataclasses.dataclass")];
        assert_eq!(
            ClassKind::classify(&["Base".to_string()], &decorators),
            ClassKind::Dataclass
        );
    }

    fn import(is_from: bool, names: &[(&str, Option<&str>)]) -> Import {
        Import {
            info: EntityInfo {
                name: "x".into(),
                qualified_name: "m.<import#1@L1>".into(),
                parent: Some("m".into()),
                location: Location::new(Arc::from(Path::new("m.py")), Default::default()),
                docstring: None,
                parsed_doc: None,
                decorators: Vec::new(),
                visibility: Visibility::Public,
            },
            module: String::new(),
            level: 0,
            names: names
                .iter()
                .map(|(name, alias)| ImportedName {
                    name: (*name).into(),
                    alias: alias.map(SmolStr::new),
                })
                .collect(),
            is_from,
            is_wildcard: false,
            resolution: ImportResolution::default(),
        }
    }

    #[test]
    fn test_bound_names() {
        let plain = import(false, &[("os.path", None), ("numpy", Some("np"))]);
        let bound: Vec<&str> = plain.bindings().map(|(b, _)| b).collect();
        assert_eq!(bound, vec!["os", "np"]);

        let from = import(true, &[("join", None)]);
        assert_eq!(from.bindings().next().map(|(b, _)| b), Some("join"));
    }
}
