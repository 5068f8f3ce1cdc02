//! The Shape model: a closed description of Go type declarations.
//!
//! Shapes are built once per inferred file and never mutated afterwards.
//! References to named types are always `RefName` indirections, so cyclic
//! type graphs stay representable as finite trees.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::guard::Guard;
use crate::tags::Tags;

/// A structural description of a Go type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "$type")]
pub enum Shape {
    Any,
    RefName(RefName),
    AliasLike(AliasLike),
    PrimitiveLike(PrimitiveLike),
    ListLike(ListLike),
    MapLike(MapLike),
    PointerLike(PointerLike),
    StructLike(StructLike),
    UnionLike(UnionLike),
}

/// Reference to a named type, possibly instantiated with type arguments.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RefName {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub pkg_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub pkg_import_name: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_pointer: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub indexed: Vec<Shape>,
}

/// A named rename of another shape: `type A = B` or `type A B`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasLike {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub pkg_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub pkg_import_name: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_alias: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_params: Vec<TypeParam>,
    pub target: Box<Shape>,
    #[serde(default, skip_serializing_if = "Tags::is_empty")]
    pub tags: Tags,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrimitiveLike {
    pub kind: PrimitiveKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    Boolean,
    String,
    Number(NumberKind),
}

/// Numeric kinds. `Int` and `UInt` are the platform-sized Go kinds and
/// serialize as 64-bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumberKind {
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
}

impl NumberKind {
    pub fn go_name(self) -> &'static str {
        match self {
            NumberKind::Int => "int",
            NumberKind::Int8 => "int8",
            NumberKind::Int16 => "int16",
            NumberKind::Int32 => "int32",
            NumberKind::Int64 => "int64",
            NumberKind::UInt => "uint",
            NumberKind::UInt8 => "uint8",
            NumberKind::UInt16 => "uint16",
            NumberKind::UInt32 => "uint32",
            NumberKind::UInt64 => "uint64",
            NumberKind::Float32 => "float32",
            NumberKind::Float64 => "float64",
        }
    }

    pub fn is_float(self) -> bool {
        matches!(self, NumberKind::Float32 | NumberKind::Float64)
    }

    pub fn is_unsigned(self) -> bool {
        matches!(
            self,
            NumberKind::UInt
                | NumberKind::UInt8
                | NumberKind::UInt16
                | NumberKind::UInt32
                | NumberKind::UInt64
        )
    }

    /// Width in bits; platform kinds report 64.
    pub fn bits(self) -> u32 {
        match self {
            NumberKind::Int8 | NumberKind::UInt8 => 8,
            NumberKind::Int16 | NumberKind::UInt16 => 16,
            NumberKind::Int32 | NumberKind::UInt32 | NumberKind::Float32 => 32,
            _ => 64,
        }
    }
}

impl PrimitiveKind {
    /// Resolve a Go predeclared type keyword.
    pub fn from_go(keyword: &str) -> Option<Self> {
        let kind = match keyword {
            "bool" => PrimitiveKind::Boolean,
            "string" => PrimitiveKind::String,
            "int" => PrimitiveKind::Number(NumberKind::Int),
            "int8" => PrimitiveKind::Number(NumberKind::Int8),
            "int16" => PrimitiveKind::Number(NumberKind::Int16),
            "int32" | "rune" => PrimitiveKind::Number(NumberKind::Int32),
            "int64" => PrimitiveKind::Number(NumberKind::Int64),
            "uint" => PrimitiveKind::Number(NumberKind::UInt),
            "uint8" | "byte" => PrimitiveKind::Number(NumberKind::UInt8),
            "uint16" => PrimitiveKind::Number(NumberKind::UInt16),
            "uint32" => PrimitiveKind::Number(NumberKind::UInt32),
            "uint64" => PrimitiveKind::Number(NumberKind::UInt64),
            "float32" => PrimitiveKind::Number(NumberKind::Float32),
            "float64" => PrimitiveKind::Number(NumberKind::Float64),
            _ => return None,
        };
        Some(kind)
    }

    pub fn go_name(self) -> &'static str {
        match self {
            PrimitiveKind::Boolean => "bool",
            PrimitiveKind::String => "string",
            PrimitiveKind::Number(n) => n.go_name(),
        }
    }
}

/// Ordered homogeneous sequence; `array_len` is set for fixed-size arrays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListLike {
    pub element: Box<Shape>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub element_is_pointer: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub array_len: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapLike {
    pub key: Box<Shape>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub key_is_pointer: bool,
    pub value: Box<Shape>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub value_is_pointer: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointerLike {
    pub inner: Box<Shape>,
}

/// Named product type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructLike {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub pkg_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub pkg_import_name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_params: Vec<TypeParam>,
    #[serde(default)]
    pub fields: Vec<FieldLike>,
    #[serde(default, skip_serializing_if = "Tags::is_empty")]
    pub tags: Tags,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldLike {
    pub name: String,
    pub shape: Shape,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guard: Option<Guard>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_pointer: bool,
    #[serde(default, skip_serializing_if = "Tags::is_empty")]
    pub tags: Tags,
}

/// Named sum type over its variants, normally `StructLike`s.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnionLike {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub pkg_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub pkg_import_name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_params: Vec<TypeParam>,
    #[serde(default)]
    pub variants: Vec<Shape>,
    #[serde(default, skip_serializing_if = "Tags::is_empty")]
    pub tags: Tags,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeParam {
    pub name: String,
    pub constraint: Shape,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl Shape {
    pub fn primitive(kind: PrimitiveKind) -> Self {
        Shape::PrimitiveLike(PrimitiveLike { kind })
    }

    pub fn string() -> Self {
        Self::primitive(PrimitiveKind::String)
    }

    pub fn boolean() -> Self {
        Self::primitive(PrimitiveKind::Boolean)
    }

    pub fn number(kind: NumberKind) -> Self {
        Self::primitive(PrimitiveKind::Number(kind))
    }

    pub fn list(element: Shape) -> Self {
        let element_is_pointer = element.is_pointer();
        Shape::ListLike(ListLike {
            element: Box::new(element),
            element_is_pointer,
            array_len: None,
        })
    }

    pub fn map(key: Shape, value: Shape) -> Self {
        Shape::MapLike(MapLike {
            key_is_pointer: key.is_pointer(),
            value_is_pointer: value.is_pointer(),
            key: Box::new(key),
            value: Box::new(value),
        })
    }

    pub fn pointer(inner: Shape) -> Self {
        Shape::PointerLike(PointerLike {
            inner: Box::new(inner),
        })
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Shape::RefName(x) => Some(&x.name),
            Shape::AliasLike(x) => Some(&x.name),
            Shape::StructLike(x) => Some(&x.name),
            Shape::UnionLike(x) => Some(&x.name),
            _ => None,
        }
    }

    pub fn pkg_name(&self) -> Option<&str> {
        match self {
            Shape::RefName(x) => Some(&x.pkg_name),
            Shape::AliasLike(x) => Some(&x.pkg_name),
            Shape::StructLike(x) => Some(&x.pkg_name),
            Shape::UnionLike(x) => Some(&x.pkg_name),
            _ => None,
        }
    }

    pub fn pkg_import_name(&self) -> Option<&str> {
        match self {
            Shape::RefName(x) => Some(&x.pkg_import_name),
            Shape::AliasLike(x) => Some(&x.pkg_import_name),
            Shape::StructLike(x) => Some(&x.pkg_import_name),
            Shape::UnionLike(x) => Some(&x.pkg_import_name),
            _ => None,
        }
    }

    /// `import/path.Name`, or just `Name` when the import path is unknown.
    pub fn full_name(&self) -> Option<String> {
        let name = self.name()?;
        let import = self.pkg_import_name().unwrap_or_default();
        Some(full_name(import, name))
    }

    pub fn is_named(&self) -> bool {
        self.name().is_some()
    }

    pub fn is_pointer(&self) -> bool {
        match self {
            Shape::PointerLike(_) => true,
            Shape::RefName(x) => x.is_pointer,
            _ => false,
        }
    }

    /// Strip one level of `PointerLike`.
    pub fn unwrap_pointer(&self) -> &Shape {
        match self {
            Shape::PointerLike(p) => &p.inner,
            other => other,
        }
    }

    pub fn type_params(&self) -> &[TypeParam] {
        match self {
            Shape::AliasLike(x) => &x.type_params,
            Shape::StructLike(x) => &x.type_params,
            Shape::UnionLike(x) => &x.type_params,
            _ => &[],
        }
    }

    pub fn tags(&self) -> Option<&Tags> {
        match self {
            Shape::AliasLike(x) => Some(&x.tags),
            Shape::StructLike(x) => Some(&x.tags),
            Shape::UnionLike(x) => Some(&x.tags),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&StructLike> {
        match self {
            Shape::StructLike(x) => Some(x),
            _ => None,
        }
    }

    pub fn as_union(&self) -> Option<&UnionLike> {
        match self {
            Shape::UnionLike(x) => Some(x),
            _ => None,
        }
    }

    pub fn as_ref_name(&self) -> Option<&RefName> {
        match self {
            Shape::RefName(x) => Some(x),
            _ => None,
        }
    }

    /// A reference to this named shape, instantiated with its own type
    /// parameter names.
    pub fn to_ref(&self) -> Option<RefName> {
        let name = self.name()?;
        Some(RefName {
            name: name.to_string(),
            pkg_name: self.pkg_name().unwrap_or_default().to_string(),
            pkg_import_name: self.pkg_import_name().unwrap_or_default().to_string(),
            is_pointer: false,
            indexed: self
                .type_params()
                .iter()
                .map(|p| Shape::RefName(RefName::new(&p.name)))
                .collect(),
        })
    }
}

pub fn full_name(import: &str, name: &str) -> String {
    if import.is_empty() {
        name.to_string()
    } else {
        format!("{import}.{name}")
    }
}

impl RefName {
    /// Unqualified reference, e.g. to a type parameter.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn in_package(mut self, pkg_name: impl Into<String>, import: impl Into<String>) -> Self {
        self.pkg_name = pkg_name.into();
        self.pkg_import_name = import.into();
        self
    }

    pub fn with_indexed(mut self, indexed: Vec<Shape>) -> Self {
        self.indexed = indexed;
        self
    }

    pub fn full_name(&self) -> String {
        full_name(&self.pkg_import_name, &self.name)
    }

    /// Whether this reference names the given declaration.
    ///
    /// A reference without a package resolves in the declaring scope.
    pub fn refers_to(&self, name: &str, pkg_name: &str, import: &str) -> bool {
        if self.name != name {
            return false;
        }
        if self.pkg_import_name.is_empty() || import.is_empty() {
            return self.pkg_name.is_empty() || self.pkg_name == pkg_name;
        }
        self.pkg_import_name == import
    }
}

impl StructLike {
    pub fn field(&self, name: &str) -> Option<&FieldLike> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn full_name(&self) -> String {
        full_name(&self.pkg_import_name, &self.name)
    }
}

impl UnionLike {
    pub fn variant_names(&self) -> Vec<&str> {
        self.variants.iter().filter_map(Shape::name).collect()
    }

    pub fn full_name(&self) -> String {
        full_name(&self.pkg_import_name, &self.name)
    }

    pub fn type_param_names(&self) -> Vec<&str> {
        self.type_params.iter().map(|p| p.name.as_str()).collect()
    }

    /// Check that the union can be generated: at least one variant, every
    /// variant named once, and variant type params matching the union's.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.variants.is_empty() {
            return Err(ConfigError::EmptyUnion {
                union: self.name.clone(),
            });
        }

        let expected = self.type_param_names();
        let mut seen = std::collections::HashSet::new();
        for variant in &self.variants {
            let Some(name) = variant.name() else {
                return Err(ConfigError::UnnamedVariant {
                    union: self.name.clone(),
                    variant: variant.to_string(),
                });
            };
            if !seen.insert(name) {
                return Err(ConfigError::DuplicateVariant {
                    union: self.name.clone(),
                    variant: name.to_string(),
                });
            }

            let found: Vec<&str> = variant.type_params().iter().map(|p| p.name.as_str()).collect();
            if found != expected {
                return Err(ConfigError::TypeParamMismatch {
                    union: self.name.clone(),
                    variant: name.to_string(),
                    expected: expected.join(", "),
                    found: found.join(", "),
                });
            }
        }

        Ok(())
    }
}

impl AliasLike {
    pub fn full_name(&self) -> String {
        full_name(&self.pkg_import_name, &self.name)
    }
}

impl FieldLike {
    pub fn new(name: impl Into<String>, shape: Shape) -> Self {
        Self {
            name: name.into(),
            is_pointer: shape.is_pointer(),
            shape,
            desc: None,
            guard: None,
            tags: Tags::default(),
        }
    }
}

impl TypeParam {
    /// A type parameter constrained by `any`.
    pub fn any(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            constraint: Shape::Any,
        }
    }
}
