use std::fmt::Display;

use crate::KdlValue;

/// A positional argument on a node: a value plus an optional `(tag)` type
/// annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct KdlArg {
    pub(crate) value: KdlValue,
    pub(crate) ty: Option<String>,
}

impl KdlArg {
    pub(crate) fn new(value: KdlValue, ty: Option<String>) -> Self {
        KdlArg { value, ty }
    }

    /// Gets the argument's value.
    pub fn value(&self) -> &KdlValue {
        &self.value
    }

    /// Gets the argument's type annotation, if any.
    pub fn ty(&self) -> Option<&str> {
        self.ty.as_deref()
    }
}

impl Display for KdlArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ty) = &self.ty {
            write!(f, "({})", ty)?;
        }
        write!(f, "{}", self.value)
    }
}

impl<T> From<T> for KdlArg
where
    T: Into<KdlValue>,
{
    fn from(value: T) -> Self {
        KdlArg::new(value.into(), None)
    }
}

/// A named property on a node: `name=value`, where both the name and the
/// value may carry their own `(tag)` type annotations.
///
/// Duplicate property names are preserved in insertion order; the tree does
/// not collapse them.
#[derive(Debug, Clone, PartialEq)]
pub struct KdlProp {
    pub(crate) name: String,
    pub(crate) ty: Option<String>,
    pub(crate) value: KdlValue,
    pub(crate) value_ty: Option<String>,
}

impl KdlProp {
    pub(crate) fn new(
        name: String,
        ty: Option<String>,
        value: KdlValue,
        value_ty: Option<String>,
    ) -> Self {
        KdlProp {
            name,
            ty,
            value,
            value_ty,
        }
    }

    /// Gets the property's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the type annotation on the property's name, if any.
    pub fn ty(&self) -> Option<&str> {
        self.ty.as_deref()
    }

    /// Gets the property's value.
    pub fn value(&self) -> &KdlValue {
        &self.value
    }

    /// Gets the type annotation on the property's value, if any.
    pub fn value_ty(&self) -> Option<&str> {
        self.value_ty.as_deref()
    }
}

impl Display for KdlProp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ty) = &self.ty {
            write!(f, "({})", ty)?;
        }
        crate::node::write_ident(f, &self.name)?;
        write!(f, "=")?;
        if let Some(ty) = &self.value_ty {
            write!(f, "({})", ty)?;
        }
        write!(f, "{}", self.value)
    }
}

impl<K, V> From<(K, V)> for KdlProp
where
    K: Into<String>,
    V: Into<KdlValue>,
{
    fn from((name, value): (K, V)) -> Self {
        KdlProp::new(name.into(), None, value.into(), None)
    }
}
