use std::{
    fmt::{self, Debug, Display},
    hash::{Hash, Hasher},
    rc::Rc,
};

/// The base kinds of the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseType {
    Int,
    Bool,
    Str,
    Void,
}

impl Display for BaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BaseType::Int => write!(f, "int"),
            BaseType::Bool => write!(f, "bool"),
            BaseType::Str => write!(f, "string"),
            BaseType::Void => write!(f, "void"),
        }
    }
}

/// A base kind plus an indirection depth.
///
/// Depth 0 is a plain value, depth N is a pointer to the same base at depth N-1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrimitiveType {
    base: BaseType,
    depth: usize,
}

impl PrimitiveType {
    pub fn base(&self) -> BaseType {
        self.base
    }

    pub fn depth(&self) -> usize {
        self.depth
    }
}

/// An ordered list of component types.
///
/// Used for formal parameter lists and argument lists, never as the type
/// of a value.
#[derive(Debug)]
pub struct TupleType {
    elements: Vec<Type>,
}

impl TupleType {
    pub fn elements(&self) -> &[Type] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// The type of a function: its formals tuple and its return type.
#[derive(Debug)]
pub struct FunctionType {
    formals: Type,
    return_type: Type,
}

impl FunctionType {
    /// The formals tuple.
    pub fn formals(&self) -> &Type {
        &self.formals
    }

    /// The formal types in declaration order.
    pub fn formal_types(&self) -> &[Type] {
        match self.formals.as_tuple() {
            Some(tuple) => tuple.elements(),
            None => &[],
        }
    }

    pub fn return_type(&self) -> &Type {
        &self.return_type
    }
}

/// The concrete shape behind a `Type` handle.
#[derive(Debug)]
pub enum DataType {
    Primitive(PrimitiveType),
    Tuple(TupleType),
    Function(FunctionType),
    Error,
}

/// Handle to an interned type.
///
/// Equality and hashing use the identity of the shared instance, so two
/// handles compare equal iff the `TypeTable` produced them for the same
/// logical type. Handles from different tables never compare equal.
#[derive(Clone)]
pub struct Type(Rc<DataType>);

impl Type {
    pub(super) fn primitive(base: BaseType, depth: usize) -> Self {
        Type(Rc::new(DataType::Primitive(PrimitiveType { base, depth })))
    }

    pub(super) fn tuple(elements: Vec<Type>) -> Self {
        Type(Rc::new(DataType::Tuple(TupleType { elements })))
    }

    pub(super) fn function(formals: Type, return_type: Type) -> Self {
        Type(Rc::new(DataType::Function(FunctionType {
            formals,
            return_type,
        })))
    }

    pub(super) fn error() -> Self {
        Type(Rc::new(DataType::Error))
    }

    pub fn data(&self) -> &DataType {
        &self.0
    }

    pub fn as_primitive(&self) -> Option<&PrimitiveType> {
        match &*self.0 {
            DataType::Primitive(primitive) => Some(primitive),
            _ => None,
        }
    }

    pub fn as_tuple(&self) -> Option<&TupleType> {
        match &*self.0 {
            DataType::Tuple(tuple) => Some(tuple),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&FunctionType> {
        match &*self.0 {
            DataType::Function(function) => Some(function),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(&*self.0, DataType::Error)
    }

    pub fn is_function(&self) -> bool {
        self.as_function().is_some()
    }

    pub fn is_void(&self) -> bool {
        self.is_plain(BaseType::Void)
    }

    pub fn is_int(&self) -> bool {
        self.is_plain(BaseType::Int)
    }

    pub fn is_bool(&self) -> bool {
        self.is_plain(BaseType::Bool)
    }

    /// True for any primitive with depth > 0, including pointers to void.
    pub fn is_pointer(&self) -> bool {
        self.as_primitive().is_some_and(|primitive| primitive.depth > 0)
    }

    fn is_plain(&self, base: BaseType) -> bool {
        self.as_primitive()
            .is_some_and(|primitive| primitive.depth == 0 && primitive.base == base)
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Type {}

impl Hash for Type {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(Rc::as_ptr(&self.0), state)
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.0 {
            DataType::Primitive(primitive) => {
                write!(f, "{}{}", primitive.base, "@".repeat(primitive.depth))
            }
            DataType::Tuple(tuple) => {
                for (index, element) in tuple.elements.iter().enumerate() {
                    if index > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", element)?;
                }
                Ok(())
            }
            DataType::Function(function) => {
                write!(f, "{}->{}", function.formals, function.return_type)
            }
            DataType::Error => write!(f, "ERROR"),
        }
    }
}

impl Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Type({})", self)
    }
}
