//! A C++-style type expression: literal type names, template instantiations,
//! pointers/references, and function-pointer types, with `const`/`volatile`/`mutable`
//! qualifiers attached to whichever node they bind to.
//!
//! Grounded on the original scanner's `TypeNode` class hierarchy (`PointerNode`,
//! `ReferenceNode`, `LReferenceNode`, `TemplateNode`, `LiteralNode`, `FunctionNode`), which
//! used virtual dispatch and a `reinterpret_cast`-based visitor. A tagged enum plus `match`
//! gives the same shape without the unsafe downcast.
use crate::json::JsonSink;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Qualifiers {
    pub is_const: bool,
    pub is_volatile: bool,
    pub is_mutable: bool,
}

/// A named argument in a [TypeNode::Function] signature. The name is optional: function
/// pointer types may declare parameters with no name at all.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionArgument {
    pub name: Option<String>,
    pub ty: TypeNode,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeNodeKind {
    /// A bare type name, e.g. `int`, `std::string`.
    Literal(String),
    /// A template instantiation, e.g. `std::vector<int>`.
    Template {
        name: String,
        arguments: Vec<TypeNode>,
    },
    Pointer(Box<TypeNode>),
    Reference(Box<TypeNode>),
    LReference(Box<TypeNode>),
    /// A function (pointer) type: `Ret(*)(Args...)`.
    Function {
        returns: Box<TypeNode>,
        arguments: Vec<FunctionArgument>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeNode {
    pub qualifiers: Qualifiers,
    pub kind: TypeNodeKind,
}

impl TypeNode {
    pub fn literal(name: impl Into<String>) -> Self {
        Self {
            qualifiers: Qualifiers::default(),
            kind: TypeNodeKind::Literal(name.into()),
        }
    }

    pub fn template(name: impl Into<String>, arguments: Vec<TypeNode>) -> Self {
        Self {
            qualifiers: Qualifiers::default(),
            kind: TypeNodeKind::Template {
                name: name.into(),
                arguments,
            },
        }
    }

    pub fn pointer(base: TypeNode) -> Self {
        Self {
            qualifiers: Qualifiers::default(),
            kind: TypeNodeKind::Pointer(Box::new(base)),
        }
    }

    pub fn reference(base: TypeNode) -> Self {
        Self {
            qualifiers: Qualifiers::default(),
            kind: TypeNodeKind::Reference(Box::new(base)),
        }
    }

    pub fn lreference(base: TypeNode) -> Self {
        Self {
            qualifiers: Qualifiers::default(),
            kind: TypeNodeKind::LReference(Box::new(base)),
        }
    }

    pub fn function(returns: TypeNode, arguments: Vec<FunctionArgument>) -> Self {
        Self {
            qualifiers: Qualifiers::default(),
            kind: TypeNodeKind::Function {
                returns: Box::new(returns),
                arguments,
            },
        }
    }

    /// Write this node as a JSON object: the qualifier flags (only present when set),
    /// followed by a `type` discriminant and the node's own fields.
    pub fn write(&self, sink: &mut dyn JsonSink) {
        sink.start_object();
        if self.qualifiers.is_const {
            sink.key("const");
            sink.bool(true);
        }
        if self.qualifiers.is_mutable {
            sink.key("mutable");
            sink.bool(true);
        }
        if self.qualifiers.is_volatile {
            sink.key("volatile");
            sink.bool(true);
        }

        match &self.kind {
            TypeNodeKind::Literal(name) => {
                sink.key("type");
                sink.string("literal");
                sink.key("name");
                sink.string(name);
            }
            TypeNodeKind::Template { name, arguments } => {
                sink.key("type");
                sink.string("template");
                sink.key("name");
                sink.string(name);
                sink.key("arguments");
                sink.start_array();
                for arg in arguments {
                    arg.write(sink);
                }
                sink.end_array();
            }
            TypeNodeKind::Pointer(base) => {
                sink.key("type");
                sink.string("pointer");
                sink.key("baseType");
                base.write(sink);
            }
            TypeNodeKind::Reference(base) => {
                sink.key("type");
                sink.string("reference");
                sink.key("baseType");
                base.write(sink);
            }
            TypeNodeKind::LReference(base) => {
                sink.key("type");
                sink.string("lreference");
                sink.key("baseType");
                base.write(sink);
            }
            TypeNodeKind::Function { returns, arguments } => {
                sink.key("type");
                sink.string("function");
                sink.key("returnType");
                returns.write(sink);
                sink.key("arguments");
                sink.start_array();
                for arg in arguments {
                    sink.start_object();
                    if let Some(name) = &arg.name {
                        sink.key("name");
                        sink.string(name);
                    }
                    sink.key("type");
                    arg.ty.write(sink);
                    sink.end_object();
                }
                sink.end_array();
            }
        }

        sink.end_object();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json::ValueSink;

    #[test]
    fn literal_writes_name_and_type() {
        let node = TypeNode::literal("int");
        let mut sink = ValueSink::new();
        node.write(&mut sink);
        let value = sink.into_value().unwrap();
        assert_eq!(value["type"], "literal");
        assert_eq!(value["name"], "int");
    }

    #[test]
    fn pointer_to_const_template_nests_base_type() {
        let mut inner = TypeNode::template("vector", vec![TypeNode::literal("int")]);
        inner.qualifiers.is_const = true;
        let node = TypeNode::pointer(inner);

        let mut sink = ValueSink::new();
        node.write(&mut sink);
        let value = sink.into_value().unwrap();

        assert_eq!(value["type"], "pointer");
        let base = &value["baseType"];
        assert_eq!(base["type"], "template");
        assert_eq!(base["const"], true);
        assert_eq!(base["arguments"][0]["name"], "int");
    }

    #[test]
    fn function_argument_names_are_optional() {
        let node = TypeNode::function(
            TypeNode::literal("void"),
            vec![
                FunctionArgument {
                    name: Some("count".to_string()),
                    ty: TypeNode::literal("int"),
                },
                FunctionArgument {
                    name: None,
                    ty: TypeNode::pointer(TypeNode::literal("char")),
                },
            ],
        );
        let mut sink = ValueSink::new();
        node.write(&mut sink);
        let value = sink.into_value().unwrap();

        assert_eq!(value["arguments"][0]["name"], "count");
        assert!(value["arguments"][1].get("name").is_none());
    }
}
