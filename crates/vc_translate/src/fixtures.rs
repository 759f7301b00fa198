//! Host types shared by the unit tests.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::Any;
use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};

use crate::TranslateError;
use crate::info::{Describe, Instance, Slot, TypeDesc};
use crate::source::{EnumShape, GetTypeShape, ObjectShape, Symbolic, TypeShape, TypeTable};

// -----------------------------------------------------------------------------
// Plain objects

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

crate::impl_slot!(Point);

impl GetTypeShape for Point {
    fn type_shape() -> TypeShape {
        ObjectShape::builder::<Self>("Point")
            .field("x", |p| &p.x, |p| &mut p.x)
            .field("y", |p| &p.y, |p| &mut p.y)
            .build()
            .into()
    }
}

/// Only `known` is a member.
#[derive(Debug, Default, PartialEq)]
pub struct Known {
    pub known: i32,
}

crate::impl_slot!(Known);

impl GetTypeShape for Known {
    fn type_shape() -> TypeShape {
        ObjectShape::builder::<Self>("Known")
            .field("known", |k| &k.known, |k| &mut k.known)
            .build()
            .into()
    }
}

/// `len` is derived after construction and never crosses the wire.
#[derive(Debug, Default, PartialEq)]
pub struct Span {
    pub start: i32,
    pub end: i32,
    pub len: i32,
}

crate::impl_slot!(Span);

impl GetTypeShape for Span {
    fn type_shape() -> TypeShape {
        ObjectShape::builder::<Self>("Span")
            .field("start", |s| &s.start, |s| &mut s.start)
            .field("end", |s| &s.end, |s| &mut s.end)
            .post_construct(|s| s.len = s.end - s.start)
            .validate(|s| {
                if s.start <= s.end {
                    Ok(())
                } else {
                    Err(alloc::format!("start {} is after end {}", s.start, s.end))
                }
            })
            .build()
            .into()
    }
}

#[derive(Debug, Default, PartialEq)]
pub struct Ack {
    pub id: u32,
    pub payload: (),
}

crate::impl_slot!(Ack);

impl GetTypeShape for Ack {
    fn type_shape() -> TypeShape {
        ObjectShape::builder::<Self>("Ack")
            .field("id", |a| &a.id, |a| &mut a.id)
            .field("payload", |a| &a.payload, |a| &mut a.payload)
            .build()
            .into()
    }
}

// -----------------------------------------------------------------------------
// Enum

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Color {
    #[default]
    Red,
    Green,
    Blue,
}

crate::impl_slot!(Color);

impl Symbolic for Color {
    const SYMBOLS: &'static [&'static str] = &["RED", "GREEN", "BLUE"];

    fn symbol(&self) -> &'static str {
        match self {
            Self::Red => "RED",
            Self::Green => "GREEN",
            Self::Blue => "BLUE",
        }
    }

    fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "RED" => Some(Self::Red),
            "GREEN" => Some(Self::Green),
            "BLUE" => Some(Self::Blue),
            _ => None,
        }
    }
}

impl GetTypeShape for Color {
    fn type_shape() -> TypeShape {
        EnumShape::of::<Self>("Color").into()
    }
}

// -----------------------------------------------------------------------------
// Cycles

/// Refers to itself directly.
#[derive(Debug, Default, PartialEq)]
pub struct Node {
    pub label: String,
    pub next: Option<Box<Node>>,
}

crate::impl_slot!(Node);

impl GetTypeShape for Node {
    fn type_shape() -> TypeShape {
        ObjectShape::builder::<Self>("Node")
            .field("label", |n| &n.label, |n| &mut n.label)
            .field("next", |n| &n.next, |n| &mut n.next)
            .build()
            .into()
    }
}

/// Refers to itself through [`Child`].
#[derive(Debug, Default, PartialEq)]
pub struct Parent {
    pub name: String,
    pub child: Option<Box<Child>>,
}

#[derive(Debug, Default, PartialEq)]
pub struct Child {
    pub name: String,
    pub parent: Option<Box<Parent>>,
}

crate::impl_slot!(Parent, Child);

impl GetTypeShape for Parent {
    fn type_shape() -> TypeShape {
        ObjectShape::builder::<Self>("Parent")
            .field("name", |p| &p.name, |p| &mut p.name)
            .field("child", |p| &p.child, |p| &mut p.child)
            .build()
            .into()
    }

    fn register_dependencies(table: &mut TypeTable) {
        table.register::<Child>();
    }
}

impl GetTypeShape for Child {
    fn type_shape() -> TypeShape {
        ObjectShape::builder::<Self>("Child")
            .field("name", |c| &c.name, |c| &mut c.name)
            .field("parent", |c| &c.parent, |c| &mut c.parent)
            .build()
            .into()
    }

    fn register_dependencies(table: &mut TypeTable) {
        table.register::<Parent>();
    }
}

// -----------------------------------------------------------------------------
// Polymorphism

#[derive(Debug, Default, Clone, PartialEq)]
pub struct A {
    pub n: i32,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct B {
    pub label: String,
}

crate::impl_slot!(A, B);

impl GetTypeShape for A {
    fn type_shape() -> TypeShape {
        ObjectShape::builder::<Self>("A")
            .field("n", |a| &a.n, |a| &mut a.n)
            .build()
            .into()
    }
}

impl GetTypeShape for B {
    fn type_shape() -> TypeShape {
        ObjectShape::builder::<Self>("B")
            .field("label", |b| &b.label, |b| &mut b.label)
            .build()
            .into()
    }
}

/// A value declared over the alternatives {[`A`], [`B`]}.
#[derive(Debug, Clone, PartialEq)]
pub enum Pet {
    A(A),
    B(B),
}

impl Slot for Pet {
    fn peek(&self) -> Option<&dyn Any> {
        match self {
            Self::A(a) => Some(a),
            Self::B(b) => Some(b),
        }
    }

    fn fill(value: Option<Instance>) -> Result<Self, TranslateError> {
        let value = value.ok_or(TranslateError::UnexpectedNull { expected: "Pet" })?;
        let value = match value.downcast::<A>() {
            Ok(a) => return Ok(Self::A(*a)),
            Err(value) => value,
        };
        match value.downcast::<B>() {
            Ok(b) => Ok(Self::B(*b)),
            Err(_) => Err(TranslateError::WrongType { expected: "Pet" }),
        }
    }
}

impl Describe for Pet {
    fn type_desc() -> TypeDesc {
        TypeDesc::union([A::type_desc(), B::type_desc()])
    }
}

#[derive(Debug, Default, PartialEq)]
pub struct Owner {
    pub pet: Option<Pet>,
    pub pets: Vec<Pet>,
}

crate::impl_slot!(Owner);

impl GetTypeShape for Owner {
    fn type_shape() -> TypeShape {
        ObjectShape::builder::<Self>("Owner")
            .field("pet", |o| &o.pet, |o| &mut o.pet)
            .field("pets", |o| &o.pets, |o| &mut o.pets)
            .build()
            .into()
    }

    fn register_dependencies(table: &mut TypeTable) {
        table.register::<A>();
        table.register::<B>();
    }
}

// -----------------------------------------------------------------------------
// Containers

#[derive(Debug, Default, PartialEq)]
pub struct Zoo {
    pub tags: Vec<String>,
    pub queue: VecDeque<u8>,
    pub colors: BTreeSet<Color>,
    pub labels: BTreeMap<u32, String>,
    pub counts: HashMap<String, i64>,
    pub corners: [Point; 2],
}

crate::impl_slot!(Zoo);

impl GetTypeShape for Zoo {
    fn type_shape() -> TypeShape {
        ObjectShape::builder::<Self>("Zoo")
            .field("tags", |z| &z.tags, |z| &mut z.tags)
            .field("queue", |z| &z.queue, |z| &mut z.queue)
            .field("colors", |z| &z.colors, |z| &mut z.colors)
            .field("labels", |z| &z.labels, |z| &mut z.labels)
            .field("counts", |z| &z.counts, |z| &mut z.counts)
            .field("corners", |z| &z.corners, |z| &mut z.corners)
            .build()
            .into()
    }

    fn register_dependencies(table: &mut TypeTable) {
        table.register::<Color>();
        table.register::<Point>();
    }
}

// -----------------------------------------------------------------------------
// Table

/// A table with every fixture registered.
pub fn table() -> TypeTable {
    let mut table = TypeTable::new();
    table.register::<Point>();
    table.register::<Known>();
    table.register::<Span>();
    table.register::<Ack>();
    table.register::<Color>();
    table.register::<Node>();
    table.register::<Parent>();
    table.register::<Owner>();
    table.register::<Zoo>();
    table
}
