//! Dynamic nodes, scalars, and member descriptors
//!
//! A [`NodeHandle`] is a shared handle to one node of a compared graph.
//! Sharing a handle shares identity: cycle detection and the
//! reference-equality shortcut both key on the allocation address, so a graph
//! with back-references is built by cloning handles and wiring members after
//! construction via [`NodeHandle::set_member`].
//!
//! Mappings use `BTreeMap` so iteration order, and therefore failure order,
//! is deterministic.

use std::cell::{Ref, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use chrono::{DateTime, Utc};
use semblance_core_types::NodeId;

/// Leaf value kinds, used to key per-kind tolerance overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Bool,
    Int,
    UInt,
    Float,
    Text,
    Time,
}

impl ScalarKind {
    /// Stable label used for type-override matching and failure messages.
    pub fn label(&self) -> &'static str {
        match self {
            ScalarKind::Bool => "bool",
            ScalarKind::Int => "int",
            ScalarKind::UInt => "uint",
            ScalarKind::Float => "float",
            ScalarKind::Text => "text",
            ScalarKind::Time => "time",
        }
    }
}

/// A leaf value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(String),
    Time(DateTime<Utc>),
}

impl Scalar {
    pub fn kind(&self) -> ScalarKind {
        match self {
            Scalar::Bool(_) => ScalarKind::Bool,
            Scalar::Int(_) => ScalarKind::Int,
            Scalar::UInt(_) => ScalarKind::UInt,
            Scalar::Float(_) => ScalarKind::Float,
            Scalar::Text(_) => ScalarKind::Text,
            Scalar::Time(_) => ScalarKind::Time,
        }
    }
}

/// The numeric storage of an enum value.
///
/// Different declared enum types may use different underlying widths; the
/// equivalence contract is lossless numeric equality, so a `u64` beyond
/// `i64::MAX` must never equate to a negative signed interpretation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Discriminant {
    Signed(i64),
    Unsigned(u64),
}

impl Discriminant {
    /// Lossless cross-width numeric equality.
    pub fn numeric_eq(self, other: Self) -> bool {
        match (self, other) {
            (Discriminant::Signed(a), Discriminant::Signed(b)) => a == b,
            (Discriminant::Unsigned(a), Discriminant::Unsigned(b)) => a == b,
            (Discriminant::Signed(s), Discriminant::Unsigned(u))
            | (Discriminant::Unsigned(u), Discriminant::Signed(s)) => s >= 0 && s as u64 == u,
        }
    }
}

impl std::fmt::Display for Discriminant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Discriminant::Signed(v) => write!(f, "{}", v),
            Discriminant::Unsigned(v) => write!(f, "{}", v),
        }
    }
}

/// An enumeration value: the declared type name plus its numeric storage.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumValue {
    /// Declared enum type name; rendered in messages, ignored by equivalence
    pub type_name: String,
    /// Numeric storage, possibly of a different width than the other side
    pub discriminant: Discriminant,
}

/// A mapping key. `Ord` so mapping iteration is deterministic.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MapKey {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl std::fmt::Display for MapKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MapKey::Bool(v) => write!(f, "{}", v),
            MapKey::Int(v) => write!(f, "{}", v),
            MapKey::Text(v) => write!(f, "{}", v),
        }
    }
}

impl From<&str> for MapKey {
    fn from(value: &str) -> Self {
        MapKey::Text(value.to_string())
    }
}

impl From<i64> for MapKey {
    fn from(value: i64) -> Self {
        MapKey::Int(value)
    }
}

/// The outcome of reading one member of an object.
///
/// `Failed` materializes "the accessor threw": the comparison reports it as a
/// failure at the member's path instead of aborting traversal.
#[derive(Debug, Clone)]
pub enum MemberAccess {
    Readable(NodeHandle),
    Failed(String),
}

/// One member descriptor of a complex object: name plus access outcome.
#[derive(Debug, Clone)]
pub struct MemberSlot {
    pub name: String,
    pub access: MemberAccess,
}

impl MemberSlot {
    pub fn readable(name: impl Into<String>, value: NodeHandle) -> Self {
        Self {
            name: name.into(),
            access: MemberAccess::Readable(value),
        }
    }

    pub fn failed(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            access: MemberAccess::Failed(error.into()),
        }
    }
}

/// The shape of one node in a compared graph.
#[derive(Debug, Clone)]
pub enum NodeValue {
    /// Null / absent value
    Unit,
    Scalar(Scalar),
    Enum(EnumValue),
    Sequence(Vec<NodeHandle>),
    Mapping(BTreeMap<MapKey, NodeHandle>),
    Object {
        type_name: String,
        members: Vec<MemberSlot>,
    },
}

impl NodeValue {
    /// Coarse shape label for messages ("scalar", "sequence", ...).
    pub fn shape_label(&self) -> &'static str {
        match self {
            NodeValue::Unit => "null",
            NodeValue::Scalar(_) => "scalar",
            NodeValue::Enum(_) => "enum",
            NodeValue::Sequence(_) => "sequence",
            NodeValue::Mapping(_) => "mapping",
            NodeValue::Object { .. } => "object",
        }
    }
}

/// Shared handle to one node of a compared graph.
///
/// Cloning the handle shares the underlying node (and its identity); use the
/// constructors to create distinct nodes.
#[derive(Clone)]
pub struct NodeHandle(Rc<RefCell<NodeValue>>);

// Shallow on purpose: graphs may be cyclic.
impl std::fmt::Debug for NodeHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0.try_borrow() {
            Ok(value) => write!(f, "NodeHandle<{}>", value.shape_label()),
            Err(_) => write!(f, "NodeHandle<borrowed>"),
        }
    }
}

impl NodeHandle {
    pub fn new(value: NodeValue) -> Self {
        Self(Rc::new(RefCell::new(value)))
    }

    pub fn unit() -> Self {
        Self::new(NodeValue::Unit)
    }

    pub fn bool(value: bool) -> Self {
        Self::new(NodeValue::Scalar(Scalar::Bool(value)))
    }

    pub fn int(value: i64) -> Self {
        Self::new(NodeValue::Scalar(Scalar::Int(value)))
    }

    pub fn uint(value: u64) -> Self {
        Self::new(NodeValue::Scalar(Scalar::UInt(value)))
    }

    pub fn float(value: f64) -> Self {
        Self::new(NodeValue::Scalar(Scalar::Float(value)))
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self::new(NodeValue::Scalar(Scalar::Text(value.into())))
    }

    pub fn time(value: DateTime<Utc>) -> Self {
        Self::new(NodeValue::Scalar(Scalar::Time(value)))
    }

    pub fn enumeration(type_name: impl Into<String>, discriminant: Discriminant) -> Self {
        Self::new(NodeValue::Enum(EnumValue {
            type_name: type_name.into(),
            discriminant,
        }))
    }

    pub fn sequence(elements: impl IntoIterator<Item = NodeHandle>) -> Self {
        Self::new(NodeValue::Sequence(elements.into_iter().collect()))
    }

    pub fn mapping(entries: impl IntoIterator<Item = (MapKey, NodeHandle)>) -> Self {
        Self::new(NodeValue::Mapping(entries.into_iter().collect()))
    }

    pub fn object(
        type_name: impl Into<String>,
        members: impl IntoIterator<Item = MemberSlot>,
    ) -> Self {
        Self::new(NodeValue::Object {
            type_name: type_name.into(),
            members: members.into_iter().collect(),
        })
    }

    /// Reference identity of this node (allocation address).
    pub fn id(&self) -> NodeId {
        NodeId::from_address(Rc::as_ptr(&self.0) as usize)
    }

    /// Borrow the node's shape.
    ///
    /// The borrow is short-lived by convention: traversal code clones child
    /// handles out before descending, so no borrow is held across recursion.
    pub fn value(&self) -> Ref<'_, NodeValue> {
        self.0.borrow()
    }

    /// Coarse shape label for messages.
    pub fn shape_label(&self) -> &'static str {
        self.value().shape_label()
    }

    /// Type label used for type-override and value-type matching: the
    /// declared type name for objects and enums, the scalar kind label for
    /// scalars, the shape label otherwise.
    pub fn type_label(&self) -> String {
        match &*self.value() {
            NodeValue::Object { type_name, .. } => type_name.clone(),
            NodeValue::Enum(e) => e.type_name.clone(),
            NodeValue::Scalar(s) => s.kind().label().to_string(),
            other => other.shape_label().to_string(),
        }
    }

    /// Set (or add) an object member after construction. This is how cyclic
    /// graphs are wired: create the object, then point a member back at an
    /// ancestor handle.
    ///
    /// Returns false when this node is not an object.
    pub fn set_member(&self, name: &str, value: NodeHandle) -> bool {
        match &mut *self.0.borrow_mut() {
            NodeValue::Object { members, .. } => {
                if let Some(slot) = members.iter_mut().find(|m| m.name == name) {
                    slot.access = MemberAccess::Readable(value);
                } else {
                    members.push(MemberSlot::readable(name, value));
                }
                true
            }
            _ => false,
        }
    }

    /// Append an element to a sequence node. Returns false otherwise.
    pub fn push_element(&self, value: NodeHandle) -> bool {
        match &mut *self.0.borrow_mut() {
            NodeValue::Sequence(elements) => {
                elements.push(value);
                true
            }
            _ => false,
        }
    }

    /// Insert an entry into a mapping node. Returns false otherwise.
    pub fn insert_entry(&self, key: MapKey, value: NodeHandle) -> bool {
        match &mut *self.0.borrow_mut() {
            NodeValue::Mapping(entries) => {
                entries.insert(key, value);
                true
            }
            _ => false,
        }
    }

    /// Ingest an acyclic JSON document.
    ///
    /// JSON objects become mappings (dictionaries) with text keys, arrays
    /// become sequences, numbers become `Int`/`UInt`/`Float` in that
    /// preference order. Typed complex objects are built with
    /// [`NodeHandle::object`] instead.
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::unit(),
            serde_json::Value::Bool(b) => Self::bool(*b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::int(i)
                } else if let Some(u) = n.as_u64() {
                    Self::uint(u)
                } else {
                    Self::float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Self::text(s.clone()),
            serde_json::Value::Array(items) => Self::sequence(items.iter().map(Self::from_json)),
            serde_json::Value::Object(entries) => Self::mapping(
                entries
                    .iter()
                    .map(|(k, v)| (MapKey::Text(k.clone()), Self::from_json(v))),
            ),
        }
    }
}

impl From<bool> for NodeHandle {
    fn from(value: bool) -> Self {
        Self::bool(value)
    }
}

impl From<i64> for NodeHandle {
    fn from(value: i64) -> Self {
        Self::int(value)
    }
}

impl From<u64> for NodeHandle {
    fn from(value: u64) -> Self {
        Self::uint(value)
    }
}

impl From<f64> for NodeHandle {
    fn from(value: f64) -> Self {
        Self::float(value)
    }
}

impl From<&str> for NodeHandle {
    fn from(value: &str) -> Self {
        Self::text(value)
    }
}

/// Exact structural equality, used when a type is declared atomic by the
/// value-type predicate and for shape-mismatched nodes reaching the fallback
/// step. Unlike equivalence it requires matching type names and matching
/// shapes; like equivalence it is cycle-guarded.
pub fn deep_exact_eq(a: &NodeHandle, b: &NodeHandle) -> bool {
    exact_eq_guarded(a, b, &mut Vec::new())
}

fn exact_eq_guarded(a: &NodeHandle, b: &NodeHandle, visited: &mut Vec<(NodeId, NodeId)>) -> bool {
    if a.id() == b.id() {
        return true;
    }
    let pair = (a.id(), b.id());
    if visited.contains(&pair) {
        // Already being compared further up this branch
        return true;
    }
    visited.push(pair);
    let equal = match (&*a.value(), &*b.value()) {
        (NodeValue::Unit, NodeValue::Unit) => true,
        (NodeValue::Scalar(x), NodeValue::Scalar(y)) => x == y,
        (NodeValue::Enum(x), NodeValue::Enum(y)) => {
            x.type_name == y.type_name && x.discriminant.numeric_eq(y.discriminant)
        }
        (NodeValue::Sequence(xs), NodeValue::Sequence(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .zip(ys.iter())
                    .all(|(x, y)| exact_eq_guarded(x, y, visited))
        }
        (NodeValue::Mapping(xs), NodeValue::Mapping(ys)) => {
            xs.len() == ys.len()
                && xs.iter().zip(ys.iter()).all(|((kx, vx), (ky, vy))| {
                    kx == ky && exact_eq_guarded(vx, vy, visited)
                })
        }
        (
            NodeValue::Object {
                type_name: tx,
                members: mx,
            },
            NodeValue::Object {
                type_name: ty,
                members: my,
            },
        ) => {
            tx == ty
                && mx.len() == my.len()
                && mx.iter().zip(my.iter()).all(|(x, y)| {
                    x.name == y.name
                        && match (&x.access, &y.access) {
                            (MemberAccess::Readable(vx), MemberAccess::Readable(vy)) => {
                                exact_eq_guarded(vx, vy, visited)
                            }
                            _ => false,
                        }
                })
        }
        _ => false,
    };
    visited.pop();
    equal
}
