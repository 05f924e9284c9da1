//! Types and traits for the raw PLY API.
//!
//! These are the low level building blocks of the decoder: the header
//! definitions of elements and properties, dynamically typed property values
//! and the [`RawSink`] trait that receives decoded records. The high level
//! API (decoding straight into a [`Mesh`][crate::Mesh]) is built on top of
//! them, but you can implement [`RawSink`] yourself if you need access to
//! elements or properties the mesh doesn't model.

use smallvec::SmallVec;

use crate::io::Error;
use super::scalar::{Scalar, ScalarType};


// ===========================================================================
// ===== Header definitions
// ===========================================================================

/// The header definition of one element group.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementDef {
    pub name: String,

    /// Number of elements in this group.
    pub count: u64,

    /// Definitions for all properties of elements in this group, in the order
    /// in which they are stored in the body.
    pub property_defs: Vec<PropertyDef>,
}

impl ElementDef {
    /// Returns the index of the property with the given name.
    pub fn prop_pos(&self, prop_name: &str) -> Option<usize> {
        self.property_defs.iter().position(|p| p.name == prop_name)
    }
}

/// The header definition of one property of an element.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDef {
    pub ty: PropertyType,

    /// The property name, after the name mapping of the
    /// [`Config`][super::Config] was applied.
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyType {
    Scalar(ScalarType),
    List {
        len_type: ScalarType,
        scalar_type: ScalarType,
    },
}

impl PropertyType {
    pub fn len_type(&self) -> Option<ScalarType> {
        match self {
            PropertyType::Scalar(_) => None,
            PropertyType::List { len_type, .. } => Some(*len_type),
        }
    }

    pub fn scalar_type(&self) -> ScalarType {
        match *self {
            PropertyType::Scalar(scalar_type) => scalar_type,
            PropertyType::List { scalar_type, .. } => scalar_type,
        }
    }

    pub fn is_list(&self) -> bool {
        self.len_type().is_some()
    }
}


// ===========================================================================
// ===== Property values and records
// ===========================================================================

/// One property value.
///
/// The inline size of the list is chosen so that the most common list, the
/// three or four `vertex_indices` of a face, doesn't allocate.
#[derive(Debug, Clone, PartialEq)]
pub enum Property {
    Scalar(Scalar),
    List(SmallVec<[Scalar; 4]>),
}

impl Property {
    /// Returns the value if this is a scalar property.
    pub fn as_scalar(&self) -> Option<Scalar> {
        match self {
            Property::Scalar(v) => Some(*v),
            Property::List(_) => None,
        }
    }

    /// Returns the items if this is a list property.
    pub fn as_list(&self) -> Option<&[Scalar]> {
        match self {
            Property::Scalar(_) => None,
            Property::List(list) => Some(list),
        }
    }
}

/// One decoded element: the property values of one element instance together
/// with the definition describing them.
///
/// Records only live for the duration of a [`RawSink::element`] call; the
/// decoder reuses the underlying storage for the next element.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    def: &'a ElementDef,
    props: &'a [Property],
}

impl<'a> Record<'a> {
    pub(crate) fn new(def: &'a ElementDef, props: &'a [Property]) -> Self {
        debug_assert_eq!(def.property_defs.len(), props.len());
        Self { def, props }
    }

    /// The definition of the element group this record belongs to.
    pub fn def(&self) -> &'a ElementDef {
        self.def
    }

    /// Returns the value of the property with the given name.
    pub fn get(&self, name: &str) -> Option<&'a Property> {
        self.def.prop_pos(name).map(|idx| &self.props[idx])
    }

    /// Returns the value of the `idx`-th property. Panics if `idx` is out of
    /// bounds.
    pub fn at(&self, idx: usize) -> &'a Property {
        &self.props[idx]
    }

    /// Iterates over all `(name, value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a Property)> + 'a {
        self.def.property_defs.iter()
            .map(|def| def.name.as_str())
            .zip(self.props)
    }
}


// ===========================================================================
// ===== RawSink
// ===========================================================================

/// A type that can accept raw data from a PLY body. This is mainly used for
/// [`Reader::read_raw_into`][super::Reader::read_raw_into].
pub trait RawSink {
    /// Is called when a new element group begins. `def` describes the layout
    /// of all elements in this group. This method is *always* called before
    /// `element` is called.
    fn element_group_start(&mut self, def: &ElementDef) -> Result<(), Error>;

    /// Is called for each element that is read. When called, the element
    /// belongs to the last element group (the last `element_group_start`
    /// call).
    fn element(&mut self, record: Record<'_>) -> Result<(), Error>;
}

/// A sink that simply stores everything. Mostly useful for debugging and
/// tests; it holds the whole body in memory in a rather inefficient form.
#[derive(Debug, Clone, Default)]
pub struct RawResult {
    pub element_groups: Vec<RawElementGroup>,
}

#[derive(Debug, Clone)]
pub struct RawElementGroup {
    pub def: ElementDef,
    pub elements: Vec<Vec<Property>>,
}

impl RawSink for RawResult {
    fn element_group_start(&mut self, def: &ElementDef) -> Result<(), Error> {
        self.element_groups.push(RawElementGroup {
            def: def.clone(),
            elements: vec![],
        });
        Ok(())
    }

    fn element(&mut self, record: Record<'_>) -> Result<(), Error> {
        // `element_group_start` is always called first
        if let Some(group) = self.element_groups.last_mut() {
            group.elements.push(record.props.to_vec());
        }
        Ok(())
    }
}
