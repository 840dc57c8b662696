//! Qubit references.

use std::fmt;

use crate::error::{IrError, IrResult};
use crate::field::Field;

/// Locator of one two-level degree of freedom: a field and a site index.
///
/// A qubit does not own any data; it only points into its field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Qubit {
    field: Field,
    index: usize,
}

impl Qubit {
    /// Reference site `index` of `field`.
    pub fn new(field: &Field, index: usize) -> IrResult<Self> {
        field.require_two_level()?;
        if index >= field.nsites() {
            return Err(IrError::QubitOutOfRange {
                index,
                nsites: field.nsites(),
            });
        }
        Ok(Self {
            field: field.clone(),
            index,
        })
    }

    /// The field this qubit belongs to.
    #[inline]
    pub fn field(&self) -> &Field {
        &self.field
    }

    /// Site index within the field.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }
}

impl fmt::Display for Qubit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.field, self.index)
    }
}

/// Return an error naming the first qubit that occurs twice in `wires`.
pub(crate) fn ensure_distinct(wires: &[Qubit], gate_name: &str) -> IrResult<()> {
    for (i, q) in wires.iter().enumerate() {
        if wires[..i].contains(q) {
            return Err(IrError::DuplicateQubit {
                qubit: q.to_string(),
                gate_name: gate_name.to_string(),
            });
        }
    }
    Ok(())
}
