//! Kubernetes labels of chart resources.
//!
//! The keys are the fixed set in [`LabelKey`], the values are derived names
//! which can be validated through [`LabelValue`].
pub mod consts;
pub mod label;

mod key;

pub use key::{LabelKey, UnknownLabelKeyError};
pub use label::{Label, LabelError, LabelValue, LabelValueError, Labels};
