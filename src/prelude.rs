//! FastICA prelude.
//!
//! This module contains the most used types, traits and functions that you can import easily
//! as a group.
//!

#[doc(no_inline)]
pub use crate::error::{FastIcaError, Result};

#[doc(no_inline)]
pub use crate::traits::*;

#[doc(no_inline)]
pub use crate::{ParamGuard, Float};

#[doc(no_inline)]
pub use crate::fast_ica::{ica, ComponentReport, FastIca};

#[doc(no_inline)]
pub use crate::hyperparams::{FastIcaParams, FastIcaValidParams};

#[doc(no_inline)]
pub use crate::contrast::ContrastFunction;

#[doc(no_inline)]
pub use crate::distance::{ConvergenceMetric, Distance};

#[doc(no_inline)]
pub use crate::observer::{IcaObserver, LogObserver, RecordingObserver};
