//! Aerounit Convert - quantity resolution and dispatch units
//!
//! Turns quantities received in one unit into the article's primary unit,
//! and manages the secondary units an article may be dispatched in.
//!
//! Components:
//! - `ConversionResolver`: one rule, one direction, one quantity
//! - `DispatchUnitSet`: ordered, de-duplicated dispatch rules for an article
//! - `ArticleUnitConfig`: primary unit plus dispatch set, finalized on submit
//! - `IntakeReconciler`: registry lookup + resolution for received lines

mod resolver;
mod dispatch;
mod article;
mod intake;

pub use resolver::{ConversionQuery, ConversionResult, ConversionResolver, resolve};
pub use dispatch::{DispatchUnitSet, DispatchState, FinalizedDispatchSet};
pub use article::{ArticleUnitConfig, PrimaryUnitChange, IntakeSubmission, ReceivedLine};
pub use intake::{IntakeReconciler, ReceivedQuantity};

/// Everything a form layer needs in one import
pub mod prelude {
    pub use crate::{
        ConversionQuery, ConversionResult, ConversionResolver,
        DispatchUnitSet, DispatchState, FinalizedDispatchSet,
        ArticleUnitConfig, PrimaryUnitChange, IntakeSubmission, ReceivedLine,
        IntakeReconciler, ReceivedQuantity,
    };
    pub use aerounit_catalog::prelude::*;
}
