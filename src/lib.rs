#![deny(rust_2018_idioms)]

mod controller;
mod defaults;
mod editor;
mod engine;
mod form;
mod layout;
mod runtime;
mod schema;
mod ui;

#[cfg(test)]
mod tests;

pub use controller::{Controller, Pane};
pub use engine::{FormChange, FormEngine, RenderedForm, SchemaFormEngine};
pub use runtime::{Playground, UiOptions};

pub mod prelude {
    pub use super::{Playground, UiOptions};
}
