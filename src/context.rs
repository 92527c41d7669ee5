//! The configured entry point and the free façade functions.

use mediary_core::{freeze, thaw, MediaryConfig, MediaryError, Result, Value};
use mediary_view::{Item, View};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::rc::Rc;

/// Façade operations bound to one configuration.
///
/// Every view created through a context, and every child view wrapped
/// beneath it, shares the context's configuration.
#[derive(Clone, Debug, Default)]
pub struct Mediary {
    config: Rc<MediaryConfig>,
}

impl Mediary {
    pub fn new(config: MediaryConfig) -> Self {
        Self {
            config: Rc::new(config),
        }
    }

    /// Build a context from a JSON configuration document.
    pub fn from_json_config(text: &str) -> Result<Self> {
        Ok(Self::new(MediaryConfig::from_json(text)?))
    }

    pub fn config(&self) -> &MediaryConfig {
        &self.config
    }

    /// Wrap `input`. Nodes become fresh views; primitives and existing
    /// views pass through unchanged.
    pub fn mediate(&self, input: impl Into<Item>) -> Item {
        match input.into() {
            Item::Value(value) => {
                let item = Item::wrap(&value, &self.config);
                if let Item::View(view) = &item {
                    tracing::debug!(view = %view.id(), kind = %view.kind(), "mediate");
                }
                item
            }
            view => view,
        }
    }

    /// Freeze typed data and wrap it.
    ///
    /// Fails with [`MediaryError::TypeConstraint`] when `input` does not
    /// serialize to plain data.
    pub fn mediate_from<T: Serialize + ?Sized>(&self, input: &T) -> Result<Item> {
        Ok(self.mediate(freeze(input)?))
    }

    /// Wrap `input`, which must be a node or a view.
    pub fn view(&self, input: impl Into<Item>) -> Result<View> {
        match self.mediate(input) {
            Item::View(view) => Ok(view),
            Item::Value(value) => Err(MediaryError::type_constraint("mapping or sequence", value.kind())),
        }
    }

    /// `mediate(realize(input))`: an independent view decoupled from any
    /// view `input` may be.
    pub fn clone_item(&self, input: impl Into<Item>) -> Item {
        let item = self.mediate(input.into().realize());
        if let Item::View(view) = &item {
            tracing::debug!(view = %view.id(), "clone");
        }
        item
    }

    /// Run `mutate` against a fresh view of `base` and return the live
    /// view.
    pub fn create<F>(&self, base: impl Into<Item>, mutate: F) -> Result<View>
    where
        F: FnOnce(&View) -> Result<()>,
    {
        let view = self.view(base.into().realize())?;
        tracing::debug!(view = %view.id(), "create");
        mutate(&view)?;
        Ok(view)
    }

    /// Like [`Mediary::create`], but return the realized value.
    pub fn produce<F>(&self, base: impl Into<Item>, mutate: F) -> Result<Value>
    where
        F: FnOnce(&View) -> Result<()>,
    {
        let view = self.create(base, mutate)?;
        tracing::debug!(view = %view.id(), "produce");
        Ok(view.realize())
    }
}

/// Wrap `input` with the default configuration.
pub fn mediate(input: impl Into<Item>) -> Item {
    Mediary::default().mediate(input)
}

/// Freeze typed data and wrap it with the default configuration.
pub fn mediate_from<T: Serialize + ?Sized>(input: &T) -> Result<Item> {
    Mediary::default().mediate_from(input)
}

/// Realize `item` into a plain value. Plain values come back unchanged.
pub fn realize(item: &Item) -> Value {
    item.realize()
}

/// Realize `item` and deserialize the result into `T`.
pub fn realize_into<T: DeserializeOwned>(item: &Item) -> Result<T> {
    thaw(&item.realize())
}

/// `mediate(realize(input))` with the default configuration.
pub fn clone(input: impl Into<Item>) -> Item {
    Mediary::default().clone_item(input)
}

/// Mutate a fresh view of `base` and return the realized result.
pub fn produce<F>(base: impl Into<Item>, mutate: F) -> Result<Value>
where
    F: FnOnce(&View) -> Result<()>,
{
    Mediary::default().produce(base, mutate)
}

/// Mutate a fresh view of `base` and return the live view.
pub fn create<F>(base: impl Into<Item>, mutate: F) -> Result<View>
where
    F: FnOnce(&View) -> Result<()>,
{
    Mediary::default().create(base, mutate)
}
