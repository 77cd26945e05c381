//! Naming environments for parameters, entities and actors.
//!
//! Every storyboard element owns a `Scope` whose parent is its enclosing
//! element's scope. Lookups walk outward; declarations only ever touch the
//! scope they are made in.

use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

use osc_ir::{BoundingBox, EntityCategory, EntityDef, ParameterType, Scalar, Value};

use crate::errors::{
    declaration, parameter_type, undeclared_parameter, unknown_entity, ScenarioResult,
};

/// A single-threaded, shared handle to a scope.
///
/// Elements hold a `LocalScope<Scope>` to their own scope, and each scope holds
/// one to its parent. All scope allocations go through `LocalScope::new()`.
#[repr(transparent)]
pub struct LocalScope<T>(Rc<RefCell<T>>);

impl<T> LocalScope<T> {
    #[inline]
    pub fn new(value: T) -> Self {
        LocalScope(Rc::new(RefCell::new(value)))
    }

    #[inline]
    pub fn borrow(&self) -> std::cell::Ref<'_, T> {
        self.0.borrow()
    }

    #[inline]
    pub fn borrow_mut(&self) -> std::cell::RefMut<'_, T> {
        self.0.borrow_mut()
    }
}

impl<T> Clone for LocalScope<T> {
    #[inline]
    fn clone(&self) -> Self {
        LocalScope(Rc::clone(&self.0))
    }
}

impl<T: fmt::Debug> fmt::Debug for LocalScope<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LocalScope").field(&self.0).finish()
    }
}

impl<T: Default> Default for LocalScope<T> {
    fn default() -> Self {
        LocalScope::new(T::default())
    }
}

impl<T> Deref for LocalScope<T> {
    type Target = RefCell<T>;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl LocalScope<Scope> {
    /// A new empty scope whose parent is this one.
    pub fn child(&self) -> LocalScope<Scope> {
        LocalScope::new(Scope::with_parent(self.clone()))
    }
}

/// A declared scenario entity. The world owns its state; this is only the name
/// and static description.
#[derive(Clone, Debug, PartialEq)]
pub struct EntityRef {
    pub name: String,
    pub category: EntityCategory,
    pub bounding_box: BoundingBox,
}

impl From<&EntityDef> for EntityRef {
    fn from(def: &EntityDef) -> Self {
        EntityRef {
            name: def.name.clone(),
            category: def.category,
            bounding_box: def.bounding_box,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Scope {
    parameters: FxHashMap<String, Value>,
    entities: FxHashMap<String, EntityRef>,
    /// Entities private actions in this subtree act on. Set by maneuver groups
    /// and init actions.
    actors: Option<Vec<String>>,
    parent: Option<LocalScope<Scope>>,
}

impl Scope {
    pub fn new() -> Self {
        Scope::default()
    }

    pub fn with_parent(parent: LocalScope<Scope>) -> Self {
        Scope {
            parent: Some(parent),
            ..Scope::default()
        }
    }

    /// Parse `raw` as `parameter_type` and bind it in this scope.
    ///
    /// Shadowing a parent's parameter is allowed; redeclaring one in the same
    /// scope is not.
    pub fn declare(
        &mut self,
        name: &str,
        parameter_type: ParameterType,
        raw: &str,
    ) -> ScenarioResult<Value> {
        if self.parameters.contains_key(name) {
            return Err(declaration(name, "already declared in this scope"));
        }
        let value = parameter_type
            .parse(raw)
            .map_err(|error| declaration(name, error.to_string()))?;
        self.parameters.insert(name.to_string(), value.clone());
        Ok(value)
    }

    /// Find a parameter in this scope or the nearest ancestor that declares it.
    ///
    /// A leading `$` on `name` is ignored.
    pub fn lookup(&self, name: &str) -> ScenarioResult<Value> {
        let key = name.strip_prefix('$').unwrap_or(name);
        if let Some(value) = self.parameters.get(key) {
            return Ok(value.clone());
        }
        match &self.parent {
            Some(parent) => parent.borrow().lookup(key),
            None => Err(undeclared_parameter(key)),
        }
    }

    /// Resolve a scalar to a number, looking parameters up through the scope chain.
    pub fn number(&self, scalar: &Scalar) -> ScenarioResult<f64> {
        match scalar {
            Scalar::Literal(value) => Ok(*value),
            Scalar::Parameter(reference) => {
                let name = scalar.parameter_name().unwrap_or(reference);
                let value = self.lookup(name)?;
                value.as_f64().ok_or_else(|| {
                    parameter_type(
                        name,
                        format!("{} value `{value}` is not a number", value.parameter_type()),
                    )
                })
            }
        }
    }

    pub fn define_entity(&mut self, entity: EntityRef) {
        self.entities.insert(entity.name.clone(), entity);
    }

    pub fn entity(&self, name: &str) -> ScenarioResult<EntityRef> {
        if let Some(entity) = self.entities.get(name) {
            return Ok(entity.clone());
        }
        match &self.parent {
            Some(parent) => parent.borrow().entity(name),
            None => Err(unknown_entity(name)),
        }
    }

    pub fn set_actors(&mut self, actors: Vec<String>) {
        self.actors = Some(actors);
    }

    /// Actors of the nearest enclosing scope that names any; empty at the root.
    pub fn actors(&self) -> Vec<String> {
        if let Some(actors) = &self.actors {
            return actors.clone();
        }
        self.parent
            .as_ref()
            .map(|parent| parent.borrow().actors())
            .unwrap_or_default()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
