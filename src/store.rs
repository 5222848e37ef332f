//! The live parameter table.
//!
//! A [`ParameterStore`] owns its [`Schema`] and holds one slot per declared
//! parameter, in declaration order. Slots are never added or removed after
//! construction; only their values change, and only through
//! [`acquire`](ParameterStore::acquire) or [`set`](ParameterStore::set).
//! Every value a slot holds has passed validation for its parameter.

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::debug;

use crate::builder::Schema;
use crate::coerce::coerce;
use crate::error::ParamfigError;
use crate::ops::{self, ParamResult};
use crate::param::ParameterSpec;
use crate::resolve::{self, ResolveInput};
use crate::types::{Overrides, ParamAction, ParamType, Source, Value};
use crate::validate;

/// Current value of one parameter and where it came from. Both are `None`
/// while the parameter is unset.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Slot {
    pub value: Option<Value>,
    pub source: Option<Source>,
}

impl Slot {
    /// The parameter's default, or unset.
    pub fn seeded(spec: &ParameterSpec) -> Self {
        match spec.default_value() {
            Some(value) => Slot {
                value: Some(value.clone()),
                source: Some(Source::Default),
            },
            None => Slot::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ParameterStore {
    schema: Schema,
    slots: IndexMap<String, Slot>,
    args: Vec<String>,
}

impl ParameterStore {
    /// Create a store holding every parameter's default.
    pub fn new(schema: Schema) -> Self {
        let slots = schema
            .params()
            .map(|spec| (spec.name().to_string(), Slot::seeded(spec)))
            .collect();
        Self {
            schema,
            slots,
            args: Vec::new(),
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Resolve every parameter from defaults, the config file, the process
    /// environment and `argv` (without the program name).
    ///
    /// On failure, parameters that resolved cleanly keep their new values.
    pub fn acquire<I, S>(&mut self, argv: I, overrides: &Overrides) -> Result<(), ParamfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let argv: Vec<String> = argv.into_iter().map(Into::into).collect();
        let input = self.schema.build_input(argv, overrides)?;
        self.acquire_from(input)
    }

    /// Like [`acquire`](Self::acquire), from pre-loaded inputs. No I/O.
    pub fn acquire_from(&mut self, input: ResolveInput) -> Result<(), ParamfigError> {
        resolve::resolve(self, input)
    }

    /// Current value of `key`; `Ok(None)` if the parameter is unset.
    pub fn get(&self, key: &str) -> Result<Option<&Value>, ParamfigError> {
        self.slot(key).map(|slot| slot.value.as_ref())
    }

    pub fn get_str(&self, key: &str) -> Result<Option<&str>, ParamfigError> {
        self.expect_type(key, ParamType::String)?;
        Ok(self.get(key)?.and_then(Value::as_str))
    }

    pub fn get_int(&self, key: &str) -> Result<Option<i64>, ParamfigError> {
        self.expect_type(key, ParamType::Int)?;
        Ok(self.get(key)?.and_then(Value::as_int))
    }

    pub fn get_bool(&self, key: &str) -> Result<Option<bool>, ParamfigError> {
        self.expect_type(key, ParamType::Bool)?;
        Ok(self.get(key)?.and_then(Value::as_bool))
    }

    /// Which source supplied the current value of `key`.
    pub fn source(&self, key: &str) -> Result<Option<Source>, ParamfigError> {
        self.slot(key).map(|slot| slot.source)
    }

    /// Assign a value to `key`.
    ///
    /// A string given for a non-string parameter is coerced like a raw value
    /// from any other source; any other value must already have the declared
    /// type. The value is validated before it is stored. On error the
    /// previous value is left untouched.
    pub fn set<V: Into<Value>>(&mut self, key: &str, value: V) -> Result<(), ParamfigError> {
        let spec = self
            .schema
            .param(key)
            .ok_or_else(|| ParamfigError::KeyNotFound(key.to_string()))?;
        let expected = spec.param_type();

        let value = match value.into() {
            Value::Str(raw) if expected != ParamType::String => coerce(key, &raw, expected)?,
            value if value.param_type() != expected => {
                return Err(ParamfigError::TypeMismatch {
                    key: key.to_string(),
                    expected,
                    found: value.param_type(),
                });
            }
            value => value,
        };
        validate::validate_value(&value, spec)?;

        debug!(param = key, "Value set");
        if let Some(slot) = self.slots.get_mut(key) {
            slot.value = Some(value);
            slot.source = Some(Source::Set);
        }
        Ok(())
    }

    /// Every declared parameter name, in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.slots.keys().map(String::as_str)
    }

    /// Every parameter with its current value, in declaration order.
    /// Unset parameters are included with `None`.
    pub fn items(&self) -> impl Iterator<Item = (&str, Option<&Value>)> {
        self.slots
            .iter()
            .map(|(key, slot)| (key.as_str(), slot.value.as_ref()))
    }

    /// Names of parameters that currently have no value.
    pub fn unset_keys(&self) -> impl Iterator<Item = &str> {
        self.items()
            .filter(|(_, value)| value.is_none())
            .map(|(key, _)| key)
    }

    /// Handle a [`ParamAction`] (list / get / set / gen).
    pub fn handle(&mut self, action: &ParamAction) -> Result<ParamResult, ParamfigError> {
        ops::handle(self, action)
    }

    /// Positional command-line arguments left over by the last acquisition.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Replace slots with the outcome of a resolution pass.
    pub(crate) fn commit(&mut self, resolved: Vec<(String, Slot)>, args: Vec<String>) {
        for (key, slot) in resolved {
            if let Some(existing) = self.slots.get_mut(&key) {
                *existing = slot;
            }
        }
        self.args = args;
    }

    fn slot(&self, key: &str) -> Result<&Slot, ParamfigError> {
        self.slots
            .get(key)
            .ok_or_else(|| ParamfigError::KeyNotFound(key.to_string()))
    }

    fn expect_type(&self, key: &str, requested: ParamType) -> Result<(), ParamfigError> {
        let spec = self
            .schema
            .param(key)
            .ok_or_else(|| ParamfigError::KeyNotFound(key.to_string()))?;
        if spec.param_type() != requested {
            return Err(ParamfigError::TypeMismatch {
                key: key.to_string(),
                expected: requested,
                found: spec.param_type(),
            });
        }
        Ok(())
    }
}

/// Serializes as a map of parameter name to value, `null` when unset.
impl Serialize for ParameterStore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.slots.len()))?;
        for (key, value) in self.items() {
            map.serialize_entry(key, &value)?;
        }
        map.end()
    }
}
