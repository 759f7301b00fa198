use alloc::format;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::Any;

use vc_value::{Readability, Value, from_text, to_text};

use crate::config::EngineConfig;
use crate::hash::HashSet;
use crate::info::{Describe, Form, Instance, SeqKind, TypeDesc};
use crate::registry::{Resolver, TranslatorRegistry};
use crate::source::TypeSource;
use crate::translate::{TranslatorRef, decode_slot, encode_slot};
use crate::{Error, ResolveError};

// -----------------------------------------------------------------------------
// Engine

/// The public entry surface: builds, caches and applies translators.
///
/// An engine owns its [`TranslatorRegistry`], so translators are shared by
/// every call made through the same engine and by every thread it is shared
/// with.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use vc_translate::prelude::*;
///
/// let engine = Engine::new(TypeTable::new());
///
/// let map = BTreeMap::from([(1_u32, String::from("x")), (2, String::from("y"))]);
/// let text = engine.encode_text(&map, Readability::Compact).unwrap();
/// assert_eq!(text, r#"[{"key":1,"value":"x"},{"key":2,"value":"y"}]"#);
///
/// let back: BTreeMap<u32, String> = engine.decode_text(&text).unwrap();
/// assert_eq!(back, map);
///
/// let desc = <BTreeMap<u32, String>>::type_desc();
/// assert_eq!(engine.external_name_of(&desc).unwrap(), "map<uint32,string>");
/// ```
pub struct Engine {
    registry: TranslatorRegistry,
    source: Arc<dyn TypeSource>,
    config: EngineConfig,
}

impl Engine {
    /// Creates an engine over `source` with the default configuration.
    #[inline]
    pub fn new(source: impl TypeSource + 'static) -> Self {
        Self::with_config(source, EngineConfig::default())
    }

    pub fn with_config(source: impl TypeSource + 'static, config: EngineConfig) -> Self {
        Self {
            registry: TranslatorRegistry::new(),
            source: Arc::new(source),
            config,
        }
    }

    #[inline]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[inline]
    pub const fn registry(&self) -> &TranslatorRegistry {
        &self.registry
    }

    #[inline]
    pub fn source(&self) -> &dyn TypeSource {
        &*self.source
    }

    /// Returns the translator of `desc`, building and caching it on first use.
    ///
    /// A failed build leaves the registry untouched.
    pub fn translator_for(&self, desc: &TypeDesc) -> Result<TranslatorRef, ResolveError> {
        if let Some(translator) = self.registry.get(desc) {
            log::trace!("translator hit for `{}`", desc.type_path());
            return Ok(translator);
        }

        let mut session = Resolver::new(&self.registry, &*self.source, &self.config);
        let built = session.resolve(desc)?;
        session.finish();

        // Another thread may have published first.
        Ok(self.registry.get(desc).unwrap_or(built))
    }

    /// Renders a non-null payload of type `desc`.
    pub fn to_value(&self, data: &dyn Any, desc: &TypeDesc) -> Result<Value, Error> {
        let translator = self.translator_for(desc)?;
        Ok(translator.to_value(data)?)
    }

    /// Builds a payload of type `desc`; null gives `None`.
    pub fn from_value(&self, value: &Value, desc: &TypeDesc) -> Result<Option<Instance>, Error> {
        let translator = self.translator_for(desc)?;
        Ok(decode_slot(&*translator, value)?)
    }

    /// Renders a non-null payload of type `desc` as JSON text.
    pub fn to_text(
        &self,
        data: &dyn Any,
        desc: &TypeDesc,
        readability: Readability,
    ) -> Result<String, Error> {
        let value = self.to_value(data, desc)?;
        Ok(to_text(&value, readability)?)
    }

    /// Parses JSON text into a payload of type `desc`; `null` gives `None`.
    pub fn from_text(&self, text: &str, desc: &TypeDesc) -> Result<Option<Instance>, Error> {
        let value = from_text(text)?;
        self.from_value(&value, desc)
    }

    /// Renders `data`, whose nullness is decided by its slot.
    pub fn encode<T: Describe>(&self, data: &T) -> Result<Value, Error> {
        let translator = self.translator_for(&T::type_desc())?;
        Ok(encode_slot(&*translator, data.peek())?)
    }

    pub fn decode<T: Describe>(&self, value: &Value) -> Result<T, Error> {
        let translator = self.translator_for(&T::type_desc())?;
        let instance = decode_slot(&*translator, value)?;
        Ok(T::fill(instance)?)
    }

    pub fn encode_text<T: Describe>(
        &self,
        data: &T,
        readability: Readability,
    ) -> Result<String, Error> {
        let value = self.encode(data)?;
        Ok(to_text(&value, readability)?)
    }

    /// Like [`encode_text`](Self::encode_text), with the configured readability.
    #[inline]
    pub fn render<T: Describe>(&self, data: &T) -> Result<String, Error> {
        self.encode_text(data, self.config.readability())
    }

    pub fn decode_text<T: Describe>(&self, text: &str) -> Result<T, Error> {
        let value = from_text(text)?;
        self.decode(&value)
    }

    /// A readable name for `desc`, for documentation and diagnostics.
    ///
    /// Plain types use their registered or declared external name; composites
    /// render as `a|b`, `elem[]`, `list<elem>` and `map<key,value>`. This
    /// never builds translators.
    pub fn external_name_of(&self, desc: &TypeDesc) -> Result<String, ResolveError> {
        let mut visiting = HashSet::default();
        self.name_of(desc, &mut visiting)
    }

    fn name_of(
        &self,
        desc: &TypeDesc,
        visiting: &mut HashSet<TypeDesc>,
    ) -> Result<String, ResolveError> {
        // Re-entry renders the host path instead of recursing.
        if !visiting.insert(desc.clone()) {
            return Ok(String::from(desc.type_path()));
        }

        let name = match desc.form() {
            Form::Plain => self.plain_name(desc),
            Form::Union => {
                let mut names = Vec::with_capacity(desc.params().len());
                for alternative in desc.params() {
                    names.push(self.name_of(alternative, visiting)?);
                }
                Ok(names.join("|"))
            }
            Form::Sequence { kind, .. } => {
                let element = desc.element().ok_or(ResolveError::EmptyValueTypes)?;
                let element = self.name_of(element, visiting)?;
                match kind {
                    SeqKind::Array => Ok(format!("{element}[]")),
                    kind => Ok(format!("{kind}<{element}>")),
                }
            }
            Form::Map { .. } => {
                let (key, value) = desc.entry().ok_or(ResolveError::EmptyKeyTypes)?;
                let key = self.name_of(key, visiting)?;
                let value = self.name_of(value, visiting)?;
                Ok(format!("map<{key},{value}>"))
            }
        };

        visiting.remove(desc);
        name
    }

    fn plain_name(&self, desc: &TypeDesc) -> Result<String, ResolveError> {
        if let Some(translator) = self.registry.get(desc) {
            return Ok(translator.external_name().into_owned());
        }
        match self.source.shape_of(desc) {
            Some(shape) => Ok(String::from(shape.name())),
            None => Err(ResolveError::Unresolvable {
                type_path: desc.type_path(),
            }),
        }
    }
}

// -----------------------------------------------------------------------------
// Tests
