use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::ResolveError;
use crate::config::EngineConfig;
use crate::hash::{HashMap, HashSet};
use crate::info::{FieldDesc, Form, TypeDesc};
use crate::registry::TranslatorRegistry;
use crate::source::{ObjectShape, TypeShape, TypeSource};
use crate::translate::{
    EnumTranslator, MapTranslator, MemberMap, PolyTranslator, SeqTranslator, TranslatorRef,
    TypeMap,
};

// -----------------------------------------------------------------------------
// Resolver

/// One translator resolution session.
///
/// Translators built during the session live in a private pending table
/// until [`finish`](Self::finish) publishes them together. Dropping the
/// session (for example after an error) discards all of them.
///
/// # Examples
///
/// ```
/// use vc_translate::EngineConfig;
/// use vc_translate::info::{Describe, TypeDesc};
/// use vc_translate::registry::{Resolver, TranslatorRegistry};
/// use vc_translate::source::TypeTable;
///
/// let registry = TranslatorRegistry::new();
/// let source = TypeTable::new();
/// let config = EngineConfig::default();
///
/// let desc = <Vec<Option<i64>>>::type_desc();
/// let mut session = Resolver::new(&registry, &source, &config);
/// let translator = session.resolve(&desc).unwrap();
/// assert_eq!(translator.external_name(), "list<int64>");
/// assert!(!registry.contains(&desc));
///
/// session.finish();
/// assert!(registry.contains(&desc));
/// ```
pub struct Resolver<'a> {
    registry: &'a TranslatorRegistry,
    source: &'a dyn TypeSource,
    config: &'a EngineConfig,
    pending: HashMap<TypeDesc, TranslatorRef>,
}

impl<'a> Resolver<'a> {
    pub fn new(
        registry: &'a TranslatorRegistry,
        source: &'a dyn TypeSource,
        config: &'a EngineConfig,
    ) -> Self {
        Self {
            registry,
            source,
            config,
            pending: HashMap::default(),
        }
    }

    /// Number of translators built so far and not yet published.
    #[inline]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Publishes every translator built by this session.
    pub fn finish(self) {
        if !self.pending.is_empty() {
            log::debug!("publishing {} translators", self.pending.len());
            self.registry.publish(self.pending);
        }
    }

    fn lookup(&self, desc: &TypeDesc) -> Option<TranslatorRef> {
        match self.pending.get(desc) {
            Some(translator) => Some(translator.clone()),
            None => self.registry.get(desc),
        }
    }

    /// Resolves the translator of `desc`, building whatever is missing.
    pub fn resolve(&mut self, desc: &TypeDesc) -> Result<TranslatorRef, ResolveError> {
        if let Some(translator) = self.lookup(desc) {
            return Ok(translator);
        }

        let translator: TranslatorRef = match desc.form() {
            Form::Plain => return self.resolve_plain(desc),
            Form::Union => {
                let mut alternatives = Vec::with_capacity(desc.params().len());
                for alternative in desc.params() {
                    alternatives.push((alternative.id(), self.resolve(alternative)?));
                }
                Arc::new(PolyTranslator::new(alternatives)?)
            }
            Form::Sequence { ops, .. } => {
                let element = desc.element().ok_or(ResolveError::EmptyValueTypes)?;
                Arc::new(SeqTranslator::new(ops, self.resolve(element)?))
            }
            Form::Map { ops } => {
                let (key, value) = desc.entry().ok_or(ResolveError::EmptyKeyTypes)?;
                let key = self.resolve(key)?;
                let value = self.resolve(value)?;
                Arc::new(MapTranslator::new(ops, key, value))
            }
        };

        self.pending.insert(desc.clone(), translator.clone());
        Ok(translator)
    }

    fn resolve_plain(&mut self, desc: &TypeDesc) -> Result<TranslatorRef, ResolveError> {
        let shape = self.source.shape_of(desc).ok_or(ResolveError::Unresolvable {
            type_path: desc.type_path(),
        })?;
        if shape.owner() != desc.id() {
            let shape_path = match &shape {
                TypeShape::Object(object) => object.owner_path(),
                TypeShape::Enum(_) => "enum",
            };
            return Err(ResolveError::ShapeMismatch {
                type_path: desc.type_path(),
                shape_path,
            });
        }
        self.check_type_name(desc, shape.name())?;

        match shape {
            TypeShape::Enum(shape) => {
                let translator: TranslatorRef = Arc::new(EnumTranslator::new(shape));
                self.pending.insert(desc.clone(), translator.clone());
                Ok(translator)
            }
            TypeShape::Object(shape) => self.build_type_map(desc, shape),
        }
    }

    fn check_type_name(&self, desc: &TypeDesc, name: &str) -> Result<(), ResolveError> {
        if self.config.type_names().is_valid(name) {
            Ok(())
        } else {
            Err(ResolveError::InvalidTypeName {
                type_path: desc.type_path(),
                name: String::from(name),
            })
        }
    }

    fn build_type_map(
        &mut self,
        desc: &TypeDesc,
        shape: Arc<ObjectShape>,
    ) -> Result<TranslatorRef, ResolveError> {
        let type_map = Arc::new(TypeMap::new(shape.clone(), self.config.unknown_members()));

        // Visible to fields of this session before it is complete.
        self.pending.insert(desc.clone(), type_map.clone());

        let mut seen: HashSet<&str> = HashSet::default();
        let mut members = Vec::with_capacity(shape.fields().len());
        for field in shape.fields() {
            let member = self
                .build_member(&type_map, &shape, field, &mut seen)
                .map_err(|e| e.in_field(shape.name(), field.name()))?;
            members.push(member);
        }

        type_map.freeze(members);
        log::debug!("built type map `{}` for `{}`", shape.name(), desc.type_path());
        Ok(type_map)
    }

    fn build_member<'s>(
        &mut self,
        type_map: &Arc<TypeMap>,
        shape: &ObjectShape,
        field: &'s FieldDesc,
        seen: &mut HashSet<&'s str>,
    ) -> Result<MemberMap, ResolveError> {
        let site = field.site();
        if site.owner() != shape.owner() {
            return Err(ResolveError::ForeignField {
                declared: shape.owner_path(),
                actual: site.owner_path(),
            });
        }
        if !self.config.member_names().is_valid(field.name()) {
            return Err(ResolveError::InvalidMemberName {
                name: String::from(field.name()),
            });
        }
        if !seen.insert(field.name()) {
            return Err(ResolveError::DuplicateMember {
                name: String::from(field.name()),
            });
        }

        let desc = field.translation_desc()?;
        let translator = self.resolve(&desc)?;
        Ok(MemberMap::new(
            field.clone(),
            translator,
            Arc::downgrade(type_map),
        ))
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::sync::Arc;

    use super::Resolver;
    use crate::ResolveError;
    use crate::config::EngineConfig;
    use crate::fixtures::{self, Child, Node, Parent, Point};
    use crate::info::{Describe, TypeDesc};
    use crate::naming::Identifier;
    use crate::registry::TranslatorRegistry;
    use crate::source::{ObjectShape, TypeTable};

    #[test]
    fn self_reference_resolves_to_same_map() {
        let registry = TranslatorRegistry::new();
        let source = fixtures::table();
        let config = EngineConfig::default();

        let mut session = Resolver::new(&registry, &source, &config);
        session.resolve(&Node::type_desc()).unwrap();
        session.finish();

        let node = registry.get(&Node::type_desc()).unwrap();
        let map = node.as_type_map().unwrap();
        assert!(map.is_frozen());
        let next = map.member("next").unwrap();
        assert!(Arc::ptr_eq(next.translator(), &node));
    }

    #[test]
    fn mutual_reference() {
        let registry = TranslatorRegistry::new();
        let source = fixtures::table();
        let config = EngineConfig::default();

        let mut session = Resolver::new(&registry, &source, &config);
        session.resolve(&Parent::type_desc()).unwrap();
        assert_eq!(session.pending(), 2);
        session.finish();

        assert!(registry.contains(&Parent::type_desc()));
        assert!(registry.contains(&Child::type_desc()));
    }

    #[test]
    fn failed_session_publishes_nothing() {
        let registry = TranslatorRegistry::new();
        let before = registry.len();
        let source = fixtures::table();
        let config = EngineConfig::default().with_type_names(|name: &str| name != "Child");

        let mut session = Resolver::new(&registry, &source, &config);
        let error = session.resolve(&Parent::type_desc()).unwrap_err();
        drop(session);

        assert!(matches!(
            error.root_cause(),
            ResolveError::InvalidTypeName { name, .. } if name == "Child"
        ));
        assert_eq!(registry.len(), before);
        assert!(!registry.contains(&Parent::type_desc()));
    }

    #[test]
    fn unresolvable_type() {
        let registry = TranslatorRegistry::new();
        let source = TypeTable::new();
        let config = EngineConfig::default();

        let mut session = Resolver::new(&registry, &source, &config);
        assert!(matches!(
            session.resolve(&Point::type_desc()),
            Err(ResolveError::Unresolvable { .. })
        ));
    }

    #[test]
    fn member_name_policy() {
        #[derive(Default)]
        struct Badly {
            value: i32,
        }
        crate::impl_slot!(Badly);

        let mut source = TypeTable::new();
        source.insert(
            core::any::TypeId::of::<Badly>(),
            ObjectShape::builder::<Badly>("Badly")
                .field("not valid", |b| &b.value, |b| &mut b.value)
                .build()
                .into(),
        );
        let registry = TranslatorRegistry::new();
        let config = EngineConfig::default().with_member_names(Identifier);

        let mut session = Resolver::new(&registry, &source, &config);
        let error = session.resolve(&Badly::type_desc()).unwrap_err();
        assert!(matches!(error.root_cause(), ResolveError::InvalidMemberName { .. }));
    }

    #[test]
    fn duplicate_and_foreign_members() {
        let duplicate = ObjectShape::builder::<Point>("Point")
            .field("x", |p| &p.x, |p| &mut p.x)
            .field("x", |p| &p.y, |p| &mut p.y)
            .build();
        let foreign = ObjectShape::builder::<Point>("Point")
            .with_field(crate::info::FieldDesc::new::<Child, _>(
                "name",
                |c| &c.name,
                |c| &mut c.name,
            ))
            .build();

        for (shape, expect_duplicate) in [(duplicate, true), (foreign, false)] {
            let mut source = TypeTable::new();
            source.insert(core::any::TypeId::of::<Point>(), shape.into());
            let registry = TranslatorRegistry::new();
            let config = EngineConfig::default();

            let mut session = Resolver::new(&registry, &source, &config);
            let error = session.resolve(&TypeDesc::of::<Point>()).unwrap_err();
            if expect_duplicate {
                assert!(matches!(error.root_cause(), ResolveError::DuplicateMember { .. }));
            } else {
                assert!(matches!(error.root_cause(), ResolveError::ForeignField { .. }));
            }
        }
    }
}
