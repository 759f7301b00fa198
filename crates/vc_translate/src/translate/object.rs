use alloc::borrow::Cow;
use alloc::string::String;
use alloc::sync::{Arc, Weak};
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;
use std::sync::OnceLock;

use vc_value::{Object, Value};

use crate::TranslateError;
use crate::config::UnknownMembers;
use crate::hash::HashMap;
use crate::info::{FieldDesc, Instance};
use crate::source::ObjectShape;
use crate::translate::{Translator, TranslatorRef, decode_slot, encode_slot};

// -----------------------------------------------------------------------------
// MemberMap

/// One member of a [`TypeMap`]: a field paired with its translator.
pub struct MemberMap {
    field: FieldDesc,
    translator: TranslatorRef,
    owner: Weak<TypeMap>,
}

impl MemberMap {
    pub(crate) fn new(field: FieldDesc, translator: TranslatorRef, owner: Weak<TypeMap>) -> Self {
        Self {
            field,
            translator,
            owner,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        self.field.name()
    }

    #[inline]
    pub const fn field(&self) -> &FieldDesc {
        &self.field
    }

    #[inline]
    pub fn translator(&self) -> &TranslatorRef {
        &self.translator
    }

    /// The type map this member belongs to, if it is still alive.
    #[inline]
    pub fn owner(&self) -> Option<Arc<TypeMap>> {
        self.owner.upgrade()
    }
}

impl fmt::Debug for MemberMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberMap")
            .field("name", &self.name())
            .field("translator", &self.translator.external_name())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// TypeMap

struct Members {
    list: Vec<MemberMap>,
    index: HashMap<String, usize>,
}

/// The translator of an object type: its external name and ordered members.
///
/// A type map is registered before its members are resolved, so fields that
/// refer back to the type (directly or through other types) find it. Its
/// member list is frozen exactly once and never changes afterwards.
///
/// Members hold their translators strongly. A type that reaches itself
/// through its fields therefore forms a reference cycle and its map is never
/// freed, even after the owning registry is dropped.
pub struct TypeMap {
    shape: Arc<ObjectShape>,
    unknown_members: UnknownMembers,
    members: OnceLock<Members>,
}

impl TypeMap {
    pub(crate) fn new(shape: Arc<ObjectShape>, unknown_members: UnknownMembers) -> Self {
        Self {
            shape,
            unknown_members,
            members: OnceLock::new(),
        }
    }

    /// Installs the member list. Returns `false` if members were already set.
    pub(crate) fn freeze(&self, list: Vec<MemberMap>) -> bool {
        let index = list
            .iter()
            .enumerate()
            .map(|(i, member)| (String::from(member.name()), i))
            .collect();
        self.members.set(Members { list, index }).is_ok()
    }

    /// The external type name.
    #[inline]
    pub fn name(&self) -> &str {
        self.shape.name()
    }

    #[inline]
    pub fn shape(&self) -> &ObjectShape {
        &self.shape
    }

    #[inline]
    pub fn is_frozen(&self) -> bool {
        self.members.get().is_some()
    }

    /// The members in field order; empty until frozen.
    #[inline]
    pub fn members(&self) -> &[MemberMap] {
        match self.members.get() {
            Some(members) => &members.list,
            None => &[],
        }
    }

    pub fn member(&self, name: &str) -> Option<&MemberMap> {
        let members = self.members.get()?;
        members.index.get(name).map(|&i| &members.list[i])
    }

    fn frozen(&self) -> Result<&Members, TranslateError> {
        self.members.get().ok_or_else(|| TranslateError::Incomplete {
            type_name: String::from(self.name()),
        })
    }
}

impl fmt::Debug for TypeMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeMap")
            .field("name", &self.name())
            .field("members", &self.members())
            .finish()
    }
}

impl Translator for TypeMap {
    #[inline]
    fn external_name(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.name())
    }

    fn to_value(&self, data: &dyn Any) -> Result<Value, TranslateError> {
        if data.type_id() != self.shape.owner() {
            return Err(TranslateError::WrongType {
                expected: self.shape.owner_path(),
            });
        }
        let members = self.frozen()?;

        let mut object = Object::with_capacity(members.list.len());
        for member in &members.list {
            let value = member
                .field
                .site()
                .read(data)
                .and_then(|slot| encode_slot(&*member.translator, slot))
                .map_err(|e| e.in_member(self.name(), member.name()))?;
            object.insert(member.name(), value);
        }
        Ok(Value::Object(object))
    }

    fn from_value(&self, value: &Value) -> Result<Instance, TranslateError> {
        let object = value
            .as_object()
            .ok_or_else(|| TranslateError::mismatch("object", value.kind()))?;
        let members = self.frozen()?;

        let mut instance = self.shape.construct();
        for (name, value) in object {
            let Some(&index) = members.index.get(name) else {
                match self.unknown_members {
                    UnknownMembers::Ignore => {
                        log::warn!("ignoring unknown member `{name}` of `{}`", self.name());
                        continue;
                    }
                    UnknownMembers::Reject => {
                        return Err(TranslateError::UnknownMember {
                            type_name: String::from(self.name()),
                            name: String::from(name),
                        });
                    }
                }
            };
            let member = &members.list[index];
            decode_slot(&*member.translator, value)
                .and_then(|slot| member.field.site().write(&mut *instance, slot))
                .map_err(|e| e.in_member(self.name(), name))?;
        }

        self.shape.post_construct(&mut *instance);
        self.shape
            .validate(&*instance)
            .map_err(|reason| TranslateError::Validation {
                type_name: String::from(self.name()),
                reason,
            })?;
        Ok(instance)
    }
}

// -----------------------------------------------------------------------------
// Tests
