use alloc::sync::Arc;

use vc_value::Readability;

use crate::naming::{NameValidator, NonEmpty};

// -----------------------------------------------------------------------------
// UnknownMembers

/// What to do with inbound object members that match no field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UnknownMembers {
    /// Skip the member and log a warning.
    #[default]
    Ignore,
    /// Fail the translation with [`TranslateError::UnknownMember`](crate::TranslateError::UnknownMember).
    Reject,
}

// -----------------------------------------------------------------------------
// EngineConfig

/// Process-wide settings of an [`Engine`](crate::Engine).
///
/// Settings are read when translators are built, so they must be fixed
/// before the first translator is requested.
///
/// # Examples
///
/// ```
/// use vc_translate::naming::Identifier;
/// use vc_translate::{EngineConfig, Readability, UnknownMembers};
///
/// let config = EngineConfig::default()
///     .with_unknown_members(UnknownMembers::Reject)
///     .with_member_names(Identifier)
///     .with_readability(Readability::Pretty);
///
/// assert_eq!(config.unknown_members(), UnknownMembers::Reject);
/// assert!(!config.member_names().is_valid("not an identifier"));
/// assert!(config.type_names().is_valid("any name"));
/// ```
#[derive(Debug, Clone)]
pub struct EngineConfig {
    unknown_members: UnknownMembers,
    type_names: Arc<dyn NameValidator>,
    member_names: Arc<dyn NameValidator>,
    readability: Readability,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            unknown_members: UnknownMembers::Ignore,
            type_names: Arc::new(NonEmpty),
            member_names: Arc::new(NonEmpty),
            readability: Readability::Compact,
        }
    }
}

impl EngineConfig {
    /// The default configuration, but rejecting unknown members.
    #[inline]
    pub fn strict() -> Self {
        Self::default().with_unknown_members(UnknownMembers::Reject)
    }

    #[inline]
    pub fn with_unknown_members(mut self, policy: UnknownMembers) -> Self {
        self.unknown_members = policy;
        self
    }

    /// Sets the policy checked against every external type name.
    #[inline]
    pub fn with_type_names(mut self, policy: impl NameValidator + 'static) -> Self {
        self.type_names = Arc::new(policy);
        self
    }

    /// Sets the policy checked against every member name.
    #[inline]
    pub fn with_member_names(mut self, policy: impl NameValidator + 'static) -> Self {
        self.member_names = Arc::new(policy);
        self
    }

    /// Sets the default layout of text produced by the engine.
    #[inline]
    pub fn with_readability(mut self, readability: Readability) -> Self {
        self.readability = readability;
        self
    }

    #[inline]
    pub const fn unknown_members(&self) -> UnknownMembers {
        self.unknown_members
    }

    #[inline]
    pub fn type_names(&self) -> &dyn NameValidator {
        &*self.type_names
    }

    #[inline]
    pub fn member_names(&self) -> &dyn NameValidator {
        &*self.member_names
    }

    #[inline]
    pub const fn readability(&self) -> Readability {
        self.readability
    }
}
