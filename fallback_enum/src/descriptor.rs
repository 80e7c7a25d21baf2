use std::{
    collections::HashSet,
    sync::{Arc, PoisonError, RwLock},
};

use log::trace;
use serde_json::Value;

use crate::{
    config::ResolveConfig,
    error::{FallbackError, FallbackResult},
    member::{CanonicalMember, Member},
    repr::{loosely_equal, Repr},
    resolver,
};

/// Runtime description of an enumeration: its closed set of canonical members
/// and the resolution configuration shared by every lookup on it.
///
/// The canonical members are fixed once the descriptor is created. Only the
/// shared [`ResolveConfig`] can change afterwards.
#[derive(Debug)]
pub struct EnumDescriptor {
    name: Arc<str>,
    repr: Repr,
    members: Vec<CanonicalMember>,
    config: RwLock<ResolveConfig>,
}

impl EnumDescriptor {
    /// Creates a descriptor from already validated `(name, value)` pairs.
    ///
    /// Used by `#[derive(FallbackEnum)]`, which checks the definition at compile time.
    /// Definitions assembled at runtime should go through [`EnumDescriptor::builder`].
    pub fn new<N, I, S>(name: N, repr: Repr, members: I) -> Self
    where
        N: AsRef<str>,
        I: IntoIterator<Item = (S, Value)>,
        S: Into<String>,
    {
        let name: Arc<str> = Arc::from(name.as_ref());
        let members = members
            .into_iter()
            .enumerate()
            .map(|(index, (member_name, value))| {
                CanonicalMember::new(
                    Arc::clone(&name),
                    index,
                    member_name.into(),
                    repr.normalize(value),
                )
            })
            .collect();

        Self {
            name,
            repr,
            members,
            config: RwLock::new(ResolveConfig::default()),
        }
    }

    pub fn builder<N>(name: N, repr: Repr) -> EnumDescriptorBuilder
    where
        N: Into<String>,
    {
        EnumDescriptorBuilder {
            name: name.into(),
            repr,
            members: Vec::new(),
            config: ResolveConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: ResolveConfig) -> Self {
        *self.config.get_mut().unwrap_or_else(PoisonError::into_inner) = config;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn shared_name(&self) -> Arc<str> {
        Arc::clone(&self.name)
    }

    pub fn repr(&self) -> Repr {
        self.repr
    }

    pub fn members(&self) -> &[CanonicalMember] {
        &self.members
    }

    pub fn member(&self, name: &str) -> Option<&CanonicalMember> {
        self.members.iter().find(|m| m.name() == name)
    }

    /// Standard lookup of a canonical member by value.
    pub fn lookup(&self, value: &Value) -> Option<&CanonicalMember> {
        self.members.iter().find(|m| loosely_equal(m.value(), value))
    }

    /// Whether `member` is one of this enumeration's canonical members.
    pub fn owns(&self, member: &CanonicalMember) -> bool {
        self.members.iter().any(|m| std::ptr::eq(m, member))
    }

    /// Whether `member` was produced by this enumeration, canonical or not.
    ///
    /// Enumerations sharing a name are still told apart.
    pub fn owns_member(&self, member: &Member<'_>) -> bool {
        match member {
            Member::Canonical(m) => self.owns(m),
            Member::Unknown(m) => m.is_from(&self.name),
        }
    }

    /// Snapshot of the shared resolution configuration.
    pub fn config(&self) -> ResolveConfig {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replaces the shared resolution configuration.
    ///
    /// Lookups already in flight keep the snapshot they read.
    pub fn set_config(&self, config: ResolveConfig) {
        *self.config.write().unwrap_or_else(PoisonError::into_inner) = config;
    }

    /// Construction by value: the canonical member if there is one,
    /// otherwise whatever [`EnumDescriptor::on_lookup_miss`] produces.
    pub fn construct(&self, value: Value) -> FallbackResult<Member<'_>> {
        match self.lookup(&value) {
            Some(member) => Ok(Member::Canonical(member)),
            None => self.on_lookup_miss(value),
        }
    }

    /// Hook invoked when no canonical member matches `value`.
    ///
    /// Resolves the value with the shared configuration of the enumeration.
    pub fn on_lookup_miss(&self, value: Value) -> FallbackResult<Member<'_>> {
        trace!(
            "EnumDescriptor::on_lookup_miss >> {}: no canonical member for {}",
            self.name,
            value
        );

        let config = self.config();
        resolver::resolve_missing(self, value, &config)
    }
}

/// Builder validating an enumeration defined at runtime.
#[derive(Debug)]
pub struct EnumDescriptorBuilder {
    name: String,
    repr: Repr,
    members: Vec<(String, Value)>,
    config: ResolveConfig,
}

impl EnumDescriptorBuilder {
    #[must_use]
    pub fn member<S, V>(mut self, name: S, value: V) -> Self
    where
        S: Into<String>,
        V: Into<Value>,
    {
        self.members.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn config(mut self, config: ResolveConfig) -> Self {
        self.config = config;
        self
    }

    /// Checks the definition and builds the descriptor.
    ///
    /// # Errors
    ///
    /// A [`FallbackError::Definition`] is returned if the enumeration has no name,
    /// a member has an empty or duplicate name, a value does not fit the
    /// representation, or two members share a value.
    pub fn build(self) -> FallbackResult<EnumDescriptor> {
        if self.name.is_empty() {
            return Err(FallbackError::definition("enumeration name cannot be empty"));
        }

        let mut names = HashSet::new();
        let mut values: Vec<Value> = Vec::with_capacity(self.members.len());

        for (name, value) in &self.members {
            if name.is_empty() {
                return Err(FallbackError::definition(format!(
                    "{}: member names cannot be empty",
                    self.name
                )));
            }

            if !names.insert(name.as_str()) {
                return Err(FallbackError::definition(format!(
                    "{}: duplicate member name {name}",
                    self.name
                )));
            }

            if !self.repr.holds_canonical(value) {
                return Err(FallbackError::definition(format!(
                    "{}: value {value} of member {name} is not a valid {} value",
                    self.name, self.repr
                )));
            }

            let value = self.repr.normalize(value.clone());

            if values.iter().any(|v| loosely_equal(v, &value)) {
                return Err(FallbackError::definition(format!(
                    "{}: duplicate member value {value}",
                    self.name
                )));
            }

            values.push(value);
        }

        Ok(EnumDescriptor::new(self.name, self.repr, self.members).with_config(self.config))
    }
}
