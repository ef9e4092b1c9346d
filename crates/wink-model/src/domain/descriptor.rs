//! Entity descriptors for persistence and transport collaborators.
//!
//! A descriptor lists an entity's identity field, persisted attributes and
//! associations. Each attribute has a schema.org semantic type, a primitive
//! storage type and, when it can be assigned, the [`Constraint`] that
//! guards it. Adapters read descriptors; they never inspect entity
//! internals.

use super::rules::{Constraint, FieldRule};

/// schema.org vocabulary hint describing what a field means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SemanticType {
    /// `https://schema.org/identifier`
    Identifier,
    /// `https://schema.org/name`
    Name,
    /// `https://schema.org/Text`
    Text,
    /// `https://schema.org/Integer`
    Integer,
    /// `https://schema.org/email`
    Email,
    /// `https://schema.org/givenName`
    GivenName,
    /// `https://schema.org/familyName`
    FamilyName,
    /// `https://schema.org/birthDate`
    BirthDate,
    /// `https://schema.org/gender`
    Gender,
    /// `https://schema.org/image`
    Image,
}

impl SemanticType {
    /// IRI of the schema.org term.
    #[must_use]
    pub const fn iri(self) -> &'static str {
        match self {
            Self::Identifier => "https://schema.org/identifier",
            Self::Name => "https://schema.org/name",
            Self::Text => "https://schema.org/Text",
            Self::Integer => "https://schema.org/Integer",
            Self::Email => "https://schema.org/email",
            Self::GivenName => "https://schema.org/givenName",
            Self::FamilyName => "https://schema.org/familyName",
            Self::BirthDate => "https://schema.org/birthDate",
            Self::Gender => "https://schema.org/gender",
            Self::Image => "https://schema.org/image",
        }
    }
}

/// Primitive storage type of a persisted attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistedType {
    /// System-assigned UUID primary key.
    Uuid,
    /// Variable-length string column.
    String {
        /// Maximum column length in characters.
        length: usize,
    },
    /// String column restricted to a vocabulary.
    Enumerated {
        /// Maximum column length in characters.
        length: usize,
        /// Permitted values.
        values: &'static [&'static str],
    },
    /// 16-bit integer column.
    SmallInt,
    /// 32-bit integer column.
    Integer,
    /// Calendar date column.
    Date,
    /// Foreign key to another entity's identifier.
    Reference {
        /// Target entity name.
        target: &'static str,
    },
}

impl PersistedType {
    /// Maximum length for string-backed columns.
    #[must_use]
    pub const fn max_length(&self) -> Option<usize> {
        match self {
            Self::String { length } | Self::Enumerated { length, .. } => Some(*length),
            _ => None,
        }
    }
}

/// One persisted attribute of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Wire name of the field.
    pub name: &'static str,
    /// Column name in the backing table.
    pub column: &'static str,
    /// schema.org hint, when the field has one.
    pub semantic: Option<SemanticType>,
    /// Storage type.
    pub persisted: PersistedType,
    /// Whether the column accepts `NULL`.
    pub nullable: bool,
    /// Constraint guarding assignment; `None` for fields callers cannot
    /// assign directly, such as identifiers and derived values.
    pub constraint: Option<Constraint>,
}

impl FieldDescriptor {
    /// Rule guarding this field, if it is assignable.
    #[must_use]
    pub fn rule(&self) -> Option<FieldRule> {
        self.constraint.map(|constraint| FieldRule {
            field: self.name,
            constraint,
        })
    }
}

/// Cardinality of an association.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssociationKind {
    /// Either side may reference many instances of the other.
    ManyToMany {
        /// Join table holding the pairs.
        join_table: &'static str,
        /// Field on the target entity that mirrors this association.
        inverse: &'static str,
    },
    /// Many instances of this entity reference one target.
    ManyToOne,
}

/// Association from an entity to another entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssociationDescriptor {
    /// Wire name of the association field.
    pub name: &'static str,
    /// Target entity name.
    pub target: &'static str,
    /// Cardinality.
    pub kind: AssociationKind,
}

/// Static description of an entity for external collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityDescriptor {
    /// Entity name.
    pub name: &'static str,
    /// schema.org type IRI.
    pub iri: &'static str,
    /// Backing table.
    pub table: &'static str,
    /// Name of the identity field.
    pub identity: &'static str,
    /// Persisted attributes, identity included.
    pub fields: &'static [FieldDescriptor],
    /// Associations to other entities.
    pub associations: &'static [AssociationDescriptor],
}

impl EntityDescriptor {
    /// Look up a field by wire name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&'static FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Look up an association by wire name.
    #[must_use]
    pub fn association(&self, name: &str) -> Option<&'static AssociationDescriptor> {
        self.associations.iter().find(|assoc| assoc.name == name)
    }

    /// Rule guarding the named field, if the field exists and is assignable.
    #[must_use]
    pub fn rule(&self, name: &str) -> Option<FieldRule> {
        self.field(name).and_then(FieldDescriptor::rule)
    }

    /// Every assignable field's rule, in declaration order.
    #[must_use]
    pub fn rules(&self) -> Vec<FieldRule> {
        self.fields.iter().filter_map(FieldDescriptor::rule).collect()
    }
}

/// Entities that publish a static descriptor.
pub trait Describe {
    /// Descriptor for this entity type.
    fn descriptor() -> &'static EntityDescriptor;
}
