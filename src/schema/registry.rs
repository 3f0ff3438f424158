//! Entity schema registry
//!
//! Built once at process start from a list of schemas, validated as a whole,
//! and read-only afterwards. The registry owns the global dependency order:
//! a topological ordering of the foreign-key graph in which every parent
//! precedes its children. Ties are broken by declaration order so the order
//! is deterministic.

use std::collections::{HashMap, HashSet};

use super::catalog;
use super::errors::{SchemaError, SchemaResult};
use super::types::EntitySchema;

/// Immutable table of entity schemas plus their dependency order.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    schemas: Vec<EntitySchema>,
    index: HashMap<String, usize>,
    order: Vec<String>,
}

impl SchemaRegistry {
    /// Builds a registry and computes its dependency order.
    ///
    /// # Arguments
    ///
    /// * `schemas` - Entity schemas in declaration order; ties in the
    ///   dependency order resolve to the earlier declaration
    ///
    /// # Errors
    ///
    /// Returns a `SchemaError` for a structurally invalid schema, an id field
    /// missing from `required_fields`, a duplicate entity name, a foreign key
    /// to an unregistered parent, or a dependency cycle.
    pub fn new(mut schemas: Vec<EntitySchema>) -> SchemaResult<Self> {
        let mut index = HashMap::with_capacity(schemas.len());

        for (i, schema) in schemas.iter_mut().enumerate() {
            schema.normalize();
            schema
                .validate_structure()
                .map_err(|e| SchemaError::malformed("<registry>", e))?;

            if !schema.required_fields.contains(&schema.id_field) {
                return Err(SchemaError::id_not_required(&schema.name, &schema.id_field));
            }

            if index.insert(schema.name.clone(), i).is_some() {
                return Err(SchemaError::duplicate_entity(&schema.name));
            }
        }

        for schema in &schemas {
            for fk in &schema.foreign_keys {
                if !index.contains_key(&fk.parent_entity) {
                    return Err(SchemaError::unknown_parent(
                        &schema.name,
                        &fk.field,
                        &fk.parent_entity,
                    ));
                }
            }
        }

        let order = topological_order(&schemas)?;

        Ok(Self {
            schemas,
            index,
            order,
        })
    }

    /// Registry holding the built-in life-insurance catalog.
    pub fn builtin() -> SchemaResult<Self> {
        Self::new(catalog::life_insurance())
    }

    /// Looks up a schema by entity name.
    pub fn get(&self, entity: &str) -> Option<&EntitySchema> {
        self.index.get(entity).map(|&i| &self.schemas[i])
    }

    /// Looks up a schema, failing with `LAKE_SCHEMA_UNKNOWN_ENTITY`.
    pub fn schema(&self, entity: &str) -> SchemaResult<&EntitySchema> {
        self.get(entity)
            .ok_or_else(|| SchemaError::unknown_entity(entity))
    }

    pub fn contains(&self, entity: &str) -> bool {
        self.index.contains_key(entity)
    }

    /// Entity names, parents before children.
    pub fn dependency_order(&self) -> &[String] {
        &self.order
    }

    /// Schemas in dependency order.
    pub fn in_dependency_order(&self) -> impl Iterator<Item = &EntitySchema> {
        self.order
            .iter()
            .filter_map(move |name| self.get(name))
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

/// Kahn's algorithm, picking the earliest-declared ready entity each round.
fn topological_order(schemas: &[EntitySchema]) -> SchemaResult<Vec<String>> {
    let mut placed: HashSet<&str> = HashSet::with_capacity(schemas.len());
    let mut order = Vec::with_capacity(schemas.len());

    while order.len() < schemas.len() {
        let ready = schemas.iter().find(|s| {
            !placed.contains(s.name.as_str())
                && s.foreign_keys
                    .iter()
                    .all(|fk| fk.parent_entity != s.name && placed.contains(fk.parent_entity.as_str()))
        });

        match ready {
            Some(schema) => {
                placed.insert(&schema.name);
                order.push(schema.name.clone());
            }
            None => {
                let remaining: Vec<String> = schemas
                    .iter()
                    .filter(|s| !placed.contains(s.name.as_str()))
                    .map(|s| s.name.clone())
                    .collect();
                return Err(SchemaError::cycle(&remaining));
            }
        }
    }

    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaErrorCode;

    fn schema(name: &str) -> EntitySchema {
        EntitySchema::new(name, "id")
    }

    #[test]
    fn test_order_puts_parents_first() {
        let registry = SchemaRegistry::new(vec![
            schema("claims").references("policy_id", "policies", "id"),
            schema("policies").references("customer_id", "customers", "id"),
            schema("customers"),
        ])
        .unwrap();

        assert_eq!(
            registry.dependency_order(),
            &["customers".to_string(), "policies".to_string(), "claims".to_string()]
        );
    }

    #[test]
    fn test_ties_follow_declaration_order() {
        let registry = SchemaRegistry::new(vec![
            schema("customers"),
            schema("agents"),
            schema("quotes")
                .references("customer_id", "customers", "id")
                .references("agent_id", "agents", "id"),
        ])
        .unwrap();

        assert_eq!(registry.dependency_order()[0], "customers");
        assert_eq!(registry.dependency_order()[1], "agents");
        assert_eq!(registry.dependency_order()[2], "quotes");
    }

    #[test]
    fn test_cycle_rejected() {
        let result = SchemaRegistry::new(vec![
            schema("a").references("b_id", "b", "id"),
            schema("b").references("a_id", "a", "id"),
        ]);
        assert_eq!(result.unwrap_err().code(), SchemaErrorCode::Cycle);
    }

    #[test]
    fn test_self_reference_is_a_cycle() {
        let result = SchemaRegistry::new(vec![schema("a").references("parent", "a", "id")]);
        assert_eq!(result.unwrap_err().code(), SchemaErrorCode::Cycle);
    }

    #[test]
    fn test_unknown_parent_rejected() {
        let result = SchemaRegistry::new(vec![schema("quotes").references("c", "customers", "id")]);
        let err = result.unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::UnknownParent);
        assert_eq!(err.entity(), Some("quotes"));
    }

    #[test]
    fn test_duplicate_rejected() {
        let result = SchemaRegistry::new(vec![schema("a"), schema("a")]);
        assert_eq!(result.unwrap_err().code(), SchemaErrorCode::DuplicateEntity);
    }

    #[test]
    fn test_id_must_be_required() {
        let mut s = schema("a");
        s.required_fields.clear();
        let result = SchemaRegistry::new(vec![s]);
        assert_eq!(result.unwrap_err().code(), SchemaErrorCode::IdNotRequired);
    }

    #[test]
    fn test_unknown_entity_lookup() {
        let registry = SchemaRegistry::new(vec![schema("a")]).unwrap();
        assert!(registry.get("zzz").is_none());
        assert_eq!(
            registry.schema("zzz").unwrap_err().code(),
            SchemaErrorCode::UnknownEntity
        );
    }
}
