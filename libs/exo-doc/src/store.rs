// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::instrument;

use crate::{
    bulk::{BulkCopy, DbBulkInserter, TransactionScope},
    config::{Environment, StoreConfig},
    database_error::{DatabaseError, WithContext},
    query::{QueryBuilder, QueryCommand},
    schema::{StructureSchema, StructureSchemas, StructureType},
    sql::SqlQuery,
    structure::{IdAssigner, IdentityGenerator, StructureBuilder, StructureId},
    transform::QueryGenerator,
};

/// Entry point for storing documents as structures and querying them.
pub struct StructureStore {
    config: StoreConfig,
    schemas: StructureSchemas,
    id_assigner: IdAssigner,
    bulk_inserter: DbBulkInserter,
    query_generator: QueryGenerator,
}

impl StructureStore {
    pub fn new(
        config: StoreConfig,
        bulk_copy: Arc<dyn BulkCopy>,
        identity_generator: Option<Arc<dyn IdentityGenerator>>,
    ) -> Self {
        Self {
            schemas: StructureSchemas::new(),
            id_assigner: IdAssigner::new(identity_generator),
            bulk_inserter: DbBulkInserter::new(
                bulk_copy,
                config.schema_name.clone(),
                config.bulk_insert,
            ),
            query_generator: QueryGenerator::new(config.schema_name.clone()),
            config,
        }
    }

    pub fn from_env(
        env: &dyn Environment,
        bulk_copy: Arc<dyn BulkCopy>,
        identity_generator: Option<Arc<dyn IdentityGenerator>>,
    ) -> Result<Self, DatabaseError> {
        Ok(Self::new(
            StoreConfig::from_env(env)?,
            bulk_copy,
            identity_generator,
        ))
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn schemas(&self) -> &StructureSchemas {
        &self.schemas
    }

    pub fn schema<T: StructureType>(&self) -> Result<Arc<StructureSchema>, DatabaseError> {
        self.schemas.get_schema::<T>()
    }

    /// Insert documents, returning their ids in input order
    pub async fn insert<T: StructureType>(
        &self,
        items: &[T],
        transaction: Option<&dyn TransactionScope>,
    ) -> Result<Vec<StructureId>, DatabaseError> {
        self.insert_as::<T, T>(items, transaction).await
    }

    /// Insert values of `U` as structures of `T`.
    ///
    /// The stored bodies are the serialized `U` values, while only the members declared by `T`'s
    /// schema are indexed.
    #[instrument(
        name = "StructureStore::insert"
        skip_all
        fields(structure = std::any::type_name::<T>(), count = items.len())
        )]
    pub async fn insert_as<T: StructureType, U: Serialize>(
        &self,
        items: &[U],
        transaction: Option<&dyn TransactionScope>,
    ) -> Result<Vec<StructureId>, DatabaseError> {
        let schema = self.schemas.get_schema::<T>()?;

        let mut documents = items
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<Value>, _>>()?;
        let ids = self.id_assigner.assign(&schema, &mut documents).await?;
        let structures = StructureBuilder::new(&schema).build_all(&ids, &documents)?;

        self.bulk_inserter
            .insert(&schema, &structures, transaction)
            .await
            .with_context(format!("While inserting into '{}':", schema.name()))?;

        Ok(ids)
    }

    pub fn query(&self) -> QueryBuilder {
        QueryBuilder::new()
    }

    pub fn generate_query<T: StructureType>(
        &self,
        command: &QueryCommand,
    ) -> Result<SqlQuery, DatabaseError> {
        let schema = self.schemas.get_schema::<T>()?;
        self.query_generator.generate(&schema, command)
    }

    pub fn get_by_id_query<T: StructureType>(
        &self,
        id: impl Into<StructureId>,
    ) -> Result<SqlQuery, DatabaseError> {
        let schema = self.schemas.get_schema::<T>()?;
        self.query_generator.get_by_id(&schema, id.into())
    }
}

#[cfg(test)]
mod tests {
    use serde::Serialize;
    use uuid::Uuid;

    use super::*;
    use crate::{
        config::MapEnvironment,
        query::{member, value},
        schema::{DataType, IdStrategy},
        structure::StorageValue,
        testing::{RecordingBulkCopy, SequentialIdentityGenerator},
    };

    #[derive(Serialize)]
    #[serde(rename_all = "PascalCase")]
    struct Customer {
        #[serde(skip_serializing_if = "Option::is_none")]
        structure_id: Option<Uuid>,
        name: String,
        email: Option<String>,
    }

    impl StructureType for Customer {
        fn structure_schema() -> Result<StructureSchema, DatabaseError> {
            StructureSchema::builder("Customer")
                .index("Name", DataType::String)
                .unique("Email", DataType::String)
                .build()
        }
    }

    #[derive(Serialize)]
    #[serde(rename_all = "PascalCase")]
    struct PremiumCustomer {
        name: String,
        email: Option<String>,
        loyalty_points: i64,
    }

    #[derive(Serialize)]
    #[serde(rename_all = "PascalCase")]
    struct Invoice {
        customer_id: Uuid,
        amount: f64,
    }

    impl StructureType for Invoice {
        fn structure_schema() -> Result<StructureSchema, DatabaseError> {
            StructureSchema::builder("Invoice")
                .id_strategy(IdStrategy::AutoIncrement)
                .index("CustomerId", DataType::Guid)
                .index("Amount", DataType::Float)
                .build()
        }
    }

    fn customer(name: &str, email: Option<&str>) -> Customer {
        Customer {
            structure_id: None,
            name: name.to_string(),
            email: email.map(str::to_string),
        }
    }

    fn store(bulk_copy: Arc<RecordingBulkCopy>) -> StructureStore {
        StructureStore::new(
            StoreConfig::default(),
            bulk_copy,
            Some(Arc::new(SequentialIdentityGenerator::starting_at(1))),
        )
    }

    #[test_log::test(tokio::test)]
    async fn insert_assigns_ids_and_writes_three_tables() {
        let bulk_copy = Arc::new(RecordingBulkCopy::new());
        let store = store(bulk_copy.clone());

        let ids = store
            .insert(
                &[customer("Anna", Some("anna@example.com")), customer("Bo", None)],
                None,
            )
            .await
            .unwrap();

        assert_eq!(ids.len(), 2);
        assert!(ids.iter().all(|id| matches!(id, StructureId::Guid(_))));
        assert_eq!(
            bulk_copy.tables(),
            vec!["CustomerStructure", "CustomerIndex", "CustomerUnique"]
        );

        let writes = bulk_copy.writes();
        let body = match &writes[0].rows[0][1] {
            StorageValue::String(body) => body.clone(),
            other => panic!("Unexpected body {other:?}"),
        };
        let body: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(body["StructureId"], ids[0].to_json());
        assert_eq!(writes[2].rows.len(), 1);
    }

    #[test_log::test(tokio::test)]
    async fn auto_increment_ids_come_from_the_generator() {
        let bulk_copy = Arc::new(RecordingBulkCopy::new());
        let store = store(bulk_copy.clone());
        let customer_id = Uuid::new_v4();

        let ids = store
            .insert(
                &[
                    Invoice {
                        customer_id,
                        amount: 10.5,
                    },
                    Invoice {
                        customer_id,
                        amount: 99.0,
                    },
                ],
                None,
            )
            .await
            .unwrap();

        assert_eq!(ids, vec![StructureId::Identity(1), StructureId::Identity(2)]);
        let writes = bulk_copy.writes();
        assert!(writes[0].keep_identities);
        assert_eq!(
            writes[1].rows[1],
            vec![
                StorageValue::Int(2),
                StorageValue::Guid(customer_id),
                StorageValue::Float(99.0)
            ]
        );
        assert_eq!(bulk_copy.tables().len(), 2);
    }

    #[test_log::test(tokio::test)]
    async fn richer_values_are_indexed_as_the_base_schema() {
        let bulk_copy = Arc::new(RecordingBulkCopy::new());
        let store = store(bulk_copy.clone());

        store
            .insert_as::<Customer, _>(
                &[PremiumCustomer {
                    name: "Vera".into(),
                    email: None,
                    loyalty_points: 1200,
                }],
                None,
            )
            .await
            .unwrap();

        let writes = bulk_copy.writes();
        assert!(matches!(
            &writes[0].rows[0][1],
            StorageValue::String(body) if body.contains(r#""LoyaltyPoints":1200"#)
        ));
        assert_eq!(writes[1].columns, vec!["StructureId", "Name"]);
        assert_eq!(writes[1].rows[0][1], StorageValue::from("Vera"));
    }

    #[test_log::test(tokio::test)]
    async fn upper_case_guids_are_accepted() {
        #[derive(Serialize)]
        #[serde(rename_all = "PascalCase")]
        struct Imported {
            structure_id: String,
            name: String,
        }

        let bulk_copy = Arc::new(RecordingBulkCopy::new());
        let store = store(bulk_copy.clone());

        let ids = store
            .insert_as::<Customer, _>(
                &[Imported {
                    structure_id: "6F9619FF-8B86-D011-B42D-00CF4FC964FF".into(),
                    name: "Ida".into(),
                }],
                None,
            )
            .await
            .unwrap();

        let expected = Uuid::parse_str("6f9619ff-8b86-d011-b42d-00cf4fc964ff").unwrap();
        assert_eq!(ids, vec![StructureId::Guid(expected)]);
        let writes = bulk_copy.writes();
        assert_eq!(writes[0].rows[0][0], StorageValue::Guid(expected));
        assert!(matches!(
            &writes[0].rows[0][1],
            StorageValue::String(body) if body.contains("6f9619ff-8b86-d011-b42d-00cf4fc964ff")
        ));
    }

    #[test_log::test(tokio::test)]
    async fn failed_writes_carry_context() {
        let bulk_copy = Arc::new(RecordingBulkCopy::failing_on("CustomerStructure"));
        let store = store(bulk_copy.clone());

        let err = store
            .insert(&[customer("Anna", None)], None)
            .await
            .unwrap_err();

        assert!(matches!(
            &err,
            DatabaseError::WithContext(_, inner) if matches!(**inner, DatabaseError::BackendWrite { .. })
        ));
        assert_eq!(bulk_copy.tables(), vec!["CustomerStructure"]);
    }

    #[test]
    fn queries_use_the_configured_namespace() {
        let env = MapEnvironment::from([("EXO_DOC_SCHEMA_NAME", "docs")]);
        let store =
            StructureStore::from_env(&env, Arc::new(RecordingBulkCopy::new()), None).unwrap();

        let command = store
            .query()
            .filter(member("Amount").gte(value(50.0)))
            .unwrap()
            .sort_by(&[member("Amount").desc()])
            .unwrap()
            .include("Customer", &[member("CustomerId")])
            .unwrap()
            .build();

        let query = store.generate_query::<Invoice>(&command).unwrap();
        assert_eq!(
            query.sql,
            "select s.[Json], \
             (select cs0.[json] from [docs].[CustomerStructure] as cs0 where si.[CustomerId] = cs0.StructureId) as [Customer] \
             from [docs].[InvoiceStructure] as s inner join [docs].[InvoiceIndex] as si on si.[StructureId] = s.[StructureId] \
             where si.[Amount] >= @p0 order by si.[Amount] desc"
        );

        let query = store.get_by_id_query::<Invoice>(7_i64).unwrap();
        assert_eq!(
            query.sql,
            "select s.[Json] from [docs].[InvoiceStructure] as s where s.[StructureId] = @p0"
        );
        assert_eq!(query.params, vec![StorageValue::Int(7)]);
    }
}
