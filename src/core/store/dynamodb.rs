//! DynamoDB secret store.
//!
//! Enable with `--features aws`.
//!
//! Table layout: hash key `namespace`, range key `key`, attribute `value`,
//! all strings. Credentials come from the default AWS provider chain.

use std::collections::{BTreeSet, HashMap};

use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::{
    AttributeDefinition, AttributeValue, DeleteRequest, KeySchemaElement, KeyType,
    ProvisionedThroughput, PutRequest, ScalarAttributeType, WriteRequest,
};
use aws_sdk_dynamodb::Client;
use tokio::runtime::Runtime;
use tracing::{debug, trace};

use super::{check_batch, SecretStore};
use crate::core::aws;
use crate::core::domain::{Secret, Secrets};
use crate::error::{Result, StoreError};

const NAMESPACE: &str = "namespace";
const KEY: &str = "key";
const VALUE: &str = "value";

type Item = HashMap<String, AttributeValue>;

/// Secret store backed by a DynamoDB table.
pub struct DynamoDb {
    rt: Runtime,
    client: Client,
}

impl std::fmt::Debug for DynamoDb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamoDb").finish_non_exhaustive()
    }
}

impl DynamoDb {
    /// Connect using the default credential chain.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the runtime cannot be started.
    pub fn connect(region: Option<&str>) -> Result<Self> {
        let rt = aws::runtime()?;
        let config = aws::load_config(&rt, region);
        let client = Client::new(&config);
        Ok(Self { rt, client })
    }

    fn write(&self, table: &str, namespace: &str, requests: Vec<WriteRequest>) -> Result<()> {
        if requests.is_empty() {
            return Ok(());
        }

        trace!(table, namespace, items = requests.len(), "batch write");

        let output = self
            .rt
            .block_on(
                self.client
                    .batch_write_item()
                    .request_items(table, requests)
                    .send(),
            )
            .map_err(|e| write_error(namespace, DisplayErrorContext(&e)))?;

        let unprocessed = output
            .unprocessed_items()
            .map(|items| items.values().map(Vec::len).sum::<usize>())
            .unwrap_or(0);
        if unprocessed > 0 {
            return Err(write_error(
                namespace,
                format!("{unprocessed} items were not processed, re-run sync"),
            ));
        }

        Ok(())
    }
}

fn s(value: &str) -> AttributeValue {
    AttributeValue::S(value.to_string())
}

fn write_error(namespace: &str, message: impl std::fmt::Display) -> crate::error::Error {
    StoreError::Write {
        namespace: namespace.to_string(),
        message: message.to_string(),
    }
    .into()
}

fn string_attr(item: &Item, name: &str) -> Option<String> {
    item.get(name).and_then(|v| v.as_s().ok()).cloned()
}

impl SecretStore for DynamoDb {
    fn create_table(&self, table: &str) -> Result<()> {
        debug!(table, "creating DynamoDB table");

        let create_error = |message: String| StoreError::CreateTable {
            table: table.to_string(),
            message,
        };

        let attribute = |name: &str| {
            AttributeDefinition::builder()
                .attribute_name(name)
                .attribute_type(ScalarAttributeType::S)
                .build()
                .map_err(|e| create_error(e.to_string()))
        };
        let key = |name: &str, key_type: KeyType| {
            KeySchemaElement::builder()
                .attribute_name(name)
                .key_type(key_type)
                .build()
                .map_err(|e| create_error(e.to_string()))
        };
        let throughput = ProvisionedThroughput::builder()
            .read_capacity_units(1)
            .write_capacity_units(1)
            .build()
            .map_err(|e| create_error(e.to_string()))?;

        let request = self
            .client
            .create_table()
            .table_name(table)
            .attribute_definitions(attribute(NAMESPACE)?)
            .attribute_definitions(attribute(KEY)?)
            .key_schema(key(NAMESPACE, KeyType::Hash)?)
            .key_schema(key(KEY, KeyType::Range)?)
            .provisioned_throughput(throughput);

        self.rt
            .block_on(request.send())
            .map_err(|e| create_error(DisplayErrorContext(&e).to_string()))?;
        Ok(())
    }

    fn table_exists(&self, table: &str) -> Result<bool> {
        let result = self
            .rt
            .block_on(self.client.describe_table().table_name(table).send());

        match result {
            Ok(_) => Ok(true),
            Err(e)
                if e.as_service_error()
                    .map(|se| se.is_resource_not_found_exception())
                    .unwrap_or(false) =>
            {
                Ok(false)
            }
            Err(e) => Err(StoreError::Read {
                namespace: String::new(),
                message: DisplayErrorContext(&e).to_string(),
            }
            .into()),
        }
    }

    fn list_secrets(&self, table: &str, namespace: &str) -> Result<Secrets> {
        debug!(table, namespace, "querying secrets");

        let mut secrets = Secrets::new();
        let mut start: Option<Item> = None;

        loop {
            let output = self
                .rt
                .block_on(
                    self.client
                        .query()
                        .table_name(table)
                        .key_condition_expression("#ns = :ns")
                        .expression_attribute_names("#ns", NAMESPACE)
                        .expression_attribute_values(":ns", s(namespace))
                        .set_exclusive_start_key(start.take())
                        .send(),
                )
                .map_err(|e| StoreError::Read {
                    namespace: namespace.to_string(),
                    message: DisplayErrorContext(&e).to_string(),
                })?;

            for item in output.items() {
                if let (Some(key), Some(value)) = (string_attr(item, KEY), string_attr(item, VALUE))
                {
                    secrets.push(Secret::new(key, value));
                }
            }

            match output.last_evaluated_key() {
                Some(last) if !last.is_empty() => start = Some(last.clone()),
                _ => break,
            }
        }

        Ok(secrets)
    }

    fn list_namespaces(&self, table: &str) -> Result<Vec<String>> {
        debug!(table, "scanning namespaces");

        let mut namespaces = BTreeSet::new();
        let mut start: Option<Item> = None;

        loop {
            let output = self
                .rt
                .block_on(
                    self.client
                        .scan()
                        .table_name(table)
                        .projection_expression("#ns")
                        .expression_attribute_names("#ns", NAMESPACE)
                        .set_exclusive_start_key(start.take())
                        .send(),
                )
                .map_err(|e| StoreError::ListNamespaces {
                    table: table.to_string(),
                    message: DisplayErrorContext(&e).to_string(),
                })?;

            namespaces.extend(output.items().iter().filter_map(|i| string_attr(i, NAMESPACE)));

            match output.last_evaluated_key() {
                Some(last) if !last.is_empty() => start = Some(last.clone()),
                _ => break,
            }
        }

        Ok(namespaces.into_iter().collect())
    }

    fn insert(&self, table: &str, namespace: &str, secrets: &[Secret]) -> Result<()> {
        check_batch(secrets)?;

        let requests = secrets
            .iter()
            .map(|secret| {
                let put = PutRequest::builder()
                    .item(NAMESPACE, s(namespace))
                    .item(KEY, s(secret.key()))
                    .item(VALUE, s(secret.value()))
                    .build()
                    .map_err(|e| write_error(namespace, e))?;
                Ok(WriteRequest::builder().put_request(put).build())
            })
            .collect::<Result<Vec<_>>>()?;

        self.write(table, namespace, requests)
    }

    fn delete(&self, table: &str, namespace: &str, secrets: &[Secret]) -> Result<()> {
        check_batch(secrets)?;

        let requests = secrets
            .iter()
            .map(|secret| {
                let delete = DeleteRequest::builder()
                    .key(NAMESPACE, s(namespace))
                    .key(KEY, s(secret.key()))
                    .build()
                    .map_err(|e| write_error(namespace, e))?;
                Ok(WriteRequest::builder().delete_request(delete).build())
            })
            .collect::<Result<Vec<_>>>()?;

        self.write(table, namespace, requests)
    }
}
