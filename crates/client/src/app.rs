//! One dynq invocation: resolve, build, emit.

use std::io::Write;

use dynq_core::{
    build_key_condition, emit, resolve_schema, EmissionReport, EmissionState, ItemSink,
    SinkStatus, TableCatalog, Termination,
};
use tracing::{debug, info};

use crate::cli::Cli;
use crate::config::create_client;
use crate::error::Result;
use crate::output::{sink_for, write_table_names};
use crate::store::conversions::item_to_result;
use crate::store::{DynamoStore, ItemStore, ReadOptions};

/// A scan or query request assembled from the positional arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub table: String,
    pub partition: Option<String>,
    pub sort: Option<String>,
    /// Maximum items to forward. 0 means unlimited.
    pub cap: usize,
    pub read: ReadOptions,
}

/// Runs the command described by `cli` against DynamoDB, writing to stdout.
pub async fn run(cli: &Cli) -> Result<()> {
    let aws_config = cli.aws_config();
    debug!(aws = %aws_config.target_display(), "Connecting");
    let store = DynamoStore::new(create_client(&aws_config).await);
    let stdout = std::io::stdout();

    match cli.invocation() {
        None => list_tables(&store, stdout.lock()).await,
        Some(invocation) => {
            let mut sink = sink_for(cli.output, cli.output_format(), stdout.lock());
            retrieve(&store, &invocation, sink.as_mut()).await?;
            Ok(())
        }
    }
}

/// Prints every table name.
pub async fn list_tables<C, W>(catalog: &C, writer: W) -> Result<()>
where
    C: TableCatalog + ?Sized,
    W: Write,
{
    let names = catalog.list_tables().await?;
    debug!(count = names.len(), "Listed tables");
    write_table_names(writer, &names)?;
    Ok(())
}

/// Scans or queries according to `invocation`, forwarding items to `sink`.
///
/// The schema is only resolved when a partition value is given, and the sort
/// expression only parsed when present.
pub async fn retrieve<S, K>(store: &S, invocation: &Invocation, sink: &mut K) -> Result<EmissionReport>
where
    S: ItemStore,
    K: ItemSink + ?Sized,
{
    let mut pages = match &invocation.partition {
        None => store.scan(&invocation.table, &invocation.read),
        Some(partition) => {
            let schema = resolve_schema(
                store,
                &invocation.table,
                invocation.read.index_name.as_deref(),
            )
            .await?;
            let condition = build_key_condition(&schema, partition, invocation.sort.as_deref())?;
            debug!(
                expression = %condition.expression,
                names = ?condition.names,
                values = ?condition.values,
                "Built key condition"
            );
            store.query(condition, &invocation.read)
        }
    };

    let mut state = EmissionState::new(invocation.cap);
    let report = emit(&mut pages, item_to_result, sink, &mut state).await?;

    let closed = match report.termination {
        Termination::SinkClosed => true,
        _ => sink.finish()? == SinkStatus::Closed,
    };
    if closed {
        debug!("Output closed by reader");
    }

    info!(
        emitted = report.emitted,
        pages = report.pages,
        termination = ?report.termination,
        "Retrieval finished"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use aws_sdk_dynamodb::types::AttributeValue;
    use dynq_core::{
        IndexDescription, KeyCondition, KeyElement, PageSource, ResultItem, ScalarType,
        StoreError, TableDescription, TypedValue,
    };

    use super::*;
    use crate::store::Item;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Describe(String),
        Scan(String, ReadOptions),
        Query(KeyCondition, ReadOptions),
    }

    /// In-memory store serving fixed pages and recording every call.
    #[derive(Default)]
    struct FakeStore {
        description: Option<TableDescription>,
        pages: Vec<Vec<Item>>,
        calls: Arc<Mutex<Vec<Call>>>,
        requests: Arc<Mutex<usize>>,
    }

    struct FakePages {
        pages: std::vec::IntoIter<Vec<Item>>,
        requests: Arc<Mutex<usize>>,
    }

    #[async_trait]
    impl PageSource for FakePages {
        type Record = Item;

        async fn next_page(&mut self) -> std::result::Result<Option<Vec<Item>>, StoreError> {
            let page = self.pages.next();
            if page.is_some() {
                *self.requests.lock().unwrap() += 1;
            }
            Ok(page)
        }
    }

    #[async_trait]
    impl TableCatalog for FakeStore {
        async fn describe_table(
            &self,
            table: &str,
        ) -> std::result::Result<TableDescription, StoreError> {
            self.calls
                .lock()
                .unwrap()
                .push(Call::Describe(table.to_string()));
            self.description
                .clone()
                .ok_or_else(|| StoreError::TableNotFound {
                    table: table.to_string(),
                })
        }

        async fn list_tables(&self) -> std::result::Result<Vec<String>, StoreError> {
            Ok(vec!["Customers".to_string(), "Orders".to_string()])
        }
    }

    impl ItemStore for FakeStore {
        type Pages = FakePages;

        fn scan(&self, table: &str, options: &ReadOptions) -> FakePages {
            self.calls
                .lock()
                .unwrap()
                .push(Call::Scan(table.to_string(), options.clone()));
            self.open()
        }

        fn query(&self, condition: KeyCondition, options: &ReadOptions) -> FakePages {
            self.calls
                .lock()
                .unwrap()
                .push(Call::Query(condition, options.clone()));
            self.open()
        }
    }

    impl FakeStore {
        fn open(&self) -> FakePages {
            FakePages {
                pages: self.pages.clone().into_iter(),
                requests: Arc::clone(&self.requests),
            }
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[derive(Default)]
    struct VecSink {
        items: Vec<ResultItem>,
        finished: bool,
    }

    impl ItemSink for VecSink {
        fn write_item(&mut self, item: &ResultItem) -> dynq_core::Result<SinkStatus> {
            self.items.push(item.clone());
            Ok(SinkStatus::Accepted)
        }

        fn finish(&mut self) -> dynq_core::Result<SinkStatus> {
            self.finished = true;
            Ok(SinkStatus::Accepted)
        }
    }

    fn orders_description() -> TableDescription {
        TableDescription {
            table_name: "Orders".to_string(),
            key_schema: vec![KeyElement::hash("customerId"), KeyElement::range("orderDate")],
            attribute_definitions: vec![
                ("customerId".to_string(), ScalarType::String),
                ("orderDate".to_string(), ScalarType::String),
            ],
            indexes: vec![],
        }
    }

    fn order(n: usize) -> Item {
        let mut item = HashMap::new();
        item.insert(
            "customerId".to_string(),
            AttributeValue::S("CUST1".to_string()),
        );
        item.insert("seq".to_string(), AttributeValue::N(n.to_string()));
        item
    }

    fn pages(sizes: &[usize]) -> Vec<Vec<Item>> {
        let mut next = 0;
        sizes
            .iter()
            .map(|&size| {
                let page: Vec<Item> = (next..next + size).map(order).collect();
                next += size;
                page
            })
            .collect()
    }

    fn invocation(partition: Option<&str>, sort: Option<&str>, cap: usize) -> Invocation {
        Invocation {
            table: "Orders".to_string(),
            partition: partition.map(str::to_string),
            sort: sort.map(str::to_string),
            cap,
            read: ReadOptions::default(),
        }
    }

    #[tokio::test]
    async fn test_scan_skips_schema_resolution() {
        let store = FakeStore {
            pages: pages(&[2, 2]),
            ..Default::default()
        };
        let mut sink = VecSink::default();

        let report = retrieve(&store, &invocation(None, None, 0), &mut sink)
            .await
            .unwrap();

        assert_eq!(
            store.calls(),
            vec![Call::Scan("Orders".to_string(), ReadOptions::default())]
        );
        assert_eq!(report.emitted, 4);
        assert_eq!(report.termination, Termination::Exhausted);
        assert!(sink.finished);
    }

    #[tokio::test]
    async fn test_between_query() {
        let store = FakeStore {
            description: Some(orders_description()),
            pages: pages(&[1]),
            ..Default::default()
        };
        let mut sink = VecSink::default();

        retrieve(
            &store,
            &invocation(Some("CUST1"), Some("between 2024-01-01 2024-06-30"), 10),
            &mut sink,
        )
        .await
        .unwrap();

        let calls = store.calls();
        assert_eq!(calls[0], Call::Describe("Orders".to_string()));
        let Call::Query(condition, _) = &calls[1] else {
            panic!("expected a query, got {:?}", calls[1]);
        };
        assert_eq!(
            condition.expression,
            "#pk = :pk AND #sk BETWEEN :sk AND :sk2"
        );
        assert_eq!(condition.names["#pk"], "customerId");
        assert_eq!(condition.names["#sk"], "orderDate");
        assert_eq!(condition.values[":pk"], TypedValue::S("CUST1".to_string()));
        assert_eq!(
            condition.values[":sk"],
            TypedValue::S("2024-01-01".to_string())
        );
        assert_eq!(
            condition.values[":sk2"],
            TypedValue::S("2024-06-30".to_string())
        );
    }

    #[tokio::test]
    async fn test_prefix_query() {
        let store = FakeStore {
            description: Some(orders_description()),
            ..Default::default()
        };
        let mut sink = VecSink::default();

        retrieve(&store, &invocation(Some("CUST1"), Some("SHIP*"), 10), &mut sink)
            .await
            .unwrap();

        let Call::Query(condition, _) = &store.calls()[1] else {
            panic!("expected a query");
        };
        assert_eq!(condition.expression, "#pk = :pk AND begins_with(#sk, :sk)");
        assert_eq!(condition.values[":sk"], TypedValue::S("SHIP".to_string()));
    }

    #[tokio::test]
    async fn test_cap_across_pages() {
        let store = FakeStore {
            description: Some(orders_description()),
            pages: pages(&[3, 3, 3]),
            ..Default::default()
        };
        let mut sink = VecSink::default();

        let report = retrieve(&store, &invocation(Some("CUST1"), None, 5), &mut sink)
            .await
            .unwrap();

        assert_eq!(report.emitted, 5);
        assert_eq!(report.termination, Termination::Capped);
        assert_eq!(*store.requests.lock().unwrap(), 2);
        let seqs: Vec<i64> = sink
            .items
            .iter()
            .map(|item| item["seq"].as_i64().unwrap())
            .collect();
        assert_eq!(seqs, vec![0, 1, 2, 3, 4]);
    }

    fn by_status_read() -> ReadOptions {
        ReadOptions {
            index_name: Some("ByStatus".to_string()),
            page_size: Some(25),
            consistent_read: true,
        }
    }

    #[tokio::test]
    async fn test_scan_forwards_read_options() {
        let store = FakeStore::default();
        let mut sink = VecSink::default();
        let invocation = Invocation {
            read: by_status_read(),
            ..invocation(None, None, 10)
        };

        retrieve(&store, &invocation, &mut sink).await.unwrap();

        assert_eq!(
            store.calls(),
            vec![Call::Scan("Orders".to_string(), by_status_read())]
        );
    }

    #[tokio::test]
    async fn test_index_query_uses_index_keys() {
        let mut description = orders_description();
        description
            .attribute_definitions
            .push(("status".to_string(), ScalarType::String));
        description.indexes.push(IndexDescription {
            name: "ByStatus".to_string(),
            key_schema: vec![KeyElement::hash("status"), KeyElement::range("orderDate")],
        });
        let store = FakeStore {
            description: Some(description),
            ..Default::default()
        };
        let mut sink = VecSink::default();
        let invocation = Invocation {
            read: by_status_read(),
            ..invocation(Some("SHIPPED"), Some(">= 2024-01-01"), 10)
        };

        retrieve(&store, &invocation, &mut sink).await.unwrap();

        let Call::Query(condition, options) = &store.calls()[1] else {
            panic!("expected a query");
        };
        assert_eq!(condition.table_name, "Orders");
        assert_eq!(condition.index_name.as_deref(), Some("ByStatus"));
        assert_eq!(condition.expression, "#pk = :pk AND #sk >= :sk");
        assert_eq!(condition.names["#pk"], "status");
        assert_eq!(condition.values[":pk"], TypedValue::S("SHIPPED".to_string()));
        assert_eq!(options, &by_status_read());
    }

    #[tokio::test]
    async fn test_missing_table_is_schema_error() {
        let store = FakeStore::default();
        let mut sink = VecSink::default();

        let err = retrieve(&store, &invocation(Some("CUST1"), None, 5), &mut sink)
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Failed to resolve schema for table 'Orders': Table 'Orders' not found"
        );
        assert_eq!(store.calls(), vec![Call::Describe("Orders".to_string())]);
    }

    #[tokio::test]
    async fn test_list_tables() {
        let store = FakeStore::default();
        let mut buffer = Vec::new();

        list_tables(&store, &mut buffer).await.unwrap();

        assert_eq!(String::from_utf8(buffer).unwrap(), "Customers\nOrders\n");
    }
}
