//! # Runtime Flows
//!
//! The node's worker queue and line protocol over the configured backends.

#[cfg(test)]
mod tests {
    use mm_ledger::ports::inbound::LedgerApi;
    use mm_node::{
        build_handler, handle_line, open_store, LedgerClient, LedgerWorker, NodeConfig,
        NodeLedger, StoreBackend,
    };
    use serde_json::{json, Value};
    use tokio::task::JoinHandle;

    fn start(config: &NodeConfig) -> (LedgerClient, JoinHandle<NodeLedger>) {
        config.validate().unwrap();
        let store = open_store(config).unwrap();
        let handler = build_handler(config, store).unwrap();
        LedgerWorker::spawn(handler, config.queue_depth)
    }

    async fn send(client: &LedgerClient, request: Value) -> Value {
        let response = handle_line(client, &request.to_string()).await;
        serde_json::from_str(&response.to_line()).unwrap()
    }

    #[tokio::test]
    async fn test_line_protocol_session() {
        let (client, _worker) = start(&NodeConfig::default());

        let ok = send(
            &client,
            json!({"kind": "invoke", "function": "createAccount", "args": ["alice"]}),
        )
        .await;
        assert_eq!(ok["ok"], json!(true));

        send(
            &client,
            json!({"kind": "invoke", "function": "depositCash", "args": ["alice", "1000"]}),
        )
        .await;
        let rejected = send(
            &client,
            json!({"kind": "invoke", "function": "withdrawCash", "args": ["alice", "1500"]}),
        )
        .await;
        assert_eq!(rejected["ok"], json!(false));
        assert_eq!(rejected["error"]["kind"], json!("InsufficientFunds"));

        let account = send(
            &client,
            json!({"kind": "query", "function": "getAccount", "args": ["alice"]}),
        )
        .await;
        assert_eq!(account["payload"]["cash"], json!("1000"));

        let wrong_side = send(
            &client,
            json!({"kind": "query", "function": "depositCash", "args": ["alice", "1"]}),
        )
        .await;
        assert_eq!(wrong_side["error"]["kind"], json!("InvalidOperation"));
    }

    #[tokio::test]
    async fn test_concurrent_clients_are_serialized() {
        let config = NodeConfig {
            queue_depth: 2,
            ..NodeConfig::default()
        };
        let (client, worker) = start(&config);
        client
            .invoke("createAccount", vec!["alice".into()])
            .await
            .unwrap();

        let mut tasks = Vec::new();
        for _ in 0..50 {
            let client = client.clone();
            tasks.push(tokio::spawn(async move {
                client
                    .invoke("depositCash", vec!["alice".into(), "2".into()])
                    .await
            }));
        }
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        drop(client);
        let ledger = worker.await.unwrap();
        assert_eq!(
            ledger.get_account("alice").unwrap().cash,
            rust_decimal::Decimal::from(100)
        );
    }

    #[tokio::test]
    async fn test_file_backend_across_restarts() {
        let dir = tempfile::tempdir().unwrap();
        let config = NodeConfig {
            backend: StoreBackend::File,
            data_dir: dir.path().to_path_buf(),
            ..NodeConfig::default()
        };

        {
            let (client, worker) = start(&config);
            client
                .invoke("createAccount", vec!["bob".into()])
                .await
                .unwrap();
            drop(client);
            worker.await.unwrap();
        }

        let (client, _worker) = start(&config);
        let account = send(
            &client,
            json!({"kind": "query", "function": "getAccount", "args": ["bob"]}),
        )
        .await;
        assert_eq!(account["ok"], json!(true));
        assert_eq!(account["payload"]["id"], json!("bob"));
    }
}
