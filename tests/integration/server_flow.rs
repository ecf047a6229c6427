/// JSON-RPC round trips through the MCP server
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use habitquest_mcp::mcp::McpServer;
use habitquest_mcp::*;
use serde_json::{json, Value};

#[derive(Default)]
struct RecordingSink {
    received: Mutex<Vec<SyncNotification>>,
}

impl NotificationSink for RecordingSink {
    fn notify(&self, notification: SyncNotification) {
        self.received.lock().unwrap().push(notification);
    }
}

fn server(sink: Arc<RecordingSink>) -> McpServer {
    let storage = SqliteStorage::in_memory().expect("in-memory database");
    let habit_quest = HabitQuestServer::with_storage(storage, None)
        .expect("server")
        .with_sink(sink);
    McpServer::new(habit_quest).with_fixed_date(NaiveDate::from_ymd_opt(2024, 3, 6).unwrap())
}

async fn call(server: &mut McpServer, id: u64, tool: &str, arguments: Value) -> Value {
    let request = json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "tools/call",
        "params": {"name": tool, "arguments": arguments}
    });
    let response = server
        .process_line(&request.to_string())
        .await
        .expect("tools/call gets a response");
    serde_json::to_value(response).unwrap()
}

fn text(response: &Value) -> &str {
    response["result"]["content"][0]["text"].as_str().unwrap_or_default()
}

#[tokio::test]
async fn test_initialize_and_list_tools() {
    let mut server = server(Arc::default());

    let init = server
        .process_line(r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#)
        .await
        .unwrap();
    let init = serde_json::to_value(init).unwrap();
    assert_eq!(init["result"]["serverInfo"]["name"], "HabitQuest MCP");
    assert_eq!(init["result"]["protocolVersion"], "2024-11-05");

    let notification = server
        .process_line(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
        .await;
    assert!(notification.is_none());

    let list = server
        .process_line(r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#)
        .await
        .unwrap();
    let list = serde_json::to_value(list).unwrap();
    let names: Vec<&str> = list["result"]["tools"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|t| t["name"].as_str())
        .collect();
    assert!(names.contains(&"habit_toggle"));
    assert!(names.contains(&"habit_analysis"));
    assert!(names.contains(&"sync_configure"));
}

#[tokio::test]
async fn test_create_toggle_and_status_flow() {
    let sink = Arc::new(RecordingSink::default());
    let mut server = server(sink.clone());

    let created = call(
        &mut server,
        1,
        "habit_create",
        json!({"name": "Swim", "frequency": "weekly", "type": "positive"}),
    )
    .await;
    assert_eq!(created["result"]["isError"], false);
    assert!(text(&created).contains("Habit ID: 1"));

    let toggled = call(&mut server, 2, "habit_toggle", json!({"habit_id": 1})).await;
    assert!(text(&toggled).contains("done"));

    let retoggled = call(
        &mut server,
        3,
        "habit_toggle",
        json!({"habit_id": 1, "date": "2024-03-04"}),
    )
    .await;
    assert!(text(&retoggled).contains("missed"));

    let store = server.habit_quest().storage().load_store().unwrap();
    assert_eq!(store.habits[0].completions.len(), 1);

    let status = call(&mut server, 4, "habit_status", json!({})).await;
    assert!(text(&status).contains("0/1 done"));

    let received = sink.received.lock().unwrap();
    assert_eq!(received.len(), 2);
    assert_eq!(received[0].value, SyncValue::Success);
    assert_eq!(received[1].value, SyncValue::Failure);
}

#[tokio::test]
async fn test_tool_errors_are_reported_in_result() {
    let mut server = server(Arc::default());

    let missing = call(&mut server, 1, "habit_toggle", json!({"habit_id": 9})).await;
    assert_eq!(missing["result"]["isError"], true);
    assert!(text(&missing).contains("Habit not found: 9"));

    let bad_args = call(&mut server, 2, "habit_rate", json!({"habit_id": "one"})).await;
    assert_eq!(bad_args["result"]["isError"], true);
    assert!(text(&bad_args).contains("Invalid parameters"));

    let unknown = call(&mut server, 3, "habit_explode", json!({})).await;
    assert!(text(&unknown).contains("Unknown tool"));

    let last_tag = call(&mut server, 4, "tag_remove", json!({"name": "General"})).await;
    assert!(text(&last_tag).contains("last remaining tag"));
}

#[tokio::test]
async fn test_protocol_errors() {
    let mut server = server(Arc::default());

    let garbage = serde_json::to_value(server.process_line("{not json").await.unwrap()).unwrap();
    assert_eq!(garbage["error"]["code"], -32700);

    let unknown = serde_json::to_value(
        server
            .process_line(r#"{"jsonrpc":"2.0","id":5,"method":"resources/list"}"#)
            .await
            .unwrap(),
    )
    .unwrap();
    assert_eq!(unknown["error"]["code"], -32601);
    assert_eq!(unknown["id"], 5);
}

#[tokio::test]
async fn test_sync_configure_persists_url() {
    let mut server = server(Arc::default());

    let response = call(
        &mut server,
        1,
        "sync_configure",
        json!({"url": "https://hooks.example.com/habits"}),
    )
    .await;
    assert_eq!(response["result"]["isError"], false);
    assert_eq!(
        server.habit_quest().sync_url().unwrap().as_deref(),
        Some("https://hooks.example.com/habits")
    );

    let cleared = call(&mut server, 2, "sync_configure", json!({})).await;
    assert!(text(&cleared).contains("Sync disabled"));
    assert_eq!(server.habit_quest().sync_url().unwrap(), None);
}
