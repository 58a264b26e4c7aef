/// JSON-RPC round trips through the MCP server
use habit_streaks::mcp::McpServer;
use habit_streaks::*;
use serde_json::{json, Value};
use tempfile::tempdir;

async fn server() -> (tempfile::TempDir, McpServer) {
    let dir = tempdir().unwrap();
    let inner = HabitStreaksServer::new(dir.path().join("habits.db"), StatisticsPolicy::default())
        .await
        .unwrap();
    (dir, McpServer::new(inner))
}

fn call(server: &mut McpServer, id: u64, name: &str, arguments: Value) -> Value {
    let request = json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "tools/call",
        "params": { "name": name, "arguments": arguments }
    });
    let response = server.process_line(&request.to_string()).unwrap();
    serde_json::to_value(response).unwrap()
}

fn text(response: &Value) -> &str {
    response["result"]["content"][0]["text"].as_str().unwrap()
}

#[tokio::test]
async fn test_initialize_and_list_tools() {
    let (_dir, mut server) = server().await;

    let init = server
        .process_line(r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#)
        .unwrap();
    let init = serde_json::to_value(init).unwrap();
    assert_eq!(init["result"]["protocolVersion"], json!("2024-11-05"));
    assert_eq!(init["result"]["serverInfo"]["name"], json!("Habit Streaks MCP"));

    assert!(server
        .process_line(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
        .is_none());

    let tools = server
        .process_line(r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#)
        .unwrap();
    let tools = serde_json::to_value(tools).unwrap();
    let names: Vec<&str> = tools["result"]["tools"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert!(names.contains(&"habit_mark"));
    assert!(names.contains(&"habit_statistics"));
    assert_eq!(names.len(), 8);
}

#[tokio::test]
async fn test_create_and_mark_over_json_rpc() {
    let (_dir, mut server) = server().await;

    let created = call(
        &mut server,
        1,
        "habit_create",
        json!({ "name": "Walk", "frequency": "weekly", "start_date": "2024-12-23" }),
    );
    assert_eq!(created["result"]["isError"], json!(false));
    let habit_id = text(&created)
        .split("Habit ID: ")
        .nth(1)
        .unwrap()
        .trim()
        .to_string();

    for (id, date) in [(2, "2024-12-24"), (3, "2024-12-30"), (4, "2025-01-06")] {
        let marked = call(&mut server, id, "habit_mark", json!({ "habit_id": habit_id, "date": date }));
        assert_eq!(marked["result"]["isError"], json!(false));
    }

    let status = call(&mut server, 5, "habit_status", json!({ "habit_id": habit_id }));
    assert!(text(&status).contains("3 weeks"));

    let rejected = call(
        &mut server,
        6,
        "habit_mark",
        json!({ "habit_id": habit_id, "date": "2025-01-08" }),
    );
    assert_eq!(rejected["result"]["isError"], json!(false));
    assert!(text(&rejected).contains("already completed for that week"));
}

#[tokio::test]
async fn test_errors_are_reported() {
    let (_dir, mut server) = server().await;

    let bad_json = serde_json::to_value(server.process_line("{not json").unwrap()).unwrap();
    assert_eq!(bad_json["error"]["code"], json!(-32700));

    let unknown_method = serde_json::to_value(
        server
            .process_line(r#"{"jsonrpc":"2.0","id":1,"method":"habits/everything"}"#)
            .unwrap(),
    )
    .unwrap();
    assert_eq!(unknown_method["error"]["code"], json!(-32601));

    let wrong_version = serde_json::to_value(
        server
            .process_line(r#"{"jsonrpc":"1.0","id":9,"method":"tools/list"}"#)
            .unwrap(),
    )
    .unwrap();
    assert_eq!(wrong_version["error"]["code"], json!(-32600));
    assert_eq!(wrong_version["id"], json!(9));

    let unknown_tool = call(&mut server, 2, "habit_log", json!({}));
    assert_eq!(unknown_tool["result"]["isError"], json!(true));

    let bad_frequency = call(
        &mut server,
        3,
        "habit_create",
        json!({ "name": "Swim", "frequency": "monthly" }),
    );
    assert_eq!(bad_frequency["result"]["isError"], json!(true));

    let missing_habit = call(
        &mut server,
        4,
        "habit_mark",
        json!({ "habit_id": "00000000-0000-0000-0000-000000000000" }),
    );
    assert_eq!(missing_habit["result"]["isError"], json!(true));

    let out_of_range_date = call(
        &mut server,
        5,
        "habit_statistics",
        json!({ "habit_id": "00000000-0000-0000-0000-000000000000", "start_date": "+262142-12-31" }),
    );
    assert_eq!(out_of_range_date["result"]["isError"], json!(true));
}
