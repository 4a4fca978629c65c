//! Integration tests for the chat client against an in-process server.

use std::{net::SocketAddr, time::Duration};

use studyroom_client::{
    error::ClientError,
    history::fetch_history,
    session::{connect_room, run_client_session, run_session},
};
use studyroom_server::{bootstrap::build_server, config::ServerConfig};
use tokio::{
    net::TcpListener,
    sync::{mpsc, oneshot},
};

/// Start a server on a random port and return its base WebSocket URL
async fn start_test_server(config: ServerConfig) -> (String, SocketAddr) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = build_server(config);
    tokio::spawn(server.serve(listener, std::future::pending::<()>()));

    (format!("ws://{}", addr), addr)
}

#[tokio::test]
async fn test_session_sends_input_lines_to_room() {
    // テスト項目: 入力した行が Room に送信され、履歴から読める
    // given (前提条件):
    let (url, _) = start_test_server(ServerConfig::default()).await;
    let (input_tx, mut input_rx) = mpsc::unbounded_channel();
    input_tx.send("hello".to_string()).unwrap();
    input_tx.send("world".to_string()).unwrap();
    drop(input_tx);

    // when (操作): 入力が閉じるとセッションは正常終了する
    let result = run_client_session(&url, 7, &mut input_rx).await;

    // then (期待する結果):
    assert!(result.is_ok());
    let http = reqwest::Client::new();
    let logs = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let logs = fetch_history(&http, &url, 7).await.unwrap();
            if logs.len() == 2 {
                return logs;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await
    .unwrap();
    assert_eq!(logs, vec!["hello".to_string(), "world".to_string()]);
}

#[tokio::test]
async fn test_history_of_unused_room_is_empty() {
    // テスト項目: 使われていない Room の履歴は空
    // given (前提条件):
    let (url, _) = start_test_server(ServerConfig::default()).await;
    let http = reqwest::Client::new();

    // when (操作):
    let logs = fetch_history(&http, &url, 99).await.unwrap();

    // then (期待する結果):
    assert!(logs.is_empty());
}

#[tokio::test]
async fn test_session_reports_server_busy() {
    // テスト項目: サーバーが満員の場合 ServerBusy エラーになる
    // given (前提条件):
    let config = ServerConfig {
        max_connections: 1,
        ..ServerConfig::default()
    };
    let (url, addr) = start_test_server(config).await;
    let (_first, _) = tokio_tungstenite::connect_async(format!("ws://{}/ws/chat/1", addr))
        .await
        .unwrap();
    let (_input_tx, mut input_rx) = mpsc::unbounded_channel();

    // when (操作):
    let result = run_client_session(&url, 1, &mut input_rx).await;

    // then (期待する結果):
    assert!(matches!(result, Err(ClientError::ServerBusy)));
}

#[tokio::test]
async fn test_session_reports_unreachable_server() {
    // テスト項目: 接続できない場合 ConnectionError になる
    // given (前提条件):
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let (_input_tx, mut input_rx) = mpsc::unbounded_channel();

    // when (操作):
    let result = run_client_session(&format!("ws://{}", addr), 1, &mut input_rx).await;

    // then (期待する結果):
    assert!(matches!(result, Err(ClientError::ConnectionError(_))));
}

#[tokio::test]
async fn test_session_reports_lost_connection_after_handshake() {
    // テスト項目: 接続後にサーバーが停止するとセッションは ConnectionError で終わる
    // given (前提条件):
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("ws://{}", listener.local_addr().unwrap());
    let (stop, stopped) = oneshot::channel::<()>();
    let server = build_server(ServerConfig::default());
    tokio::spawn(server.serve(listener, async move {
        let _ = stopped.await;
    }));
    let ws_stream = connect_room(&url, 4).await.unwrap();
    let (_input_tx, mut input_rx) = mpsc::unbounded_channel();

    // when (操作):
    stop.send(()).unwrap();
    let result = tokio::time::timeout(
        Duration::from_secs(10),
        run_session(ws_stream, 4, &mut input_rx),
    )
    .await
    .unwrap();

    // then (期待する結果):
    assert!(matches!(result, Err(ClientError::ConnectionError(_))));
}
