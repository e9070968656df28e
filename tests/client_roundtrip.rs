//! Runs the real server on an ephemeral port and drives it with `TaskClient`.

use chrono::NaiveDate;
use tokio::net::TcpListener;

use tasktrack::{
    api::{self, AppState},
    board::{SubmitOutcome, TaskBoard},
    client::{ClientError, TaskApi, TaskClient},
    status::FixedClock,
    store::InMemoryTaskStore,
    task::TaskFields,
};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

async fn start_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    let state = AppState::new(InMemoryTaskStore::new(), FixedClock(today()));
    tokio::spawn(api::serve_on(listener, state));
    format!("http://{address}/")
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn client_talks_to_server() {
    let base_url = start_server().await;

    tokio::task::spawn_blocking(move || {
        let client = TaskClient::new(base_url);
        assert!(client.list_tasks().unwrap().is_empty());

        let fields = TaskFields::text("A", "", "pending", "2099-01-01");
        let created = client.create_task(&fields).unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(created.status_str(), Some("pending"));

        let updated = client
            .update_task(
                1,
                &TaskFields {
                    due_date: Some("2024-06-01".into()),
                    ..fields.clone()
                },
            )
            .unwrap();
        assert_eq!(updated.status_str(), Some("in-progress"));

        assert!(matches!(
            client.update_task(99, &fields),
            Err(ClientError::NotFound(99))
        ));

        client.delete_task(1).unwrap();
        // deleting again is still fine
        client.delete_task(1).unwrap();
        assert!(client.list_tasks().unwrap().is_empty());
    })
    .await
    .unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn board_round_trip() {
    let base_url = start_server().await;

    tokio::task::spawn_blocking(move || {
        let client = TaskClient::new(base_url);
        let mut board = TaskBoard::new();
        assert!(board.refresh(&client, today()));

        board.form.set_title("Write notes");
        board.form.set_due_date("2024-05-31");
        assert_eq!(board.submit(&client, today()), SubmitOutcome::Created(1));
        assert_eq!(board.tasks[0].status_str(), Some("completed"));

        let mut fresh = TaskBoard::new();
        assert!(fresh.refresh(&client, today()));
        assert_eq!(fresh.tasks, board.tasks);
    })
    .await
    .unwrap();
}

#[test]
fn unreachable_server_is_a_transport_error() {
    // nothing listens on port 9 locally
    let client = TaskClient::new("http://127.0.0.1:9/");
    assert!(matches!(
        client.list_tasks(),
        Err(ClientError::Transport { .. })
    ));

    let mut board = TaskBoard::new();
    assert!(!board.refresh(&client, today()));
    assert!(board.tasks.is_empty());
}
