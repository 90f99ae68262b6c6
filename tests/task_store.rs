use std::collections::HashSet;

use chrono::{TimeZone, Utc};
use todo::input::InputBuffer;
use todo::storage::{FileStore, KeyValueStore, MemoryStore};
use todo::task::{CorruptPolicy, Task, TaskStore};
use todo::view::{self, Filter, Sort};

fn memory_store() -> TaskStore<MemoryStore> {
    TaskStore::open(MemoryStore::new(), "tasks", CorruptPolicy::Fail).expect("open")
}

#[test]
fn add_precondition() {
    let mut store = memory_store();
    store.add("").expect("add");
    store.add("   ").expect("add");
    assert!(store.is_empty());

    let task = store.add(" buy milk ").expect("add").expect("created");
    assert_eq!(store.len(), 1);
    assert_eq!(task.text, "buy milk");
    assert!(!task.completed);
}

#[test]
fn rapid_adds_get_distinct_ids() {
    let mut store = memory_store();
    for idx in 0..200 {
        store.add(&format!("task {idx}")).expect("add");
    }
    let ids: HashSet<u64> = store.tasks().iter().map(|task| task.id).collect();
    assert_eq!(ids.len(), 200);

    let mut sorted: Vec<u64> = store.tasks().iter().map(|task| task.id).collect();
    sorted.sort_unstable();
    let in_order: Vec<u64> = store.tasks().iter().map(|task| task.id).collect();
    assert_eq!(sorted, in_order);
}

#[test]
fn file_backed_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;

    let original: Vec<Task> = {
        let mut store = TaskStore::open(FileStore::new(dir.path()), "tasks", CorruptPolicy::Fail)?;
        let base = Utc.timestamp_millis_opt(1_700_000_000_000).single().expect("timestamp");
        let first = store.add_at("one", base)?.expect("created");
        store.add_at("two", base + chrono::Duration::seconds(1))?;
        let third = store
            .add_at("three", base + chrono::Duration::seconds(2))?
            .expect("created");
        store.toggle_completion(first.id)?;
        store.toggle_completion(third.id)?;
        store.tasks().to_vec()
    };

    let reopened = TaskStore::open(FileStore::new(dir.path()), "tasks", CorruptPolicy::Fail)?;
    assert_eq!(reopened.tasks(), original.as_slice());
    assert_eq!(
        reopened
            .tasks()
            .iter()
            .map(|task| task.completed)
            .collect::<Vec<_>>(),
        vec![true, false, true]
    );

    Ok(())
}

#[test]
fn two_stores_on_one_directory_keep_writes() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let open = || TaskStore::open(FileStore::new(dir.path()), "tasks", CorruptPolicy::Fail);

    let mut viewer = open()?;
    let mut cli = open()?;
    let seeded = viewer.add("seeded")?.expect("created");

    let from_cli = cli.add("from cli")?.expect("created");
    let from_viewer = viewer.add("from viewer")?.expect("created");
    assert_ne!(from_cli.id, from_viewer.id);

    // the viewer picked up the cli's task when it wrote
    let texts = |store: &TaskStore<FileStore>| -> Vec<String> {
        store.tasks().iter().map(|task| task.text.clone()).collect()
    };
    assert_eq!(texts(&viewer), vec!["seeded", "from cli", "from viewer"]);

    cli.remove(seeded.id)?;
    assert_eq!(viewer.toggle_completion(seeded.id)?, None);
    assert_eq!(texts(&viewer), vec!["from cli", "from viewer"]);

    let reopened = open()?;
    assert_eq!(texts(&reopened), vec!["from cli", "from viewer"]);
    assert_eq!(
        reopened.storage().get("tasks")?.as_deref(),
        Some(serde_json::to_string_pretty(viewer.tasks())?.as_str())
    );

    Ok(())
}

#[test]
fn end_to_end_scenario() {
    let mut store = memory_store();
    let mut input = InputBuffer::new();

    input.set("a");
    let a = input.submit(&mut store).expect("submit").expect("created");
    input.set("b");
    input.submit(&mut store).expect("submit");
    store.toggle_completion(a.id).expect("toggle");

    let visible = view::project(store.tasks(), Filter::Completed, Sort::Date);
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].text, "a");
    assert!(visible[0].completed);

    // projection never reorders or drops stored tasks
    assert_eq!(store.len(), 2);
    assert_eq!(store.tasks()[0].id, a.id);
}

#[test]
fn filter_then_sort_combination() {
    let mut store = memory_store();
    let base = Utc.timestamp_millis_opt(1_000).single().expect("timestamp");
    let ids: Vec<u64> = ["delta", "Bravo", "alpha", "charlie"]
        .iter()
        .enumerate()
        .map(|(idx, text)| {
            store
                .add_at(text, base + chrono::Duration::milliseconds(idx as i64))
                .expect("add")
                .expect("created")
                .id
        })
        .collect();
    store.toggle_completion(ids[0]).expect("toggle");
    store.toggle_completion(ids[2]).expect("toggle");

    let texts = |filter, sort| -> Vec<String> {
        view::project(store.tasks(), filter, sort)
            .into_iter()
            .map(|task| task.text.clone())
            .collect()
    };

    assert_eq!(texts(Filter::Incomplete, Sort::Alphabetical), vec!["Bravo", "charlie"]);
    assert_eq!(texts(Filter::Completed, Sort::Alphabetical), vec!["alpha", "delta"]);
    assert_eq!(texts(Filter::Completed, Sort::Date), vec!["delta", "alpha"]);
    assert_eq!(
        texts(Filter::All, Sort::Alphabetical),
        vec!["alpha", "Bravo", "charlie", "delta"]
    );
}
