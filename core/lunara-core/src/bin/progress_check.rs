//! Debug utility for inspecting the local progress store.

use lunara_core::{CycleProgressStore, FileStore, KeyValueStore, StorageConfig};

fn main() {
    let storage = StorageConfig::default();
    let progress_file = storage.progress_file();

    println!("═══════════════════════════════════════════════════════════");
    println!("  Lunara Progress Check");
    println!("═══════════════════════════════════════════════════════════");
    println!();

    println!("Progress file: {}", progress_file.display());
    println!();

    let store = match FileStore::open(&progress_file) {
        Ok(store) => store,
        Err(err) => {
            eprintln!("Failed to open store: {}", err);
            std::process::exit(1);
        }
    };
    let progress = CycleProgressStore::new(store);

    let args: Vec<String> = std::env::args().collect();
    let user_ids: Vec<&str> = args[1..].iter().map(|s| s.as_str()).collect();

    if user_ids.is_empty() {
        println!("Usage: progress-check <user-id> [<user-id> ...]");
        println!();
        return;
    }

    println!("── Decoded Progress ──────────────────────────────────────");
    for user_id in &user_ids {
        match (progress.get_progress(user_id), progress.get_completed(user_id)) {
            (Ok(record), Ok(completed)) => {
                let step = record
                    .step
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "(unset)".to_string());
                let cycle_id = record
                    .cycle_id
                    .map(|id| id.to_string())
                    .unwrap_or_else(|| "(unset)".to_string());
                let done = if completed { "✓ completed" } else { "in progress" };
                println!("  {} │ step {} │ cycle {} │ {}", user_id, step, cycle_id, done);
            }
            (Err(err), _) | (_, Err(err)) => {
                println!("  {} │ ✗ {}", user_id, err);
            }
        }
    }
    println!();

    println!("── Raw Keys ──────────────────────────────────────────────");
    let store = progress.into_store();
    for user_id in &user_ids {
        for logical in ["cycle_step", "cycle_id", "cycle_completed"] {
            let key = format!("{}_{}", logical, user_id);
            match store.get(&key) {
                Ok(Some(value)) => println!("  {} = {:?}", key, value),
                Ok(None) => println!("  {} (absent)", key),
                Err(err) => println!("  {} ✗ {}", key, err),
            }
        }
    }
    println!();

    println!("═══════════════════════════════════════════════════════════");
    println!("  Check complete");
    println!("═══════════════════════════════════════════════════════════");
}
