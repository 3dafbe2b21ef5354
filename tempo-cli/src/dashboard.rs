//! Dashboard rendering: the ranked active list grouped by tier, plus the
//! completed and archive summaries.

use tempo_core::{RankedTask, Tier};
use tempo_store::{KeyValue, TaskStore};

pub fn render<K: KeyValue>(store: &TaskStore<K>) {
    let ranked = store.ranked();

    if ranked.is_empty() {
        println!("No active tasks.");
        println!("Add one: tempo add \"Ship the fix\" --impact high --effort low --deadline today");
    } else {
        println!("# Tempo dashboard\n");
        // Rank is the 1-based position in the full sorted list, assigned
        // here at render time.
        let positions: Vec<(usize, &RankedTask)> =
            ranked.iter().enumerate().map(|(i, r)| (i + 1, r)).collect();

        for tier in Tier::ALL {
            let group: Vec<&(usize, &RankedTask)> =
                positions.iter().filter(|(_, r)| r.tier == tier).collect();
            if group.is_empty() {
                continue;
            }

            println!("## {} ({})\n", tier.heading(), tier.subtitle());
            for (rank, task) in group {
                println!("{:>3}. [{:>3}] {}  (id {})", rank, task.score, task.name(), task.id());
                println!("       {}", task.reason);
            }
            println!();
        }
    }

    if !store.completed().is_empty() {
        println!("## Completed ({})\n", store.completed().len());
        for done in store.completed() {
            println!(
                "  ✓ {}  (completed {}, id {})",
                done.task.name,
                done.completed_at.format("%Y-%m-%d"),
                done.task.id
            );
        }
        println!();
    }

    if !store.archived().is_empty() {
        println!("Archive: {} tasks (tempo archive list)", store.archived().len());
    }
}

pub fn render_archive<K: KeyValue>(store: &TaskStore<K>) {
    if store.archived().is_empty() {
        println!("Archive is empty.");
        return;
    }

    println!("# Archive ({})\n", store.archived().len());
    for archived in store.archived() {
        println!(
            "  {}  (completed {}, archived {}, id {})",
            archived.completed.task.name,
            archived.completed.completed_at.format("%Y-%m-%d"),
            archived.archived_at.format("%Y-%m-%d"),
            archived.completed.task.id
        );
        println!("       {}", archived.completed.reason);
    }
}
