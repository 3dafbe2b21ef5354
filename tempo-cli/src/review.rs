//! Interactive daily-review flow (stdin prompts, one task at a time).

use anyhow::Result;
use chrono::Utc;
use std::io::{self, Write};

use tempo_core::review::{ReviewAction, ReviewSession};
use tempo_core::task::Deadline;
use tempo_store::{KeyValue, TaskStore};

fn prompt(label: &str) -> Result<String> {
    print!("{}: ", label);
    io::stdout().flush().ok();
    let mut s = String::new();
    io::stdin().read_line(&mut s)?;
    Ok(s.trim().to_string())
}

pub fn run_review<K: KeyValue>(store: &mut TaskStore<K>, mut session: ReviewSession) -> Result<()> {
    let total = session.pending().len();
    println!("Welcome back!");
    println!(
        "You have {} incomplete {} from a previous day. What would you like to do with {}?\n",
        total,
        if total == 1 { "task" } else { "tasks" },
        if total == 1 { "it" } else { "them" },
    );

    loop {
        let Some(id) = session.pending().first().map(|s| s.to_string()) else {
            break;
        };

        match store.ranked().into_iter().find(|r| r.id() == id) {
            Some(task) => {
                println!("{}", task.name());
                println!("  {}", task.reason);
            }
            None => {
                // Left the active set through some other mutation since
                // capture; resolving it is a formality.
                println!("(task {id} is no longer active)");
            }
        }

        let answer =
            prompt("[c]omplete / [k]eep / [r]eschedule / [d]ismiss / [D]ismiss all / [q]uit")?;
        match answer.as_str() {
            "c" => {
                store.apply_review_action(&mut session, &id, ReviewAction::Complete, Utc::now())?;
                println!("Marked complete.");
            }
            "k" => {
                store.apply_review_action(&mut session, &id, ReviewAction::Keep, Utc::now())?;
                println!("Kept.");
            }
            "r" => {
                let deadline = prompt_deadline()?;
                store.apply_review_action(
                    &mut session,
                    &id,
                    ReviewAction::Reschedule(deadline),
                    Utc::now(),
                )?;
                println!("Kept with a new deadline.");
            }
            "d" => {
                store.apply_review_action(&mut session, &id, ReviewAction::Dismiss, Utc::now())?;
                println!("Dismissed.");
            }
            "D" => {
                let confirm = prompt("Dismiss every remaining task? This cannot be undone [y/N]")?;
                if confirm.eq_ignore_ascii_case("y") {
                    let n = store.dismiss_all_remaining(&mut session);
                    println!("Dismissed {n} remaining tasks.");
                }
            }
            "q" => {
                println!("Review paused; the remaining tasks will be offered again today.");
                return Ok(());
            }
            other => println!("Unrecognized choice: {other:?}"),
        }
        println!();
    }

    println!("Review complete. See you tomorrow.");
    Ok(())
}

fn prompt_deadline() -> Result<Deadline> {
    loop {
        let answer =
            prompt("New deadline: [t]oday / [w] this week / [s] this sprint / [a] after sprint")?;
        match answer.as_str() {
            "t" => return Ok(Deadline::Today),
            "w" => return Ok(Deadline::ThisWeek),
            "s" => return Ok(Deadline::ThisSprint),
            "a" => return Ok(Deadline::AfterSprint),
            other => println!("Unrecognized choice: {other:?}"),
        }
    }
}
