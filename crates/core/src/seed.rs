//! Sample tasks written into an empty local store on first use

use crate::task::{Task, TaskId};

const SAMPLE_OWNER: u64 = 1;

const SAMPLES: [(u64, &str, bool); 5] = [
    (1, "Review the weekly schedule", false),
    (2, "Buy groceries for the week", false),
    (3, "Reply to pending emails", true),
    (4, "Water the plants", false),
    (5, "Read a chapter of a book", true),
];

/// The fixed, deterministic sample set.
pub fn sample_tasks() -> Vec<Task> {
    SAMPLES
        .iter()
        .map(|&(id, title, completed)| Task {
            id: TaskId(id),
            title: title.to_string(),
            completed,
            user_id: Some(SAMPLE_OWNER),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_sample_set_is_stable() {
        let first = sample_tasks();
        assert_eq!(first.len(), 5);
        assert_eq!(first, sample_tasks());
    }

    #[test]
    fn test_sample_ids_unique_and_titles_non_blank() {
        let tasks = sample_tasks();
        let ids: HashSet<_> = tasks.iter().map(|t| t.id).collect();
        assert_eq!(ids.len(), tasks.len());
        assert!(tasks.iter().all(|t| !t.title.trim().is_empty()));
    }
}
