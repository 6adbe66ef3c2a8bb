//! CLI Tests

#[cfg(test)]
mod tests {
    use crate::cli::{
        Cli, CliConfig, CliError, Commands, DeleteArgs, IdArgs, OutputFormat, RenameArgs, execute,
    };
    use clap::Parser;
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::sync::Arc;
    use taskdeck_core::{BackendKind, Task, TaskId};
    use taskdeck_storage::{
        FileKeyValueStore, LocalTaskStore, SharedTaskStore, TaskStore, create_memory_kv,
        create_task_store,
    };

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn memory_store() -> SharedTaskStore {
        Arc::new(LocalTaskStore::new(create_memory_kv(), "cli-test"))
    }

    fn local_config(output_format: OutputFormat) -> CliConfig {
        let mut config = CliConfig {
            ephemeral: true,
            output_format,
            ..CliConfig::default()
        };
        config.taskdeck.backend = BackendKind::Local;
        config
    }

    async fn run(
        command: Commands,
        config: &CliConfig,
        store: SharedTaskStore,
    ) -> Result<String, CliError> {
        let mut out = Vec::new();
        execute(command, config, store, &mut out).await?;
        Ok(String::from_utf8(out).unwrap())
    }

    /// No subcommand means the interactive session
    #[test]
    fn test_parse_defaults_to_tui() {
        let cli = Cli::try_parse_from(["taskdeck"]).unwrap();
        assert_eq!(cli.command, None);

        let config = cli.resolve_config(no_env).unwrap();
        assert_eq!(config.taskdeck.backend, BackendKind::Remote);
        assert_eq!(config.output_format, OutputFormat::Pretty);
        assert!(!config.verbose);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "taskdeck", "delete", "7", "--yes", "--backend", "local", "--output", "json",
        ])
        .unwrap();
        assert_eq!(cli.command, Some(Commands::Delete(DeleteArgs { id: 7, yes: true })));

        let config = cli.resolve_config(no_env).unwrap();
        assert_eq!(config.taskdeck.backend, BackendKind::Local);
        assert_eq!(config.output_format, OutputFormat::Json);
    }

    #[test]
    fn test_rejects_non_numeric_id() {
        assert!(Cli::try_parse_from(["taskdeck", "toggle", "abc"]).is_err());
    }

    /// File < environment < flags
    #[test]
    fn test_config_precedence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(
            &path,
            "backend: local\nremote:\n  base_url: http://from-file\nlocal:\n  data_dir: /from/file\n",
        )
        .unwrap();

        let env: HashMap<&str, &str> = [
            ("TASKDECK_BASE_URL", "http://from-env"),
            ("TASKDECK_DATA_DIR", "/from/env"),
        ]
        .into_iter()
        .collect();
        let lookup = |key: &str| env.get(key).map(|v| v.to_string());

        let cli = Cli::try_parse_from([
            "taskdeck",
            "--config",
            path.to_str().unwrap(),
            "--data-dir",
            "/from/flag",
            "list",
        ])
        .unwrap();
        let config = cli.resolve_config(lookup).unwrap();

        assert_eq!(config.taskdeck.backend, BackendKind::Local);
        assert_eq!(config.taskdeck.remote.base_url, "http://from-env");
        assert_eq!(config.taskdeck.local.data_dir, PathBuf::from("/from/flag"));
        assert_eq!(config.backend_label(), "local (/from/flag)");
    }

    #[test]
    fn test_missing_config_file_is_error() {
        let cli = Cli::try_parse_from(["taskdeck", "--config", "/no/such/taskdeck.yaml"]).unwrap();
        let err = cli.resolve_config(no_env).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn test_backend_label() {
        let mut config = CliConfig::default();
        assert_eq!(
            config.backend_label(),
            "remote (https://jsonplaceholder.typicode.com)"
        );
        config.taskdeck.backend = BackendKind::Local;
        config.ephemeral = true;
        assert_eq!(config.backend_label(), "local (memory)");
    }

    #[tokio::test]
    async fn test_list_pretty_shows_sample_set() {
        let out = run(Commands::List, &local_config(OutputFormat::Pretty), memory_store())
            .await
            .unwrap();
        assert!(out.contains("[ ]    1  Review the weekly schedule"));
        assert!(out.contains("[x]    3  Reply to pending emails"));
        assert!(out.ends_with("3 active, 2 done\n"));
    }

    #[tokio::test]
    async fn test_list_json_is_parseable() {
        let out = run(Commands::List, &local_config(OutputFormat::Json), memory_store())
            .await
            .unwrap();
        let tasks: Vec<Task> = serde_json::from_str(&out).unwrap();
        assert_eq!(tasks.len(), 5);
        assert_eq!(tasks[0].id, TaskId(1));
    }

    #[tokio::test]
    async fn test_add_persists_to_file_backend() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = local_config(OutputFormat::Json);
        config.ephemeral = false;
        config.taskdeck.local.data_dir = dir.path().to_path_buf();

        let store = create_task_store(&config.taskdeck, false).unwrap();
        let out = run(
            Commands::Add(crate::cli::AddArgs {
                title: "  Buy milk  ".to_string(),
            }),
            &config,
            store,
        )
        .await
        .unwrap();
        let created: Task = serde_json::from_str(&out).unwrap();
        assert_eq!(created.title, "Buy milk");
        assert!(!created.completed);

        // A fresh store over the same directory sees the new task first
        let reopened: SharedTaskStore = Arc::new(LocalTaskStore::new(
            Arc::new(FileKeyValueStore::new(dir.path())),
            config.taskdeck.local.storage_key.clone(),
        ));
        let tasks = reopened.list_tasks(None).await.unwrap();
        assert_eq!(tasks.len(), 6);
        assert_eq!(tasks[0].id, created.id);
    }

    #[tokio::test]
    async fn test_add_blank_title_rejected() {
        let err = run(
            Commands::Add(crate::cli::AddArgs {
                title: "   ".to_string(),
            }),
            &local_config(OutputFormat::Pretty),
            memory_store(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, CliError::InvalidTitle(_)));
    }

    #[tokio::test]
    async fn test_toggle_flips_and_reports() {
        let store = memory_store();
        let config = local_config(OutputFormat::Pretty);
        let out = run(Commands::Toggle(IdArgs { id: 1 }), &config, store.clone())
            .await
            .unwrap();
        assert!(out.starts_with("[x]"));

        let tasks = store.list_tasks(None).await.unwrap();
        assert!(tasks.iter().find(|t| t.id == TaskId(1)).unwrap().completed);
    }

    #[tokio::test]
    async fn test_toggle_unknown_id() {
        let err = run(
            Commands::Toggle(IdArgs { id: 404 }),
            &local_config(OutputFormat::Pretty),
            memory_store(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, CliError::TaskNotFound(TaskId(404))));
        assert_eq!(err.to_string(), "Task 404 not found");
    }

    #[tokio::test]
    async fn test_rename_updates_title() {
        let store = memory_store();
        let out = run(
            Commands::Rename(RenameArgs {
                id: 2,
                title: "Buy groceries today".to_string(),
            }),
            &local_config(OutputFormat::Pretty),
            store.clone(),
        )
        .await
        .unwrap();
        assert!(out.contains("Buy groceries today"));

        let tasks = store.list_tasks(None).await.unwrap();
        assert_eq!(tasks[1].title, "Buy groceries today");
    }

    #[tokio::test]
    async fn test_delete_requires_yes() {
        let store = memory_store();
        let err = run(
            Commands::Delete(DeleteArgs { id: 1, yes: false }),
            &local_config(OutputFormat::Pretty),
            store.clone(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, CliError::ConfirmationRequired(TaskId(1))));

        let out = run(
            Commands::Delete(DeleteArgs { id: 1, yes: true }),
            &local_config(OutputFormat::Pretty),
            store.clone(),
        )
        .await
        .unwrap();
        assert_eq!(out, "Deleted task 1\n");
        let tasks = store.list_tasks(None).await.unwrap();
        assert!(tasks.iter().all(|t| t.id != TaskId(1)));
    }

    /// Store failures surface as the message the UI would show
    #[tokio::test]
    async fn test_unreachable_remote_reports_load_banner() {
        let mut config = CliConfig::default();
        config.taskdeck.remote.base_url = "http://127.0.0.1:1".to_string();
        config.taskdeck.remote.timeout_secs = 2;
        let store = create_task_store(&config.taskdeck, false).unwrap();

        let err = run(Commands::List, &config, store).await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to load todos. Please try again.");
    }

    /// Test Send + Sync for CliError
    #[test]
    fn test_cli_error_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CliError>();
    }
}
