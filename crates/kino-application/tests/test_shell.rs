use async_trait::async_trait;
use kino_application::{CommandOutcome, HostCommand, KinoShell};
use kino_core::completion::{CompletionClient, CompletionRequest};
use kino_core::error::{KinoError, Result};
use kino_core::secret::SecretService;
use kino_core::session::{ChatMode, MessageRole};
use kino_infrastructure::SecretServiceImpl;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

struct EchoClient;

#[async_trait]
impl CompletionClient for EchoClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        Ok(format!("echo: {} ({} specs)", request.text, request.context.specs.len()))
    }
}

fn echo_client() -> Option<Arc<dyn CompletionClient>> {
    Some(Arc::new(EchoClient))
}

async fn activate(temp_dir: &TempDir) -> KinoShell {
    let secrets = Arc::new(SecretServiceImpl::with_path(temp_dir.path().join("secret.json")));
    secrets.set_api_key("deepseek", "sk-test").await.unwrap();
    KinoShell::activate_with(temp_dir.path().join("project"), secrets, echo_client())
        .await
        .unwrap()
}

/// Polls `check` until it holds or five seconds pass.
async fn eventually<F, Fut>(mut check: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    for _ in 0..50 {
        if check().await {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    false
}

#[tokio::test(flavor = "multi_thread")]
async fn test_activation_creates_layout() {
    let temp_dir = TempDir::new().unwrap();
    let shell = activate(&temp_dir).await;

    let kino_dir = shell.paths().kino_dir();
    for dir in ["specs", "hooks", "steering", "settings"] {
        assert!(kino_dir.join(dir).is_dir(), "{dir} should exist");
    }
    let mcp = std::fs::read_to_string(shell.paths().mcp_config_file()).unwrap();
    assert!(mcp.contains("\"mcpServers\": {}"));
    assert!(shell.views().mcp.servers().await.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_activation_fails_when_layout_cannot_be_created() {
    let temp_dir = TempDir::new().unwrap();
    let project = temp_dir.path().join("project");
    std::fs::create_dir(&project).unwrap();
    std::fs::write(project.join(".kino"), "not a directory").unwrap();

    let secrets = Arc::new(SecretServiceImpl::with_path(temp_dir.path().join("secret.json")));
    let result = KinoShell::activate_with(&project, secrets, echo_client()).await;

    assert!(matches!(result, Err(KinoError::DirectoryInit { .. })));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_create_spec_command_updates_view() {
    let temp_dir = TempDir::new().unwrap();
    let shell = activate(&temp_dir).await;

    let outcome = shell
        .execute(HostCommand::CreateNewSpec, Some("auth"))
        .await
        .unwrap();
    assert!(matches!(outcome, CommandOutcome::OpenFile(ref path) if path.ends_with("requirements.md")));

    let roots = shell.views().specs.roots().await;
    assert_eq!(roots.len(), 1);
    assert_eq!(roots[0].children.len(), 3);

    let err = shell.execute(HostCommand::DeleteSpec, None).await.unwrap_err();
    assert!(matches!(err, KinoError::InvalidInput(_)));

    shell.execute(HostCommand::DeleteSpec, Some("auth")).await.unwrap();
    assert!(shell.views().specs.roots().await.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_watcher_refreshes_hooks_view() {
    let temp_dir = TempDir::new().unwrap();
    let shell = activate(&temp_dir).await;
    let hooks_dir = shell.paths().kino_dir().join("hooks");

    std::fs::write(hooks_dir.join("fmt.kino.hook"), r#"{"eventType":"fileSaved"}"#).unwrap();

    let hooks = shell.views().hooks.clone();
    assert!(eventually(|| {
        let hooks = hooks.clone();
        async move { hooks.roots().await.len() == 1 }
    })
    .await);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_settings_change_reloads_mcp_view() {
    let temp_dir = TempDir::new().unwrap();
    let shell = activate(&temp_dir).await;

    std::fs::write(
        shell.paths().mcp_config_file(),
        r#"{"mcpServers":{"fs":{"command":"npx","args":["server-fs"]}}}"#,
    )
    .unwrap();

    let mcp = shell.views().mcp.clone();
    assert!(eventually(|| {
        let mcp = mcp.clone();
        async move { mcp.server("fs").await.is_some() }
    })
    .await);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_open_chat_and_send_turn_with_context() {
    let temp_dir = TempDir::new().unwrap();
    let shell = activate(&temp_dir).await;
    shell.execute(HostCommand::CreateNewSpec, Some("auth")).await.unwrap();

    let CommandOutcome::ShowChat { session_id } =
        shell.execute(HostCommand::OpenChat, None).await.unwrap()
    else {
        panic!("OpenChat should reveal the chat panel");
    };

    let reply = shell
        .chat()
        .send_user_turn(&session_id, "hello", ChatMode::Chat, "deepseek-chat")
        .await
        .unwrap();
    assert_eq!(reply.role, MessageRole::Assistant);
    assert_eq!(reply.content, "echo: hello (1 specs)");

    let session_file = shell.paths().sessions_dir().join(format!("{session_id}.json"));
    assert!(session_file.exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_execute_hook_requires_known_hook() {
    let temp_dir = TempDir::new().unwrap();
    let shell = activate(&temp_dir).await;

    let err = shell.execute(HostCommand::ExecuteHook, Some("nope")).await.unwrap_err();
    assert!(err.is_not_found());

    shell.execute(HostCommand::CreateHook, Some("lint")).await.unwrap();
    let outcome = shell.execute(HostCommand::ExecuteHook, Some("lint")).await.unwrap();
    assert!(matches!(outcome, CommandOutcome::Message(ref text) if text.starts_with("Executing hook: lint")));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_dispose_is_idempotent() {
    let temp_dir = TempDir::new().unwrap();
    let shell = activate(&temp_dir).await;

    shell.dispose();
    shell.dispose();
    assert!(shell.is_disposed());
}
