//! End-to-end turns through the mode router with scripted collaborators:
//! classification, setup, task, and the simple commands, against a real
//! file-backed session store.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;
use tempfile::TempDir;

use juniordev::agent::ModeRouter;
use juniordev::core::{AgentError, AgentResult};
use juniordev::github::RepoHost;
use juniordev::llm::{
    ChatMessage, ChatProvider, Completion, FinishReason, ToolCall, ToolDefinition,
};
use juniordev::prompt::PromptAssembler;
use juniordev::session::{FileSessionStore, RepoTarget, SessionStore};
use juniordev::telegram::{ChatRef, IncomingMessage, Sender};

/// Provider that replays scripted completions and records request shapes
struct ScriptedProvider {
    script: Mutex<Vec<Completion>>,
    calls: AtomicUsize,
    systems: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    fn new(mut script: Vec<Completion>) -> Self {
        script.reverse();
        Self {
            script: Mutex::new(script),
            calls: AtomicUsize::new(0),
            systems: Mutex::new(Vec::new()),
        }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn last_system(&self) -> Option<String> {
        self.systems.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl ChatProvider for ScriptedProvider {
    async fn complete(
        &self,
        system: &str,
        _turns: &[ChatMessage],
        _tools: &[ToolDefinition],
    ) -> AgentResult<Completion> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.systems.lock().unwrap().push(system.to_string());
        self.script
            .lock()
            .unwrap()
            .pop()
            .ok_or_else(|| AgentError::model("script exhausted"))
    }

    fn model(&self) -> &str {
        "scripted"
    }
}

/// Repo host that serves canned content and records change requests
struct StubRepoHost {
    reads: Mutex<Vec<String>>,
    change_requests: Mutex<Vec<(String, String)>>,
}

impl StubRepoHost {
    fn new() -> Self {
        Self {
            reads: Mutex::new(Vec::new()),
            change_requests: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl RepoHost for StubRepoHost {
    async fn read_file(&self, _repo: &RepoTarget, path: &str) -> AgentResult<String> {
        self.reads.lock().unwrap().push(path.to_string());
        Ok("export default function Home() {}".to_string())
    }

    async fn create_change_request(
        &self,
        _repo: &RepoTarget,
        path: &str,
        content: &str,
    ) -> AgentResult<String> {
        self.change_requests
            .lock()
            .unwrap()
            .push((path.to_string(), content.to_string()));
        Ok("https://github.com/murderteeth/dummy/pull/1".to_string())
    }

    async fn structure(&self, _repo: &RepoTarget) -> AgentResult<String> {
        Ok("- README.md\n- app/\n--- page.tsx".to_string())
    }
}

fn message(chat_id: i64, username: &str, text: &str) -> IncomingMessage {
    IncomingMessage {
        message_id: 1,
        from: Sender {
            id: 100,
            is_bot: false,
            first_name: "John".to_string(),
            username: username.to_string(),
            language_code: "en".to_string(),
        },
        chat: ChatRef {
            id: chat_id,
            first_name: Some("John".to_string()),
            username: Some(username.to_string()),
            title: None,
            chat_type: "group".to_string(),
        },
        date: Some(1_717_000_000),
        text: Some(text.to_string()),
    }
}

struct Harness {
    _dir: TempDir,
    store: Arc<FileSessionStore>,
    llm: Arc<ScriptedProvider>,
    repos: Arc<StubRepoHost>,
    router: ModeRouter,
}

fn harness(script: Vec<Completion>) -> Harness {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(FileSessionStore::new(dir.path()));
    let llm = Arc::new(ScriptedProvider::new(script));
    let repos = Arc::new(StubRepoHost::new());
    let prompts = Arc::new(PromptAssembler::new().unwrap());
    let router = ModeRouter::new(store.clone(), llm.clone(), repos.clone(), prompts);
    Harness {
        _dir: dir,
        store,
        llm,
        repos,
        router,
    }
}

fn final_completion(text: &str) -> Completion {
    Completion {
        message: ChatMessage::assistant(text),
        finish_reason: Some(FinishReason::Stop),
    }
}

fn tool_completion(id: &str, name: &str, arguments: serde_json::Value) -> Completion {
    Completion {
        message: ChatMessage::assistant_tool_calls(vec![ToolCall::function(
            id,
            name,
            arguments.to_string(),
        )]),
        finish_reason: Some(FinishReason::ToolCalls),
    }
}

#[tokio::test]
async fn unaddressed_message_is_recorded_but_unanswered() {
    let h = harness(vec![]);

    let response = h
        .router
        .respond(&message(1, "jane_doe", "howdy someone else!!"))
        .await
        .unwrap();

    assert_eq!(response, None);
    assert_eq!(h.llm.call_count(), 0);

    // history is never lost, even when the agent is not being addressed
    let session = h.store.load_or_create(1).await.unwrap();
    assert_eq!(session.events.len(), 1);
    assert_eq!(session.events[0].text, "howdy someone else!!");
}

#[tokio::test]
async fn unconfigured_session_runs_setup_mode() {
    let h = harness(vec![
        tool_completion(
            "call_1",
            "setup_chat",
            json!({ "github_repo_owner": "murderteeth", "github_repo_name": "dummy" }),
        ),
        final_completion("setup complete, team! 😻"),
    ]);

    let response = h
        .router
        .respond(&message(7, "john_doe", "/jr our repo is murderteeth/dummy"))
        .await
        .unwrap();

    assert_eq!(response.as_deref(), Some("setup complete, team! 😻"));
    assert!(h.llm.last_system().unwrap().contains("finish setup"));

    let session = h.store.load_or_create(7).await.unwrap();
    assert_eq!(session.repo, Some(RepoTarget::new("murderteeth", "dummy")));

    // inbound event plus the synthesized response
    assert_eq!(session.events.len(), 2);
    assert_eq!(session.events[1].sender, None);
    assert_eq!(session.events[1].text, "setup complete, team! 😻");
}

#[tokio::test]
async fn configured_session_runs_task_mode() {
    let h = harness(vec![
        tool_completion("call_1", "read_file", json!({ "path": "app/page.tsx" })),
        final_completion("it's the home page! 😻"),
    ]);
    h.store
        .configure(9, RepoTarget::new("murderteeth", "dummy"))
        .await
        .unwrap();

    let response = h
        .router
        .respond(&message(9, "john_doe", "/jr what's in app/page.tsx?"))
        .await
        .unwrap();

    assert_eq!(response.as_deref(), Some("it's the home page! 😻"));
    assert_eq!(h.repos.reads.lock().unwrap().as_slice(), ["app/page.tsx"]);

    // the task prompt carries the interpolated file tree
    let system = h.llm.last_system().unwrap();
    assert!(system.contains("murderteeth/dummy"));
    assert!(system.contains("--- page.tsx"));
}

#[tokio::test]
async fn task_mode_can_open_a_change_request() {
    let h = harness(vec![
        tool_completion("call_1", "read_file", json!({ "path": "app/page.tsx" })),
        tool_completion(
            "call_2",
            "create_pull_request",
            json!({ "path": "app/page.tsx", "content": "meow" }),
        ),
        final_completion("pr is up: https://github.com/murderteeth/dummy/pull/1 😻"),
    ]);
    h.store
        .configure(5, RepoTarget::new("murderteeth", "dummy"))
        .await
        .unwrap();

    let response = h
        .router
        .respond(&message(5, "jane_doe", "/jr change the page to say meow"))
        .await
        .unwrap();

    assert!(response.unwrap().contains("pull/1"));
    assert_eq!(
        h.repos.change_requests.lock().unwrap().as_slice(),
        [("app/page.tsx".to_string(), "meow".to_string())]
    );
}

#[tokio::test]
async fn reset_empties_history_and_keeps_the_target() {
    let h = harness(vec![]);
    h.store
        .configure(3, RepoTarget::new("murderteeth", "dummy"))
        .await
        .unwrap();
    for text in ["howdy", "more chatter", "even more"] {
        h.router
            .respond(&message(3, "jane_doe", text))
            .await
            .unwrap();
    }

    let response = h
        .router
        .respond(&message(3, "jane_doe", "/jr reset"))
        .await
        .unwrap();

    assert_eq!(response.as_deref(), Some("chat reset! meeooow 😺"));
    assert_eq!(h.llm.call_count(), 0); // handled without the model

    let session = h.store.load_or_create(3).await.unwrap();
    assert!(session.events.is_empty());
    assert_eq!(session.repo, Some(RepoTarget::new("murderteeth", "dummy")));
}

#[tokio::test]
async fn leave_forgets_the_conversation_entirely() {
    let h = harness(vec![final_completion("hi again! 😻")]);
    h.store
        .configure(4, RepoTarget::new("murderteeth", "dummy"))
        .await
        .unwrap();

    let response = h
        .router
        .respond(&message(4, "john_doe", "/jr leave"))
        .await
        .unwrap();
    assert_eq!(response.as_deref(), Some("leaved! meeooow 👋😿"));

    // the next message behaves like a first-ever message from a new chat:
    // no residual configuration, so it routes to setup mode
    h.router
        .respond(&message(4, "john_doe", "/jr hello again"))
        .await
        .unwrap();
    assert!(h.llm.last_system().unwrap().contains("finish setup"));

    let session = h.store.load_or_create(4).await.unwrap();
    assert_eq!(session.repo, None);
    assert_eq!(session.events.len(), 2); // inbound + synthesized response only
}

#[tokio::test]
async fn whoami_reports_configuration_readonly() {
    let h = harness(vec![]);
    h.store
        .configure(6, RepoTarget::new("murderteeth", "dummy"))
        .await
        .unwrap();

    let response = h
        .router
        .respond(&message(6, "jane_doe", "/jr whoami"))
        .await
        .unwrap()
        .unwrap();

    assert!(response.contains("chat.id: 6"));
    assert!(response.contains("chat.repo_owner: murderteeth"));
    assert!(response.contains("chat.repo_name: dummy"));

    let session = h.store.load_or_create(6).await.unwrap();
    assert_eq!(session.events.len(), 1); // whoami mutates nothing
}

#[tokio::test]
async fn trigger_with_extra_words_is_not_a_simple_command() {
    let h = harness(vec![final_completion("on it! 😻")]);
    h.store
        .configure(8, RepoTarget::new("murderteeth", "dummy"))
        .await
        .unwrap();

    // "reset the counter" must reach the model, not the reset handler
    let response = h
        .router
        .respond(&message(8, "john_doe", "/jr reset the counter"))
        .await
        .unwrap();

    assert_eq!(response.as_deref(), Some("on it! 😻"));
    assert_eq!(h.llm.call_count(), 1);
    let session = h.store.load_or_create(8).await.unwrap();
    assert!(!session.events.is_empty());
}

#[tokio::test]
async fn turn_failure_surfaces_and_leaves_no_partial_answer() {
    // the model keeps requesting tools past the budget
    let h = harness(vec![
        tool_completion("c1", "read_file", json!({ "path": "a" })),
        tool_completion("c2", "read_file", json!({ "path": "b" })),
        tool_completion("c3", "read_file", json!({ "path": "c" })),
        tool_completion("c4", "read_file", json!({ "path": "d" })),
    ]);
    h.store
        .configure(11, RepoTarget::new("murderteeth", "dummy"))
        .await
        .unwrap();

    let err = h
        .router
        .respond(&message(11, "john_doe", "/jr read everything"))
        .await
        .unwrap_err();
    assert!(matches!(err, AgentError::BudgetExceeded { steps: 4 }));
    assert_eq!(h.llm.call_count(), 4);

    // no synthesized response was recorded for the failed turn
    let session = h.store.load_or_create(11).await.unwrap();
    assert_eq!(session.events.len(), 1);
}
