//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use git2::{Repository, Signature};

use combo::error::CompletionError;
use combo::llm::{CompletionGateway, GenerationParams};
use combo::prompt::RenderedPrompt;

/// Create a temporary directory for test output.
pub fn temp_test_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

/// A test git repository builder for integration tests.
pub struct TestRepo {
    pub dir: tempfile::TempDir,
    pub repo: Repository,
}

impl TestRepo {
    /// Create a new empty git repository with a local identity so the
    /// `git` CLI can commit without global config.
    pub fn new() -> Self {
        let dir = temp_test_dir();
        let repo = Repository::init(dir.path()).expect("Failed to init git repo");
        {
            let mut config = repo.config().expect("Failed to open repo config");
            config.set_str("user.name", "Test User").expect("Failed to set user.name");
            config
                .set_str("user.email", "test@example.com")
                .expect("Failed to set user.email");
            config
                .set_bool("commit.gpgsign", false)
                .expect("Failed to disable signing");
        }
        Self { dir, repo }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `content` to `name` and add it to the index.
    pub fn stage(&self, name: &str, content: &str) {
        let file_path = self.dir.path().join(name);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        std::fs::write(&file_path, content).expect("Failed to write test file");

        let mut index = self.repo.index().expect("Failed to get index");
        index.add_path(Path::new(name)).expect("Failed to add file");
        index.write().expect("Failed to write index");
    }

    /// Commit whatever is in the index. Used to give the repo a HEAD.
    pub fn commit_index(&self, message: &str) {
        let sig = Signature::now("Test User", "test@example.com").expect("Failed to create signature");
        let mut index = self.repo.index().expect("Failed to get index");
        let tree_id = index.write_tree().expect("Failed to write tree");
        let tree = self.repo.find_tree(tree_id).expect("Failed to find tree");
        let parent = self.repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();
        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .expect("Failed to create commit");
    }

    /// Message of the HEAD commit, if any.
    pub fn head_message(&self) -> Option<String> {
        let head = self.repo.head().ok()?.peel_to_commit().ok()?;
        head.message().map(|m| m.trim_end().to_string())
    }

    /// Number of commits reachable from HEAD.
    pub fn commit_count(&self) -> usize {
        let Ok(mut walk) = self.repo.revwalk() else {
            return 0;
        };
        if walk.push_head().is_err() {
            return 0;
        }
        walk.count()
    }

    /// Short name of the checked-out branch.
    pub fn current_branch(&self) -> Option<String> {
        self.repo.head().ok()?.shorthand().map(str::to_string)
    }
}

/// Gateway that returns fixed candidates and remembers every prompt it saw.
pub struct FixedGateway {
    candidates: Vec<String>,
    pub seen: Mutex<Vec<RenderedPrompt>>,
}

impl FixedGateway {
    pub fn new(candidates: &[&str]) -> Self {
        Self {
            candidates: candidates.iter().map(|c| c.to_string()).collect(),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.seen.lock().expect("poisoned").len()
    }

    pub fn last_prompt(&self) -> Option<RenderedPrompt> {
        self.seen.lock().expect("poisoned").last().cloned()
    }
}

#[async_trait]
impl CompletionGateway for FixedGateway {
    async fn complete(
        &self,
        prompt: &RenderedPrompt,
        _params: &GenerationParams,
    ) -> Result<Vec<String>, CompletionError> {
        self.seen.lock().expect("poisoned").push(prompt.clone());
        Ok(self.candidates.clone())
    }
}
