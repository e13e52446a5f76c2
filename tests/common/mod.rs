#![allow(dead_code)]

use git2::{Repository, Signature, Time};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Scratch git repository with deterministic commit times
pub struct TestRepo {
    pub dir: TempDir,
    pub repo: Repository,
    clock: i64,
}

impl TestRepo {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        TestRepo {
            dir,
            repo,
            clock: 1_700_000_000,
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Commit on top of HEAD, recording the message in `history.txt`
    pub fn commit(&mut self, message: &str) -> &mut Self {
        self.clock += 60;
        let sig = Signature::new("Test", "test@example.com", &Time::new(self.clock, 0)).unwrap();

        let marker = self.path().join("history.txt");
        let mut history = fs::read_to_string(&marker).unwrap_or_default();
        history.push_str(message);
        history.push('\n');
        fs::write(&marker, history).unwrap();

        let mut index = self.repo.index().unwrap();
        index.add_path(Path::new("history.txt")).unwrap();
        index.write().unwrap();
        let tree_id = index.write_tree().unwrap();
        let tree = self.repo.find_tree(tree_id).unwrap();

        let parent = self
            .repo
            .head()
            .ok()
            .and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();
        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .unwrap();
        drop(parents);
        drop(parent);
        drop(tree);
        self
    }

    /// Lightweight tag on HEAD
    pub fn tag(&mut self, name: &str) -> &mut Self {
        let head = self.repo.head().unwrap().peel_to_commit().unwrap();
        self.repo
            .tag_lightweight(name, head.as_object(), false)
            .unwrap();
        drop(head);
        self
    }

    /// Annotated tag on HEAD whose tagger time is `offset` seconds after the last commit
    pub fn annotated_tag(&mut self, name: &str, offset: i64) -> &mut Self {
        let tagger = Signature::new(
            "Test",
            "test@example.com",
            &Time::new(self.clock + offset, 0),
        )
        .unwrap();
        let head = self.repo.head().unwrap().peel_to_commit().unwrap();
        self.repo
            .tag(name, head.as_object(), &tagger, name, false)
            .unwrap();
        drop(head);
        self
    }

    pub fn write(&self, name: &str, content: &str) {
        fs::write(self.path().join(name), content).unwrap();
    }

    pub fn read(&self, name: &str) -> String {
        fs::read_to_string(self.path().join(name)).unwrap()
    }

    pub fn package_json(&self, version: &str) {
        self.write(
            "package.json",
            &format!(
                "{{\n  \"name\": \"site\",\n  \"version\": \"{}\"\n}}\n",
                version
            ),
        );
    }
}
