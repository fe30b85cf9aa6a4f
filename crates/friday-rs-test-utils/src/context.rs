use crate::{RecordingDesktop, RecordingRunner};
use friday_rs_memory::MemoryStore;
use friday_rs_tools::{Mailer, ToolContext, ToolLimits, ToolServices, WebProvider};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

/// A tool context over recording doubles, rooted in a temporary directory.
///
/// Keep the session alive for as long as the context is used; dropping it
/// removes the working directory and the memory file.
pub struct TestSession {
    pub dir: TempDir,
    pub runner: Arc<RecordingRunner>,
    pub desktop: Arc<RecordingDesktop>,
    pub memory: Arc<MemoryStore>,
    web: Option<Arc<dyn WebProvider>>,
    mailer: Option<Arc<dyn Mailer>>,
}

impl TestSession {
    pub fn new() -> Self {
        Self::with_doubles(RecordingRunner::new(), RecordingDesktop::new())
    }

    pub fn with_doubles(runner: RecordingRunner, desktop: RecordingDesktop) -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let memory = Arc::new(MemoryStore::open(dir.path().join("friday_memory.json")));
        Self {
            dir,
            runner: Arc::new(runner),
            desktop: Arc::new(desktop),
            memory,
            web: None,
            mailer: None,
        }
    }

    pub fn with_web(mut self, web: Arc<dyn WebProvider>) -> Self {
        self.web = Some(web);
        self
    }

    pub fn with_mailer(mut self, mailer: Arc<dyn Mailer>) -> Self {
        self.mailer = Some(mailer);
        self
    }

    pub fn services(&self) -> ToolServices {
        ToolServices {
            cwd: self.dir.path().to_path_buf(),
            memory: self.memory.clone(),
            runner: self.runner.clone(),
            desktop: self.desktop.clone(),
            web: self.web.clone(),
            mailer: self.mailer.clone(),
            limits: ToolLimits {
                command_timeout: Duration::from_secs(2),
                helper_timeout: Duration::from_secs(1),
            },
            output_policy: None,
            autostart_dir: Some(self.dir.path().join("autostart")),
            search_limit: 5,
        }
    }

    pub fn context(&self) -> ToolContext {
        ToolContext::new(Arc::new(self.services()))
    }
}

impl Default for TestSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Context over fresh doubles; the returned session owns the temp directory.
pub fn base_tool_context() -> (TestSession, ToolContext) {
    let session = TestSession::new();
    let ctx = session.context();
    (session, ctx)
}
