use crate::matchers::SemanticsMatcher;
use crate::{QueryError, Screen};
use rolecall_app_shell::{AppShell, ShellError, ShellSettings};
use rolecall_core::{location_key, Key, NodeId};
use rolecall_ui::{normalize_text, SemanticsNode};
use web_time::{Duration, Instant};

/// Knobs of a [`ComposeTestRule`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestConfig {
    /// Frames `await_idle` runs before giving up.
    pub max_settle_frames: usize,
    /// How long `find_*` queries keep polling.
    pub find_timeout: Duration,
    /// Pause between two `find_*` polls.
    pub find_interval: Duration,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            max_settle_frames: 100,
            find_timeout: Duration::from_secs(1),
            find_interval: Duration::from_millis(16),
        }
    }
}

impl TestConfig {
    pub fn with_max_settle_frames(mut self, frames: usize) -> Self {
        self.max_settle_frames = frames;
        self
    }

    pub fn with_find_timeout(mut self, timeout: Duration) -> Self {
        self.find_timeout = timeout;
        self
    }

    pub fn with_find_interval(mut self, interval: Duration) -> Self {
        self.find_interval = interval;
        self
    }
}

/// Handle to one node found by a query.
pub struct TestNode<'a> {
    rule: &'a mut ComposeTestRule,
    node_id: NodeId,
}

impl<'a> TestNode<'a> {
    pub fn node_id(&self) -> NodeId {
        self.node_id
    }

    pub fn perform_click(&mut self) -> &mut Self {
        let id = self.node_id;
        self.rule.expect_shell(|shell| shell.click(id), "click", id);
        self
    }

    /// Clicks the node, then types `text` one character at a time.
    pub fn perform_text_input(&mut self, text: &str) -> &mut Self {
        let id = self.node_id;
        self.rule.expect_shell(|shell| shell.click(id), "focus", id);
        self.rule
            .expect_shell(|shell| shell.type_text(text), "text input", id);
        self
    }

    /// Replaces the whole value with a single change.
    pub fn perform_text_replacement(&mut self, text: &str) -> &mut Self {
        let id = self.node_id;
        self.rule
            .expect_shell(|shell| shell.replace_text(id, text), "text replacement", id);
        self
    }

    /// Focuses the node and presses Enter.
    pub fn perform_ime_action(&mut self) -> &mut Self {
        let id = self.node_id;
        self.rule.expect_shell(
            |shell| {
                shell.focus(id)?;
                shell.press_enter()
            },
            "ime action",
            id,
        );
        self
    }

    pub fn fetch_semantics_node(&mut self) -> SemanticsNode {
        let id = self.node_id;
        match self.rule.semantics_node(id) {
            Some(node) => node,
            None => panic!(
                "Node #{id} is no longer part of the semantics tree:\n{}",
                self.rule.dump_tree()
            ),
        }
    }

    pub fn assert_exists(&mut self) -> &mut Self {
        let id = self.node_id;
        assert!(
            self.rule.semantics_node(id).is_some(),
            "Node #{id} does not exist:\n{}",
            self.rule.dump_tree()
        );
        self
    }

    /// Compares the whitespace-normalised text content of the node.
    pub fn assert_text_equals(&mut self, expected: &str) -> &mut Self {
        let node = self.fetch_semantics_node();
        assert_eq!(
            normalize_text(&node.text_content),
            normalize_text(expected),
            "text of node #{}",
            node.node_id
        );
        self
    }

    pub fn assert_value_equals(&mut self, expected: &str) -> &mut Self {
        let node = self.fetch_semantics_node();
        assert_eq!(
            node.value.as_deref(),
            Some(expected),
            "value of node #{}",
            node.node_id
        );
        self
    }
}

/// Hosts content in a headless shell and runs queries against it.
///
/// `get_*` and `find_*` panic with the rendered semantics tree when the query
/// fails, `query_*` return what they found. The `try_*` forms return the
/// [`QueryError`] instead of panicking.
pub struct ComposeTestRule {
    shell: AppShell,
    root_key: Key,
    config: TestConfig,
}

impl ComposeTestRule {
    pub fn new() -> Self {
        Self::with_config(TestConfig::default())
    }

    pub fn with_config(config: TestConfig) -> Self {
        let root_key = location_key(file!(), line!(), column!());
        let shell = AppShell::with_settings(root_key, Self::shell_settings(&config), || {});
        Self {
            shell,
            root_key,
            config,
        }
    }

    fn shell_settings(config: &TestConfig) -> ShellSettings {
        ShellSettings::default().with_max_settle_frames(config.max_settle_frames)
    }

    pub fn config(&self) -> &TestConfig {
        &self.config
    }

    /// Replaces the content under test and waits for it to settle.
    pub fn set_content(&mut self, content: impl FnMut() + 'static) {
        self.shell = AppShell::with_settings(
            self.root_key,
            Self::shell_settings(&self.config),
            content,
        );
        self.await_idle();
    }

    pub fn await_idle(&mut self) {
        let mut i = 0;
        while self.shell.should_render() || self.shell.needs_redraw() {
            self.shell.update();
            i += 1;
            if i > self.config.max_settle_frames {
                panic!(
                    "Composition failed to settle after {} frames",
                    self.config.max_settle_frames
                );
            }
        }
    }

    pub fn shell(&mut self) -> &mut AppShell {
        &mut self.shell
    }

    /// Queries over the whole settled tree.
    pub fn screen(&mut self) -> Screen<'_> {
        self.await_idle();
        match self.shell.semantics_tree() {
            Ok(tree) => Screen::new(tree),
            Err(err) => panic!("Semantics tree not available: {err}"),
        }
    }

    fn expect_shell<R>(
        &mut self,
        action: impl FnOnce(&mut AppShell) -> Result<R, ShellError>,
        what: &str,
        id: NodeId,
    ) -> R {
        match action(&mut self.shell) {
            Ok(result) => {
                self.await_idle();
                result
            }
            Err(err) => panic!("{what} on node #{id} failed: {err}\n{}", self.dump_tree()),
        }
    }

    fn semantics_node(&mut self, id: NodeId) -> Option<SemanticsNode> {
        self.await_idle();
        self.shell
            .semantics_tree()
            .ok()
            .and_then(|tree| tree.node(id).cloned())
    }

    fn fail(&mut self, err: QueryError) -> ! {
        panic!("{err}\n{}", self.dump_tree())
    }

    pub fn try_get_by(&mut self, matcher: &SemanticsMatcher) -> Result<NodeId, QueryError> {
        self.await_idle();
        let tree = self.shell.semantics_tree()?;
        Screen::new(tree).get(matcher).map(|node| node.node_id)
    }

    pub fn try_query_by(
        &mut self,
        matcher: &SemanticsMatcher,
    ) -> Result<Option<NodeId>, QueryError> {
        self.await_idle();
        let tree = self.shell.semantics_tree()?;
        Ok(Screen::new(tree).query(matcher)?.map(|node| node.node_id))
    }

    pub fn try_get_all_by(
        &mut self,
        matcher: &SemanticsMatcher,
    ) -> Result<Vec<NodeId>, QueryError> {
        self.await_idle();
        let tree = self.shell.semantics_tree()?;
        let found = Screen::new(tree).get_all(matcher)?;
        Ok(found.into_iter().map(|node| node.node_id).collect())
    }

    /// Polls `try_get_all_by` until it matches or the find timeout passes.
    pub fn try_find_all_by(
        &mut self,
        matcher: &SemanticsMatcher,
    ) -> Result<Vec<NodeId>, QueryError> {
        let start = Instant::now();
        loop {
            self.shell.update();
            match self.try_get_all_by(matcher) {
                Ok(found) => return Ok(found),
                Err(QueryError::NotFound { description }) => {
                    let waited = start.elapsed();
                    if waited >= self.config.find_timeout {
                        return Err(QueryError::Timeout {
                            description,
                            waited,
                        });
                    }
                    log::trace!("still waiting for a node that {description}");
                    std::thread::sleep(self.config.find_interval);
                }
                Err(err) => return Err(err),
            }
        }
    }

    pub fn try_find_by(&mut self, matcher: &SemanticsMatcher) -> Result<NodeId, QueryError> {
        let mut found = self.try_find_all_by(matcher)?;
        match found.len() {
            1 => Ok(found.remove(0)),
            count => Err(QueryError::Multiple {
                description: matcher.description().to_string(),
                count,
            }),
        }
    }

    pub fn get_by(&mut self, matcher: SemanticsMatcher) -> TestNode<'_> {
        match self.try_get_by(&matcher) {
            Ok(node_id) => self.node(node_id),
            Err(err) => self.fail(err),
        }
    }

    /// Same as [`get_by`](Self::get_by), kept for Compose-style tests.
    pub fn on_node(&mut self, matcher: SemanticsMatcher) -> TestNode<'_> {
        self.get_by(matcher)
    }

    pub fn query_by(&mut self, matcher: SemanticsMatcher) -> Option<TestNode<'_>> {
        match self.try_query_by(&matcher) {
            Ok(Some(node_id)) => Some(self.node(node_id)),
            Ok(None) => None,
            Err(err) => self.fail(err),
        }
    }

    pub fn find_by(&mut self, matcher: SemanticsMatcher) -> TestNode<'_> {
        match self.try_find_by(&matcher) {
            Ok(node_id) => self.node(node_id),
            Err(err) => self.fail(err),
        }
    }

    pub fn get_all_by(&mut self, matcher: SemanticsMatcher) -> Vec<NodeId> {
        match self.try_get_all_by(&matcher) {
            Ok(found) => found,
            Err(err) => self.fail(err),
        }
    }

    pub fn query_all_by(&mut self, matcher: SemanticsMatcher) -> Vec<NodeId> {
        self.screen()
            .query_all(&matcher)
            .into_iter()
            .map(|node| node.node_id)
            .collect()
    }

    pub fn find_all_by(&mut self, matcher: SemanticsMatcher) -> Vec<NodeId> {
        match self.try_find_all_by(&matcher) {
            Ok(found) => found,
            Err(err) => self.fail(err),
        }
    }

    /// Wraps a node id returned by one of the `*_all_by` queries.
    pub fn node(&mut self, node_id: NodeId) -> TestNode<'_> {
        TestNode {
            rule: self,
            node_id,
        }
    }

    /// Types into whatever has focus.
    pub fn keyboard(&mut self, text: &str) {
        if let Err(err) = self.shell.type_text(text) {
            panic!(
                "keyboard input {text:?} failed: {err}\n{}",
                self.dump_tree()
            );
        }
        self.await_idle();
    }

    pub fn navigation_count(&self) -> usize {
        self.shell.navigation_count()
    }

    /// The semantics tree as text, for failure messages.
    pub fn dump_tree(&mut self) -> String {
        match self.shell.semantics_tree() {
            Ok(tree) => tree.dump(),
            Err(err) => format!("<semantics unavailable: {err}>\n{}", self.shell.dump_tree()),
        }
    }
}

impl Default for ComposeTestRule {
    fn default() -> Self {
        Self::new()
    }
}
