use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use services::{
    FetchedResponse, Fetcher, QuizLoader, QuizLoopService, QuizSource, ResourceRequest,
    ResponseKind, TransportError,
};
use url::Url;

use crate::context::{UiApp, build_app_context};
use crate::views::QuizView;
use crate::views::quiz::QuizTestHandles;
use crate::vm::QuizIntent;

const BASE: &str = "http://localhost:8000/";

/// Serves `data/quizzes.json` when given a body; otherwise the origin is down.
struct TestSite {
    pages: HashMap<String, String>,
}

#[async_trait]
impl Fetcher for TestSite {
    async fn fetch(&self, request: &ResourceRequest) -> Result<FetchedResponse, TransportError> {
        let body = self
            .pages
            .get(request.url().as_str())
            .cloned()
            .ok_or_else(|| TransportError::Unreachable(request.url().to_string()))?;
        Ok(FetchedResponse {
            url: request.url().clone(),
            status: 200,
            kind: ResponseKind::Basic,
            content_type: Some("application/json".into()),
            body: body.into_bytes(),
        })
    }
}

struct TestApp {
    quiz_loop: Arc<QuizLoopService>,
    auto_advance: Duration,
    initial_source: Option<QuizSource>,
}

impl UiApp for TestApp {
    fn quiz_loop(&self) -> Arc<QuizLoopService> {
        Arc::clone(&self.quiz_loop)
    }

    fn auto_advance(&self) -> Duration {
        self.auto_advance
    }

    fn initial_source(&self) -> Option<QuizSource> {
        self.initial_source.clone()
    }
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    handles: QuizTestHandles,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for ViewHarnessProps {}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.handles.clone());
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    rsx! { QuizView {} }
}

/// Options for a harness run.
pub struct HarnessSetup {
    pub remote_body: Option<String>,
    pub initial_source: Option<QuizSource>,
    pub auto_advance: Duration,
}

impl Default for HarnessSetup {
    fn default() -> Self {
        Self {
            remote_body: None,
            initial_source: None,
            auto_advance: Duration::from_millis(100),
        }
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    handles: QuizTestHandles,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    /// Let spawned loads and timers run to completion.
    pub async fn settle(&mut self) {
        for _ in 0..4 {
            self.drive_async().await;
        }
    }

    pub fn dispatch(&mut self, intent: QuizIntent) {
        let dispatch = self.handles.dispatch();
        self.dom.in_runtime(|| dispatch.call(intent));
        drive_dom(&mut self.dom);
    }

    pub fn load_file(&mut self, path: &str) {
        let load_file = self.handles.load_file();
        self.dom.in_runtime(|| load_file.call(path.to_string()));
        drive_dom(&mut self.dom);
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

/// Build a quiz payload where every question's answer is option `A`.
pub fn all_a_payload(count: usize) -> String {
    let quizzes = (1..=count)
        .map(|n| {
            format!(
                r#"{{"question":"Question text {n}","options":["a{n}","b{n}","c{n}","d{n}"],"correctAnswer":0}}"#
            )
        })
        .collect::<Vec<_>>()
        .join(",");
    format!(r#"{{"quizzes":[{quizzes}]}}"#)
}

pub async fn setup_view_harness(setup: HarnessSetup) -> ViewHarness {
    let base = Url::parse(BASE).expect("valid base url");
    let mut pages = HashMap::new();
    if let Some(body) = setup.remote_body {
        pages.insert(format!("{BASE}data/quizzes.json"), body);
    }
    let loader = QuizLoader::new(Arc::new(TestSite { pages }), base);
    let quiz_loop = QuizLoopService::new(Arc::new(loader), "data/quizzes.json").with_seed(3);

    let app = Arc::new(TestApp {
        quiz_loop: Arc::new(quiz_loop),
        auto_advance: setup.auto_advance,
        initial_source: setup.initial_source,
    });
    let handles = QuizTestHandles::default();
    let dom = VirtualDom::new_with_props(
        ViewRouterHarness,
        ViewHarnessProps {
            app,
            handles: handles.clone(),
        },
    );

    let mut harness = ViewHarness { dom, handles };
    harness.rebuild();
    harness.settle().await;
    harness
}
