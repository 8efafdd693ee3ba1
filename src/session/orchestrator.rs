use super::Presenter;
use crate::ai::ModelGateway;
use crate::config::AppConfig;
use crate::models;
use crate::research::{PageExtractor, SearchGateway};
use crate::types::{ChatMessage, Mode};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

const SEARCH_PREFIX: &str = "search ";
const SELECT_IMAGE_COMMAND: &str = "select image";

const LOCK_MSG: &str = "session state poisoned";

/// Mutable state of one running session. Lives exactly as long as the
/// process; nothing here is persisted.
#[derive(Debug)]
struct SessionState {
    history: Vec<ChatMessage>,
    mode: Mode,
    active_model: String,
    attached_image: Option<PathBuf>,
    /// Guard for the single-in-flight-submission invariant.
    busy: bool,
}

pub struct Orchestrator<P: Presenter> {
    state: Mutex<SessionState>,
    model: Arc<dyn ModelGateway>,
    search: Arc<dyn SearchGateway>,
    extractor: Arc<dyn PageExtractor>,
    presenter: P,
    max_search_results: usize,
}

impl<P: Presenter> Orchestrator<P> {
    pub fn new(
        presenter: P,
        model: Arc<dyn ModelGateway>,
        search: Arc<dyn SearchGateway>,
        extractor: Arc<dyn PageExtractor>,
        config: &AppConfig,
    ) -> Self {
        if models::find(&config.default_model).is_none() {
            tracing::warn!(model = %config.default_model, "configured model is not in the catalog");
        }
        Self {
            state: Mutex::new(SessionState {
                history: Vec::new(),
                mode: Mode::Unset,
                active_model: config.default_model.clone(),
                attached_image: None,
                busy: false,
            }),
            model,
            search,
            extractor,
            presenter,
            max_search_results: config.max_search_results,
        }
    }

    // --- read-only snapshots for the UI and tests ---

    pub fn mode(&self) -> Mode {
        self.state.lock().expect(LOCK_MSG).mode
    }

    pub fn active_model(&self) -> String {
        self.state.lock().expect(LOCK_MSG).active_model.clone()
    }

    pub fn attached_image(&self) -> Option<PathBuf> {
        self.state.lock().expect(LOCK_MSG).attached_image.clone()
    }

    pub fn history(&self) -> Vec<ChatMessage> {
        self.state.lock().expect(LOCK_MSG).history.clone()
    }

    pub fn is_busy(&self) -> bool {
        self.state.lock().expect(LOCK_MSG).busy
    }

    // --- mode and model selection ---

    pub fn set_mode(&self, mode: Mode) {
        match mode {
            Mode::WebSearch => {
                {
                    let mut state = self.state.lock().expect(LOCK_MSG);
                    state.mode = Mode::WebSearch;
                    state.attached_image = None;
                }
                self.presenter.image_status_changed(None);
                self.presenter.notice(
                    "Mode set to Web Search. Type 'search <query>' to do a web search, \
                     or chat normally.",
                );
            }
            Mode::ImageAnalysis => {
                let vision = models::vision_model().id;
                {
                    let mut state = self.state.lock().expect(LOCK_MSG);
                    state.mode = Mode::ImageAnalysis;
                    state.active_model = vision.to_string();
                    state.attached_image = None;
                }
                self.presenter.image_status_changed(None);
                self.presenter.notice(&format!(
                    "Mode set to Image Q&A with '{vision}'. Chat normally or use the \
                     Upload button/type 'select image' to add an image."
                ));
            }
            Mode::Unset => {
                let mut state = self.state.lock().expect(LOCK_MSG);
                state.mode = Mode::Unset;
                state.attached_image = None;
            }
        }
    }

    /// Switch the model used for the next request. While in image mode only
    /// the vision model is accepted; the rejection changes nothing.
    pub fn select_model(&self, id: &str) {
        if models::find(id).is_none() {
            self.presenter.notice(&format!("Unknown model: {id}."));
            return;
        }
        let vision = models::vision_model().id;
        {
            let mut state = self.state.lock().expect(LOCK_MSG);
            if state.mode == Mode::ImageAnalysis && id != vision {
                drop(state);
                self.presenter
                    .notice(&format!("Image mode only supports {vision}."));
                return;
            }
            state.active_model = id.to_string();
        }
        self.presenter.notice(&format!("Switched to model: {id}"));
    }

    /// The Upload button: pick an image without going through the composer.
    pub async fn attach_image(&self) {
        if self.mode() != Mode::ImageAnalysis {
            self.presenter
                .notice("Please switch to Image mode to upload an image.");
            return;
        }
        self.pick_image_flow().await;
    }

    // --- submission entry point ---

    /// Handle one raw composer submission end to end. Input is disabled for
    /// the whole dispatch and re-enabled exactly once, whatever path runs.
    pub async fn handle_submission(&self, raw_text: &str) {
        let text = raw_text.trim();
        if text.is_empty() {
            return;
        }

        {
            let mut state = self.state.lock().expect(LOCK_MSG);
            if state.busy {
                // The composer is disabled while a pipeline runs, so this
                // only fires if the presentation layer broke that contract.
                tracing::warn!("submission while busy dropped");
                return;
            }
            state.busy = true;
        }
        self.presenter.set_input_enabled(false);

        self.dispatch(text).await;

        self.state.lock().expect(LOCK_MSG).busy = false;
        self.presenter.set_input_enabled(true);
    }

    async fn dispatch(&self, text: &str) {
        let mode = self.mode();
        match mode {
            Mode::Unset => {
                self.presenter
                    .notice("No mode selected. Please click one of the tiles above.");
            }
            Mode::WebSearch => {
                self.append_message(ChatMessage::user(text));
                if let Some(query) = strip_search_prefix(text) {
                    self.run_search_pipeline(&query).await;
                } else {
                    self.run_respond_pipeline().await;
                }
            }
            Mode::ImageAnalysis => {
                if text.eq_ignore_ascii_case(SELECT_IMAGE_COMMAND) {
                    self.pick_image_flow().await;
                } else {
                    let images = {
                        let state = self.state.lock().expect(LOCK_MSG);
                        state.attached_image.clone().into_iter().collect()
                    };
                    self.append_message(ChatMessage::user_with_images(text, images));
                    self.run_respond_pipeline().await;
                }
            }
        }
    }

    fn append_message(&self, message: ChatMessage) {
        {
            let mut state = self.state.lock().expect(LOCK_MSG);
            state.history.push(message.clone());
        }
        self.presenter.render_message(&message);
    }

    async fn pick_image_flow(&self) {
        match self.presenter.pick_image().await {
            Some(path) => {
                let name = file_label(&path);
                self.state.lock().expect(LOCK_MSG).attached_image = Some(path);
                self.presenter.image_status_changed(Some(&name));
                self.presenter.notice(&format!("Image selected: {name}"));
            }
            None => {
                self.presenter.notice("No image selected.");
            }
        }
    }

    // --- pipelines ---

    /// Search, extract each hit independently, feed the survivors to the
    /// model as a system message. Each step fails without touching its
    /// siblings; a dry run ends before any model call.
    async fn run_search_pipeline(&self, query: &str) {
        let urls = match self.search.search(query, self.max_search_results).await {
            Ok(urls) => urls,
            Err(err) => {
                tracing::warn!(%err, "search failed");
                self.presenter.notice("No search results or error.");
                return;
            }
        };
        if urls.is_empty() {
            self.presenter.notice("No search results or error.");
            return;
        }

        let mut sources = Vec::new();
        for url in &urls {
            match self.extractor.extract(url).await {
                Ok(text) => {
                    sources.push(format!("Source: {url}\n{text}\n\n"));
                    self.presenter.notice(&format!("Processed: {url}"));
                }
                Err(err) => {
                    self.presenter
                        .notice(&format!("Error processing {url}: {err}"));
                }
            }
        }
        if sources.is_empty() {
            self.presenter
                .notice("No relevant info found from the search.");
            return;
        }

        let block = sources.concat();
        self.append_message(ChatMessage::system(format!(
            "Search results for '{query}':\n{block}"
        )));
        self.run_respond_pipeline().await;
    }

    /// Stream one assistant reply. The gateway runs as its own task feeding
    /// a token channel; tokens are surfaced as they arrive. Only a cleanly
    /// closed stream is committed to history.
    async fn run_respond_pipeline(&self) {
        let (model, messages) = {
            let state = self.state.lock().expect(LOCK_MSG);
            (state.active_model.clone(), state.history.clone())
        };

        let (tx, mut rx) = mpsc::unbounded_channel();
        let gateway = Arc::clone(&self.model);
        let task = tokio::spawn(async move { gateway.stream_chat(model, messages, tx).await });

        self.presenter.stream_started();
        let mut reply = String::new();
        while let Some(token) = rx.recv().await {
            reply.push_str(&token);
            self.presenter.stream_token(&token);
        }

        match task.await {
            Ok(Ok(())) => {
                let message = ChatMessage::assistant(reply);
                self.state
                    .lock()
                    .expect(LOCK_MSG)
                    .history
                    .push(message);
                self.presenter.stream_closed(true);
            }
            Ok(Err(err)) => {
                self.presenter.stream_closed(false);
                self.presenter.notice(&format!("Error in response: {err}"));
            }
            Err(err) => {
                self.presenter.stream_closed(false);
                self.presenter.notice(&format!("Error in response: {err}"));
            }
        }
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("image")
        .to_string()
}

/// `"search <query>"` (any case) marks a web search; everything else is
/// plain chat. The remainder is the query, trimmed.
fn strip_search_prefix(text: &str) -> Option<String> {
    let head = text.get(..SEARCH_PREFIX.len())?;
    if head.eq_ignore_ascii_case(SEARCH_PREFIX) {
        Some(text[SEARCH_PREFIX.len()..].trim().to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_prefix_is_case_insensitive() {
        assert_eq!(
            strip_search_prefix("search weather today"),
            Some("weather today".to_string())
        );
        assert_eq!(
            strip_search_prefix("SEARCH weather"),
            Some("weather".to_string())
        );
        assert_eq!(
            strip_search_prefix("Search   spaced out  "),
            Some("spaced out".to_string())
        );
    }

    #[test]
    fn non_commands_are_plain_chat() {
        assert_eq!(strip_search_prefix("hello"), None);
        assert_eq!(strip_search_prefix("search"), None);
        assert_eq!(strip_search_prefix("searching for meaning"), None);
        assert_eq!(strip_search_prefix(""), None);
    }

    #[test]
    fn multibyte_input_does_not_panic() {
        assert_eq!(strip_search_prefix("héllo ä"), None);
        assert_eq!(strip_search_prefix("日本語のテキスト"), None);
    }

    #[test]
    fn file_label_uses_the_file_name() {
        assert_eq!(file_label(Path::new("/home/me/pics/cat.png")), "cat.png");
        assert_eq!(file_label(Path::new("dog.jpg")), "dog.jpg");
    }
}
