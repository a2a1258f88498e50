use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use learnflow::catalog::{Catalog, CatalogPlaylist, CatalogVideo};
use learnflow::error::LearnflowError;
use learnflow::llm::{GenerativeModel, GenerativeProvider};
use learnflow::plan::{LearningPlan, PlanAssembler};
use learnflow::transcript::{TranscriptRetriever, TranscriptSource};
use learnflow::ContextAnswerer;

struct StubCatalog {
    playlists: Vec<CatalogPlaylist>,
    videos: Vec<CatalogVideo>,
    video_search_fails: bool,
    calls: Arc<AtomicUsize>,
}

impl StubCatalog {
    fn new(playlists: Vec<CatalogPlaylist>, videos: Vec<CatalogVideo>) -> Self {
        Self {
            playlists,
            videos,
            video_search_fails: false,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl Catalog for StubCatalog {
    async fn search_playlists(&self, _topic: &str) -> learnflow::Result<Vec<CatalogPlaylist>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.playlists.clone())
    }

    async fn search_videos(&self, _topic: &str) -> learnflow::Result<Vec<CatalogVideo>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.video_search_fails {
            return Err(LearnflowError::Upstream {
                status: 403,
                body: "quota exceeded".to_string(),
            });
        }
        Ok(self.videos.clone())
    }

    async fn playlist_items(&self, _playlist_id: &str) -> learnflow::Result<Vec<CatalogVideo>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.videos.clone())
    }
}

struct StubModel {
    response: Option<String>,
    calls: Arc<AtomicUsize>,
}

impl StubModel {
    fn answering(text: &str) -> Self {
        Self {
            response: Some(text.to_string()),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn failing() -> Self {
        Self {
            response: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl GenerativeModel for StubModel {
    async fn complete(&self, _prompt: &str) -> anyhow::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.response {
            Some(text) => Ok(text.clone()),
            None => Err(anyhow::anyhow!("service unavailable")),
        }
    }

    fn provider_type(&self) -> GenerativeProvider {
        GenerativeProvider::Gemini
    }
}

struct StubTranscripts {
    text: String,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl TranscriptSource for StubTranscripts {
    async fn fetch(&self, _video_id: &str, _language: Option<&str>) -> anyhow::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.text.clone())
    }
}

fn video(id: &str, title: &str) -> CatalogVideo {
    CatalogVideo {
        id: id.to_string(),
        title: title.to_string(),
        description: "a description".to_string(),
        channel_title: "Example Channel".to_string(),
        duration_seconds: Some(720),
        published_at: None,
    }
}

fn playlist(id: &str, title: &str) -> CatalogPlaylist {
    CatalogPlaylist {
        id: id.to_string(),
        title: title.to_string(),
        description: "a playlist".to_string(),
        channel_title: "Example Channel".to_string(),
    }
}

fn five_videos() -> Vec<CatalogVideo> {
    (1..=5)
        .map(|i| video(&format!("v{}", i), &format!("Lesson {}", i)))
        .collect()
}

fn retriever(text: &str) -> (TranscriptRetriever, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let source = StubTranscripts {
        text: text.to_string(),
        calls: calls.clone(),
    };
    (
        TranscriptRetriever::new(Arc::new(source), vec!["en".to_string()]),
        calls,
    )
}

#[tokio::test]
async fn playlist_match_always_wins() {
    // Videos would also succeed, but an existing playlist takes priority.
    let catalog = StubCatalog::new(vec![playlist("pl1", "Full Rust Course")], five_videos());
    let assembler = PlanAssembler::new(Arc::new(catalog), None);

    let plan = assembler.generate("Rust").await.unwrap();
    match plan {
        LearningPlan::Playlist {
            playlist_id, tips, ..
        } => {
            assert_eq!(playlist_id, "pl1");
            assert_eq!(tips.milestones.len(), 3);
        }
        LearningPlan::Curated { .. } => panic!("expected playlist mode"),
    }
}

#[tokio::test]
async fn non_json_curation_gets_minimal_plan() {
    let catalog = StubCatalog::new(Vec::new(), five_videos());
    let model: Arc<dyn GenerativeModel> =
        Arc::new(StubModel::answering("Sure! Here are some nice videos to watch."));
    let assembler = PlanAssembler::new(Arc::new(catalog), Some(model));

    let plan = assembler.generate("Rust").await.unwrap();
    match plan {
        LearningPlan::Curated {
            modules,
            total_estimated_time_minutes,
            ..
        } => {
            assert_eq!(modules.len(), 1);
            assert_eq!(modules[0].title, "Getting Started");
            assert_eq!(modules[0].items.len(), 3);
            assert_eq!(total_estimated_time_minutes, Some(30));
        }
        LearningPlan::Playlist { .. } => panic!("expected curated mode"),
    }
}

#[tokio::test]
async fn generative_unavailable_gets_minimal_plan() {
    let catalog = StubCatalog::new(Vec::new(), five_videos());
    let model: Arc<dyn GenerativeModel> = Arc::new(StubModel::failing());
    let assembler = PlanAssembler::new(Arc::new(catalog), Some(model));

    let plan = assembler.generate("Python basics").await.unwrap();
    match plan {
        LearningPlan::Curated {
            modules,
            total_estimated_time_minutes,
            ..
        } => {
            assert_eq!(modules.len(), 1);
            assert_eq!(modules[0].items.len(), 3);
            assert_eq!(modules[0].estimated_time_minutes, Some(30));
            assert_eq!(total_estimated_time_minutes, Some(30));
        }
        LearningPlan::Playlist { .. } => panic!("expected curated mode"),
    }
}

#[tokio::test]
async fn valid_curation_is_capped_at_three_modules() {
    let module = |n: u32| {
        format!(
            r#"{{"title": "Module {n}", "items": [{{"videoId": "v{n}", "title": "T{n}"}}]}}"#
        )
    };
    let draft = format!(
        r#"{{"topic": "Rust", "modules": [{}, {}, {}, {}], "totalEstimatedTimeMinutes": 120}}"#,
        module(1),
        module(2),
        module(3),
        module(4)
    );
    let catalog = StubCatalog::new(Vec::new(), five_videos());
    let model: Arc<dyn GenerativeModel> = Arc::new(StubModel::answering(&draft));
    let assembler = PlanAssembler::new(Arc::new(catalog), Some(model));

    let plan = assembler.generate("Rust").await.unwrap();
    match plan {
        LearningPlan::Curated { modules, .. } => {
            assert_eq!(modules.len(), 3);
            assert_eq!(modules[0].title, "Module 1");
        }
        LearningPlan::Playlist { .. } => panic!("expected curated mode"),
    }
}

#[tokio::test]
async fn zero_videos_is_terminal() {
    let catalog = StubCatalog::new(Vec::new(), Vec::new());
    let assembler = PlanAssembler::new(Arc::new(catalog), None);

    let result = assembler.generate("obscuretopic").await;
    assert!(matches!(result, Err(LearnflowError::NoVideosFound)));
}

#[tokio::test]
async fn video_search_error_is_terminal() {
    let mut catalog = StubCatalog::new(Vec::new(), five_videos());
    catalog.video_search_fails = true;
    let assembler = PlanAssembler::new(Arc::new(catalog), None);

    let result = assembler.generate("Rust").await;
    assert!(matches!(
        result,
        Err(LearnflowError::Upstream { status: 403, .. })
    ));
}

#[tokio::test]
async fn short_topic_is_rejected() {
    let catalog = StubCatalog::new(Vec::new(), five_videos());
    let calls = catalog.calls.clone();
    let assembler = PlanAssembler::new(Arc::new(catalog), None);

    let result = assembler.generate(" x ").await;
    assert!(matches!(result, Err(LearnflowError::InvalidTopic)));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn empty_question_short_circuits_with_no_calls() {
    let catalog = StubCatalog::new(Vec::new(), five_videos());
    let catalog_calls = catalog.calls.clone();
    let model = StubModel::answering("unused");
    let model_calls = model.calls.clone();
    let (transcripts, transcript_calls) = retriever("some transcript");

    let answerer = ContextAnswerer::new(
        transcripts,
        Some(Arc::new(catalog)),
        Some(Arc::new(model)),
    );

    let answer = answerer.answer("   ", Some("Rust"), Some("v1")).await;
    assert_eq!(answer, "Please provide a question.");
    assert_eq!(catalog_calls.load(Ordering::SeqCst), 0);
    assert_eq!(model_calls.load(Ordering::SeqCst), 0);
    assert_eq!(transcript_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn generative_answer_wins_when_available() {
    let (transcripts, _) = retriever("Ownership moves values between bindings.");
    let model = StubModel::answering("Ownership means each value has one owner.");
    let answerer = ContextAnswerer::new(transcripts, None, Some(Arc::new(model)));

    let answer = answerer
        .answer("what is ownership", Some("Rust"), Some("v1"))
        .await;
    assert_eq!(answer, "Ownership means each value has one owner.");
}

#[tokio::test]
async fn summary_question_without_model_uses_transcript() {
    let (transcripts, _) = retriever(
        "This video is an introduction to Rust. We cover the basics of ownership. \
         Later sections go much deeper.",
    );
    let answerer = ContextAnswerer::new(transcripts, None, None);

    let answer = answerer
        .answer("give me a summary", Some("Rust"), Some("v1"))
        .await;
    assert!(answer.starts_with("Key points from this video:"));
    assert!(answer.contains("introduction to Rust"));
    assert!(!answer.contains("I can't reach the AI"));
}

#[tokio::test]
async fn summary_question_without_transcript_gets_generic_line() {
    let (transcripts, _) = retriever("");
    let answerer = ContextAnswerer::new(transcripts, None, None);

    let answer = answerer
        .answer("can you summarize this", Some("Rust"), Some("v1"))
        .await;
    assert!(answer.contains("Rust"));
    assert!(!answer.contains("I can't reach the AI"));
}

#[tokio::test]
async fn question_is_answered_from_transcript_extraction() {
    let (transcripts, _) = retriever(
        "Ownership is the core idea of the language. The weather outside is nice.",
    );
    let answerer = ContextAnswerer::new(transcripts, None, None);

    let answer = answerer
        .answer("how does ownership work", Some("Rust"), Some("v1"))
        .await;
    assert!(answer.starts_with("From the current video:"));
    assert!(answer.contains("Ownership is the core idea"));
    assert!(!answer.contains("The weather"));
}

#[tokio::test]
async fn unmatched_question_gets_catalog_suggestions() {
    let catalog = StubCatalog::new(
        Vec::new(),
        vec![video("v1", "Advanced lifetimes"), video("v2", "Trait objects")],
    );
    let (transcripts, _) = retriever("");
    let answerer = ContextAnswerer::new(transcripts, Some(Arc::new(catalog)), None);

    let answer = answerer
        .answer("explain lifetimes", Some("Rust"), Some("v1"))
        .await;
    assert!(answer.contains("these videos might help"));
    assert!(answer.contains("Advanced lifetimes - Example Channel"));
    assert!(answer.contains("Trait objects"));
}

#[tokio::test]
async fn everything_empty_ends_in_apology() {
    let catalog = StubCatalog::new(Vec::new(), Vec::new());
    let (transcripts, _) = retriever("");
    let answerer = ContextAnswerer::new(transcripts, Some(Arc::new(catalog)), None);

    let answer = answerer
        .answer("explain lifetimes", Some("Rust"), None)
        .await;
    assert!(answer.contains("I can't reach the AI right now"));
    assert!(answer.contains("\"Rust\""));
}

#[tokio::test]
async fn plan_serializes_with_wire_field_names() {
    let catalog = StubCatalog::new(Vec::new(), five_videos());
    let assembler = PlanAssembler::new(Arc::new(catalog), None);

    let plan = assembler.generate("Python basics").await.unwrap();
    let json = serde_json::to_value(&plan).unwrap();
    assert_eq!(json["mode"], "curated");
    assert_eq!(json["topic"], "Python basics");
    assert_eq!(json["modules"][0]["items"][0]["videoId"], "v1");
    assert_eq!(
        json["modules"][0]["items"][0]["url"],
        "https://www.youtube.com/watch?v=v1"
    );
    assert_eq!(json["totalEstimatedTimeMinutes"], 30);
}
