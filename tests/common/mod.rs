//! Shared helpers for the integration tests: a scripted language model and a
//! fixture PDF builder.

#![allow(dead_code)]

use async_trait::async_trait;
use content_crew::{AgentError, Completion, LanguageModel};
use lopdf::{dictionary, Document, Object, Stream};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Answers prompts from a fixed script and records what it was asked.
pub struct MockModel {
    answers: Mutex<VecDeque<Result<String, String>>>,
    prompts: Mutex<Vec<String>>,
}

impl MockModel {
    pub fn new(answers: &[Result<&str, &str>]) -> Arc<Self> {
        Arc::new(Self {
            answers: Mutex::new(
                answers
                    .iter()
                    .map(|a| a.map(str::to_string).map_err(str::to_string))
                    .collect(),
            ),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LanguageModel for MockModel {
    fn model_name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, _system: Option<&str>, prompt: &str) -> Result<Completion, AgentError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match self.answers.lock().unwrap().pop_front() {
            Some(Ok(text)) => Ok(Completion::text(text)),
            Some(Err(detail)) => Err(AgentError::Llm { detail }),
            None => Err(AgentError::Llm {
                detail: "script exhausted".into(),
            }),
        }
    }
}

/// A PDF with one line of Helvetica text per page; `""` gives an empty page.
pub fn fixture_pdf(page_texts: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.4");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in page_texts {
        let content = if text.is_empty() {
            String::new()
        } else {
            format!("BT /F1 12 Tf 72 700 Td ({text}) Tj ET")
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Resources" => resources_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_texts.len() as i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

/// Write `fixture_pdf(page_texts)` to `<dir>/<name>` and return the path as a string.
pub fn write_fixture(dir: &std::path::Path, name: &str, page_texts: &[&str]) -> String {
    let path = dir.join(name);
    std::fs::write(&path, fixture_pdf(page_texts)).unwrap();
    path.to_string_lossy().into_owned()
}

/// Route library logs to the test harness; `RUST_LOG` picks the level.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
